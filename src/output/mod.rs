pub mod formatter;
pub mod writer;

pub use formatter::{
    format_breakdown, format_json, format_outcome_report, format_percent,
    format_stimulation_plan, resolve_colors, should_use_colors,
};
pub use writer::save_report;
