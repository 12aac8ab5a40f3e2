use std::fmt::Write as _;
use std::io::IsTerminal;

use owo_colors::OwoColorize;
use serde::Serialize;
use terminal_size::{terminal_size, Width};

use crate::config::ColorChoice;
use crate::scoring::{OutcomeAssessment, Prediction, ScoreBreakdown};
use crate::stimulation::StimulationPlan;

const OUTCOME_DISCLAIMER: &str = "Predictions are based on statistical models and should be interpreted in clinical context. Individual outcomes may vary significantly.";
const STIMULATION_DISCLAIMER: &str = "This protocol is generated for clinical decision support. Final approval and modifications must be made by qualified reproductive endocrinologists.";

const MAX_RULE_WIDTH: usize = 72;
const PIPE_RULE_WIDTH: usize = 60;

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Resolve the configured color choice against the terminal.
pub fn resolve_colors(choice: ColorChoice) -> bool {
    match choice {
        ColorChoice::Auto => should_use_colors(),
        ColorChoice::Always => true,
        ColorChoice::Never => false,
    }
}

/// Get terminal width, defaulting to None for pipes
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

fn rule() -> String {
    let width = get_terminal_width()
        .map(|w| w.min(MAX_RULE_WIDTH))
        .unwrap_or(PIPE_RULE_WIDTH);
    "─".repeat(width)
}

/// Probability as a percentage with one decimal, e.g. 0.4235 -> "42.4%"
pub fn format_percent(probability: f64) -> String {
    format!("{:.1}%", probability * 100.0)
}

fn heading(text: &str, use_colors: bool) -> String {
    if use_colors {
        text.bold().to_string()
    } else {
        text.to_string()
    }
}

fn section(out: &mut String, title: &str, use_colors: bool) {
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", heading(title, use_colors));
}

fn bullets(out: &mut String, items: &[String]) {
    for item in items {
        let _ = writeln!(out, "  - {}", item);
    }
}

fn prediction_line(label: &str, prediction: &Prediction, use_colors: bool) -> String {
    let percent = format_percent(prediction.probability);
    let percent = if use_colors {
        percent.cyan().bold().to_string()
    } else {
        percent
    };
    format!(
        "  {:<22}{:>8}  (confidence {})",
        label,
        percent,
        format_percent(prediction.confidence)
    )
}

/// Render a breakdown as an indented factor list.
pub fn format_breakdown(title: &str, breakdown: &ScoreBreakdown, use_colors: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "  {} (base {:.2} -> {:.2})",
        heading(title, use_colors),
        breakdown.base_score,
        breakdown.score
    );
    if breakdown.factors.is_empty() {
        let _ = writeln!(out, "    no adjustments");
    }
    for factor in &breakdown.factors {
        let line = format!(
            "    {:<20}{}  [{:.2} -> {:.2}]",
            factor.label, factor.description, factor.before, factor.after
        );
        if use_colors {
            let _ = writeln!(out, "{}", line.dimmed());
        } else {
            let _ = writeln!(out, "{}", line);
        }
    }
    out
}

/// Format an outcome assessment for the terminal.
///
/// Verbose mode adds the per-factor breakdown of every sub-score.
pub fn format_outcome_report(
    assessment: &OutcomeAssessment,
    verbose: bool,
    use_colors: bool,
) -> String {
    let result = &assessment.result;
    let predictions = &result.predictions;
    let mut out = String::new();

    let _ = writeln!(out, "{}", heading("IVF Outcome Prediction", use_colors));
    let _ = writeln!(out, "{}", rule());
    let _ = writeln!(
        out,
        "  Combined score: {:.3}  (embryo {:.3}, patient {:.3}, transfer {:.3})",
        result.combined_score,
        result.sub_scores.embryo,
        result.sub_scores.patient,
        result.sub_scores.transfer
    );
    if let Some(ref id) = assessment.best_embryo_id {
        let _ = writeln!(out, "  Best embryo: {}", id);
    }

    section(&mut out, "Predictions", use_colors);
    let _ = writeln!(out, "{}", prediction_line("Implantation", &predictions.implantation, use_colors));
    let _ = writeln!(
        out,
        "{}",
        prediction_line("Clinical pregnancy", &predictions.clinical_pregnancy, use_colors)
    );
    let _ = writeln!(out, "{}", prediction_line("Live birth", &predictions.live_birth, use_colors));
    let _ = writeln!(
        out,
        "{}",
        prediction_line("Multiple pregnancy", &predictions.multiple_pregnancy, use_colors)
    );

    section(&mut out, "Transfer strategy", use_colors);
    let strategy = &assessment.transfer_strategy.recommended;
    let _ = writeln!(
        out,
        "  {} x{} on day {}: {}",
        strategy.embryo_selection, strategy.number_of_embryos, strategy.transfer_day, strategy.rationale
    );
    let _ = writeln!(
        out,
        "  Endometrium: {} ({:.1} mm)",
        assessment.endometrial_receptivity.assessment.as_str(),
        assessment.endometrial_receptivity.thickness
    );

    section(&mut out, "Recommendations", use_colors);
    if result.recommendations.is_empty() {
        let _ = writeln!(out, "  none");
    }
    bullets(&mut out, &result.recommendations);

    section(&mut out, "Risk factors", use_colors);
    if result.risk_factors.is_empty() {
        let _ = writeln!(out, "  none identified");
    }
    let risks = if use_colors {
        result
            .risk_factors
            .iter()
            .map(|r| r.yellow().to_string())
            .collect::<Vec<_>>()
    } else {
        result.risk_factors.clone()
    };
    bullets(&mut out, &risks);

    section(&mut out, "Follow-up", use_colors);
    let follow_up = &assessment.clinical_interpretation.follow_up;
    let _ = writeln!(out, "  Immediate:  {}", follow_up.immediate);
    let _ = writeln!(out, "  Short term: {}", follow_up.short_term);
    let _ = writeln!(out, "  Long term:  {}", follow_up.long_term);
    let _ = writeln!(
        out,
        "  Estimated due date: {}",
        assessment.follow_up_plan.estimated_due_date.format("%Y-%m-%d")
    );

    if verbose {
        section(&mut out, "Score breakdown", use_colors);
        for (breakdown, embryo) in assessment
            .breakdown
            .embryos
            .iter()
            .zip(&assessment.embryo_assessment)
        {
            out.push_str(&format_breakdown(
                &format!("Embryo {}", embryo.embryo_id),
                breakdown,
                use_colors,
            ));
        }
        out.push_str(&format_breakdown("Patient", &assessment.breakdown.patient, use_colors));
        out.push_str(&format_breakdown("Transfer", &assessment.breakdown.transfer, use_colors));
    }

    let _ = writeln!(out, "{}", rule());
    let _ = write!(out, "{}", disclaimer(OUTCOME_DISCLAIMER, use_colors));
    out
}

/// Format a stimulation plan for the terminal.
pub fn format_stimulation_plan(plan: &StimulationPlan, verbose: bool, use_colors: bool) -> String {
    let mut out = String::new();
    let protocol = &plan.protocol;
    let gonadotropins = &plan.medications.gonadotropins;

    let _ = writeln!(out, "{}", heading(&protocol.name, use_colors));
    let _ = writeln!(out, "{}", rule());
    let _ = writeln!(
        out,
        "  Response: {}  Duration: {} days  Confidence: {}",
        plan.predictions.response_category,
        protocol.duration,
        format_percent(protocol.confidence)
    );
    let _ = writeln!(out, "  {}", protocol.rationale);

    section(&mut out, "Medications", use_colors);
    let _ = writeln!(
        out,
        "  {}: start {} IU/day, max {} IU/day",
        gonadotropins.medication, gonadotropins.starting_dose, gonadotropins.max_dose
    );
    if let Some(ref suppression) = plan.medications.suppression {
        let _ = writeln!(
            out,
            "  {}: from day {}, {}",
            suppression.medication,
            suppression.start_day,
            suppression.duration.to_lowercase()
        );
    }
    let _ = writeln!(
        out,
        "  Trigger: {}, {}",
        plan.medications.trigger.medication, plan.medications.trigger.timing
    );

    section(&mut out, "Monitoring", use_colors);
    for visit in &plan.monitoring.stimulation {
        let _ = writeln!(out, "  Day {:>2}: {}", visit.day, visit.tests.join(", "));
    }

    section(&mut out, "Expected response", use_colors);
    let yield_ = &plan.predictions.oocyte_yield;
    let _ = writeln!(
        out,
        "  Oocytes: {} (range {}-{})",
        yield_.expected, yield_.min, yield_.max
    );
    let e2 = &plan.predictions.peak_e2;
    let _ = writeln!(out, "  Peak E2: {} pg/mL (range {}-{})", e2.expected, e2.min, e2.max);

    section(&mut out, "Risks", use_colors);
    let risks = &plan.risk_assessment;
    let _ = writeln!(
        out,
        "  OHSS: {:?} ({})",
        risks.ohss.risk,
        format_percent(risks.ohss.probability)
    );
    let _ = writeln!(
        out,
        "  Poor response: {:?} ({})",
        risks.poor_response.risk,
        format_percent(risks.poor_response.probability)
    );
    let _ = writeln!(
        out,
        "  Cancellation: {}",
        format_percent(risks.cancellation.probability)
    );

    if !plan.special_considerations.is_empty() {
        section(&mut out, "Special considerations", use_colors);
        bullets(&mut out, &plan.special_considerations);
    }

    section(&mut out, "Contraindications", use_colors);
    bullets(&mut out, &plan.contraindications);

    if verbose {
        section(&mut out, "Alternatives", use_colors);
        for alt in &plan.alternatives {
            let _ = writeln!(
                out,
                "  - {} ({}): {}",
                alt.name,
                format_percent(alt.confidence),
                alt.indication
            );
        }
        section(&mut out, "Dose adjustment", use_colors);
        let criteria = &gonadotropins.adjustment_criteria;
        let _ = writeln!(out, "  Increase when:");
        bullets(&mut out, &criteria.increase);
        let _ = writeln!(out, "  Decrease when:");
        bullets(&mut out, &criteria.decrease);
    }

    let _ = writeln!(out, "{}", rule());
    let _ = write!(out, "{}", disclaimer(STIMULATION_DISCLAIMER, use_colors));
    out
}

fn disclaimer(text: &str, use_colors: bool) -> String {
    if use_colors {
        text.italic().dimmed().to_string()
    } else {
        text.to_string()
    }
}

/// Pretty-printed JSON for any report.
pub fn format_json<T: Serialize>(value: &T) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}
