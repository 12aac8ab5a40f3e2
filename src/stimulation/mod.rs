pub mod medication;
pub mod planner;
pub mod protocol;
pub mod reserve;
pub mod risk;
pub mod types;
pub mod validation;

pub use planner::{plan_stimulation, StimulationPlan};
pub use reserve::{assess_ovarian_reserve, predict_response_category};
pub use types::{OvarianReserve, ProtocolType, ResponseCategory, StimulationInput};
pub use validation::validate_stimulation_request;
