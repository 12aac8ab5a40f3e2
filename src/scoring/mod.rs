pub mod advice;
pub mod embryo;
pub mod engine;
pub mod factors;
pub mod patient;
pub mod transfer;
pub mod validation;

pub use advice::{assess_risk_factors, generate_recommendations, Recommendations, RiskFactors};
pub use embryo::{score_embryo_quality, EmbryoCohortScore};
pub use engine::{
    assess_outcome, calculate_score, combine, predict, OutcomeAssessment, Prediction, Predictions,
    ScoreResult, SubScores,
};
pub use factors::{FactorContribution, RangeOp, ScoreBreakdown};
pub use patient::score_patient_factors;
pub use transfer::score_transfer_conditions;
pub use validation::validate_outcome_request;
