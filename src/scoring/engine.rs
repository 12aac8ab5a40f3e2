use chrono::NaiveDate;
use serde::Serialize;

use super::advice::{
    assess_risk_factors, follow_up_plan, generate_recommendations, generate_transfer_strategy,
    interpret, ClinicalInterpretation, FollowUpPlan, Recommendations, RiskFactors,
    TransferStrategy,
};
use super::embryo::{
    assess_individual_embryo, embryo_breakdown, score_embryo_quality, EmbryoAssessment,
};
use super::factors::{Bracket, RangeOp, ScoreBreakdown};
use super::patient::patient_breakdown;
use super::transfer::{assess_endometrial_receptivity, transfer_breakdown, EndometrialReceptivity};
use crate::clinical::{OutcomeInput, PatientFactors, TransferDetails};

const EMBRYO_WEIGHT: f64 = 0.5;
const PATIENT_WEIGHT: f64 = 0.3;
const TRANSFER_WEIGHT: f64 = 0.2;

/// Weighted combination of the three sub-scores. Weights sum to 1.
pub fn combine(embryo_score: f64, patient_score: f64, transfer_score: f64) -> f64 {
    embryo_score * EMBRYO_WEIGHT + patient_score * PATIENT_WEIGHT + transfer_score * TRANSFER_WEIGHT
}

/// Population baseline and ceiling for one outcome.
struct OutcomeRate {
    base: f64,
    cap: f64,
    confidence: f64,
}

const IMPLANTATION: OutcomeRate = OutcomeRate { base: 0.4, cap: 0.8, confidence: 0.85 };
const CLINICAL_PREGNANCY: OutcomeRate = OutcomeRate { base: 0.35, cap: 0.75, confidence: 0.82 };
const LIVE_BIRTH: OutcomeRate = OutcomeRate { base: 0.28, cap: 0.65, confidence: 0.80 };

const MULTIPLE_PREGNANCY_BASE: f64 = 0.15;
const MULTIPLE_PREGNANCY_CONFIDENCE: f64 = 0.9;

impl OutcomeRate {
    fn predict(&self, multiplier: f64) -> Prediction {
        Prediction {
            probability: (self.base * multiplier).min(self.cap),
            confidence: self.confidence,
        }
    }
}

const AGE_IMPACT: &[Bracket] = &[
    Bracket::new(RangeOp::LessThan(30.0), 0.3),
    Bracket::new(RangeOp::LessThan(35.0), 0.2),
    Bracket::new(RangeOp::LessThan(38.0), 0.1),
    Bracket::new(RangeOp::LessThan(40.0), 0.0),
    Bracket::new(RangeOp::LessThan(42.0), -0.1),
    Bracket::new(RangeOp::Any, -0.2),
];

fn age_impact(age: f64) -> f64 {
    super::factors::match_bracket(age, AGE_IMPACT)
        .map(|b| b.adjustment)
        .unwrap_or(0.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Prediction {
    pub probability: f64,
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImpactFactor {
    pub factor: String,
    pub impact: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Complications {
    pub miscarriage: f64,
    pub ectopic_pregnancy: f64,
    pub preterm: f64,
    pub birth_defects: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Predictions {
    pub implantation: Prediction,
    pub clinical_pregnancy: Prediction,
    pub live_birth: Prediction,
    pub multiple_pregnancy: Prediction,
    pub implantation_factors: Vec<ImpactFactor>,
    /// Week at which a clinical pregnancy is confirmed by ultrasound
    pub clinical_pregnancy_week: u32,
    pub multiple_pregnancy_risks: Vec<String>,
    pub complications: Complications,
}

/// Multiple pregnancy risk follows transfer policy only.
fn multiple_pregnancy_probability(number_of_embryos: Option<u32>) -> f64 {
    match number_of_embryos {
        Some(1) => 0.02, // Monozygotic twinning only
        Some(2) => 0.25,
        _ => MULTIPLE_PREGNANCY_BASE,
    }
}

pub fn predict(
    combined_score: f64,
    patient: &PatientFactors,
    transfer: &TransferDetails,
) -> Predictions {
    let multiplier = 0.5 + combined_score;
    let multiple = multiple_pregnancy_probability(transfer.number_of_embryos);

    Predictions {
        implantation: IMPLANTATION.predict(multiplier),
        clinical_pregnancy: CLINICAL_PREGNANCY.predict(multiplier),
        live_birth: LIVE_BIRTH.predict(multiplier),
        multiple_pregnancy: Prediction {
            probability: multiple,
            confidence: MULTIPLE_PREGNANCY_CONFIDENCE,
        },
        implantation_factors: vec![
            ImpactFactor {
                factor: "Embryo quality".to_string(),
                impact: combined_score * 0.5,
            },
            ImpactFactor {
                factor: "Patient age".to_string(),
                impact: age_impact(patient.age),
            },
            ImpactFactor {
                factor: "Endometrial receptivity".to_string(),
                impact: 0.2,
            },
        ],
        clinical_pregnancy_week: 6,
        multiple_pregnancy_risks: vec![
            "Preterm delivery risk".to_string(),
            "Low birth weight".to_string(),
            "Maternal complications".to_string(),
            "NICU admission risk".to_string(),
        ],
        complications: Complications {
            miscarriage: (0.25 - combined_score * 0.15).max(0.1),
            ectopic_pregnancy: 0.02,
            preterm: if multiple > 0.1 { 0.15 } else { 0.08 },
            birth_defects: 0.03,
        },
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SubScores {
    pub embryo: f64,
    pub patient: f64,
    pub transfer: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreResult {
    pub combined_score: f64,
    pub sub_scores: SubScores,
    pub predictions: Predictions,
    pub recommendations: Vec<String>,
    pub risk_factors: Vec<String>,
}

pub fn calculate_score(input: &OutcomeInput) -> ScoreResult {
    let embryo = score_embryo_quality(&input.embryos).score;
    let patient = patient_breakdown(&input.patient).score;
    let transfer = transfer_breakdown(&input.transfer).score;
    let combined_score = combine(embryo, patient, transfer);

    tracing::debug!(embryo, patient, transfer, combined_score, "sub-scores computed");

    ScoreResult {
        combined_score,
        sub_scores: SubScores {
            embryo,
            patient,
            transfer,
        },
        predictions: predict(combined_score, &input.patient, &input.transfer),
        recommendations: generate_recommendations(combined_score, &input.patient).all(),
        risk_factors: assess_risk_factors(&input.patient, &input.transfer).all(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Breakdowns {
    pub embryos: Vec<ScoreBreakdown>,
    pub patient: ScoreBreakdown,
    pub transfer: ScoreBreakdown,
}

/// Everything derived from one outcome prediction request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutcomeAssessment {
    pub result: ScoreResult,
    pub breakdown: Breakdowns,
    pub embryo_assessment: Vec<EmbryoAssessment>,
    pub best_embryo_id: Option<String>,
    pub transfer_strategy: TransferStrategy,
    pub endometrial_receptivity: EndometrialReceptivity,
    pub recommendations: Recommendations,
    pub risk_factors: RiskFactors,
    pub clinical_interpretation: ClinicalInterpretation,
    pub follow_up_plan: FollowUpPlan,
}

pub fn assess_outcome(input: &OutcomeInput, as_of: NaiveDate) -> OutcomeAssessment {
    let result = calculate_score(input);

    let cohort = score_embryo_quality(&input.embryos);
    let best = cohort.best.and_then(|i| input.embryos.get(i));

    let embryo_assessment: Vec<EmbryoAssessment> =
        input.embryos.iter().map(assess_individual_embryo).collect();
    let endometrial_receptivity = assess_endometrial_receptivity(&input.transfer);
    let clinical_interpretation = interpret(
        &result.predictions,
        &embryo_assessment,
        &endometrial_receptivity,
        &input.patient,
    );

    tracing::info!(
        embryos = input.embryos.len(),
        combined_score = result.combined_score,
        live_birth = result.predictions.live_birth.probability,
        "outcome assessed"
    );

    OutcomeAssessment {
        breakdown: Breakdowns {
            embryos: input.embryos.iter().map(embryo_breakdown).collect(),
            patient: patient_breakdown(&input.patient),
            transfer: transfer_breakdown(&input.transfer),
        },
        best_embryo_id: best.map(|e| e.id.clone()),
        transfer_strategy: generate_transfer_strategy(&input.embryos, best, &input.patient),
        recommendations: generate_recommendations(result.combined_score, &input.patient),
        risk_factors: assess_risk_factors(&input.patient, &input.transfer),
        follow_up_plan: follow_up_plan(as_of),
        embryo_assessment,
        endometrial_receptivity,
        clinical_interpretation,
        result,
    }
}
