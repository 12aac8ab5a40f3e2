use super::factors::{Bracket, RangeOp, ScoreBreakdown};
use crate::clinical::{Diagnosis, PatientFactors};

const BASE_SCORE: f64 = 0.5;
const PREVIOUS_PREGNANCY_BONUS: f64 = 0.1;

// Age is the strongest single predictor; adjustments shrink with each bracket.
const AGE_BRACKETS: &[Bracket] = &[
    Bracket::new(RangeOp::LessThan(30.0), 0.3),
    Bracket::new(RangeOp::LessThan(35.0), 0.2),
    Bracket::new(RangeOp::LessThan(38.0), 0.1),
    Bracket::new(RangeOp::LessThan(40.0), 0.05),
    Bracket::new(RangeOp::LessThan(42.0), -0.1),
    Bracket::new(RangeOp::Any, -0.2),
];

const BMI_BRACKETS: &[Bracket] = &[
    Bracket::new(RangeOp::Between(18.5, 25.0), 0.05),
    Bracket::new(RangeOp::GreaterThan(30.0), -0.1),
];

fn diagnosis_adjustment(diagnosis: &Diagnosis) -> f64 {
    match diagnosis {
        Diagnosis::MaleFactor => 0.1,
        Diagnosis::Unexplained => 0.05,
        Diagnosis::Endometriosis => -0.05,
        Diagnosis::DiminishedOvarianReserve => -0.1,
        Diagnosis::Pcos | Diagnosis::TubalFactor | Diagnosis::Other(_) => 0.0,
    }
}

/// Score patient prognosis in [0, 1].
pub fn score_patient_factors(patient: &PatientFactors) -> f64 {
    patient_breakdown(patient).score
}

pub fn patient_breakdown(patient: &PatientFactors) -> ScoreBreakdown {
    let mut breakdown = ScoreBreakdown::new(BASE_SCORE);

    breakdown.apply_bracket("Age", patient.age, AGE_BRACKETS);

    if let Some(ref diagnosis) = patient.diagnosis {
        let adjustment = diagnosis_adjustment(diagnosis);
        if adjustment != 0.0 {
            breakdown.apply(
                "Diagnosis",
                format!("{} -> {:+}", diagnosis, adjustment),
                adjustment,
            );
        }
    }

    if let Some(bmi) = patient.bmi {
        breakdown.apply_bracket("BMI", bmi, BMI_BRACKETS);
    }

    if patient.previous_pregnancies > 0 {
        breakdown.apply(
            "Previous pregnancies",
            format!(
                "{} previous -> {:+}",
                patient.previous_pregnancies, PREVIOUS_PREGNANCY_BONUS
            ),
            PREVIOUS_PREGNANCY_BONUS,
        );
    }

    breakdown.clamped()
}
