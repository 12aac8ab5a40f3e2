use serde::Serialize;

use super::types::{recorded, OvarianReserve, ProtocolType};

const BASE_DOSE_IU: u32 = 150;
const DOSE_CEILING_IU: u32 = 450;
const DOSE_HEADROOM_IU: u32 = 150;

pub(crate) const DEFAULT_AGE: f64 = 35.0;
pub(crate) const DEFAULT_BMI: f64 = 25.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdjustmentCriteria {
    pub increase: Vec<String>,
    pub decrease: Vec<String>,
    pub maintain: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Gonadotropins {
    pub medication: String,
    /// IU per day
    pub starting_dose: u32,
    pub max_dose: u32,
    pub adjustment_criteria: AdjustmentCriteria,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Suppression {
    pub medication: String,
    /// Relative to stimulation day 1; negative means before it
    pub start_day: i32,
    pub duration: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trigger {
    pub medication: String,
    pub criteria: Vec<String>,
    pub timing: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MedicationPlan {
    pub gonadotropins: Gonadotropins,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suppression: Option<Suppression>,
    pub trigger: Trigger,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Daily starting dose and its ceiling, in IU.
pub fn gonadotropin_doses(age: f64, bmi: f64, reserve: OvarianReserve) -> (u32, u32) {
    let mut dose = BASE_DOSE_IU;
    if age > 35.0 {
        dose += 50;
    }
    if age > 40.0 {
        dose += 25;
    }
    if matches!(reserve, OvarianReserve::Low | OvarianReserve::VeryLow) {
        dose += 75;
    }
    if bmi > 30.0 {
        dose += 25;
    }
    (dose, DOSE_CEILING_IU.min(dose + DOSE_HEADROOM_IU))
}

fn suppression_for(protocol: ProtocolType) -> Option<Suppression> {
    match protocol {
        ProtocolType::LongAgonist => Some(Suppression {
            medication: "Leuprolide (Lupron)".to_string(),
            start_day: -14,
            duration: "Until trigger day".to_string(),
        }),
        ProtocolType::Antagonist => Some(Suppression {
            medication: "Cetrorelix (Cetrotide)".to_string(),
            start_day: 6,
            duration: "Until trigger day".to_string(),
        }),
        ProtocolType::MinimalStimulation => None,
    }
}

pub fn medication_plan(
    protocol: ProtocolType,
    reserve: OvarianReserve,
    age: Option<f64>,
    bmi: Option<f64>,
) -> MedicationPlan {
    let (starting_dose, max_dose) = gonadotropin_doses(
        recorded(age).unwrap_or(DEFAULT_AGE),
        recorded(bmi).unwrap_or(DEFAULT_BMI),
        reserve,
    );

    // Only "low" gets LH activity; very low reserve stays on rFSH.
    let gonadotropin = if reserve == OvarianReserve::Low {
        "hMG (Menopur)"
    } else {
        "rFSH (Gonal-F)"
    };
    let trigger = if reserve == OvarianReserve::High {
        "GnRH agonist (Lupron)"
    } else {
        "hCG (Pregnyl)"
    };

    MedicationPlan {
        gonadotropins: Gonadotropins {
            medication: gonadotropin.to_string(),
            starting_dose,
            max_dose,
            adjustment_criteria: AdjustmentCriteria {
                increase: strings(&[
                    "Fewer than 3 follicles >10mm on day 6-8",
                    "E2 rise <50% from previous visit",
                    "Slow follicular growth (<1mm/day)",
                ]),
                decrease: strings(&[
                    "More than 20 follicles >10mm",
                    "E2 >3000 pg/ml",
                    "Signs of OHSS risk",
                ]),
                maintain: strings(&[
                    "Appropriate follicular response (6-15 follicles)",
                    "E2 doubling every 2-3 days",
                    "No signs of over-response",
                ]),
            },
        },
        suppression: suppression_for(protocol),
        trigger: Trigger {
            medication: trigger.to_string(),
            criteria: strings(&[
                "At least 3 follicles ≥17mm",
                "E2 level appropriate for follicle number",
                "No signs of premature luteinization",
            ]),
            timing: "36 hours before retrieval".to_string(),
        },
    }
}
