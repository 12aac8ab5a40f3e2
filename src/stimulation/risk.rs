use serde::Serialize;

use super::medication::DEFAULT_AGE;
use super::types::{recorded, ResponseCategory, RiskLevel, StimulationInput};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Range<T> {
    pub min: T,
    pub max: T,
    pub expected: T,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FollicleResponse {
    pub small: u32,
    pub medium: u32,
    pub large: u32,
}

/// Expected course of stimulation for a response category.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponsePrediction {
    /// Days
    pub stimulation_duration: Range<u32>,
    /// IU
    pub total_gonadotropin_dose: Range<u32>,
    /// pg/mL
    pub peak_e2: Range<u32>,
    pub follicle_response: FollicleResponse,
    pub oocyte_yield: Range<u32>,
    pub response_category: ResponseCategory,
}

struct Baseline {
    duration: u32,
    dose: u32,
    e2: u32,
    follicles: FollicleResponse,
    oocytes: u32,
}

const fn baseline(
    duration: u32,
    dose: u32,
    e2: u32,
    (small, medium, large): (u32, u32, u32),
    oocytes: u32,
) -> Baseline {
    Baseline {
        duration,
        dose,
        e2,
        follicles: FollicleResponse {
            small,
            medium,
            large,
        },
        oocytes,
    }
}

const POOR: Baseline = baseline(12, 3500, 800, (2, 3, 2), 4);
const NORMAL: Baseline = baseline(10, 2500, 1800, (4, 6, 5), 12);
const HIGH: Baseline = baseline(9, 2000, 2800, (6, 8, 8), 18);
const HYPER: Baseline = baseline(8, 1800, 3500, (8, 12, 12), 25);

pub fn predict_response(response: ResponseCategory) -> ResponsePrediction {
    let b = match response {
        ResponseCategory::Poor => &POOR,
        ResponseCategory::Normal => &NORMAL,
        ResponseCategory::High => &HIGH,
        ResponseCategory::Hyper => &HYPER,
    };

    ResponsePrediction {
        stimulation_duration: Range {
            min: b.duration - 2,
            max: b.duration + 3,
            expected: b.duration,
        },
        total_gonadotropin_dose: Range {
            min: b.dose - 500,
            max: b.dose + 1000,
            expected: b.dose,
        },
        peak_e2: Range {
            min: b.e2 - 400,
            max: b.e2 + 600,
            expected: b.e2,
        },
        follicle_response: b.follicles,
        oocyte_yield: Range {
            min: b.oocytes.saturating_sub(4).max(1),
            max: b.oocytes + 6,
            expected: b.oocytes,
        },
        response_category: response,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OhssRisk {
    pub risk: RiskLevel,
    pub probability: f64,
    pub prevention_measures: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PoorResponseRisk {
    pub risk: RiskLevel,
    pub probability: f64,
    pub contingency_plan: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CancellationRisk {
    pub probability: f64,
    pub criteria: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskAssessment {
    #[serde(rename = "OHSS")]
    pub ohss: OhssRisk,
    pub poor_response: PoorResponseRisk,
    pub cancellation: CancellationRisk,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

pub fn assess_risks(response: ResponseCategory, age: Option<f64>) -> RiskAssessment {
    let age = recorded(age).unwrap_or(DEFAULT_AGE);

    let (ohss_risk, ohss_probability) = match response {
        ResponseCategory::High | ResponseCategory::Hyper => (RiskLevel::High, 0.15),
        ResponseCategory::Normal if age < 35.0 => (RiskLevel::Moderate, 0.08),
        _ => (RiskLevel::Low, 0.05),
    };

    let (poor_risk, poor_probability) = if response == ResponseCategory::Poor {
        (RiskLevel::High, 0.4)
    } else {
        (RiskLevel::Low, 0.1)
    };

    let cancellation_probability = match response {
        ResponseCategory::Poor => 0.25,
        ResponseCategory::Hyper => 0.10,
        _ => 0.05,
    };

    RiskAssessment {
        ohss: OhssRisk {
            risk: ohss_risk,
            probability: ohss_probability,
            prevention_measures: strings(&[
                "Use GnRH agonist trigger if high risk",
                "Consider cycle segmentation",
                "Monitor E2 levels closely",
                "Reduce gonadotropin dose if excessive response",
            ]),
        },
        poor_response: PoorResponseRisk {
            risk: poor_risk,
            probability: poor_probability,
            contingency_plan: strings(&[
                "Increase gonadotropin dose",
                "Add LH activity (hMG)",
                "Consider cycle conversion to IUI",
                "Counsel regarding prognosis",
            ]),
        },
        cancellation: CancellationRisk {
            probability: cancellation_probability,
            criteria: strings(&[
                "Fewer than 3 follicles >14mm",
                "E2 >4000 pg/ml with OHSS risk",
                "Premature LH surge",
                "Patient request",
            ]),
        },
    }
}

/// Notes for the treating clinician that do not change the protocol itself.
pub fn special_considerations(input: &StimulationInput) -> Vec<String> {
    let mut notes = Vec::new();

    if input.age.is_some_and(|age| age > 40.0) {
        notes.push(
            "Advanced maternal age - consider genetic counseling and PGT-A testing".to_string(),
        );
    }
    if input.bmi.is_some_and(|bmi| bmi > 30.0) {
        notes.push(
            "Obesity may affect medication absorption - monitor response closely".to_string(),
        );
    }
    if input.conditions.diabetes {
        notes.push(
            "Diabetes management during stimulation - coordinate with endocrinologist".to_string(),
        );
    }
    if input.conditions.thyroid {
        notes.push("Monitor thyroid function during treatment".to_string());
    }

    notes
}
