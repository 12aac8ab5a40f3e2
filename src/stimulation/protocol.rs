use serde::Serialize;

use super::types::{ProtocolType, ResponseCategory};
use crate::clinical::Conditions;
use crate::stimulation::types::Preferences;

/// Pick a protocol. Conditions outrank response category, which outranks
/// patient preference; the antagonist protocol is the default.
pub fn select_protocol(
    response: ResponseCategory,
    conditions: &Conditions,
    preferences: &Preferences,
) -> ProtocolType {
    if conditions.endometriosis {
        return ProtocolType::LongAgonist;
    }
    if conditions.pcos && response == ResponseCategory::High {
        return ProtocolType::Antagonist;
    }
    match response {
        ResponseCategory::Poor => return ProtocolType::MinimalStimulation,
        ResponseCategory::Hyper => return ProtocolType::Antagonist,
        ResponseCategory::Normal | ResponseCategory::High => {}
    }
    if preferences.minimal_medication {
        return ProtocolType::MinimalStimulation;
    }
    // Antagonist is also the shortest option, so a preference for shorter
    // treatment lands here as well.
    ProtocolType::Antagonist
}

/// Expected stimulation length in days.
pub fn stimulation_days(response: ResponseCategory) -> u32 {
    match response {
        ResponseCategory::Poor => 12,
        ResponseCategory::Normal => 10,
        ResponseCategory::High => 9,
        ResponseCategory::Hyper => 8, // Shorter to limit OHSS exposure
    }
}

pub fn protocol_rationale(protocol: ProtocolType, response: ResponseCategory) -> String {
    match protocol {
        ProtocolType::Antagonist => format!(
            "Selected for {} responder profile. Offers flexible monitoring, reduced OHSS risk, and shorter treatment duration. Suitable for most patients with good cycle control.",
            response
        ),
        ProtocolType::LongAgonist => "Recommended due to endometriosis diagnosis. Provides superior pituitary suppression and cycle synchronization, improving oocyte quality in endometriosis patients.".to_string(),
        ProtocolType::MinimalStimulation => format!(
            "Appropriate for {} ovarian reserve. Minimizes medication burden while optimizing oocyte quality. Cost-effective approach with reduced side effects.",
            response
        ),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlternativeProtocol {
    pub name: String,
    pub indication: String,
    pub confidence: f64,
}

pub fn alternative_protocols(
    primary: ProtocolType,
    response: ResponseCategory,
) -> Vec<AlternativeProtocol> {
    let mut alternatives = Vec::new();

    if primary != ProtocolType::Antagonist {
        alternatives.push(AlternativeProtocol {
            name: "GnRH Antagonist Protocol".to_string(),
            indication: "Shorter treatment duration and flexible monitoring".to_string(),
            confidence: 0.85,
        });
    }
    if primary != ProtocolType::MinimalStimulation && response == ResponseCategory::Poor {
        alternatives.push(AlternativeProtocol {
            name: "Minimal Stimulation Protocol".to_string(),
            indication: "Reduced medication burden for poor responders".to_string(),
            confidence: 0.75,
        });
    }
    if primary != ProtocolType::LongAgonist {
        alternatives.push(AlternativeProtocol {
            name: "Long GnRH Agonist Protocol".to_string(),
            indication: "Better cycle control and synchronization".to_string(),
            confidence: 0.70,
        });
    }

    alternatives
}

pub fn protocol_contraindications(protocol: ProtocolType) -> &'static [&'static str] {
    match protocol {
        ProtocolType::Antagonist => &["Severe endometriosis requiring prolonged suppression"],
        ProtocolType::LongAgonist => &[
            "History of severe depression with GnRH agonists",
            "Osteoporosis",
        ],
        ProtocolType::MinimalStimulation => &["Time constraints requiring multiple cycles"],
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitoringVisit {
    pub day: u32,
    pub tests: Vec<String>,
    pub adjustment_criteria: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BaselineVisit {
    pub day: u32,
    pub requirements: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TriggerCriteria {
    pub criteria: Vec<String>,
    pub contraindications: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonitoringSchedule {
    pub baseline: BaselineVisit,
    pub stimulation: Vec<MonitoringVisit>,
    pub trigger: TriggerCriteria,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn visit(day: u32, tests: &[&str], criteria: &[&str]) -> MonitoringVisit {
    MonitoringVisit {
        day,
        tests: strings(tests),
        adjustment_criteria: strings(criteria),
    }
}

pub fn monitoring_schedule(response: ResponseCategory) -> MonitoringSchedule {
    let mut stimulation = vec![
        visit(
            1,
            &["Baseline ultrasound", "E2", "LH", "Progesterone"],
            &["Confirm cycle start", "Rule out cysts"],
        ),
        visit(
            6,
            &["Ultrasound", "E2", "LH"],
            &["Assess initial response", "Consider dose adjustment"],
        ),
        visit(
            8,
            &["Ultrasound", "E2", "LH"],
            &["Monitor follicle growth", "Adjust medications"],
        ),
        visit(
            10,
            &["Ultrasound", "E2", "LH", "Progesterone"],
            &["Assess trigger readiness", "Plan retrieval"],
        ),
    ];

    // Poor responders stimulate longer
    if response == ResponseCategory::Poor {
        stimulation.push(visit(
            12,
            &["Ultrasound", "E2", "LH"],
            &["Extended monitoring", "Consider cycle continuation"],
        ));
    }

    MonitoringSchedule {
        baseline: BaselineVisit {
            day: 1,
            requirements: strings(&[
                "Confirm menstruation",
                "Baseline ultrasound",
                "Hormone levels",
                "Medication counseling",
            ]),
        },
        stimulation,
        trigger: TriggerCriteria {
            criteria: strings(&[
                "≥3 follicles ≥17mm",
                "E2 100-300 pg/ml per mature follicle",
                "Endometrial thickness ≥7mm",
            ]),
            contraindications: strings(&[
                "E2 >4000 pg/ml",
                "Signs of OHSS",
                "Premature LH surge",
                "Inadequate response",
            ]),
        },
    }
}
