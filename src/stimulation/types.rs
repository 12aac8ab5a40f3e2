use serde::Serialize;
use std::fmt;

use crate::clinical::Conditions;

/// Ovarian reserve markers. Absent or zero markers fall back to population defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OvarianReserveMarkers {
    /// Anti-Müllerian hormone, ng/mL
    pub amh: Option<f64>,
    /// Antral follicle count
    pub afc: Option<f64>,
}

/// A recorded value of zero counts as not measured.
pub(crate) fn recorded(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v > 0.0)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Preferences {
    pub minimal_medication: bool,
}

/// A fully validated stimulation protocol input.
#[derive(Debug, Clone, PartialEq)]
pub struct StimulationInput {
    pub markers: OvarianReserveMarkers,
    /// Antral follicle count seen this cycle, used when the markers lack one
    pub cycle_afc: Option<f64>,
    /// Baseline day 2-3 FSH, IU/L
    pub fsh: Option<f64>,
    /// Oocytes retrieved in each earlier stimulation
    pub previous_oocytes: Vec<f64>,
    pub conditions: Conditions,
    pub age: Option<f64>,
    pub bmi: Option<f64>,
    pub contraindications: Vec<String>,
    pub preferences: Preferences,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OvarianReserve {
    High,
    Normal,
    Low,
    VeryLow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseCategory {
    Poor,
    Normal,
    High,
    Hyper,
}

impl fmt::Display for ResponseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ResponseCategory::Poor => "poor",
            ResponseCategory::Normal => "normal",
            ResponseCategory::High => "high",
            ResponseCategory::Hyper => "hyper",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProtocolType {
    Antagonist,
    LongAgonist,
    MinimalStimulation,
}

impl ProtocolType {
    pub fn display_name(&self) -> &'static str {
        match self {
            ProtocolType::Antagonist => "Antagonist Stimulation Protocol",
            ProtocolType::LongAgonist => "Long Agonist Stimulation Protocol",
            ProtocolType::MinimalStimulation => "Minimal Stimulation Protocol",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
}
