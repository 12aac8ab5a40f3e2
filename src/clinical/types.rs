use serde::Serialize;
use std::fmt;

use super::request::ConditionsRecord;

/// PGT-A ploidy classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Ploidy {
    Euploid,
    Mosaic,
    Aneuploid,
    Unknown,
}

impl Ploidy {
    /// Map a wire code to a ploidy. Unrecognized codes are `Unknown`.
    pub fn from_code(code: &str) -> Self {
        match code.trim().to_ascii_lowercase().as_str() {
            "euploid" => Ploidy::Euploid,
            "mosaic" => Ploidy::Mosaic,
            "aneuploid" => Ploidy::Aneuploid,
            _ => Ploidy::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Ploidy::Euploid => "euploid",
            Ploidy::Mosaic => "mosaic",
            Ploidy::Aneuploid => "aneuploid",
            Ploidy::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Genetics {
    pub ploidy: Ploidy,
    pub abnormalities: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Timelapse {
    pub cleavage_timings: Vec<f64>,
    pub morphokinetic_score: Option<f64>,
    pub deselection_markers: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Embryo {
    pub id: String,
    pub grade: Option<String>,
    pub genetics: Option<Genetics>,
    pub timelapse: Option<Timelapse>,
    pub optimal_culture: bool,
    pub day: Option<u32>,
}

/// Primary fertility diagnosis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnosis {
    MaleFactor,
    Unexplained,
    Endometriosis,
    DiminishedOvarianReserve,
    Pcos,
    TubalFactor,
    Other(String),
}

impl Diagnosis {
    pub fn from_code(code: &str) -> Self {
        match code.trim() {
            "male_factor" => Diagnosis::MaleFactor,
            "unexplained" => Diagnosis::Unexplained,
            "endometriosis" => Diagnosis::Endometriosis,
            "diminished_ovarian_reserve" => Diagnosis::DiminishedOvarianReserve,
            "PCOS" | "pcos" => Diagnosis::Pcos,
            "tubal_factor" => Diagnosis::TubalFactor,
            other => Diagnosis::Other(other.to_string()),
        }
    }
}

impl fmt::Display for Diagnosis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnosis::MaleFactor => write!(f, "male_factor"),
            Diagnosis::Unexplained => write!(f, "unexplained"),
            Diagnosis::Endometriosis => write!(f, "endometriosis"),
            Diagnosis::DiminishedOvarianReserve => write!(f, "diminished_ovarian_reserve"),
            Diagnosis::Pcos => write!(f, "PCOS"),
            Diagnosis::TubalFactor => write!(f, "tubal_factor"),
            Diagnosis::Other(code) => write!(f, "{}", code),
        }
    }
}

/// Comorbidities relevant to risk assessment and protocol choice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Conditions {
    pub endometriosis: bool,
    pub pcos: bool,
    pub diabetes: bool,
    pub thyroid: bool,
}

impl From<&ConditionsRecord> for Conditions {
    fn from(record: &ConditionsRecord) -> Self {
        Self {
            endometriosis: record.endometriosis.unwrap_or(false),
            pcos: record.pcos.unwrap_or(false),
            diabetes: record.diabetes.unwrap_or(false),
            thyroid: record.thyroid.unwrap_or(false),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PatientFactors {
    pub age: f64,
    pub diagnosis: Option<Diagnosis>,
    pub bmi: Option<f64>,
    pub previous_pregnancies: u32,
    pub conditions: Conditions,
}

/// Day of embryo development at transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(into = "u32")]
pub enum TransferDay {
    Day3,
    Day5,
    Day6,
}

impl TransferDay {
    pub fn from_day(day: i64) -> Option<Self> {
        match day {
            3 => Some(TransferDay::Day3),
            5 => Some(TransferDay::Day5),
            6 => Some(TransferDay::Day6),
            _ => None,
        }
    }

    pub fn day(&self) -> u32 {
        match self {
            TransferDay::Day3 => 3,
            TransferDay::Day5 => 5,
            TransferDay::Day6 => 6,
        }
    }
}

impl From<TransferDay> for u32 {
    fn from(day: TransferDay) -> Self {
        day.day()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TransferDetails {
    /// Millimetres, always positive
    pub endometrial_thickness: f64,
    pub transfer_day: TransferDay,
    /// At least one when present
    pub number_of_embryos: Option<u32>,
    pub endometrial_pattern: Option<String>,
    pub blood_flow: Option<String>,
}

/// A fully validated outcome prediction input.
#[derive(Debug, Clone, PartialEq)]
pub struct OutcomeInput {
    /// Never empty
    pub embryos: Vec<Embryo>,
    pub patient: PatientFactors,
    pub transfer: TransferDetails,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ploidy_from_code() {
        assert_eq!(Ploidy::from_code("euploid"), Ploidy::Euploid);
        assert_eq!(Ploidy::from_code("Mosaic"), Ploidy::Mosaic);
        assert_eq!(Ploidy::from_code("aneuploid"), Ploidy::Aneuploid);
        assert_eq!(Ploidy::from_code("triploid"), Ploidy::Unknown);
    }

    #[test]
    fn test_diagnosis_round_trips_known_codes() {
        for code in [
            "male_factor",
            "unexplained",
            "endometriosis",
            "diminished_ovarian_reserve",
            "PCOS",
            "tubal_factor",
        ] {
            assert_eq!(Diagnosis::from_code(code).to_string(), code);
        }
    }

    #[test]
    fn test_diagnosis_keeps_unknown_code() {
        assert_eq!(
            Diagnosis::from_code("uterine_factor"),
            Diagnosis::Other("uterine_factor".to_string())
        );
    }

    #[test]
    fn test_transfer_day_only_accepts_3_5_6() {
        assert_eq!(TransferDay::from_day(3), Some(TransferDay::Day3));
        assert_eq!(TransferDay::from_day(5), Some(TransferDay::Day5));
        assert_eq!(TransferDay::from_day(6), Some(TransferDay::Day6));
        assert_eq!(TransferDay::from_day(4), None);
        assert_eq!(TransferDay::from_day(0), None);
    }

    #[test]
    fn test_transfer_day_serializes_as_number() {
        assert_eq!(serde_json::to_string(&TransferDay::Day5).unwrap(), "5");
    }
}
