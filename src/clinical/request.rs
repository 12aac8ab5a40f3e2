//! Request records as they arrive on the wire.
//!
//! Every field is optional and numbers are kept wide so that malformed values
//! reach validation instead of failing inside the JSON parser. Nothing here is
//! scored directly; see `scoring::validation` and `stimulation::validation`.

use serde::{Deserialize, Serialize};

/// Outcome prediction request body.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OutcomeRequest {
    #[serde(default)]
    pub embryology_parameters: Option<Vec<EmbryoRecord>>,
    #[serde(default)]
    pub patient_factors: Option<PatientFactorsRecord>,
    #[serde(default)]
    pub transfer_details: Option<TransferDetailsRecord>,
    #[serde(default)]
    pub options: Option<RequestOptions>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EmbryoRecord {
    #[serde(default)]
    pub id: Option<String>,
    /// Gardner grade code, e.g. "AA" or "4AB"
    #[serde(default)]
    pub grade: Option<String>,
    #[serde(default)]
    pub genetics: Option<GeneticsRecord>,
    #[serde(default)]
    pub timelapse_parameters: Option<TimelapseRecord>,
    #[serde(default)]
    pub culture_conditions: Option<CultureConditionsRecord>,
    /// Day of development (3, 5, 6 ...)
    #[serde(default)]
    pub day: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GeneticsRecord {
    #[serde(default)]
    pub ploidy: Option<String>,
    #[serde(default)]
    pub abnormalities: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TimelapseRecord {
    /// Hours post insemination for each observed cleavage event
    #[serde(default)]
    pub cleavage_timings: Option<Vec<f64>>,
    #[serde(default)]
    pub morphokinetic_score: Option<f64>,
    #[serde(default)]
    pub deselection_markers: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct CultureConditionsRecord {
    #[serde(default)]
    pub optimal: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PatientFactorsRecord {
    #[serde(default)]
    pub age: Option<f64>,
    #[serde(default)]
    pub diagnosis: Option<String>,
    #[serde(default, rename = "BMI")]
    pub bmi: Option<f64>,
    #[serde(default)]
    pub previous_pregnancies: Option<f64>,
    /// Older clients send the diabetes flag here instead of under `conditions`
    #[serde(default)]
    pub diabetes: Option<bool>,
    #[serde(default)]
    pub conditions: Option<ConditionsRecord>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct ConditionsRecord {
    #[serde(default)]
    pub endometriosis: Option<bool>,
    #[serde(default, rename = "PCOS")]
    pub pcos: Option<bool>,
    #[serde(default)]
    pub diabetes: Option<bool>,
    #[serde(default)]
    pub thyroid: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TransferDetailsRecord {
    /// Millimetres
    #[serde(default)]
    pub endometrial_thickness: Option<f64>,
    #[serde(default)]
    pub transfer_day: Option<f64>,
    #[serde(default)]
    pub number_of_embryos: Option<f64>,
    #[serde(default)]
    pub endometrial_pattern: Option<String>,
    #[serde(default)]
    pub blood_flow: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RequestOptions {
    #[serde(default)]
    pub consent_given: Option<bool>,
}

impl RequestOptions {
    pub fn has_consent(options: Option<&Self>) -> bool {
        options.and_then(|o| o.consent_given).unwrap_or(false)
    }
}

/// Stimulation protocol request body.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StimulationRequest {
    #[serde(default)]
    pub patient_records: Option<PatientRecordsRecord>,
    #[serde(default)]
    pub cycle_parameters: Option<CycleParametersRecord>,
    #[serde(default)]
    pub contraindications: Option<Vec<String>>,
    #[serde(default)]
    pub preferences: Option<PreferencesRecord>,
    #[serde(default)]
    pub options: Option<RequestOptions>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PatientRecordsRecord {
    #[serde(default)]
    pub ovarian_reserve_markers: Option<OvarianReserveRecord>,
    #[serde(default)]
    pub previous_response: Option<Vec<PreviousCycleRecord>>,
    #[serde(default)]
    pub conditions: Option<ConditionsRecord>,
    #[serde(default)]
    pub demographics: Option<DemographicsRecord>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct OvarianReserveRecord {
    /// ng/mL
    #[serde(default, rename = "AMH")]
    pub amh: Option<f64>,
    #[serde(default, rename = "AFC")]
    pub afc: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PreviousCycleRecord {
    #[serde(default)]
    pub oocytes_retrieved: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct DemographicsRecord {
    #[serde(default)]
    pub age: Option<f64>,
    #[serde(default, rename = "BMI")]
    pub bmi: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CycleParametersRecord {
    #[serde(default)]
    pub baseline_hormones: Option<HormonesRecord>,
    // Spelling matches what clients send.
    #[serde(default)]
    pub antrall_follicle_count: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct HormonesRecord {
    /// IU/L
    #[serde(default, rename = "FSH")]
    pub fsh: Option<f64>,
}

// Preference keys are snake_case on the wire.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct PreferencesRecord {
    #[serde(default)]
    pub minimal_medication: Option<bool>,
}
