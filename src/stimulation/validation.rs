use crate::clinical::request::{RequestOptions, StimulationRequest};
use crate::clinical::Conditions;
use crate::error::ValidationError;
use crate::scoring::validation::CONSENT_ERROR;

use super::types::{OvarianReserveMarkers, Preferences, StimulationInput};

fn check_non_negative(path: &str, value: Option<f64>, errors: &mut Vec<String>) {
    if let Some(v) = value {
        if !v.is_finite() || v < 0.0 {
            errors.push(format!("{}: must not be negative (got {})", path, v));
        }
    }
}

/// Validate a stimulation protocol request, collecting every problem found.
pub fn validate_stimulation_request(
    request: &StimulationRequest,
    require_consent: bool,
) -> Result<StimulationInput, ValidationError> {
    let mut errors = Vec::new();

    let records = request.patient_records.as_ref();
    let markers = records.and_then(|r| r.ovarian_reserve_markers.as_ref());
    match (records, markers) {
        (None, _) => errors.push("patientRecords: required".to_string()),
        (Some(_), None) => errors.push(
            "patientRecords.ovarianReserveMarkers: required (AMH, AFC)".to_string(),
        ),
        (Some(_), Some(m)) => {
            check_non_negative("patientRecords.ovarianReserveMarkers.AMH", m.amh, &mut errors);
            check_non_negative("patientRecords.ovarianReserveMarkers.AFC", m.afc, &mut errors);
        }
    }

    let cycle = request.cycle_parameters.as_ref();
    let hormones = cycle.and_then(|c| c.baseline_hormones.as_ref());
    match (cycle, hormones) {
        (None, _) => errors.push("cycleParameters: required".to_string()),
        (Some(_), None) => {
            errors.push("cycleParameters.baselineHormones: required".to_string())
        }
        (Some(_), Some(h)) => {
            check_non_negative("cycleParameters.baselineHormones.FSH", h.fsh, &mut errors)
        }
    }
    check_non_negative(
        "cycleParameters.antrallFollicleCount",
        cycle.and_then(|c| c.antrall_follicle_count),
        &mut errors,
    );

    let mut previous_oocytes = Vec::new();
    let history = records
        .and_then(|r| r.previous_response.as_deref())
        .unwrap_or_default();
    for (i, previous) in history.iter().enumerate() {
        let path = format!("patientRecords.previousResponse[{}].oocytesRetrieved", i);
        match previous.oocytes_retrieved {
            Some(n) if n.is_finite() && n >= 0.0 => previous_oocytes.push(n),
            Some(n) => errors.push(format!("{}: must not be negative (got {})", path, n)),
            None => errors.push(format!("{}: required", path)),
        }
    }

    let demographics = records.and_then(|r| r.demographics.as_ref());
    let age = demographics.and_then(|d| d.age);
    let bmi = demographics.and_then(|d| d.bmi);
    // Zero demographics mean "not recorded" and take the planner defaults.
    check_non_negative("patientRecords.demographics.age", age, &mut errors);
    check_non_negative("patientRecords.demographics.BMI", bmi, &mut errors);

    if require_consent && !RequestOptions::has_consent(request.options.as_ref()) {
        errors.push(CONSENT_ERROR.to_string());
    }

    ValidationError::check(errors)?;

    Ok(StimulationInput {
        markers: OvarianReserveMarkers {
            amh: markers.and_then(|m| m.amh),
            afc: markers.and_then(|m| m.afc),
        },
        cycle_afc: cycle.and_then(|c| c.antrall_follicle_count),
        fsh: hormones.and_then(|h| h.fsh),
        previous_oocytes,
        conditions: records
            .and_then(|r| r.conditions.as_ref())
            .map(Conditions::from)
            .unwrap_or_default(),
        age,
        bmi,
        contraindications: request.contraindications.clone().unwrap_or_default(),
        preferences: Preferences {
            minimal_medication: request
                .preferences
                .as_ref()
                .and_then(|p| p.minimal_medication)
                .unwrap_or(false),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clinical::request::PreviousCycleRecord;

    fn valid_request() -> StimulationRequest {
        serde_json::from_str(
            r#"{
                "patientRecords": {
                    "ovarianReserveMarkers": { "AMH": 2.4, "AFC": 14 },
                    "previousResponse": [{ "oocytesRetrieved": 11 }],
                    "conditions": { "thyroid": true },
                    "demographics": { "age": 36, "BMI": 24 }
                },
                "cycleParameters": { "baselineHormones": { "FSH": 6.5 } },
                "contraindications": ["Latex allergy"],
                "preferences": { "minimal_medication": true },
                "options": { "consentGiven": true }
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_valid_request() {
        let input = validate_stimulation_request(&valid_request(), true).unwrap();
        assert_eq!(input.markers.amh, Some(2.4));
        assert_eq!(input.fsh, Some(6.5));
        assert_eq!(input.previous_oocytes, vec![11.0]);
        assert!(input.conditions.thyroid);
        assert_eq!(input.age, Some(36.0));
        assert!(input.preferences.minimal_medication);
        assert_eq!(input.contraindications, vec!["Latex allergy".to_string()]);
    }

    #[test]
    fn test_missing_sections_collected() {
        let err = validate_stimulation_request(&StimulationRequest::default(), true).unwrap_err();
        assert_eq!(
            err.errors,
            vec![
                "patientRecords: required".to_string(),
                "cycleParameters: required".to_string(),
                CONSENT_ERROR.to_string(),
            ]
        );
    }

    #[test]
    fn test_missing_markers_and_hormones() {
        let mut request = valid_request();
        request.patient_records.as_mut().unwrap().ovarian_reserve_markers = None;
        request.cycle_parameters.as_mut().unwrap().baseline_hormones = None;
        let err = validate_stimulation_request(&request, true).unwrap_err();
        assert_eq!(err.errors.len(), 2);
        assert!(err.errors[0].starts_with("patientRecords.ovarianReserveMarkers"));
        assert!(err.errors[1].starts_with("cycleParameters.baselineHormones"));
    }

    #[test]
    fn test_empty_markers_are_accepted() {
        let mut request = valid_request();
        let markers = request
            .patient_records
            .as_mut()
            .unwrap()
            .ovarian_reserve_markers
            .as_mut()
            .unwrap();
        markers.amh = None;
        markers.afc = None;
        let input = validate_stimulation_request(&request, true).unwrap();
        assert_eq!(input.markers, OvarianReserveMarkers::default());
    }

    #[test]
    fn test_negative_values_rejected() {
        let mut request = valid_request();
        request
            .patient_records
            .as_mut()
            .unwrap()
            .ovarian_reserve_markers
            .as_mut()
            .unwrap()
            .amh = Some(-1.0);
        request.patient_records.as_mut().unwrap().previous_response =
            Some(vec![PreviousCycleRecord {
                oocytes_retrieved: None,
            }]);
        let err = validate_stimulation_request(&request, true).unwrap_err();
        assert_eq!(
            err.errors,
            vec![
                "patientRecords.ovarianReserveMarkers.AMH: must not be negative (got -1)"
                    .to_string(),
                "patientRecords.previousResponse[0].oocytesRetrieved: required".to_string(),
            ]
        );
    }

    #[test]
    fn test_zero_demographics_pass_through() {
        let mut request = valid_request();
        request.patient_records.as_mut().unwrap().demographics =
            serde_json::from_str(r#"{ "age": 0, "BMI": 0 }"#).unwrap();
        let input = validate_stimulation_request(&request, true).unwrap();
        assert_eq!(input.age, Some(0.0));
        assert_eq!(input.bmi, Some(0.0));

        let plan = crate::stimulation::plan_stimulation(&input);
        // Defaults age 35 and BMI 25 keep the base dose
        assert_eq!(plan.medications.gonadotropins.starting_dose, 150);
    }

    #[test]
    fn test_consent_can_be_disabled() {
        let mut request = valid_request();
        request.options = None;
        assert!(validate_stimulation_request(&request, true).is_err());
        assert!(validate_stimulation_request(&request, false).is_ok());
    }
}
