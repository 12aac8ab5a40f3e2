use crate::clinical::request::{
    EmbryoRecord, OutcomeRequest, PatientFactorsRecord, RequestOptions, TransferDetailsRecord,
};
use crate::clinical::{
    Conditions, Diagnosis, Embryo, Genetics, OutcomeInput, PatientFactors, Ploidy, Timelapse,
    TransferDay, TransferDetails,
};
use crate::error::ValidationError;

pub const MIN_AGE: f64 = 18.0;
pub const MAX_AGE: f64 = 55.0;

pub(crate) const CONSENT_ERROR: &str =
    "options.consentGiven: patient consent is required for clinical decision support";

/// A JSON number that must hold a whole value; `5.0` is 5, `5.5` is not.
fn whole_number(value: f64) -> Option<i64> {
    if value.is_finite() && value.fract() == 0.0 && value.abs() <= i64::MAX as f64 {
        Some(value as i64)
    } else {
        None
    }
}

/// Validate an outcome prediction request.
/// Returns all validation errors at once (not just the first).
pub fn validate_outcome_request(
    request: &OutcomeRequest,
    require_consent: bool,
) -> Result<OutcomeInput, ValidationError> {
    let mut errors = Vec::new();

    let embryos = match request.embryology_parameters {
        Some(ref records) if !records.is_empty() => records
            .iter()
            .enumerate()
            .filter_map(|(i, record)| validate_embryo(i, record, &mut errors))
            .collect(),
        _ => {
            errors.push("embryologyParameters: at least one embryo is required".to_string());
            Vec::new()
        }
    };

    let patient = match request.patient_factors {
        Some(ref record) => validate_patient(record, &mut errors),
        None => {
            errors.push("patientFactors: required".to_string());
            None
        }
    };

    let transfer = match request.transfer_details {
        Some(ref record) => validate_transfer(record, &mut errors),
        None => {
            errors.push("transferDetails: required".to_string());
            None
        }
    };

    if require_consent && !RequestOptions::has_consent(request.options.as_ref()) {
        errors.push(CONSENT_ERROR.to_string());
    }

    match (patient, transfer) {
        (Some(patient), Some(transfer)) if errors.is_empty() => Ok(OutcomeInput {
            embryos,
            patient,
            transfer,
        }),
        _ => Err(ValidationError::new(errors)),
    }
}

fn validate_embryo(index: usize, record: &EmbryoRecord, errors: &mut Vec<String>) -> Option<Embryo> {
    let path = format!("embryologyParameters[{}]", index);
    let before = errors.len();

    let timelapse = record.timelapse_parameters.as_ref().map(|t| {
        let timings = t.cleavage_timings.clone().unwrap_or_default();
        for (j, hours) in timings.iter().enumerate() {
            if !hours.is_finite() || *hours < 0.0 {
                errors.push(format!(
                    "{}.timelapseParameters.cleavageTimings[{}]: must be a non-negative number of hours",
                    path, j
                ));
            }
        }
        if let Some(score) = t.morphokinetic_score {
            if !(0.0..=1.0).contains(&score) {
                errors.push(format!(
                    "{}.timelapseParameters.morphokineticScore: must be between 0 and 1 (got {})",
                    path, score
                ));
            }
        }
        Timelapse {
            cleavage_timings: timings,
            morphokinetic_score: t.morphokinetic_score,
            deselection_markers: t.deselection_markers.clone().unwrap_or_default(),
        }
    });

    let day = match record.day {
        Some(d) => match whole_number(d).and_then(|d| u32::try_from(d).ok()) {
            Some(d) if d > 0 => Some(d),
            _ => {
                errors.push(format!("{}.day: must be a positive day number (got {})", path, d));
                None
            }
        },
        None => None,
    };

    if errors.len() > before {
        return None;
    }

    Some(Embryo {
        id: record
            .id
            .clone()
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| format!("embryo_{}", index + 1)),
        grade: record
            .grade
            .as_deref()
            .map(str::trim)
            .filter(|g| !g.is_empty())
            .map(str::to_string),
        genetics: record.genetics.as_ref().map(|g| Genetics {
            ploidy: g
                .ploidy
                .as_deref()
                .map(Ploidy::from_code)
                .unwrap_or(Ploidy::Unknown),
            abnormalities: g.abnormalities.clone().unwrap_or_default(),
        }),
        timelapse,
        optimal_culture: record
            .culture_conditions
            .as_ref()
            .and_then(|c| c.optimal)
            .unwrap_or(false),
        day,
    })
}

fn validate_patient(record: &PatientFactorsRecord, errors: &mut Vec<String>) -> Option<PatientFactors> {
    let before = errors.len();

    let age = match record.age {
        Some(age) if age.is_finite() && (MIN_AGE..=MAX_AGE).contains(&age) => age,
        Some(age) => {
            errors.push(format!(
                "patientFactors.age: must be between {} and {} (got {})",
                MIN_AGE, MAX_AGE, age
            ));
            0.0
        }
        None => {
            errors.push("patientFactors.age: required".to_string());
            0.0
        }
    };

    if let Some(bmi) = record.bmi {
        if !bmi.is_finite() || bmi <= 0.0 {
            errors.push(format!("patientFactors.BMI: must be positive (got {})", bmi));
        }
    }

    let previous_pregnancies = match record.previous_pregnancies {
        Some(n) => whole_number(n)
            .and_then(|n| u32::try_from(n).ok())
            .unwrap_or_else(|| {
                errors.push(format!(
                    "patientFactors.previousPregnancies: must be a non-negative whole number (got {})",
                    n
                ));
                0
            }),
        None => 0,
    };

    if errors.len() > before {
        return None;
    }

    Some(PatientFactors {
        age,
        diagnosis: record
            .diagnosis
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(Diagnosis::from_code),
        bmi: record.bmi,
        previous_pregnancies,
        conditions: {
            let mut conditions = record
                .conditions
                .as_ref()
                .map(Conditions::from)
                .unwrap_or_default();
            conditions.diabetes |= record.diabetes.unwrap_or(false);
            conditions
        },
    })
}

fn validate_transfer(
    record: &TransferDetailsRecord,
    errors: &mut Vec<String>,
) -> Option<TransferDetails> {
    let before = errors.len();

    let endometrial_thickness = match record.endometrial_thickness {
        Some(t) if t.is_finite() && t > 0.0 => t,
        Some(t) => {
            errors.push(format!(
                "transferDetails.endometrialThickness: must be positive (got {})",
                t
            ));
            0.0
        }
        None => {
            errors.push("transferDetails.endometrialThickness: required".to_string());
            0.0
        }
    };

    let transfer_day = match record.transfer_day {
        Some(day) => whole_number(day).and_then(TransferDay::from_day).or_else(|| {
            errors.push(format!(
                "transferDetails.transferDay: must be 3, 5 or 6 (got {})",
                day
            ));
            None
        }),
        None => {
            errors.push("transferDetails.transferDay: required (3, 5 or 6)".to_string());
            None
        }
    };

    let number_of_embryos = match record.number_of_embryos {
        Some(n) => match whole_number(n).and_then(|n| u32::try_from(n).ok()) {
            Some(n) if n >= 1 => Some(n),
            _ => {
                errors.push(format!(
                    "transferDetails.numberOfEmbryos: must be a whole number of at least 1 (got {})",
                    n
                ));
                None
            }
        },
        None => None,
    };

    match transfer_day {
        Some(transfer_day) if errors.len() == before => Some(TransferDetails {
            endometrial_thickness,
            transfer_day,
            number_of_embryos,
            endometrial_pattern: record.endometrial_pattern.clone(),
            blood_flow: record.blood_flow.clone(),
        }),
        _ => None,
    }
}
