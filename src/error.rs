use thiserror::Error;

/// Rejected request input.
///
/// Carries every problem found during validation, each prefixed with the
/// JSON path of the offending field (e.g. `patientFactors.age: ...`).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid input: {}", .errors.join("; "))]
pub struct ValidationError {
    pub errors: Vec<String>,
}

impl ValidationError {
    pub fn new(errors: Vec<String>) -> Self {
        Self { errors }
    }

    /// Turn a collected error list into a result: empty means valid.
    pub fn check(errors: Vec<String>) -> Result<(), Self> {
        if errors.is_empty() {
            Ok(())
        } else {
            Err(Self::new(errors))
        }
    }
}
