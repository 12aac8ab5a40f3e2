pub mod request;
pub mod types;

pub use request::{OutcomeRequest, RequestOptions, StimulationRequest};
pub use types::{
    Conditions, Diagnosis, Embryo, Genetics, OutcomeInput, PatientFactors, Ploidy, Timelapse,
    TransferDay, TransferDetails,
};
