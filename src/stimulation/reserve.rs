use super::types::{recorded, OvarianReserve, ResponseCategory, StimulationInput};

const DEFAULT_AMH: f64 = 1.5;
const DEFAULT_AFC: f64 = 10.0;
const DEFAULT_FSH: f64 = 8.0;

fn amh_points(amh: f64) -> u32 {
    if amh > 2.0 {
        3
    } else if amh > 1.0 {
        2
    } else if amh > 0.5 {
        1
    } else {
        0
    }
}

fn afc_points(afc: f64) -> u32 {
    if afc > 15.0 {
        3
    } else if afc > 10.0 {
        2
    } else if afc > 5.0 {
        1
    } else {
        0
    }
}

fn fsh_points(fsh: f64) -> u32 {
    if fsh < 8.0 {
        2
    } else if fsh < 12.0 {
        1
    } else {
        0
    }
}

/// Composite 0-8 point ovarian reserve classification.
pub fn assess_ovarian_reserve(input: &StimulationInput) -> OvarianReserve {
    let amh = recorded(input.markers.amh).unwrap_or(DEFAULT_AMH);
    let afc = recorded(input.markers.afc)
        .or(recorded(input.cycle_afc))
        .unwrap_or(DEFAULT_AFC);
    let fsh = recorded(input.fsh).unwrap_or(DEFAULT_FSH);

    let points = amh_points(amh) + afc_points(afc) + fsh_points(fsh);
    tracing::debug!(amh, afc, fsh, points, "ovarian reserve points");

    match points {
        6.. => OvarianReserve::High,
        4..=5 => OvarianReserve::Normal,
        2..=3 => OvarianReserve::Low,
        _ => OvarianReserve::VeryLow,
    }
}

/// Expected response to stimulation.
///
/// History wins over markers: the mean yield of earlier cycles decides when
/// there is any.
pub fn predict_response_category(
    previous_oocytes: &[f64],
    reserve: OvarianReserve,
) -> ResponseCategory {
    if !previous_oocytes.is_empty() {
        let mean = previous_oocytes.iter().sum::<f64>() / previous_oocytes.len() as f64;
        return if mean > 20.0 {
            ResponseCategory::Hyper
        } else if mean > 15.0 {
            ResponseCategory::High
        } else if mean > 8.0 {
            ResponseCategory::Normal
        } else {
            ResponseCategory::Poor
        };
    }

    match reserve {
        OvarianReserve::High => ResponseCategory::High,
        OvarianReserve::Normal => ResponseCategory::Normal,
        OvarianReserve::Low | OvarianReserve::VeryLow => ResponseCategory::Poor,
    }
}
