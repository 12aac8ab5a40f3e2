use serde::Serialize;

use super::factors::{Bracket, RangeOp, ScoreBreakdown};
use crate::clinical::{TransferDay, TransferDetails};

const BASE_SCORE: f64 = 0.5;

const THICKNESS_BRACKETS: &[Bracket] = &[
    Bracket::new(RangeOp::Between(8.0, 14.0), 0.3),
    Bracket::new(RangeOp::HalfOpen(7.0, 8.0), 0.1),
    Bracket::new(RangeOp::LessThan(7.0), -0.2),
    Bracket::new(RangeOp::GreaterThan(14.0), -0.1),
];

fn transfer_day_adjustment(day: TransferDay) -> f64 {
    match day {
        TransferDay::Day5 => 0.2,
        TransferDay::Day6 => 0.1,
        TransferDay::Day3 => -0.1,
    }
}

// Single embryo transfer is preferred.
fn embryo_count_adjustment(count: u32) -> f64 {
    match count {
        0 => 0.0,
        1 => 0.1,
        2 => -0.05,
        _ => -0.2,
    }
}

/// Score transfer conditions in [0, 1].
pub fn score_transfer_conditions(transfer: &TransferDetails) -> f64 {
    transfer_breakdown(transfer).score
}

pub fn transfer_breakdown(transfer: &TransferDetails) -> ScoreBreakdown {
    let mut breakdown = ScoreBreakdown::new(BASE_SCORE);

    breakdown.apply_bracket(
        "Endometrial thickness",
        transfer.endometrial_thickness,
        THICKNESS_BRACKETS,
    );

    let day_adjustment = transfer_day_adjustment(transfer.transfer_day);
    breakdown.apply(
        "Transfer day",
        format!("day {} -> {:+}", transfer.transfer_day.day(), day_adjustment),
        day_adjustment,
    );

    if let Some(count) = transfer.number_of_embryos {
        let adjustment = embryo_count_adjustment(count);
        if adjustment != 0.0 {
            breakdown.apply(
                "Embryos transferred",
                format!("{} embryo(s) -> {:+}", count, adjustment),
                adjustment,
            );
        }
    }

    breakdown.clamped()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReceptivityAssessment {
    Optimal,
    Suboptimal,
    Poor,
}

impl ReceptivityAssessment {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReceptivityAssessment::Optimal => "optimal",
            ReceptivityAssessment::Suboptimal => "suboptimal",
            ReceptivityAssessment::Poor => "poor",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EndometrialReceptivity {
    pub assessment: ReceptivityAssessment,
    pub thickness: f64,
    pub pattern: String,
    pub blood_flow: String,
    pub recommendations: Vec<String>,
}

pub fn assess_endometrial_receptivity(transfer: &TransferDetails) -> EndometrialReceptivity {
    let thickness = transfer.endometrial_thickness;
    let assessment = if thickness < 7.0 {
        ReceptivityAssessment::Poor
    } else if thickness < 8.0 {
        ReceptivityAssessment::Suboptimal
    } else {
        ReceptivityAssessment::Optimal
    };

    let mut recommendations = Vec::new();
    match assessment {
        ReceptivityAssessment::Poor => {
            recommendations.push("Consider estrogen supplementation".to_string());
            recommendations.push("Evaluate for intrauterine adhesions".to_string());
            recommendations.push("Consider freeze-all cycle".to_string());
        }
        ReceptivityAssessment::Suboptimal => {
            recommendations.push("Monitor closely with serial ultrasounds".to_string());
            recommendations.push("Consider additional estrogen support".to_string());
        }
        ReceptivityAssessment::Optimal => {}
    }
    if thickness > 14.0 {
        recommendations.push("Rule out endometrial pathology".to_string());
        recommendations.push("Consider endometrial biopsy".to_string());
    }

    EndometrialReceptivity {
        assessment,
        thickness,
        pattern: transfer
            .endometrial_pattern
            .clone()
            .unwrap_or_else(|| "trilaminar".to_string()),
        blood_flow: transfer
            .blood_flow
            .clone()
            .unwrap_or_else(|| "adequate".to_string()),
        recommendations,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_transfer(thickness: f64, day: TransferDay, embryos: Option<u32>) -> TransferDetails {
        TransferDetails {
            endometrial_thickness: thickness,
            transfer_day: day,
            number_of_embryos: embryos,
            endometrial_pattern: None,
            blood_flow: None,
        }
    }

    #[test]
    fn test_best_case_clamps_to_one() {
        // 0.5 + 0.3 + 0.2 + 0.1 = 1.1
        let transfer = sample_transfer(10.0, TransferDay::Day5, Some(1));
        assert_eq!(score_transfer_conditions(&transfer), 1.0);
    }

    #[test]
    fn test_poor_conditions() {
        // 0.5 - 0.2 - 0.1 - 0.2 = 0.0
        let transfer = sample_transfer(6.0, TransferDay::Day3, Some(3));
        assert!(score_transfer_conditions(&transfer).abs() < 1e-9);
    }

    #[test]
    fn test_thickness_brackets() {
        let score = |t| score_transfer_conditions(&sample_transfer(t, TransferDay::Day6, None));
        assert!((score(8.0) - 0.9).abs() < 1e-9);
        assert!((score(14.0) - 0.9).abs() < 1e-9);
        assert!((score(7.5) - 0.7).abs() < 1e-9);
        assert!((score(6.9) - 0.4).abs() < 1e-9);
        assert!((score(15.0) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_single_embryo_never_scores_below_three() {
        for day in [TransferDay::Day3, TransferDay::Day5, TransferDay::Day6] {
            for thickness in [5.0, 7.5, 10.0, 16.0] {
                let one = score_transfer_conditions(&sample_transfer(thickness, day, Some(1)));
                let three = score_transfer_conditions(&sample_transfer(thickness, day, Some(3)));
                assert!(one >= three);
            }
        }
    }

    #[test]
    fn test_missing_embryo_count_has_no_effect() {
        let transfer = sample_transfer(7.5, TransferDay::Day3, None);
        // 0.5 + 0.1 - 0.1
        assert!((score_transfer_conditions(&transfer) - 0.5).abs() < 1e-9);
        assert_eq!(transfer_breakdown(&transfer).factors.len(), 2);
    }

    #[test]
    fn test_receptivity_poor() {
        let receptivity =
            assess_endometrial_receptivity(&sample_transfer(6.5, TransferDay::Day5, Some(1)));
        assert_eq!(receptivity.assessment, ReceptivityAssessment::Poor);
        assert_eq!(receptivity.recommendations.len(), 3);
        assert_eq!(receptivity.pattern, "trilaminar");
        assert_eq!(receptivity.blood_flow, "adequate");
    }

    #[test]
    fn test_receptivity_suboptimal() {
        let receptivity =
            assess_endometrial_receptivity(&sample_transfer(7.0, TransferDay::Day5, Some(1)));
        assert_eq!(receptivity.assessment, ReceptivityAssessment::Suboptimal);
        assert_eq!(receptivity.recommendations.len(), 2);
    }

    #[test]
    fn test_receptivity_thick_lining_is_optimal_with_workup() {
        let mut transfer = sample_transfer(15.0, TransferDay::Day5, Some(1));
        transfer.endometrial_pattern = Some("homogeneous".to_string());
        let receptivity = assess_endometrial_receptivity(&transfer);
        assert_eq!(receptivity.assessment, ReceptivityAssessment::Optimal);
        assert_eq!(
            receptivity.recommendations,
            vec![
                "Rule out endometrial pathology".to_string(),
                "Consider endometrial biopsy".to_string()
            ]
        );
        assert_eq!(receptivity.pattern, "homogeneous");
    }
}
