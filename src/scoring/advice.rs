//! Rule-based clinical text derived from scores and patient data.
//!
//! Everything here is deterministic: the same input always yields the same
//! strings in the same order.

use chrono::NaiveDate;
use serde::Serialize;

use super::embryo::{DevelopmentalPotential, EmbryoAssessment};
use super::engine::Predictions;
use super::transfer::{EndometrialReceptivity, ReceptivityAssessment};
use crate::clinical::{Embryo, PatientFactors, TransferDetails};

const PROCEED_THRESHOLD: f64 = 0.7;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendations {
    pub immediate: Vec<String>,
    pub follow_up: Vec<String>,
    pub lifestyle: Vec<String>,
    pub supplements: Vec<String>,
}

impl Recommendations {
    /// All recommendations, category by category.
    pub fn all(&self) -> Vec<String> {
        self.immediate
            .iter()
            .chain(&self.follow_up)
            .chain(&self.lifestyle)
            .chain(&self.supplements)
            .cloned()
            .collect()
    }
}

pub fn generate_recommendations(combined_score: f64, patient: &PatientFactors) -> Recommendations {
    let mut recommendations = Recommendations::default();

    if combined_score > PROCEED_THRESHOLD {
        recommendations
            .immediate
            .push("Proceed with transfer as planned".to_string());
        recommendations
            .immediate
            .push("Standard luteal phase support".to_string());
    } else {
        recommendations
            .immediate
            .push("Consider additional embryo assessment".to_string());
        recommendations
            .immediate
            .push("Enhanced luteal phase support".to_string());
    }

    recommendations
        .follow_up
        .push("Beta-hCG testing 12-14 days post-transfer".to_string());
    recommendations
        .follow_up
        .push("Transvaginal ultrasound at 6-7 weeks if positive".to_string());

    if patient.bmi.is_some_and(|bmi| bmi > 25.0) {
        recommendations
            .lifestyle
            .push("Maintain healthy weight".to_string());
    }
    recommendations
        .lifestyle
        .push("Avoid strenuous exercise for 48 hours".to_string());
    recommendations
        .lifestyle
        .push("Continue prenatal vitamins".to_string());

    recommendations
        .supplements
        .push("Folic acid 400-800 mcg daily".to_string());
    recommendations
        .supplements
        .push("Progesterone as prescribed".to_string());

    recommendations
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RiskFactors {
    pub maternal: Vec<String>,
    pub fetal: Vec<String>,
    pub pregnancy: Vec<String>,
}

impl RiskFactors {
    pub fn all(&self) -> Vec<String> {
        self.maternal
            .iter()
            .chain(&self.fetal)
            .chain(&self.pregnancy)
            .cloned()
            .collect()
    }
}

pub fn assess_risk_factors(patient: &PatientFactors, transfer: &TransferDetails) -> RiskFactors {
    let mut risks = RiskFactors::default();

    if patient.age > 35.0 {
        risks.maternal.push("Advanced maternal age".to_string());
    }
    if patient.bmi.is_some_and(|bmi| bmi > 30.0) {
        risks.maternal.push("Obesity".to_string());
    }
    if patient.conditions.diabetes {
        risks.maternal.push("Diabetes mellitus".to_string());
    }

    if patient.age > 40.0 {
        risks.fetal.push("Increased aneuploidy risk".to_string());
    }
    if transfer.number_of_embryos.is_some_and(|n| n > 1) {
        risks.fetal.push("Multiple pregnancy risk".to_string());
    }

    risks
        .pregnancy
        .push("Standard IVF pregnancy monitoring required".to_string());
    if patient.age > 35.0 {
        risks
            .pregnancy
            .push("Consider genetic screening".to_string());
    }

    risks
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategyOption {
    pub embryo_selection: String,
    pub number_of_embryos: u32,
    pub transfer_day: u32,
    pub rationale: String,
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlternativeStrategy {
    pub strategy: String,
    pub indication: String,
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransferStrategy {
    pub recommended: StrategyOption,
    pub alternatives: Vec<AlternativeStrategy>,
}

const STRATEGY_CONFIDENCE: f64 = 0.88;

/// Recommend how many embryos to transfer, and when.
///
/// Defaults to a single day-5 blastocyst. Patients over 40 with at most two
/// embryos may transfer both; an all day-3 cohort moves the transfer to day 3.
pub fn generate_transfer_strategy(
    embryos: &[Embryo],
    best: Option<&Embryo>,
    patient: &PatientFactors,
) -> TransferStrategy {
    let available = u32::try_from(embryos.len()).unwrap_or(u32::MAX);

    let number_of_embryos = if patient.age > 40.0 && available <= 2 {
        available.clamp(1, 2)
    } else {
        1
    };

    let transfer_day = if !embryos.is_empty() && embryos.iter().all(|e| e.day == Some(3)) {
        3
    } else {
        5
    };

    let embryo_selection = match best.and_then(|e| e.grade.as_deref()) {
        Some(grade) => format!("Transfer highest quality embryo ({})", grade),
        None => "Transfer best available embryo".to_string(),
    };

    TransferStrategy {
        recommended: StrategyOption {
            embryo_selection,
            number_of_embryos,
            transfer_day,
            rationale: transfer_rationale(number_of_embryos, transfer_day, patient),
            confidence: STRATEGY_CONFIDENCE,
        },
        alternatives: vec![
            AlternativeStrategy {
                strategy: "Freeze-all cycle".to_string(),
                indication: "If endometrial receptivity suboptimal or OHSS risk".to_string(),
                confidence: 0.75,
            },
            AlternativeStrategy {
                strategy: "Extended culture to day 6".to_string(),
                indication: "If day 5 embryos show delayed development".to_string(),
                confidence: 0.70,
            },
        ],
    }
}

fn transfer_rationale(number_of_embryos: u32, transfer_day: u32, patient: &PatientFactors) -> String {
    let mut rationale = if number_of_embryos == 1 {
        "Single embryo transfer recommended to minimize multiple pregnancy risk while maintaining good success rates. ".to_string()
    } else {
        format!(
            "Transfer of {} embryos considered due to patient age ({}) and prognosis. ",
            number_of_embryos, patient.age
        )
    };

    match transfer_day {
        5 => rationale.push_str(
            "Day 5 blastocyst transfer offers better embryo selection and higher implantation rates.",
        ),
        3 => rationale.push_str(
            "Day 3 transfer recommended due to embryo development patterns or laboratory constraints.",
        ),
        _ => {}
    }

    rationale
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowUpSummary {
    pub immediate: String,
    pub short_term: String,
    pub long_term: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClinicalInterpretation {
    pub summary: String,
    pub recommendations: Vec<String>,
    pub risk_factors: Vec<String>,
    pub follow_up: FollowUpSummary,
}

pub fn interpret(
    predictions: &Predictions,
    embryo_assessment: &[EmbryoAssessment],
    receptivity: &EndometrialReceptivity,
    patient: &PatientFactors,
) -> ClinicalInterpretation {
    let live_birth = predictions.live_birth.probability;
    let multiple = predictions.multiple_pregnancy.probability;
    let potential = embryo_assessment
        .first()
        .map(|a| a.quality.developmental_potential)
        .unwrap_or(DevelopmentalPotential::Good);

    let summary = format!(
        "Based on comprehensive analysis of embryo quality, patient factors, and transfer conditions, \
         the predicted live birth rate is {:.1}% with a {:.1}% risk of multiple pregnancy. \
         The embryo assessment indicates {} developmental potential.",
        live_birth * 100.0,
        multiple * 100.0,
        potential.as_str()
    );

    let mut recommendations = Vec::new();
    if live_birth > 0.4 {
        recommendations.push("Excellent prognosis - proceed with confidence".to_string());
    } else if live_birth > 0.2 {
        recommendations
            .push("Moderate prognosis - consider counseling regarding expectations".to_string());
    } else {
        recommendations.push("Guarded prognosis - discuss alternative options".to_string());
    }
    if multiple > 0.2 {
        recommendations
            .push("High multiple pregnancy risk - counsel regarding complications".to_string());
    }

    let mut risk_factors = Vec::new();
    if patient.age > 40.0 {
        risk_factors
            .push("Advanced maternal age increases miscarriage and aneuploidy risk".to_string());
    }
    if receptivity.assessment != ReceptivityAssessment::Optimal {
        risk_factors
            .push("Suboptimal endometrial receptivity may reduce implantation rates".to_string());
    }

    ClinicalInterpretation {
        summary,
        recommendations,
        risk_factors,
        follow_up: FollowUpSummary {
            immediate: "Rest for 24-48 hours, continue medications as prescribed".to_string(),
            short_term: "Beta-hCG testing in 12-14 days, avoid strenuous activity".to_string(),
            long_term: "If positive, routine prenatal care with high-risk obstetrics if indicated"
                .to_string(),
        },
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BetaHcgCheck {
    /// Days after transfer
    pub day: u32,
    pub expected_min: u32,
    pub expected_max: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UltrasoundMilestone {
    pub week: u32,
    pub expected_findings: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowUpPlan {
    pub beta_hcg: Vec<BetaHcgCheck>,
    pub ultrasound: Vec<UltrasoundMilestone>,
    pub monitoring: Vec<String>,
    pub estimated_due_date: NaiveDate,
}

/// Full-term gestation, in days.
const GESTATION_DAYS: i64 = 280;

pub fn follow_up_plan(as_of: NaiveDate) -> FollowUpPlan {
    let milestone = |week: u32, findings: &[&str]| UltrasoundMilestone {
        week,
        expected_findings: findings.iter().map(|f| f.to_string()).collect(),
    };

    FollowUpPlan {
        beta_hcg: vec![
            BetaHcgCheck { day: 12, expected_min: 50, expected_max: 200 },
            BetaHcgCheck { day: 14, expected_min: 100, expected_max: 400 },
            BetaHcgCheck { day: 16, expected_min: 200, expected_max: 800 },
        ],
        ultrasound: vec![
            milestone(6, &["Gestational sac", "Yolk sac"]),
            milestone(7, &["Fetal pole", "Cardiac activity"]),
            milestone(8, &["Crown-rump length measurement"]),
        ],
        monitoring: vec![
            "Serial beta-hCG until plateau".to_string(),
            "First trimester screening at 11-13 weeks".to_string(),
            "Routine prenatal care as per guidelines".to_string(),
        ],
        estimated_due_date: as_of + chrono::Duration::days(GESTATION_DAYS),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clinical::{Conditions, TransferDay};
    use crate::scoring::engine::predict;
    use crate::scoring::transfer::assess_endometrial_receptivity;

    fn sample_patient(age: f64, bmi: Option<f64>) -> PatientFactors {
        PatientFactors {
            age,
            diagnosis: None,
            bmi,
            previous_pregnancies: 0,
            conditions: Conditions::default(),
        }
    }

    fn sample_transfer(thickness: f64, embryos: Option<u32>) -> TransferDetails {
        TransferDetails {
            endometrial_thickness: thickness,
            transfer_day: TransferDay::Day5,
            number_of_embryos: embryos,
            endometrial_pattern: None,
            blood_flow: None,
        }
    }

    fn sample_embryo(grade: &str, day: u32) -> Embryo {
        Embryo {
            id: format!("{}-d{}", grade, day),
            grade: Some(grade.to_string()),
            genetics: None,
            timelapse: None,
            optimal_culture: false,
            day: Some(day),
        }
    }

    #[test]
    fn test_recommendations_good_prognosis() {
        let recs = generate_recommendations(0.75, &sample_patient(30.0, Some(22.0)));
        assert_eq!(recs.immediate[0], "Proceed with transfer as planned");
        assert_eq!(recs.lifestyle.len(), 2);
        assert_eq!(recs.all().len(), 8);
    }

    #[test]
    fn test_recommendations_threshold_is_exclusive() {
        let recs = generate_recommendations(0.7, &sample_patient(30.0, None));
        assert_eq!(recs.immediate[0], "Consider additional embryo assessment");
    }

    #[test]
    fn test_recommendations_weight_advice_above_bmi_25() {
        let recs = generate_recommendations(0.5, &sample_patient(30.0, Some(27.0)));
        assert_eq!(recs.lifestyle[0], "Maintain healthy weight");
        let all = recs.all();
        assert_eq!(all.first().map(String::as_str), Some("Consider additional embryo assessment"));
        assert_eq!(all.last().map(String::as_str), Some("Progesterone as prescribed"));
    }

    #[test]
    fn test_risk_factors_young_single_transfer() {
        let risks = assess_risk_factors(&sample_patient(29.0, Some(22.0)), &sample_transfer(9.0, Some(1)));
        assert!(risks.maternal.is_empty());
        assert!(risks.fetal.is_empty());
        assert_eq!(risks.all(), vec!["Standard IVF pregnancy monitoring required".to_string()]);
    }

    #[test]
    fn test_risk_factors_older_obese_diabetic_double_transfer() {
        let mut patient = sample_patient(42.0, Some(33.0));
        patient.conditions.diabetes = true;
        let risks = assess_risk_factors(&patient, &sample_transfer(9.0, Some(2)));

        assert_eq!(
            risks.maternal,
            vec!["Advanced maternal age", "Obesity", "Diabetes mellitus"]
        );
        assert_eq!(
            risks.fetal,
            vec!["Increased aneuploidy risk", "Multiple pregnancy risk"]
        );
        assert_eq!(risks.pregnancy.len(), 2);
    }

    #[test]
    fn test_strategy_defaults_to_single_day5() {
        let embryos = vec![sample_embryo("AA", 5), sample_embryo("BB", 5)];
        let strategy = generate_transfer_strategy(&embryos, embryos.first(), &sample_patient(33.0, None));

        assert_eq!(strategy.recommended.number_of_embryos, 1);
        assert_eq!(strategy.recommended.transfer_day, 5);
        assert_eq!(
            strategy.recommended.embryo_selection,
            "Transfer highest quality embryo (AA)"
        );
        assert!(strategy.recommended.rationale.starts_with("Single embryo transfer"));
        assert_eq!(strategy.alternatives.len(), 2);
    }

    #[test]
    fn test_strategy_double_transfer_over_40() {
        let embryos = vec![sample_embryo("BB", 3), sample_embryo("BC", 3)];
        let strategy = generate_transfer_strategy(&embryos, embryos.first(), &sample_patient(41.0, None));

        assert_eq!(strategy.recommended.number_of_embryos, 2);
        assert_eq!(strategy.recommended.transfer_day, 3);
        assert!(strategy.recommended.rationale.contains("patient age (41)"));
        assert!(strategy.recommended.rationale.contains("Day 3 transfer"));
    }

    #[test]
    fn test_strategy_over_40_with_many_embryos_stays_single() {
        let embryos = vec![
            sample_embryo("AA", 5),
            sample_embryo("AB", 5),
            sample_embryo("BB", 5),
        ];
        let strategy = generate_transfer_strategy(&embryos, None, &sample_patient(43.0, None));
        assert_eq!(strategy.recommended.number_of_embryos, 1);
        assert_eq!(strategy.recommended.embryo_selection, "Transfer best available embryo");
    }

    #[test]
    fn test_interpretation_prognosis_lines() {
        let patient = sample_patient(43.0, None);
        let transfer = sample_transfer(7.5, Some(2));
        let receptivity = assess_endometrial_receptivity(&transfer);

        let predictions = predict(0.2, &patient, &transfer);
        let interpretation = interpret(&predictions, &[], &receptivity, &patient);

        // live birth = 0.28 * 0.7 = 0.196
        assert_eq!(
            interpretation.recommendations,
            vec![
                "Guarded prognosis - discuss alternative options".to_string(),
                "High multiple pregnancy risk - counsel regarding complications".to_string(),
            ]
        );
        assert_eq!(interpretation.risk_factors.len(), 2);
        assert!(interpretation.summary.contains("19.6%"));
        assert!(interpretation.summary.contains("25.0% risk of multiple pregnancy"));
        assert!(interpretation.summary.contains("good developmental potential"));
    }

    #[test]
    fn test_follow_up_due_date() {
        let as_of = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let plan = follow_up_plan(as_of);
        assert_eq!(
            plan.estimated_due_date,
            NaiveDate::from_ymd_opt(2026, 10, 8).unwrap()
        );
        assert_eq!(plan.beta_hcg.len(), 3);
        assert_eq!(plan.ultrasound[1].week, 7);
    }
}
