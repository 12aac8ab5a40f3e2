use serde::Serialize;

use super::medication::{medication_plan, MedicationPlan};
use super::protocol::{
    alternative_protocols, monitoring_schedule, protocol_contraindications, protocol_rationale,
    select_protocol, stimulation_days, AlternativeProtocol, MonitoringSchedule,
};
use super::reserve::{assess_ovarian_reserve, predict_response_category};
use super::risk::{
    assess_risks, predict_response, special_considerations, ResponsePrediction, RiskAssessment,
};
use super::types::{OvarianReserve, ProtocolType, StimulationInput};

const PROTOCOL_CONFIDENCE: f64 = 0.93;
const EVIDENCE_LEVEL: &str = "A";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProtocolSummary {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ProtocolType,
    /// Days of stimulation
    pub duration: u32,
    pub confidence: f64,
    pub rationale: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClinicalGuidance {
    pub key_considerations: Vec<String>,
    pub emergency_contacts: Vec<String>,
}

impl Default for ClinicalGuidance {
    fn default() -> Self {
        Self {
            key_considerations: vec![
                "Monitor for signs of ovarian hyperstimulation syndrome (OHSS)".to_string(),
                "Adjust dosages based on follicular response and E2 levels".to_string(),
                "Consider cycle cancellation if poor or excessive response".to_string(),
                "Ensure proper patient counseling on injection techniques".to_string(),
            ],
            emergency_contacts: vec![
                "Contact clinic immediately if severe abdominal pain or bloating".to_string(),
                "Report any signs of OHSS: nausea, vomiting, rapid weight gain".to_string(),
                "Seek immediate care for breathing difficulties or chest pain".to_string(),
            ],
        }
    }
}

/// A complete, individualized ovarian stimulation plan.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StimulationPlan {
    pub protocol: ProtocolSummary,
    pub ovarian_reserve: OvarianReserve,
    pub medications: MedicationPlan,
    pub monitoring: MonitoringSchedule,
    pub predictions: ResponsePrediction,
    pub risk_assessment: RiskAssessment,
    pub alternatives: Vec<AlternativeProtocol>,
    pub contraindications: Vec<String>,
    pub special_considerations: Vec<String>,
    pub clinical_guidance: ClinicalGuidance,
    pub evidence_level: String,
}

/// Build a stimulation plan from validated input.
///
/// Reserve feeds the response category, which together with the patient's
/// conditions and preferences selects the protocol; everything else hangs off
/// those three decisions.
pub fn plan_stimulation(input: &StimulationInput) -> StimulationPlan {
    let reserve = assess_ovarian_reserve(input);
    let response = predict_response_category(&input.previous_oocytes, reserve);
    let protocol = select_protocol(response, &input.conditions, &input.preferences);

    tracing::debug!(?reserve, %response, ?protocol, "protocol selected");

    let mut contraindications = input.contraindications.clone();
    contraindications.extend(
        protocol_contraindications(protocol)
            .iter()
            .map(|s| s.to_string()),
    );

    let plan = StimulationPlan {
        protocol: ProtocolSummary {
            name: protocol.display_name().to_string(),
            kind: protocol,
            duration: stimulation_days(response),
            confidence: PROTOCOL_CONFIDENCE,
            rationale: protocol_rationale(protocol, response),
        },
        ovarian_reserve: reserve,
        medications: medication_plan(protocol, reserve, input.age, input.bmi),
        monitoring: monitoring_schedule(response),
        predictions: predict_response(response),
        risk_assessment: assess_risks(response, input.age),
        alternatives: alternative_protocols(protocol, response),
        contraindications,
        special_considerations: special_considerations(input),
        clinical_guidance: ClinicalGuidance::default(),
        evidence_level: EVIDENCE_LEVEL.to_string(),
    };

    tracing::info!(
        protocol = plan.protocol.name.as_str(),
        starting_dose = plan.medications.gonadotropins.starting_dose,
        "stimulation planned"
    );

    plan
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clinical::Conditions;
    use crate::stimulation::types::{OvarianReserveMarkers, Preferences, ResponseCategory};

    fn sample_input() -> StimulationInput {
        StimulationInput {
            markers: OvarianReserveMarkers {
                amh: Some(2.5),
                afc: Some(12.0),
            },
            cycle_afc: None,
            fsh: Some(7.0),
            previous_oocytes: vec![],
            conditions: Conditions::default(),
            age: Some(32.0),
            bmi: Some(23.0),
            contraindications: vec!["Latex allergy".to_string()],
            preferences: Preferences::default(),
        }
    }

    #[test]
    fn test_high_reserve_plan() {
        // 3 + 2 + 2 = 7 -> high reserve, high responder
        let plan = plan_stimulation(&sample_input());
        assert_eq!(plan.ovarian_reserve, OvarianReserve::High);
        assert_eq!(plan.predictions.response_category, ResponseCategory::High);
        assert_eq!(plan.protocol.kind, ProtocolType::Antagonist);
        assert_eq!(plan.protocol.name, "Antagonist Stimulation Protocol");
        assert_eq!(plan.protocol.duration, 9);
        assert_eq!(plan.protocol.confidence, 0.93);
        assert_eq!(plan.medications.trigger.medication, "GnRH agonist (Lupron)");
        assert_eq!(plan.evidence_level, "A");
    }

    #[test]
    fn test_contraindications_caller_first() {
        let plan = plan_stimulation(&sample_input());
        assert_eq!(
            plan.contraindications,
            vec![
                "Latex allergy".to_string(),
                "Severe endometriosis requiring prolonged suppression".to_string(),
            ]
        );
    }

    #[test]
    fn test_poor_responder_gets_minimal_stimulation() {
        let mut input = sample_input();
        input.previous_oocytes = vec![3.0, 5.0];
        input.age = Some(41.0);

        let plan = plan_stimulation(&input);
        assert_eq!(plan.protocol.kind, ProtocolType::MinimalStimulation);
        assert_eq!(plan.protocol.duration, 12);
        assert!(plan.medications.suppression.is_none());
        assert_eq!(plan.monitoring.stimulation.len(), 5);
        assert_eq!(plan.risk_assessment.cancellation.probability, 0.25);
        assert_eq!(plan.special_considerations.len(), 1);
        // Starting dose ignores the response history: 150 + 50 + 25
        assert_eq!(plan.medications.gonadotropins.starting_dose, 225);
    }

    #[test]
    fn test_endometriosis_plan() {
        let mut input = sample_input();
        input.conditions.endometriosis = true;

        let plan = plan_stimulation(&input);
        assert_eq!(plan.protocol.kind, ProtocolType::LongAgonist);
        assert_eq!(
            plan.medications.suppression.as_ref().map(|s| s.medication.as_str()),
            Some("Leuprolide (Lupron)")
        );
        assert!(plan
            .alternatives
            .iter()
            .all(|a| a.name != "Long GnRH Agonist Protocol"));
    }

    #[test]
    fn test_plan_json_shape() {
        let json = serde_json::to_value(plan_stimulation(&sample_input())).unwrap();
        assert_eq!(json["protocol"]["type"], "antagonist");
        assert_eq!(json["ovarianReserve"], "high");
        assert_eq!(json["medications"]["gonadotropins"]["startingDose"], 150);
        assert_eq!(json["predictions"]["responseCategory"], "high");
        assert_eq!(json["riskAssessment"]["OHSS"]["risk"], "high");
        assert_eq!(json["clinicalGuidance"]["keyConsiderations"].as_array().map(|a| a.len()), Some(4));
    }
}
