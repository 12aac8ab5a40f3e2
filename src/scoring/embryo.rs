use serde::Serialize;

use super::factors::{clamp_unit, ScoreBreakdown};
use crate::clinical::{Embryo, Ploidy, Timelapse};

const MORPHOLOGY_WEIGHT: f64 = 0.4;
const EUPLOID_BONUS: f64 = 0.3;
const MOSAIC_BONUS: f64 = 0.1;
const TIMELAPSE_WEIGHT: f64 = 0.2;
const OPTIMAL_CULTURE_BONUS: f64 = 0.1;

/// Expected hours post insemination from 2-cell to blastocyst.
const REFERENCE_CLEAVAGE_HOURS: [f64; 5] = [25.0, 36.0, 60.0, 72.0, 96.0];
const TIMELAPSE_BASE: f64 = 0.5;
const TIMING_WEIGHT: f64 = 0.3;
const MORPHOKINETIC_WEIGHT: f64 = 0.2;

/// Morphology score for a Gardner grade code. Unknown codes score 0.5.
pub fn grade_score(grade: &str) -> f64 {
    match grade {
        "AA" | "4AA" => 1.0,
        "4AB" => 0.95,
        "AB" | "4BA" | "3AA" => 0.9,
        "BA" | "4BB" | "3AB" => 0.85,
        "BB" | "3BA" => 0.8,
        "3BB" => 0.75,
        "AC" => 0.7,
        "BC" => 0.65,
        "CA" => 0.6,
        "CB" => 0.55,
        "CC" => 0.5,
        _ => 0.5,
    }
}

/// Internal 0-1 score for morphokinetic data.
pub fn timelapse_score(timelapse: &Timelapse) -> f64 {
    let mut score = TIMELAPSE_BASE;

    // Observations past the last reference point are ignored.
    let deviations: Vec<f64> = timelapse
        .cleavage_timings
        .iter()
        .zip(REFERENCE_CLEAVAGE_HOURS.iter())
        .map(|(observed, reference)| (observed - reference).abs() / reference)
        .collect();
    if !deviations.is_empty() {
        let avg_deviation = deviations.iter().sum::<f64>() / deviations.len() as f64;
        score += (1.0 - avg_deviation) * TIMING_WEIGHT;
    }

    if let Some(morphokinetic) = timelapse.morphokinetic_score {
        score += morphokinetic * MORPHOKINETIC_WEIGHT;
    }

    clamp_unit(score)
}

/// Per-embryo quality score. Starts from zero; contributions sum to at most 1.
pub fn embryo_breakdown(embryo: &Embryo) -> ScoreBreakdown {
    let mut breakdown = ScoreBreakdown::new(0.0);

    if let Some(ref grade) = embryo.grade {
        let score = grade_score(grade);
        breakdown.apply(
            "Morphology",
            format!("grade {} = {} x {}", grade, score, MORPHOLOGY_WEIGHT),
            score * MORPHOLOGY_WEIGHT,
        );
    }

    if let Some(ref genetics) = embryo.genetics {
        let bonus = match genetics.ploidy {
            Ploidy::Euploid => EUPLOID_BONUS,
            Ploidy::Mosaic => MOSAIC_BONUS,
            Ploidy::Aneuploid | Ploidy::Unknown => 0.0,
        };
        if bonus > 0.0 {
            breakdown.apply(
                "Genetics",
                format!("{} -> {:+}", genetics.ploidy.as_str(), bonus),
                bonus,
            );
        }
    }

    if let Some(ref timelapse) = embryo.timelapse {
        let score = timelapse_score(timelapse);
        breakdown.apply(
            "Time-lapse",
            format!("morphokinetics {:.3} x {}", score, TIMELAPSE_WEIGHT),
            score * TIMELAPSE_WEIGHT,
        );
    }

    if embryo.optimal_culture {
        breakdown.apply(
            "Culture",
            format!("optimal conditions -> {:+}", OPTIMAL_CULTURE_BONUS),
            OPTIMAL_CULTURE_BONUS,
        );
    }

    // Contributions top out at exactly 1, but the f64 running sum can land a
    // rounding step above it.
    breakdown.clamped()
}

pub fn score_embryo(embryo: &Embryo) -> f64 {
    embryo_breakdown(embryo).score
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbryoCohortScore {
    /// Mean of the per-embryo scores (0 for an empty cohort)
    pub score: f64,
    pub per_embryo: Vec<f64>,
    /// Index of the highest scoring embryo; ties go to the earliest
    pub best: Option<usize>,
}

pub fn score_embryo_quality(embryos: &[Embryo]) -> EmbryoCohortScore {
    let per_embryo: Vec<f64> = embryos.iter().map(score_embryo).collect();

    let score = if per_embryo.is_empty() {
        0.0
    } else {
        per_embryo.iter().sum::<f64>() / per_embryo.len() as f64
    };

    let mut best: Option<usize> = None;
    for (i, s) in per_embryo.iter().enumerate() {
        match best {
            Some(b) if *s <= per_embryo[b] => {}
            _ => best = Some(i),
        }
    }

    EmbryoCohortScore {
        score,
        per_embryo,
        best,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DevelopmentalPotential {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl DevelopmentalPotential {
    pub fn from_score(score: f64) -> Self {
        if score > 0.8 {
            DevelopmentalPotential::Excellent
        } else if score > 0.6 {
            DevelopmentalPotential::Good
        } else if score > 0.4 {
            DevelopmentalPotential::Fair
        } else {
            DevelopmentalPotential::Poor
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DevelopmentalPotential::Excellent => "excellent",
            DevelopmentalPotential::Good => "good",
            DevelopmentalPotential::Fair => "fair",
            DevelopmentalPotential::Poor => "poor",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityAssessment {
    pub grade: Option<String>,
    pub morphology_score: f64,
    pub developmental_potential: DevelopmentalPotential,
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneticsAssessment {
    pub ploidy: Ploidy,
    pub specific_abnormalities: Vec<String>,
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbryoAssessment {
    pub embryo_id: String,
    pub quality: QualityAssessment,
    pub genetics: Option<GeneticsAssessment>,
    pub timelapse_parameters: Option<Timelapse>,
}

const QUALITY_CONFIDENCE: f64 = 0.9;
const GENETICS_CONFIDENCE: f64 = 0.95;

pub fn assess_individual_embryo(embryo: &Embryo) -> EmbryoAssessment {
    let score = score_embryo(embryo);

    EmbryoAssessment {
        embryo_id: embryo.id.clone(),
        quality: QualityAssessment {
            grade: embryo.grade.clone(),
            morphology_score: score,
            developmental_potential: DevelopmentalPotential::from_score(score),
            confidence: QUALITY_CONFIDENCE,
        },
        genetics: embryo.genetics.as_ref().map(|g| GeneticsAssessment {
            ploidy: g.ploidy,
            specific_abnormalities: g.abnormalities.clone(),
            confidence: GENETICS_CONFIDENCE,
        }),
        timelapse_parameters: embryo.timelapse.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clinical::Genetics;

    fn sample_embryo(grade: Option<&str>) -> Embryo {
        Embryo {
            id: "e1".to_string(),
            grade: grade.map(str::to_string),
            genetics: None,
            timelapse: None,
            optimal_culture: false,
            day: Some(5),
        }
    }

    fn genetics(ploidy: Ploidy) -> Option<Genetics> {
        Some(Genetics {
            ploidy,
            abnormalities: vec![],
        })
    }

    #[test]
    fn test_grade_table() {
        assert_eq!(grade_score("AA"), 1.0);
        assert_eq!(grade_score("AB"), 0.9);
        assert_eq!(grade_score("CC"), 0.5);
        assert_eq!(grade_score("4AA"), 1.0);
        assert_eq!(grade_score("4AB"), 0.95);
        assert_eq!(grade_score("3BB"), 0.75);
    }

    #[test]
    fn test_unknown_grade_defaults() {
        assert_eq!(grade_score("5AA"), 0.5);
        assert_eq!(grade_score("aa"), 0.5);
        assert_eq!(grade_score(""), 0.5);
    }

    #[test]
    fn test_top_embryo_without_timelapse() {
        let mut embryo = sample_embryo(Some("AA"));
        embryo.genetics = genetics(Ploidy::Euploid);
        embryo.optimal_culture = true;
        // 1.0 * 0.4 + 0.3 + 0.1
        assert!((score_embryo(&embryo) - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_ploidy_bonus() {
        let mut embryo = sample_embryo(Some("BB"));
        embryo.genetics = genetics(Ploidy::Mosaic);
        assert!((score_embryo(&embryo) - 0.42).abs() < 1e-9);

        embryo.genetics = genetics(Ploidy::Aneuploid);
        assert!((score_embryo(&embryo) - 0.32).abs() < 1e-9);
    }

    #[test]
    fn test_embryo_without_grade_scores_zero_morphology() {
        let embryo = sample_embryo(None);
        assert_eq!(score_embryo(&embryo), 0.0);
    }

    #[test]
    fn test_timelapse_perfect_timings() {
        let timelapse = Timelapse {
            cleavage_timings: REFERENCE_CLEAVAGE_HOURS.to_vec(),
            morphokinetic_score: Some(1.0),
            deselection_markers: vec![],
        };
        // 0.5 + 1.0 * 0.3 + 1.0 * 0.2
        assert_eq!(timelapse_score(&timelapse), 1.0);
    }

    #[test]
    fn test_timelapse_deviation() {
        let timelapse = Timelapse {
            // 10% and 0% deviation -> average 5%
            cleavage_timings: vec![27.5, 36.0],
            morphokinetic_score: None,
            deselection_markers: vec![],
        };
        assert!((timelapse_score(&timelapse) - (0.5 + 0.95 * 0.3)).abs() < 1e-9);
    }

    #[test]
    fn test_timelapse_extra_timings_ignored() {
        let mut timings = REFERENCE_CLEAVAGE_HOURS.to_vec();
        timings.push(500.0);
        let timelapse = Timelapse {
            cleavage_timings: timings,
            morphokinetic_score: None,
            deselection_markers: vec![],
        };
        assert!((timelapse_score(&timelapse) - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_timelapse_empty_timings_keeps_base() {
        let timelapse = Timelapse {
            cleavage_timings: vec![],
            morphokinetic_score: Some(0.5),
            deselection_markers: vec![],
        };
        assert!((timelapse_score(&timelapse) - 0.6).abs() < 1e-9);
    }

    #[test]
    fn test_timelapse_wild_timings_clamp_to_zero() {
        let timelapse = Timelapse {
            cleavage_timings: vec![250.0, 360.0],
            morphokinetic_score: None,
            deselection_markers: vec![],
        };
        assert_eq!(timelapse_score(&timelapse), 0.0);
    }

    #[test]
    fn test_full_marks_embryo() {
        let embryo = Embryo {
            id: "best".to_string(),
            grade: Some("4AA".to_string()),
            genetics: genetics(Ploidy::Euploid),
            timelapse: Some(Timelapse {
                cleavage_timings: REFERENCE_CLEAVAGE_HOURS.to_vec(),
                morphokinetic_score: Some(1.0),
                deselection_markers: vec![],
            }),
            optimal_culture: true,
            day: Some(5),
        };
        let breakdown = embryo_breakdown(&embryo);
        assert!((breakdown.score - 1.0).abs() < 1e-9);
        assert!(breakdown.score <= 1.0);
        let summed = breakdown.factors.last().unwrap().after;
        assert!((summed - breakdown.score).abs() < 1e-9);
    }

    #[test]
    fn test_cohort_mean_and_best() {
        let mut first = sample_embryo(Some("AA"));
        first.id = "first".to_string();
        let mut second = sample_embryo(Some("AA"));
        second.id = "second".to_string();
        second.genetics = genetics(Ploidy::Euploid);
        let third = sample_embryo(Some("CC"));

        let cohort = score_embryo_quality(&[first, second, third]);
        assert_eq!(cohort.per_embryo.len(), 3);
        assert!((cohort.score - (0.4 + 0.7 + 0.2) / 3.0).abs() < 1e-9);
        assert_eq!(cohort.best, Some(1));
    }

    #[test]
    fn test_cohort_ties_go_to_first() {
        let embryos = vec![
            sample_embryo(Some("AB")),
            sample_embryo(Some("AB")),
            sample_embryo(Some("AB")),
        ];
        assert_eq!(score_embryo_quality(&embryos).best, Some(0));
    }

    #[test]
    fn test_empty_cohort() {
        let cohort = score_embryo_quality(&[]);
        assert_eq!(cohort.score, 0.0);
        assert_eq!(cohort.best, None);
    }

    #[test]
    fn test_cohort_score_in_unit_range() {
        let grades = ["AA", "4AB", "3BB", "CC", "ZZ"];
        let ploidies = [Ploidy::Euploid, Ploidy::Mosaic, Ploidy::Aneuploid, Ploidy::Unknown];
        let mut embryos = Vec::new();
        for grade in grades {
            for ploidy in ploidies {
                let mut embryo = sample_embryo(Some(grade));
                embryo.genetics = genetics(ploidy);
                embryo.optimal_culture = true;
                embryo.timelapse = Some(Timelapse {
                    cleavage_timings: vec![20.0, 40.0],
                    morphokinetic_score: Some(0.9),
                    deselection_markers: vec![],
                });
                embryos.push(embryo);
            }
        }
        for score in &score_embryo_quality(&embryos).per_embryo {
            assert!((0.0..=1.0).contains(score));
        }
    }

    #[test]
    fn test_developmental_potential_thresholds() {
        assert_eq!(DevelopmentalPotential::from_score(0.81), DevelopmentalPotential::Excellent);
        assert_eq!(DevelopmentalPotential::from_score(0.8), DevelopmentalPotential::Good);
        assert_eq!(DevelopmentalPotential::from_score(0.5), DevelopmentalPotential::Fair);
        assert_eq!(DevelopmentalPotential::from_score(0.4), DevelopmentalPotential::Poor);
    }

    #[test]
    fn test_assess_individual_embryo() {
        let mut embryo = sample_embryo(Some("AA"));
        embryo.genetics = Some(Genetics {
            ploidy: Ploidy::Mosaic,
            abnormalities: vec!["+21 (low level)".to_string()],
        });

        let assessment = assess_individual_embryo(&embryo);
        assert_eq!(assessment.embryo_id, "e1");
        assert!((assessment.quality.morphology_score - 0.5).abs() < 1e-9);
        assert_eq!(
            assessment.quality.developmental_potential,
            DevelopmentalPotential::Fair
        );
        let genetics = assessment.genetics.unwrap();
        assert_eq!(genetics.ploidy, Ploidy::Mosaic);
        assert_eq!(genetics.specific_abnormalities.len(), 1);
        assert!(assessment.timelapse_parameters.is_none());
    }
}
