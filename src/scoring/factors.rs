use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RangeOp {
    LessThan(f64),
    GreaterThan(f64),
    Between(f64, f64),  // Inclusive: low <= v <= high
    HalfOpen(f64, f64), // low <= v < high
    Any,
}

impl RangeOp {
    pub fn matches(&self, value: f64) -> bool {
        match self {
            RangeOp::LessThan(n) => value < *n,
            RangeOp::GreaterThan(n) => value > *n,
            RangeOp::Between(low, high) => value >= *low && value <= *high,
            RangeOp::HalfOpen(low, high) => value >= *low && value < *high,
            RangeOp::Any => true,
        }
    }
}

impl fmt::Display for RangeOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RangeOp::LessThan(n) => write!(f, "<{}", n),
            RangeOp::GreaterThan(n) => write!(f, ">{}", n),
            RangeOp::Between(low, high) => write!(f, "{}-{}", low, high),
            RangeOp::HalfOpen(low, high) => write!(f, ">={} <{}", low, high),
            RangeOp::Any => write!(f, "otherwise"),
        }
    }
}

/// One row of an additive lookup table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bracket {
    pub range: RangeOp,
    pub adjustment: f64,
}

impl Bracket {
    pub const fn new(range: RangeOp, adjustment: f64) -> Self {
        Self { range, adjustment }
    }
}

/// Find the bracket for `value`. First match wins.
pub fn match_bracket(value: f64, brackets: &[Bracket]) -> Option<&Bracket> {
    brackets.iter().find(|b| b.range.matches(value))
}

pub fn clamp_unit(value: f64) -> f64 {
    value.clamp(0.0, 1.0)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FactorContribution {
    pub label: String,       // e.g. "Age", "Transfer day"
    pub description: String, // e.g. "34 matched '<35' -> +0.2"
    pub before: f64,
    pub after: f64,
}

/// How a sub-score was reached, step by step.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    pub base_score: f64,
    pub factors: Vec<FactorContribution>,
    /// Final score, clamped to [0, 1]
    pub score: f64,
}

impl ScoreBreakdown {
    pub fn new(base_score: f64) -> Self {
        Self {
            base_score,
            factors: Vec::new(),
            score: base_score,
        }
    }

    /// Add `adjustment` to the running score and record it.
    pub fn apply(&mut self, label: &str, description: String, adjustment: f64) {
        let before = self.score;
        self.score += adjustment;
        self.factors.push(FactorContribution {
            label: label.to_string(),
            description,
            before,
            after: self.score,
        });
    }

    /// Apply the bracket `value` falls into, if any.
    pub fn apply_bracket(&mut self, label: &str, value: f64, brackets: &[Bracket]) {
        if let Some(bracket) = match_bracket(value, brackets) {
            let description = format!(
                "{} matched '{}' -> {:+}",
                value, bracket.range, bracket.adjustment
            );
            self.apply(label, description, bracket.adjustment);
        }
    }

    pub fn clamped(mut self) -> Self {
        self.score = clamp_unit(self.score);
        self
    }
}
