//! Post-hoc interpretation of a risk probability.

use serde::{Deserialize, Serialize};

/// Probabilities below this are `Low`.
pub const MODERATE_THRESHOLD: f64 = 0.3;
/// Probabilities at or above this are `High`.
pub const HIGH_THRESHOLD: f64 = 0.7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
}

impl RiskLevel {
    /// Band for probability `p`. Each boundary belongs to the higher band.
    pub fn from_probability(p: f64) -> Self {
        if p < MODERATE_THRESHOLD {
            Self::Low
        } else if p < HIGH_THRESHOLD {
            Self::Moderate
        } else {
            Self::High
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Moderate => "Moderate",
            Self::High => "High",
        }
    }

    pub fn recommendation(&self) -> &'static str {
        match self {
            Self::Low => {
                "Your health indicators look great. Maintain your current lifestyle and regular checkups."
            }
            Self::Moderate => {
                "Some indicators suggest potential risks. Consider consulting a professional and reviewing your diet/exercise habits."
            }
            Self::High => {
                "High-risk indicators detected. We strongly recommend scheduling a comprehensive medical evaluation."
            }
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unrounded interpretation of a probability.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskAssessment {
    pub level: RiskLevel,
    /// Distance from the 0.5 decision boundary, scaled to [0, 1].
    pub confidence: f64,
    /// `(1 - p) * 100`.
    pub vitality: f64,
    pub recommendation: &'static str,
}

/// Interpret a positive-class probability. `p` must already lie in [0, 1].
pub fn interpret(p: f64) -> RiskAssessment {
    let level = RiskLevel::from_probability(p);
    RiskAssessment {
        level,
        confidence: (p - 0.5).abs() * 2.0,
        vitality: (1.0 - p) * 100.0,
        recommendation: level.recommendation(),
    }
}

/// The response shape returned to callers, with display rounding applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub risk_probability: f64,
    pub risk_level: RiskLevel,
    pub confidence: f64,
    pub vitality_score: f64,
    pub recommendation: String,
}

impl PredictionResult {
    /// Interpret `p` and round: probability and confidence to 4 dp, vitality to 2 dp.
    pub fn from_probability(p: f64) -> Self {
        let assessment = interpret(p);
        Self {
            risk_probability: round_dp(p, 4),
            risk_level: assessment.level,
            confidence: round_dp(assessment.confidence, 4),
            vitality_score: round_dp(assessment.vitality, 2),
            recommendation: assessment.recommendation.to_string(),
        }
    }
}

/// Round to `dp` decimal places using the exact binary value of `x`, so
/// 0.00035 (stored as 0.000349999...) rounds down to 0.0003.
pub fn round_dp(x: f64, dp: usize) -> f64 {
    format!("{x:.dp$}").parse().unwrap_or(x)
}
