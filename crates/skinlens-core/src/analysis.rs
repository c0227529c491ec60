//! Skin analysis results and their presentation

use serde::{Deserialize, Serialize};

use crate::types::{AnalysisRecord, Product};

/// Message fragment the inference service uses to flag a referral
const REFERRAL_PHRASE: &str = "consult a dermatologist";

/// Classification returned by the inference endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Detected skin condition
    pub condition: String,

    /// Model confidence in `0.0..=1.0`
    pub confidence: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Products recommended for the detected condition
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub products: Option<Vec<Product>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendation_type: Option<String>,
}

impl AnalysisResult {
    pub fn confidence_display(&self) -> ConfidenceDisplay {
        ConfidenceDisplay::from_confidence(self.confidence)
    }

    /// Low confidence or an explicit referral in the message
    pub fn is_critical(&self) -> bool {
        self.confidence_display().percent() < 50.0
            || self
                .message
                .as_deref()
                .is_some_and(|m| m.contains(REFERRAL_PHRASE))
    }

    pub fn recommended_products(&self) -> &[Product] {
        self.products.as_deref().unwrap_or_default()
    }

    /// Record persisted to `/analysis-results/` for a stored image
    pub fn to_record(&self, image_id: i64) -> AnalysisRecord {
        AnalysisRecord {
            image_id,
            condition: self.condition.clone(),
            confidence: self.confidence,
            recommendation_type: self.recommendation_type.clone(),
            message: self.message.clone(),
        }
    }
}

/// Analysis result merged with the server-side image reference, if any
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisOutcome {
    #[serde(flatten)]
    pub result: AnalysisResult,
    pub image_id: Option<i64>,
    pub image_url: Option<String>,
}

/// Colour band of the confidence indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Indicator {
    /// Below 50%
    Warning,
    /// 50% up to (not including) 80%
    Caution,
    /// 80% and above
    Success,
}

impl Indicator {
    pub fn color(&self) -> &'static str {
        match self {
            Indicator::Warning => "red",
            Indicator::Caution => "yellow",
            Indicator::Success => "green",
        }
    }
}

/// Confidence formatted for display
#[derive(Debug, Clone, PartialEq)]
pub struct ConfidenceDisplay {
    /// Percentage with two decimals, e.g. `"42.00"`
    pub percentage: String,
    pub indicator: Indicator,
}

impl ConfidenceDisplay {
    pub fn from_confidence(confidence: f64) -> Self {
        let percentage = format!("{:.2}", confidence * 100.0);
        // Thresholds apply to the rounded figure the user sees
        let shown: f64 = percentage.parse().unwrap_or(0.0);

        let indicator = if shown >= 80.0 {
            Indicator::Success
        } else if shown >= 50.0 {
            Indicator::Caution
        } else {
            Indicator::Warning
        };

        Self {
            percentage,
            indicator,
        }
    }

    pub fn percent(&self) -> f64 {
        self.percentage.parse().unwrap_or(0.0)
    }
}

impl std::fmt::Display for ConfidenceDisplay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}%", self.percentage)
    }
}
