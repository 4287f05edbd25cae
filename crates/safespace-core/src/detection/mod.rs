//! Detection result types: category scores, severity tiers, channel context.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Scored dimensions of a message. `OverallGbv` is derived, never scored
/// directly, and never appears in `DetectionResult::categories`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Toxicity,
    Harassment,
    Discrimination,
    Threats,
    Sexual,
    ViolenceIndicators,
    OverallGbv,
}

impl Category {
    /// All scored dimensions in fixed iteration order (excludes OverallGbv).
    pub const SCORED: [Category; 6] = [
        Category::Toxicity,
        Category::Harassment,
        Category::Discrimination,
        Category::Threats,
        Category::Sexual,
        Category::ViolenceIndicators,
    ];

    /// The GBV sub-categories that feed `overall_gbv` (excludes Toxicity).
    pub const GBV: [Category; 5] = [
        Category::Harassment,
        Category::Discrimination,
        Category::Threats,
        Category::Sexual,
        Category::ViolenceIndicators,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Toxicity => "toxicity",
            Category::Harassment => "harassment",
            Category::Discrimination => "discrimination",
            Category::Threats => "threats",
            Category::Sexual => "sexual",
            Category::ViolenceIndicators => "violence_indicators",
            Category::OverallGbv => "overall_gbv",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-category scores, each clamped to [0.0, 1.0].
///
/// `overall_gbv` is the max of the five GBV sub-categories — a single
/// strong signal must not be diluted by the absence of others — and
/// never includes toxicity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryScores {
    pub toxicity: f64,
    pub harassment: f64,
    pub discrimination: f64,
    pub threats: f64,
    pub sexual: f64,
    pub violence_indicators: f64,
    pub overall_gbv: f64,
}

impl CategoryScores {
    /// Score for a single category.
    pub fn get(&self, category: Category) -> f64 {
        match category {
            Category::Toxicity => self.toxicity,
            Category::Harassment => self.harassment,
            Category::Discrimination => self.discrimination,
            Category::Threats => self.threats,
            Category::Sexual => self.sexual,
            Category::ViolenceIndicators => self.violence_indicators,
            Category::OverallGbv => self.overall_gbv,
        }
    }

    /// Set a scored category (clamped). Setting `OverallGbv` directly is
    /// ignored; call [`CategoryScores::finalize`] instead.
    pub fn set(&mut self, category: Category, score: f64) {
        let score = score.clamp(0.0, 1.0);
        match category {
            Category::Toxicity => self.toxicity = score,
            Category::Harassment => self.harassment = score,
            Category::Discrimination => self.discrimination = score,
            Category::Threats => self.threats = score,
            Category::Sexual => self.sexual = score,
            Category::ViolenceIndicators => self.violence_indicators = score,
            Category::OverallGbv => {}
        }
    }

    /// Recompute `overall_gbv` as the max of the GBV sub-categories.
    pub fn finalize(&mut self) {
        self.overall_gbv = Category::GBV
            .iter()
            .map(|c| self.get(*c))
            .fold(0.0_f64, f64::max);
    }

    /// Overall confidence: max of toxicity and overall_gbv.
    pub fn confidence(&self) -> f64 {
        self.toxicity.max(self.overall_gbv)
    }
}

/// Severity tier of a detection, derived solely from confidence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetectionSeverity {
    #[default]
    Low,
    Medium,
    High,
}

impl DetectionSeverity {
    /// Fixed severity breakpoints: >0.8 high, >0.5 medium, else low.
    pub fn from_confidence(confidence: f64) -> Self {
        if confidence > 0.8 {
            DetectionSeverity::High
        } else if confidence > 0.5 {
            DetectionSeverity::Medium
        } else {
            DetectionSeverity::Low
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DetectionSeverity::Low => "low",
            DetectionSeverity::Medium => "medium",
            DetectionSeverity::High => "high",
        }
    }
}

impl fmt::Display for DetectionSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Conversation context of the analyzed message. Private contexts get more
/// protective thresholds since there are no bystander witnesses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelType {
    Public,
    Private,
    Dm,
    #[default]
    Unknown,
}

impl ChannelType {
    /// Whether the public (higher-bar) thresholds apply.
    pub fn is_public(self) -> bool {
        matches!(self, ChannelType::Public)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ChannelType::Public => "public",
            ChannelType::Private => "private",
            ChannelType::Dm => "dm",
            ChannelType::Unknown => "unknown",
        }
    }

    /// Lenient parse: anything unrecognized is Unknown.
    pub fn parse(s: &str) -> Self {
        match s {
            "public" => ChannelType::Public,
            "private" => ChannelType::Private,
            "dm" | "im" => ChannelType::Dm,
            _ => ChannelType::Unknown,
        }
    }
}

/// Unified output of the classifier. Total: a result is always produced,
/// possibly degraded, with any internal failure noted in `error`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionResult {
    /// Stable hash of (text, user), used as the cache key.
    pub text_hash: String,
    pub scores: CategoryScores,
    pub flagged: bool,
    /// max(toxicity, overall_gbv).
    pub confidence: f64,
    pub severity: DetectionSeverity,
    /// Scored dimensions with score >= 0.3, in fixed category order.
    pub categories: Vec<Category>,
    pub channel_type: ChannelType,
    pub from_cache: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl DetectionResult {
    /// An unflagged all-zero result (short-circuit for unanalyzable text).
    pub fn empty(text_hash: String, channel_type: ChannelType) -> Self {
        Self {
            text_hash,
            scores: CategoryScores::default(),
            flagged: false,
            confidence: 0.0,
            severity: DetectionSeverity::Low,
            categories: Vec::new(),
            channel_type,
            from_cache: false,
            error: None,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overall_gbv_is_max_not_sum() {
        let mut scores = CategoryScores::default();
        scores.set(Category::Harassment, 0.4);
        scores.set(Category::Threats, 0.6);
        scores.set(Category::Toxicity, 0.9);
        scores.finalize();
        assert_eq!(scores.overall_gbv, 0.6);
    }

    #[test]
    fn toxicity_never_feeds_overall_gbv() {
        let mut scores = CategoryScores::default();
        scores.set(Category::Toxicity, 1.0);
        scores.finalize();
        assert_eq!(scores.overall_gbv, 0.0);
        assert_eq!(scores.confidence(), 1.0);
    }

    #[test]
    fn scores_clamp_to_unit_interval() {
        let mut scores = CategoryScores::default();
        scores.set(Category::Sexual, 3.7);
        assert_eq!(scores.sexual, 1.0);
        scores.set(Category::Sexual, -0.2);
        assert_eq!(scores.sexual, 0.0);
    }

    #[test]
    fn severity_breakpoints() {
        assert_eq!(
            DetectionSeverity::from_confidence(0.81),
            DetectionSeverity::High
        );
        assert_eq!(
            DetectionSeverity::from_confidence(0.8),
            DetectionSeverity::Medium
        );
        assert_eq!(
            DetectionSeverity::from_confidence(0.51),
            DetectionSeverity::Medium
        );
        assert_eq!(
            DetectionSeverity::from_confidence(0.3),
            DetectionSeverity::Low
        );
    }

    #[test]
    fn channel_parse_is_lenient() {
        assert_eq!(ChannelType::parse("dm"), ChannelType::Dm);
        assert_eq!(ChannelType::parse("mpim"), ChannelType::Unknown);
    }
}
