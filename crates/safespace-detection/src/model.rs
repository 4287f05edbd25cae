//! Pluggable toxicity scorer. The classifier treats the model as optional:
//! absent or failing models degrade toxicity toward 0.0, they never fail
//! the calling request.

use crate::lexicon::{self, PreparedText};

/// Failure modes of a toxicity model. These degrade detection, they are
/// not surfaced as request errors.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("inference timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("inference failed: {reason}")]
    Inference { reason: String },
}

/// A toxicity probability scorer. Implementations own their timeout; a
/// call must return within a bounded interval, with `ModelError::Timeout`
/// on expiry.
pub trait ToxicityModel: Send + Sync {
    /// Human-readable adapter name, for logs and health checks.
    fn name(&self) -> &'static str;

    /// Toxicity probability in [0.0, 1.0] for the given text.
    fn score(&self, text: &str) -> Result<f64, ModelError>;
}

/// Built-in keyword model: `min(matches * weight, 1.0)` over the toxic
/// pattern lexicon. Synchronous and infallible, so it needs no timeout.
pub struct LexiconToxicityModel {
    weight: f64,
}

impl LexiconToxicityModel {
    pub fn new(weight: f64) -> Self {
        Self { weight }
    }
}

impl Default for LexiconToxicityModel {
    fn default() -> Self {
        Self::new(safespace_core::config::defaults::DEFAULT_TOXICITY_KEYWORD_WEIGHT)
    }
}

impl ToxicityModel for LexiconToxicityModel {
    fn name(&self) -> &'static str {
        "lexicon"
    }

    fn score(&self, text: &str) -> Result<f64, ModelError> {
        let prepared = PreparedText::new(text);
        Ok(lexicon::score(
            prepared.match_count(lexicon::TOXIC_PATTERNS),
            self.weight,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lexicon_model_scores_toxic_text() {
        let model = LexiconToxicityModel::default();
        let score = model.score("I hate you, you're stupid").unwrap();
        assert_eq!(score, 1.0); // "hate you" + "stupid", 2 * 0.5
    }

    #[test]
    fn lexicon_model_scores_clean_text() {
        let model = LexiconToxicityModel::default();
        assert_eq!(model.score("See you at the retro at 3pm").unwrap(), 0.0);
    }
}
