//! The classifier: lexicon scorer + toxicity model + cache composed into
//! one `analyze` entry point.

use std::sync::RwLock;

use chrono::Utc;

use safespace_core::constants::MIN_ANALYZABLE_CHARS;
use safespace_core::detection::{
    Category, CategoryScores, ChannelType, DetectionResult, DetectionSeverity,
};
use safespace_core::DetectionConfig;

use crate::cache::DetectionCache;
use crate::lexicon::{self, PreparedText};
use crate::model::{LexiconToxicityModel, ToxicityModel};

/// Scores a message across toxicity and GBV sub-categories and decides
/// whether to flag it. Explicitly constructed and owned by the process
/// lifecycle — no ambient global state.
pub struct Classifier {
    config: RwLock<DetectionConfig>,
    cache: DetectionCache,
    model: Option<Box<dyn ToxicityModel>>,
}

impl Classifier {
    /// Classifier with default config and the built-in lexicon toxicity
    /// model.
    pub fn new() -> Self {
        Self::with_config(DetectionConfig::default())
    }

    pub fn with_config(config: DetectionConfig) -> Self {
        let cache = DetectionCache::new(config.cache_ttl_secs, config.cache_max_entries);
        let model = LexiconToxicityModel::new(config.toxicity_keyword_weight);
        Self {
            config: RwLock::new(config),
            cache,
            model: Some(Box::new(model)),
        }
    }

    /// Swap in an external toxicity model adapter.
    pub fn with_model(config: DetectionConfig, model: Box<dyn ToxicityModel>) -> Self {
        let cache = DetectionCache::new(config.cache_ttl_secs, config.cache_max_entries);
        Self {
            config: RwLock::new(config),
            cache,
            model: Some(model),
        }
    }

    /// Degraded mode: no toxicity model loaded at all; toxicity scores 0.0.
    pub fn without_model(config: DetectionConfig) -> Self {
        let cache = DetectionCache::new(config.cache_ttl_secs, config.cache_max_entries);
        Self {
            config: RwLock::new(config),
            cache,
            model: None,
        }
    }

    /// Whether a toxicity model adapter is loaded.
    pub fn model_loaded(&self) -> bool {
        self.model.is_some()
    }

    /// Live-tune thresholds and weights. Cache TTL and the installed model
    /// are fixed at construction.
    pub fn update_config(&self, config: DetectionConfig) {
        let mut guard = self.config.write().unwrap_or_else(|e| e.into_inner());
        *guard = config;
    }

    pub fn config(&self) -> DetectionConfig {
        self.config
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Analyze a message. Total: always returns a result, degraded if
    /// need be, with any internal failure recorded in `result.error`.
    pub fn analyze(
        &self,
        text: &str,
        user_id: Option<&str>,
        channel_type: ChannelType,
    ) -> DetectionResult {
        let text_hash = DetectionCache::message_hash(text, user_id);

        if let Some(mut hit) = self.cache.get(&text_hash) {
            hit.from_cache = true;
            return hit;
        }

        let config = self.config();

        // Too short to score: unflagged zeros, still cached.
        if text.chars().filter(|c| !c.is_whitespace()).count() < MIN_ANALYZABLE_CHARS {
            let result = DetectionResult::empty(text_hash.clone(), channel_type);
            self.cache.insert(text_hash, result.clone());
            return result;
        }

        let prepared = PreparedText::new(text);
        let mut scores = CategoryScores::default();
        for (category, keywords) in lexicon::gbv_lexicons() {
            scores.set(
                category,
                lexicon::score(prepared.match_count(keywords), config.gbv_keyword_weight),
            );
        }

        let mut error = None;
        let toxicity = match &self.model {
            Some(model) => match model.score(text) {
                Ok(score) => score,
                Err(e) => {
                    tracing::warn!(
                        model = model.name(),
                        error = %e,
                        "toxicity model failed; degrading to 0.0"
                    );
                    error = Some(e.to_string());
                    0.0
                }
            },
            None => 0.0,
        };
        scores.set(Category::Toxicity, toxicity);
        scores.finalize();

        let confidence = scores.confidence();
        let flagged = if channel_type.is_public() {
            scores.toxicity > config.public_toxicity_threshold
                || scores.overall_gbv > config.public_gbv_threshold
        } else {
            scores.toxicity > config.private_toxicity_threshold
                || scores.overall_gbv > config.private_gbv_threshold
        };

        let categories: Vec<Category> = Category::SCORED
            .iter()
            .copied()
            .filter(|c| scores.get(*c) >= 0.3)
            .collect();

        let result = DetectionResult {
            text_hash: text_hash.clone(),
            scores,
            flagged,
            confidence,
            severity: DetectionSeverity::from_confidence(confidence),
            categories,
            channel_type,
            from_cache: false,
            error,
            created_at: Utc::now(),
        };

        self.cache.insert(text_hash, result.clone());
        result
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new()
    }
}
