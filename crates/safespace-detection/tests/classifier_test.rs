//! Classifier behavior tests: short-circuit, cache idempotence, channel
//! sensitivity, degraded modes, and the scoring invariants.

use safespace_core::config::DetectionConfig;
use safespace_core::detection::{Category, ChannelType, DetectionSeverity};
use safespace_detection::model::{ModelError, ToxicityModel};
use safespace_detection::Classifier;

// ═══════════════════════════════════════════════════════════════════════════
// SHORT-CIRCUIT: text under 3 non-whitespace chars scores zero everywhere
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn short_text_is_unflagged_with_zero_scores() {
    let classifier = Classifier::new();
    for text in ["", " ", "a", "ab", " a b "] {
        let result = classifier.analyze(text, None, ChannelType::Public);
        assert!(!result.flagged, "{text:?}");
        assert_eq!(result.scores.toxicity, 0.0);
        assert_eq!(result.scores.overall_gbv, 0.0);
        assert_eq!(result.confidence, 0.0);
        assert!(result.categories.is_empty());
    }
}

#[test]
fn short_text_is_still_cached() {
    let classifier = Classifier::new();
    let first = classifier.analyze("ab", Some("u1"), ChannelType::Public);
    assert!(!first.from_cache);
    let second = classifier.analyze("ab", Some("u1"), ChannelType::Public);
    assert!(second.from_cache);
}

// ═══════════════════════════════════════════════════════════════════════════
// CACHE: identical (text, user) within TTL returns identical scores
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn repeated_analysis_hits_cache_with_identical_scores() {
    let classifier = Classifier::new();
    let text = "you should watch yourself, or else";

    let first = classifier.analyze(text, Some("u7"), ChannelType::Private);
    assert!(!first.from_cache);

    let second = classifier.analyze(text, Some("u7"), ChannelType::Private);
    assert!(second.from_cache);
    assert_eq!(second.scores, first.scores);
    assert_eq!(second.flagged, first.flagged);
    assert_eq!(second.severity, first.severity);
    assert_eq!(second.text_hash, first.text_hash);
}

#[test]
fn different_users_do_not_share_cache_entries() {
    let classifier = Classifier::new();
    let text = "totally fine message";
    classifier.analyze(text, Some("u1"), ChannelType::Public);
    let other = classifier.analyze(text, Some("u2"), ChannelType::Public);
    assert!(!other.from_cache);
}

// ═══════════════════════════════════════════════════════════════════════════
// CHANNEL SENSITIVITY: private contexts flag at lower thresholds
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn gbv_quarter_score_flags_dm_but_not_public() {
    // One harassment keyword at weight 0.25 → overall_gbv = 0.25, which
    // sits between the private (0.2) and public (0.3) GBV thresholds.
    let config = DetectionConfig {
        gbv_keyword_weight: 0.25,
        ..DetectionConfig::default()
    };
    let text = "that guy is creepy";

    let public = Classifier::with_config(config.clone()).analyze(text, None, ChannelType::Public);
    assert_eq!(public.scores.overall_gbv, 0.25);
    assert!(!public.flagged);

    let dm = Classifier::with_config(config).analyze(text, None, ChannelType::Dm);
    assert_eq!(dm.scores.overall_gbv, 0.25);
    assert!(dm.flagged);
}

#[test]
fn unknown_channel_uses_protective_thresholds() {
    let config = DetectionConfig {
        gbv_keyword_weight: 0.25,
        ..DetectionConfig::default()
    };
    let result =
        Classifier::with_config(config).analyze("that guy is creepy", None, ChannelType::Unknown);
    assert!(result.flagged);
}

// ═══════════════════════════════════════════════════════════════════════════
// SCORING INVARIANTS
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn overall_gbv_is_max_of_subcategories() {
    let classifier = Classifier::new();
    // Two threat phrases (0.8) and one harassment keyword (0.4).
    let result = classifier.analyze(
        "you'll regret this, I'll teach you a lesson, stop being so creepy",
        None,
        ChannelType::Public,
    );
    assert_eq!(result.scores.threats, 0.8);
    assert_eq!(result.scores.harassment, 0.4);
    assert_eq!(result.scores.overall_gbv, 0.8);
}

#[test]
fn confidence_is_max_of_toxicity_and_gbv() {
    let classifier = Classifier::new();
    let result = classifier.analyze("you are so stupid and creepy", None, ChannelType::Public);
    assert_eq!(result.scores.toxicity, 0.5);
    assert_eq!(result.scores.overall_gbv, 0.4);
    assert_eq!(result.confidence, 0.5);
}

#[test]
fn categories_listed_in_fixed_order_without_overall_gbv() {
    let classifier = Classifier::new();
    let result = classifier.analyze(
        "you stupid idiot, you'll regret this, stop being creepy",
        None,
        ChannelType::Public,
    );
    // toxicity 1.0, harassment 0.4, threats 0.4 — all >= 0.3.
    assert_eq!(
        result.categories,
        vec![Category::Toxicity, Category::Harassment, Category::Threats]
    );
    assert!(!result.categories.contains(&Category::OverallGbv));
}

// ═══════════════════════════════════════════════════════════════════════════
// END-TO-END SCENARIO: "I hate you, you're stupid" in a public channel
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn hostile_public_message_is_flagged_high() {
    let classifier = Classifier::new();
    let result = classifier.analyze("I hate you, you're stupid", Some("u42"), ChannelType::Public);

    assert!(result.scores.toxicity > 0.0);
    assert!(result.flagged);
    assert_eq!(result.severity, DetectionSeverity::High);
    assert!(result.categories.contains(&Category::Toxicity));
    assert!(result.error.is_none());
}

// ═══════════════════════════════════════════════════════════════════════════
// DEGRADED MODES: missing or failing model never fails the request
// ═══════════════════════════════════════════════════════════════════════════

struct FailingModel;

impl ToxicityModel for FailingModel {
    fn name(&self) -> &'static str {
        "failing"
    }

    fn score(&self, _text: &str) -> Result<f64, ModelError> {
        Err(ModelError::Timeout { timeout_ms: 500 })
    }
}

#[test]
fn missing_model_scores_toxicity_zero_but_gbv_still_works() {
    let classifier = Classifier::without_model(DetectionConfig::default());
    let result = classifier.analyze(
        "I hate you and I will hurt you if you tell anyone",
        None,
        ChannelType::Public,
    );
    assert_eq!(result.scores.toxicity, 0.0);
    assert!(result.scores.overall_gbv > 0.0);
    assert!(result.flagged); // "hurt you" alone clears the public GBV bar
}

#[test]
fn failing_model_degrades_and_records_error() {
    let classifier = Classifier::with_model(DetectionConfig::default(), Box::new(FailingModel));
    let result = classifier.analyze("completely harmless message", None, ChannelType::Public);
    assert_eq!(result.scores.toxicity, 0.0);
    assert!(!result.flagged);
    assert!(result.error.as_deref().unwrap().contains("timed out"));
}

// ═══════════════════════════════════════════════════════════════════════════
// LIVE TUNING
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn threshold_update_applies_to_subsequent_calls() {
    let classifier = Classifier::new();
    let relaxed = classifier.analyze("that guy is creepy", None, ChannelType::Public);
    assert!(relaxed.flagged); // 0.4 > 0.3 default public GBV threshold

    let mut config = classifier.config();
    config.public_gbv_threshold = 0.9;
    classifier.update_config(config);

    // New text so the cache does not mask the new threshold.
    let strict = classifier.analyze("that other guy is creepy", None, ChannelType::Public);
    assert!(!strict.flagged);
}
