//! Per-category keyword lexicons and the scoring math over them.
//!
//! Single-token keywords match whole words only (so "die" never fires on
//! "diet"); multi-word phrases match as substrings of the lowercased text.
//! Each keyword contributes at most once, and a category score is capped
//! at 1.0 regardless of match count.

use std::collections::HashSet;

use safespace_core::detection::Category;

// ── Harassment ─────────────────────────────────────────────────────────────
pub const HARASSMENT: &[&str] = &[
    "harass",
    "harassing",
    "harassment",
    "stalk",
    "stalking",
    "unwanted",
    "inappropriate touch",
    "groping",
    "following me",
    "won't leave me alone",
    "uncomfortable",
    "creepy",
    "bothering",
    "pestering",
    "intimidating",
    "msichana",
    "mrembo",
];

// ── Discrimination ─────────────────────────────────────────────────────────
pub const DISCRIMINATION: &[&str] = &[
    "because you're a woman",
    "girls can't",
    "men are better",
    "gender role",
    "gender roles",
    "stay in the kitchen",
    "stay in kitchen",
    "not for women",
    "too emotional",
    "weak woman",
    "female brain",
    "women driver",
    "women drivers",
    "mwanamke",
];

// ── Threats ────────────────────────────────────────────────────────────────
pub const THREATS: &[&str] = &[
    "hurt you",
    "teach you a lesson",
    "know your place",
    "regret this",
    "make you pay",
    "get what you deserve",
    "shut up",
    "or else",
    "watch yourself",
    "be sorry",
];

// ── Sexual ─────────────────────────────────────────────────────────────────
pub const SEXUAL: &[&str] = &[
    "sexual favor",
    "sexual favors",
    "sleep with",
    "dress code",
    "inappropriate comments",
    "sexy",
    "hot body",
    "nice legs",
    "what are you wearing",
    "send photo",
    "send photos",
    "private message",
    "alone time",
];

// ── Violence indicators ────────────────────────────────────────────────────
pub const VIOLENCE_INDICATORS: &[&str] = &[
    "hit",
    "slap",
    "slapped",
    "punch",
    "punched",
    "kick",
    "kicked",
    "push",
    "pushed",
    "shove",
    "shoved",
    "grab",
    "grabbed",
    "force",
    "forced",
    "violence",
    "violent",
    "hurt",
    "pain",
    "bruise",
    "bruises",
    "scared",
];

// ── Toxicity ───────────────────────────────────────────────────────────────
pub const TOXIC_PATTERNS: &[&str] = &[
    "stupid",
    "idiot",
    "bitch",
    "whore",
    "slut",
    "fuck you",
    "shut up",
    "kill yourself",
    "die",
    "hate you",
    "worthless",
    "ugly",
    "fat",
    "disgusting",
];

/// GBV category lexicons in fixed category order.
pub fn gbv_lexicons() -> [(Category, &'static [&'static str]); 5] {
    [
        (Category::Harassment, HARASSMENT),
        (Category::Discrimination, DISCRIMINATION),
        (Category::Threats, THREATS),
        (Category::Sexual, SEXUAL),
        (Category::ViolenceIndicators, VIOLENCE_INDICATORS),
    ]
}

/// Lowercased text plus its word set, computed once per message.
pub struct PreparedText {
    lower: String,
    words: HashSet<String>,
}

impl PreparedText {
    pub fn new(text: &str) -> Self {
        let lower = text.to_lowercase();
        let words = lower
            .split(|c: char| !c.is_alphanumeric() && c != '\'')
            .filter(|w| !w.is_empty())
            .map(|w| w.trim_matches('\'').to_string())
            .collect();
        Self { lower, words }
    }

    /// Whether a single keyword is present: whole-word for single tokens,
    /// substring for phrases.
    fn contains(&self, keyword: &str) -> bool {
        if keyword.contains(' ') {
            self.lower.contains(keyword)
        } else {
            self.words.contains(keyword)
        }
    }

    /// Number of distinct keywords from `keywords` present in the text.
    pub fn match_count(&self, keywords: &[&str]) -> usize {
        keywords.iter().filter(|k| self.contains(k)).count()
    }
}

/// `min(matches * weight, 1.0)` — keyword stuffing cannot push a category
/// past 1.0.
pub fn score(matches: usize, weight: f64) -> f64 {
    (matches as f64 * weight).min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phrase_keywords_match_as_substrings() {
        let text = PreparedText::new("If you tell anyone you'll regret this, or else.");
        assert_eq!(text.match_count(THREATS), 2);
    }

    #[test]
    fn single_tokens_match_whole_words_only() {
        let text = PreparedText::new("She went on a diet full of fatty food");
        assert_eq!(text.match_count(TOXIC_PATTERNS), 0);

        let text = PreparedText::new("just die already");
        assert_eq!(text.match_count(TOXIC_PATTERNS), 1);
    }

    #[test]
    fn keywords_count_once_each() {
        let text = PreparedText::new("stupid stupid stupid");
        assert_eq!(text.match_count(TOXIC_PATTERNS), 1);
    }

    #[test]
    fn apostrophe_phrases_match() {
        let text = PreparedText::new("he won't leave me alone at work");
        assert_eq!(text.match_count(HARASSMENT), 1);
    }

    #[test]
    fn score_caps_at_one() {
        assert_eq!(score(10, 0.4), 1.0);
        assert_eq!(score(1, 0.4), 0.4);
        assert_eq!(score(0, 0.4), 0.0);
    }
}
