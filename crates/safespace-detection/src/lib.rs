//! # safespace-detection
//!
//! Text classification for GBV-related content: per-category keyword
//! lexicons, a pluggable toxicity model adapter, a TTL'd de-duplication
//! cache, and the classifier that composes all three into a single
//! [`safespace_core::DetectionResult`].
//!
//! Detection is total: every call returns a usable (possibly degraded)
//! result, never an error.

pub mod cache;
pub mod classifier;
pub mod lexicon;
pub mod model;
pub mod recommendations;

pub use cache::DetectionCache;
pub use classifier::Classifier;
pub use model::{LexiconToxicityModel, ModelError, ToxicityModel};
