//! # safespace-core
//!
//! Foundation crate for the SafeSpace content-safety pipeline.
//! Defines all types, errors, config, and constants.
//! Every other crate in the workspace depends on this.

pub mod audit;
pub mod config;
pub mod constants;
pub mod detection;
pub mod errors;
pub mod report;

// Re-export the most commonly used types at the crate root.
pub use audit::{AuditAction, AuditEntry};
pub use config::{DetectionConfig, RetentionConfig};
pub use detection::{Category, CategoryScores, ChannelType, DetectionResult, DetectionSeverity};
pub use errors::{SafespaceError, SafespaceResult};
pub use report::{
    NewReport, Report, ReportFilter, ReportPatch, ReportSeverity, ReportSource, ReportStatus,
};
