/// SafeSpace system version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Minimum number of non-whitespace characters before a message is scored.
pub const MIN_ANALYZABLE_CHARS: usize = 3;

/// Detection cache entry lifetime in seconds (30 minutes).
pub const DETECTION_CACHE_TTL_SECS: u64 = 30 * 60;

/// Maximum entries held by the detection cache.
pub const DETECTION_CACHE_MAX_ENTRIES: u64 = 10_000;

/// Hard cap on the `limit` parameter of report listings.
pub const MAX_LIST_LIMIT: usize = 100;

/// Default number of days a report is retained before retention purge.
pub const DEFAULT_REPORT_RETENTION_DAYS: u64 = 90;

/// Default number of days an audit entry is retained.
pub const DEFAULT_AUDIT_RETENTION_DAYS: u64 = 365;
