//! Aggregator integration tests against an in-memory store.

use std::sync::Arc;

use safespace_analytics::Aggregator;
use safespace_core::report::{
    NewReport, ReportPatch, ReportSeverity, ReportSource, ReportStatus,
};
use safespace_storage::ReportStore;

fn make_new_report(channel: &str, categories: &[&str]) -> NewReport {
    NewReport {
        encrypted_payload: format!("ss1.payload-{channel}"),
        channel_id: channel.to_string(),
        source: ReportSource::Web,
        severity: None,
        categories: categories.iter().map(|c| c.to_string()).collect(),
        metadata: serde_json::Map::new(),
    }
}

fn setup() -> (Arc<ReportStore>, Aggregator) {
    let store = Arc::new(ReportStore::open_in_memory().unwrap());
    let aggregator = Aggregator::new(Arc::clone(&store));
    (store, aggregator)
}

// ═══════════════════════════════════════════════════════════════════════════
// EMPTY STORE: every rollup tolerates zero reports
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn empty_store_yields_zeroed_stats() {
    let (_store, aggregator) = setup();

    let stats = aggregator.dashboard_stats().unwrap();
    assert_eq!(stats.total_reports, 0);
    assert_eq!(stats.pending_reports, 0);
    assert_eq!(stats.high_priority_reports, 0);
    assert_eq!(stats.reports_this_week, 0);
    assert_eq!(stats.resolution_rate, 0.0);

    assert!(aggregator.category_distribution().unwrap().is_empty());
    assert!(aggregator.severity_distribution().unwrap().is_empty());
    assert!(aggregator.trends(30).unwrap().is_empty());
}

// ═══════════════════════════════════════════════════════════════════════════
// DASHBOARD STATS
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn dashboard_counts_and_resolution_rate() {
    let (store, aggregator) = setup();

    let a = store.create(make_new_report("anon-a", &[]), None).unwrap();
    let b = store.create(make_new_report("anon-b", &[]), None).unwrap();
    store.create(make_new_report("anon-c", &[]), None).unwrap();
    store.create(make_new_report("anon-d", &[]), None).unwrap();

    store
        .update(
            &a.id,
            &ReportPatch {
                status: Some(ReportStatus::Resolved),
                severity: Some(ReportSeverity::High),
                ..Default::default()
            },
            None,
        )
        .unwrap();
    store
        .update(
            &b.id,
            &ReportPatch {
                status: Some(ReportStatus::Escalated),
                severity: Some(ReportSeverity::Critical),
                ..Default::default()
            },
            None,
        )
        .unwrap();

    let stats = aggregator.dashboard_stats().unwrap();
    assert_eq!(stats.total_reports, 4);
    assert_eq!(stats.pending_reports, 2);
    assert_eq!(stats.high_priority_reports, 2);
    assert_eq!(stats.reports_this_week, 4);
    assert!((stats.resolution_rate - 50.0).abs() < f64::EPSILON);
}

// ═══════════════════════════════════════════════════════════════════════════
// DISTRIBUTIONS
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn category_distribution_unnests_json_arrays() {
    let (store, aggregator) = setup();

    store
        .create(make_new_report("anon-e", &["harassment", "threats"]), None)
        .unwrap();
    store
        .create(make_new_report("anon-f", &["harassment"]), None)
        .unwrap();
    store.create(make_new_report("anon-g", &[]), None).unwrap();

    let dist = aggregator.category_distribution().unwrap();
    assert_eq!(dist.len(), 2);
    assert_eq!(dist[0].category, "harassment");
    assert_eq!(dist[0].count, 2);
    assert_eq!(dist[1].category, "threats");
    assert_eq!(dist[1].count, 1);
}

#[test]
fn severity_distribution_buckets_untriaged() {
    let (store, aggregator) = setup();

    let a = store.create(make_new_report("anon-h", &[]), None).unwrap();
    store.create(make_new_report("anon-i", &[]), None).unwrap();
    store.create(make_new_report("anon-j", &[]), None).unwrap();
    store
        .update(
            &a.id,
            &ReportPatch {
                severity: Some(ReportSeverity::Medium),
                ..Default::default()
            },
            None,
        )
        .unwrap();

    let dist = aggregator.severity_distribution().unwrap();
    assert_eq!(dist.len(), 2);
    assert_eq!(dist[0].severity, "untriaged");
    assert_eq!(dist[0].count, 2);
    assert_eq!(dist[1].severity, "medium");
    assert_eq!(dist[1].count, 1);
}

// ═══════════════════════════════════════════════════════════════════════════
// TRENDS
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn trends_bucket_todays_reports_together() {
    let (store, aggregator) = setup();

    store.create(make_new_report("anon-k", &[]), None).unwrap();
    store.create(make_new_report("anon-l", &[]), None).unwrap();

    let trend = aggregator.trends(7).unwrap();
    assert_eq!(trend.len(), 1);
    assert_eq!(trend[0].count, 2);
    assert_eq!(trend[0].date, chrono::Utc::now().format("%Y-%m-%d").to_string());
}

#[test]
fn trends_survive_an_oversized_window() {
    let (store, aggregator) = setup();
    store.create(make_new_report("anon-m", &[]), None).unwrap();

    // A window past i64::MAX must not wrap negative and match nothing.
    let trend = aggregator.trends(u64::MAX).unwrap();
    assert_eq!(trend.len(), 1);
    assert_eq!(trend[0].count, 1);
}
