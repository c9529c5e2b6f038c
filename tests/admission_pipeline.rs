//! Integration tests for the admission pipeline driven directly.

use std::sync::Arc;
use std::time::Duration;
use tagged_throttle::infrastructure::mocks::{MemorySink, MockClock};
use tagged_throttle::{
    hash, AdmissionPipeline, CallSite, SuppressReason, ThrottleLedger, ThrottleMode, Verdict,
};

fn pipeline_at(clock: &MockClock, sink: &MemorySink) -> AdmissionPipeline {
    AdmissionPipeline::builder()
        .with_clock(Arc::new(clock.clone()))
        .with_sink(Arc::new(sink.clone()))
        .build()
        .unwrap()
}

#[test]
fn test_hash_is_deterministic() {
    let first = hash("motor.c:120");
    for _ in 0..100 {
        assert_eq!(hash("motor.c:120"), first);
    }

    // Fixed values, independent of process or platform
    assert_eq!(hash("a"), 97);
    assert_eq!(hash("ab"), 97 * 131 + 98);
    assert_eq!(hash(""), 0);
    assert!(hash("a much longer string that overflows many times over") <= 0x7FFF_FFFF);
}

#[test]
fn test_tag_state_machine() {
    let pipeline = AdmissionPipeline::new();

    let a = pipeline.gatekeep("#A");
    assert!(!a.suppress);
    assert_eq!(a.display, "A");
    assert!(pipeline.is_restricted());

    assert!(pipeline.gatekeep("B").suppress);
    assert!(!pipeline.gatekeep("*C").suppress);

    let d = pipeline.gatekeep("~D");
    assert!(!d.suppress);
    assert!(!pipeline.is_restricted());

    assert!(!pipeline.gatekeep("E").suppress);
}

#[test]
fn test_exclude_keeps_tag_unmodified() {
    let pipeline = AdmissionPipeline::new();
    let v = pipeline.gatekeep("!NOISY");
    assert!(v.suppress);
    assert_eq!(v.display, "!NOISY");
}

#[test]
fn test_throttle_count_mode() {
    let clock = MockClock::at(2024, 5, 4, 12, 30, 0, 0);
    let sink = MemorySink::new();
    let pipeline = pipeline_at(&clock, &sink);

    let mut results = Vec::new();
    for _ in 0..5 {
        results.push(pipeline.admit("f.c", 10, 3));
        clock.advance(Duration::from_millis(100));
    }
    assert_eq!(results, vec![false, false, false, true, true]);
    assert!(sink.lines().is_empty());

    clock.advance(Duration::from_millis(500));
    assert!(!pipeline.admit("f.c", 10, 3));

    let lines = sink.lines();
    assert_eq!(lines.len(), 1);
    assert_eq!(
        lines[0],
        "W>05/04 12:30:01.000 {LOG} <f.c: 10> (-1000ms) discard times: 2\r\n"
    );
}

#[test]
fn test_throttle_interval_mode() {
    let clock = MockClock::at(2024, 5, 4, 12, 30, 0, 0);
    let sink = MemorySink::new();
    let pipeline = AdmissionPipeline::builder()
        .with_mode(ThrottleMode::Interval)
        .with_clock(Arc::new(clock.clone()))
        .with_sink(Arc::new(sink.clone()))
        .build()
        .unwrap();

    // 4 per second: one call per 250ms window
    assert!(!pipeline.admit("i.c", 7, 4));
    clock.advance(Duration::from_millis(100));
    assert!(pipeline.admit("i.c", 7, 4));
    clock.advance(Duration::from_millis(100));
    assert!(pipeline.admit("i.c", 7, 4));
    clock.advance(Duration::from_millis(100));
    assert!(!pipeline.admit("i.c", 7, 4));

    let lines = sink.lines();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].ends_with("<i.c: 7> (-300ms) discard times: 2\r\n"));
}

#[test]
fn test_eviction_restarts_oldest_site() {
    let clock = MockClock::at(2024, 5, 4, 8, 0, 0, 0);
    let sink = MemorySink::new();
    let pipeline = AdmissionPipeline::builder()
        .with_capacity(3)
        .with_clock(Arc::new(clock.clone()))
        .with_sink(Arc::new(sink.clone()))
        .build()
        .unwrap();

    // Saturate the first site
    assert!(!pipeline.admit("a.c", 1, 1));
    assert!(pipeline.admit("a.c", 1, 1));

    // Three more sites push it out
    for line in 2..=4 {
        assert!(!pipeline.admit("a.c", line, 1));
    }
    assert_eq!(pipeline.tracked_sites(), 3);
    assert_eq!(pipeline.metrics().records_evicted(), 1);

    // Within the same second, the evicted site is first-seen again
    assert!(!pipeline.admit("a.c", 1, 1));
    assert!(sink.lines().is_empty());
}

#[test]
fn test_ledger_eviction_reports_displaced_record() {
    let mut ledger = ThrottleLedger::new(2, ThrottleMode::Count);
    ledger.admit("a.c", 1, 5, 0).unwrap();
    ledger.admit("a.c", 2, 5, 0).unwrap();
    let third = ledger.admit("a.c", 3, 5, 0).unwrap();

    let evicted = third.evicted.expect("oldest record evicted");
    assert_eq!(evicted.line, 1);
    assert!(ledger.record_for("a.c", 1).is_none());
}

#[test]
fn test_clock_abbreviation() {
    let clock = MockClock::at(2024, 5, 4, 9, 15, 2, 40);
    let pipeline = pipeline_at(&clock, &MemorySink::new());

    let first = pipeline.now(false);
    clock.advance(Duration::from_millis(3_010));
    let second = pipeline.now(false);

    assert_eq!(first.text, "05/04 09:15:02.040");
    assert_eq!(second.text, "05.050");
    assert!(second.text.len() < first.text.len());

    clock.advance(Duration::from_secs(60));
    assert_eq!(pipeline.now(false).text, "05/04 09:16:05.050");
}

#[test]
fn test_ms_of_day_reading_is_full() {
    let clock = MockClock::at(2024, 5, 4, 0, 0, 1, 500);
    let pipeline = pipeline_at(&clock, &MemorySink::new());

    pipeline.now(false);
    let reading = pipeline.now(true);
    assert!(reading.is_full());
    assert_eq!(reading.ms_of_day, 1_500);
}

#[test]
fn test_bypass_is_idempotent() {
    let pipeline = AdmissionPipeline::new();
    for setup in ["A", "#A", "~A", "!A", "#B"] {
        pipeline.gatekeep(setup);
        let v = pipeline.gatekeep("*X");
        assert!(!v.suppress);
        assert_eq!(v.display, "X");
    }
}

#[test]
fn test_midnight_window_is_live() {
    let clock = MockClock::at(2024, 5, 4, 23, 59, 59, 800);
    let sink = MemorySink::new();
    let pipeline = pipeline_at(&clock, &sink);

    assert!(!pipeline.admit("m.c", 1, 1));
    clock.advance(Duration::from_millis(200));

    // Exactly midnight: still inside the window opened before it
    assert!(pipeline.admit("m.c", 1, 1));
    clock.advance(Duration::from_millis(900));

    // 1100ms since the window opened, across the day boundary
    assert!(!pipeline.admit("m.c", 1, 1));
    let lines = sink.lines();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].starts_with("W>05/05 00:00:00.900 {LOG}"));
    assert!(lines[0].ends_with("(-1100ms) discard times: 1\r\n"));
}

#[test]
fn test_check_composes_stages() {
    let clock = MockClock::at(2024, 5, 4, 9, 0, 0, 0);
    let pipeline = pipeline_at(&clock, &MemorySink::new());

    let verdicts: Vec<_> = [
        CallSite::new("!X", "c.rs", 1),
        CallSite::new("#NET", "c.rs", 2),
        CallSite::new("DISK", "c.rs", 3),
        CallSite::new("NET", "c.rs", 4),
        CallSite::new("*ALARM", "c.rs", 5).with_rate(1),
        CallSite::new("*ALARM", "c.rs", 5).with_rate(1),
    ]
    .iter()
    .map(|call| pipeline.check(call))
    .collect();

    assert_eq!(verdicts[0], Verdict::Suppressed(SuppressReason::Excluded));
    assert!(matches!(verdicts[1], Verdict::Emit { tag: "NET", privileged: false, .. }));
    assert_eq!(verdicts[2], Verdict::Suppressed(SuppressReason::Restricted));
    // Restricted mode admits only privileged or release tags
    assert_eq!(verdicts[3], Verdict::Suppressed(SuppressReason::Restricted));
    assert!(matches!(verdicts[4], Verdict::Emit { tag: "ALARM", privileged: true, .. }));
    assert_eq!(verdicts[5], Verdict::Suppressed(SuppressReason::Throttled));

    let snapshot = pipeline.metrics().snapshot();
    assert_eq!(snapshot.calls_allowed, 2);
    assert_eq!(snapshot.calls_gated, 3);
    assert_eq!(snapshot.calls_throttled, 1);
    assert_eq!(snapshot.total_calls(), 6);
}
