//! Walk through tag sigils and call-site throttling.
//!
//! The first half drives the pipeline directly with a small logging macro,
//! printing lines in the `L>timestamp {TAG} <func:line> message` format. The
//! second half plugs the same pipeline into `tracing` as a per-layer filter.

use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tagged_throttle::{AdmissionFilter, AdmissionPipeline, CallSite, LogLine, Verdict};
use tracing_subscriber::prelude::*;

/// Log through the pipeline the way a C-style logging macro would.
macro_rules! log_at {
    ($pipeline:expr, $level:literal, $tag:expr, $hz:expr, $($arg:tt)+) => {{
        let line = u16::try_from(line!()).unwrap_or(u16::MAX);
        let call = CallSite::new($tag, file!(), line).with_rate($hz);
        if let Verdict::Emit { tag, timestamp, .. } = $pipeline.check(&call) {
            let message = format!($($arg)+);
            print!(
                "{}",
                LogLine {
                    level: $level,
                    timestamp: &timestamp.text,
                    tag,
                    func: module_path!(),
                    line: line!(),
                    message: &message,
                }
            );
        }
    }};
}

fn tips(pipeline: &AdmissionPipeline, kind: u8) {
    let tag = "*LOG_TIPS";
    match kind {
        0 => log_at!(pipeline, 'V', tag, 0, "normal out"),
        1 => log_at!(pipeline, 'V', tag, 0, "only out '#Tag'"),
        2 => log_at!(pipeline, 'V', tag, 0, "should output, but it was limited"),
        3 => log_at!(pipeline, 'V', tag, 0, "privilege out '*Tag'"),
        4 => log_at!(pipeline, 'V', tag, 0, "free out '~Tag'"),
        _ => log_at!(pipeline, 'E', tag, 0, "unknown type"),
    }
}

fn sigils(pipeline: &AdmissionPipeline) {
    println!("=== Tag sigils ===\n");

    tips(pipeline, 0);
    log_at!(pipeline, 'I', "MAIN-1", 0, "Result: {}", 3 + 5);

    tips(pipeline, 1);
    log_at!(pipeline, 'I', "#MAIN-2", 0, "Result: {}", (3 - 6) - 5);

    // Restricted: an untagged call is dropped
    tips(pipeline, 2);
    log_at!(pipeline, 'I', "MAIN-3", 0, "Result: {}", 3 + 5);

    tips(pipeline, 3);
    log_at!(pipeline, 'D', "*MAIN-4", 0, "Result: {}", 7 - 5);

    tips(pipeline, 4);
    log_at!(pipeline, 'I', "~MAIN-5", 0, "Result: {}", 7 - 5);

    log_at!(pipeline, 'W', "!MAIN-6", 0, "never printed");
    println!();
}

fn sample(pipeline: &AdmissionPipeline, n: u32) {
    log_at!(pipeline, 'I', "SENSOR", 3, "sample {}", n);
}

fn throttling(pipeline: &AdmissionPipeline) {
    println!("=== Throttling: 3 per second, 20 calls in 2 seconds ===\n");

    for i in 0..20 {
        sample(pipeline, i);
        thread::sleep(Duration::from_millis(100));
    }
    // The same site again after its window expired: the summary comes first
    thread::sleep(Duration::from_millis(1_100));
    sample(pipeline, 20);
    println!();
}

fn with_tracing(pipeline: Arc<AdmissionPipeline>) {
    println!("=== Through tracing ===\n");

    let filter = AdmissionFilter::new(pipeline).with_default_rate(2);
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_filter(filter))
        .init();

    for i in 0..5 {
        tracing::info!(target: "MOTOR", rpm = 1200 + i, "motor running");
    }
    tracing::warn!(target: "#NET", log_hz = 0, "focusing on NET");
    tracing::info!(target: "DISK", "hidden while focused");
    tracing::error!(target: "*ALARM", "privileged calls still pass");
    tracing::info!(target: "~NET", "released");
    tracing::info!(target: "DISK", "visible again");
}

fn main() {
    let pipeline = Arc::new(AdmissionPipeline::new());

    sigils(&pipeline);
    throttling(&pipeline);
    with_tracing(Arc::clone(&pipeline));

    let snapshot = pipeline.metrics().snapshot();
    println!("\n=== Metrics ===");
    println!("Allowed:   {}", snapshot.calls_allowed);
    println!("Gated:     {}", snapshot.calls_gated);
    println!("Throttled: {}", snapshot.calls_throttled);
    println!("Summaries: {}", snapshot.summaries_emitted);
}
