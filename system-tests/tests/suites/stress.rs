// system-tests/tests/suites/stress.rs
// ============================================================================
// Module: Stress Tests
// Description: Full-size generated run with default payloads and event logging.
// Purpose: Validate leak-freedom and a complete event trail at scale.
// Dependencies: system-tests helpers
// ============================================================================

//! ## Overview
//! Runs the configured number of heavy-load suites (3000 by default) with the
//! default payload sizes while logging every lifecycle event as JSON lines.
//! Invariants:
//! - Every case emits start, setup, mount, detach, and finish events.
//! - The document is empty once the run completes.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufRead;
use std::io::BufReader;
use std::io::BufWriter;
use std::sync::Arc;

use fixture_harness_app::DEFAULT_SUITE_LABEL;
use fixture_harness_app::Payload;
use fixture_harness_app::heavy_load_definition;
use fixture_harness_core::JsonLinesObserver;
use fixture_harness_core::LifecycleObserver;
use fixture_harness_core::ViewHost;
use fixture_harness_core::generate;
use helpers::artifacts::TestArtifacts;
use helpers::fixtures::observed_harness;
use system_tests::config::SystemTestConfig;

use crate::helpers;

#[test]
fn full_size_run_logs_every_transition() -> Result<(), Box<dyn std::error::Error>> {
    let config = SystemTestConfig::load()?;
    let artifacts = TestArtifacts::new("full_size_run_logs_every_transition")?;
    let log_path = artifacts.event_log_path();
    let log = Arc::new(JsonLinesObserver::new(BufWriter::new(File::create(&log_path)?)));
    let observer: Arc<dyn LifecycleObserver> = log.clone();
    let mut harness = observed_harness(Payload::default(), observer);

    generate(
        &mut harness.driver,
        &heavy_load_definition(harness.module.clone()),
        config.stress_suites,
        DEFAULT_SUITE_LABEL,
    );
    let report = harness.driver.run();
    artifacts.write_json("report.json", &report)?;

    assert_eq!(report.passed, config.stress_suites);
    assert_eq!(report.leaked_views, 0);
    assert_eq!(harness.compiler.live_views(), 0);
    assert_eq!(harness.compiler.live_scopes(), 0);
    assert_eq!(log.write_failures(), 0);

    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for line in BufReader::new(File::open(&log_path)?).lines() {
        let event: serde_json::Value = serde_json::from_str(&line?)?;
        let kind = event["event"].as_str().unwrap_or("unknown").to_string();
        *counts.entry(kind).or_default() += 1;
    }
    for kind in ["case_started", "setup_completed", "view_mounted", "view_detached", "case_finished"]
    {
        assert_eq!(counts.get(kind).copied(), Some(config.stress_suites), "{kind} count");
    }
    assert_eq!(counts.len(), 5, "unexpected events: {counts:?}");
    artifacts.finish(report.is_success())?;
    Ok(())
}
