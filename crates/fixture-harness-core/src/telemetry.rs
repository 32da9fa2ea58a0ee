// crates/fixture-harness-core/src/telemetry.rs
// ============================================================================
// Module: Lifecycle Telemetry
// Description: Observer hooks for fixture lifecycle transitions.
// Purpose: Emit structured lifecycle events without a logging dependency.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! Lifecycle operations report every transition to a [`LifecycleObserver`].
//! [`NoopObserver`] discards events; [`JsonLinesObserver`] writes one JSON
//! object per line to any writer. Observer failures never affect the case
//! being observed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::sync::Mutex;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;

use serde::Serialize;

// ============================================================================
// SECTION: Events
// ============================================================================

/// Lifecycle transition emitted by the fixture lifecycle and drivers.
///
/// # Invariants
/// - Variants and field names are stable for log consumers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum LifecycleEvent {
    /// A fresh context was created.
    CaseStarted {
        /// Case label.
        case: String,
    },
    /// Setup resolved collaborators and created the state root.
    SetupCompleted {
        /// Case label.
        case: String,
        /// Resolved capability names.
        collaborators: Vec<String>,
        /// Number of observed methods.
        observed: usize,
    },
    /// Setup failed.
    SetupFailed {
        /// Case label.
        case: String,
        /// Failure message.
        error: String,
    },
    /// A view was mounted.
    ViewMounted {
        /// Case label.
        case: String,
    },
    /// Mounting failed.
    MountFailed {
        /// Case label.
        case: String,
        /// Failure message.
        error: String,
    },
    /// Teardown detached the mounted view.
    ViewDetached {
        /// Case label.
        case: String,
    },
    /// Teardown found no mounted view.
    NothingMounted {
        /// Case label.
        case: String,
    },
    /// Teardown could not release a resource.
    TeardownFailed {
        /// Case label.
        case: String,
        /// Failure message.
        error: String,
    },
    /// A driver finished a case.
    CaseFinished {
        /// Case label.
        case: String,
        /// Outcome label (`passed`, `failed`, `skipped`).
        status: &'static str,
    },
}

// ============================================================================
// SECTION: Observer Trait
// ============================================================================

/// Receives lifecycle events.
pub trait LifecycleObserver: Send + Sync {
    /// Records a lifecycle event.
    fn record(&self, event: &LifecycleEvent);
}

/// Observer that discards every event.
///
/// # Invariants
/// - Events are intentionally discarded.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl LifecycleObserver for NoopObserver {
    fn record(&self, _event: &LifecycleEvent) {}
}

// ============================================================================
// SECTION: JSON Lines Observer
// ============================================================================

/// Observer that writes each event as a JSON line.
///
/// # Invariants
/// - Write failures are counted, never propagated.
pub struct JsonLinesObserver<W: Write + Send> {
    /// Destination writer.
    writer: Mutex<W>,
    /// Number of events that failed to serialize or write.
    failures: AtomicU64,
}

impl<W: Write + Send> JsonLinesObserver<W> {
    /// Creates an observer writing to `writer`.
    #[must_use]
    pub const fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
            failures: AtomicU64::new(0),
        }
    }

    /// Returns the number of events that could not be written.
    #[must_use]
    pub fn write_failures(&self) -> u64 {
        self.failures.load(Ordering::Relaxed)
    }

    /// Serializes and writes one event.
    fn write_event(&self, event: &LifecycleEvent) -> Result<(), String> {
        let mut line = serde_json::to_vec(event).map_err(|err| err.to_string())?;
        line.push(b'\n');
        let mut writer = self.writer.lock().map_err(|_| "event log lock poisoned".to_string())?;
        writer.write_all(&line).map_err(|err| err.to_string())?;
        writer.flush().map_err(|err| err.to_string())
    }
}

impl<W: Write + Send> LifecycleObserver for JsonLinesObserver<W> {
    fn record(&self, event: &LifecycleEvent) {
        if self.write_event(event).is_err() {
            self.failures.fetch_add(1, Ordering::Relaxed);
        }
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
