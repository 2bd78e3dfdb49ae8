//! Practice telemetry collector and helpers.
//!
//! The collector multiplexes grade, acceptance-rate, advance and error
//! events into a bounded history plus a broadcast stream.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use once_cell::sync::Lazy;
use tokio::sync::broadcast;

use crate::grading::GradeResult;

pub mod events;

pub use events::{DiagnosticError, MetricEvent};

/// Global telemetry hub shared across the crate.
static HUB: Lazy<TelemetryHub> = Lazy::new(TelemetryHub::default);

/// Access the global telemetry hub.
pub fn hub() -> &'static TelemetryHub {
    &HUB
}

/// Snapshot of collector state for CLI reporting.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct TelemetrySnapshot {
    pub recent: Vec<MetricEvent>,
    pub total_events: u64,
    pub dropped_events: u64,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Broadcast-based collector retaining a bounded history of metrics.
pub struct TelemetryCollector {
    tx: broadcast::Sender<MetricEvent>,
    history: Mutex<VecDeque<MetricEvent>>,
    history_capacity: usize,
    total_events: AtomicU64,
    dropped_history: AtomicU64,
}

impl TelemetryCollector {
    pub fn new(buffer: usize, history_capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(buffer.max(1));
        Self {
            tx,
            history: Mutex::new(VecDeque::with_capacity(history_capacity)),
            history_capacity,
            total_events: AtomicU64::new(0),
            dropped_history: AtomicU64::new(0),
        }
    }

    pub fn publish(&self, event: MetricEvent) {
        self.total_events.fetch_add(1, Ordering::Relaxed);
        {
            let mut history = lock(&self.history);
            if history.len() == self.history_capacity {
                history.pop_front();
                self.dropped_history.fetch_add(1, Ordering::Relaxed);
            }
            if self.history_capacity > 0 {
                history.push_back(event.clone());
            }
        }

        // no subscribers is fine
        let _ = self.tx.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<MetricEvent> {
        self.tx.subscribe()
    }

    pub fn snapshot(&self) -> TelemetrySnapshot {
        let history = lock(&self.history);
        TelemetrySnapshot {
            recent: history.iter().cloned().collect(),
            total_events: self.total_events.load(Ordering::Relaxed),
            dropped_events: self.dropped_history.load(Ordering::Relaxed),
        }
    }
}

impl Default for TelemetryCollector {
    fn default() -> Self {
        Self::new(256, 64)
    }
}

/// Rolling window of accept/reject outcomes.
struct AcceptanceTracker {
    outcomes: VecDeque<bool>,
    max_samples: usize,
}

impl AcceptanceTracker {
    fn new(max_samples: usize) -> Self {
        let max_samples = max_samples.max(1);
        Self {
            outcomes: VecDeque::with_capacity(max_samples),
            max_samples,
        }
    }

    fn observe(&mut self, accepted: bool) -> (f32, usize) {
        if self.outcomes.len() == self.max_samples {
            self.outcomes.pop_front();
        }
        self.outcomes.push_back(accepted);

        let count = self.outcomes.len();
        let hits = self.outcomes.iter().filter(|&&a| a).count();
        (hits as f32 / count as f32, count)
    }
}

/// Top-level hub wrapping collector state plus derived gauges.
pub struct TelemetryHub {
    collector: TelemetryCollector,
    acceptance: Mutex<AcceptanceTracker>,
}

impl TelemetryHub {
    pub fn new(channel_capacity: usize, history_capacity: usize, acceptance_window: usize) -> Self {
        Self {
            collector: TelemetryCollector::new(channel_capacity, history_capacity),
            acceptance: Mutex::new(AcceptanceTracker::new(acceptance_window)),
        }
    }

    pub fn collector(&self) -> &TelemetryCollector {
        &self.collector
    }

    pub fn snapshot(&self) -> TelemetrySnapshot {
        self.collector.snapshot()
    }

    /// Publish a grade and the updated acceptance rate.
    ///
    /// No-signal frames are published as grades but do not move the rate.
    pub fn record_grade(&self, label: &str, result: &GradeResult) {
        self.collector.publish(MetricEvent::Grade {
            label: label.to_string(),
            tier: result.tier,
            similarity: result.similarity,
            accepted: result.accepted,
        });

        if result.similarity.is_none() {
            return;
        }

        let (rate, window) = lock(&self.acceptance).observe(result.accepted);
        self.collector
            .publish(MetricEvent::AcceptanceRate { rate, window });
    }

    pub fn record_advance(&self, from: &str, to: &str) {
        self.collector.publish(MetricEvent::Advance {
            from: from.to_string(),
            to: to.to_string(),
        });
    }

    pub fn record_error(&self, code: DiagnosticError, context: impl Into<String>) {
        self.collector.publish(MetricEvent::Error {
            code,
            context: context.into(),
        });
    }
}

impl Default for TelemetryHub {
    fn default() -> Self {
        Self::new(256, 64, 32)
    }
}
