use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use intent::IntentError;
use serde::Serialize;
use tonbot::PipelineMetrics;

/// Process-wide counters served at `GET /metrics`.
#[derive(Debug, Default)]
pub struct PipelineCounters {
    webhooks_received: AtomicU64,
    messages_normalized: AtomicU64,
    interpretations_ok: AtomicU64,
    interpretations_failed: AtomicU64,
    interpret_micros_total: AtomicU64,
    replies_sent: AtomicU64,
    replies_failed: AtomicU64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CountersSnapshot {
    pub webhooks_received: u64,
    pub messages_normalized: u64,
    pub interpretations_ok: u64,
    pub interpretations_failed: u64,
    pub interpret_avg_ms: u64,
    pub replies_sent: u64,
    pub replies_failed: u64,
}

impl PipelineCounters {
    pub fn record_webhook(&self) {
        self.webhooks_received.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_reply(&self, sent: bool) {
        let counter = if sent { &self.replies_sent } else { &self.replies_failed };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> CountersSnapshot {
        let ok = self.interpretations_ok.load(Ordering::Relaxed);
        let failed = self.interpretations_failed.load(Ordering::Relaxed);
        let total_micros = self.interpret_micros_total.load(Ordering::Relaxed);
        let calls = ok + failed;
        CountersSnapshot {
            webhooks_received: self.webhooks_received.load(Ordering::Relaxed),
            messages_normalized: self.messages_normalized.load(Ordering::Relaxed),
            interpretations_ok: ok,
            interpretations_failed: failed,
            interpret_avg_ms: if calls == 0 { 0 } else { total_micros / calls / 1000 },
            replies_sent: self.replies_sent.load(Ordering::Relaxed),
            replies_failed: self.replies_failed.load(Ordering::Relaxed),
        }
    }
}

impl PipelineMetrics for PipelineCounters {
    fn record_normalize(&self, _latency: Duration) {
        self.messages_normalized.fetch_add(1, Ordering::Relaxed);
    }

    fn record_interpret(&self, latency: Duration, result: Result<(), IntentError>) {
        let counter = match result {
            Ok(()) => &self.interpretations_ok,
            Err(_) => &self.interpretations_failed,
        };
        counter.fetch_add(1, Ordering::Relaxed);
        self.interpret_micros_total
            .fetch_add(latency.as_micros() as u64, Ordering::Relaxed);
    }
}
