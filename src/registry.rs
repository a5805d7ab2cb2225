// Cleanup registry: the process's only record of bookings created remotely
// during a run. Injected into test contexts (not a module-level singleton) so
// parallel suites never share one by accident. Appends are atomic; the drain
// pass takes the whole sequence in one step, so a concurrent track lands
// either before the take (and is drained) or after (next pass).

use std::future::Future;

use parking_lot::Mutex;
use tracing::{info, warn};

use crate::model::TrackedResource;

// Result of one best-effort cleanup attempt. Failures are recorded, never
// propagated: a failed remote cancel must not fail the test run.
#[derive(Debug, Clone)]
pub struct CleanupOutcome {
    pub id: String,
    pub error: Option<String>,
}

impl CleanupOutcome {
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

#[derive(Debug, Default)]
pub struct CleanupRegistry {
    entries: Mutex<Vec<TrackedResource>>,
}

impl CleanupRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    // Track a confirmed booking for teardown. Duplicates are kept verbatim;
    // a double track means a double confirm upstream, and the drain log is
    // where that shows up.
    pub fn track(&self, booking_id: impl Into<String>) {
        self.entries.lock().push(TrackedResource::booking(booking_id));
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    pub fn tracked_ids(&self) -> Vec<String> {
        self.entries.lock().iter().map(|r| r.id.clone()).collect()
    }

    // Release every tracked resource, most recently created first. The
    // registry is emptied unconditionally; per-item failures are swallowed
    // into the returned outcomes and logged, with no retries.
    pub async fn drain_all<F, Fut>(&self, mut cancel: F) -> Vec<CleanupOutcome>
    where
        F: FnMut(String) -> Fut,
        Fut: Future<Output = anyhow::Result<()>>,
    {
        let entries = std::mem::take(&mut *self.entries.lock());
        if entries.is_empty() {
            return Vec::new();
        }
        info!(count = entries.len(), "draining cleanup registry");

        let mut outcomes = Vec::with_capacity(entries.len());
        for resource in entries.into_iter().rev() {
            let outcome = match cancel(resource.id.clone()).await {
                Ok(()) => CleanupOutcome {
                    id: resource.id,
                    error: None,
                },
                Err(e) => {
                    warn!(booking_id = %resource.id, error = %e, "cleanup attempt failed");
                    CleanupOutcome {
                        id: resource.id,
                        error: Some(e.to_string()),
                    }
                }
            };
            outcomes.push(outcome);
        }
        outcomes
    }
}
