//! Request pacing.
//!
//! A single gate is shared by every tool call in the process. It guarantees a
//! minimum interval between two requests reaching the transport.

use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{Instant, sleep};
use tracing::debug;

/// Serializes outbound requests so that consecutive admissions are at least
/// `min_interval` apart.
#[derive(Debug)]
pub struct RateGate {
    min_interval: Duration,
    /// Admission time of the previous request. The lock is held across the
    /// sleep, so check-wait-update is one exclusive step.
    last_call: Mutex<Option<Instant>>,
}

impl RateGate {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_call: Mutex::new(None),
        }
    }

    /// Wait until the caller may issue a request, then record the admission.
    pub async fn admit(&self) {
        let mut last_call = self.last_call.lock().await;

        if let Some(previous) = *last_call {
            let elapsed = previous.elapsed();
            if elapsed < self.min_interval {
                let wait = self.min_interval - elapsed;
                debug!(wait_ms = wait.as_millis() as u64, "Rate gate delaying request");
                sleep(wait).await;
            }
        }

        *last_call = Some(Instant::now());
    }
}
