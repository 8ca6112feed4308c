//! Background task that logs every SLA violation published on the bus.

use std::time::Duration;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use qosmon_events::QosEvent;

/// Writes each received [`QosEvent`] to the log as structured JSON.
pub struct ViolationLogger;

impl ViolationLogger {
    /// Run until the [`EventBus`](qosmon_events::EventBus) is dropped.
    pub async fn run(mut receiver: broadcast::Receiver<QosEvent>) {
        loop {
            match receiver.recv().await {
                Ok(event) => Self::log(&event),
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Violation logger lagged, events were dropped");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, violation logger shutting down");
                    break;
                }
            }
        }
    }

    /// Wait up to `grace` for a logger task to finish after the bus closed.
    ///
    /// Returns `false` if the task overran `grace` or panicked.
    pub async fn drain(handle: JoinHandle<()>, grace: Duration) -> bool {
        match tokio::time::timeout(grace, handle).await {
            Ok(Ok(())) => true,
            Ok(Err(e)) => {
                tracing::error!(error = %e, "Violation logger task failed");
                false
            }
            Err(_) => {
                tracing::warn!(
                    grace_ms = grace.as_millis() as u64,
                    "Violation logger did not stop in time",
                );
                false
            }
        }
    }

    fn log(event: &QosEvent) {
        let QosEvent::SlaViolation {
            provider, consumer, ..
        } = event;
        match serde_json::to_string(event) {
            Ok(payload) => {
                tracing::warn!(%provider, %consumer, %payload, "SLA violation");
            }
            Err(e) => {
                tracing::error!(error = %e, %provider, %consumer, "Failed to serialize violation");
            }
        }
    }
}
