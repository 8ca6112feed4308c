//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] fans [`QosEvent`]s out to every subscriber (alerting,
//! SLA enforcement, audit). It is shared via `Arc<EventBus>`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use qosmon_core::identity::SystemIdentity;
use qosmon_core::report::ViolationReport;

// ---------------------------------------------------------------------------
// QosEvent
// ---------------------------------------------------------------------------

/// An event emitted by the monitor.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum QosEvent {
    /// Verification found at least one parameter out of contract.
    SlaViolation {
        provider: SystemIdentity,
        consumer: SystemIdentity,
        profile_type: String,
        report: ViolationReport,
        timestamp: DateTime<Utc>,
    },
}

impl QosEvent {
    /// Build a violation event stamped with the current time.
    pub fn sla_violation(
        provider: SystemIdentity,
        consumer: SystemIdentity,
        profile_type: impl Into<String>,
        report: ViolationReport,
    ) -> Self {
        QosEvent::SlaViolation {
            provider,
            consumer,
            profile_type: profile_type.into(),
            report,
            timestamp: Utc::now(),
        }
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
pub const DEFAULT_CAPACITY: usize = 1024;

/// In-process fan-out event bus.
///
/// When the buffer is full the oldest unconsumed events are dropped and slow
/// receivers observe `RecvError::Lagged`.
pub struct EventBus {
    sender: broadcast::Sender<QosEvent>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers.
    ///
    /// Returns the number of subscribers reached; zero means the event was
    /// dropped.
    pub fn publish(&self, event: QosEvent) -> usize {
        match self.sender.send(event) {
            Ok(receivers) => receivers,
            Err(_) => {
                tracing::trace!("Event published with no subscribers");
                0
            }
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<QosEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
