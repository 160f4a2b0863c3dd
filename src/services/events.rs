//! Scan lifecycle notifications fanned out to SSE subscribers.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::broadcast;

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScanEvent {
    Created {
        scan_id: String,
        domain_id: String,
    },
    Completed {
        scan_id: String,
        domain_id: String,
        finding_count: usize,
        completed_at: DateTime<Utc>,
    },
    Removed {
        scan_id: String,
    },
}

/// Cloneable publisher; each subscriber gets its own receiver.
#[derive(Debug, Clone)]
pub struct ScanEvents {
    tx: broadcast::Sender<ScanEvent>,
}

impl ScanEvents {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    pub fn publish(&self, event: ScanEvent) {
        // Err only means nobody is listening.
        if self.tx.send(event).is_err() {
            tracing::trace!("No scan event subscribers");
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ScanEvent> {
        self.tx.subscribe()
    }
}

impl Default for ScanEvents {
    fn default() -> Self {
        Self::new(256)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscribers_receive_published_events() {
        let events = ScanEvents::new(8);
        let mut rx = events.subscribe();
        events.publish(ScanEvent::Removed {
            scan_id: "scan_1".into(),
        });
        let received = rx.recv().await.unwrap();
        assert_eq!(
            received,
            ScanEvent::Removed {
                scan_id: "scan_1".into()
            }
        );
    }

    #[test]
    fn publish_without_subscribers_is_silent() {
        let events = ScanEvents::new(1);
        events.publish(ScanEvent::Removed {
            scan_id: "scan_x".into(),
        });
    }

    #[test]
    fn event_json_is_tagged() {
        let json = serde_json::to_value(ScanEvent::Created {
            scan_id: "scan_a".into(),
            domain_id: "dom_1".into(),
        })
        .unwrap();
        assert_eq!(json["type"], "created");
        assert_eq!(json["scan_id"], "scan_a");
    }
}
