use serde::Serialize;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::entities::trip_request::Status;

/// Events published to whatever real-time transport is subscribed
/// (socket gateway, SSE bridge). Best-effort: no delivery or ordering
/// guarantees, and zero subscribers is not an error.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TripEvent {
    StatusChanged {
        trip_request_id: i64,
        status: Status,
    },
    OfferCreated {
        trip_request_id: i64,
        offer_id: i64,
        driver_id: Uuid,
        fare_offered: f64,
    },
    DriverPosition {
        trip_request_id: i64,
        lat: f64,
        lng: f64,
    },
}

#[derive(Clone)]
pub struct EventBroadcaster {
    tx: broadcast::Sender<TripEvent>,
}

impl EventBroadcaster {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn publish(&self, event: TripEvent) {
        // send() errors only when nobody is listening
        let _ = self.tx.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<TripEvent> {
        self.tx.subscribe()
    }
}

impl Default for EventBroadcaster {
    fn default() -> Self {
        Self::new(256)
    }
}
