//! models/event_model.rs
//! Eventos del ciclo de vida de envíos que se difunden a los suscriptores.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::delivery_model::{DeliveryAttemptRecord, DeliveryStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DeliveryEventType {
    DeliveryCreated,
    DeliveryUpdated,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryEvent {
    #[serde(rename = "type")]
    pub event_type: DeliveryEventType,
    pub attempt_id: String,
    pub campaign_id: String,
    pub customer_id: String,
    pub status: DeliveryStatus,
    pub error_code: Option<String>,
    pub sent_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl DeliveryEvent {
    pub fn created(attempt: &DeliveryAttemptRecord) -> Self {
        DeliveryEvent::from_attempt(DeliveryEventType::DeliveryCreated, attempt)
    }

    pub fn updated(attempt: &DeliveryAttemptRecord) -> Self {
        DeliveryEvent::from_attempt(DeliveryEventType::DeliveryUpdated, attempt)
    }

    fn from_attempt(event_type: DeliveryEventType, attempt: &DeliveryAttemptRecord) -> Self {
        DeliveryEvent {
            event_type,
            attempt_id: attempt.id.clone(),
            campaign_id: attempt.campaign_id.clone(),
            customer_id: attempt.customer_id.clone(),
            status: attempt.status,
            error_code: attempt.error_code.clone(),
            sent_at: attempt.sent_at,
            created_at: attempt.created_at,
        }
    }
}

/// Lo que viaja por el canal de cada suscriptor: primero el ack de
/// conexión (con el hint de reconexión), después los eventos reales.
#[derive(Debug, Clone)]
pub enum StreamMessage {
    Connected { retry_ms: u64 },
    Delivery(DeliveryEvent),
}
