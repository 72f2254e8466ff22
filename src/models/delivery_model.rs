//! models/delivery_model.rs
//! Estructuras de datos para los intentos de envío simulados.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Estado de un intento de envío. Conjunto cerrado: todo valor persistido
/// fuera de este conjunto se interpreta vía `parse_or_failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeliveryStatus {
    Pending,
    Sent,
    Failed,
}

impl DeliveryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryStatus::Pending => "PENDING",
            DeliveryStatus::Sent => "SENT",
            DeliveryStatus::Failed => "FAILED",
        }
    }

    /// Parseo estricto, para entradas del caller (query params, etc.).
    pub fn parse_strict(raw: &str) -> Option<DeliveryStatus> {
        match raw {
            "PENDING" => Some(DeliveryStatus::Pending),
            "SENT" => Some(DeliveryStatus::Sent),
            "FAILED" => Some(DeliveryStatus::Failed),
            _ => None,
        }
    }

    /// Parseo defensivo para registros persistidos: un estado desconocido
    /// cuenta como FAILED en vez de tumbar la lectura.
    pub fn parse_or_failed(raw: &str) -> DeliveryStatus {
        match DeliveryStatus::parse_strict(raw) {
            Some(status) => status,
            None => {
                log::warn!("(parse_or_failed) DeliveryStatus desconocido: '{}'", raw);
                DeliveryStatus::Failed
            }
        }
    }
}

/// Taxonomía de códigos de error de la simulación.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryErrorCode {
    NetworkTimeout,
    InvalidPhone,
    ServiceUnavailable,
    QuotaExceeded,
    BlockedNumber,
    /// Reservado para fallas de infraestructura durante la simulación;
    /// nunca sale de un sorteo aleatorio.
    SimulationError,
}

impl DeliveryErrorCode {
    /// Los códigos que puede sortear un envío fallido simulado.
    pub const SIMULATED: [DeliveryErrorCode; 5] = [
        DeliveryErrorCode::NetworkTimeout,
        DeliveryErrorCode::InvalidPhone,
        DeliveryErrorCode::ServiceUnavailable,
        DeliveryErrorCode::QuotaExceeded,
        DeliveryErrorCode::BlockedNumber,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryErrorCode::NetworkTimeout => "NETWORK_TIMEOUT",
            DeliveryErrorCode::InvalidPhone => "INVALID_PHONE",
            DeliveryErrorCode::ServiceUnavailable => "SERVICE_UNAVAILABLE",
            DeliveryErrorCode::QuotaExceeded => "QUOTA_EXCEEDED",
            DeliveryErrorCode::BlockedNumber => "BLOCKED_NUMBER",
            DeliveryErrorCode::SimulationError => "SIMULATION_ERROR",
        }
    }
}

/// Un intento de envío individual. Se crea una vez al despachar y muta
/// exactamente una vez hacia un estado terminal.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryAttemptRecord {
    pub id: String,
    pub campaign_id: String,
    pub target_location_id: Option<String>,
    pub customer_id: String,
    pub message_text_sent: Option<String>,
    pub status: DeliveryStatus,
    pub error_code: Option<String>,
    pub sent_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Resumen de un batch de envío devuelto por el coordinador.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchResult {
    pub total_deliveries: u64,
    pub sent_count: u64,
    pub failed_count: u64,
    pub pending_count: u64,
    pub success_rate: f64,
    pub message: String,
}
