//! models/stats_model.rs
//! Respuestas del lado de lectura (agregaciones sobre envíos persistidos).

use serde::Serialize;

/// Resumen global de envíos.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliverySummary {
    pub total_deliveries: u64,
    pub sent_count: u64,
    pub failed_count: u64,
    pub pending_count: u64,
    pub today_deliveries: u64,
    pub success_rate: f64,
}

/// Un bucket de 5 minutos del histograma de los últimos 30 minutos.
/// `time_slot` es el minuto-de-hora del bucket (0, 5, ..., 25).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RealtimeSlot {
    pub time_slot: u32,
    pub sent: u64,
    pub failed: u64,
    pub pending: u64,
}

/// Cantidad de envíos por hora local del día actual.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HourlySlot {
    pub hour: u32,
    pub count: u64,
}

/// Distribución de envíos por código de región del cliente.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionCount {
    pub region_code: Option<String>,
    pub count: u64,
}

/// Desglose de envíos acotado a una campaña o a una ubicación de targeting.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScopedDeliveryStats {
    pub total_deliveries: u64,
    pub sent_count: u64,
    pub failed_count: u64,
    pub pending_count: u64,
    pub success_rate: f64,
}
