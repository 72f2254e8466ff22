//! config/delivery_config.rs
//! Configuración global del motor de envíos (probabilidades, pool, SSE).

use serde::{Deserialize, Serialize};

/// Configuración global del motor, con valores por defecto
/// (se puede pisar con variables de entorno vía .env)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryGlobalConfig {
    /// Probabilidad Bernoulli de envío exitoso.
    pub success_probability: f64,
    /// Tamaño fijo del pool de workers de simulación.
    pub worker_pool_size: usize,
    /// Latencia artificial mínima en ms (inclusiva).
    pub latency_min_ms: u64,
    /// Latencia artificial máxima en ms (exclusiva).
    pub latency_max_ms: u64,
    /// Hint de reconexión enviado en el ack "connected" del stream.
    pub sse_retry_ms: u64,
}

impl Default for DeliveryGlobalConfig {
    fn default() -> Self {
        DeliveryGlobalConfig {
            success_probability: 0.85,
            worker_pool_size: 5,
            latency_min_ms: 100,
            latency_max_ms: 2000,
            sse_retry_ms: 3000,
        }
    }
}

impl DeliveryGlobalConfig {
    /// Lee overrides desde el entorno (ya cargado por dotenv). Un valor
    /// que no parsea se ignora y queda el default.
    pub fn from_env() -> Self {
        let mut config = DeliveryGlobalConfig::default();

        if let Ok(raw) = std::env::var("DELIVERY_SUCCESS_PROBABILITY") {
            if let Ok(value) = raw.parse() {
                config.success_probability = value;
            }
        }
        if let Ok(raw) = std::env::var("DELIVERY_WORKER_POOL_SIZE") {
            if let Ok(value) = raw.parse() {
                config.worker_pool_size = value;
            }
        }
        if let Ok(raw) = std::env::var("DELIVERY_LATENCY_MIN_MS") {
            if let Ok(value) = raw.parse() {
                config.latency_min_ms = value;
            }
        }
        if let Ok(raw) = std::env::var("DELIVERY_LATENCY_MAX_MS") {
            if let Ok(value) = raw.parse() {
                config.latency_max_ms = value;
            }
        }
        if let Ok(raw) = std::env::var("DELIVERY_SSE_RETRY_MS") {
            if let Ok(value) = raw.parse() {
                config.sse_retry_ms = value;
            }
        }

        config
    }
}
