//! services/simulator_service.rs
//! Simulación del envío a un cliente individual: un sorteo Bernoulli por
//! intento, latencia artificial solo en el camino exitoso, y conversión de
//! cualquier falla de persistencia en un intento FAILED sintético.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use rand::Rng;
use uuid::Uuid;

use crate::models::campaign_model::CampaignRecord;
use crate::models::customer_model::CustomerRecord;
use crate::models::delivery_model::{DeliveryAttemptRecord, DeliveryErrorCode, DeliveryStatus};
use crate::models::event_model::DeliveryEvent;
use crate::services::delivery_service::DeliveryService;
use crate::services::stream_service::DeliveryStreamService;

/// Proveedor de aleatoriedad del resultado, inyectable para que los tests
/// puedan fijar probabilidades de forma determinista.
pub trait OutcomeSampler: Send + Sync {
    /// Un único sorteo Bernoulli por intento.
    fn draw_success(&self) -> bool;
    /// Código de error, uniforme sobre la taxonomía simulada.
    fn draw_error_code(&self) -> DeliveryErrorCode;
    /// Latencia artificial del camino exitoso.
    fn draw_latency(&self) -> Duration;
}

/// Sampler de producción sobre `rand::thread_rng`.
pub struct RandomOutcomeSampler {
    success_probability: f64,
    latency_min_ms: u64,
    latency_max_ms: u64,
}

impl RandomOutcomeSampler {
    pub fn new(success_probability: f64, latency_min_ms: u64, latency_max_ms: u64) -> Self {
        RandomOutcomeSampler {
            success_probability,
            latency_min_ms,
            latency_max_ms: latency_max_ms.max(latency_min_ms + 1),
        }
    }
}

impl OutcomeSampler for RandomOutcomeSampler {
    fn draw_success(&self) -> bool {
        rand::thread_rng().gen::<f64>() < self.success_probability
    }

    fn draw_error_code(&self) -> DeliveryErrorCode {
        let idx = rand::thread_rng().gen_range(0..DeliveryErrorCode::SIMULATED.len());
        DeliveryErrorCode::SIMULATED[idx]
    }

    fn draw_latency(&self) -> Duration {
        // uniforme en [min, max)
        let ms = rand::thread_rng().gen_range(self.latency_min_ms..self.latency_max_ms);
        Duration::from_millis(ms)
    }
}

/// Sampler determinista para tests: resultado fijo, latencia cero.
#[cfg(test)]
pub struct FixedOutcomeSampler {
    pub succeed: bool,
}

#[cfg(test)]
impl OutcomeSampler for FixedOutcomeSampler {
    fn draw_success(&self) -> bool {
        self.succeed
    }

    fn draw_error_code(&self) -> DeliveryErrorCode {
        DeliveryErrorCode::NetworkTimeout
    }

    fn draw_latency(&self) -> Duration {
        Duration::from_millis(0)
    }
}

#[derive(Clone)]
pub struct SimulatorService {
    delivery_service: DeliveryService,
    stream_service: DeliveryStreamService,
    sampler: Arc<dyn OutcomeSampler>,
}

impl SimulatorService {
    pub fn new(
        delivery_service: DeliveryService,
        stream_service: DeliveryStreamService,
        sampler: Arc<dyn OutcomeSampler>,
    ) -> Self {
        SimulatorService {
            delivery_service,
            stream_service,
            sampler,
        }
    }

    /// Simula el envío a un cliente y devuelve siempre un intento terminal:
    /// SENT o FAILED, nunca un error. Se persiste al llegar al estado
    /// terminal y recién después se publica el evento DeliveryCreated.
    pub async fn simulate_delivery(
        &self,
        campaign: &CampaignRecord,
        customer: &CustomerRecord,
    ) -> DeliveryAttemptRecord {
        let mut attempt = DeliveryAttemptRecord {
            id: Uuid::new_v4().to_string(),
            campaign_id: campaign.id.clone(),
            target_location_id: campaign.target_location_id.clone(),
            customer_id: customer.id.clone(),
            message_text_sent: Some(campaign.message.clone()),
            status: DeliveryStatus::Pending,
            error_code: None,
            sent_at: None,
            created_at: Utc::now(),
        };

        if self.sampler.draw_success() {
            // la latencia vive dentro de la propia task, sin locks compartidos
            tokio::time::sleep(self.sampler.draw_latency()).await;
            attempt.status = DeliveryStatus::Sent;
            attempt.sent_at = Some(Utc::now());
        } else {
            attempt.status = DeliveryStatus::Failed;
            attempt.error_code = Some(self.sampler.draw_error_code().as_str().to_string());
        }

        if let Err(e) = self.delivery_service.insert_attempt(&attempt).await {
            log::error!(
                "(simulate_delivery) Fallo de persistencia para cliente {}: {:?}",
                customer.id,
                e
            );
            return self.synthetic_failure(campaign, customer).await;
        }

        self.stream_service.publish(DeliveryEvent::created(&attempt));
        attempt
    }

    /// Intento FAILED sintético con código SIMULATION_ERROR. Un cliente
    /// roto nunca aborta el batch; la persistencia del sintético es
    /// best-effort.
    pub async fn synthetic_failure(
        &self,
        campaign: &CampaignRecord,
        customer: &CustomerRecord,
    ) -> DeliveryAttemptRecord {
        let attempt = DeliveryAttemptRecord {
            id: Uuid::new_v4().to_string(),
            campaign_id: campaign.id.clone(),
            target_location_id: campaign.target_location_id.clone(),
            customer_id: customer.id.clone(),
            message_text_sent: Some(campaign.message.clone()),
            status: DeliveryStatus::Failed,
            error_code: Some(DeliveryErrorCode::SimulationError.as_str().to_string()),
            sent_at: None,
            created_at: Utc::now(),
        };

        if let Err(e) = self.delivery_service.insert_attempt(&attempt).await {
            log::error!(
                "(synthetic_failure) Tampoco se pudo persistir el intento sintético para {}: {:?}",
                customer.id,
                e
            );
        }

        self.stream_service.publish(DeliveryEvent::created(&attempt));
        attempt
    }
}
