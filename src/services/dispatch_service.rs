//! services/dispatch_service.rs
//! Coordinador de despacho concurrente: resuelve la audiencia de la
//! campaña, reparte una simulación por cliente sobre un pool acotado de
//! workers, espera el join del batch completo y deriva el estado final.

use std::sync::Arc;

use anyhow::Result;
use futures::future::join_all;
use thiserror::Error;
use tokio::sync::{AcquireError, OwnedSemaphorePermit, Semaphore};

use crate::models::campaign_model::{CampaignRecord, CampaignStatus};
use crate::models::delivery_model::{BatchResult, DeliveryStatus};
use crate::models::target_location_model::TargetLocationRecord;
use crate::services::campaign_service::CampaignService;
use crate::services::customer_service::CustomerService;
use crate::services::geo_service::{self, ResolvedRecipient};
use crate::services::simulator_service::SimulatorService;
use crate::services::target_location_service::TargetLocationService;

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("No se encontró la campaña {0}")]
    CampaignNotFound(String),
    #[error("No se encontró la ubicación de targeting {0}")]
    TargetLocationNotFound(String),
    #[error("La campaña {0} no tiene ubicación de targeting asignada")]
    MissingTargetLocation(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// Pool acotado de workers de simulación. Recurso propio e inyectable,
/// con tamaño configurable; los clientes que exceden el tamaño quedan
/// encolados en el semáforo.
#[derive(Clone)]
pub struct DeliveryWorkerPool {
    permits: Arc<Semaphore>,
    size: usize,
}

impl DeliveryWorkerPool {
    pub fn new(size: usize) -> Self {
        let size = size.max(1);
        DeliveryWorkerPool {
            permits: Arc::new(Semaphore::new(size)),
            size,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub async fn acquire(&self) -> Result<OwnedSemaphorePermit, AcquireError> {
        self.permits.clone().acquire_owned().await
    }
}

#[derive(Clone)]
pub struct DispatchService {
    campaign_service: CampaignService,
    customer_service: CustomerService,
    target_location_service: TargetLocationService,
    simulator_service: SimulatorService,
    worker_pool: DeliveryWorkerPool,
}

impl DispatchService {
    pub fn new(
        campaign_service: CampaignService,
        customer_service: CustomerService,
        target_location_service: TargetLocationService,
        simulator_service: SimulatorService,
        worker_pool: DeliveryWorkerPool,
    ) -> Self {
        DispatchService {
            campaign_service,
            customer_service,
            target_location_service,
            simulator_service,
            worker_pool,
        }
    }

    /// Ejecuta un batch de envío para la campaña. Solo NotFound /
    /// MissingTargetLocation abortan antes de empezar; toda falla por
    /// cliente queda absorbida en el resultado. El caller siempre recibe
    /// un BatchResult completo, incluso con 0% de éxito.
    pub async fn dispatch_campaign(&self, campaign_id: &str) -> Result<BatchResult, DispatchError> {
        let campaign = self.load_campaign(campaign_id).await?;
        log::info!(
            "(dispatch_campaign) Iniciando envío de campaña {} ({})",
            campaign.id,
            campaign.name
        );

        // se valida el target antes de tocar el estado: una campaña sin
        // targeting queda intacta
        let target = self.resolve_target(&campaign).await?;

        // en curso y persistido de inmediato, visible para lectores
        // concurrentes durante el batch
        self.campaign_service
            .update_campaign_status(&campaign.id, CampaignStatus::InProgress)
            .await?;

        let recipients = self.resolve_audience(&target).await?;
        log::info!(
            "(dispatch_campaign) {} clientes dentro del radio de {}m, pool de {} workers",
            recipients.len(),
            target.radius_m,
            self.worker_pool.size()
        );

        if recipients.is_empty() {
            self.campaign_service
                .update_campaign_status(&campaign.id, CampaignStatus::Completed)
                .await?;
            return Ok(BatchResult {
                total_deliveries: 0,
                sent_count: 0,
                failed_count: 0,
                pending_count: 0,
                success_rate: 0.0,
                message: "No hay clientes objetivo dentro del radio.".to_string(),
            });
        }

        let mut handles = Vec::with_capacity(recipients.len());
        for recipient in &recipients {
            let pool = self.worker_pool.clone();
            let simulator = self.simulator_service.clone();
            let campaign = campaign.clone();
            let customer = recipient.customer.clone();

            handles.push(tokio::spawn(async move {
                match pool.acquire().await {
                    Ok(_permit) => simulator.simulate_delivery(&campaign, &customer).await,
                    Err(e) => {
                        log::error!("(dispatch_campaign) Pool de workers cerrado: {}", e);
                        simulator.synthetic_failure(&campaign, &customer).await
                    }
                }
            }));
        }

        // único punto de bloqueo expuesto al caller: el batch entero
        // termina antes de agregar
        let joined = join_all(handles).await;

        let mut attempts = Vec::with_capacity(recipients.len());
        for (recipient, joined_attempt) in recipients.iter().zip(joined) {
            match joined_attempt {
                Ok(attempt) => attempts.push(attempt),
                Err(e) => {
                    log::error!("(dispatch_campaign) Task de simulación abortada: {:?}", e);
                    attempts.push(
                        self.simulator_service
                            .synthetic_failure(&campaign, &recipient.customer)
                            .await,
                    );
                }
            }
        }

        let total = attempts.len() as u64;
        let sent_count = attempts
            .iter()
            .filter(|a| a.status == DeliveryStatus::Sent)
            .count() as u64;
        let failed_count = attempts
            .iter()
            .filter(|a| a.status == DeliveryStatus::Failed)
            .count() as u64;
        let pending_count = attempts
            .iter()
            .filter(|a| a.status == DeliveryStatus::Pending)
            .count() as u64;
        let success_rate = if total > 0 {
            sent_count as f64 / total as f64 * 100.0
        } else {
            0.0
        };

        // FAILED solo si fallaron todos; cualquier éxito completa el batch
        let final_status = if failed_count == total {
            CampaignStatus::Failed
        } else {
            CampaignStatus::Completed
        };
        self.campaign_service
            .update_campaign_status(&campaign.id, final_status)
            .await?;

        log::info!(
            "(dispatch_campaign) Resultado: total={}, enviados={}, fallidos={}, tasa={:.1}%",
            total,
            sent_count,
            failed_count,
            success_rate
        );

        Ok(BatchResult {
            total_deliveries: total,
            sent_count,
            failed_count,
            pending_count,
            success_rate,
            message: "El envío de la campaña finalizó.".to_string(),
        })
    }

    /// Vista previa de la audiencia de una campaña, sin despachar nada.
    pub async fn preview_audience(
        &self,
        campaign_id: &str,
    ) -> Result<Vec<ResolvedRecipient>, DispatchError> {
        let campaign = self.load_campaign(campaign_id).await?;
        let target = self.resolve_target(&campaign).await?;
        self.resolve_audience(&target).await
    }

    async fn load_campaign(&self, campaign_id: &str) -> Result<CampaignRecord, DispatchError> {
        self.campaign_service
            .get_campaign(campaign_id)
            .await?
            .ok_or_else(|| DispatchError::CampaignNotFound(campaign_id.to_string()))
    }

    async fn resolve_target(
        &self,
        campaign: &CampaignRecord,
    ) -> Result<TargetLocationRecord, DispatchError> {
        let target_id = campaign
            .target_location_id
            .clone()
            .ok_or_else(|| DispatchError::MissingTargetLocation(campaign.id.clone()))?;

        self.target_location_service
            .get_target_location(&target_id)
            .await?
            .ok_or(DispatchError::TargetLocationNotFound(target_id))
    }

    async fn resolve_audience(
        &self,
        target: &TargetLocationRecord,
    ) -> Result<Vec<ResolvedRecipient>, DispatchError> {
        let customers = self.customer_service.list_all_customers().await?;
        geo_service::resolve_recipients(
            target.center_lat,
            target.center_lng,
            target.radius_m,
            &customers,
        )
        .map_err(|e| DispatchError::Internal(anyhow::Error::new(e)))
    }
}
