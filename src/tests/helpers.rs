//! tests/helpers.rs
//! Fixtures compartidas: base SQLite en memoria con migraciones, el grafo
//! de servicios con sampler determinista, y altas rápidas de entidades.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Pool, Sqlite};
use uuid::Uuid;

use crate::models::campaign_model::{CampaignRecord, CreateCampaignRequest};
use crate::models::customer_model::{CreateCustomerRequest, CustomerRecord};
use crate::models::delivery_model::{DeliveryAttemptRecord, DeliveryStatus};
use crate::models::target_location_model::{CreateTargetLocationRequest, TargetLocationRecord};
use crate::services::campaign_service::CampaignService;
use crate::services::customer_service::CustomerService;
use crate::services::delivery_service::DeliveryService;
use crate::services::dispatch_service::{DeliveryWorkerPool, DispatchService};
use crate::services::simulator_service::{FixedOutcomeSampler, OutcomeSampler, SimulatorService};
use crate::services::stats_service::StatsService;
use crate::services::stream_service::DeliveryStreamService;
use crate::services::target_location_service::TargetLocationService;

pub const TEST_SSE_RETRY_MS: u64 = 3000;

/// Base en memoria con el esquema migrado. Una sola conexión: cada
/// conexión nueva a :memory: abriría una base distinta.
pub async fn setup_test_db() -> Pool<Sqlite> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("No se pudo abrir SQLite en memoria");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Fallo en migraciones de test");

    pool
}

/// Grafo de servicios completo sobre un pool, con resultado de
/// simulación fijo (éxito o fracaso) y latencia cero.
pub struct TestContext {
    pub pool: Pool<Sqlite>,
    pub campaign_service: CampaignService,
    pub customer_service: CustomerService,
    pub target_location_service: TargetLocationService,
    pub delivery_service: DeliveryService,
    pub stats_service: StatsService,
    pub stream_service: DeliveryStreamService,
    pub simulator_service: SimulatorService,
    pub dispatch_service: DispatchService,
}

pub async fn setup_context(succeed: bool) -> TestContext {
    let pool = setup_test_db().await;
    build_context(pool, succeed)
}

pub fn build_context(pool: Pool<Sqlite>, succeed: bool) -> TestContext {
    let campaign_service = CampaignService::new(pool.clone());
    let customer_service = CustomerService::new(pool.clone());
    let target_location_service = TargetLocationService::new(pool.clone());
    let delivery_service = DeliveryService::new(pool.clone());
    let stats_service = StatsService::new(pool.clone());

    let stream_service = DeliveryStreamService::new(TEST_SSE_RETRY_MS);
    let sampler: Arc<dyn OutcomeSampler> = Arc::new(FixedOutcomeSampler { succeed });
    let simulator_service = SimulatorService::new(
        delivery_service.clone(),
        stream_service.clone(),
        sampler,
    );
    let dispatch_service = DispatchService::new(
        campaign_service.clone(),
        customer_service.clone(),
        target_location_service.clone(),
        simulator_service.clone(),
        DeliveryWorkerPool::new(5),
    );

    TestContext {
        pool,
        campaign_service,
        customer_service,
        target_location_service,
        delivery_service,
        stats_service,
        stream_service,
        simulator_service,
        dispatch_service,
    }
}

/// Cliente en memoria para el resolver (sin pasar por la base).
pub fn make_customer(id: &str, lat: f64, lng: f64) -> CustomerRecord {
    CustomerRecord {
        id: id.to_string(),
        name: format!("Cliente {}", id),
        phone: "010-0000-0000".to_string(),
        lat,
        lng,
        region_code: None,
        created_at: Utc::now(),
    }
}

pub async fn create_customer_at(
    ctx: &TestContext,
    lat: f64,
    lng: f64,
    region_code: Option<&str>,
) -> CustomerRecord {
    ctx.customer_service
        .create_customer(CreateCustomerRequest {
            name: "Cliente de prueba".to_string(),
            phone: "010-0000-0000".to_string(),
            lat,
            lng,
            region_code: region_code.map(|r| r.to_string()),
        })
        .await
        .expect("No se pudo crear customer de prueba")
}

pub async fn create_target(
    ctx: &TestContext,
    center_lat: f64,
    center_lng: f64,
    radius_m: i64,
) -> TargetLocationRecord {
    ctx.target_location_service
        .create_target_location(CreateTargetLocationRequest {
            name: "Zona de prueba".to_string(),
            owner: None,
            center_lat,
            center_lng,
            radius_m,
            memo: None,
        })
        .await
        .expect("No se pudo crear target_location de prueba")
}

pub async fn create_campaign(
    ctx: &TestContext,
    target_location_id: Option<String>,
) -> CampaignRecord {
    ctx.campaign_service
        .create_campaign(CreateCampaignRequest {
            name: "Campaña de prueba".to_string(),
            message: "Hola!".to_string(),
            target_location_id,
        })
        .await
        .expect("No se pudo crear campaign de prueba")
}

pub async fn create_campaign_with_target(
    ctx: &TestContext,
    center_lat: f64,
    center_lng: f64,
    radius_m: i64,
) -> CampaignRecord {
    let target = create_target(ctx, center_lat, center_lng, radius_m).await;
    create_campaign(ctx, Some(target.id)).await
}

/// Inserta una fila de delivery cruda, con estado y timestamp arbitrarios
/// (incluye estados malformados para las pruebas defensivas).
pub async fn insert_delivery_row(
    pool: &Pool<Sqlite>,
    campaign_id: &str,
    target_location_id: Option<&str>,
    customer_id: &str,
    status: &str,
    created_at: DateTime<Utc>,
) {
    sqlx::query(
        r#"
        INSERT INTO deliveries (
            id, campaign_id, target_location_id, customer_id,
            message_text_sent, status, error_code, sent_at, created_at
        )
        VALUES (?1, ?2, ?3, ?4, NULL, ?5, NULL, NULL, ?6)
        "#,
    )
    .bind(Uuid::new_v4().to_string())
    .bind(campaign_id)
    .bind(target_location_id)
    .bind(customer_id)
    .bind(status)
    .bind(created_at.to_rfc3339())
    .execute(pool)
    .await
    .expect("No se pudo insertar delivery de prueba");
}

/// Intento terminal en memoria, para armar eventos en las pruebas del
/// broadcaster.
pub fn make_attempt(campaign_id: &str, customer_id: &str) -> DeliveryAttemptRecord {
    DeliveryAttemptRecord {
        id: Uuid::new_v4().to_string(),
        campaign_id: campaign_id.to_string(),
        target_location_id: None,
        customer_id: customer_id.to_string(),
        message_text_sent: Some("Hola!".to_string()),
        status: DeliveryStatus::Sent,
        error_code: None,
        sent_at: Some(Utc::now()),
        created_at: Utc::now(),
    }
}
