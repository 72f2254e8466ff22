use std::sync::Arc;

use actix_web::{web, App, HttpServer};
use dotenv::dotenv;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};

use crate::config::delivery_config::DeliveryGlobalConfig;
use crate::logger::init_logger;
use crate::services::campaign_service::CampaignService;
use crate::services::customer_service::CustomerService;
use crate::services::delivery_service::DeliveryService;
use crate::services::dispatch_service::{DeliveryWorkerPool, DispatchService};
use crate::services::simulator_service::{OutcomeSampler, RandomOutcomeSampler, SimulatorService};
use crate::services::stats_service::StatsService;
use crate::services::stream_service::DeliveryStreamService;
use crate::services::target_location_service::TargetLocationService;

mod app;
mod config;
mod handlers;
mod logger;
mod models;
mod services;
#[cfg(test)]
mod tests;

async fn setup_database() -> Pool<Sqlite> {
    // 1) Crear carpeta "data"
    std::fs::create_dir_all("data").expect("No se pudo crear directorio 'data'");

    // 2) Ruta final: ./data/campaigns.db
    let db_path = std::env::current_dir()
        .expect("No se pudo obtener el current_dir")
        .join("data")
        .join("campaigns.db");

    log::info!("Conectando a SQLite en {}", db_path.to_string_lossy());

    // 3) Conectarnos con SQLx
    let options = SqliteConnectOptions::new()
        .filename(&db_path)
        .create_if_missing(true);

    SqlitePoolOptions::new()
        .connect_with(options)
        .await
        .expect("No se pudo conectar a la base de datos SQLite.")
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok(); // Cargar .env al inicio
    init_logger();

    let delivery_config = DeliveryGlobalConfig::from_env();
    log::info!(
        "Config del motor: p={}, pool={}, latencia=[{}ms, {}ms)",
        delivery_config.success_probability,
        delivery_config.worker_pool_size,
        delivery_config.latency_min_ms,
        delivery_config.latency_max_ms
    );

    // Conectarnos a la DB
    let db_pool = setup_database().await;

    // CampaignService corre las migraciones de todo el esquema
    let campaign_service = CampaignService::new(db_pool.clone());
    if let Err(e) = campaign_service.run_migrations().await {
        panic!("Fallo en migraciones: {:?}", e);
    }

    let customer_service = CustomerService::new(db_pool.clone());
    let target_location_service = TargetLocationService::new(db_pool.clone());
    let delivery_service = DeliveryService::new(db_pool.clone());
    let stats_service = StatsService::new(db_pool.clone());

    // Broadcaster + simulador con el sampler de producción
    let stream_service = DeliveryStreamService::new(delivery_config.sse_retry_ms);
    let sampler: Arc<dyn OutcomeSampler> = Arc::new(RandomOutcomeSampler::new(
        delivery_config.success_probability,
        delivery_config.latency_min_ms,
        delivery_config.latency_max_ms,
    ));
    let simulator_service = SimulatorService::new(
        delivery_service.clone(),
        stream_service.clone(),
        sampler,
    );

    // Pool de workers propio del coordinador, tamaño por config
    let worker_pool = DeliveryWorkerPool::new(delivery_config.worker_pool_size);
    let dispatch_service = DispatchService::new(
        campaign_service.clone(),
        customer_service.clone(),
        target_location_service.clone(),
        simulator_service,
        worker_pool,
    );

    // Levantar servidor
    log::info!("Levantando servidor en 0.0.0.0:8080");
    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(campaign_service.clone()))
            .app_data(web::Data::new(customer_service.clone()))
            .app_data(web::Data::new(target_location_service.clone()))
            .app_data(web::Data::new(delivery_service.clone()))
            .app_data(web::Data::new(stats_service.clone()))
            .app_data(web::Data::new(stream_service.clone()))
            .app_data(web::Data::new(dispatch_service.clone()))
            .configure(app::init_app)
    })
    .workers(1)
    .bind(("0.0.0.0", 8080))?
    .run()
    .await
}
