//! handlers/delivery_handler.rs
//! Endpoints de despacho, listado y estadísticas de envíos.

use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::models::delivery_model::DeliveryStatus;
use crate::services::delivery_service::DeliveryService;
use crate::services::dispatch_service::{DispatchError, DispatchService};
use crate::services::stats_service::StatsService;

/// POST /api/deliveries/simulate/{campaign_id}
pub async fn simulate_campaign_endpoint(
    dispatch_service: web::Data<DispatchService>,
    path: web::Path<String>,
) -> HttpResponse {
    let campaign_id = path.into_inner();

    match dispatch_service.dispatch_campaign(&campaign_id).await {
        Ok(result) => HttpResponse::Ok().json(result),
        Err(e) => {
            log::error!("(simulate_campaign_endpoint) {:?}", e);
            let status = match &e {
                DispatchError::CampaignNotFound(_) | DispatchError::TargetLocationNotFound(_) => {
                    StatusCode::NOT_FOUND
                }
                DispatchError::MissingTargetLocation(_) => StatusCode::BAD_REQUEST,
                DispatchError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            };
            HttpResponse::build(status).json(json!({ "error": e.to_string() }))
        }
    }
}

/// GET /api/deliveries/stats/summary
pub async fn delivery_summary_endpoint(stats_service: web::Data<StatsService>) -> HttpResponse {
    match stats_service.delivery_summary().await {
        Ok(summary) => HttpResponse::Ok().json(summary),
        Err(e) => internal_error(e),
    }
}

/// GET /api/deliveries/stats/realtime
pub async fn realtime_stats_endpoint(stats_service: web::Data<StatsService>) -> HttpResponse {
    match stats_service.realtime_stats().await {
        Ok(slots) => HttpResponse::Ok().json(slots),
        Err(e) => internal_error(e),
    }
}

/// GET /api/deliveries/stats/hourly
pub async fn hourly_stats_endpoint(stats_service: web::Data<StatsService>) -> HttpResponse {
    match stats_service.hourly_stats().await {
        Ok(slots) => HttpResponse::Ok().json(slots),
        Err(e) => internal_error(e),
    }
}

/// GET /api/deliveries/stats/regions
pub async fn region_stats_endpoint(stats_service: web::Data<StatsService>) -> HttpResponse {
    match stats_service.region_distribution().await {
        Ok(regions) => HttpResponse::Ok().json(regions),
        Err(e) => internal_error(e),
    }
}

/// GET /api/deliveries/stats/campaign/{campaign_id}
pub async fn campaign_stats_endpoint(
    stats_service: web::Data<StatsService>,
    path: web::Path<String>,
) -> HttpResponse {
    match stats_service.campaign_stats(&path.into_inner()).await {
        Ok(stats) => HttpResponse::Ok().json(stats),
        Err(e) => internal_error(e),
    }
}

/// GET /api/deliveries/stats/target/{target_id}
pub async fn target_stats_endpoint(
    stats_service: web::Data<StatsService>,
    path: web::Path<String>,
) -> HttpResponse {
    match stats_service.target_stats(&path.into_inner()).await {
        Ok(stats) => HttpResponse::Ok().json(stats),
        Err(e) => internal_error(e),
    }
}

/// GET /api/deliveries/campaign/{campaign_id}
pub async fn deliveries_by_campaign_endpoint(
    delivery_service: web::Data<DeliveryService>,
    path: web::Path<String>,
) -> HttpResponse {
    match delivery_service.list_by_campaign(&path.into_inner()).await {
        Ok(deliveries) => HttpResponse::Ok().json(deliveries),
        Err(e) => internal_error(e),
    }
}

/// GET /api/deliveries/status/{status}
/// El estado del path se parsea estricto: un valor desconocido es un 400
/// del caller, no un registro persistido a interpretar.
pub async fn deliveries_by_status_endpoint(
    delivery_service: web::Data<DeliveryService>,
    path: web::Path<String>,
) -> HttpResponse {
    let raw = path.into_inner();
    let status = match DeliveryStatus::parse_strict(&raw.to_uppercase()) {
        Some(status) => status,
        None => {
            return HttpResponse::BadRequest().json(json!({
                "error": format!("Estado de envío desconocido: {}", raw)
            }))
        }
    };

    match delivery_service.list_by_status(status).await {
        Ok(deliveries) => HttpResponse::Ok().json(deliveries),
        Err(e) => internal_error(e),
    }
}

fn internal_error(e: anyhow::Error) -> HttpResponse {
    HttpResponse::InternalServerError().json(json!({
        "error": "Internal server error",
        "details": format!("{:?}", e)
    }))
}
