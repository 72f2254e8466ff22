//! handlers/targeting_handler.rs
//! Vista previa de la audiencia resuelta por radio, sin despachar.

use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::services::dispatch_service::{DispatchError, DispatchService};

/// GET /api/targeting/preview/{campaign_id}
pub async fn preview_targeting_endpoint(
    dispatch_service: web::Data<DispatchService>,
    path: web::Path<String>,
) -> HttpResponse {
    match dispatch_service.preview_audience(&path.into_inner()).await {
        Ok(recipients) => HttpResponse::Ok().json(recipients),
        Err(e) => {
            log::error!("(preview_targeting_endpoint) {:?}", e);
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
