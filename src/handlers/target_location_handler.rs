//! handlers/target_location_handler.rs

use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::handlers::campaign_handler::PaginationQuery;
use crate::models::target_location_model::CreateTargetLocationRequest;
use crate::services::geo_service::GeoError;
use crate::services::target_location_service::TargetLocationService;

/// POST /api/targeting-locations
/// Un radio <= 0 es un 400 del caller, no un error interno.
pub async fn create_target_location_endpoint(
    target_location_service: web::Data<TargetLocationService>,
    body: web::Json<CreateTargetLocationRequest>,
) -> HttpResponse {
    match target_location_service
        .create_target_location(body.into_inner())
        .await
    {
        Ok(record) => HttpResponse::Ok().json(record),
        Err(e) => {
            if e.downcast_ref::<GeoError>().is_some() {
                HttpResponse::BadRequest().json(json!({ "error": e.to_string() }))
            } else {
                HttpResponse::InternalServerError().json(json!({
                    "error": "Internal server error",
                    "details": format!("{:?}", e)
                }))
            }
        }
    }
}

/// GET /api/targeting-locations
pub async fn list_target_locations_endpoint(
    target_location_service: web::Data<TargetLocationService>,
    query: web::Query<PaginationQuery>,
) -> HttpResponse {
    match target_location_service
        .list_target_locations(query.page(), query.page_size())
        .await
    {
        Ok(list) => HttpResponse::Ok().json(list),
        Err(e) => HttpResponse::InternalServerError().json(json!({
            "error": "Internal server error",
            "details": format!("{:?}", e)
        })),
    }
}

/// GET /api/targeting-locations/{id}
pub async fn get_target_location_endpoint(
    target_location_service: web::Data<TargetLocationService>,
    path: web::Path<String>,
) -> HttpResponse {
    let target_location_id = path.into_inner();

    match target_location_service
        .get_target_location(&target_location_id)
        .await
    {
        Ok(Some(record)) => HttpResponse::Ok().json(record),
        Ok(None) => HttpResponse::NotFound().json(json!({
            "error": "Target location not found",
            "details": target_location_id
        })),
        Err(e) => HttpResponse::InternalServerError().json(json!({
            "error": "Internal server error",
            "details": format!("{:?}", e)
        })),
    }
}
