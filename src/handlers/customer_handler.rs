//! handlers/customer_handler.rs

use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::handlers::campaign_handler::PaginationQuery;
use crate::models::customer_model::CreateCustomerRequest;
use crate::services::customer_service::CustomerService;

/// POST /api/customers
pub async fn create_customer_endpoint(
    customer_service: web::Data<CustomerService>,
    body: web::Json<CreateCustomerRequest>,
) -> HttpResponse {
    match customer_service.create_customer(body.into_inner()).await {
        Ok(record) => HttpResponse::Ok().json(record),
        Err(e) => HttpResponse::InternalServerError().json(json!({
            "error": "Internal server error",
            "details": format!("{:?}", e)
        })),
    }
}

/// GET /api/customers
pub async fn list_customers_endpoint(
    customer_service: web::Data<CustomerService>,
    query: web::Query<PaginationQuery>,
) -> HttpResponse {
    match customer_service
        .list_customers(query.page(), query.page_size())
        .await
    {
        Ok(list) => HttpResponse::Ok().json(list),
        Err(e) => HttpResponse::InternalServerError().json(json!({
            "error": "Internal server error",
            "details": format!("{:?}", e)
        })),
    }
}

/// GET /api/customers/{id}
pub async fn get_customer_endpoint(
    customer_service: web::Data<CustomerService>,
    path: web::Path<String>,
) -> HttpResponse {
    let customer_id = path.into_inner();

    match customer_service.get_customer(&customer_id).await {
        Ok(Some(record)) => HttpResponse::Ok().json(record),
        Ok(None) => HttpResponse::NotFound().json(json!({
            "error": "Customer not found",
            "details": customer_id
        })),
        Err(e) => HttpResponse::InternalServerError().json(json!({
            "error": "Internal server error",
            "details": format!("{:?}", e)
        })),
    }
}
