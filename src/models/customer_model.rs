//! models/customer_model.rs
//! Clientes (destinatarios). Solo-lectura para el subsistema de envíos.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerRecord {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub lat: f64,
    pub lng: f64,
    pub region_code: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCustomerRequest {
    pub name: String,
    pub phone: String,
    pub lat: f64,
    pub lng: f64,
    pub region_code: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListCustomersResponse {
    pub total: u64,
    pub page: u64,
    pub page_size: u64,
    pub items: Vec<CustomerRecord>,
}
