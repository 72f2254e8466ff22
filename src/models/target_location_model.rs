//! models/target_location_model.rs
//! Ubicaciones de targeting: centro + radio que definen la audiencia
//! geográfica de una campaña.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetLocationRecord {
    pub id: String,
    pub name: String,
    pub owner: Option<String>,
    pub center_lat: f64,
    pub center_lng: f64,
    /// Radio en metros. Siempre > 0 (validado al crear).
    pub radius_m: i64,
    pub memo: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTargetLocationRequest {
    pub name: String,
    pub owner: Option<String>,
    pub center_lat: f64,
    pub center_lng: f64,
    pub radius_m: i64,
    pub memo: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListTargetLocationsResponse {
    pub total: u64,
    pub page: u64,
    pub page_size: u64,
    pub items: Vec<TargetLocationRecord>,
}
