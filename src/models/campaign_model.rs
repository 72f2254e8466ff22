//! models/campaign_model.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Estado de una campaña. Derivado del resultado agregado del batch,
/// no lo fija el caller durante un envío.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CampaignStatus {
    Draft,
    InProgress,
    Completed,
    Failed,
}

impl CampaignStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CampaignStatus::Draft => "DRAFT",
            CampaignStatus::InProgress => "IN_PROGRESS",
            CampaignStatus::Completed => "COMPLETED",
            CampaignStatus::Failed => "FAILED",
        }
    }

    /// Mismo fallback defensivo que DeliveryStatus: desconocido => FAILED.
    pub fn parse_or_failed(raw: &str) -> CampaignStatus {
        match raw {
            "DRAFT" => CampaignStatus::Draft,
            "IN_PROGRESS" => CampaignStatus::InProgress,
            "COMPLETED" => CampaignStatus::Completed,
            "FAILED" => CampaignStatus::Failed,
            other => {
                log::warn!("(parse_or_failed) CampaignStatus desconocido: '{}'", other);
                CampaignStatus::Failed
            }
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignRecord {
    pub id: String,
    pub name: String,
    pub message: String,
    pub status: CampaignStatus,
    pub target_location_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Request para crear una campaña (queda en DRAFT hasta el primer envío).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCampaignRequest {
    pub name: String,
    pub message: String,
    pub target_location_id: Option<String>,
}

/// Para listar campañas con paginación
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListCampaignsResponse {
    pub total: u64,
    pub page: u64,
    pub page_size: u64,
    pub items: Vec<CampaignRecord>,
}
