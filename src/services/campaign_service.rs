//! services/campaign_service.rs

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Pool, Row, Sqlite};
use uuid::Uuid;

use crate::models::campaign_model::{
    CampaignRecord, CampaignStatus, CreateCampaignRequest, ListCampaignsResponse,
};

#[derive(Clone)]
pub struct CampaignService {
    db_pool: Pool<Sqlite>,
}

impl CampaignService {
    pub fn new(db_pool: Pool<Sqlite>) -> Self {
        CampaignService { db_pool }
    }

    /// Corre migraciones con sqlx
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations").run(&self.db_pool).await?;
        Ok(())
    }

    /// Crea la campaña en DB con estado DRAFT.
    pub async fn create_campaign(&self, req: CreateCampaignRequest) -> Result<CampaignRecord> {
        let record = CampaignRecord {
            id: Uuid::new_v4().to_string(),
            name: req.name,
            message: req.message,
            status: CampaignStatus::Draft,
            target_location_id: req.target_location_id,
            created_at: Utc::now(),
        };

        sqlx::query(
            r#"
            INSERT INTO campaigns (id, name, message, status, target_location_id, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&record.id)
        .bind(&record.name)
        .bind(&record.message)
        .bind(record.status.as_str())
        .bind(&record.target_location_id)
        .bind(record.created_at.to_rfc3339())
        .execute(&self.db_pool)
        .await
        .context("Fallo al insertar campaign")?;

        Ok(record)
    }

    pub async fn get_campaign(&self, campaign_id: &str) -> Result<Option<CampaignRecord>> {
        let row = sqlx::query(
            r#"
            SELECT id, name, message, status, target_location_id, created_at
            FROM campaigns
            WHERE id = ?1
            "#,
        )
        .bind(campaign_id)
        .fetch_optional(&self.db_pool)
        .await
        .context("Fallo al consultar campaign")?;

        row.as_ref().map(map_campaign_row).transpose()
    }

    /// Lista campañas con paginación
    pub async fn list_campaigns(&self, page: u64, page_size: u64) -> Result<ListCampaignsResponse> {
        let offset = (page.saturating_sub(1)) * page_size;

        let total_row = sqlx::query("SELECT COUNT(*) as cnt FROM campaigns")
            .fetch_one(&self.db_pool)
            .await?;
        let total = total_row.get::<i64, _>("cnt") as u64;

        let rows = sqlx::query(
            r#"
            SELECT id, name, message, status, target_location_id, created_at
            FROM campaigns
            ORDER BY created_at DESC
            LIMIT ?1 OFFSET ?2
            "#,
        )
        .bind(page_size as i64)
        .bind(offset as i64)
        .fetch_all(&self.db_pool)
        .await?;

        let items = rows
            .iter()
            .map(map_campaign_row)
            .collect::<Result<Vec<_>>>()?;

        Ok(ListCampaignsResponse {
            total,
            page,
            page_size,
            items,
        })
    }

    /// Único punto de escritura del estado de campaña. Durante un batch lo
    /// ejecuta solamente el hilo del coordinador.
    pub async fn update_campaign_status(
        &self,
        campaign_id: &str,
        status: CampaignStatus,
    ) -> Result<()> {
        sqlx::query("UPDATE campaigns SET status = ?1 WHERE id = ?2")
            .bind(status.as_str())
            .bind(campaign_id)
            .execute(&self.db_pool)
            .await
            .context("Fallo al actualizar estado de campaign")?;
        Ok(())
    }
}

fn map_campaign_row(row: &SqliteRow) -> Result<CampaignRecord> {
    let status_raw: String = row.get("status");
    let created_raw: String = row.get("created_at");

    Ok(CampaignRecord {
        id: row.get("id"),
        name: row.get("name"),
        message: row.get("message"),
        status: CampaignStatus::parse_or_failed(&status_raw),
        target_location_id: row.get("target_location_id"),
        created_at: created_raw
            .parse::<DateTime<Utc>>()
            .context("created_at ilegible en campaigns")?,
    })
}
