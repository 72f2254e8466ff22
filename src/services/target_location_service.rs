//! services/target_location_service.rs

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Pool, Row, Sqlite};
use uuid::Uuid;

use crate::models::target_location_model::{
    CreateTargetLocationRequest, ListTargetLocationsResponse, TargetLocationRecord,
};
use crate::services::geo_service::GeoError;

#[derive(Clone)]
pub struct TargetLocationService {
    db_pool: Pool<Sqlite>,
}

impl TargetLocationService {
    pub fn new(db_pool: Pool<Sqlite>) -> Self {
        TargetLocationService { db_pool }
    }

    /// Crea una ubicación de targeting. Un radio <= 0 se rechaza acá,
    /// antes de persistir nada.
    pub async fn create_target_location(
        &self,
        req: CreateTargetLocationRequest,
    ) -> Result<TargetLocationRecord> {
        if req.radius_m <= 0 {
            return Err(GeoError::InvalidRadius(req.radius_m).into());
        }

        let record = TargetLocationRecord {
            id: Uuid::new_v4().to_string(),
            name: req.name,
            owner: req.owner,
            center_lat: req.center_lat,
            center_lng: req.center_lng,
            radius_m: req.radius_m,
            memo: req.memo,
            created_at: Utc::now(),
        };

        sqlx::query(
            r#"
            INSERT INTO target_locations (
                id, name, owner, center_lat, center_lng, radius_m, memo, created_at
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&record.id)
        .bind(&record.name)
        .bind(&record.owner)
        .bind(record.center_lat)
        .bind(record.center_lng)
        .bind(record.radius_m)
        .bind(&record.memo)
        .bind(record.created_at.to_rfc3339())
        .execute(&self.db_pool)
        .await
        .context("Fallo al insertar target_location")?;

        Ok(record)
    }

    pub async fn get_target_location(
        &self,
        target_location_id: &str,
    ) -> Result<Option<TargetLocationRecord>> {
        let row = sqlx::query(
            r#"
            SELECT id, name, owner, center_lat, center_lng, radius_m, memo, created_at
            FROM target_locations
            WHERE id = ?1
            "#,
        )
        .bind(target_location_id)
        .fetch_optional(&self.db_pool)
        .await
        .context("Fallo al consultar target_location")?;

        row.as_ref().map(map_target_location_row).transpose()
    }

    /// Lista ubicaciones con paginación
    pub async fn list_target_locations(
        &self,
        page: u64,
        page_size: u64,
    ) -> Result<ListTargetLocationsResponse> {
        let offset = (page.saturating_sub(1)) * page_size;

        let total_row = sqlx::query("SELECT COUNT(*) as cnt FROM target_locations")
            .fetch_one(&self.db_pool)
            .await?;
        let total = total_row.get::<i64, _>("cnt") as u64;

        let rows = sqlx::query(
            r#"
            SELECT id, name, owner, center_lat, center_lng, radius_m, memo, created_at
            FROM target_locations
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
            .map(map_target_location_row)
            .collect::<Result<Vec<_>>>()?;

        Ok(ListTargetLocationsResponse {
            total,
            page,
            page_size,
            items,
        })
    }
}

fn map_target_location_row(row: &SqliteRow) -> Result<TargetLocationRecord> {
    let created_raw: String = row.get("created_at");

    Ok(TargetLocationRecord {
        id: row.get("id"),
        name: row.get("name"),
        owner: row.get("owner"),
        center_lat: row.get("center_lat"),
        center_lng: row.get("center_lng"),
        radius_m: row.get("radius_m"),
        memo: row.get("memo"),
        created_at: created_raw
            .parse::<DateTime<Utc>>()
            .context("created_at ilegible en target_locations")?,
    })
}
