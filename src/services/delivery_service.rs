//! services/delivery_service.rs
//! Persistencia y consulta de intentos de envío.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Pool, Row, Sqlite};

use crate::models::delivery_model::{DeliveryAttemptRecord, DeliveryStatus};

#[derive(Clone)]
pub struct DeliveryService {
    db_pool: Pool<Sqlite>,
}

impl DeliveryService {
    pub fn new(db_pool: Pool<Sqlite>) -> Self {
        DeliveryService { db_pool }
    }

    /// Inserta un intento ya terminal. Cada intento es una fila
    /// independiente; no hay locking entre tasks.
    pub async fn insert_attempt(&self, attempt: &DeliveryAttemptRecord) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO deliveries (
                id, campaign_id, target_location_id, customer_id,
                message_text_sent, status, error_code, sent_at, created_at
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(&attempt.id)
        .bind(&attempt.campaign_id)
        .bind(&attempt.target_location_id)
        .bind(&attempt.customer_id)
        .bind(&attempt.message_text_sent)
        .bind(attempt.status.as_str())
        .bind(&attempt.error_code)
        .bind(attempt.sent_at.map(|t| t.to_rfc3339()))
        .bind(attempt.created_at.to_rfc3339())
        .execute(&self.db_pool)
        .await
        .context("Fallo al insertar delivery")?;

        Ok(())
    }

    /// Envíos de una campaña, más recientes primero.
    pub async fn list_by_campaign(&self, campaign_id: &str) -> Result<Vec<DeliveryAttemptRecord>> {
        let rows = sqlx::query(
            r#"
            SELECT id, campaign_id, target_location_id, customer_id,
                   message_text_sent, status, error_code, sent_at, created_at
            FROM deliveries
            WHERE campaign_id = ?1
            ORDER BY created_at DESC
            "#,
        )
        .bind(campaign_id)
        .fetch_all(&self.db_pool)
        .await
        .context("Fallo al listar deliveries por campaña")?;

        rows.iter().map(map_delivery_row).collect()
    }

    /// Envíos por estado, más recientes primero.
    pub async fn list_by_status(&self, status: DeliveryStatus) -> Result<Vec<DeliveryAttemptRecord>> {
        let rows = sqlx::query(
            r#"
            SELECT id, campaign_id, target_location_id, customer_id,
                   message_text_sent, status, error_code, sent_at, created_at
            FROM deliveries
            WHERE status = ?1
            ORDER BY created_at DESC
            "#,
        )
        .bind(status.as_str())
        .fetch_all(&self.db_pool)
        .await
        .context("Fallo al listar deliveries por estado")?;

        rows.iter().map(map_delivery_row).collect()
    }
}

fn map_delivery_row(row: &SqliteRow) -> Result<DeliveryAttemptRecord> {
    let status_raw: String = row.get("status");
    let created_raw: String = row.get("created_at");
    let sent_raw: Option<String> = row.get("sent_at");

    Ok(DeliveryAttemptRecord {
        id: row.get("id"),
        campaign_id: row.get("campaign_id"),
        target_location_id: row.get("target_location_id"),
        customer_id: row.get("customer_id"),
        message_text_sent: row.get("message_text_sent"),
        // estado desconocido => FAILED, nunca un panic en lectura
        status: DeliveryStatus::parse_or_failed(&status_raw),
        error_code: row.get("error_code"),
        sent_at: sent_raw
            .map(|s| s.parse::<DateTime<Utc>>())
            .transpose()
            .context("sent_at ilegible en deliveries")?,
        created_at: created_raw
            .parse::<DateTime<Utc>>()
            .context("created_at ilegible en deliveries")?,
    })
}
