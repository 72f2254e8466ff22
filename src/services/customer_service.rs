//! services/customer_service.rs

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Pool, Row, Sqlite};
use uuid::Uuid;

use crate::models::customer_model::{
    CreateCustomerRequest, CustomerRecord, ListCustomersResponse,
};

#[derive(Clone)]
pub struct CustomerService {
    db_pool: Pool<Sqlite>,
}

impl CustomerService {
    pub fn new(db_pool: Pool<Sqlite>) -> Self {
        CustomerService { db_pool }
    }

    pub async fn create_customer(&self, req: CreateCustomerRequest) -> Result<CustomerRecord> {
        let record = CustomerRecord {
            id: Uuid::new_v4().to_string(),
            name: req.name,
            phone: req.phone,
            lat: req.lat,
            lng: req.lng,
            region_code: req.region_code,
            created_at: Utc::now(),
        };

        sqlx::query(
            r#"
            INSERT INTO customers (id, name, phone, lat, lng, region_code, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&record.id)
        .bind(&record.name)
        .bind(&record.phone)
        .bind(record.lat)
        .bind(record.lng)
        .bind(&record.region_code)
        .bind(record.created_at.to_rfc3339())
        .execute(&self.db_pool)
        .await
        .context("Fallo al insertar customer")?;

        Ok(record)
    }

    pub async fn get_customer(&self, customer_id: &str) -> Result<Option<CustomerRecord>> {
        let row = sqlx::query(
            r#"
            SELECT id, name, phone, lat, lng, region_code, created_at
            FROM customers
            WHERE id = ?1
            "#,
        )
        .bind(customer_id)
        .fetch_optional(&self.db_pool)
        .await
        .context("Fallo al consultar customer")?;

        row.as_ref().map(map_customer_row).transpose()
    }

    /// Lista clientes con paginación
    pub async fn list_customers(&self, page: u64, page_size: u64) -> Result<ListCustomersResponse> {
        let offset = (page.saturating_sub(1)) * page_size;

        let total_row = sqlx::query("SELECT COUNT(*) as cnt FROM customers")
            .fetch_one(&self.db_pool)
            .await?;
        let total = total_row.get::<i64, _>("cnt") as u64;

        let rows = sqlx::query(
            r#"
            SELECT id, name, phone, lat, lng, region_code, created_at
            FROM customers
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
            .map(map_customer_row)
            .collect::<Result<Vec<_>>>()?;

        Ok(ListCustomersResponse {
            total,
            page,
            page_size,
            items,
        })
    }

    /// Universo completo de destinatarios para la resolución por radio.
    pub async fn list_all_customers(&self) -> Result<Vec<CustomerRecord>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, phone, lat, lng, region_code, created_at
            FROM customers
            ORDER BY created_at ASC
            "#,
        )
        .fetch_all(&self.db_pool)
        .await
        .context("Fallo al listar customers")?;

        rows.iter().map(map_customer_row).collect()
    }
}

fn map_customer_row(row: &SqliteRow) -> Result<CustomerRecord> {
    let created_raw: String = row.get("created_at");

    Ok(CustomerRecord {
        id: row.get("id"),
        name: row.get("name"),
        phone: row.get("phone"),
        lat: row.get("lat"),
        lng: row.get("lng"),
        region_code: row.get("region_code"),
        created_at: created_raw
            .parse::<DateTime<Utc>>()
            .context("created_at ilegible en customers")?,
    })
}
