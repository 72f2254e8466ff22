//! services/stats_service.rs
//! Lado de lectura: resúmenes e histogramas sobre los envíos persistidos.
//! Todo estado leído de la base pasa por `parse_or_failed`: un registro
//! malformado cuenta como FAILED y jamás tumba una consulta.

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Local, Timelike, Utc};
use sqlx::{Pool, Row, Sqlite};

use crate::models::delivery_model::DeliveryStatus;
use crate::models::stats_model::{
    DeliverySummary, HourlySlot, RealtimeSlot, RegionCount, ScopedDeliveryStats,
};

/// Ventana que con margen contiene cualquier "hoy" en hora local.
const LOCAL_DAY_LOOKBACK_HOURS: i64 = 48;

struct AttemptSample {
    status: DeliveryStatus,
    created_local: DateTime<Local>,
}

#[derive(Clone)]
pub struct StatsService {
    db_pool: Pool<Sqlite>,
}

impl StatsService {
    pub fn new(db_pool: Pool<Sqlite>) -> Self {
        StatsService { db_pool }
    }

    /// Resumen global: conteos por estado, envíos de hoy (día calendario
    /// local) y tasa de éxito. total=0 da exactamente 0.0, sin división.
    pub async fn delivery_summary(&self) -> Result<DeliverySummary> {
        let rows = sqlx::query("SELECT status, COUNT(*) as cnt FROM deliveries GROUP BY status")
            .fetch_all(&self.db_pool)
            .await
            .context("Fallo al agrupar deliveries por estado")?;

        let mut sent_count = 0u64;
        let mut failed_count = 0u64;
        let mut pending_count = 0u64;
        for row in rows {
            let status_raw: String = row.get("status");
            let cnt = row.get::<i64, _>("cnt") as u64;
            match DeliveryStatus::parse_or_failed(&status_raw) {
                DeliveryStatus::Sent => sent_count += cnt,
                DeliveryStatus::Failed => failed_count += cnt,
                DeliveryStatus::Pending => pending_count += cnt,
            }
        }

        let total_deliveries = sent_count + failed_count + pending_count;
        let success_rate = if total_deliveries > 0 {
            sent_count as f64 / total_deliveries as f64 * 100.0
        } else {
            0.0
        };

        let today = Local::now().date_naive();
        let today_deliveries = self
            .samples_since(Utc::now() - Duration::hours(LOCAL_DAY_LOOKBACK_HOURS))
            .await?
            .iter()
            .filter(|s| s.created_local.date_naive() == today)
            .count() as u64;

        Ok(DeliverySummary {
            total_deliveries,
            sent_count,
            failed_count,
            pending_count,
            today_deliveries,
            success_rate,
        })
    }

    /// Últimos 30 minutos en seis buckets de 5 minutos (0, 5, ..., 25).
    /// El bucket sale del minuto-de-hora del propio timestamp, plegado
    /// módulo 30; no se alinea al momento de la consulta. Los buckets
    /// vacíos reportan ceros, nunca ausencia.
    pub async fn realtime_stats(&self) -> Result<Vec<RealtimeSlot>> {
        let samples = self
            .samples_since(Utc::now() - Duration::minutes(30))
            .await?;

        let mut slots: Vec<RealtimeSlot> = (0..6)
            .map(|i| RealtimeSlot {
                time_slot: i * 5,
                sent: 0,
                failed: 0,
                pending: 0,
            })
            .collect();

        for sample in samples {
            let bucket = ((sample.created_local.minute() % 30) / 5) as usize;
            match sample.status {
                DeliveryStatus::Sent => slots[bucket].sent += 1,
                DeliveryStatus::Failed => slots[bucket].failed += 1,
                DeliveryStatus::Pending => slots[bucket].pending += 1,
            }
        }

        Ok(slots)
    }

    /// Conteo por hora local del día calendario actual, ascendente.
    /// Solo aparecen las horas con datos.
    pub async fn hourly_stats(&self) -> Result<Vec<HourlySlot>> {
        let samples = self
            .samples_since(Utc::now() - Duration::hours(LOCAL_DAY_LOOKBACK_HOURS))
            .await?;

        let today = Local::now().date_naive();
        let mut by_hour: BTreeMap<u32, u64> = BTreeMap::new();
        for sample in samples
            .iter()
            .filter(|s| s.created_local.date_naive() == today)
        {
            *by_hour.entry(sample.created_local.hour()).or_insert(0) += 1;
        }

        Ok(by_hour
            .into_iter()
            .map(|(hour, count)| HourlySlot { hour, count })
            .collect())
    }

    /// Distribución de envíos por código de región del cliente,
    /// descendente por cantidad.
    pub async fn region_distribution(&self) -> Result<Vec<RegionCount>> {
        let rows = sqlx::query(
            r#"
            SELECT c.region_code as region_code, COUNT(*) as cnt
            FROM deliveries d
            JOIN customers c ON c.id = d.customer_id
            GROUP BY c.region_code
            ORDER BY cnt DESC
            "#,
        )
        .fetch_all(&self.db_pool)
        .await
        .context("Fallo al agrupar deliveries por región")?;

        Ok(rows
            .iter()
            .map(|row| RegionCount {
                region_code: row.get("region_code"),
                count: row.get::<i64, _>("cnt") as u64,
            })
            .collect())
    }

    /// Desglose acotado a los envíos de una campaña.
    pub async fn campaign_stats(&self, campaign_id: &str) -> Result<ScopedDeliveryStats> {
        self.scoped_stats("campaign_id", campaign_id).await
    }

    /// Desglose acotado a los envíos de una ubicación de targeting.
    pub async fn target_stats(&self, target_location_id: &str) -> Result<ScopedDeliveryStats> {
        self.scoped_stats("target_location_id", target_location_id)
            .await
    }

    async fn scoped_stats(&self, column: &str, value: &str) -> Result<ScopedDeliveryStats> {
        // column viene de los dos wrappers de arriba, nunca del caller
        let sql = format!(
            "SELECT status, COUNT(*) as cnt FROM deliveries WHERE {column} = ?1 GROUP BY status"
        );
        let rows = sqlx::query(&sql)
            .bind(value)
            .fetch_all(&self.db_pool)
            .await
            .context("Fallo al agrupar deliveries acotados")?;

        let mut sent_count = 0u64;
        let mut failed_count = 0u64;
        let mut pending_count = 0u64;
        for row in rows {
            let status_raw: String = row.get("status");
            let cnt = row.get::<i64, _>("cnt") as u64;
            match DeliveryStatus::parse_or_failed(&status_raw) {
                DeliveryStatus::Sent => sent_count += cnt,
                DeliveryStatus::Failed => failed_count += cnt,
                DeliveryStatus::Pending => pending_count += cnt,
            }
        }

        let total_deliveries = sent_count + failed_count + pending_count;
        let success_rate = if total_deliveries > 0 {
            sent_count as f64 / total_deliveries as f64 * 100.0
        } else {
            0.0
        };

        Ok(ScopedDeliveryStats {
            total_deliveries,
            sent_count,
            failed_count,
            pending_count,
            success_rate,
        })
    }

    /// Muestras (estado + timestamp local) desde un instante dado. Un
    /// created_at ilegible se descarta de la muestra con un warning;
    /// un estado desconocido cae a FAILED.
    async fn samples_since(&self, since: DateTime<Utc>) -> Result<Vec<AttemptSample>> {
        let rows = sqlx::query("SELECT status, created_at FROM deliveries WHERE created_at >= ?1")
            .bind(since.to_rfc3339())
            .fetch_all(&self.db_pool)
            .await
            .context("Fallo al leer intentos para estadísticas")?;

        let mut samples = Vec::with_capacity(rows.len());
        for row in rows {
            let status_raw: String = row.get("status");
            let created_raw: String = row.get("created_at");

            let created = match created_raw.parse::<DateTime<Utc>>() {
                Ok(created) => created,
                Err(_) => {
                    log::warn!("(samples_since) created_at ilegible: '{}'", created_raw);
                    continue;
                }
            };

            samples.push(AttemptSample {
                status: DeliveryStatus::parse_or_failed(&status_raw),
                created_local: created.with_timezone(&Local),
            });
        }

        Ok(samples)
    }
}
