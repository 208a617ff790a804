use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool, Postgres, Transaction};

use super::{InsuranceStore, StoreTransaction};
use crate::models::{InsuranceCommand, InsuranceDuration, NewInsuranceCommand, PowerRange, Tariff, Vehicle};
use crate::utils::errors::{internal_error, AppError, AppResult};

const COMMAND_COLUMNS: &str = r#"
    id, user_id, company_id, vehicle_id, usage_id, puissance_id, passenger_count,
    tarif_id, duration_id, start_date, end_date, base_price, total_price,
    payment_status, status, created_at, updated_at, deleted_at
"#;

/// Almacén PostgreSQL
#[derive(Clone)]
pub struct PgInsuranceStore {
    pool: PgPool,
}

impl PgInsuranceStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl InsuranceStore for PgInsuranceStore {
    async fn begin(&self) -> AppResult<Box<dyn StoreTransaction>> {
        let tx = self.pool.begin().await.map_err(unavailable)?;
        Ok(Box::new(PgStoreTransaction { tx: Some(tx) }))
    }

    async fn active_durations(&self) -> AppResult<Vec<InsuranceDuration>> {
        let durations = sqlx::query_as::<_, InsuranceDuration>(
            "SELECT id, name, months, coefficient, is_active FROM insurance_durations WHERE is_active = TRUE ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(durations)
    }

    async fn commands_for_user(&self, user_id: i64) -> AppResult<Vec<InsuranceCommand>> {
        let sql = format!(
            "SELECT {COMMAND_COLUMNS} FROM insurance_commands
             WHERE user_id = $1 AND deleted_at IS NULL
             ORDER BY created_at DESC, id DESC"
        );
        let commands = sqlx::query_as::<_, InsuranceCommand>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(commands)
    }

    async fn live_commands(&self) -> AppResult<Vec<InsuranceCommand>> {
        let sql = format!(
            "SELECT {COMMAND_COLUMNS} FROM insurance_commands WHERE deleted_at IS NULL ORDER BY id"
        );
        let commands = sqlx::query_as::<_, InsuranceCommand>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(commands)
    }

    async fn find_live_command(&self, id: i64) -> AppResult<Option<InsuranceCommand>> {
        let sql = format!(
            "SELECT {COMMAND_COLUMNS} FROM insurance_commands WHERE id = $1 AND deleted_at IS NULL"
        );
        let command = sqlx::query_as::<_, InsuranceCommand>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(command)
    }

    async fn soft_delete_command(&self, id: i64, deleted_at: DateTime<Utc>) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE insurance_commands SET deleted_at = $2, updated_at = $2 WHERE id = $1",
        )
        .bind(id)
        .bind(deleted_at)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

/// Transacción PostgreSQL; al soltarla sin commit, sqlx hace rollback
pub struct PgStoreTransaction {
    tx: Option<Transaction<'static, Postgres>>,
}

impl PgStoreTransaction {
    fn conn(&mut self) -> AppResult<&mut PgConnection> {
        self.tx
            .as_deref_mut()
            .ok_or_else(|| internal_error("transaction already committed"))
    }
}

#[async_trait]
impl StoreTransaction for PgStoreTransaction {
    async fn find_vehicle(&mut self, id: i64) -> AppResult<Option<Vehicle>> {
        let vehicle = sqlx::query_as::<_, Vehicle>(
            "SELECT id, usage_id, puissance_id, passagers, nombre_sur_plateau, created_by FROM vehicles WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.conn()?)
        .await?;

        Ok(vehicle)
    }

    async fn find_duration(&mut self, id: i64) -> AppResult<Option<InsuranceDuration>> {
        let duration = sqlx::query_as::<_, InsuranceDuration>(
            "SELECT id, name, months, coefficient, is_active FROM insurance_durations WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.conn()?)
        .await?;

        Ok(duration)
    }

    async fn power_ranges_for_usage(&mut self, usage_id: i64) -> AppResult<Vec<PowerRange>> {
        let ranges = sqlx::query_as::<_, PowerRange>(
            r#"
            SELECT id, usage_id, puissance_id, min_passager, max_passager, nbre_sur_plateau
            FROM puissance_ranges
            WHERE usage_id = $1
            ORDER BY id
            "#,
        )
        .bind(usage_id)
        .fetch_all(self.conn()?)
        .await?;

        Ok(ranges)
    }

    async fn tariff_for_power_range(&mut self, power_range_id: i64) -> AppResult<Option<Tariff>> {
        let tariff = sqlx::query_as::<_, Tariff>(
            "SELECT id, puissance_range_id, pn, frais FROM tarifs WHERE puissance_range_id = $1 ORDER BY id LIMIT 1",
        )
        .bind(power_range_id)
        .fetch_optional(self.conn()?)
        .await?;

        Ok(tariff)
    }

    async fn insert_command(&mut self, command: NewInsuranceCommand) -> AppResult<InsuranceCommand> {
        let sql = format!(
            r#"
            INSERT INTO insurance_commands (
                user_id, company_id, vehicle_id, usage_id, puissance_id, passenger_count,
                tarif_id, duration_id, start_date, end_date, base_price, total_price,
                payment_status, status, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, 'pending', 'active', $13, $13)
            RETURNING {COMMAND_COLUMNS}
            "#
        );
        let inserted = sqlx::query_as::<_, InsuranceCommand>(&sql)
            .bind(command.user_id)
            .bind(command.company_id)
            .bind(command.vehicle_id)
            .bind(command.usage_id)
            .bind(command.puissance_id)
            .bind(command.passenger_count)
            .bind(command.tarif_id)
            .bind(command.duration_id)
            .bind(command.start_date)
            .bind(command.end_date)
            .bind(command.base_price)
            .bind(command.total_price)
            .bind(command.created_at)
            .fetch_one(self.conn()?)
            .await?;

        Ok(inserted)
    }

    async fn commit(&mut self) -> AppResult<()> {
        let tx = self
            .tx
            .take()
            .ok_or_else(|| internal_error("transaction already committed"))?;
        tx.commit().await?;
        Ok(())
    }
}

fn unavailable(error: sqlx::Error) -> AppError {
    match error {
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            AppError::ServiceUnavailable(format!("database unavailable: {}", error))
        }
        other => AppError::Database(other),
    }
}
