//! Modelo de InsuranceCommand
//!
//! Pedido de seguro persistido. Nunca se borra físicamente: `deleted_at`
//! marca el borrado lógico.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

pub const PAYMENT_STATUS_PENDING: &str = "pending";
pub const COMMAND_STATUS_ACTIVE: &str = "active";

/// InsuranceCommand - mapea a la tabla insurance_commands
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct InsuranceCommand {
    pub id: i64,
    pub user_id: i64,
    pub company_id: i64,
    pub vehicle_id: i64,
    pub usage_id: i64,
    pub puissance_id: Option<i64>,
    pub passenger_count: Option<i32>,
    pub tarif_id: i64,
    pub duration_id: i64,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    #[serde(with = "rust_decimal::serde::float")]
    pub base_price: Decimal,
    pub total_price: i64,
    pub payment_status: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl InsuranceCommand {
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// Datos de un pedido todavía no insertado
#[derive(Debug, Clone)]
pub struct NewInsuranceCommand {
    pub user_id: i64,
    pub company_id: i64,
    pub vehicle_id: i64,
    pub usage_id: i64,
    pub puissance_id: Option<i64>,
    pub passenger_count: Option<i32>,
    pub tarif_id: i64,
    pub duration_id: i64,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub base_price: Decimal,
    pub total_price: i64,
    pub created_at: DateTime<Utc>,
}

impl NewInsuranceCommand {
    /// Materializar el registro con el id asignado por el almacén
    pub fn into_command(self, id: i64) -> InsuranceCommand {
        InsuranceCommand {
            id,
            user_id: self.user_id,
            company_id: self.company_id,
            vehicle_id: self.vehicle_id,
            usage_id: self.usage_id,
            puissance_id: self.puissance_id,
            passenger_count: self.passenger_count,
            tarif_id: self.tarif_id,
            duration_id: self.duration_id,
            start_date: self.start_date,
            end_date: self.end_date,
            base_price: self.base_price,
            total_price: self.total_price,
            payment_status: PAYMENT_STATUS_PENDING.to_string(),
            status: COMMAND_STATUS_ACTIVE.to_string(),
            created_at: self.created_at,
            updated_at: self.created_at,
            deleted_at: None,
        }
    }
}
