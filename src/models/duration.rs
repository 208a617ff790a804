use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Duración de póliza - mapea a la tabla insurance_durations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct InsuranceDuration {
    pub id: i64,
    pub name: String,
    pub months: i32,
    /// Multiplicador anual aplicado al precio base
    #[serde(with = "rust_decimal::serde::float")]
    pub coefficient: Decimal,
    pub is_active: bool,
}
