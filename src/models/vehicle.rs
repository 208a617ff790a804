//! Modelo de Vehicle
//!
//! Solo los campos que intervienen en la tarificación. El vehículo se lee,
//! nunca se modifica desde este servicio.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Vehicle - mapea a la tabla vehicles
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Vehicle {
    pub id: i64,
    pub usage_id: i64,
    /// Categoría de potencia fiscal
    pub puissance_id: Option<i64>,
    pub passagers: Option<i32>,
    pub nombre_sur_plateau: Option<i32>,
    /// Usuario propietario
    pub created_by: i64,
}
