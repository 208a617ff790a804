//! Modelos de la tabla de tarifs
//!
//! Un `PowerRange` es la regla (usage, potencia, pasajeros, plateau) que
//! selecciona un `Tariff`.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Tramo de potencia - mapea a la tabla puissance_ranges
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct PowerRange {
    pub id: i64,
    pub usage_id: i64,
    pub puissance_id: Option<i64>,
    pub min_passager: Option<i32>,
    pub max_passager: Option<i32>,
    pub nbre_sur_plateau: Option<i32>,
}

impl PowerRange {
    /// Tramo sin pasajeros: ambos límites nulos o cero
    pub fn is_passengerless(&self) -> bool {
        matches!(self.min_passager, None | Some(0)) && matches!(self.max_passager, None | Some(0))
    }

    /// Un límite nulo nunca contiene un número de pasajeros
    pub fn contains_passengers(&self, count: i32) -> bool {
        matches!(self.min_passager, Some(min) if min <= count)
            && matches!(self.max_passager, Some(max) if count <= max)
    }
}

/// Tarif - mapea a la tabla tarifs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Tariff {
    pub id: i64,
    pub puissance_range_id: i64,
    /// Prime nette
    #[serde(with = "rust_decimal::serde::float")]
    pub pn: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub frais: Decimal,
}
