//! Cálculo de precios
//!
//! El coeficiente de una duración es un multiplicador anual: las pólizas de
//! 3 y 6 meses aplican un cuarto y la mitad. Ninguna otra duración se prorratea.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use thiserror::Error;

use crate::models::{InsuranceDuration, Tariff};
use crate::utils::errors::AppError;

/// TVA fija
pub const VAT_RATE: Decimal = dec!(0.18);

#[derive(Debug, Error, PartialEq)]
pub enum PricingError {
    #[error("negative pricing input: {0}")]
    NegativeInput(&'static str),

    #[error("price out of range: {0}")]
    OutOfRange(Decimal),
}

impl From<PricingError> for AppError {
    fn from(error: PricingError) -> Self {
        AppError::Internal(error.to_string())
    }
}

/// Desglose de un precio
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceBreakdown {
    /// Precio base prorrateado, sin impuestos
    pub base_total: Decimal,
    pub tax: Decimal,
    /// `base_total + tax` redondeado al entero (mitad al par)
    pub total: i64,
}

impl PriceBreakdown {
    /// TVA truncada hacia cero, tal como se muestra en la vista previa
    pub fn truncated_tax(&self) -> i64 {
        // tax >= 0 y acotado por `total`, cabe en i64
        self.tax.trunc().to_i64().unwrap_or_default()
    }
}

/// PN + frais
pub fn base_price(tariff: &Tariff) -> Decimal {
    tariff.pn + tariff.frais
}

/// Aplicar el coeficiente de la duración, con prorrateo trimestral o semestral
pub fn prorate(base_price: Decimal, duration: &InsuranceDuration) -> Decimal {
    let annual = base_price * duration.coefficient;
    match duration.months {
        3 => annual / dec!(4),
        6 => annual / dec!(2),
        _ => annual,
    }
}

pub fn compute_total(
    base_price: Decimal,
    duration: &InsuranceDuration,
) -> Result<PriceBreakdown, PricingError> {
    if base_price.is_sign_negative() && !base_price.is_zero() {
        return Err(PricingError::NegativeInput("base price"));
    }
    if duration.coefficient.is_sign_negative() && !duration.coefficient.is_zero() {
        return Err(PricingError::NegativeInput("coefficient"));
    }

    let base_total = prorate(base_price, duration);
    let tax = base_total * VAT_RATE;
    let rounded = (base_total + tax).round_dp_with_strategy(0, RoundingStrategy::MidpointNearestEven);
    let total = rounded.to_i64().ok_or(PricingError::OutOfRange(rounded))?;

    Ok(PriceBreakdown {
        base_total,
        tax,
        total,
    })
}
