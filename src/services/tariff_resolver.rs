//! Resolución de tarifs
//!
//! Los tramos del usage llegan ya filtrados y ordenados por id desde el
//! almacén; el resto de criterios se aplican aquí en orden, estrechando el
//! conjunto paso a paso. Gana el primer tramo restante (id más bajo).

use tracing::debug;

use crate::models::{PowerRange, Tariff};
use crate::repositories::StoreTransaction;
use crate::utils::errors::AppResult;

/// Criterios de búsqueda de un tarif. Un valor cero cuenta como ausente.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TariffCriteria {
    pub usage_id: i64,
    pub puissance_id: Option<i64>,
    pub passenger_count: Option<i32>,
    pub nombre_sur_plateau: Option<i32>,
}

impl TariffCriteria {
    fn passengers(&self) -> Option<i32> {
        self.passenger_count.filter(|&count| count != 0)
    }

    fn puissance(&self) -> Option<i64> {
        self.puissance_id.filter(|&id| id != 0)
    }

    fn plateau(&self) -> Option<i32> {
        self.nombre_sur_plateau.filter(|&count| count != 0)
    }
}

/// Seleccionar el tramo que corresponde a los criterios
pub fn select_power_range<'a>(
    ranges: &'a [PowerRange],
    criteria: &TariffCriteria,
) -> Option<&'a PowerRange> {
    let mut candidates: Vec<&PowerRange> = ranges
        .iter()
        .filter(|range| range.usage_id == criteria.usage_id)
        .collect();

    match criteria.passengers() {
        Some(count) => candidates.retain(|range| range.contains_passengers(count)),
        None => candidates.retain(|range| range.is_passengerless()),
    }

    if let Some(puissance_id) = criteria.puissance() {
        candidates.retain(|range| range.puissance_id == Some(puissance_id));
    }

    if let Some(plateau) = criteria.plateau() {
        candidates.retain(|range| range.nbre_sur_plateau == Some(plateau));
    }

    candidates.into_iter().min_by_key(|range| range.id)
}

/// Buscar el tarif. `Ok(None)` es un resultado normal, no un fallo.
pub async fn resolve_tariff(
    tx: &mut dyn StoreTransaction,
    criteria: &TariffCriteria,
) -> AppResult<Option<Tariff>> {
    let ranges = tx.power_ranges_for_usage(criteria.usage_id).await?;

    let Some(range) = select_power_range(&ranges, criteria) else {
        debug!("🔎 Ningún tramo para {:?} ({} candidatos)", criteria, ranges.len());
        return Ok(None);
    };

    let tariff = tx.tariff_for_power_range(range.id).await?;
    if tariff.is_none() {
        debug!("🔎 Tramo {} sin tarif asociado", range.id);
    }
    Ok(tariff)
}
