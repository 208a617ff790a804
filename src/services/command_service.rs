//! Servicio de pedidos de seguro
//!
//! Orquesta vehículo -> tarif -> duración -> precio -> fecha de fin -> registro.
//! La creación corre dentro de una única transacción del almacén.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use rust_decimal::Decimal;
use tracing::{debug, info};
use validator::Validate;

use crate::dto::{CalculatePriceRequest, CreateCommandRequest, PricePreview, TarifDetails};
use crate::models::{InsuranceCommand, InsuranceDuration, NewInsuranceCommand, Tariff};
use crate::repositories::{InsuranceStore, StoreTransaction};
use crate::services::policy_period::{parse_start_date, policy_end_date};
use crate::services::price_calculator::{self, PriceBreakdown};
use crate::services::tariff_resolver::{resolve_tariff, TariffCriteria};
use crate::utils::errors::{
    not_found_error, required_field_error, validation_error, AppError, AppResult,
};

/// Contexto explícito de cada petición
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestContext {
    /// Usuario autenticado
    pub user_id: i64,
    pub requested_at: DateTime<Utc>,
}

impl RequestContext {
    pub fn new(user_id: i64) -> Self {
        Self {
            user_id,
            requested_at: Utc::now(),
        }
    }
}

pub struct CommandService {
    store: Arc<dyn InsuranceStore>,
    time_zone: Tz,
}

impl CommandService {
    pub fn new(store: Arc<dyn InsuranceStore>, time_zone: Tz) -> Self {
        Self { store, time_zone }
    }

    pub async fn create_command(
        &self,
        ctx: &RequestContext,
        request: CreateCommandRequest,
    ) -> AppResult<InsuranceCommand> {
        let company_id = request.company_id.ok_or_else(|| required_field_error("company_id"))?;
        let vehicle_id = request.vehicle_id.ok_or_else(|| required_field_error("vehicle_id"))?;
        let duration_id = request.duration_id.ok_or_else(|| required_field_error("duration_id"))?;
        let start_date = request.start_date.ok_or_else(|| required_field_error("start_date"))?;

        // Soltar `tx` sin commit descarta todo lo hecho
        let mut tx = self.store.begin().await?;

        let vehicle = tx
            .find_vehicle(vehicle_id)
            .await?
            .ok_or_else(|| not_found_error("Vehicle", vehicle_id))?;

        let criteria = TariffCriteria {
            usage_id: vehicle.usage_id,
            puissance_id: vehicle.puissance_id,
            passenger_count: vehicle.passagers,
            nombre_sur_plateau: vehicle.nombre_sur_plateau,
        };
        let tariff = resolve_tariff(&mut *tx, &criteria)
            .await?
            .ok_or(AppError::TariffNotFound)?;

        let duration = load_duration(&mut *tx, duration_id).await?;
        let (base_price, price) = price_for(&tariff, &duration)?;

        let start = parse_start_date(&start_date, self.time_zone).ok_or_else(|| {
            validation_error("start_date", "Enter a valid ISO 8601 date or date-time.")
        })?;
        let end = policy_end_date(start, duration.months).ok_or_else(|| {
            validation_error("start_date", "The policy end date is out of range.")
        })?;

        let command = tx
            .insert_command(NewInsuranceCommand {
                user_id: vehicle.created_by,
                company_id,
                vehicle_id: vehicle.id,
                usage_id: vehicle.usage_id,
                puissance_id: vehicle.puissance_id,
                passenger_count: vehicle.passagers,
                tarif_id: tariff.id,
                duration_id: duration.id,
                start_date: start.with_timezone(&Utc),
                end_date: end.with_timezone(&Utc),
                base_price,
                total_price: price.total,
                created_at: ctx.requested_at,
            })
            .await?;
        tx.commit().await?;

        info!(
            "✅ Pedido {} creado por usuario {} (vehículo {}, total {})",
            command.id, ctx.user_id, command.vehicle_id, command.total_price
        );
        Ok(command)
    }

    pub async fn preview_price(
        &self,
        ctx: &RequestContext,
        request: CalculatePriceRequest,
    ) -> AppResult<PricePreview> {
        request.validate()?;
        let usage_id = request.usage_id.ok_or_else(|| required_field_error("usage_id"))?;
        let duration_id = request.duration_id.ok_or_else(|| required_field_error("duration_id"))?;

        // Transacción de solo lectura, nunca se confirma
        let mut tx = self.store.begin().await?;

        let criteria = TariffCriteria {
            usage_id,
            puissance_id: request.puissance_id,
            passenger_count: request.passenger_count,
            nombre_sur_plateau: request.nombre_sur_plateau,
        };
        let tariff = resolve_tariff(&mut *tx, &criteria)
            .await?
            .ok_or(AppError::TariffNotFound)?;
        let duration = load_duration(&mut *tx, duration_id).await?;
        let (base_price, price) = price_for(&tariff, &duration)?;

        debug!("💶 Vista previa para usuario {} {:?}: {:?}", ctx.user_id, criteria, price);
        Ok(PricePreview {
            base_price,
            duration: duration.name,
            coefficient: duration.coefficient,
            tva: price.truncated_tax(),
            total_price: price.total,
            tarif_details: TarifDetails { pn: tariff.pn },
        })
    }

    pub async fn list_durations(&self, ctx: &RequestContext) -> AppResult<Vec<InsuranceDuration>> {
        debug!("📋 Duraciones activas solicitadas por usuario {}", ctx.user_id);
        self.store.active_durations().await
    }

    pub async fn list_user_commands(
        &self,
        ctx: &RequestContext,
        user_id: Option<&str>,
    ) -> AppResult<Vec<InsuranceCommand>> {
        let raw = user_id
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or_else(|| validation_error("user_id", "`user_id` query param required"))?;
        let user_id: i64 = raw
            .parse()
            .map_err(|_| validation_error("user_id", "`user_id` must be an integer"))?;

        debug!("📋 Pedidos del usuario {} solicitados por {}", user_id, ctx.user_id);
        self.store.commands_for_user(user_id).await
    }

    pub async fn list_commands(&self, ctx: &RequestContext) -> AppResult<Vec<InsuranceCommand>> {
        debug!("📋 Listado de pedidos solicitado por usuario {}", ctx.user_id);
        self.store.live_commands().await
    }

    pub async fn get_command(&self, ctx: &RequestContext, id: i64) -> AppResult<InsuranceCommand> {
        debug!("🔍 Pedido {} solicitado por usuario {}", id, ctx.user_id);
        self.store
            .find_live_command(id)
            .await?
            .ok_or_else(|| not_found_error("InsuranceCommand", id))
    }

    /// Borrado lógico; repetirlo sobre un pedido ya borrado no es un error
    pub async fn soft_delete_command(&self, ctx: &RequestContext, id: i64) -> AppResult<()> {
        if !self.store.soft_delete_command(id, ctx.requested_at).await? {
            return Err(not_found_error("InsuranceCommand", id));
        }
        info!("🗑️ Pedido {} borrado por usuario {}", id, ctx.user_id);
        Ok(())
    }
}

async fn load_duration(tx: &mut dyn StoreTransaction, id: i64) -> AppResult<InsuranceDuration> {
    tx.find_duration(id)
        .await?
        .ok_or_else(|| not_found_error("InsuranceDuration", id))
}

fn price_for(tariff: &Tariff, duration: &InsuranceDuration) -> AppResult<(Decimal, PriceBreakdown)> {
    let base_price = price_calculator::base_price(tariff);
    let price = price_calculator::compute_total(base_price, duration)?;
    Ok((base_price, price))
}
