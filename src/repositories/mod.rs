//! Acceso a datos
//!
//! `InsuranceStore` expone las lecturas y el borrado lógico de pedidos;
//! la creación de un pedido pasa por un `StoreTransaction` para que todo
//! el flujo se confirme o se descarte como una unidad.

pub mod memory_store;
pub mod pg_store;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::models::{InsuranceCommand, InsuranceDuration, NewInsuranceCommand, PowerRange, Tariff, Vehicle};
use crate::utils::errors::AppResult;

pub use memory_store::MemoryStore;
pub use pg_store::PgInsuranceStore;

#[async_trait]
pub trait InsuranceStore: Send + Sync {
    /// Abrir una transacción. Si se suelta sin `commit`, nada se persiste.
    async fn begin(&self) -> AppResult<Box<dyn StoreTransaction>>;

    async fn active_durations(&self) -> AppResult<Vec<InsuranceDuration>>;

    /// Pedidos vivos del usuario, más recientes primero
    async fn commands_for_user(&self, user_id: i64) -> AppResult<Vec<InsuranceCommand>>;

    /// Pedidos vivos, por id ascendente
    async fn live_commands(&self) -> AppResult<Vec<InsuranceCommand>>;

    async fn find_live_command(&self, id: i64) -> AppResult<Option<InsuranceCommand>>;

    /// Marca `deleted_at` aunque el pedido ya estuviera borrado.
    /// Devuelve `false` si el id no existe.
    async fn soft_delete_command(&self, id: i64, deleted_at: DateTime<Utc>) -> AppResult<bool>;
}

#[async_trait]
pub trait StoreTransaction: Send {
    async fn find_vehicle(&mut self, id: i64) -> AppResult<Option<Vehicle>>;

    async fn find_duration(&mut self, id: i64) -> AppResult<Option<InsuranceDuration>>;

    /// Tramos de un usage, por id ascendente
    async fn power_ranges_for_usage(&mut self, usage_id: i64) -> AppResult<Vec<PowerRange>>;

    /// Primer tarif (id más bajo) del tramo
    async fn tariff_for_power_range(&mut self, power_range_id: i64) -> AppResult<Option<Tariff>>;

    async fn insert_command(&mut self, command: NewInsuranceCommand) -> AppResult<InsuranceCommand>;

    async fn commit(&mut self) -> AppResult<()>;
}
