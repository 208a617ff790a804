//! Almacén en memoria
//!
//! Misma semántica que el almacén PostgreSQL: los pedidos insertados en una
//! transacción solo se publican en `commit`. Se usa en los tests y para
//! simular caídas del almacén.

use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::{InsuranceStore, StoreTransaction};
use crate::models::{InsuranceCommand, InsuranceDuration, NewInsuranceCommand, PowerRange, Tariff, Vehicle};
use crate::utils::errors::{internal_error, AppError, AppResult};

#[derive(Debug, Default)]
struct Tables {
    vehicles: Vec<Vehicle>,
    power_ranges: Vec<PowerRange>,
    tariffs: Vec<Tariff>,
    durations: Vec<InsuranceDuration>,
    commands: Vec<InsuranceCommand>,
}

#[derive(Debug, Default)]
struct Shared {
    tables: Mutex<Tables>,
    next_command_id: AtomicI64,
    reject_inserts: AtomicBool,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    shared: Arc<Shared>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> AppResult<MutexGuard<'_, Tables>> {
        lock(&self.shared)
    }

    pub fn add_vehicle(&self, vehicle: Vehicle) -> AppResult<()> {
        self.tables()?.vehicles.push(vehicle);
        Ok(())
    }

    pub fn add_power_range(&self, range: PowerRange) -> AppResult<()> {
        self.tables()?.power_ranges.push(range);
        Ok(())
    }

    pub fn add_tariff(&self, tariff: Tariff) -> AppResult<()> {
        self.tables()?.tariffs.push(tariff);
        Ok(())
    }

    pub fn add_duration(&self, duration: InsuranceDuration) -> AppResult<()> {
        self.tables()?.durations.push(duration);
        Ok(())
    }

    /// Todos los pedidos, incluidos los borrados
    pub fn all_commands(&self) -> AppResult<Vec<InsuranceCommand>> {
        Ok(self.tables()?.commands.clone())
    }

    /// Simular un almacén que rechaza escrituras
    pub fn reject_inserts(&self, reject: bool) {
        self.shared.reject_inserts.store(reject, Ordering::SeqCst);
    }
}

fn lock(shared: &Shared) -> AppResult<MutexGuard<'_, Tables>> {
    shared
        .tables
        .lock()
        .map_err(|_| internal_error("memory store lock poisoned"))
}

#[async_trait]
impl InsuranceStore for MemoryStore {
    async fn begin(&self) -> AppResult<Box<dyn StoreTransaction>> {
        Ok(Box::new(MemoryTransaction {
            shared: Arc::clone(&self.shared),
            pending: Vec::new(),
            committed: false,
        }))
    }

    async fn active_durations(&self) -> AppResult<Vec<InsuranceDuration>> {
        let mut durations: Vec<_> = self
            .tables()?
            .durations
            .iter()
            .filter(|d| d.is_active)
            .cloned()
            .collect();
        durations.sort_by_key(|d| d.id);
        Ok(durations)
    }

    async fn commands_for_user(&self, user_id: i64) -> AppResult<Vec<InsuranceCommand>> {
        let mut commands: Vec<_> = self
            .tables()?
            .commands
            .iter()
            .filter(|c| c.user_id == user_id && !c.is_deleted())
            .cloned()
            .collect();
        commands.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(commands)
    }

    async fn live_commands(&self) -> AppResult<Vec<InsuranceCommand>> {
        let mut commands: Vec<_> = self
            .tables()?
            .commands
            .iter()
            .filter(|c| !c.is_deleted())
            .cloned()
            .collect();
        commands.sort_by_key(|c| c.id);
        Ok(commands)
    }

    async fn find_live_command(&self, id: i64) -> AppResult<Option<InsuranceCommand>> {
        Ok(self
            .tables()?
            .commands
            .iter()
            .find(|c| c.id == id && !c.is_deleted())
            .cloned())
    }

    async fn soft_delete_command(&self, id: i64, deleted_at: DateTime<Utc>) -> AppResult<bool> {
        let mut tables = self.tables()?;
        match tables.commands.iter_mut().find(|c| c.id == id) {
            Some(command) => {
                command.deleted_at = Some(deleted_at);
                command.updated_at = deleted_at;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

pub struct MemoryTransaction {
    shared: Arc<Shared>,
    pending: Vec<InsuranceCommand>,
    committed: bool,
}

impl MemoryTransaction {
    fn ensure_open(&self) -> AppResult<()> {
        if self.committed {
            return Err(internal_error("transaction already committed"));
        }
        Ok(())
    }
}

#[async_trait]
impl StoreTransaction for MemoryTransaction {
    async fn find_vehicle(&mut self, id: i64) -> AppResult<Option<Vehicle>> {
        self.ensure_open()?;
        Ok(lock(&self.shared)?.vehicles.iter().find(|v| v.id == id).cloned())
    }

    async fn find_duration(&mut self, id: i64) -> AppResult<Option<InsuranceDuration>> {
        self.ensure_open()?;
        Ok(lock(&self.shared)?.durations.iter().find(|d| d.id == id).cloned())
    }

    async fn power_ranges_for_usage(&mut self, usage_id: i64) -> AppResult<Vec<PowerRange>> {
        self.ensure_open()?;
        let mut ranges: Vec<_> = lock(&self.shared)?
            .power_ranges
            .iter()
            .filter(|r| r.usage_id == usage_id)
            .cloned()
            .collect();
        ranges.sort_by_key(|r| r.id);
        Ok(ranges)
    }

    async fn tariff_for_power_range(&mut self, power_range_id: i64) -> AppResult<Option<Tariff>> {
        self.ensure_open()?;
        Ok(lock(&self.shared)?
            .tariffs
            .iter()
            .filter(|t| t.puissance_range_id == power_range_id)
            .min_by_key(|t| t.id)
            .cloned())
    }

    async fn insert_command(&mut self, command: NewInsuranceCommand) -> AppResult<InsuranceCommand> {
        self.ensure_open()?;
        if self.shared.reject_inserts.load(Ordering::SeqCst) {
            return Err(AppError::ServiceUnavailable("memory store rejected the insert".to_string()));
        }
        // Como una secuencia SQL: un id consumido no se reutiliza tras un rollback
        let id = self.shared.next_command_id.fetch_add(1, Ordering::SeqCst) + 1;
        let inserted = command.into_command(id);
        self.pending.push(inserted.clone());
        Ok(inserted)
    }

    async fn commit(&mut self) -> AppResult<()> {
        self.ensure_open()?;
        let mut tables = lock(&self.shared)?;
        tables.commands.append(&mut self.pending);
        self.committed = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn new_command(user_id: i64, created_at: DateTime<Utc>) -> NewInsuranceCommand {
        NewInsuranceCommand {
            user_id,
            company_id: 1,
            vehicle_id: 1,
            usage_id: 1,
            puissance_id: None,
            passenger_count: None,
            tarif_id: 1,
            duration_id: 1,
            start_date: created_at,
            end_date: created_at,
            base_price: dec!(1050),
            total_price: 1239,
            created_at,
        }
    }

    #[tokio::test]
    async fn test_uncommitted_transaction_leaves_nothing() {
        let store = MemoryStore::new();
        {
            let mut tx = store.begin().await.unwrap();
            tx.insert_command(new_command(1, Utc::now())).await.unwrap();
        }
        assert!(store.all_commands().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_commit_publishes_and_ids_increase() {
        let store = MemoryStore::new();
        let mut tx = store.begin().await.unwrap();
        let first = tx.insert_command(new_command(1, Utc::now())).await.unwrap();
        let second = tx.insert_command(new_command(1, Utc::now())).await.unwrap();
        tx.commit().await.unwrap();

        assert!(second.id > first.id);
        assert_eq!(store.live_commands().await.unwrap().len(), 2);
        assert!(tx.commit().await.is_err());
    }

    #[tokio::test]
    async fn test_soft_delete_hides_but_keeps_row() {
        let store = MemoryStore::new();
        let mut tx = store.begin().await.unwrap();
        let command = tx.insert_command(new_command(3, Utc::now())).await.unwrap();
        tx.commit().await.unwrap();

        assert!(store.soft_delete_command(command.id, Utc::now()).await.unwrap());
        assert!(store.soft_delete_command(command.id, Utc::now()).await.unwrap());
        assert!(!store.soft_delete_command(999, Utc::now()).await.unwrap());

        assert!(store.find_live_command(command.id).await.unwrap().is_none());
        assert!(store.commands_for_user(3).await.unwrap().is_empty());
        assert_eq!(store.all_commands().unwrap().len(), 1);
    }
}
