//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum.

use std::sync::Arc;

use crate::config::environment::EnvironmentConfig;
use crate::repositories::InsuranceStore;
use crate::services::CommandService;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn InsuranceStore>,
    pub config: EnvironmentConfig,
}

impl AppState {
    pub fn new(store: Arc<dyn InsuranceStore>, config: EnvironmentConfig) -> Self {
        Self { store, config }
    }

    /// Servicio de pedidos ligado al almacén y la zona horaria configurados
    pub fn command_service(&self) -> CommandService {
        CommandService::new(Arc::clone(&self.store), self.config.time_zone)
    }
}
