//! Services module
//!
//! Este módulo contiene la lógica de negocio: resolución de tarifs,
//! cálculo de precios, periodo de póliza y la orquestación de pedidos.

pub mod command_service;
pub mod policy_period;
pub mod price_calculator;
pub mod tariff_resolver;

pub use command_service::{CommandService, RequestContext};
