//! API de pedidos de seguro de vehículos
//!
//! Creación, vista previa de precio, listados y borrado lógico de pedidos,
//! sobre axum + sqlx (PostgreSQL).

pub mod config;
pub mod database;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;
