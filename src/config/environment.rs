//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del entorno y variables de configuración.

use std::env;

use chrono_tz::Tz;
use thiserror::Error;

/// Errores al leer la configuración
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{key} has an invalid value: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub port: u16,
    pub host: String,
    pub jwt_secret: String,
    pub jwt_expiration: u64,
    pub cors_origins: Vec<String>,
    /// Zona horaria de referencia para las fechas de inicio de póliza
    pub time_zone: Tz,
    pub run_migrations: bool,
}

impl EnvironmentConfig {
    /// Leer la configuración desde las variables de entorno
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            port: parse_var("PORT", 3000)?,
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            jwt_secret: env::var("JWT_SECRET").map_err(|_| ConfigError::Missing("JWT_SECRET"))?,
            jwt_expiration: parse_var("JWT_EXPIRATION", 86_400)?,
            cors_origins: env::var("CORS_ORIGINS")
                .map(|origins| split_origins(&origins))
                .unwrap_or_default(),
            time_zone: parse_var("TIME_ZONE", Tz::UTC)?,
            run_migrations: parse_var("RUN_MIGRATIONS", true)?,
        })
    }

    /// Configuración para tests: UTC, sin migraciones
    pub fn for_tests(jwt_secret: &str) -> Self {
        Self {
            environment: "test".to_string(),
            port: 0,
            host: "127.0.0.1".to_string(),
            jwt_secret: jwt_secret.to_string(),
            jwt_expiration: 3600,
            cors_origins: Vec::new(),
            time_zone: Tz::UTC,
            run_migrations: false,
        }
    }

    /// Verificar si estamos en modo desarrollo
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Obtener la dirección del servidor
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_var<T>(key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            reason: e.to_string(),
        }),
        Err(_) => Ok(default),
    }
}

fn split_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_origins_skips_blanks() {
        let origins = split_origins("https://a.example, ,https://b.example,");
        assert_eq!(origins, vec!["https://a.example", "https://b.example"]);
    }

    #[test]
    fn test_for_tests_uses_utc() {
        let config = EnvironmentConfig::for_tests("secret");
        assert_eq!(config.time_zone, Tz::UTC);
        assert!(!config.run_migrations);
        assert!(!config.is_development());
        assert_eq!(config.server_url(), "127.0.0.1:0");
    }

    #[test]
    fn test_is_development() {
        let mut config = EnvironmentConfig::for_tests("secret");
        config.environment = "development".to_string();
        assert!(config.is_development());
        config.environment = "production".to_string();
        assert!(!config.is_development());
    }
}
