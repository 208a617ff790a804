use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use dotenvy::dotenv;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use insurance_commands::config::{DatabaseConfig, EnvironmentConfig};
use insurance_commands::database;
use insurance_commands::repositories::PgInsuranceStore;
use insurance_commands::routes::create_app;
use insurance_commands::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    let config = EnvironmentConfig::from_env().context("configuración inválida")?;

    // Configurar logging; en desarrollo también se detallan las peticiones HTTP
    let default_filter = if config.is_development() {
        "insurance_commands=debug,tower_http=debug"
    } else {
        "insurance_commands=info,tower_http=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();

    info!("🛡️ Insurance Commands API");
    info!("================================================");

    let db_config = DatabaseConfig::from_env().context("configuración de base de datos inválida")?;

    // Inicializar base de datos
    let pool = match database::create_pool(&db_config).await {
        Ok(pool) => pool,
        Err(e) => {
            error!("❌ Error conectando a la base de datos: {}", e);
            return Err(anyhow::anyhow!("Error de base de datos: {}", e));
        }
    };

    if config.run_migrations {
        database::run_migrations(&pool)
            .await
            .context("error aplicando migraciones")?;
    }

    let addr: SocketAddr = config.server_url().parse().context("HOST/PORT inválidos")?;
    info!("🌍 Entorno: {} - zona horaria de referencia: {}", config.environment, config.time_zone);

    let state = AppState::new(Arc::new(PgInsuranceStore::new(pool)), config);
    let app = create_app(state);

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET    /health - Estado del servicio");
    info!("   POST   /api/insurance-commands/ - Crear pedido");
    info!("   POST   /api/insurance-commands/calculate/ - Vista previa de precio");
    info!("   GET    /api/insurance-commands/durations/ - Duraciones activas");
    info!("   GET    /api/insurance-commands/user-commands/?user_id= - Pedidos de un usuario");
    info!("   GET    /api/insurance-commands/ - Listar pedidos");
    info!("   GET    /api/insurance-commands/:id/ - Obtener pedido");
    info!("   DELETE /api/insurance-commands/:id/ - Borrado lógico");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| {
            error!("❌ Error del servidor: {}", e);
            e
        })?;

    info!("👋 Servidor terminado");
    Ok(())
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("❌ No se pudo instalar el handler de Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("❌ No se pudo instalar el handler de SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
