use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use axum::{middleware::from_fn_with_state, response::Json, routing::get, Router};
use dotenvy::dotenv;
use serde_json::json;
use tokio::signal;
use tracing::{error, info, warn};

use fleet_manager::config::EnvironmentConfig;
use fleet_manager::middleware::auth::auth_middleware;
use fleet_manager::middleware::cors::cors_middleware;
use fleet_manager::routes;
use fleet_manager::state::AppState;
use fleet_manager::storage::{self, DocumentStore, LocalStore, RemoteStore};

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    info!("🚛 Fleet Manager - Seguimiento de flota y mantenimiento");
    info!("=======================================================");

    let config = EnvironmentConfig::default();

    // Conectar con el almacén de documentos; si no responde, caer al modo
    // local con un indicador explícito (nunca una falla silenciosa)
    let poll_interval = Duration::from_secs(config.store_poll_secs);
    let (store, demo_mode): (Arc<dyn DocumentStore>, bool) =
        match RemoteStore::connect(&config.store_url, poll_interval).await {
            Ok(remote) => (remote, false),
            Err(e) => {
                warn!("⚠️ Backend de documentos no disponible: {}", e);
                warn!("⚠️ Arrancando en MODO LOCAL con datos de demostración");
                let local = Arc::new(LocalStore::new());
                storage::seed::seed_demo_data(&local).await?;
                (local, true)
            }
        };

    let app_state = AppState::new(store, config.clone(), demo_mode);

    // Arrancar el directorio de flota: carga inicial más suscripciones
    Arc::clone(&app_state.directory)
        .start_sync(app_state.store.clone())
        .await
        .map_err(|e| anyhow::anyhow!("Error arrancando el directorio de flota: {}", e))?;

    let protected = Router::new()
        .nest("/api/fleet", routes::fleet_routes::create_fleet_router())
        .nest(
            "/api/maintenance",
            routes::maintenance_routes::create_maintenance_router(),
        )
        .nest("/api/users", routes::user_routes::create_user_admin_router())
        .nest("/api", routes::dashboard_routes::create_dashboard_router())
        .layer(from_fn_with_state(app_state.clone(), auth_middleware));

    let app = Router::new()
        .route("/health", get(health))
        .nest("/api/auth", routes::user_routes::create_auth_router())
        .merge(protected)
        .layer(cors_middleware())
        .with_state(app_state);

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /health - Health check");
    info!("🔑 Autenticación:");
    info!("   POST /api/auth/login - Login");
    info!("   POST /api/auth/logout - Logout");
    info!("   GET  /api/auth/me - Identidad actual");
    info!("   GET  /api/auth/exists - ¿Hay usuarios?");
    info!("   POST /api/auth/bootstrap - Primer administrador");
    info!("🚗 Flota:");
    info!("   POST   /api/fleet - Crear activo");
    info!("   GET    /api/fleet - Listar con búsqueda y filtros");
    info!("   GET    /api/fleet/:kind/:id - Obtener activo");
    info!("   PUT    /api/fleet/:kind/:id - Editar activo (transición de estado)");
    info!("   DELETE /api/fleet/:kind/:id - Borrar activo (manager)");
    info!("   GET    /api/fleet/history/:id - Historial de sesiones de estado");
    info!("   GET    /api/fleet/export - Exportar CSV");
    info!("   POST   /api/fleet/import - Importar CSV");
    info!("   DELETE /api/fleet - Reset de la flota (manager)");
    info!("🔧 Mantenimiento:");
    info!("   POST /api/maintenance - Registrar trabajo");
    info!("   GET  /api/maintenance/item/:id - Historial de un activo");
    info!("   GET  /api/maintenance/report/:kind/:id - Reporte CSV del activo");
    info!("📊 Dashboard:");
    info!("   GET  /api/dashboard/stats - Conteos por tipo y estado");
    info!("   GET  /api/dashboard/filters - Opciones de filtros en cascada");
    info!("   GET  /api/settings - Catálogos y checklist");
    info!("👥 Usuarios (manager):");
    info!("   GET    /api/users - Listar usuarios");
    info!("   POST   /api/users - Crear usuario");
    info!("   DELETE /api/users/:id - Borrar usuario");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("❌ Error del servidor: {}", e);
        return Err(e.into());
    }

    info!("👋 Servidor terminado");
    Ok(())
}

/// Health check con el indicador de modo de operación
async fn health(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> Json<serde_json::Value> {
    Json(json!({
        "service": "fleet-manager",
        "status": "ok",
        "demoMode": state.demo_mode,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
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
