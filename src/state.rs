//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum.

use std::sync::Arc;

use crate::config::EnvironmentConfig;
use crate::models::settings::Settings;
use crate::services::auth_service::AuthService;
use crate::services::fleet_directory::FleetDirectory;
use crate::storage::DocumentStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub directory: Arc<FleetDirectory>,
    pub auth: Arc<AuthService>,
    pub config: EnvironmentConfig,
    pub settings: Settings,
    /// Indicador visible de modo local: el backend remoto no estaba
    /// disponible al arrancar
    pub demo_mode: bool,
}

impl AppState {
    pub fn new(store: Arc<dyn DocumentStore>, config: EnvironmentConfig, demo_mode: bool) -> Self {
        let auth = Arc::new(AuthService::new(Arc::clone(&store), &config.jwt_secret));
        Self {
            store,
            directory: Arc::new(FleetDirectory::new()),
            auth,
            config,
            settings: Settings::default(),
            demo_mode,
        }
    }
}
