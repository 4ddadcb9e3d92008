use axum::Router;
use tracing::{error, info, warn};

use crate::app::state::{Repositories, Services};
use crate::config::{AppConfig, BootstrapStaffConfig, JwtConfig, MongoConfig};
use crate::util::jwt::JwtTokenUtilsImpl;
use std::sync::Arc;

pub struct App {
    config: AppConfig,
    router: Router,
    pub services: Services,
}

impl App {
    pub async fn new() -> Result<Self, Box<dyn std::error::Error>> {
        let config = AppConfig::from_env();
        let jwt_config = JwtConfig::from_env()?;
        let mongo_config = MongoConfig::from_env()?;

        let db = mongo_config.connect().await?;
        info!(database = %mongo_config.database, "Connected to MongoDB");
        let repos = Repositories::mongo(&db).await?;

        let jwt_utils = Arc::new(JwtTokenUtilsImpl::new(jwt_config));
        let services = Services::new(repos, jwt_utils);

        services.role.seed_defaults().await?;
        Self::create_first_staff_user(&services).await;

        let router = services.router();
        Ok(App { config, router, services })
    }

    pub async fn start(self) -> Result<(), Box<dyn std::error::Error>> {
        let addr = self.config.socket_addr()?;
        info!("Server running at http://{}", addr);
        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, self.router).await?;
        Ok(())
    }

    /// The first OAS staff account cannot be created through the API.
    async fn create_first_staff_user(services: &Services) {
        let staff_conf = match BootstrapStaffConfig::from_env() {
            Ok(c) => c,
            Err(e) => {
                warn!("Bootstrap staff config not loaded: {e}");
                return;
            }
        };
        match services.user.ensure_bootstrap_staff(&staff_conf).await {
            Ok(true) => info!("First OAS staff user created."),
            Ok(false) => {}
            Err(e) => error!("Failed to create OAS staff user: {e}"),
        }
    }
}
