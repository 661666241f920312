use std::sync::Arc;

use async_trait::async_trait;
use config::AppConfig;
use db::DBService;
use deployment::{Deployment, DeploymentError};
use services::services::{health::HealthService, qr_code::QrCodeService};

#[derive(Clone)]
pub struct LocalDeployment {
    config: Arc<AppConfig>,
    db: DBService,
    qr_code: QrCodeService,
    health: HealthService,
}

#[async_trait]
impl Deployment for LocalDeployment {
    async fn new() -> Result<Self, DeploymentError> {
        let config = AppConfig::from_env()?;
        let db = DBService::new(&config.database).await?;
        Ok(Self::from_parts(config, db))
    }

    fn config(&self) -> &Arc<AppConfig> {
        &self.config
    }

    fn db(&self) -> &DBService {
        &self.db
    }

    fn qr_code(&self) -> &QrCodeService {
        &self.qr_code
    }

    fn health(&self) -> &HealthService {
        &self.health
    }
}

impl LocalDeployment {
    /// Assembles a deployment around an already opened database.
    pub fn from_parts(config: AppConfig, db: DBService) -> Self {
        tracing::debug!(
            base_domain = %config.redirect.base_domain,
            https = %config.redirect.https,
            "Deployment ready"
        );
        Self {
            config: Arc::new(config),
            db,
            qr_code: QrCodeService::new(),
            health: HealthService::new(),
        }
    }
}
