use std::sync::Arc;

use async_trait::async_trait;
use config::{AppConfig, ConfigError};
use db::{DBService, DbErr};
use services::services::{health::HealthService, qr_code::QrCodeService};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DeploymentError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Database(#[from] DbErr),
}

/// Everything a request handler needs, cloned into each request.
#[async_trait]
pub trait Deployment: Clone + Send + Sync + 'static {
    async fn new() -> Result<Self, DeploymentError>;

    fn config(&self) -> &Arc<AppConfig>;

    fn db(&self) -> &DBService;

    fn qr_code(&self) -> &QrCodeService;

    fn health(&self) -> &HealthService;
}
