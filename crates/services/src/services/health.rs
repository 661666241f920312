use db::DBService;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadinessStatus {
    Ready,
    NotReady,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReadinessChecks {
    pub database: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReadinessReport {
    pub status: ReadinessStatus,
    pub checks: ReadinessChecks,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

impl ReadinessReport {
    pub fn is_ready(&self) -> bool {
        self.status == ReadinessStatus::Ready
    }
}

#[derive(Clone, Default)]
pub struct HealthService;

impl HealthService {
    pub fn new() -> Self {
        Self
    }

    /// Probes every dependency. Failures are reported, never propagated.
    pub async fn readiness(&self, db: &DBService) -> ReadinessReport {
        let mut errors = Vec::new();

        let database = match db.check_connection().await {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(error = %err, "Readiness check: database unavailable");
                errors.push(format!("Database check failed: {err}"));
                false
            }
        };

        ReadinessReport {
            status: if errors.is_empty() {
                ReadinessStatus::Ready
            } else {
                ReadinessStatus::NotReady
            },
            checks: ReadinessChecks { database },
            errors,
        }
    }
}
