// Repository trait for telemetry data access
use crate::domain::telemetry::Telemetry;
use async_trait::async_trait;

#[async_trait]
pub trait TelemetryRepository: Send + Sync {
    /// List all stored session IDs, sorted
    async fn list_session_ids(&self) -> anyhow::Result<Vec<String>>;

    /// Load and decode one session; `None` if no such session is stored
    async fn load_telemetry(&self, session_id: &str) -> anyhow::Result<Option<Telemetry>>;
}
