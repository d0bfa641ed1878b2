// Filesystem repository implementation
use crate::application::telemetry_repository::TelemetryRepository;
use crate::domain::telemetry::Telemetry;
use crate::infrastructure::config::StorageSettings;
use crate::infrastructure::telemetry_decoder::decode_telemetry;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::PathBuf;

/// Sessions stored as `<data_dir>/<id>.<extension>`.
#[derive(Debug, Clone)]
pub struct FileRepository {
    data_dir: PathBuf,
    extension: String,
}

impl FileRepository {
    pub fn new(data_dir: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            data_dir: data_dir.into(),
            extension: extension.into().trim_start_matches('.').to_string(),
        }
    }

    pub fn from_settings(settings: &StorageSettings) -> Self {
        Self::new(&settings.data_dir, &settings.extension)
    }

    fn session_path(&self, session_id: &str) -> Option<PathBuf> {
        let valid = !session_id.is_empty()
            && session_id != "."
            && session_id != ".."
            && !session_id.contains(['/', '\\']);
        valid.then(|| self.data_dir.join(format!("{}.{}", session_id, self.extension)))
    }
}

#[async_trait]
impl TelemetryRepository for FileRepository {
    async fn list_session_ids(&self) -> Result<Vec<String>> {
        let mut entries = tokio::fs::read_dir(&self.data_dir)
            .await
            .with_context(|| format!("Failed to read data directory {}", self.data_dir.display()))?;

        let mut ids = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            let matches_extension = path
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| e == self.extension)
                .unwrap_or(false);
            if !matches_extension || !entry.file_type().await?.is_file() {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                ids.push(stem.to_string());
            }
        }

        ids.sort();
        tracing::debug!("Found {} sessions in {}", ids.len(), self.data_dir.display());
        Ok(ids)
    }

    async fn load_telemetry(&self, session_id: &str) -> Result<Option<Telemetry>> {
        let Some(path) = self.session_path(session_id) else {
            tracing::warn!("Rejecting session id {:?}", session_id);
            return Ok(None);
        };

        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read session file {}", path.display()));
            }
        };

        let telemetry = decode_telemetry(&bytes)
            .with_context(|| format!("Failed to decode session {}", session_id))?;
        tracing::debug!(
            "Loaded session {} ({} samples at {} Hz)",
            session_id,
            telemetry.record_count(),
            telemetry.sample_rate
        );
        Ok(Some(telemetry))
    }
}
