use az_common::ExportKind;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::{ApiError, Result};
use crate::gateway::ApiGateway;

/// CSV downloads
#[derive(Clone)]
pub struct ExportApi {
    gateway: ApiGateway,
}

impl ExportApi {
    pub fn new(gateway: ApiGateway) -> Self {
        Self { gateway }
    }

    pub async fn download_csv(&self, kind: ExportKind) -> Result<Vec<u8>> {
        self.gateway
            .request_bytes(&format!("/export/csv/{}", kind.as_str()), &[])
            .await
    }

    /// Download and write `{type}.csv` into `directory`, returning the file path.
    pub async fn save_csv(&self, kind: ExportKind, directory: &Path) -> Result<PathBuf> {
        let bytes = self.download_csv(kind).await?;
        let path = directory.join(kind.file_name());
        tokio::fs::write(&path, &bytes).await.map_err(|e| ApiError::Io {
            path: path.clone(),
            message: e.to_string(),
        })?;
        info!(path = %path.display(), bytes = bytes.len(), "Saved CSV export");
        Ok(path)
    }
}
