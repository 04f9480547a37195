//! CSV export with user-facing notifications

use std::path::{Path, PathBuf};
use tracing::warn;

use az_client::ExportApi;
use az_common::ExportKind;

use crate::notify::Notifications;

#[derive(Clone)]
pub struct Exporter {
    api: ExportApi,
    directory: PathBuf,
    notifications: Notifications,
}

impl Exporter {
    pub fn new(api: ExportApi, directory: impl Into<PathBuf>, notifications: Notifications) -> Self {
        Self {
            api,
            directory: directory.into(),
            notifications,
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Save `{kind}.csv` in the export directory; the saved path on success
    pub async fn export(&self, kind: ExportKind) -> Option<PathBuf> {
        match self.api.save_csv(kind, &self.directory).await {
            Ok(path) => {
                self.notifications
                    .success(format!("Export {} descărcat cu succes", kind.as_str()));
                Some(path)
            }
            Err(e) => {
                warn!(kind = kind.as_str(), error = %e, "Export failed");
                if !e.is_session_expired() {
                    self.notifications
                        .error(format!("Eroare la export {}", kind.as_str()));
                }
                None
            }
        }
    }
}
