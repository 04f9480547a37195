//! Attendance search and per-student statistics
//!
//! One-shot queries outside the paginated attendance list. Failures become
//! error notifications, except session loss which the session store handles.

use tracing::debug;

use az_client::{ApiError, AttendanceApi, CONNECTION_MESSAGE, FALLBACK_MESSAGE};
use az_common::{Attendance, AttendanceSearch, AttendanceStats};

use crate::notify::Notifications;

#[derive(Clone)]
pub struct AttendanceReports {
    api: AttendanceApi,
    notifications: Notifications,
}

impl AttendanceReports {
    pub fn new(api: AttendanceApi, notifications: Notifications) -> Self {
        Self { api, notifications }
    }

    pub async fn search(&self, search: &AttendanceSearch) -> Option<Vec<Attendance>> {
        match self.api.search(search).await {
            Ok(rows) => {
                debug!(rows = rows.len(), "Attendance search");
                Some(rows)
            }
            Err(e) => {
                self.report(&e);
                None
            }
        }
    }

    pub async fn stats(&self) -> Option<Vec<AttendanceStats>> {
        match self.api.stats().await {
            Ok(rows) => Some(rows),
            Err(e) => {
                self.report(&e);
                None
            }
        }
    }

    fn report(&self, err: &ApiError) {
        if err.is_session_expired() {
            return;
        }
        let message = if err.is_transport() {
            CONNECTION_MESSAGE
        } else {
            err.message().unwrap_or(FALLBACK_MESSAGE)
        };
        self.notifications.error(message);
    }
}
