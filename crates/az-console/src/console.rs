//! Console wiring
//!
//! [`Console`] owns the shared pieces (gateway, session store, navigator,
//! notifications, query registry) and hands out views over them.
//!
//! A background task listens for gateway session events: when the server
//! rejects the session on a non-auth request, the session is cleared and the
//! navigator is sent to the login view, remembering where the user was.

use std::sync::Arc;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info};

use az_client::{AdminZoneApi, ApiError, GatewayConfig, SessionEvent};
use az_common::LoginForm;
use az_config::ConsoleConfig;

use crate::dashboard::{load_counts, DashboardCounts};
use crate::error::AuthError;
use crate::export::Exporter;
use crate::guard::GuardDecision;
use crate::lookups::Lookups;
use crate::nav::{menu, Navigator, RouteEntry};
use crate::notify::Notifications;
use crate::query::{ListQuery, ListSource, QueryClient, QueryKey};
use crate::reports::AttendanceReports;
use crate::resources::{
    AttendanceSource, AuditSource, CourseSource, EnrollmentSource, StudentSource, UserSource,
};
use crate::session::{Session, SessionState, SessionStore};
use crate::view::{ResourceView, ViewContext};

pub struct Console {
    config: ConsoleConfig,
    api: AdminZoneApi,
    session: Arc<SessionStore>,
    navigator: Arc<Navigator>,
    notifications: Notifications,
    queries: QueryClient,
    shutdown_tx: broadcast::Sender<()>,
}

impl Console {
    /// Build the console and start the session event listener.
    /// Must be called inside a tokio runtime.
    pub fn new(config: ConsoleConfig) -> Result<Self, ApiError> {
        let api = AdminZoneApi::new(GatewayConfig::from(&config.api))?;
        let session = Arc::new(SessionStore::new(api.auth.clone()));
        let navigator = Arc::new(Navigator::new());
        let notifications = Notifications::new(config.ui.max_notifications);
        let (shutdown_tx, _) = broadcast::channel(1);

        spawn_session_listener(
            api.gateway.subscribe(),
            shutdown_tx.subscribe(),
            session.clone(),
            navigator.clone(),
        );

        info!(base_url = %api.gateway.base_url(), "Console ready");
        Ok(Self {
            config,
            api,
            session,
            navigator,
            notifications,
            queries: QueryClient::new(),
            shutdown_tx,
        })
    }

    pub fn config(&self) -> &ConsoleConfig {
        &self.config
    }

    pub fn api(&self) -> &AdminZoneApi {
        &self.api
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    pub fn navigator(&self) -> &Arc<Navigator> {
        &self.navigator
    }

    pub fn notifications(&self) -> &Notifications {
        &self.notifications
    }

    pub fn queries(&self) -> &QueryClient {
        &self.queries
    }

    // ========================================================================
    // Session and navigation
    // ========================================================================

    /// Run the initial who-am-I probe
    pub async fn start(&self) -> SessionState {
        self.session.probe().await
    }

    /// Sign in and return to the remembered view
    pub async fn login(&self, form: &LoginForm) -> Result<Session, AuthError> {
        let session = self.session.login(form).await?;
        self.navigator.after_login(&self.session.state());
        Ok(session)
    }

    pub async fn logout(&self) {
        self.session.logout().await;
        self.navigator.to_login();
    }

    pub fn navigate(&self, path: &str) -> GuardDecision {
        self.navigator.navigate(&self.session.state(), path)
    }

    /// Menu for the signed-in user; empty when nobody is signed in
    pub fn menu(&self) -> Vec<&'static RouteEntry> {
        self.session.current().map(|s| menu(&s)).unwrap_or_default()
    }

    // ========================================================================
    // Views
    // ========================================================================

    pub fn view_context(&self) -> ViewContext {
        ViewContext {
            queries: self.queries.clone(),
            session: self.session.clone(),
            notifications: self.notifications.clone(),
            strict_phone: self.config.validation.strict_phone,
            page_size: self.config.ui.default_page_size,
        }
    }

    pub fn students(&self) -> ResourceView<StudentSource> {
        ResourceView::new(StudentSource::new(self.api.students.clone()), self.view_context())
    }

    pub fn courses(&self) -> ResourceView<CourseSource> {
        ResourceView::new(CourseSource::new(self.api.courses.clone()), self.view_context())
    }

    pub fn enrollments(&self) -> ResourceView<EnrollmentSource> {
        ResourceView::new(EnrollmentSource::new(self.api.enrollments.clone()), self.view_context())
    }

    pub fn attendance(&self) -> ResourceView<AttendanceSource> {
        ResourceView::new(AttendanceSource::new(self.api.attendance.clone()), self.view_context())
    }

    pub fn users(&self) -> ResourceView<UserSource> {
        ResourceView::new(UserSource::new(self.api.users.clone()), self.view_context())
    }

    /// Read-only audit list; detach it when the view goes away
    pub fn audit(&self) -> Arc<ListQuery<AuditSource>> {
        let source = Arc::new(AuditSource::new(self.api.audit.clone()));
        let key = QueryKey::new(source.name(), self.config.ui.audit_page_size);
        let query = ListQuery::new(source, key);
        self.queries.register(&query);
        query
    }

    pub fn lookups(&self) -> Lookups {
        Lookups::new(
            self.api.students.clone(),
            self.api.courses.clone(),
            self.config.ui.lookup_size,
        )
    }

    pub async fn dashboard(&self) -> DashboardCounts {
        load_counts(&self.api).await
    }

    pub fn reports(&self) -> AttendanceReports {
        AttendanceReports::new(self.api.attendance.clone(), self.notifications.clone())
    }

    pub fn exporter(&self) -> Exporter {
        Exporter::new(
            self.api.export.clone(),
            self.config.export.directory.clone(),
            self.notifications.clone(),
        )
    }

    /// Stop the session event listener
    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(());
    }
}

impl Drop for Console {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn spawn_session_listener(
    mut events: broadcast::Receiver<SessionEvent>,
    mut shutdown_rx: broadcast::Receiver<()>,
    session: Arc<SessionStore>,
    navigator: Arc<Navigator>,
) {
    tokio::spawn(async move {
        loop {
            tokio::select! {
                event = events.recv() => match event {
                    Ok(SessionEvent::Invalidated { path }) => {
                        if session.invalidate() {
                            info!(path = %path, "Session expired; redirecting to login");
                            navigator.force_login();
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        // Missed events can only have been invalidations
                        debug!(skipped, "Session events lagged");
                        if session.invalidate() {
                            navigator.force_login();
                        }
                    }
                    Err(RecvError::Closed) => break,
                },
                _ = shutdown_rx.recv() => {
                    debug!("Session listener shutting down");
                    break;
                }
            }
        }
    });
}
