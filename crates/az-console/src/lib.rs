//! AdminZone Console Core
//!
//! Client-side state for the AdminZone administration console:
//! - Session store: who is signed in, as a versioned `watch` snapshot
//! - Access guard, route table and role-filtered menu
//! - List queries with a stale-response guard and a shared invalidation registry
//! - Resource views: create/edit dialogs, delete confirmations, error classification
//! - Dashboard counters, lookups, attendance reports and CSV export
//!
//! [`Console`] wires everything over one API gateway.

pub mod classify;
pub mod console;
pub mod dashboard;
pub mod error;
pub mod export;
pub mod guard;
pub mod lookups;
pub mod nav;
pub mod notify;
pub mod query;
pub mod reports;
pub mod resources;
pub mod session;
pub mod view;

pub use classify::{BusinessRuleClassifier, ErrorClass, ErrorClassifier, StandardClassifier};
pub use console::Console;
pub use dashboard::DashboardCounts;
pub use error::{AuthError, ViewError};
pub use export::Exporter;
pub use guard::{guard, role_gate, GuardDecision, HOME_PATH, LOGIN_PATH};
pub use lookups::{LookupLists, LookupOption, Lookups};
pub use nav::{menu, resolve, Navigator, RouteEntry, ROUTES};
pub use notify::{Notification, NotificationLevel, Notifications};
pub use query::{FetchOutcome, FilterValue, ListQuery, ListSource, QueryClient, QueryKey, QueryState};
pub use reports::AttendanceReports;
pub use resources::{
    AttendanceSource, AuditSource, CourseSource, EnrollmentSource, StudentSource, UserSource,
};
pub use session::{Session, SessionSnapshot, SessionState, SessionStore};
pub use view::{
    DeleteConfirmation, DeleteOutcome, DialogMode, EditableSource, FormDialog, ResourceMessages,
    ResourceView, SubmitOutcome, ViewContext,
};
