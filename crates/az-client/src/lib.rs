//! AdminZone API Client
//!
//! HTTP access to the AdminZone backend:
//! - [`ApiGateway`]: cookie-carrying client with session-loss interception
//! - Typed per-resource clients (students, courses, enrollments, ...)
//! - [`AdminZoneApi`]: all resource clients over one shared gateway

pub mod error;
pub mod gateway;
pub mod resources;

pub use error::{ApiError, Result, CONNECTION_MESSAGE, FALLBACK_MESSAGE};
pub use gateway::{is_auth_path, ApiGateway, GatewayConfig, SessionEvent};
pub use resources::{
    AttendanceApi, AuditApi, AuthApi, CourseFilter, CoursesApi, EnrollmentsApi, ExportApi,
    StudentFilter, StudentsApi, UsersApi,
};

/// Every resource client, sharing one gateway (and so one session cookie)
#[derive(Clone)]
pub struct AdminZoneApi {
    pub gateway: ApiGateway,
    pub auth: AuthApi,
    pub students: StudentsApi,
    pub courses: CoursesApi,
    pub enrollments: EnrollmentsApi,
    pub attendance: AttendanceApi,
    pub users: UsersApi,
    pub audit: AuditApi,
    pub export: ExportApi,
}

impl AdminZoneApi {
    pub fn new(config: GatewayConfig) -> Result<Self> {
        Ok(Self::with_gateway(ApiGateway::new(config)?))
    }

    pub fn with_gateway(gateway: ApiGateway) -> Self {
        Self {
            auth: AuthApi::new(gateway.clone()),
            students: StudentsApi::new(gateway.clone()),
            courses: CoursesApi::new(gateway.clone()),
            enrollments: EnrollmentsApi::new(gateway.clone()),
            attendance: AttendanceApi::new(gateway.clone()),
            users: UsersApi::new(gateway.clone()),
            audit: AuditApi::new(gateway.clone()),
            export: ExportApi::new(gateway.clone()),
            gateway,
        }
    }
}
