//! Typed resource clients
//!
//! One client per backend resource, each borrowing the shared gateway.

mod attendance;
mod audit;
mod auth;
mod courses;
mod enrollments;
mod export;
mod students;
mod users;

pub use attendance::AttendanceApi;
pub use audit::AuditApi;
pub use auth::AuthApi;
pub use courses::{CourseFilter, CoursesApi};
pub use enrollments::EnrollmentsApi;
pub use export::ExportApi;
pub use students::{StudentFilter, StudentsApi};
pub use users::UsersApi;

use az_common::PageRequest;

/// Query string builder that leaves out empty filter values
#[derive(Debug, Default)]
pub(crate) struct Query(Vec<(&'static str, String)>);

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, key: &'static str, value: Option<&str>) -> Self {
        if let Some(v) = value.map(str::trim).filter(|v| !v.is_empty()) {
            self.0.push((key, v.to_string()));
        }
        self
    }

    pub fn number<N: ToString>(mut self, key: &'static str, value: Option<N>) -> Self {
        if let Some(v) = value {
            self.0.push((key, v.to_string()));
        }
        self
    }

    pub fn page(mut self, page: PageRequest) -> Self {
        self.0.extend(page.query());
        self
    }

    pub fn build(self) -> Vec<(&'static str, String)> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_omits_empty_filters() {
        let query = Query::new()
            .text("q", Some("  "))
            .text("student", Some(" Pop "))
            .number::<u8>("anStudiu", None)
            .number("semester", Some(2u8))
            .page(PageRequest::new(1, 25))
            .build();
        assert_eq!(
            query,
            vec![
                ("student", "Pop".to_string()),
                ("semester", "2".to_string()),
                ("page", "1".to_string()),
                ("size", "25".to_string()),
            ]
        );
    }
}
