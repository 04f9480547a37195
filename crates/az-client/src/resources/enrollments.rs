use az_common::{Enrollment, EnrollmentKey, EnrollmentRequest, PageRequest, PageResponse};

use super::Query;
use crate::error::Result;
use crate::gateway::ApiGateway;

/// Enrollments are addressed by their (student, course) pair
#[derive(Clone)]
pub struct EnrollmentsApi {
    gateway: ApiGateway,
}

fn path(key: EnrollmentKey) -> String {
    format!("/enrollments/{}/{}", key.student_id, key.course_id)
}

impl EnrollmentsApi {
    pub fn new(gateway: ApiGateway) -> Self {
        Self { gateway }
    }

    pub async fn list(&self, page: PageRequest) -> Result<PageResponse<Enrollment>> {
        let query = Query::new().page(page).build();
        self.gateway.get("/enrollments", &query).await
    }

    /// Unpaginated listing narrowed by student and/or course
    pub async fn filter(&self, student_id: Option<i64>, course_id: Option<i64>) -> Result<Vec<Enrollment>> {
        let query = Query::new()
            .number("studentId", student_id)
            .number("courseId", course_id)
            .build();
        self.gateway.get("/enrollments/filter", &query).await
    }

    pub async fn get(&self, key: EnrollmentKey) -> Result<Enrollment> {
        self.gateway.get(&path(key), &[]).await
    }

    pub async fn create(&self, request: &EnrollmentRequest) -> Result<Enrollment> {
        self.gateway.post("/enrollments", request).await
    }

    pub async fn update(&self, key: EnrollmentKey, request: &EnrollmentRequest) -> Result<Enrollment> {
        self.gateway.put(&path(key), request).await
    }

    pub async fn delete(&self, key: EnrollmentKey) -> Result<()> {
        self.gateway.delete(&path(key)).await
    }
}
