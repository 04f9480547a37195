use az_common::{Course, CourseRequest, PageRequest, PageResponse};

use super::Query;
use crate::error::Result;
use crate::gateway::ApiGateway;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CourseFilter {
    pub q: Option<String>,
    pub semester: Option<u8>,
}

#[derive(Clone)]
pub struct CoursesApi {
    gateway: ApiGateway,
}

impl CoursesApi {
    pub fn new(gateway: ApiGateway) -> Self {
        Self { gateway }
    }

    pub async fn list(&self, filter: &CourseFilter, page: PageRequest) -> Result<PageResponse<Course>> {
        let query = Query::new()
            .text("q", filter.q.as_deref())
            .number("semester", filter.semester)
            .page(page)
            .build();
        self.gateway.get("/courses", &query).await
    }

    pub async fn get(&self, id: i64) -> Result<Course> {
        self.gateway.get(&format!("/courses/{}", id), &[]).await
    }

    pub async fn create(&self, request: &CourseRequest) -> Result<Course> {
        self.gateway.post("/courses", request).await
    }

    pub async fn update(&self, id: i64, request: &CourseRequest) -> Result<Course> {
        self.gateway.put(&format!("/courses/{}", id), request).await
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        self.gateway.delete(&format!("/courses/{}", id)).await
    }
}
