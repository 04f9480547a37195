use az_common::{PageRequest, PageResponse, Student, StudentRequest};

use super::Query;
use crate::error::Result;
use crate::gateway::ApiGateway;

/// Free-text and study-year filters for the student list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentFilter {
    pub q: Option<String>,
    pub an_studiu: Option<u8>,
}

#[derive(Clone)]
pub struct StudentsApi {
    gateway: ApiGateway,
}

impl StudentsApi {
    pub fn new(gateway: ApiGateway) -> Self {
        Self { gateway }
    }

    pub async fn list(&self, filter: &StudentFilter, page: PageRequest) -> Result<PageResponse<Student>> {
        let query = Query::new()
            .text("q", filter.q.as_deref())
            .number("anStudiu", filter.an_studiu)
            .page(page)
            .build();
        self.gateway.get("/students", &query).await
    }

    pub async fn get(&self, id: i64) -> Result<Student> {
        self.gateway.get(&format!("/students/{}", id), &[]).await
    }

    pub async fn create(&self, request: &StudentRequest) -> Result<Student> {
        self.gateway.post("/students", request).await
    }

    pub async fn update(&self, id: i64, request: &StudentRequest) -> Result<Student> {
        self.gateway.put(&format!("/students/{}", id), request).await
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        self.gateway.delete(&format!("/students/{}", id)).await
    }
}
