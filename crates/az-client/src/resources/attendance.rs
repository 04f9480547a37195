use az_common::{
    Attendance, AttendanceRequest, AttendanceSearch, AttendanceStats, PageRequest, PageResponse,
};

use super::Query;
use crate::error::Result;
use crate::gateway::ApiGateway;

#[derive(Clone)]
pub struct AttendanceApi {
    gateway: ApiGateway,
}

impl AttendanceApi {
    pub fn new(gateway: ApiGateway) -> Self {
        Self { gateway }
    }

    pub async fn list(&self, page: PageRequest) -> Result<PageResponse<Attendance>> {
        let query = Query::new().page(page).build();
        self.gateway.get("/attendance", &query).await
    }

    /// Unpaginated search by student name, course name and semester
    pub async fn search(&self, search: &AttendanceSearch) -> Result<Vec<Attendance>> {
        let query = Query::new()
            .text("student", search.student.as_deref())
            .text("course", search.course.as_deref())
            .number("semester", search.semester)
            .build();
        self.gateway.get("/attendance/search", &query).await
    }

    /// Per-student attendance counts for each semester
    pub async fn stats(&self) -> Result<Vec<AttendanceStats>> {
        self.gateway.get("/attendance/stats", &[]).await
    }

    pub async fn get(&self, id: i64) -> Result<Attendance> {
        self.gateway.get(&format!("/attendance/{}", id), &[]).await
    }

    pub async fn create(&self, request: &AttendanceRequest) -> Result<Attendance> {
        self.gateway.post("/attendance", request).await
    }

    pub async fn update(&self, id: i64, request: &AttendanceRequest) -> Result<Attendance> {
        self.gateway.put(&format!("/attendance/{}", id), request).await
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        self.gateway.delete(&format!("/attendance/{}", id)).await
    }
}
