use az_common::{AuditLog, PageRequest, PageResponse};
use urlencoding::encode;

use super::Query;
use crate::error::Result;
use crate::gateway::ApiGateway;

/// Read-only audit trail
#[derive(Clone)]
pub struct AuditApi {
    gateway: ApiGateway,
}

impl AuditApi {
    pub fn new(gateway: ApiGateway) -> Self {
        Self { gateway }
    }

    pub async fn list(&self, page: PageRequest) -> Result<PageResponse<AuditLog>> {
        let query = Query::new().page(page).build();
        self.gateway.get("/audit", &query).await
    }

    pub async fn list_by_username(&self, username: &str, page: PageRequest) -> Result<PageResponse<AuditLog>> {
        let query = Query::new().page(page).build();
        self.gateway
            .get(&format!("/audit/user/{}", encode(username.trim())), &query)
            .await
    }
}
