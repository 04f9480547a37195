use az_common::{User, UserRequest};
use urlencoding::encode;

use crate::error::Result;
use crate::gateway::ApiGateway;

/// Console accounts, keyed by username. The listing is not paginated.
#[derive(Clone)]
pub struct UsersApi {
    gateway: ApiGateway,
}

impl UsersApi {
    pub fn new(gateway: ApiGateway) -> Self {
        Self { gateway }
    }

    pub async fn list(&self) -> Result<Vec<User>> {
        self.gateway.get("/users", &[]).await
    }

    pub async fn get(&self, username: &str) -> Result<User> {
        self.gateway.get(&format!("/users/{}", encode(username)), &[]).await
    }

    pub async fn create(&self, request: &UserRequest) -> Result<User> {
        self.gateway.post("/users", request).await
    }

    pub async fn update(&self, username: &str, request: &UserRequest) -> Result<User> {
        self.gateway.put(&format!("/users/{}", encode(username)), request).await
    }

    pub async fn delete(&self, username: &str) -> Result<()> {
        self.gateway.delete(&format!("/users/{}", encode(username))).await
    }
}
