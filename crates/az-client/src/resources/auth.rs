use az_common::LoginResponse;
use reqwest::Method;

use crate::error::Result;
use crate::gateway::ApiGateway;

/// `/auth` endpoints; their 401s never invalidate the session
#[derive(Clone)]
pub struct AuthApi {
    gateway: ApiGateway,
}

impl AuthApi {
    pub fn new(gateway: ApiGateway) -> Self {
        Self { gateway }
    }

    /// Form-encoded credential submission
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResponse> {
        self.gateway
            .request_form("/auth/login", &[("username", username), ("password", password)])
            .await
    }

    pub async fn logout(&self) -> Result<()> {
        self.gateway.request_empty(Method::POST, "/auth/logout").await
    }

    /// Who-am-I
    pub async fn me(&self) -> Result<LoginResponse> {
        self.gateway.get("/auth/me", &[]).await
    }
}
