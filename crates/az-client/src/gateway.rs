//! API Gateway
//!
//! Single entry point for backend calls:
//! - Base URL resolution (everything lives under `/api`)
//! - Session cookie carried by the client's cookie store
//! - JSON by default, form encoding for login
//! - 401 interception: any non-authentication path answered with 401 emits
//!   [`SessionEvent::Invalidated`] and fails with [`ApiError::SessionExpired`]

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tracing::{debug, warn};

use az_common::ErrorResponse;
use az_config::ApiConfig;

use crate::error::{ApiError, Result};

const EVENT_CAPACITY: usize = 16;

/// Gateway configuration
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Backend base URL including the `/api` prefix
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub user_agent: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self::from(&ApiConfig::default())
    }
}

impl From<&ApiConfig> for GatewayConfig {
    fn from(config: &ApiConfig) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            connect_timeout: config.connect_timeout(),
            request_timeout: config.request_timeout(),
            user_agent: format!("adminzone-console/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl GatewayConfig {
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            ..Default::default()
        }
    }
}

/// Session lifecycle signals published by the gateway
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// The server rejected the session on `path`
    Invalidated { path: String },
}

/// Paths whose 401s are answers, not session loss
pub fn is_auth_path(path: &str) -> bool {
    path.starts_with("/auth/")
}

struct Inner {
    client: reqwest::Client,
    base_url: String,
    events: broadcast::Sender<SessionEvent>,
}

/// Shared HTTP gateway; cheap to clone
#[derive(Clone)]
pub struct ApiGateway {
    inner: Arc<Inner>,
}

impl ApiGateway {
    pub fn new(config: GatewayConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .cookie_store(true)
            .default_headers(headers)
            .user_agent(config.user_agent.clone())
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ApiError::Setup(e.to_string()))?;

        let (events, _) = broadcast::channel(EVENT_CAPACITY);

        Ok(Self {
            inner: Arc::new(Inner {
                client,
                base_url: config.base_url,
                events,
            }),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// Receive session events emitted from now on
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.inner.events.subscribe()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.inner.base_url, path)
    }

    fn builder(&self, method: Method, path: &str, query: &[(&str, String)]) -> RequestBuilder {
        let builder = self.inner.client.request(method, self.url(path));
        if query.is_empty() {
            builder
        } else {
            builder.query(query)
        }
    }

    /// Send and apply the 401 interception rule.
    async fn execute(&self, path: &str, builder: RequestBuilder) -> Result<Response> {
        let response = builder.send().await.map_err(|e| {
            warn!(path = %path, error = %e, "Request failed");
            ApiError::transport(path, e)
        })?;

        let status = response.status();
        if status.is_success() {
            debug!(path = %path, status = %status, "Request succeeded");
            return Ok(response);
        }

        if status == StatusCode::UNAUTHORIZED && !is_auth_path(path) {
            warn!(path = %path, "Session rejected by server");
            // No receivers is fine: nobody is watching the session yet
            let _ = self.inner.events.send(SessionEvent::Invalidated {
                path: path.to_string(),
            });
            return Err(ApiError::SessionExpired);
        }

        let text = response.text().await.unwrap_or_default();
        let body = serde_json::from_str::<ErrorResponse>(&text).unwrap_or_default();
        debug!(
            path = %path,
            status = %status,
            message = body.message.as_deref().unwrap_or(""),
            "Request rejected"
        );
        Err(ApiError::Status {
            status: status.as_u16(),
            body,
        })
    }

    async fn decode<T: DeserializeOwned>(path: &str, response: Response) -> Result<T> {
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ApiError::transport(path, e))?;
        if bytes.is_empty() {
            serde_json::from_value(Value::Null).map_err(|e| ApiError::decode(path, e))
        } else {
            serde_json::from_slice(&bytes).map_err(|e| ApiError::decode(path, e))
        }
    }

    /// Untyped call; an empty body yields `Value::Null`
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        query: &[(&str, String)],
    ) -> Result<Value> {
        let mut builder = self.builder(method, path, query);
        if let Some(body) = body {
            builder = builder.header(CONTENT_TYPE, "application/json").json(body);
        }
        let response = self.execute(path, builder).await?;
        Self::decode(path, response).await
    }

    /// Typed JSON call
    pub async fn request_json<B, T>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        query: &[(&str, String)],
    ) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let mut builder = self.builder(method, path, query);
        if let Some(body) = body {
            builder = builder.header(CONTENT_TYPE, "application/json").json(body);
        }
        let response = self.execute(path, builder).await?;
        Self::decode(path, response).await
    }

    /// Call whose response body is ignored
    pub async fn request_empty(&self, method: Method, path: &str) -> Result<()> {
        let builder = self
            .builder(method, path, &[])
            .header(CONTENT_TYPE, "application/json");
        self.execute(path, builder).await.map(|_| ())
    }

    /// Form-encoded POST
    pub async fn request_form<T: DeserializeOwned>(
        &self,
        path: &str,
        form: &[(&str, &str)],
    ) -> Result<T> {
        let builder = self.builder(Method::POST, path, &[]).form(form);
        let response = self.execute(path, builder).await?;
        Self::decode(path, response).await
    }

    /// Raw body download
    pub async fn request_bytes(&self, path: &str, query: &[(&str, String)]) -> Result<Vec<u8>> {
        let response = self.execute(path, self.builder(Method::GET, path, query)).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ApiError::transport(path, e))?;
        Ok(bytes.to_vec())
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        self.request_json::<(), T>(Method::GET, path, None, query).await
    }

    pub async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T> {
        self.request_json(Method::POST, path, Some(body), &[]).await
    }

    pub async fn put<B: Serialize + ?Sized, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T> {
        self.request_json(Method::PUT, path, Some(body), &[]).await
    }

    pub async fn delete(&self, path: &str) -> Result<()> {
        self.request_empty(Method::DELETE, path).await
    }
}
