//! Shared fixtures for console integration tests

#![allow(dead_code)]

use serde_json::{json, Value};
use tracing_subscriber::EnvFilter;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use az_common::LoginForm;
use az_config::ConsoleConfig;
use az_console::Console;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_test_writer()
        .try_init();
}

pub fn config_for(server: &MockServer) -> ConsoleConfig {
    let mut config = ConsoleConfig::default();
    config.api.base_url = format!("{}/api", server.uri());
    config
}

pub fn console_for(server: &MockServer) -> Console {
    init_tracing();
    Console::new(config_for(server)).unwrap()
}

pub fn page_body(data: Value, total: u64) -> Value {
    json!({
        "data": data,
        "page": 0,
        "size": 10,
        "totalElements": total,
        "totalPages": 1,
        "first": true,
        "last": true
    })
}

/// Accept any credentials and answer with `roles`
pub async fn mount_login(server: &MockServer, username: &str, roles: &[&str]) {
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "Autentificare reușită",
            "username": username,
            "roles": roles,
        })))
        .mount(server)
        .await;
}

pub async fn sign_in(console: &Console, username: &str) {
    let form = LoginForm {
        username: username.to_string(),
        password: "secret".to_string(),
    };
    console.login(&form).await.unwrap();
}

pub fn student_json(id: i64, nume: &str, prenume: &str) -> Value {
    json!({
        "id": id,
        "nume": nume,
        "prenume": prenume,
        "email": format!("{}@x.ro", prenume.to_lowercase()),
        "telefon": null,
        "anStudiu": 2,
        "createdAt": "2024-10-01T09:30:00",
        "updatedAt": "2024-10-01T09:30:00"
    })
}
