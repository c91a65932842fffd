//! Loading `AppConfig` from YAML files

use billflow::core::error::ConfigError;
use billflow::prelude::*;
use std::io::Write;
use tempfile::NamedTempFile;

fn write_config(yaml: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(yaml.as_bytes()).unwrap();
    file
}

#[test]
fn test_full_file() {
    let file = write_config(
        r#"
server:
  host: 0.0.0.0
  port: 8080
log_filter: billflow=debug
plans:
  free:
    invoice_limit: 3
    monthly_price: 0
  elite:
    invoice_limit: 100
    monthly_price: 99
sessions:
  - token: dev-token
    user_id: 6f1c1f9e-8d7b-4a53-9d2a-1f0c2b3a4d5e
"#,
    );

    let config = AppConfig::from_yaml_file(file.path()).unwrap();
    assert_eq!(config.bind_addr(), "0.0.0.0:8080");
    assert_eq!(config.log_filter(), "billflow=debug");

    let registry = config.plan_registry();
    assert_eq!(registry.limit(Plan::Free), 3);
    assert_eq!(registry.limit(Plan::Pro), 20);
    assert_eq!(registry.limit(Plan::Elite), 100);
    assert_eq!(registry.price(Plan::Elite), 99);

    let hub = SessionHub::default();
    config.seed_sessions(&hub).unwrap();
    let session = hub.resolve("dev-token").unwrap().unwrap();
    assert_eq!(
        session.user_id.to_string(),
        "6f1c1f9e-8d7b-4a53-9d2a-1f0c2b3a4d5e"
    );
}

#[test]
fn test_empty_file_uses_defaults() {
    let file = write_config("{}\n");
    let config = AppConfig::from_yaml_file(file.path()).unwrap();
    assert_eq!(config, AppConfig::default());
}

#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.yaml");

    let err = AppConfig::from_yaml_file(&path).unwrap_err();
    match err.downcast_ref::<ConfigError>() {
        Some(ConfigError::FileNotFound { path: reported }) => {
            assert!(reported.ends_with("missing.yaml"))
        }
        other => panic!("expected file not found, got {:?}", other),
    }
}

#[test]
fn test_parse_error_names_the_file() {
    let file = write_config("server: [not, a, map]\n");

    let err = AppConfig::from_yaml_file(file.path()).unwrap_err();
    match err.downcast_ref::<ConfigError>() {
        Some(ConfigError::ParseError { file: Some(name), .. }) => {
            assert_eq!(name, &file.path().display().to_string())
        }
        other => panic!("expected parse error, got {:?}", other),
    }
}

#[test]
fn test_empty_session_token_rejected() {
    let file = write_config(
        r#"
sessions:
  - token: "  "
    user_id: 6f1c1f9e-8d7b-4a53-9d2a-1f0c2b3a4d5e
"#,
    );

    let err = AppConfig::from_yaml_file(file.path()).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ConfigError>(),
        Some(ConfigError::InvalidValue { field, .. }) if field == "sessions[0].token"
    ));
}

#[tokio::test]
async fn test_configured_plans_reach_the_server() {
    use axum_test::TestServer;
    use serde_json::Value;

    let file = write_config("plans:\n  free:\n    invoice_limit: 1\n    monthly_price: 0\n");
    let config = AppConfig::from_yaml_file(file.path()).unwrap();

    let sessions = SessionHub::default();
    let token = sessions.sign_in(Uuid::new_v4()).unwrap().token;
    let app = ServerBuilder::new()
        .with_plan_registry(config.plan_registry())
        .with_auth_provider(sessions)
        .build()
        .unwrap();
    let server = TestServer::try_new(app).expect("Failed to create test server");

    let body: Value = server
        .get("/subscription")
        .authorization_bearer(&token)
        .await
        .json();
    assert_eq!(body["limit"], 1);
    assert_eq!(body["remaining"], 1);
}
