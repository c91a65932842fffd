//! Configuration loading
//!
//! ```yaml
//! server:
//!   host: 0.0.0.0
//!   port: 8080
//! log_filter: billflow=debug,tower_http=info
//! plans:
//!   pro:
//!     invoice_limit: 25
//!     monthly_price: 19
//! sessions:
//!   - token: dev-token
//!     user_id: 6f1c1f9e-8d7b-4a53-9d2a-1f0c2b3a4d5e
//! ```
//!
//! Every section is optional.

use crate::core::auth::SessionHub;
use crate::core::error::ConfigError;
use crate::core::plan::{Plan, PlanRegistry, PlanTerms};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use uuid::Uuid;

/// Path of the YAML config file, if any
pub const CONFIG_ENV: &str = "BILLFLOW_CONFIG";
/// Overrides `server.host:server.port`
pub const ADDR_ENV: &str = "BILLFLOW_ADDR";

pub const DEFAULT_LOG_FILTER: &str = "billflow=info,tower_http=info";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

/// A session that exists from startup, for local development
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    pub token: String,
    pub user_id: Uuid,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub log_filter: Option<String>,

    /// Overrides for individual plans; unlisted plans keep their built-in terms
    #[serde(default)]
    pub plans: Option<HashMap<Plan, PlanTerms>>,

    #[serde(default)]
    pub sessions: Vec<SessionConfig>,
}

impl AppConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let display = path.display().to_string();

        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ConfigError::FileNotFound {
                path: display.clone(),
            },
            _ => ConfigError::IoError {
                message: e.to_string(),
            },
        })?;

        let config: Self = serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseError {
            file: Some(display),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml).map_err(ConfigError::from)?;
        config.validate()?;
        Ok(config)
    }

    /// Read the file named by `BILLFLOW_CONFIG`, or use defaults
    pub fn from_env() -> Result<Self> {
        match std::env::var(CONFIG_ENV) {
            Ok(path) if !path.trim().is_empty() => Self::from_yaml_file(path.trim()),
            _ => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(plans) = &self.plans {
            for (plan, terms) in plans {
                if terms.invoice_limit < 0 {
                    return Err(ConfigError::InvalidValue {
                        field: format!("plans.{}.invoice_limit", plan),
                        value: terms.invoice_limit.to_string(),
                        message: "must not be negative".to_string(),
                    });
                }
            }
        }

        for (index, session) in self.sessions.iter().enumerate() {
            if session.token.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: format!("sessions[{}].token", index),
                    value: session.token.clone(),
                    message: "must not be empty".to_string(),
                });
            }
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    pub fn log_filter(&self) -> &str {
        self.log_filter.as_deref().unwrap_or(DEFAULT_LOG_FILTER)
    }

    /// Built-in plan table with the configured overrides applied
    pub fn plan_registry(&self) -> PlanRegistry {
        let mut table: HashMap<Plan, PlanTerms> = Plan::ALL
            .iter()
            .map(|p| (*p, PlanTerms::builtin(*p)))
            .collect();
        if let Some(overrides) = &self.plans {
            table.extend(overrides.iter().map(|(p, t)| (*p, *t)));
        }
        PlanRegistry::new(table)
    }

    /// Register the configured sessions with `hub`
    pub fn seed_sessions(&self, hub: &SessionHub) -> Result<()> {
        for session in &self.sessions {
            hub.register(session.token.clone(), session.user_id)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.bind_addr(), "127.0.0.1:3000");
        assert_eq!(config.log_filter(), DEFAULT_LOG_FILTER);
        assert_eq!(config.plan_registry(), PlanRegistry::default());
    }

    #[test]
    fn test_partial_yaml() {
        let config = AppConfig::from_yaml_str(
            r#"
server:
  port: 8080
plans:
  pro:
    invoice_limit: 25
    monthly_price: 24
"#,
        )
        .unwrap();

        assert_eq!(config.bind_addr(), "127.0.0.1:8080");
        let registry = config.plan_registry();
        assert_eq!(registry.limit(Plan::Pro), 25);
        assert_eq!(registry.price(Plan::Pro), 24);
        assert_eq!(registry.limit(Plan::Free), 5);
        assert_eq!(registry.limit(Plan::Elite), 50);
    }

    #[test]
    fn test_negative_limit_rejected() {
        let err = AppConfig::from_yaml_str(
            r#"
plans:
  free:
    invoice_limit: -1
    monthly_price: 0
"#,
        )
        .unwrap_err();

        match err.downcast_ref::<ConfigError>() {
            Some(ConfigError::InvalidValue { field, .. }) => {
                assert_eq!(field, "plans.free.invoice_limit")
            }
            other => panic!("expected invalid value, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_plan_key_is_a_parse_error() {
        let err = AppConfig::from_yaml_str("plans:\n  gold:\n    invoice_limit: 1\n    monthly_price: 1\n")
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::ParseError { .. })
        ));
    }

    #[test]
    fn test_seed_sessions() {
        let user_id = Uuid::new_v4();
        let config = AppConfig {
            sessions: vec![SessionConfig {
                token: "dev-token".to_string(),
                user_id,
            }],
            ..AppConfig::default()
        };

        let hub = SessionHub::default();
        config.seed_sessions(&hub).unwrap();
        let session = hub.resolve("dev-token").unwrap().unwrap();
        assert_eq!(session.user_id, user_id);
    }
}
