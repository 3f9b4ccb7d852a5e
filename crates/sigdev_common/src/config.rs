//! Environment-sourced configuration
//!
//! Every knob has a documented default matching the docker compose dev
//! stack; values are read once at startup and never mutated. Existence
//! is the only validation: a set-but-odd value is passed through as-is.

use std::env;
use std::time::Duration;

/// Default LocalStack edge endpoint
pub const DEFAULT_LOCALSTACK_URL: &str = "http://localhost:4566";

/// Default HTTP probe timeout
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(5);

/// Where the dev stack's containers and database live
#[derive(Debug, Clone)]
pub struct StackConfig {
    pub localstack_url: String,
    pub postgres_container: String,
    pub redis_container: String,
    pub db_name: String,
    pub db_user: String,
}

impl StackConfig {
    /// Read from the environment, falling back to the compose defaults
    pub fn from_env() -> Self {
        Self {
            localstack_url: env_or("SIGDEV_LOCALSTACK_URL", DEFAULT_LOCALSTACK_URL),
            postgres_container: env_or("SIGDEV_POSTGRES_CONTAINER", "signature-postgres"),
            redis_container: env_or("SIGDEV_REDIS_CONTAINER", "signature-redis"),
            db_name: env_or("SIGDEV_DB_NAME", "signature_dev"),
            db_user: env_or("SIGDEV_DB_USER", "dev_user"),
        }
    }
}

impl Default for StackConfig {
    fn default() -> Self {
        Self {
            localstack_url: DEFAULT_LOCALSTACK_URL.to_string(),
            postgres_container: "signature-postgres".to_string(),
            redis_container: "signature-redis".to_string(),
            db_name: "signature_dev".to_string(),
            db_user: "dev_user".to_string(),
        }
    }
}

/// Credentials and region handed to provisioning subprocesses.
///
/// Explicit configuration, set on each child process's environment;
/// the orchestrator's own environment is left untouched.
#[derive(Debug, Clone)]
pub struct BootstrapConfig {
    pub endpoint_url: String,
    pub access_key_id: String,
    pub secret_access_key: String,
    pub region: String,
}

impl BootstrapConfig {
    /// Read from the environment. LocalStack accepts any credentials,
    /// so the placeholders default to "test".
    pub fn from_env() -> Self {
        Self {
            endpoint_url: env_or("SIGDEV_LOCALSTACK_URL", DEFAULT_LOCALSTACK_URL),
            access_key_id: env_or("AWS_ACCESS_KEY_ID", "test"),
            secret_access_key: env_or("AWS_SECRET_ACCESS_KEY", "test"),
            region: env_or("AWS_DEFAULT_REGION", "ap-northeast-1"),
        }
    }

    /// Environment to set on each `aws` child process
    pub fn child_env(&self) -> Vec<(String, String)> {
        vec![
            ("AWS_ACCESS_KEY_ID".to_string(), self.access_key_id.clone()),
            (
                "AWS_SECRET_ACCESS_KEY".to_string(),
                self.secret_access_key.clone(),
            ),
            ("AWS_DEFAULT_REGION".to_string(), self.region.clone()),
        ]
    }
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            endpoint_url: DEFAULT_LOCALSTACK_URL.to_string(),
            access_key_id: "test".to_string(),
            secret_access_key: "test".to_string(),
            region: "ap-northeast-1".to_string(),
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}
