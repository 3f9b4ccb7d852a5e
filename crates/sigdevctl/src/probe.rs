//! Probe definitions
//!
//! A probe is a single liveness/readiness check against one dependency.
//! Transport is hidden behind the `Probe` trait so the engine and the
//! pollers are agnostic to how a check runs: HTTP GET, subprocess, or
//! the LocalStack health endpoint.

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use sigdev_common::config::DEFAULT_HTTP_TIMEOUT;
use sigdev_common::run_command;
use std::time::Duration;

/// One readiness/liveness check against one dependency.
///
/// `check` returns `Ok(())` when the service answered as expected and a
/// diagnostic error otherwise. Implementations never panic past this
/// boundary; the engine converts any error into an `Unhealthy` status.
#[async_trait]
pub trait Probe: Send + Sync {
    fn name(&self) -> &str;

    /// Endpoint the service listens on, when it has one
    fn url(&self) -> Option<&str> {
        None
    }

    async fn check(&self) -> Result<()>;
}

/// What a command probe requires of its subprocess
#[derive(Debug, Clone)]
pub enum Expectation {
    /// Exit code 0 is enough (e.g. pg_isready)
    ZeroExit,
    /// Exit code 0 and trimmed stdout equal to this value (e.g. PONG)
    OutputEquals(String),
}

/// Liveness check that shells out, e.g. `docker exec ... pg_isready`
pub struct CommandProbe {
    name: String,
    program: String,
    args: Vec<String>,
    expect: Expectation,
}

impl CommandProbe {
    pub fn new(
        name: impl Into<String>,
        program: impl Into<String>,
        args: Vec<String>,
        expect: Expectation,
    ) -> Self {
        Self {
            name: name.into(),
            program: program.into(),
            args,
            expect,
        }
    }
}

#[async_trait]
impl Probe for CommandProbe {
    fn name(&self) -> &str {
        &self.name
    }

    async fn check(&self) -> Result<()> {
        let output = run_command(&self.program, &self.args, &[]).await?;

        if !output.success() {
            let stderr = output.stderr.trim();
            if stderr.is_empty() {
                bail!("command exited with code {}", output.exit_code);
            }
            bail!("command failed: {}", stderr);
        }

        if let Expectation::OutputEquals(expected) = &self.expect {
            let actual = output.stdout.trim();
            if actual != expected {
                bail!("unexpected output: expected {:?}, got {:?}", expected, actual);
            }
        }

        Ok(())
    }
}

/// HTTP reachability check.
///
/// Any response below 500 counts as service-present, including 4xx.
/// This is a deliberately lenient readiness criterion: it answers "is
/// something listening and able to respond", not "is it correct".
pub struct HttpProbe {
    name: String,
    url: String,
    timeout: Duration,
    client: reqwest::Client,
}

impl HttpProbe {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            timeout: DEFAULT_HTTP_TIMEOUT,
            client: reqwest::Client::new(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl Probe for HttpProbe {
    fn name(&self) -> &str {
        &self.name
    }

    fn url(&self) -> Option<&str> {
        Some(&self.url)
    }

    async fn check(&self) -> Result<()> {
        let response = self
            .client
            .get(&self.url)
            .timeout(self.timeout)
            .send()
            .await;

        match response {
            Ok(resp) => {
                let status = resp.status().as_u16();
                if status >= 500 {
                    bail!("service returned error status {}", status);
                }
                Ok(())
            }
            Err(e) if e.is_timeout() => {
                bail!("service timed out after {}s", self.timeout.as_secs())
            }
            Err(e) if e.is_connect() => bail!("service not running (connection refused)"),
            Err(e) => Err(e).context("request failed"),
        }
    }
}

/// LocalStack health endpoint check.
///
/// GET `<base>/_localstack/health` and require every advertised
/// sub-service to report `available` or `running`.
pub struct LocalStackProbe {
    name: String,
    base_url: String,
    timeout: Duration,
    client: reqwest::Client,
}

impl LocalStackProbe {
    pub fn new(name: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base_url: base_url.into(),
            timeout: DEFAULT_HTTP_TIMEOUT,
            client: reqwest::Client::new(),
        }
    }

    /// Sub-service availability map, for logging once the emulator is up
    pub async fn available_services(&self) -> Result<Vec<String>> {
        let payload = self.fetch_health().await?;
        let services = payload
            .get("services")
            .and_then(|s| s.as_object())
            .context("health payload has no services map")?;
        Ok(services.keys().cloned().collect())
    }

    async fn fetch_health(&self) -> Result<serde_json::Value> {
        let url = format!("{}/_localstack/health", self.base_url);
        let resp = self
            .client
            .get(&url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    anyhow::anyhow!("LocalStack not running (connection refused)")
                } else if e.is_timeout() {
                    anyhow::anyhow!("LocalStack timed out after {}s", self.timeout.as_secs())
                } else {
                    anyhow::anyhow!("health request failed: {}", e)
                }
            })?;

        if resp.status().as_u16() != 200 {
            bail!("LocalStack returned status {}", resp.status().as_u16());
        }

        resp.json().await.context("invalid health payload")
    }
}

#[async_trait]
impl Probe for LocalStackProbe {
    fn name(&self) -> &str {
        &self.name
    }

    fn url(&self) -> Option<&str> {
        Some(&self.base_url)
    }

    async fn check(&self) -> Result<()> {
        let payload = self.fetch_health().await?;

        let services = payload
            .get("services")
            .and_then(|s| s.as_object())
            .cloned()
            .unwrap_or_default();

        let degraded: Vec<&str> = services
            .iter()
            .filter(|(_, state)| {
                !matches!(state.as_str(), Some("available") | Some("running"))
            })
            .map(|(name, _)| name.as_str())
            .collect();

        if !degraded.is_empty() {
            bail!("degraded sub-services: {}", degraded.join(", "));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve exactly one HTTP response on an ephemeral port
    async fn serve_once(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            if let Ok((mut socket, _)) = listener.accept().await {
                let mut buf = [0u8; 1024];
                let _ = socket.read(&mut buf).await;
                let response = format!(
                    "HTTP/1.1 {}\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                    status_line,
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn command_probe_passes_on_zero_exit() {
        let probe = CommandProbe::new("echo", "echo", vec!["ok".into()], Expectation::ZeroExit);
        assert!(probe.check().await.is_ok());
    }

    #[tokio::test]
    async fn command_probe_fails_on_non_zero_exit() {
        let probe = CommandProbe::new("false", "false", vec![], Expectation::ZeroExit);
        let err = probe.check().await.unwrap_err();
        assert!(err.to_string().contains("exited with code"));
    }

    #[tokio::test]
    async fn command_probe_matches_expected_output() {
        let probe = CommandProbe::new(
            "ping",
            "echo",
            vec!["PONG".into()],
            Expectation::OutputEquals("PONG".into()),
        );
        assert!(probe.check().await.is_ok());
    }

    #[tokio::test]
    async fn command_probe_rejects_wrong_output() {
        let probe = CommandProbe::new(
            "ping",
            "echo",
            vec!["NOPE".into()],
            Expectation::OutputEquals("PONG".into()),
        );
        let err = probe.check().await.unwrap_err();
        assert!(err.to_string().contains("unexpected output"));
    }

    #[tokio::test]
    async fn command_probe_fails_when_program_is_missing() {
        let probe = CommandProbe::new(
            "missing",
            "sigdev-no-such-binary",
            vec![],
            Expectation::ZeroExit,
        );
        assert!(probe.check().await.is_err());
    }

    #[tokio::test]
    async fn http_probe_accepts_4xx_as_present() {
        let url = serve_once("404 Not Found", "").await;
        let probe = HttpProbe::new("web", url);
        assert!(probe.check().await.is_ok());
    }

    #[tokio::test]
    async fn http_probe_rejects_server_error() {
        let url = serve_once("500 Internal Server Error", "").await;
        let probe = HttpProbe::new("web", url);
        let err = probe.check().await.unwrap_err();
        assert!(err.to_string().contains("500"));
    }

    #[tokio::test]
    async fn http_probe_reports_connection_refused() {
        // Bind then drop to get a port with nothing listening
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let probe = HttpProbe::new("web", format!("http://{}", addr));
        let err = probe.check().await.unwrap_err();
        assert!(err.to_string().contains("not running"));
    }

    #[tokio::test]
    async fn localstack_probe_passes_when_all_services_available() {
        let url = serve_once(
            "200 OK",
            r#"{"services":{"s3":"available","kms":"running","sns":"available"}}"#,
        )
        .await;
        let probe = LocalStackProbe::new("LocalStack", url);
        assert!(probe.check().await.is_ok());
    }

    #[tokio::test]
    async fn localstack_probe_names_degraded_services() {
        let url = serve_once(
            "200 OK",
            r#"{"services":{"s3":"available","kms":"initializing"}}"#,
        )
        .await;
        let probe = LocalStackProbe::new("LocalStack", url);
        let err = probe.check().await.unwrap_err();
        assert!(err.to_string().contains("kms"));
        assert!(!err.to_string().contains("s3"));
    }

    #[tokio::test]
    async fn localstack_probe_rejects_non_200() {
        let url = serve_once("503 Service Unavailable", "").await;
        let probe = LocalStackProbe::new("LocalStack", url);
        assert!(probe.check().await.is_err());
    }
}
