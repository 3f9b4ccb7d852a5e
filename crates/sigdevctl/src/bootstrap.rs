//! LocalStack resource bootstrapper
//!
//! Provisions the AWS resources the signature platform needs for local
//! development, against an emulator that has already been confirmed
//! ready. Provisioning is expected to be idempotent: re-running against
//! an already-bootstrapped stack produces duplicate-create failures,
//! which are tolerated like any other per-resource failure.

use anyhow::Result;
use async_trait::async_trait;
use sigdev_common::{run_command, BootstrapConfig, CommandOutput};
use tracing::{info, warn};

/// One declarative provisioning operation
#[derive(Debug, Clone)]
pub struct ResourceSpec {
    pub name: String,
    /// Argument vector handed to the runner (aws CLI subcommand + args)
    pub args: Vec<String>,
    pub description: String,
}

impl ResourceSpec {
    fn new(name: &str, args: &[&str], description: &str) -> Self {
        Self {
            name: name.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
            description: description.to_string(),
        }
    }
}

/// Executes provisioning directives. Production uses the aws CLI
/// against the LocalStack endpoint; tests use a scripted fake.
#[async_trait]
pub trait ResourceRunner: Send + Sync {
    async fn run(&self, args: &[String]) -> Result<CommandOutput>;
}

/// Shells out to `aws --endpoint-url=<url> ...` with the credential
/// variables set on the child process only.
pub struct AwsCliRunner {
    config: BootstrapConfig,
}

impl AwsCliRunner {
    pub fn new(config: BootstrapConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl ResourceRunner for AwsCliRunner {
    async fn run(&self, args: &[String]) -> Result<CommandOutput> {
        let mut full_args = vec![format!("--endpoint-url={}", self.config.endpoint_url)];
        full_args.extend_from_slice(args);
        run_command("aws", &full_args, &self.config.child_env()).await
    }
}

/// Outcome of a provisioning pass. Completion is independent of how
/// many individual resources failed.
#[derive(Debug, Clone)]
pub struct BootstrapSummary {
    pub attempted: usize,
    pub failed: Vec<String>,
}

impl BootstrapSummary {
    pub fn failure_count(&self) -> usize {
        self.failed.len()
    }
}

/// Sequential, partial-failure-tolerant provisioning driver
pub struct Bootstrapper {
    runner: Box<dyn ResourceRunner>,
    resources: Vec<ResourceSpec>,
}

impl Bootstrapper {
    pub fn new(runner: Box<dyn ResourceRunner>, resources: Vec<ResourceSpec>) -> Self {
        Self { runner, resources }
    }

    /// The resources the dev stack needs, in declared order
    pub fn default_resources() -> Vec<ResourceSpec> {
        vec![
            ResourceSpec::new(
                "S3 dev bucket",
                &["s3", "mb", "s3://signature-dev-bucket"],
                "Creating development S3 bucket",
            ),
            ResourceSpec::new(
                "S3 test bucket",
                &["s3", "mb", "s3://signature-test-bucket"],
                "Creating test S3 bucket",
            ),
            ResourceSpec::new(
                "KMS signing key",
                &["kms", "create-key", "--description", "Local development signing key"],
                "Creating KMS signing key",
            ),
            ResourceSpec::new(
                "SNS notification topic",
                &["sns", "create-topic", "--name", "signature-notifications"],
                "Creating SNS notification topic",
            ),
        ]
    }

    /// Execute every resource in declared order. A failure is logged
    /// and provisioning continues with the next resource; the summary
    /// reports "completed with N failures".
    pub async fn provision(&self) -> BootstrapSummary {
        let mut failed = Vec::new();

        for resource in &self.resources {
            info!("{}...", resource.description);
            match self.runner.run(&resource.args).await {
                Ok(output) if output.success() => {
                    info!("{} created", resource.name);
                }
                Ok(output) => {
                    warn!(
                        "{} creation failed (exit {}): {}",
                        resource.name,
                        output.exit_code,
                        output.stderr.trim()
                    );
                    failed.push(resource.name.clone());
                }
                Err(e) => {
                    warn!("{} creation failed: {}", resource.name, e);
                    failed.push(resource.name.clone());
                }
            }
        }

        BootstrapSummary {
            attempted: self.resources.len(),
            failed,
        }
    }

    /// Best-effort introspection of what provisioning produced.
    /// Failures here are warnings only and never change the outcome.
    pub async fn verify(&self) {
        info!("verifying LocalStack setup...");

        let listings: [(&str, &[&str]); 2] = [
            ("S3 buckets", &["s3", "ls"]),
            ("KMS keys", &["kms", "list-keys"]),
        ];

        for (label, args) in listings {
            let args: Vec<String> = args.iter().map(|a| a.to_string()).collect();
            match self.runner.run(&args).await {
                Ok(output) if output.success() => {
                    info!("{}:\n{}", label, output.stdout.trim_end());
                }
                Ok(output) => {
                    warn!("could not list {}: {}", label, output.stderr.trim());
                }
                Err(e) => {
                    warn!("could not list {}: {}", label, e);
                }
            }
        }
    }
}
