//! sigdev-bootstrap - provision LocalStack for local development
//!
//! Waits for the emulator to be ready, creates the S3 buckets, the KMS
//! signing key and the SNS topic, then runs a best-effort verification
//! pass. Per-resource failures are warnings; only failing to reach the
//! emulator at all is fatal.

use clap::Parser;
use owo_colors::OwoColorize;
use sigdev_common::{BootstrapConfig, RetryConfig, StackConfig, EXIT_SUCCESS, EXIT_UNHEALTHY};
use sigdevctl::bootstrap::{AwsCliRunner, Bootstrapper};
use sigdevctl::probe::LocalStackProbe;
use sigdevctl::{logging, ReadinessPoller};
use std::time::Duration;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "sigdev-bootstrap")]
#[command(about = "Provision LocalStack resources for the dev stack", long_about = None)]
#[command(version)]
struct Cli {
    /// Attempt ceiling while waiting for LocalStack
    #[arg(long, default_value_t = 20)]
    max_attempts: u32,

    /// Wait between attempts, in milliseconds
    #[arg(long, default_value_t = 2000)]
    interval_ms: u64,

    /// Skip the post-provisioning verification pass
    #[arg(long)]
    skip_verify: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init();

    let stack = StackConfig::from_env();
    let bootstrap_config = BootstrapConfig::from_env();

    let retry = RetryConfig::new(cli.max_attempts, Duration::from_millis(cli.interval_ms));
    let health = LocalStackProbe::new("LocalStack", stack.localstack_url.clone());
    let poller = ReadinessPoller::new(
        "LocalStack",
        retry,
        vec![Box::new(LocalStackProbe::new(
            "health endpoint",
            stack.localstack_url.clone(),
        ))],
    );

    if let Err(e) = poller.wait_until_ready().await {
        eprintln!("{} {}", "[FAIL]".red(), e);
        std::process::exit(EXIT_UNHEALTHY);
    }

    match health.available_services().await {
        Ok(services) => info!("available services: {}", services.join(", ")),
        Err(e) => warn!("could not list available services: {}", e),
    }

    let bootstrapper = Bootstrapper::new(
        Box::new(AwsCliRunner::new(bootstrap_config)),
        Bootstrapper::default_resources(),
    );

    let summary = bootstrapper.provision().await;

    if !cli.skip_verify {
        bootstrapper.verify().await;
    }

    if summary.failure_count() == 0 {
        println!("{} LocalStack setup completed", "[OK]".green());
    } else {
        println!(
            "{} LocalStack setup completed with {} failure(s); see warnings above",
            "[WARN]".yellow(),
            summary.failure_count()
        );
    }

    std::process::exit(EXIT_SUCCESS);
}
