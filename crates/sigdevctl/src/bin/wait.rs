//! sigdev-wait - block until PostgreSQL is fully ready
//!
//! Two readiness stages per attempt: the server accepts connections,
//! and the dev user can run a credentialed query. Exits 0 on ready,
//! 1 when the attempt ceiling is reached.

use clap::Parser;
use owo_colors::OwoColorize;
use sigdev_common::{RetryConfig, StackConfig, EXIT_SUCCESS, EXIT_UNHEALTHY};
use sigdevctl::{catalog, logging, ReadinessPoller};
use std::time::Duration;

#[derive(Parser)]
#[command(name = "sigdev-wait")]
#[command(about = "Wait for PostgreSQL to accept dev-user connections", long_about = None)]
#[command(version)]
struct Cli {
    /// Attempt ceiling before giving up
    #[arg(long, default_value_t = 30)]
    max_attempts: u32,

    /// Wait between attempts, in milliseconds
    #[arg(long, default_value_t = 2000)]
    interval_ms: u64,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init();

    let config = StackConfig::from_env();
    let retry = RetryConfig::new(cli.max_attempts, Duration::from_millis(cli.interval_ms));
    let poller = ReadinessPoller::new("PostgreSQL", retry, catalog::postgres_stages(&config));

    match poller.wait_until_ready().await {
        Ok(_) => {
            println!("{} PostgreSQL is ready", "[OK]".green());
            println!("{} Dev user connection confirmed", "[OK]".green());
            std::process::exit(EXIT_SUCCESS);
        }
        Err(e) => {
            eprintln!("{} {}", "[FAIL]".red(), e);
            std::process::exit(EXIT_UNHEALTHY);
        }
    }
}
