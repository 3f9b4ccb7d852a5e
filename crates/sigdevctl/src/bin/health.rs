//! sigdev-health - one-shot health report over the dev stack
//!
//! Probes every declared service concurrently, prints the report, and
//! exits 0 only when everything is healthy.

use anyhow::Result;
use clap::Parser;
use sigdev_common::{StackConfig, EXIT_SUCCESS, EXIT_UNHEALTHY};
use sigdevctl::{catalog, engine, logging, report};
use tracing::error;

#[derive(Parser)]
#[command(name = "sigdev-health")]
#[command(about = "Check the health of the signature platform dev stack", long_about = None)]
#[command(version)]
struct Cli {
    /// Output JSON instead of the human report
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init();

    let code = match run(&cli).await {
        Ok(code) => code,
        Err(e) => {
            error!("health check failed: {:#}", e);
            EXIT_UNHEALTHY
        }
    };
    std::process::exit(code);
}

async fn run(cli: &Cli) -> Result<i32> {
    let config = StackConfig::from_env();
    let probes = catalog::standard_probes(&config);

    if !cli.json {
        println!("Checking system health...\n");
    }

    let run_report = engine::run_probes(probes).await;

    if cli.json {
        println!("{}", report::render_json(&run_report)?);
    } else {
        print!("{}", report::render_report(&run_report));
    }

    Ok(if run_report.all_healthy() {
        EXIT_SUCCESS
    } else {
        EXIT_UNHEALTHY
    })
}
