//! Declared service catalog
//!
//! The fixed set of dev-stack services, the probes that check them, and
//! the remediation hints shown when a service is down. Probe order here
//! is report order.

use crate::probe::{CommandProbe, Expectation, HttpProbe, LocalStackProbe, Probe};
use sigdev_common::StackConfig;

pub const WEB_URL: &str = "http://localhost:3000";
pub const LAMBDA_URL: &str = "http://localhost:3001";
pub const DB_STUDIO_URL: &str = "http://localhost:5555";
pub const PGADMIN_URL: &str = "http://localhost:8080";

/// Full probe set for the one-shot health report
pub fn standard_probes(config: &StackConfig) -> Vec<Box<dyn Probe>> {
    vec![
        Box::new(postgres_liveness(config)),
        Box::new(redis_ping(config)),
        Box::new(LocalStackProbe::new("LocalStack", config.localstack_url.clone())),
        Box::new(HttpProbe::new("Web frontend", WEB_URL)),
        Box::new(HttpProbe::new("Lambda emulator", LAMBDA_URL)),
        Box::new(HttpProbe::new("DB studio", DB_STUDIO_URL)),
        Box::new(HttpProbe::new("PgAdmin", PGADMIN_URL)),
    ]
}

/// PostgreSQL liveness as the dev user, for the health report
pub fn postgres_liveness(config: &StackConfig) -> CommandProbe {
    CommandProbe::new(
        "PostgreSQL",
        "docker",
        vec![
            "exec".into(),
            config.postgres_container.clone(),
            "pg_isready".into(),
            "-U".into(),
            config.db_user.clone(),
            "-d".into(),
            config.db_name.clone(),
        ],
        Expectation::ZeroExit,
    )
}

/// Two-stage PostgreSQL readiness: the server must accept connections
/// before the application role is worth checking, but both stages run
/// each attempt so diagnostics stay complete.
pub fn postgres_stages(config: &StackConfig) -> Vec<Box<dyn Probe>> {
    vec![
        Box::new(CommandProbe::new(
            "server accepts connections",
            "docker",
            vec![
                "exec".into(),
                config.postgres_container.clone(),
                "pg_isready".into(),
                "-U".into(),
                "postgres".into(),
            ],
            Expectation::ZeroExit,
        )),
        Box::new(CommandProbe::new(
            "dev user usable",
            "docker",
            vec![
                "exec".into(),
                config.postgres_container.clone(),
                "psql".into(),
                "-U".into(),
                config.db_user.clone(),
                "-d".into(),
                config.db_name.clone(),
                "-c".into(),
                "SELECT 1;".into(),
            ],
            Expectation::ZeroExit,
        )),
    ]
}

/// Redis liveness: an exact PONG, anything else is down
pub fn redis_ping(config: &StackConfig) -> CommandProbe {
    CommandProbe::new(
        "Redis",
        "docker",
        vec![
            "exec".into(),
            config.redis_container.clone(),
            "redis-cli".into(),
            "ping".into(),
        ],
        Expectation::OutputEquals("PONG".into()),
    )
}

/// How to start a service that the health report found down
pub fn remediation_hint(service: &str) -> Option<&'static str> {
    match service {
        "PostgreSQL" | "Redis" => Some("Database services: docker compose up -d postgres redis"),
        "LocalStack" => Some("LocalStack: docker compose up -d localstack"),
        "Web frontend" => Some("Web frontend: npm run dev:web"),
        "Lambda emulator" => Some("Lambda emulator: npm run dev:lambda"),
        "DB studio" => Some("DB studio: npm run dev:studio"),
        _ => None,
    }
}
