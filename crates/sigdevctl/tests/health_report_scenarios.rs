//! End-to-end health report scenarios through the public API:
//! probe set in, rendered report and exit decision out.

use anyhow::{bail, Result};
use async_trait::async_trait;
use sigdev_common::{HealthState, EXIT_SUCCESS, EXIT_UNHEALTHY};
use sigdevctl::probe::{HttpProbe, Probe};
use sigdevctl::{engine, report};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

struct StubProbe {
    name: &'static str,
    outcome: Result<(), &'static str>,
}

#[async_trait]
impl Probe for StubProbe {
    fn name(&self) -> &str {
        self.name
    }

    async fn check(&self) -> Result<()> {
        match self.outcome {
            Ok(()) => Ok(()),
            Err(msg) => bail!("{}", msg),
        }
    }
}

fn exit_code_for(report: &sigdev_common::RunReport) -> i32 {
    if report.all_healthy() {
        EXIT_SUCCESS
    } else {
        EXIT_UNHEALTHY
    }
}

#[tokio::test]
async fn mixed_stack_reports_partial_health_and_nonzero_exit() {
    let probes: Vec<Box<dyn Probe>> = vec![
        Box::new(StubProbe {
            name: "PostgreSQL",
            outcome: Ok(()),
        }),
        Box::new(StubProbe {
            name: "Redis",
            outcome: Err("ping failed"),
        }),
    ];

    let run_report = engine::run_probes(probes).await;

    assert_eq!(run_report.healthy_count(), 1);
    assert_eq!(run_report.total_count(), 2);
    assert!(!run_report.all_healthy());
    assert_eq!(exit_code_for(&run_report), EXIT_UNHEALTHY);

    let rendered = report::render_report(&run_report);
    assert!(rendered.contains("Health summary: 1/2 services healthy"));
    assert!(rendered.contains("ping failed"));
    assert!(rendered.contains("docker compose up -d postgres redis"));
}

#[tokio::test]
async fn fully_healthy_stack_exits_zero() {
    let probes: Vec<Box<dyn Probe>> = vec![
        Box::new(StubProbe {
            name: "PostgreSQL",
            outcome: Ok(()),
        }),
        Box::new(StubProbe {
            name: "Redis",
            outcome: Ok(()),
        }),
    ];

    let run_report = engine::run_probes(probes).await;

    assert!(run_report.all_healthy());
    assert_eq!(exit_code_for(&run_report), EXIT_SUCCESS);
    assert!(report::render_report(&run_report).contains("All systems operational."));
}

/// A 404 means something answered: the service is present even if the
/// path is wrong. Connection refused means nothing is listening.
#[tokio::test]
async fn http_404_is_present_but_refused_connection_is_down() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        if let Ok((mut socket, _)) = listener.accept().await {
            let mut buf = [0u8; 1024];
            let _ = socket.read(&mut buf).await;
            let _ = socket
                .write_all(b"HTTP/1.1 404 Not Found\r\ncontent-length: 0\r\nconnection: close\r\n\r\n")
                .await;
            let _ = socket.shutdown().await;
        }
    });

    let closed = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let closed_addr = closed.local_addr().unwrap();
    drop(closed);

    let probes: Vec<Box<dyn Probe>> = vec![
        Box::new(HttpProbe::new("Web frontend", format!("http://{}", addr))),
        Box::new(HttpProbe::new("Lambda emulator", format!("http://{}", closed_addr))),
    ];

    let run_report = engine::run_probes(probes).await;

    assert_eq!(run_report.services[0].state, HealthState::Healthy);
    assert_eq!(run_report.services[1].state, HealthState::Unhealthy);
    assert!(run_report.services[1]
        .message
        .as_deref()
        .unwrap()
        .contains("not running"));
}
