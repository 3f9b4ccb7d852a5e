//! Report rendering - clean, ASCII-only terminal output
//!
//! One line per service, a summary count, and remediation hints for
//! whatever is down. The exit code is the only machine-readable
//! signal; `--json` exists for anything that wants structure.

use crate::catalog::remediation_hint;
use anyhow::Result;
use owo_colors::OwoColorize;
use sigdev_common::{HealthState, RunReport};

/// Render the human report: per-service lines, summary, hints
pub fn render_report(report: &RunReport) -> String {
    let mut out = String::new();

    for service in &report.services {
        let marker = match service.state {
            HealthState::Healthy => format!("{}", pad_marker("[OK]").green()),
            HealthState::Unhealthy => format!("{}", pad_marker("[FAIL]").red()),
            HealthState::Unknown => format!("{}", pad_marker("[??]").yellow()),
        };

        let url_info = service
            .url
            .as_deref()
            .map(|u| format!(" ({})", u))
            .unwrap_or_default();

        out.push_str(&format!("{} {}{}\n", marker, service.name, url_info));

        if let Some(message) = &service.message {
            out.push_str(&format!("       - {}\n", message.dimmed()));
        }
    }

    out.push('\n');
    out.push_str(&format!(
        "Health summary: {}/{} services healthy\n",
        report.healthy_count(),
        report.total_count()
    ));

    if report.all_healthy() {
        out.push_str(&format!("{}\n", "All systems operational.".green()));
    } else {
        out.push_str(&format!("{}\n", "Some services need attention.".yellow()));
        let hints = collect_hints(report);
        if !hints.is_empty() {
            out.push_str("To start missing services:\n");
            for hint in hints {
                out.push_str(&format!("  - {}\n", hint));
            }
        }
    }

    out
}

/// Render the report as pretty JSON with a run timestamp
pub fn render_json(report: &RunReport) -> Result<String> {
    let payload = serde_json::json!({
        "checked_at": chrono::Utc::now().to_rfc3339(),
        "healthy": report.healthy_count(),
        "total": report.total_count(),
        "all_healthy": report.all_healthy(),
        "services": report.services,
    });
    Ok(serde_json::to_string_pretty(&payload)?)
}

/// Markers are padded before coloring so columns line up
fn pad_marker(marker: &str) -> String {
    format!("{:<6}", marker)
}

/// Hints for the unhealthy services, deduplicated in report order
fn collect_hints(report: &RunReport) -> Vec<&'static str> {
    let mut hints = Vec::new();
    for name in report.unhealthy_names() {
        if let Some(hint) = remediation_hint(name) {
            if !hints.contains(&hint) {
                hints.push(hint);
            }
        }
    }
    hints
}
