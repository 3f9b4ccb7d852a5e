//! Command execution layer
//!
//! Runs a subprocess, captures real exit code, stdout, stderr and
//! duration, and returns the result without interpretation. Callers
//! decide what a non-zero exit or unexpected output means.

use anyhow::{Context, Result};
use std::process::Stdio;
use std::time::Instant;
use tokio::process::Command;
use tracing::debug;

/// Captured result of one subprocess run
#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
    pub duration_ms: u64,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Run `program` with `args`, with `envs` set on the child process only.
///
/// Fails only when the process cannot be spawned (program missing,
/// permission denied). A non-zero exit is a normal `CommandOutput`.
pub async fn run_command(
    program: &str,
    args: &[String],
    envs: &[(String, String)],
) -> Result<CommandOutput> {
    let start = Instant::now();

    debug!("executing: {} {}", program, args.join(" "));

    let mut cmd = Command::new(program);
    cmd.args(args)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    for (key, value) in envs {
        cmd.env(key, value);
    }

    let output = cmd
        .output()
        .await
        .with_context(|| format!("failed to execute {}", program))?;

    Ok(CommandOutput {
        exit_code: output.status.code().unwrap_or(-1),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        duration_ms: start.elapsed().as_millis() as u64,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn captures_stdout_and_exit_code() {
        let out = run_command("echo", &["hello".to_string()], &[])
            .await
            .unwrap();
        assert!(out.success());
        assert_eq!(out.stdout.trim(), "hello");
    }

    #[tokio::test]
    async fn non_zero_exit_is_not_an_error() {
        let out = run_command("false", &[], &[]).await.unwrap();
        assert!(!out.success());
        assert_ne!(out.exit_code, 0);
    }

    #[tokio::test]
    async fn missing_program_is_an_error() {
        let result = run_command("sigdev-no-such-binary", &[], &[]).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn env_is_scoped_to_the_child() {
        let out = run_command(
            "sh",
            &["-c".to_string(), "printf %s \"$SIGDEV_EXEC_TEST\"".to_string()],
            &[("SIGDEV_EXEC_TEST".to_string(), "scoped".to_string())],
        )
        .await
        .unwrap();
        assert_eq!(out.stdout, "scoped");
        assert!(std::env::var("SIGDEV_EXEC_TEST").is_err());
    }
}
