use std::process::Stdio;
use std::time::Duration;

use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::error::AgentError;

/// Invoke an external agent or predictor process.
///
/// The payload is piped to the child's stdin; the child's stdout is the
/// response. The whole spawn/write/wait sequence runs under one timeout,
/// and the child future is dropped on expiry.
pub async fn invoke_command(
    program: &str,
    args: &[String],
    stdin_payload: &str,
    timeout: Duration,
) -> Result<String, AgentError> {
    debug!(program, "Invoking external command");

    let result = tokio::time::timeout(timeout, async {
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(stdin_payload.as_bytes()).await?;
            // Dropping stdin closes the pipe so the child sees EOF.
        }

        child.wait_with_output().await
    })
    .await
    .map_err(|_| AgentError::Timeout(timeout.as_secs()))?
    .map_err(|e| AgentError::Command(format!("failed to run {program}: {e}")))?;

    if !result.status.success() {
        let stderr = String::from_utf8_lossy(&result.stderr);
        warn!(program, status = %result.status, stderr = %stderr, "Command failed");
        return Err(AgentError::Command(format!(
            "{program} exited {}: {stderr}",
            result.status
        )));
    }

    let stdout = String::from_utf8_lossy(&result.stdout).to_string();
    if stdout.trim().is_empty() {
        return Err(AgentError::Command(format!(
            "{program} returned empty output"
        )));
    }

    Ok(stdout)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn echoes_stdin_back() {
        let output = invoke_command(
            "cat",
            &[],
            r#"{"ping": true}"#,
            Duration::from_secs(5),
        )
        .await
        .unwrap();
        assert_eq!(output, r#"{"ping": true}"#);
    }

    #[tokio::test]
    async fn missing_program_is_command_error() {
        let err = invoke_command(
            "definitely-not-a-real-binary",
            &[],
            "",
            Duration::from_secs(5),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AgentError::Command(_)));
    }

    #[tokio::test]
    async fn nonzero_exit_is_command_error() {
        let err = invoke_command("false", &[], "", Duration::from_secs(5))
            .await
            .unwrap_err();
        assert!(matches!(err, AgentError::Command(_)));
    }

    #[tokio::test]
    async fn empty_output_rejected() {
        let err = invoke_command("true", &[], "", Duration::from_secs(5))
            .await
            .unwrap_err();
        assert!(matches!(err, AgentError::Command(_)));
    }

    #[tokio::test]
    async fn slow_command_times_out() {
        let err = invoke_command(
            "sleep",
            &["30".to_string()],
            "",
            Duration::from_millis(100),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AgentError::Timeout(_)));
    }
}
