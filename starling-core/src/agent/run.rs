//! End-to-end agent execution: spawn, stream, aggregate

use tokio::io::AsyncReadExt;
use tracing::debug;

use crate::{Error, Result};

use super::backend::{Backend, QueryOptions};
use super::collect::{AgentResult, ResponseCollector};
use super::output::OutputStreamer;

/// Run an agent to completion and aggregate its output
///
/// Spawns the backend, streams its stdout into a [`ResponseCollector`], and
/// waits for exit. Stderr is drained concurrently so the child never blocks
/// on a full pipe; its contents are folded into the error on a non-zero exit.
///
/// Any failure is echoed to stderr as `Agent error: ...` before propagating,
/// so the user sees the proximate cause even when callers wrap the error.
pub async fn run_agent(
    backend: &dyn Backend,
    prompt: &str,
    options: &QueryOptions,
) -> Result<AgentResult> {
    match run_inner(backend, prompt, options).await {
        Ok(result) => Ok(result),
        Err(err) => {
            eprintln!("Agent error: {}", err);
            Err(err)
        }
    }
}

async fn run_inner(
    backend: &dyn Backend,
    prompt: &str,
    options: &QueryOptions,
) -> Result<AgentResult> {
    debug!(backend = backend.name(), "Spawning agent");
    let mut handle = backend.spawn(prompt, options).await?;

    let stdout = handle
        .child_mut()
        .stdout
        .take()
        .ok_or_else(|| Error::Agent("Failed to capture agent stdout".to_string()))?;

    let stderr_task = handle.child_mut().stderr.take().map(|mut stderr| {
        tokio::spawn(async move {
            let mut buf = String::new();
            let _ = stderr.read_to_string(&mut buf).await;
            buf
        })
    });

    let mut streamer = OutputStreamer::new(stdout);
    let mut collector = ResponseCollector::new();

    if let Err(err) = streamer.stream(&mut collector).await {
        let _ = handle.kill().await;
        return Err(err);
    }

    let status = handle.wait().await?;

    let stderr_text = match stderr_task {
        Some(task) => task.await.unwrap_or_default(),
        None => String::new(),
    };

    if !status.success() {
        return Err(exit_error(status, &stderr_text));
    }

    debug!("Agent finished");
    Ok(collector.finish())
}

fn exit_error(status: std::process::ExitStatus, stderr_text: &str) -> Error {
    // ExitStatus displays as "exit status: N" (or "signal: N" on kill).
    let detail = stderr_text.trim();
    if detail.is_empty() {
        return Error::Agent(format!("Agent exited with {}", status));
    }

    let mut display: String = detail.chars().take(200).collect();
    if display.len() < detail.len() {
        display.push_str("...");
    }
    Error::Agent(format!("Agent exited with {}: {}", status, display))
}

#[cfg(test)]
mod tests {
    use super::super::backend::ClaudeBackend;
    use super::*;

    #[cfg(unix)]
    fn fake_agent(dir: &tempfile::TempDir, script_body: &str) -> std::path::PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.path().join("fake-claude");
        std::fs::write(&path, format!("#!/bin/sh\n{}\n", script_body)).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_agent_aggregates_output() {
        let dir = tempfile::tempdir().unwrap();
        let script = fake_agent(
            &dir,
            r#"echo '{"type":"assistant","message":{"content":[{"type":"text","text":"hello"}]}}'
echo '{"type":"result","subtype":"success","cost_usd":0.5,"duration_ms":10,"num_turns":1}'"#,
        );

        let backend = ClaudeBackend::new().with_path(script.to_string_lossy());
        let result = run_agent(&backend, "prompt", &QueryOptions::default())
            .await
            .unwrap();

        assert_eq!(result.text, "hello");
        assert_eq!(result.cost_usd, Some(0.5));
        assert_eq!(result.num_turns, Some(1));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_agent_nonzero_exit() {
        let dir = tempfile::tempdir().unwrap();
        let script = fake_agent(
            &dir,
            r#"echo '{"type":"assistant","message":{"content":[{"type":"text","text":"partial"}]}}'
echo 'something broke' >&2
exit 3"#,
        );

        let backend = ClaudeBackend::new().with_path(script.to_string_lossy());
        let result = run_agent(&backend, "prompt", &QueryOptions::default()).await;

        let err = result.unwrap_err();
        assert!(matches!(err, Error::Agent(_)));
        let msg = err.to_string();
        assert!(msg.contains("exited with"));
        assert!(msg.contains("something broke"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_agent_no_result_event() {
        let dir = tempfile::tempdir().unwrap();
        let script = fake_agent(
            &dir,
            r#"echo '{"type":"assistant","message":{"content":[{"type":"text","text":"only text"}]}}'"#,
        );

        let backend = ClaudeBackend::new().with_path(script.to_string_lossy());
        let result = run_agent(&backend, "prompt", &QueryOptions::default())
            .await
            .unwrap();

        assert_eq!(result.text, "only text");
        assert_eq!(result.cost_usd, None);
        assert_eq!(result.duration_ms, None);
    }

    #[cfg(unix)]
    #[test]
    fn test_exit_error_truncates_long_stderr() {
        use std::os::unix::process::ExitStatusExt;

        let status = std::process::ExitStatus::from_raw(256);
        let long = "x".repeat(500);
        let err = exit_error(status, &long);
        let msg = err.to_string();
        assert!(msg.contains("..."));
        assert!(msg.len() < 300);
    }
}
