//! Container execution via the local Docker daemon.

use crate::error::RunnerError;
use crate::spec::RunSpec;
use async_trait::async_trait;
use std::process::Stdio;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tokio::sync::Mutex;
use tokio::time::timeout;

/// Executes one run specification to completion.
#[async_trait]
pub trait Runner: Send + Sync {
    /// Runs the container and returns its combined console output.
    ///
    /// A non-zero exit status is not an error; failing tests exit non-zero
    /// and their output still carries score lines. On timeout the partial
    /// output captured so far is returned inside the error.
    async fn run(&self, spec: &RunSpec) -> Result<String, RunnerError>;
}

/// Runs containers with `docker run`, sandboxed: no network, bounded
/// memory/cpu/pids, no privilege escalation.
pub struct DockerRunner;

#[async_trait]
impl Runner for DockerRunner {
    async fn run(&self, spec: &RunSpec) -> Result<String, RunnerError> {
        let mut command = Command::new("docker");
        command
            .arg("run")
            .arg("--rm")
            .arg(format!("--name={}", spec.name))
            .arg("--network=none")
            .arg(format!("--memory={}", spec.limits.max_memory))
            .arg(format!("--cpus={}", spec.limits.max_cpus))
            .arg(format!("--pids-limit={}", spec.limits.max_processes))
            .arg("--security-opt=no-new-privileges");
        for (host_path, container_path) in &spec.mounts {
            command
                .arg("-v")
                .arg(format!("{}:{}", host_path, container_path));
        }
        for entry in &spec.env {
            command.arg("-e").arg(entry);
        }
        command
            .arg(&spec.image)
            .arg("sh")
            .arg("-c")
            .arg(spec.commands.join("\n"))
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        tracing::info!(name = %spec.name, image = %spec.image, "starting run container");

        let mut child = command
            .spawn()
            .map_err(|e| RunnerError::Start(e.to_string()))?;

        // Output is drained as it arrives so a timeout still leaves us with
        // everything printed before the deadline.
        let captured = Arc::new(Mutex::new(String::new()));
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| RunnerError::Start("failed to capture container stdout".to_string()))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| RunnerError::Start("failed to capture container stderr".to_string()))?;
        let stdout_task = tokio::spawn(capture_lines(stdout, Arc::clone(&captured)));
        let stderr_task = tokio::spawn(capture_lines(stderr, Arc::clone(&captured)));

        match timeout(spec.timeout, child.wait()).await {
            Ok(Ok(status)) => {
                let _ = stdout_task.await;
                let _ = stderr_task.await;
                if !status.success() {
                    tracing::warn!(
                        name = %spec.name,
                        code = status.code().unwrap_or(-1),
                        "run container exited non-zero"
                    );
                }
                let output = captured.lock().await.clone();
                Ok(output)
            }
            Ok(Err(err)) => Err(RunnerError::Wait(err.to_string())),
            Err(_) => {
                tracing::warn!(name = %spec.name, "run container timed out, killing it");
                let _ = child.start_kill();
                let _ = Command::new("docker")
                    .arg("kill")
                    .arg(&spec.name)
                    .output()
                    .await;
                let _ = child.wait().await;
                stdout_task.abort();
                stderr_task.abort();
                let output = captured.lock().await.clone();
                Err(RunnerError::Timeout { output })
            }
        }
    }
}

async fn capture_lines<R: AsyncRead + Unpin>(reader: R, sink: Arc<Mutex<String>>) {
    let mut lines = BufReader::new(reader).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        let mut buffer = sink.lock().await;
        buffer.push_str(&line);
        buffer.push('\n');
    }
}
