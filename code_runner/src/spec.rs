//! Construction of container run specifications.
//!
//! An assignment's run script follows the `run.sh` convention: the first
//! line names the container image as `#image/<name>` and the remaining
//! lines are the shell commands executed inside it. The computed
//! environment hands the sandboxed tests the paths they need plus the
//! session secret; the secret enters the container only through that
//! variable and is never logged by the runner.

use crate::error::RunnerError;
use common::config::AppConfig;
use serde::Deserialize;
use std::time::Duration;

/// First line of every run script: `#image/<name>`.
pub const IMAGE_PREFIX: &str = "#image/";

/// Environment variable naming the mounted tests tree.
pub const TESTS_ENV: &str = "TESTS";
/// Environment variable naming the mounted assignments tree.
pub const ASSIGNMENTS_ENV: &str = "ASSIGNMENTS";
/// Environment variable naming the assignment being graded.
pub const CURRENT_ENV: &str = "CURRENT";
/// Environment variable naming the session socket directory inside the
/// container, so the in-container reporter resolves the same socket path.
pub const SOCKET_ROOT_ENV: &str = "SOCKET_ROOT";

/// Image name and command body parsed from a run script template.
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptTemplate {
    pub image: String,
    pub commands: Vec<String>,
}

impl ScriptTemplate {
    /// Parses a run script. The first non-empty line must carry the
    /// `#image/` header; every following non-empty line is a command.
    pub fn parse(script: &str) -> Result<ScriptTemplate, RunnerError> {
        let mut lines = script.lines().map(str::trim).filter(|l| !l.is_empty());
        let header = lines
            .next()
            .ok_or_else(|| RunnerError::Script("empty run script".to_string()))?;
        let image = header
            .strip_prefix(IMAGE_PREFIX)
            .ok_or_else(|| RunnerError::Script("no docker image specified".to_string()))?
            .trim();
        if image.is_empty() {
            return Err(RunnerError::Script("no docker image specified".to_string()));
        }
        let commands: Vec<String> = lines.map(str::to_string).collect();
        if commands.is_empty() {
            return Err(RunnerError::Script("run script has no commands".to_string()));
        }
        Ok(ScriptTemplate {
            image: image.to_string(),
            commands,
        })
    }
}

/// Resource limits applied to every run container.
#[derive(Debug, Clone, Deserialize)]
pub struct ContainerLimits {
    #[serde(default = "default_max_memory")]
    pub max_memory: String,
    #[serde(default = "default_max_cpus")]
    pub max_cpus: String,
    #[serde(default = "default_max_processes")]
    pub max_processes: u32,
}

fn default_max_memory() -> String {
    "256m".to_string()
}

fn default_max_cpus() -> String {
    "1".to_string()
}

fn default_max_processes() -> u32 {
    64
}

impl Default for ContainerLimits {
    fn default() -> Self {
        ContainerLimits {
            max_memory: default_max_memory(),
            max_cpus: default_max_cpus(),
            max_processes: default_max_processes(),
        }
    }
}

/// One container execution request, immutable once built.
#[derive(Debug, Clone)]
pub struct RunSpec {
    /// Container name, also used for best-effort kill on timeout.
    pub name: String,
    pub image: String,
    /// `KEY=VALUE` pairs passed into the container.
    pub env: Vec<String>,
    /// `(host_path, container_path)` bind mounts.
    pub mounts: Vec<(String, String)>,
    pub commands: Vec<String>,
    pub timeout: Duration,
    pub limits: ContainerLimits,
}

impl RunSpec {
    pub fn new(name: &str, template: ScriptTemplate, timeout: Duration) -> RunSpec {
        RunSpec {
            name: name.to_string(),
            image: template.image,
            env: Vec::new(),
            mounts: Vec::new(),
            commands: template.commands,
            timeout,
            limits: ContainerLimits::default(),
        }
    }
}

/// Builds the environment handed to the sandboxed tests: the tests and
/// assignments trees, the current assignment name, the in-container socket
/// directory, and the session secret.
pub fn session_env(
    tests_dir: &str,
    assignments_dir: &str,
    current: &str,
    socket_root: &str,
    secret: &str,
) -> Vec<String> {
    vec![
        format!("{}={}", TESTS_ENV, tests_dir),
        format!("{}={}", ASSIGNMENTS_ENV, assignments_dir),
        format!("{}={}", CURRENT_ENV, current),
        format!("{}={}", SOCKET_ROOT_ENV, socket_root),
        format!("{}={}", score::SECRET_ENV_NAME, secret),
    ]
}

/// Resolves the run timeout: a positive assignment-level override (in
/// minutes) wins over the configured global default.
pub fn container_timeout(override_minutes: i64) -> Duration {
    let minutes = if override_minutes > 0 {
        override_minutes as u64
    } else {
        AppConfig::global().container_timeout_minutes
    };
    Duration::from_secs(minutes * 60)
}
