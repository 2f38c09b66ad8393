//! # Code Runner Library
//!
//! This crate executes grading runs inside isolated Docker containers. It
//! builds a run specification from an assignment's script template and a
//! computed environment, drives the container with a bounded timeout while
//! capturing output incrementally, bounds stored log size without losing
//! score lines, and optionally limits how many builds run at once.
//!
//! ## Key Concepts
//! - **RunSpec**: Image, environment, commands and timeout for one container run.
//! - **Runner / DockerRunner**: Executes a spec; timeouts still return partial output.
//! - **truncate_log**: Head/tail truncation that rescues score lines from the cut middle.
//! - **RunQueue**: Caps concurrent builds across the process.

pub mod docker;
pub mod error;
pub mod queue;
pub mod spec;
pub mod truncate;

pub use docker::{DockerRunner, Runner};
pub use error::{CONTAINER_TIMEOUT_MESSAGE, RunnerError};
pub use queue::RunQueue;
pub use spec::{ContainerLimits, RunSpec, ScriptTemplate, container_timeout, session_env};
pub use truncate::truncate_log;
