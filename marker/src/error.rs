//! Marker Error Types
//!
//! This module defines the [`MarkerError`] enum, which covers everything that
//! can go wrong while grading a submission: broken cross-entity invariants,
//! container execution failures, and persistence failures.
//!
//! # Usage
//!
//! Use [`MarkerError`] as the error type in functions that drive grading.
//! Invariant violations are always hard failures; callers must never ignore
//! them and must leave any ledgers untouched when one is raised.

use code_runner::RunnerError;
use score::ScoreError;

/// Represents all error types that can occur while grading.
#[derive(Debug)]
pub enum MarkerError {
    /// Cross-entity identity check failed (records from different courses
    /// or assignments were mixed). Always fatal to the call.
    InvariantViolation(String),
    /// Container execution failed before any output could be graded.
    Runner(String),
    /// Persistence layer failure.
    Store(String),
    /// A record the pipeline needs is missing.
    MissingRecord(String),
    /// Session transport failure during the run.
    Session(String),
}

impl From<RunnerError> for MarkerError {
    fn from(err: RunnerError) -> Self {
        MarkerError::Runner(err.to_string())
    }
}

impl From<ScoreError> for MarkerError {
    fn from(err: ScoreError) -> Self {
        MarkerError::Session(err.to_string())
    }
}
