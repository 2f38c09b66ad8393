//! Score Error Types
//!
//! This module defines the [`ScoreError`] enum, which encapsulates all error types that can occur
//! during validation, registration, and transport of score records.
//! Each variant provides a descriptive error message for robust error handling and debugging.
//!
//! Validation errors deliberately never include the expected session secret in their message;
//! a mismatch names the offending test and nothing else.

use std::fmt;

/// Represents all error types that can occur in the score system.
#[derive(Debug)]
pub enum ScoreError {
    /// A record carries an empty test name.
    EmptyTestName,
    /// Max score must be greater than zero.
    InvalidMaxScore { test_name: String, max_score: i32 },
    /// Weight must be greater than zero.
    InvalidWeight { test_name: String, weight: i32 },
    /// Score lies outside the interval `[0, max_score]`.
    ScoreOutOfRange {
        test_name: String,
        score: i32,
        max_score: i32,
    },
    /// The embedded secret does not match the session secret.
    SecretMismatch { test_name: String },
    /// A test was registered twice under the same name.
    DuplicateTest(String),
    /// Lookup of a test name that was never registered.
    UnknownTest(String),
    /// Socket-level failure in the session transport.
    Session(String),
}

impl fmt::Display for ScoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoreError::EmptyTestName => write!(f, "empty test name"),
            ScoreError::InvalidMaxScore {
                test_name,
                max_score,
            } => write!(
                f,
                "{}: max score must be greater than 0 (got {})",
                test_name, max_score
            ),
            ScoreError::InvalidWeight { test_name, weight } => write!(
                f,
                "{}: weight must be greater than 0 (got {})",
                test_name, weight
            ),
            ScoreError::ScoreOutOfRange {
                test_name,
                score,
                max_score,
            } => write!(
                f,
                "{}: score {} outside interval [0, {}]",
                test_name, score, max_score
            ),
            ScoreError::SecretMismatch { test_name } => {
                write!(f, "{}: incorrect secret", test_name)
            }
            ScoreError::DuplicateTest(test_name) => {
                write!(f, "{}: duplicate score test", test_name)
            }
            ScoreError::UnknownTest(test_name) => {
                write!(f, "{}: unknown score test", test_name)
            }
            ScoreError::Session(msg) => write!(f, "session transport error: {}", msg),
        }
    }
}

impl std::error::Error for ScoreError {}

impl From<std::io::Error> for ScoreError {
    fn from(err: std::io::Error) -> Self {
        ScoreError::Session(err.to_string())
    }
}
