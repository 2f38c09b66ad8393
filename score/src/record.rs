//! Score record wire format and validation.
//!
//! A [`ScoreRecord`] is one test's outcome, weight, and ceiling, signed with a
//! run-scoped secret. Records cross the container boundary as single-line JSON
//! with fixed PascalCase field names, either on the console or over the session
//! socket. Validation authenticates a record against the run's secret and then
//! replaces the embedded secret with a placeholder so the real value never
//! leaves the validation boundary.

use crate::error::ScoreError;
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;

/// Environment variable carrying the per-run grading secret into the sandbox.
pub const SECRET_ENV_NAME: &str = "VERIMARK_SESSION_SECRET";

/// Placeholder substituted for the secret once a record has been validated.
pub const HIDDEN_SECRET: &str = "hidden";

/// Encodes the score of a test or a group of tests.
///
/// Serialized field names are part of the wire format and must not change:
/// `Secret`, `TestName`, `TaskName`, `Score`, `MaxScore`, `Weight`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ScoreRecord {
    /// The unique identifier for a scoring session.
    pub secret: String,
    /// Name of the test.
    pub test_name: String,
    /// Optional task grouping for partial grades; empty when ungrouped.
    #[serde(default)]
    pub task_name: String,
    /// The score obtained.
    #[serde(default)]
    pub score: i32,
    /// Max score possible to get on this specific test.
    pub max_score: i32,
    /// The weight of this test; used to compute final grade.
    pub weight: i32,
}

impl ScoreRecord {
    /// Returns a new record with the given max and weight and a zero score.
    pub fn new(
        secret: impl Into<String>,
        test_name: impl Into<String>,
        max_score: i32,
        weight: i32,
    ) -> Self {
        Self {
            secret: secret.into(),
            test_name: test_name.into(),
            task_name: String::new(),
            score: 0,
            max_score,
            weight,
        }
    }

    /// Checks the record's invariants against the expected session secret.
    ///
    /// Check order: test name, max score, weight, score interval, secret.
    /// The returned error never contains the expected secret.
    pub fn is_valid(&self, secret: &str) -> Result<(), ScoreError> {
        if self.test_name.is_empty() {
            return Err(ScoreError::EmptyTestName);
        }
        if self.max_score <= 0 {
            return Err(ScoreError::InvalidMaxScore {
                test_name: self.test_name.clone(),
                max_score: self.max_score,
            });
        }
        if self.weight <= 0 {
            return Err(ScoreError::InvalidWeight {
                test_name: self.test_name.clone(),
                weight: self.weight,
            });
        }
        if self.score < 0 || self.score > self.max_score {
            return Err(ScoreError::ScoreOutOfRange {
                test_name: self.test_name.clone(),
                score: self.score,
                max_score: self.max_score,
            });
        }
        if self.secret != secret {
            return Err(ScoreError::SecretMismatch {
                test_name: self.test_name.clone(),
            });
        }
        Ok(())
    }

    /// Validates the record and, on success, hides the embedded secret.
    pub fn validate(&mut self, secret: &str) -> Result<(), ScoreError> {
        self.is_valid(secret)?;
        self.secret = HIDDEN_SECRET.to_string();
        Ok(())
    }

    /// Decodes and validates a single line, hiding the secret on success.
    ///
    /// Returns `None` for anything that is not a valid, authenticated record.
    /// Callers that need to distinguish malformed from invalid lines should
    /// decode and validate in two steps instead.
    pub fn parse(line: &str, secret: &str) -> Option<ScoreRecord> {
        let mut record: ScoreRecord = serde_json::from_str(line.trim()).ok()?;
        record.validate(secret).ok()?;
        Some(record)
    }

    /// Increments score if score is less than max score.
    pub fn inc(&mut self) {
        if self.score < self.max_score {
            self.score += 1;
        }
    }

    /// Increments score n times or until score equals max score.
    pub fn inc_by(&mut self, n: i32) {
        if self.score + n < self.max_score {
            self.score += n;
        } else {
            self.score = self.max_score;
        }
    }

    /// Decrements score if score is greater than zero.
    pub fn dec(&mut self) {
        if self.score > 0 {
            self.score -= 1;
        }
    }

    /// Decrements score n times or until score equals zero.
    pub fn dec_by(&mut self, n: i32) {
        if self.score - n > 0 {
            self.score -= n;
        } else {
            self.score = 0;
        }
    }

    /// Returns the single-line JSON representation of the record.
    pub fn json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|err| format!("json marshal error: {}", err))
    }
}

/// Format: "TestName: 2/10 test cases passed".
impl fmt::Display for ScoreRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {}/{} test cases passed",
            self.test_name, self.score, self.max_score
        )
    }
}

/// Reads the session secret from the environment and immediately clears the
/// variable so it cannot leak through later environment dumps.
///
/// Returns an empty string when the variable is unset. Call once at startup,
/// before any other threads are spawned.
pub fn secret_from_env() -> String {
    let secret = env::var(SECRET_ENV_NAME).unwrap_or_default();
    // SAFETY: called during single-threaded startup, before the test harness
    // or runtime spawns any other thread that could read the environment.
    unsafe { env::remove_var(SECRET_ENV_NAME) };
    secret
}
