//! Result set aggregation and the weighted grading sum.
//!
//! [`ScoreSet`] folds the records of one grading run into at most one
//! authoritative record per test name, preserving insertion order for
//! deterministic reporting. The fold implements the registration pattern a
//! test harness emits (zero record up front, real record after) and detects
//! conflicting duplicate emissions, a hallmark of tampering.
//!
//! Grading is proportional: each test contributes `score/max_score` scaled by
//! its share of the total weight, so a 5-point test and a 500-point test with
//! equal weight contribute equally.

use crate::error::ScoreError;
use crate::record::ScoreRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Sentinel score marking a detected duplicate/conflicting emission.
pub const CONFLICT_SENTINEL: i32 = -1;

/// An insertion-ordered collection of score records, keyed by test name.
#[derive(Debug, Clone, Default)]
pub struct ScoreSet {
    /// Test names in insertion order; defines the reporting order.
    test_names: Vec<String>,
    scores: HashMap<String, ScoreRecord>,
}

impl ScoreSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds a record into the set under the conflict policy:
    ///
    /// - first record for a name is stored as-is;
    /// - a second record replaces the stored one while the stored score is
    ///   zero (registration followed by the real result);
    /// - a second record over a non-zero stored score forces the stored score
    ///   to [`CONFLICT_SENTINEL`] and the incoming record is dropped, as are
    ///   all later records for that name.
    pub fn add(&mut self, record: ScoreRecord) {
        match self.scores.get_mut(&record.test_name) {
            Some(current) => {
                if current.score != 0 {
                    if current.score != CONFLICT_SENTINEL {
                        tracing::warn!(
                            test_name = %current.test_name,
                            "conflicting duplicate score emission; forcing sentinel"
                        );
                        current.score = CONFLICT_SENTINEL;
                    }
                } else {
                    *current = record;
                }
            }
            None => {
                self.test_names.push(record.test_name.clone());
                self.scores.insert(record.test_name.clone(), record);
            }
        }
    }

    /// Looks up the stored record for a test name.
    pub fn get(&self, test_name: &str) -> Option<&ScoreRecord> {
        self.scores.get(test_name)
    }

    /// Returns the records in insertion order.
    pub fn records(&self) -> impl Iterator<Item = &ScoreRecord> {
        self.test_names
            .iter()
            .filter_map(|name| self.scores.get(name))
    }

    /// Clones the records out of the set in insertion order.
    pub fn to_vec(&self) -> Vec<ScoreRecord> {
        self.records().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.test_names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.test_names.is_empty()
    }

    /// Checks every recorded score object against the expected secret.
    /// Returns the first error encountered, in insertion order.
    pub fn validate(&self, secret: &str) -> Result<(), ScoreError> {
        for record in self.records() {
            record.is_valid(secret)?;
        }
        Ok(())
    }

    /// Returns the total grade of the recorded scores, in the range 0-100.
    pub fn sum(&self) -> u32 {
        self.task_sum("")
    }

    /// Returns the grade restricted to records of the given task, 0-100.
    ///
    /// An empty task name selects every record.
    pub fn task_sum(&self, task_name: &str) -> u32 {
        let (total, _) = self.internal_sum(task_name);
        (total * 100.0).round() as u32
    }

    /// Returns the total score and total weight for the given task, both in
    /// the range 0-1.
    fn internal_sum(&self, task_name: &str) -> (f64, f64) {
        let selected: Vec<&ScoreRecord> = self
            .records()
            .filter(|r| task_name.is_empty() || r.task_name == task_name)
            .collect();

        let total_weight: f64 = selected.iter().map(|r| f64::from(r.weight)).sum();
        if total_weight <= 0.0 {
            return (0.0, 0.0);
        }

        let mut total = 0.0;
        for record in selected {
            let max_score = f64::from(record.max_score);
            if max_score <= 0.0 {
                continue;
            }
            // Defensive clamp; a conflict sentinel contributes zero.
            let score = f64::from(record.score).clamp(0.0, max_score);
            total += (score / max_score) * (f64::from(record.weight) / total_weight);
        }
        (total, total_weight)
    }
}

impl FromIterator<ScoreRecord> for ScoreSet {
    fn from_iter<I: IntoIterator<Item = ScoreRecord>>(iter: I) -> Self {
        let mut set = ScoreSet::new();
        for record in iter {
            set.add(record);
        }
        set
    }
}

/// Metadata about one execution, independent of which tests ran.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildInfo {
    /// Console output with score lines filtered out; shown to the student.
    pub build_log: String,
    /// Measured execution time in milliseconds.
    pub exec_time_ms: i64,
    /// When this build ran.
    pub build_date: DateTime<Utc>,
    /// When the student delivered the work; preserved across rebuilds.
    pub submission_date: DateTime<Utc>,
}

impl BuildInfo {
    pub fn new(build_log: impl Into<String>, exec_time_ms: i64) -> Self {
        let now = Utc::now();
        Self {
            build_log: build_log.into(),
            exec_time_ms,
            build_date: now,
            submission_date: now,
        }
    }
}

/// The outcome of one grading run: deduplicated scores plus build metadata.
#[derive(Debug, Clone)]
pub struct Results {
    pub build_info: BuildInfo,
    pub scores: ScoreSet,
}

impl Results {
    pub fn new(build_info: BuildInfo, scores: ScoreSet) -> Self {
        Self { build_info, scores }
    }

    /// Total grade in the range 0-100.
    pub fn sum(&self) -> u32 {
        self.scores.sum()
    }

    /// Grade restricted to one task grouping, 0-100.
    pub fn task_sum(&self, task_name: &str) -> u32 {
        self.scores.task_sum(task_name)
    }

    /// Checks every recorded score object against the expected secret.
    pub fn validate(&self, secret: &str) -> Result<(), ScoreError> {
        self.scores.validate(secret)
    }
}
