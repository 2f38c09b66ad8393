//! Registration of graded tests before they run.
//!
//! Test suites declare every graded test up front with its maximum score and
//! weight. Each test then obtains a primed record with [`TestRegistry::min`]
//! or [`TestRegistry::max_score`], adjusts it as checks pass or fail, and
//! reports it through a [`ScoreSink`](crate::session::ScoreSink). Emitting
//! the registered roster with [`TestRegistry::print_test_info`] lets the
//! grading side know which tests to expect even when some never report.

use crate::error::ScoreError;
use crate::record::ScoreRecord;
use crate::session::ScoreSink;
use std::collections::HashMap;

/// Holds the graded tests registered for one run, in registration order.
pub struct TestRegistry {
    secret: String,
    test_names: Vec<String>,
    tests: HashMap<String, ScoreRecord>,
}

impl TestRegistry {
    pub fn new(secret: &str) -> TestRegistry {
        TestRegistry {
            secret: secret.to_string(),
            test_names: Vec::new(),
            tests: HashMap::new(),
        }
    }

    /// Registers a graded test under the run-wide task.
    pub fn add(&mut self, test_name: &str, max_score: i32, weight: i32) -> Result<(), ScoreError> {
        self.add_with_task(test_name, "", max_score, weight)
    }

    /// Registers a graded test belonging to the named task.
    pub fn add_with_task(
        &mut self,
        test_name: &str,
        task_name: &str,
        max_score: i32,
        weight: i32,
    ) -> Result<(), ScoreError> {
        if test_name.is_empty() {
            return Err(ScoreError::EmptyTestName);
        }
        if max_score <= 0 {
            return Err(ScoreError::InvalidMaxScore {
                test_name: test_name.to_string(),
                max_score,
            });
        }
        if weight <= 0 {
            return Err(ScoreError::InvalidWeight {
                test_name: test_name.to_string(),
                weight,
            });
        }
        if self.tests.contains_key(test_name) {
            return Err(ScoreError::DuplicateTest(test_name.to_string()));
        }
        let mut record = ScoreRecord::new(&self.secret, test_name, max_score, weight);
        record.task_name = task_name.to_string();
        self.test_names.push(test_name.to_string());
        self.tests.insert(test_name.to_string(), record);
        Ok(())
    }

    /// Returns the registered record primed at zero, for tests that increment
    /// the score as checks pass.
    pub fn min(&self, test_name: &str) -> Result<ScoreRecord, ScoreError> {
        let record = self.lookup(test_name)?;
        Ok(record)
    }

    /// Returns the registered record primed at its maximum, for tests that
    /// decrement the score as checks fail.
    pub fn max_score(&self, test_name: &str) -> Result<ScoreRecord, ScoreError> {
        let mut record = self.lookup(test_name)?;
        record.score = record.max_score;
        Ok(record)
    }

    fn lookup(&self, test_name: &str) -> Result<ScoreRecord, ScoreError> {
        match self.tests.get(test_name) {
            Some(record) => Ok(record.clone()),
            None => Err(ScoreError::UnknownTest(test_name.to_string())),
        }
    }

    /// Emits every registered test as a zero-score record, in registration
    /// order. Run this before the tests so the grading side learns the full
    /// roster including tests that later crash without reporting.
    pub fn print_test_info(&self, sink: &mut ScoreSink) -> Result<(), ScoreError> {
        for name in &self.test_names {
            if let Some(record) = self.tests.get(name) {
                sink.report(record)?;
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.test_names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.test_names.is_empty()
    }
}
