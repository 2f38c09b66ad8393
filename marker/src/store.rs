//! Persistence seam for grading results.
//!
//! The pipeline only needs to look up the previous submission and enrollment
//! and write back the graded ones, so the store is a small trait. `MemoryStore`
//! is the in-process implementation used in tests and single-node deployments.

use crate::error::MarkerError;
use crate::types::{Enrollment, Submission};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Storage operations the grading pipeline depends on.
#[async_trait]
pub trait SubmissionStore: Send + Sync {
    /// Latest stored submission for this assignment and user, if any.
    async fn previous_submission(
        &self,
        assignment_id: i64,
        user_id: i64,
    ) -> Result<Option<Submission>, MarkerError>;

    /// Persists a graded submission, assigning an id when it has none.
    /// Returns the stored record.
    async fn save_submission(&self, submission: Submission) -> Result<Submission, MarkerError>;

    /// The user's enrollment in the course, if any.
    async fn enrollment(
        &self,
        course_id: i64,
        user_id: i64,
    ) -> Result<Option<Enrollment>, MarkerError>;

    /// Persists an enrollment after its slip-day ledger changed.
    async fn save_enrollment(&self, enrollment: Enrollment) -> Result<(), MarkerError>;
}

/// In-memory store keyed by `(assignment_id, user_id)` for submissions and
/// `(course_id, user_id)` for enrollments. Clones share the same state.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<StoreState>>,
}

#[derive(Debug, Default)]
struct StoreState {
    submissions: HashMap<(i64, i64), Submission>,
    enrollments: HashMap<(i64, i64), Enrollment>,
    next_submission_id: i64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SubmissionStore for MemoryStore {
    async fn previous_submission(
        &self,
        assignment_id: i64,
        user_id: i64,
    ) -> Result<Option<Submission>, MarkerError> {
        let state = self.inner.lock().await;
        Ok(state.submissions.get(&(assignment_id, user_id)).cloned())
    }

    async fn save_submission(&self, mut submission: Submission) -> Result<Submission, MarkerError> {
        let mut state = self.inner.lock().await;
        if submission.id == 0 {
            state.next_submission_id += 1;
            submission.id = state.next_submission_id;
        }
        state
            .submissions
            .insert((submission.assignment_id, submission.user_id), submission.clone());
        Ok(submission)
    }

    async fn enrollment(
        &self,
        course_id: i64,
        user_id: i64,
    ) -> Result<Option<Enrollment>, MarkerError> {
        let state = self.inner.lock().await;
        Ok(state.enrollments.get(&(course_id, user_id)).cloned())
    }

    async fn save_enrollment(&self, enrollment: Enrollment) -> Result<(), MarkerError> {
        let mut state = self.inner.lock().await;
        state
            .enrollments
            .insert((enrollment.course_id, enrollment.user_id), enrollment);
        Ok(())
    }
}
