//! # Types Module
//!
//! This module defines the domain records the grading pipeline reads and
//! writes. They mirror what the surrounding platform persists; this crate
//! only consumes them through the [`SubmissionStore`](crate::store::SubmissionStore)
//! interface.

use chrono::{DateTime, Utc};
use score::{BuildInfo, ScoreRecord, TestInfo};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A course offering, carrying the slip-day allowance shared by all of its
/// assignments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    pub id: i64,
    /// Short course code, e.g. `DAT520`. Also names the course's storage
    /// directory.
    pub code: String,
    pub slip_days: u32,
}

/// One gradeable assignment within a course.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assignment {
    pub id: i64,
    pub course_id: i64,
    pub name: String,
    pub deadline: DateTime<Utc>,
    /// When set, submissions reaching `score_limit` are approved without
    /// teacher action.
    pub auto_approve: bool,
    /// Percentage grade required for approval.
    pub score_limit: u32,
    /// Run timeout override in minutes; zero or negative means the global
    /// default applies.
    pub container_timeout_minutes: i64,
    /// Run script (`#image/<name>` header plus shell commands).
    pub script_template: String,
    /// Roster of tests this assignment is expected to run; empty disables
    /// roster reconciliation.
    pub expected_tests: Vec<TestInfo>,
}

impl Assignment {
    /// Returns the status a submission with `grade` should carry, given the
    /// status it had before: auto-approval when configured and the grade
    /// reaches the limit, otherwise the previous status is preserved.
    pub fn submission_status(&self, previous: SubmissionStatus, grade: u32) -> SubmissionStatus {
        if self.auto_approve && grade >= self.score_limit {
            SubmissionStatus::Approved
        } else {
            previous
        }
    }
}

/// A student's membership in a course, carrying the slip-day ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enrollment {
    pub id: i64,
    pub course_id: i64,
    pub user_id: i64,
    /// One entry per assignment ever submitted late, updated in place.
    pub used_slip_days: Vec<UsedSlipDays>,
    /// Display field derived from the ledger, clamped at zero. The stored
    /// ledger itself is never clamped.
    pub slip_days_remaining: u32,
}

/// Slip-day usage for one assignment within one enrollment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsedSlipDays {
    pub enrollment_id: i64,
    pub assignment_id: i64,
    pub used_days: u32,
}

/// Review state of a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionStatus {
    #[default]
    None,
    Approved,
    Revision,
    Rejected,
}

impl fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SubmissionStatus::None => "none",
            SubmissionStatus::Approved => "approved",
            SubmissionStatus::Revision => "revision",
            SubmissionStatus::Rejected => "rejected",
        };
        write!(f, "{}", label)
    }
}

/// One graded delivery of an assignment by one student.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Submission {
    pub id: i64,
    pub assignment_id: i64,
    pub user_id: i64,
    pub commit_hash: String,
    /// Percentage grade computed from `scores`.
    pub score: u32,
    pub status: SubmissionStatus,
    /// Teacher-facing note, e.g. why an approval was revoked on rebuild.
    pub note: Option<String>,
    pub build_info: Option<BuildInfo>,
    /// Validated score records in emission order.
    pub scores: Vec<ScoreRecord>,
    pub released: bool,
}
