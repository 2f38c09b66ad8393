//! # Marker Library
//!
//! This crate drives the grading of one submission end to end: it builds the
//! sandboxed run for an assignment, collects and authenticates the scores the
//! run produced, grades them against the previous submission, and accounts
//! deadline slip days on the student's enrollment.
//!
//! ## Key Concepts
//! - **RunData**: One grading run; knows how to build its container job and grade its output.
//! - **SubmissionStore**: The persistence seam for submissions and enrollments.
//! - **Slip days**: Automatic late-day accounting with a grace period, kept idempotent.
//! - **Rebuilds**: Re-evaluations that preserve the original delivery date and
//!   withdraw approvals the new evidence no longer supports.

pub mod error;
pub mod pipeline;
pub mod slipdays;
pub mod store;
pub mod types;

pub use error::MarkerError;
pub use pipeline::{
    CONTAINER_ASSIGNMENTS_DIR, CONTAINER_SOCKET_DIR, CONTAINER_TESTS_DIR, MANUAL_REVIEW_LOG,
    RunData,
};
pub use slipdays::{GRACE_PERIOD_HOURS, since_deadline, update_slip_days};
pub use store::{MemoryStore, SubmissionStore};
pub use types::{
    Assignment, Course, Enrollment, Submission, SubmissionStatus, UsedSlipDays,
};
