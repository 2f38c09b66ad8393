//! # Score Library
//!
//! This crate provides the scoring protocol shared between sandboxed test
//! runs and the grading host: the score record wire format, validated
//! collection and aggregation of results, extraction of records from raw
//! console output, the per-run session transport, and grading schemes for
//! turning percentages into labels.
//!
//! ## Key Concepts
//! - **ScoreRecord**: One graded test's result, authenticated by a per-run secret.
//! - **TestRegistry**: Up-front declaration of the graded tests inside a run.
//! - **ScoreSet / Results**: Validated collection with weighted aggregation.
//! - **Extraction**: Recovering records from console output, with a student-safe filtered log.
//! - **Session**: Unix socket transport keyed by the run secret, with stdout fallback.

pub mod error;
pub mod extract;
pub mod record;
pub mod registry;
pub mod results;
pub mod scheme;
pub mod session;

pub use error::ScoreError;
pub use extract::{Extraction, TestInfo, extract_results, has_score_prefix, reconcile};
pub use record::{HIDDEN_SECRET, SECRET_ENV_NAME, ScoreRecord, secret_from_env};
pub use registry::TestRegistry;
pub use results::{BuildInfo, Results, ScoreSet};
pub use scheme::{GradeStep, GradingScheme};
pub use session::{ScoreSink, SessionListener, socket_path};
