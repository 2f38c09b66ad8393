//! Result extraction from untrusted console output.
//!
//! The console of a grading run interleaves ordinary build output with
//! single-line JSON score records. A student's code can print arbitrary text,
//! forge partial JSON, or replay fake score lines, so extraction never trusts
//! shape alone: candidate lines are detected by a cheap prefix test, decoded,
//! and authenticated against the run's secret before they count.
//!
//! Disposition of lines:
//! - non-candidate lines become the filtered build log shown to the student
//!   (empty lines are dropped);
//! - candidate lines that fail to decode are ordinary text, not errors;
//! - well-shaped records that fail validation are dropped from the log with
//!   the cause kept as a diagnostic, never shown to the student;
//! - valid records are folded into the result set and removed from the log.

use crate::error::ScoreError;
use crate::record::{HIDDEN_SECRET, ScoreRecord};
use crate::results::{BuildInfo, Results, ScoreSet};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Field-name prefixes identifying a score-line candidate.
const SCORE_PREFIXES: [&str; 5] = [
    "{\"Secret\":",
    "{\"TestName\":",
    "{\"Score\":",
    "{\"MaxScore\":",
    "{\"Weight\":",
];

/// Reports whether the trimmed line starts like a score record.
///
/// The prefix test keeps scanning cost flat on huge non-JSON lines; only
/// candidates are ever handed to the JSON decoder.
pub fn has_score_prefix(line: &str) -> bool {
    let trimmed = line.trim_start();
    SCORE_PREFIXES
        .iter()
        .any(|prefix| trimmed.starts_with(prefix))
}

/// One entry of an assignment's expected-test roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestInfo {
    pub test_name: String,
    #[serde(default)]
    pub task_name: String,
    pub max_score: i32,
    pub weight: i32,
}

/// The outcome of scanning one run's console output.
#[derive(Debug)]
pub struct Extraction {
    pub results: Results,
    /// Validation failures for well-shaped records; kept for the grader's
    /// diagnostics, never surfaced to the student.
    pub diagnostics: Vec<ScoreError>,
}

/// Extracts score records from the untrusted console text of one run.
///
/// Valid records are folded under the conflict policy of
/// [`ScoreSet::add`](crate::results::ScoreSet). When `expected` is supplied,
/// the result set is reconciled against it: records for unlisted test names
/// are discarded, and a zero-score record is synthesized for every roster
/// entry that never emitted one, so a crash mid-run still leaves a concrete
/// failure rather than a silently missing grade.
pub fn extract_results(
    out: &str,
    secret: &str,
    exec_time: Duration,
    expected: Option<&[TestInfo]>,
) -> Extraction {
    let mut filtered_log: Vec<&str> = Vec::new();
    let mut diagnostics: Vec<ScoreError> = Vec::new();
    let mut scores = ScoreSet::new();

    for line in out.lines() {
        if has_score_prefix(line) {
            match serde_json::from_str::<ScoreRecord>(line.trim()) {
                Ok(mut record) => match record.validate(secret) {
                    Ok(()) => scores.add(record),
                    Err(err) => {
                        tracing::debug!(%err, "dropping invalid score record");
                        diagnostics.push(err);
                    }
                },
                // Failure to decode is not an error; the line is ordinary text.
                Err(_) => filtered_log.push(line),
            }
        } else if !line.is_empty() {
            filtered_log.push(line);
        }
    }

    if let Some(roster) = expected {
        scores = reconcile(scores, roster);
    }

    let exec_time_ms = i64::try_from(exec_time.as_millis()).unwrap_or(i64::MAX);
    Extraction {
        results: Results::new(BuildInfo::new(filtered_log.join("\n"), exec_time_ms), scores),
        diagnostics,
    }
}

/// Rebuilds the score set in roster order: expected tests keep their emitted
/// record or get a synthesized zero-score record; unlisted names are dropped.
///
/// Callers that merge records from more than one source (console output plus
/// a session socket) fold them all first and reconcile once at the end.
pub fn reconcile(scores: ScoreSet, roster: &[TestInfo]) -> ScoreSet {
    let mut reconciled = ScoreSet::new();
    for info in roster {
        if reconciled.get(&info.test_name).is_some() {
            continue;
        }
        match scores.get(&info.test_name) {
            Some(record) => reconciled.add(record.clone()),
            None => {
                tracing::debug!(test_name = %info.test_name, "synthesizing zero score for expected test");
                reconciled.add(ScoreRecord {
                    secret: HIDDEN_SECRET.to_string(),
                    test_name: info.test_name.clone(),
                    task_name: info.task_name.clone(),
                    score: 0,
                    max_score: info.max_score,
                    weight: info.weight,
                });
            }
        }
    }

    let dropped: Vec<&str> = scores
        .records()
        .filter(|r| reconciled.get(&r.test_name).is_none())
        .map(|r| r.test_name.as_str())
        .collect();
    if !dropped.is_empty() {
        tracing::warn!(?dropped, "discarding score records for unlisted test names");
    }
    reconciled
}
