//! The grading pipeline for one submission.
//!
//! A run mints a fresh session secret, binds the session socket, executes the
//! assignment's script in a sandbox with the grading volumes mounted, then
//! turns whatever the sandbox produced into a stored submission: the console
//! output is truncated, scanned for authenticated score records, merged with
//! records delivered over the session socket, reconciled against the
//! assignment's expected tests, graded against the previous submission, and
//! persisted together with slip-day accounting.
//!
//! A timed-out run is not a failed run: grading proceeds on whatever partial
//! output exists. Only an unusable script, a container that cannot start, or
//! a broken store abort the call.

use crate::error::MarkerError;
use crate::slipdays::update_slip_days;
use crate::store::SubmissionStore;
use crate::types::{Assignment, Course, Submission, SubmissionStatus};
use chrono::Utc;
use code_runner::{
    CONTAINER_TIMEOUT_MESSAGE, RunSpec, Runner, RunnerError, ScriptTemplate, container_timeout,
    session_env, truncate_log,
};
use common::config::AppConfig;
use score::{Results, SessionListener, extract_results, reconcile};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{Notify, mpsc};
use uuid::Uuid;

/// Mount point of the course's test tree inside the container.
pub const CONTAINER_TESTS_DIR: &str = "/verimark/tests";
/// Mount point of the course's assignment tree inside the container.
pub const CONTAINER_ASSIGNMENTS_DIR: &str = "/verimark/assignments";
/// Mount point of the session socket directory inside the container.
pub const CONTAINER_SOCKET_DIR: &str = "/verimark/sessions";

/// Build log recorded for assignments graded by hand instead of by tests.
pub const MANUAL_REVIEW_LOG: &str = "No automated tests for this assignment";

/// Everything needed to grade one delivery of one assignment.
#[derive(Debug, Clone)]
pub struct RunData {
    pub course: Course,
    pub assignment: Assignment,
    pub user_id: i64,
    /// Commit being graded, recorded on the submission.
    pub commit_id: String,
    /// Owner label used in the container name, typically the student login.
    pub job_owner: String,
    /// True when re-evaluating an existing delivery rather than grading a
    /// new one.
    pub rebuild: bool,
}

impl RunData {
    /// Container name for this run: course, assignment, owner and a short
    /// secret prefix, lowercased to satisfy container naming rules.
    pub fn job_name(&self, secret: &str) -> String {
        let prefix = secret.get(..6).unwrap_or(secret);
        format!(
            "{}-{}-{}-{}",
            self.course.code, self.assignment.name, self.job_owner, prefix
        )
        .to_lowercase()
    }

    /// Builds the container run request: parsed script, resolved timeout,
    /// grading volume mounts and the session environment.
    pub fn job(&self, secret: &str) -> Result<RunSpec, MarkerError> {
        let template = ScriptTemplate::parse(&self.assignment.script_template)?;
        let timeout = container_timeout(self.assignment.container_timeout_minutes);
        let mut spec = RunSpec::new(&self.job_name(secret), template, timeout);

        let (storage_root, socket_root) = {
            let cfg = AppConfig::global();
            (cfg.storage_root.clone(), cfg.socket_root.clone())
        };
        let course_root = Path::new(&storage_root).join(&self.course.code);
        spec.mounts = vec![
            (
                course_root.join("tests").to_string_lossy().into_owned(),
                CONTAINER_TESTS_DIR.to_string(),
            ),
            (
                course_root.join("assignments").to_string_lossy().into_owned(),
                CONTAINER_ASSIGNMENTS_DIR.to_string(),
            ),
            (socket_root, CONTAINER_SOCKET_DIR.to_string()),
        ];
        spec.env = session_env(
            CONTAINER_TESTS_DIR,
            CONTAINER_ASSIGNMENTS_DIR,
            &self.assignment.name,
            CONTAINER_SOCKET_DIR,
            secret,
        );
        Ok(spec)
    }

    /// Turns a run's results into the submission to store, grading against
    /// the previous submission for this assignment and user.
    ///
    /// `None` results mean the assignment is reviewed by hand: the previous
    /// score and status carry over unchanged under a placeholder build log.
    pub fn record_results(
        &self,
        previous: Option<&Submission>,
        results: Option<Results>,
    ) -> Submission {
        match results {
            Some(results) => self.test_run_submission(previous, results),
            None => self.manual_review_submission(previous),
        }
    }

    fn manual_review_submission(&self, previous: Option<&Submission>) -> Submission {
        Submission {
            id: previous.map_or(0, |p| p.id),
            assignment_id: self.assignment.id,
            user_id: self.user_id,
            commit_hash: self.commit_id.clone(),
            score: previous.map_or(0, |p| p.score),
            status: previous.map_or(SubmissionStatus::None, |p| p.status),
            note: previous.and_then(|p| p.note.clone()),
            build_info: Some(score::BuildInfo::new(MANUAL_REVIEW_LOG, 1)),
            scores: Vec::new(),
            released: previous.is_some_and(|p| p.released),
        }
    }

    fn test_run_submission(
        &self,
        previous: Option<&Submission>,
        mut results: Results,
    ) -> Submission {
        let grade = results.sum();

        if self.rebuild {
            // A rebuild re-evaluates the original delivery; the student's
            // delivery time must survive it.
            if let Some(info) = previous.and_then(|p| p.build_info.as_ref()) {
                results.build_info.submission_date = info.submission_date;
            }
        }

        let previous_status = previous.map_or(SubmissionStatus::None, |p| p.status);
        let mut note = None;
        let status = match previous {
            Some(prev)
                if self.rebuild
                    && prev.status == SubmissionStatus::Approved
                    && grade < prev.score =>
            {
                // An approval the new evidence no longer supports must not
                // silently survive a rebuild.
                note = Some(format!(
                    "Rebuild scored {}, down from the approved {}; needs review",
                    grade, prev.score
                ));
                SubmissionStatus::Revision
            }
            _ => self.assignment.submission_status(previous_status, grade),
        };

        Submission {
            id: previous.map_or(0, |p| p.id),
            assignment_id: self.assignment.id,
            user_id: self.user_id,
            commit_hash: self.commit_id.clone(),
            score: grade,
            status,
            note,
            build_info: Some(results.build_info),
            scores: results.scores.to_vec(),
            released: false,
        }
    }

    /// Runs the submission in the sandbox, grades the output and stores the
    /// result. Returns the stored submission.
    pub async fn run_and_grade<R, S>(&self, runner: &R, store: &S) -> Result<Submission, MarkerError>
    where
        R: Runner + ?Sized,
        S: SubmissionStore + ?Sized,
    {
        let secret = Uuid::new_v4().to_string();
        let spec = self.job(&secret)?;

        let listener = SessionListener::bind(&secret)?;
        let cancel = Arc::new(Notify::new());
        let (tx, mut rx) = mpsc::unbounded_channel();
        let session = tokio::spawn(listener.serve(Arc::clone(&cancel), Some(tx)));

        tracing::debug!(job = %spec.name, "running tests");
        let start = Instant::now();
        let run = runner.run(&spec).await;
        let exec_time = start.elapsed();

        cancel.notify_one();
        match session.await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => tracing::warn!(%err, "session listener ended with error"),
            Err(err) => tracing::warn!(%err, "session listener task failed"),
        }

        let out = match run {
            Ok(out) => out,
            Err(RunnerError::Timeout { output }) => {
                tracing::warn!(job = %spec.name, "run timed out; grading partial output");
                format!("{}\n{}", output, CONTAINER_TIMEOUT_MESSAGE)
            }
            Err(err) => return Err(err.into()),
        };

        let mut extraction = extract_results(&truncate_log(&out), &secret, exec_time, None);
        // Records delivered over the session socket join the fold before
        // the expected-test reconciliation.
        while let Ok(record) = rx.try_recv() {
            extraction.results.scores.add(record);
        }
        if !self.assignment.expected_tests.is_empty() {
            let scores = std::mem::take(&mut extraction.results.scores);
            extraction.results.scores = reconcile(scores, &self.assignment.expected_tests);
        }
        if !extraction.diagnostics.is_empty() {
            tracing::debug!(
                count = extraction.diagnostics.len(),
                "discarded invalid score records during extraction"
            );
        }

        let previous = store
            .previous_submission(self.assignment.id, self.user_id)
            .await?;
        let submission = self.record_results(previous.as_ref(), Some(extraction.results));

        if !self.rebuild {
            self.account_slip_days(store, &submission).await?;
        }
        store.save_submission(submission).await
    }

    /// Recomputes and persists the enrollment's slip-day usage for this
    /// submission. Invariant violations abort the grading call.
    async fn account_slip_days<S>(&self, store: &S, submission: &Submission) -> Result<(), MarkerError>
    where
        S: SubmissionStore + ?Sized,
    {
        let build_time = submission
            .build_info
            .as_ref()
            .map_or_else(Utc::now, |info| info.build_date);

        let Some(mut enrollment) = store.enrollment(self.course.id, self.user_id).await? else {
            return Err(MarkerError::MissingRecord(format!(
                "no enrollment for user {} in course {}",
                self.user_id, self.course.id
            )));
        };
        update_slip_days(&mut enrollment, &self.assignment, submission, build_time)?;
        enrollment.set_slip_days(&self.course);
        store.save_enrollment(enrollment).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::types::Enrollment;
    use async_trait::async_trait;
    use chrono::TimeZone;
    use score::{BuildInfo, SECRET_ENV_NAME, ScoreRecord, ScoreSet, ScoreSink, TestInfo};
    use serial_test::serial;
    use std::time::Duration;

    fn course() -> Course {
        Course {
            id: 7,
            code: "DAT520".to_string(),
            slip_days: 5,
        }
    }

    fn assignment(auto_approve: bool, score_limit: u32) -> Assignment {
        Assignment {
            id: 1,
            course_id: 7,
            name: "lab1".to_string(),
            deadline: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
            auto_approve,
            score_limit,
            container_timeout_minutes: 0,
            script_template: "#image/verimark:go\ngo test ./...".to_string(),
            expected_tests: Vec::new(),
        }
    }

    fn run_data(assignment: Assignment, rebuild: bool) -> RunData {
        RunData {
            course: course(),
            assignment,
            user_id: 42,
            commit_id: "abc123".to_string(),
            job_owner: "Meling".to_string(),
            rebuild,
        }
    }

    fn results_with(records: &[(&str, i32, i32, i32)]) -> Results {
        let mut scores = ScoreSet::new();
        for (name, score, max_score, weight) in records {
            scores.add(ScoreRecord {
                secret: score::HIDDEN_SECRET.to_string(),
                test_name: name.to_string(),
                task_name: String::new(),
                score: *score,
                max_score: *max_score,
                weight: *weight,
            });
        }
        Results::new(BuildInfo::new("build ok", 42), scores)
    }

    fn previous(score: u32, status: SubmissionStatus) -> Submission {
        Submission {
            id: 9,
            assignment_id: 1,
            user_id: 42,
            commit_hash: "earlier".to_string(),
            score,
            status,
            note: None,
            build_info: Some(BuildInfo::new("old log", 10)),
            scores: Vec::new(),
            released: false,
        }
    }

    #[test]
    fn test_manual_review_preserves_previous_submission() {
        let data = run_data(assignment(true, 80), false);
        let mut prev = previous(77, SubmissionStatus::Approved);
        prev.note = Some("looks good".to_string());
        prev.released = true;

        let submission = data.record_results(Some(&prev), None);
        assert_eq!(submission.id, 9);
        assert_eq!(submission.score, 77);
        assert_eq!(submission.status, SubmissionStatus::Approved);
        assert_eq!(submission.note.as_deref(), Some("looks good"));
        assert!(submission.released);
        assert_eq!(submission.commit_hash, "abc123");
        let info = submission.build_info.unwrap();
        assert_eq!(info.build_log, MANUAL_REVIEW_LOG);
        assert_eq!(info.exec_time_ms, 1);
        assert!(submission.scores.is_empty());
    }

    #[test]
    fn test_first_submission_grades_and_auto_approves() {
        let data = run_data(assignment(true, 80), false);
        let results = results_with(&[("A", 80, 100, 1)]);

        let submission = data.record_results(None, Some(results));
        assert_eq!(submission.id, 0, "fresh submission carries no id yet");
        assert_eq!(submission.score, 80);
        assert_eq!(submission.status, SubmissionStatus::Approved);
        assert_eq!(submission.scores.len(), 1);
    }

    #[test]
    fn test_below_limit_preserves_previous_status() {
        let data = run_data(assignment(true, 80), false);
        let results = results_with(&[("A", 50, 100, 1)]);

        let submission = data.record_results(None, Some(results));
        assert_eq!(submission.status, SubmissionStatus::None);

        let results = results_with(&[("A", 50, 100, 1)]);
        let prev = previous(40, SubmissionStatus::Revision);
        let submission = data.record_results(Some(&prev), Some(results));
        assert_eq!(submission.status, SubmissionStatus::Revision);
        assert_eq!(submission.score, 50);
    }

    #[test]
    fn test_rebuild_reverts_approval_when_grade_drops() {
        let data = run_data(assignment(true, 80), true);
        let prev = previous(90, SubmissionStatus::Approved);
        let results = results_with(&[("A", 70, 100, 1)]);

        let submission = data.record_results(Some(&prev), Some(results));
        assert_eq!(submission.status, SubmissionStatus::Revision);
        let note = submission.note.expect("revert must attach a note");
        assert!(note.contains("70") && note.contains("90"), "note: {note}");
    }

    #[test]
    fn test_rebuild_keeps_approval_when_grade_holds() {
        let data = run_data(assignment(true, 80), true);
        let prev = previous(70, SubmissionStatus::Approved);
        let results = results_with(&[("A", 90, 100, 1)]);

        let submission = data.record_results(Some(&prev), Some(results));
        assert_eq!(submission.status, SubmissionStatus::Approved);
        assert_eq!(submission.score, 90);
        assert!(submission.note.is_none());
    }

    #[test]
    fn test_plain_resubmission_never_reverts_approval() {
        // Only a rebuild re-examines an existing approval.
        let data = run_data(assignment(true, 80), false);
        let prev = previous(90, SubmissionStatus::Approved);
        let results = results_with(&[("A", 70, 100, 1)]);

        let submission = data.record_results(Some(&prev), Some(results));
        assert_eq!(submission.status, SubmissionStatus::Approved);
        assert!(submission.note.is_none());
    }

    #[test]
    fn test_rebuild_preserves_delivery_date() {
        let data = run_data(assignment(true, 80), true);
        let delivered = Utc.with_ymd_and_hms(2024, 2, 20, 9, 30, 0).unwrap();
        let mut prev = previous(50, SubmissionStatus::None);
        if let Some(info) = prev.build_info.as_mut() {
            info.submission_date = delivered;
        }
        let results = results_with(&[("A", 60, 100, 1)]);

        let submission = data.record_results(Some(&prev), Some(results));
        let info = submission.build_info.unwrap();
        assert_eq!(info.submission_date, delivered);
        assert!(info.build_date > delivered, "build date reflects the rebuild");
    }

    // End-to-end runs below drive the real session listener, so they pin the
    // global config to per-test temp directories.

    enum Emit {
        Console(&'static str),
        Score(&'static str, i32, i32, i32),
        SocketScore(&'static str, i32, i32, i32),
    }

    struct MockRunner {
        emits: Vec<Emit>,
        timeout: bool,
        fail_start: bool,
    }

    impl MockRunner {
        fn emitting(emits: Vec<Emit>) -> Self {
            Self {
                emits,
                timeout: false,
                fail_start: false,
            }
        }
    }

    #[async_trait]
    impl Runner for MockRunner {
        async fn run(&self, spec: &RunSpec) -> Result<String, RunnerError> {
            if self.fail_start {
                return Err(RunnerError::Start("no such image".to_string()));
            }
            let prefix = format!("{}=", SECRET_ENV_NAME);
            let secret = spec
                .env
                .iter()
                .find_map(|kv| kv.strip_prefix(prefix.as_str()))
                .expect("run spec must carry the session secret");

            let mut out = String::new();
            let mut sent_on_socket = false;
            for emit in &self.emits {
                match emit {
                    Emit::Console(line) => {
                        out.push_str(line);
                        out.push('\n');
                    }
                    Emit::Score(name, score, max_score, weight) => {
                        let mut record = ScoreRecord::new(secret, *name, *max_score, *weight);
                        record.score = *score;
                        out.push_str(&record.json());
                        out.push('\n');
                    }
                    Emit::SocketScore(name, score, max_score, weight) => {
                        let mut record = ScoreRecord::new(secret, *name, *max_score, *weight);
                        record.score = *score;
                        let mut sink = ScoreSink::connect(secret);
                        assert!(
                            matches!(sink, ScoreSink::Socket(_)),
                            "session socket should be reachable"
                        );
                        sink.report(&record).unwrap();
                        sent_on_socket = true;
                    }
                }
            }
            if sent_on_socket {
                // Leave the listener time to drain the connection.
                tokio::time::sleep(Duration::from_millis(100)).await;
            }
            if self.timeout {
                return Err(RunnerError::Timeout { output: out });
            }
            Ok(out)
        }
    }

    struct TestEnv {
        _sockets: tempfile::TempDir,
        store: MemoryStore,
    }

    async fn test_env() -> TestEnv {
        let sockets = tempfile::tempdir().unwrap();
        AppConfig::set_socket_root(sockets.path().to_string_lossy().to_string());
        let store = MemoryStore::new();
        store
            .save_enrollment(Enrollment {
                id: 3,
                course_id: 7,
                user_id: 42,
                used_slip_days: Vec::new(),
                slip_days_remaining: 5,
            })
            .await
            .unwrap();
        TestEnv {
            _sockets: sockets,
            store,
        }
    }

    #[tokio::test(flavor = "multi_thread")]
    #[serial]
    async fn test_run_and_grade_stores_graded_submission() {
        let env = test_env().await;
        let data = run_data(assignment(true, 90), false);
        let runner = MockRunner::emitting(vec![
            Emit::Console("compiling"),
            Emit::Score("TestA", 80, 100, 1),
            Emit::Console("done"),
        ]);

        let submission = data.run_and_grade(&runner, &env.store).await.unwrap();
        assert_eq!(submission.score, 80);
        assert_eq!(submission.status, SubmissionStatus::None, "below the limit");
        assert_eq!(submission.scores.len(), 1);

        let info = submission.build_info.as_ref().unwrap();
        assert!(info.build_log.contains("compiling"));
        assert!(info.build_log.contains("done"));
        assert!(
            !info.build_log.contains("{\"Secret\""),
            "score lines never reach the student log"
        );

        let stored = env.store.previous_submission(1, 42).await.unwrap();
        assert_eq!(stored.unwrap().score, 80);

        // Late and below the limit: slip days were charged and persisted.
        let enrollment = env.store.enrollment(7, 42).await.unwrap().unwrap();
        assert_eq!(enrollment.used_slip_days.len(), 1);

        let leftover = std::fs::read_dir(env._sockets.path()).unwrap().count();
        assert_eq!(leftover, 0, "session socket must be removed");
    }

    #[tokio::test(flavor = "multi_thread")]
    #[serial]
    async fn test_run_and_grade_merges_session_records() {
        let env = test_env().await;
        let data = run_data(assignment(true, 90), false);
        let runner = MockRunner::emitting(vec![
            Emit::Score("TestA", 100, 100, 1),
            Emit::SocketScore("TestB", 50, 100, 1),
        ]);

        let submission = data.run_and_grade(&runner, &env.store).await.unwrap();
        assert_eq!(submission.scores.len(), 2);
        assert_eq!(submission.score, 75);
        let names: Vec<&str> = submission.scores.iter().map(|r| r.test_name.as_str()).collect();
        assert!(names.contains(&"TestA") && names.contains(&"TestB"));
    }

    #[tokio::test(flavor = "multi_thread")]
    #[serial]
    async fn test_timeout_still_grades_partial_output() {
        let env = test_env().await;
        let data = run_data(assignment(true, 90), false);
        let mut runner = MockRunner::emitting(vec![
            Emit::Console("started"),
            Emit::Score("TestA", 50, 100, 1),
        ]);
        runner.timeout = true;

        let submission = data.run_and_grade(&runner, &env.store).await.unwrap();
        assert_eq!(submission.score, 50);
        let log = submission.build_info.unwrap().build_log;
        assert!(log.contains("started"));
        assert!(log.contains(CONTAINER_TIMEOUT_MESSAGE));
    }

    #[tokio::test(flavor = "multi_thread")]
    #[serial]
    async fn test_expected_tests_reconcile_the_result() {
        let env = test_env().await;
        let mut a = assignment(true, 90);
        a.expected_tests = vec![
            TestInfo {
                test_name: "TestA".to_string(),
                task_name: String::new(),
                max_score: 100,
                weight: 1,
            },
            TestInfo {
                test_name: "TestB".to_string(),
                task_name: String::new(),
                max_score: 100,
                weight: 1,
            },
        ];
        let data = run_data(a, false);
        let runner = MockRunner::emitting(vec![
            Emit::Score("TestA", 100, 100, 1),
            Emit::Score("Injected", 100, 100, 100),
        ]);

        let submission = data.run_and_grade(&runner, &env.store).await.unwrap();
        assert_eq!(submission.scores.len(), 2);
        assert_eq!(submission.score, 50, "missing TestB counts as zero");
        assert!(!submission.scores.iter().any(|r| r.test_name == "Injected"));
    }

    #[tokio::test(flavor = "multi_thread")]
    #[serial]
    async fn test_rebuild_skips_slip_day_accounting() {
        let env = test_env().await;
        let data = run_data(assignment(true, 90), true);
        env.store
            .save_submission(previous(50, SubmissionStatus::None))
            .await
            .unwrap();
        let runner = MockRunner::emitting(vec![Emit::Score("TestA", 60, 100, 1)]);

        data.run_and_grade(&runner, &env.store).await.unwrap();
        let enrollment = env.store.enrollment(7, 42).await.unwrap().unwrap();
        assert!(enrollment.used_slip_days.is_empty());
    }

    #[tokio::test(flavor = "multi_thread")]
    #[serial]
    async fn test_missing_enrollment_aborts_before_saving() {
        let sockets = tempfile::tempdir().unwrap();
        AppConfig::set_socket_root(sockets.path().to_string_lossy().to_string());
        let store = MemoryStore::new();
        let data = run_data(assignment(true, 90), false);
        let runner = MockRunner::emitting(vec![Emit::Score("TestA", 50, 100, 1)]);

        let err = data.run_and_grade(&runner, &store).await.unwrap_err();
        assert!(matches!(err, MarkerError::MissingRecord(_)));
        assert!(store.previous_submission(1, 42).await.unwrap().is_none());
    }

    #[tokio::test(flavor = "multi_thread")]
    #[serial]
    async fn test_unrecoverable_runner_failure_surfaces() {
        let env = test_env().await;
        let data = run_data(assignment(true, 90), false);
        let mut runner = MockRunner::emitting(Vec::new());
        runner.fail_start = true;

        let err = data.run_and_grade(&runner, &env.store).await.unwrap_err();
        assert!(matches!(err, MarkerError::Runner(_)));
    }

    #[test]
    #[serial]
    fn test_job_builds_mounts_and_environment() {
        AppConfig::set_storage_root("/srv/verimark");
        AppConfig::set_socket_root("/run/verimark-sessions");
        let data = run_data(assignment(true, 80), false);

        let spec = data.job("0f5c2ff0aaf64f2a").unwrap();
        assert_eq!(spec.name, "dat520-lab1-meling-0f5c2f");
        assert_eq!(spec.image, "verimark:go");
        assert_eq!(spec.commands, vec!["go test ./...".to_string()]);
        assert_eq!(
            spec.mounts,
            vec![
                (
                    "/srv/verimark/DAT520/tests".to_string(),
                    CONTAINER_TESTS_DIR.to_string()
                ),
                (
                    "/srv/verimark/DAT520/assignments".to_string(),
                    CONTAINER_ASSIGNMENTS_DIR.to_string()
                ),
                (
                    "/run/verimark-sessions".to_string(),
                    CONTAINER_SOCKET_DIR.to_string()
                ),
            ]
        );
        assert!(spec.env.contains(&"CURRENT=lab1".to_string()));
        assert!(
            spec.env
                .contains(&format!("{}=0f5c2ff0aaf64f2a", SECRET_ENV_NAME))
        );
        AppConfig::reset();
    }

    #[test]
    fn test_job_rejects_bad_script() {
        let mut a = assignment(true, 80);
        a.script_template = "echo no image line".to_string();
        let data = run_data(a, false);
        assert!(matches!(
            data.job("secret"),
            Err(MarkerError::Runner(_))
        ));
    }
}
