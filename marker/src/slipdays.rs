//! Deadline and slip-day accounting.
//!
//! Slip days are consumed automatically when a submission that is neither
//! passing nor approved lands after the deadline. Elapsed time past the
//! deadline converts to whole days; a partial day beyond the grace period
//! costs one more. The per-enrollment ledger keeps exactly one entry per
//! assignment and is recomputed in place from the inputs, so grading the
//! same submission twice never double-charges.

use crate::error::MarkerError;
use crate::types::{Assignment, Course, Enrollment, Submission, SubmissionStatus, UsedSlipDays};
use chrono::{DateTime, Duration, Utc};

/// Lateness absorbed before a partial day costs a slip day.
pub const GRACE_PERIOD_HOURS: i64 = 2;

/// Time elapsed since the assignment's deadline; positive means late.
pub fn since_deadline(assignment: &Assignment, now: DateTime<Utc>) -> Duration {
    now - assignment.deadline
}

/// Recomputes the enrollment's slip-day usage for this assignment from the
/// submission and its build time.
///
/// Fails with `InvariantViolation` when the records do not belong together,
/// leaving the ledger untouched. Submissions that reached the score limit or
/// are already approved consume nothing.
pub fn update_slip_days(
    enrollment: &mut Enrollment,
    assignment: &Assignment,
    submission: &Submission,
    build_time: DateTime<Utc>,
) -> Result<(), MarkerError> {
    if enrollment.course_id != assignment.course_id {
        return Err(MarkerError::InvariantViolation(format!(
            "invariant violation (enrollment.course_id != assignment.course_id) ({} != {})",
            enrollment.course_id, assignment.course_id
        )));
    }
    if assignment.id != submission.assignment_id {
        return Err(MarkerError::InvariantViolation(format!(
            "invariant violation (assignment.id != submission.assignment_id) ({} != {})",
            assignment.id, submission.assignment_id
        )));
    }

    let since = since_deadline(assignment, build_time);
    if submission.score < assignment.score_limit
        && submission.status != SubmissionStatus::Approved
        && since > Duration::zero()
    {
        let whole_days = since.num_days();
        let remainder = since - Duration::days(whole_days);
        let mut days = whole_days as u32;
        if remainder > Duration::hours(GRACE_PERIOD_HOURS) {
            days += 1;
        }
        enrollment.update_used_slip_days(assignment.id, days);
    }
    Ok(())
}

impl Enrollment {
    /// Sets this assignment's ledger entry to `days`, creating it on first
    /// use. Entries are never duplicated.
    fn update_used_slip_days(&mut self, assignment_id: i64, days: u32) {
        for used in &mut self.used_slip_days {
            if used.assignment_id == assignment_id {
                used.used_days = days;
                return;
            }
        }
        self.used_slip_days.push(UsedSlipDays {
            enrollment_id: self.id,
            assignment_id,
            used_days: days,
        });
    }

    /// Slip days consumed across all assignments.
    pub fn total_slip_days(&self) -> u32 {
        self.used_slip_days.iter().map(|u| u.used_days).sum()
    }

    /// Allowance minus usage; negative when the enrollment is over budget.
    pub fn remaining_slip_days(&self, course: &Course) -> i32 {
        course.slip_days as i32 - self.total_slip_days() as i32
    }

    /// Refreshes the display field from the ledger, clamped at zero.
    pub fn set_slip_days(&mut self, course: &Course) {
        let remaining = self.remaining_slip_days(course);
        self.slip_days_remaining = if remaining < 0 { 0 } else { remaining as u32 };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn deadline() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    fn course() -> Course {
        Course {
            id: 7,
            code: "DAT520".to_string(),
            slip_days: 5,
        }
    }

    fn assignment(id: i64) -> Assignment {
        Assignment {
            id,
            course_id: 7,
            name: format!("lab{}", id),
            deadline: deadline(),
            auto_approve: true,
            score_limit: 80,
            container_timeout_minutes: 0,
            script_template: "#image/verimark:go\ngo test ./...".to_string(),
            expected_tests: Vec::new(),
        }
    }

    fn enrollment() -> Enrollment {
        Enrollment {
            id: 3,
            course_id: 7,
            user_id: 42,
            used_slip_days: Vec::new(),
            slip_days_remaining: 0,
        }
    }

    fn submission(assignment_id: i64, score: u32, status: SubmissionStatus) -> Submission {
        Submission {
            id: 1,
            assignment_id,
            user_id: 42,
            commit_hash: "abc123".to_string(),
            score,
            status,
            note: None,
            build_info: None,
            scores: Vec::new(),
            released: false,
        }
    }

    #[test]
    fn test_on_time_submission_uses_no_slip_days() {
        let mut e = enrollment();
        let a = assignment(1);
        let s = submission(1, 50, SubmissionStatus::None);

        update_slip_days(&mut e, &a, &s, deadline() - Duration::hours(1)).unwrap();
        assert!(e.used_slip_days.is_empty());

        // Exactly at the deadline is not late.
        update_slip_days(&mut e, &a, &s, deadline()).unwrap();
        assert!(e.used_slip_days.is_empty());
    }

    #[test]
    fn test_grace_period_rounding() {
        let cases: &[(Duration, u32)] = &[
            (Duration::seconds(1), 0),
            (Duration::hours(2), 0),
            (Duration::hours(2) + Duration::seconds(1), 1),
            (Duration::hours(24), 1),
            (Duration::hours(26), 1),
            (Duration::hours(26) + Duration::seconds(1), 2),
            (Duration::days(3) + Duration::hours(6), 4),
        ];
        for (lateness, want) in cases {
            let mut e = enrollment();
            let a = assignment(1);
            let s = submission(1, 50, SubmissionStatus::None);
            update_slip_days(&mut e, &a, &s, deadline() + *lateness).unwrap();
            assert_eq!(
                e.total_slip_days(),
                *want,
                "lateness {:?} should cost {} slip days",
                lateness,
                want
            );
        }
    }

    #[test]
    fn test_passing_or_approved_submissions_are_exempt() {
        let a = assignment(1);
        let late = deadline() + Duration::days(2);

        let mut e = enrollment();
        let passing = submission(1, 80, SubmissionStatus::None);
        update_slip_days(&mut e, &a, &passing, late).unwrap();
        assert!(e.used_slip_days.is_empty());

        let mut e = enrollment();
        let approved = submission(1, 10, SubmissionStatus::Approved);
        update_slip_days(&mut e, &a, &approved, late).unwrap();
        assert!(e.used_slip_days.is_empty());
    }

    #[test]
    fn test_update_is_idempotent() {
        let mut e = enrollment();
        let a = assignment(1);
        let s = submission(1, 50, SubmissionStatus::Revision);
        let late = deadline() + Duration::days(1) + Duration::hours(3);

        update_slip_days(&mut e, &a, &s, late).unwrap();
        update_slip_days(&mut e, &a, &s, late).unwrap();

        assert_eq!(e.used_slip_days.len(), 1);
        assert_eq!(e.used_slip_days[0].used_days, 2);
        assert_eq!(e.used_slip_days[0].assignment_id, 1);
        assert_eq!(e.used_slip_days[0].enrollment_id, 3);
    }

    #[test]
    fn test_ledger_entry_updated_in_place() {
        let mut e = enrollment();
        let a = assignment(1);
        let s = submission(1, 50, SubmissionStatus::None);

        update_slip_days(&mut e, &a, &s, deadline() + Duration::days(1)).unwrap();
        assert_eq!(e.used_slip_days[0].used_days, 1);

        update_slip_days(&mut e, &a, &s, deadline() + Duration::days(3) + Duration::hours(6))
            .unwrap();
        assert_eq!(e.used_slip_days.len(), 1, "entry must be mutated, not duplicated");
        assert_eq!(e.used_slip_days[0].used_days, 4);
    }

    #[test]
    fn test_invariant_violations_leave_ledger_untouched() {
        let a = assignment(1);
        let late = deadline() + Duration::days(1);

        let mut e = enrollment();
        e.course_id = 99;
        let s = submission(1, 50, SubmissionStatus::None);
        let err = update_slip_days(&mut e, &a, &s, late).unwrap_err();
        assert!(matches!(err, MarkerError::InvariantViolation(msg)
            if msg.contains("enrollment.course_id") && msg.contains("99 != 7")));
        assert!(e.used_slip_days.is_empty());

        let mut e = enrollment();
        let s = submission(2, 50, SubmissionStatus::None);
        let err = update_slip_days(&mut e, &a, &s, late).unwrap_err();
        assert!(matches!(err, MarkerError::InvariantViolation(msg)
            if msg.contains("assignment.id") && msg.contains("1 != 2")));
        assert!(e.used_slip_days.is_empty());
    }

    #[test]
    fn test_remaining_slip_days_accumulates_across_assignments() {
        let c = course();
        let mut e = enrollment();
        let s1 = submission(1, 50, SubmissionStatus::None);
        let mut s2 = submission(2, 50, SubmissionStatus::None);
        s2.id = 2;

        update_slip_days(&mut e, &assignment(1), &s1, deadline() + Duration::days(2)).unwrap();
        assert_eq!(e.remaining_slip_days(&c), 3);

        update_slip_days(&mut e, &assignment(2), &s2, deadline() + Duration::days(1)).unwrap();
        assert_eq!(e.remaining_slip_days(&c), 2);
        assert_eq!(e.total_slip_days(), 3);
    }

    #[test]
    fn test_remaining_can_go_negative_but_display_clamps() {
        let c = course();
        let mut e = enrollment();
        let s = submission(1, 0, SubmissionStatus::None);

        update_slip_days(&mut e, &assignment(1), &s, deadline() + Duration::days(8)).unwrap();
        assert_eq!(e.remaining_slip_days(&c), -3);

        e.set_slip_days(&c);
        assert_eq!(e.slip_days_remaining, 0, "display field is clamped");
        assert_eq!(e.total_slip_days(), 8, "stored ledger is not clamped");
    }
}
