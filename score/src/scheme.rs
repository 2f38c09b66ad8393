//! Grade-label mapping.
//!
//! A [`GradingScheme`] converts a 0-100 grade into a discrete label by
//! scanning descending threshold/label pairs. The lowest-configured label is
//! the floor for any grade below every threshold.

use serde::{Deserialize, Serialize};

/// One threshold/label pair of a grading scheme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradeStep {
    pub threshold: u32,
    pub label: String,
}

/// Maps a numeric grade to a label via descending thresholds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradingScheme {
    #[serde(default = "default_scheme_name")]
    pub name: String,
    #[serde(default = "default_steps")]
    pub steps: Vec<GradeStep>,
}

fn default_scheme_name() -> String {
    "letter".to_string()
}

fn default_steps() -> Vec<GradeStep> {
    [(90, "A"), (80, "B"), (70, "C"), (60, "D"), (50, "E"), (0, "F")]
        .into_iter()
        .map(|(threshold, label)| GradeStep {
            threshold,
            label: label.to_string(),
        })
        .collect()
}

impl Default for GradingScheme {
    fn default() -> Self {
        Self {
            name: default_scheme_name(),
            steps: default_steps(),
        }
    }
}

impl GradingScheme {
    /// Returns a scheme with the given steps, sorted by descending threshold.
    pub fn new(name: impl Into<String>, mut steps: Vec<GradeStep>) -> Self {
        steps.sort_by(|a, b| b.threshold.cmp(&a.threshold));
        Self {
            name: name.into(),
            steps,
        }
    }

    /// Returns the label of the first step whose threshold the grade meets or
    /// exceeds; below every threshold the lowest-configured label applies.
    /// `None` only when the scheme has no steps.
    pub fn label_for(&self, grade: u32) -> Option<&str> {
        for step in &self.steps {
            if grade >= step.threshold {
                return Some(&step.label);
            }
        }
        self.steps.last().map(|step| step.label.as_str())
    }
}
