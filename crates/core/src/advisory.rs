//! Advisory failure reporting for best-effort steps.

use std::fmt;

/// Outcome of a best-effort step that did not succeed.
///
/// Advisory failures never propagate as errors. They are collected and handed
/// back to the caller so instrumentation can see them; swallowing one is an
/// explicit act of the caller, not of the code that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdvisoryFailure {
    /// The step that failed (e.g. `add_column`, `delete_blob`).
    pub stage: &'static str,
    /// The object the step was operating on (table, column, filename).
    pub subject: String,
    /// Underlying failure detail.
    pub detail: String,
}

impl AdvisoryFailure {
    /// Create a new advisory failure.
    #[must_use]
    pub fn new(stage: &'static str, subject: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            stage,
            subject: subject.into(),
            detail: detail.into(),
        }
    }
}

impl fmt::Display for AdvisoryFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} on {}: {}", self.stage, self.subject, self.detail)
    }
}
