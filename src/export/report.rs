//! Failure reports for runs that continue past per-plan errors.

use std::fmt;

/// Plans that failed to export during a run.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExportReport {
    /// Failures in the order they occurred.
    pub failures: Vec<PlanFailure>,
}

/// One plan that could not be exported.
#[derive(Clone, Debug, PartialEq)]
pub struct PlanFailure {
    /// Position of the plan in the dataset.
    pub index: usize,
    pub message: String,
}

impl ExportReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a failure for the plan at `index`.
    pub fn add(&mut self, index: usize, message: impl Into<String>) {
        self.failures.push(PlanFailure {
            index,
            message: message.into(),
        });
    }

    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }

    /// Returns true if every plan exported.
    pub fn is_ok(&self) -> bool {
        self.failures.is_empty()
    }
}

impl fmt::Display for ExportReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.failures.is_empty() {
            return writeln!(f, "Export completed: no failures");
        }

        writeln!(
            f,
            "Export completed with {} failed plan(s):",
            self.failure_count()
        )?;
        for failure in &self.failures {
            writeln!(f, "  {failure}")?;
        }
        Ok(())
    }
}

impl fmt::Display for PlanFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[plan {}] {}", self.index, self.message)
    }
}
