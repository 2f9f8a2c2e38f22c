//! Batch export over a dataset.
//!
//! The driver loads the whole dataset, resolves a [`Selection`] into plan
//! indices, and assembles each selected plan in order. Indices past the end
//! of the dataset are skipped without producing a record or an error.
//!
//! By default the first per-plan failure aborts the run. With `keep_going`,
//! failures are collected into an [`ExportReport`] and the remaining plans
//! are still exported.

use std::path::Path;

use log::{debug, info};
use rand::seq::SliceRandom;
use rand::{rngs::StdRng, SeedableRng};

use crate::dataset::read_dataset;
use crate::error::ExportError;
use crate::export::{Assembler, ExportReport, PlanExportRecord};
use crate::plan::Plan;

/// Which plans to export.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Selection {
    /// Plans `0..limit` in order, or every plan when `limit` is `None`.
    Sequential { limit: Option<usize> },
    /// Exactly these plans, in the given order.
    Indices(Vec<usize>),
    /// `n` distinct plans drawn uniformly at random, in ascending order.
    Sample { n: usize, seed: Option<u64> },
}

impl Default for Selection {
    fn default() -> Self {
        Selection::Sequential { limit: None }
    }
}

impl Selection {
    /// Resolves the selection against a dataset of `len` plans.
    ///
    /// Explicit indices are returned as given, including ones that are out
    /// of range; the driver skips those.
    pub fn indices(&self, len: usize) -> Vec<usize> {
        match self {
            Selection::Sequential { limit } => (0..limit.map_or(len, |l| l.min(len))).collect(),
            Selection::Indices(indices) => indices.clone(),
            Selection::Sample { n, seed } => sample_indices(len, *n, *seed),
        }
    }
}

fn sample_indices(len: usize, n: usize, seed: Option<u64>) -> Vec<usize> {
    let mut all: Vec<usize> = (0..len).collect();
    if let Some(seed) = seed {
        let mut rng = StdRng::seed_from_u64(seed);
        all.shuffle(&mut rng);
    } else {
        let mut rng = rand::rng();
        all.shuffle(&mut rng);
    }
    all.truncate(n);
    all.sort_unstable();
    all
}

/// Records from a batch run, plus the plans that failed under `keep_going`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BatchOutcome {
    pub records: Vec<PlanExportRecord>,
    pub report: ExportReport,
}

/// Loads the dataset at `path` and exports the selected plans.
///
/// # Errors
/// Fails if the dataset cannot be loaded, or on the first plan failure unless
/// `keep_going` is set.
pub fn run(
    path: &Path,
    selection: &Selection,
    assembler: &Assembler,
    keep_going: bool,
) -> Result<BatchOutcome, ExportError> {
    let plans = read_dataset(path)?;
    run_plans(&plans, selection, assembler, keep_going)
}

/// Exports the selected plans from an already-loaded dataset.
pub fn run_plans(
    plans: &[Plan],
    selection: &Selection,
    assembler: &Assembler,
    keep_going: bool,
) -> Result<BatchOutcome, ExportError> {
    let mut outcome = BatchOutcome::default();

    for index in selection.indices(plans.len()) {
        let Some(plan) = plans.get(index) else {
            debug!(index = index, plans = plans.len(); "Skipping index past end of dataset");
            continue;
        };

        match assembler.assemble(plan, index) {
            Ok(record) => outcome.records.push(record),
            Err(err) if keep_going => {
                debug!(index = index; "Plan failed to export: {err}");
                let message = match err {
                    ExportError::Plan { source, .. } => source.to_string(),
                    other => other.to_string(),
                };
                outcome.report.add(index, message);
            }
            Err(err) => return Err(err),
        }
    }

    info!(
        exported = outcome.records.len(),
        failed = outcome.report.failure_count();
        "Batch export finished"
    );
    Ok(outcome)
}
