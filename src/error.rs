use std::path::PathBuf;
use thiserror::Error;

use crate::export::ExportReport;

/// The main error type for resplan-export operations.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{path} not found")]
    DatasetNotFound { path: PathBuf },

    #[error("Failed to parse dataset from {path}: {source}")]
    DatasetParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to write export JSON to {path}: {source}")]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to create output file {path}: {source}")]
    OutputCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed geometry in category '{category}': {message}")]
    MalformedGeometry { category: String, message: String },

    #[error("Invalid adjacency graph: {0}")]
    Graph(String),

    #[error("Failed to render {path}: {source}")]
    Render {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Plan {index}: {source}")]
    Plan {
        index: usize,
        #[source]
        source: Box<ExportError>,
    },

    #[error("{}", .0.trim_end())]
    Usage(String),

    #[error("{} plan(s) failed to export", .report.failure_count())]
    PlansFailed { report: ExportReport },
}

impl ExportError {
    /// Wraps a per-plan failure with the index of the plan that caused it.
    pub fn in_plan(self, index: usize) -> Self {
        match self {
            already @ ExportError::Plan { .. } => already,
            other => ExportError::Plan {
                index,
                source: Box::new(other),
            },
        }
    }

    pub(crate) fn malformed(category: impl Into<String>, message: impl Into<String>) -> Self {
        ExportError::MalformedGeometry {
            category: category.into(),
            message: message.into(),
        }
    }
}
