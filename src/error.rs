//! Error taxonomy and the diagnostics sink.

use std::time::Duration;

use serde::Serialize;
use thiserror::Error;

use crate::node::NodePath;

pub const INVALID_FOR_CHART: &str = "Invalid option for the type of chart";
pub const NOT_NUMERIC: &str = "Value is not numeric";

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ChartError {
    /// A node has the wrong kind, an out-of-domain value, or does not fit the chart kind.
    #[error("{path}: {message}")]
    Validation { path: NodePath, message: String },
    /// A node that should reduce to a number does not.
    #[error("{path}: {message}")]
    Evaluation { path: NodePath, message: String },
    #[error("rendering failed: {message}")]
    Render { message: String },
    #[error("rendering did not complete within {after:?}")]
    Timeout { after: Duration },
}

impl ChartError {
    pub fn validation(path: NodePath, message: impl Into<String>) -> Self {
        ChartError::Validation {
            path,
            message: message.into(),
        }
    }

    pub fn not_numeric(path: NodePath) -> Self {
        ChartError::Evaluation {
            path,
            message: NOT_NUMERIC.to_string(),
        }
    }

    /// Node the error is attached to; render-boundary errors belong to the invocation.
    pub fn path(&self) -> Option<&NodePath> {
        match self {
            ChartError::Validation { path, .. } | ChartError::Evaluation { path, .. } => Some(path),
            ChartError::Render { .. } | ChartError::Timeout { .. } => None,
        }
    }

    /// Human-readable message without the location prefix.
    pub fn message(&self) -> String {
        match self {
            ChartError::Validation { message, .. }
            | ChartError::Evaluation { message, .. }
            | ChartError::Render { message } => message.clone(),
            ChartError::Timeout { after } => {
                format!("Chart rendering did not complete within {after:?}")
            }
        }
    }
}

/// A message attached to a node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub path: NodePath,
    pub message: String,
}

/// Error sink of a reduction. Reporting never aborts control flow; a non-empty sink
/// marks the surrounding reduction as failed.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_in_error(&mut self, path: NodePath, message: impl Into<String>) {
        let message = message.into();
        log::warn!("{path}: {message}");
        self.entries.push(Diagnostic { path, message });
    }

    /// Report `error` relative to `base`, the path of the reduced node in its host tree.
    pub fn report(&mut self, base: &NodePath, error: &ChartError) {
        let mut path = base.clone();
        for &i in error.path().map(NodePath::indexes).unwrap_or_default() {
            path = path.child(i);
        }
        self.set_in_error(path, error.message());
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.entries
    }
}
