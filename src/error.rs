//! Document-level failures.
//!
//! Only structural problems surface as errors. Per-site, per-connector and
//! per-address anomalies are absorbed by the transform stages.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DatexError {
    #[error("malformed XML at byte {position}: {message}")]
    MalformedXml { position: u64, message: String },

    #[error("document is missing expected element path `{path}`")]
    MissingPath { path: String },
}

impl DatexError {
    pub(crate) fn malformed(position: u64, message: impl Into<String>) -> Self {
        DatexError::MalformedXml {
            position,
            message: message.into(),
        }
    }

    pub(crate) fn missing(path: &[&str]) -> Self {
        DatexError::MissingPath {
            path: path.join(" → "),
        }
    }
}
