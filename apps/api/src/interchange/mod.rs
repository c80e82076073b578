//! Interchange: whole-store JSON bundles and per-collection CSV files.

pub mod csv;
pub mod handlers;
pub mod json;

use serde_json::Value;
use thiserror::Error;
use tracing::warn;

use crate::errors::AppError;
use crate::records::{Record, StoreError};

#[derive(Debug, Error)]
pub enum InterchangeError {
    #[error("bundle version {0} is newer than this service supports")]
    UnsupportedVersion(u32),

    #[error("unknown collection '{0}'")]
    UnknownCollection(String),

    #[error("the CSV file has no data rows")]
    EmptyCsv,

    #[error("malformed CSV: {0}")]
    Csv(#[from] ::csv::Error),

    #[error("malformed import: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<InterchangeError> for AppError {
    fn from(err: InterchangeError) -> Self {
        match err {
            InterchangeError::Store(e) => AppError::Store(e),
            InterchangeError::UnknownCollection(name) => {
                AppError::NotFound(format!("unknown collection '{name}'"))
            }
            other => AppError::Validation(other.to_string()),
        }
    }
}

/// Decodes imported items, skipping (and logging) any that do not form a record.
pub(crate) fn decode_items<T: Record>(items: Vec<Value>) -> Vec<T> {
    items
        .into_iter()
        .enumerate()
        .filter_map(|(i, item)| match serde_json::from_value::<T>(item) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!("Skipping imported {} item {i}: {e}", T::COLLECTION);
                None
            }
        })
        .collect()
}
