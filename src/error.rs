use axum::http::StatusCode;
use thiserror::Error;
use tracing::{error, warn};

use crate::savedata::codec::CodecError;

/// Failure of a single store call.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("user not found")]
    NotFound,
    #[error("store call timed out")]
    Timeout,
    #[error("constraint violated: {0}")]
    Constraint(String),
    #[error("storage unavailable")]
    Unavailable(#[source] sqlx::Error),
}

/// SQLSTATE for arithmetic overflow, e.g. `clicks + 1` past `BIGINT`.
const NUMERIC_VALUE_OUT_OF_RANGE: &str = "22003";

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::RowNotFound => StoreError::NotFound,
            sqlx::Error::Database(db)
                if db.is_check_violation()
                    || db.is_unique_violation()
                    || db.code().as_deref() == Some(NUMERIC_VALUE_OUT_OF_RANGE) =>
            {
                StoreError::Constraint(db.message().to_string())
            }
            other => StoreError::Unavailable(other),
        }
    }
}

/// A write batch stopped at `index`; `step` names the write that failed.
#[derive(Debug, Error)]
#[error("{step} failed (write {index})")]
pub struct WriteFailure {
    pub index: usize,
    pub step: &'static str,
    #[source]
    pub source: StoreError,
}

/// Errors surfaced by the core components to their callers.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("user not found")]
    NotFound,
    #[error("storage unavailable")]
    StorageUnavailable(#[source] StoreError),
    #[error("storage timed out")]
    StorageTimeout,
    #[error(transparent)]
    Validation(#[from] CodecError),
    #[error("rejected write: {0}")]
    InvalidWrite(String),
    #[error("{step} failed; earlier writes in the batch were rolled back")]
    PartialFailure {
        step: &'static str,
        #[source]
        source: StoreError,
    },
}

impl CoreError {
    pub fn is_retryable(&self) -> bool {
        match self {
            CoreError::StorageTimeout | CoreError::StorageUnavailable(_) => true,
            CoreError::PartialFailure { source, .. } => {
                matches!(source, StoreError::Timeout | StoreError::Unavailable(_))
            }
            _ => false,
        }
    }
}

impl From<StoreError> for CoreError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound => CoreError::NotFound,
            StoreError::Timeout => CoreError::StorageTimeout,
            StoreError::Constraint(msg) => CoreError::InvalidWrite(msg),
            other => CoreError::StorageUnavailable(other),
        }
    }
}

impl From<WriteFailure> for CoreError {
    fn from(f: WriteFailure) -> Self {
        // Nothing was applied before the first write, so it is not partial.
        if f.index == 0 {
            return f.source.into();
        }
        CoreError::PartialFailure {
            step: f.step,
            source: f.source,
        }
    }
}

/// Maps a core error onto the HTTP rejection used by every handler.
pub fn reject(e: CoreError) -> (StatusCode, String) {
    match &e {
        CoreError::Validation(_) | CoreError::InvalidWrite(_) => {
            warn!(error = %e, "rejected input");
            (StatusCode::BAD_REQUEST, e.to_string())
        }
        CoreError::NotFound => (StatusCode::NOT_FOUND, "User not found".into()),
        CoreError::StorageTimeout
        | CoreError::PartialFailure {
            source: StoreError::Timeout,
            ..
        } => {
            warn!(error = %e, "store call timed out");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                "Storage busy, retry later".into(),
            )
        }
        _ => {
            error!(error = ?e, retryable = e.is_retryable(), "core operation failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal error".into())
        }
    }
}
