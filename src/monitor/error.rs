use thiserror::Error;

use crate::clients::error::ApiError;
use crate::store::StoreError;

/// Failures that abort the remainder of a cycle
#[derive(Debug, Error)]
pub enum MonitorError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
