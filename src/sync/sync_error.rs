use crate::errors::ServerError;
use std::error::Error;
use std::fmt;

#[derive(Debug)]
pub enum SyncError {
    Unconfigured(String),
    SourceUnavailable(String),
    UnexpectedShape(String),
    Store(String),
}

impl fmt::Display for SyncError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncError::Unconfigured(msg) => write!(f, "Sync not configured: {msg}"),
            SyncError::SourceUnavailable(msg) => write!(f, "Ticketing source unavailable: {msg}"),
            SyncError::UnexpectedShape(msg) => write!(f, "Unexpected source payload: {msg}"),
            SyncError::Store(msg) => write!(f, "Store error during sync: {msg}"),
        }
    }
}

impl Error for SyncError {}

impl From<SyncError> for ServerError {
    fn from(err: SyncError) -> ServerError {
        match err {
            SyncError::Unconfigured(msg) => ServerError::NotConfigured(msg),
            SyncError::SourceUnavailable(msg) => ServerError::Upstream(msg),
            SyncError::UnexpectedShape(msg) => ServerError::Upstream(msg),
            SyncError::Store(msg) => ServerError::StoreError(msg),
        }
    }
}
