use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures reading or writing the on-disk user snapshot.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot I/O failed for `{path}`: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to encode snapshot: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("snapshot `{path}` is malformed: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("snapshot `{path}` has version {found}, newest supported is {supported}")]
    UnsupportedVersion {
        path: PathBuf,
        found: u32,
        supported: u32,
    },
    #[error("snapshot writer task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Everything a core operation can refuse with, plus fatal persistence failures.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("{0}")]
    Validation(String),
    #[error("insufficient funds: balance is {balance}, requested {requested}")]
    InsufficientFunds { balance: u64, requested: i64 },
    #[error("target has nothing to take")]
    NoTarget,
    #[error("cooldown active for another {remaining_secs}s")]
    CooldownActive { remaining_secs: u64 },
    #[error("unknown command `{0}`")]
    NotFound(String),
    #[error(transparent)]
    Persistence(#[from] SnapshotError),
}

impl CoreError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Refusals are reported back to the caller; persistence failures are not
    /// recoverable at the command boundary.
    pub fn is_refusal(&self) -> bool {
        !matches!(self, Self::Persistence(_))
    }
}
