use crate::SolutionId;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("solution {0} not found")]
    NotFound(SolutionId),

    /// A stored record lacks one of `REQUIRED_FIELDS`.
    #[error("solution {id} is missing required field `{field}`")]
    MissingField { id: SolutionId, field: &'static str },

    #[error("solution {id} is not a valid JSON record: {source}")]
    Malformed {
        id: SolutionId,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode solution: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("io error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("solution ids exhausted: {} is already taken", SolutionId::MAX)]
    IdSpaceExhausted,

    #[error("no free solution id after {0} attempts")]
    AllocationExhausted(usize),
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
