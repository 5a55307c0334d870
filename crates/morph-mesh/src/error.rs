use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading, sampling or encoding a mesh.
///
/// Every variant is a startup-time condition: callers are expected to abort
/// scene construction and report the message.
#[derive(Debug, Error)]
pub enum MeshError {
    #[error("failed to read mesh `{path}`")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("obj read error")]
    Read(#[from] std::io::Error),

    /// 1-based source line number of the offending record.
    #[error("obj parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("obj face at line {line} references vertex {index}, but only {count} vertices are defined")]
    IndexOutOfRange { line: usize, index: i64, count: usize },

    #[error("mesh contains no faces")]
    NoFaces,

    #[error("mesh surface area is zero; nothing to sample")]
    ZeroArea,

    #[error("position map needs {needed} samples, got {got}")]
    NotEnoughSamples { needed: usize, got: usize },

    #[error("invalid chunk size 0; chunks must hold at least one value")]
    ZeroChunk,
}

impl MeshError {
    pub(crate) fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::Parse { line, message: message.into() }
    }
}
