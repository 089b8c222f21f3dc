//! Error type for opening the benchmarked file and running strategies.

use std::collections::TryReserveError;
use std::io;
use std::path::PathBuf;

/// Failure while setting up the benchmark or inside a strategy.
#[derive(Debug, thiserror::Error)]
pub enum BenchError {
    /// The input file could not be opened read-only.
    #[error("failed to open {}", path.display())]
    Open { path: PathBuf, source: io::Error },

    /// File metadata (size) could not be read.
    #[error("failed to stat {}", path.display())]
    Metadata { path: PathBuf, source: io::Error },

    /// The scratch block buffer could not be allocated.
    #[error("failed to allocate {size} byte block buffer")]
    BufferAlloc {
        size: usize,
        source: TryReserveError,
    },

    /// The read-only whole-file mapping could not be established.
    #[error("failed to map {len} bytes")]
    Map { len: u64, source: io::Error },

    /// The sequential cursor could not be moved back to the start.
    #[error("read failed at offset {offset}")]
    Read { offset: u64, source: io::Error },
}

impl BenchError {
    /// True for failures that happen before any strategy runs (open, stat).
    pub fn is_setup(&self) -> bool {
        matches!(self, BenchError::Open { .. } | BenchError::Metadata { .. })
    }
}

pub type Result<T> = std::result::Result<T, BenchError>;
