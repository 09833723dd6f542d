//! Error taxonomy for the sampling + embedding pipeline.
//!
//! Job level errors abort their whole batch : a shape fitted over an
//! incomplete or corrupt point cloud is worse than no result.

use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the pipeline. Each variant carries enough context to
/// identify the offending scale/replicate or artifact path.
#[derive(Debug, Error)]
pub enum ShapeError {
    /// missing or malformed input edge list, fatal at startup
    #[error("input edge list error for {path:?} : {reason}")]
    Input { path: PathBuf, reason: String },

    /// random walk sampling could not reach its target size within the
    /// iteration cap (disconnected or too small reachable component)
    #[error("random walk sampling stalled at scale {scale} replicate {replicate} : visited {visited} of {target} nodes within the iteration cap")]
    SamplingLiveness {
        scale: usize,
        replicate: usize,
        target: usize,
        visited: usize,
    },

    /// the external fitting process produced no output or unparsable output
    #[error("external fitting process failed for {path:?} : {reason}")]
    ExternalProcess { path: PathBuf, reason: String },

    /// no documents available for embedding model training
    #[error("empty document corpus, nothing to embed")]
    CorpusEmpty,

    ///
    #[error(transparent)]
    Io(#[from] std::io::Error),
} // end of ShapeError
