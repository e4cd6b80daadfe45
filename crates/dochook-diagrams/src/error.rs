//! Error types for diagram rendering.

use std::time::Duration;

use dochook_cache::StoreError;

/// Failure producing one rendered artifact.
///
/// Never aborts page processing: the renderer reports it through
/// [`ArtifactOutcome::Failed`](crate::ArtifactOutcome::Failed).
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// The Graphviz executable couldn't be started.
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// Graphviz exited unsuccessfully.
    #[error("{program} exited with {status}: {stderr}")]
    Exit {
        program: String,
        status: String,
        /// Trimmed standard error output.
        stderr: String,
    },

    /// Graphviz didn't finish in time and was killed.
    #[error("{program} timed out after {}s", timeout.as_secs_f64())]
    Timeout { program: String, timeout: Duration },

    /// Pipe or wait failure while talking to the subprocess.
    #[error("I/O error talking to renderer")]
    Io(#[from] std::io::Error),

    /// Graphviz produced output that isn't UTF-8 text.
    #[error("renderer output is not valid UTF-8")]
    NonUtf8Output(#[from] std::string::FromUtf8Error),

    /// The rendered artifact couldn't be stored.
    #[error("failed to store artifact")]
    Store(#[from] StoreError),
}
