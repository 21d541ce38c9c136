//! Error types for the wordwall binary.

/// Top-level error for the wordwall binary.
///
/// Each variant wraps a subsystem error so `main` can propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: wordwall_core::ConfigError,
    },

    /// The word service could not be built.
    #[error("word service error: {source}")]
    Words {
        /// The underlying service error.
        #[from]
        source: wordwall_core::WordError,
    },

    /// The HTTP server failed to start.
    #[error("server startup error: {source}")]
    Startup {
        /// The underlying startup error.
        #[from]
        source: wordwall_server::StartupError,
    },

    /// The HTTP server failed while running.
    #[error("server error: {source}")]
    Server {
        /// The underlying server error.
        #[from]
        source: wordwall_server::ServerError,
    },

    /// A background task panicked or was cancelled.
    #[error("background task failed: {message}")]
    Task {
        /// Description of the task failure.
        message: String,
    },

    /// Waiting for the shutdown signal failed.
    #[error("signal error: {source}")]
    Signal {
        /// The underlying I/O error.
        source: std::io::Error,
    },
}
