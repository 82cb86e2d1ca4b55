//! Error types and error handling

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Why an external process did not succeed
#[derive(Debug, Error)]
pub enum ProcessFailure {
    /// The executable could not be started
    #[error("failed to spawn: {0}")]
    Spawn(#[source] io::Error),

    /// The process ran and exited unsuccessfully
    #[error("exited with {0}")]
    Exit(std::process::ExitStatus),

    /// The process outlived its time budget and was killed
    #[error("timed out after {seconds}s")]
    Timeout {
        /// Configured limit in seconds
        seconds: u64,
    },

    /// The user interrupted the run and the process was killed
    #[error("cancelled by user")]
    Cancelled,

    /// Waiting on or killing the child failed
    #[error("lost track of child process: {0}")]
    Wait(#[source] io::Error),
}

/// Generator error type
#[derive(Debug, Error)]
pub enum NestkitError {
    /// Service name cannot be turned into identifiers and paths
    #[error("Invalid service name '{name}': {reason}")]
    InvalidServiceName {
        /// Name as typed by the user
        name: String,
        /// Which rule it broke
        reason: &'static str,
    },

    /// Unknown database kind
    #[error("Unknown database type: '{0}'. Expected one of sqlite, mysql, postgres, mongodb")]
    UnknownDatabase(String),

    /// External process failed
    #[error("`{program}` failed: {failure}")]
    Process {
        /// Command line that was run
        program: String,
        /// What went wrong
        #[source]
        failure: ProcessFailure,
    },

    /// Driver install failed even with relaxed peer dependency resolution
    #[error("Failed to install database driver '{package}'")]
    InstallFailed {
        /// npm package name
        package: String,
        /// Error from the relaxed retry
        #[source]
        source: Box<Self>,
    },

    /// `nest generate` failed for one schematic
    #[error("Failed to generate {schematic} scaffold")]
    ScaffoldFailed {
        /// Schematic name (module, controller, service)
        schematic: &'static str,
        /// Underlying process error
        #[source]
        source: Box<Self>,
    },

    /// Template rendering failed
    #[error("Failed to render template: {template}")]
    Render {
        /// Template name
        template: &'static str,
        /// Engine error
        #[source]
        source: minijinja::Error,
    },

    /// Filesystem error
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// Path being read, written or created
        path: PathBuf,
        /// Underlying error
        #[source]
        source: io::Error,
    },

    /// Interactive prompt failed
    #[error("Prompt failed: {0}")]
    Prompt(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] Box<figment::Error>),
}

impl NestkitError {
    /// Wrap an I/O error with the path it happened on
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<dialoguer::Error> for NestkitError {
    fn from(err: dialoguer::Error) -> Self {
        Self::Prompt(err.to_string())
    }
}

impl From<figment::Error> for NestkitError {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}

/// Result type for generator operations
pub type Result<T> = std::result::Result<T, NestkitError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_mentions_path() {
        let err = NestkitError::io(
            "src/app.module.ts",
            io::Error::new(io::ErrorKind::NotFound, "missing"),
        );
        assert!(err.to_string().contains("src/app.module.ts"));
    }

    #[test]
    fn test_install_failed_keeps_cause() {
        let cause = NestkitError::Process {
            program: "npm install pg --save --legacy-peer-deps".to_string(),
            failure: ProcessFailure::Timeout { seconds: 5 },
        };
        let err = NestkitError::InstallFailed {
            package: "pg".to_string(),
            source: Box::new(cause),
        };
        assert_eq!(err.to_string(), "Failed to install database driver 'pg'");
        let source = std::error::Error::source(&err).unwrap();
        assert!(source.to_string().contains("timed out after 5s"));
    }
}
