//! Error types for the Function actor.

use crate::remote::RemoteError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reconciling a function.
#[derive(Debug, Error)]
pub enum FunctionError {
    /// The create call kept failing with a transient error until the attempt ceiling.
    #[error("Creating {function_name} took too long: gave up after {attempts} attempts")]
    TookTooLong { function_name: String, attempts: u32 },

    /// A remote call failed with a non-transient error.
    #[error(transparent)]
    Remote(#[from] RemoteError),

    /// The local deployment package could not be read.
    #[error("Cannot read artifact {}: {source}", .path.display())]
    Artifact {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Code hosted in an object store cannot be compared or uploaded.
    #[error("Unsupported code source for {function_name}: only local zip files are supported")]
    UnsupportedCodeSource { function_name: String },

    /// The desired state is malformed.
    #[error("Invalid function spec: {0}")]
    InvalidSpec(String),

    /// An error occurred while communicating with the actor system.
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<String> for FunctionError {
    fn from(msg: String) -> Self {
        FunctionError::ActorCommunicationError(msg)
    }
}
