//! Local deployment packages and their checksums.

use super::error::FunctionError;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use sha2::{Digest, Sha256};
use std::path::Path;

/// SHA-256 of `bytes`, standard base64 with padding. This is the format the service
/// reports as `code_sha256`.
pub fn code_sha256(bytes: &[u8]) -> String {
    STANDARD.encode(Sha256::digest(bytes))
}

/// Reads a zip package from disk.
pub async fn read_artifact(path: &Path) -> Result<Vec<u8>, FunctionError> {
    tokio::fs::read(path)
        .await
        .map_err(|source| FunctionError::Artifact {
            path: path.to_path_buf(),
            source,
        })
}

/// Checksum of the package at `path`.
pub async fn artifact_sha256(path: &Path) -> Result<String, FunctionError> {
    read_artifact(path).await.map(|bytes| code_sha256(&bytes))
}
