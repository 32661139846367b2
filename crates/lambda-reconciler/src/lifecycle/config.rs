//! # Manifest Configuration
//!
//! The desired state of a fleet lives in a TOML manifest:
//!
//! ```toml
//! [settings]
//! region = "eu-west-1"
//! mailbox_size = 32
//!
//! [settings.create_retry]
//! max_attempts = 100
//! wait = "5s"
//!
//! [[function]]
//! function_name = "thumbnailer"
//! runtime = "python3.12"
//! handler = "app.handler"
//! role = "arn:aws:iam::123456789012:role/thumbnailer"
//! code = { zip_file = "build/thumbnailer.zip" }
//! timeout = 60
//! streams = ["arn:aws:kinesis:eu-west-1:123456789012:stream/uploads"]
//! ```
//!
//! Relative `zip_file` paths resolve against the manifest's directory. The create retry
//! policy can be overridden from the environment with [`ENV_CREATE_MAX_ATTEMPTS`] and
//! [`ENV_CREATE_WAIT_MS`].

use crate::model::{CodeSource, FunctionSpec};
use reconcile_framework::RetryPolicy;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

pub const ENV_CREATE_MAX_ATTEMPTS: &str = "RECONCILER_CREATE_MAX_ATTEMPTS";
pub const ENV_CREATE_WAIT_MS: &str = "RECONCILER_CREATE_WAIT_MS";

/// Errors raised while loading a manifest.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Cannot read manifest {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot parse manifest: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value {value:?} for {name}")]
    Env { name: &'static str, value: String },

    #[error("Invalid manifest: {0}")]
    Invalid(String),
}

/// Fleet-wide settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Region of the remote service.
    pub region: String,
    /// Per-actor request queue capacity.
    pub mailbox_size: usize,
    pub create_retry: RetryPolicy,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            region: "us-east-1".to_string(),
            mailbox_size: 32,
            create_retry: RetryPolicy::default(),
        }
    }
}

/// A parsed and validated manifest.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    #[serde(default)]
    pub settings: Settings,
    #[serde(default, rename = "function")]
    pub functions: Vec<FunctionSpec>,
}

impl Manifest {
    /// Reads `path`, resolves artifact paths, applies environment overrides and validates.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let mut manifest: Manifest = toml::from_str(&text)?;
        if let Some(base) = path.parent() {
            manifest.resolve_paths(base);
        }
        manifest.apply_overrides(|name| std::env::var(name).ok())?;
        manifest.validate()?;

        debug!(path = %path.display(), functions = manifest.functions.len(), "Loaded manifest");
        Ok(manifest)
    }

    /// Parses and validates manifest text. Paths are kept as written and the environment
    /// is not consulted.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let manifest: Manifest = toml::from_str(text)?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Makes relative `zip_file` paths relative to `base`.
    pub fn resolve_paths(&mut self, base: &Path) {
        for spec in &mut self.functions {
            if let Some(CodeSource::ZipFile(path)) = &mut spec.code {
                if path.is_relative() {
                    *path = base.join(&*path);
                }
            }
        }
    }

    /// Overrides the create retry policy from `lookup` (normally the process environment).
    pub fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(value) = lookup(ENV_CREATE_MAX_ATTEMPTS) {
            self.settings.create_retry.max_attempts =
                value.trim().parse().map_err(|_| ConfigError::Env {
                    name: ENV_CREATE_MAX_ATTEMPTS,
                    value: value.clone(),
                })?;
        }
        if let Some(value) = lookup(ENV_CREATE_WAIT_MS) {
            let millis: u64 = value.trim().parse().map_err(|_| ConfigError::Env {
                name: ENV_CREATE_WAIT_MS,
                value: value.clone(),
            })?;
            self.settings.create_retry.wait = Duration::from_millis(millis);
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.settings.mailbox_size == 0 {
            return Err(ConfigError::Invalid(
                "settings.mailbox_size must be greater than 0".to_string(),
            ));
        }
        if self.settings.create_retry.max_attempts == 0 {
            return Err(ConfigError::Invalid(
                "settings.create_retry.max_attempts must be greater than 0".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for spec in &self.functions {
            let name = spec.function_name.trim();
            if name.is_empty() {
                return Err(ConfigError::Invalid(
                    "function_name must not be empty".to_string(),
                ));
            }
            if !seen.insert(name) {
                return Err(ConfigError::Invalid(format!(
                    "function {name} is declared more than once"
                )));
            }
        }
        Ok(())
    }
}
