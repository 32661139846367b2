use super::function::VpcConfig;
use serde::{Deserialize, Serialize};

/// Configuration as reported by the remote service.
///
/// Mirrors [`FunctionSpec`](super::FunctionSpec) minus the code reference, plus the
/// fields the service computes itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionConfiguration {
    pub function_name: String,
    pub function_arn: String,
    pub runtime: Option<String>,
    pub handler: Option<String>,
    pub role: Option<String>,
    pub description: Option<String>,
    pub timeout: Option<u32>,
    pub memory_size: Option<u32>,
    pub vpc_config: Option<VpcConfig>,
    /// Base64 SHA-256 of the deployed package.
    pub code_sha256: Option<String>,
    pub code_size: u64,
    pub last_modified: String,
}

/// Actual state of a function, fetched fresh for one pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObservedFunction {
    pub configuration: FunctionConfiguration,
    /// Source ARNs of the function's event source mappings, in remote order.
    pub streams: Vec<String>,
}

impl ObservedFunction {
    pub fn function_name(&self) -> &str {
        &self.configuration.function_name
    }
}
