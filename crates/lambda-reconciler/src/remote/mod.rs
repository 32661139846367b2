//! # Remote Function Service
//!
//! [`FunctionApi`] is the seam between the reconciler and the cloud SDK. The reconciler
//! only ever talks to this trait; the production SDK client and its credentials live
//! outside this crate, and [`SimulatedLambda`] stands in for it in tests and the demo
//! binary.

pub mod error;
pub mod simulated;

pub use error::RemoteError;
pub use simulated::{ApiCall, SimulatedLambda};

use crate::model::{Change, FunctionConfiguration, VpcConfig};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Create call payload. Carries the create-phase properties only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateFunctionRequest {
    pub function_name: String,
    pub runtime: Option<String>,
    pub handler: Option<String>,
    pub role: Option<String>,
    /// Zip package contents.
    pub code: Option<Vec<u8>>,
}

/// Partial configuration update: only the fields that are `Some` are changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FunctionConfigUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub runtime: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub handler: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vpc_config: Option<VpcConfig>,
}

impl FunctionConfigUpdate {
    /// Copies `change` into the request. Returns `false` for changes the configuration
    /// call cannot carry.
    pub fn set(&mut self, change: &Change) -> bool {
        match change {
            Change::Runtime(v) => self.runtime = Some(v.clone()),
            Change::Handler(v) => self.handler = Some(v.clone()),
            Change::Role(v) => self.role = Some(v.clone()),
            Change::Description(v) => self.description = Some(v.clone()),
            Change::Timeout(v) => self.timeout = Some(*v),
            Change::MemorySize(v) => self.memory_size = Some(*v),
            Change::VpcConfig(v) => self.vpc_config = Some(v.clone()),
            Change::Code(_) | Change::Streams(_) => return false,
        }
        true
    }

    /// Number of fields carried.
    pub fn len(&self) -> usize {
        [
            self.runtime.is_some(),
            self.handler.is_some(),
            self.role.is_some(),
            self.description.is_some(),
            self.timeout.is_some(),
            self.memory_size.is_some(),
            self.vpc_config.is_some(),
        ]
        .into_iter()
        .filter(|set| *set)
        .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Where a new event source mapping starts reading its stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StartingPosition {
    /// The oldest record still in the stream.
    TrimHorizon,
    Latest,
}

impl fmt::Display for StartingPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StartingPosition::TrimHorizon => f.write_str("TRIM_HORIZON"),
            StartingPosition::Latest => f.write_str("LATEST"),
        }
    }
}

/// Opaque reference returned when listing a function's mappings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingHandle {
    pub uuid: String,
}

/// A binding between an event source and a function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventSourceMapping {
    pub uuid: String,
    pub function_name: String,
    pub event_source_arn: String,
    pub starting_position: StartingPosition,
}

/// The remote operations the reconciler needs.
///
/// Implementations must report a missing function as [`RemoteError::ResourceNotFound`].
#[async_trait]
pub trait FunctionApi: Send + Sync {
    async fn create_function(
        &self,
        request: CreateFunctionRequest,
    ) -> Result<FunctionConfiguration, RemoteError>;

    async fn delete_function(&self, function_name: &str) -> Result<(), RemoteError>;

    async fn get_function_configuration(
        &self,
        function_name: &str,
    ) -> Result<FunctionConfiguration, RemoteError>;

    async fn list_event_source_mappings(
        &self,
        function_name: &str,
    ) -> Result<Vec<MappingHandle>, RemoteError>;

    async fn get_event_source_mapping(&self, uuid: &str)
        -> Result<EventSourceMapping, RemoteError>;

    async fn create_event_source_mapping(
        &self,
        function_name: &str,
        event_source_arn: &str,
        starting_position: StartingPosition,
    ) -> Result<EventSourceMapping, RemoteError>;

    async fn update_function_configuration(
        &self,
        function_name: &str,
        update: &FunctionConfigUpdate,
    ) -> Result<FunctionConfiguration, RemoteError>;

    async fn update_function_code(
        &self,
        function_name: &str,
        zip_file: Vec<u8>,
    ) -> Result<FunctionConfiguration, RemoteError>;
}
