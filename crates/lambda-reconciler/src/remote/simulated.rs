//! # In-Memory Function Service
//!
//! [`SimulatedLambda`] implements [`FunctionApi`] on top of a mutex-guarded map. It
//! behaves like the real service where the reconciler can tell the difference: missing
//! functions are `ResourceNotFound`, duplicate creates and duplicate mappings are
//! `ResourceConflict`, new functions get the service defaults for timeout and memory,
//! and `code_sha256` is computed from the uploaded bytes.
//!
//! Every call is recorded as an [`ApiCall`] so tests can assert on exactly which remote
//! operations a pass issued.

use super::{
    CreateFunctionRequest, EventSourceMapping, FunctionApi, FunctionConfigUpdate, MappingHandle,
    RemoteError, StartingPosition,
};
use crate::function_actor::artifact::code_sha256;
use crate::model::FunctionConfiguration;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

const DEFAULT_TIMEOUT: u32 = 3;
const DEFAULT_MEMORY_SIZE: u32 = 128;
const ACCOUNT_ID: &str = "000000000000";

/// One recorded remote call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiCall {
    CreateFunction(CreateFunctionRequest),
    DeleteFunction(String),
    GetFunctionConfiguration(String),
    ListEventSourceMappings(String),
    GetEventSourceMapping(String),
    CreateEventSourceMapping {
        function_name: String,
        event_source_arn: String,
        starting_position: StartingPosition,
    },
    UpdateFunctionConfiguration {
        function_name: String,
        update: FunctionConfigUpdate,
    },
    UpdateFunctionCode {
        function_name: String,
        code_sha256: String,
    },
}

impl ApiCall {
    /// `true` for calls that change remote state.
    pub fn is_mutation(&self) -> bool {
        !matches!(
            self,
            ApiCall::GetFunctionConfiguration(_)
                | ApiCall::ListEventSourceMappings(_)
                | ApiCall::GetEventSourceMapping(_)
        )
    }
}

#[derive(Debug, Clone)]
enum CreateFault {
    Next { remaining: u32, error: RemoteError },
    Always(RemoteError),
}

#[derive(Debug, Default)]
struct State {
    functions: BTreeMap<String, FunctionConfiguration>,
    /// Insertion order is the order `list_event_source_mappings` reports.
    mappings: Vec<EventSourceMapping>,
    calls: Vec<ApiCall>,
    create_fault: Option<CreateFault>,
    revision: u64,
    next_uuid: u64,
}

impl State {
    fn touch(&mut self) -> String {
        self.revision += 1;
        format!("rev-{}", self.revision)
    }

    fn function_mut(&mut self, name: &str) -> Result<&mut FunctionConfiguration, RemoteError> {
        self.functions
            .get_mut(name)
            .ok_or_else(|| RemoteError::ResourceNotFound(format!("Function not found: {name}")))
    }

    fn take_create_fault(&mut self) -> Option<RemoteError> {
        match self.create_fault.take() {
            Some(CreateFault::Always(error)) => {
                self.create_fault = Some(CreateFault::Always(error.clone()));
                Some(error)
            }
            Some(CreateFault::Next { remaining, error }) => {
                if remaining > 1 {
                    self.create_fault = Some(CreateFault::Next {
                        remaining: remaining - 1,
                        error: error.clone(),
                    });
                }
                Some(error)
            }
            None => None,
        }
    }
}

/// In-memory [`FunctionApi`] with a call log and fault injection.
#[derive(Debug)]
pub struct SimulatedLambda {
    region: String,
    state: Mutex<State>,
}

impl Default for SimulatedLambda {
    fn default() -> Self {
        Self::new("us-east-1")
    }
}

impl SimulatedLambda {
    pub fn new(region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            state: Mutex::new(State::default()),
        }
    }

    fn state(&self) -> MutexGuard<'_, State> {
        // A panic while holding the lock leaves plain data behind; keep serving it.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn function_arn(&self, name: &str) -> String {
        format!(
            "arn:aws:lambda:{}:{ACCOUNT_ID}:function:{name}",
            self.region
        )
    }

    /// Installs a function directly, bypassing the call log.
    pub fn seed_function(&self, mut configuration: FunctionConfiguration) {
        if configuration.function_arn.is_empty() {
            configuration.function_arn = self.function_arn(&configuration.function_name);
        }
        let mut state = self.state();
        configuration.last_modified = state.touch();
        state
            .functions
            .insert(configuration.function_name.clone(), configuration);
    }

    /// Installs an event source mapping directly, bypassing the call log.
    pub fn seed_mapping(&self, function_name: &str, event_source_arn: &str) {
        let mut state = self.state();
        state.next_uuid += 1;
        let uuid = format!("mapping-{:04}", state.next_uuid);
        state.mappings.push(EventSourceMapping {
            uuid,
            function_name: function_name.to_string(),
            event_source_arn: event_source_arn.to_string(),
            starting_position: StartingPosition::TrimHorizon,
        });
    }

    /// The next `times` create calls fail with `error`.
    pub fn fail_next_creates(&self, times: u32, error: RemoteError) {
        self.state().create_fault = (times > 0).then_some(CreateFault::Next {
            remaining: times,
            error,
        });
    }

    /// Every create call fails with `error` until [`clear_faults`](Self::clear_faults).
    pub fn fail_creates(&self, error: RemoteError) {
        self.state().create_fault = Some(CreateFault::Always(error));
    }

    pub fn clear_faults(&self) {
        self.state().create_fault = None;
    }

    /// Current remote configuration of `function_name`, without logging a call.
    pub fn function(&self, function_name: &str) -> Option<FunctionConfiguration> {
        self.state().functions.get(function_name).cloned()
    }

    /// Source ARNs bound to `function_name`, in creation order.
    pub fn streams(&self, function_name: &str) -> Vec<String> {
        self.state()
            .mappings
            .iter()
            .filter(|m| m.function_name == function_name)
            .map(|m| m.event_source_arn.clone())
            .collect()
    }

    pub fn calls(&self) -> Vec<ApiCall> {
        self.state().calls.clone()
    }

    /// Calls that changed remote state.
    pub fn mutations(&self) -> Vec<ApiCall> {
        self.state()
            .calls
            .iter()
            .filter(|c| c.is_mutation())
            .cloned()
            .collect()
    }

    pub fn clear_calls(&self) {
        self.state().calls.clear();
    }
}

#[async_trait]
impl FunctionApi for SimulatedLambda {
    async fn create_function(
        &self,
        request: CreateFunctionRequest,
    ) -> Result<FunctionConfiguration, RemoteError> {
        let arn = self.function_arn(&request.function_name);
        let mut state = self.state();
        state.calls.push(ApiCall::CreateFunction(request.clone()));

        if let Some(error) = state.take_create_fault() {
            debug!(function_name = %request.function_name, %error, "Injected create failure");
            return Err(error);
        }
        if state.functions.contains_key(&request.function_name) {
            return Err(RemoteError::ResourceConflict(format!(
                "Function already exist: {}",
                request.function_name
            )));
        }

        let configuration = FunctionConfiguration {
            function_name: request.function_name.clone(),
            function_arn: arn,
            runtime: request.runtime,
            handler: request.handler,
            role: request.role,
            description: Some(String::new()),
            timeout: Some(DEFAULT_TIMEOUT),
            memory_size: Some(DEFAULT_MEMORY_SIZE),
            vpc_config: None,
            code_sha256: request.code.as_deref().map(code_sha256),
            code_size: request.code.as_ref().map_or(0, |c| c.len() as u64),
            last_modified: state.touch(),
        };
        state
            .functions
            .insert(request.function_name, configuration.clone());
        Ok(configuration)
    }

    async fn delete_function(&self, function_name: &str) -> Result<(), RemoteError> {
        let mut state = self.state();
        state
            .calls
            .push(ApiCall::DeleteFunction(function_name.to_string()));
        state.function_mut(function_name)?;
        state.functions.remove(function_name);
        state.mappings.retain(|m| m.function_name != function_name);
        Ok(())
    }

    async fn get_function_configuration(
        &self,
        function_name: &str,
    ) -> Result<FunctionConfiguration, RemoteError> {
        let mut state = self.state();
        state
            .calls
            .push(ApiCall::GetFunctionConfiguration(function_name.to_string()));
        state.function_mut(function_name).map(|f| f.clone())
    }

    async fn list_event_source_mappings(
        &self,
        function_name: &str,
    ) -> Result<Vec<MappingHandle>, RemoteError> {
        let mut state = self.state();
        state
            .calls
            .push(ApiCall::ListEventSourceMappings(function_name.to_string()));
        Ok(state
            .mappings
            .iter()
            .filter(|m| m.function_name == function_name)
            .map(|m| MappingHandle {
                uuid: m.uuid.clone(),
            })
            .collect())
    }

    async fn get_event_source_mapping(
        &self,
        uuid: &str,
    ) -> Result<EventSourceMapping, RemoteError> {
        let mut state = self.state();
        state
            .calls
            .push(ApiCall::GetEventSourceMapping(uuid.to_string()));
        state
            .mappings
            .iter()
            .find(|m| m.uuid == uuid)
            .cloned()
            .ok_or_else(|| {
                RemoteError::ResourceNotFound(format!("Event source mapping not found: {uuid}"))
            })
    }

    async fn create_event_source_mapping(
        &self,
        function_name: &str,
        event_source_arn: &str,
        starting_position: StartingPosition,
    ) -> Result<EventSourceMapping, RemoteError> {
        let mut state = self.state();
        state.calls.push(ApiCall::CreateEventSourceMapping {
            function_name: function_name.to_string(),
            event_source_arn: event_source_arn.to_string(),
            starting_position,
        });
        state.function_mut(function_name)?;

        let duplicate = state
            .mappings
            .iter()
            .any(|m| m.function_name == function_name && m.event_source_arn == event_source_arn);
        if duplicate {
            return Err(RemoteError::ResourceConflict(format!(
                "{event_source_arn} is already mapped to {function_name}"
            )));
        }

        state.next_uuid += 1;
        let mapping = EventSourceMapping {
            uuid: format!("mapping-{:04}", state.next_uuid),
            function_name: function_name.to_string(),
            event_source_arn: event_source_arn.to_string(),
            starting_position,
        };
        state.mappings.push(mapping.clone());
        Ok(mapping)
    }

    async fn update_function_configuration(
        &self,
        function_name: &str,
        update: &FunctionConfigUpdate,
    ) -> Result<FunctionConfiguration, RemoteError> {
        let mut state = self.state();
        state.calls.push(ApiCall::UpdateFunctionConfiguration {
            function_name: function_name.to_string(),
            update: update.clone(),
        });
        let revision = state.touch();
        let function = state.function_mut(function_name)?;

        let update = update.clone();
        if update.runtime.is_some() {
            function.runtime = update.runtime;
        }
        if update.handler.is_some() {
            function.handler = update.handler;
        }
        if update.role.is_some() {
            function.role = update.role;
        }
        if update.description.is_some() {
            function.description = update.description;
        }
        if update.timeout.is_some() {
            function.timeout = update.timeout;
        }
        if update.memory_size.is_some() {
            function.memory_size = update.memory_size;
        }
        if update.vpc_config.is_some() {
            function.vpc_config = update.vpc_config;
        }
        function.last_modified = revision;
        Ok(function.clone())
    }

    async fn update_function_code(
        &self,
        function_name: &str,
        zip_file: Vec<u8>,
    ) -> Result<FunctionConfiguration, RemoteError> {
        let digest = code_sha256(&zip_file);
        let mut state = self.state();
        state.calls.push(ApiCall::UpdateFunctionCode {
            function_name: function_name.to_string(),
            code_sha256: digest.clone(),
        });
        let revision = state.touch();
        let function = state.function_mut(function_name)?;
        function.code_sha256 = Some(digest);
        function.code_size = zip_file.len() as u64;
        function.last_modified = revision;
        Ok(function.clone())
    }
}
