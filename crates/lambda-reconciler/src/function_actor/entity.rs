//! [`ManagedResource`] implementation for a function.
//!
//! This module wires the observation fetch, diff engine and dispatcher into the phase
//! operations the generic [`ReconcilerActor`](reconcile_framework::ReconcilerActor) drives.

use super::error::FunctionError;
use super::{diff, dispatch, observe};
use crate::model::{CodeSource, FunctionChanges, FunctionSpec, ObservedFunction};
use crate::remote::{FunctionApi, RemoteError};
use async_trait::async_trait;
use reconcile_framework::{Deletion, ManagedResource, RetryError, RetryPolicy};
use std::sync::Arc;
use tracing::{info, warn};

/// A function under management: its desired state plus the create retry policy.
#[derive(Debug, Clone)]
pub struct Function {
    spec: FunctionSpec,
    create_retry: RetryPolicy,
}

impl Function {
    /// Validates `spec` and wraps it with the default create retry policy.
    pub fn new(spec: FunctionSpec) -> Result<Self, FunctionError> {
        if spec.function_name.trim().is_empty() {
            return Err(FunctionError::InvalidSpec(
                "function_name must not be empty".to_string(),
            ));
        }
        if let Some(CodeSource::S3 { .. }) = spec.code {
            return Err(FunctionError::UnsupportedCodeSource {
                function_name: spec.function_name,
            });
        }
        Ok(Self {
            spec,
            create_retry: RetryPolicy::default(),
        })
    }

    pub fn with_create_retry(mut self, policy: RetryPolicy) -> Self {
        self.create_retry = policy;
        self
    }

    pub fn spec(&self) -> &FunctionSpec {
        &self.spec
    }

    pub fn create_retry(&self) -> &RetryPolicy {
        &self.create_retry
    }
}

#[async_trait]
impl ManagedResource for Function {
    type Key = String;
    type Observed = ObservedFunction;
    type Changes = FunctionChanges;
    type Context = Arc<dyn FunctionApi>;
    type Error = FunctionError;

    fn key(&self) -> &String {
        &self.spec.function_name
    }

    async fn observe(
        &self,
        api: &Self::Context,
    ) -> Result<Option<ObservedFunction>, FunctionError> {
        observe::fetch(api.as_ref(), &self.spec.function_name).await
    }

    /// Creates the function, retrying while the service rejects it with an invalid
    /// parameter value (typically an execution role that is not visible yet).
    async fn create(&self, api: &Self::Context) -> Result<(), FunctionError> {
        let function_name = &self.spec.function_name;
        let request = dispatch::create_request(&self.spec).await?;
        let api: &dyn FunctionApi = api.as_ref();

        let created = self
            .create_retry
            .retry_while(
                move || api.create_function(request.clone()),
                RemoteError::is_propagation_delay,
            )
            .await;

        match created {
            Ok(configuration) => {
                info!(
                    %function_name,
                    function_arn = %configuration.function_arn,
                    "Function created"
                );
                Ok(())
            }
            Err(RetryError::Exhausted { attempts }) => {
                warn!(%function_name, attempts, "Giving up on function creation");
                Err(FunctionError::TookTooLong {
                    function_name: function_name.clone(),
                    attempts,
                })
            }
            Err(RetryError::Fatal(e)) => Err(e.into()),
        }
    }

    async fn diff(
        &self,
        observed: &ObservedFunction,
        _: &Self::Context,
    ) -> Result<FunctionChanges, FunctionError> {
        diff::diff(&self.spec, observed).await
    }

    async fn apply(
        &self,
        changes: &FunctionChanges,
        api: &Self::Context,
    ) -> Result<(), FunctionError> {
        dispatch::apply(&self.spec.function_name, changes, api.as_ref()).await
    }

    async fn delete(&self, api: &Self::Context) -> Result<Deletion, FunctionError> {
        let function_name = &self.spec.function_name;
        match api.delete_function(function_name).await {
            Ok(()) => {
                info!(%function_name, "Function deleted");
                Ok(Deletion::Deleted)
            }
            Err(e) if e.is_not_found() => Ok(Deletion::AlreadyAbsent),
            Err(e) => Err(e.into()),
        }
    }
}
