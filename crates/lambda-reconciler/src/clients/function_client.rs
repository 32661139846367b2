//! # Function Client
//!
//! Provides a high‑level API for interacting with a `Function` actor.
//! It wraps a `ReconcilerClient<Function>` and hands back [`FunctionError`]s instead of
//! boxed framework errors.
use crate::function_actor::{Function, FunctionError};
use crate::model::ObservedFunction;
use async_trait::async_trait;
use reconcile_framework::{FrameworkError, ReconcilerClient, ReconcilerHandle};
use tracing::{debug, instrument};

/// Client for interacting with one Function actor.
#[derive(Clone)]
pub struct FunctionClient {
    inner: ReconcilerClient<Function>,
}

impl FunctionClient {
    pub fn new(inner: ReconcilerClient<Function>) -> Self {
        Self { inner }
    }

    /// Fetch the current remote state without changing anything.
    #[instrument(skip(self))]
    pub async fn observe(&self) -> Result<Option<ObservedFunction>, FunctionError> {
        debug!("Sending request");
        self.inner.observe().await.map_err(Self::map_error)
    }
}

#[async_trait]
impl ReconcilerHandle<Function> for FunctionClient {
    type Error = FunctionError;

    fn inner(&self) -> &ReconcilerClient<Function> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        e.downcast_resource::<FunctionError>()
            .unwrap_or_else(|e| FunctionError::ActorCommunicationError(e.to_string()))
    }
}
