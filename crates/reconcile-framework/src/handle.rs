//! # ReconcilerHandle Trait
//!
//! Provides a common interface for resource‑specific clients, adding default `reconcile`,
//! `plan` and `delete` methods built on top of a generic `ReconcilerClient`.
use crate::{Deletion, FrameworkError, ManagedResource, Plan, ReconcileOutcome, ReconcilerClient};
use async_trait::async_trait;

/// Trait for resource-specific clients to inherit the standard lifecycle operations.
///
/// Implementors only say how to reach the generic client and how to turn a
/// [`FrameworkError`] into their own error type; usually by downcasting the boxed
/// resource error back to the concrete one.
#[async_trait]
pub trait ReconcilerHandle<T: ManagedResource>: Send + Sync {
    /// The resource-specific error type.
    type Error: From<String> + Send + Sync;

    /// Access the inner generic ReconcilerClient.
    fn inner(&self) -> &ReconcilerClient<T>;

    /// Map framework errors to the specific resource error type.
    fn map_error(e: FrameworkError) -> Self::Error;

    /// Run one reconciliation pass.
    #[tracing::instrument(skip(self))]
    async fn reconcile(&self) -> Result<ReconcileOutcome, Self::Error> {
        tracing::debug!("Sending request");
        self.inner().reconcile().await.map_err(Self::map_error)
    }

    /// Compute the pending actions without applying them.
    #[tracing::instrument(skip(self))]
    async fn plan(&self) -> Result<Plan<T::Changes>, Self::Error> {
        tracing::debug!("Sending request");
        self.inner().plan().await.map_err(Self::map_error)
    }

    /// Delete the remote resource.
    #[tracing::instrument(skip(self))]
    async fn delete(&self) -> Result<Deletion, Self::Error> {
        tracing::debug!("Sending request");
        self.inner().delete().await.map_err(Self::map_error)
    }
}
