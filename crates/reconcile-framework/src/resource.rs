//! # ManagedResource Trait
//!
//! The `ManagedResource` trait defines the contract that every reconcilable resource kind
//! must implement to be driven by the generic [`ReconcilerActor`](crate::ReconcilerActor).
//! It specifies associated types for the identity key, the observed remote state, the
//! change set produced by diffing, the injected remote context and the error type, and
//! the phase operations the controller calls (`observe`, `create`, `diff`, `apply`,
//! `delete`).
//!
//! # Architecture Note
//! The implementor holds the *desired* state. Everything observed from the remote side is
//! fetched fresh on each pass and never cached between passes, so a pass always works
//! from an up-to-date snapshot.
//!
//! We use associated types so that a function resource can only be diffed against an
//! observed function, and its change set can only be applied by the same resource kind.

use async_trait::async_trait;
use std::fmt::{Debug, Display};

/// A computed set of fields that require a remote mutation.
pub trait ChangeSet: Debug + Send + Sync + 'static {
    /// `true` when desired and observed state already agree.
    fn is_empty(&self) -> bool;

    /// Number of changed properties.
    fn len(&self) -> usize;
}

/// Result of a delete request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deletion {
    /// The remote resource existed and was removed.
    Deleted,
    /// The remote resource was already gone. Treated as success.
    AlreadyAbsent,
}

/// Trait that any resource kind must implement to be reconciled by a `ReconcilerActor`.
///
/// # Async & Context
/// This trait is `#[async_trait]` because every phase talks to a remote API.
/// The `Context` type is injected into every phase by `run()`. This allows "Late Binding"
/// of the remote client: the desired state is built first, the SDK client is wired in
/// when the actor starts.
#[async_trait]
pub trait ManagedResource: Send + Sync + 'static {
    /// The immutable identity of the remote resource (e.g. a function name).
    type Key: Clone + Send + Sync + Display + Debug;

    /// Snapshot of the actual remote state.
    type Observed: Send + Sync + Debug;

    /// Fields that differ between desired and observed state.
    type Changes: ChangeSet;

    /// The runtime context (remote client) injected into the actor.
    type Context: Send + Sync;

    /// The error type for this resource kind.
    ///
    /// # Design Note: Error Granularity
    ///
    /// One error enum per resource kind rather than one per phase. Callers match on a
    /// single type (e.g. `FunctionError`) whether the failure came from the create retry
    /// loop, the diff, or the dispatcher.
    type Error: std::error::Error + Send + Sync + 'static;

    /// The identity key. Never changes across passes.
    fn key(&self) -> &Self::Key;

    /// Fetches the remote state. `Ok(None)` means the resource does not exist.
    async fn observe(&self, ctx: &Self::Context) -> Result<Option<Self::Observed>, Self::Error>;

    /// Provisions the resource from its desired state.
    async fn create(&self, ctx: &Self::Context) -> Result<(), Self::Error>;

    /// Computes the change set between the desired state and `observed`.
    async fn diff(
        &self,
        observed: &Self::Observed,
        ctx: &Self::Context,
    ) -> Result<Self::Changes, Self::Error>;

    /// Issues the remote calls that apply `changes`.
    async fn apply(&self, changes: &Self::Changes, ctx: &Self::Context)
        -> Result<(), Self::Error>;

    /// Removes the remote resource.
    async fn delete(&self, ctx: &Self::Context) -> Result<Deletion, Self::Error>;
}
