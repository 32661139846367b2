//! # Reconciler Actor
//!
//! This module defines the `ReconcilerActor`, the component that owns one resource's
//! desired state and serves lifecycle requests for it. It implements the "Server" side of
//! the Actor Model, processing requests sequentially so two passes for the same resource
//! never interleave inside a process.

use crate::client::ReconcilerClient;
use crate::error::FrameworkError;
use crate::message::ReconcileRequest;
use crate::pass::{plan, reconcile};
use crate::resource::ManagedResource;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// The generic actor that reconciles a single resource.
///
/// # Architecture Note
/// This struct is the "Server" half of the actor. It owns the resource (desired state)
/// and the receiver end of the channel. Observed state and change sets are created per
/// request and dropped when the request completes.
///
/// # Usage Pattern
///
/// 1.  **Create**: Call `ReconcilerActor::new()` to get the `actor` (server) and `client` (interface).
/// 2.  **Wire**: Pass the remote client into `actor.run(context)`.
/// 3.  **Run**: Spawn the actor's run loop in a background task.
///
/// ```rust
/// use async_trait::async_trait;
/// use reconcile_framework::{ChangeSet, Deletion, ManagedResource, ReconcileOutcome, ReconcilerActor};
/// use std::sync::{Arc, Mutex};
///
/// #[derive(Debug)] struct Diff(Option<u32>);
/// impl ChangeSet for Diff {
///     fn is_empty(&self) -> bool { self.0.is_none() }
///     fn len(&self) -> usize { usize::from(self.0.is_some()) }
/// }
/// #[derive(Debug, thiserror::Error)] #[error("counter error")] struct CounterError;
///
/// struct Counter { key: String, want: u32 }
///
/// #[async_trait]
/// impl ManagedResource for Counter {
///     type Key = String;
///     type Observed = u32;
///     type Changes = Diff;
///     type Context = Arc<Mutex<Option<u32>>>;
///     type Error = CounterError;
///
///     fn key(&self) -> &String { &self.key }
///     async fn observe(&self, remote: &Self::Context) -> Result<Option<u32>, CounterError> {
///         Ok(*remote.lock().unwrap())
///     }
///     async fn create(&self, remote: &Self::Context) -> Result<(), CounterError> {
///         *remote.lock().unwrap() = Some(self.want);
///         Ok(())
///     }
///     async fn diff(&self, seen: &u32, _: &Self::Context) -> Result<Diff, CounterError> {
///         Ok(Diff((*seen != self.want).then_some(self.want)))
///     }
///     async fn apply(&self, diff: &Diff, remote: &Self::Context) -> Result<(), CounterError> {
///         *remote.lock().unwrap() = diff.0;
///         Ok(())
///     }
///     async fn delete(&self, remote: &Self::Context) -> Result<Deletion, CounterError> {
///         Ok(match remote.lock().unwrap().take() {
///             Some(_) => Deletion::Deleted,
///             None => Deletion::AlreadyAbsent,
///         })
///     }
/// }
///
/// #[tokio::main]
/// async fn main() {
///     // 1. Create
///     let counter = Counter { key: "c1".into(), want: 3 };
///     let (actor, client) = ReconcilerActor::new(counter, 10);
///
///     // 2. Wire & Run
///     tokio::spawn(actor.run(Arc::new(Mutex::new(None))));
///
///     // 3. Use
///     let outcome = client.reconcile().await.unwrap();
///     assert_eq!(outcome, ReconcileOutcome::Created { converged: 0 });
/// }
/// ```
pub struct ReconcilerActor<T: ManagedResource> {
    receiver: mpsc::Receiver<ReconcileRequest<T>>,
    resource: T,
    passes: u64,
}

impl<T: ManagedResource> ReconcilerActor<T> {
    /// Creates a new `ReconcilerActor` and its associated `ReconcilerClient`.
    ///
    /// # Arguments
    ///
    /// * `resource` - The desired state this actor is responsible for.
    /// * `buffer_size` - The capacity of the MPSC channel. If the channel is full,
    ///   calls to the client will wait until there is space.
    pub fn new(resource: T, buffer_size: usize) -> (Self, ReconcilerClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            resource,
            passes: 0,
        };
        let client = ReconcilerClient::new(sender);
        (actor, client)
    }

    /// Runs the actor's event loop, processing requests until the channel closes.
    ///
    /// # Context Injection
    /// The `context` argument is handed to every phase of the resource. It is typically
    /// the remote API client, created *after* the desired state was loaded.
    pub async fn run(mut self, context: T::Context) {
        let key = self.resource.key().clone();
        info!(%key, "Actor started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                ReconcileRequest::Reconcile { respond_to } => {
                    self.passes += 1;
                    debug!(%key, pass = self.passes, "Reconcile");
                    let result = reconcile(&self.resource, &context).await.map_err(boxed);
                    match &result {
                        Ok(outcome) => info!(%key, pass = self.passes, ?outcome, "Reconciled"),
                        Err(e) => warn!(%key, pass = self.passes, error = %e, "Reconcile failed"),
                    }
                    let _ = respond_to.send(result);
                }
                ReconcileRequest::Plan { respond_to } => {
                    debug!(%key, "Plan");
                    let result = plan(&self.resource, &context).await.map_err(boxed);
                    if let Err(e) = &result {
                        warn!(%key, error = %e, "Plan failed");
                    }
                    let _ = respond_to.send(result);
                }
                ReconcileRequest::Observe { respond_to } => {
                    let result = self.resource.observe(&context).await.map_err(boxed);
                    let found = matches!(result, Ok(Some(_)));
                    debug!(%key, found, "Observe");
                    let _ = respond_to.send(result);
                }
                ReconcileRequest::Delete { respond_to } => {
                    debug!(%key, "Delete");
                    let result = self.resource.delete(&context).await.map_err(boxed);
                    match &result {
                        Ok(deletion) => info!(%key, ?deletion, "Deleted"),
                        Err(e) => warn!(%key, error = %e, "Delete failed"),
                    }
                    let _ = respond_to.send(result);
                }
            }
        }

        info!(%key, passes = self.passes, "Shutdown");
    }
}

fn boxed<E: std::error::Error + Send + Sync + 'static>(e: E) -> FrameworkError {
    FrameworkError::ResourceError(Box::new(e))
}
