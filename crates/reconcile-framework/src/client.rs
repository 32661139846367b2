//! # Generic Client
//!
//! This module defines the generic client for communicating with reconciler actors.

use crate::error::FrameworkError;
use crate::message::ReconcileRequest;
use crate::pass::{Plan, ReconcileOutcome};
use crate::resource::{Deletion, ManagedResource};
use tokio::sync::{mpsc, oneshot};

/// ## ReconcilerClient
///
/// The `ReconcilerClient<T>` provides a type‑safe, async API for interacting with a
/// `ReconcilerActor<T>`. It forwards lifecycle requests over a Tokio mpsc channel and
/// returns results via oneshot channels. The client is cheap to clone and can be shared
/// across tasks; requests from all clones are still served one at a time.
pub struct ReconcilerClient<T: ManagedResource> {
    sender: mpsc::Sender<ReconcileRequest<T>>,
}

impl<T: ManagedResource> Clone for ReconcilerClient<T> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<T: ManagedResource> ReconcilerClient<T> {
    pub fn new(sender: mpsc::Sender<ReconcileRequest<T>>) -> Self {
        Self { sender }
    }

    pub async fn reconcile(&self) -> Result<ReconcileOutcome, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(ReconcileRequest::Reconcile { respond_to })
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }

    pub async fn plan(&self) -> Result<Plan<T::Changes>, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(ReconcileRequest::Plan { respond_to })
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }

    pub async fn observe(&self) -> Result<Option<T::Observed>, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(ReconcileRequest::Observe { respond_to })
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }

    pub async fn delete(&self) -> Result<Deletion, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(ReconcileRequest::Delete { respond_to })
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }
}
