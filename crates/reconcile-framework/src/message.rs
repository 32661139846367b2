//! # Generic Messages
//!
//! This module defines the message types used for communication between
//! the `ReconcilerClient` and `ReconcilerActor`.

use crate::error::FrameworkError;
use crate::pass::{Plan, ReconcileOutcome};
use crate::resource::{Deletion, ManagedResource};
use tokio::sync::oneshot;

/// Type alias for the one-shot response channel used by actors.
pub type Response<T> = oneshot::Sender<Result<T, FrameworkError>>;

/// Internal message type sent to the actor to request a lifecycle operation.
///
/// Each actor owns exactly one resource, so no variant carries an id. The variants map
/// to the controller's operations:
///
/// - **Reconcile**: full pass, creating or updating as needed.
/// - **Plan**: dry run, reports the pending change set.
/// - **Observe**: fetches the current remote state.
/// - **Delete**: removes the remote resource.
#[derive(Debug)]
pub enum ReconcileRequest<T: ManagedResource> {
    Reconcile {
        respond_to: Response<ReconcileOutcome>,
    },
    Plan {
        respond_to: Response<Plan<T::Changes>>,
    },
    Observe {
        respond_to: Response<Option<T::Observed>>,
    },
    Delete {
        respond_to: Response<Deletion>,
    },
}
