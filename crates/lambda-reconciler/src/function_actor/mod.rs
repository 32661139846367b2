//! # Function Actor
//!
//! This module implements the function resource: the desired state of one cloud function
//! and the phase operations that reconcile it against the remote service.
//!
//! ## Structure
//!
//! - [`entity`] - [`ManagedResource`](reconcile_framework::ManagedResource) implementation for [`Function`]
//! - [`observe`] - remote describe plus trigger resolution
//! - [`diff`] - desired vs observed comparison, code checksum suppression
//! - [`dispatch`] - metadata-driven routing of changes to remote calls
//! - [`artifact`] - local zip packages and their SHA-256
//! - [`error`] - [`FunctionError`]
//! - [`new()`] - Factory function that creates the actor and client
//!
//! ## Usage
//!
//! ```rust
//! use lambda_reconciler::function_actor::{self, Function};
//! use lambda_reconciler::clients::FunctionClient;
//! use lambda_reconciler::model::FunctionSpec;
//! use lambda_reconciler::remote::{FunctionApi, SimulatedLambda};
//! use reconcile_framework::{ReconcileOutcome, ReconcilerHandle};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut spec = FunctionSpec::named("thumbnailer");
//!     spec.runtime = Some("python3.12".to_string());
//!     spec.timeout = Some(60);
//!
//!     // Create actor and client
//!     let (actor, generic_client) = function_actor::new(Function::new(spec)?);
//!     let client = FunctionClient::new(generic_client);
//!
//!     // Start the actor with the remote service injected
//!     let api: Arc<dyn FunctionApi> = Arc::new(SimulatedLambda::default());
//!     tokio::spawn(actor.run(api));
//!
//!     // Absent: created, then the timeout is converged in the same pass
//!     let outcome = client.reconcile().await?;
//!     assert_eq!(outcome, ReconcileOutcome::Created { converged: 1 });
//!     assert_eq!(client.reconcile().await?, ReconcileOutcome::Unchanged);
//!     Ok(())
//! }
//! ```

pub mod artifact;
pub mod diff;
pub mod dispatch;
pub mod entity;
pub mod error;
pub mod observe;

pub use entity::Function;
pub use error::FunctionError;

use reconcile_framework::{ReconcilerActor, ReconcilerClient};

/// Mailbox capacity used by [`new()`].
pub const DEFAULT_MAILBOX_SIZE: usize = 32;

/// Creates a new Function actor and its client.
pub fn new(function: Function) -> (ReconcilerActor<Function>, ReconcilerClient<Function>) {
    with_mailbox(function, DEFAULT_MAILBOX_SIZE)
}

/// Like [`new()`], with an explicit mailbox capacity.
pub fn with_mailbox(
    function: Function,
    mailbox_size: usize,
) -> (ReconcilerActor<Function>, ReconcilerClient<Function>) {
    ReconcilerActor::new(function, mailbox_size)
}
