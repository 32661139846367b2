//! # Reconcile Framework
//!
//! This crate provides the building blocks for **declarative resource reconcilers**: given
//! the desired state of an external resource, bring its actual state into line with as
//! few remote calls as possible, and keep doing so pass after pass.
//!
//! It implements the reconciliation loop on top of the **Actor Model**: every reconciled
//! resource is owned by one actor that serves lifecycle requests one at a time.
//!
//! ## Why Actors for Reconciliation?
//!
//! - **No overlapping passes**: a resource's passes run sequentially inside its actor,
//!   so two callers can never interleave their diffs and applies against the same key.
//! - **Late binding**: the remote client is injected when the actor starts, so desired
//!   state can be loaded and validated before any SDK client exists.
//! - **Isolation**: a slow resource (for example one stuck in a creation retry loop) never
//!   blocks the others, since each actor runs in its own Tokio task.
//!
//! ## Architecture Overview
//!
//! 1. **Resource Layer** ([`ManagedResource`]) - desired state plus the phase operations
//!    (`observe`, `create`, `diff`, `apply`, `delete`)
//! 2. **Pass Layer** ([`reconcile`], [`plan`]) - the `observe -> create | diff -> apply` cycle
//! 3. **Runtime Layer** ([`ReconcilerActor`]) - request processing and sequencing
//! 4. **Interface Layer** ([`ReconcilerClient`], [`ReconcilerHandle`]) - type-safe requests
//!
//! ## The Pass
//!
//! ```text
//! observe ──None──▶ create ──▶ observe ──▶ diff ──▶ apply   => Created { converged }
//!    │
//!    └──Some──▶ diff ──empty──▶                             => Unchanged
//!                  └──changes──▶ apply                      => Updated { changes }
//! ```
//!
//! Observed state and change sets live for one pass only. A partial failure inside
//! `apply` aborts the pass; the next pass observes the intermediate state and finishes
//! the job, which is why every phase must be idempotent.
//!
//! ## Retrying Eventually-Consistent Calls
//!
//! [`RetryPolicy`] retries an operation while its error is classified as transient,
//! with a fixed wait and an attempt ceiling. Exhaustion is reported as
//! [`RetryError::Exhausted`], distinct from the operation's own fatal errors.
//!
//! ## Testing
//!
//! The [`mock`] module provides `MockReconciler`, which answers client requests from
//! canned responses without running any actor.

pub mod actor;
pub mod client;
pub mod error;
pub mod handle;
pub mod message;
pub mod mock;
pub mod pass;
pub mod resource;
pub mod retry;
pub mod tracing;

// Re-export core types for convenience
pub use actor::ReconcilerActor;
pub use client::ReconcilerClient;
pub use error::FrameworkError;
pub use handle::ReconcilerHandle;
pub use message::{ReconcileRequest, Response};
pub use pass::{plan, reconcile, Plan, ReconcileOutcome};
pub use resource::{ChangeSet, Deletion, ManagedResource};
pub use retry::{RetryError, RetryPolicy};
