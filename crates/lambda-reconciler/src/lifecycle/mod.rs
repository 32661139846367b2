//! # Fleet Lifecycle & Configuration
//!
//! This module turns a manifest into running reconcilers and tears them down again.
//!
//! 1. [`Manifest::load`] reads, resolves and validates the desired state.
//! 2. [`FunctionFleet::from_manifest`] creates one actor per function and injects the
//!    shared remote service into each (late binding: the actors exist before the
//!    service client is wired in).
//! 3. `reconcile_all` / `plan_all` / `delete_all` fan a request out to every function.
//! 4. [`FunctionFleet::shutdown`] drops the clients and awaits every actor task.
//!
//! Logging is set up once per process with
//! [`setup_tracing`](reconcile_framework::tracing::setup_tracing); `RUST_LOG=debug` shows
//! every queued change and remote call.

pub mod config;
pub mod fleet;

pub use config::*;
pub use fleet::*;
