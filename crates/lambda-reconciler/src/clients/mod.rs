//! Type-safe wrappers around [`ReconcilerClient`](reconcile_framework::ReconcilerClient).

pub mod function_client;

pub use function_client::*;
