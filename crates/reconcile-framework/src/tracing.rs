//! # Observability & Tracing
//!
//! The [`setup_tracing`] function initializes structured logging with the `tracing` crate.
//!
//! The framework uses a compact format that hides the crate/module prefix
//! (`with_target(false)`); every event already carries the resource `key` field.
//!
//! ## What Gets Traced
//!
//! - **Actor Lifecycle**: startup, shutdown and the number of passes served
//! - **Passes**: `Reconciled` with the outcome, `Plan`, `Observe`, `Deleted`
//! - **Retries**: every transient failure with `attempt` and `max_attempts`
//! - **Errors**: failed passes with the key and the error chain
//!
//! ## Usage Examples
//!
//! ```bash
//! # One line per pass
//! RUST_LOG=info cargo run -- --manifest functions.toml
//!
//! # Full change sets and remote calls
//! RUST_LOG=debug cargo run -- --manifest functions.toml
//!
//! # Only the retry loop
//! RUST_LOG=reconcile_framework::retry=warn cargo run -- --manifest functions.toml
//! ```
//!
//! With `RUST_LOG=info` a first run against an empty backend looks like:
//!
//! ```text
//! INFO Actor started key=orders-ingest
//! INFO Resource absent, creating key=orders-ingest
//! INFO Reconciled key=orders-ingest pass=1 outcome=Created { converged: 2 }
//! ```
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}
