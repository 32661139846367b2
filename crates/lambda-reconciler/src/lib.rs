//! # Lambda Reconciler
//!
//! Declarative reconciliation of cloud functions: given the desired state of a function,
//! compute and issue the minimal set of remote calls that bring the deployed function in
//! line with it.
//!
//! - **[model]**: Pure data ([`FunctionSpec`](model::FunctionSpec), observed state,
//!   change sets) and the property [`METADATA`](model::METADATA) table that drives dispatch.
//! - **[remote]**: The [`FunctionApi`](remote::FunctionApi) seam and an in-memory
//!   [`SimulatedLambda`](remote::SimulatedLambda).
//! - **[function_actor]**: The [`Function`](function_actor::Function) resource: observe,
//!   diff, create with retry, apply, delete.
//! - **[clients]**: [`FunctionClient`](clients::FunctionClient), the typed handle to a
//!   running function actor.
//! - **[lifecycle]**: Manifest loading and the [`FunctionFleet`](lifecycle::FunctionFleet)
//!   orchestrator.

pub mod clients;
pub mod function_actor;
pub mod lifecycle;
pub mod model;
pub mod remote;
