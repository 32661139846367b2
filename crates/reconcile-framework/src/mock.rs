//! # Mock Framework & Testing Guide
//!
//! The `MockReconciler<T>` type hands out a real `ReconcilerClient<T>` whose requests are
//! answered from a queue of canned responses instead of a running actor. It lets you test
//! code that *drives* reconcilers (fleet orchestration, typed clients, CLIs) without a
//! remote backend.
//!
//! ## When to use Mocks vs Real Actors
//!
//! | Feature | MockReconciler | Real Actor |
//! |---------|----------------|------------|
//! | **Remote calls** | None | Through the injected context |
//! | **Determinism** | 100% Deterministic | Depends on the backend |
//! | **Use Case** | Logic *around* the client | The resource's phases themselves |
//! | **Error Injection** | Easy (`return_err`) | Needs a faulty backend |
//!
//! ## Example
//!
//! ```rust
//! use async_trait::async_trait;
//! use reconcile_framework::mock::MockReconciler;
//! use reconcile_framework::{ChangeSet, Deletion, FrameworkError, ManagedResource, ReconcileOutcome};
//!
//! #[derive(Debug)] struct NoChanges;
//! impl ChangeSet for NoChanges {
//!     fn is_empty(&self) -> bool { true }
//!     fn len(&self) -> usize { 0 }
//! }
//! #[derive(Debug, thiserror::Error)] #[error("Err")] struct NoopError;
//!
//! struct Noop;
//!
//! #[async_trait]
//! impl ManagedResource for Noop {
//!     type Key = String; type Observed = (); type Changes = NoChanges;
//!     type Context = (); type Error = NoopError;
//!     fn key(&self) -> &String { unimplemented!() }
//!     async fn observe(&self, _: &()) -> Result<Option<()>, NoopError> { Ok(None) }
//!     async fn create(&self, _: &()) -> Result<(), NoopError> { Ok(()) }
//!     async fn diff(&self, _: &(), _: &()) -> Result<NoChanges, NoopError> { Ok(NoChanges) }
//!     async fn apply(&self, _: &NoChanges, _: &()) -> Result<(), NoopError> { Ok(()) }
//!     async fn delete(&self, _: &()) -> Result<Deletion, NoopError> { Ok(Deletion::Deleted) }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut mock = MockReconciler::<Noop>::new();
//!     mock.expect_reconcile().return_ok(ReconcileOutcome::Unchanged);
//!     mock.expect_delete().return_err(FrameworkError::ActorClosed);
//!
//!     let client = mock.client();
//!     assert_eq!(client.reconcile().await.unwrap(), ReconcileOutcome::Unchanged);
//!     assert!(matches!(client.delete().await, Err(FrameworkError::ActorClosed)));
//!
//!     mock.verify();
//! }
//! ```

use crate::client::ReconcilerClient;
use crate::error::FrameworkError;
use crate::message::ReconcileRequest;
use crate::pass::{Plan, ReconcileOutcome};
use crate::resource::{Deletion, ManagedResource};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

// =============================================================================
// EXPECTATION BUILDER API
// =============================================================================

enum Expectation<T: ManagedResource> {
    Reconcile {
        response: Result<ReconcileOutcome, FrameworkError>,
    },
    Plan {
        response: Result<Plan<T::Changes>, FrameworkError>,
    },
    Observe {
        response: Result<Option<T::Observed>, FrameworkError>,
    },
    Delete {
        response: Result<Deletion, FrameworkError>,
    },
}

type Queue<T> = Arc<Mutex<VecDeque<Expectation<T>>>>;

/// A mock reconciler with expectation tracking for fluent testing.
///
/// Expectations are consumed in the order they were registered. A request that does
/// not match the next expectation panics the background task, which surfaces in the
/// test as `ActorDropped`.
pub struct MockReconciler<T: ManagedResource> {
    client: ReconcilerClient<T>,
    expectations: Queue<T>,
    _handle: tokio::task::JoinHandle<()>,
}

impl<T: ManagedResource> Default for MockReconciler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ManagedResource> MockReconciler<T> {
    /// Creates a new mock with no expectations. Must be called inside a Tokio runtime.
    pub fn new() -> Self {
        let (sender, mut receiver) = mpsc::channel::<ReconcileRequest<T>>(100);
        let expectations: Queue<T> = Arc::new(Mutex::new(VecDeque::new()));
        let expectations_clone = expectations.clone();

        let handle = tokio::spawn(async move {
            while let Some(request) = receiver.recv().await {
                let expectation = expectations_clone.lock().unwrap().pop_front();

                match (request, expectation) {
                    (
                        ReconcileRequest::Reconcile { respond_to },
                        Some(Expectation::Reconcile { response }),
                    ) => {
                        let _ = respond_to.send(response);
                    }
                    (
                        ReconcileRequest::Plan { respond_to },
                        Some(Expectation::Plan { response }),
                    ) => {
                        let _ = respond_to.send(response);
                    }
                    (
                        ReconcileRequest::Observe { respond_to },
                        Some(Expectation::Observe { response }),
                    ) => {
                        let _ = respond_to.send(response);
                    }
                    (
                        ReconcileRequest::Delete { respond_to },
                        Some(Expectation::Delete { response }),
                    ) => {
                        let _ = respond_to.send(response);
                    }
                    _ => {
                        panic!("Unexpected request or expectation mismatch");
                    }
                }
            }
        });

        Self {
            client: ReconcilerClient::new(sender),
            expectations,
            _handle: handle,
        }
    }

    /// Returns the client for use in tests.
    pub fn client(&self) -> ReconcilerClient<T> {
        self.client.clone()
    }

    pub fn expect_reconcile(&mut self) -> ExpectationBuilder<T, ReconcileOutcome> {
        ExpectationBuilder::new(self.expectations.clone(), |response| Expectation::Reconcile {
            response,
        })
    }

    pub fn expect_plan(&mut self) -> ExpectationBuilder<T, Plan<T::Changes>> {
        ExpectationBuilder::new(self.expectations.clone(), |response| Expectation::Plan {
            response,
        })
    }

    pub fn expect_observe(&mut self) -> ExpectationBuilder<T, Option<T::Observed>> {
        ExpectationBuilder::new(self.expectations.clone(), |response| Expectation::Observe {
            response,
        })
    }

    pub fn expect_delete(&mut self) -> ExpectationBuilder<T, Deletion> {
        ExpectationBuilder::new(self.expectations.clone(), |response| Expectation::Delete {
            response,
        })
    }

    /// Verifies that all expectations were met.
    pub fn verify(&self) {
        let exps = self.expectations.lock().unwrap();
        if !exps.is_empty() {
            panic!("Not all expectations were met. {} remaining", exps.len());
        }
    }
}

/// Registers the response for one expected request.
pub struct ExpectationBuilder<T: ManagedResource, R> {
    expectations: Queue<T>,
    wrap: fn(Result<R, FrameworkError>) -> Expectation<T>,
}

impl<T: ManagedResource, R> ExpectationBuilder<T, R> {
    fn new(expectations: Queue<T>, wrap: fn(Result<R, FrameworkError>) -> Expectation<T>) -> Self {
        Self { expectations, wrap }
    }

    /// Sets the expectation to return a successful result.
    pub fn return_ok(self, value: R) {
        self.push(Ok(value));
    }

    /// Sets the expectation to return an error.
    pub fn return_err(self, error: FrameworkError) {
        self.push(Err(error));
    }

    fn push(self, response: Result<R, FrameworkError>) {
        let mut exps = self.expectations.lock().unwrap();
        exps.push_back((self.wrap)(response));
    }
}
