use super::config::Manifest;
use crate::clients::FunctionClient;
use crate::function_actor::{self, Function, FunctionError};
use crate::model::FunctionChanges;
use crate::remote::FunctionApi;
use reconcile_framework::{Deletion, Plan, ReconcileOutcome, ReconcilerHandle};
use std::sync::Arc;
use tokio::task::{JoinError, JoinHandle};
use tracing::{debug, error, info, warn};

/// Per-function results of a fleet-wide request, in manifest order.
pub type FleetReport<T> = Vec<(String, Result<T, FunctionError>)>;

/// Runs one reconciler actor per declared function.
///
/// `FunctionFleet` is responsible for:
/// - **Lifecycle Management**: Starting and stopping one actor per function
/// - **Dependency Wiring**: Injecting the shared remote service into every actor
/// - **Fan-out**: Running a request against every function and collecting the results
///
/// A failure for one function never stops the others; it is reported in its slot of
/// the [`FleetReport`].
///
/// # Example
///
/// ```ignore
/// let manifest = Manifest::load("reconciler.toml")?;
/// let fleet = FunctionFleet::from_manifest(&manifest, api)?;
///
/// for (name, result) in fleet.reconcile_all().await {
///     println!("{name}: {result:?}");
/// }
///
/// fleet.shutdown().await?;
/// ```
pub struct FunctionFleet {
    clients: Vec<(String, FunctionClient)>,
    handles: Vec<JoinHandle<()>>,
}

impl FunctionFleet {
    /// Spawns an actor for each function. Must be called inside a Tokio runtime.
    pub fn start(
        functions: Vec<Function>,
        api: Arc<dyn FunctionApi>,
        mailbox_size: usize,
    ) -> Self {
        let mut clients = Vec::with_capacity(functions.len());
        let mut handles = Vec::with_capacity(functions.len());

        for function in functions {
            let name = function.spec().function_name.clone();
            let (actor, client) = function_actor::with_mailbox(function, mailbox_size);
            handles.push(tokio::spawn(actor.run(api.clone())));
            clients.push((name, FunctionClient::new(client)));
        }

        info!(functions = clients.len(), "Fleet started");
        Self { clients, handles }
    }

    /// Builds every function of `manifest` with the manifest's retry policy and starts them.
    pub fn from_manifest(
        manifest: &Manifest,
        api: Arc<dyn FunctionApi>,
    ) -> Result<Self, FunctionError> {
        let functions = manifest
            .functions
            .iter()
            .map(|spec| {
                Function::new(spec.clone())
                    .map(|f| f.with_create_retry(manifest.settings.create_retry))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::start(functions, api, manifest.settings.mailbox_size))
    }

    /// Function names in manifest order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.clients.iter().map(|(name, _)| name.as_str())
    }

    pub fn client(&self, function_name: &str) -> Option<&FunctionClient> {
        self.clients
            .iter()
            .find(|(name, _)| name == function_name)
            .map(|(_, client)| client)
    }

    pub async fn reconcile_all(&self) -> FleetReport<ReconcileOutcome> {
        let mut report = Vec::with_capacity(self.clients.len());
        for (name, client) in &self.clients {
            let result = client.reconcile().await;
            match &result {
                Ok(outcome) => debug!(function_name = %name, ?outcome, "Reconciled"),
                Err(e) => warn!(function_name = %name, error = %e, "Reconcile failed"),
            }
            report.push((name.clone(), result));
        }
        report
    }

    pub async fn plan_all(&self) -> FleetReport<Plan<FunctionChanges>> {
        let mut report = Vec::with_capacity(self.clients.len());
        for (name, client) in &self.clients {
            let result = client.plan().await;
            if let Err(e) = &result {
                warn!(function_name = %name, error = %e, "Plan failed");
            }
            report.push((name.clone(), result));
        }
        report
    }

    pub async fn delete_all(&self) -> FleetReport<Deletion> {
        let mut report = Vec::with_capacity(self.clients.len());
        for (name, client) in &self.clients {
            let result = client.delete().await;
            match &result {
                Ok(deletion) => debug!(function_name = %name, ?deletion, "Deleted"),
                Err(e) => warn!(function_name = %name, error = %e, "Delete failed"),
            }
            report.push((name.clone(), result));
        }
        report
    }

    /// Gracefully shuts down every actor.
    ///
    /// Dropping the clients closes the mailboxes; each actor finishes its current request
    /// and exits its loop. Every actor is awaited; the first panic, if any, is returned.
    pub async fn shutdown(self) -> Result<(), JoinError> {
        info!("Shutting down fleet...");
        drop(self.clients);

        let mut first_failure = None;
        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Actor task failed: {:?}", e);
                first_failure.get_or_insert(e);
            }
        }

        match first_failure {
            Some(e) => Err(e),
            None => {
                info!("Fleet shutdown complete.");
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn test_shutdown_awaits_every_actor_after_a_panic() {
        let finished = Arc::new(AtomicBool::new(false));
        let flag = finished.clone();

        let fleet = FunctionFleet {
            clients: Vec::new(),
            handles: vec![
                tokio::spawn(async {
                    panic!("actor blew up");
                }),
                tokio::spawn(async move {
                    tokio::time::sleep(Duration::from_millis(20)).await;
                    flag.store(true, Ordering::SeqCst);
                }),
            ],
        };

        let err = fleet.shutdown().await.unwrap_err();
        assert!(err.is_panic());
        assert!(finished.load(Ordering::SeqCst));
    }
}
