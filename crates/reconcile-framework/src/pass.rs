//! # Reconciliation Pass
//!
//! One pass is `observe -> (create | diff -> apply)`. The functions here are what the
//! [`ReconcilerActor`](crate::ReconcilerActor) runs for each request; they are public so a
//! resource can also be driven directly in tests.

use crate::resource::{ChangeSet, ManagedResource};
use tracing::{debug, info};

/// What a reconciliation pass did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// The resource was absent and has been provisioned. `converged` counts the
    /// properties applied by the follow-up update right after creation.
    Created { converged: usize },
    /// The resource existed and `changes` properties were applied.
    Updated { changes: usize },
    /// Desired and observed state already agreed.
    Unchanged,
}

/// What a pass *would* do. Produced by [`plan`] without mutating anything.
#[derive(Debug, Clone, PartialEq)]
pub enum Plan<C> {
    Create,
    Update(C),
    InSync,
}

/// Runs one full pass for `resource`.
///
/// When the resource is absent it is created, then observed again so that properties
/// the create call cannot carry (update-only fields, trigger bindings) are applied in
/// the same pass.
pub async fn reconcile<T: ManagedResource>(
    resource: &T,
    ctx: &T::Context,
) -> Result<ReconcileOutcome, T::Error> {
    let key = resource.key();
    let Some(observed) = resource.observe(ctx).await? else {
        info!(%key, "Resource absent, creating");
        resource.create(ctx).await?;

        let converged = match resource.observe(ctx).await? {
            Some(observed) => {
                let changes = resource.diff(&observed, ctx).await?;
                if !changes.is_empty() {
                    debug!(%key, ?changes, "Applying post-create changes");
                    resource.apply(&changes, ctx).await?;
                }
                changes.len()
            }
            None => 0,
        };
        return Ok(ReconcileOutcome::Created { converged });
    };

    let changes = resource.diff(&observed, ctx).await?;
    if changes.is_empty() {
        debug!(%key, "In sync");
        return Ok(ReconcileOutcome::Unchanged);
    }

    debug!(%key, ?changes, "Applying changes");
    resource.apply(&changes, ctx).await?;
    Ok(ReconcileOutcome::Updated {
        changes: changes.len(),
    })
}

/// Dry run: reports what [`reconcile`] would do.
pub async fn plan<T: ManagedResource>(
    resource: &T,
    ctx: &T::Context,
) -> Result<Plan<T::Changes>, T::Error> {
    match resource.observe(ctx).await? {
        None => Ok(Plan::Create),
        Some(observed) => {
            let changes = resource.diff(&observed, ctx).await?;
            if changes.is_empty() {
                Ok(Plan::InSync)
            } else {
                Ok(Plan::Update(changes))
            }
        }
    }
}
