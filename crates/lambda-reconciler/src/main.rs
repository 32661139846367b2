//! # Lambda Reconciler CLI
//!
//! Loads a manifest, starts one reconciler per function and runs the requested
//! operation against every function:
//!
//! ```bash
//! lambda-reconciler --manifest functions.toml              # one reconcile pass
//! lambda-reconciler --manifest functions.toml --passes 2   # second pass is a no-op
//! lambda-reconciler --manifest functions.toml --plan       # dry run
//! lambda-reconciler --manifest functions.toml --delete
//! ```
//!
//! The remote side is the in-memory [`SimulatedLambda`]; wiring a real SDK client means
//! implementing [`FunctionApi`](lambda_reconciler::remote::FunctionApi) for it.

use anyhow::{bail, Context};
use clap::Parser;
use lambda_reconciler::lifecycle::{FunctionFleet, Manifest};
use lambda_reconciler::remote::SimulatedLambda;
use reconcile_framework::tracing::setup_tracing;
use reconcile_framework::Plan;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Parser)]
#[command(
    name = "lambda-reconciler",
    version,
    about = "Reconcile cloud functions against a manifest"
)]
struct Cli {
    /// Path to the TOML manifest.
    #[arg(short, long, env = "RECONCILER_MANIFEST")]
    manifest: PathBuf,

    /// Number of reconcile passes to run.
    #[arg(long, default_value_t = 1)]
    passes: u32,

    /// Print the pending actions without applying them.
    #[arg(long, conflicts_with = "delete")]
    plan: bool,

    /// Delete every function in the manifest.
    #[arg(long)]
    delete: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    setup_tracing();
    let cli = Cli::parse();

    let manifest = Manifest::load(&cli.manifest)
        .with_context(|| format!("Failed to load {}", cli.manifest.display()))?;
    info!(functions = manifest.functions.len(), region = %manifest.settings.region, "Starting");

    let api = Arc::new(SimulatedLambda::new(manifest.settings.region.clone()));
    let fleet = FunctionFleet::from_manifest(&manifest, api.clone())?;
    let mut failed = 0;

    if cli.plan {
        for (name, result) in fleet.plan_all().await {
            match result {
                Ok(Plan::Create) => println!("{name}: create"),
                Ok(Plan::InSync) => println!("{name}: in sync"),
                Ok(Plan::Update(changes)) => {
                    let properties: Vec<_> = changes.properties().map(|p| p.name()).collect();
                    println!("{name}: update {}", properties.join(", "));
                }
                Err(e) => {
                    failed += 1;
                    println!("{name}: error: {e}");
                }
            }
        }
    } else if cli.delete {
        for (name, result) in fleet.delete_all().await {
            match result {
                Ok(deletion) => println!("{name}: {deletion:?}"),
                Err(e) => {
                    failed += 1;
                    println!("{name}: error: {e}");
                }
            }
        }
    } else {
        for pass in 1..=cli.passes {
            info!(pass, "Reconcile pass");
            for (name, result) in fleet.reconcile_all().await {
                match result {
                    Ok(outcome) => println!("pass {pass}: {name}: {outcome:?}"),
                    Err(e) => {
                        failed += 1;
                        println!("pass {pass}: {name}: error: {e}");
                    }
                }
            }
        }
    }

    info!(
        remote_calls = api.calls().len(),
        mutations = api.mutations().len(),
        "Done"
    );
    fleet.shutdown().await?;

    if failed > 0 {
        bail!("{failed} request(s) failed");
    }
    Ok(())
}
