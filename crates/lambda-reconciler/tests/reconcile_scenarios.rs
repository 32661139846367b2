use lambda_reconciler::clients::FunctionClient;
use lambda_reconciler::function_actor::artifact::code_sha256;
use lambda_reconciler::function_actor::{self, Function, FunctionError};
use lambda_reconciler::lifecycle::{FunctionFleet, Manifest};
use lambda_reconciler::model::{
    Change, CodeSource, FunctionChanges, FunctionConfiguration, FunctionSpec, Property,
};
use lambda_reconciler::remote::{
    ApiCall, CreateFunctionRequest, FunctionApi, FunctionConfigUpdate, RemoteError,
    SimulatedLambda, StartingPosition,
};
use reconcile_framework::{Deletion, Plan, ReconcileOutcome, ReconcilerHandle, RetryPolicy};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

const ROLE: &str = "arn:aws:iam::123456789012:role/exec";
const STREAM_A: &str = "arn:aws:kinesis:us-east-1:123456789012:stream/a";
const STREAM_B: &str = "arn:aws:kinesis:us-east-1:123456789012:stream/b";

// --- Helpers ---

fn start(spec: FunctionSpec, lambda: &Arc<SimulatedLambda>) -> FunctionClient {
    let function = Function::new(spec)
        .unwrap()
        .with_create_retry(RetryPolicy::new(100, Duration::ZERO));
    let (actor, client) = function_actor::new(function);
    let api: Arc<dyn FunctionApi> = lambda.clone();
    tokio::spawn(actor.run(api));
    FunctionClient::new(client)
}

fn package(dir: &TempDir, name: &str, contents: &[u8]) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

fn create_calls(lambda: &SimulatedLambda) -> usize {
    lambda
        .calls()
        .iter()
        .filter(|c| matches!(c, ApiCall::CreateFunction(_)))
        .count()
}

// --- Scenarios ---

#[tokio::test]
async fn test_absent_function_is_created_with_create_fields() {
    let dir = tempfile::tempdir().unwrap();
    let zip = package(&dir, "a.zip", b"bundle-v1");
    let lambda = Arc::new(SimulatedLambda::default());

    let mut spec = FunctionSpec::named("f1");
    spec.runtime = Some("python3.12".into());
    spec.code = Some(CodeSource::zip_file(&zip));
    let client = start(spec, &lambda);

    assert_eq!(client.plan().await.unwrap(), Plan::Create);
    assert_eq!(
        client.reconcile().await.unwrap(),
        ReconcileOutcome::Created { converged: 0 }
    );

    assert_eq!(
        lambda.mutations(),
        vec![ApiCall::CreateFunction(CreateFunctionRequest {
            function_name: "f1".into(),
            runtime: Some("python3.12".into()),
            handler: None,
            role: None,
            code: Some(b"bundle-v1".to_vec()),
        })]
    );
    let deployed = lambda.function("f1").unwrap();
    assert_eq!(deployed.code_sha256, Some(code_sha256(b"bundle-v1")));
}

#[tokio::test]
async fn test_matching_code_and_new_timeout_updates_config_only() {
    let dir = tempfile::tempdir().unwrap();
    let zip = package(&dir, "a.zip", b"bundle-v1");
    let lambda = Arc::new(SimulatedLambda::default());
    lambda.seed_function(FunctionConfiguration {
        function_name: "f1".into(),
        runtime: Some("python3.12".into()),
        timeout: Some(30),
        code_sha256: Some(code_sha256(b"bundle-v1")),
        ..Default::default()
    });

    let mut spec = FunctionSpec::named("f1");
    spec.runtime = Some("python3.12".into());
    spec.code = Some(CodeSource::zip_file(&zip));
    spec.timeout = Some(60);
    let client = start(spec, &lambda);

    let expected: FunctionChanges = [Change::Timeout(60)].into_iter().collect();
    assert_eq!(client.plan().await.unwrap(), Plan::Update(expected));
    assert_eq!(
        client.reconcile().await.unwrap(),
        ReconcileOutcome::Updated { changes: 1 }
    );

    assert_eq!(
        lambda.mutations(),
        vec![ApiCall::UpdateFunctionConfiguration {
            function_name: "f1".into(),
            update: FunctionConfigUpdate {
                timeout: Some(60),
                ..Default::default()
            },
        }]
    );
}

#[tokio::test]
async fn test_new_stream_is_bound_once() {
    let lambda = Arc::new(SimulatedLambda::default());
    lambda.seed_function(FunctionConfiguration {
        function_name: "f1".into(),
        ..Default::default()
    });
    lambda.seed_mapping("f1", STREAM_A);

    let mut spec = FunctionSpec::named("f1");
    spec.streams = vec![STREAM_A.into(), STREAM_B.into()];
    let client = start(spec, &lambda);

    match client.plan().await.unwrap() {
        Plan::Update(changes) => assert_eq!(
            changes.get(Property::Streams),
            Some(&Change::Streams(vec![STREAM_B.into()]))
        ),
        other => panic!("Expected update plan, got {other:?}"),
    }
    client.reconcile().await.unwrap();

    assert_eq!(
        lambda.mutations(),
        vec![ApiCall::CreateEventSourceMapping {
            function_name: "f1".into(),
            event_source_arn: STREAM_B.into(),
            starting_position: StartingPosition::TrimHorizon,
        }]
    );
    assert_eq!(lambda.streams("f1"), vec![STREAM_A, STREAM_B]);
}

#[tokio::test]
async fn test_create_converges_update_only_fields_in_same_pass() {
    let lambda = Arc::new(SimulatedLambda::default());
    let mut spec = FunctionSpec::named("f1");
    spec.role = Some(ROLE.into());
    spec.timeout = Some(60);
    spec.streams = vec![STREAM_A.into()];
    let client = start(spec, &lambda);

    assert_eq!(
        client.reconcile().await.unwrap(),
        ReconcileOutcome::Created { converged: 2 }
    );

    let mutations = lambda.mutations();
    assert_eq!(mutations.len(), 3);
    assert!(matches!(mutations[0], ApiCall::CreateFunction(_)));
    assert!(mutations.contains(&ApiCall::CreateEventSourceMapping {
        function_name: "f1".into(),
        event_source_arn: STREAM_A.into(),
        starting_position: StartingPosition::TrimHorizon,
    }));
    assert_eq!(lambda.function("f1").unwrap().timeout, Some(60));
}

#[tokio::test]
async fn test_second_pass_is_a_no_op() {
    let dir = tempfile::tempdir().unwrap();
    let zip = package(&dir, "a.zip", b"bundle-v1");
    let lambda = Arc::new(SimulatedLambda::default());

    let mut spec = FunctionSpec::named("f1");
    spec.runtime = Some("nodejs20.x".into());
    spec.handler = Some("index.handler".into());
    spec.role = Some(ROLE.into());
    spec.code = Some(CodeSource::zip_file(&zip));
    spec.description = Some("ingest".into());
    spec.memory_size = Some(512);
    spec.streams = vec![STREAM_A.into(), STREAM_B.into()];
    let client = start(spec, &lambda);

    client.reconcile().await.unwrap();
    lambda.clear_calls();

    assert_eq!(client.reconcile().await.unwrap(), ReconcileOutcome::Unchanged);
    assert_eq!(client.plan().await.unwrap(), Plan::InSync);
    assert!(lambda.mutations().is_empty());
}

#[tokio::test]
async fn test_drift_and_new_code_are_repaired() {
    let dir = tempfile::tempdir().unwrap();
    let zip = package(&dir, "a.zip", b"bundle-v1");
    let lambda = Arc::new(SimulatedLambda::default());

    let mut spec = FunctionSpec::named("f1");
    spec.code = Some(CodeSource::zip_file(&zip));
    spec.memory_size = Some(256);
    let client = start(spec, &lambda);
    client.reconcile().await.unwrap();

    // Someone changes memory out of band, and a new build lands on disk.
    let drift = FunctionConfigUpdate {
        memory_size: Some(1024),
        ..Default::default()
    };
    lambda
        .update_function_configuration("f1", &drift)
        .await
        .unwrap();
    std::fs::write(&zip, b"bundle-v2").unwrap();
    lambda.clear_calls();

    assert_eq!(
        client.reconcile().await.unwrap(),
        ReconcileOutcome::Updated { changes: 2 }
    );
    let deployed = lambda.function("f1").unwrap();
    assert_eq!(deployed.memory_size, Some(256));
    assert_eq!(deployed.code_sha256, Some(code_sha256(b"bundle-v2")));
    assert_eq!(lambda.mutations().len(), 2);
}

#[tokio::test]
async fn test_extra_remote_streams_are_left_alone() {
    let lambda = Arc::new(SimulatedLambda::default());
    lambda.seed_function(FunctionConfiguration {
        function_name: "f1".into(),
        ..Default::default()
    });
    lambda.seed_mapping("f1", STREAM_A);
    lambda.seed_mapping("f1", STREAM_B);

    let mut spec = FunctionSpec::named("f1");
    spec.streams = vec![STREAM_A.into()];
    let client = start(spec, &lambda);

    assert_eq!(client.reconcile().await.unwrap(), ReconcileOutcome::Unchanged);
    assert_eq!(lambda.streams("f1"), vec![STREAM_A, STREAM_B]);
}

// --- Creation retry ---

#[tokio::test]
async fn test_always_transient_create_gives_up_at_ceiling() {
    let lambda = Arc::new(SimulatedLambda::default());
    lambda.fail_creates(RemoteError::InvalidParameterValue(
        "The role defined for the function cannot be assumed".into(),
    ));
    let client = start(FunctionSpec::named("f1"), &lambda);

    match client.reconcile().await {
        Err(FunctionError::TookTooLong {
            function_name,
            attempts,
        }) => {
            assert_eq!(function_name, "f1");
            assert_eq!(attempts, 100);
        }
        other => panic!("Expected TookTooLong, got {other:?}"),
    }
    assert_eq!(create_calls(&lambda), 100);
    assert!(lambda.function("f1").is_none());
}

#[tokio::test]
async fn test_fatal_create_error_is_not_retried() {
    let lambda = Arc::new(SimulatedLambda::default());
    lambda.fail_creates(RemoteError::AccessDenied("lambda:CreateFunction".into()));
    let client = start(FunctionSpec::named("f1"), &lambda);

    let err = client.reconcile().await.unwrap_err();
    assert!(matches!(
        err,
        FunctionError::Remote(RemoteError::AccessDenied(_))
    ));
    assert_eq!(create_calls(&lambda), 1);
}

#[tokio::test]
async fn test_create_succeeds_once_role_propagates() {
    let lambda = Arc::new(SimulatedLambda::default());
    lambda.fail_next_creates(3, RemoteError::InvalidParameterValue("role not ready".into()));
    let client = start(FunctionSpec::named("f1"), &lambda);

    assert_eq!(
        client.reconcile().await.unwrap(),
        ReconcileOutcome::Created { converged: 0 }
    );
    assert_eq!(create_calls(&lambda), 4);
}

#[tokio::test]
async fn test_missing_artifact_aborts_before_create() {
    let dir = tempfile::tempdir().unwrap();
    let lambda = Arc::new(SimulatedLambda::default());
    let mut spec = FunctionSpec::named("f1");
    spec.code = Some(CodeSource::zip_file(dir.path().join("missing.zip")));
    let client = start(spec, &lambda);

    let err = client.reconcile().await.unwrap_err();
    assert!(matches!(err, FunctionError::Artifact { .. }));
    assert_eq!(create_calls(&lambda), 0);
}

// --- Deletion ---

#[tokio::test]
async fn test_delete_then_recreate() {
    let lambda = Arc::new(SimulatedLambda::default());
    let client = start(FunctionSpec::named("f1"), &lambda);

    assert_eq!(client.delete().await.unwrap(), Deletion::AlreadyAbsent);
    client.reconcile().await.unwrap();
    assert_eq!(client.delete().await.unwrap(), Deletion::Deleted);
    assert!(client.observe().await.unwrap().is_none());

    assert_eq!(
        client.reconcile().await.unwrap(),
        ReconcileOutcome::Created { converged: 0 }
    );
}

// --- Fleet ---

#[tokio::test]
async fn test_fleet_from_manifest() {
    let dir = tempfile::tempdir().unwrap();
    package(&dir, "ingest.zip", b"ingest");
    let manifest_path = dir.path().join("reconciler.toml");
    std::fs::write(
        &manifest_path,
        format!(
            r#"
            [settings.create_retry]
            max_attempts = 3
            wait = "1ms"

            [[function]]
            function_name = "ingest"
            runtime = "python3.12"
            code = {{ zip_file = "ingest.zip" }}
            streams = ["{STREAM_A}"]

            [[function]]
            function_name = "report"
            timeout = 120
            "#
        ),
    )
    .unwrap();

    let manifest = Manifest::load(&manifest_path).unwrap();
    let lambda = Arc::new(SimulatedLambda::new(manifest.settings.region.clone()));
    let fleet = FunctionFleet::from_manifest(&manifest, lambda.clone()).unwrap();
    assert_eq!(fleet.names().collect::<Vec<_>>(), vec!["ingest", "report"]);

    let plans = fleet.plan_all().await;
    assert!(plans
        .iter()
        .all(|(_, plan)| matches!(plan, Ok(Plan::Create))));

    let outcomes: Vec<_> = fleet
        .reconcile_all()
        .await
        .into_iter()
        .map(|(name, r)| (name, r.unwrap()))
        .collect();
    assert_eq!(
        outcomes,
        vec![
            ("ingest".to_string(), ReconcileOutcome::Created { converged: 1 }),
            ("report".to_string(), ReconcileOutcome::Created { converged: 1 }),
        ]
    );

    let second = fleet.reconcile_all().await;
    assert!(second
        .iter()
        .all(|(_, r)| matches!(r, Ok(ReconcileOutcome::Unchanged))));

    let report = fleet.client("report").unwrap();
    assert_eq!(report.delete().await.unwrap(), Deletion::Deleted);
    let deletions = fleet.delete_all().await;
    assert!(matches!(deletions[0].1, Ok(Deletion::Deleted)));
    assert!(matches!(deletions[1].1, Ok(Deletion::AlreadyAbsent)));

    fleet.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_fleet_isolates_failures() {
    let manifest = Manifest::from_toml_str(
        r#"
        [settings.create_retry]
        max_attempts = 2
        wait = "0s"

        [[function]]
        function_name = "good"

        [[function]]
        function_name = "blocked"
        code = { zip_file = "/nonexistent/blocked.zip" }
        "#,
    )
    .unwrap();
    let lambda = Arc::new(SimulatedLambda::default());
    let fleet = FunctionFleet::from_manifest(&manifest, lambda.clone()).unwrap();

    let report = fleet.reconcile_all().await;
    assert!(matches!(
        report[0].1,
        Ok(ReconcileOutcome::Created { converged: 0 })
    ));
    assert!(matches!(report[1].1, Err(FunctionError::Artifact { .. })));
    assert!(lambda.function("good").is_some());

    fleet.shutdown().await.unwrap();
}
