//! Desired vs observed comparison.
//!
//! Scalars and the network config compare by equality. Code compares by content hash.
//! Streams compare as sets and only ever grow.

use super::artifact::artifact_sha256;
use super::error::FunctionError;
use crate::model::{Change, CodeSource, FunctionChanges, FunctionSpec, ObservedFunction, Property};
use std::collections::HashSet;
use tracing::debug;

/// Computes the properties of `spec` that differ from `observed`.
///
/// Properties left unset in `spec` are not part of the desired state and never change.
pub async fn diff(
    spec: &FunctionSpec,
    observed: &ObservedFunction,
) -> Result<FunctionChanges, FunctionError> {
    let remote = &observed.configuration;
    let mut changes = FunctionChanges::new();

    compare(&mut changes, &spec.runtime, &remote.runtime, Change::Runtime);
    compare(&mut changes, &spec.handler, &remote.handler, Change::Handler);
    compare(&mut changes, &spec.role, &remote.role, Change::Role);
    compare(
        &mut changes,
        &spec.description,
        &remote.description,
        Change::Description,
    );
    compare(&mut changes, &spec.timeout, &remote.timeout, Change::Timeout);
    compare(
        &mut changes,
        &spec.memory_size,
        &remote.memory_size,
        Change::MemorySize,
    );
    compare(
        &mut changes,
        &spec.vpc_config,
        &remote.vpc_config,
        Change::VpcConfig,
    );

    // Candidate until the checksum says otherwise.
    if let Some(code) = &spec.code {
        changes.insert(Change::Code(code.clone()));
    }

    let additions = stream_additions(&spec.streams, &observed.streams);
    if !additions.is_empty() {
        changes.insert(Change::Streams(additions));
    }

    if changes.contains(Property::Code)
        && same_code(
            &spec.function_name,
            spec.code.as_ref(),
            remote.code_sha256.as_deref(),
        )
        .await?
    {
        debug!(function_name = %spec.function_name, "Code checksum matches, skipping upload");
        changes.remove(Property::Code);
    }

    Ok(changes)
}

fn compare<T: PartialEq + Clone>(
    changes: &mut FunctionChanges,
    desired: &Option<T>,
    observed: &Option<T>,
    change: fn(T) -> Change,
) {
    if let Some(want) = desired {
        if observed.as_ref() != Some(want) {
            changes.insert(change(want.clone()));
        }
    }
}

/// `true` when the local package hashes to `remote_sha256`.
///
/// No desired code, or no checksum on the remote side, is never "same".
pub async fn same_code(
    function_name: &str,
    code: Option<&CodeSource>,
    remote_sha256: Option<&str>,
) -> Result<bool, FunctionError> {
    match code {
        None => Ok(false),
        Some(CodeSource::S3 { .. }) => Err(FunctionError::UnsupportedCodeSource {
            function_name: function_name.to_string(),
        }),
        Some(CodeSource::ZipFile(path)) => match remote_sha256 {
            None => Ok(false),
            Some(remote) => Ok(artifact_sha256(path).await? == remote),
        },
    }
}

/// Desired streams that are not bound yet, in desired order, without duplicates.
pub fn stream_additions(desired: &[String], observed: &[String]) -> Vec<String> {
    let bound: HashSet<&str> = observed.iter().map(String::as_str).collect();
    let mut seen = HashSet::new();
    desired
        .iter()
        .filter(|arn| !bound.contains(arn.as_str()) && seen.insert(*arn))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::function_actor::artifact::code_sha256;
    use crate::model::{FunctionConfiguration, VpcConfig};
    use reconcile_framework::ChangeSet;
    use std::io::Write;

    fn observed(configuration: FunctionConfiguration, streams: &[&str]) -> ObservedFunction {
        ObservedFunction {
            configuration,
            streams: streams.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn zip(contents: &[u8]) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents).unwrap();
        file
    }

    #[tokio::test]
    async fn test_matching_checksum_suppresses_code() {
        let package = zip(b"v1");
        let mut spec = FunctionSpec::named("f1");
        spec.code = Some(CodeSource::zip_file(package.path()));
        spec.timeout = Some(60);

        let remote = FunctionConfiguration {
            function_name: "f1".into(),
            timeout: Some(30),
            code_sha256: Some(code_sha256(b"v1")),
            ..Default::default()
        };

        let changes = diff(&spec, &observed(remote, &[])).await.unwrap();
        assert_eq!(
            changes,
            [Change::Timeout(60)].into_iter().collect::<FunctionChanges>()
        );
    }

    #[tokio::test]
    async fn test_different_or_missing_checksum_keeps_code() {
        let package = zip(b"v2");
        let mut spec = FunctionSpec::named("f1");
        spec.code = Some(CodeSource::zip_file(package.path()));

        let stale = FunctionConfiguration {
            code_sha256: Some(code_sha256(b"v1")),
            ..Default::default()
        };
        let changes = diff(&spec, &observed(stale, &[])).await.unwrap();
        assert!(changes.contains(Property::Code));

        let unknown = FunctionConfiguration::default();
        let changes = diff(&spec, &observed(unknown, &[])).await.unwrap();
        assert!(changes.contains(Property::Code));
    }

    #[tokio::test]
    async fn test_no_desired_code_is_not_same() {
        assert!(!same_code("f1", None, Some("abc")).await.unwrap());
        assert!(!same_code("f1", None, None).await.unwrap());

        let spec = FunctionSpec::named("f1");
        let changes = diff(&spec, &observed(FunctionConfiguration::default(), &[]))
            .await
            .unwrap();
        assert!(changes.is_empty());
    }

    #[tokio::test]
    async fn test_unreadable_artifact_propagates() {
        let dir = tempfile::tempdir().unwrap();
        let mut spec = FunctionSpec::named("f1");
        spec.code = Some(CodeSource::zip_file(dir.path().join("gone.zip")));
        let remote = FunctionConfiguration {
            code_sha256: Some("abc".into()),
            ..Default::default()
        };

        let err = diff(&spec, &observed(remote, &[])).await.unwrap_err();
        assert!(matches!(err, FunctionError::Artifact { .. }));
    }

    #[tokio::test]
    async fn test_scalars_and_vpc_compare_exactly() {
        let mut spec = FunctionSpec::named("f1");
        spec.runtime = Some("python3.12".into());
        spec.handler = Some("app.handler".into());
        spec.vpc_config = Some(VpcConfig {
            subnet_ids: vec!["subnet-1".into()],
            security_group_ids: vec!["sg-1".into()],
        });

        let remote = FunctionConfiguration {
            runtime: Some("python3.12".into()),
            handler: Some("app.main".into()),
            memory_size: Some(512),
            vpc_config: Some(VpcConfig {
                subnet_ids: vec!["subnet-1".into()],
                security_group_ids: vec![],
            }),
            ..Default::default()
        };

        let changes = diff(&spec, &observed(remote, &[])).await.unwrap();
        assert_eq!(
            changes.properties().collect::<Vec<_>>(),
            vec![Property::Handler, Property::VpcConfig]
        );
    }

    #[tokio::test]
    async fn test_streams_only_add() {
        let mut spec = FunctionSpec::named("f1");
        spec.streams = vec!["arn:a".into(), "arn:b".into()];

        let changes = diff(&spec, &observed(FunctionConfiguration::default(), &["arn:a"]))
            .await
            .unwrap();
        assert_eq!(
            changes.get(Property::Streams),
            Some(&Change::Streams(vec!["arn:b".into()]))
        );

        // Extra remote bindings are never proposed for removal.
        spec.streams = vec!["arn:a".into()];
        let changes = diff(
            &spec,
            &observed(FunctionConfiguration::default(), &["arn:a", "arn:z"]),
        )
        .await
        .unwrap();
        assert!(changes.is_empty());
    }

    #[test]
    fn test_stream_additions_dedupes_in_desired_order() {
        let desired: Vec<String> = ["c", "a", "c", "b"].iter().map(|s| s.to_string()).collect();
        let observed = vec!["b".to_string()];
        assert_eq!(stream_additions(&desired, &observed), vec!["c", "a"]);
        assert!(stream_additions(&[], &observed).is_empty());
    }
}
