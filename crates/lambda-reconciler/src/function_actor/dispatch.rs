//! Turning a change set into remote calls.
//!
//! Each change is routed by the phases its property carries in
//! [`METADATA`](crate::model::METADATA). Configuration fields are batched into a single
//! update-configuration request per pass.

use super::artifact::read_artifact;
use super::error::FunctionError;
use crate::model::{
    properties_with, Change, CodeSource, FunctionChanges, FunctionSpec, Phase, Property,
};
use crate::remote::{CreateFunctionRequest, FunctionApi, FunctionConfigUpdate, StartingPosition};
use tracing::{debug, info};

/// Builds the create call from the create-phase properties of `spec`.
///
/// The deployment package is read here, once, so retries resend the same bytes.
pub async fn create_request(spec: &FunctionSpec) -> Result<CreateFunctionRequest, FunctionError> {
    let mut request = CreateFunctionRequest {
        function_name: spec.function_name.clone(),
        runtime: None,
        handler: None,
        role: None,
        code: None,
    };

    for property in properties_with(Phase::Create) {
        match property {
            Property::Runtime => request.runtime = spec.runtime.clone(),
            Property::Handler => request.handler = spec.handler.clone(),
            Property::Role => request.role = spec.role.clone(),
            Property::Code => {
                request.code = match &spec.code {
                    Some(code) => Some(package(&spec.function_name, code).await?),
                    None => None,
                }
            }
            // The key is already set; nothing else rides on the create call.
            _ => {}
        }
    }
    Ok(request)
}

/// Issues the remote calls for `changes`.
///
/// There is no rollback: if a call fails, the calls before it stay applied and the next
/// pass picks up from there.
pub async fn apply(
    function_name: &str,
    changes: &FunctionChanges,
    api: &dyn FunctionApi,
) -> Result<(), FunctionError> {
    let mut config = FunctionConfigUpdate::default();

    for change in changes.iter() {
        let property = change.property();
        for phase in property.phases() {
            match phase {
                Phase::UpdateTriggers => bind_streams(function_name, change, api).await?,
                Phase::UpdateCode => replace_code(function_name, change, api).await?,
                Phase::UpdateConfig => {
                    if !config.set(change) {
                        return Err(misrouted(property, *phase));
                    }
                    debug!(%function_name, %property, "Queued configuration change");
                }
                Phase::Key | Phase::Create => {}
            }
        }
    }

    if !config.is_empty() {
        info!(%function_name, fields = config.len(), "Updating function configuration");
        api.update_function_configuration(function_name, &config).await?;
    }
    Ok(())
}

async fn bind_streams(
    function_name: &str,
    change: &Change,
    api: &dyn FunctionApi,
) -> Result<(), FunctionError> {
    let Change::Streams(arns) = change else {
        return Err(misrouted(change.property(), Phase::UpdateTriggers));
    };
    for arn in arns {
        info!(%function_name, event_source_arn = %arn, "Creating event source mapping");
        api.create_event_source_mapping(function_name, arn, StartingPosition::TrimHorizon).await?;
    }
    Ok(())
}

async fn replace_code(
    function_name: &str,
    change: &Change,
    api: &dyn FunctionApi,
) -> Result<(), FunctionError> {
    let Change::Code(code) = change else {
        return Err(misrouted(change.property(), Phase::UpdateCode));
    };
    let zip_file = package(function_name, code).await?;
    info!(%function_name, bytes = zip_file.len(), "Replacing function code");
    api.update_function_code(function_name, zip_file).await?;
    Ok(())
}

async fn package(function_name: &str, code: &CodeSource) -> Result<Vec<u8>, FunctionError> {
    match code {
        CodeSource::ZipFile(path) => read_artifact(path).await,
        CodeSource::S3 { .. } => Err(FunctionError::UnsupportedCodeSource {
            function_name: function_name.to_string(),
        }),
    }
}

fn misrouted(property: Property, phase: Phase) -> FunctionError {
    FunctionError::InvalidSpec(format!("{property} cannot be applied in phase {phase:?}"))
}
