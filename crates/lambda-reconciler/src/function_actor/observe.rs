//! Fetching the actual state of a function.

use super::error::FunctionError;
use crate::model::ObservedFunction;
use crate::remote::FunctionApi;
use tracing::debug;

/// Describes `function_name` and resolves its trigger bindings.
///
/// A function the service does not know is `Ok(None)`, not an error.
pub async fn fetch(
    api: &dyn FunctionApi,
    function_name: &str,
) -> Result<Option<ObservedFunction>, FunctionError> {
    let configuration = match api.get_function_configuration(function_name).await {
        Ok(configuration) => configuration,
        Err(e) if e.is_not_found() => {
            debug!(%function_name, "Function not found");
            return Ok(None);
        }
        Err(e) => return Err(e.into()),
    };

    let streams = resolve_streams(api, function_name).await?;
    Ok(Some(ObservedFunction {
        configuration,
        streams,
    }))
}

/// Source ARNs of every event source mapping of `function_name`, in the order the
/// service lists them.
///
/// Listing only yields opaque handles, so this costs one extra lookup per mapping. A
/// mapping deleted between the two calls is skipped.
pub async fn resolve_streams(
    api: &dyn FunctionApi,
    function_name: &str,
) -> Result<Vec<String>, FunctionError> {
    let handles = api.list_event_source_mappings(function_name).await?;
    let mut streams = Vec::with_capacity(handles.len());
    for handle in handles {
        match api.get_event_source_mapping(&handle.uuid).await {
            Ok(mapping) => streams.push(mapping.event_source_arn),
            Err(e) if e.is_not_found() => {
                debug!(%function_name, uuid = %handle.uuid, "Event source mapping vanished");
            }
            Err(e) => return Err(e.into()),
        }
    }
    debug!(%function_name, count = streams.len(), "Resolved event source mappings");
    Ok(streams)
}
