use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Desired state of a function, as declared by the user.
///
/// Every field except `function_name` is optional: a field left unset is not part of the
/// desired state and is never compared or pushed to the remote side.
///
/// See [`Function`](crate::function_actor::Function) for the resource that reconciles it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FunctionSpec {
    /// Identity key. Immutable once the function exists.
    pub function_name: String,
    pub runtime: Option<String>,
    pub handler: Option<String>,
    /// Execution role ARN.
    pub role: Option<String>,
    pub code: Option<CodeSource>,
    pub description: Option<String>,
    /// Seconds.
    pub timeout: Option<u32>,
    /// Megabytes.
    pub memory_size: Option<u32>,
    pub vpc_config: Option<VpcConfig>,
    /// Event source ARNs (e.g. Kinesis or DynamoDB streams) that should trigger the function.
    #[serde(default)]
    pub streams: Vec<String>,
}

impl FunctionSpec {
    /// A spec with only the identity key set.
    pub fn named(function_name: impl Into<String>) -> Self {
        Self {
            function_name: function_name.into(),
            runtime: None,
            handler: None,
            role: None,
            code: None,
            description: None,
            timeout: None,
            memory_size: None,
            vpc_config: None,
            streams: Vec::new(),
        }
    }
}

/// Where the deployment package comes from. A local zip and object-store coordinates are
/// mutually exclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawCodeSource", into = "RawCodeSource")]
pub enum CodeSource {
    ZipFile(PathBuf),
    S3 {
        bucket: String,
        key: String,
        object_version: Option<String>,
    },
}

impl CodeSource {
    pub fn zip_file(path: impl Into<PathBuf>) -> Self {
        CodeSource::ZipFile(path.into())
    }
}

/// Flat on-disk shape of [`CodeSource`]: `{ zip_file = "..." }` or
/// `{ s3_bucket = "...", s3_key = "...", s3_object_version = "..." }`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawCodeSource {
    #[serde(skip_serializing_if = "Option::is_none")]
    zip_file: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    s3_bucket: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    s3_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    s3_object_version: Option<String>,
}

impl TryFrom<RawCodeSource> for CodeSource {
    type Error = String;

    fn try_from(raw: RawCodeSource) -> Result<Self, Self::Error> {
        match raw {
            RawCodeSource {
                zip_file: Some(path),
                s3_bucket: None,
                s3_key: None,
                s3_object_version: None,
            } => Ok(CodeSource::ZipFile(path)),
            RawCodeSource {
                zip_file: None,
                s3_bucket: Some(bucket),
                s3_key: Some(key),
                s3_object_version,
            } => Ok(CodeSource::S3 {
                bucket,
                key,
                object_version: s3_object_version,
            }),
            RawCodeSource {
                zip_file: Some(_), ..
            } => Err("code: zip_file cannot be combined with s3_* fields".to_string()),
            _ => Err("code: expected zip_file, or both s3_bucket and s3_key".to_string()),
        }
    }
}

impl From<CodeSource> for RawCodeSource {
    fn from(code: CodeSource) -> Self {
        match code {
            CodeSource::ZipFile(path) => RawCodeSource {
                zip_file: Some(path),
                ..Default::default()
            },
            CodeSource::S3 {
                bucket,
                key,
                object_version,
            } => RawCodeSource {
                zip_file: None,
                s3_bucket: Some(bucket),
                s3_key: Some(key),
                s3_object_version: object_version,
            },
        }
    }
}

/// Network placement of the function.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VpcConfig {
    #[serde(default)]
    pub subnet_ids: Vec<String>,
    #[serde(default)]
    pub security_group_ids: Vec<String>,
}
