//! Error taxonomy of the remote function service.

/// A failed remote call, classified by the service's error code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RemoteError {
    #[error("Resource not found: {0}")]
    ResourceNotFound(String),

    /// Also returned while a freshly created execution role is still propagating.
    #[error("Invalid parameter value: {0}")]
    InvalidParameterValue(String),

    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Resource conflict: {0}")]
    ResourceConflict(String),

    #[error("{code}: {message}")]
    Service { code: String, message: String },
}

impl RemoteError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, RemoteError::ResourceNotFound(_))
    }

    /// Errors a create call can return while its dependencies are still becoming visible.
    pub fn is_propagation_delay(&self) -> bool {
        matches!(self, RemoteError::InvalidParameterValue(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        assert!(RemoteError::ResourceNotFound("f1".into()).is_not_found());
        assert!(!RemoteError::AccessDenied("f1".into()).is_not_found());

        let role = RemoteError::InvalidParameterValue("role cannot be assumed".into());
        assert!(role.is_propagation_delay());
        assert!(!RemoteError::ResourceConflict("f1".into()).is_propagation_delay());
        assert!(!RemoteError::Service {
            code: "ServiceException".into(),
            message: "boom".into()
        }
        .is_propagation_delay());
    }
}
