//! # Framework Errors
//!
//! This module defines the common error types used throughout the reconcile framework.
//! Resource errors cross the actor boundary boxed; typed clients recover them with
//! [`FrameworkError::downcast_resource`].

/// Errors that can occur within the reconcile framework itself.
#[derive(Debug, thiserror::Error)]
pub enum FrameworkError {
    #[error("Actor closed")]
    ActorClosed,
    #[error("Actor dropped response channel")]
    ActorDropped,
    #[error("Resource error: {0}")]
    ResourceError(Box<dyn std::error::Error + Send + Sync>),
}

impl FrameworkError {
    /// Recovers the concrete resource error, or hands `self` back unchanged.
    pub fn downcast_resource<E>(self) -> Result<E, Self>
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        match self {
            FrameworkError::ResourceError(inner) => inner
                .downcast::<E>()
                .map(|e| *e)
                .map_err(FrameworkError::ResourceError),
            other => Err(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, thiserror::Error)]
    #[error("boom")]
    struct Boom;

    #[derive(Debug, thiserror::Error)]
    #[error("other")]
    struct Other;

    #[test]
    fn test_downcast_resource() {
        let err = FrameworkError::ResourceError(Box::new(Boom));
        assert!(err.downcast_resource::<Boom>().is_ok());

        let err = FrameworkError::ResourceError(Box::new(Other));
        let back = err.downcast_resource::<Boom>().unwrap_err();
        assert_eq!(back.to_string(), "Resource error: other");

        let err = FrameworkError::ActorClosed;
        assert!(matches!(
            err.downcast_resource::<Boom>(),
            Err(FrameworkError::ActorClosed)
        ));
    }
}
