use std::sync::Arc;

use thiserror::Error;

use crate::types::{DynError, TypeInfo};

/// Errors while resolving an instance
#[derive(Error, Debug)]
pub enum ResolveError {
    /// No constructor is known for the type
    #[error("No constructor is registered for '{0}'")]
    NotRegistered(TypeInfo),
    /// A Factory failed to build
    #[error("Factory for '{product}' failed - error: {error}")]
    FactoryFailed {
        product: TypeInfo,
        error: Arc<DynError>,
    },
    /// The member injection pass failed
    #[error("Member injection for '{target}' failed - error: {error}")]
    MemberInjection {
        target: String,
        #[source]
        error: InjectError,
    },
    /// The resolved instance can not be used as the requested type
    #[error("'{instance}' can not be used as '{required}'")]
    NotAssignable {
        instance: String,
        required: TypeInfo,
    },
    /// An extension hooked into the resolution failed
    #[error(transparent)]
    Extension(DynError),
}
impl ResolveError {
    /// Wraps an error raised by an extension
    pub fn extension(error: impl Into<DynError>) -> Self {
        Self::Extension(error.into())
    }

    /// Returns the extension error if it is of type `E`
    pub fn extension_error<E: std::error::Error + 'static>(&self) -> Option<&E> {
        match self {
            Self::Extension(error) => error.downcast_ref::<E>(),
            _ => None,
        }
    }
}

#[derive(Error, Debug)]
pub enum InjectError {
    /// Could not require the type
    #[error(transparent)]
    RequireError(#[from] RequireError),
    /// A transient dependency could not be resolved
    #[error(transparent)]
    Resolve(Box<ResolveError>),
    /// The injection pass was handed a value of another type
    #[error("Member injection expected a '{0}'")]
    TargetMismatch(&'static str),
    /// Generic error during Injection
    #[error("Error during injection: {0}")]
    Other(DynError),
}
impl From<ResolveError> for InjectError {
    fn from(error: ResolveError) -> Self {
        Self::Resolve(Box::new(error))
    }
}

/// Errors when trying to require a certain type
#[derive(thiserror::Error, Debug, Clone)]
pub enum RequireError {
    /// The required type is not known
    #[error("The required type '{0}' is not known.")]
    TypeMissing(&'static str),

    #[error("Failed to downcast, required: '{required_type}' actual: '{actual_type}'")]
    DowncastFailed {
        required_type: &'static str,
        actual_type: &'static str,
    },
}

/// Errors while changing the registrations of a container
#[derive(thiserror::Error, Debug, Clone)]
pub enum RegistrationError {
    /// The implementation can not be used where the declared type is expected
    #[error("'{implementation}' can not be used as '{declared}' - declare it with `Shape::extends`")]
    NotAssignable {
        declared: TypeInfo,
        implementation: TypeInfo,
    },
}
