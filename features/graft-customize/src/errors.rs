use graft_di::{ResolveError, TypeInfo};

/// Errors raised while customizing a resolution
///
/// They reach callers of [Container::resolve](graft_di::Container::resolve) as
/// [ResolveError::Extension], use [ResolveError::extension_error] to get them back.
#[derive(thiserror::Error, Debug, Clone)]
pub enum CustomizeError {
    /// The capability has members which can not be backed by plain storage
    #[error("Capability '{capability}' can not be added to '{base}' - {reason}")]
    UnsupportedCapability {
        capability: &'static str,
        base: String,
        reason: String,
    },
    /// The base implementation can not be derived from
    #[error("'{base}' is sealed and can not be extended")]
    NonExtensibleBase { base: String },
    /// An initializer was handed an instance which is not a view of its declared type
    #[error("Initializer for '{declared}' can not be applied to '{instance}'")]
    InitializerTarget { declared: TypeInfo, instance: String },
    /// A synthesized type was asked to wrap an instance of another base
    #[error("Synthesized type '{synthesized}' can not wrap an instance of '{instance}'")]
    BaseMismatch {
        synthesized: String,
        instance: String,
    },
}

impl From<CustomizeError> for ResolveError {
    fn from(error: CustomizeError) -> Self {
        ResolveError::extension(error)
    }
}
