use graft_di::TypeInfo;

/// Errors when registering or retrieving configs
#[derive(thiserror::Error, Debug, Clone)]
pub enum ConfigError {
    /// The required Config is already registered
    #[error("The Config type '{0}' is already registered")]
    ConfigAlreadyRegistered(TypeInfo),
    /// The stored Config is not of the requested type
    #[error("The Config type '{0}' is stored with a different type")]
    ConfigMismatch(TypeInfo),
}
