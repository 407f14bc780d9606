use crate::{container::Container, errors::InjectError};

pub mod arc;
pub mod transient;

/// Allows custom behaviour on injection
///
/// Implemented by everything a constructor or member injection pass can ask the container for.
pub trait Resolver {
    fn resolve(container: &Container) -> Result<Self, InjectError>
    where
        Self: Sized;
}
