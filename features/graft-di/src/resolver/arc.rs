use std::sync::Arc;

use crate::{
    container::Container,
    errors::{InjectError, RequireError},
    resolver::Resolver,
    types::Injectable,
};

/// Shared instances added with [Container::add_instance]
impl<T: Injectable> Resolver for Arc<T> {
    fn resolve(container: &Container) -> Result<Self, InjectError> {
        Ok(container.require::<T>()?)
    }
}

impl<Resolvable: Resolver> Resolver for Option<Resolvable> {
    fn resolve(container: &Container) -> Result<Self, InjectError>
    where
        Self: Sized,
    {
        match Resolvable::resolve(container) {
            Ok(resolved) => Ok(Some(resolved)),
            Err(e) => match e {
                // If the required type is not registered Option does not fail
                InjectError::RequireError(RequireError::TypeMissing(_)) => Ok(None),
                _ => Err(e),
            },
        }
    }
}
