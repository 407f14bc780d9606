use crate::{
    container::Container,
    errors::InjectError,
    factories::Component,
    instance::Resolved,
    resolver::Resolver,
};

/// Injects the container itself
impl Resolver for Container {
    fn resolve(container: &Container) -> Result<Self, InjectError> {
        Ok(container.clone())
    }
}

/// Resolves a fresh instance, running all interceptors
impl<T: Component> Resolver for Resolved<T> {
    fn resolve(container: &Container) -> Result<Self, InjectError> {
        Ok(container.resolve::<T>()?)
    }
}
