use std::marker::PhantomData;

use crate::{
    container::Container,
    errors::InjectError,
    shape::Shape,
    types::{AnyValue, DynError, Injectable, TypeInfo},
};

/// A concrete type the container can construct
pub trait Component: Injectable + Sized {
    /// Constructs a new instance, resolving constructor dependencies from the container
    fn construct(container: &Container) -> Result<Self, DynError>;

    /// Declares supertypes and interfaces of this type
    fn describe(shape: &mut Shape<Self>) {
        let _ = shape;
    }

    /// Member injection pass - populates dependencies which are not constructor arguments
    ///
    /// Must be idempotent, the container may run it more than once on the same instance.
    fn inject_members(&mut self, container: &Container) -> Result<(), InjectError> {
        let _ = container;
        Ok(())
    }
}

/// A Factory providing instances of a given type
///
/// Replaces the [Component::construct] constructor of the provided type when registered.
pub trait InstanceFactory: Send + Sync {
    type Provides: Component;

    /// Returns the typeinfo about the factory's provided type
    fn supplies() -> TypeInfo {
        TypeInfo::of::<Self::Provides>()
    }

    /// Constructs a new instance of the factory's provided type
    ///
    /// Returns the constructed instance, or an error if either Dependencies are not satisfied or the Instantiation failed
    fn construct(
        &self,
        container: &Container,
    ) -> Result<Self::Provides, impl Into<DynError>>;
}

/// Wrapper Trait for factories, providing type erased instances
pub trait DynFactory: Send + Sync {
    fn supplies(&self) -> TypeInfo;

    /// Constructs a new instance of the factory's provided type, fulfilling all its dependencies
    fn construct(&self, container: &Container) -> Result<Box<AnyValue>, DynError>;
}
// Impl DynFactory for any InstanceFactory
impl<T: Component, SpecificFactory: InstanceFactory<Provides = T>> DynFactory for SpecificFactory {
    fn supplies(&self) -> TypeInfo {
        SpecificFactory::supplies()
    }

    fn construct(&self, container: &Container) -> Result<Box<AnyValue>, DynError> {
        // Forward the call to the specific implementation
        SpecificFactory::construct(self, container)
            .map(|instance| Box::new(instance) as Box<AnyValue>)
            .map_err(|e| e.into())
    }
}

/// Factory using the [Component::construct] constructor
pub struct ComponentFactory<T>(PhantomData<fn() -> T>);
impl<T> Default for ComponentFactory<T> {
    fn default() -> Self {
        ComponentFactory(PhantomData)
    }
}
impl<T: Component> InstanceFactory for ComponentFactory<T> {
    type Provides = T;

    #[allow(refining_impl_trait)]
    fn construct(&self, container: &Container) -> Result<T, DynError> {
        T::construct(container)
    }
}
