use std::{
    any::{type_name, TypeId},
    collections::HashMap,
    fmt::Debug,
    sync::Arc,
};

use parking_lot::RwLock;

use crate::{
    errors::{InjectError, RegistrationError, RequireError, ResolveError},
    factories::{Component, ComponentFactory, DynFactory, InstanceFactory},
    instance::{Instance, Resolved},
    intercept::{Extension, Interceptor, Next, ResolveRequest},
    resolver::Resolver,
    shape::TypeShape,
    types::{AnyValue, DynError, Injectable, TypeInfo},
};

/// A type the container knows how to construct
struct Registration {
    shape: Arc<TypeShape>,
    factory: Arc<dyn DynFactory>,
}

/// Container resolving instances
///
/// The container is a cheap handle, clones share all registrations.
/// Registrations, mappings and interceptors may be changed at any time - each resolution uses the
/// state at the moment it runs.
#[derive(Clone)]
pub struct Container(pub Arc<ContainerInner>);
pub struct ContainerInner {
    /// Constructible types
    registrations: RwLock<HashMap<TypeId, Arc<Registration>>>,
    /// Declared type -> current implementation
    mappings: RwLock<HashMap<TypeId, TypeInfo>>,
    /// Shared instances
    instances: RwLock<HashMap<TypeId, (TypeInfo, Arc<AnyValue>)>>,
    interceptors: RwLock<Vec<Arc<dyn Interceptor>>>,
}
impl Debug for Container {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut map = f.debug_struct("Container");
        let mappings = self.0.mappings.read();
        for registration in self.0.registrations.read().values() {
            let val = if registration.shape.is_sealed() {
                "sealed"
            } else {
                "registered"
            };
            map.field(registration.shape.name(), &val);
        }
        for (info, _) in self.0.instances.read().values() {
            map.field(info.type_name, &"instance");
        }
        for implementation in mappings.values() {
            map.field(implementation.type_name, &"mapped");
        }
        map.finish()
    }
}
impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}

impl Container {
    pub fn new() -> Self {
        Self(Arc::new(ContainerInner {
            registrations: RwLock::new(HashMap::new()),
            mappings: RwLock::new(HashMap::new()),
            instances: RwLock::new(HashMap::new()),
            interceptors: RwLock::new(Vec::new()),
        }))
    }
}

// Registrations
impl Container {
    /// Makes `T` constructible using [Component::construct]
    ///
    /// Does nothing if `T` is already registered.
    pub fn register<T: Component>(&self) -> &Self {
        self.ensure_registered::<T>();
        self
    }

    /// Makes the factory's product constructible using the factory
    ///
    /// Replaces any previous constructor, the type keeps its identity.
    pub fn register_factory<Factory: InstanceFactory + 'static>(&self, factory: Factory) -> &Self {
        let info = Factory::supplies();
        let mut registrations = self.0.registrations.write();
        let shape = match registrations.get(&info.type_id) {
            Some(existing) => existing.shape.clone(),
            None => Arc::new(TypeShape::of::<Factory::Provides>()),
        };
        registrations.insert(
            info.type_id,
            Arc::new(Registration {
                shape,
                factory: Arc::new(factory),
            }),
        );
        tracing::debug!("Registered factory for {}", info.type_name);
        self
    }

    /// Adds a shared instance, which can be required with [Container::require]
    pub fn add_instance<T: Injectable>(&self, instance: T) -> &Self {
        let info = TypeInfo::of::<T>();
        self.0
            .instances
            .write()
            .insert(info.type_id, (info, Arc::new(instance)));
        tracing::debug!("Added instance of {}", info.type_name);
        self
    }

    /// Maps the declared type `From` to the implementation `To`
    ///
    /// Resolving `From` afterwards constructs a `To`. Calling this again replaces the mapping.
    pub fn map<From: Injectable, To: Component>(&self) -> Result<&Self, RegistrationError> {
        let declared = TypeInfo::of::<From>();
        let implementation = self.ensure_registered::<To>();
        if !implementation.shape.is_viewable_as(declared.type_id) {
            return Err(RegistrationError::NotAssignable {
                declared,
                implementation: TypeInfo::of::<To>(),
            });
        }

        self.0
            .mappings
            .write()
            .insert(declared.type_id, TypeInfo::of::<To>());
        tracing::debug!("Mapped {} to {}", declared, type_name::<To>());
        Ok(self)
    }

    /// Removes the mapping of `From`, returns the previous implementation
    pub fn unmap<From: Injectable>(&self) -> Option<TypeInfo> {
        self.0.mappings.write().remove(&TypeId::of::<From>())
    }

    /// Returns the type currently constructed when `declared` is resolved
    pub fn implementation_of(&self, declared: TypeInfo) -> TypeInfo {
        self.0
            .mappings
            .read()
            .get(&declared.type_id)
            .copied()
            .unwrap_or(declared)
    }

    pub fn is_registered(&self, info: TypeInfo) -> bool {
        self.0.registrations.read().contains_key(&info.type_id)
    }

    /// Returns the shape of a registered type
    pub fn shape_of(&self, implementation: TypeInfo) -> Result<Arc<TypeShape>, ResolveError> {
        Ok(self.registration(implementation)?.shape.clone())
    }

    /// Registers an interceptor, it runs after all previously registered ones
    pub fn add_interceptor(&self, interceptor: impl Interceptor) -> &Self {
        self.0.interceptors.write().push(Arc::new(interceptor));
        self
    }

    pub fn add_extension<E: Extension>(&self, extension: E) -> Result<&Self, DynError> {
        extension.initialize(self)?;
        tracing::debug!("Initialized extension {}", type_name::<E>());
        Ok(self)
    }

    fn ensure_registered<T: Component>(&self) -> Arc<Registration> {
        let info = TypeInfo::of::<T>();
        if let Some(existing) = self.0.registrations.read().get(&info.type_id) {
            return existing.clone();
        }

        let mut registrations = self.0.registrations.write();
        registrations
            .entry(info.type_id)
            .or_insert_with(|| {
                tracing::debug!("Registered {}", info.type_name);
                Arc::new(Registration {
                    shape: Arc::new(TypeShape::of::<T>()),
                    factory: Arc::new(ComponentFactory::<T>::default()),
                })
            })
            .clone()
    }

    fn registration(&self, info: TypeInfo) -> Result<Arc<Registration>, ResolveError> {
        match self.0.registrations.read().get(&info.type_id) {
            Some(registration) => Ok(registration.clone()),
            None => {
                tracing::error!("Tried to construct an unregistered type: {}", info.type_name);
                Err(ResolveError::NotRegistered(info))
            }
        }
    }
}

// Resolution
impl Container {
    /// Resolves `T`, constructing its current implementation
    ///
    /// Registers `T` if it is not known yet.
    pub fn resolve<T: Component>(&self) -> Result<Resolved<T>, ResolveError> {
        self.ensure_registered::<T>();
        let instance = self.resolve_instance(TypeInfo::of::<T>())?;
        Resolved::new(instance)
    }

    /// Resolves a declared type through all interceptors
    pub fn resolve_instance(&self, declared: TypeInfo) -> Result<Instance, ResolveError> {
        // Interceptors may register further interceptors - don't hold the lock while running them
        let interceptors = self.0.interceptors.read().clone();
        let request = ResolveRequest {
            container: self,
            declared,
        };
        Next::new(request, &interceptors).proceed()
    }

    /// Default resolution - construct the current implementation and inject its members
    pub(crate) fn resolve_default(&self, declared: TypeInfo) -> Result<Instance, ResolveError> {
        let implementation = self.implementation_of(declared);
        let mut instance = self.construct(implementation)?;
        self.perform_member_injection(&mut instance)?;
        Ok(instance)
    }

    /// Constructs a registered type using its constructor, without running member injection
    pub fn construct(&self, implementation: TypeInfo) -> Result<Instance, ResolveError> {
        let registration = self.registration(implementation)?;
        let value = registration
            .factory
            .construct(self)
            .map_err(|error| ResolveError::FactoryFailed {
                product: implementation,
                error: Arc::new(error),
            })?;

        tracing::trace!("Constructed instance of {}", implementation.type_name);
        Instance::from_parts(registration.shape.clone(), value)
    }

    /// Runs the member injection pass of the instance's type
    pub fn perform_member_injection(&self, instance: &mut Instance) -> Result<(), ResolveError> {
        let Some(injector) = instance.shape().injector().cloned() else {
            return Ok(());
        };

        injector(instance.value_mut(), self).map_err(|error| ResolveError::MemberInjection {
            target: instance.type_name().to_string(),
            error,
        })
    }

    /// Attempts to get a shared instance
    pub fn require<T: Injectable>(&self) -> Result<Arc<T>, RequireError> {
        let instance = match self.0.instances.read().get(&TypeId::of::<T>()) {
            Some((_, instance)) => instance.clone(),
            None => return Err(RequireError::TypeMissing(type_name::<T>())),
        };

        instance
            .downcast::<T>()
            .map_err(|_| RequireError::DowncastFailed {
                required_type: type_name::<T>(),
                actual_type: "unknown",
            })
    }

    /// Resolves a dependency using its [Resolver]
    pub fn inject<T: Resolver>(&self) -> Result<T, InjectError> {
        T::resolve(self)
    }
}
