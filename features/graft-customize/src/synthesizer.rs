//! Assembles types which extend a base implementation with capabilities.
//!
//! A synthesized value is an [Augmented]: the constructed base value plus one storage value per
//! capability. Its [TypeShape] exposes every view of the base and every capability interface, so
//! it can be used wherever the base could.

use std::{
    any::{type_name, TypeId},
    collections::HashMap,
    fmt::Debug,
    sync::Arc,
};

use graft_di::{
    shape::{member_injector, view_fn, view_mut_fn, MemberInjector},
    AnyValue, InjectError, Instance, ResolveError, ShapeId, TypeInfo, TypeShape, View,
};
use parking_lot::Mutex;

use crate::{
    capability::{CapabilityDescriptor, MemberKind},
    errors::CustomizeError,
};

/// Value stored by instances of synthesized types
pub struct Augmented {
    base: Box<AnyValue>,
    mixins: Vec<Box<AnyValue>>,
}
impl Augmented {
    pub fn base(&self) -> &AnyValue {
        &*self.base
    }

    /// Storage of the capability at `index` in the synthesized type's capability list
    pub fn mixin(&self, index: usize) -> Option<&AnyValue> {
        self.mixins.get(index).map(|mixin| &**mixin)
    }
}

/// Cache key of a synthesized type
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SynthesizedTypeKey {
    base: ShapeId,
    capabilities: Vec<TypeId>,
}
impl SynthesizedTypeKey {
    pub fn new(base: &TypeShape, capabilities: &[CapabilityDescriptor]) -> Self {
        SynthesizedTypeKey {
            base: base.id(),
            capabilities: capabilities.iter().map(|c| c.type_id()).collect(),
        }
    }

    pub fn base(&self) -> ShapeId {
        self.base
    }
}

/// A base type extended with a set of capabilities
pub struct SynthesizedType {
    key: SynthesizedTypeKey,
    base: Arc<TypeShape>,
    shape: Arc<TypeShape>,
    capabilities: Vec<CapabilityDescriptor>,
}
impl Debug for SynthesizedType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SynthesizedType")
            .field("name", &self.shape.name())
            .field("id", &self.shape.id())
            .field("base", &self.base.id())
            .finish()
    }
}

impl SynthesizedType {
    fn build(
        key: SynthesizedTypeKey,
        base: Arc<TypeShape>,
        capabilities: &[CapabilityDescriptor],
    ) -> Self {
        let mut name = base.name().to_string();
        let mut views: Vec<View> = Vec::new();

        let to_base = view_fn(|root| match root.downcast_ref::<Augmented>() {
            Some(augmented) => Some(&*augmented.base),
            None => None,
        });
        let to_base_mut = view_mut_fn(|root| match root.downcast_mut::<Augmented>() {
            Some(augmented) => Some(&mut *augmented.base),
            None => None,
        });
        views.extend(
            base.views()
                .iter()
                .map(|view| view.through(to_base.clone(), to_base_mut.clone())),
        );

        for (index, capability) in capabilities.iter().enumerate() {
            name.push('+');
            name.push_str(capability.name());

            let to_mixin = view_fn(move |root| {
                root.downcast_ref::<Augmented>()
                    .and_then(|augmented| augmented.mixins.get(index))
                    .map(|mixin| &**mixin)
            });
            let to_mixin_mut = view_mut_fn(move |root| {
                root.downcast_mut::<Augmented>()
                    .and_then(|augmented| augmented.mixins.get_mut(index))
                    .map(|mixin| &mut **mixin)
            });
            views.extend(
                capability
                    .views()
                    .iter()
                    .map(|view| view.through(to_mixin.clone(), to_mixin_mut.clone())),
            );
        }

        let injector = base.injector().cloned().map(lift_injector);
        let shape = TypeShape::synthesized(name, TypeInfo::of::<Augmented>(), views, injector);

        SynthesizedType {
            key,
            base,
            shape: Arc::new(shape),
            capabilities: capabilities.to_vec(),
        }
    }

    pub fn key(&self) -> &SynthesizedTypeKey {
        &self.key
    }

    /// Shape of the base implementation
    pub fn base(&self) -> &Arc<TypeShape> {
        &self.base
    }

    pub fn shape(&self) -> &Arc<TypeShape> {
        &self.shape
    }

    pub fn capabilities(&self) -> &[CapabilityDescriptor] {
        &self.capabilities
    }

    /// Wraps a constructed base instance, capabilities start with default storage
    pub fn instantiate(&self, base: Instance) -> Result<Instance, ResolveError> {
        if base.shape().id() != self.base.id() {
            return Err(CustomizeError::BaseMismatch {
                synthesized: self.shape.name().to_string(),
                instance: base.type_name().to_string(),
            }
            .into());
        }

        let (_, value) = base.into_parts();
        let mixins = self
            .capabilities
            .iter()
            .map(CapabilityDescriptor::create_storage)
            .collect();
        Instance::from_parts(self.shape.clone(), Box::new(Augmented { base: value, mixins }))
    }
}

/// Runs the base's member injection on the embedded base value
fn lift_injector(inner: MemberInjector) -> MemberInjector {
    member_injector(move |value, container| match value.downcast_mut::<Augmented>() {
        Some(augmented) => inner(&mut *augmented.base, container),
        None => Err(InjectError::TargetMismatch(type_name::<Augmented>())),
    })
}

/// Checks that `capabilities` can be added to `base`
fn validate(base: &TypeShape, capabilities: &[CapabilityDescriptor]) -> Result<(), CustomizeError> {
    if base.is_sealed() {
        return Err(CustomizeError::NonExtensibleBase {
            base: base.name().to_string(),
        });
    }

    // Interface -> what already provides it
    let mut provided_by: HashMap<TypeId, &str> = base
        .views()
        .iter()
        .flat_map(|view| view.interfaces().iter())
        .map(|interface| (interface.type_id, base.name()))
        .collect();
    let mut declared_by: HashMap<&'static str, &'static str> = HashMap::new();
    for capability in capabilities {
        let unsupported = |reason: String| CustomizeError::UnsupportedCapability {
            capability: capability.name(),
            base: base.name().to_string(),
            reason,
        };

        for interface in capability
            .views()
            .iter()
            .flat_map(|view| view.interfaces().iter())
        {
            if let Some(other) = provided_by.insert(interface.type_id, capability.name()) {
                return Err(unsupported(format!(
                    "interface '{}' is also provided by '{}'",
                    interface.type_name, other
                )));
            }
        }

        for member in capability.members() {

            if member.kind == MemberKind::Method {
                return Err(unsupported(format!(
                    "method '{}' has no storage backed implementation",
                    member.name
                )));
            }
            if let Some(other) = declared_by.insert(member.name, capability.name()) {
                return Err(unsupported(format!(
                    "member '{}' is also declared by '{}'",
                    member.name, other
                )));
            }
        }
    }
    Ok(())
}

/// Cache of synthesized types
///
/// The same base shape and capability list always yield the same synthesized type, also when
/// requested concurrently.
#[derive(Default)]
pub struct TypeSynthesizer {
    cache: Mutex<HashMap<SynthesizedTypeKey, Arc<SynthesizedType>>>,
}

impl TypeSynthesizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the type extending `base` with `capabilities`, synthesizing it on first use
    pub fn synthesize(
        &self,
        base: &Arc<TypeShape>,
        capabilities: &[CapabilityDescriptor],
    ) -> Result<Arc<SynthesizedType>, CustomizeError> {
        let key = SynthesizedTypeKey::new(base, capabilities);

        // Held across the miss so concurrent requests for one key agree on a single type
        let mut cache = self.cache.lock();
        if let Some(existing) = cache.get(&key) {
            tracing::trace!("Reusing synthesized type {}", existing.shape.name());
            return Ok(existing.clone());
        }

        if let Err(error) = validate(base, capabilities) {
            tracing::warn!("Can't synthesize a type from {}: {error}", base.name());
            return Err(error);
        }

        let synthesized = Arc::new(SynthesizedType::build(key.clone(), base.clone(), capabilities));
        tracing::debug!(
            "Synthesized {} ({})",
            synthesized.shape.name(),
            synthesized.shape.id()
        );
        cache.insert(key, synthesized.clone());
        Ok(synthesized)
    }

    pub fn get(&self, key: &SynthesizedTypeKey) -> Option<Arc<SynthesizedType>> {
        self.cache.lock().get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.cache.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.lock().is_empty()
    }
}
