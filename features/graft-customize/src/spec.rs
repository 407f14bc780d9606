use std::{fmt::Debug, marker::PhantomData, sync::Arc};

use graft_di::{Injectable, Instance, TypeInfo};
use parking_lot::RwLock;

use crate::{
    capability::{Capability, CapabilityDescriptor},
    errors::CustomizeError,
};

/// Action run on a freshly constructed instance
pub type Initializer = Arc<dyn Fn(&mut Instance) -> Result<(), CustomizeError> + Send + Sync>;

/// Whether the member injection pass runs on customized instances
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BuildUp {
    /// Use the customizer's default
    #[default]
    Inherit,
    Enabled,
    Disabled,
}
impl BuildUp {
    /// The effective flag given the customizer's default
    pub fn resolve(self, default: bool) -> bool {
        match self {
            BuildUp::Inherit => default,
            BuildUp::Enabled => true,
            BuildUp::Disabled => false,
        }
    }
}
impl From<bool> for BuildUp {
    fn from(enabled: bool) -> Self {
        if enabled {
            BuildUp::Enabled
        } else {
            BuildUp::Disabled
        }
    }
}

/// Customizations of one declared type
#[derive(Default)]
pub struct CustomizationSpec {
    initializers: Vec<Initializer>,
    capabilities: Vec<CapabilityDescriptor>,
    build_up: BuildUp,
}
impl Debug for CustomizationSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CustomizationSpec")
            .field("initializers", &self.initializers.len())
            .field("capabilities", &self.capabilities)
            .field("build_up", &self.build_up)
            .finish()
    }
}

impl CustomizationSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an initializer, initializers run in the order they were added
    pub fn initialize_with(&mut self, initializer: Initializer) -> &mut Self {
        self.initializers.push(initializer);
        self
    }

    /// Adds a capability, adding one twice does nothing
    pub fn extend_with(&mut self, capability: CapabilityDescriptor) -> &mut Self {
        if !self.capabilities.contains(&capability) {
            self.capabilities.push(capability);
        }
        self
    }

    pub fn build_up(&mut self, enabled: bool) -> &mut Self {
        self.build_up = enabled.into();
        self
    }

    pub fn build_up_override(&self) -> BuildUp {
        self.build_up
    }

    pub fn capabilities(&self) -> &[CapabilityDescriptor] {
        &self.capabilities
    }

    pub fn initializer_count(&self) -> usize {
        self.initializers.len()
    }

    /// Snapshot used by a single resolution
    pub fn plan(&self) -> ResolutionPlan {
        ResolutionPlan {
            initializers: self.initializers.clone(),
            capabilities: self.capabilities.clone(),
            build_up: self.build_up,
        }
    }
}

/// What a single resolution applies to the constructed instance
#[derive(Clone)]
pub struct ResolutionPlan {
    pub initializers: Vec<Initializer>,
    pub capabilities: Vec<CapabilityDescriptor>,
    pub build_up: BuildUp,
}

/// Typed builder for the customizations of `T`
///
/// Returned by [Customizer::setup](crate::customizer::Customizer::setup). Every call is recorded
/// immediately, the builder may be dropped at any point.
pub struct SpecBuilder<T> {
    spec: Arc<RwLock<CustomizationSpec>>,
    _marker: PhantomData<fn(T)>,
}
impl<T: Injectable> SpecBuilder<T> {
    pub(crate) fn new(spec: Arc<RwLock<CustomizationSpec>>) -> Self {
        SpecBuilder {
            spec,
            _marker: PhantomData,
        }
    }

    /// Runs `action` on every resolved `T` after construction, before member injection
    pub fn initialize_with<F>(self, action: F) -> Self
    where
        F: Fn(&mut T) + Send + Sync + 'static,
    {
        let initializer: Initializer = Arc::new(move |instance: &mut Instance| {
            if let Some(target) = instance.get_mut::<T>() {
                action(target);
                return Ok(());
            }
            Err(CustomizeError::InitializerTarget {
                declared: TypeInfo::of::<T>(),
                instance: instance.type_name().to_string(),
            })
        });
        self.spec.write().initialize_with(initializer);
        self
    }

    /// Makes every resolved `T` implement the capability `C`
    pub fn extend_with<C: Capability>(self) -> Self {
        let capability = CapabilityDescriptor::of::<C>();
        self.spec.write().extend_with(capability);
        self
    }

    /// Overrides whether member injection runs on resolved `T`s
    pub fn build_up(self, enabled: bool) -> Self {
        self.spec.write().build_up(enabled);
        self
    }

    pub fn spec(&self) -> &Arc<RwLock<CustomizationSpec>> {
        &self.spec
    }
}
