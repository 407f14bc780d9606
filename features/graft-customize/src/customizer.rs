use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use graft_config::config::Config;
use graft_di::{
    Container, DynError, Extension, InjectError, Injectable, Resolver, TypeInfo,
};

use crate::{
    interceptor::CustomizationInterceptor, registry::CustomizationRegistry, spec::SpecBuilder,
    synthesizer::TypeSynthesizer,
};

/// Configuration of a [Customizer]
///
/// Picked up by [CustomizeExtension] when registered in a
/// [ConfigProvider](graft_config::provider::ConfigProvider).
#[derive(Debug, Clone, Default)]
pub struct CustomizeConfig {
    /// Whether customized types without their own setting run member injection
    pub default_build_up: bool,
}

/// Customizations of resolved types
///
/// Holds a spec per declared type, the default build-up policy, and the synthesized types.
/// The customizer is a cheap handle, clones share all state.
#[derive(Clone, Default)]
pub struct Customizer(Arc<CustomizerInner>);

#[derive(Default)]
struct CustomizerInner {
    registry: CustomizationRegistry,
    synthesizer: TypeSynthesizer,
    default_build_up: AtomicBool,
}

impl std::fmt::Debug for Customizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Customizer")
            .field("customized", &self.0.registry.len())
            .field("synthesized", &self.0.synthesizer.len())
            .field("default_build_up", &self.default_build_up())
            .finish()
    }
}

impl Customizer {
    pub fn new(config: CustomizeConfig) -> Self {
        Customizer(Arc::new(CustomizerInner {
            registry: CustomizationRegistry::new(),
            synthesizer: TypeSynthesizer::new(),
            default_build_up: AtomicBool::new(config.default_build_up),
        }))
    }

    /// Starts or continues customizing `T`
    pub fn setup<T: Injectable>(&self) -> SpecBuilder<T> {
        SpecBuilder::new(self.0.registry.setup(TypeInfo::of::<T>()))
    }

    /// Sets whether customized types without their own setting run member injection
    pub fn set_default_build_up(&self, enabled: bool) -> &Self {
        self.0.default_build_up.store(enabled, Ordering::SeqCst);
        tracing::debug!("Default build up set to {enabled}");
        self
    }

    pub fn default_build_up(&self) -> bool {
        self.0.default_build_up.load(Ordering::SeqCst)
    }

    pub fn is_customized<T: ?Sized + 'static>(&self) -> bool {
        self.0.registry.contains(TypeInfo::of::<T>().type_id)
    }

    pub fn registry(&self) -> &CustomizationRegistry {
        &self.0.registry
    }

    pub fn synthesizer(&self) -> &TypeSynthesizer {
        &self.0.synthesizer
    }

    /// Hooks this customizer into the container's resolutions
    ///
    /// Also adds it as an instance, so it can be injected. Install a customizer once per container.
    pub fn install(&self, container: &Container) -> &Self {
        container
            .add_interceptor(CustomizationInterceptor::new(self.clone()))
            .add_instance(self.clone());
        self
    }
}

/// The customizer installed in a container
impl Resolver for Customizer {
    fn resolve(container: &Container) -> Result<Self, InjectError> {
        Ok(container.require::<Customizer>()?.as_ref().clone())
    }
}

/// Installs a [Customizer] with [Container::add_extension]
///
/// Without an explicit customizer, a new one is created from the container's [CustomizeConfig],
/// or the default config if there is none.
#[derive(Default)]
pub struct CustomizeExtension {
    customizer: Option<Customizer>,
}

impl CustomizeExtension {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(customizer: Customizer) -> Self {
        CustomizeExtension {
            customizer: Some(customizer),
        }
    }
}

impl Extension for CustomizeExtension {
    fn initialize(self, container: &Container) -> Result<(), DynError> {
        let customizer = match self.customizer {
            Some(customizer) => customizer,
            None => {
                let config = container.inject::<Option<Config<CustomizeConfig>>>()?;
                Customizer::new(config.map(|c| (*c).clone()).unwrap_or_default())
            }
        };
        customizer.install(container);
        Ok(())
    }
}
