use std::{
    any::{Any, TypeId},
    collections::HashMap,
    sync::Arc,
};

use graft_di::TypeInfo;

use crate::errors::ConfigError;

/// A provider to register all configs.
///
/// Configs can be registered and retrieved based on type.
/// Add the provider to a container with [Container::add_instance](graft_di::Container::add_instance)
/// to make its configs injectable through [Config](crate::config::Config).
#[derive(Default)]
pub struct ConfigProvider {
    configs: HashMap<TypeId, Arc<dyn Any + Send + Sync + 'static>>,
}

impl ConfigProvider {
    /// Initializes an empty Config Provider
    pub fn new() -> Self {
        Self {
            configs: HashMap::new(),
        }
    }

    /// Retrieve a config with specified type.
    ///
    /// Returns `None` if no config of this type was registered.
    pub fn get_config<T: Send + Sync + 'static>(&self) -> Result<Option<Arc<T>>, ConfigError> {
        self.configs
            .get(&TypeId::of::<T>())
            .map(|entry| entry.clone().downcast())
            .transpose()
            .map_err(|_| ConfigError::ConfigMismatch(TypeInfo::of::<T>()))
    }

    /// Add a config to the registry.
    ///
    /// If the config type is already registered, it will return a
    /// [`ConfigError`] runtime error
    pub fn add_config<T: Send + Sync + 'static>(
        &mut self,
        config: T,
    ) -> Result<&mut Self, ConfigError> {
        let type_id = TypeId::of::<T>();

        if self.configs.contains_key(&type_id) {
            return Err(ConfigError::ConfigAlreadyRegistered(TypeInfo::of::<T>()));
        }

        self.configs.insert(type_id, Arc::new(config));
        Ok(self)
    }

    /// Can optionally add a config to the registry.
    ///
    /// If the config provided is `Some(T)`, it will be the same as calling [`ConfigProvider::add_config`]
    /// If the config provided is `None`, then the function just returns `Ok(self)` for chaining
    pub fn maybe_add_config<T: Send + Sync + 'static>(
        &mut self,
        config: Option<T>,
    ) -> Result<&mut Self, ConfigError> {
        match config {
            Some(c) => self.add_config(c),
            None => Ok(self),
        }
    }

    pub fn len(&self) -> usize {
        self.configs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.configs.is_empty()
    }
}
