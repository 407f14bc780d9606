use std::{any::type_name, ops::Deref, sync::Arc};

use graft_di::{Container, InjectError, RequireError, Resolver};

use crate::provider::ConfigProvider;

/// A wrapper type to allow for config injections
///
/// This provides a simple way to retrieve configs from the config registry,
/// and inject them in a constructor as a dependency
///
/// # Example
/// ```rust
/// use graft_config::{config::Config, provider::ConfigProvider};
/// use graft_di::{Component, Container, DynError};
///
/// pub struct GreeterConfig {
///     greeting: String,
/// }
///
/// pub struct Greeter {
///     greeting: String,
/// }
/// impl Component for Greeter {
///     fn construct(container: &Container) -> Result<Self, DynError> {
///         let config = container.inject::<Config<GreeterConfig>>()?;
///         Ok(Greeter { greeting: config.greeting.clone() })
///     }
/// }
///
/// let mut provider = ConfigProvider::new();
/// provider.add_config(GreeterConfig { greeting: "hello".into() }).unwrap();
///
/// let container = Container::new();
/// container.add_instance(provider);
/// assert_eq!(container.resolve::<Greeter>().unwrap().greeting, "hello");
/// ```
pub struct Config<T> {
    inner: Arc<T>,
}
impl<T> Deref for Config<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}
impl<T> Config<T> {
    pub fn inner(&self) -> Arc<T> {
        self.inner.clone()
    }

    pub fn into_inner(self) -> Arc<T> {
        self.inner
    }
}

impl<T: Send + Sync + 'static> Resolver for Config<T> {
    fn resolve(container: &Container) -> Result<Self, InjectError>
    where
        Self: Sized,
    {
        let config_name = type_name::<T>();
        let config_provider = container.inject::<Arc<ConfigProvider>>()?;

        let config: Arc<T> = config_provider
            .get_config()
            .map_err(|e| InjectError::Other(Box::new(e)))?
            .ok_or(InjectError::RequireError(RequireError::TypeMissing(
                config_name,
            )))?;

        Ok(Config { inner: config })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct LimitsConfig {
        max_items: usize,
    }

    #[test]
    fn config_resolves_from_provider() {
        let mut provider = ConfigProvider::new();
        provider.add_config(LimitsConfig { max_items: 3 }).unwrap();
        let container = Container::new();
        container.add_instance(provider);

        let config = container.inject::<Config<LimitsConfig>>().unwrap();
        assert_eq!(config.max_items, 3);
    }

    #[test]
    fn missing_config_is_optional() {
        let container = Container::new();
        assert!(container
            .inject::<Option<Config<LimitsConfig>>>()
            .unwrap()
            .is_none());

        container.add_instance(ConfigProvider::new());
        assert!(container
            .inject::<Option<Config<LimitsConfig>>>()
            .unwrap()
            .is_none());
    }
}
