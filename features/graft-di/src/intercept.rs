//! Hooks around the resolution of instances
//!
//! Every call to [Container::resolve_instance] runs through the registered [Interceptor]s in
//! registration order. An interceptor either produces the instance itself or hands the request on
//! with [Next::proceed]. After the last interceptor, the container's default resolution runs:
//! 1. look up the current implementation of the requested type
//! 2. construct it
//! 3. run its member injection pass

use std::sync::Arc;

use crate::{
    container::Container,
    errors::ResolveError,
    instance::Instance,
    types::{DynError, TypeInfo},
};

/// A single resolution request
#[derive(Debug, Clone, Copy)]
pub struct ResolveRequest<'a> {
    /// The container the request was made on
    pub container: &'a Container,
    /// The type the caller asked for
    pub declared: TypeInfo,
}

/// Hook invoked around every resolution
pub trait Interceptor: Send + Sync + 'static {
    fn intercept(&self, request: &ResolveRequest<'_>, next: Next<'_>) -> Result<Instance, ResolveError>;
}

/// The remainder of the interceptor chain
pub struct Next<'a> {
    request: ResolveRequest<'a>,
    chain: &'a [Arc<dyn Interceptor>],
}
impl<'a> Next<'a> {
    pub(crate) fn new(request: ResolveRequest<'a>, chain: &'a [Arc<dyn Interceptor>]) -> Self {
        Next { request, chain }
    }

    /// Continues the resolution with the next interceptor, or the container's default resolution
    pub fn proceed(self) -> Result<Instance, ResolveError> {
        match self.chain.split_first() {
            Some((interceptor, rest)) => {
                let request = self.request;
                interceptor.intercept(&request, Next::new(request, rest))
            }
            None => self.request.container.resolve_default(self.request.declared),
        }
    }
}

/// Bundles container customizations so they can be installed at once
pub trait Extension {
    /// Installs the extension - usually registers interceptors and instances
    fn initialize(self, container: &Container) -> Result<(), DynError>;
}
