//! Graft DI is a small runtime dependency injection container.
//!
//! Types are registered as [Component]s and resolved on demand - every resolution constructs a new
//! instance. The container keeps a runtime description ([TypeShape]) of each type so instances can be
//! viewed as their supertypes and cast to the interfaces they implement.
//!
//! Graft DI consists of the following parts:
//! 1. [Container] - registrations, mappings from declared types to implementations and resolution
//! 2. [Component] / [InstanceFactory] - how a type is constructed and injected
//! 3. [Shape] / [TypeShape] - which types and interfaces a type can be used as
//! 4. [Interceptor] / [Extension] - hooks into the resolution of instances
//! 5. [Resolver] - typed lookups used by constructors and member injection
//!
//! # Example
//!
//! ```rust
//! use graft_di::{implements, Component, Container, DynError, InjectError, Shape};
//!
//! trait Named {
//!     fn name(&self) -> &str;
//! }
//!
//! #[derive(Default)]
//! struct Customer {
//!     first_name: String,
//! }
//! impl Named for Customer {
//!     fn name(&self) -> &str {
//!         &self.first_name
//!     }
//! }
//! impl Component for Customer {
//!     fn construct(_: &Container) -> Result<Self, DynError> {
//!         Ok(Customer { first_name: "Ada".into() })
//!     }
//!
//!     fn describe(shape: &mut Shape<Self>) {
//!         implements!(shape, Self => dyn Named);
//!     }
//! }
//!
//! struct VipCustomer {
//!     customer: Customer,
//!     container: Option<Container>,
//! }
//! impl Component for VipCustomer {
//!     fn construct(container: &Container) -> Result<Self, DynError> {
//!         Ok(VipCustomer { customer: Customer::construct(container)?, container: None })
//!     }
//!
//!     fn describe(shape: &mut Shape<Self>) {
//!         shape.extends::<Customer>(|vip| &vip.customer, |vip| &mut vip.customer);
//!     }
//!
//!     fn inject_members(&mut self, container: &Container) -> Result<(), InjectError> {
//!         self.container = Some(container.inject()?);
//!         Ok(())
//!     }
//! }
//!
//! let container = Container::new();
//! container.map::<Customer, VipCustomer>().unwrap();
//!
//! let customer = container.resolve::<Customer>().unwrap();
//! assert_eq!(customer.first_name, "Ada");
//! assert!(customer.instance().is::<VipCustomer>());
//! assert_eq!(customer.interface::<dyn Named>().unwrap().name(), "Ada");
//! ```

pub mod container;
pub mod errors;
pub mod factories;
pub mod instance;
pub mod intercept;
pub mod resolver;
pub mod shape;
pub mod types;

pub use container::Container;
pub use errors::{InjectError, RegistrationError, RequireError, ResolveError};
pub use factories::{Component, ComponentFactory, DynFactory, InstanceFactory};
pub use instance::{Instance, Resolved};
pub use intercept::{Extension, Interceptor, Next, ResolveRequest};
pub use resolver::Resolver;
pub use shape::{Interfaces, Shape, ShapeId, TypeShape, View};
pub use types::{AnyValue, DynError, Injectable, TypeInfo};
