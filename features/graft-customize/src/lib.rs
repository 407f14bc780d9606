//! Graft Customize changes what a [Container](graft_di::Container) hands out for a type, without
//! touching where that type is registered or constructed.
//!
//! For each declared type a [Customizer] records
//! 1. initializers - run on every resolved instance right after construction
//! 2. capabilities - additional interfaces the instance gains, backed by plain storage
//! 3. build up - whether the container's member injection runs on the instance
//!
//! Customizations are keyed on the declared type. The implementation the container currently maps
//! it to is looked up on every resolution, so a type can be remapped before or after it is customized.
//! Adding capabilities requires a new type: the [TypeSynthesizer] combines the current implementation
//! with the capabilities and caches the result, so the same combination always resolves to the same
//! type.
//!
//! # Example
//!
//! ```rust
//! use graft_customize::{Capability, CapabilityShape, CustomizeExtension, Customizer};
//! use graft_di::{implements, Component, Container, DynError};
//!
//! pub trait Tagged {
//!     fn tag(&self) -> &str;
//!     fn set_tag(&mut self, tag: &str);
//! }
//!
//! #[derive(Default)]
//! pub struct Tag {
//!     tag: String,
//! }
//! impl Tagged for Tag {
//!     fn tag(&self) -> &str {
//!         &self.tag
//!     }
//!     fn set_tag(&mut self, tag: &str) {
//!         self.tag = tag.to_string();
//!     }
//! }
//! impl Capability for Tag {
//!     fn describe(shape: &mut CapabilityShape<Self>) {
//!         implements!(shape, Self => dyn Tagged);
//!         shape.property::<String>("tag");
//!     }
//! }
//!
//! pub struct Customer {
//!     first_name: String,
//! }
//! impl Component for Customer {
//!     fn construct(_: &Container) -> Result<Self, DynError> {
//!         Ok(Customer { first_name: "Ada".into() })
//!     }
//! }
//!
//! let container = Container::new();
//! container.add_extension(CustomizeExtension::new()).unwrap();
//!
//! container
//!     .inject::<Customizer>()
//!     .unwrap()
//!     .setup::<Customer>()
//!     .initialize_with(|customer| customer.first_name = "custom".into())
//!     .extend_with::<Tag>();
//!
//! let mut customer = container.resolve::<Customer>().unwrap();
//! assert_eq!(customer.first_name, "custom");
//! assert!(!customer.instance().is_exactly::<Customer>());
//!
//! customer.interface_mut::<dyn Tagged>().unwrap().set_tag("vip");
//! assert_eq!(customer.interface::<dyn Tagged>().unwrap().tag(), "vip");
//! ```

pub mod capability;
pub mod customizer;
pub mod errors;
pub mod interceptor;
pub mod registry;
pub mod spec;
pub mod synthesizer;

pub use capability::{Capability, CapabilityDescriptor, CapabilityShape, Member, MemberKind};
pub use customizer::{CustomizeConfig, CustomizeExtension, Customizer};
pub use errors::CustomizeError;
pub use interceptor::CustomizationInterceptor;
pub use registry::CustomizationRegistry;
pub use spec::{BuildUp, CustomizationSpec, ResolutionPlan, SpecBuilder};
pub use synthesizer::{Augmented, SynthesizedType, SynthesizedTypeKey, TypeSynthesizer};
