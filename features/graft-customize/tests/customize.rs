use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use graft_customize::{
    Capability, CapabilityShape, CustomizeError, CustomizeExtension, Customizer,
};
use graft_di::{
    implements, Component, Container, DynError, InjectError, InstanceFactory, ResolveError, Shape,
};

pub trait IMixin {
    fn mixin_property(&self) -> &str;
    fn set_mixin_property(&mut self, value: &str);
}

#[derive(Default)]
pub struct Mixin {
    mixin_property: String,
}
impl IMixin for Mixin {
    fn mixin_property(&self) -> &str {
        &self.mixin_property
    }
    fn set_mixin_property(&mut self, value: &str) {
        self.mixin_property = value.to_string();
    }
}
impl Capability for Mixin {
    fn describe(shape: &mut CapabilityShape<Self>) {
        implements!(shape, Self => dyn IMixin);
        shape.property::<String>("mixin_property");
    }
}

pub trait IAudited {
    fn audited(&self) -> bool;
}

#[derive(Default)]
pub struct Audit {
    audited: bool,
}
impl IAudited for Audit {
    fn audited(&self) -> bool {
        self.audited
    }
}
impl Capability for Audit {
    fn describe(shape: &mut CapabilityShape<Self>) {
        implements!(shape, Self => dyn IAudited);
        shape.property::<bool>("audited");
    }
}

/// Provides the same interface as [Mixin]
#[derive(Default)]
pub struct OtherMixin {
    value: String,
}
impl IMixin for OtherMixin {
    fn mixin_property(&self) -> &str {
        &self.value
    }
    fn set_mixin_property(&mut self, value: &str) {
        self.value = value.to_string();
    }
}
impl Capability for OtherMixin {
    fn describe(shape: &mut CapabilityShape<Self>) {
        implements!(shape, Self => dyn IMixin);
        shape.property::<String>("value");
    }
}

#[derive(Default)]
pub struct ConflictingMixin;
impl Capability for ConflictingMixin {
    fn describe(shape: &mut CapabilityShape<Self>) {
        shape.property::<u32>("mixin_property");
    }
}

#[derive(Default)]
pub struct Notifier;
impl Capability for Notifier {
    fn describe(shape: &mut CapabilityShape<Self>) {
        shape.method("notify");
    }
}

pub struct Customer {
    first_name: String,
    container: Option<Container>,
}
impl Component for Customer {
    fn construct(_: &Container) -> Result<Self, DynError> {
        Ok(Customer {
            first_name: String::new(),
            container: None,
        })
    }

    fn inject_members(&mut self, container: &Container) -> Result<(), InjectError> {
        self.container = Some(container.inject()?);
        Ok(())
    }
}

pub struct ExtendedCustomer {
    customer: Customer,
    loyalty_points: u32,
}
impl Component for ExtendedCustomer {
    fn construct(container: &Container) -> Result<Self, DynError> {
        Ok(ExtendedCustomer {
            customer: Customer::construct(container)?,
            loyalty_points: 100,
        })
    }

    fn describe(shape: &mut Shape<Self>) {
        shape.extends::<Customer>(|e| &e.customer, |e| &mut e.customer);
    }

    fn inject_members(&mut self, container: &Container) -> Result<(), InjectError> {
        self.customer.inject_members(container)
    }
}

pub struct SealedCustomer {
    customer: Customer,
}
impl Component for SealedCustomer {
    fn construct(container: &Container) -> Result<Self, DynError> {
        Ok(SealedCustomer {
            customer: Customer::construct(container)?,
        })
    }

    fn describe(shape: &mut Shape<Self>) {
        shape
            .extends::<Customer>(|s| &s.customer, |s| &mut s.customer)
            .sealed();
    }
}

/// Takes a constructor dependency
pub struct Storefront {
    name: Arc<String>,
}
impl Component for Storefront {
    fn construct(container: &Container) -> Result<Self, DynError> {
        Ok(Storefront {
            name: container.inject()?,
        })
    }
}

fn customized_container() -> (Container, Customizer) {
    let container = Container::new();
    container.add_extension(CustomizeExtension::new()).unwrap();
    let customizer = container.inject::<Customizer>().unwrap();
    (container, customizer)
}

#[test]
fn uncustomized_types_resolve_to_the_mapped_type() {
    let (container, _) = customized_container();
    container.map::<Customer, ExtendedCustomer>().unwrap();

    let customer = container.resolve::<Customer>().unwrap();
    assert!(customer.instance().is_exactly::<ExtendedCustomer>());
    // the container's own member injection still runs
    assert!(customer.container.is_some());
}

#[test]
fn initializer_only_keeps_the_type() {
    let (container, customizer) = customized_container();
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    customizer.setup::<Customer>().initialize_with(move |customer| {
        counter.fetch_add(1, Ordering::SeqCst);
        customer.first_name.push_str("custom");
    });

    let customer = container.resolve::<Customer>().unwrap();
    assert!(customer.instance().is_exactly::<Customer>());
    assert_eq!(customer.first_name, "custom");
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    container.resolve::<Customer>().unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn capability_changes_the_type() {
    let (container, customizer) = customized_container();
    customizer
        .setup::<Customer>()
        .initialize_with(|customer| customer.first_name = "custom".into())
        .extend_with::<Mixin>();

    let mut customer = container.resolve::<Customer>().unwrap();
    assert_eq!(customer.first_name, "custom");
    assert!(!customer.instance().is_exactly::<Customer>());
    assert!(customer.instance().is::<Customer>());
    assert!(customer.instance().implements::<dyn IMixin>());

    let mixin = customer.interface_mut::<dyn IMixin>().unwrap();
    assert_eq!(mixin.mixin_property(), "");
    mixin.set_mixin_property("set");
    assert_eq!(
        customer.interface::<dyn IMixin>().unwrap().mixin_property(),
        "set"
    );
}

#[test]
fn mapping_before_extending() {
    let (container, customizer) = customized_container();
    container.map::<Customer, ExtendedCustomer>().unwrap();
    customizer.setup::<Customer>().extend_with::<Mixin>();

    let customer = container.resolve::<Customer>().unwrap();
    assert!(customer.instance().is::<ExtendedCustomer>());
    assert!(customer.instance().implements::<dyn IMixin>());
    assert_eq!(customer.get::<ExtendedCustomer>().unwrap().loyalty_points, 100);
}

#[test]
fn mapping_after_extending() {
    let (container, customizer) = customized_container();
    customizer.setup::<Customer>().extend_with::<Mixin>();
    container.map::<Customer, ExtendedCustomer>().unwrap();

    let customer = container.resolve::<Customer>().unwrap();
    assert!(customer.instance().is::<ExtendedCustomer>());
    assert!(customer.instance().implements::<dyn IMixin>());
}

#[test]
fn remapping_after_resolution_yields_a_new_type() {
    let (container, customizer) = customized_container();
    customizer.setup::<Customer>().extend_with::<Mixin>();

    let before = container.resolve::<Customer>().unwrap();
    container.map::<Customer, ExtendedCustomer>().unwrap();
    let after = container.resolve::<Customer>().unwrap();

    assert!(!before.instance().same_type(after.instance()));
    assert!(!before.instance().is::<ExtendedCustomer>());
    assert!(after.instance().is::<ExtendedCustomer>());
    assert_eq!(customizer.synthesizer().len(), 2);
}

#[test]
fn repeated_resolutions_share_the_synthesized_type() {
    let (container, customizer) = customized_container();
    customizer
        .setup::<Customer>()
        .extend_with::<Mixin>()
        .extend_with::<Audit>();

    let mut first = container.resolve::<Customer>().unwrap();
    let second = container.resolve::<Customer>().unwrap();
    assert!(first.instance().same_type(second.instance()));
    assert!(second.instance().implements::<dyn IAudited>());
    assert!(!second.interface::<dyn IAudited>().unwrap().audited());

    first.first_name = "only the first".into();
    first
        .interface_mut::<dyn IMixin>()
        .unwrap()
        .set_mixin_property("first");
    assert_eq!(second.first_name, "");
    assert_eq!(
        second.interface::<dyn IMixin>().unwrap().mixin_property(),
        ""
    );
    assert_eq!(customizer.synthesizer().len(), 1);
}

#[test]
fn extending_twice_is_a_no_op() {
    let (container, customizer) = customized_container();
    customizer.setup::<Customer>().extend_with::<Mixin>();
    let first = container.resolve::<Customer>().unwrap();

    customizer.setup::<Customer>().extend_with::<Mixin>();
    let second = container.resolve::<Customer>().unwrap();
    assert!(first.instance().same_type(second.instance()));
}

#[test]
fn build_up_is_off_by_default() {
    let (container, customizer) = customized_container();
    customizer.setup::<Customer>().extend_with::<Mixin>();

    let customer = container.resolve::<Customer>().unwrap();
    assert!(customer.container.is_none());
}

#[test]
fn default_build_up_applies_to_customized_types() {
    let (container, customizer) = customized_container();
    customizer.set_default_build_up(true);
    customizer.setup::<Customer>().extend_with::<Mixin>();
    container.map::<Customer, ExtendedCustomer>().unwrap();

    let customer = container.resolve::<Customer>().unwrap();
    assert!(customer.container.is_some());
}

#[test]
fn type_override_wins_over_default() {
    let (container, customizer) = customized_container();

    customizer.set_default_build_up(true);
    customizer
        .setup::<Customer>()
        .extend_with::<Mixin>()
        .build_up(false);
    assert!(container.resolve::<Customer>().unwrap().container.is_none());

    customizer.set_default_build_up(false);
    customizer.setup::<Customer>().build_up(true);
    assert!(container.resolve::<Customer>().unwrap().container.is_some());
}

#[test]
fn build_up_config_sets_the_default() {
    let mut provider = graft_config::provider::ConfigProvider::new();
    provider
        .add_config(graft_customize::CustomizeConfig {
            default_build_up: true,
        })
        .unwrap();
    let container = Container::new();
    container.add_instance(provider);
    container.add_extension(CustomizeExtension::new()).unwrap();

    container
        .inject::<Customizer>()
        .unwrap()
        .setup::<Customer>()
        .extend_with::<Mixin>();
    assert!(container.resolve::<Customer>().unwrap().container.is_some());
}

#[test]
fn constructor_injection_still_applies() {
    let (container, customizer) = customized_container();
    container.add_instance("Corner Shop".to_string());
    customizer.setup::<Storefront>().extend_with::<Mixin>();

    let storefront = container.resolve::<Storefront>().unwrap();
    assert_eq!(storefront.name.as_str(), "Corner Shop");
    assert!(storefront.instance().implements::<dyn IMixin>());
}

#[test]
fn factories_are_used_for_the_base() {
    struct NamedCustomers;
    impl InstanceFactory for NamedCustomers {
        type Provides = Customer;

        #[allow(refining_impl_trait)]
        fn construct(&self, _: &Container) -> Result<Customer, DynError> {
            Ok(Customer {
                first_name: "from factory".into(),
                container: None,
            })
        }
    }

    let (container, customizer) = customized_container();
    container.register_factory(NamedCustomers);
    customizer.setup::<Customer>().extend_with::<Mixin>();

    let customer = container.resolve::<Customer>().unwrap();
    assert_eq!(customer.first_name, "from factory");
    assert!(customer.instance().implements::<dyn IMixin>());
}

#[test]
fn sealed_base_fails_on_resolve() {
    let (container, customizer) = customized_container();
    container.map::<Customer, SealedCustomer>().unwrap();
    // declaring never fails
    customizer.setup::<Customer>().extend_with::<Mixin>();

    let error = container.resolve::<Customer>().err().unwrap();
    assert!(matches!(
        error.extension_error::<CustomizeError>(),
        Some(CustomizeError::NonExtensibleBase { .. })
    ));
    assert!(customizer.synthesizer().is_empty());
}

#[test]
fn sealed_base_accepts_initializers() {
    let (container, customizer) = customized_container();
    customizer
        .setup::<SealedCustomer>()
        .initialize_with(|sealed| sealed.customer.first_name = "sealed".into());

    let sealed = container.resolve::<SealedCustomer>().unwrap();
    assert_eq!(sealed.customer.first_name, "sealed");
    assert!(sealed.instance().is_exactly::<SealedCustomer>());
}

#[test]
fn method_capability_fails_on_resolve() {
    let (container, customizer) = customized_container();
    customizer.setup::<Customer>().extend_with::<Notifier>();

    let error = container.resolve::<Customer>().err().unwrap();
    assert!(matches!(
        error.extension_error::<CustomizeError>(),
        Some(CustomizeError::UnsupportedCapability { .. })
    ));
}

#[test]
fn conflicting_capabilities_fail_on_resolve() {
    let (container, customizer) = customized_container();
    customizer
        .setup::<Customer>()
        .extend_with::<Mixin>()
        .extend_with::<ConflictingMixin>();

    let error = container.resolve::<Customer>().err().unwrap();
    assert!(matches!(
        error.extension_error::<CustomizeError>(),
        Some(CustomizeError::UnsupportedCapability { .. })
    ));
}

#[test]
fn capabilities_sharing_an_interface_fail_on_resolve() {
    let (container, customizer) = customized_container();
    customizer
        .setup::<Customer>()
        .extend_with::<Mixin>()
        .extend_with::<OtherMixin>();

    let error = container.resolve::<Customer>().err().unwrap();
    match error.extension_error::<CustomizeError>() {
        Some(CustomizeError::UnsupportedCapability { reason, .. }) => {
            assert!(reason.contains("IMixin"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(customizer.synthesizer().is_empty());
}

#[test]
fn container_errors_propagate_unchanged() {
    let (container, customizer) = customized_container();
    customizer.setup::<Storefront>().extend_with::<Mixin>();

    // the shop name was never added
    let error = container.resolve::<Storefront>().err().unwrap();
    assert!(matches!(error, ResolveError::FactoryFailed { .. }));
}

#[test]
fn customizations_apply_to_constructor_dependencies() {
    struct Invoice {
        customer: graft_di::Resolved<Customer>,
    }
    impl Component for Invoice {
        fn construct(container: &Container) -> Result<Self, DynError> {
            Ok(Invoice {
                customer: container.inject()?,
            })
        }
    }

    let (container, customizer) = customized_container();
    customizer
        .setup::<Customer>()
        .initialize_with(|customer| customer.first_name = "billed".into())
        .extend_with::<Mixin>();

    let invoice = container.resolve::<Invoice>().unwrap();
    assert_eq!(invoice.customer.first_name, "billed");
    assert!(invoice.customer.interface::<dyn IMixin>().is_some());
}
