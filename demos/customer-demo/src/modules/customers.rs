use std::sync::Arc;

use graft_customize::{Capability, CapabilityShape};
use graft_di::{implements, Component, Container, DynError, InjectError, Shape};

/// Shop wide settings, added as a shared instance
#[derive(Debug)]
pub struct ShopSettings {
    pub currency: String,
}

pub struct Customer {
    pub first_name: String,
    pub settings: Option<Arc<ShopSettings>>,
}
impl Component for Customer {
    fn construct(_: &Container) -> Result<Self, DynError> {
        Ok(Customer {
            first_name: "Ada".into(),
            settings: None,
        })
    }

    fn inject_members(&mut self, container: &Container) -> Result<(), InjectError> {
        self.settings = container.inject()?;
        Ok(())
    }
}

pub struct ExtendedCustomer {
    pub customer: Customer,
    pub loyalty_points: u32,
}
impl Component for ExtendedCustomer {
    fn construct(container: &Container) -> Result<Self, DynError> {
        Ok(ExtendedCustomer {
            customer: Customer::construct(container)?,
            loyalty_points: 250,
        })
    }

    fn describe(shape: &mut Shape<Self>) {
        shape.extends::<Customer>(|e| &e.customer, |e| &mut e.customer);
    }

    fn inject_members(&mut self, container: &Container) -> Result<(), InjectError> {
        self.customer.inject_members(container)
    }
}

pub trait Tagged {
    fn tag(&self) -> &str;
    fn set_tag(&mut self, tag: &str);
}

#[derive(Default)]
pub struct Tag {
    tag: String,
}
impl Tagged for Tag {
    fn tag(&self) -> &str {
        &self.tag
    }
    fn set_tag(&mut self, tag: &str) {
        self.tag = tag.to_string();
    }
}
impl Capability for Tag {
    fn describe(shape: &mut CapabilityShape<Self>) {
        implements!(shape, Self => dyn Tagged);
        shape.property::<String>("tag");
    }
}
