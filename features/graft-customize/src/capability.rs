//! Capabilities are additional interfaces an instance gains when it is resolved.
//!
//! A capability is a plain storage type holding the values of its members. It implements the
//! interfaces it provides itself, so a synthesized type only has to embed a default value of it.

use std::{
    any::TypeId,
    fmt::Debug,
    sync::Arc,
};

use graft_di::{
    shape::{CastMut, CastRef},
    AnyValue, Injectable, Shape, TypeInfo, View,
};

/// Storage backing one capability
///
/// ```rust
/// use graft_customize::capability::{Capability, CapabilityShape};
/// use graft_di::implements;
///
/// pub trait Tagged {
///     fn tag(&self) -> &str;
/// }
///
/// #[derive(Default)]
/// pub struct Tag {
///     tag: String,
/// }
/// impl Tagged for Tag {
///     fn tag(&self) -> &str {
///         &self.tag
///     }
/// }
/// impl Capability for Tag {
///     fn describe(shape: &mut CapabilityShape<Self>) {
///         implements!(shape, Self => dyn Tagged);
///         shape.property::<String>("tag");
///     }
/// }
/// ```
pub trait Capability: Injectable + Default {
    /// Declares the members and interfaces of this capability
    fn describe(shape: &mut CapabilityShape<Self>);
}

/// Kind of a capability member
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberKind {
    /// Get/set pair backed by a stored value of the given type
    Property(TypeInfo),
    /// Operation requiring real logic
    Method,
}

/// One member of a capability
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub name: &'static str,
    pub kind: MemberKind,
}

/// Builder describing a [Capability]
pub struct CapabilityShape<C> {
    shape: Shape<C>,
    members: Vec<Member>,
}
impl<C: Injectable> Default for CapabilityShape<C> {
    fn default() -> Self {
        Self::new()
    }
}
impl<C: Injectable> CapabilityShape<C> {
    pub fn new() -> Self {
        CapabilityShape {
            shape: Shape::new(),
            members: Vec::new(),
        }
    }

    /// Declares an interface provided by the capability
    ///
    /// Usually called through the [implements!](graft_di::implements) macro.
    pub fn implements<I: ?Sized + 'static>(
        &mut self,
        cast: CastRef<I>,
        cast_mut: CastMut<I>,
    ) -> &mut Self {
        self.shape.implements(cast, cast_mut);
        self
    }

    /// Declares a property of type `V`
    pub fn property<V: 'static>(&mut self, name: &'static str) -> &mut Self {
        self.members.push(Member {
            name,
            kind: MemberKind::Property(TypeInfo::of::<V>()),
        });
        self
    }

    /// Declares a method
    ///
    /// Methods can't be synthesized, resolving a type extended with such a capability fails.
    pub fn method(&mut self, name: &'static str) -> &mut Self {
        self.members.push(Member {
            name,
            kind: MemberKind::Method,
        });
        self
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }
}

struct DescriptorInner {
    info: TypeInfo,
    members: Vec<Member>,
    views: Vec<View>,
    create: fn() -> Box<AnyValue>,
}

/// Type erased description of a [Capability]
///
/// Cheap to clone, two descriptors are equal if they describe the same capability.
#[derive(Clone)]
pub struct CapabilityDescriptor(Arc<DescriptorInner>);
impl Debug for CapabilityDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CapabilityDescriptor")
            .field("capability", &self.0.info.type_name)
            .field("members", &self.0.members)
            .finish()
    }
}
impl PartialEq for CapabilityDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.0.info == other.0.info
    }
}
impl Eq for CapabilityDescriptor {}

fn create_storage<C: Capability>() -> Box<AnyValue> {
    Box::new(C::default())
}

impl CapabilityDescriptor {
    pub fn of<C: Capability>() -> Self {
        let mut shape = CapabilityShape::<C>::new();
        C::describe(&mut shape);
        let CapabilityShape { shape, members } = shape;

        CapabilityDescriptor(Arc::new(DescriptorInner {
            info: TypeInfo::of::<C>(),
            members,
            views: shape.into_views(),
            create: create_storage::<C>,
        }))
    }

    pub fn info(&self) -> TypeInfo {
        self.0.info
    }

    pub fn type_id(&self) -> TypeId {
        self.0.info.type_id
    }

    pub fn name(&self) -> &'static str {
        self.0.info.type_name
    }

    pub fn members(&self) -> &[Member] {
        &self.0.members
    }

    /// Views of the storage value, carrying the interfaces it provides
    pub fn views(&self) -> &[View] {
        &self.0.views
    }

    /// Creates default storage for one instance
    pub fn create_storage(&self) -> Box<AnyValue> {
        (self.0.create)()
    }
}
