use std::{
    any::TypeId,
    fmt::Debug,
    marker::PhantomData,
    ops::{Deref, DerefMut},
    sync::Arc,
};

use crate::{
    errors::ResolveError,
    shape::TypeShape,
    types::{AnyValue, Injectable, TypeInfo},
};

/// A resolved, type erased value together with the shape describing it
pub struct Instance {
    shape: Arc<TypeShape>,
    value: Box<AnyValue>,
}
impl Debug for Instance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Instance")
            .field("type", &self.shape.name())
            .field("shape", &self.shape.id())
            .finish()
    }
}

impl Instance {
    /// Creates an instance from its parts
    ///
    /// The value must be of the shape's concrete type.
    pub fn from_parts(shape: Arc<TypeShape>, value: Box<AnyValue>) -> Result<Self, ResolveError> {
        if (*value).type_id() != shape.concrete().type_id {
            return Err(ResolveError::NotAssignable {
                instance: shape.name().to_string(),
                required: shape.concrete(),
            });
        }
        Ok(Instance { shape, value })
    }

    pub fn into_parts(self) -> (Arc<TypeShape>, Box<AnyValue>) {
        (self.shape, self.value)
    }

    pub(crate) fn value_mut(&mut self) -> &mut AnyValue {
        &mut *self.value
    }

    /// The dynamic type of this instance
    pub fn shape(&self) -> &Arc<TypeShape> {
        &self.shape
    }

    pub fn type_name(&self) -> &str {
        self.shape.name()
    }

    /// Returns true if both instances are of the identical type
    pub fn same_type(&self, other: &Instance) -> bool {
        self.shape.id() == other.shape.id()
    }

    /// Returns true if this instance can be used as a `T`
    pub fn is<T: Injectable>(&self) -> bool {
        self.shape.is_viewable_as(TypeId::of::<T>())
    }

    /// Returns true if this instance is exactly a `T` - neither derived from it nor synthesized
    pub fn is_exactly<T: Injectable>(&self) -> bool {
        !self.shape.is_synthesized() && self.shape.concrete() == TypeInfo::of::<T>()
    }

    /// Returns true if this instance implements the interface `I`
    pub fn implements<I: ?Sized + 'static>(&self) -> bool {
        self.shape.implements(TypeId::of::<I>())
    }

    /// Views this instance as a `T`
    pub fn get<T: Injectable>(&self) -> Option<&T> {
        self.shape
            .view(TypeId::of::<T>())?
            .get(&*self.value)?
            .downcast_ref::<T>()
    }

    /// Views this instance as a mutable `T`
    pub fn get_mut<T: Injectable>(&mut self) -> Option<&mut T> {
        self.shape
            .view(TypeId::of::<T>())?
            .get_mut(&mut *self.value)?
            .downcast_mut::<T>()
    }

    /// Casts this instance to the interface `I`
    pub fn interface<I: ?Sized + 'static>(&self) -> Option<&I> {
        self.shape.views().iter().find_map(|view| {
            let cast = view.interfaces().cast::<I>()?;
            cast(view.get(&*self.value)?)
        })
    }

    /// Casts this instance to the mutable interface `I`
    pub fn interface_mut<I: ?Sized + 'static>(&mut self) -> Option<&mut I> {
        let (view, cast) = self
            .shape
            .views()
            .iter()
            .find_map(|view| Some((view, view.interfaces().cast_mut::<I>()?)))?;
        cast(view.get_mut(&mut *self.value)?)
    }

    /// Takes the value out if this instance is exactly a `T`
    pub fn downcast<T: Injectable>(self) -> Result<Box<T>, Instance> {
        if !self.is_exactly::<T>() {
            return Err(self);
        }
        let Instance { shape, value } = self;
        value
            .downcast::<T>()
            .map_err(|value| Instance { shape, value })
    }
}

/// A resolved instance which is known to be usable as a `T`
///
/// Dereferences to the `T` part of the instance. The dynamic type of the instance may be `T`, a type
/// derived from `T`, or a synthesized type.
pub struct Resolved<T> {
    instance: Instance,
    _marker: PhantomData<fn() -> T>,
}
impl<T: Injectable + Debug> Debug for Resolved<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resolved")
            .field("type", &self.instance.type_name())
            .field("value", self.deref())
            .finish()
    }
}
impl<T: Injectable> Resolved<T> {
    pub fn new(instance: Instance) -> Result<Self, ResolveError> {
        if !instance.is::<T>() {
            return Err(ResolveError::NotAssignable {
                instance: instance.type_name().to_string(),
                required: TypeInfo::of::<T>(),
            });
        }
        Ok(Resolved {
            instance,
            _marker: PhantomData,
        })
    }

    pub fn instance(&self) -> &Instance {
        &self.instance
    }

    pub fn into_instance(self) -> Instance {
        self.instance
    }

    /// Views the instance as another type
    pub fn get<U: Injectable>(&self) -> Option<&U> {
        self.instance.get()
    }

    /// Views the instance as another mutable type
    pub fn get_mut<U: Injectable>(&mut self) -> Option<&mut U> {
        self.instance.get_mut()
    }

    /// Casts the instance to the interface `I`
    pub fn interface<I: ?Sized + 'static>(&self) -> Option<&I> {
        self.instance.interface()
    }

    /// Casts the instance to the mutable interface `I`
    pub fn interface_mut<I: ?Sized + 'static>(&mut self) -> Option<&mut I> {
        self.instance.interface_mut()
    }
}
impl<T: Injectable> Deref for Resolved<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        self.instance
            .get::<T>()
            .expect("view is checked when the handle is created")
    }
}
impl<T: Injectable> DerefMut for Resolved<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.instance
            .get_mut::<T>()
            .expect("view is checked when the handle is created")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        container::Container,
        factories::Component,
        implements,
        shape::Shape,
        types::DynError,
    };

    trait Greeter {
        fn greet(&self) -> String;
        fn set_greeting(&mut self, greeting: &str);
    }

    #[derive(Debug, Default)]
    struct English {
        greeting: String,
    }
    impl Greeter for English {
        fn greet(&self) -> String {
            self.greeting.clone()
        }
        fn set_greeting(&mut self, greeting: &str) {
            self.greeting = greeting.to_string();
        }
    }
    impl Component for English {
        fn construct(_: &Container) -> Result<Self, DynError> {
            Ok(English {
                greeting: "hello".into(),
            })
        }

        fn describe(shape: &mut Shape<Self>) {
            implements!(shape, Self => dyn Greeter);
        }
    }

    #[derive(Debug, Default)]
    struct Polite {
        english: English,
    }
    impl Component for Polite {
        fn construct(_: &Container) -> Result<Self, DynError> {
            Ok(Polite::default())
        }

        fn describe(shape: &mut Shape<Self>) {
            shape.extends::<English>(|p| &p.english, |p| &mut p.english);
        }
    }

    fn instance_of<T: Component>(value: T) -> Instance {
        Instance::from_parts(Arc::new(TypeShape::of::<T>()), Box::new(value)).unwrap()
    }

    #[test]
    fn from_parts_rejects_mismatched_values() {
        let shape = Arc::new(TypeShape::of::<English>());
        let result = Instance::from_parts(shape, Box::new(Polite::default()));
        assert!(matches!(result, Err(ResolveError::NotAssignable { .. })));
    }

    #[test]
    fn derived_instance_is_assignable_but_not_exact() {
        let instance = instance_of(Polite::default());
        assert!(instance.is::<Polite>());
        assert!(instance.is::<English>());
        assert!(instance.is_exactly::<Polite>());
        assert!(!instance.is_exactly::<English>());
        assert!(!instance.is::<String>());
    }

    #[test]
    fn interfaces_are_reachable_through_supertypes() {
        let mut instance = instance_of(Polite::default());
        assert!(instance.implements::<dyn Greeter>());

        instance
            .interface_mut::<dyn Greeter>()
            .unwrap()
            .set_greeting("good day");
        assert_eq!(instance.interface::<dyn Greeter>().unwrap().greet(), "good day");
        assert_eq!(instance.get::<English>().unwrap().greeting, "good day");
    }

    #[test]
    fn downcast_requires_exact_type() {
        let instance = instance_of(Polite::default());
        let instance = instance.downcast::<English>().unwrap_err();
        let polite = instance.downcast::<Polite>().unwrap();
        assert_eq!(polite.english.greeting, "");
    }

    #[test]
    fn resolved_mutations_keep_the_type() {
        let instance = instance_of(Polite::default());
        let shape = instance.shape().id();
        let mut resolved = Resolved::<English>::new(instance).unwrap();

        resolved.get_mut::<Polite>().unwrap().english.greeting = "good evening".into();
        assert_eq!(resolved.greeting, "good evening");
        resolved
            .interface_mut::<dyn Greeter>()
            .unwrap()
            .set_greeting("farewell");
        assert_eq!(resolved.greet(), "farewell");
        assert!(resolved.get_mut::<String>().is_none());
        assert_eq!(resolved.instance().shape().id(), shape);
    }

    #[test]
    fn resolved_dereferences_to_the_requested_part() {
        let instance = instance_of(Polite::default());
        let mut resolved = Resolved::<English>::new(instance).unwrap();
        resolved.greeting = "hi".into();
        assert_eq!(resolved.greet(), "hi");
        assert!(resolved.instance().is_exactly::<Polite>());

        let instance = resolved.into_instance();
        assert!(matches!(
            Resolved::<String>::new(instance),
            Err(ResolveError::NotAssignable { .. })
        ));
    }
}
