//! Runtime type descriptions
//!
//! Rust has neither inheritance nor runtime reflection, so the container keeps its own description of
//! every type it constructs. A [TypeShape] lists the [View]s of a value:
//! - the value itself
//! - every embedded supertype declared with [Shape::extends]
//!
//! Each view also carries the interface casts ([Shape::implements]) its part provides.
//! Views compose, which is what allows a wrapper type to expose everything its inner value exposes.

use std::{
    any::{Any, TypeId},
    borrow::Cow,
    collections::HashMap,
    fmt::Debug,
    marker::PhantomData,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
};

use crate::{
    container::Container,
    errors::InjectError,
    factories::Component,
    types::{AnyValue, Injectable, TypeInfo},
};

/// Projects a root value onto one of its parts
pub type ViewFn = Arc<dyn Fn(&AnyValue) -> Option<&AnyValue> + Send + Sync>;
/// Mutable twin of [ViewFn]
pub type ViewMutFn = Arc<dyn Fn(&mut AnyValue) -> Option<&mut AnyValue> + Send + Sync>;
/// Runs the member injection pass on a type erased value
pub type MemberInjector =
    Arc<dyn Fn(&mut AnyValue, &Container) -> Result<(), InjectError> + Send + Sync>;

/// Casts a type erased value to the interface `I`
pub type CastRef<I> = for<'a> fn(&'a AnyValue) -> Option<&'a I>;
/// Mutable twin of [CastRef]
pub type CastMut<I> = for<'a> fn(&'a mut AnyValue) -> Option<&'a mut I>;

/// Wraps a closure into a [ViewFn]
///
/// Needed so the closure is inferred with the higher ranked signature.
pub fn view_fn<F>(f: F) -> ViewFn
where
    F: for<'a> Fn(&'a AnyValue) -> Option<&'a AnyValue> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Wraps a closure into a [ViewMutFn]
pub fn view_mut_fn<F>(f: F) -> ViewMutFn
where
    F: for<'a> Fn(&'a mut AnyValue) -> Option<&'a mut AnyValue> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Wraps a closure into a [MemberInjector]
pub fn member_injector<F>(f: F) -> MemberInjector
where
    F: Fn(&mut AnyValue, &Container) -> Result<(), InjectError> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Declares that `$ty` implements the interface `$interface` on a [Shape] or any builder exposing
/// an `implements` method with the same signature.
///
/// ```ignore
/// impl Component for Customer {
///     fn describe(shape: &mut Shape<Self>) {
///         implements!(shape, Self => dyn Named);
///     }
/// }
/// ```
#[macro_export]
macro_rules! implements {
    ($shape:expr, $ty:ty => $interface:ty) => {
        $shape.implements::<$interface>(
            |value| match value.downcast_ref::<$ty>() {
                Some(this) => Some(this),
                None => None,
            },
            |value| match value.downcast_mut::<$ty>() {
                Some(this) => Some(this),
                None => None,
            },
        )
    };
}

/// Unique identity of a [TypeShape]
///
/// Two instances are of the same type if and only if their shapes share an id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShapeId(u64);
impl ShapeId {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        ShapeId(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}
impl std::fmt::Display for ShapeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Clone)]
struct InterfaceCast {
    info: TypeInfo,
    /// Holds a [CastRef]
    cast: Arc<dyn Any + Send + Sync>,
    /// Holds a [CastMut]
    cast_mut: Arc<dyn Any + Send + Sync>,
}

/// Interfaces a single part of a value implements
#[derive(Clone, Default)]
pub struct Interfaces {
    casts: HashMap<TypeId, InterfaceCast>,
}
impl Interfaces {
    fn insert<I: ?Sized + 'static>(&mut self, cast: CastRef<I>, cast_mut: CastMut<I>) {
        self.casts.insert(
            TypeId::of::<I>(),
            InterfaceCast {
                info: TypeInfo::of::<I>(),
                cast: Arc::new(cast),
                cast_mut: Arc::new(cast_mut),
            },
        );
    }

    pub fn contains(&self, interface: TypeId) -> bool {
        self.casts.contains_key(&interface)
    }

    pub fn cast<I: ?Sized + 'static>(&self) -> Option<CastRef<I>> {
        self.casts
            .get(&TypeId::of::<I>())?
            .cast
            .downcast_ref::<CastRef<I>>()
            .copied()
    }

    pub fn cast_mut<I: ?Sized + 'static>(&self) -> Option<CastMut<I>> {
        self.casts
            .get(&TypeId::of::<I>())?
            .cast_mut
            .downcast_ref::<CastMut<I>>()
            .copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = TypeInfo> + '_ {
        self.casts.values().map(|cast| cast.info)
    }

    pub fn len(&self) -> usize {
        self.casts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.casts.is_empty()
    }
}

/// One type a value can be viewed as
#[derive(Clone)]
pub struct View {
    info: TypeInfo,
    get: ViewFn,
    get_mut: ViewMutFn,
    interfaces: Arc<Interfaces>,
}
impl Debug for View {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let interfaces: Vec<_> = self.interfaces.iter().map(|i| i.type_name).collect();
        f.debug_struct("View")
            .field("type", &self.info.type_name)
            .field("interfaces", &interfaces)
            .finish()
    }
}
impl View {
    /// The view of a value as itself
    pub fn identity<T: Injectable>(interfaces: Interfaces) -> View {
        View {
            info: TypeInfo::of::<T>(),
            get: view_fn(|root| if root.is::<T>() { Some(root) } else { None }),
            get_mut: view_mut_fn(|root| if root.is::<T>() { Some(root) } else { None }),
            interfaces: Arc::new(interfaces),
        }
    }

    pub fn info(&self) -> TypeInfo {
        self.info
    }

    pub fn interfaces(&self) -> &Interfaces {
        &self.interfaces
    }

    pub fn get<'a>(&self, root: &'a AnyValue) -> Option<&'a AnyValue> {
        (self.get)(root)
    }

    pub fn get_mut<'a>(&self, root: &'a mut AnyValue) -> Option<&'a mut AnyValue> {
        (self.get_mut)(root)
    }

    /// Re-targets this view onto a value which embeds the viewed value
    ///
    /// `outer` projects the embedding value onto the value this view was made for.
    pub fn through(&self, outer: ViewFn, outer_mut: ViewMutFn) -> View {
        let inner = self.get.clone();
        let inner_mut = self.get_mut.clone();
        View {
            info: self.info,
            get: view_fn(move |root| outer(root).and_then(|part| inner(part))),
            get_mut: view_mut_fn(move |root| outer_mut(root).and_then(|part| inner_mut(part))),
            interfaces: self.interfaces.clone(),
        }
    }
}

/// Builder describing the supertypes and interfaces of `T`
///
/// Passed to [Component::describe].
pub struct Shape<T> {
    sealed: bool,
    interfaces: Interfaces,
    supertypes: Vec<View>,
    _marker: PhantomData<fn(T)>,
}
impl<T: Injectable> Default for Shape<T> {
    fn default() -> Self {
        Self::new()
    }
}
impl<T: Injectable> Shape<T> {
    pub fn new() -> Self {
        Shape {
            sealed: false,
            interfaces: Interfaces::default(),
            supertypes: Vec::new(),
            _marker: PhantomData,
        }
    }

    /// Declares that `T` implements the interface `I`
    ///
    /// Usually called through the [implements!](crate::implements) macro.
    pub fn implements<I: ?Sized + 'static>(
        &mut self,
        cast: CastRef<I>,
        cast_mut: CastMut<I>,
    ) -> &mut Self {
        self.interfaces.insert(cast, cast_mut);
        self
    }

    /// Declares that `T` embeds `P` and can be used wherever `P` is expected
    ///
    /// Everything `P` can be viewed as is inherited.
    pub fn extends<P: Component>(
        &mut self,
        get: fn(&T) -> &P,
        get_mut: fn(&mut T) -> &mut P,
    ) -> &mut Self {
        let outer = view_fn(move |root| match root.downcast_ref::<T>() {
            Some(this) => Some(get(this) as &AnyValue),
            None => None,
        });
        let outer_mut = view_mut_fn(move |root| match root.downcast_mut::<T>() {
            Some(this) => Some(get_mut(this) as &mut AnyValue),
            None => None,
        });

        let mut parent = Shape::<P>::new();
        P::describe(&mut parent);
        for view in parent.into_views() {
            if self.supertypes.iter().any(|known| known.info == view.info) {
                continue;
            }
            self.supertypes
                .push(view.through(outer.clone(), outer_mut.clone()));
        }
        self
    }

    /// Marks `T` as final - no other type may be derived from it at runtime
    pub fn sealed(&mut self) -> &mut Self {
        self.sealed = true;
        self
    }

    /// All views of `T` - itself first, then its supertypes
    pub fn into_views(self) -> Vec<View> {
        let mut views = Vec::with_capacity(self.supertypes.len() + 1);
        views.push(View::identity::<T>(self.interfaces));
        views.extend(self.supertypes);
        views
    }
}

/// Runtime description of a type the container can hand out
pub struct TypeShape {
    id: ShapeId,
    name: Cow<'static, str>,
    concrete: TypeInfo,
    sealed: bool,
    synthesized: bool,
    views: Vec<View>,
    injector: Option<MemberInjector>,
}
impl Debug for TypeShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeShape")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("sealed", &self.sealed)
            .field("synthesized", &self.synthesized)
            .field("views", &self.views)
            .finish()
    }
}
impl PartialEq for TypeShape {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}
impl Eq for TypeShape {}

impl TypeShape {
    /// Describes a [Component]
    pub fn of<T: Component>() -> TypeShape {
        let mut shape = Shape::<T>::new();
        T::describe(&mut shape);
        let sealed = shape.sealed;

        let injector = member_injector(|value, container| match value.downcast_mut::<T>() {
            Some(this) => this.inject_members(container),
            None => Err(InjectError::TargetMismatch(std::any::type_name::<T>())),
        });

        TypeShape {
            id: ShapeId::next(),
            name: Cow::Borrowed(std::any::type_name::<T>()),
            concrete: TypeInfo::of::<T>(),
            sealed,
            synthesized: false,
            views: shape.into_views(),
            injector: Some(injector),
        }
    }

    /// Describes a type assembled at runtime
    ///
    /// `concrete` is the Rust type actually stored, which may be shared between many synthesized shapes.
    pub fn synthesized(
        name: impl Into<Cow<'static, str>>,
        concrete: TypeInfo,
        views: Vec<View>,
        injector: Option<MemberInjector>,
    ) -> TypeShape {
        TypeShape {
            id: ShapeId::next(),
            name: name.into(),
            concrete,
            sealed: false,
            synthesized: true,
            views,
            injector,
        }
    }

    pub fn id(&self) -> ShapeId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The Rust type stored by instances of this shape
    pub fn concrete(&self) -> TypeInfo {
        self.concrete
    }

    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    pub fn is_synthesized(&self) -> bool {
        self.synthesized
    }

    pub fn views(&self) -> &[View] {
        &self.views
    }

    pub fn view(&self, type_id: TypeId) -> Option<&View> {
        self.views.iter().find(|view| view.info.type_id == type_id)
    }

    /// Returns true if instances of this shape can be used as `type_id`
    pub fn is_viewable_as(&self, type_id: TypeId) -> bool {
        self.view(type_id).is_some()
    }

    /// Returns true if any part of this shape implements the interface
    pub fn implements(&self, interface: TypeId) -> bool {
        self.views
            .iter()
            .any(|view| view.interfaces.contains(interface))
    }

    pub fn injector(&self) -> Option<&MemberInjector> {
        self.injector.as_ref()
    }
}
