use std::any::{Any, TypeId};

/// Type erased errors returned by factories
pub type DynError = Box<dyn std::error::Error + Send + Sync>;

/// Type erased value as stored inside an [Instance](crate::instance::Instance)
pub type AnyValue = dyn Any + Send + Sync;

/// Instances may be resolved from any thread
/// So anything injectable needs to be Send + Sync + 'static
pub trait Injectable: Send + Sync + 'static {}
impl<T: Send + Sync + 'static> Injectable for T {}

/// Type Name and Type Id
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub struct TypeInfo {
    pub type_name: &'static str,
    pub type_id: TypeId,
}
impl std::fmt::Display for TypeInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.type_name)
    }
}
impl TypeInfo {
    pub fn of<T: 'static + ?Sized>() -> TypeInfo {
        TypeInfo {
            type_name: std::any::type_name::<T>(),
            type_id: TypeId::of::<T>(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    trait Greeter {}

    #[test]
    fn type_info_identifies_sized_and_unsized_types() {
        assert_eq!(TypeInfo::of::<String>(), TypeInfo::of::<String>());
        assert_ne!(TypeInfo::of::<String>(), TypeInfo::of::<u32>());

        let greeter = TypeInfo::of::<dyn Greeter>();
        assert_eq!(greeter.type_id, TypeId::of::<dyn Greeter>());
        assert!(greeter.to_string().contains("Greeter"));
    }
}
