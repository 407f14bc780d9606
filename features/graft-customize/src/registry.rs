use std::{any::TypeId, collections::HashMap, sync::Arc};

use graft_di::TypeInfo;
use parking_lot::RwLock;

use crate::spec::CustomizationSpec;

/// Customizations by declared type
///
/// Lookups always use the type a caller asks the container for, never the implementation the
/// container currently maps it to.
#[derive(Default)]
pub struct CustomizationRegistry {
    specs: RwLock<HashMap<TypeId, (TypeInfo, Arc<RwLock<CustomizationSpec>>)>>,
}

impl CustomizationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the spec of `declared`, creating an empty one on first use
    pub fn setup(&self, declared: TypeInfo) -> Arc<RwLock<CustomizationSpec>> {
        if let Some((_, spec)) = self.specs.read().get(&declared.type_id) {
            return spec.clone();
        }

        self.specs
            .write()
            .entry(declared.type_id)
            .or_insert_with(|| {
                tracing::debug!("Customizing {}", declared.type_name);
                (declared, Arc::default())
            })
            .1
            .clone()
    }

    /// Returns the spec of `declared`, `None` means it resolves unmodified
    pub fn get(&self, declared: TypeId) -> Option<Arc<RwLock<CustomizationSpec>>> {
        self.specs
            .read()
            .get(&declared)
            .map(|(_, spec)| spec.clone())
    }

    pub fn contains(&self, declared: TypeId) -> bool {
        self.specs.read().contains_key(&declared)
    }

    /// All customized types
    pub fn declared_types(&self) -> Vec<TypeInfo> {
        self.specs.read().values().map(|(info, _)| *info).collect()
    }

    pub fn len(&self) -> usize {
        self.specs.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.read().is_empty()
    }
}
