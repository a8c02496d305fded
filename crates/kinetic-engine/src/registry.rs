use crate::structure::{Structure, StructureData};
use kinetic_core::types::StructureId;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

/// All known structures, shared between the toggle callers and the tick driver.
pub struct StructureRegistry {
    structures: RwLock<HashMap<StructureId, Arc<Structure>>>,
    next_id: AtomicU64,
}

impl Default for StructureRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl StructureRegistry {
    pub fn new() -> Self {
        Self {
            structures: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Register a new structure under a fresh id.
    pub fn register(&self, data: StructureData) -> Arc<Structure> {
        let id = StructureId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let structure = Arc::new(Structure::new(id, data));
        self.structures
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, Arc::clone(&structure));
        structure
    }

    pub fn get(&self, id: StructureId) -> Option<Arc<Structure>> {
        self.structures
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .cloned()
    }

    pub fn remove(&self, id: StructureId) -> Option<Arc<Structure>> {
        self.structures
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id)
    }

    /// Registered ids in ascending order.
    pub fn ids(&self) -> Vec<StructureId> {
        let mut ids: Vec<_> = self
            .structures
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .copied()
            .collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.structures
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of structures currently animating.
    pub fn busy_count(&self) -> usize {
        self.structures
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .filter(|s| s.is_busy())
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::IVec3;
    use kinetic_anim::StructureKind;
    use kinetic_core::cuboid::Cuboid;
    use kinetic_core::direction::MovementDirection;
    use kinetic_core::types::WorldId;

    fn flag(name: &str) -> StructureData {
        StructureData {
            name: name.into(),
            kind: StructureKind::Flag,
            world: WorldId(0),
            cuboid: Cuboid::new(IVec3::new(1, 70, 0), IVec3::new(6, 72, 0)),
            rotation_point: IVec3::new(0, 70, 0),
            is_open: false,
            open_direction: MovementDirection::East,
        }
    }

    #[test]
    fn test_register_assigns_fresh_ids() {
        let registry = StructureRegistry::new();
        let a = registry.register(flag("a"));
        let b = registry.register(flag("b"));
        assert_ne!(a.id(), b.id());
        assert_eq!(registry.ids(), vec![a.id(), b.id()]);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_get_and_remove() {
        let registry = StructureRegistry::new();
        let id = registry.register(flag("a")).id();
        assert_eq!(registry.get(id).map(|s| s.name()), Some("a".to_string()));
        assert!(registry.remove(id).is_some());
        assert!(registry.get(id).is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_busy_count() {
        let registry = StructureRegistry::new();
        let s = registry.register(flag("a"));
        registry.register(flag("b"));
        assert_eq!(registry.busy_count(), 0);
        s.try_begin(0).expect("claimed");
        assert_eq!(registry.busy_count(), 1);
    }
}
