use crate::catalog::{CatalogError, CatalogProvider, TypeRelations};
use parking_lot::RwLock;
use std::collections::HashMap;

/// Per-type damage relations, loaded lazily from the catalog and kept for the
/// process lifetime. Types are a small closed set so there is no eviction.
#[derive(Debug, Default)]
pub struct TypeChart {
    relations: RwLock<HashMap<String, TypeRelations>>,
}

impl TypeChart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch and cache the damage relations for `type_name`. Idempotent; a
    /// fetch failure is returned to the caller, never swallowed.
    pub fn load(&self, type_name: &str, catalog: &dyn CatalogProvider) -> Result<(), CatalogError> {
        let key = type_name.trim().to_ascii_lowercase();
        if self.relations.read().contains_key(&key) {
            return Ok(());
        }
        let loaded = catalog.type_relations(&key)?;
        self.relations.write().insert(key, loaded);
        Ok(())
    }

    /// Insert relations directly, bypassing the catalog.
    pub fn insert(&self, type_name: &str, relations: TypeRelations) {
        self.relations
            .write()
            .insert(type_name.trim().to_ascii_lowercase(), relations);
    }

    pub fn is_loaded(&self, type_name: &str) -> bool {
        self.relations
            .read()
            .contains_key(&type_name.trim().to_ascii_lowercase())
    }

    /// Compose the effectiveness multiplier of `move_type` against each
    /// defender type in order. A no-damage relation short-circuits to 0.0.
    /// A move type that was never loaded stays neutral at 1.0.
    pub fn multiplier(&self, move_type: &str, defender_types: &[String]) -> f32 {
        let relations = self.relations.read();
        let Some(relations) = relations.get(&move_type.trim().to_ascii_lowercase()) else {
            return 1.0;
        };
        let mut multiplier = 1.0;
        for defender_type in defender_types {
            let defender_type = defender_type.trim().to_ascii_lowercase();
            if relations.no_damage_to.contains(&defender_type) {
                return 0.0;
            } else if relations.double_damage_to.contains(&defender_type) {
                multiplier *= 2.0;
            } else if relations.half_damage_to.contains(&defender_type) {
                multiplier *= 0.5;
            }
        }
        multiplier
    }
}
