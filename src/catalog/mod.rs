//! Read-only interface to the external creature/move/type catalog.
//!
//! The battle core consumes this trait and never talks to the network
//! directly; [`pokeapi::PokeApiClient`] is the live implementation and
//! [`cache::Cached`] adds response caching on top of any provider.

pub mod cache;
pub mod pokeapi;

use crate::sim::pokemon::MoveClass;
use std::collections::{HashMap, HashSet};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("'{0}' not found in the catalog")]
    NotFound(String),
    #[error("catalog request failed: {0}")]
    Unavailable(String),
    #[error("malformed catalog record for '{name}': {detail}")]
    Malformed { name: String, detail: String },
}

/// Raw creature record as the catalog reports it, before normalization.
#[derive(Debug, Clone)]
pub struct CreatureRecord {
    pub name: String,
    /// Base stats keyed by stat name (`hp`, `attack`, `sp_attack`, ...).
    pub stats: HashMap<String, u32>,
    pub types: Vec<String>,
    /// Known move names in the catalog's order.
    pub moves: Vec<String>,
    pub sprite: Option<String>,
}

#[derive(Debug, Clone)]
pub struct MoveRecord {
    pub name: String,
    pub move_type: String,
    pub power: u32,
    pub accuracy: u32,
    pub class: MoveClass,
}

/// Damage relations of one attacking type against defender type names.
#[derive(Debug, Clone, Default)]
pub struct TypeRelations {
    pub double_damage_to: HashSet<String>,
    pub half_damage_to: HashSet<String>,
    pub no_damage_to: HashSet<String>,
}

pub trait CatalogProvider: Send + Sync {
    fn pokemon(&self, name: &str) -> Result<CreatureRecord, CatalogError>;

    fn move_data(&self, name: &str) -> Result<MoveRecord, CatalogError>;

    fn type_relations(&self, name: &str) -> Result<TypeRelations, CatalogError>;

    /// A name drawn from the provider's curated pool, for "random" opponents.
    fn random_pokemon_name(&self) -> Result<String, CatalogError>;
}
