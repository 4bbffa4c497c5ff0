use crate::catalog::{CatalogError, CatalogProvider, CreatureRecord, MoveRecord, TypeRelations};
use crate::sim::pokemon::MoveClass;
use rand::seq::SliceRandom;
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::time::Duration;
use tracing::debug;

const DEFAULT_BASE_URL: &str = "https://pokeapi.co/api/v2";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

// Pool for "random" opponents; kept to well-known species so the draw is
// always resolvable.
const CURATED_POOL: [&str; 15] = [
    "pikachu",
    "charizard",
    "blastoise",
    "venusaur",
    "snorlax",
    "garchomp",
    "lucario",
    "dragonite",
    "gengar",
    "tyranitar",
    "machamp",
    "gyarados",
    "mewtwo",
    "rayquaza",
    "metagross",
];

/// Blocking PokeAPI client. Wrap in [`super::cache::Cached`] for the 24-hour
/// response cache the engine expects in production.
pub struct PokeApiClient {
    base_url: String,
    http: reqwest::blocking::Client,
}

impl PokeApiClient {
    pub fn new() -> Result<Self, CatalogError> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, CatalogError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|err| CatalogError::Unavailable(err.to_string()))?;
        Ok(Self {
            base_url: base_url.into(),
            http,
        })
    }

    fn fetch(&self, endpoint: &str, name: &str) -> Result<Value, CatalogError> {
        let url = format!("{}/{}", self.base_url, endpoint);
        debug!(%url, "catalog fetch");
        let response = self
            .http
            .get(&url)
            .send()
            .map_err(|err| CatalogError::Unavailable(err.to_string()))?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(CatalogError::NotFound(name.to_string()));
        }
        let response = response
            .error_for_status()
            .map_err(|err| CatalogError::Unavailable(err.to_string()))?;
        response
            .json()
            .map_err(|err| CatalogError::Malformed {
                name: name.to_string(),
                detail: err.to_string(),
            })
    }
}

impl CatalogProvider for PokeApiClient {
    fn pokemon(&self, name: &str) -> Result<CreatureRecord, CatalogError> {
        let id = normalize_name(name);
        let value = self.fetch(&format!("pokemon/{id}"), name)?;
        parse_creature(&value)
    }

    fn move_data(&self, name: &str) -> Result<MoveRecord, CatalogError> {
        let id = normalize_name(name);
        let value = self.fetch(&format!("move/{id}"), name)?;
        parse_move(&value)
    }

    fn type_relations(&self, name: &str) -> Result<TypeRelations, CatalogError> {
        let id = normalize_name(name);
        let value = self.fetch(&format!("type/{id}"), name)?;
        Ok(parse_type_relations(&value))
    }

    fn random_pokemon_name(&self) -> Result<String, CatalogError> {
        let name = CURATED_POOL
            .choose(&mut rand::thread_rng())
            .copied()
            .unwrap_or("pikachu");
        Ok(name.to_string())
    }
}

fn normalize_name(name: &str) -> String {
    name.trim().to_ascii_lowercase()
}

fn parse_creature(value: &Value) -> Result<CreatureRecord, CatalogError> {
    let name = required_str(value, "name")?;

    let mut stats = HashMap::new();
    for stat in value["stats"].as_array().into_iter().flatten() {
        let Some(stat_name) = stat["stat"]["name"].as_str() else {
            continue;
        };
        let Some(base_stat) = stat["base_stat"].as_u64() else {
            continue;
        };
        // The catalog reports `special-attack`; the battle model keys on
        // `sp_attack`-style names.
        let key = stat_name.replace('-', "_").replace("special_", "sp_");
        stats.insert(key, base_stat as u32);
    }

    let types = value["types"]
        .as_array()
        .into_iter()
        .flatten()
        .filter_map(|entry| entry["type"]["name"].as_str())
        .map(str::to_string)
        .collect();

    let moves = value["moves"]
        .as_array()
        .into_iter()
        .flatten()
        .filter_map(|entry| entry["move"]["name"].as_str())
        .map(str::to_string)
        .collect();

    Ok(CreatureRecord {
        name: name.to_string(),
        stats,
        types,
        moves,
        sprite: pick_sprite(&value["sprites"]),
    })
}

// Animated gen-V sprite when present, else official artwork, else the plain
// front sprite.
fn pick_sprite(sprites: &Value) -> Option<String> {
    sprites["versions"]["generation-v"]["black-white"]["animated"]["front_default"]
        .as_str()
        .or_else(|| sprites["other"]["official-artwork"]["front_default"].as_str())
        .or_else(|| sprites["front_default"].as_str())
        .map(str::to_string)
}

fn parse_move(value: &Value) -> Result<MoveRecord, CatalogError> {
    let name = required_str(value, "name")?;
    let move_type = value["type"]["name"].as_str().unwrap_or("normal");
    Ok(MoveRecord {
        name: name.to_string(),
        move_type: move_type.to_string(),
        // Status moves report null power/accuracy.
        power: value["power"].as_u64().unwrap_or(0) as u32,
        accuracy: value["accuracy"].as_u64().unwrap_or(100) as u32,
        class: parse_move_class(value["damage_class"]["name"].as_str()),
    })
}

fn parse_move_class(name: Option<&str>) -> MoveClass {
    match name {
        Some("physical") => MoveClass::Physical,
        Some("special") => MoveClass::Special,
        _ => MoveClass::Status,
    }
}

fn parse_type_relations(value: &Value) -> TypeRelations {
    let relations = &value["damage_relations"];
    TypeRelations {
        double_damage_to: name_set(&relations["double_damage_to"]),
        half_damage_to: name_set(&relations["half_damage_to"]),
        no_damage_to: name_set(&relations["no_damage_to"]),
    }
}

fn name_set(value: &Value) -> HashSet<String> {
    value
        .as_array()
        .into_iter()
        .flatten()
        .filter_map(|entry| entry["name"].as_str())
        .map(str::to_string)
        .collect()
}

fn required_str<'a>(value: &'a Value, field: &str) -> Result<&'a str, CatalogError> {
    value[field].as_str().ok_or_else(|| CatalogError::Malformed {
        name: value["name"].as_str().unwrap_or("<unknown>").to_string(),
        detail: format!("missing field '{field}'"),
    })
}
