use crate::catalog::{CatalogError, CatalogProvider, CreatureRecord, MoveRecord, TypeRelations};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tracing::debug;

pub const DEFAULT_TTL: Duration = Duration::from_secs(24 * 60 * 60);

#[derive(Clone)]
enum CachedValue {
    Creature(CreatureRecord),
    Move(MoveRecord),
    Relations(TypeRelations),
}

struct Entry {
    value: CachedValue,
    expires_at: Instant,
}

/// Expire-then-refetch response cache over any provider. Errors are never
/// cached; `random_pokemon_name` passes through so each draw is fresh.
pub struct Cached<P> {
    inner: P,
    ttl: Duration,
    entries: Mutex<HashMap<String, Entry>>,
}

impl<P: CatalogProvider> Cached<P> {
    pub fn new(inner: P) -> Self {
        Self::with_ttl(inner, DEFAULT_TTL)
    }

    pub fn with_ttl(inner: P, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    fn lookup(&self, key: &str) -> Option<CachedValue> {
        let mut entries = self.entries.lock();
        match entries.get(key) {
            Some(entry) if entry.expires_at > Instant::now() => {
                debug!(key, "catalog cache hit");
                Some(entry.value.clone())
            }
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    fn store(&self, key: String, value: CachedValue) {
        self.entries.lock().insert(
            key,
            Entry {
                value,
                expires_at: Instant::now() + self.ttl,
            },
        );
    }
}

impl<P: CatalogProvider> CatalogProvider for Cached<P> {
    fn pokemon(&self, name: &str) -> Result<CreatureRecord, CatalogError> {
        let key = format!("pokemon/{}", name.trim().to_ascii_lowercase());
        if let Some(CachedValue::Creature(record)) = self.lookup(&key) {
            return Ok(record);
        }
        let record = self.inner.pokemon(name)?;
        self.store(key, CachedValue::Creature(record.clone()));
        Ok(record)
    }

    fn move_data(&self, name: &str) -> Result<MoveRecord, CatalogError> {
        let key = format!("move/{}", name.trim().to_ascii_lowercase());
        if let Some(CachedValue::Move(record)) = self.lookup(&key) {
            return Ok(record);
        }
        let record = self.inner.move_data(name)?;
        self.store(key, CachedValue::Move(record.clone()));
        Ok(record)
    }

    fn type_relations(&self, name: &str) -> Result<TypeRelations, CatalogError> {
        let key = format!("type/{}", name.trim().to_ascii_lowercase());
        if let Some(CachedValue::Relations(relations)) = self.lookup(&key) {
            return Ok(relations);
        }
        let relations = self.inner.type_relations(name)?;
        self.store(key, CachedValue::Relations(relations.clone()));
        Ok(relations)
    }

    fn random_pokemon_name(&self) -> Result<String, CatalogError> {
        self.inner.random_pokemon_name()
    }
}
