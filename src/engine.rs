//! Battle API surface: session creation and action dispatch.

use crate::catalog::{CatalogError, CatalogProvider, CreatureRecord};
use crate::error::BattleError;
use crate::registry::SessionRegistry;
use crate::sim::ai::Difficulty;
use crate::sim::pokemon::{Move, MoveClass, Pokemon, Stats};
use crate::sim::session::{BattleSession, SessionState};
use crate::sim::types::TypeChart;
use parking_lot::Mutex;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Name that requests a curated-pool draw instead of a lookup.
pub const RANDOM_NAME: &str = "random";

const DEFAULT_STAT: u32 = 50;
const MOVE_SCAN_LIMIT: usize = 20;
const MAX_MOVES: usize = 4;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartSessionRequest {
    pub player: String,
    pub opponent: String,
    #[serde(default)]
    pub difficulty: Difficulty,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionStart {
    pub session_id: Uuid,
    pub player: Pokemon,
    pub opponent: Pokemon,
    pub state: SessionState,
}

/// Owns the catalog handle, the shared type chart, and the session registry.
/// Construct once at startup and inject into the host; sessions draw their
/// seeds from the engine's master rng so a seeded engine replays end to end.
pub struct BattleEngine {
    catalog: Arc<dyn CatalogProvider>,
    type_chart: TypeChart,
    registry: SessionRegistry,
    rng: Mutex<SmallRng>,
}

impl BattleEngine {
    pub fn new(catalog: Arc<dyn CatalogProvider>, seed: u64) -> Self {
        Self {
            catalog,
            type_chart: TypeChart::new(),
            registry: SessionRegistry::new(),
            rng: Mutex::new(SmallRng::seed_from_u64(seed)),
        }
    }

    pub fn registry(&self) -> &SessionRegistry {
        &self.registry
    }

    pub fn type_chart(&self) -> &TypeChart {
        &self.type_chart
    }

    /// Resolve both combatants, normalize them, preload the type chart for
    /// every move type involved, then register the session. Nothing is
    /// registered if any required catalog data fails to load.
    pub fn start_session(&self, request: &StartSessionRequest) -> Result<SessionStart, BattleError> {
        let player = self.normalize(self.resolve(&request.player)?)?;
        let opponent = self.normalize(self.resolve(&request.opponent)?)?;

        for move_def in player.moves.iter().chain(opponent.moves.iter()) {
            self.type_chart
                .load(&move_def.move_type, self.catalog.as_ref())?;
        }

        let seed = self.rng.lock().gen();
        let session = BattleSession::new(
            player.clone(),
            opponent.clone(),
            request.difficulty,
            seed,
        );
        let state = session.state().clone();
        let session_id = self.registry.insert(session);
        info!(
            %session_id,
            player = %player.name,
            opponent = %opponent.name,
            difficulty = ?request.difficulty,
            "battle session started"
        );
        Ok(SessionStart {
            session_id,
            player,
            opponent,
            state,
        })
    }

    pub fn perform_action(
        &self,
        session_id: Uuid,
        move_id: &str,
    ) -> Result<SessionState, BattleError> {
        self.registry.with_session(session_id, |session| {
            let state = session.perform_action(&self.type_chart, move_id)?;
            if let Some(winner) = state.winner {
                info!(%session_id, ?winner, "battle finished");
            }
            Ok(state.clone())
        })
    }

    fn resolve(&self, name: &str) -> Result<CreatureRecord, BattleError> {
        if name.eq_ignore_ascii_case(RANDOM_NAME) {
            let picked = self.catalog.random_pokemon_name()?;
            debug!(name = %picked, "drew random opponent");
            return Ok(self.catalog.pokemon(&picked)?);
        }
        self.catalog.pokemon(name).map_err(|err| match err {
            CatalogError::NotFound(_) => BattleError::PokemonNotFound(name.to_string()),
            other => BattleError::Catalog(other),
        })
    }

    /// Turn a raw catalog record into a battle-ready combatant: derived
    /// display HP, defaulted stats, and up to four damaging moves taken from
    /// the first twenty the creature knows.
    fn normalize(&self, record: CreatureRecord) -> Result<Pokemon, BattleError> {
        let stat = |key: &str| record.stats.get(key).copied().unwrap_or(DEFAULT_STAT);
        let stats = Stats {
            hp: stat("hp") * 2 + 110,
            attack: stat("attack"),
            defense: stat("defense"),
            sp_attack: stat("sp_attack"),
            sp_defense: stat("sp_defense"),
            speed: stat("speed"),
        };

        let mut moves = Vec::new();
        for move_name in record.moves.iter().take(MOVE_SCAN_LIMIT) {
            // Per-move failures degrade the moveset instead of failing the
            // whole session.
            let move_record = match self.catalog.move_data(move_name) {
                Ok(move_record) => move_record,
                Err(err) => {
                    warn!(move_name = %move_name, %err, "skipping unresolvable move");
                    continue;
                }
            };
            if move_record.power == 0 {
                continue;
            }
            moves.push(Move {
                id: move_record.name.clone(),
                name: move_record.name,
                move_type: move_record.move_type,
                power: move_record.power,
                class: move_record.class,
                accuracy: move_record.accuracy,
            });
            if moves.len() == MAX_MOVES {
                break;
            }
        }
        if moves.is_empty() {
            debug!(name = %record.name, "no damaging moves resolved, using fallback moveset");
            moves = vec![fallback_move(); MAX_MOVES];
        }

        Ok(Pokemon {
            name: record.name,
            sprite: record.sprite,
            types: record.types,
            stats,
            moves,
        })
    }
}

fn fallback_move() -> Move {
    Move {
        id: "tackle".to_string(),
        name: "tackle".to_string(),
        move_type: "normal".to_string(),
        power: 40,
        class: MoveClass::Physical,
        accuracy: 100,
    }
}
