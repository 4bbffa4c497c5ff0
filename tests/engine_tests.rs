use pokearena::catalog::{
    CatalogError, CatalogProvider, CreatureRecord, MoveRecord, TypeRelations,
};
use pokearena::engine::{BattleEngine, StartSessionRequest};
use pokearena::error::BattleError;
use pokearena::sim::ai::Difficulty;
use pokearena::sim::pokemon::MoveClass;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use uuid::Uuid;

/// In-memory catalog fixture. Creatures, moves, and type relations are
/// registered up front; unknown names report `NotFound` like the live API.
#[derive(Default)]
struct StubCatalog {
    creatures: HashMap<String, CreatureRecord>,
    moves: HashMap<String, MoveRecord>,
    relations: HashMap<String, TypeRelations>,
    random_pool: Vec<String>,
}

impl StubCatalog {
    fn add_creature(
        &mut self,
        name: &str,
        base_hp: u32,
        types: &[&str],
        known_moves: &[&str],
    ) {
        let mut stats = HashMap::new();
        stats.insert("hp".to_string(), base_hp);
        stats.insert("attack".to_string(), 80);
        stats.insert("defense".to_string(), 70);
        stats.insert("sp_attack".to_string(), 90);
        stats.insert("sp_defense".to_string(), 75);
        stats.insert("speed".to_string(), 85);
        self.creatures.insert(
            name.to_string(),
            CreatureRecord {
                name: name.to_string(),
                stats,
                types: types.iter().map(|t| t.to_string()).collect(),
                moves: known_moves.iter().map(|m| m.to_string()).collect(),
                sprite: Some(format!("{name}.png")),
            },
        );
    }

    fn add_move(&mut self, name: &str, move_type: &str, power: u32, class: MoveClass) {
        self.moves.insert(
            name.to_string(),
            MoveRecord {
                name: name.to_string(),
                move_type: move_type.to_string(),
                power,
                accuracy: 100,
                class,
            },
        );
    }

    fn add_relations(&mut self, move_type: &str, double: &[&str], half: &[&str], none: &[&str]) {
        let to_set = |names: &[&str]| -> HashSet<String> {
            names.iter().map(|n| n.to_string()).collect()
        };
        self.relations.insert(
            move_type.to_string(),
            TypeRelations {
                double_damage_to: to_set(double),
                half_damage_to: to_set(half),
                no_damage_to: to_set(none),
            },
        );
    }
}

impl CatalogProvider for StubCatalog {
    fn pokemon(&self, name: &str) -> Result<CreatureRecord, CatalogError> {
        self.creatures
            .get(name)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(name.to_string()))
    }

    fn move_data(&self, name: &str) -> Result<MoveRecord, CatalogError> {
        self.moves
            .get(name)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(name.to_string()))
    }

    fn type_relations(&self, name: &str) -> Result<TypeRelations, CatalogError> {
        Ok(self.relations.get(name).cloned().unwrap_or_default())
    }

    fn random_pokemon_name(&self) -> Result<String, CatalogError> {
        self.random_pool
            .first()
            .cloned()
            .ok_or_else(|| CatalogError::Unavailable("empty pool".to_string()))
    }
}

fn standard_catalog() -> StubCatalog {
    let mut catalog = StubCatalog::default();
    catalog.add_creature(
        "pikachu",
        35,
        &["electric"],
        &["thunder-shock", "growl", "thunderbolt", "quick-attack", "tail-whip"],
    );
    catalog.add_creature("squirtle", 44, &["water"], &["tackle", "water-gun"]);
    catalog.add_move("thunder-shock", "electric", 40, MoveClass::Special);
    catalog.add_move("growl", "normal", 0, MoveClass::Status);
    catalog.add_move("thunderbolt", "electric", 90, MoveClass::Special);
    catalog.add_move("quick-attack", "normal", 40, MoveClass::Physical);
    catalog.add_move("tail-whip", "normal", 0, MoveClass::Status);
    catalog.add_move("tackle", "normal", 40, MoveClass::Physical);
    catalog.add_move("water-gun", "water", 40, MoveClass::Special);
    catalog.add_relations("electric", &["water", "flying"], &["grass"], &["ground"]);
    catalog.add_relations("water", &["fire"], &["grass"], &[]);
    catalog.random_pool = vec!["squirtle".to_string()];
    catalog
}

fn request(player: &str, opponent: &str) -> StartSessionRequest {
    StartSessionRequest {
        player: player.to_string(),
        opponent: opponent.to_string(),
        difficulty: Difficulty::Normal,
    }
}

#[test]
fn start_session_normalizes_both_combatants() {
    let engine = BattleEngine::new(Arc::new(standard_catalog()), 1);
    let start = engine.start_session(&request("pikachu", "squirtle")).unwrap();

    // hp = base * 2 + 110
    assert_eq!(start.player.stats.hp, 35 * 2 + 110);
    assert_eq!(start.opponent.stats.hp, 44 * 2 + 110);
    assert_eq!(start.player.types, vec!["electric".to_string()]);
    assert_eq!(start.player.sprite.as_deref(), Some("pikachu.png"));

    // Only damaging moves survive normalization, in catalog order.
    let ids: Vec<&str> = start.player.moves.iter().map(|m| m.id.as_str()).collect();
    assert_eq!(ids, vec!["thunder-shock", "thunderbolt", "quick-attack"]);

    let state = &start.state;
    assert_eq!(state.player.hp, state.player.max_hp);
    assert_eq!(state.opponent.hp, state.opponent.max_hp);
    assert_eq!(state.log, vec!["Battle started! PIKACHU vs SQUIRTLE"]);
    assert!(state.winner.is_none());
}

#[test]
fn random_opponent_comes_from_the_curated_pool() {
    let engine = BattleEngine::new(Arc::new(standard_catalog()), 1);
    let start = engine.start_session(&request("pikachu", "random")).unwrap();
    assert_eq!(start.opponent.name, "squirtle");
}

#[test]
fn unknown_player_is_reported_by_name() {
    let engine = BattleEngine::new(Arc::new(standard_catalog()), 1);
    let err = engine
        .start_session(&request("missingno", "squirtle"))
        .unwrap_err();
    match err {
        BattleError::PokemonNotFound(name) => assert_eq!(name, "missingno"),
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(engine.registry().len(), 0);
}

#[test]
fn unresolvable_moves_are_skipped_not_fatal() {
    let mut catalog = standard_catalog();
    catalog.add_creature(
        "glitchy",
        40,
        &["normal"],
        &["tackle", "corrupted-move", "quick-attack"],
    );
    let engine = BattleEngine::new(Arc::new(catalog), 1);
    let start = engine.start_session(&request("glitchy", "squirtle")).unwrap();
    let ids: Vec<&str> = start.player.moves.iter().map(|m| m.id.as_str()).collect();
    assert_eq!(ids, vec!["tackle", "quick-attack"]);
}

#[test]
fn creature_without_damaging_moves_gets_the_fallback_moveset() {
    let mut catalog = standard_catalog();
    catalog.add_creature("singer", 40, &["normal"], &["growl", "tail-whip"]);
    let engine = BattleEngine::new(Arc::new(catalog), 1);
    let start = engine.start_session(&request("singer", "squirtle")).unwrap();
    assert_eq!(start.player.moves.len(), 4);
    for move_def in &start.player.moves {
        assert_eq!(move_def.id, "tackle");
        assert_eq!(move_def.power, 40);
        assert_eq!(move_def.class, MoveClass::Physical);
        assert_eq!(move_def.accuracy, 100);
    }
}

#[test]
fn move_scan_is_capped_at_twenty_known_moves() {
    let mut catalog = standard_catalog();
    let known: Vec<String> = (0..30).map(|i| format!("filler-{i}")).collect();
    let known_refs: Vec<&str> = known.iter().map(String::as_str).collect();
    // Only the move past the cutoff is damaging; it must not be reached.
    for name in &known {
        catalog.add_move(name, "normal", 0, MoveClass::Status);
    }
    catalog.add_move("filler-25", "normal", 60, MoveClass::Physical);
    catalog.add_creature("scanner", 40, &["normal"], &known_refs);
    let engine = BattleEngine::new(Arc::new(catalog), 1);
    let start = engine.start_session(&request("scanner", "squirtle")).unwrap();

    // Fallback applies because nothing damaging sits inside the scan window.
    assert!(start.player.moves.iter().all(|m| m.id == "tackle"));
}

#[test]
fn type_chart_is_preloaded_for_session_move_types() {
    let engine = BattleEngine::new(Arc::new(standard_catalog()), 1);
    engine.start_session(&request("pikachu", "squirtle")).unwrap();
    assert!(engine.type_chart().is_loaded("electric"));
    assert!(engine.type_chart().is_loaded("water"));
    assert!(engine.type_chart().is_loaded("normal"));
}

#[test]
fn perform_action_resolves_a_full_exchange() {
    let engine = BattleEngine::new(Arc::new(standard_catalog()), 1);
    let start = engine.start_session(&request("pikachu", "squirtle")).unwrap();
    let state = engine
        .perform_action(start.session_id, "thunderbolt")
        .unwrap();

    // Electric vs water is super effective; hp moved on both sides and the
    // turn came back to the player.
    assert!(state.opponent.hp < state.opponent.max_hp);
    assert!(state.player.hp < state.player.max_hp);
    assert_eq!(state.log.len(), 3);
}

#[test]
fn battle_runs_to_a_winner_and_then_rejects_actions() {
    let engine = BattleEngine::new(Arc::new(standard_catalog()), 7);
    let start = engine.start_session(&request("pikachu", "squirtle")).unwrap();

    let mut last = None;
    for _ in 0..100 {
        let state = engine
            .perform_action(start.session_id, "thunderbolt")
            .unwrap();
        if state.winner.is_some() {
            last = Some(state);
            break;
        }
    }
    let final_state = last.expect("battle should finish");
    let loser_hp = match final_state.winner.unwrap() {
        pokearena::sim::session::Winner::Player => final_state.opponent.hp,
        pokearena::sim::session::Winner::Opponent => final_state.player.hp,
    };
    assert_eq!(loser_hp, 0);
    assert!(final_state
        .log
        .last()
        .unwrap()
        .contains("wins!"));

    let err = engine
        .perform_action(start.session_id, "thunderbolt")
        .unwrap_err();
    assert!(matches!(err, BattleError::SessionEnded));
}

#[test]
fn unknown_move_id_is_rejected() {
    let engine = BattleEngine::new(Arc::new(standard_catalog()), 1);
    let start = engine.start_session(&request("pikachu", "squirtle")).unwrap();
    let err = engine
        .perform_action(start.session_id, "surf")
        .unwrap_err();
    assert!(matches!(err, BattleError::UnknownMove(id) if id == "surf"));
}

#[test]
fn unknown_session_id_is_rejected() {
    let engine = BattleEngine::new(Arc::new(standard_catalog()), 1);
    let err = engine.perform_action(Uuid::new_v4(), "tackle").unwrap_err();
    assert!(matches!(err, BattleError::SessionNotFound(_)));
}

#[test]
fn sessions_progress_independently_across_threads() {
    let engine = Arc::new(BattleEngine::new(Arc::new(standard_catalog()), 1));
    let mut ids = Vec::new();
    for _ in 0..4 {
        ids.push(
            engine
                .start_session(&request("pikachu", "squirtle"))
                .unwrap()
                .session_id,
        );
    }

    let handles: Vec<_> = ids
        .iter()
        .map(|&id| {
            let engine = Arc::clone(&engine);
            std::thread::spawn(move || {
                for _ in 0..10 {
                    match engine.perform_action(id, "thunder-shock") {
                        Ok(state) => {
                            if state.winner.is_some() {
                                return;
                            }
                        }
                        Err(BattleError::SessionEnded) => return,
                        Err(other) => panic!("unexpected error: {other}"),
                    }
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    // Every session advanced past its opening log line on its own.
    for id in ids {
        let log_len = engine
            .registry()
            .with_session(id, |session| Ok(session.state().log.len()))
            .unwrap();
        assert!(log_len > 1);
    }
}

#[test]
fn seeded_engines_replay_the_same_battle() {
    let run = || {
        let engine = BattleEngine::new(Arc::new(standard_catalog()), 42);
        let start = engine.start_session(&request("pikachu", "squirtle")).unwrap();
        let mut log = Vec::new();
        for _ in 0..100 {
            let state = engine
                .perform_action(start.session_id, "thunderbolt")
                .unwrap();
            if state.winner.is_some() {
                log = state.log;
                break;
            }
        }
        log
    };
    assert_eq!(run(), run());
}
