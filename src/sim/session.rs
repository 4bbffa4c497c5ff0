use crate::error::BattleError;
use crate::sim::ai::{ai_for, BattleAI, Difficulty};
use crate::sim::damage::{compute_damage, roll_accuracy, roll_random_factor, DETERMINISTIC_FACTOR};
use crate::sim::pokemon::{BattleState, Move, Pokemon};
use crate::sim::types::TypeChart;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Turn {
    Player,
    Opponent,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Winner {
    Player,
    Opponent,
}

/// Mutable battle state as reported to the caller. The narration log is
/// append-only; once `winner` is set the whole value is terminal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    pub player: BattleState,
    pub opponent: BattleState,
    pub turn: Turn,
    pub log: Vec<String>,
    pub winner: Option<Winner>,
}

/// One battle between two combatants. A single [`perform_action`] call
/// resolves a full player-then-opponent exchange; there is no separate
/// opponent entry point.
///
/// [`perform_action`]: BattleSession::perform_action
pub struct BattleSession {
    player: Pokemon,
    opponent: Pokemon,
    state: SessionState,
    difficulty: Difficulty,
    ai: Box<dyn BattleAI>,
    rng: SmallRng,
    fixed_factor: Option<f32>,
}

impl BattleSession {
    pub fn new(player: Pokemon, opponent: Pokemon, difficulty: Difficulty, seed: u64) -> Self {
        let state = SessionState {
            player: BattleState::full(player.stats.hp),
            opponent: BattleState::full(opponent.stats.hp),
            turn: Turn::Player,
            log: vec![format!(
                "Battle started! {} vs {}",
                player.name.to_uppercase(),
                opponent.name.to_uppercase()
            )],
            winner: None,
        };
        Self {
            player,
            opponent,
            state,
            difficulty,
            ai: ai_for(difficulty),
            rng: SmallRng::seed_from_u64(seed),
            fixed_factor: None,
        }
    }

    /// Deterministic mode: every damage roll uses `factor` instead of the
    /// [0.85, 1.0] draw, so outcomes replay exactly.
    pub fn with_fixed_factor(mut self, factor: f32) -> Self {
        self.fixed_factor = Some(factor);
        self
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn player(&self) -> &Pokemon {
        &self.player
    }

    pub fn opponent(&self) -> &Pokemon {
        &self.opponent
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// Resolve one full exchange: the player's move, then (unless the battle
    /// ended) the opponent's reply. Fails without touching the state when the
    /// battle is over or the move id is not the player's.
    pub fn perform_action(
        &mut self,
        chart: &TypeChart,
        move_id: &str,
    ) -> Result<&SessionState, BattleError> {
        if self.state.winner.is_some() {
            return Err(BattleError::SessionEnded);
        }
        if self.state.turn != Turn::Player {
            return Err(BattleError::NotPlayersTurn);
        }
        let move_def = self
            .player
            .find_move(move_id)
            .cloned()
            .ok_or_else(|| BattleError::UnknownMove(move_id.to_string()))?;

        let factor = self.damage_factor(&move_def);
        let damage = compute_damage(&self.player, &self.opponent, &move_def, chart, factor);
        let hit = roll_accuracy(&move_def, &mut self.rng);
        if hit {
            self.state.opponent.take_damage(damage);
            self.state
                .log
                .push(hit_line(&self.player.name, &move_def.name, damage));
        } else {
            self.state
                .log
                .push(miss_line(&self.player.name, &move_def.name));
        }

        if self.state.opponent.is_fainted() {
            self.state.winner = Some(Winner::Player);
            self.state
                .log
                .push(victory_line(&self.opponent.name, &self.player.name));
            return Ok(&self.state);
        }

        self.state.turn = Turn::Opponent;
        self.opponent_turn(chart);

        if self.state.player.is_fainted() {
            self.state.winner = Some(Winner::Opponent);
            self.state
                .log
                .push(victory_line(&self.player.name, &self.opponent.name));
            return Ok(&self.state);
        }

        self.state.turn = Turn::Player;
        Ok(&self.state)
    }

    fn opponent_turn(&mut self, chart: &TypeChart) {
        // An empty moveset forfeits the turn silently.
        let Some(move_def) = self.ai.select_move(&self.opponent, &mut self.rng).cloned() else {
            return;
        };
        let factor = self.damage_factor(&move_def);
        let damage = compute_damage(&self.opponent, &self.player, &move_def, chart, factor);
        if roll_accuracy(&move_def, &mut self.rng) {
            self.state.player.take_damage(damage);
            self.state
                .log
                .push(hit_line(&self.opponent.name, &move_def.name, damage));
        } else {
            self.state
                .log
                .push(miss_line(&self.opponent.name, &move_def.name));
        }
    }

    // Zero-power moves deal no damage and must not consume randomness.
    fn damage_factor(&mut self, move_def: &Move) -> f32 {
        if move_def.power == 0 {
            return DETERMINISTIC_FACTOR;
        }
        match self.fixed_factor {
            Some(factor) => factor,
            None => roll_random_factor(&mut self.rng),
        }
    }
}

fn hit_line(attacker: &str, move_name: &str, damage: u32) -> String {
    format!(
        "{} used {}! It dealt {} damage!",
        attacker.to_uppercase(),
        move_name.to_uppercase(),
        damage
    )
}

fn miss_line(attacker: &str, move_name: &str) -> String {
    format!(
        "{} used {}... But it missed!",
        attacker.to_uppercase(),
        move_name.to_uppercase()
    )
}

fn victory_line(fainted: &str, winner: &str) -> String {
    format!(
        "{} fainted! {} wins!",
        fainted.to_uppercase(),
        winner.to_uppercase()
    )
}
