use crate::sim::pokemon::{Move, Pokemon};
use rand::seq::SliceRandom;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Strategy key stored on each session. Every tier currently resolves to
/// [`RandomAI`]; harder tiers get their own strategy here without touching
/// the session state machine.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl FromStr for Difficulty {
    type Err = std::convert::Infallible;

    // Lenient: unknown tiers fall back to Normal.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Difficulty::Easy,
            "hard" => Difficulty::Hard,
            _ => Difficulty::Normal,
        })
    }
}

pub trait BattleAI: Send {
    /// Pick a move for the opponent, or `None` to forfeit the turn.
    fn select_move<'a>(&self, pokemon: &'a Pokemon, rng: &mut dyn RngCore) -> Option<&'a Move>;
}

pub struct RandomAI;

impl BattleAI for RandomAI {
    fn select_move<'a>(&self, pokemon: &'a Pokemon, rng: &mut dyn RngCore) -> Option<&'a Move> {
        pokemon.moves.choose(rng)
    }
}

pub fn ai_for(difficulty: Difficulty) -> Box<dyn BattleAI> {
    match difficulty {
        Difficulty::Easy | Difficulty::Normal | Difficulty::Hard => Box::new(RandomAI),
    }
}
