use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveClass {
    Physical,
    Special,
    Status,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Move {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub move_type: String,
    pub power: u32,
    pub class: MoveClass,
    pub accuracy: u32,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    pub hp: u32,
    pub attack: u32,
    pub defense: u32,
    pub sp_attack: u32,
    pub sp_defense: u32,
    pub speed: u32,
}

/// A catalog creature normalized into battle-ready form. Immutable once a
/// session owns it; all per-battle mutation lives in [`BattleState`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pokemon {
    pub name: String,
    #[serde(default)]
    pub sprite: Option<String>,
    pub types: Vec<String>,
    pub stats: Stats,
    pub moves: Vec<Move>,
}

impl Pokemon {
    pub fn find_move(&self, move_id: &str) -> Option<&Move> {
        self.moves.iter().find(|m| m.id == move_id)
    }

    pub fn has_type(&self, type_name: &str) -> bool {
        self.types.iter().any(|t| t.eq_ignore_ascii_case(type_name))
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub struct BattleState {
    pub hp: u32,
    pub max_hp: u32,
}

impl BattleState {
    pub fn full(max_hp: u32) -> Self {
        Self { hp: max_hp, max_hp }
    }

    pub fn take_damage(&mut self, damage: u32) {
        self.hp = self.hp.saturating_sub(damage);
    }

    pub fn is_fainted(&self) -> bool {
        self.hp == 0
    }
}
