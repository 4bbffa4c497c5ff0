use crate::sim::pokemon::{Move, MoveClass, Pokemon};
use crate::sim::types::TypeChart;
use rand::Rng;

/// All damage is computed at a fixed level.
pub const LEVEL: u32 = 50;

/// Random factor substituted in deterministic mode instead of a [0.85, 1.0]
/// roll, so battles replay exactly under test.
pub const DETERMINISTIC_FACTOR: f32 = 0.95;

pub fn roll_random_factor(rng: &mut impl Rng) -> f32 {
    rng.gen_range(0.85..=1.0)
}

/// Level-50 damage formula: stat pair selected by move class, STAB, type
/// effectiveness, random factor, floored and clamped to at least 1.
///
/// A zero-power move deals 0 and never reaches the clamp; for everything else
/// the clamp holds even at 0x type effectiveness.
pub fn compute_damage(
    attacker: &Pokemon,
    defender: &Pokemon,
    move_def: &Move,
    chart: &TypeChart,
    random_factor: f32,
) -> u32 {
    let (attack_stat, defense_stat) = match move_def.class {
        MoveClass::Special => (attacker.stats.sp_attack, defender.stats.sp_defense),
        MoveClass::Physical | MoveClass::Status => (attacker.stats.attack, defender.stats.defense),
    };
    if move_def.power == 0 {
        return 0;
    }
    let attack = attack_stat as f32;
    let defense = defense_stat.max(1) as f32;
    let base =
        ((2.0 * LEVEL as f32 / 5.0 + 2.0) * move_def.power as f32 * attack / defense) / 50.0 + 2.0;
    let stab = if attacker.has_type(&move_def.move_type) {
        1.5
    } else {
        1.0
    };
    let effectiveness = chart.multiplier(&move_def.move_type, &defender.types);
    let damage = (base * stab * effectiveness * random_factor).floor() as u32;
    damage.max(1)
}

/// Accuracy at or above 100 always hits without consuming randomness;
/// 0 never hits; otherwise a uniform [0, 100) roll decides.
pub fn roll_accuracy(move_def: &Move, rng: &mut impl Rng) -> bool {
    if move_def.accuracy >= 100 {
        return true;
    }
    if move_def.accuracy == 0 {
        return false;
    }
    rng.gen_range(0.0..100.0) < move_def.accuracy as f32
}
