//! Turn-based battle engine for creatures drawn from a remote catalog.
//!
//! The main entry point is [`engine::BattleEngine`]: it normalizes catalog
//! records into combatants, registers sessions, and resolves one full
//! player-then-opponent exchange per action. Catalog access goes through the
//! [`catalog::CatalogProvider`] trait; [`catalog::pokeapi::PokeApiClient`]
//! wrapped in [`catalog::cache::Cached`] is the live configuration.

pub mod catalog;
pub mod engine;
pub mod error;
pub mod registry;
pub mod sim;

/// Commonly used exports for external consumers.
pub mod prelude {
    pub use crate::catalog::{cache::Cached, pokeapi::PokeApiClient, CatalogProvider};
    pub use crate::engine::{BattleEngine, SessionStart, StartSessionRequest};
    pub use crate::error::BattleError;
    pub use crate::sim::ai::Difficulty;
    pub use crate::sim::pokemon::{Move, MoveClass, Pokemon, Stats};
    pub use crate::sim::session::{SessionState, Turn, Winner};
}
