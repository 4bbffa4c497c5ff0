use crate::catalog::CatalogError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum BattleError {
    #[error("Pokémon '{0}' not found. Please check the spelling and try again.")]
    PokemonNotFound(String),
    #[error("session {0} not found")]
    SessionNotFound(Uuid),
    #[error("move '{0}' not found")]
    UnknownMove(String),
    #[error("battle has already ended")]
    SessionEnded,
    #[error("not your turn")]
    NotPlayersTurn,
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}
