pub mod ai;
pub mod damage;
pub mod pokemon;
pub mod session;
pub mod types;

pub use pokemon::Pokemon;
