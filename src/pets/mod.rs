//! Pets: the progression record and its in-battle wrapper.

mod battle_pet;
mod pet;

pub use battle_pet::BattlePet;
pub use pet::{Pet, MAX_LEVEL};
