//! Battle state: units, their teams and skill systems, and the phase
//! history chain.

mod state;
mod unit;

pub use state::{BattleResult, BattleResultState, BattleState, Weather};
pub use unit::{PetSystem, Unit, UnitSkillSystem};
