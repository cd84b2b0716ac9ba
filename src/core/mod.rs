//! Core types: unit IDs, RNG, option maps, operators, configuration.
//!
//! These are the building blocks every other module leans on. None of them
//! know about pets, buffs or skills.

pub mod entity;
pub mod rng;
pub mod config;
pub mod options;
pub mod operator;

pub use entity::{Side, UnitId};
pub use rng::{BattleRng, BattleRngState};
pub use config::BattleConfig;
pub use options::{parse_bool, parse_float_list, parse_int_list, OptionMap, EMPTY_OPTIONS};
pub use operator::Operator;
