//! # pet-battle
//!
//! Effect resolution engine for a turn-based monster battle.
//!
//! ## Design Principles
//!
//! 1. **Content-Driven**: Skills, buffs and items are data. Each carries
//!    effects made of an ability tag, a timing and a `key=value&...`
//!    option string. Option values may be arithmetic expressions over
//!    named battle attributes.
//!
//! 2. **Fail Quietly**: A malformed option or a missing template never
//!    aborts a battle. The handler reports false and leaves the state
//!    untouched.
//!
//! 3. **Deterministic**: Every unit owns a seeded RNG, so replaying the
//!    same inputs reproduces the same battle byte for byte.
//!
//! ## Architecture
//!
//! - **History Chain**: Each phase advance freezes the previous
//!   `BattleState` behind an `Rc`, so effects can read last turn's values.
//!
//! - **Persistent Data Structures**: Buff lists use `im-rs`, so freezing a
//!   state is cheap.
//!
//! ## Modules
//!
//! - `core`: Unit ids, RNG, option maps, operators, configuration
//! - `status`: Stat vectors, power-up stages, anger bounds
//! - `buffs`: Buff templates, instances and the per-pet controller
//! - `skills`: Skills and the skill-selection wire format
//! - `pets`: Progression pets and their in-battle wrapper
//! - `battle`: Units, battle state and results
//! - `effects`: Effects, the operand parser and the ability handlers
//! - `content`: Template database and tabular loaders

pub mod core;
pub mod status;
pub mod buffs;
pub mod skills;
pub mod pets;
pub mod battle;
pub mod effects;
pub mod content;

// Re-export commonly used types
pub use crate::core::{BattleConfig, BattleRng, OptionMap, Operator, Side, UnitId};

pub use crate::status::{Status, StatusController, StatusType};

pub use crate::buffs::{Buff, BuffChange, BuffController, BuffInfo, BuffType, CopyHandleType};

pub use crate::skills::{Skill, SkillType, WireError};

pub use crate::pets::{BattlePet, Pet};

pub use crate::battle::{BattleResultState, BattleState, Unit, Weather};

pub use crate::effects::{
    Effect, EffectAbility, EffectResolver, EffectScope, EffectTiming, NamedAttributeAccessor,
    OperandContext, ResolverContext,
};

pub use crate::content::{ContentError, Database};
