//! Skills and the skill-selection wire format.

mod rpc;
mod skill;

pub use rpc::{RpcData, WireError};
pub use skill::{Skill, SkillType};
