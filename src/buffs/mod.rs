//! Buffs: templates, runtime instances and the per-pet controller.
//!
//! - `BuffInfo`: immutable template shared through `Arc`
//! - `Buff`: runtime instance (turn, clamped value, option overrides)
//! - `BuffController`: ordered collection with block set and copy policies

mod buff;
mod controller;
mod info;

pub use buff::{
    is_power_id, power_buff_id, power_channel, Buff, CAPTURE_PENALTY_BUFF_ID, PERMANENT_TURN,
    POWERDOWN_DOUBLE_BUFF_ID, POWERUP_DOUBLE_BUFF_ID, PREVIEW_TURN,
};
pub use controller::{BuffChange, BuffController};
pub use info::{BuffInfo, BuffType, CopyHandleType};
