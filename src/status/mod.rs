//! Status/power model.
//!
//! - `Status`: numeric vector over named channels
//! - `StatusType`: stable channel name ↔ index mapping
//! - `StatusController`: base stats, battle additions, power-up stages, anger bounds

mod status;
mod controller;

pub use status::{stage_multiplier, Status, StatusType, POWERUP_CHANNELS, STATUS_CHANNELS};
pub use controller::StatusController;
