//! Per-pet battle statistics.
//!
//! `StatusController` layers three vectors:
//! - `init`: the pet's stats when it entered battle
//! - `added`: permanent battle additions (`AddStatus`)
//! - `powerup`: clamped power-up stages on the first five channels
//!
//! and owns the anger bounds.

use serde::{Deserialize, Serialize};

use super::status::{stage_multiplier, Status, StatusType, POWERUP_CHANNELS};
use crate::core::BattleConfig;

/// Battle statistics for one pet.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StatusController {
    init: Status,
    added: Status,
    powerup: Status,
    powerup_limit: i32,

    /// Lower anger bound.
    pub min_anger: i32,

    /// Upper anger bound.
    pub max_anger: i32,
}

impl StatusController {
    /// Create a controller for a pet entering battle with `init` stats.
    #[must_use]
    pub fn new(init: Status, config: &BattleConfig) -> Self {
        Self {
            init,
            added: Status::zero(),
            powerup: Status::zero(),
            powerup_limit: config.powerup_limit,
            min_anger: config.min_anger,
            max_anger: config.max_anger,
        }
    }

    /// Stats at battle entry.
    #[must_use]
    pub fn init_status(&self) -> &Status {
        &self.init
    }

    /// Current power-up stages.
    #[must_use]
    pub fn powerup(&self) -> &Status {
        &self.powerup
    }

    /// Stage on one channel.
    #[must_use]
    pub fn powerup_stage(&self, channel: StatusType) -> i32 {
        self.powerup[channel] as i32
    }

    /// Effective stats: `(init + added)` with stage multipliers applied to
    /// the power-up channels.
    #[must_use]
    pub fn battle_status(&self) -> Status {
        let mut status = self.init + self.added;
        for channel in StatusType::powerup_channels() {
            status[channel] *= stage_multiplier(self.powerup_stage(channel));
        }
        status
    }

    /// Permanently add to a battle stat by channel index.
    ///
    /// Returns false for an out-of-range index.
    pub fn add_battle_status(&mut self, index: usize, amount: f64) -> bool {
        match StatusType::from_index(index) {
            Some(channel) => {
                self.added[channel] += amount;
                true
            }
            None => false,
        }
    }

    /// Add stage deltas, clamping each power-up channel to the stage limit.
    ///
    /// Returns the channels whose stage actually changed.
    pub fn add_powerup(&mut self, delta: &Status) -> Vec<StatusType> {
        let mut changed = Vec::new();
        for channel in StatusType::powerup_channels() {
            let step = delta[channel] as i32;
            if step == 0 {
                continue;
            }
            let old = self.powerup_stage(channel);
            let new = (old + step).clamp(-self.powerup_limit, self.powerup_limit);
            if new != old {
                self.powerup[channel] = f64::from(new);
                changed.push(channel);
            }
        }
        changed
    }

    /// Overwrite one stage (clamped). Ignores non power-up channels.
    pub fn set_powerup(&mut self, channel: StatusType, stage: i32) {
        if channel.index() >= POWERUP_CHANNELS {
            return;
        }
        self.powerup[channel] = f64::from(stage.clamp(-self.powerup_limit, self.powerup_limit));
    }

    /// Clamp an anger value into the current bounds.
    #[must_use]
    pub fn clamp_anger(&self, anger: i32) -> i32 {
        anger.clamp(self.min_anger, self.max_anger.max(self.min_anger))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> StatusController {
        StatusController::new(
            Status::new(100.0, 80.0, 60.0, 40.0, 50.0, 200.0),
            &BattleConfig::default(),
        )
    }

    #[test]
    fn test_powerup_clamps() {
        let mut status = controller();
        let delta = Status::zero().with(StatusType::Atk, 4.0);

        status.add_powerup(&delta);
        let changed = status.add_powerup(&delta);

        assert_eq!(changed, vec![StatusType::Atk]);
        assert_eq!(status.powerup_stage(StatusType::Atk), 6);

        // Already at the cap: no change reported
        assert!(status.add_powerup(&delta).is_empty());
    }

    #[test]
    fn test_powerup_ignores_hp() {
        let mut status = controller();
        let delta = Status::zero().with(StatusType::Hp, 3.0);
        assert!(status.add_powerup(&delta).is_empty());
        assert_eq!(status.powerup()[StatusType::Hp], 0.0);
    }

    #[test]
    fn test_battle_status_applies_stages() {
        let mut status = controller();
        status.add_powerup(&Status::zero().with(StatusType::Atk, 2.0).with(StatusType::Def, -2.0));

        let battle = status.battle_status();
        assert_eq!(battle[StatusType::Atk], 200.0);
        assert_eq!(battle[StatusType::Def], 40.0);
        assert_eq!(battle[StatusType::Hp], 200.0);
    }

    #[test]
    fn test_add_battle_status() {
        let mut status = controller();
        assert!(status.add_battle_status(StatusType::Rec.index(), 20.0));
        assert!(!status.add_battle_status(99, 1.0));
        assert_eq!(status.battle_status()[StatusType::Rec], 120.0);
    }

    #[test]
    fn test_set_powerup() {
        let mut status = controller();
        status.set_powerup(StatusType::Spd, -9);
        assert_eq!(status.powerup_stage(StatusType::Spd), -6);
        status.set_powerup(StatusType::Rec, 3);
        assert_eq!(status.powerup()[StatusType::Rec], 0.0);
    }

    #[test]
    fn test_clamp_anger() {
        let status = controller();
        assert_eq!(status.clamp_anger(150), 100);
        assert_eq!(status.clamp_anger(-5), 0);
    }
}
