//! Pets in battle.
//!
//! A `BattlePet` wraps a progression `Pet` with the state that only exists
//! during a battle: hp, anger, the stat controller and the buff list. Each
//! battle pet owns its controllers exclusively.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::pet::Pet;
use crate::buffs::{power_buff_id, Buff, BuffChange, BuffController};
use crate::content::Database;
use crate::core::BattleConfig;
use crate::effects::identifier::{buff_query, call_arg, flag, NamedAttributeAccessor};
use crate::status::{Status, StatusController, StatusType};

/// A pet taking part in a battle.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BattlePet {
    /// Progression record.
    pub pet: Pet,

    /// Current hp.
    pub hp: i32,

    /// Current anger.
    pub anger: i32,

    /// Stats, power-up stages and anger bounds.
    pub status: StatusController,

    /// Active buffs.
    pub buffs: BuffController,
}

impl BattlePet {
    /// Bring a pet into battle with its current hp and its entry buffs.
    #[must_use]
    pub fn new(pet: Pet, config: &BattleConfig) -> Self {
        let status = StatusController::new(pet.normal_status, config);
        let hp = pet.hp() as i32;
        let mut buffs = BuffController::new();
        buffs.add_range_buff(pet.init_buffs.iter().cloned());

        let mut battle_pet = Self {
            pet,
            hp: 0,
            anger: 0,
            status,
            buffs,
        };
        battle_pet.set_hp(hp);
        battle_pet.set_anger(config.initial_anger);
        battle_pet
    }

    /// Maximum hp from the current battle stats.
    #[must_use]
    pub fn max_hp(&self) -> i32 {
        self.status.battle_status()[StatusType::Hp] as i32
    }

    /// Whether the pet has fainted.
    #[must_use]
    pub fn is_dead(&self) -> bool {
        self.hp <= 0
    }

    /// Set hp, clamped to `[0, max_hp]`.
    pub fn set_hp(&mut self, hp: i32) {
        self.hp = hp.clamp(0, self.max_hp().max(0));
    }

    /// Set anger, clamped to the current bounds.
    pub fn set_anger(&mut self, anger: i32) {
        self.anger = self.status.clamp_anger(anger);
    }

    /// Effective battle stats.
    #[must_use]
    pub fn battle_status(&self) -> Status {
        self.status.battle_status()
    }

    /// Apply power-up stage deltas.
    ///
    /// A direction whose marker buff id is blocked is dropped before the
    /// deltas are applied. Marker buffs of changed channels are re-synced.
    pub fn power_up(&mut self, delta: &Status, db: &Database) -> BuffChange {
        let mut delta = *delta;
        for channel in StatusType::powerup_channels() {
            let step = delta[channel];
            if step != 0.0 && self.buffs.is_blocked(power_buff_id(channel, step > 0.0)) {
                debug!(%channel, "power-up direction blocked");
                delta[channel] = 0.0;
            }
        }

        let mut change = BuffChange::default();
        for channel in self.status.add_powerup(&delta) {
            change.merge(self.sync_power_buff(channel, db));
        }
        change
    }

    /// Overwrite one channel's stage and re-sync its marker buff.
    pub fn set_powerup(&mut self, channel: StatusType, stage: i32, db: &Database) -> BuffChange {
        self.status.set_powerup(channel, stage);
        self.sync_power_buff(channel, db)
    }

    /// Re-sync every power-up marker buff.
    pub fn sync_power_buffs(&mut self, db: &Database) -> BuffChange {
        let mut change = BuffChange::default();
        for channel in StatusType::powerup_channels() {
            change.merge(self.sync_power_buff(channel, db));
        }
        change
    }

    /// Keep exactly the marker buff matching the channel's stage, valued at
    /// the stage's magnitude.
    fn sync_power_buff(&mut self, channel: StatusType, db: &Database) -> BuffChange {
        let stage = self.status.powerup_stage(channel);
        let up = power_buff_id(channel, true);
        let down = power_buff_id(channel, false);

        let mut change = BuffChange::default();
        let wanted = match stage.signum() {
            1 => Some(up),
            -1 => Some(down),
            _ => None,
        };
        for id in [up, down] {
            if Some(id) != wanted {
                change.merge(self.buffs.remove_id(id));
            }
        }

        let Some(id) = wanted else {
            return change;
        };
        let magnitude = stage.abs();
        if let Some(update) = self.buffs.update_buff(id, |b| b.set_value(magnitude)) {
            change.merge(update);
        } else if let Some(info) = db.buff_info(id) {
            change.merge(self.buffs.add_buff(Buff::new(info, -1, magnitude)));
        }
        change
    }
}

impl NamedAttributeAccessor for BattlePet {
    fn try_get(&self, name: &str) -> Option<f64> {
        if let Some(arg) = call_arg(name, "buff") {
            return buff_query(self.buffs.iter(), arg);
        }
        if let Some(arg) = call_arg(name, "init") {
            return StatusType::from_name(arg).map(|t| self.status.init_status()[t]);
        }
        if let Some(arg) = call_arg(name, "powerup") {
            return StatusType::from_name(arg).map(|t| self.status.powerup()[t]);
        }

        let value = match name {
            "hp" => f64::from(self.hp),
            "maxHp" => f64::from(self.max_hp()),
            "anger" => f64::from(self.anger),
            "minAnger" => f64::from(self.status.min_anger),
            "maxAnger" => f64::from(self.status.max_anger),
            "isDead" => flag(self.is_dead()),
            _ => match self.battle_status().get_by_name(name) {
                Some(v) => v,
                None => return self.pet.try_get(name),
            },
        };
        Some(value)
    }

    fn set(&mut self, name: &str, value: f64) -> bool {
        if let Some(arg) = call_arg(name, "powerup") {
            return match StatusType::from_name(arg) {
                Some(t) => {
                    self.status.set_powerup(t, value as i32);
                    true
                }
                None => false,
            };
        }

        match name {
            "hp" => self.set_hp(value as i32),
            "anger" => self.set_anger(value as i32),
            "minAnger" => {
                self.status.min_anger = value as i32;
                self.set_anger(self.anger);
            }
            "maxAnger" => {
                self.status.max_anger = value as i32;
                self.set_anger(self.anger);
            }
            _ => return self.pet.set(name, value),
        }
        true
    }
}
