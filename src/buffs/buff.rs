//! Runtime buffs.
//!
//! A `Buff` owns its mutable fields (turn, value, option overrides) and
//! shares its template through an `Arc<BuffInfo>`.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::info::BuffInfo;
use crate::core::OptionMap;
use crate::effects::identifier::{flag, NamedAttributeAccessor};
use crate::status::{StatusType, POWERUP_CHANNELS};

/// Turn count of a permanent buff.
pub const PERMANENT_TURN: i32 = -1;

/// Turn count of a template preview buff.
pub const PREVIEW_TURN: i32 = -2;

/// Buff that doubles raised power-up stages.
pub const POWERUP_DOUBLE_BUFF_ID: i32 = 45;

/// Buff that doubles lowered power-up stages.
pub const POWERDOWN_DOUBLE_BUFF_ID: i32 = 46;

/// Buff that divides capture probability by three.
pub const CAPTURE_PENALTY_BUFF_ID: i32 = -2;

/// Ids `1..=10` mirror power-up stages.
#[must_use]
pub fn is_power_id(id: i32) -> bool {
    (1..=2 * POWERUP_CHANNELS as i32).contains(&id)
}

/// Channel and direction of a power-linked buff id: `(channel, raised)`.
#[must_use]
pub fn power_channel(id: i32) -> Option<(StatusType, bool)> {
    if !is_power_id(id) {
        return None;
    }
    let index = (id - 1) / 2;
    let channel = StatusType::from_index(index as usize)?;
    Some((channel, id % 2 == 1))
}

/// Marker buff id for a channel and direction.
#[must_use]
pub fn power_buff_id(channel: StatusType, raised: bool) -> i32 {
    let base = 2 * channel.index() as i32;
    if raised {
        base + 1
    } else {
        base + 2
    }
}

/// A buff attached to a battle pet.
///
/// `value` is private so it can only change through `set_value`, which
/// keeps it inside the template's bounds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Buff {
    /// Template id.
    pub id: i32,

    /// Remaining turns. `-1` permanent, `-2` preview.
    pub turn: i32,

    value: i32,

    /// Per-instance option overrides; lookups fall back to the template.
    #[serde(default)]
    pub options: OptionMap,

    info: Arc<BuffInfo>,
}

impl Buff {
    /// Create a buff from a template with an explicit turn and value.
    #[must_use]
    pub fn new(info: Arc<BuffInfo>, turn: i32, value: i32) -> Self {
        let value = info.clamp_value(value);
        Self {
            id: info.id,
            turn,
            value,
            options: OptionMap::new(),
            info,
        }
    }

    /// Create a buff with the template's base turn count and value 0.
    #[must_use]
    pub fn from_info(info: Arc<BuffInfo>) -> Self {
        let turn = info.turn;
        Self::new(info, turn, 0)
    }

    /// The shared template.
    #[must_use]
    pub fn info(&self) -> &BuffInfo {
        &self.info
    }

    /// A second handle to the shared template.
    #[must_use]
    pub fn info_arc(&self) -> Arc<BuffInfo> {
        Arc::clone(&self.info)
    }

    /// Current value.
    #[must_use]
    pub fn value(&self) -> i32 {
        self.value
    }

    /// Set the value, clamped into the template's bounds.
    pub fn set_value(&mut self, value: i32) {
        self.value = self.info.clamp_value(value);
    }

    /// Add to the value, clamped.
    pub fn add_value(&mut self, amount: i32) {
        self.set_value(self.value.saturating_add(amount));
    }

    /// Option lookup: instance overrides first, then the template.
    #[must_use]
    pub fn option(&self, key: &str) -> Option<&str> {
        self.options.get(key).or_else(|| self.info.options.get(key))
    }

    /// Whether the buff mirrors a power-up stage.
    #[must_use]
    pub fn is_power(&self) -> bool {
        is_power_id(self.id)
    }

    /// Whether the buff should leave its controller right now.
    #[must_use]
    pub fn should_auto_remove(&self) -> bool {
        self.info.auto_remove && self.value <= 0
    }

    /// Whether the turn counter has run out.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.turn == 0
    }

    /// Count down one turn. Permanent and preview buffs never expire.
    pub fn tick(&mut self) {
        if self.turn > 0 {
            self.turn -= 1;
        }
    }
}

impl NamedAttributeAccessor for Buff {
    fn try_get(&self, name: &str) -> Option<f64> {
        let info = self.info();
        Some(match name {
            "id" => f64::from(self.id),
            "turn" => f64::from(self.turn),
            "value" => f64::from(self.value),
            "type" => f64::from(info.buff_type as i32),
            "copy" => f64::from(info.copy_handle as i32),
            "hide" => flag(info.hide),
            "keep" => flag(info.keep),
            "inherit" => flag(info.inherit),
            "autoRemove" => flag(info.auto_remove),
            _ => return None,
        })
    }

    fn set(&mut self, name: &str, value: f64) -> bool {
        match name {
            "turn" => self.turn = value as i32,
            "value" => self.set_value(value as i32),
            _ => return false,
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffs::{BuffType, CopyHandleType};

    fn shield() -> Arc<BuffInfo> {
        Arc::new(
            BuffInfo::new(
                30,
                "Shield",
                BuffType::Normal,
                CopyHandleType::Stack,
                -1,
                "auto_remove=true&min_val=0&max_val=500&tag=guard",
                "",
            )
            .unwrap(),
        )
    }

    #[test]
    fn test_power_ids() {
        assert!(is_power_id(1));
        assert!(is_power_id(10));
        assert!(!is_power_id(11));
        assert!(!is_power_id(0));

        assert_eq!(power_channel(1), Some((StatusType::Atk, true)));
        assert_eq!(power_channel(2), Some((StatusType::Atk, false)));
        assert_eq!(power_channel(9), Some((StatusType::Spd, true)));
        assert_eq!(power_buff_id(StatusType::Mdf, false), 8);

        for id in 1..=10 {
            let (channel, raised) = power_channel(id).unwrap();
            assert_eq!(power_buff_id(channel, raised), id);
        }
    }

    #[test]
    fn test_value_clamped() {
        let mut buff = Buff::new(shield(), -1, 900);
        assert_eq!(buff.value(), 500);
        buff.add_value(-800);
        assert_eq!(buff.value(), 0);
        assert!(buff.should_auto_remove());
    }

    #[test]
    fn test_option_fallback() {
        let mut buff = Buff::from_info(shield());
        assert_eq!(buff.option("tag"), Some("guard"));
        buff.options.set("tag", "wall");
        assert_eq!(buff.option("tag"), Some("wall"));
        assert_eq!(buff.option("missing"), None);
    }

    #[test]
    fn test_tick() {
        let mut buff = Buff::new(shield(), 1, 10);
        buff.tick();
        assert!(buff.is_expired());

        let mut permanent = Buff::new(shield(), PERMANENT_TURN, 10);
        permanent.tick();
        assert_eq!(permanent.turn, PERMANENT_TURN);
    }

    #[test]
    fn test_accessor() {
        let mut buff = Buff::new(shield(), 3, 40);
        assert_eq!(buff.get("value"), 40.0);
        assert_eq!(buff.get("autoRemove"), 1.0);
        assert_eq!(buff.try_get("power"), None);

        assert!(buff.set("value", 9999.0));
        assert_eq!(buff.value(), 500);
        assert!(!buff.set("id", 5.0));
        assert_eq!(buff.id, 30);
    }
}
