//! Progression pets.
//!
//! `Pet` is the narrow slice of the collection-side pet record the battle
//! engine reads and writes: identity, talents, feature slots, progression
//! counters and the stats a pet enters battle with.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::buffs::Buff;
use crate::effects::identifier::{buff_query, call_arg, flag, NamedAttributeAccessor};
use crate::status::{Status, StatusType};

/// Highest reachable level.
pub const MAX_LEVEL: i32 = 100;

/// A collected pet.
///
/// ## Example
///
/// ```
/// use pet_battle::pets::Pet;
/// use pet_battle::status::Status;
/// use pet_battle::effects::NamedAttributeAccessor;
///
/// let mut pet = Pet::new(25, Status::new(60.0, 50.0, 70.0, 50.0, 90.0, 120.0)).with_level(40);
/// assert_eq!(pet.get("level"), 40.0);
///
/// pet.set("record(wins)", 3.0);
/// assert_eq!(pet.get("record(wins)"), 3.0);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Pet {
    pub id: i32,
    pub base_id: i32,
    pub element: i32,
    pub sub_element: i32,
    pub personality: i32,
    pub height: i32,
    pub weight: i32,
    pub level: i32,
    pub exp: u32,
    pub iv: i32,

    /// Effort values per visible stat (`atk def mat mdf spd hp`).
    pub ev: [i32; 6],

    /// Effort points not yet assigned.
    pub ev_storage: i32,

    pub has_emblem: bool,
    pub feature_id: i32,
    pub emblem_id: i32,

    /// Progression counters keyed by content-defined names.
    #[serde(default)]
    pub records: FxHashMap<String, f64>,

    /// Learned skill ids.
    #[serde(default)]
    pub skill_ids: Vec<i32>,

    /// Buffs the pet brings into every battle (species default + feature).
    #[serde(default)]
    pub init_buffs: Vec<Buff>,

    /// Stats at full health.
    pub normal_status: Status,

    /// Stats right now; only `hp` differs from `normal_status` out of battle.
    pub current_status: Status,
}

impl Pet {
    /// Create a level-1 pet at full health.
    #[must_use]
    pub fn new(id: i32, normal_status: Status) -> Self {
        Self {
            id,
            base_id: id,
            element: 0,
            sub_element: 0,
            personality: 0,
            height: 0,
            weight: 0,
            level: 1,
            exp: 0,
            iv: 0,
            ev: [0; 6],
            ev_storage: 0,
            has_emblem: false,
            feature_id: 0,
            emblem_id: 0,
            records: FxHashMap::default(),
            skill_ids: Vec::new(),
            init_buffs: Vec::new(),
            normal_status,
            current_status: normal_status,
        }
    }

    /// Set the level (builder pattern).
    #[must_use]
    pub fn with_level(mut self, level: i32) -> Self {
        self.level = level.clamp(1, MAX_LEVEL);
        self
    }

    /// Set the elements (builder pattern).
    #[must_use]
    pub fn with_element(mut self, element: i32, sub_element: i32) -> Self {
        self.element = element;
        self.sub_element = sub_element;
        self
    }

    /// Set learned skills (builder pattern).
    #[must_use]
    pub fn with_skills(mut self, skill_ids: Vec<i32>) -> Self {
        self.skill_ids = skill_ids;
        self
    }

    /// Set the battle-entry buffs (builder pattern).
    #[must_use]
    pub fn with_init_buffs(mut self, buffs: Vec<Buff>) -> Self {
        self.init_buffs = buffs;
        self
    }

    /// Current hp.
    #[must_use]
    pub fn hp(&self) -> f64 {
        self.current_status[StatusType::Hp]
    }

    /// Set current hp, clamped to `[0, normal hp]`.
    pub fn set_hp(&mut self, hp: f64) {
        let max = self.normal_status[StatusType::Hp].max(0.0);
        self.current_status[StatusType::Hp] = hp.clamp(0.0, max);
    }

    /// Return every assigned effort point to storage.
    pub fn reset_ev(&mut self) {
        let total: i32 = self.ev.iter().sum();
        self.ev_storage += total;
        self.ev = [0; 6];
    }
}

impl NamedAttributeAccessor for Pet {
    fn try_get(&self, name: &str) -> Option<f64> {
        if let Some(arg) = call_arg(name, "skill") {
            let id: i32 = arg.trim().parse().ok()?;
            return Some(flag(self.skill_ids.contains(&id)));
        }
        if let Some(arg) = call_arg(name, "buff") {
            return buff_query(self.init_buffs.iter(), arg);
        }
        if let Some(key) = call_arg(name, "record") {
            return self.records.get(key).copied();
        }

        Some(match name {
            "id" => f64::from(self.id),
            "baseId" => f64::from(self.base_id),
            "element" => f64::from(self.element),
            "subElement" => f64::from(self.sub_element),
            "personality" => f64::from(self.personality),
            "height" => f64::from(self.height),
            "weight" => f64::from(self.weight),
            "level" => f64::from(self.level),
            "exp" => f64::from(self.exp),
            "iv" => f64::from(self.iv),
            "evStorage" => f64::from(self.ev_storage),
            "emblem" => flag(self.has_emblem),
            "featureId" => f64::from(self.feature_id),
            "emblemId" => f64::from(self.emblem_id),
            _ => return None,
        })
    }

    fn set(&mut self, name: &str, value: f64) -> bool {
        if let Some(key) = call_arg(name, "record") {
            self.records.insert(key.to_string(), value);
            return true;
        }

        match name {
            "personality" => self.personality = value as i32,
            "height" => self.height = value as i32,
            "weight" => self.weight = value as i32,
            "level" => self.level = (value as i32).clamp(1, MAX_LEVEL),
            "exp" => self.exp = value.max(0.0) as u32,
            "iv" => self.iv = value as i32,
            "evStorage" => self.ev_storage = value as i32,
            "emblem" => self.has_emblem = value > 0.0,
            "featureId" => self.feature_id = value as i32,
            "emblemId" => self.emblem_id = value as i32,
            _ => return false,
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pet() -> Pet {
        Pet::new(7, Status::new(50.0, 50.0, 50.0, 50.0, 50.0, 100.0))
            .with_level(30)
            .with_skills(vec![100, 101])
    }

    #[test]
    fn test_skill_membership() {
        let pet = pet();
        assert_eq!(pet.get("skill(100)"), 1.0);
        assert_eq!(pet.get("skill(5)"), 0.0);
        assert_eq!(pet.try_get("skill(x)"), None);
    }

    #[test]
    fn test_records() {
        let mut pet = pet();
        assert_eq!(pet.try_get("record(wins)"), None);
        assert!(pet.set("record(wins)", 4.0));
        assert_eq!(pet.get("record(wins)"), 4.0);
    }

    #[test]
    fn test_read_only_names() {
        let mut pet = pet();
        assert!(!pet.set("id", 99.0));
        assert!(!pet.set("element", 3.0));
        assert!(!pet.set("nonsense", 1.0));
        assert_eq!(pet.id, 7);
    }

    #[test]
    fn test_level_clamped() {
        let mut pet = pet();
        pet.set("level", 250.0);
        assert_eq!(pet.level, MAX_LEVEL);
    }

    #[test]
    fn test_hp_clamped() {
        let mut pet = pet();
        pet.set_hp(150.0);
        assert_eq!(pet.hp(), 100.0);
        pet.set_hp(-10.0);
        assert_eq!(pet.hp(), 0.0);
    }

    #[test]
    fn test_reset_ev() {
        let mut pet = pet();
        pet.ev = [10, 0, 20, 0, 0, 5];
        pet.ev_storage = 3;
        pet.reset_ev();
        assert_eq!(pet.ev, [0; 6]);
        assert_eq!(pet.ev_storage, 38);
    }
}
