//! Battle units.
//!
//! A `Unit` is one side of a battle: its team of battle pets with the
//! active-pet cursor, the skill chosen this turn with the per-turn
//! damage/heal accumulators, and its own RNG stream.

use serde::{Deserialize, Serialize};

use crate::core::{BattleRng, UnitId};
use crate::effects::identifier::{flag, NamedAttributeAccessor};
use crate::pets::BattlePet;
use crate::skills::Skill;

/// A unit's team and which pet is out.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PetSystem {
    pub pets: Vec<BattlePet>,
    pub cursor: usize,
}

impl PetSystem {
    /// Team with the first pet out.
    #[must_use]
    pub fn new(pets: Vec<BattlePet>) -> Self {
        Self { pets, cursor: 0 }
    }

    /// The active pet.
    #[must_use]
    pub fn current(&self) -> Option<&BattlePet> {
        self.pets.get(self.cursor)
    }

    /// The active pet, mutably.
    pub fn current_mut(&mut self) -> Option<&mut BattlePet> {
        self.pets.get_mut(self.cursor)
    }

    /// Whether `index` names a team slot.
    #[must_use]
    pub fn is_valid_index(&self, index: i64) -> bool {
        usize::try_from(index).is_ok_and(|i| i < self.pets.len())
    }
}

/// The skill in use this turn and what it has done so far.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UnitSkillSystem {
    pub skill: Skill,
    pub skill_damage: i32,
    pub item_damage: i32,
    pub buff_damage: i32,
    pub skill_heal: i32,
    pub item_heal: i32,
    pub buff_heal: i32,
    pub is_hit: bool,
    pub is_critical: bool,
    pub element_relation: f64,
}

impl Default for UnitSkillSystem {
    fn default() -> Self {
        Self::new(Skill::no_op())
    }
}

impl UnitSkillSystem {
    /// Fresh accumulators around a chosen skill.
    #[must_use]
    pub fn new(skill: Skill) -> Self {
        Self {
            skill,
            skill_damage: 0,
            item_damage: 0,
            buff_damage: 0,
            skill_heal: 0,
            item_heal: 0,
            buff_heal: 0,
            is_hit: false,
            is_critical: false,
            element_relation: 1.0,
        }
    }

    /// Zero the accumulators, keeping the skill.
    pub fn reset(&mut self) {
        let skill = std::mem::replace(&mut self.skill, Skill::no_op());
        *self = Self::new(skill);
    }
}

impl NamedAttributeAccessor for UnitSkillSystem {
    fn try_get(&self, name: &str) -> Option<f64> {
        Some(match name {
            "skillDamage" => f64::from(self.skill_damage),
            "itemDamage" => f64::from(self.item_damage),
            "buffDamage" => f64::from(self.buff_damage),
            "skillHeal" => f64::from(self.skill_heal),
            "itemHeal" => f64::from(self.item_heal),
            "buffHeal" => f64::from(self.buff_heal),
            "isHit" => flag(self.is_hit),
            "isCritical" => flag(self.is_critical),
            "elementRelation" => self.element_relation,
            _ => return self.skill.try_get(name),
        })
    }

    fn set(&mut self, name: &str, value: f64) -> bool {
        match name {
            "skillDamage" => self.skill_damage = value as i32,
            "itemDamage" => self.item_damage = value as i32,
            "buffDamage" => self.buff_damage = value as i32,
            "skillHeal" => self.skill_heal = value as i32,
            "itemHeal" => self.item_heal = value as i32,
            "buffHeal" => self.buff_heal = value as i32,
            "isHit" => self.is_hit = value != 0.0,
            "isCritical" => self.is_critical = value != 0.0,
            "elementRelation" => self.element_relation = value,
            _ => return self.skill.set(name, value),
        }
        true
    }
}

/// One side of a battle.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Unit {
    pub id: UnitId,
    pub pet_system: PetSystem,
    pub skill_system: UnitSkillSystem,
    pub rng: BattleRng,

    /// Set when the unit has nothing left to do this battle.
    pub is_done: bool,
}

impl Unit {
    /// Create a unit with its team. The RNG stream is derived from the
    /// battle seed and the unit id.
    #[must_use]
    pub fn new(id: UnitId, pets: Vec<BattlePet>, seed: u64) -> Self {
        Self {
            id,
            pet_system: PetSystem::new(pets),
            skill_system: UnitSkillSystem::default(),
            rng: BattleRng::for_unit(seed, id.raw()),
            is_done: false,
        }
    }

    /// The active pet.
    #[must_use]
    pub fn pet(&self) -> Option<&BattlePet> {
        self.pet_system.current()
    }

    /// The active pet, mutably.
    pub fn pet_mut(&mut self) -> Option<&mut BattlePet> {
        self.pet_system.current_mut()
    }

    /// The skill chosen this turn.
    #[must_use]
    pub fn skill(&self) -> &Skill {
        &self.skill_system.skill
    }

    /// Choose a skill for this turn, clearing the accumulators.
    pub fn set_skill(&mut self, skill: Skill) {
        self.skill_system = UnitSkillSystem::new(skill);
    }

    /// Draw in `[0, 100)` from the unit's stream.
    pub fn roll(&mut self) -> f64 {
        self.rng.percent()
    }
}
