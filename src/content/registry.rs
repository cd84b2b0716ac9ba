//! Template database.
//!
//! The `Database` stores every buff and skill template plus the effect
//! lists of usable items. Templates are shared by `Arc` so runtime buffs
//! and cloned battle states never copy them.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::buffs::{Buff, BuffInfo};
use crate::core::BattleRng;
use crate::effects::Effect;
use crate::skills::Skill;

/// Registry of buff, skill and item templates.
///
/// ## Example
///
/// ```
/// use pet_battle::buffs::{BuffInfo, BuffType, CopyHandleType};
/// use pet_battle::content::Database;
///
/// let mut db = Database::new();
/// let burn = BuffInfo::new(7, "Burn", BuffType::Abnormal, CopyHandleType::Block, 3, "none", "")
///     .unwrap();
/// db.insert_buff(burn);
///
/// assert_eq!(db.buff_info(7).map(|b| b.turn), Some(3));
/// assert!(db.buff_info(8).is_none());
/// ```
#[derive(Clone, Debug, Default)]
pub struct Database {
    buffs: FxHashMap<i32, Arc<BuffInfo>>,
    skills: FxHashMap<i32, Arc<Skill>>,
    items: FxHashMap<i32, Vec<Effect>>,
}

impl Database {
    /// Create an empty database.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a buff template, replacing any previous one with its id.
    pub fn insert_buff(&mut self, info: BuffInfo) {
        self.buffs.insert(info.id, Arc::new(info));
    }

    /// Register a skill template, replacing any previous one with its id.
    pub fn insert_skill(&mut self, skill: Skill) {
        self.skills.insert(skill.id, Arc::new(skill));
    }

    /// Register the effects an item applies when used.
    pub fn insert_item(&mut self, item_id: i32, effects: Vec<Effect>) {
        self.items.insert(item_id, effects);
    }

    /// Buff template by id.
    #[must_use]
    pub fn buff_info(&self, id: i32) -> Option<Arc<BuffInfo>> {
        self.buffs.get(&id).cloned()
    }

    /// A runtime buff with its template's default turn count.
    #[must_use]
    pub fn new_buff(&self, id: i32) -> Option<Buff> {
        self.buff_info(id).map(Buff::from_info)
    }

    /// A fresh copy of a skill template.
    #[must_use]
    pub fn skill(&self, id: i32) -> Option<Skill> {
        self.skills.get(&id).map(|s| Skill::clone(s))
    }

    /// A skill template, or the no-op placeholder for unknown ids.
    #[must_use]
    pub fn skill_or_no_op(&self, id: i32) -> Skill {
        self.skill(id).unwrap_or_else(Skill::no_op)
    }

    /// Effects of an item; empty for unknown items.
    #[must_use]
    pub fn item_effects(&self, item_id: i32) -> Vec<Effect> {
        self.items.get(&item_id).cloned().unwrap_or_default()
    }

    /// A uniformly chosen ordinary skill: neither super nor a special
    /// action. Candidates are ordered by id so the draw is reproducible.
    pub fn random_skill(&self, rng: &mut BattleRng) -> Option<Skill> {
        let mut ids: Vec<i32> = self
            .skills
            .values()
            .filter(|s| !s.is_super() && !s.is_action())
            .map(|s| s.id)
            .collect();
        ids.sort_unstable();
        rng.choose(&ids).and_then(|&id| self.skill(id))
    }

    /// Number of buff templates.
    #[must_use]
    pub fn buff_count(&self) -> usize {
        self.buffs.len()
    }

    /// Number of skill templates.
    #[must_use]
    pub fn skill_count(&self) -> usize {
        self.skills.len()
    }

    /// Iterate over buff templates in no particular order.
    pub fn buffs(&self) -> impl Iterator<Item = &Arc<BuffInfo>> {
        self.buffs.values()
    }

    /// Iterate over skill templates in no particular order.
    pub fn skills(&self) -> impl Iterator<Item = &Arc<Skill>> {
        self.skills.values()
    }
}
