//! Skills.
//!
//! A `Skill` loaded from content is a template; the database hands out
//! owned clones so `SetSkill` can rewrite the copy in use without touching
//! the template. Negative ids are reserved for the special actions a unit
//! can take instead of a move (pass, item, switch, escape).

use serde::{Deserialize, Serialize};
use strum::{Display, FromRepr};

use crate::content::error::{parse_flag, parse_float, parse_int};
use crate::content::ContentError;
use crate::core::{OptionMap, EMPTY_OPTIONS};
use crate::effects::identifier::{flag, NamedAttributeAccessor};
use crate::effects::{Effect, EffectAbility, EffectSource};

/// Skill category. Negative codes are special actions and double as ids.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Display, FromRepr)]
#[repr(i32)]
pub enum SkillType {
    NoOp = -1,
    Item = -2,
    PetChange = -3,
    Escape = -4,
    Property = 0,
    Physic = 1,
    Special = 2,
    Super = 100,
}

impl SkillType {
    /// Numeric code.
    #[must_use]
    pub const fn code(self) -> i32 {
        self as i32
    }
}

/// A move or special action.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Skill {
    pub id: i32,
    pub name: String,
    pub element: i32,
    pub skill_type: SkillType,
    pub power: i32,
    pub anger: i32,
    pub accuracy: i32,
    pub options: OptionMap,
    pub description: String,
    pub effects: Vec<Effect>,

    // Option-derived
    pub critical: f64,
    pub priority: i32,
    pub combo: i32,
    pub second_super: bool,
    pub ignore_shield: bool,
    pub ignore_powerup: bool,
    pub ref_buffs: Vec<String>,
}

impl Skill {
    /// Build a template from its columns, reading the option-derived flags.
    ///
    /// # Errors
    ///
    /// Returns `ContentError` when a flag or number option does not parse.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: i32,
        name: impl Into<String>,
        element: i32,
        skill_type: SkillType,
        power: i32,
        anger: i32,
        accuracy: i32,
        options: &str,
        description: impl Into<String>,
    ) -> Result<Self, ContentError> {
        let options = OptionMap::parse(options);
        let critical = parse_float("critical", options.get_or("critical", "5"))?;
        let priority = parse_int("priority", options.get_or("priority", "0"))?;
        let second_super = parse_flag("second_super", options.get_or("second_super", "false"))?;
        let ignore_shield = parse_flag("ignore_shield", options.get_or("ignore_shield", "false"))?;
        let ignore_powerup =
            parse_flag("ignore_powerup", options.get_or("ignore_powerup", "false"))?;
        let ref_buffs = options
            .get("ref_buff")
            .map(|raw| raw.split('/').map(str::to_string).collect())
            .unwrap_or_default();

        Ok(Self {
            id,
            name: name.into(),
            element,
            skill_type,
            power,
            anger,
            accuracy,
            options,
            description: description.into(),
            effects: Vec::new(),
            critical,
            priority,
            combo: 1,
            second_super,
            ignore_shield,
            ignore_powerup,
            ref_buffs,
        })
    }

    fn special(skill_type: SkillType, name: &str) -> Self {
        Self {
            id: skill_type.code(),
            name: name.to_string(),
            element: 0,
            skill_type,
            power: 0,
            anger: 0,
            accuracy: 100,
            options: OptionMap::new(),
            description: String::new(),
            effects: Vec::new(),
            critical: 5.0,
            priority: 0,
            combo: 1,
            second_super: false,
            ignore_shield: false,
            ignore_powerup: false,
            ref_buffs: Vec::new(),
        }
    }

    /// Pass the turn. Also the placeholder for unknown skill ids.
    #[must_use]
    pub fn no_op() -> Self {
        Self::special(SkillType::NoOp, "No-op")
    }

    /// Run from battle.
    #[must_use]
    pub fn escape() -> Self {
        Self::special(SkillType::Escape, "Escape").with_effects(vec![Effect::escape()])
    }

    /// Switch the active pet.
    #[must_use]
    pub fn pet_change(source_index: usize, target_index: usize, passive: bool) -> Self {
        let mut skill = Self::special(SkillType::PetChange, "Pet change");
        skill.options.set("source_index", source_index.to_string());
        skill.options.set("target_index", target_index.to_string());
        skill.options.set("passive", passive.to_string());
        skill.with_effects(vec![Effect::pet_change(source_index, target_index, passive)])
    }

    /// Use an item; the item's effects become the skill's effects.
    #[must_use]
    pub fn item(item_id: i32, effects: Vec<Effect>) -> Self {
        let mut skill = Self::special(SkillType::Item, "Item");
        skill.options.set("item_id", item_id.to_string());
        skill.with_effects(effects)
    }

    /// Attach effects, pointing their source at this skill (builder pattern).
    #[must_use]
    pub fn with_effects(mut self, effects: Vec<Effect>) -> Self {
        self.set_effects(effects);
        self
    }

    /// Replace the effect list, pointing each effect's source at this skill.
    pub fn set_effects(&mut self, effects: Vec<Effect>) {
        let source = EffectSource::Skill(self.id);
        self.effects = effects
            .into_iter()
            .map(|e| e.with_source(source))
            .collect();
    }

    #[must_use]
    pub fn is_super(&self) -> bool {
        self.skill_type == SkillType::Super
    }

    /// Special actions (pass, item, switch, escape).
    #[must_use]
    pub fn is_action(&self) -> bool {
        self.skill_type.code() < 0
    }

    /// Damaging moves.
    #[must_use]
    pub fn is_attack(&self) -> bool {
        matches!(
            self.skill_type,
            SkillType::Physic | SkillType::Special | SkillType::Super
        )
    }

    /// Whether any effect attempts a capture.
    #[must_use]
    pub fn is_capture(&self) -> bool {
        self.effects
            .iter()
            .any(|e| e.ability == EffectAbility::Capture)
    }

    /// Outcome recorded by the last capture attempt, if any.
    #[must_use]
    pub fn capture_result(&self) -> Option<bool> {
        self.options.get("capture_result").map(|v| v == "true")
    }

    /// Render back to content columns. The option column is rebuilt from
    /// the option-derived fields, omitting defaults.
    #[must_use]
    pub fn to_row(&self) -> Vec<String> {
        let mut options = OptionMap::new();
        if self.critical != 5.0 {
            options.set("critical", self.critical.to_string());
        }
        if self.priority != 0 {
            options.set("priority", self.priority.to_string());
        }
        if self.second_super {
            options.set("second_super", "true");
        }
        if self.ignore_shield {
            options.set("ignore_shield", "true");
        }
        if self.ignore_powerup {
            options.set("ignore_powerup", "true");
        }
        if !self.ref_buffs.is_empty() {
            options.set("ref_buff", self.ref_buffs.join("/"));
        }
        let options = if options.is_empty() {
            EMPTY_OPTIONS.to_string()
        } else {
            options.to_option_string()
        };

        vec![
            self.id.to_string(),
            self.name.clone(),
            self.element.to_string(),
            self.skill_type.code().to_string(),
            self.power.to_string(),
            self.anger.to_string(),
            self.accuracy.to_string(),
            options,
            self.description.clone(),
        ]
    }
}

impl NamedAttributeAccessor for Skill {
    fn try_get(&self, name: &str) -> Option<f64> {
        Some(match name {
            "id" => f64::from(self.id),
            "element" => f64::from(self.element),
            "type" => f64::from(self.skill_type.code()),
            "power" => f64::from(self.power),
            "anger" => f64::from(self.anger),
            "accuracy" => f64::from(self.accuracy),
            "priority" => f64::from(self.priority),
            "critical" => self.critical,
            "combo" => f64::from(self.combo),
            "ignoreShield" => flag(self.ignore_shield),
            "ignorePowerup" => flag(self.ignore_powerup),
            "secondSuper" => flag(self.second_super),
            _ => return None,
        })
    }

    fn set(&mut self, name: &str, value: f64) -> bool {
        match name {
            "element" => self.element = value as i32,
            "type" => match SkillType::from_repr(value as i32) {
                Some(t) => self.skill_type = t,
                None => return false,
            },
            "power" => self.power = value as i32,
            "anger" => self.anger = value as i32,
            "accuracy" => self.accuracy = value as i32,
            "priority" => self.priority = value as i32,
            "critical" => self.critical = value,
            "combo" => self.combo = value as i32,
            "ignoreShield" => self.ignore_shield = value != 0.0,
            "ignorePowerup" => self.ignore_powerup = value != 0.0,
            "secondSuper" => self.second_super = value != 0.0,
            _ => return false,
        }
        true
    }
}
