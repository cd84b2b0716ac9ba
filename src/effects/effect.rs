//! Effect records.
//!
//! An effect is one content row attached to a skill or buff: an ability
//! tag, the timing it fires at, and the option map the ability reads.
//! Effects hold no references to their owner; `source` names it by id and
//! `invoker` names the unit it acts for.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::core::{OptionMap, UnitId};

/// Ability tag. Each tag maps to exactly one handler in the dispatch table.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum EffectAbility {
    Win,
    Escape,
    Capture,
    PetChange,
    Heal,
    Rage,
    Powerup,
    AddStatus,
    BlockBuff,
    AddBuff,
    RemoveBuff,
    CopyBuff,
    SetBuff,
    SetDamage,
    SetSkill,
    SetPet,
    SetWeather,
}

/// Point in turn resolution an effect fires at. Also the phase of a
/// `BattleState`.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
    EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum EffectTiming {
    #[default]
    OnBattleStart,
    OnTurnStart,
    OnBeforeAttack,
    OnAttack,
    OnAfterAttack,
    OnTurnEnd,
    OnBattleEnd,
    /// Fired on the owning buff right after it enters a pet's buff list.
    OnAddBuff,
    /// Fired on the owning buff right after it leaves a pet's buff list.
    OnRemoveBuff,
}

impl EffectTiming {
    /// Phases in which a unit's chosen action resolves.
    #[must_use]
    pub const fn is_action(self) -> bool {
        matches!(self, Self::OnBeforeAttack | Self::OnAttack | Self::OnAfterAttack)
    }
}

/// Non-owning back-reference to whatever carries the effect.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectSource {
    /// Free-standing effect (items, tests).
    #[default]
    None,
    /// Owned by the skill with this id.
    Skill(i32),
    /// Owned by the buff with this id.
    Buff(i32),
}

/// A single content-authored effect.
///
/// ## Example
///
/// ```
/// use pet_battle::effects::{Effect, EffectAbility, EffectTiming};
///
/// let effect = Effect::new(EffectTiming::OnAttack, EffectAbility::Heal, "add=50&type=skill");
/// assert_eq!(effect.option("add", "0"), "50");
/// assert_eq!(effect.option("who", "me"), "me");
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Effect {
    /// When the effect fires.
    pub timing: EffectTiming,

    /// Which handler runs.
    pub ability: EffectAbility,

    /// Handler options.
    pub options: OptionMap,

    /// Unit the effect acts for. Set when the owner is attached to a unit.
    #[serde(default)]
    pub invoker: Option<UnitId>,

    /// Owning skill or buff.
    #[serde(default)]
    pub source: EffectSource,
}

impl Effect {
    /// Create an effect from an option string.
    #[must_use]
    pub fn new(timing: EffectTiming, ability: EffectAbility, options: &str) -> Self {
        Self {
            timing,
            ability,
            options: OptionMap::parse(options),
            invoker: None,
            source: EffectSource::None,
        }
    }

    /// Set the invoking unit (builder pattern).
    #[must_use]
    pub fn with_invoker(mut self, unit: UnitId) -> Self {
        self.invoker = Some(unit);
        self
    }

    /// Set the owner (builder pattern).
    #[must_use]
    pub fn with_source(mut self, source: EffectSource) -> Self {
        self.source = source;
        self
    }

    /// Read an option with its documented default.
    #[must_use]
    pub fn option<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.options.get_or(key, default)
    }

    /// The effect carried by the escape skill.
    #[must_use]
    pub fn escape() -> Self {
        Self::new(EffectTiming::OnAttack, EffectAbility::Escape, "")
    }

    /// The effect carried by a pet-switch skill.
    #[must_use]
    pub fn pet_change(source_index: usize, target_index: usize, passive: bool) -> Self {
        let options = format!(
            "source_index={source_index}&target_index={target_index}&passive={passive}"
        );
        let timing = if passive {
            EffectTiming::OnTurnEnd
        } else {
            EffectTiming::OnBeforeAttack
        };
        Self::new(timing, EffectAbility::PetChange, &options)
    }
}
