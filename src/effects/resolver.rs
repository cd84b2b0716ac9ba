//! Effect dispatch and resolution passes.
//!
//! Every `EffectAbility` maps to one handler function. A handler receives
//! the effect, the scope it acts on and the shared context, mutates the
//! scope and reports whether it handled the effect. A handler that
//! returns false has changed nothing.
//!
//! `EffectResolver::resolve_timing` runs one phase: it gathers the
//! matching effects of both units' skills and buffs and dispatches them in
//! order. Buff on-add/on-remove hooks are chained through
//! `run_buff_hooks`, bounded by `BattleConfig::max_hook_depth`.

use tracing::{debug, warn};

use super::abilities;
use super::effect::{Effect, EffectAbility, EffectSource, EffectTiming};
use crate::battle::{BattleState, Unit};
use crate::buffs::{Buff, BuffChange};
use crate::content::Database;
use crate::core::{BattleConfig, UnitId};
use crate::pets::{BattlePet, Pet};

/// What an effect acts on.
pub enum EffectScope<'s> {
    /// A running battle.
    Battle(&'s mut BattleState),
    /// A progression pet outside battle. Only Heal and SetPet accept it.
    Pet(&'s mut Pet),
}

/// Read-only collaborators shared by every handler.
#[derive(Clone, Copy)]
pub struct ResolverContext<'a> {
    pub db: &'a Database,
    pub config: &'a BattleConfig,
}

impl<'a> ResolverContext<'a> {
    #[must_use]
    pub fn new(db: &'a Database, config: &'a BattleConfig) -> Self {
        Self { db, config }
    }
}

/// Signature shared by every ability handler.
pub type AbilityHandler = fn(&Effect, EffectScope<'_>, &ResolverContext<'_>) -> bool;

impl EffectAbility {
    /// The handler for this ability.
    #[must_use]
    pub fn handler(self) -> AbilityHandler {
        match self {
            Self::Win => abilities::win,
            Self::Escape => abilities::escape,
            Self::Capture => abilities::capture,
            Self::PetChange => abilities::pet_change,
            Self::Heal => abilities::heal,
            Self::Rage => abilities::rage,
            Self::Powerup => abilities::powerup,
            Self::AddStatus => abilities::add_status,
            Self::BlockBuff => abilities::block_buff,
            Self::AddBuff => abilities::add_buff,
            Self::RemoveBuff => abilities::remove_buff,
            Self::CopyBuff => abilities::copy_buff,
            Self::SetBuff => abilities::set_buff,
            Self::SetDamage => abilities::set_damage,
            Self::SetSkill => abilities::set_skill,
            Self::SetPet => abilities::set_pet,
            Self::SetWeather => abilities::set_weather,
        }
    }
}

/// Runs effects against battle state.
pub struct EffectResolver;

impl EffectResolver {
    /// Dispatch one effect.
    pub fn dispatch(effect: &Effect, scope: EffectScope<'_>, ctx: &ResolverContext<'_>) -> bool {
        let handled = (effect.ability.handler())(effect, scope, ctx);
        debug!(
            ability = %effect.ability,
            invoker = ?effect.invoker,
            handled,
            "effect dispatched"
        );
        handled
    }

    /// Advance `state` to `timing` and run every effect that fires there.
    ///
    /// Order: the acting unit's skill effects, the other unit's skill
    /// effects, then each unit's buff effects in buff insertion order.
    /// Failed effects are skipped. Once the battle has ended only
    /// `OnBattleEnd` effects still run.
    ///
    /// Returns the number of effects handled.
    pub fn resolve_timing(
        state: &mut BattleState,
        timing: EffectTiming,
        ctx: &ResolverContext<'_>,
    ) -> usize {
        state.advance(timing);
        let effects = Self::collect_effects(state, timing);

        let mut handled = 0;
        for effect in &effects {
            if timing != EffectTiming::OnBattleEnd && state.phase == EffectTiming::OnBattleEnd {
                debug!("battle ended mid-phase, skipping remaining effects");
                break;
            }
            if Self::dispatch(effect, EffectScope::Battle(&mut *state), ctx) {
                handled += 1;
            }
        }
        handled
    }

    /// Effects firing at `timing`, bound to their invoking units, in
    /// resolution order.
    #[must_use]
    pub fn collect_effects(state: &BattleState, timing: EffectTiming) -> Vec<Effect> {
        let Some(other) = state.rhs_id(state.atk_unit) else {
            return Vec::new();
        };
        let order = [state.atk_unit, other];
        let units = order.iter().filter_map(|&id| state.unit(id));

        let mut effects = Vec::new();
        for unit in units.clone() {
            effects.extend(
                unit.skill()
                    .effects
                    .iter()
                    .filter(|e| e.timing == timing)
                    .map(|e| e.clone().with_invoker(unit.id)),
            );
        }
        for unit in units {
            let Some(pet) = unit.pet() else { continue };
            for buff in pet.buffs.iter() {
                effects.extend(buff_effects(buff, timing, unit.id));
            }
        }
        effects
    }

    /// Fire on-remove hooks for the buffs that left `unit`'s pet, then
    /// on-add hooks for the buffs that entered it.
    pub fn run_buff_hooks(
        state: &mut BattleState,
        unit: UnitId,
        change: BuffChange,
        ctx: &ResolverContext<'_>,
    ) {
        if change.is_empty() {
            return;
        }

        let depth = state.hook_depth();
        if depth >= ctx.config.max_hook_depth {
            warn!(depth, "buff hook chain too deep, hooks skipped");
            return;
        }

        let hooks: Vec<Effect> = change
            .removed
            .iter()
            .flat_map(|b| buff_effects(b, EffectTiming::OnRemoveBuff, unit))
            .chain(
                change
                    .added
                    .iter()
                    .flat_map(|b| buff_effects(b, EffectTiming::OnAddBuff, unit)),
            )
            .collect();
        if hooks.is_empty() {
            return;
        }

        state.set_hook_depth(depth + 1);
        for effect in &hooks {
            Self::dispatch(effect, EffectScope::Battle(&mut *state), ctx);
        }
        state.set_hook_depth(depth);
    }

    /// Mutate `unit`'s active pet and fire hooks for the buffs that
    /// entered or left. Returns false when the unit has no active pet.
    pub fn with_pet(
        state: &mut BattleState,
        unit: UnitId,
        ctx: &ResolverContext<'_>,
        f: impl FnOnce(&mut BattlePet) -> BuffChange,
    ) -> bool {
        let Some(pet) = state.unit_mut(unit).and_then(Unit::pet_mut) else {
            return false;
        };
        let change = f(pet);
        Self::run_buff_hooks(state, unit, change, ctx);
        true
    }

    /// Add a buff to `unit`'s active pet, firing hooks.
    pub fn add_buff(
        state: &mut BattleState,
        unit: UnitId,
        buff: Buff,
        ctx: &ResolverContext<'_>,
    ) -> bool {
        Self::with_pet(state, unit, ctx, |pet| pet.buffs.add_buff(buff))
    }
}

fn buff_effects(buff: &Buff, timing: EffectTiming, unit: UnitId) -> impl Iterator<Item = Effect> + '_ {
    buff.info()
        .effects
        .iter()
        .filter(move |e| e.timing == timing)
        .map(move |e| {
            e.clone()
                .with_invoker(unit)
                .with_source(EffectSource::Buff(buff.id))
        })
}
