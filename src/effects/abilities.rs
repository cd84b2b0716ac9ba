//! Ability handlers.
//!
//! One function per `EffectAbility`. Each reads its options with their
//! documented defaults, resolves `who`/`source`/`target` against the
//! invoker, evaluates every operand, and only then mutates. Any option
//! that fails to parse returns false before the first write.
//!
//! | Ability | Options (default) |
//! |---|---|
//! | Win | `who` (me) |
//! | Escape | none |
//! | Capture | `prob` (0) |
//! | PetChange | `target_index` (-1) |
//! | Heal | `who` (me), `type` (skill), `add` (0), `set` (none) |
//! | Rage | `who` (me), `add` (0), `min` (none), `max` (none) |
//! | Powerup | `who` (me), `atk def mat mdf spd` (0), `random` (false), `random_pdf` (none) |
//! | AddStatus | `who` (me), `type` (5), `mult` (0/1), `add` (0) |
//! | BlockBuff | `who` (me), `op` (+), `id_list` (0), `id_range` (0/0) |
//! | AddBuff | `who` (me), `id` (0), `turn` (-1), `value` (0) |
//! | RemoveBuff | `who` (me), `id` (0), `type` (none) |
//! | CopyBuff | `id` (0), `type` (none), `source` (op), `target` (me), `transfer` (false), `reverse` (false) |
//! | SetBuff | `who` (me), `id` (0), `type` (value), `op` (+), `value` (0) |
//! | SetDamage | `who` (me), `state` (current), `type` (skill), `op` (+), `value` (0) |
//! | SetSkill | `who` (me), `type` (none), `op` (+), `value` (0), `set_anger` (false) |
//! | SetPet | `who` (me), `type` (none), `op` (+), `value` (0) |
//! | SetWeather | `weather` (0) |

use tracing::debug;

use super::effect::{Effect, EffectTiming};
use super::identifier::NamedAttributeAccessor;
use super::parser::OperandContext;
use super::resolver::{EffectResolver, EffectScope, ResolverContext};
use crate::battle::{BattleResultState, BattleState, Unit, Weather};
use crate::buffs::{
    power_channel, Buff, BuffChange, BuffType, CAPTURE_PENALTY_BUFF_ID, POWERDOWN_DOUBLE_BUFF_ID,
    POWERUP_DOUBLE_BUFF_ID,
};
use crate::core::{parse_bool, parse_float_list, parse_int_list, Operator, Side, UnitId};
use crate::skills::Skill;
use crate::status::{Status, StatusType};

/// Capture chance in percent before the roll.
///
/// Below 100 the base chance is divided by three when the defender holds
/// the capture penalty buff, then scaled by how much hp it has lost:
/// up to 25% lost ×0.25, up to 50% ×1, up to 75% ×1.5, beyond ×2.
#[must_use]
pub fn capture_probability(prob: f64, hp: i32, max_hp: i32, penalized: bool) -> f64 {
    if prob >= 100.0 {
        return prob;
    }

    let lost = if max_hp > 0 {
        1.0 - f64::from(hp) / f64::from(max_hp)
    } else {
        1.0
    };

    let mut value = prob;
    if penalized {
        value /= 3.0;
    }
    let scale = if lost <= 0.25 {
        0.25
    } else if lost <= 0.5 {
        1.0
    } else if lost <= 0.75 {
        1.5
    } else {
        2.0
    };
    value * scale
}

fn side(effect: &Effect, key: &str, default: &str) -> Side {
    Side::from_option(effect.option(key, default))
}

/// Unit the effect targets through `key`, relative to its invoker.
fn target_id(state: &BattleState, effect: &Effect, key: &str, default: &str) -> Option<UnitId> {
    state.side_id(effect.invoker?, side(effect, key, default))
}

/// The `who` unit and its opponent.
fn who_units<'s>(state: &'s BattleState, effect: &Effect) -> Option<(&'s Unit, &'s Unit)> {
    let lhs = target_id(state, effect, "who", "me")?;
    Some((state.unit(lhs)?, state.rhs_unit(lhs)?))
}

fn battle(scope: EffectScope<'_>) -> Option<&mut BattleState> {
    match scope {
        EffectScope::Battle(state) => Some(state),
        EffectScope::Pet(_) => None,
    }
}

fn is_set(raw: &str) -> bool {
    raw != crate::core::EMPTY_OPTIONS
}

/// End the battle in favor of the `who` unit.
pub fn win(effect: &Effect, scope: EffectScope<'_>, _ctx: &ResolverContext<'_>) -> bool {
    let Some(state) = battle(scope) else { return false };
    let Some(lhs) = target_id(state, effect, "who", "me") else {
        return false;
    };

    let result = if state.is_my_unit(lhs) {
        BattleResultState::Win
    } else {
        BattleResultState::Lose
    };
    state.finish(result);
    true
}

/// End the battle with the acting unit escaping.
pub fn escape(_effect: &Effect, scope: EffectScope<'_>, _ctx: &ResolverContext<'_>) -> bool {
    let Some(state) = battle(scope) else { return false };

    let result = if state.is_my_unit(state.atk_unit) {
        BattleResultState::MyEscape
    } else {
        BattleResultState::OpEscape
    };
    state.finish(result);
    true
}

/// Try to capture the opposing pet.
///
/// The outcome is written to the invoker's skill as `capture_result`.
pub fn capture(effect: &Effect, scope: EffectScope<'_>, _ctx: &ResolverContext<'_>) -> bool {
    let Some(state) = battle(scope) else { return false };
    let Ok(prob) = effect.option("prob", "0").trim().parse::<f64>() else {
        return false;
    };
    let Some(invoker) = effect.invoker else { return false };
    let Some(defender) = state.rhs_unit(invoker).and_then(Unit::pet) else {
        return false;
    };

    let value = capture_probability(
        prob,
        defender.hp,
        defender.max_hp(),
        defender.buffs.contains(CAPTURE_PENALTY_BUFF_ID),
    );

    let Some(lhs) = state.unit_mut(invoker) else { return false };
    let roll = lhs.roll();
    let success = value >= roll;
    lhs.skill_system
        .skill
        .options
        .set("capture_result", success.to_string());
    debug!(value, roll, success, "capture attempted");

    if success {
        state.finish(BattleResultState::CaptureSuccess);
    }
    true
}

/// Switch the invoker's active pet.
///
/// Inherit buffs and every non-keep buff leave the outgoing pet. Anger
/// carries over scaled by the configured ratio. The inherit buffs move to
/// the incoming pet unless the outgoing one has fainted.
pub fn pet_change(effect: &Effect, scope: EffectScope<'_>, ctx: &ResolverContext<'_>) -> bool {
    let Some(state) = battle(scope) else { return false };
    let Ok(target) = effect.option("target_index", "-1").trim().parse::<i64>() else {
        return false;
    };
    let Some(invoker) = effect.invoker else { return false };
    let Some(unit) = state.unit(invoker) else { return false };
    if !unit.pet_system.is_valid_index(target) {
        return false;
    }
    let Some(pet) = unit.pet() else { return false };
    let target = target as usize;

    let is_dead = pet.is_dead();
    let anger = pet.anger;
    let inherit: Vec<Buff> = pet.buffs.get_range_buff(|b| b.info().inherit).cloned().collect();

    EffectResolver::with_pet(state, invoker, ctx, |pet| pet.buffs.remove_buffs(&inherit));
    EffectResolver::with_pet(state, invoker, ctx, |pet| {
        pet.buffs.remove_range_buff(|b| !b.info().keep)
    });

    let Some(unit) = state.unit_mut(invoker) else { return false };
    unit.pet_system.cursor = target;
    let carried = (f64::from(anger) * ctx.config.pet_change_anger_ratio).floor() as i32;
    if let Some(pet) = unit.pet_mut() {
        pet.set_anger(carried);
    }

    if !is_dead {
        EffectResolver::with_pet(state, invoker, ctx, |pet| pet.buffs.add_range_buff(inherit));
    }
    if state.is_my_unit(invoker) {
        state.result.add_fight_pet_cursor(target);
    }
    debug!(unit = %invoker, target, "pet changed");
    true
}

/// Restore hp.
///
/// Positive amounts scale with the `rec` stat and are credited to the
/// item, skill or buff heal accumulator. Buff heals are only recorded;
/// the buff pass applies them. `set` overwrites hp directly.
pub fn heal(effect: &Effect, scope: EffectScope<'_>, _ctx: &ResolverContext<'_>) -> bool {
    let add = effect.option("add", "0");

    let state = match scope {
        EffectScope::Pet(pet) => {
            let Ok(amount) = add.trim().parse::<f64>() else {
                return false;
            };
            pet.set_hp(pet.hp() + amount);
            return true;
        }
        EffectScope::Battle(state) => state,
    };

    let who = side(effect, "who", "me");
    let kind = effect.option("type", "skill");
    let set = effect.option("set", "none");

    let Some((lhs, rhs)) = who_units(state, effect) else {
        return false;
    };
    let Some(pet) = lhs.pet() else { return false };
    let operands = OperandContext::new(effect, state, lhs, rhs);

    let Some(amount) = operands.try_evaluate(add) else {
        return false;
    };
    let rate = if amount > 0.0 {
        pet.battle_status()[StatusType::Rec] / 100.0
    } else {
        1.0
    };
    let mut heal = (amount * rate) as i32;

    let set_hp = if is_set(set) {
        match operands.try_evaluate(set) {
            Some(v) => Some(v as i32),
            None => return false,
        }
    } else {
        None
    };
    let is_dead = pet.is_dead();
    let lhs_id = lhs.id;

    let Some(unit) = state.unit_mut(lhs_id) else { return false };
    if let Some(hp) = set_hp {
        if let Some(pet) = unit.pet_mut() {
            pet.set_hp(hp);
        }
        return true;
    }
    if is_dead {
        return false;
    }

    let system = &mut unit.skill_system;
    match (kind, who) {
        ("item", Side::Me) => system.item_heal += heal,
        ("skill", Side::Me) => system.skill_heal += heal,
        ("buff", _) => {
            system.buff_heal += heal;
            heal = 0;
        }
        _ => {}
    }
    if let Some(pet) = unit.pet_mut() {
        pet.set_hp(pet.hp + heal);
    }
    true
}

/// Adjust anger and its bounds.
///
/// Positive gains scale with the `angrec` stat.
pub fn rage(effect: &Effect, scope: EffectScope<'_>, _ctx: &ResolverContext<'_>) -> bool {
    let Some(state) = battle(scope) else { return false };
    let Some((lhs, rhs)) = who_units(state, effect) else {
        return false;
    };
    let Some(pet) = lhs.pet() else { return false };
    let operands = OperandContext::new(effect, state, lhs, rhs);

    let bound = |key: &str| -> Result<Option<i32>, ()> {
        let raw = effect.option(key, "none");
        if !is_set(raw) {
            return Ok(None);
        }
        operands.try_evaluate(raw).map(|v| Some(v as i32)).ok_or(())
    };
    let (Ok(min), Ok(max)) = (bound("min"), bound("max")) else {
        return false;
    };
    let Some(amount) = operands.try_evaluate(effect.option("add", "0")) else {
        return false;
    };
    let rate = if amount > 0.0 {
        pet.battle_status()[StatusType::AngRec] / 100.0
    } else {
        1.0
    };
    let gain = (amount * rate) as i32;
    let lhs_id = lhs.id;

    let Some(pet) = state.unit_mut(lhs_id).and_then(Unit::pet_mut) else {
        return false;
    };
    if let Some(min) = min {
        pet.status.min_anger = min;
    }
    if let Some(max) = max {
        pet.status.max_anger = max;
    }
    pet.set_anger(pet.anger + gain);
    true
}

/// Raise or lower power-up stages.
///
/// With `random=true` only one of the requested (nonzero) channels is
/// kept: `random_pdf=uniform` picks evenly, a `/`-separated weight list
/// picks by weight, `none` keeps them all. Buff 45 doubles raises and
/// buff 46 doubles drops.
pub fn powerup(effect: &Effect, scope: EffectScope<'_>, ctx: &ResolverContext<'_>) -> bool {
    let Some(state) = battle(scope) else { return false };
    let Some(random) = parse_bool(effect.option("random", "false")) else {
        return false;
    };

    let mut delta = Status::zero();
    for channel in StatusType::powerup_channels() {
        let raw = effect.option(&channel.to_string(), "0").to_string();
        let Ok(step) = raw.trim().parse::<i32>() else {
            return false;
        };
        delta[channel] = f64::from(step);
    }

    enum Pick {
        All,
        Uniform,
        Weighted(Vec<f64>),
    }
    let pick = match effect.option("random_pdf", "none") {
        _ if !random => Pick::All,
        "none" => Pick::All,
        "uniform" => Pick::Uniform,
        raw => match parse_float_list(raw, '/') {
            Some(weights) if weights.iter().all(|w| w.is_finite() && *w >= 0.0) => {
                Pick::Weighted(weights)
            }
            _ => return false,
        },
    };

    let Some(lhs) = target_id(state, effect, "who", "me") else {
        return false;
    };
    let Some(unit) = state.unit_mut(lhs) else { return false };
    if unit.pet().is_none() {
        return false;
    }

    let requested: Vec<StatusType> = StatusType::powerup_channels()
        .filter(|&c| delta[c] != 0.0)
        .collect();
    let chosen = match pick {
        _ if requested.is_empty() => None,
        Pick::All => None,
        Pick::Uniform => Some(unit.rng.gen_range(0..requested.len() as i32) as usize),
        Pick::Weighted(weights) => Some(unit.rng.choose_weighted(&weights).unwrap_or(0)),
    };
    if let Some(chosen) = chosen {
        for (i, &channel) in requested.iter().enumerate() {
            if i != chosen {
                delta[channel] = 0.0;
            }
        }
    }

    EffectResolver::with_pet(state, lhs, ctx, |pet| {
        if pet.buffs.contains(POWERUP_DOUBLE_BUFF_ID) {
            delta = delta.map(|v| if v > 0.0 { v * 2.0 } else { v });
        }
        if pet.buffs.contains(POWERDOWN_DOUBLE_BUFF_ID) {
            delta = delta.map(|v| if v < 0.0 { v * 2.0 } else { v });
        }
        pet.power_up(&delta, ctx.db)
    })
}

/// Permanently add to one battle stat: `add + floor(init[type] * mult)`.
pub fn add_status(effect: &Effect, scope: EffectScope<'_>, _ctx: &ResolverContext<'_>) -> bool {
    let Some(state) = battle(scope) else { return false };
    let Some(channel) = effect
        .option("type", "5")
        .trim()
        .parse::<usize>()
        .ok()
        .and_then(StatusType::from_index)
    else {
        return false;
    };

    let Some((lhs, rhs)) = who_units(state, effect) else {
        return false;
    };
    let Some(pet) = lhs.pet() else { return false };
    let operands = OperandContext::new(effect, state, lhs, rhs);
    let (Some(mult), Some(add)) = (
        operands.try_evaluate(effect.option("mult", "0/1")),
        operands.try_evaluate(effect.option("add", "0")),
    ) else {
        return false;
    };
    let amount = add as i32 + (pet.status.init_status()[channel] * mult).floor() as i32;
    let lhs_id = lhs.id;

    let Some(pet) = state.unit_mut(lhs_id).and_then(Unit::pet_mut) else {
        return false;
    };
    pet.status.add_battle_status(channel.index(), f64::from(amount))
}

/// Block (`op=+`) or unblock (`op=-`) buff ids and inclusive id ranges.
pub fn block_buff(effect: &Effect, scope: EffectScope<'_>, _ctx: &ResolverContext<'_>) -> bool {
    let Some(state) = battle(scope) else { return false };
    let block = match effect.option("op", "+") {
        "+" => true,
        "-" => false,
        _ => return false,
    };
    let Some(ids) = parse_int_list(effect.option("id_list", "0"), '/') else {
        return false;
    };
    let Some(bounds) = parse_int_list(effect.option("id_range", "0/0"), '/') else {
        return false;
    };
    if bounds.len() % 2 != 0 {
        return false;
    }
    let ranges: Vec<(i32, i32)> = bounds.chunks(2).map(|p| (p[0], p[1])).collect();

    let Some(lhs) = target_id(state, effect, "who", "me") else {
        return false;
    };
    let Some(pet) = state.unit_mut(lhs).and_then(Unit::pet_mut) else {
        return false;
    };
    if block {
        pet.buffs.block_buff(&ids);
        pet.buffs.block_range_buff(&ranges);
    } else {
        pet.buffs.unblock_buff(&ids);
        pet.buffs.unblock_range_buff(&ranges);
    }
    true
}

/// Add a buff built from its template, `turn` and `value`.
///
/// Adding a blocked id succeeds without adding anything.
pub fn add_buff(effect: &Effect, scope: EffectScope<'_>, ctx: &ResolverContext<'_>) -> bool {
    let Some(state) = battle(scope) else { return false };
    let Ok(id) = effect.option("id", "0").trim().parse::<i32>() else {
        return false;
    };
    let Some(info) = ctx.db.buff_info(id) else {
        return false;
    };

    let Some((lhs, rhs)) = who_units(state, effect) else {
        return false;
    };
    let operands = OperandContext::new(effect, state, lhs, rhs);
    let (Some(turn), Some(value)) = (
        operands.try_evaluate(effect.option("turn", "-1")),
        operands.try_evaluate(effect.option("value", "0")),
    ) else {
        return false;
    };
    let lhs_id = lhs.id;

    EffectResolver::add_buff(state, lhs_id, Buff::new(info, turn as i32, value as i32), ctx)
}

/// Remove buffs by id list and/or by type list.
///
/// Removing `TurnBased` also sweeps Mark buffs with a positive id and a
/// positive turn count. Removing a power-linked id resets its channel's
/// stage to zero.
pub fn remove_buff(effect: &Effect, scope: EffectScope<'_>, ctx: &ResolverContext<'_>) -> bool {
    let Some(state) = battle(scope) else { return false };
    let raw_ids = effect.option("id", "0");
    let raw_types = effect.option("type", "none");

    let Some(ids) = parse_int_list(raw_ids, '/') else {
        return false;
    };
    let by_id = raw_ids != "0" && !ids.is_empty();
    let by_type = is_set(raw_types);
    if !by_id && !by_type {
        return false;
    }
    let types: Vec<BuffType> = if by_type {
        match raw_types
            .split('/')
            .map(BuffType::parse)
            .collect::<Option<Vec<_>>>()
        {
            Some(types) => types,
            None => return false,
        }
    } else {
        Vec::new()
    };

    let Some(lhs) = target_id(state, effect, "who", "me") else {
        return false;
    };
    if state.unit(lhs).and_then(Unit::pet).is_none() {
        return false;
    }

    for buff_type in types {
        EffectResolver::with_pet(state, lhs, ctx, |pet| {
            pet.buffs.remove_range_buff(|b| b.info().buff_type == buff_type)
        });
        if buff_type == BuffType::TurnBased {
            EffectResolver::with_pet(state, lhs, ctx, |pet| {
                pet.buffs.remove_range_buff(|b| {
                    b.id > 0 && b.info().buff_type == BuffType::Mark && b.turn > 0
                })
            });
        }
    }
    if by_id {
        EffectResolver::with_pet(state, lhs, ctx, |pet| {
            let mut change = pet.buffs.remove_range_buff(|b| ids.contains(&b.id));
            for (channel, _) in ids.iter().filter_map(|&id| power_channel(id)) {
                change.merge(pet.set_powerup(channel, 0, ctx.db));
            }
            change
        });
    }
    true
}

/// Copy buffs from the `source` side to the `target` side.
///
/// Listed power-linked ids copy the channel's stage (negated with
/// `reverse`) instead of the marker buff; `transfer` or `reverse` zero the
/// source stage. With `transfer` the copied buffs leave the source.
pub fn copy_buff(effect: &Effect, scope: EffectScope<'_>, ctx: &ResolverContext<'_>) -> bool {
    let Some(state) = battle(scope) else { return false };
    let raw_ids = effect.option("id", "0");
    let raw_type = effect.option("type", "none");

    let Some(ids) = parse_int_list(raw_ids, '/') else {
        return false;
    };
    let by_id = raw_ids != "0" && !ids.is_empty();
    let by_type = is_set(raw_type);
    if !by_id && !by_type {
        return false;
    }
    let (Some(transfer), Some(reverse)) = (
        parse_bool(effect.option("transfer", "false")),
        parse_bool(effect.option("reverse", "false")),
    ) else {
        return false;
    };
    let copy_type = if by_type {
        match BuffType::parse(raw_type) {
            Some(t) => Some(t),
            None => return false,
        }
    } else {
        None
    };

    let (Some(source), Some(target)) = (
        target_id(state, effect, "source", "op"),
        target_id(state, effect, "target", "me"),
    ) else {
        return false;
    };
    let Some(source_pet) = state.unit(source).and_then(Unit::pet) else {
        return false;
    };
    if state.unit(target).and_then(Unit::pet).is_none() {
        return false;
    }

    let listed: Vec<Buff> = if by_id {
        source_pet.buffs.get_range_buff(|b| ids.contains(&b.id)).cloned().collect()
    } else {
        Vec::new()
    };
    let sign = if reverse { -1.0 } else { 1.0 };
    let mut stages = Status::zero();
    let mut drained = Vec::new();
    let mut plain = Vec::new();
    for buff in listed {
        match power_channel(buff.id) {
            Some((channel, _)) => {
                stages[channel] = sign * f64::from(source_pet.status.powerup_stage(channel));
                if transfer || reverse {
                    drained.push(channel);
                }
            }
            None => plain.push(buff),
        }
    }
    let typed: Vec<Buff> = match copy_type {
        Some(t) => source_pet
            .buffs
            .get_range_buff(|b| b.info().buff_type == t)
            .cloned()
            .collect(),
        None => Vec::new(),
    };

    for buff in &plain {
        EffectResolver::add_buff(state, target, buff.clone(), ctx);
    }
    if by_id {
        EffectResolver::with_pet(state, target, ctx, |pet| pet.power_up(&stages, ctx.db));
    }
    for &channel in &drained {
        EffectResolver::with_pet(state, source, ctx, |pet| {
            pet.set_powerup(channel, 0, ctx.db)
        });
    }
    for buff in &typed {
        EffectResolver::add_buff(state, target, buff.clone(), ctx);
    }
    if transfer {
        EffectResolver::with_pet(state, source, ctx, |pet| {
            let mut change = pet.buffs.remove_buffs(&plain);
            change.merge(pet.buffs.remove_buffs(&typed));
            change
        });
    }
    true
}

/// Apply an operator to one field of an existing buff.
///
/// The auto-removal rule is re-checked right after the write.
pub fn set_buff(effect: &Effect, scope: EffectScope<'_>, ctx: &ResolverContext<'_>) -> bool {
    let Some(state) = battle(scope) else { return false };
    let Ok(id) = effect.option("id", "0").trim().parse::<i32>() else {
        return false;
    };
    let Some(op) = Operator::parse(effect.option("op", "+")) else {
        return false;
    };
    let field = effect.option("type", "value");

    let Some((lhs, rhs)) = who_units(state, effect) else {
        return false;
    };
    let Some(old) = lhs
        .pet()
        .and_then(|p| p.buffs.get_buff(id))
        .and_then(|b| b.try_get(field))
    else {
        return false;
    };
    let Some(value) = OperandContext::new(effect, state, lhs, rhs)
        .try_evaluate(effect.option("value", "0"))
    else {
        return false;
    };
    let new = op.apply(old, value);
    let lhs_id = lhs.id;

    EffectResolver::with_pet(state, lhs_id, ctx, |pet| {
        pet.buffs
            .update_buff(id, |b| {
                b.set(field, new);
            })
            .unwrap_or_default()
    })
}

/// Apply an operator to a damage accumulator.
///
/// `state=last` evaluates `value` against the previous turn (0 when there
/// is none); the write always lands in the current state. During
/// `OnTurnEnd` the buff damage accumulator is used regardless of `type`.
pub fn set_damage(effect: &Effect, scope: EffectScope<'_>, _ctx: &ResolverContext<'_>) -> bool {
    let Some(state) = battle(scope) else { return false };
    let Some(op) = Operator::parse(effect.option("op", "+")) else {
        return false;
    };
    let Some(invoker) = effect.invoker else { return false };

    let damage_state = match effect.option("state", "current") {
        "last" => state.previous_turn(),
        _ => Some(&*state),
    };
    let damage = match damage_state {
        Some(ds) => {
            let (Some(lhs), Some(rhs)) = (ds.unit(invoker), ds.rhs_unit(invoker)) else {
                return false;
            };
            match OperandContext::new(effect, ds, lhs, rhs).try_evaluate(effect.option("value", "0"))
            {
                Some(v) => v,
                None => return false,
            }
        }
        None => 0.0,
    };

    let field = if state.phase == EffectTiming::OnTurnEnd {
        "buffDamage"
    } else {
        match effect.option("type", "skill") {
            "skill" => "skillDamage",
            "item" => "itemDamage",
            "buff" => "buffDamage",
            _ => return false,
        }
    };

    let Some(target) = target_id(state, effect, "who", "me") else {
        return false;
    };
    let Some(unit) = state.unit_mut(target) else { return false };
    let system = &mut unit.skill_system;
    let old = system.get(field);
    system.set(field, op.apply(old, damage))
}

/// Replace the skill in use (`type=id`) or apply an operator to one of its
/// fields.
///
/// `value` for a replacement is a skill id, `-1` (pass), `-4` (escape) or
/// `random` (any registered non-super skill). The old anger cost is kept
/// unless `set_anger=true`.
pub fn set_skill(effect: &Effect, scope: EffectScope<'_>, ctx: &ResolverContext<'_>) -> bool {
    let Some(state) = battle(scope) else { return false };
    let field = effect.option("type", "none");
    let value = effect.option("value", "0");

    if field == "id" {
        let Some(set_anger) = parse_bool(effect.option("set_anger", "false")) else {
            return false;
        };
        enum Choice {
            Fixed(Skill),
            Random,
        }
        let choice = match value.trim() {
            "-1" => Choice::Fixed(Skill::no_op()),
            "-4" => Choice::Fixed(Skill::escape()),
            "random" => Choice::Random,
            raw => match raw.parse::<i32>() {
                Ok(id) => Choice::Fixed(ctx.db.skill_or_no_op(id)),
                Err(_) => return false,
            },
        };

        let Some(lhs) = target_id(state, effect, "who", "me") else {
            return false;
        };
        let Some(unit) = state.unit_mut(lhs) else { return false };
        let mut skill = match choice {
            Choice::Fixed(skill) => skill,
            Choice::Random => ctx.db.random_skill(&mut unit.rng).unwrap_or_else(Skill::no_op),
        };
        if !set_anger {
            skill.anger = unit.skill().anger;
        }
        debug!(unit = %lhs, skill = skill.id, "skill replaced");
        unit.skill_system.skill = skill;
        return true;
    }

    let Some(op) = Operator::parse(effect.option("op", "+")) else {
        return false;
    };
    let Some((lhs, rhs)) = who_units(state, effect) else {
        return false;
    };
    let Some(old) = lhs.skill_system.try_get(field) else {
        return false;
    };
    let Some(new) = OperandContext::new(effect, state, lhs, rhs).try_evaluate(value) else {
        return false;
    };
    let lhs_id = lhs.id;

    let Some(unit) = state.unit_mut(lhs_id) else { return false };
    unit.skill_system.set(field, op.apply(old, new));
    true
}

/// Apply an operator to a named pet field.
///
/// Out of battle `type=evReset` returns all effort points to storage, and
/// `value` is a pet field name or a number literal.
pub fn set_pet(effect: &Effect, scope: EffectScope<'_>, ctx: &ResolverContext<'_>) -> bool {
    let field = effect.option("type", "none");
    let value = effect.option("value", "0");
    let Some(op) = Operator::parse(effect.option("op", "+")) else {
        return false;
    };

    let state = match scope {
        EffectScope::Pet(pet) => {
            if field == "evReset" {
                pet.reset_ev();
                return true;
            }
            let Some(old) = pet.try_get(field) else {
                return false;
            };
            let Some(new) = pet.try_get(value).or_else(|| value.trim().parse().ok()) else {
                return false;
            };
            pet.set(field, op.apply(old, new));
            return true;
        }
        EffectScope::Battle(state) => state,
    };

    let Some((lhs, rhs)) = who_units(state, effect) else {
        return false;
    };
    let Some(old) = lhs.pet().and_then(|p| p.try_get(field)) else {
        return false;
    };
    let Some(new) = OperandContext::new(effect, state, lhs, rhs).try_evaluate(value) else {
        return false;
    };
    let lhs_id = lhs.id;

    EffectResolver::with_pet(state, lhs_id, ctx, |pet| {
        pet.set(field, op.apply(old, new));
        if field.starts_with("powerup(") {
            pet.sync_power_buffs(ctx.db)
        } else {
            BuffChange::default()
        }
    })
}

/// Set the weather by numeric code.
pub fn set_weather(effect: &Effect, scope: EffectScope<'_>, _ctx: &ResolverContext<'_>) -> bool {
    let Some(state) = battle(scope) else { return false };
    let Some(weather) = effect
        .option("weather", "0")
        .trim()
        .parse::<i32>()
        .ok()
        .and_then(Weather::from_repr)
    else {
        return false;
    };
    state.weather = weather;
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_buckets() {
        assert_eq!(capture_probability(40.0, 100, 100, false), 10.0);
        assert_eq!(capture_probability(40.0, 60, 100, false), 40.0);
        assert_eq!(capture_probability(40.0, 30, 100, false), 60.0);
        assert_eq!(capture_probability(40.0, 10, 100, false), 80.0);
    }

    #[test]
    fn test_capture_penalty() {
        assert_eq!(capture_probability(60.0, 10, 100, true), 40.0);
    }

    #[test]
    fn test_capture_certain() {
        assert_eq!(capture_probability(100.0, 100, 100, true), 100.0);
    }

    #[test]
    fn test_capture_zero_max_hp() {
        assert_eq!(capture_probability(10.0, 0, 0, false), 20.0);
    }
}
