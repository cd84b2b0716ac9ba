//! Battle state.
//!
//! `BattleState` unifies the two opposing units with the current phase,
//! weather and accumulated result. Resolving a phase works on the live
//! state; `advance` first freezes a copy into the `previous` chain so
//! effects can look at earlier values (`state=last`, `last.me.hp`).
//!
//! Units are cheap to clone: buff lists are persistent vectors and
//! templates are shared, so each frozen copy costs little.

use std::rc::Rc;

use serde::{Deserialize, Serialize};
use strum::{Display, FromRepr};
use tracing::debug;

use super::unit::Unit;
use crate::core::{Side, UnitId};
use crate::effects::{EffectTiming, ResolverContext};

/// Battle-wide weather.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, FromRepr,
)]
#[repr(i32)]
pub enum Weather {
    #[default]
    Clear = 0,
    Sunny = 1,
    Rain = 2,
    Sandstorm = 3,
    Snow = 4,
    Mist = 5,
}

/// How the battle ended, if it has.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum BattleResultState {
    #[default]
    None,
    Win,
    Lose,
    MyEscape,
    OpEscape,
    CaptureSuccess,
}

/// Result accumulator.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleResult {
    pub state: BattleResultState,

    /// Team slots the player's unit has sent out, in order.
    pub fight_pet_cursors: Vec<usize>,
}

impl BattleResult {
    /// Record a pet the player's unit sent out.
    pub fn add_fight_pet_cursor(&mut self, cursor: usize) {
        self.fight_pet_cursors.push(cursor);
    }
}

/// The whole battle at one phase.
///
/// ## Example
///
/// ```
/// use pet_battle::battle::{BattleState, Unit};
/// use pet_battle::core::UnitId;
/// use pet_battle::effects::EffectTiming;
///
/// let mut state = BattleState::new(
///     Unit::new(UnitId(0), Vec::new(), 7),
///     Unit::new(UnitId(1), Vec::new(), 7),
/// );
/// state.advance(EffectTiming::OnTurnStart);
///
/// assert_eq!(state.phase, EffectTiming::OnTurnStart);
/// assert_eq!(state.previous().map(|s| s.phase), Some(EffectTiming::OnBattleStart));
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BattleState {
    pub phase: EffectTiming,
    pub turn: u32,
    pub my_unit: Unit,
    pub op_unit: Unit,

    /// Unit whose action is resolving.
    pub atk_unit: UnitId,

    pub result: BattleResult,
    pub weather: Weather,

    #[serde(skip)]
    previous: Option<Rc<BattleState>>,

    #[serde(skip)]
    hook_depth: u32,
}

impl BattleState {
    /// Start a battle. The player's unit acts first.
    #[must_use]
    pub fn new(my_unit: Unit, op_unit: Unit) -> Self {
        let atk_unit = my_unit.id;
        Self {
            phase: EffectTiming::OnBattleStart,
            turn: 0,
            my_unit,
            op_unit,
            atk_unit,
            result: BattleResult::default(),
            weather: Weather::Clear,
            previous: None,
            hook_depth: 0,
        }
    }

    /// Whether `id` is the player's unit.
    #[must_use]
    pub fn is_my_unit(&self, id: UnitId) -> bool {
        self.my_unit.id == id
    }

    /// Unit by id.
    #[must_use]
    pub fn unit(&self, id: UnitId) -> Option<&Unit> {
        if self.my_unit.id == id {
            Some(&self.my_unit)
        } else if self.op_unit.id == id {
            Some(&self.op_unit)
        } else {
            None
        }
    }

    /// Unit by id, mutably.
    pub fn unit_mut(&mut self, id: UnitId) -> Option<&mut Unit> {
        if self.my_unit.id == id {
            Some(&mut self.my_unit)
        } else if self.op_unit.id == id {
            Some(&mut self.op_unit)
        } else {
            None
        }
    }

    /// The unit opposing `id`.
    #[must_use]
    pub fn rhs_unit(&self, id: UnitId) -> Option<&Unit> {
        self.rhs_id(id).and_then(|rhs| self.unit(rhs))
    }

    /// Id of the unit opposing `id`.
    #[must_use]
    pub fn rhs_id(&self, id: UnitId) -> Option<UnitId> {
        if self.my_unit.id == id {
            Some(self.op_unit.id)
        } else if self.op_unit.id == id {
            Some(self.my_unit.id)
        } else {
            None
        }
    }

    /// Resolve a `who`/`source`/`target` option relative to the invoker.
    #[must_use]
    pub fn side_id(&self, invoker: UnitId, side: Side) -> Option<UnitId> {
        match side {
            Side::Me => self.unit(invoker).map(|u| u.id),
            Side::Op => self.rhs_id(invoker),
        }
    }

    /// The state frozen by the last `advance`.
    #[must_use]
    pub fn previous(&self) -> Option<&BattleState> {
        self.previous.as_deref()
    }

    /// The most recent frozen state from an earlier turn.
    #[must_use]
    pub fn previous_turn(&self) -> Option<&BattleState> {
        let mut cursor = self.previous();
        while let Some(state) = cursor {
            if state.turn < self.turn {
                return Some(state);
            }
            cursor = state.previous();
        }
        None
    }

    /// Freeze the current state into the history chain and move to `phase`.
    pub fn advance(&mut self, phase: EffectTiming) {
        let frozen = Rc::new(self.clone());
        self.previous = Some(frozen);
        self.phase = phase;
        debug!(turn = self.turn, %phase, "phase advanced");
    }

    /// Close the turn: count buffs down on both active pets (expired buffs
    /// leave with their on-remove hooks), clear the per-turn accumulators
    /// and bump the turn counter.
    pub fn end_turn(&mut self, ctx: &ResolverContext<'_>) {
        for id in [self.my_unit.id, self.op_unit.id] {
            let change = match self.unit_mut(id).and_then(Unit::pet_mut) {
                Some(pet) => pet.buffs.tick_turns(),
                None => continue,
            };
            crate::effects::EffectResolver::run_buff_hooks(self, id, change, ctx);
        }
        self.my_unit.skill_system.reset();
        self.op_unit.skill_system.reset();
        self.turn += 1;
    }

    /// End the battle with `result`, marking both units done.
    pub fn finish(&mut self, result: BattleResultState) {
        self.phase = EffectTiming::OnBattleEnd;
        self.result.state = result;
        self.my_unit.is_done = true;
        self.op_unit.is_done = true;
        debug!(%result, "battle finished");
    }

    /// Canonical byte encoding of the live state (history excluded).
    ///
    /// # Errors
    ///
    /// Propagates bincode encoding failures.
    pub fn snapshot_bytes(&self) -> bincode::Result<Vec<u8>> {
        bincode::serialize(self)
    }

    pub(crate) fn hook_depth(&self) -> u32 {
        self.hook_depth
    }

    pub(crate) fn set_hook_depth(&mut self, depth: u32) {
        self.hook_depth = depth;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> BattleState {
        BattleState::new(
            Unit::new(UnitId(0), Vec::new(), 1),
            Unit::new(UnitId(1), Vec::new(), 1),
        )
    }

    #[test]
    fn test_unit_lookup() {
        let state = state();
        assert_eq!(state.rhs_id(UnitId(0)), Some(UnitId(1)));
        assert_eq!(state.rhs_unit(UnitId(1)).map(|u| u.id), Some(UnitId(0)));
        assert!(state.unit(UnitId(9)).is_none());
        assert_eq!(state.side_id(UnitId(1), Side::Me), Some(UnitId(1)));
        assert_eq!(state.side_id(UnitId(1), Side::Op), Some(UnitId(0)));
    }

    #[test]
    fn test_history_chain() {
        let mut state = state();
        state.weather = Weather::Rain;
        state.advance(EffectTiming::OnTurnEnd);
        state.turn = 1;
        state.weather = Weather::Sunny;
        state.advance(EffectTiming::OnAttack);
        state.advance(EffectTiming::OnTurnEnd);

        assert_eq!(state.previous().map(|s| s.phase), Some(EffectTiming::OnAttack));

        let last = state.previous_turn().unwrap();
        assert_eq!(last.turn, 0);
        assert_eq!(last.weather, Weather::Rain);
        assert_eq!(last.phase, EffectTiming::OnBattleStart);
    }

    #[test]
    fn test_finish() {
        let mut state = state();
        state.finish(BattleResultState::Win);
        assert_eq!(state.phase, EffectTiming::OnBattleEnd);
        assert!(state.my_unit.is_done && state.op_unit.is_done);
    }

    #[test]
    fn test_weather_codes() {
        assert_eq!(Weather::from_repr(2), Some(Weather::Rain));
        assert_eq!(Weather::from_repr(42), None);
    }

    #[test]
    fn test_snapshot_ignores_history() {
        let mut state = state();
        let before = state.snapshot_bytes().unwrap();
        state.advance(EffectTiming::OnBattleStart);
        assert_eq!(state.snapshot_bytes().unwrap(), before);
    }
}
