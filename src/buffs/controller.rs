//! Per-pet buff collection.
//!
//! `BuffController` keeps a pet's active buffs in insertion order together
//! with the set of ids currently blocked from being added. It applies the
//! copy-handling policy of each template and the auto-removal rule, and
//! reports what entered and left the collection as a `BuffChange`.
//!
//! The controller never runs effects itself. The battle layer reads the
//! `BuffChange` and fires the on-add/on-remove hooks with access to the
//! whole `BattleState`.

use im::{OrdSet, Vector};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::buff::Buff;
use super::info::CopyHandleType;

/// Buffs that entered or left a controller during one operation.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BuffChange {
    /// Newly appended instances, in order.
    pub added: Vec<Buff>,
    /// Instances that left the controller, in order.
    pub removed: Vec<Buff>,
}

impl BuffChange {
    /// No buff entered or left.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }

    /// Append another change.
    pub fn merge(&mut self, other: BuffChange) {
        self.added.extend(other.added);
        self.removed.extend(other.removed);
    }
}

/// Ordered buff collection with a block set.
///
/// ## Example
///
/// ```
/// use std::sync::Arc;
/// use pet_battle::buffs::{Buff, BuffController, BuffInfo, BuffType, CopyHandleType};
///
/// let info = Arc::new(BuffInfo::new(12, "Focus", BuffType::Normal,
///     CopyHandleType::Block, 3, "none", "").unwrap());
///
/// let mut buffs = BuffController::new();
/// buffs.block_buff(&[12]);
/// let change = buffs.add_buff(Buff::from_info(info));
///
/// assert!(change.is_empty());
/// assert!(buffs.is_empty());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BuffController {
    buffs: Vector<Buff>,
    blocked_ids: OrdSet<i32>,
    blocked_ranges: Vector<(i32, i32)>,
}

impl BuffController {
    /// Create an empty controller.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of active buffs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buffs.len()
    }

    /// Whether no buff is active.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buffs.is_empty()
    }

    /// Active buffs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Buff> {
        self.buffs.iter()
    }

    /// First active buff with the given id.
    #[must_use]
    pub fn get_buff(&self, id: i32) -> Option<&Buff> {
        self.buffs.iter().find(|b| b.id == id)
    }

    /// Whether a buff with the given id is active.
    #[must_use]
    pub fn contains(&self, id: i32) -> bool {
        self.get_buff(id).is_some()
    }

    /// Active buffs matching a predicate, in insertion order.
    pub fn get_range_buff<'a>(
        &'a self,
        predicate: impl Fn(&Buff) -> bool + 'a,
    ) -> impl Iterator<Item = &'a Buff> + 'a {
        self.buffs.iter().filter(move |b| predicate(b))
    }

    /// Buffs shown to players: hidden templates dropped, features and
    /// emblems first, then by id.
    #[must_use]
    pub fn visible_buffs(&self) -> Vec<&Buff> {
        let mut shown: Vec<&Buff> = self.buffs.iter().filter(|b| !b.info().hide).collect();
        shown.sort_by_key(|b| b.info().sort_priority());
        shown
    }

    /// Whether an id is blocked, explicitly or by an inclusive range.
    #[must_use]
    pub fn is_blocked(&self, id: i32) -> bool {
        self.blocked_ids.contains(&id)
            || self
                .blocked_ranges
                .iter()
                .any(|&(lo, hi)| lo <= id && id <= hi)
    }

    /// Add a buff, honoring the block set and the template's copy policy.
    ///
    /// A blocked id is rejected silently: the returned change is empty.
    pub fn add_buff(&mut self, buff: Buff) -> BuffChange {
        let mut change = BuffChange::default();

        if self.is_blocked(buff.id) {
            debug!(id = buff.id, "buff blocked");
            return change;
        }

        let policy = buff.info().copy_handle;
        let Some(index) = self.buffs.iter().position(|b| b.id == buff.id) else {
            debug!(id = buff.id, turn = buff.turn, value = buff.value(), "buff added");
            self.buffs.push_back(buff.clone());
            change.added.push(buff);
            return change;
        };

        match policy {
            CopyHandleType::New => {
                debug!(id = buff.id, "buff added as new copy");
                self.buffs.push_back(buff.clone());
                change.added.push(buff);
                return change;
            }
            CopyHandleType::Block => {
                debug!(id = buff.id, "duplicate buff rejected");
                return change;
            }
            CopyHandleType::Replace => {
                let existing = &mut self.buffs[index];
                existing.turn = buff.turn;
                existing.set_value(buff.value());
            }
            CopyHandleType::Stack => {
                let existing = &mut self.buffs[index];
                existing.turn = longer_turn(existing.turn, buff.turn);
                existing.add_value(buff.value());
            }
            CopyHandleType::Refresh => {
                self.buffs[index].turn = buff.turn;
            }
        }
        debug!(id = buff.id, ?policy, "existing buff updated");

        change.merge(self.auto_remove_at(index));
        change
    }

    /// Add several buffs in order.
    pub fn add_range_buff(&mut self, buffs: impl IntoIterator<Item = Buff>) -> BuffChange {
        let mut change = BuffChange::default();
        for buff in buffs {
            change.merge(self.add_buff(buff));
        }
        change
    }

    /// Remove the first instance equal to `buff`.
    pub fn remove_buff(&mut self, buff: &Buff) -> BuffChange {
        let mut change = BuffChange::default();
        if let Some(index) = self.buffs.iter().position(|b| b == buff) {
            let removed = self.buffs.remove(index);
            debug!(id = removed.id, "buff removed");
            change.removed.push(removed);
        }
        change
    }

    /// Remove every active buff with the given id.
    pub fn remove_id(&mut self, id: i32) -> BuffChange {
        self.remove_range_buff(|b| b.id == id)
    }

    /// Remove every active buff matching a predicate.
    pub fn remove_range_buff(&mut self, predicate: impl Fn(&Buff) -> bool) -> BuffChange {
        let mut change = BuffChange::default();
        let mut kept = Vector::new();
        for buff in std::mem::take(&mut self.buffs) {
            if predicate(&buff) {
                debug!(id = buff.id, "buff removed");
                change.removed.push(buff);
            } else {
                kept.push_back(buff);
            }
        }
        self.buffs = kept;
        change
    }

    /// Remove each listed instance once.
    pub fn remove_buffs<'a>(&mut self, buffs: impl IntoIterator<Item = &'a Buff>) -> BuffChange {
        let mut change = BuffChange::default();
        for buff in buffs {
            change.merge(self.remove_buff(buff));
        }
        change
    }

    /// Mutate the first buff with `id`, then apply the auto-removal rule.
    ///
    /// Returns `None` when no such buff is active.
    pub fn update_buff(&mut self, id: i32, f: impl FnOnce(&mut Buff)) -> Option<BuffChange> {
        let index = self.buffs.iter().position(|b| b.id == id)?;
        f(&mut self.buffs[index]);
        Some(self.auto_remove_at(index))
    }

    /// Block explicit ids.
    pub fn block_buff(&mut self, ids: &[i32]) {
        for &id in ids {
            debug!(id, "buff id blocked");
            self.blocked_ids.insert(id);
        }
    }

    /// Lift explicit id blocks.
    pub fn unblock_buff(&mut self, ids: &[i32]) {
        for id in ids {
            self.blocked_ids.remove(id);
        }
    }

    /// Block inclusive id ranges.
    pub fn block_range_buff(&mut self, ranges: &[(i32, i32)]) {
        for &(lo, hi) in ranges {
            debug!(lo, hi, "buff id range blocked");
            self.blocked_ranges.push_back((lo.min(hi), lo.max(hi)));
        }
    }

    /// Lift range blocks. A range must match a blocked range exactly.
    pub fn unblock_range_buff(&mut self, ranges: &[(i32, i32)]) {
        for &(lo, hi) in ranges {
            let range = (lo.min(hi), lo.max(hi));
            self.blocked_ranges.retain(|r| *r != range);
        }
    }

    /// Count every buff down one turn and remove the expired ones.
    pub fn tick_turns(&mut self) -> BuffChange {
        for buff in self.buffs.iter_mut() {
            buff.tick();
        }
        self.remove_range_buff(Buff::is_expired)
    }

    fn auto_remove_at(&mut self, index: usize) -> BuffChange {
        let mut change = BuffChange::default();
        if self.buffs[index].should_auto_remove() {
            let removed = self.buffs.remove(index);
            debug!(id = removed.id, "buff auto-removed");
            change.removed.push(removed);
        }
        change
    }
}

fn longer_turn(a: i32, b: i32) -> i32 {
    if a < 0 || b < 0 {
        a.min(b).max(-1)
    } else {
        a.max(b)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::buffs::{BuffInfo, BuffType};

    fn info(id: i32, copy: CopyHandleType, options: &str) -> Arc<BuffInfo> {
        Arc::new(BuffInfo::new(id, "test", BuffType::Normal, copy, 3, options, "").unwrap())
    }

    #[test]
    fn test_visible_buffs_order() {
        let mut buffs = BuffController::new();
        let typed = |id, buff_type, options| {
            Arc::new(BuffInfo::new(id, "test", buff_type, CopyHandleType::New, -1, options, "").unwrap())
        };
        buffs.add_buff(Buff::from_info(typed(70, BuffType::Normal, "none")));
        buffs.add_buff(Buff::from_info(typed(3, BuffType::Normal, "hide=true")));
        buffs.add_buff(Buff::from_info(typed(40, BuffType::Normal, "none")));
        buffs.add_buff(Buff::from_info(typed(2001, BuffType::Emblem, "none")));
        buffs.add_buff(Buff::from_info(typed(1001, BuffType::Feature, "none")));

        let ids: Vec<i32> = buffs.visible_buffs().iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![1001, 2001, 40, 70]);
    }

    #[test]
    fn test_add_keeps_insertion_order() {
        let mut buffs = BuffController::new();
        buffs.add_buff(Buff::from_info(info(5, CopyHandleType::Block, "none")));
        buffs.add_buff(Buff::from_info(info(2, CopyHandleType::Block, "none")));
        buffs.add_buff(Buff::from_info(info(9, CopyHandleType::Block, "none")));

        let ids: Vec<_> = buffs.iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![5, 2, 9]);
    }

    #[test]
    fn test_copy_policies() {
        let mut buffs = BuffController::new();

        let new = info(1, CopyHandleType::New, "none");
        buffs.add_buff(Buff::new(Arc::clone(&new), 2, 1));
        let change = buffs.add_buff(Buff::new(new, 2, 1));
        assert_eq!(change.added.len(), 1);
        assert_eq!(buffs.len(), 2);

        let block = info(2, CopyHandleType::Block, "none");
        buffs.add_buff(Buff::new(Arc::clone(&block), 2, 1));
        assert!(buffs.add_buff(Buff::new(block, 5, 9)).is_empty());
        assert_eq!(buffs.get_buff(2).unwrap().value(), 1);

        let replace = info(3, CopyHandleType::Replace, "none");
        buffs.add_buff(Buff::new(Arc::clone(&replace), 2, 1));
        buffs.add_buff(Buff::new(replace, 5, 9));
        let b = buffs.get_buff(3).unwrap();
        assert_eq!((b.turn, b.value()), (5, 9));

        let stack = info(4, CopyHandleType::Stack, "none");
        buffs.add_buff(Buff::new(Arc::clone(&stack), 4, 3));
        buffs.add_buff(Buff::new(stack, 2, 5));
        let b = buffs.get_buff(4).unwrap();
        assert_eq!((b.turn, b.value()), (4, 8));

        let refresh = info(5, CopyHandleType::Refresh, "none");
        buffs.add_buff(Buff::new(Arc::clone(&refresh), 1, 3));
        buffs.add_buff(Buff::new(refresh, 4, 7));
        let b = buffs.get_buff(5).unwrap();
        assert_eq!((b.turn, b.value()), (4, 3));
    }

    #[test]
    fn test_stack_keeps_permanent() {
        assert_eq!(longer_turn(-1, 5), -1);
        assert_eq!(longer_turn(3, 5), 5);
    }

    #[test]
    fn test_stack_auto_removes() {
        let shield = info(30, CopyHandleType::Stack, "auto_remove=true");
        let mut buffs = BuffController::new();
        buffs.add_buff(Buff::new(Arc::clone(&shield), -1, 20));

        let change = buffs.add_buff(Buff::new(shield, -1, -20));
        assert_eq!(change.removed.len(), 1);
        assert!(buffs.is_empty());
    }

    #[test]
    fn test_block_ranges() {
        let mut buffs = BuffController::new();
        buffs.block_range_buff(&[(20, 10)]);
        assert!(buffs.is_blocked(10));
        assert!(buffs.is_blocked(20));
        assert!(!buffs.is_blocked(21));

        buffs.unblock_range_buff(&[(10, 20)]);
        assert!(!buffs.is_blocked(15));

        buffs.block_buff(&[7]);
        assert!(buffs.is_blocked(7));
        buffs.unblock_buff(&[7]);
        assert!(!buffs.is_blocked(7));
    }

    #[test]
    fn test_add_then_remove_restores() {
        let mut buffs = BuffController::new();
        buffs.add_buff(Buff::from_info(info(1, CopyHandleType::Block, "none")));
        let before = buffs.clone();

        buffs.add_buff(Buff::from_info(info(8, CopyHandleType::Block, "none")));
        buffs.remove_range_buff(|b| b.id == 8);

        assert_eq!(buffs, before);
    }

    #[test]
    fn test_update_buff_auto_remove() {
        let mut buffs = BuffController::new();
        buffs.add_buff(Buff::new(info(30, CopyHandleType::Stack, "auto_remove=true"), -1, 10));

        let change = buffs.update_buff(30, |b| b.set_value(4)).unwrap();
        assert!(change.is_empty());

        let change = buffs.update_buff(30, |b| b.set_value(0)).unwrap();
        assert_eq!(change.removed.len(), 1);
        assert!(buffs.update_buff(30, |_| {}).is_none());
    }

    #[test]
    fn test_tick_turns() {
        let mut buffs = BuffController::new();
        let i = info(1, CopyHandleType::New, "none");
        buffs.add_buff(Buff::new(Arc::clone(&i), 1, 0));
        buffs.add_buff(Buff::new(Arc::clone(&i), 2, 0));
        buffs.add_buff(Buff::new(i, -1, 0));

        let change = buffs.tick_turns();
        assert_eq!(change.removed.len(), 1);
        let turns: Vec<_> = buffs.iter().map(|b| b.turn).collect();
        assert_eq!(turns, vec![1, -1]);
    }

    #[test]
    fn test_remove_buff_single_instance() {
        let i = info(1, CopyHandleType::New, "none");
        let mut buffs = BuffController::new();
        buffs.add_buff(Buff::new(Arc::clone(&i), 2, 0));
        buffs.add_buff(Buff::new(Arc::clone(&i), 2, 0));

        let change = buffs.remove_buff(&Buff::new(i, 2, 0));
        assert_eq!(change.removed.len(), 1);
        assert_eq!(buffs.len(), 1);
    }
}
