//! Fixed-width battle statistics.
//!
//! A `Status` is used both for base stats and for accumulated deltas
//! (battle additions, power-up stages). Arithmetic is element-wise.

use std::ops::{Add, Index, IndexMut, Sub};

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

/// Number of channels in a `Status`.
pub const STATUS_CHANNELS: usize = 12;

/// Number of leading channels that take power-up stages.
pub const POWERUP_CHANNELS: usize = 5;

/// Named status channel. The discriminant is the stable channel index.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[strum(serialize_all = "lowercase")]
pub enum StatusType {
    Atk = 0,
    Def = 1,
    Mat = 2,
    Mdf = 3,
    Spd = 4,
    Hp = 5,
    Cri = 6,
    Cdf = 7,
    Hit = 8,
    Eva = 9,
    Rec = 10,
    #[strum(serialize = "angrec")]
    AngRec = 11,
}

impl StatusType {
    /// Channel index.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Look up a channel by index.
    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::iter().nth(index)
    }

    /// Look up a channel by its content name (`atk`, `spd`, `angrec`, …).
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        name.parse().ok()
    }

    /// The five channels that take power-up stages, in index order.
    pub fn powerup_channels() -> impl Iterator<Item = Self> {
        Self::iter().take(POWERUP_CHANNELS)
    }
}

/// Numeric vector over every `StatusType` channel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Status {
    values: [f64; STATUS_CHANNELS],
}

impl Status {
    /// All channels zero.
    #[must_use]
    pub fn zero() -> Self {
        Self::default()
    }

    /// Build from the six visible stats; hidden channels get their
    /// neutral defaults (`cri=5 hit=100 rec=100 angrec=100`).
    #[must_use]
    pub fn new(atk: f64, def: f64, mat: f64, mdf: f64, spd: f64, hp: f64) -> Self {
        let mut status = Self::zero();
        status[StatusType::Atk] = atk;
        status[StatusType::Def] = def;
        status[StatusType::Mat] = mat;
        status[StatusType::Mdf] = mdf;
        status[StatusType::Spd] = spd;
        status[StatusType::Hp] = hp;
        status[StatusType::Cri] = 5.0;
        status[StatusType::Hit] = 100.0;
        status[StatusType::Rec] = 100.0;
        status[StatusType::AngRec] = 100.0;
        status
    }

    /// Set one channel (builder pattern).
    #[must_use]
    pub fn with(mut self, channel: StatusType, value: f64) -> Self {
        self[channel] = value;
        self
    }

    /// Value by raw index, `None` when out of range.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied()
    }

    /// Value by content name.
    #[must_use]
    pub fn get_by_name(&self, name: &str) -> Option<f64> {
        StatusType::from_name(name).map(|t| self[t])
    }

    /// Apply `f` to every channel.
    #[must_use]
    pub fn map(mut self, f: impl Fn(f64) -> f64) -> Self {
        for v in &mut self.values {
            *v = f(*v);
        }
        self
    }

    /// Number of channels with a nonzero value.
    #[must_use]
    pub fn count_nonzero(&self) -> usize {
        self.values.iter().filter(|v| **v != 0.0).count()
    }

    /// Iterate over `(channel, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (StatusType, f64)> + '_ {
        StatusType::iter().map(move |t| (t, self[t]))
    }
}

impl Index<StatusType> for Status {
    type Output = f64;

    fn index(&self, channel: StatusType) -> &f64 {
        &self.values[channel.index()]
    }
}

impl IndexMut<StatusType> for Status {
    fn index_mut(&mut self, channel: StatusType) -> &mut f64 {
        &mut self.values[channel.index()]
    }
}

impl Add for Status {
    type Output = Status;

    fn add(mut self, rhs: Status) -> Status {
        for (a, b) in self.values.iter_mut().zip(rhs.values) {
            *a += b;
        }
        self
    }
}

impl Sub for Status {
    type Output = Status;

    fn sub(mut self, rhs: Status) -> Status {
        for (a, b) in self.values.iter_mut().zip(rhs.values) {
            *a -= b;
        }
        self
    }
}

/// Multiplier for a power-up stage: `(2+s)/2` when raised, `2/(2-s)` when lowered.
#[must_use]
pub fn stage_multiplier(stage: i32) -> f64 {
    if stage >= 0 {
        f64::from(2 + stage) / 2.0
    } else {
        2.0 / f64::from(2 - stage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_names() {
        assert_eq!(StatusType::from_name("atk"), Some(StatusType::Atk));
        assert_eq!(StatusType::from_name("angrec"), Some(StatusType::AngRec));
        assert_eq!(StatusType::from_name("speed"), None);
        assert_eq!(StatusType::Mdf.to_string(), "mdf");
    }

    #[test]
    fn test_index_mapping() {
        for t in StatusType::iter() {
            assert_eq!(StatusType::from_index(t.index()), Some(t));
        }
        assert_eq!(StatusType::from_index(STATUS_CHANNELS), None);
    }

    #[test]
    fn test_powerup_channels_exclude_hp() {
        let channels: Vec<_> = StatusType::powerup_channels().collect();
        assert_eq!(channels.len(), 5);
        assert!(!channels.contains(&StatusType::Hp));
    }

    #[test]
    fn test_hidden_defaults() {
        let status = Status::new(10.0, 10.0, 10.0, 10.0, 10.0, 100.0);
        assert_eq!(status[StatusType::Rec], 100.0);
        assert_eq!(status[StatusType::Cri], 5.0);
        assert_eq!(status[StatusType::Eva], 0.0);
    }

    #[test]
    fn test_elementwise_arithmetic() {
        let a = Status::zero().with(StatusType::Atk, 3.0);
        let b = Status::zero().with(StatusType::Atk, 1.0).with(StatusType::Def, 2.0);
        let sum = a + b;
        assert_eq!(sum[StatusType::Atk], 4.0);
        assert_eq!(sum[StatusType::Def], 2.0);
        assert_eq!((sum - b)[StatusType::Def], 0.0);
        assert_eq!(sum.count_nonzero(), 2);
    }

    #[test]
    fn test_stage_multiplier() {
        assert_eq!(stage_multiplier(0), 1.0);
        assert_eq!(stage_multiplier(2), 2.0);
        assert_eq!(stage_multiplier(-2), 0.5);
        assert_eq!(stage_multiplier(6), 4.0);
    }
}
