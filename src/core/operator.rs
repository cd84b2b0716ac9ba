//! Arithmetic/assignment operators used by `Set*` abilities.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Operator applied as `old <op> new`.
///
/// ```
/// use pet_battle::core::Operator;
///
/// let op: Operator = "+".parse().unwrap();
/// assert_eq!(op.apply(10.0, 5.0), 15.0);
/// assert_eq!("=".parse::<Operator>().unwrap().apply(10.0, 5.0), 5.0);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
pub enum Operator {
    #[strum(serialize = "+")]
    Add,
    #[strum(serialize = "-")]
    Sub,
    #[strum(serialize = "*")]
    Mul,
    #[strum(serialize = "/")]
    Div,
    #[strum(serialize = "%")]
    Rem,
    #[strum(serialize = "=")]
    Set,
    #[strum(serialize = "max")]
    Max,
    #[strum(serialize = "min")]
    Min,
}

impl Operator {
    /// Parse an option value, `None` for unknown operators.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        Self::from_str(raw.trim()).ok()
    }

    /// Apply the operator. Division and modulo by zero keep `old`.
    #[must_use]
    pub fn apply(self, old: f64, new: f64) -> f64 {
        match self {
            Self::Add => old + new,
            Self::Sub => old - new,
            Self::Mul => old * new,
            Self::Div if new == 0.0 => old,
            Self::Div => old / new,
            Self::Rem if new == 0.0 => old,
            Self::Rem => old % new,
            Self::Set => new,
            Self::Max => old.max(new),
            Self::Min => old.min(new),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!(Operator::parse("+"), Some(Operator::Add));
        assert_eq!(Operator::parse("max"), Some(Operator::Max));
        assert_eq!(Operator::parse("^"), None);
    }

    #[test]
    fn test_apply() {
        assert_eq!(Operator::Sub.apply(10.0, 4.0), 6.0);
        assert_eq!(Operator::Mul.apply(10.0, 0.5), 5.0);
        assert_eq!(Operator::Max.apply(3.0, 7.0), 7.0);
        assert_eq!(Operator::Min.apply(3.0, 7.0), 3.0);
        assert_eq!(Operator::Rem.apply(7.0, 4.0), 3.0);
    }

    #[test]
    fn test_divide_by_zero_keeps_old() {
        assert_eq!(Operator::Div.apply(10.0, 0.0), 10.0);
        assert_eq!(Operator::Rem.apply(10.0, 0.0), 10.0);
    }

    #[test]
    fn test_display_round_trip() {
        assert_eq!(Operator::Set.to_string(), "=");
    }
}
