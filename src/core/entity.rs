//! Battle unit identification.
//!
//! A battle always has exactly two units: the local side ("my") and the
//! opposing side ("op"). Effects name their invoker by `UnitId` and resolve
//! `who`/`target`/`source` options relative to it.

use serde::{Deserialize, Serialize};

/// Identifier of a battle unit (one side of the battle).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UnitId(pub u32);

impl UnitId {
    /// Create a new unit ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl From<u32> for UnitId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for UnitId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Unit({})", self.0)
    }
}

/// Which side an option string refers to, relative to the invoking unit.
///
/// Content writes `"me"` for the invoker's own side; any other value means
/// the opposing side.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// The invoking unit.
    Me,
    /// The unit opposing the invoker.
    Op,
}

impl Side {
    /// Interpret an option value.
    #[must_use]
    pub fn from_option(value: &str) -> Self {
        if value == "me" {
            Self::Me
        } else {
            Self::Op
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", UnitId(3)), "Unit(3)");
    }

    #[test]
    fn test_side_from_option() {
        assert_eq!(Side::from_option("me"), Side::Me);
        assert_eq!(Side::from_option("op"), Side::Op);
        assert_eq!(Side::from_option("anything"), Side::Op);
    }
}
