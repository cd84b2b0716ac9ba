//! Named attribute access.
//!
//! Content expressions and several abilities read and write entity fields
//! by name (`hp`, `skill.power`, `buff(12).value`). Each entity kind
//! implements `NamedAttributeAccessor` over its own closed set of names;
//! the implementations live next to the types they describe.
//!
//! Unknown names read as `None` and writes to them are ignored. Content
//! relies on that permissiveness.

use crate::buffs::Buff;

/// Value an unresolvable identifier evaluates to.
pub const NOT_FOUND: f64 = f64::MIN;

/// Get/set a numeric attribute by name.
pub trait NamedAttributeAccessor {
    /// Read a named attribute, `None` for unknown names.
    fn try_get(&self, name: &str) -> Option<f64>;

    /// Write a named attribute. Returns false (and does nothing) for
    /// unknown or read-only names.
    fn set(&mut self, name: &str, value: f64) -> bool;

    /// Read a named attribute, `NOT_FOUND` for unknown names.
    fn get(&self, name: &str) -> f64 {
        self.try_get(name).unwrap_or(NOT_FOUND)
    }
}

/// Extract the argument of a call-shaped name: `call_arg("buff(12)", "buff")`
/// gives `Some("12")`.
#[must_use]
pub fn call_arg<'a>(name: &'a str, func: &str) -> Option<&'a str> {
    name.strip_prefix(func)?
        .strip_prefix('(')?
        .strip_suffix(')')
}

/// Evaluate a `buff(...)` query argument over a buff list.
///
/// - `<id>`: 1 if a buff with that id is present, else 0
/// - `<key>:<value>`: number of buffs whose option `key` equals `value`
pub fn buff_query<'a>(buffs: impl Iterator<Item = &'a Buff>, arg: &str) -> Option<f64> {
    if let Some((key, value)) = arg.split_once(':') {
        let count = buffs.filter(|b| b.option(key) == Some(value)).count();
        return Some(count as f64);
    }
    let id: i32 = arg.trim().parse().ok()?;
    let mut buffs = buffs;
    Some(if buffs.any(|b| b.id == id) { 1.0 } else { 0.0 })
}

/// Convert a bool to the 1/0 form expressions see.
#[must_use]
pub fn flag(value: bool) -> f64 {
    if value {
        1.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_call_arg() {
        assert_eq!(call_arg("buff(12)", "buff"), Some("12"));
        assert_eq!(call_arg("record(wins)", "record"), Some("wins"));
        assert_eq!(call_arg("buff12", "buff"), None);
        assert_eq!(call_arg("buff(12", "buff"), None);
        assert_eq!(call_arg("skill(3)", "buff"), None);
    }

    #[test]
    fn test_flag() {
        assert_eq!(flag(true), 1.0);
        assert_eq!(flag(false), 0.0);
    }
}
