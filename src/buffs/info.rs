//! Buff templates.
//!
//! `BuffInfo` holds the immutable data of a buff kind. It is loaded once,
//! wrapped in an `Arc`, and shared by every runtime `Buff` of that id.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, FromRepr};

use crate::content::error::{parse_flag, parse_int};
use crate::content::ContentError;
use crate::core::OptionMap;
use crate::effects::Effect;

/// Buff category.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
    FromRepr,
)]
#[strum(ascii_case_insensitive)]
#[repr(i32)]
pub enum BuffType {
    #[default]
    Normal = 0,
    Unhealthy = 1,
    Abnormal = 2,
    TurnBased = 3,
    Mark = 4,
    Feature = 5,
    Emblem = 6,
}

impl BuffType {
    /// Parse a content value: a variant name or its numeric code.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        match raw.parse::<i32>() {
            Ok(code) => Self::from_repr(code),
            Err(_) => raw.parse().ok(),
        }
    }

    /// Unhealthy and abnormal buffs never survive a pet switch.
    #[must_use]
    pub const fn is_ailment(self) -> bool {
        matches!(self, Self::Unhealthy | Self::Abnormal)
    }
}

/// What happens when a buff is added while one with the same id is present.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
    FromRepr,
)]
#[strum(ascii_case_insensitive)]
#[repr(i32)]
pub enum CopyHandleType {
    /// Append another instance.
    New = 0,
    /// Reject the newcomer.
    #[default]
    Block = 1,
    /// Overwrite turn and value.
    Replace = 2,
    /// Add value, keep the longer turn.
    Stack = 3,
    /// Reset turn, keep value.
    Refresh = 4,
}

impl CopyHandleType {
    /// Parse a content value: a variant name or its numeric code.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        match raw.parse::<i32>() {
            Ok(code) => Self::from_repr(code),
            Err(_) => raw.parse().ok(),
        }
    }
}

/// Immutable buff template.
///
/// ## Example
///
/// ```
/// use pet_battle::buffs::{BuffInfo, BuffType, CopyHandleType};
///
/// let info = BuffInfo::new(12, "Shield", BuffType::Normal, CopyHandleType::Stack, -1,
///     "auto_remove=true&min_val=0", "Absorbs damage").unwrap();
/// assert!(info.auto_remove);
/// assert_eq!(info.min_value, 0);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BuffInfo {
    pub id: i32,
    /// Icon resource id (`res` option, defaults to `id`).
    pub res_id: i32,
    pub name: String,
    pub buff_type: BuffType,
    pub copy_handle: CopyHandleType,
    /// Base duration; `-1` is permanent.
    pub turn: i32,
    /// Survives a pet switch. Always false for ailments.
    pub keep: bool,
    /// Moves to the incoming pet on a switch.
    pub inherit: bool,
    /// Not shown to players.
    pub hide: bool,
    /// Removed as soon as its value drops to zero or below.
    pub auto_remove: bool,
    pub min_value: i32,
    pub max_value: i32,
    pub description: String,
    pub options: OptionMap,
    /// Effects fired while the buff is active. Attached after load.
    pub effects: Vec<Effect>,
}

impl BuffInfo {
    /// Build a template, reading the flag options.
    ///
    /// # Errors
    ///
    /// Returns `ContentError` when a flag or bound option does not parse.
    pub fn new(
        id: i32,
        name: impl Into<String>,
        buff_type: BuffType,
        copy_handle: CopyHandleType,
        turn: i32,
        options: &str,
        description: impl Into<String>,
    ) -> Result<Self, ContentError> {
        let options = OptionMap::parse(options);

        let res_id = match options.get("res") {
            Some(raw) => parse_int("res", raw)?,
            None => id,
        };
        let keep = if buff_type.is_ailment() {
            false
        } else {
            parse_flag("keep", options.get_or("keep", "true"))?
        };
        let inherit = parse_flag("inherit", options.get_or("inherit", "false"))?;
        let hide = parse_flag("hide", options.get_or("hide", "false"))?;
        let auto_remove = parse_flag("auto_remove", options.get_or("auto_remove", "false"))?;
        let min_value = match options.get("min_val") {
            Some(raw) => parse_int("min_val", raw)?,
            None => i32::MIN,
        };
        let max_value = match options.get("max_val") {
            Some(raw) => parse_int("max_val", raw)?,
            None => i32::MAX,
        };

        Ok(Self {
            id,
            res_id,
            name: name.into(),
            buff_type,
            copy_handle,
            turn,
            keep,
            inherit,
            hide,
            auto_remove,
            min_value,
            max_value,
            description: description.into().trim().to_string(),
            options,
            effects: Vec::new(),
        })
    }

    /// Attach effects (builder pattern).
    #[must_use]
    pub fn with_effects(mut self, effects: Vec<Effect>) -> Self {
        self.effects = effects;
        self
    }

    /// Clamp a value into this template's bounds.
    #[must_use]
    pub fn clamp_value(&self, value: i32) -> i32 {
        value.clamp(self.min_value, self.max_value.max(self.min_value))
    }

    /// Display ordering: features first, then emblems, then by id.
    #[must_use]
    pub fn sort_priority(&self) -> i32 {
        const MOD: i32 = 100_000;
        let pet = self.id % MOD;
        match self.buff_type {
            BuffType::Feature => -2 * MOD + (pet - MOD),
            BuffType::Emblem => -MOD + (pet - MOD),
            _ => self.id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buff_type_parse() {
        assert_eq!(BuffType::parse("TurnBased"), Some(BuffType::TurnBased));
        assert_eq!(BuffType::parse("mark"), Some(BuffType::Mark));
        assert_eq!(BuffType::parse("1"), Some(BuffType::Unhealthy));
        assert_eq!(BuffType::parse("99"), None);
        assert_eq!(BuffType::parse("Curse"), None);
    }

    #[test]
    fn test_copy_policy_parse() {
        assert_eq!(CopyHandleType::parse("stack"), Some(CopyHandleType::Stack));
        assert_eq!(CopyHandleType::parse("4"), Some(CopyHandleType::Refresh));
        assert_eq!(CopyHandleType::parse("merge"), None);
    }

    #[test]
    fn test_defaults() {
        let info =
            BuffInfo::new(7, "Guard", BuffType::Normal, CopyHandleType::Block, 3, "none", " text ")
                .unwrap();
        assert_eq!(info.res_id, 7);
        assert!(info.keep);
        assert!(!info.inherit);
        assert!(!info.auto_remove);
        assert_eq!(info.min_value, i32::MIN);
        assert_eq!(info.max_value, i32::MAX);
        assert_eq!(info.description, "text");
    }

    #[test]
    fn test_ailments_never_keep() {
        let info = BuffInfo::new(
            20,
            "Poison",
            BuffType::Unhealthy,
            CopyHandleType::Refresh,
            3,
            "keep=true",
            "",
        )
        .unwrap();
        assert!(!info.keep);
    }

    #[test]
    fn test_bad_flag_is_error() {
        let err = BuffInfo::new(1, "x", BuffType::Normal, CopyHandleType::New, 1, "hide=maybe", "")
            .unwrap_err();
        assert!(matches!(err, ContentError::InvalidBool { key: "hide", .. }));
    }

    #[test]
    fn test_clamp_and_priority() {
        let info = BuffInfo::new(
            300_012,
            "Feature",
            BuffType::Feature,
            CopyHandleType::Block,
            -1,
            "min_val=0&max_val=5",
            "",
        )
        .unwrap();
        assert_eq!(info.clamp_value(9), 5);
        assert_eq!(info.clamp_value(-3), 0);
        assert!(info.sort_priority() < 0);
    }
}
