//! Skill-selection wire format.
//!
//! A unit's chosen action travels as a short list of strings led by the
//! skill id. Special actions carry their parameters after the id:
//!
//! | Action | Fields |
//! |---|---|
//! | pass | `[-1]` |
//! | item | `[-2, item_id]` |
//! | pet switch | `[-3, source_index, target_index, passive]` |
//! | escape | `[-4]` |
//! | any other skill | `[id]` |

use smallvec::{smallvec, SmallVec};

use super::skill::{Skill, SkillType};
use crate::content::Database;

/// Encoded skill selection.
pub type RpcData = SmallVec<[String; 4]>;

/// A field list that cannot be decoded.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum WireError {
    /// No fields at all.
    #[error("empty skill selection")]
    Empty,

    /// A field the action kind requires is missing.
    #[error("skill selection {kind} is missing field {index}")]
    MissingField { kind: i32, index: usize },

    /// A field is not in the expected format.
    #[error("skill selection field {index} is malformed: {value:?}")]
    InvalidField { index: usize, value: String },
}

impl Skill {
    /// Encode this skill as a selection.
    #[must_use]
    pub fn to_rpc_data(&self) -> RpcData {
        let kind = self.id.to_string();
        match SkillType::from_repr(self.id) {
            Some(SkillType::Item) => {
                smallvec![kind, self.options.get_or("item_id", "0").to_string()]
            }
            Some(SkillType::PetChange) => smallvec![
                kind,
                self.options.get_or("source_index", "0").to_string(),
                self.options.get_or("target_index", "0").to_string(),
                self.options.get_or("passive", "false").to_string(),
            ],
            _ => smallvec![kind],
        }
    }

    /// Decode a selection.
    ///
    /// Unknown skill ids decode to the no-op skill.
    ///
    /// # Errors
    ///
    /// Returns `WireError` when the field list is empty, too short for its
    /// action kind, or holds a field that does not parse.
    pub fn parse_rpc_data<S: AsRef<str>>(data: &[S], db: &Database) -> Result<Skill, WireError> {
        let kind: i32 = field(data, 0, 0)?;

        let skill = match SkillType::from_repr(kind) {
            Some(SkillType::NoOp) => Skill::no_op(),
            Some(SkillType::Escape) => Skill::escape(),
            Some(SkillType::Item) => {
                let item_id: i32 = field(data, kind, 1)?;
                Skill::item(item_id, db.item_effects(item_id))
            }
            Some(SkillType::PetChange) => {
                let source: usize = field(data, kind, 1)?;
                let target: usize = field(data, kind, 2)?;
                let passive = bool_field(data, kind, 3)?;
                Skill::pet_change(source, target, passive)
            }
            _ => db.skill_or_no_op(kind),
        };
        Ok(skill)
    }
}

fn raw_field<S: AsRef<str>>(data: &[S], kind: i32, index: usize) -> Result<&str, WireError> {
    match data.get(index) {
        Some(value) => Ok(value.as_ref()),
        None if index == 0 => Err(WireError::Empty),
        None => Err(WireError::MissingField { kind, index }),
    }
}

fn field<S: AsRef<str>, T: std::str::FromStr>(
    data: &[S],
    kind: i32,
    index: usize,
) -> Result<T, WireError> {
    let raw = raw_field(data, kind, index)?;
    raw.trim().parse().map_err(|_| WireError::InvalidField {
        index,
        value: raw.to_string(),
    })
}

fn bool_field<S: AsRef<str>>(data: &[S], kind: i32, index: usize) -> Result<bool, WireError> {
    let raw = raw_field(data, kind, index)?;
    crate::core::parse_bool(raw).ok_or_else(|| WireError::InvalidField {
        index,
        value: raw.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_special() {
        assert_eq!(Skill::no_op().to_rpc_data().as_slice(), ["-1"]);
        assert_eq!(Skill::escape().to_rpc_data().as_slice(), ["-4"]);
        assert_eq!(
            Skill::pet_change(1, 3, true).to_rpc_data().as_slice(),
            ["-3", "1", "3", "true"]
        );
        assert_eq!(Skill::item(77, Vec::new()).to_rpc_data().as_slice(), ["-2", "77"]);
    }

    #[test]
    fn test_decode_errors() {
        let db = Database::new();
        let empty: [&str; 0] = [];
        assert_eq!(Skill::parse_rpc_data(&empty, &db), Err(WireError::Empty));
        assert_eq!(
            Skill::parse_rpc_data(&["-3", "1"], &db),
            Err(WireError::MissingField { kind: -3, index: 2 })
        );
        assert!(matches!(
            Skill::parse_rpc_data(&["-3", "1", "2", "maybe"], &db),
            Err(WireError::InvalidField { index: 3, .. })
        ));
        assert!(matches!(
            Skill::parse_rpc_data(&["abc"], &db),
            Err(WireError::InvalidField { index: 0, .. })
        ));
    }

    #[test]
    fn test_unknown_id_is_no_op() {
        let db = Database::new();
        let skill = Skill::parse_rpc_data(&["123456"], &db).unwrap();
        assert_eq!(skill.skill_type, SkillType::NoOp);
    }
}
