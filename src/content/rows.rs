//! Tabular content loaders.
//!
//! Content is authored as comma-separated rows, one template per line.
//! Blank lines and lines starting with `#` are skipped.
//!
//! ```text
//! # buffs: id,name,type,copy,turn,options,description
//! 7,Burn,Abnormal,Block,3,none,Loses hp every turn, until cured
//!
//! # skills: id,name,element,type,power,anger,accuracy,options,description
//! 10010,Tackle,1,1,40,0,100,critical=10,A plain hit
//!
//! # effects: owner,owner_id,timing,ability,options
//! skill,10010,OnAttack,AddBuff,who=op&id=7&turn=3
//! ```
//!
//! The last column of buff and skill rows takes the rest of the line, so
//! descriptions may contain commas.

use strum::{Display, EnumString};
use tracing::warn;

use super::error::{parse_int, ContentError};
use super::registry::Database;
use crate::buffs::{BuffInfo, BuffType, CopyHandleType};
use crate::effects::{Effect, EffectAbility, EffectTiming};
use crate::skills::{Skill, SkillType};

/// Template an effect row attaches to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum EffectOwner {
    Skill,
    Buff,
}

/// One parsed effect row.
#[derive(Clone, Debug, PartialEq)]
pub struct EffectRow {
    pub owner: EffectOwner,
    pub owner_id: i32,
    pub effect: Effect,
}

/// Parsers for the three row formats.
pub struct RowLoader;

impl RowLoader {
    /// Parse one buff row.
    ///
    /// # Errors
    ///
    /// Returns `ContentError` on a short row or an unparsable column.
    pub fn buff(line: &str) -> Result<BuffInfo, ContentError> {
        let cols = columns("buff", line, 7)?;
        let buff_type =
            BuffType::parse(cols[2]).ok_or_else(|| ContentError::UnknownBuffType(cols[2].into()))?;
        let copy = CopyHandleType::parse(cols[3])
            .ok_or_else(|| ContentError::UnknownCopyPolicy(cols[3].into()))?;

        BuffInfo::new(
            parse_int("id", cols[0])?,
            cols[1].trim(),
            buff_type,
            copy,
            parse_int("turn", cols[4])?,
            cols[5].trim(),
            cols[6],
        )
    }

    /// Parse one skill row.
    ///
    /// # Errors
    ///
    /// Returns `ContentError` on a short row or an unparsable column.
    pub fn skill(line: &str) -> Result<Skill, ContentError> {
        let cols = columns("skill", line, 9)?;
        let skill_type = SkillType::from_repr(parse_int("type", cols[3])?)
            .ok_or_else(|| ContentError::UnknownSkillType(cols[3].trim().into()))?;

        Skill::new(
            parse_int("id", cols[0])?,
            cols[1].trim(),
            parse_int("element", cols[2])?,
            skill_type,
            parse_int("power", cols[4])?,
            parse_int("anger", cols[5])?,
            parse_int("accuracy", cols[6])?,
            cols[7].trim(),
            cols[8].trim(),
        )
    }

    /// Parse one effect row.
    ///
    /// # Errors
    ///
    /// Returns `ContentError` on a short row, an unknown owner, timing or
    /// ability tag.
    pub fn effect(line: &str) -> Result<EffectRow, ContentError> {
        let cols = columns("effect", line, 5)?;
        let owner = cols[0]
            .trim()
            .parse::<EffectOwner>()
            .map_err(|_| ContentError::UnknownOwner(cols[0].trim().into()))?;
        let timing = cols[2]
            .trim()
            .parse::<EffectTiming>()
            .map_err(|_| ContentError::UnknownTiming(cols[2].trim().into()))?;
        let ability = cols[3]
            .trim()
            .parse::<EffectAbility>()
            .map_err(|_| ContentError::UnknownAbility(cols[3].trim().into()))?;

        Ok(EffectRow {
            owner,
            owner_id: parse_int("owner_id", cols[1])?,
            effect: Effect::new(timing, ability, cols[4].trim()),
        })
    }

    /// Parse every content line of a table, skipping rows that fail with a
    /// warning.
    pub fn table<T>(
        kind: &'static str,
        text: &str,
        parse: impl Fn(&str) -> Result<T, ContentError>,
    ) -> Vec<T> {
        content_lines(text)
            .filter_map(|(line_no, line)| match parse(line) {
                Ok(row) => Some(row),
                Err(error) => {
                    warn!(kind, line = line_no, %error, "content row skipped");
                    None
                }
            })
            .collect()
    }
}

impl Database {
    /// Build a database from buff, skill and effect tables.
    ///
    /// Effect rows are attached to their owners in table order. Malformed
    /// rows and effects whose owner is missing are skipped with a warning.
    #[must_use]
    pub fn from_tables(buffs: &str, skills: &str, effects: &str) -> Self {
        let mut buffs = RowLoader::table("buff", buffs, RowLoader::buff);
        let mut skills = RowLoader::table("skill", skills, RowLoader::skill);

        for row in RowLoader::table("effect", effects, RowLoader::effect) {
            let attached = match row.owner {
                EffectOwner::Buff => buffs
                    .iter_mut()
                    .find(|b| b.id == row.owner_id)
                    .map(|b| b.effects.push(row.effect))
                    .is_some(),
                EffectOwner::Skill => match skills.iter_mut().find(|s| s.id == row.owner_id) {
                    Some(skill) => {
                        let mut effects = std::mem::take(&mut skill.effects);
                        effects.push(row.effect);
                        skill.set_effects(effects);
                        true
                    }
                    None => false,
                },
            };
            if !attached {
                let error = ContentError::MissingOwner {
                    owner: match row.owner {
                        EffectOwner::Skill => "skill",
                        EffectOwner::Buff => "buff",
                    },
                    id: row.owner_id,
                };
                warn!(%error, "effect row skipped");
            }
        }

        let mut db = Self::new();
        for info in buffs {
            db.insert_buff(info);
        }
        for skill in skills {
            db.insert_skill(skill);
        }
        db
    }
}

/// Split a row into exactly `count` columns; the last takes the remainder.
fn columns<'a>(kind: &'static str, line: &'a str, count: usize) -> Result<Vec<&'a str>, ContentError> {
    let cols: Vec<&str> = line.splitn(count, ',').collect();
    if cols.len() < count {
        return Err(ContentError::ColumnCount {
            kind,
            expected: count,
            found: cols.len(),
        });
    }
    Ok(cols)
}

fn content_lines(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim_end_matches('\r')))
        .filter(|(_, line)| {
            let trimmed = line.trim();
            !trimmed.is_empty() && !trimmed.starts_with('#')
        })
}
