//! Content loading errors.

/// A content row that could not be turned into a template.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ContentError {
    /// The row has fewer columns than the format requires.
    #[error("{kind} row has {found} columns, expected at least {expected}")]
    ColumnCount {
        kind: &'static str,
        expected: usize,
        found: usize,
    },

    /// A numeric column did not parse.
    #[error("column `{column}` is not a number: {value:?}")]
    InvalidNumber { column: &'static str, value: String },

    /// A boolean option did not parse.
    #[error("option `{key}` is not a boolean: {value:?}")]
    InvalidBool { key: &'static str, value: String },

    /// Unrecognized buff type name or code.
    #[error("unknown buff type {0:?}")]
    UnknownBuffType(String),

    /// Unrecognized copy-handling policy.
    #[error("unknown copy policy {0:?}")]
    UnknownCopyPolicy(String),

    /// Unrecognized skill type code.
    #[error("unknown skill type {0:?}")]
    UnknownSkillType(String),

    /// Unrecognized effect timing.
    #[error("unknown effect timing {0:?}")]
    UnknownTiming(String),

    /// Unrecognized ability tag.
    #[error("unknown ability {0:?}")]
    UnknownAbility(String),

    /// Effect row owner is neither `skill` nor `buff`.
    #[error("unknown effect owner {0:?}")]
    UnknownOwner(String),

    /// Effect row points at a template that was never loaded.
    #[error("effect row references missing {owner} {id}")]
    MissingOwner { owner: &'static str, id: i32 },
}

/// Parse a required integer column.
pub(crate) fn parse_int(column: &'static str, value: &str) -> Result<i32, ContentError> {
    value.trim().parse().map_err(|_| ContentError::InvalidNumber {
        column,
        value: value.to_string(),
    })
}

/// Parse a required float column.
pub(crate) fn parse_float(column: &'static str, value: &str) -> Result<f64, ContentError> {
    value.trim().parse().map_err(|_| ContentError::InvalidNumber {
        column,
        value: value.to_string(),
    })
}

/// Parse a boolean option value.
pub(crate) fn parse_flag(key: &'static str, value: &str) -> Result<bool, ContentError> {
    crate::core::parse_bool(value).ok_or_else(|| ContentError::InvalidBool {
        key,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = ContentError::ColumnCount {
            kind: "buff",
            expected: 7,
            found: 3,
        };
        assert_eq!(err.to_string(), "buff row has 3 columns, expected at least 7");

        let err = parse_int("turn", "x3").unwrap_err();
        assert_eq!(err.to_string(), "column `turn` is not a number: \"x3\"");
    }

    #[test]
    fn test_parse_helpers() {
        assert_eq!(parse_int("id", " 12 "), Ok(12));
        assert_eq!(parse_float("critical", "7.5"), Ok(7.5));
        assert_eq!(parse_flag("keep", "TRUE"), Ok(true));
        assert!(parse_flag("keep", "yes").is_err());
    }
}
