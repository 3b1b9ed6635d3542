//! Logical field names collected by the dialogue.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// A logical field that a dialogue step can populate.
///
/// Declaration order is the canonical order used when a snapshot is listed.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FieldName {
    /// Visitor's name.
    Name,
    /// WhatsApp number.
    Phone,
    /// Current company, team or office.
    Workplace,
    /// Free-text job-search ask ("what are you looking for next").
    Intent,
    /// Self-selected situational category.
    Persona,
    /// Current role.
    Role,
    City,
    /// Primary skill area.
    Skill,
    Email,
    /// Experience band ("3-5 years").
    Experience,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn test_field_name_round_trips_through_str() {
        for field in FieldName::iter() {
            let parsed = FieldName::from_str(field.as_ref()).unwrap();
            assert_eq!(parsed, field);
        }
    }

    #[test]
    fn test_field_name_is_snake_case() {
        assert_eq!(FieldName::Workplace.to_string(), "workplace");
        assert_eq!(
            serde_json::to_string(&FieldName::Experience).unwrap(),
            "\"experience\""
        );
    }

    #[test]
    fn test_unknown_field_name_is_rejected() {
        assert!(FieldName::from_str("salary").is_err());
    }
}
