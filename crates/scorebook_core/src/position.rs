//! Fielding positions.

use serde::{Deserialize, Serialize};

/// A defensive position (or batting-only slot) in a lineup.
///
/// Serialized with the scorebook abbreviation ("P", "1B", "SS", ...).
/// Parsing also accepts the long lowercase name ("pitcher", "shortstop").
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
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum Position {
    /// Pitcher.
    #[serde(rename = "P")]
    #[strum(to_string = "P", serialize = "pitcher")]
    Pitcher,
    /// Catcher.
    #[serde(rename = "C")]
    #[strum(to_string = "C", serialize = "catcher")]
    Catcher,
    /// First base.
    #[serde(rename = "1B")]
    #[strum(to_string = "1B", serialize = "first base")]
    FirstBase,
    /// Second base.
    #[serde(rename = "2B")]
    #[strum(to_string = "2B", serialize = "second base")]
    SecondBase,
    /// Third base.
    #[serde(rename = "3B")]
    #[strum(to_string = "3B", serialize = "third base")]
    ThirdBase,
    /// Shortstop.
    #[serde(rename = "SS")]
    #[strum(to_string = "SS", serialize = "shortstop")]
    Shortstop,
    /// Left field.
    #[serde(rename = "LF")]
    #[strum(to_string = "LF", serialize = "left field")]
    LeftField,
    /// Center field.
    #[serde(rename = "CF")]
    #[strum(to_string = "CF", serialize = "center field")]
    CenterField,
    /// Right field.
    #[serde(rename = "RF")]
    #[strum(to_string = "RF", serialize = "right field")]
    RightField,
    /// Designated hitter.
    #[serde(rename = "DH")]
    #[strum(to_string = "DH", serialize = "designated hitter")]
    DesignatedHitter,
    /// Extra hitter (softball batting-only slot).
    #[serde(rename = "EH")]
    #[strum(to_string = "EH", serialize = "extra hitter")]
    ExtraHitter,
    /// Not assigned a defensive position.
    #[serde(rename = "BN")]
    #[strum(to_string = "BN", serialize = "bench")]
    Bench,
}

impl Position {
    /// Checks whether the position plays defense.
    pub fn is_defensive(self) -> bool {
        !matches!(
            self,
            Position::DesignatedHitter | Position::ExtraHitter | Position::Bench
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_parse_abbreviation_and_long_name() {
        assert_eq!(Position::from_str("SS").unwrap(), Position::Shortstop);
        assert_eq!(Position::from_str("ss").unwrap(), Position::Shortstop);
        assert_eq!(Position::from_str("pitcher").unwrap(), Position::Pitcher);
        assert!(Position::from_str("goalie").is_err());
    }

    #[test]
    fn test_display_is_abbreviation() {
        assert_eq!(Position::FirstBase.to_string(), "1B");
        assert_eq!(Position::CenterField.to_string(), "CF");
    }

    #[test]
    fn test_serde_uses_abbreviation() {
        let json = serde_json::to_string(&Position::ThirdBase).unwrap();
        assert_eq!(json, "\"3B\"");
        let back: Position = serde_json::from_str("\"DH\"").unwrap();
        assert_eq!(back, Position::DesignatedHitter);
    }
}
