//! Three-valued dimension scores.
//!
//! Every check in this crate produces a [`Score`]: passed, failed, or not
//! applicable. "Not applicable" means no comparable expectation existed for
//! the check (or the agent state made it moot, e.g. a clarification was
//! given); it is excluded from aggregation rather than counted as a zero.
//! Collapsing it into `0.0` would penalize test cases for checks nobody
//! asked for, so the distinction is carried everywhere a score exists.

use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

/// Outcome of one evaluated check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Score {
    /// The expectation existed and was satisfied.
    Pass,
    /// The expectation existed and was not satisfied, including "the agent
    /// produced nothing where something was expected".
    Fail,
    /// No expectation existed for this check, or the state made it moot.
    #[default]
    NotApplicable,
}

impl Score {
    /// Build a score from an evaluated boolean.
    pub fn from_bool(passed: bool) -> Self {
        if passed {
            Score::Pass
        } else {
            Score::Fail
        }
    }

    /// Numeric value for aggregation: `1.0`, `0.0`, or `None`.
    pub fn value(&self) -> Option<f64> {
        match self {
            Score::Pass => Some(1.0),
            Score::Fail => Some(0.0),
            Score::NotApplicable => None,
        }
    }

    /// Whether this check contributes to the overall average.
    pub fn is_applicable(&self) -> bool {
        !matches!(self, Score::NotApplicable)
    }

    /// Whether this check was evaluated and passed.
    pub fn is_pass(&self) -> bool {
        matches!(self, Score::Pass)
    }
}

// Wire shape is `1.0` / `0.0` / `null` so exported records line up with the
// numeric score columns downstream tooling expects.
impl Serialize for Score {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.value().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Score {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Option::<f64>::deserialize(deserializer)? {
            None => Ok(Score::NotApplicable),
            Some(v) if v == 1.0 => Ok(Score::Pass),
            Some(v) if v == 0.0 => Ok(Score::Fail),
            Some(v) => Err(de::Error::custom(format!(
                "score must be 1.0, 0.0 or null, got {v}"
            ))),
        }
    }
}

impl std::fmt::Display for Score {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Score::Pass => write!(f, "1.0"),
            Score::Fail => write!(f, "0.0"),
            Score::NotApplicable => write!(f, "n/a"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_bool() {
        assert_eq!(Score::from_bool(true), Score::Pass);
        assert_eq!(Score::from_bool(false), Score::Fail);
    }

    #[test]
    fn test_value_mapping() {
        assert_eq!(Score::Pass.value(), Some(1.0));
        assert_eq!(Score::Fail.value(), Some(0.0));
        assert_eq!(Score::NotApplicable.value(), None);
    }

    #[test]
    fn test_applicability() {
        assert!(Score::Pass.is_applicable());
        assert!(Score::Fail.is_applicable());
        assert!(!Score::NotApplicable.is_applicable());
    }

    #[test]
    fn test_serialization_shape() {
        assert_eq!(serde_json::to_string(&Score::Pass).unwrap(), "1.0");
        assert_eq!(serde_json::to_string(&Score::Fail).unwrap(), "0.0");
        assert_eq!(serde_json::to_string(&Score::NotApplicable).unwrap(), "null");
    }

    #[test]
    fn test_deserialization_round_trip() {
        for score in [Score::Pass, Score::Fail, Score::NotApplicable] {
            let json = serde_json::to_string(&score).unwrap();
            let parsed: Score = serde_json::from_str(&json).unwrap();
            assert_eq!(parsed, score);
        }
    }

    #[test]
    fn test_deserialization_rejects_other_values() {
        assert!(serde_json::from_str::<Score>("0.5").is_err());
    }
}
