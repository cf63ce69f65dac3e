//! Shot identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{ModelError, ModelResult};

/// Identifier of a single shot, e.g. `shot_12`.
///
/// The second `_`-separated segment carries the shot's ordinal, which is the
/// only notion of temporal order the clustering pipeline uses.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShotId(pub String);

impl ShotId {
    /// Create from an existing string.
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Build the canonical id for ordinal `n` (`shot_<n>`).
    pub fn from_ordinal(n: u64) -> Self {
        Self(format!("shot_{}", n))
    }

    /// Get the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parse the ordinal embedded in the id.
    ///
    /// # Examples
    /// ```
    /// use scn_models::ShotId;
    /// assert_eq!(ShotId::from("shot_12").ordinal().unwrap(), 12);
    /// assert_eq!(ShotId::from("scene_15_shot_3").ordinal().unwrap(), 15);
    /// assert!(ShotId::from("intro").ordinal().is_err());
    /// ```
    pub fn ordinal(&self) -> ModelResult<u64> {
        self.0
            .split('_')
            .nth(1)
            .and_then(|part| part.parse::<u64>().ok())
            .ok_or_else(|| ModelError::invalid_shot_id(&self.0))
    }
}

impl fmt::Display for ShotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ShotId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ShotId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Convenience for building shot lists in tests and fixtures.
pub fn shot_ids<I, S>(ids: I) -> Vec<ShotId>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    ids.into_iter().map(|s| ShotId(s.into())).collect()
}
