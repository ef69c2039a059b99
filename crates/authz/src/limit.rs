use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Name of a plan-defined numeric ceiling (e.g. "seats").
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LimitName(Cow<'static, str>);

impl LimitName {
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for LimitName {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for LimitName {
    fn from(value: &'static str) -> Self {
        Self::new(value)
    }
}

/// Current usage against a configured ceiling, both supplied by the
/// authorization-fetching collaborator.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LimitUsage {
    pub used: u64,
    pub max: u64,
}

impl LimitUsage {
    pub fn new(used: u64, max: u64) -> Self {
        Self { used, max }
    }

    /// True while there is headroom left under the ceiling.
    pub fn is_under(&self) -> bool {
        self.used < self.max
    }
}
