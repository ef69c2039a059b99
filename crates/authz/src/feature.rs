use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Name of a plan/tier feature flag (e.g. "advanced_reports").
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureName(Cow<'static, str>);

impl FeatureName {
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for FeatureName {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for FeatureName {
    fn from(value: &'static str) -> Self {
        Self::new(value)
    }
}
