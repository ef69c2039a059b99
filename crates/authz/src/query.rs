//! Capability queries: one tagged type for "check a permission / a set of
//! permissions / a limit / a feature", dispatched through a single
//! [`evaluate`] function instead of scattered conditionals.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{AuthorizationContext, FeatureName, LimitName, Permission};

/// A single capability check against the current authorization context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapabilityQuery {
    /// One permission must be granted.
    Permission(Permission),
    /// At least one of these permissions must be granted.
    AnyPermission(Vec<Permission>),
    /// Every one of these permissions must be granted.
    AllPermissions(Vec<Permission>),
    /// Current usage must be strictly under the named ceiling.
    UnderLimit(LimitName),
    /// The named feature flag must be enabled.
    Feature(FeatureName),
}

impl CapabilityQuery {
    /// Short tag for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Permission(_) => "permission",
            Self::AnyPermission(_) => "any_permission",
            Self::AllPermissions(_) => "all_permissions",
            Self::UnderLimit(_) => "under_limit",
            Self::Feature(_) => "feature",
        }
    }
}

/// Outcome of a capability check.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Granted,
    Denied,
}

impl Verdict {
    pub fn is_granted(&self) -> bool {
        matches!(self, Self::Granted)
    }
}

impl From<bool> for Verdict {
    fn from(granted: bool) -> Self {
        if granted { Self::Granted } else { Self::Denied }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("limit reached: {0}")]
    LimitExceeded(String),
}

/// Evaluate a capability query against the published context.
///
/// - No IO
/// - No panics
/// - Fails closed: a loading context or unknown name yields `Denied`
pub fn evaluate(query: &CapabilityQuery, ctx: &AuthorizationContext) -> Verdict {
    let granted = match query {
        CapabilityQuery::Permission(p) => ctx.has_permission(p),
        CapabilityQuery::AnyPermission(ps) => ctx.has_any_permission(ps),
        CapabilityQuery::AllPermissions(ps) => ctx.has_all_permissions(ps),
        CapabilityQuery::UnderLimit(name) => ctx.is_under_limit(name),
        CapabilityQuery::Feature(name) => ctx.has_feature(name),
    };

    if !granted {
        tracing::debug!(query = query.kind(), loading = ctx.is_loading(), "capability denied");
    }

    Verdict::from(granted)
}

/// Boundary helper: turn a `Denied` verdict into an error.
///
/// Verdict queries themselves are infallible; command handlers use this to
/// enforce a query before executing.
pub fn require(query: &CapabilityQuery, ctx: &AuthorizationContext) -> Result<(), AuthzError> {
    if evaluate(query, ctx).is_granted() {
        return Ok(());
    }
    match query {
        CapabilityQuery::UnderLimit(name) => Err(AuthzError::LimitExceeded(name.to_string())),
        CapabilityQuery::Permission(p) => {
            Err(AuthzError::Forbidden(format!("missing permission '{p}'")))
        }
        other => Err(AuthzError::Forbidden(format!(
            "capability check '{}' failed",
            other.kind()
        ))),
    }
}
