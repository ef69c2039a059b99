//! Authorization context: the resolved permissions/limits/features for one
//! actor/organization pair, plus the publish/subscribe pair that moves it
//! from `Loading` to `Resolved`.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use orgpilot_core::{PrincipalId, TenantId};

use crate::{FeatureName, LimitName, LimitUsage, Permission};

/// Fully resolved authorization state for a principal within a tenant.
///
/// # Invariants
/// - Immutable once published: consumers only ever see a complete snapshot.
/// - Scoped to exactly one actor/organization pair; an organization switch
///   produces a new snapshot, never a mutation of this one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextSnapshot {
    pub tenant_id: TenantId,
    pub principal_id: PrincipalId,
    pub permissions: HashSet<Permission>,
    pub limits: HashMap<LimitName, LimitUsage>,
    pub features: HashMap<FeatureName, bool>,
    pub resolved_at: DateTime<Utc>,
}

impl ContextSnapshot {
    pub fn new(tenant_id: TenantId, principal_id: PrincipalId) -> Self {
        Self {
            tenant_id,
            principal_id,
            permissions: HashSet::new(),
            limits: HashMap::new(),
            features: HashMap::new(),
            resolved_at: Utc::now(),
        }
    }

    pub fn with_permissions(mut self, permissions: impl IntoIterator<Item = Permission>) -> Self {
        self.permissions.extend(permissions);
        self
    }

    pub fn with_limit(mut self, name: impl Into<LimitName>, usage: LimitUsage) -> Self {
        self.limits.insert(name.into(), usage);
        self
    }

    pub fn with_feature(mut self, name: impl Into<FeatureName>, enabled: bool) -> Self {
        self.features.insert(name.into(), enabled);
        self
    }
}

/// Published authorization state.
///
/// Either `Loading` (initial resolution still in flight, no verdicts
/// available) or `Resolved` (all verdict queries are deterministic). There is
/// no partial-resolution state.
#[derive(Debug, Clone)]
pub enum AuthorizationContext {
    Loading,
    Resolved(Arc<ContextSnapshot>),
}

impl AuthorizationContext {
    pub fn resolved(snapshot: ContextSnapshot) -> Self {
        Self::Resolved(Arc::new(snapshot))
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved(_))
    }

    /// The snapshot, if resolution has completed.
    pub fn snapshot(&self) -> Option<&ContextSnapshot> {
        match self {
            Self::Loading => None,
            Self::Resolved(snapshot) => Some(snapshot),
        }
    }
}

/// Create a publisher/handle pair, starting in `Loading`.
///
/// The publisher belongs to whatever collaborator fetches authorization data
/// (login, organization switch). Handles are held by consumers; each one
/// always reads the latest published value.
pub fn context_channel() -> (ContextPublisher, ContextHandle) {
    let (tx, rx) = watch::channel(AuthorizationContext::Loading);
    (ContextPublisher { tx }, ContextHandle { rx })
}

/// Write side of the context channel.
#[derive(Debug)]
pub struct ContextPublisher {
    tx: watch::Sender<AuthorizationContext>,
}

impl ContextPublisher {
    /// Publish a freshly resolved snapshot, replacing whatever was current.
    pub fn publish(&self, snapshot: ContextSnapshot) {
        tracing::debug!(
            tenant_id = %snapshot.tenant_id,
            principal_id = %snapshot.principal_id,
            permissions = snapshot.permissions.len(),
            "authorization context resolved"
        );
        // Send only fails when every handle is gone; nothing to deliver then.
        let _ = self.tx.send(AuthorizationContext::resolved(snapshot));
    }

    /// Reset to `Loading` (logout or organization switch in progress).
    pub fn invalidate(&self) {
        tracing::debug!("authorization context invalidated");
        let _ = self.tx.send(AuthorizationContext::Loading);
    }

    /// Obtain a fresh handle on the same channel.
    pub fn subscribe(&self) -> ContextHandle {
        ContextHandle {
            rx: self.tx.subscribe(),
        }
    }
}

/// Read side of the context channel.
#[derive(Debug, Clone)]
pub struct ContextHandle {
    rx: watch::Receiver<AuthorizationContext>,
}

impl ContextHandle {
    /// The latest published context (never blocks).
    pub fn current(&self) -> AuthorizationContext {
        self.rx.borrow().clone()
    }

    /// Wait until a resolved snapshot is published and return it.
    ///
    /// Returns the current snapshot immediately if resolution has already
    /// completed. Returns `None` if the publisher is dropped before a
    /// snapshot arrives; no error is raised on that path.
    pub async fn resolved(&mut self) -> Option<Arc<ContextSnapshot>> {
        let ctx = self.rx.wait_for(AuthorizationContext::is_resolved).await.ok()?;
        match &*ctx {
            AuthorizationContext::Resolved(snapshot) => Some(Arc::clone(snapshot)),
            AuthorizationContext::Loading => None,
        }
    }
}
