//! Verdict queries: pure, fail-closed functions of the published context.
//!
//! - No IO
//! - No panics
//! - Loading context or unknown names always evaluate to `false`

use crate::{AuthorizationContext, FeatureName, LimitName, Permission};

impl AuthorizationContext {
    /// True iff `permission` is a member of the resolved set. Fails closed
    /// while loading.
    pub fn has_permission(&self, permission: &Permission) -> bool {
        match self.snapshot() {
            None => false,
            Some(snapshot) => snapshot.permissions.contains(permission),
        }
    }

    /// True iff at least one of `permissions` is granted.
    ///
    /// An empty disjunction grants nothing: `has_any_permission(&[])` is
    /// `false`.
    pub fn has_any_permission(&self, permissions: &[Permission]) -> bool {
        match self.snapshot() {
            None => false,
            Some(snapshot) => permissions.iter().any(|p| snapshot.permissions.contains(p)),
        }
    }

    /// True iff every one of `permissions` is granted.
    ///
    /// Vacuously true on the empty set: `has_all_permissions(&[])` is `true`
    /// for any resolved context (still `false` while loading).
    pub fn has_all_permissions(&self, permissions: &[Permission]) -> bool {
        match self.snapshot() {
            None => false,
            Some(snapshot) => permissions.iter().all(|p| snapshot.permissions.contains(p)),
        }
    }

    /// True iff current usage is strictly below the configured ceiling for
    /// `name`. Unknown limit names fail closed.
    pub fn is_under_limit(&self, name: &LimitName) -> bool {
        let Some(snapshot) = self.snapshot() else {
            return false;
        };
        match snapshot.limits.get(name) {
            Some(usage) => usage.is_under(),
            None => {
                tracing::warn!(limit = %name, "unknown limit name, denying");
                false
            }
        }
    }

    /// True iff the feature flag resolved to `true`. Unknown feature names
    /// fail closed.
    pub fn has_feature(&self, name: &FeatureName) -> bool {
        let Some(snapshot) = self.snapshot() else {
            return false;
        };
        match snapshot.features.get(name) {
            Some(enabled) => *enabled,
            None => {
                tracing::warn!(feature = %name, "unknown feature name, denying");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use proptest::prelude::*;

    use orgpilot_core::{PrincipalId, TenantId};

    use super::*;
    use crate::{ContextSnapshot, LimitUsage};

    fn resolved(permissions: impl IntoIterator<Item = &'static str>) -> AuthorizationContext {
        AuthorizationContext::resolved(
            ContextSnapshot::new(TenantId::new(), PrincipalId::new())
                .with_permissions(permissions.into_iter().map(Permission::new)),
        )
    }

    #[test]
    fn membership_grants_and_absence_denies() {
        let ctx = resolved(["posts.create", "clients.invite"]);
        assert!(ctx.has_permission(&Permission::new("posts.create")));
        assert!(!ctx.has_permission(&Permission::new("posts.delete")));
    }

    #[test]
    fn star_is_just_another_member() {
        // A stray "*" in externally supplied data must not widen the grant.
        let ctx = resolved(["*"]);
        assert!(!ctx.has_permission(&Permission::new("posts.create")));
        assert!(!ctx.has_any_permission(&[Permission::new("posts.delete")]));
        assert!(ctx.has_permission(&Permission::new("*")));
    }

    #[test]
    fn empty_set_combinators() {
        let ctx = resolved(["posts.read"]);
        assert!(ctx.has_all_permissions(&[]));
        assert!(!ctx.has_any_permission(&[]));
    }

    #[test]
    fn loading_fails_closed_for_every_query() {
        let ctx = AuthorizationContext::Loading;
        assert!(!ctx.has_permission(&Permission::new("posts.read")));
        assert!(!ctx.has_any_permission(&[Permission::new("posts.read")]));
        assert!(!ctx.has_all_permissions(&[]));
        assert!(!ctx.is_under_limit(&LimitName::new("seats")));
        assert!(!ctx.has_feature(&FeatureName::new("reports")));
    }

    #[test]
    fn seats_limit_is_strict() {
        let base = ContextSnapshot::new(TenantId::new(), PrincipalId::new());
        let under = AuthorizationContext::resolved(
            base.clone().with_limit("seats", LimitUsage::new(3, 5)),
        );
        let full = AuthorizationContext::resolved(base.with_limit("seats", LimitUsage::new(5, 5)));

        assert!(under.is_under_limit(&LimitName::new("seats")));
        assert!(!full.is_under_limit(&LimitName::new("seats")));
    }

    #[test]
    fn unknown_names_fail_closed() {
        let ctx = resolved(["posts.read"]);
        assert!(!ctx.is_under_limit(&LimitName::new("no-such-limit")));
        assert!(!ctx.has_feature(&FeatureName::new("no-such-feature")));
    }

    #[test]
    fn disabled_feature_denies_enabled_grants() {
        let ctx = AuthorizationContext::resolved(
            ContextSnapshot::new(TenantId::new(), PrincipalId::new())
                .with_feature("reports", true)
                .with_feature("exports", false),
        );
        assert!(ctx.has_feature(&FeatureName::new("reports")));
        assert!(!ctx.has_feature(&FeatureName::new("exports")));
    }

    fn permission_name() -> impl Strategy<Value = String> {
        "[a-z]{1,8}\\.[a-z]{1,8}"
    }

    proptest! {
        /// For any resolved context, a grant is exactly set membership.
        #[test]
        fn grant_is_set_membership(
            granted in prop::collection::hash_set(permission_name(), 0..12),
            probe in permission_name(),
        ) {
            let ctx = AuthorizationContext::resolved(
                ContextSnapshot::new(TenantId::new(), PrincipalId::new())
                    .with_permissions(granted.iter().cloned().map(Permission::new)),
            );
            let expected = granted.contains(&probe);
            prop_assert_eq!(ctx.has_permission(&Permission::new(probe)), expected);
        }

        /// A loading context denies everything, whatever the query.
        #[test]
        fn loading_denies_arbitrary_queries(
            probes in prop::collection::vec(permission_name(), 0..8),
        ) {
            let ctx = AuthorizationContext::Loading;
            let probes: Vec<Permission> =
                probes.into_iter().map(Permission::new).collect();
            prop_assert!(!ctx.has_any_permission(&probes));
            if !probes.is_empty() {
                prop_assert!(!ctx.has_all_permissions(&probes));
            }
        }

        /// ANY is the disjunction of singleton checks, ALL the conjunction.
        #[test]
        fn combinators_agree_with_singletons(
            granted in prop::collection::hash_set(permission_name(), 0..8),
            probes in prop::collection::vec(permission_name(), 1..6),
        ) {
            let ctx = AuthorizationContext::resolved(
                ContextSnapshot::new(TenantId::new(), PrincipalId::new())
                    .with_permissions(granted.iter().cloned().map(Permission::new)),
            );
            let probes: Vec<Permission> =
                probes.into_iter().map(Permission::new).collect();

            let any = probes.iter().any(|p| ctx.has_permission(p));
            let all = probes.iter().all(|p| ctx.has_permission(p));
            prop_assert_eq!(ctx.has_any_permission(&probes), any);
            prop_assert_eq!(ctx.has_all_permissions(&probes), all);
        }
    }

    #[test]
    fn snapshot_permissions_deduplicate() {
        let snapshot = ContextSnapshot::new(TenantId::new(), PrincipalId::new())
            .with_permissions([Permission::new("posts.read"), Permission::new("posts.read")]);
        let expected: HashSet<Permission> = [Permission::new("posts.read")].into();
        assert_eq!(snapshot.permissions, expected);
    }
}
