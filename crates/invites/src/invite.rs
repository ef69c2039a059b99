//! Invitation command: validate, authorize, record.
//!
//! # Invariants
//! - An invitation is tenant-scoped; it carries the tenant it was issued in.
//! - Client invitations require the `clients.invite` permission.
//! - Staff invitations require the `staff.invite` permission **and** headroom
//!   on the `"seats"` limit (staff occupy a seat, clients do not).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use orgpilot_authz::{AuthorizationContext, AuthzError, CapabilityQuery, Permission, require};
use orgpilot_core::{PrincipalId, TenantId};

/// What kind of member is being invited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InviteeKind {
    Client,
    Staff,
}

impl InviteeKind {
    fn required_permission(&self) -> Permission {
        match self {
            Self::Client => Permission::new("clients.invite"),
            Self::Staff => Permission::new("staff.invite"),
        }
    }
}

/// Incoming invitation request (pre-validation).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InviteRequest {
    pub invited_by: PrincipalId,
    pub email: String,
    pub display_name: String,
    pub kind: InviteeKind,
}

/// A recorded invitation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invitation {
    pub tenant_id: TenantId,
    pub invited_by: PrincipalId,
    pub email: String,
    pub display_name: String,
    pub kind: InviteeKind,
    pub sent_at: DateTime<Utc>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InviteError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("seat limit reached")]
    SeatLimitReached,
}

impl From<AuthzError> for InviteError {
    fn from(err: AuthzError) -> Self {
        match err {
            AuthzError::Forbidden(msg) => Self::Forbidden(msg),
            AuthzError::LimitExceeded(_) => Self::SeatLimitReached,
        }
    }
}

/// Issue an invitation on behalf of the current actor.
///
/// Fails closed: a loading context denies just like a missing permission.
pub fn invite(
    req: &InviteRequest,
    ctx: &AuthorizationContext,
) -> Result<Invitation, InviteError> {
    validate(req)?;

    let Some(snapshot) = ctx.snapshot() else {
        return Err(InviteError::Forbidden(
            "authorization context not resolved".to_string(),
        ));
    };

    require(
        &CapabilityQuery::Permission(req.kind.required_permission()),
        ctx,
    )
    .inspect_err(|err| {
        tracing::warn!(kind = ?req.kind, %err, "invitation denied");
    })?;

    if req.kind == InviteeKind::Staff {
        require(&CapabilityQuery::UnderLimit("seats".into()), ctx).inspect_err(|err| {
            tracing::warn!(%err, "staff invitation denied");
        })?;
    }

    let invitation = Invitation {
        tenant_id: snapshot.tenant_id,
        invited_by: req.invited_by,
        email: req.email.trim().to_lowercase(),
        display_name: req.display_name.trim().to_string(),
        kind: req.kind,
        sent_at: Utc::now(),
    };

    tracing::info!(
        tenant_id = %invitation.tenant_id,
        kind = ?invitation.kind,
        "invitation sent"
    );

    Ok(invitation)
}

fn validate(req: &InviteRequest) -> Result<(), InviteError> {
    let email = req.email.trim();
    let well_formed = match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && !domain.is_empty(),
        None => false,
    };
    if !well_formed {
        return Err(InviteError::Validation("invalid email format".to_string()));
    }

    if req.display_name.trim().is_empty() {
        return Err(InviteError::Validation(
            "display name cannot be empty".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use orgpilot_authz::{ContextSnapshot, LimitUsage};

    use super::*;

    fn request(kind: InviteeKind) -> InviteRequest {
        InviteRequest {
            invited_by: PrincipalId::new(),
            email: "Alice@Example.com ".to_string(),
            display_name: " Alice Smith ".to_string(),
            kind,
        }
    }

    fn manager_context(seats: LimitUsage) -> AuthorizationContext {
        AuthorizationContext::resolved(
            ContextSnapshot::new(TenantId::new(), PrincipalId::new())
                .with_permissions([
                    Permission::new("clients.invite"),
                    Permission::new("staff.invite"),
                ])
                .with_limit("seats", seats),
        )
    }

    #[test]
    fn invites_client_and_normalizes_fields() {
        let ctx = manager_context(LimitUsage::new(5, 5));
        let invitation = invite(&request(InviteeKind::Client), &ctx).unwrap();

        assert_eq!(invitation.email, "alice@example.com");
        assert_eq!(invitation.display_name, "Alice Smith");
        assert_eq!(invitation.kind, InviteeKind::Client);
    }

    #[test]
    fn staff_invite_consumes_seat_headroom() {
        let with_room = manager_context(LimitUsage::new(3, 5));
        assert!(invite(&request(InviteeKind::Staff), &with_room).is_ok());

        let full = manager_context(LimitUsage::new(5, 5));
        assert_eq!(
            invite(&request(InviteeKind::Staff), &full),
            Err(InviteError::SeatLimitReached)
        );
    }

    #[test]
    fn client_invite_ignores_seat_limit() {
        let full = manager_context(LimitUsage::new(5, 5));
        assert!(invite(&request(InviteeKind::Client), &full).is_ok());
    }

    #[test]
    fn missing_permission_is_forbidden() {
        let ctx = AuthorizationContext::resolved(ContextSnapshot::new(
            TenantId::new(),
            PrincipalId::new(),
        ));
        assert!(matches!(
            invite(&request(InviteeKind::Client), &ctx),
            Err(InviteError::Forbidden(_))
        ));
    }

    #[test]
    fn loading_context_denies() {
        let ctx = AuthorizationContext::Loading;
        assert!(matches!(
            invite(&request(InviteeKind::Client), &ctx),
            Err(InviteError::Forbidden(_))
        ));
    }

    #[test]
    fn rejects_malformed_requests() {
        let ctx = manager_context(LimitUsage::new(0, 5));

        let mut bad_email = request(InviteeKind::Client);
        bad_email.email = "no-at-sign".to_string();
        assert!(matches!(
            invite(&bad_email, &ctx),
            Err(InviteError::Validation(_))
        ));

        let mut empty_local = request(InviteeKind::Client);
        empty_local.email = "@example.com".to_string();
        assert!(matches!(
            invite(&empty_local, &ctx),
            Err(InviteError::Validation(_))
        ));

        let mut blank_name = request(InviteeKind::Client);
        blank_name.display_name = "   ".to_string();
        assert!(matches!(
            invite(&blank_name, &ctx),
            Err(InviteError::Validation(_))
        ));
    }
}
