//! `orgpilot-invites` — inviting clients and staff into an organization.
//!
//! The one domain command this workspace gates behind the authorization core:
//! who may invite is decided by `orgpilot-authz`, and staff invitations also
//! consume seats against the plan's `"seats"` limit.

pub mod invite;

pub use invite::{InviteError, InviteRequest, Invitation, InviteeKind, invite};
