//! `orgpilot-authz` — pure authorization verdicts for the current actor/organization pair.
//!
//! This crate is intentionally decoupled from HTTP and storage: how a
//! [`ContextSnapshot`] gets fetched is the caller's concern. Everything here is
//! a deterministic function of the latest published [`AuthorizationContext`],
//! and every query fails closed while that context is still loading.

pub mod context;
pub mod evaluate;
pub mod feature;
pub mod guard;
pub mod limit;
pub mod permission;
pub mod query;

pub use context::{AuthorizationContext, ContextHandle, ContextPublisher, ContextSnapshot, context_channel};
pub use feature::FeatureName;
pub use guard::{Gate, Guard, GuardState};
pub use limit::{LimitName, LimitUsage};
pub use permission::Permission;
pub use query::{AuthzError, CapabilityQuery, Verdict, evaluate, require};
