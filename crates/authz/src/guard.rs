//! Guard: conditional gating keyed off one capability query.
//!
//! State machine: `Loading -> {Granted, Denied}`, terminal per context
//! snapshot. A settled guard re-enters `Loading` only when the underlying
//! context is explicitly invalidated (organization switch, logout) — either
//! observed as a published `Loading` value or forced via [`Guard::reset`].

use crate::{AuthorizationContext, CapabilityQuery, ContextHandle, evaluate};

/// Where a guard currently stands.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum GuardState {
    /// Context resolution still in flight; no verdict available.
    Loading,
    /// Settled: the capability is granted.
    Granted,
    /// Settled: the capability is denied.
    Denied,
}

impl GuardState {
    pub fn is_settled(&self) -> bool {
        !matches!(self, Self::Loading)
    }
}

/// A guard over a single capability query.
#[derive(Debug, Clone)]
pub struct Guard {
    query: CapabilityQuery,
    state: GuardState,
}

impl Guard {
    pub fn new(query: CapabilityQuery) -> Self {
        Self {
            query,
            state: GuardState::Loading,
        }
    }

    pub fn query(&self) -> &CapabilityQuery {
        &self.query
    }

    pub fn state(&self) -> GuardState {
        self.state
    }

    /// Feed the latest published context into the guard.
    ///
    /// A resolved context settles the guard against that snapshot, and
    /// repeated resolved observations re-settle without ever yielding
    /// `Loading` (no flicker). A loading context is only ever published on
    /// explicit invalidation, so observing one returns the guard to
    /// `Loading` — settled or not.
    pub fn observe(&mut self, ctx: &AuthorizationContext) -> GuardState {
        self.state = if ctx.is_loading() {
            GuardState::Loading
        } else if evaluate(&self.query, ctx).is_granted() {
            GuardState::Granted
        } else {
            GuardState::Denied
        };
        self.state
    }

    /// Explicit invalidation: back to `Loading` until the next resolved
    /// context is observed.
    pub fn reset(&mut self) {
        self.state = GuardState::Loading;
    }

    /// Wait on the context channel until resolution completes, then settle.
    ///
    /// Settles at most once per call: the first resolved snapshot decides the
    /// verdict. If the publisher goes away before resolution, the guard stays
    /// `Loading` and no error is raised.
    pub async fn settle(&mut self, handle: &mut ContextHandle) -> GuardState {
        if self.state.is_settled() {
            return self.state;
        }
        match handle.resolved().await {
            Some(snapshot) => self.observe(&AuthorizationContext::Resolved(snapshot)),
            None => self.state,
        }
    }
}

/// Rendering policy for guarded content.
///
/// Holds the content to show when granted, an optional fallback for denial
/// (default: nothing), and an optional loading value (default: nothing).
#[derive(Debug, Clone)]
pub struct Gate<T> {
    content: T,
    fallback: Option<T>,
    loading: Option<T>,
}

impl<T> Gate<T> {
    pub fn new(content: T) -> Self {
        Self {
            content,
            fallback: None,
            loading: None,
        }
    }

    /// Content to show when the verdict is `Denied`.
    pub fn with_fallback(mut self, fallback: T) -> Self {
        self.fallback = Some(fallback);
        self
    }

    /// Content to show while the guard is still `Loading`.
    pub fn with_loading(mut self, loading: T) -> Self {
        self.loading = Some(loading);
        self
    }

    /// Select what to render for the given guard state.
    pub fn render(&self, state: GuardState) -> Option<&T> {
        match state {
            GuardState::Granted => Some(&self.content),
            GuardState::Denied => self.fallback.as_ref(),
            GuardState::Loading => self.loading.as_ref(),
        }
    }
}
