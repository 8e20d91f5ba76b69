//! Generic lifecycle of one server-backed resource.
//!
//! ```text
//! Idle ──request──▶ Pending ──success──▶ Fulfilled
//!                      │
//!                      └──failure──▶ Rejected
//! ```
//!
//! A new request never clears `data`: consumers keep rendering the last
//! good value while a refresh is in flight. `reset` only lowers the flag;
//! `clear_error` only drops the error.

use super::SubmissionPolicy;

/// Derived view of where a resource is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Nothing requested yet, or a reset/abandoned resource with no data.
    Idle,
    /// A request is in flight.
    Pending,
    /// The last completed request succeeded.
    Fulfilled,
    /// The last completed request failed.
    Rejected,
}

/// Proof that a request was started against a particular generation of a
/// resource. Completions carrying a stale ticket are discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    generation: u64,
}

/// State of one resource slice.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceState<T> {
    data: Option<T>,
    loading: bool,
    error: Option<String>,
    flag: bool,
    generation: u64,
}

impl<T> Default for ResourceState<T> {
    fn default() -> Self {
        Self {
            data: None,
            loading: false,
            error: None,
            flag: false,
            generation: 0,
        }
    }
}

impl<T> ResourceState<T> {
    /// Last successfully fetched value.
    #[must_use]
    pub const fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    /// Error of the last failed request, until cleared.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Operation-specific success indicator (created, updated, deleted, uploaded).
    #[must_use]
    pub const fn flag(&self) -> bool {
        self.flag
    }

    #[must_use]
    pub const fn phase(&self) -> Phase {
        if self.loading {
            Phase::Pending
        } else if self.error.is_some() {
            Phase::Rejected
        } else if self.data.is_some() {
            Phase::Fulfilled
        } else {
            Phase::Idle
        }
    }

    /// Mark a request as started.
    ///
    /// Returns `None` when `policy` forbids a second request while one is
    /// pending; the state is left untouched in that case.
    pub fn request(&mut self, policy: SubmissionPolicy) -> Option<Ticket> {
        if self.loading && policy == SubmissionPolicy::RejectWhilePending {
            return None;
        }
        self.loading = true;
        self.error = None;
        Some(Ticket {
            generation: self.generation,
        })
    }

    /// Apply a successful completion. Returns `false` if the ticket is stale.
    pub fn succeed(&mut self, ticket: Ticket, data: T, flag: bool) -> bool {
        if !self.accepts(ticket) {
            return false;
        }
        self.data = Some(data);
        self.loading = false;
        self.error = None;
        self.flag = flag;
        true
    }

    /// Apply a failed completion. Returns `false` if the ticket is stale.
    pub fn fail(&mut self, ticket: Ticket, message: String) -> bool {
        if !self.accepts(ticket) {
            return false;
        }
        self.loading = false;
        self.error = Some(message);
        true
    }

    /// Lower the success flag. Returns whether anything changed.
    pub fn reset(&mut self) -> bool {
        std::mem::replace(&mut self.flag, false)
    }

    /// Drop the stored error. Returns whether anything changed.
    pub fn clear_error(&mut self) -> bool {
        self.error.take().is_some()
    }

    /// Drop the stored data. Returns whether anything changed.
    pub fn clear_data(&mut self) -> bool {
        self.data.take().is_some()
    }

    /// Stop waiting for in-flight requests.
    ///
    /// Completions of requests issued before this call are discarded.
    /// Returns whether a request was pending.
    pub fn abandon(&mut self) -> bool {
        self.generation = self.generation.wrapping_add(1);
        std::mem::replace(&mut self.loading, false)
    }

    /// Abandon the slice on behalf of a request that will never complete.
    ///
    /// Does nothing if `ticket` is already stale or nothing is pending.
    /// Returns whether the slice changed.
    pub fn release(&mut self, ticket: Ticket) -> bool {
        if !self.loading || !self.accepts(ticket) {
            return false;
        }
        self.abandon()
    }

    const fn accepts(&self, ticket: Ticket) -> bool {
        ticket.generation == self.generation
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const LWW: SubmissionPolicy = SubmissionPolicy::LastWriteWins;

    #[test]
    fn test_lifecycle_success() {
        let mut state = ResourceState::<Vec<u32>>::default();
        assert_eq!(state.phase(), Phase::Idle);

        let ticket = state.request(LWW).unwrap();
        assert_eq!(state.phase(), Phase::Pending);

        assert!(state.succeed(ticket, vec![1, 2], false));
        assert_eq!(state.phase(), Phase::Fulfilled);
        assert_eq!(state.data(), Some(&vec![1, 2]));
        assert!(!state.is_loading());
        assert!(state.error().is_none());
    }

    #[test]
    fn test_failure_keeps_previous_data() {
        let mut state = ResourceState::<u32>::default();
        let ticket = state.request(LWW).unwrap();
        state.succeed(ticket, 7, false);

        let ticket = state.request(LWW).unwrap();
        assert_eq!(state.data(), Some(&7), "request keeps stale data");

        state.fail(ticket, "boom".to_string());
        assert_eq!(state.phase(), Phase::Rejected);
        assert_eq!(state.error(), Some("boom"));
        assert_eq!(state.data(), Some(&7));
    }

    #[test]
    fn test_request_clears_previous_error_but_not_flag() {
        let mut state = ResourceState::<u32>::default();
        let ticket = state.request(LWW).unwrap();
        state.succeed(ticket, 1, true);
        let ticket = state.request(LWW).unwrap();
        state.fail(ticket, "nope".to_string());

        state.request(LWW).unwrap();
        assert!(state.error().is_none());
        assert!(state.flag());
    }

    #[test]
    fn test_reset_only_lowers_flag() {
        let mut state = ResourceState::<bool>::default();
        let ticket = state.request(LWW).unwrap();
        state.succeed(ticket, true, true);
        assert!(state.flag());

        assert!(state.reset());
        assert!(!state.flag());
        assert_eq!(state.data(), Some(&true));
        assert!(!state.reset(), "second reset changes nothing");
    }

    #[test]
    fn test_reset_leaves_error_in_place() {
        let mut state = ResourceState::<bool>::default();
        let ticket = state.request(LWW).unwrap();
        state.fail(ticket, "denied".to_string());
        state.reset();
        assert_eq!(state.error(), Some("denied"));
        assert!(state.clear_error());
        assert!(state.error().is_none());
    }

    #[test]
    fn test_reject_while_pending() {
        let mut state = ResourceState::<u32>::default();
        let first = state.request(SubmissionPolicy::RejectWhilePending);
        assert!(first.is_some());
        assert!(state.request(SubmissionPolicy::RejectWhilePending).is_none());

        state.succeed(first.unwrap(), 1, false);
        assert!(state.request(SubmissionPolicy::RejectWhilePending).is_some());
    }

    #[test]
    fn test_last_write_wins_applies_later_completion() {
        let mut state = ResourceState::<&str>::default();
        let first = state.request(LWW).unwrap();
        let second = state.request(LWW).unwrap();

        // Second request resolves first, the first one resolves last
        state.succeed(second, "second", false);
        state.succeed(first, "first", false);
        assert_eq!(state.data(), Some(&"first"));
    }

    #[test]
    fn test_abandon_discards_stale_completion() {
        let mut state = ResourceState::<u32>::default();
        let ticket = state.request(LWW).unwrap();
        assert!(state.abandon());
        assert_eq!(state.phase(), Phase::Idle);

        assert!(!state.succeed(ticket, 9, true));
        assert!(!state.fail(ticket, "late".to_string()));
        assert!(state.data().is_none());
        assert!(state.error().is_none());

        let fresh = state.request(LWW).unwrap();
        assert!(state.succeed(fresh, 3, false));
        assert_eq!(state.data(), Some(&3));
    }

    #[test]
    fn test_release_ignores_stale_ticket() {
        let mut state = ResourceState::<u32>::default();
        let stale = state.request(LWW).unwrap();
        state.abandon();
        let fresh = state.request(LWW).unwrap();

        assert!(!state.release(stale));
        assert!(state.is_loading());

        assert!(state.release(fresh));
        assert_eq!(state.phase(), Phase::Idle);
        assert!(!state.succeed(fresh, 1, false));
        assert!(!state.release(fresh), "nothing left to release");
    }

    #[test]
    fn test_clear_data() {
        let mut state = ResourceState::<u32>::default();
        let ticket = state.request(LWW).unwrap();
        state.succeed(ticket, 5, false);
        assert!(state.clear_data());
        assert_eq!(state.phase(), Phase::Idle);
        assert!(!state.clear_data());
    }
}
