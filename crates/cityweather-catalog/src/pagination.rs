//! Page bookkeeping for incremental loading.
//!
//! At most one page request is outstanding. Each request is keyed by its page
//! index and the list generation it was issued for; a completion that does not
//! match the outstanding key is stale and must be dropped.

/// Records requested per page.
pub const PAGE_SIZE: usize = 20;

/// Identifies one page fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageRequest {
    pub page: u32,
    pub generation: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationState {
    /// Most recently requested page (1 before the first request)
    page_index: u32,
    has_more: bool,
    started: bool,
    generation: u64,
    pending: Option<PageRequest>,
}

impl Default for PaginationState {
    fn default() -> Self {
        Self {
            page_index: 1,
            has_more: true,
            started: false,
            generation: 0,
            pending: None,
        }
    }
}

impl PaginationState {
    pub fn page_index(&self) -> u32 {
        self.page_index
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn pending(&self) -> Option<PageRequest> {
        self.pending
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Request page 1. Only the first call does anything.
    pub fn start(&mut self) -> Option<PageRequest> {
        if self.started {
            return None;
        }
        self.started = true;
        Some(self.issue())
    }

    /// Advance to the next page, unless the list is exhausted or a fetch is
    /// still outstanding.
    pub fn advance(&mut self) -> Option<PageRequest> {
        if !self.started {
            return self.start();
        }
        if !self.has_more || self.pending.is_some() {
            return None;
        }
        self.page_index += 1;
        Some(self.issue())
    }

    fn issue(&mut self) -> PageRequest {
        let request = PageRequest {
            page: self.page_index,
            generation: self.generation,
        };
        self.pending = Some(request);
        request
    }

    /// Settle `request`. Returns false when it is not the outstanding request.
    ///
    /// `returned` is the record count of a successful fetch, `None` on failure.
    /// A failure leaves `page_index` and `has_more` as they were.
    pub fn complete(&mut self, request: PageRequest, returned: Option<usize>) -> bool {
        if self.pending != Some(request) {
            return false;
        }
        self.pending = None;
        if let Some(count) = returned {
            self.has_more = count == PAGE_SIZE;
        }
        true
    }

    /// Forget the outstanding request, e.g. because its screen went away.
    pub fn abandon(&mut self) -> Option<PageRequest> {
        self.pending.take()
    }

    /// Start over from page 1 under a new generation.
    pub fn reset(&mut self) {
        let generation = self.generation + 1;
        *self = Self {
            generation,
            ..Self::default()
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_request_is_page_one() {
        let mut state = PaginationState::default();
        let request = state.start().unwrap();
        assert_eq!(request.page, 1);
        assert_eq!(state.page_index(), 1);
        assert!(state.start().is_none());
    }

    #[test]
    fn test_no_second_request_while_pending() {
        let mut state = PaginationState::default();
        state.start().unwrap();
        assert!(state.advance().is_none());
        assert_eq!(state.page_index(), 1);
    }

    #[test]
    fn test_full_page_keeps_has_more() {
        let mut state = PaginationState::default();
        let first = state.start().unwrap();
        assert!(state.complete(first, Some(PAGE_SIZE)));
        assert!(state.has_more());

        let second = state.advance().unwrap();
        assert_eq!(second.page, 2);
    }

    #[test]
    fn test_short_page_ends_pagination() {
        let mut state = PaginationState::default();
        let first = state.start().unwrap();
        state.complete(first, Some(7));
        assert!(!state.has_more());
        assert!(state.advance().is_none());
    }

    #[test]
    fn test_failure_leaves_index_and_has_more() {
        let mut state = PaginationState::default();
        let first = state.start().unwrap();
        state.complete(first, Some(PAGE_SIZE));
        let second = state.advance().unwrap();

        assert!(state.complete(second, None));
        assert_eq!(state.page_index(), 2);
        assert!(state.has_more());
        assert!(state.pending().is_none());
    }

    #[test]
    fn test_stale_generation_is_rejected() {
        let mut state = PaginationState::default();
        let old = state.start().unwrap();
        state.reset();
        let fresh = state.start().unwrap();

        assert_eq!(fresh.page, 1);
        assert_ne!(old.generation, fresh.generation);
        assert!(!state.complete(old, Some(PAGE_SIZE)));
        assert_eq!(state.pending(), Some(fresh));
    }

    #[test]
    fn test_abandoned_request_cannot_complete() {
        let mut state = PaginationState::default();
        let first = state.start().unwrap();
        assert_eq!(state.abandon(), Some(first));
        assert!(!state.complete(first, Some(PAGE_SIZE)));
    }
}
