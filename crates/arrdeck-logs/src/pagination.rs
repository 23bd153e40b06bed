//! Pagination state and bounds math for the log view.

/// Page size the view starts with.
pub const DEFAULT_PAGE_SIZE: usize = 100;

// ---------------------------------------------------------------------------
// PageError
// ---------------------------------------------------------------------------

/// A navigation request that fails bounds validation.
///
/// Rejection happens before any fetch is issued; the render plan's
/// `has_prev`/`has_next` flags exist so UI affordances are disabled up
/// front rather than leaning on this as the primary guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageOutOfRange {
    pub requested: usize,
    pub total_pages: usize,
}

impl std::fmt::Display for PageOutOfRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "page {} out of range (1..={})",
            self.requested, self.total_pages
        )
    }
}

impl std::error::Error for PageOutOfRange {}

// ---------------------------------------------------------------------------
// PaginationState
// ---------------------------------------------------------------------------

/// Current page, page size, and server-reported totals.
///
/// Invariant: `1 <= current_page <= total_pages` after every successful
/// fetch. `total_records` is only trusted from navigation responses, never
/// from polls, so the page count cannot jump under the user mid-poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationState {
    current_page: usize,
    page_size: usize,
    total_records: usize,
}

impl Default for PaginationState {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl PaginationState {
    #[must_use]
    pub fn new(page_size: usize) -> Self {
        Self {
            current_page: 1,
            page_size: page_size.max(1),
            total_records: 0,
        }
    }

    #[must_use]
    pub fn current_page(&self) -> usize {
        self.current_page
    }

    #[must_use]
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    #[must_use]
    pub fn total_records(&self) -> usize {
        self.total_records
    }

    /// `max(1, ceil(total_records / page_size))`. An empty dataset still
    /// has one (empty) page.
    #[must_use]
    pub fn total_pages(&self) -> usize {
        self.total_records.div_ceil(self.page_size).max(1)
    }

    #[must_use]
    pub fn has_prev(&self) -> bool {
        self.current_page > 1
    }

    #[must_use]
    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages()
    }

    /// Fetch offset for a page: `(page - 1) * page_size`.
    #[must_use]
    pub fn offset_for(&self, page: usize) -> usize {
        page.saturating_sub(1) * self.page_size
    }

    /// Bounds check a navigation request without applying it.
    pub fn validate_page(&self, page: usize) -> Result<(), PageOutOfRange> {
        let total_pages = self.total_pages();
        if page < 1 || page > total_pages {
            return Err(PageOutOfRange {
                requested: page,
                total_pages,
            });
        }
        Ok(())
    }

    /// Commit a page after its navigation fetch succeeded. Clamped into
    /// bounds defensively; validation belongs before the fetch.
    pub fn commit_page(&mut self, page: usize) {
        self.current_page = page.clamp(1, self.total_pages());
    }

    /// Change the page size and reset to page 1. The caller re-fetches.
    pub fn set_page_size(&mut self, size: usize) {
        self.page_size = size.max(1);
        self.current_page = 1;
    }

    /// Reset to page 1 with unknown totals, e.g. on app or level switch.
    pub fn reset(&mut self) {
        self.current_page = 1;
        self.total_records = 0;
    }

    /// Apply the authoritative total from a navigation response.
    ///
    /// If the dataset shrank so far that the current page no longer exists
    /// (a log clear between fetches), the page is clamped to the last valid
    /// one and returned so the caller can re-fetch exactly once.
    pub fn apply_server_totals(&mut self, total: usize) -> Option<usize> {
        self.total_records = total;
        let total_pages = self.total_pages();
        if self.current_page > total_pages {
            self.current_page = total_pages;
            return Some(total_pages);
        }
        None
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_pages_rounds_up() {
        let mut state = PaginationState::new(20);
        assert_eq!(state.total_pages(), 1);
        state.apply_server_totals(45);
        assert_eq!(state.total_pages(), 3);
        state.apply_server_totals(40);
        assert_eq!(state.total_pages(), 2);
        state.apply_server_totals(41);
        assert_eq!(state.total_pages(), 3);
    }

    #[test]
    fn empty_dataset_still_has_one_page() {
        let state = PaginationState::new(20);
        assert_eq!(state.total_pages(), 1);
        assert!(state.validate_page(1).is_ok());
    }

    #[test]
    fn validate_rejects_out_of_range_pages() {
        let mut state = PaginationState::new(20);
        state.apply_server_totals(45);
        assert!(state.validate_page(0).is_err());
        assert!(state.validate_page(4).is_err());
        assert!(state.validate_page(1).is_ok());
        assert!(state.validate_page(3).is_ok());
    }

    #[test]
    fn out_of_range_error_reports_bounds() {
        let mut state = PaginationState::new(20);
        state.apply_server_totals(45);
        let err = match state.validate_page(4) {
            Ok(()) => panic!("expected rejection"),
            Err(err) => err,
        };
        assert_eq!(err.requested, 4);
        assert_eq!(err.total_pages, 3);
        assert_eq!(err.to_string(), "page 4 out of range (1..=3)");
    }

    #[test]
    fn offset_math() {
        let state = PaginationState::new(20);
        assert_eq!(state.offset_for(1), 0);
        assert_eq!(state.offset_for(2), 20);
        assert_eq!(state.offset_for(5), 80);
    }

    #[test]
    fn set_page_size_resets_to_first_page() {
        let mut state = PaginationState::new(20);
        state.apply_server_totals(100);
        state.commit_page(4);
        state.set_page_size(50);
        assert_eq!(state.current_page(), 1);
        assert_eq!(state.page_size(), 50);
        assert_eq!(state.total_pages(), 2);
    }

    #[test]
    fn zero_page_size_is_clamped() {
        let state = PaginationState::new(0);
        assert_eq!(state.page_size(), 1);
    }

    #[test]
    fn apply_totals_clamps_when_dataset_shrinks() {
        let mut state = PaginationState::new(20);
        state.apply_server_totals(100);
        state.commit_page(5);
        // Logs were cleared down to 30 records: 2 pages remain.
        let refetch = state.apply_server_totals(30);
        assert_eq!(refetch, Some(2));
        assert_eq!(state.current_page(), 2);
    }

    #[test]
    fn apply_totals_in_range_requests_no_refetch() {
        let mut state = PaginationState::new(20);
        state.apply_server_totals(100);
        state.commit_page(2);
        assert_eq!(state.apply_server_totals(90), None);
        assert_eq!(state.current_page(), 2);
    }

    #[test]
    fn prev_next_affordances() {
        let mut state = PaginationState::new(20);
        state.apply_server_totals(45);
        assert!(!state.has_prev());
        assert!(state.has_next());
        state.commit_page(3);
        assert!(state.has_prev());
        assert!(!state.has_next());
    }

    #[test]
    fn commit_page_clamps_defensively() {
        let mut state = PaginationState::new(20);
        state.apply_server_totals(45);
        state.commit_page(99);
        assert_eq!(state.current_page(), 3);
        state.commit_page(0);
        assert_eq!(state.current_page(), 1);
    }

    #[test]
    fn reset_returns_to_unknown_totals() {
        let mut state = PaginationState::new(20);
        state.apply_server_totals(100);
        state.commit_page(3);
        state.reset();
        assert_eq!(state.current_page(), 1);
        assert_eq!(state.total_records(), 0);
        assert_eq!(state.total_pages(), 1);
    }
}
