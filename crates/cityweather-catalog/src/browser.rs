//! List state behind the city browser screen.
//!
//! [`CityBrowserState`] owns the loaded cities and everything derived from
//! them. It performs no I/O: callers ask it for the next [`PageRequest`], run
//! the fetch however they like and hand the result back to
//! [`CityBrowserState::complete_page`].

use crate::error::CatalogError;
use crate::pagination::{PageRequest, PaginationState};
use crate::query::{derive_view, suggest, ColumnSort};
use crate::types::{CityRecord, FilterOption, SortDirection, SortField};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchState {
    pub query: String,
    pub suggestions: Vec<CityRecord>,
}

/// What happened to a finished page fetch.
#[derive(Debug)]
pub enum PageOutcome {
    /// Records were appended
    Applied { appended: usize },
    /// The fetch failed; nothing changed except the request being cleared
    Failed(CatalogError),
    /// The request was superseded or abandoned; the result was dropped
    Stale,
}

#[derive(Debug, Clone, Default)]
pub struct CityBrowserState {
    cities: Vec<CityRecord>,
    view: Vec<CityRecord>,
    search: SearchState,
    pagination: PaginationState,
    filter: Option<FilterOption>,
    sort_option: Option<SortDirection>,
    column_sorts: Vec<ColumnSort>,
}

impl CityBrowserState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every loaded city, in arrival order
    pub fn cities(&self) -> &[CityRecord] {
        &self.cities
    }

    /// The displayed ordering
    pub fn view(&self) -> &[CityRecord] {
        &self.view
    }

    pub fn search(&self) -> &SearchState {
        &self.search
    }

    pub fn pagination(&self) -> &PaginationState {
        &self.pagination
    }

    pub fn filter(&self) -> Option<FilterOption> {
        self.filter
    }

    pub fn sort_option(&self) -> Option<SortDirection> {
        self.sort_option
    }

    pub fn is_loading(&self) -> bool {
        self.pagination.pending().is_some()
    }

    /// Request for the first page, issued once when the screen mounts.
    pub fn mount(&mut self) -> Option<PageRequest> {
        self.pagination.start()
    }

    /// Request for the next page, if more pages exist and none is in flight.
    pub fn request_next_page(&mut self) -> Option<PageRequest> {
        self.pagination.advance()
    }

    /// Scroll position changed; `last_visible` is the 0-based index of the
    /// lowest visible row. Near the end of the list the next page is requested.
    pub fn on_scroll(&mut self, last_visible: usize, threshold: usize) -> Option<PageRequest> {
        if !self.pagination.is_started() {
            return None;
        }
        if last_visible.saturating_add(1).saturating_add(threshold) < self.view.len() {
            return None;
        }
        self.request_next_page()
    }

    /// Apply a finished fetch.
    pub fn complete_page(
        &mut self,
        request: PageRequest,
        result: Result<Vec<CityRecord>, CatalogError>,
    ) -> PageOutcome {
        let returned = result.as_ref().ok().map(Vec::len);
        if !self.pagination.complete(request, returned) {
            tracing::debug!(
                "Dropping stale page {} (generation {})",
                request.page,
                request.generation
            );
            return PageOutcome::Stale;
        }

        match result {
            Ok(records) => {
                let appended = records.len();
                self.cities.extend(records);
                self.refresh_view();
                self.refresh_suggestions();
                PageOutcome::Applied { appended }
            }
            Err(e) => PageOutcome::Failed(e),
        }
    }

    /// Drop the in-flight request; its result will be treated as stale.
    pub fn abandon_pending(&mut self) -> Option<PageRequest> {
        self.pagination.abandon()
    }

    /// Clear everything and request page 1 again under a new generation.
    pub fn reload(&mut self) -> Option<PageRequest> {
        self.pagination.reset();
        self.cities.clear();
        self.view.clear();
        self.search.suggestions.clear();
        self.mount()
    }

    pub fn set_query(&mut self, query: &str) {
        self.search.query = query.to_string();
        self.refresh_suggestions();
    }

    /// Accept suggestion `index`: the query becomes that city's name.
    pub fn pick_suggestion(&mut self, index: usize) -> Option<CityRecord> {
        let picked = self.search.suggestions.get(index).cloned()?;
        self.set_query(&picked.name);
        Some(picked)
    }

    /// Choose a whole-list ordering. Earlier header sorts are discarded.
    pub fn set_filter(&mut self, filter: Option<FilterOption>) {
        self.filter = filter;
        self.column_sorts.clear();
        self.refresh_view();
    }

    /// Set the direction used by the next header sort. Does not reorder.
    pub fn set_sort_option(&mut self, option: Option<SortDirection>) {
        self.sort_option = option;
    }

    /// Header activation: re-sort the current view by `field`.
    ///
    /// Without a chosen direction the sort is descending.
    pub fn handle_sort(&mut self, field: SortField) {
        let direction = self.sort_option.unwrap_or(SortDirection::Descending);
        // A later sort on the same column fully determines its order.
        self.column_sorts.retain(|s| s.field != field);
        self.column_sorts.push(ColumnSort { field, direction });
        self.refresh_view();
    }

    fn refresh_view(&mut self) {
        self.view = derive_view(&self.cities, self.filter, &self.column_sorts);
    }

    fn refresh_suggestions(&mut self) {
        self.search.suggestions = suggest(&self.search.query, &self.cities);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pagination::PAGE_SIZE;

    fn page(start: usize, count: usize) -> Vec<CityRecord> {
        (start..start + count)
            .map(|i| CityRecord {
                id: i.to_string(),
                name: format!("City {i:03}"),
                country_name: if i % 2 == 0 { "Even".into() } else { "Odd".into() },
                timezone: "UTC".into(),
            })
            .collect()
    }

    fn named(names: &[&str]) -> Vec<CityRecord> {
        names
            .iter()
            .enumerate()
            .map(|(i, n)| CityRecord {
                id: i.to_string(),
                name: n.to_string(),
                country_name: "France".into(),
                timezone: "Europe/Paris".into(),
            })
            .collect()
    }

    fn view_names(state: &CityBrowserState) -> Vec<String> {
        state.view().iter().map(|c| c.name.clone()).collect()
    }

    #[test]
    fn test_n_full_pages_load_twenty_each() {
        let mut state = CityBrowserState::new();
        let mut request = state.mount();
        for n in 0..3 {
            let req = request.unwrap();
            state.complete_page(req, Ok(page(n * PAGE_SIZE, PAGE_SIZE)));
            request = state.request_next_page();
        }
        assert_eq!(state.cities().len(), 3 * PAGE_SIZE);
        assert!(state.pagination().has_more());
        assert_eq!(request.unwrap().page, 4);
    }

    #[test]
    fn test_has_more_false_only_after_short_page() {
        let mut state = CityBrowserState::new();
        let first = state.mount().unwrap();
        state.complete_page(first, Ok(page(0, PAGE_SIZE)));
        assert!(state.pagination().has_more());

        let second = state.request_next_page().unwrap();
        state.complete_page(second, Ok(page(PAGE_SIZE, 4)));
        assert!(!state.pagination().has_more());
        assert!(state.request_next_page().is_none());
    }

    #[test]
    fn test_failed_page_changes_nothing() {
        let mut state = CityBrowserState::new();
        let first = state.mount().unwrap();
        state.complete_page(first, Ok(page(0, PAGE_SIZE)));
        let before = state.cities().to_vec();

        let second = state.request_next_page().unwrap();
        let outcome = state.complete_page(second, Err(CatalogError::Parse("eof".into())));

        assert!(matches!(outcome, PageOutcome::Failed(CatalogError::Parse(_))));
        assert_eq!(state.cities(), before.as_slice());
        assert!(state.pagination().has_more());
        assert_eq!(state.pagination().page_index(), 2);
        assert!(!state.is_loading());
    }

    #[test]
    fn test_stale_page_after_reload_is_dropped() {
        let mut state = CityBrowserState::new();
        let old = state.mount().unwrap();
        let fresh = state.reload().unwrap();

        let outcome = state.complete_page(old, Ok(page(0, PAGE_SIZE)));
        assert!(matches!(outcome, PageOutcome::Stale));
        assert!(state.cities().is_empty());

        state.complete_page(fresh, Ok(page(100, 3)));
        assert_eq!(state.cities().len(), 3);
    }

    #[test]
    fn test_abandoned_page_is_dropped() {
        let mut state = CityBrowserState::new();
        let first = state.mount().unwrap();
        state.abandon_pending();
        assert!(matches!(
            state.complete_page(first, Ok(page(0, PAGE_SIZE))),
            PageOutcome::Stale
        ));
    }

    #[test]
    fn test_scroll_near_end_requests_next_page() {
        let mut state = CityBrowserState::new();
        assert!(state.on_scroll(0, 3).is_none(), "nothing before mount");

        let first = state.mount().unwrap();
        state.complete_page(first, Ok(page(0, PAGE_SIZE)));

        assert!(state.on_scroll(10, 3).is_none());
        let next = state.on_scroll(16, 3).unwrap();
        assert_eq!(next.page, 2);
        // still pending: no duplicate request for the same page
        assert!(state.on_scroll(19, 3).is_none());
    }

    #[test]
    fn test_view_is_permutation_of_cities() {
        let mut state = CityBrowserState::new();
        let first = state.mount().unwrap();
        state.complete_page(first, Ok(page(0, PAGE_SIZE)));
        state.set_filter(Some("desc_country".parse().unwrap()));
        state.handle_sort(SortField::Name);

        let mut cities: Vec<String> = state.cities().iter().map(|c| c.id.clone()).collect();
        let mut view: Vec<String> = state.view().iter().map(|c| c.id.clone()).collect();
        cities.sort();
        view.sort();
        assert_eq!(cities, view);
    }

    #[test]
    fn test_new_page_keeps_current_ordering() {
        let mut state = CityBrowserState::new();
        state.set_filter(Some("desc_name".parse().unwrap()));
        let first = state.mount().unwrap();
        state.complete_page(first, Ok(named(&["Arles", "Paris"])));
        assert_eq!(view_names(&state), ["Paris", "Arles"]);
    }

    #[test]
    fn test_filter_resorts_entire_list_and_drops_header_sorts() {
        let mut state = CityBrowserState::new();
        let first = state.mount().unwrap();
        state.complete_page(first, Ok(named(&["Arles", "Paris", "Arras"])));

        state.set_sort_option(Some(SortDirection::Ascending));
        state.handle_sort(SortField::Name);
        assert_eq!(view_names(&state), ["Arles", "Arras", "Paris"]);

        state.set_filter(None);
        assert_eq!(view_names(&state), ["Arles", "Paris", "Arras"]);
    }

    #[test]
    fn test_header_sort_without_direction_is_descending() {
        let mut state = CityBrowserState::new();
        let first = state.mount().unwrap();
        state.complete_page(first, Ok(named(&["Arles", "Paris", "Arras"])));

        state.handle_sort(SortField::Name);
        assert_eq!(view_names(&state), ["Paris", "Arras", "Arles"]);
    }

    #[test]
    fn test_sort_toggle_alone_does_not_reorder() {
        let mut state = CityBrowserState::new();
        let first = state.mount().unwrap();
        state.complete_page(first, Ok(named(&["Paris", "Arles"])));

        state.set_sort_option(Some(SortDirection::Ascending));
        assert_eq!(view_names(&state), ["Paris", "Arles"]);
    }

    #[test]
    fn test_repeated_header_sort_is_idempotent() {
        let mut state = CityBrowserState::new();
        let first = state.mount().unwrap();
        state.complete_page(first, Ok(page(0, PAGE_SIZE)));
        state.set_sort_option(Some(SortDirection::Ascending));

        state.handle_sort(SortField::Country);
        let once = state.view().to_vec();
        state.handle_sort(SortField::Country);
        assert_eq!(state.view(), once.as_slice());
    }

    #[test]
    fn test_suggestions_follow_loaded_pages() {
        let mut state = CityBrowserState::new();
        state.set_query("pa");
        assert!(state.search().suggestions.is_empty());

        let first = state.mount().unwrap();
        state.complete_page(first, Ok(named(&["Arles", "Paris", "Pau"])));
        let found: Vec<&str> = state.search().suggestions.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(found, ["Paris", "Pau"]);
    }

    #[test]
    fn test_picking_suggestion_sets_query() {
        let mut state = CityBrowserState::new();
        let first = state.mount().unwrap();
        state.complete_page(first, Ok(named(&["Paris", "Pau"])));
        state.set_query("p");

        let picked = state.pick_suggestion(1).unwrap();
        assert_eq!(picked.name, "Pau");
        assert_eq!(state.search().query, "Pau");
        assert_eq!(state.search().suggestions.len(), 1);
        assert!(state.pick_suggestion(5).is_none());
    }
}
