//! City browser screen: paginated table with search, filter and column sorts.

use std::sync::mpsc;
use std::sync::Arc;

use cityweather_catalog::{
    CityBrowserState, CityRecord, FilterOption, PageOutcome, PageRequest, SortDirection,
    SortField,
};
use cityweather_core::SELECTED_CITY_KEY;
use tokio_util::sync::CancellationToken;

use crate::app_services::AppServices;
use crate::error_mapping::log_fetch_failure;
use crate::models::context_menu::ContextMenu;
use crate::navigation::{Navigation, OpenTarget};
use crate::route::Route;
use crate::services::{self, CatalogServiceMessage};

pub struct CityBrowserModel {
    services: Arc<AppServices>,
    state: CityBrowserState,
    menu: ContextMenu,
    tx: mpsc::Sender<CatalogServiceMessage>,
    rx: mpsc::Receiver<CatalogServiceMessage>,
    inflight: Option<(PageRequest, CancellationToken)>,
    /// 0-based index of the lowest visible row
    last_visible: usize,
}

impl CityBrowserModel {
    pub fn new(services: Arc<AppServices>) -> Self {
        let (tx, rx) = mpsc::channel();
        let last_visible = services.config().ui.visible_rows.saturating_sub(1);
        Self {
            services,
            state: CityBrowserState::new(),
            menu: ContextMenu::new(),
            tx,
            rx,
            inflight: None,
            last_visible,
        }
    }

    pub fn state(&self) -> &CityBrowserState {
        &self.state
    }

    pub fn menu(&self) -> &ContextMenu {
        &self.menu
    }

    pub fn last_visible(&self) -> usize {
        self.last_visible
    }

    /// A page fetch is outstanding.
    pub fn is_loading(&self) -> bool {
        self.state.is_loading()
    }

    /// Fetch page 1. Later calls do nothing.
    pub fn mount(&mut self) {
        if let Some(request) = self.state.mount() {
            self.dispatch(request);
        }
    }

    /// Move the viewport so that view row `row` is the lowest one visible.
    pub fn scroll_to(&mut self, row: usize) {
        self.last_visible = row;
        let threshold = self.services.config().ui.scroll_threshold;
        if let Some(request) = self.state.on_scroll(row, threshold) {
            self.dispatch(request);
        }
    }

    /// Explicitly ask for the next page.
    pub fn load_more(&mut self) -> bool {
        match self.state.request_next_page() {
            Some(request) => {
                self.dispatch(request);
                true
            }
            None => false,
        }
    }

    /// Drop every loaded city and start again from page 1.
    pub fn reload(&mut self) {
        self.cancel_inflight();
        self.menu.close();
        self.last_visible = self.services.config().ui.visible_rows.saturating_sub(1);
        if let Some(request) = self.state.reload() {
            self.dispatch(request);
        }
    }

    fn dispatch(&mut self, request: PageRequest) {
        let token = self.services.child_token();
        tracing::info!(page = request.page, generation = request.generation, "Fetching cities");
        services::request_page(
            &self.tx,
            &self.services.runtime(),
            self.services.catalog_client(),
            request,
            token.clone(),
        );
        self.inflight = Some((request, token));
    }

    fn cancel_inflight(&mut self) {
        if let Some((request, token)) = self.inflight.take() {
            tracing::debug!(page = request.page, "Cancelling page fetch");
            token.cancel();
        }
    }

    /// Apply finished fetches. Returns true when anything was received.
    pub fn poll_channel(&mut self) -> bool {
        let mut received = false;
        while let Ok(msg) = self.rx.try_recv() {
            received = true;
            match msg {
                CatalogServiceMessage::PageDone { request, result } => {
                    if self.inflight.as_ref().map(|(r, _)| *r) == Some(request) {
                        self.inflight = None;
                    }
                    match self.state.complete_page(request, result) {
                        PageOutcome::Applied { appended } => {
                            tracing::info!(
                                page = request.page,
                                appended,
                                total = self.state.cities().len(),
                                "Cities loaded"
                            );
                        }
                        PageOutcome::Failed(e) => {
                            log_fetch_failure(
                                &format!("Failed to load cities page {}", request.page),
                                e,
                            );
                        }
                        PageOutcome::Stale => {}
                    }
                }
            }
        }
        received
    }

    pub fn set_query(&mut self, query: &str) {
        self.state.set_query(query);
    }

    pub fn pick_suggestion(&mut self, index: usize) -> Option<CityRecord> {
        self.state.pick_suggestion(index)
    }

    pub fn set_filter(&mut self, filter: Option<FilterOption>) {
        self.state.set_filter(filter);
    }

    pub fn set_sort_option(&mut self, option: Option<SortDirection>) {
        self.state.set_sort_option(option);
    }

    pub fn handle_sort(&mut self, field: SortField) {
        self.state.handle_sort(field);
    }

    /// Primary activation of view row `index`: remember the city and replace
    /// this screen with its weather.
    pub fn select_city(&mut self, index: usize) -> Option<Navigation> {
        let name = self.state.view().get(index)?.name.clone();

        if let Err(e) = self.services.store().lock().set(SELECTED_CITY_KEY, &name) {
            tracing::warn!("Failed to persist selected city: {}", e);
        }

        tracing::info!(city = %name, "City selected");
        Some(Navigation::Open {
            route: Route::weather(&name),
            target: OpenTarget::Parent,
        })
    }

    /// Secondary activation of view row `index`.
    pub fn open_menu(&mut self, index: usize) -> bool {
        match self.state.view().get(index) {
            Some(city) => {
                self.menu.open(&city.name, index);
                true
            }
            None => false,
        }
    }

    /// Move the menu highlight. False when no menu is open or `index` is out of range.
    pub fn highlight_menu_item(&mut self, index: usize) -> bool {
        self.menu.highlight(index);
        self.menu.is_open() && self.menu.highlighted() == Some(index)
    }

    pub fn choose_menu_item(&mut self, index: usize) -> Option<Navigation> {
        self.menu.choose(index)
    }

    pub fn close_menu(&mut self) {
        self.menu.close();
    }

    /// Cancel outstanding work; late results are ignored.
    pub fn teardown(&mut self) {
        self.cancel_inflight();
        self.state.abandon_pending();
        self.menu.close();
    }
}

impl Drop for CityBrowserModel {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cityweather_core::{App, Config, KeyValueStore};

    fn services() -> Arc<AppServices> {
        let mut config = Config::default();
        // Nothing listens here; fetches fail fast and are swallowed.
        config.catalog.base_url = "http://127.0.0.1:9/api/records/1.0".into();
        let app = App::with_store(config, KeyValueStore::in_memory());
        AppServices::new(&app).unwrap()
    }

    #[test]
    fn test_mount_dispatches_once() {
        let mut model = CityBrowserModel::new(services());
        model.mount();
        assert!(model.is_loading());
        let first = model.inflight.as_ref().map(|(r, _)| *r);

        model.mount();
        assert_eq!(model.inflight.as_ref().map(|(r, _)| *r), first);
        assert_eq!(first.map(|r| r.page), Some(1));
    }

    #[test]
    fn test_select_out_of_range_is_ignored() {
        let services = services();
        let mut model = CityBrowserModel::new(services.clone());
        assert!(model.select_city(0).is_none());
        assert!(!model.open_menu(3));
        assert_eq!(services.store().lock().get(SELECTED_CITY_KEY), None);
    }

    #[test]
    fn test_teardown_cancels_inflight_fetch() {
        let mut model = CityBrowserModel::new(services());
        model.mount();
        let token = model.inflight.as_ref().map(|(_, t)| t.clone()).unwrap();

        model.teardown();
        assert!(token.is_cancelled());
        assert!(!model.is_loading());
    }

    #[test]
    fn test_reload_bumps_generation() {
        let mut model = CityBrowserModel::new(services());
        model.mount();
        let before = model.state().pagination().generation();

        model.reload();
        let (request, _) = model.inflight.as_ref().unwrap();
        assert_eq!(request.page, 1);
        assert_eq!(request.generation, before + 1);
    }
}
