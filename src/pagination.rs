//! Incremental loading of a scrolled list.
//!
//! A [`PaginationController`] belongs to one list-browsing session. The view
//! reports which row is visible; the controller decides when the next page is
//! needed and accumulates pages in the order they arrive. Only one page
//! request is outstanding at a time.
//!
//! A [`ListSession`] pairs a controller with the [`ListSource`] it reads from
//! and starts the list over whenever the title search changes.

use crate::model::{Cursor, Page, Recipe};
use crate::repository::{ListSource, RecipeRepository};
use crate::resource::Resource;
use log::debug;

/// Rows from the end of the loaded list at which the next page is requested
pub const PREFETCH_THRESHOLD: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaginationState {
    /// Waiting for the view to get close to the end
    Idle,
    /// A page request is outstanding
    Loading,
    /// The last page has been loaded
    Ended,
}

#[derive(Debug, Clone)]
pub struct PaginationController<T> {
    items: Vec<T>,
    cursor: Cursor,
    state: PaginationState,
    end_reached: bool,
    last_error: Option<String>,
    threshold: usize,
}

impl<T> PaginationController<T> {
    pub fn new() -> Self {
        Self::with_threshold(PREFETCH_THRESHOLD)
    }

    pub fn with_threshold(threshold: usize) -> Self {
        PaginationController {
            items: Vec::new(),
            cursor: Cursor::START,
            state: PaginationState::Idle,
            end_reached: false,
            last_error: None,
            threshold,
        }
    }

    /// Start the session over, e.g. for a refresh.
    pub fn reset(&mut self) {
        *self = Self::with_threshold(self.threshold);
    }

    /// Report the visible row.
    ///
    /// Returns the cursor to request when the row is within the threshold of
    /// `total_loaded` and no request is outstanding. Safe to call on every
    /// scroll event: while a request is outstanding this returns `None`.
    pub fn on_visible_index_changed(
        &mut self,
        index: usize,
        total_loaded: usize,
    ) -> Option<Cursor> {
        if self.state != PaginationState::Idle || self.end_reached {
            return None;
        }
        if index < total_loaded.saturating_sub(self.threshold) {
            return None;
        }

        debug!(
            "Requesting page at {:?} (row {} of {})",
            self.cursor, index, total_loaded
        );
        self.state = PaginationState::Loading;
        Some(self.cursor)
    }

    /// Append a loaded page and advance the cursor.
    pub fn on_page_loaded(&mut self, page: Page<T>) {
        if self.state == PaginationState::Ended {
            debug!("Ignoring page delivered after the end of the list");
            return;
        }

        self.items.extend(page.items);
        self.cursor = page.next_cursor;
        self.end_reached = page.is_last;
        self.last_error = None;
        self.state = if page.is_last {
            PaginationState::Ended
        } else {
            PaginationState::Idle
        };
    }

    /// Record a failed request. The cursor stays put so the next trigger
    /// retries the same page.
    pub fn on_page_failed(&mut self, message: impl Into<String>) {
        if self.state == PaginationState::Loading {
            self.state = PaginationState::Idle;
        }
        self.last_error = Resource::<()>::error(message).message().map(str::to_string);
    }

    /// Feed the outcome of a page request into the controller.
    pub fn apply(&mut self, resource: Resource<Page<T>>) {
        match resource {
            Resource::Loading => {}
            Resource::Success(page) => self.on_page_loaded(page),
            Resource::Error(message) => self.on_page_failed(message),
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn state(&self) -> PaginationState {
        self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state == PaginationState::Loading
    }

    pub fn end_reached(&self) -> bool {
        self.end_reached
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}

impl<T> Default for PaginationController<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl PaginationController<Recipe> {
    /// Report row `index` as visible and, if that triggers a request, load the
    /// page from `source`. Returns whether a request was made.
    pub async fn load_more(
        &mut self,
        repository: &RecipeRepository,
        source: &ListSource,
        index: usize,
    ) -> bool {
        let total_loaded = self.items.len();
        match self.on_visible_index_changed(index, total_loaded) {
            Some(cursor) => {
                let page = repository.get_page(source, cursor).await;
                self.apply(page);
                true
            }
            None => false,
        }
    }
}

/// A controller bound to one listing and its current search
#[derive(Debug, Clone)]
pub struct ListSession {
    source: ListSource,
    controller: PaginationController<Recipe>,
}

impl ListSession {
    pub fn new(source: ListSource) -> Self {
        Self::with_threshold(source, PREFETCH_THRESHOLD)
    }

    pub fn with_threshold(source: ListSource, threshold: usize) -> Self {
        ListSession {
            source,
            controller: PaginationController::with_threshold(threshold),
        }
    }

    /// Search the listing for `query`. A different query discards the
    /// loaded rows and restarts from the first page; returns whether it did.
    pub fn set_query(&mut self, query: &str) -> bool {
        let source = self.source.with_query(query);
        if source == self.source {
            return false;
        }

        debug!("Search changed to {:?}, restarting list", source.query());
        self.source = source;
        self.controller.reset();
        true
    }

    pub fn clear_query(&mut self) -> bool {
        self.set_query("")
    }

    /// Report row `index` as visible and load the next page if needed.
    pub async fn load_more(&mut self, repository: &RecipeRepository, index: usize) -> bool {
        self.controller
            .load_more(repository, &self.source, index)
            .await
    }

    pub fn source(&self) -> &ListSource {
        &self.source
    }

    pub fn controller(&self) -> &PaginationController<Recipe> {
        &self.controller
    }

    pub fn items(&self) -> &[Recipe] {
        self.controller.items()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(items: &[&'static str], next: u32, is_last: bool) -> Page<&'static str> {
        Page {
            items: items.to_vec(),
            next_cursor: Cursor(next),
            is_last,
        }
    }

    #[test]
    fn test_initial_state() {
        let controller: PaginationController<&str> = PaginationController::new();
        assert_eq!(controller.state(), PaginationState::Idle);
        assert_eq!(controller.cursor(), Cursor::START);
        assert!(!controller.end_reached());
        assert!(controller.items().is_empty());
    }

    #[test]
    fn test_empty_list_triggers_first_page() {
        let mut controller: PaginationController<&str> = PaginationController::new();
        assert_eq!(controller.on_visible_index_changed(0, 0), Some(Cursor::START));
        assert!(controller.is_loading());
    }

    #[test]
    fn test_threshold_boundary() {
        let mut controller: PaginationController<&str> = PaginationController::new();
        assert_eq!(controller.on_visible_index_changed(4, 10), None);
        assert_eq!(controller.state(), PaginationState::Idle);

        assert_eq!(controller.on_visible_index_changed(5, 10), Some(Cursor::START));
        assert_eq!(controller.on_visible_index_changed(5, 10), None);
        assert_eq!(controller.on_visible_index_changed(9, 10), None);
        assert_eq!(controller.state(), PaginationState::Loading);
    }

    #[test]
    fn test_pages_accumulate_in_order() {
        let mut controller = PaginationController::new();

        assert!(controller.on_visible_index_changed(0, 0).is_some());
        controller.on_page_loaded(page(&["A", "B"], 2, false));
        assert_eq!(controller.state(), PaginationState::Idle);

        assert_eq!(controller.on_visible_index_changed(1, 2), Some(Cursor(2)));
        controller.on_page_loaded(page(&["C"], 3, true));

        assert_eq!(controller.items(), &["A", "B", "C"]);
        assert!(controller.end_reached());
        assert_eq!(controller.state(), PaginationState::Ended);
        assert_eq!(controller.on_visible_index_changed(2, 3), None);
    }

    #[test]
    fn test_failure_retries_same_cursor() {
        let mut controller = PaginationController::new();
        controller.on_visible_index_changed(0, 0);
        controller.on_page_loaded(page(&["A", "B"], 2, false));

        assert_eq!(controller.on_visible_index_changed(1, 2), Some(Cursor(2)));
        controller.on_page_failed("timeout");

        assert_eq!(controller.state(), PaginationState::Idle);
        assert_eq!(controller.last_error(), Some("timeout"));
        assert_eq!(controller.cursor(), Cursor(2));
        assert_eq!(controller.on_visible_index_changed(1, 2), Some(Cursor(2)));
    }

    #[test]
    fn test_successful_page_clears_error() {
        let mut controller = PaginationController::new();
        controller.on_visible_index_changed(0, 0);
        controller.apply(Resource::Error("offline".to_string()));
        assert_eq!(controller.last_error(), Some("offline"));

        controller.on_visible_index_changed(0, 0);
        controller.apply(Resource::Success(page(&["A"], 1, false)));
        assert!(controller.last_error().is_none());
        assert_eq!(controller.items(), &["A"]);
    }

    #[test]
    fn test_reset_keeps_threshold() {
        let mut controller = PaginationController::with_threshold(2);
        controller.on_visible_index_changed(0, 0);
        controller.on_page_loaded(page(&["A"], 1, true));

        controller.reset();

        assert!(controller.items().is_empty());
        assert_eq!(controller.state(), PaginationState::Idle);
        assert_eq!(controller.on_visible_index_changed(7, 10), None);
        assert_eq!(controller.on_visible_index_changed(8, 10), Some(Cursor::START));
    }

    #[test]
    fn test_changed_query_restarts_session() {
        let mut session = ListSession::new(ListSource::category("soups"));
        session.controller.on_visible_index_changed(0, 0);
        session.controller.on_page_loaded(Page {
            items: vec![Recipe::default()],
            next_cursor: Cursor(1),
            is_last: true,
        });

        assert!(!session.set_query("  "));
        assert_eq!(session.items().len(), 1);

        assert!(session.set_query(" miso "));
        assert_eq!(session.source().query(), "miso");
        assert!(session.items().is_empty());
        assert_eq!(session.controller().cursor(), Cursor::START);
        assert_eq!(session.controller().state(), PaginationState::Idle);

        assert!(!session.set_query("miso"));
        assert!(session.clear_query());
        assert_eq!(session.source(), &ListSource::category("soups"));
    }
}
