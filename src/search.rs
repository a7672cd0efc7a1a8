//! Search/filter controller: owns the current query, filters and pagination
//! offset, drives the recipe API and keeps the displayed result set.

use std::collections::BTreeMap;
use std::sync::Arc;

use log::{debug, error, warn};

use crate::api::{FilterName, RecipeApi, SearchRequest, SortOrder};
use crate::error::RecipeError;
use crate::model::{RecipeSummary, ResultPage};

/// Results per page; a full page means more may exist
pub const PAGE_SIZE: u32 = 9;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    /// Nothing searched yet: most popular recipes first
    Popular,
    KeywordSearch,
    FilteredSearch,
}

/// Filter pills currently switched on, in activation order.
///
/// Pills are independent: two values for the same filter may both be active.
/// A request carries one value per filter, taken from the pill activated last.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActiveFilters {
    pills: Vec<(FilterName, String)>,
}

impl ActiveFilters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style helper that activates one pill
    pub fn with(mut self, name: FilterName, value: impl Into<String>) -> Self {
        self.toggle(name, value);
        self
    }

    /// Flip a pill and return whether it is now active
    pub fn toggle(&mut self, name: FilterName, value: impl Into<String>) -> bool {
        let value = value.into();
        if let Some(pos) = self
            .pills
            .iter()
            .position(|(n, v)| *n == name && *v == value)
        {
            self.pills.remove(pos);
            false
        } else {
            self.pills.push((name, value));
            true
        }
    }

    pub fn is_active(&self, name: FilterName, value: &str) -> bool {
        self.pills.iter().any(|(n, v)| *n == name && v == value)
    }

    pub fn is_empty(&self) -> bool {
        self.pills.is_empty()
    }

    pub fn pills(&self) -> &[(FilterName, String)] {
        &self.pills
    }

    /// Collapse the pills into one value per filter name
    pub fn to_request_filters(&self) -> BTreeMap<FilterName, String> {
        let mut filters = BTreeMap::new();
        for (name, value) in &self.pills {
            filters.insert(*name, value.clone());
        }
        filters
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchState {
    pub mode: SearchMode,
    pub query: String,
    pub filters: ActiveFilters,
    pub offset: u32,
    pub page_size: u32,
}

impl Default for SearchState {
    fn default() -> Self {
        SearchState {
            mode: SearchMode::Popular,
            query: String::new(),
            filters: ActiveFilters::default(),
            offset: 0,
            page_size: PAGE_SIZE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RequestKind {
    Fresh,
    More,
}

/// A request the controller has issued but not yet seen the answer to
#[derive(Debug, Clone)]
pub struct PendingRequest {
    ticket: u64,
    kind: RequestKind,
    mode: SearchMode,
    request: SearchRequest,
}

impl PendingRequest {
    pub fn ticket(&self) -> u64 {
        self.ticket
    }

    pub fn request(&self) -> &SearchRequest {
        &self.request
    }

    /// Placeholder to show while the request is outstanding
    pub fn loading_message(&self) -> &'static str {
        match (self.kind, self.mode) {
            (RequestKind::More, _) => "Loading more recipes...",
            (RequestKind::Fresh, SearchMode::Popular) => "Loading popular recipes...",
            (RequestKind::Fresh, SearchMode::KeywordSearch) => "Searching for delicious recipes...",
            (RequestKind::Fresh, SearchMode::FilteredSearch) => "Filtering recipes...",
        }
    }

    /// Send the request to `api`
    pub async fn send(&self, api: &dyn RecipeApi) -> Result<ResultPage, RecipeError> {
        match self.mode {
            SearchMode::Popular => api.popular(self.request.number, self.request.offset).await,
            _ => api.search(&self.request).await,
        }
    }
}

/// What happened to the displayed results when a response arrived
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// A fresh page replaced the displayed results
    Replaced { count: usize, total_results: u64 },
    /// A further page was appended
    Appended { added: usize },
    /// A fresh search matched nothing
    Empty { message: String },
    /// Load-more came back empty; nothing further to load
    NoMore { message: String },
    /// The request failed; `message` is for display, `detail` for logs
    Failed { message: String, detail: String },
    /// A newer request was issued after this one; the response was dropped
    Stale,
}

pub struct SearchController {
    api: Arc<dyn RecipeApi>,
    state: SearchState,
    results: Vec<RecipeSummary>,
    total_results: u64,
    has_more: bool,
    last_ticket: u64,
    in_flight: Option<u64>,
}

impl SearchController {
    pub fn new(api: Arc<dyn RecipeApi>) -> Self {
        SearchController {
            api,
            state: SearchState::default(),
            results: Vec::new(),
            total_results: 0,
            has_more: false,
            last_ticket: 0,
            in_flight: None,
        }
    }

    pub fn state(&self) -> &SearchState {
        &self.state
    }

    /// Currently displayed results, in display order
    pub fn results(&self) -> &[RecipeSummary] {
        &self.results
    }

    pub fn total_results(&self) -> u64 {
        self.total_results
    }

    /// Whether a "load more" control should be offered
    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn filters(&self) -> &ActiveFilters {
        &self.state.filters
    }

    /// Flip a filter pill. Changing the filter set restarts pagination and
    /// invalidates any outstanding request.
    pub fn toggle_filter(&mut self, name: FilterName, value: impl Into<String>) -> bool {
        let active = self.state.filters.toggle(name, value);
        self.state.offset = 0;
        self.has_more = false;
        self.last_ticket += 1;
        self.in_flight = None;
        active
    }

    /// Load the popular listing shown before anything is searched
    pub async fn load_popular(&mut self) -> SearchOutcome {
        let pending = self.begin_popular();
        self.dispatch(pending).await
    }

    /// Run a new search, replacing the displayed results.
    ///
    /// An empty query with no filters is rejected before any request is made.
    pub async fn run_search(
        &mut self,
        query: &str,
        filters: ActiveFilters,
    ) -> Result<SearchOutcome, RecipeError> {
        let pending = self.begin_search(query, filters)?;
        Ok(self.dispatch(pending).await)
    }

    /// Fetch the next page and append it to the displayed results
    pub async fn load_more(&mut self) -> Result<SearchOutcome, RecipeError> {
        let pending = self.begin_load_more()?;
        Ok(self.dispatch(pending).await)
    }

    pub fn begin_popular(&mut self) -> PendingRequest {
        self.state = SearchState::default();
        self.has_more = false;
        let request = SearchRequest::popular(self.state.page_size, 0);
        self.issue(RequestKind::Fresh, SearchMode::Popular, request)
    }

    pub fn begin_search(
        &mut self,
        query: &str,
        filters: ActiveFilters,
    ) -> Result<PendingRequest, RecipeError> {
        let query = query.trim();
        if query.is_empty() && filters.is_empty() {
            return Err(RecipeError::ValidationError(
                "Enter a search term or choose a filter".to_string(),
            ));
        }

        let mode = if query.is_empty() {
            SearchMode::FilteredSearch
        } else {
            SearchMode::KeywordSearch
        };
        self.state = SearchState {
            mode,
            query: query.to_string(),
            filters,
            offset: 0,
            page_size: self.state.page_size,
        };
        self.has_more = false;

        let request = SearchRequest {
            query: (!query.is_empty()).then(|| query.to_string()),
            filters: self.state.filters.to_request_filters(),
            number: self.state.page_size,
            offset: 0,
            sort: None,
        };
        Ok(self.issue(RequestKind::Fresh, mode, request))
    }

    pub fn begin_load_more(&mut self) -> Result<PendingRequest, RecipeError> {
        if !self.has_more {
            return Err(RecipeError::ValidationError(
                "No more results to load".to_string(),
            ));
        }

        let offset = self.state.offset + self.state.page_size;
        let request = SearchRequest {
            query: (!self.state.query.is_empty()).then(|| self.state.query.clone()),
            filters: self.state.filters.to_request_filters(),
            number: self.state.page_size,
            offset,
            sort: (self.state.mode == SearchMode::Popular).then_some(SortOrder::Popularity),
        };
        Ok(self.issue(RequestKind::More, self.state.mode, request))
    }

    /// Apply the response to `pending`. Responses to anything but the most
    /// recently issued request are discarded.
    pub fn complete(
        &mut self,
        pending: PendingRequest,
        result: Result<ResultPage, RecipeError>,
    ) -> SearchOutcome {
        if pending.ticket != self.last_ticket {
            warn!(
                "Dropping stale response for request {} (latest is {})",
                pending.ticket, self.last_ticket
            );
            return SearchOutcome::Stale;
        }
        self.in_flight = None;

        match (pending.kind, result) {
            (RequestKind::Fresh, Ok(page)) => {
                let count = page.results.len();
                debug!("{:?} returned {} of {}", pending.mode, count, page.total_results);
                self.has_more = count == self.state.page_size as usize;
                self.total_results = page.total_results;
                self.results = page.results;
                if count == 0 {
                    SearchOutcome::Empty {
                        message: empty_message(pending.mode).to_string(),
                    }
                } else {
                    SearchOutcome::Replaced {
                        count,
                        total_results: self.total_results,
                    }
                }
            }
            (RequestKind::More, Ok(page)) => {
                let added = page.results.len();
                if added == 0 {
                    self.has_more = false;
                    return SearchOutcome::NoMore {
                        message: "No more recipes to load.".to_string(),
                    };
                }
                self.state.offset = pending.request.offset;
                self.has_more = added == self.state.page_size as usize;
                self.results.extend(page.results);
                SearchOutcome::Appended { added }
            }
            (kind, Err(e)) => {
                error!("{:?} request failed: {}", pending.mode, e);
                if kind == RequestKind::Fresh {
                    self.results.clear();
                    self.total_results = 0;
                }
                SearchOutcome::Failed {
                    message: failure_message(pending.mode).to_string(),
                    detail: e.to_string(),
                }
            }
        }
    }

    async fn dispatch(&mut self, pending: PendingRequest) -> SearchOutcome {
        let api = Arc::clone(&self.api);
        let result = pending.send(api.as_ref()).await;
        self.complete(pending, result)
    }

    fn issue(&mut self, kind: RequestKind, mode: SearchMode, request: SearchRequest) -> PendingRequest {
        self.last_ticket += 1;
        self.in_flight = Some(self.last_ticket);
        debug!("Issuing request {}: {:?}", self.last_ticket, request);
        PendingRequest {
            ticket: self.last_ticket,
            kind,
            mode,
            request,
        }
    }
}

fn empty_message(mode: SearchMode) -> &'static str {
    match mode {
        SearchMode::Popular => "No recipes available right now.",
        SearchMode::KeywordSearch => "No recipes found. Try a different search!",
        SearchMode::FilteredSearch => "No recipes found with these filters.",
    }
}

fn failure_message(mode: SearchMode) -> &'static str {
    match mode {
        SearchMode::FilteredSearch => "Error filtering recipes.",
        _ => "Error searching recipes. Please try again.",
    }
}
