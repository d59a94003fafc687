//! Browser state and its reducer.
//!
//! All state transitions go through [`reduce`], a pure function. The async
//! side ([`super::QueryBuilder`]) only decides *when* to dispatch actions.

use super::criteria::{FilterCriteria, FilterKey, QueryParams};
use super::paginator::{self, PageControl};
use super::response::DealPage;
use crate::domain::entities::Deal;

pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const MAX_PAGE_SIZE: u32 = 100;
pub const PAGE_SIZE_OPTIONS: [u32; 4] = [10, 20, 50, 100];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationState {
    /// 1-indexed current page.
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub total_pages: u32,
}

impl Default for PaginationState {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
            total: 0,
            total_pages: 0,
        }
    }
}

impl PaginationState {
    fn set_total(&mut self, total: u64) {
        self.total = total;
        self.total_pages = paginator::total_pages(total, self.limit);
    }
}

/// Everything the deals view renders.
#[derive(Debug, Clone, PartialEq)]
pub struct BrowserState {
    pub criteria: FilterCriteria,
    pub pagination: PaginationState,
    /// Full result set of the last successful fetch.
    pub deals: Vec<Deal>,
    pub loading: bool,
    pub error: Option<String>,
    /// Id of the most recently issued request. Responses carrying any other
    /// id are stale.
    pub latest_request: u64,
    /// Bumped whenever the parameters of the next fetch change.
    pub query_revision: u64,
}

impl Default for BrowserState {
    fn default() -> Self {
        Self {
            criteria: FilterCriteria::default(),
            pagination: PaginationState::default(),
            deals: Vec::new(),
            loading: true,
            error: None,
            latest_request: 0,
            query_revision: 0,
        }
    }
}

impl BrowserState {
    /// Deals on the current page.
    pub fn visible_deals(&self) -> &[Deal] {
        paginator::page_slice(&self.deals, self.pagination.page, self.pagination.limit)
    }

    pub fn has_active_filters(&self) -> bool {
        self.criteria.is_active()
    }

    /// Parameters the next fetch will send.
    pub fn request_params(&self) -> QueryParams {
        QueryParams::build(
            &self.criteria,
            self.pagination.page,
            self.pagination.limit,
        )
    }

    pub fn page_controls(&self) -> Vec<PageControl> {
        paginator::page_controls(self.pagination.page, self.pagination.total_pages)
    }

    fn query_changed(&mut self) {
        self.query_revision += 1;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    SetSearch(String),
    SetFilter(FilterKey, String),
    ClearFilters,
    ChangePage(u32),
    ChangeLimit(u32),
    FetchStarted { request_id: u64 },
    FetchSucceeded { request_id: u64, page: DealPage },
    FetchFailed { request_id: u64, message: String },
    DismissError,
}

/// Applies one action.
///
/// Criteria changes reset the page to 1 in the same step, so the fetch they
/// trigger already carries `page=1`. Page requests outside
/// `[1, total_pages]` leave the state untouched.
pub fn reduce(mut state: BrowserState, action: Action) -> BrowserState {
    match action {
        Action::SetSearch(text) => {
            if state.criteria.search != text {
                state.criteria.search = text;
                state.pagination.page = 1;
                state.query_changed();
            }
        }
        Action::SetFilter(key, value) => {
            if state.criteria.get(key) != value {
                state.criteria.set(key, value);
                state.pagination.page = 1;
                state.query_changed();
            }
        }
        Action::ClearFilters => {
            state.criteria = FilterCriteria::default();
            state.pagination.page = 1;
            state.query_changed();
        }
        Action::ChangePage(page) => {
            let pagination = &mut state.pagination;
            if page >= 1 && page <= pagination.total_pages && page != pagination.page {
                pagination.page = page;
                state.query_changed();
            }
        }
        Action::ChangeLimit(limit) => {
            if (1..=MAX_PAGE_SIZE).contains(&limit) && limit != state.pagination.limit {
                state.pagination.limit = limit;
                state.pagination.page = 1;
                let total = state.pagination.total;
                state.pagination.set_total(total);
                state.query_changed();
            }
        }
        Action::FetchStarted { request_id } => {
            state.latest_request = request_id;
            state.loading = true;
        }
        Action::FetchSucceeded { request_id, page } => {
            if request_id == state.latest_request {
                state.pagination.set_total(page.total);
                let last = state.pagination.total_pages.max(1);
                state.pagination.page = state.pagination.page.clamp(1, last);
                state.deals = page.deals;
                state.loading = false;
                state.error = None;
            }
        }
        Action::FetchFailed {
            request_id,
            message,
        } => {
            if request_id == state.latest_request {
                state.deals.clear();
                state.pagination.set_total(0);
                state.loading = false;
                state.error = Some(message);
            }
        }
        Action::DismissError => state.error = None,
    }
    state
}
