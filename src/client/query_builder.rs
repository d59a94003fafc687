//! Debounced fetch orchestration on top of the state reducer.
//!
//! Each query-affecting change restarts a quiescence timer; only when it
//! expires is a request issued, with the parameters current at that moment.
//! Requests are numbered and the reducer drops any response that is not for
//! the latest number, so a slow superseded request can never overwrite newer
//! results. In-flight requests are never cancelled.

use super::api::DealsSource;
use super::criteria::{FilterKey, QueryParams};
use super::error::ClientError;
use super::state::{Action, BrowserState, reduce};
use crate::domain::entities::Deal;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

pub const DEBOUNCE_WINDOW: Duration = Duration::from_millis(300);

/// The single message shown for any list failure.
pub const FETCH_ERROR_MESSAGE: &str = "Failed to fetch deals. Please try again.";

/// Owns the browser state and schedules fetches.
///
/// Must be used from within a Tokio runtime.
pub struct QueryBuilder {
    source: Arc<dyn DealsSource>,
    state: Arc<watch::Sender<BrowserState>>,
    debounce: Duration,
    pending: Option<JoinHandle<()>>,
    next_request_id: Arc<AtomicU64>,
}

impl QueryBuilder {
    pub fn new(source: Arc<dyn DealsSource>) -> Self {
        let (state, _) = watch::channel(BrowserState::default());
        Self {
            source,
            state: Arc::new(state),
            debounce: DEBOUNCE_WINDOW,
            pending: None,
            next_request_id: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    /// Receives every state change, including ones made by completed fetches.
    pub fn subscribe(&self) -> watch::Receiver<BrowserState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> BrowserState {
        self.state.borrow().clone()
    }

    /// Applies `action` and schedules a fetch if it changed the query.
    ///
    /// Returns whether the query changed.
    pub fn dispatch(&mut self, action: Action) -> bool {
        let before = self.state.borrow().query_revision;
        apply(&self.state, action);
        let changed = self.state.borrow().query_revision != before;
        if changed {
            self.schedule_fetch();
        }
        changed
    }

    pub fn set_search(&mut self, text: impl Into<String>) -> bool {
        self.dispatch(Action::SetSearch(text.into()))
    }

    pub fn set_filter(&mut self, key: FilterKey, value: impl Into<String>) -> bool {
        self.dispatch(Action::SetFilter(key, value.into()))
    }

    pub fn clear_filters(&mut self) -> bool {
        self.dispatch(Action::ClearFilters)
    }

    /// Returns false (and does nothing) for pages outside `[1, total_pages]`.
    pub fn change_page(&mut self, page: u32) -> bool {
        self.dispatch(Action::ChangePage(page))
    }

    pub fn change_limit(&mut self, limit: u32) -> bool {
        self.dispatch(Action::ChangeLimit(limit))
    }

    pub fn dismiss_error(&mut self) {
        apply(&self.state, Action::DismissError);
    }

    /// Schedules a fetch with the current parameters.
    pub fn refresh(&mut self) {
        self.schedule_fetch();
    }

    pub async fn fetch_deal(&self, id: i64) -> Result<Deal, ClientError> {
        self.source.fetch_deal(id).await
    }

    /// (Re)starts the debounce timer. A pending timer is cancelled, so only
    /// the last change within the window produces a request.
    pub fn schedule_fetch(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }

        let source = Arc::clone(&self.source);
        let state = Arc::clone(&self.state);
        let request_ids = Arc::clone(&self.next_request_id);
        let debounce = self.debounce;

        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(debounce).await;

            let request_id = request_ids.fetch_add(1, Ordering::Relaxed) + 1;
            apply(&state, Action::FetchStarted { request_id });
            let params = state.borrow().request_params();

            tokio::spawn(execute_fetch(source, state, request_id, params));
        }));
    }
}

impl Drop for QueryBuilder {
    fn drop(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }
    }
}

fn apply(state: &watch::Sender<BrowserState>, action: Action) {
    state.send_modify(|current| {
        let previous = std::mem::take(current);
        *current = reduce(previous, action);
    });
}

async fn execute_fetch(
    source: Arc<dyn DealsSource>,
    state: Arc<watch::Sender<BrowserState>>,
    request_id: u64,
    params: QueryParams,
) {
    tracing::debug!(request_id, params = ?params.as_slice(), "Fetching deals");

    let result = source.fetch_deals(&params).await;

    if state.borrow().latest_request != request_id {
        tracing::debug!(request_id, "Discarding stale deals response");
        return;
    }

    let action = match result {
        Ok(page) => {
            tracing::debug!(
                request_id,
                received = page.deals.len(),
                total = page.total,
                "Fetched deals"
            );
            Action::FetchSucceeded { request_id, page }
        }
        Err(e) => {
            tracing::warn!(request_id, error = %e, "Failed to fetch deals");
            Action::FetchFailed {
                request_id,
                message: FETCH_ERROR_MESSAGE.to_string(),
            }
        }
    };

    apply(&state, action);
}
