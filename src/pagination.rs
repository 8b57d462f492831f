use std::sync::{Arc, Mutex};

use tokio::sync::watch;
use tracing::{debug, warn};

use storefront_core::ServiceSummary;

use crate::backend::Backend;
use crate::notify::Notifier;

/// Fixed page size for listing requests. Not user-configurable.
pub const PAGE_SIZE: u32 = 100;

/// Lifecycle of the visible listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingPhase {
    /// No fetch issued yet.
    Idle,
    /// First page of a fresh query is loading; the list is empty.
    LoadingInitial,
    /// A further page is loading behind the pages already shown.
    LoadingMore,
    Loaded,
    /// The last fetch failed; the list shows the last known-good pages.
    Error,
}

/// Immutable view of the listing, published after every state change.
#[derive(Debug, Clone)]
pub struct ListingSnapshot {
    pub phase: ListingPhase,
    pub query: String,
    /// All successfully fetched, non-stale pages, in fetch order.
    pub services: Vec<ServiceSummary>,
    /// Next page to fetch, 1-based.
    pub page: u32,
    pub has_more: bool,
    pub total_count: Option<u32>,
}

impl ListingSnapshot {
    fn initial() -> Self {
        Self {
            phase: ListingPhase::Idle,
            query: String::new(),
            services: Vec::new(),
            page: 1,
            has_more: true,
            total_count: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FetchKind {
    Initial,
    More,
}

struct ListingState {
    phase: ListingPhase,
    query: String,
    services: Vec<ServiceSummary>,
    page: u32,
    has_more: bool,
    total_count: Option<u32>,
    /// Bumped by every reset. A response whose tag no longer matches is
    /// stale and must not touch state.
    generation: u64,
    in_flight: bool,
}

impl ListingState {
    fn snapshot(&self) -> ListingSnapshot {
        ListingSnapshot {
            phase: self.phase,
            query: self.query.clone(),
            services: self.services.clone(),
            page: self.page,
            has_more: self.has_more,
            total_count: self.total_count,
        }
    }
}

struct Shared {
    backend: Arc<dyn Backend>,
    notifier: Notifier,
    state: Mutex<ListingState>,
    updates: watch::Sender<ListingSnapshot>,
}

impl Shared {
    fn publish(&self, state: &ListingState) {
        self.updates.send_replace(state.snapshot());
    }
}

/// Owns the page cursor, the visible list, and the single-flight guard for
/// listing requests.
///
/// Cheap to clone; all clones share one state cell. Methods are synchronous
/// and non-blocking: fetches run on spawned tasks and report back through a
/// generation check, so a superseded response can never mutate state, no
/// matter when it arrives.
#[derive(Clone)]
pub struct PaginationEngine {
    shared: Arc<Shared>,
}

impl PaginationEngine {
    pub fn new(backend: Arc<dyn Backend>, notifier: Notifier) -> Self {
        let (updates, _) = watch::channel(ListingSnapshot::initial());
        let state = Mutex::new(ListingState {
            phase: ListingPhase::Idle,
            query: String::new(),
            services: Vec::new(),
            page: 1,
            has_more: true,
            total_count: None,
            generation: 0,
            in_flight: false,
        });
        Self {
            shared: Arc::new(Shared {
                backend,
                notifier,
                state,
                updates,
            }),
        }
    }

    /// Subscribe to listing snapshots. The current snapshot is readable
    /// immediately; `changed().await` wakes on every state transition.
    pub fn subscribe(&self) -> watch::Receiver<ListingSnapshot> {
        self.shared.updates.subscribe()
    }

    /// Current state of the listing.
    pub fn snapshot(&self) -> ListingSnapshot {
        self.shared.state.lock().unwrap().snapshot()
    }

    /// Start a fresh listing episode for `query`.
    ///
    /// Any outstanding fetch is superseded: its response will arrive
    /// carrying a stale generation and be discarded, success or failure.
    pub fn reset(&self, query: impl Into<String>) {
        let query = query.into();
        let generation;
        {
            let mut state = self.shared.state.lock().unwrap();
            state.generation += 1;
            generation = state.generation;
            state.query = query.clone();
            state.page = 1;
            state.has_more = true;
            state.total_count = None;
            state.services.clear();
            state.phase = ListingPhase::LoadingInitial;
            state.in_flight = true;
            self.shared.publish(&state);
        }
        debug!("listing reset: query={:?} generation={}", query, generation);
        self.spawn_fetch(generation, query, 1, FetchKind::Initial);
    }

    /// Request the next page.
    ///
    /// Silently ignored while a fetch is in flight, after the final page,
    /// or before any episode has started. Accepted in the `Error` phase:
    /// a failure never advances the cursor, so the retry re-fetches the
    /// same page.
    pub fn load_next(&self) {
        let (generation, query, page);
        {
            let mut state = self.shared.state.lock().unwrap();
            if state.in_flight || !state.has_more {
                return;
            }
            if !matches!(state.phase, ListingPhase::Loaded | ListingPhase::Error) {
                return;
            }
            state.phase = ListingPhase::LoadingMore;
            state.in_flight = true;
            generation = state.generation;
            query = state.query.clone();
            page = state.page;
            self.shared.publish(&state);
        }
        debug!("loading page {} for query {:?}", page, query);
        self.spawn_fetch(generation, query, page, FetchKind::More);
    }

    fn spawn_fetch(&self, generation: u64, query: String, page: u32, kind: FetchKind) {
        let shared = Arc::clone(&self.shared);
        tokio::spawn(async move {
            let result = shared.backend.list_services(&query, page, PAGE_SIZE).await;

            let mut state = shared.state.lock().unwrap();
            if state.generation != generation {
                debug!(
                    "discarding stale listing response: generation={} page={}",
                    generation, page
                );
                return;
            }
            state.in_flight = false;
            match result {
                Ok(response) => {
                    match kind {
                        FetchKind::Initial => state.services = response.services,
                        FetchKind::More => state.services.extend(response.services),
                    }
                    state.page += 1;
                    state.has_more = response.has_more;
                    if response.total_count.is_some() {
                        state.total_count = response.total_count;
                    }
                    state.phase = ListingPhase::Loaded;
                }
                Err(e) => {
                    warn!("listing fetch failed for page {}: {}", page, e);
                    state.phase = ListingPhase::Error;
                    shared
                        .notifier
                        .error(format!("Failed to load services: {}", e));
                }
            }
            shared.publish(&state);
        });
    }
}
