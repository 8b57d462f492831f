use std::sync::Arc;

use tokio::sync::{mpsc, watch};

use crate::backend::Backend;
use crate::install::InstallOrchestrator;
use crate::notify::{Notification, Notifier};
use crate::pagination::{ListingSnapshot, PaginationEngine};
use crate::scroll::ScrollTrigger;
use crate::search::SearchDebouncer;

/// The marketplace console: one long-lived object wiring search input to
/// listing resets and exposing the pagination, scroll, and install
/// surfaces.
///
/// Data flow: keystrokes are debounced into settled queries, each settled
/// query starts a fresh listing episode via [`PaginationEngine::reset`],
/// and scroll events (or the manual "load more" control) drive
/// [`PaginationEngine::load_next`]. Selecting a service hands off to the
/// [`InstallOrchestrator`].
///
/// Must be constructed from within a tokio runtime.
pub struct MarketplaceConsole {
    debouncer: SearchDebouncer,
    engine: PaginationEngine,
    scroll: ScrollTrigger,
    installer: InstallOrchestrator,
}

impl MarketplaceConsole {
    /// Build the console and return it along with the stream of
    /// user-facing notifications.
    pub fn new(backend: Arc<dyn Backend>) -> (Self, mpsc::UnboundedReceiver<Notification>) {
        let (notifier, notifications) = Notifier::channel();
        let engine = PaginationEngine::new(Arc::clone(&backend), notifier.clone());
        let installer = InstallOrchestrator::new(backend, notifier);
        let scroll = ScrollTrigger::new(engine.clone());
        let (debouncer, mut settled) = SearchDebouncer::new();

        // Every settled query starts a fresh listing episode. The task ends
        // when the console (and with it the debouncer) is dropped.
        let reset_engine = engine.clone();
        tokio::spawn(async move {
            while let Some(query) = settled.recv().await {
                reset_engine.reset(query);
            }
        });

        let console = Self {
            debouncer,
            engine,
            scroll,
            installer,
        };
        (console, notifications)
    }

    /// Forward a raw search keystroke.
    pub fn search_input(&self, text: impl Into<String>) {
        self.debouncer.input(text);
    }

    pub fn engine(&self) -> &PaginationEngine {
        &self.engine
    }

    pub fn scroll(&self) -> &ScrollTrigger {
        &self.scroll
    }

    pub fn installer(&self) -> &InstallOrchestrator {
        &self.installer
    }

    /// Subscribe to listing snapshots.
    pub fn subscribe(&self) -> watch::Receiver<ListingSnapshot> {
        self.engine.subscribe()
    }
}
