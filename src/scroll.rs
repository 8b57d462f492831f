use crate::pagination::PaginationEngine;

/// Distance from the bottom, in scroll units, at which the next page loads.
pub const LOAD_MORE_THRESHOLD: f64 = 200.0;

/// Geometry of the scrollable results container at some instant.
#[derive(Debug, Clone, Copy)]
pub struct ScrollMetrics {
    /// Total height of the scrollable content.
    pub scroll_height: f64,
    /// Current scroll offset from the top.
    pub scroll_top: f64,
    /// Height of the visible viewport.
    pub client_height: f64,
}

impl ScrollMetrics {
    pub fn distance_from_bottom(&self) -> f64 {
        self.scroll_height - self.scroll_top - self.client_height
    }
}

/// Turns scroll geometry (or a manual control) into `load_next` calls.
///
/// Safe under scroll-event storms: the engine ignores `load_next` while a
/// fetch is in flight or after the final page, so repeated threshold
/// crossings cannot duplicate a request.
#[derive(Clone)]
pub struct ScrollTrigger {
    engine: PaginationEngine,
    threshold: f64,
}

impl ScrollTrigger {
    pub fn new(engine: PaginationEngine) -> Self {
        Self {
            engine,
            threshold: LOAD_MORE_THRESHOLD,
        }
    }

    /// Handle a scroll event.
    pub fn on_scroll(&self, metrics: ScrollMetrics) {
        if metrics.distance_from_bottom() < self.threshold {
            self.engine.load_next();
        }
    }

    /// Manual "load more" control; identical semantics to crossing the
    /// scroll threshold.
    pub fn load_more(&self) {
        self.engine.load_next();
    }
}
