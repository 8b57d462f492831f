use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time;
use tracing::trace;

/// Quiescence window between the last keystroke and the emitted query.
pub const DEBOUNCE_WINDOW: Duration = Duration::from_millis(500);

/// Trailing-edge debouncer for search input.
///
/// Feed every raw input change through [`SearchDebouncer::input`]. After
/// 500 ms without further input, exactly one query-change event is emitted
/// carrying the latest string; input arriving inside the window restarts
/// it. Dropping the debouncer cancels a pending emission without emitting.
///
/// This is a pure timing concern: the debouncer never issues network calls.
pub struct SearchDebouncer {
    tx: mpsc::UnboundedSender<String>,
}

impl SearchDebouncer {
    /// Spawn the debounce task and return the input handle plus the stream
    /// of settled queries. Must be called from within a tokio runtime.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<String>) {
        Self::with_window(DEBOUNCE_WINDOW)
    }

    pub fn with_window(window: Duration) -> (Self, mpsc::UnboundedReceiver<String>) {
        let (tx, mut rx) = mpsc::unbounded_channel::<String>();
        let (out, settled) = mpsc::unbounded_channel();

        tokio::spawn(async move {
            while let Some(mut latest) = rx.recv().await {
                loop {
                    let sleep = time::sleep(window);
                    tokio::pin!(sleep);
                    tokio::select! {
                        next = rx.recv() => match next {
                            // New keystroke: keep it and restart the window.
                            Some(text) => latest = text,
                            // Handle dropped with an emission pending.
                            None => return,
                        },
                        () = &mut sleep => {
                            trace!("query settled: {:?}", latest);
                            if out.send(latest).is_err() {
                                return;
                            }
                            break;
                        }
                    }
                }
            }
        });

        (Self { tx }, settled)
    }

    /// Record a raw input change.
    pub fn input(&self, text: impl Into<String>) {
        let _ = self.tx.send(text.into());
    }
}
