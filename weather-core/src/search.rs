//! Debounced location search.
//!
//! Keystrokes arrive on every change of the search box. A lookup is only sent
//! once the text has been stable for the quiet window, and only with the final
//! text. Results come back to the screen as [`Event::LocationsFound`].

use std::{sync::Arc, time::Duration};

use tokio::sync::mpsc::UnboundedSender;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::{client::WeatherApi, screen::Event};

/// Queries shorter than this (after trimming) are ignored.
pub const MIN_QUERY_CHARS: usize = 3;

#[derive(Debug)]
pub struct SearchController {
    api: Arc<dyn WeatherApi>,
    events: UnboundedSender<Event>,
    quiet_window: Duration,
    root: CancellationToken,
    pending: Option<CancellationToken>,
}

impl SearchController {
    pub fn new(
        api: Arc<dyn WeatherApi>,
        events: UnboundedSender<Event>,
        quiet_window: Duration,
    ) -> Self {
        Self { api, events, quiet_window, root: CancellationToken::new(), pending: None }
    }

    /// Record the current search box text, restarting the quiet window.
    ///
    /// Must be called from within a tokio runtime.
    pub fn input(&mut self, text: &str) {
        self.cancel_pending();
        if self.root.is_cancelled() {
            return;
        }

        let token = self.root.child_token();
        self.pending = Some(token.clone());

        let api = Arc::clone(&self.api);
        let events = self.events.clone();
        let window = self.quiet_window;
        let text = text.to_string();

        tokio::spawn(async move {
            tokio::select! {
                biased;
                _ = token.cancelled() => return,
                _ = tokio::time::sleep(window) => {}
            }

            let query = text.trim();
            if query.chars().count() < MIN_QUERY_CHARS {
                debug!(query, "search text too short, skipping lookup");
                return;
            }

            debug!(query, "looking up locations");
            let result = tokio::select! {
                biased;
                _ = token.cancelled() => return,
                result = api.search_locations(query) => result,
            };

            if token.is_cancelled() {
                return;
            }

            match result {
                Ok(locations) => {
                    let _ = events
                        .send(Event::LocationsFound { query: query.to_string(), locations });
                }
                Err(e) => warn!(query, error = %e, "location search failed"),
            }
        });
    }

    /// Drop the scheduled or in-flight lookup, if any.
    pub fn cancel_pending(&mut self) {
        if let Some(token) = self.pending.take() {
            token.cancel();
        }
    }

    /// Stop for good: nothing scheduled fires, and later input is ignored.
    pub fn shutdown(&mut self) {
        self.root.cancel();
        self.pending = None;
    }
}

impl Drop for SearchController {
    fn drop(&mut self) {
        self.root.cancel();
    }
}
