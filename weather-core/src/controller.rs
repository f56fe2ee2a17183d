//! Runtime side of the weather screen.
//!
//! [`ScreenController`] owns the [`ScreenState`], turns handler calls into
//! [`Event`]s, reduces them and starts the resulting effects as tasks. Every
//! task reports back through one channel that only the controller reads, so
//! the state has a single writer.

use std::sync::Arc;

use tokio::sync::{
    mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel},
    oneshot,
};
use tracing::{debug, info, warn};

use crate::{
    client::WeatherApi,
    config::ScreenSettings,
    model::{ForecastRequest, Location},
    screen::{self, Effect, Event, ScreenState},
    search::SearchController,
    storage::{KeyValueStore, LAST_CITY_KEY},
    view::View,
};

#[derive(Debug)]
pub struct ScreenController {
    state: ScreenState,
    settings: ScreenSettings,
    api: Arc<dyn WeatherApi>,
    store: Arc<dyn KeyValueStore>,
    search: SearchController,
    events_tx: UnboundedSender<Event>,
    events_rx: UnboundedReceiver<Event>,
    writer: Option<UnboundedSender<Write>>,
}

/// Requests to the task that owns all last-city writes.
#[derive(Debug)]
enum Write {
    City(String),
    Flush(oneshot::Sender<()>),
}

impl ScreenController {
    pub fn new(
        api: Arc<dyn WeatherApi>,
        store: Arc<dyn KeyValueStore>,
        settings: ScreenSettings,
    ) -> Self {
        let (events_tx, events_rx) = unbounded_channel();
        let search =
            SearchController::new(Arc::clone(&api), events_tx.clone(), settings.search_debounce);

        Self {
            state: ScreenState::default(),
            settings,
            api,
            store,
            search,
            events_tx,
            events_rx,
            writer: None,
        }
    }

    pub fn state(&self) -> &ScreenState {
        &self.state
    }

    pub fn view(&self) -> View {
        View::from_state(&self.state)
    }

    /// Restore the last city and start loading its forecast.
    pub fn mount(&mut self) {
        self.dispatch(Event::Mounted);
    }

    pub fn update_search_text(&mut self, text: impl Into<String>) {
        self.dispatch(Event::SearchTextChanged(text.into()));
    }

    pub fn toggle_search(&mut self) {
        self.dispatch(Event::ToggleSearch);
    }

    pub fn select_location(&mut self, location: Location) {
        self.dispatch(Event::SelectLocation(location));
    }

    /// Select the `index`-th entry (0-based) of the visible result list.
    ///
    /// Returns `false` if the search box is closed or there is no such entry.
    pub fn select_result(&mut self, index: usize) -> bool {
        if !self.state.search_visible {
            return false;
        }
        match self.state.locations.get(index).cloned() {
            Some(location) => {
                self.select_location(location);
                true
            }
            None => false,
        }
    }

    pub fn refresh(&mut self) {
        self.dispatch(Event::Refresh);
    }

    /// Apply one event to the state and start whatever it asks for.
    pub fn dispatch(&mut self, event: Event) {
        if let Event::ForecastLoaded { generation, city, .. } = &event {
            if *generation != self.state.generation {
                debug!(generation, %city, latest = self.state.generation, "dropping stale forecast");
            }
        }

        let state = std::mem::take(&mut self.state);
        let (next, effects) = screen::update(state, event, &self.settings);
        self.state = next;

        for effect in effects {
            self.run(effect);
        }
    }

    /// Wait for the next completion and apply it.
    pub async fn process_next(&mut self) {
        // The controller holds a sender itself, so the channel never closes.
        if let Some(event) = self.events_rx.recv().await {
            self.dispatch(event);
        }
    }

    /// Apply completions until no forecast fetch is outstanding.
    pub async fn settle(&mut self) {
        while self.state.loading() {
            self.process_next().await;
        }
    }

    /// Wait for outstanding last-city writes, e.g. before the process exits.
    pub async fn flush_writes(&mut self) {
        let Some(writer) = &self.writer else { return };
        let (done_tx, done_rx) = oneshot::channel();
        if writer.send(Write::Flush(done_tx)).is_ok() {
            let _ = done_rx.await;
        }
    }

    /// Tear the screen down. Pending searches never fire; late completions are dropped.
    pub fn unmount(mut self) {
        self.search.shutdown();
    }

    fn run(&mut self, effect: Effect) {
        match effect {
            Effect::LoadLastCity => {
                let store = Arc::clone(&self.store);
                let events = self.events_tx.clone();
                tokio::spawn(async move {
                    let city = match store.get(LAST_CITY_KEY).await {
                        Ok(city) => city,
                        Err(e) => {
                            warn!(error = %e, "failed to read last city, using default");
                            None
                        }
                    };
                    let _ = events.send(Event::LastCityLoaded(city));
                });
            }

            Effect::Search(text) => self.search.input(&text),

            Effect::CancelSearch => self.search.cancel_pending(),

            Effect::FetchForecast { generation, request, persist } => {
                let ForecastRequest { city, days } = request;
                info!(%city, days, generation, "fetching forecast");

                let api = Arc::clone(&self.api);
                let events = self.events_tx.clone();
                tokio::spawn(async move {
                    let result = api.get_forecast(&city, days).await;
                    if let Err(e) = &result {
                        warn!(%city, error = %e, "forecast fetch failed");
                    }
                    let _ = events.send(Event::ForecastLoaded { generation, city, persist, result });
                });
            }

            Effect::PersistCity(city) => {
                let _ = self.writer().send(Write::City(city));
            }
        }
    }

    /// Writes go through one task so they land in the order they were requested.
    fn writer(&mut self) -> &UnboundedSender<Write> {
        let store = Arc::clone(&self.store);
        self.writer.get_or_insert_with(|| {
            let (tx, mut rx) = unbounded_channel();
            tokio::spawn(async move {
                while let Some(write) = rx.recv().await {
                    match write {
                        Write::City(city) => {
                            if let Err(e) = store.set(LAST_CITY_KEY, &city).await {
                                warn!(%city, error = %e, "failed to persist last city");
                            }
                        }
                        Write::Flush(done) => {
                            let _ = done.send(());
                        }
                    }
                }
            });
            tx
        })
    }
}
