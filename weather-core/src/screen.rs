//! Screen state and its pure transition function.
//!
//! Every handler of the weather screen is an [`Event`] fed to [`update`], which
//! returns the next state plus the side effects the controller must start. The
//! reducer performs no I/O.
//!
//! Rendering follows [`Phase`]: `Loading` shows only a spinner, `Ready` shows
//! the search bar and the forecast, `Failed` shows the search bar and an error.
//! A fetch start moves any phase to `Loading`; only a forecast completion
//! leaves it.

use crate::{
    config::ScreenSettings,
    error::ApiError,
    model::{ForecastBundle, ForecastRequest, Location},
};

#[derive(Debug, Clone, PartialEq, Default)]
pub enum Phase {
    #[default]
    Loading,
    Ready,
    Failed {
        message: String,
    },
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ScreenState {
    pub search_visible: bool,
    pub locations: Vec<Location>,
    pub weather: Option<ForecastBundle>,
    pub phase: Phase,
    /// Incremented on every forecast fetch; completions tagged with an older
    /// value are discarded.
    pub generation: u64,
    /// City of the latest forecast fetch.
    pub city: Option<String>,
}

impl ScreenState {
    pub fn loading(&self) -> bool {
        self.phase == Phase::Loading
    }

    /// The forecast to display, never exposed while a fetch is outstanding.
    pub fn weather_for_display(&self) -> Option<&ForecastBundle> {
        if self.loading() { None } else { self.weather.as_ref() }
    }
}

#[derive(Debug)]
pub enum Event {
    /// The screen was shown for the first time.
    Mounted,
    LastCityLoaded(Option<String>),
    SearchTextChanged(String),
    ToggleSearch,
    LocationsFound {
        query: String,
        locations: Vec<Location>,
    },
    SelectLocation(Location),
    /// Reload the forecast for the current city.
    Refresh,
    ForecastLoaded {
        generation: u64,
        city: String,
        persist: bool,
        result: Result<ForecastBundle, ApiError>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    LoadLastCity,
    Search(String),
    /// Drop any debounced lookup that has not delivered yet.
    CancelSearch,
    FetchForecast {
        generation: u64,
        request: ForecastRequest,
        /// Store the city as the last city once the fetch succeeds.
        persist: bool,
    },
    PersistCity(String),
}

/// Apply `event` to `state`, returning the next state and the effects to run.
pub fn update(
    mut state: ScreenState,
    event: Event,
    settings: &ScreenSettings,
) -> (ScreenState, Vec<Effect>) {
    match event {
        Event::Mounted => {
            if state.generation == 0 && state.loading() {
                (state, vec![Effect::LoadLastCity])
            } else {
                (state, Vec::new())
            }
        }

        Event::LastCityLoaded(stored) => {
            let city = stored
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty())
                .unwrap_or_else(|| settings.default_city.clone());
            begin_fetch(state, city, false, settings)
        }

        Event::SearchTextChanged(text) => (state, vec![Effect::Search(text)]),

        Event::ToggleSearch => {
            state.search_visible = !state.search_visible;
            (state, Vec::new())
        }

        Event::LocationsFound { locations, .. } => {
            state.locations = locations;
            (state, Vec::new())
        }

        Event::SelectLocation(location) => {
            state.search_visible = false;
            let (state, fetch) = begin_fetch(state, location.name, true, settings);
            let effects = std::iter::once(Effect::CancelSearch).chain(fetch).collect();
            (state, effects)
        }

        Event::Refresh => match state.city.clone() {
            Some(city) if !state.loading() => begin_fetch(state, city, false, settings),
            _ => (state, Vec::new()),
        },

        Event::ForecastLoaded { generation, city, persist, result } => {
            if generation != state.generation {
                return (state, Vec::new());
            }

            match result {
                Ok(bundle) => {
                    state.phase = Phase::Ready;
                    state.weather = Some(bundle);
                    let effects = if persist { vec![Effect::PersistCity(city)] } else { Vec::new() };
                    (state, effects)
                }
                Err(e) => {
                    state.phase = Phase::Failed { message: e.user_message() };
                    (state, Vec::new())
                }
            }
        }
    }
}

fn begin_fetch(
    mut state: ScreenState,
    city: String,
    persist: bool,
    settings: &ScreenSettings,
) -> (ScreenState, Vec<Effect>) {
    state.generation += 1;
    state.phase = Phase::Loading;
    state.locations.clear();
    state.city = Some(city.clone());

    let effect = Effect::FetchForecast {
        generation: state.generation,
        request: ForecastRequest { city, days: settings.forecast_days },
        persist,
    };
    (state, vec![effect])
}
