//! Shared fixtures for unit tests.

use anyhow::bail;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::{collections::HashMap, sync::Mutex, time::Duration};

use crate::{
    client::WeatherApi,
    error::ApiError,
    model::{
        CurrentConditions, DayForecast, Forecast, ForecastBundle, ForecastRequest, Location,
        LocationInfo,
    },
    storage::{KeyValueStore, MemoryStore},
};

pub fn location(name: &str, country: &str) -> Location {
    Location { id: None, name: name.into(), region: String::new(), country: country.into() }
}

pub fn bundle_for(city: &str) -> ForecastBundle {
    let start = NaiveDate::from_ymd_opt(2024, 6, 3).expect("valid date");
    let forecastday = (0..3)
        .map(|i| DayForecast {
            date: start + chrono::Days::new(i),
            avg_temp_c: 20.0 + i as f64,
            condition: "Sunny".into(),
            sunrise: Some("05:01 AM".into()),
        })
        .collect();

    ForecastBundle {
        location: LocationInfo {
            name: city.into(),
            region: String::new(),
            country: "Testland".into(),
            localtime: None,
        },
        current: CurrentConditions {
            temp_c: 21.5,
            feels_like_c: 22.0,
            condition: "Partly cloudy".into(),
            wind_kph: 11.2,
            humidity_pct: 40,
        },
        forecast: Forecast { forecastday },
    }
}

/// In-memory weather service that records every call.
#[derive(Debug, Default)]
pub struct FakeApi {
    searches: Mutex<Vec<String>>,
    forecasts: Mutex<Vec<ForecastRequest>>,
    results: Vec<Location>,
    fail_searches: bool,
    fail_forecasts: bool,
    delays: HashMap<String, Duration>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_results(mut self, results: Vec<Location>) -> Self {
        self.results = results;
        self
    }

    pub fn failing_searches(mut self) -> Self {
        self.fail_searches = true;
        self
    }

    pub fn failing_forecasts(mut self) -> Self {
        self.fail_forecasts = true;
        self
    }

    /// Delay forecast responses for `city`.
    pub fn with_delay(mut self, city: &str, delay: Duration) -> Self {
        self.delays.insert(city.into(), delay);
        self
    }

    pub fn searches(&self) -> Vec<String> {
        self.searches.lock().unwrap().clone()
    }

    pub fn forecasts(&self) -> Vec<ForecastRequest> {
        self.forecasts.lock().unwrap().clone()
    }
}

#[async_trait]
impl WeatherApi for FakeApi {
    async fn search_locations(&self, query: &str) -> Result<Vec<Location>, ApiError> {
        self.searches.lock().unwrap().push(query.to_string());
        if self.fail_searches {
            return Err(ApiError::Status { status: 503, message: "Service unavailable".into() });
        }
        Ok(self.results.clone())
    }

    async fn get_forecast(&self, city: &str, days: u8) -> Result<ForecastBundle, ApiError> {
        self.forecasts.lock().unwrap().push(ForecastRequest { city: city.into(), days });
        if let Some(delay) = self.delays.get(city) {
            tokio::time::sleep(*delay).await;
        }
        if self.fail_forecasts {
            return Err(ApiError::Status { status: 503, message: "Service unavailable".into() });
        }
        Ok(bundle_for(city))
    }
}

/// Store whose every read and write fails.
#[derive(Debug, Default)]
pub struct BrokenStore;

#[async_trait]
impl KeyValueStore for BrokenStore {
    async fn get(&self, _key: &str) -> anyhow::Result<Option<String>> {
        bail!("store unavailable")
    }

    async fn set(&self, _key: &str, _value: &str) -> anyhow::Result<()> {
        bail!("store unavailable")
    }
}

/// Memory store that takes longer to write some values.
#[derive(Debug, Default)]
pub struct SlowStore {
    inner: MemoryStore,
    delays: HashMap<String, Duration>,
}

impl SlowStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay writes of `value`.
    pub fn with_delay(mut self, value: &str, delay: Duration) -> Self {
        self.delays.insert(value.into(), delay);
        self
    }
}

#[async_trait]
impl KeyValueStore for SlowStore {
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> anyhow::Result<()> {
        if let Some(delay) = self.delays.get(value) {
            tokio::time::sleep(*delay).await;
        }
        self.inner.set(key, value).await
    }
}
