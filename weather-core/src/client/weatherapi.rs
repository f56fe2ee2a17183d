use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::{Deserialize, de::DeserializeOwned};
use std::time::Duration;
use tracing::{debug, instrument};

use crate::{
    error::ApiError,
    model::{CurrentConditions, DayForecast, Forecast, ForecastBundle, Location, LocationInfo},
};

use super::WeatherApi;

pub const WEATHERAPI_BASE: &str = "https://api.weatherapi.com/v1";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct WeatherApiClient {
    api_key: String,
    base_url: String,
    http: Client,
}

impl WeatherApiClient {
    pub fn with_base_url(api_key: String, base_url: &str) -> Result<Self, ApiError> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self { api_key, base_url: base_url.trim_end_matches('/').to_string(), http })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        let url = format!("{}/{}", self.base_url, endpoint);

        let res = self
            .http
            .get(&url)
            .query(&[("key", self.api_key.as_str())])
            .query(query)
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(ApiError::Status { status: status.as_u16(), message: error_message(&body) });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl WeatherApi for WeatherApiClient {
    #[instrument(skip(self), level = "debug")]
    async fn search_locations(&self, query: &str) -> Result<Vec<Location>, ApiError> {
        let hits: Vec<WaSearchHit> = self.get_json("search.json", &[("q", query)]).await?;
        debug!(count = hits.len(), "location search returned");

        Ok(hits.into_iter().map(Location::from).collect())
    }

    #[instrument(skip(self), level = "debug")]
    async fn get_forecast(&self, city: &str, days: u8) -> Result<ForecastBundle, ApiError> {
        let days = days.to_string();
        let parsed: WaForecastResponse = self
            .get_json(
                "forecast.json",
                &[("q", city), ("days", days.as_str()), ("aqi", "no"), ("alerts", "no")],
            )
            .await?;

        Ok(parsed.into())
    }
}

#[derive(Debug, Deserialize)]
struct WaErrorBody {
    error: WaErrorDetail,
}

#[derive(Debug, Deserialize)]
struct WaErrorDetail {
    message: String,
}

#[derive(Debug, Deserialize)]
struct WaSearchHit {
    id: Option<i64>,
    name: String,
    #[serde(default)]
    region: String,
    #[serde(default)]
    country: String,
}

#[derive(Debug, Deserialize)]
struct WaLocation {
    name: String,
    #[serde(default)]
    region: String,
    country: String,
    localtime: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WaCondition {
    text: String,
}

#[derive(Debug, Deserialize)]
struct WaCurrent {
    temp_c: f64,
    feelslike_c: f64,
    humidity: u8,
    wind_kph: f64,
    condition: WaCondition,
}

#[derive(Debug, Deserialize)]
struct WaDay {
    avgtemp_c: f64,
    condition: WaCondition,
}

#[derive(Debug, Deserialize)]
struct WaAstro {
    sunrise: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WaForecastDay {
    date: NaiveDate,
    day: WaDay,
    astro: Option<WaAstro>,
}

#[derive(Debug, Deserialize)]
struct WaForecast {
    forecastday: Vec<WaForecastDay>,
}

#[derive(Debug, Deserialize)]
struct WaForecastResponse {
    location: WaLocation,
    current: WaCurrent,
    forecast: WaForecast,
}

impl From<WaSearchHit> for Location {
    fn from(hit: WaSearchHit) -> Self {
        Self { id: hit.id, name: hit.name, region: hit.region, country: hit.country }
    }
}

impl From<WaForecastResponse> for ForecastBundle {
    fn from(parsed: WaForecastResponse) -> Self {
        let forecastday = parsed
            .forecast
            .forecastday
            .into_iter()
            .map(|d| DayForecast {
                date: d.date,
                avg_temp_c: d.day.avgtemp_c,
                condition: d.day.condition.text,
                sunrise: d.astro.and_then(|a| a.sunrise),
            })
            .collect();

        Self {
            location: LocationInfo {
                name: parsed.location.name,
                region: parsed.location.region,
                country: parsed.location.country,
                localtime: parsed.location.localtime,
            },
            current: CurrentConditions {
                temp_c: parsed.current.temp_c,
                feels_like_c: parsed.current.feelslike_c,
                condition: parsed.current.condition.text,
                wind_kph: parsed.current.wind_kph,
                humidity_pct: parsed.current.humidity,
            },
            forecast: Forecast { forecastday },
        }
    }
}

/// The service wraps failures as `{"error": {"code": .., "message": ..}}`.
fn error_message(body: &str) -> String {
    serde_json::from_str::<WaErrorBody>(body)
        .map(|b| b.error.message)
        .unwrap_or_else(|_| truncate_body(body))
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.chars().count() > MAX {
        format!("{}...", body.chars().take(MAX).collect::<String>())
    } else {
        body.to_string()
    }
}
