use crate::{
    Config,
    error::ApiError,
    model::{ForecastBundle, Location},
};
use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc};

pub mod weatherapi;

pub use weatherapi::WeatherApiClient;

/// Remote weather service as seen by the screen: location search and forecasts.
///
/// No retry or local validation happens behind this trait; callers decide what a
/// failure means for the screen.
#[async_trait]
pub trait WeatherApi: Send + Sync + Debug {
    async fn search_locations(&self, query: &str) -> Result<Vec<Location>, ApiError>;

    async fn get_forecast(&self, city: &str, days: u8) -> Result<ForecastBundle, ApiError>;
}

/// Construct the weatherapi.com client from config.
pub fn client_from_config(config: &Config) -> anyhow::Result<Arc<dyn WeatherApi>> {
    let api_key = config.api_key()?;
    let client = WeatherApiClient::with_base_url(api_key.to_owned(), config.base_url())?;
    Ok(Arc::new(client))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_from_config_errors_when_missing_api_key() {
        let cfg = Config::default();
        let err = client_from_config(&cfg).unwrap_err();

        let msg = err.to_string();
        assert!(msg.contains("No API key configured"));
        assert!(msg.contains("Hint: run `weather configure`"));
    }

    #[test]
    fn client_from_config_works_when_configured() {
        let cfg = Config { api_key: Some("KEY".into()), ..Config::default() };
        assert!(client_from_config(&cfg).is_ok());
    }
}
