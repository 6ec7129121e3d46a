use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::{http::truncate_body, model::WeatherReport, weather::condition_for_code};

use super::WeatherProvider;

const CURRENT_FIELDS: &str = "temperature_2m,apparent_temperature,relative_humidity_2m,\
                              wind_speed_10m,wind_gusts_10m,weather_code";

/// Keyless provider backed by the Open-Meteo geocoding and forecast APIs.
#[derive(Debug, Clone)]
pub struct OpenMeteoProvider {
    geocoding_url: String,
    forecast_url: String,
    http: Client,
}

impl OpenMeteoProvider {
    pub fn new(geocoding_url: String, forecast_url: String) -> Self {
        Self { geocoding_url, forecast_url, http: Client::new() }
    }

    pub fn geocoding_url(&self) -> &str {
        &self.geocoding_url
    }

    async fn geocode(&self, location: &str) -> Result<OmPlace> {
        debug!(location, "geocoding");

        let res = self
            .http
            .get(&self.geocoding_url)
            .query(&[("name", location), ("count", "1")])
            .send()
            .await
            .context("Failed to send request to Open-Meteo (geocoding)")?;

        let status = res.status();
        let body = res.text().await.context("Failed to read Open-Meteo geocoding response body")?;

        if !status.is_success() {
            return Err(anyhow!(
                "Open-Meteo geocoding request failed with status {}: {}",
                status,
                truncate_body(&body),
            ));
        }

        let parsed: OmGeocodingResponse =
            serde_json::from_str(&body).context("Failed to parse Open-Meteo geocoding JSON")?;

        parsed
            .results
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("Location '{location}' not found"))
    }

    async fn fetch_current(&self, place: &OmPlace) -> Result<OmCurrent> {
        debug!(name = %place.name, lat = place.latitude, lon = place.longitude, "fetching current conditions");

        let res = self
            .http
            .get(&self.forecast_url)
            .query(&[
                ("latitude", place.latitude.to_string()),
                ("longitude", place.longitude.to_string()),
                ("current", CURRENT_FIELDS.to_string()),
            ])
            .send()
            .await
            .context("Failed to send request to Open-Meteo (forecast)")?;

        let status = res.status();
        let body = res.text().await.context("Failed to read Open-Meteo forecast response body")?;

        if !status.is_success() {
            return Err(anyhow!(
                "Open-Meteo forecast request failed with status {}: {}",
                status,
                truncate_body(&body),
            ));
        }

        let parsed: OmForecastResponse =
            serde_json::from_str(&body).context("Failed to parse Open-Meteo forecast JSON")?;

        Ok(parsed.current)
    }
}

#[derive(Debug, Deserialize)]
struct OmPlace {
    latitude: f64,
    longitude: f64,
    name: String,
}

#[derive(Debug, Deserialize)]
struct OmGeocodingResponse {
    // Omitted entirely when nothing matches.
    #[serde(default)]
    results: Vec<OmPlace>,
}

#[derive(Debug, Deserialize)]
struct OmCurrent {
    temperature_2m: f64,
    apparent_temperature: f64,
    relative_humidity_2m: f64,
    wind_speed_10m: f64,
    wind_gusts_10m: f64,
    weather_code: u32,
}

#[derive(Debug, Deserialize)]
struct OmForecastResponse {
    current: OmCurrent,
}

#[async_trait]
impl WeatherProvider for OpenMeteoProvider {
    async fn get_weather(&self, location: &str) -> Result<WeatherReport> {
        let place = self.geocode(location).await?;
        let current = self.fetch_current(&place).await?;

        Ok(WeatherReport {
            temperature: current.temperature_2m,
            feels_like: current.apparent_temperature,
            humidity: current.relative_humidity_2m,
            wind_speed: current.wind_speed_10m,
            wind_gust: current.wind_gusts_10m,
            conditions: condition_for_code(current.weather_code).to_string(),
            location: place.name,
        })
    }
}
