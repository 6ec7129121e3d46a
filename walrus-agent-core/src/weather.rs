use crate::{Config, WeatherReport, weather::open_meteo::OpenMeteoProvider};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod open_meteo;

#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn get_weather(&self, location: &str) -> anyhow::Result<WeatherReport>;
}

/// Construct the Open-Meteo provider from the `[weather]` section.
pub fn provider_from_config(config: &Config) -> OpenMeteoProvider {
    OpenMeteoProvider::new(
        config.weather.geocoding_url.clone(),
        config.weather.forecast_url.clone(),
    )
}

/// Human-readable text for a WMO weather interpretation code.
pub fn condition_for_code(code: u32) -> &'static str {
    match code {
        0 => "Clear sky",
        1 => "Mainly clear",
        2 => "Partly cloudy",
        3 => "Overcast",
        45 => "Foggy",
        48 => "Depositing rime fog",
        51 => "Light drizzle",
        53 => "Moderate drizzle",
        55 => "Dense drizzle",
        56 => "Light freezing drizzle",
        57 => "Dense freezing drizzle",
        61 => "Slight rain",
        63 => "Moderate rain",
        65 => "Heavy rain",
        66 => "Light freezing rain",
        67 => "Heavy freezing rain",
        71 => "Slight snow fall",
        73 => "Moderate snow fall",
        75 => "Heavy snow fall",
        77 => "Snow grains",
        80 => "Slight rain showers",
        81 => "Moderate rain showers",
        82 => "Violent rain showers",
        85 => "Slight snow showers",
        86 => "Heavy snow showers",
        95 => "Thunderstorm",
        96 => "Thunderstorm with slight hail",
        99 => "Thunderstorm with heavy hail",
        _ => "Unknown",
    }
}
