//! Weather payload as forwarded from Open-Meteo
//!
//! The backend has shipped two shapes over time: the `current` block
//! (`temperature_2m`, `wind_speed_10m`) and the older `current_weather` block
//! (`temperature`, `windspeed`). Both are accepted; `current` wins when both exist.

use serde::{Deserialize, Serialize};

use super::lenient;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeatherPayload {
    #[serde(default, deserialize_with = "lenient::or_default", skip_serializing_if = "Option::is_none")]
    pub current: Option<CurrentConditions>,

    #[serde(default, deserialize_with = "lenient::or_default", skip_serializing_if = "Option::is_none")]
    pub current_weather: Option<LegacyConditions>,

    #[serde(default, deserialize_with = "lenient::or_default", skip_serializing_if = "Option::is_none")]
    pub daily: Option<DailyForecast>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub temperature_2m: Option<f64>,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub wind_speed_10m: Option<f64>,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub weather_code: Option<i64>,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub precipitation: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LegacyConditions {
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub temperature: Option<f64>,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub windspeed: Option<f64>,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub weathercode: Option<i64>,
}

/// Daily series; entries may be null so each slot is optional
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DailyForecast {
    #[serde(default, deserialize_with = "lenient::list")]
    pub time: Vec<String>,
    #[serde(default, deserialize_with = "lenient::list")]
    pub temperature_2m_max: Vec<Option<f64>>,
    #[serde(default, deserialize_with = "lenient::list")]
    pub temperature_2m_min: Vec<Option<f64>>,
    #[serde(default, deserialize_with = "lenient::list")]
    pub precipitation_probability_max: Vec<Option<f64>>,
}

/// Current temperature (°C) and wind (km/h), normalized across payload shapes
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Reading {
    pub temperature: Option<f64>,
    pub wind_speed: Option<f64>,
}

impl WeatherPayload {
    /// Current reading from whichever block is present
    pub fn reading(&self) -> Option<Reading> {
        if let Some(current) = &self.current {
            return Some(Reading {
                temperature: current.temperature_2m,
                wind_speed: current.wind_speed_10m,
            });
        }
        self.current_weather.as_ref().map(|legacy| Reading {
            temperature: legacy.temperature,
            wind_speed: legacy.windspeed,
        })
    }

    /// Today's (max, min)
    pub fn today_range(&self) -> (Option<f64>, Option<f64>) {
        match &self.daily {
            Some(daily) => (
                daily.temperature_2m_max.first().copied().flatten(),
                daily.temperature_2m_min.first().copied().flatten(),
            ),
            None => (None, None),
        }
    }

    /// Up to `days` forecast highs, in order
    pub fn forecast_highs(&self, days: usize) -> Vec<Option<f64>> {
        self.daily
            .as_ref()
            .map(|d| d.temperature_2m_max.iter().take(days).copied().collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_current_block_preferred() {
        let weather: WeatherPayload = serde_json::from_value(json!({
            "current": { "temperature_2m": 18.5, "wind_speed_10m": 9.2 },
            "current_weather": { "temperature": 1.0, "windspeed": 2.0 }
        }))
        .unwrap();
        let reading = weather.reading().unwrap();
        assert_eq!(reading.temperature, Some(18.5));
        assert_eq!(reading.wind_speed, Some(9.2));
    }

    #[test]
    fn test_legacy_block_fallback() {
        let weather: WeatherPayload = serde_json::from_value(json!({
            "current_weather": { "temperature": 12.0, "windspeed": 4.0, "weathercode": 3 }
        }))
        .unwrap();
        let reading = weather.reading().unwrap();
        assert_eq!(reading.temperature, Some(12.0));
        assert_eq!(reading.wind_speed, Some(4.0));
    }

    #[test]
    fn test_error_payload_has_no_reading() {
        let weather: WeatherPayload = serde_json::from_value(json!({ "error": "No coordinates" })).unwrap();
        assert!(weather.reading().is_none());
        assert_eq!(weather.today_range(), (None, None));
        assert!(weather.forecast_highs(3).is_empty());
    }

    #[test]
    fn test_forecast_highs_keeps_null_slots() {
        let weather: WeatherPayload = serde_json::from_value(json!({
            "daily": { "temperature_2m_max": [20.1, null, 22.4, 23.0], "temperature_2m_min": [11.0] }
        }))
        .unwrap();
        assert_eq!(weather.forecast_highs(3), vec![Some(20.1), None, Some(22.4)]);
        assert_eq!(weather.today_range(), (Some(20.1), Some(11.0)));
    }
}
