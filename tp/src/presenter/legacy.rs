//! Single-panel view for results without a structured itinerary

use crate::domain::{Place, TripResult, WeatherPayload};

use super::reading;

/// Forecast days shown in the legacy weather strip
const FORECAST_DAYS: usize = 3;

/// The cost block is a fixed estimate; only its presence depends on the result
const LEGACY_COSTS: [(&str, &str); 4] = [
    ("Walking Distance", "~5 km"),
    ("Transit Cost", "$5 - $10"),
    ("Taxi Estimate", "$25 - $40"),
    ("Total Time", "~45 mins"),
];

#[derive(Debug, Clone, PartialEq)]
pub struct LegacyView {
    pub weather: Option<LegacyWeather>,
    /// Backend narrative, verbatim
    pub narrative: String,
    pub attractions: Vec<PlaceRow>,
    pub restaurants: Vec<RestaurantRow>,
    pub costs: Option<Vec<(&'static str, &'static str)>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyWeather {
    pub temperature: String,
    pub wind: String,
    /// ("Day 1", "21") pairs, at most three
    pub forecast: Vec<(String, String)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceRow {
    pub name: String,
    pub address: String,
    pub categories: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestaurantRow {
    pub name: String,
    pub address: String,
    pub rating: String,
}

/// The fixed cost breakdown rows
pub fn legacy_costs() -> Vec<(&'static str, &'static str)> {
    LEGACY_COSTS.to_vec()
}

impl LegacyView {
    pub fn build(result: &TripResult) -> Self {
        Self {
            weather: result.weather.as_ref().map(LegacyWeather::from_payload),
            narrative: result.final_itinerary.clone(),
            attractions: result.places.iter().map(PlaceRow::from_place).collect(),
            restaurants: result.restaurants.iter().map(RestaurantRow::from_place).collect(),
            costs: result.costs.as_ref().map(|_| legacy_costs()),
        }
    }
}

impl LegacyWeather {
    fn from_payload(payload: &WeatherPayload) -> Self {
        let current = payload.reading().unwrap_or_default();
        let forecast = payload
            .forecast_highs(FORECAST_DAYS)
            .into_iter()
            .enumerate()
            .map(|(i, high)| (format!("Day {}", i + 1), reading(high)))
            .collect();
        Self {
            temperature: reading(current.temperature),
            wind: reading(current.wind_speed),
            forecast,
        }
    }
}

impl PlaceRow {
    fn from_place(place: &Place) -> Self {
        Self {
            name: place.name.clone(),
            address: place.address.clone().unwrap_or_default(),
            categories: place.categories.clone(),
        }
    }
}

impl RestaurantRow {
    fn from_place(place: &Place) -> Self {
        Self {
            name: place.name.clone(),
            address: place.address.clone().unwrap_or_default(),
            rating: place.rating.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn result(raw: serde_json::Value) -> TripResult {
        serde_json::from_value(raw).unwrap()
    }

    #[test]
    fn test_weather_with_missing_values() {
        let view = LegacyView::build(&result(json!({
            "weather": {
                "current": { "wind_speed_10m": 12.5 },
                "daily": { "temperature_2m_max": [21.0, null, 19.5, 25.0] }
            }
        })));
        let weather = view.weather.unwrap();
        assert_eq!(weather.temperature, "--");
        assert_eq!(weather.wind, "12.5");
        assert_eq!(
            weather.forecast,
            vec![
                ("Day 1".to_string(), "21".to_string()),
                ("Day 2".to_string(), "--".to_string()),
                ("Day 3".to_string(), "19.5".to_string()),
            ]
        );
    }

    #[test]
    fn test_no_weather_no_strip() {
        let view = LegacyView::build(&TripResult::default());
        assert!(view.weather.is_none());
        assert!(view.costs.is_none());
    }

    #[test]
    fn test_costs_block_is_fixed() {
        let view = LegacyView::build(&result(json!({ "costs": { "anything": 1 } })));
        let costs = view.costs.unwrap();
        assert_eq!(costs.len(), 4);
        assert_eq!(costs[0], ("Walking Distance", "~5 km"));
        assert_eq!(costs[3], ("Total Time", "~45 mins"));
    }

    #[test]
    fn test_grids() {
        let view = LegacyView::build(&result(json!({
            "places": [{ "name": "Louvre", "address": "Rue de Rivoli", "lat": 48.86, "lon": 2.33, "categories": ["museum"] }],
            "restaurants": [{ "name": "Bistro", "lat": 48.85, "lon": 2.34, "rating": 4.2 }]
        })));
        assert_eq!(view.attractions[0].categories, vec!["museum"]);
        assert_eq!(view.restaurants[0].rating, "4.2");
        assert_eq!(view.restaurants[0].address, "");
    }
}
