//! Trip-planning response and its places

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{Literal, StructuredItinerary, WeatherPayload, lenient};

/// Backend route geometry; retained but not drawn
pub type RouteData = Value;

/// Backend cost matrix; its presence alone enables the cost block
pub type CostEstimate = Value;

/// A finite latitude/longitude pair
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    /// Returns None unless both components are finite
    pub fn new(lat: f64, lon: f64) -> Option<Self> {
        (lat.is_finite() && lon.is_finite()).then_some(Self { lat, lon })
    }
}

/// Resolved destination center
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    #[serde(default = "lenient::nan", deserialize_with = "lenient::coordinate")]
    pub lat: f64,
    #[serde(default = "lenient::nan", deserialize_with = "lenient::coordinate")]
    pub lon: f64,
    #[serde(default, deserialize_with = "lenient::or_default", skip_serializing_if = "Option::is_none")]
    pub formatted: Option<String>,
}

impl Coordinates {
    pub fn point(&self) -> Option<GeoPoint> {
        GeoPoint::new(self.lat, self.lon)
    }
}

/// An attraction or restaurant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::or_default", skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default = "lenient::nan", deserialize_with = "lenient::coordinate")]
    pub lat: f64,
    #[serde(default = "lenient::nan", deserialize_with = "lenient::coordinate")]
    pub lon: f64,
    #[serde(default, deserialize_with = "lenient::list")]
    pub categories: Vec<String>,
    #[serde(default)]
    pub rating: Literal,
}

impl Place {
    /// A place with just a name and position
    pub fn new(name: impl Into<String>, lat: f64, lon: f64) -> Self {
        Self {
            name: name.into(),
            address: None,
            lat,
            lon,
            categories: Vec::new(),
            rating: Literal::default(),
        }
    }

    /// Plottable position, if the coordinates are finite
    pub fn point(&self) -> Option<GeoPoint> {
        GeoPoint::new(self.lat, self.lon)
    }
}

/// Successful response from `POST /api/plan_trip`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TripResult {
    #[serde(default, deserialize_with = "lenient::text")]
    pub destination: String,

    #[serde(default, deserialize_with = "lenient::or_default", skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,

    #[serde(default, deserialize_with = "lenient::text")]
    pub final_itinerary: String,

    /// Present whenever the backend sent a JSON object, even `{}`
    #[serde(default, deserialize_with = "lenient::object", skip_serializing_if = "Option::is_none")]
    pub structured_itinerary: Option<StructuredItinerary>,

    #[serde(default, deserialize_with = "lenient::or_default", skip_serializing_if = "Option::is_none")]
    pub weather: Option<WeatherPayload>,

    #[serde(default, deserialize_with = "lenient::list")]
    pub places: Vec<Place>,

    #[serde(default, deserialize_with = "lenient::list")]
    pub restaurants: Vec<Place>,

    #[serde(default, deserialize_with = "lenient::or_default", skip_serializing_if = "Option::is_none")]
    pub route: Option<RouteData>,

    #[serde(default, deserialize_with = "lenient::or_default", skip_serializing_if = "Option::is_none")]
    pub costs: Option<CostEstimate>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_backend_payload_parses() {
        let result: TripResult = serde_json::from_value(json!({
            "destination": "Paris",
            "coordinates": { "lat": 48.8566, "lon": 2.3522, "formatted": "Paris, France" },
            "final_itinerary": "Day 1: Louvre\nDay 2: Orsay",
            "structured_itinerary": null,
            "weather": { "current": { "temperature_2m": 14.2, "wind_speed_10m": 11.0 } },
            "places": [
                { "name": "Louvre", "address": "Rue de Rivoli", "lat": 48.8606, "lon": 2.3376, "categories": ["museum"] }
            ],
            "restaurants": [ { "name": "Le Procope", "lat": 48.853, "lon": 2.339, "rating": 4.3 } ],
            "route": { "routes": [] },
            "costs": {}
        }))
        .unwrap();

        assert_eq!(result.destination, "Paris");
        assert_eq!(result.coordinates.as_ref().and_then(Coordinates::point).unwrap().lat, 48.8566);
        assert!(result.structured_itinerary.is_none());
        assert_eq!(result.places.len(), 1);
        assert_eq!(result.places[0].categories, vec!["museum"]);
        assert_eq!(result.restaurants[0].rating.to_string(), "4.3");
        assert!(result.costs.is_some());
    }

    #[test]
    fn test_nulls_everywhere() {
        let result: TripResult = serde_json::from_value(json!({
            "destination": "Nowhere",
            "coordinates": null,
            "final_itinerary": null,
            "weather": null,
            "places": null,
            "restaurants": null,
            "route": null,
            "costs": null
        }))
        .unwrap();
        assert_eq!(result.final_itinerary, "");
        assert!(result.coordinates.is_none());
        assert!(result.places.is_empty());
        assert!(result.costs.is_none());
    }

    #[test]
    fn test_place_with_missing_coordinates_is_kept_but_unplottable() {
        let result: TripResult = serde_json::from_value(json!({
            "places": [ { "name": "Somewhere" }, { "name": "Here", "lat": 1, "lon": 2 } ]
        }))
        .unwrap();
        assert_eq!(result.places.len(), 2);
        assert!(result.places[0].point().is_none());
        assert_eq!(result.places[1].point(), GeoPoint::new(1.0, 2.0));
    }

    #[test]
    fn test_structured_itinerary_presence() {
        let empty: TripResult = serde_json::from_value(json!({ "structured_itinerary": {} })).unwrap();
        assert!(empty.structured_itinerary.is_some());

        let text: TripResult = serde_json::from_value(json!({ "structured_itinerary": "oops" })).unwrap();
        assert!(text.structured_itinerary.is_none());
    }

    #[test]
    fn test_geo_point_rejects_non_finite() {
        assert!(GeoPoint::new(f64::NAN, 1.0).is_none());
        assert!(GeoPoint::new(1.0, f64::INFINITY).is_none());
        assert!(GeoPoint::new(0.0, 0.0).is_some());
    }
}
