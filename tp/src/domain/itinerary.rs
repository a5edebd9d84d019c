//! Structured itinerary produced by the backend's synthesizer
//!
//! The typed fields drive the tabbed view. The original JSON object is kept
//! verbatim because it is what the chat assistant receives as context.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use tracing::debug;

use super::{Literal, lenient};

/// Tab-oriented itinerary (attractions, dining, daily plan)
#[derive(Debug, Clone, PartialEq)]
pub struct StructuredItinerary {
    pub trip_title: String,
    pub weather_summary: String,
    pub attractions: Vec<Attraction>,
    pub dining: Vec<Dining>,
    pub daily_plan: Vec<DayPlan>,
    pub costs: ItineraryCosts,
    raw: Value,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Attraction {
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub description: String,
    #[serde(default)]
    pub rating: Literal,
    #[serde(default)]
    pub visit_order: Literal,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dining {
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub description: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub cuisine: String,
    #[serde(default)]
    pub rating: Literal,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DayPlan {
    #[serde(default)]
    pub day: Literal,
    #[serde(default, deserialize_with = "lenient::list")]
    pub activities: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItineraryCosts {
    #[serde(default)]
    pub transport_estimate: Literal,
    #[serde(default)]
    pub total_estimate: Literal,
}

/// Typed view over the raw object; every field degrades on its own
#[derive(Deserialize)]
struct Fields {
    #[serde(default, deserialize_with = "lenient::text")]
    trip_title: String,
    #[serde(default, deserialize_with = "lenient::text")]
    weather_summary: String,
    #[serde(default, deserialize_with = "lenient::list")]
    attractions: Vec<Attraction>,
    #[serde(default, deserialize_with = "lenient::list")]
    dining: Vec<Dining>,
    #[serde(default, deserialize_with = "lenient::list")]
    daily_plan: Vec<DayPlan>,
    #[serde(default, deserialize_with = "lenient::or_default")]
    costs: ItineraryCosts,
}

impl StructuredItinerary {
    /// Build from a JSON value, keeping the value as the chat context
    pub fn from_value(raw: Value) -> Self {
        let fields: Option<Fields> = serde_json::from_value(raw.clone())
            .map_err(|e| debug!(error = %e, "StructuredItinerary::from_value: unreadable object"))
            .ok();
        match fields {
            Some(f) => Self {
                trip_title: f.trip_title,
                weather_summary: f.weather_summary,
                attractions: f.attractions,
                dining: f.dining,
                daily_plan: f.daily_plan,
                costs: f.costs,
                raw,
            },
            None => Self {
                raw,
                ..Self::default()
            },
        }
    }

    /// The itinerary exactly as received
    pub fn context(&self) -> &Value {
        &self.raw
    }

    /// True when none of the tab sources has content
    pub fn is_empty(&self) -> bool {
        self.attractions.is_empty() && self.dining.is_empty() && self.daily_plan.is_empty()
    }
}

impl Default for StructuredItinerary {
    fn default() -> Self {
        Self {
            trip_title: String::new(),
            weather_summary: String::new(),
            attractions: Vec::new(),
            dining: Vec::new(),
            daily_plan: Vec::new(),
            costs: ItineraryCosts::default(),
            raw: Value::Object(serde_json::Map::new()),
        }
    }
}

impl Serialize for StructuredItinerary {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.raw.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for StructuredItinerary {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Self::from_value(Value::deserialize(deserializer)?))
    }
}
