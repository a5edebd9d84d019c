//! Tabbed view over a structured itinerary

use std::cmp::Ordering;

use crate::domain::{DayPlan, Literal, StructuredItinerary, WeatherPayload};

use super::{DEFAULT_TITLE, NOT_AVAILABLE, reading};

#[derive(Debug, Clone, PartialEq)]
pub struct StructuredView {
    pub title: String,
    /// Only when the weather payload has a current reading
    pub weather: Option<WeatherCard>,
    pub summary: Option<String>,
    pub attractions: Vec<AttractionRow>,
    pub dining: Vec<DiningRow>,
    pub costs: CostSummary,
    /// Ordered by numeric day; non-numeric days last
    pub days: Vec<DayView>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeatherCard {
    pub temperature: String,
    pub wind: String,
    pub today_high: String,
    pub today_low: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttractionRow {
    pub name: String,
    pub rating: Option<String>,
    pub visit_order: Option<String>,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiningRow {
    pub name: String,
    pub cuisine: Option<String>,
    pub rating: Option<String>,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CostSummary {
    pub transport: String,
    pub total: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayView {
    pub label: String,
    pub activities: Vec<String>,
}

impl StructuredView {
    pub fn build(itinerary: &StructuredItinerary, weather: Option<&WeatherPayload>) -> Self {
        let title = match itinerary.trip_title.trim() {
            "" => DEFAULT_TITLE.to_string(),
            _ => itinerary.trip_title.clone(),
        };
        let summary = Some(itinerary.weather_summary.trim())
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        let attractions = itinerary
            .attractions
            .iter()
            .map(|a| AttractionRow {
                name: a.name.clone(),
                rating: shown(&a.rating),
                visit_order: shown(&a.visit_order),
                description: a.description.clone(),
            })
            .collect();

        let dining = itinerary
            .dining
            .iter()
            .map(|d| DiningRow {
                name: d.name.clone(),
                cuisine: Some(d.cuisine.trim()).filter(|c| !c.is_empty()).map(str::to_string),
                rating: shown(&d.rating),
                description: d.description.clone(),
            })
            .collect();

        Self {
            title,
            weather: weather.and_then(WeatherCard::from_payload),
            summary,
            attractions,
            dining,
            costs: CostSummary {
                transport: itinerary.costs.transport_estimate.or(NOT_AVAILABLE),
                total: itinerary.costs.total_estimate.or(NOT_AVAILABLE),
            },
            days: ordered_days(&itinerary.daily_plan),
        }
    }
}

impl WeatherCard {
    fn from_payload(payload: &WeatherPayload) -> Option<Self> {
        let current = payload.reading()?;
        let (high, low) = payload.today_range();
        Some(Self {
            temperature: reading(current.temperature),
            wind: reading(current.wind_speed),
            today_high: reading(high),
            today_low: reading(low),
        })
    }
}

fn shown(value: &Literal) -> Option<String> {
    (!value.is_blank()).then(|| value.to_string())
}

fn day_number(plan: &DayPlan) -> Option<f64> {
    plan.day.as_f64().filter(|d| d.is_finite())
}

fn ordered_days(plans: &[DayPlan]) -> Vec<DayView> {
    let mut sorted: Vec<&DayPlan> = plans.iter().collect();
    // Stable, so equal and non-numeric days keep their input order
    sorted.sort_by(|a, b| match (day_number(a), day_number(b)) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
    sorted
        .into_iter()
        .map(|plan| DayView {
            label: format!("Day {}", plan.day),
            activities: plan.activities.clone(),
        })
        .collect()
}
