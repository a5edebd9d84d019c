//! Turns a trip result into display-ready text
//!
//! Exactly one branch is chosen per result: the tabbed structured view when
//! the backend sent a structured itinerary object, otherwise the legacy
//! single-panel view built from the narrative text.

mod legacy;
mod structured;
pub mod text;

pub use legacy::{LegacyView, LegacyWeather, PlaceRow, RestaurantRow, legacy_costs};
pub use structured::{AttractionRow, CostSummary, DayView, DiningRow, StructuredView, WeatherCard};

use tracing::debug;

use crate::domain::TripResult;

/// Placeholder for absent or empty cost fields
pub const NOT_AVAILABLE: &str = "N/A";

/// Placeholder for a missing weather reading
pub const MISSING_READING: &str = "--";

/// Title used when the itinerary has none
pub const DEFAULT_TITLE: &str = "Your Trip";

#[derive(Debug, Clone, PartialEq)]
pub enum Presentation {
    Structured(StructuredView),
    Legacy(LegacyView),
}

/// Pick the branch and build its view
pub fn present(result: &TripResult) -> Presentation {
    match &result.structured_itinerary {
        Some(itinerary) => {
            debug!(attractions = itinerary.attractions.len(), "present: structured branch");
            Presentation::Structured(StructuredView::build(itinerary, result.weather.as_ref()))
        }
        None => {
            debug!(text_len = result.final_itinerary.len(), "present: legacy branch");
            Presentation::Legacy(LegacyView::build(result))
        }
    }
}

/// Tabs of the structured view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ItineraryTab {
    #[default]
    Attractions,
    Dining,
    Plan,
}

impl ItineraryTab {
    pub const ALL: [ItineraryTab; 3] = [ItineraryTab::Attractions, ItineraryTab::Dining, ItineraryTab::Plan];

    pub fn next(self) -> Self {
        match self {
            ItineraryTab::Attractions => ItineraryTab::Dining,
            ItineraryTab::Dining => ItineraryTab::Plan,
            ItineraryTab::Plan => ItineraryTab::Attractions,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            ItineraryTab::Attractions => ItineraryTab::Plan,
            ItineraryTab::Dining => ItineraryTab::Attractions,
            ItineraryTab::Plan => ItineraryTab::Dining,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            ItineraryTab::Attractions => "Explore",
            ItineraryTab::Dining => "Dining",
            ItineraryTab::Plan => "Plan",
        }
    }

    pub fn index(self) -> usize {
        match self {
            ItineraryTab::Attractions => 0,
            ItineraryTab::Dining => 1,
            ItineraryTab::Plan => 2,
        }
    }
}

/// Format a reading the way the backend number would print, or `--`
pub(crate) fn reading(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{}", v),
        _ => MISSING_READING.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::StructuredItinerary;
    use serde_json::json;

    #[test]
    fn test_empty_object_selects_structured() {
        let result: TripResult = serde_json::from_value(json!({
            "destination": "Lima",
            "final_itinerary": "ignored",
            "structured_itinerary": {}
        }))
        .unwrap();

        match present(&result) {
            Presentation::Structured(view) => {
                assert_eq!(view.title, DEFAULT_TITLE);
                assert!(view.attractions.is_empty());
                assert!(view.dining.is_empty());
                assert!(view.days.is_empty());
            }
            other => panic!("expected structured, got {:?}", other),
        }
    }

    #[test]
    fn test_null_and_non_object_select_legacy() {
        for value in [json!(null), json!("text"), json!([1, 2])] {
            let result: TripResult = serde_json::from_value(json!({
                "final_itinerary": "Day 1",
                "structured_itinerary": value
            }))
            .unwrap();
            assert!(matches!(present(&result), Presentation::Legacy(_)));
        }
    }

    #[test]
    fn test_absent_selects_legacy_verbatim() {
        let result = TripResult {
            final_itinerary: "Day 1:\n  Louvre\n\nDay 2:\n  Orsay".to_string(),
            ..TripResult::default()
        };
        match present(&result) {
            Presentation::Legacy(view) => assert_eq!(view.narrative, "Day 1:\n  Louvre\n\nDay 2:\n  Orsay"),
            other => panic!("expected legacy, got {:?}", other),
        }
    }

    #[test]
    fn test_structured_from_itinerary() {
        let result = TripResult {
            structured_itinerary: Some(StructuredItinerary::from_value(json!({ "trip_title": "Oslo Weekend" }))),
            ..TripResult::default()
        };
        let Presentation::Structured(view) = present(&result) else {
            panic!("expected structured");
        };
        assert_eq!(view.title, "Oslo Weekend");
    }

    #[test]
    fn test_tab_cycle() {
        let mut tab = ItineraryTab::default();
        for expected in [ItineraryTab::Dining, ItineraryTab::Plan, ItineraryTab::Attractions] {
            tab = tab.next();
            assert_eq!(tab, expected);
        }
        assert_eq!(ItineraryTab::Attractions.prev(), ItineraryTab::Plan);
        assert_eq!(ItineraryTab::Plan.index(), 2);
    }

    #[test]
    fn test_reading_format() {
        assert_eq!(reading(Some(18.5)), "18.5");
        assert_eq!(reading(Some(20.0)), "20");
        assert_eq!(reading(None), "--");
        assert_eq!(reading(Some(f64::NAN)), "--");
    }
}
