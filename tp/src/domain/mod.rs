//! Wire payloads from the trip-planning backend
//!
//! Every record is optional-field and lenient: a malformed field degrades to a
//! default rather than failing the whole response.

mod itinerary;
pub mod lenient;
mod literal;
mod trip;
mod weather;

pub use itinerary::{Attraction, DayPlan, Dining, ItineraryCosts, StructuredItinerary};
pub use literal::Literal;
pub use trip::{Coordinates, CostEstimate, GeoPoint, Place, RouteData, TripResult};
pub use weather::{CurrentConditions, DailyForecast, LegacyConditions, Reading, WeatherPayload};
