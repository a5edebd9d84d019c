//! Pure projection of a trip result into a map scene

use std::collections::HashMap;
use std::fmt;

use tracing::{debug, trace};

use super::MapSettings;
use crate::domain::{GeoPoint, Literal, Place, RouteData, TripResult};

/// What a marker stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkerKind {
    /// Numbered badge, full opacity
    Attraction,
    /// Plain pin, reduced opacity
    Restaurant,
}

/// Stable marker identity across scene updates
///
/// Derived from kind, name and position rather than list index, so an
/// unchanged place keeps its key when neighbours come and go.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MarkerKey(String);

impl fmt::Display for MarkerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub key: MarkerKey,
    pub kind: MarkerKind,
    /// Badge number for attractions: position in the input sequence, 1-based
    pub label: Option<usize>,
    pub position: GeoPoint,
    pub name: String,
    pub address: Option<String>,
    pub rating: Literal,
}

impl Marker {
    /// Popup text shown when the marker is selected
    pub fn popup_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        match (self.kind, self.label) {
            (MarkerKind::Attraction, Some(n)) => lines.push(format!("{}. {}", n, self.name)),
            _ => lines.push(format!("🍽 {}", self.name)),
        }
        if let Some(address) = self.address.as_deref().filter(|a| !a.is_empty()) {
            lines.push(address.to_string());
        }
        if self.kind == MarkerKind::Restaurant {
            lines.push(format!("Rating: {}", self.rating));
        }
        lines
    }
}

/// Renderer inputs
#[derive(Debug, Clone, Copy)]
pub struct MapInput<'a> {
    pub places: &'a [Place],
    pub restaurants: &'a [Place],
    /// Accepted for completeness; the path is drawn from attraction coordinates
    pub route: Option<&'a RouteData>,
    pub center: Option<GeoPoint>,
}

impl<'a> MapInput<'a> {
    /// Inputs for a result, with the center resolved by [`resolve_center`]
    pub fn from_result(result: &'a TripResult) -> Self {
        Self {
            places: &result.places,
            restaurants: &result.restaurants,
            route: result.route.as_ref(),
            center: resolve_center(result),
        }
    }
}

/// Center policy: resolved coordinates, else the first attraction, else none
pub fn resolve_center(result: &TripResult) -> Option<GeoPoint> {
    let center = result
        .coordinates
        .as_ref()
        .and_then(|c| c.point())
        .or_else(|| result.places.first().and_then(Place::point));
    debug!(?center, "resolve_center: resolved");
    center
}

/// Everything the map draws for one result
#[derive(Debug, Clone, PartialEq)]
pub struct MapScene {
    pub center: GeoPoint,
    pub zoom: u8,
    pub attractions: Vec<Marker>,
    pub restaurants: Vec<Marker>,
    /// Straight-line path through attraction positions; empty unless 2+ points
    pub path: Vec<GeoPoint>,
}

impl MapScene {
    /// Attractions first, then restaurants
    pub fn markers(&self) -> impl Iterator<Item = &Marker> {
        self.attractions.iter().chain(self.restaurants.iter())
    }

    pub fn marker(&self, key: &MarkerKey) -> Option<&Marker> {
        self.markers().find(|m| &m.key == key)
    }

    pub fn path_segments(&self) -> usize {
        self.path.len().saturating_sub(1)
    }
}

/// Build the scene; never fails, unplottable places are skipped
pub fn build_scene(input: &MapInput<'_>, settings: &MapSettings) -> MapScene {
    debug!(
        places = input.places.len(),
        restaurants = input.restaurants.len(),
        has_center = input.center.is_some(),
        has_route = input.route.is_some(),
        "build_scene: called"
    );
    let mut keys = KeyAllocator::default();

    let attractions: Vec<Marker> = input
        .places
        .iter()
        .enumerate()
        .filter_map(|(idx, place)| {
            let marker = to_marker(place, MarkerKind::Attraction, Some(idx + 1), &mut keys);
            if marker.is_none() {
                debug!(idx, name = %place.name, "build_scene: dropping unplottable attraction");
            }
            marker
        })
        .collect();

    let restaurants: Vec<Marker> = input
        .restaurants
        .iter()
        .filter_map(|place| to_marker(place, MarkerKind::Restaurant, None, &mut keys))
        .collect();

    let path: Vec<GeoPoint> = if attractions.len() >= 2 {
        attractions.iter().map(|m| m.position).collect()
    } else {
        Vec::new()
    };

    trace!(attractions = attractions.len(), restaurants = restaurants.len(), path = path.len(), "build_scene: built");
    MapScene {
        center: input.center.unwrap_or(settings.default_center),
        zoom: settings.zoom,
        attractions,
        restaurants,
        path,
    }
}

fn to_marker(place: &Place, kind: MarkerKind, label: Option<usize>, keys: &mut KeyAllocator) -> Option<Marker> {
    let position = place.point()?;
    Some(Marker {
        key: keys.allocate(kind, &place.name, position),
        kind,
        label,
        position,
        name: place.name.clone(),
        address: place.address.clone(),
        rating: place.rating.clone(),
    })
}

/// Hands out unique keys, suffixing repeats of the same place
#[derive(Default)]
struct KeyAllocator {
    seen: HashMap<String, usize>,
}

impl KeyAllocator {
    fn allocate(&mut self, kind: MarkerKind, name: &str, at: GeoPoint) -> MarkerKey {
        let prefix = match kind {
            MarkerKind::Attraction => "place",
            MarkerKind::Restaurant => "rest",
        };
        let base = format!("{}:{}@{:.5},{:.5}", prefix, name, at.lat, at.lon);
        let count = self.seen.entry(base.clone()).or_insert(0);
        *count += 1;
        if *count == 1 {
            MarkerKey(base)
        } else {
            MarkerKey(format!("{}#{}", base, count))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Coordinates;
    use proptest::prelude::*;

    fn settings() -> MapSettings {
        MapSettings::default()
    }

    fn scene_for(places: &[Place], restaurants: &[Place]) -> MapScene {
        let input = MapInput {
            places,
            restaurants,
            route: None,
            center: None,
        };
        build_scene(&input, &settings())
    }

    #[test]
    fn test_two_places_two_numbered_markers_one_segment() {
        let places = vec![Place::new("A", 1.0, 1.0), Place::new("B", 2.0, 2.0)];
        let scene = scene_for(&places, &[]);

        let labels: Vec<_> = scene.attractions.iter().map(|m| (m.label, m.name.as_str())).collect();
        assert_eq!(labels, vec![(Some(1), "A"), (Some(2), "B")]);
        assert_eq!(scene.path_segments(), 1);
        assert_eq!(scene.path, vec![GeoPoint { lat: 1.0, lon: 1.0 }, GeoPoint { lat: 2.0, lon: 2.0 }]);
    }

    #[test]
    fn test_nan_place_omitted() {
        let places = vec![Place::new("Bad", f64::NAN, 1.0), Place::new("Good", 2.0, 2.0)];
        let scene = scene_for(&places, &[]);
        assert_eq!(scene.attractions.len(), 1);
        assert_eq!(scene.attractions[0].name, "Good");
        // Keeps its position in the input sequence
        assert_eq!(scene.attractions[0].label, Some(2));
        assert!(scene.path.is_empty());
    }

    #[test]
    fn test_single_place_has_no_path() {
        let scene = scene_for(&[Place::new("Solo", 10.0, 10.0)], &[]);
        assert_eq!(scene.attractions.len(), 1);
        assert_eq!(scene.path_segments(), 0);
    }

    #[test]
    fn test_empty_inputs_use_default_center() {
        let scene = scene_for(&[], &[]);
        assert!(scene.markers().next().is_none());
        assert_eq!(scene.center, super::super::DEFAULT_CENTER);
        assert_eq!(scene.zoom, super::super::DEFAULT_ZOOM);
    }

    #[test]
    fn test_restaurants_are_unnumbered_pins() {
        let mut cafe = Place::new("Cafe", 3.0, 3.0);
        cafe.rating = Literal::new(4.5);
        cafe.address = Some("1 Main St".to_string());
        let scene = scene_for(&[], &[cafe]);

        let pin = &scene.restaurants[0];
        assert_eq!(pin.kind, MarkerKind::Restaurant);
        assert_eq!(pin.label, None);
        assert_eq!(pin.popup_lines(), vec!["🍽 Cafe", "1 Main St", "Rating: 4.5"]);
        assert!(scene.path.is_empty());
    }

    #[test]
    fn test_duplicate_places_get_distinct_keys() {
        let places = vec![Place::new("Twin", 1.0, 1.0), Place::new("Twin", 1.0, 1.0)];
        let scene = scene_for(&places, &[]);
        assert_ne!(scene.attractions[0].key, scene.attractions[1].key);
    }

    #[test]
    fn test_keys_survive_neighbour_changes() {
        let before = scene_for(&[Place::new("A", 1.0, 1.0), Place::new("B", 2.0, 2.0)], &[]);
        let after = scene_for(&[Place::new("B", 2.0, 2.0)], &[]);
        assert_eq!(before.attractions[1].key, after.attractions[0].key);
    }

    #[test]
    fn test_resolve_center_policy() {
        let mut result = TripResult {
            places: vec![Place::new("First", 5.0, 6.0)],
            ..TripResult::default()
        };
        assert_eq!(resolve_center(&result), GeoPoint::new(5.0, 6.0));

        result.coordinates = Some(Coordinates {
            lat: 7.0,
            lon: 8.0,
            formatted: None,
        });
        assert_eq!(resolve_center(&result), GeoPoint::new(7.0, 8.0));

        result.coordinates = None;
        result.places[0].lat = f64::NAN;
        assert_eq!(resolve_center(&result), None);
    }

    proptest! {
        #[test]
        fn prop_markers_only_for_finite_places(
            coords in prop::collection::vec((prop::num::f64::ANY, prop::num::f64::ANY), 0..12)
        ) {
            let places: Vec<Place> = coords
                .iter()
                .enumerate()
                .map(|(i, (lat, lon))| Place::new(format!("p{}", i), *lat, *lon))
                .collect();
            let scene = scene_for(&places, &places);

            let finite = coords.iter().filter(|(lat, lon)| lat.is_finite() && lon.is_finite()).count();
            prop_assert_eq!(scene.attractions.len(), finite);
            prop_assert_eq!(scene.restaurants.len(), finite);
            prop_assert_eq!(scene.path_segments(), finite.saturating_sub(1));

            // Labels are strictly increasing input positions
            let labels: Vec<usize> = scene.attractions.iter().filter_map(|m| m.label).collect();
            prop_assert!(labels.windows(2).all(|w| w[0] < w[1]));
            prop_assert!(labels.iter().all(|l| *l >= 1 && *l <= places.len()));
        }
    }
}
