//! Stateful map view: lifecycle, viewport, and marker selection
//!
//! The scene is rebuilt on every result, but the view keeps the parts that must
//! not flicker: the viewport only moves when the center changes, and the
//! selected marker survives updates by key.

use tracing::{debug, info, trace};

use super::{MapScene, Marker, MarkerKey};
use crate::domain::GeoPoint;

/// Roughly how many 256px map tiles fit across the view
const TILES_ACROSS: f64 = 3.0;

/// Terminal cells are about twice as tall as they are wide
const CELL_ASPECT: f64 = 2.0;

/// Two-phase lifecycle: nothing is projected until a surface exists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MapPhase {
    /// Placeholder shown; no drawable area yet
    #[default]
    NotReady,
    /// Drawable area confirmed
    Ready { width: u16, height: u16 },
}

/// Geographic window shown by the map
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub center: GeoPoint,
    pub zoom: u8,
}

/// Canvas bounds in degrees: x is longitude, y is latitude
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub x: [f64; 2],
    pub y: [f64; 2],
}

impl Bounds {
    pub fn contains(&self, point: GeoPoint) -> bool {
        point.lon >= self.x[0] && point.lon <= self.x[1] && point.lat >= self.y[0] && point.lat <= self.y[1]
    }
}

impl Viewport {
    /// Longitude span at this zoom, slippy-map style
    pub fn lon_span(&self) -> f64 {
        360.0 / 2f64.powi(self.zoom as i32) * TILES_ACROSS
    }

    /// Bounds for a `width` x `height` cell surface
    pub fn bounds(&self, width: u16, height: u16) -> Bounds {
        let lon_span = self.lon_span();
        let cols = f64::from(width.max(1));
        let rows = f64::from(height.max(1));
        let lat_span = lon_span * (rows * CELL_ASPECT / cols) * self.center.lat.to_radians().cos().abs().max(0.01);
        Bounds {
            x: [self.center.lon - lon_span / 2.0, self.center.lon + lon_span / 2.0],
            y: [self.center.lat - lat_span / 2.0, self.center.lat + lat_span / 2.0],
        }
    }
}

/// The map as seen by the shell
#[derive(Debug, Clone, Default)]
pub struct MapView {
    phase: MapPhase,
    viewport: Option<Viewport>,
    scene: Option<MapScene>,
    selected: Option<MarkerKey>,
    recenters: usize,
}

impl MapView {
    pub fn new() -> Self {
        debug!("MapView::new: called");
        Self::default()
    }

    pub fn phase(&self) -> MapPhase {
        self.phase
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.phase, MapPhase::Ready { .. })
    }

    /// Report the drawable area; returns true once the map is ready
    ///
    /// A zero-sized area keeps (or puts) the view in `NotReady`.
    pub fn attach(&mut self, width: u16, height: u16) -> bool {
        trace!(width, height, "MapView::attach: called");
        if width == 0 || height == 0 {
            self.phase = MapPhase::NotReady;
            return false;
        }
        if !self.is_ready() {
            info!(width, height, "MapView: surface available, initializing");
        }
        self.phase = MapPhase::Ready { width, height };
        true
    }

    /// Apply a freshly built scene
    ///
    /// Recenters only when the scene center differs from the current one.
    /// Keeps the selection if its marker is still present.
    pub fn update(&mut self, scene: MapScene) {
        debug!(center = ?scene.center, markers = scene.markers().count(), "MapView::update: called");
        let target = Viewport {
            center: scene.center,
            zoom: scene.zoom,
        };
        let moved = self.viewport.is_none_or(|v| v.center != target.center);
        if moved {
            debug!(?target, "MapView::update: recentering");
            self.viewport = Some(target);
            self.recenters += 1;
        }

        if let Some(key) = &self.selected
            && scene.marker(key).is_none()
        {
            debug!(%key, "MapView::update: selected marker gone, clearing selection");
            self.selected = None;
        }
        self.scene = Some(scene);
    }

    /// Forget the scene when no result exists
    pub fn clear(&mut self) {
        debug!("MapView::clear: called");
        self.scene = None;
        self.selected = None;
    }

    pub fn scene(&self) -> Option<&MapScene> {
        self.scene.as_ref()
    }

    /// Current viewport; None until the first scene arrives
    pub fn viewport(&self) -> Option<Viewport> {
        self.viewport
    }

    /// How many times the viewport has moved
    pub fn recenters(&self) -> usize {
        self.recenters
    }

    pub fn selected(&self) -> Option<&MarkerKey> {
        self.selected.as_ref()
    }

    pub fn selected_marker(&self) -> Option<&Marker> {
        let key = self.selected.as_ref()?;
        self.scene.as_ref()?.marker(key)
    }

    /// Select the next marker, wrapping around
    pub fn select_next(&mut self) {
        self.step_selection(1);
    }

    /// Select the previous marker, wrapping around
    pub fn select_prev(&mut self) {
        self.step_selection(-1);
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    fn step_selection(&mut self, delta: isize) {
        let Some(scene) = &self.scene else {
            return;
        };
        let keys: Vec<&MarkerKey> = scene.markers().map(|m| &m.key).collect();
        if keys.is_empty() {
            return;
        }
        let len = keys.len() as isize;
        let current = self
            .selected
            .as_ref()
            .and_then(|sel| keys.iter().position(|k| *k == sel))
            .map(|i| i as isize);
        let next = match current {
            Some(i) => (i + delta).rem_euclid(len),
            None if delta >= 0 => 0,
            None => len - 1,
        };
        let key = keys[next as usize].clone();
        debug!(%key, "MapView::step_selection: selected");
        self.selected = Some(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Place;
    use crate::map::{MapInput, MapSettings, build_scene};

    fn scene(places: &[Place], center: Option<GeoPoint>) -> MapScene {
        build_scene(
            &MapInput {
                places,
                restaurants: &[],
                route: None,
                center,
            },
            &MapSettings::default(),
        )
    }

    #[test]
    fn test_not_ready_until_surface() {
        let mut view = MapView::new();
        assert_eq!(view.phase(), MapPhase::NotReady);
        assert!(!view.attach(0, 10));
        assert!(!view.is_ready());
        assert!(view.attach(80, 24));
        assert_eq!(view.phase(), MapPhase::Ready { width: 80, height: 24 });
    }

    #[test]
    fn test_recenter_only_when_center_changes() {
        let mut view = MapView::new();
        let places = vec![Place::new("A", 1.0, 1.0)];
        let paris = GeoPoint::new(48.85, 2.35);

        view.update(scene(&places, paris));
        assert_eq!(view.recenters(), 1);
        view.update(scene(&places, paris));
        assert_eq!(view.recenters(), 1);

        let rome = GeoPoint::new(41.9, 12.5);
        view.update(scene(&places, rome));
        assert_eq!(view.recenters(), 2);
        assert_eq!(view.viewport().unwrap().center, rome.unwrap());
        assert_eq!(view.viewport().unwrap().zoom, 13);
    }

    #[test]
    fn test_selection_survives_recenter() {
        let mut view = MapView::new();
        let places = vec![Place::new("A", 1.0, 1.0), Place::new("B", 2.0, 2.0)];
        view.update(scene(&places, GeoPoint::new(1.0, 1.0)));
        view.select_next();
        view.select_next();
        assert_eq!(view.selected_marker().unwrap().name, "B");

        view.update(scene(&places, GeoPoint::new(5.0, 5.0)));
        assert_eq!(view.selected_marker().unwrap().name, "B");
    }

    #[test]
    fn test_selection_cleared_when_marker_disappears() {
        let mut view = MapView::new();
        view.update(scene(&[Place::new("A", 1.0, 1.0)], None));
        view.select_next();
        assert!(view.selected().is_some());

        view.update(scene(&[Place::new("Z", 9.0, 9.0)], None));
        assert!(view.selected().is_none());
    }

    #[test]
    fn test_selection_wraps() {
        let mut view = MapView::new();
        let places = vec![Place::new("A", 1.0, 1.0), Place::new("B", 2.0, 2.0)];
        view.update(scene(&places, None));

        view.select_prev();
        assert_eq!(view.selected_marker().unwrap().name, "B");
        view.select_next();
        assert_eq!(view.selected_marker().unwrap().name, "A");
    }

    #[test]
    fn test_selection_on_empty_scene_is_noop() {
        let mut view = MapView::new();
        view.select_next();
        assert!(view.selected().is_none());
        view.update(scene(&[], None));
        view.select_next();
        assert!(view.selected().is_none());
    }

    #[test]
    fn test_bounds_centered_on_viewport() {
        let viewport = Viewport {
            center: GeoPoint::new(0.0, 0.0).unwrap(),
            zoom: 13,
        };
        let bounds = viewport.bounds(100, 50);
        assert!((bounds.x[0] + bounds.x[1]).abs() < 1e-9);
        assert!((bounds.y[0] + bounds.y[1]).abs() < 1e-9);
        assert!(bounds.contains(viewport.center));
        assert!(!bounds.contains(GeoPoint::new(1.0, 1.0).unwrap()));
    }
}
