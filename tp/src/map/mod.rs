//! Map of a planned trip
//!
//! [`build_scene`] projects a result into markers and a path. [`MapView`] holds
//! that scene for the terminal and owns the viewport and marker selection.

mod scene;
mod view;

pub use scene::{MapInput, MapScene, Marker, MarkerKey, MarkerKind, build_scene, resolve_center};
pub use view::{Bounds, MapPhase, MapView, Viewport};

use crate::config::MapConfig;
use crate::domain::GeoPoint;

/// Shown when a result has no usable center
pub const DEFAULT_CENTER: GeoPoint = GeoPoint { lat: 51.505, lon: -0.09 };

/// Zoom applied on every recenter
pub const DEFAULT_ZOOM: u8 = 13;

/// Viewport defaults used by the scene builder
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapSettings {
    pub zoom: u8,
    pub default_center: GeoPoint,
}

impl Default for MapSettings {
    fn default() -> Self {
        Self {
            zoom: DEFAULT_ZOOM,
            default_center: DEFAULT_CENTER,
        }
    }
}

impl MapSettings {
    pub fn from_config(config: &MapConfig) -> Self {
        Self {
            zoom: config.zoom,
            default_center: config.default_center(),
        }
    }
}
