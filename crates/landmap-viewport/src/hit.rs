//! Pointer hit-testing against the marker set.

use glam::DVec2;
use landmap_registry::Marker;

use crate::camera::Camera;

/// Hit radius in screen pixels, a little larger than the biggest marker.
pub const HIT_RADIUS: f64 = 15.0;

/// Screen position of a marker under `camera`.
pub fn marker_screen_pos(camera: &Camera, marker: &Marker) -> DVec2 {
    let (x, y) = marker.coord().to_world();
    camera.world_to_screen(DVec2::new(x, y))
}

/// First marker, in list order, strictly within `HIT_RADIUS` of `point`.
///
/// List order decides between overlapping markers, not distance, so the
/// answer for a given list and camera never depends on float ties.
pub fn hit_test<'a>(camera: &Camera, point: DVec2, markers: &'a [Marker]) -> Option<&'a Marker> {
    if !point.is_finite() {
        return None;
    }
    markers
        .iter()
        .find(|marker| marker_screen_pos(camera, marker).distance(point) < HIT_RADIUS)
}
