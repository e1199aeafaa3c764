//! Interactive viewport state.
//!
//! Owns the camera, the viewport size and the pointer state machine. Every
//! input runs to completion before the next; nothing here blocks or spawns.
//!
//! # Pointer States
//!
//! ```text
//! Idle --pointer_down--> Dragging --pointer_up / pointer_leave--> Idle
//! ```
//!
//! While dragging, pointer motion pans the camera and hover is frozen.
//!
//! # Auto-Center
//!
//! Once per sign-in the camera centers on the signed-in identity, as soon as
//! its marker is known and the viewport has a size. Later marker or size
//! changes never re-center; only clearing the identity re-arms the latch.

use glam::DVec2;
use landmap_registry::{IdentityKey, Marker};

use crate::camera::{Camera, ViewportSize};
use crate::hit::{hit_test, marker_screen_pos};

/// Zoom factor of one wheel notch.
pub const WHEEL_ZOOM_STEP: f64 = 1.15;

/// Zoom factor of the zoom in/out buttons.
pub const BUTTON_ZOOM_STEP: f64 = 1.5;

/// Pointer interaction state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragState {
    Idle,
    /// `grab` is the pointer position relative to the camera offset at the
    /// moment the drag started.
    Dragging { grab: DVec2 },
}

/// One-shot auto-center latch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutoCenter {
    NotYetCentered,
    Centered,
}

/// Camera plus interaction state for one map view.
#[derive(Debug, Clone)]
pub struct ViewportEngine {
    camera: Camera,
    size: ViewportSize,
    drag: DragState,
    hovered: Option<IdentityKey>,
    current: Option<IdentityKey>,
    auto_center: AutoCenter,
}

impl Default for ViewportEngine {
    fn default() -> Self {
        Self::new(Camera::default())
    }
}

impl ViewportEngine {
    /// Create an engine with the given camera and no viewport size yet.
    pub fn new(camera: Camera) -> Self {
        Self {
            camera,
            size: ViewportSize::default(),
            drag: DragState::Idle,
            hovered: None,
            current: None,
            auto_center: AutoCenter::NotYetCentered,
        }
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn size(&self) -> ViewportSize {
        self.size
    }

    pub fn drag_state(&self) -> DragState {
        self.drag
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.drag, DragState::Dragging { .. })
    }

    /// Identity under the pointer, if any.
    pub fn hovered(&self) -> Option<&IdentityKey> {
        self.hovered.as_ref()
    }

    /// The signed-in identity, if any.
    pub fn current(&self) -> Option<&IdentityKey> {
        self.current.as_ref()
    }

    pub fn auto_center_state(&self) -> AutoCenter {
        self.auto_center
    }

    /// Record a new viewport size. The camera is not moved.
    pub fn resize(&mut self, size: ViewportSize) {
        self.size = size;
        tracing::trace!(width = size.width, height = size.height, "viewport resized");
    }

    /// Pan by a screen delta. Only takes effect while a drag is in progress.
    pub fn pan_by(&mut self, dx: f64, dy: f64) -> bool {
        if !self.is_dragging() {
            return false;
        }
        self.camera.pan_by(DVec2::new(dx, dy))
    }

    /// Zoom by `factor` around a screen anchor. See [`Camera::zoom_at`].
    pub fn zoom_at(&mut self, factor: f64, anchor: DVec2) -> bool {
        let changed = self.camera.zoom_at(factor, anchor);
        if changed {
            tracing::trace!(zoom = self.camera.zoom(), "zoomed");
        }
        changed
    }

    /// Zoom in one button step around the viewport center.
    pub fn zoom_in(&mut self) -> bool {
        self.zoom_at(BUTTON_ZOOM_STEP, self.size.center())
    }

    /// Zoom out one button step around the viewport center.
    pub fn zoom_out(&mut self) -> bool {
        self.zoom_at(1.0 / BUTTON_ZOOM_STEP, self.size.center())
    }

    /// Wheel input: scrolling up (negative delta) zooms in around the pointer.
    pub fn wheel(&mut self, delta_y: f64, pointer: DVec2) -> bool {
        if !delta_y.is_finite() || delta_y == 0.0 {
            return false;
        }
        let factor = if delta_y < 0.0 {
            WHEEL_ZOOM_STEP
        } else {
            1.0 / WHEEL_ZOOM_STEP
        };
        self.zoom_at(factor, pointer)
    }

    /// Center the camera on a world point.
    pub fn center_on(&mut self, world: DVec2) -> bool {
        self.camera.center_on(world, self.size)
    }

    /// Begin dragging.
    pub fn pointer_down(&mut self, pointer: DVec2) {
        if !pointer.is_finite() {
            return;
        }
        self.drag = DragState::Dragging {
            grab: pointer - self.camera.offset(),
        };
    }

    /// Pointer motion: pans while dragging, otherwise updates hover.
    ///
    /// Returns the hovered identity after the move.
    pub fn pointer_move(&mut self, pointer: DVec2, markers: &[Marker]) -> Option<&IdentityKey> {
        match self.drag {
            DragState::Dragging { grab } => {
                if pointer.is_finite() {
                    let delta = (pointer - grab) - self.camera.offset();
                    self.pan_by(delta.x, delta.y);
                }
            }
            DragState::Idle => {
                self.hovered = hit_test(&self.camera, pointer, markers).map(|m| *m.identity());
            }
        }
        self.hovered.as_ref()
    }

    /// End dragging.
    pub fn pointer_up(&mut self) {
        self.drag = DragState::Idle;
    }

    /// Pointer left the viewport: end dragging and clear hover.
    pub fn pointer_leave(&mut self) {
        self.drag = DragState::Idle;
        self.hovered = None;
    }

    /// Marker under a click, if any.
    pub fn click<'a>(&self, pointer: DVec2, markers: &'a [Marker]) -> Option<&'a Marker> {
        hit_test(&self.camera, pointer, markers)
    }

    /// Marker under `pointer`.
    pub fn hit_test<'a>(&self, pointer: DVec2, markers: &'a [Marker]) -> Option<&'a Marker> {
        hit_test(&self.camera, pointer, markers)
    }

    /// Screen position of a marker under the current camera.
    pub fn marker_screen_pos(&self, marker: &Marker) -> DVec2 {
        marker_screen_pos(&self.camera, marker)
    }

    /// Track the signed-in identity and run the one-shot auto-center.
    ///
    /// `None` means signed out and re-arms the latch. Returns `true` when
    /// this call centered the camera.
    pub fn sync_current_identity(&mut self, current: Option<&IdentityKey>, markers: &[Marker]) -> bool {
        self.current = current.copied();

        if self.current.is_none() {
            self.auto_center = AutoCenter::NotYetCentered;
            return false;
        }
        if self.auto_center == AutoCenter::Centered || self.size.is_empty() {
            return false;
        }
        if !self.center_on_current(markers) {
            return false;
        }

        self.auto_center = AutoCenter::Centered;
        tracing::debug!("auto-centered on signed-in identity");
        true
    }

    /// Center on the signed-in identity's marker ("home").
    pub fn center_on_current(&mut self, markers: &[Marker]) -> bool {
        let Some(current) = self.current else {
            return false;
        };
        match markers.iter().find(|m| m.identity() == &current) {
            Some(marker) => {
                let (x, y) = marker.coord().to_world();
                self.center_on(DVec2::new(x, y))
            }
            None => false,
        }
    }
}
