//! Landmap Viewport
//!
//! Interactive view over the 100,000 × 100,000 Landmap plane.
//!
//! # Architecture
//!
//! - **Camera**: uniform zoom plus pan offset, with anchored zooming
//! - **Hit-testing**: pointer to marker, first match in list order
//! - **Engine**: pointer state machine, hover tracking and one-shot
//!   centering on the signed-in identity
//! - **Render**: frame description as a list of [`DrawCommand`]s, so any
//!   backend (canvas, GPU, terminal) can paint it
//!
//! # Usage
//!
//! ```ignore
//! let mut engine = ViewportEngine::default();
//! engine.resize(ViewportSize::new(1280.0, 720.0));
//! engine.sync_current_identity(Some(&me), &markers);
//!
//! let frame = RenderPass::default().draw(
//!     engine.camera(),
//!     engine.size(),
//!     &markers,
//!     engine.hovered(),
//!     engine.current(),
//! );
//! ```

mod camera;
mod engine;
mod hit;
pub mod render;

pub use camera::{Camera, ViewportSize, DEFAULT_ZOOM, MAX_ZOOM, MIN_ZOOM};
pub use engine::{AutoCenter, DragState, ViewportEngine, BUTTON_ZOOM_STEP, WHEEL_ZOOM_STEP};
pub use hit::{hit_test, marker_screen_pos, HIT_RADIUS};
pub use render::{DrawCommand, RenderPass, RenderStyle, Stroke, TextAlign, MAX_GRID_LINES};

/// Re-export glam so callers can build points without a direct dependency.
pub use glam::DVec2;
