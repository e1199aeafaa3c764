//! Frame rendering into backend-neutral draw commands.
//!
//! A frame is: clear, world grid, markers (culled to the viewport), labels
//! for claimed markers once zoomed in, and a HUD. Rendering reads the camera
//! and markers but never changes them.

use glam::DVec2;
use landmap_registry::{IdentityKey, Marker, MarkerStats};
use serde::{Deserialize, Serialize};

use crate::camera::{Camera, ViewportSize};
use crate::hit::marker_screen_pos;

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextAlign {
    Left,
    Center,
}

/// Outline around a filled shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub color: String,
    pub width: f64,
}

/// One drawing primitive, in CSS pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCommand {
    Clear {
        width: f64,
        height: f64,
        color: String,
    },
    Line {
        from: DVec2,
        to: DVec2,
        color: String,
        width: f64,
    },
    Circle {
        center: DVec2,
        radius: f64,
        fill: String,
        stroke: Option<Stroke>,
    },
    Text {
        position: DVec2,
        text: String,
        color: String,
        size: f64,
        align: TextAlign,
    },
}

/// Colors, sizes and thresholds used when drawing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderStyle {
    pub background: String,
    pub grid_color: String,
    /// World units between grid lines.
    pub grid_spacing: f64,
    pub unclaimed_color: String,
    pub claimed_color: String,
    pub current_color: String,
    pub outline_color: String,
    pub outline_width: f64,
    pub unclaimed_radius: f64,
    pub claimed_radius: f64,
    pub current_radius: f64,
    pub hovered_radius: f64,
    /// Labels are drawn only when zoom is strictly above this.
    pub label_min_zoom: f64,
    pub label_color: String,
    pub label_size: f64,
    /// Gap between a marker's edge and its label baseline.
    pub label_gap: f64,
    /// Markers further than this outside the viewport are skipped.
    pub cull_margin: f64,
    pub hud_color: String,
    pub hud_size: f64,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            background: "#0a0a0a".into(),
            grid_color: "#1a1a1a".into(),
            grid_spacing: 10_000.0,
            unclaimed_color: "#666666".into(),
            claimed_color: "#3b82f6".into(),
            current_color: "#22c55e".into(),
            outline_color: "#ffffff".into(),
            outline_width: 2.0,
            unclaimed_radius: 5.0,
            claimed_radius: 8.0,
            current_radius: 10.0,
            hovered_radius: 12.0,
            label_min_zoom: 0.3,
            label_color: "#ffffff".into(),
            label_size: 12.0,
            label_gap: 15.0,
            cull_margin: 50.0,
            hud_color: "#666666".into(),
            hud_size: 14.0,
        }
    }
}

/// Most grid lines drawn along one axis. Denser grids are skipped.
pub const MAX_GRID_LINES: usize = 4_096;

/// World positions of grid lines covering `[min, max]`.
///
/// Empty when the range is not finite, when there would be more than
/// [`MAX_GRID_LINES`] lines, or when `spacing` is lost to rounding at this
/// magnitude.
fn grid_positions(min: f64, max: f64, spacing: f64) -> impl Iterator<Item = f64> {
    let start = (min / spacing).floor() * spacing;
    let span = ((max - start) / spacing).floor();

    let resolvable = start.is_finite() && start + spacing != start;
    let count = if resolvable && span.is_finite() && span >= 0.0 && span < MAX_GRID_LINES as f64 {
        span as usize + 1
    } else {
        0
    };

    (0..count).map(move |i| start + i as f64 * spacing)
}

/// Stateless frame renderer.
#[derive(Debug, Clone, Default)]
pub struct RenderPass {
    style: RenderStyle,
}

impl RenderPass {
    pub fn new(style: RenderStyle) -> Self {
        Self { style }
    }

    pub fn style(&self) -> &RenderStyle {
        &self.style
    }

    /// Draw one frame.
    ///
    /// `hovered` gets the largest radius and an outline; `current` is the
    /// signed-in identity and always uses the highlight color.
    pub fn draw(
        &self,
        camera: &Camera,
        size: ViewportSize,
        markers: &[Marker],
        hovered: Option<&IdentityKey>,
        current: Option<&IdentityKey>,
    ) -> Vec<DrawCommand> {
        let mut commands = vec![DrawCommand::Clear {
            width: size.width,
            height: size.height,
            color: self.style.background.clone(),
        }];
        if size.is_empty() {
            return commands;
        }

        self.draw_grid(camera, size, &mut commands);
        for marker in markers {
            self.draw_marker(camera, size, marker, hovered, current, &mut commands);
        }
        self.draw_hud(camera, markers, &mut commands);

        commands
    }

    fn draw_grid(&self, camera: &Camera, size: ViewportSize, out: &mut Vec<DrawCommand>) {
        let spacing = self.style.grid_spacing;
        if !(spacing.is_finite() && spacing > 0.0) {
            return;
        }

        let (min, max) = camera.visible_world(size);

        for x in grid_positions(min.x, max.x, spacing) {
            let sx = camera.world_to_screen(DVec2::new(x, 0.0)).x;
            out.push(self.grid_line(DVec2::new(sx, 0.0), DVec2::new(sx, size.height)));
        }
        for y in grid_positions(min.y, max.y, spacing) {
            let sy = camera.world_to_screen(DVec2::new(0.0, y)).y;
            out.push(self.grid_line(DVec2::new(0.0, sy), DVec2::new(size.width, sy)));
        }
    }

    fn grid_line(&self, from: DVec2, to: DVec2) -> DrawCommand {
        DrawCommand::Line {
            from,
            to,
            color: self.style.grid_color.clone(),
            width: 1.0,
        }
    }

    fn draw_marker(
        &self,
        camera: &Camera,
        size: ViewportSize,
        marker: &Marker,
        hovered: Option<&IdentityKey>,
        current: Option<&IdentityKey>,
        out: &mut Vec<DrawCommand>,
    ) {
        let style = &self.style;
        let pos = marker_screen_pos(camera, marker);
        let margin = style.cull_margin;
        if pos.x < -margin
            || pos.x > size.width + margin
            || pos.y < -margin
            || pos.y > size.height + margin
        {
            return;
        }

        let is_current = current == Some(marker.identity());
        let is_hovered = hovered == Some(marker.identity());
        let claimed = marker.has_claimed();

        let (fill, mut radius) = if is_current {
            (style.current_color.clone(), style.current_radius)
        } else if claimed {
            let fill = marker
                .color()
                .map_or_else(|| style.claimed_color.clone(), str::to_string);
            (fill, style.claimed_radius)
        } else {
            (style.unclaimed_color.clone(), style.unclaimed_radius)
        };
        if is_hovered {
            radius = style.hovered_radius;
        }

        let stroke = (is_hovered || is_current).then(|| Stroke {
            color: style.outline_color.clone(),
            width: style.outline_width,
        });

        out.push(DrawCommand::Circle {
            center: pos,
            radius,
            fill,
            stroke,
        });

        if claimed && camera.zoom() > style.label_min_zoom {
            out.push(DrawCommand::Text {
                position: DVec2::new(pos.x, pos.y + radius + style.label_gap),
                text: marker.label(),
                color: style.label_color.clone(),
                size: style.label_size,
                align: TextAlign::Center,
            });
        }
    }

    fn draw_hud(&self, camera: &Camera, markers: &[Marker], out: &mut Vec<DrawCommand>) {
        let stats = MarkerStats::from_markers(markers);
        let lines = [
            format!("Zoom: {:.2}x", camera.zoom()),
            format!("Bases: {}/{}", stats.claimed, stats.total),
        ];
        for (i, text) in lines.into_iter().enumerate() {
            out.push(DrawCommand::Text {
                position: DVec2::new(10.0, 20.0 + 20.0 * i as f64),
                text,
                color: self.style.hud_color.clone(),
                size: self.style.hud_size,
                align: TextAlign::Left,
            });
        }
    }
}
