//! Developer tools for debugging a [`Window`].
//!
//! [`Hud`] keeps frame statistics and outlines the hovered widget; [`Inspector`]
//! wraps a `Hud` and renders the widget tree as text for the log.

use std::fmt::Write as _;

use web_time::Instant;

use faceplate_core::{Color, DrawingContext, Rect, Vec2};
use faceplate_ui::{LayoutStats, Window};

mod tests;

const OUTLINE_WIDTH: f32 = 2.0;
const FPS_SMOOTHING: f32 = 0.2;

#[derive(Clone, Debug, Default)]
pub struct Metrics {
    pub layout_ms: f32,
    pub scene_nodes: usize,
    pub pending_animations: usize,
    pub layout: LayoutStats,
}

pub struct Hud {
    pub inspector_enabled: bool,
    pub hovered: Option<Rect>,
    pub outline_color: Color,
    frame_count: u64,
    last_frame: Option<Instant>,
    fps_smooth: f32,
    pub metrics: Option<Metrics>,
}

impl Default for Hud {
    fn default() -> Self {
        Self::new()
    }
}

impl Hud {
    pub fn new() -> Self {
        Self {
            inspector_enabled: false,
            hovered: None,
            outline_color: Color::from_hex("#44AAFF"),
            frame_count: 0,
            last_frame: None,
            fps_smooth: 0.0,
            metrics: None,
        }
    }

    pub fn toggle_inspector(&mut self) {
        self.inspector_enabled = !self.inspector_enabled;
    }

    pub fn set_hovered(&mut self, r: Option<Rect>) {
        self.hovered = r;
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn fps(&self) -> f32 {
        self.fps_smooth
    }

    /// Counts a frame presented at `now`. The time comes from the caller so
    /// that a manual clock gives stable numbers.
    pub fn record_frame(&mut self, now: Instant) {
        self.frame_count += 1;
        if let Some(prev) = self.last_frame.replace(now) {
            let dt = now.saturating_duration_since(prev).as_secs_f32();
            if dt > 0.0 {
                let fps = 1.0 / dt;
                // simple EMA
                self.fps_smooth = if self.fps_smooth == 0.0 {
                    fps
                } else {
                    (1.0 - FPS_SMOOTHING) * self.fps_smooth + FPS_SMOOTHING * fps
                };
            }
        }
    }

    /// One-line summary for the log.
    pub fn summary(&self) -> String {
        let mut lines = vec![
            format!("frame: {}", self.frame_count),
            format!("fps: {:.1}", self.fps_smooth),
        ];
        if let Some(m) = &self.metrics {
            lines.push(format!("layout: {:.2} ms", m.layout_ms));
            lines.push(format!("nodes: {}", m.scene_nodes));
            lines.push(format!("animations: {}", m.pending_animations));
            lines.push(format!(
                "passes: {}/{}",
                m.layout.layout_passes, m.layout.reposition_passes
            ));
        }
        lines.join("  |  ")
    }

    /// Outlines the hovered rect, in device coordinates.
    pub fn overlay(&self, dc: &mut dyn DrawingContext) {
        let Some(r) = self.hovered else {
            return;
        };
        if r.is_empty() {
            return;
        }
        let w = OUTLINE_WIDTH.min(r.w / 2.0).min(r.h / 2.0);
        let c = self.outline_color;
        dc.fill_rect(Rect::new(r.x, r.y, r.w, w), c);
        dc.fill_rect(Rect::new(r.x, r.bottom() - w, r.w, w), c);
        dc.fill_rect(Rect::new(r.x, r.y + w, w, r.h - 2.0 * w), c);
        dc.fill_rect(Rect::new(r.right() - w, r.y + w, w, r.h - 2.0 * w), c);
    }
}

pub struct Inspector {
    pub hud: Hud,
}

impl Default for Inspector {
    fn default() -> Self {
        Self::new()
    }
}

impl Inspector {
    pub fn new() -> Self {
        Self { hud: Hud::new() }
    }

    /// Records the frame and, while enabled, tracks the topmost widget under
    /// `pointer` and draws its outline.
    pub fn frame(
        &mut self,
        window: &Window,
        pointer: Option<Vec2>,
        dc: &mut dyn DrawingContext,
    ) {
        self.hud.record_frame(window.now());
        if !self.hud.inspector_enabled {
            return;
        }
        let hovered = pointer
            .and_then(|p| window.hit_test(p).last().copied())
            .and_then(|id| window.layout(id))
            .map(|l| l.screen_bounds);
        self.hud.set_hovered(hovered);
        self.hud.overlay(dc);
    }
}

/// Renders the mounted tree, one widget per line, indented by depth.
pub fn dump_tree(window: &Window) -> String {
    let mut out = String::new();
    window.visit(|id, depth| {
        let kind = window.kind(id).unwrap_or("?");
        let _ = write!(out, "{:indent$}{kind}", "", indent = depth * 2);
        if let Some(l) = window.layout(id) {
            let b = l.screen_bounds;
            let _ = write!(out, " [{} {} {}x{}]", b.x, b.y, b.w, b.h);
        }
        out.push('\n');
    });
    out
}

/// Logs the tree at debug level.
pub fn log_tree(window: &Window) {
    if log::log_enabled!(log::Level::Debug) {
        log::debug!("widget tree:\n{}", dump_tree(window));
    }
}
