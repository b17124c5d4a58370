//! # Scrollbar
//!
//! An overlay scrollbar that rests as a thin collapsed strip and expands to
//! full width while hovered or dragged. It has three interaction states:
//!
//! - `Idle`: collapsed (or collapsing after the hold time runs out).
//! - `Hovering`: expanding toward full width over 100ms.
//! - `Dragging`: pointer pressed and captured; the expansion is frozen.
//!
//! Dragging past either end records the excess as *overscroll*. The offset
//! itself stays clamped; the overscroll squashes the thumb through the
//! flubber curve instead, and springs back over 160ms after release.
//!
//! A press that never moves more than 2.4px is a click: the window is
//! recentered on the clicked track position.
//!
//! Two sub-animations (expansion and overscroll decay) share one chained
//! frame callback.

use std::f32::consts::PI;

use faceplate_core::{
    AnimationHandle, BindingFlags, Color, DrawingContext, HoverColors, HoverState, Interpolate,
    PointerEvent, Property, Rect, RoundCorners, Style, Theme, Vec2, signed_seconds,
};
use web_time::Instant;

use crate::{PointerTarget, Widget, WidgetContext};

pub const EXPAND_SECONDS: f32 = 0.1;
pub const DEFAULT_HOLD_SECONDS: f32 = 1.0;
pub const OVERSCROLL_DECAY_SECONDS: f32 = 0.16;
pub const MAX_OVERSCROLL: f32 = 900.0;
pub const DRAG_THRESHOLD: f32 = 2.4;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Orientation {
    Horizontal,
    #[default]
    Vertical,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScrollBarState {
    Idle,
    Hovering,
    Dragging,
}

/// Squash/stretch factor for a thumb that is `overscroll` units past its
/// limit: 1 at rest, shrinking toward `1 - atan(900/80)/(4π)` at the cap. The
/// sign tells which end the thumb is anchored to.
pub fn compute_flubber_factor(overscroll: f32) -> f32 {
    if overscroll == 0.0 {
        return 1.0;
    }
    let x = overscroll.abs().min(MAX_OVERSCROLL);
    let f = 1.0 - (x / 80.0).atan() / (4.0 * PI);
    f.copysign(overscroll)
}

/// The part of the client area the thumb travels in: the client area minus
/// a half-width cap at each end.
pub fn track_rect(orientation: Orientation, client: Rect) -> Rect {
    match orientation {
        Orientation::Vertical => {
            let r = client.w / 2.0;
            Rect::new(client.x, client.y + r, client.w, client.h - 2.0 * r)
        }
        Orientation::Horizontal => {
            let r = client.h / 2.0;
            Rect::new(client.x + r, client.y, client.w - 2.0 * r, client.h)
        }
    }
}

/// Thumb rectangle, caps included, for a window of `window_size` at
/// `offset` into a document of `document_size`. Also used for hit-testing.
pub fn thumb_rect(
    orientation: Orientation,
    client: Rect,
    window_size: f32,
    document_size: f32,
    offset: f32,
) -> Rect {
    if document_size <= 0.0 {
        return Rect::default();
    }
    // Derived from the clamped end, so an offset past the maximum still
    // draws a full-size thumb pinned to the end.
    let end = (window_size + offset).min(document_size);
    let start = end - window_size;
    match orientation {
        Orientation::Vertical => {
            let r = client.w / 2.0;
            let (min, max) = (client.top() + r, client.bottom() - r);
            let top = start / document_size * (max - min) + min;
            let bottom = end / document_size * (max - min) + min;
            Rect::new(client.left(), top - r, client.w, bottom - top + 2.0 * r)
        }
        Orientation::Horizontal => {
            let r = client.h / 2.0;
            let (min, max) = (client.left() + r, client.right() - r);
            let left = start / document_size * (max - min) + min;
            let right = end / document_size * (max - min) + min;
            Rect::new(left - r, client.top(), right - left + 2.0 * r, client.h)
        }
    }
}

pub struct ScrollBar {
    orientation: Orientation,
    pub window_size: Property<f32>,
    pub document_size: Property<f32>,
    pub scroll_offset: Property<f32>,
    /// Theme colors are used while these are `None`.
    pub thumb_hover_colors: Property<Option<HoverColors>>,
    pub track_hover_colors: Property<Option<HoverColors>>,
    pub collapsed_style: Property<Option<Style>>,
    /// How long the bar stays expanded after the pointer leaves, in seconds.
    pub hold_seconds: f32,

    animation_value: Property<f32>,
    overscroll: Property<f32>,
    flubber_factor: Property<f32>,
    hover_state: HoverState,

    handle: AnimationHandle,
    target: f32,
    last_tick: Option<Instant>,
    hold_remaining: f32,
    release: Option<(Instant, f32)>,

    mouse_down: bool,
    dragging: bool,
    down_point: Vec2,
    down_offset: f32,
}

impl ScrollBar {
    pub fn new(orientation: Orientation) -> Self {
        Self {
            orientation,
            window_size: Property::new(0.0),
            document_size: Property::new(0.0),
            scroll_offset: Property::new(0.0),
            thumb_hover_colors: Property::new(None),
            track_hover_colors: Property::new(None),
            collapsed_style: Property::new(None),
            hold_seconds: DEFAULT_HOLD_SECONDS,
            animation_value: Property::new(0.0),
            overscroll: Property::new(0.0),
            flubber_factor: Property::new(1.0),
            hover_state: HoverState::empty(),
            handle: AnimationHandle::INVALID,
            target: 0.0,
            last_tick: None,
            hold_remaining: 0.0,
            release: None,
            mouse_down: false,
            dragging: false,
            down_point: Vec2::default(),
            down_offset: 0.0,
        }
    }

    pub fn vertical() -> Self {
        Self::new(Orientation::Vertical)
    }

    pub fn horizontal() -> Self {
        Self::new(Orientation::Horizontal)
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Collapsed (0) to expanded (1).
    pub fn animation_value(&self) -> f32 {
        self.animation_value.get()
    }

    pub fn overscroll(&self) -> f32 {
        self.overscroll.get()
    }

    pub fn flubber_factor(&self) -> f32 {
        self.flubber_factor.get()
    }

    pub fn hover_state(&self) -> HoverState {
        self.hover_state
    }

    pub fn is_animating(&self) -> bool {
        self.handle.is_valid()
    }

    pub fn state(&self) -> ScrollBarState {
        if self.mouse_down {
            ScrollBarState::Dragging
        } else if self.hover_state.contains(HoverState::HOVER) {
            ScrollBarState::Hovering
        } else {
            ScrollBarState::Idle
        }
    }

    pub fn max_scroll_offset(&self) -> f32 {
        (self.document_size.get() - self.window_size.get()).max(0.0)
    }

    fn is_scrollable(&self) -> bool {
        let doc = self.document_size.get();
        doc > 0.0 && self.window_size.get() < doc
    }

    fn axis(&self, p: Vec2) -> f32 {
        match self.orientation {
            Orientation::Vertical => p.y,
            Orientation::Horizontal => p.x,
        }
    }

    fn collapsed_style(&self, theme: &Theme) -> Style {
        self.collapsed_style.get().unwrap_or(match self.orientation {
            Orientation::Vertical => theme.collapsed_vertical_scrollbar,
            Orientation::Horizontal => theme.collapsed_horizontal_scrollbar,
        })
    }

    fn start_animation(&mut self, cx: &mut WidgetContext<'_>, target: f32) {
        self.target = target;
        if !self.handle.is_valid() {
            log::trace!("scrollbar animation started for {:?}", cx.id());
            self.last_tick = Some(cx.now());
            self.request_tick(cx);
        }
    }

    fn request_tick(&mut self, cx: &mut WidgetContext<'_>) {
        self.handle =
            cx.request_animation_callback::<ScrollBar>(|bar, cx, now| bar.tick(cx, now));
    }

    fn tick(&mut self, cx: &mut WidgetContext<'_>, now: Instant) {
        self.handle = AnimationHandle::INVALID;
        let mut dt = self
            .last_tick
            .map_or(0.0, |t| signed_seconds(now, t).max(0.0));
        self.last_tick = Some(now);

        let mut value = self.animation_value.get();
        if self.target > value {
            value = (value + dt / EXPAND_SECONDS).min(self.target);
        } else if self.target < value {
            // The hold only counts down while the pointer is up; whatever is
            // left of this frame after it expires goes to collapsing.
            if self.hold_remaining > 0.0 {
                if self.mouse_down {
                    dt = 0.0;
                } else {
                    let used = dt.min(self.hold_remaining);
                    self.hold_remaining -= used;
                    dt -= used;
                }
            }
            value = (value - dt / EXPAND_SECONDS).max(self.target);
        }
        self.animation_value.set(value);

        let mut decaying = false;
        if let Some((start, from)) = self.release {
            let t = signed_seconds(now, start).max(0.0) / OVERSCROLL_DECAY_SECONDS;
            if t >= 1.0 {
                self.release = None;
                self.flubber_factor.set(1.0);
            } else {
                self.flubber_factor
                    .set(compute_flubber_factor(from * (1.0 - t)));
                decaying = true;
            }
        }

        if value != self.target || decaying {
            self.request_tick(cx);
        } else {
            log::trace!("scrollbar animation stopped for {:?}", cx.id());
        }
    }

    fn drag_to(&mut self, cx: &WidgetContext<'_>, screen: Vec2) {
        let track = track_rect(self.orientation, cx.client_rect());
        let extent = match self.orientation {
            Orientation::Vertical => track.h,
            Orientation::Horizontal => track.w,
        };
        if extent <= 0.0 {
            return;
        }
        let doc = self.document_size.get();
        let max = self.max_scroll_offset();
        let delta = self.axis(screen) - self.axis(self.down_point);
        let offset = self.down_offset + delta * doc / extent;

        let excess = if offset < 0.0 {
            offset
        } else if offset > max {
            offset - max
        } else {
            0.0
        };
        let excess = excess.clamp(-MAX_OVERSCROLL, MAX_OVERSCROLL);
        self.overscroll.set(excess);
        self.flubber_factor.set(compute_flubber_factor(excess));
        self.scroll_offset.set(offset.clamp(0.0, max));
    }

    fn click_at(&mut self, cx: &WidgetContext<'_>, e: &PointerEvent) {
        let track = track_rect(self.orientation, cx.client_rect());
        let (origin, extent) = match self.orientation {
            Orientation::Vertical => (track.top(), track.h),
            Orientation::Horizontal => (track.left(), track.w),
        };
        if extent <= 0.0 {
            return;
        }
        let doc = self.document_size.get();
        let window = self.window_size.get();
        let offset = ((self.axis(e.position) - origin) / extent * doc - window / 2.0).round();
        self.scroll_offset
            .set(offset.clamp(0.0, self.max_scroll_offset()));
    }
}

impl Widget for ScrollBar {
    fn kind(&self) -> &'static str {
        match self.orientation {
            Orientation::Vertical => "VerticalScrollBar",
            Orientation::Horizontal => "HorizontalScrollBar",
        }
    }

    fn default_style(&self, theme: &Theme) -> Style {
        match self.orientation {
            Orientation::Vertical => theme.vertical_scrollbar,
            Orientation::Horizontal => theme.horizontal_scrollbar,
        }
    }

    fn mount(&mut self, cx: &mut WidgetContext<'_>) {
        let inv = cx.invalidation();
        let redraw = BindingFlags::INVALIDATE_ON_CHANGED;
        self.window_size.set_element(&inv, redraw);
        self.document_size.set_element(&inv, redraw);
        self.scroll_offset.set_element(&inv, redraw);
        self.thumb_hover_colors.set_element(&inv, redraw);
        self.track_hover_colors.set_element(&inv, redraw);
        self.collapsed_style.set_element(&inv, redraw);
        self.animation_value.set_element(&inv, redraw);
        self.overscroll.set_element(&inv, redraw);
        self.flubber_factor.set_element(&inv, redraw);
    }

    fn unmount(&mut self, cx: &mut WidgetContext<'_>) {
        cx.cancel_animation_callback(&mut self.handle);
        cx.release_capture();
        self.animation_value.set(0.0);
        self.flubber_factor.set(1.0);
        self.overscroll.set(0.0);
        self.target = 0.0;
        self.release = None;
        self.mouse_down = false;
        self.dragging = false;
        self.hover_state = HoverState::empty();
    }

    fn draw(&mut self, cx: &mut WidgetContext<'_>, dc: &mut dyn DrawingContext) {
        let window = self.window_size.get();
        let doc = self.document_size.get();
        if doc <= 0.0 || window >= doc {
            return;
        }
        let theme = cx.theme();
        let collapsed = self.collapsed_style(theme);
        let thumb_hover_colors = self.thumb_hover_colors.get().unwrap_or(theme.scrollbar_thumb);
        let track_hover_colors = self.track_hover_colors.get().unwrap_or(theme.scrollbar_track);
        let anim = self.animation_value.get();
        let client = cx.client_rect();
        let pad = cx.padding_rect();

        let collapsed_track = match self.orientation {
            Orientation::Vertical => {
                let w = collapsed.width;
                Rect::new(pad.right() - w, pad.top(), w, pad.h)
            }
            Orientation::Horizontal => {
                let h = collapsed.height;
                Rect::new(pad.left(), pad.bottom() - h, pad.w, h)
            }
        };

        let track = collapsed_track.interpolate(&pad, anim);
        let track_color = Color::blend(
            anim,
            track_hover_colors.color(HoverState::empty()),
            track_hover_colors.color(self.hover_state),
        );
        dc.fill_round_rect(track, cx.style().round_corners, track_color);

        let thumb_client = collapsed_track
            .remove_thickness(collapsed.padding)
            .interpolate(&client, anim);
        let thumb = thumb_rect(
            self.orientation,
            thumb_client,
            window,
            doc,
            self.scroll_offset.get(),
        );
        let thumb_color = Color::blend(
            anim,
            thumb_hover_colors.color(HoverState::empty()),
            thumb_hover_colors.color(self.hover_state),
        );

        let flubber = self.flubber_factor.get();
        dc.save();
        if flubber != 1.0 {
            // Negative overscroll squashes toward the leading edge, positive
            // toward the trailing edge.
            let (ax, ay) = if flubber < 0.0 {
                (thumb.left(), thumb.top())
            } else {
                (thumb.right(), thumb.bottom())
            };
            let f = flubber.abs();
            dc.translate(ax, ay);
            match self.orientation {
                Orientation::Vertical => dc.scale(1.0, f),
                Orientation::Horizontal => dc.scale(f, 1.0),
            }
            dc.translate(-ax, -ay);
        }
        dc.fill_round_rect(
            thumb,
            RoundCorners::all(thumb.w.min(thumb.h) / 2.0),
            thumb_color,
        );
        dc.restore();
    }

    fn pointer_target(&mut self) -> Option<&mut dyn PointerTarget> {
        Some(self)
    }
}

impl PointerTarget for ScrollBar {
    fn pointer_enter(&mut self, cx: &mut WidgetContext<'_>, _e: &PointerEvent) {
        self.hover_state |= HoverState::HOVER;
        self.hold_remaining = self.hold_seconds;
        self.start_animation(cx, 1.0);
        cx.invalidate();
    }

    fn pointer_leave(&mut self, cx: &mut WidgetContext<'_>) {
        self.hover_state -= HoverState::HOVER;
        self.hold_remaining = self.hold_seconds;
        self.start_animation(cx, 0.0);
        cx.invalidate();
    }

    fn pointer_down(&mut self, cx: &mut WidgetContext<'_>, e: &PointerEvent) -> bool {
        if !self.is_scrollable() {
            return false;
        }
        cx.capture_pointer();
        self.mouse_down = true;
        let target = self.target;
        self.start_animation(cx, target);
        self.hold_remaining = self.hold_seconds;
        self.hover_state |= HoverState::PRESSED;
        self.dragging = false;
        self.release = None;
        self.down_offset = self.scroll_offset.get();
        self.down_point = e.screen_position;
        cx.invalidate();
        true
    }

    fn pointer_move(&mut self, cx: &mut WidgetContext<'_>, e: &PointerEvent) -> bool {
        if !self.mouse_down {
            return false;
        }
        if !self.dragging && e.screen_position.distance(self.down_point) >= DRAG_THRESHOLD {
            self.dragging = true;
        }
        if self.dragging {
            self.drag_to(cx, e.screen_position);
        }
        true
    }

    fn pointer_up(&mut self, cx: &mut WidgetContext<'_>, e: &PointerEvent) -> bool {
        if !self.mouse_down {
            return false;
        }
        self.mouse_down = false;
        self.hover_state -= HoverState::PRESSED;
        if !self.dragging {
            self.click_at(cx, e);
        } else {
            let over = self.overscroll.get();
            if over != 0.0 {
                self.release = Some((cx.now(), over));
            }
        }
        self.overscroll.set(0.0);
        self.dragging = false;
        cx.release_capture();
        self.hold_remaining = self.hold_seconds;
        let target = self.target;
        self.start_animation(cx, target);
        cx.invalidate();
        true
    }
}
