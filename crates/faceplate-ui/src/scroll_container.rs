//! # Scroll container
//!
//! Shows one content child through a clipped viewport, with a horizontal
//! and a vertical [`ScrollBar`] overlaid along the bottom and right edges.
//!
//! ```rust
//! use faceplate_core::*;
//! use faceplate_ui::*;
//!
//! let mut window = Window::new(Size::new(100.0, 100.0));
//! let scroller = ScrollContainer::new().insert(&mut window).unwrap();
//! window.set_root(scroller).unwrap();
//! ScrollContainer::set_content(
//!     &mut window,
//!     scroller,
//!     Panel::with_style(Style::new().size(100.0, 300.0)),
//! )
//! .unwrap();
//!
//! window.update_layout();
//! let sc = window.widget::<ScrollContainer>(scroller).unwrap();
//! assert_eq!(sc.maximum_vertical_scroll_offset.get(), 200.0);
//! ```
//!
//! The container's offset properties are bound one way into the bars, and
//! each bar reports drags back through a plain subscription, so the binding
//! graph stays acyclic and equality gating ends the echo after one hop.
//!
//! Changing an offset only moves the content: the container asks for
//! `redo_final_layout` and nothing is measured again.

use faceplate_core::{
    BindingFlags, Key, KeyEvent, Modifiers, PointerEvent, Property, Rect, Result,
    ScrollDirection, Size, Style, SubscriptionId, Theme, Visibility, WidgetId,
};
use smallvec::SmallVec;

use crate::layout::{DEFAULT_EXTENT, UNBOUNDED};
use crate::{KeyTarget, PointerTarget, ScrollBar, Widget, WidgetContext, Window};

pub const WHEEL_STEP: f32 = 24.0;
pub const LINE_STEP: f32 = 16.0;
/// A page is the viewport less this much overlap.
pub const PAGE_OVERLAP: f32 = 32.0;

pub struct ScrollContainer {
    pub horizontal_scroll_enabled: Property<bool>,
    pub vertical_scroll_enabled: Property<bool>,
    pub horizontal_scroll_offset: Property<f32>,
    pub vertical_scroll_offset: Property<f32>,
    pub horizontal_document_size: Property<f32>,
    pub vertical_document_size: Property<f32>,
    pub horizontal_window_size: Property<f32>,
    pub vertical_window_size: Property<f32>,
    pub maximum_horizontal_scroll_offset: Property<f32>,
    pub maximum_vertical_scroll_offset: Property<f32>,
    /// Whether a click gives the container keyboard focus.
    pub focusable: bool,

    /// (horizontal, vertical)
    bars: Option<(WidgetId, WidgetId)>,
    content: Option<WidgetId>,
    content_size: Size,
    offset_subscriptions: SmallVec<[SubscriptionId; 2]>,
}

impl Default for ScrollContainer {
    fn default() -> Self {
        Self::new()
    }
}

impl ScrollContainer {
    pub fn new() -> Self {
        Self {
            horizontal_scroll_enabled: Property::new(true),
            vertical_scroll_enabled: Property::new(true),
            horizontal_scroll_offset: Property::new(0.0),
            vertical_scroll_offset: Property::new(0.0),
            horizontal_document_size: Property::new(0.0),
            vertical_document_size: Property::new(0.0),
            horizontal_window_size: Property::new(0.0),
            vertical_window_size: Property::new(0.0),
            maximum_horizontal_scroll_offset: Property::new(0.0),
            maximum_vertical_scroll_offset: Property::new(0.0),
            focusable: true,
            bars: None,
            content: None,
            content_size: Size::ZERO,
            offset_subscriptions: SmallVec::new(),
        }
    }

    pub fn vertical_only(self) -> Self {
        self.horizontal_scroll_enabled.set(false);
        self
    }

    pub fn horizontal_only(self) -> Self {
        self.vertical_scroll_enabled.set(false);
        self
    }

    /// Adds the container and its two scrollbars to `window`. The returned
    /// widget has no parent yet.
    pub fn insert(mut self, window: &mut Window) -> Result<WidgetId> {
        let hbar = ScrollBar::horizontal();
        let vbar = ScrollBar::vertical();
        self.connect(&hbar, Axis::Horizontal);
        self.connect(&vbar, Axis::Vertical);

        let hbar = window.insert(hbar);
        let vbar = window.insert(vbar);
        self.bars = Some((hbar, vbar));
        let id = window.insert(self);
        window.append_child(id, hbar)?;
        window.append_child(id, vbar)?;
        Ok(id)
    }

    fn connect(&self, bar: &ScrollBar, axis: Axis) {
        let (offset, document, viewport) = self.axis_properties(axis);
        offset.bind(&bar.scroll_offset);
        document.bind(&bar.document_size);
        viewport.bind(&bar.window_size);
        let offset = offset.clone();
        bar.scroll_offset.subscribe(move |v| offset.set(*v));
    }

    /// Replaces the scrolled content of the container `id`. The previous
    /// content, if any, is removed from the window.
    pub fn set_content<W: Widget>(window: &mut Window, id: WidgetId, content: W) -> Result<WidgetId> {
        let old = window.widget_mut::<ScrollContainer>(id)?.content.take();
        if let Some(old) = old
            && window.contains(old)
        {
            window.remove(old)?;
        }
        let child = window.insert(content);
        window.insert_child(id, 0, child)?;
        window.widget_mut::<ScrollContainer>(id)?.content = Some(child);
        Ok(child)
    }

    pub fn content(&self) -> Option<WidgetId> {
        self.content
    }

    pub fn horizontal_scroll_bar(&self) -> Option<WidgetId> {
        self.bars.map(|(h, _)| h)
    }

    pub fn vertical_scroll_bar(&self) -> Option<WidgetId> {
        self.bars.map(|(_, v)| v)
    }

    fn axis_properties(&self, axis: Axis) -> (&Property<f32>, &Property<f32>, &Property<f32>) {
        match axis {
            Axis::Horizontal => (
                &self.horizontal_scroll_offset,
                &self.horizontal_document_size,
                &self.horizontal_window_size,
            ),
            Axis::Vertical => (
                &self.vertical_scroll_offset,
                &self.vertical_document_size,
                &self.vertical_window_size,
            ),
        }
    }

    fn axis_enabled(&self, axis: Axis) -> bool {
        match axis {
            Axis::Horizontal => self.horizontal_scroll_enabled.get(),
            Axis::Vertical => self.vertical_scroll_enabled.get(),
        }
    }

    fn axis_maximum(&self, axis: Axis) -> f32 {
        match axis {
            Axis::Horizontal => self.maximum_horizontal_scroll_offset.get(),
            Axis::Vertical => self.maximum_vertical_scroll_offset.get(),
        }
    }

    /// Moves the offset on `axis` by `delta`, clamped. Returns `false` if
    /// scrolling is disabled on that axis.
    fn nudge(&self, axis: Axis, delta: f32) -> bool {
        if !self.axis_enabled(axis) {
            return false;
        }
        let (offset, ..) = self.axis_properties(axis);
        let max = self.axis_maximum(axis);
        offset.set((offset.get() + delta).clamp(0.0, max));
        true
    }

    fn content_rect(&self) -> Rect {
        Rect::new(
            -self.horizontal_scroll_offset.get(),
            -self.vertical_scroll_offset.get(),
            self.content_size.width,
            self.content_size.height,
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Axis {
    Horizontal,
    Vertical,
}

fn visibility(enabled: bool) -> Visibility {
    if enabled {
        Visibility::Visible
    } else {
        Visibility::Collapsed
    }
}

impl Widget for ScrollContainer {
    fn kind(&self) -> &'static str {
        "ScrollContainer"
    }

    fn default_style(&self, theme: &Theme) -> Style {
        theme.scroll_container
    }

    fn mount(&mut self, cx: &mut WidgetContext<'_>) {
        let inv = cx.invalidation();
        self.horizontal_scroll_enabled
            .set_element(&inv, BindingFlags::INVALIDATE_LAYOUT_ON_CHANGED);
        self.vertical_scroll_enabled
            .set_element(&inv, BindingFlags::INVALIDATE_LAYOUT_ON_CHANGED);
        for offset in [&self.horizontal_scroll_offset, &self.vertical_scroll_offset] {
            let weak = inv.downgrade();
            let sub = offset.subscribe(move |_| {
                if let Some(inv) = weak.upgrade() {
                    inv.invalidate_arrangement();
                }
            });
            self.offset_subscriptions.push(sub);
        }
    }

    fn unmount(&mut self, _cx: &mut WidgetContext<'_>) {
        let mut subs = std::mem::take(&mut self.offset_subscriptions).into_iter();
        if let Some(h) = subs.next() {
            self.horizontal_scroll_offset.unsubscribe(h);
        }
        if let Some(v) = subs.next() {
            self.vertical_scroll_offset.unsubscribe(v);
        }
    }

    fn measure_client(
        &mut self,
        cx: &mut WidgetContext<'_>,
        constraint: Size,
        available: Size,
    ) -> Size {
        let h_on = self.horizontal_scroll_enabled.get();
        let v_on = self.vertical_scroll_enabled.get();

        if let Some((hbar, vbar)) = self.bars {
            cx.set_child_visibility(hbar, visibility(h_on));
            cx.set_child_visibility(vbar, visibility(v_on));
            // Each bar stops short of the other when both are shown.
            let h_thickness = cx.child_style(hbar).height;
            let v_thickness = cx.child_style(vbar).width;
            let shorten = |s: Size, dw: f32, dh: f32| {
                Size::new(
                    if s.width > 0.0 { (s.width - dw).max(0.0) } else { 0.0 },
                    if s.height > 0.0 { (s.height - dh).max(0.0) } else { 0.0 },
                )
            };
            let (dv, dh) = if h_on && v_on {
                (h_thickness, v_thickness)
            } else {
                (0.0, 0.0)
            };
            cx.measure_child(vbar, shorten(constraint, 0.0, dv), shorten(available, 0.0, dv));
            cx.measure_child(hbar, shorten(constraint, dh, 0.0), shorten(available, dh, 0.0));
        }

        if let Some(content) = self.content {
            let mut child_constraint = Size::ZERO;
            let mut child_available = Size::new(UNBOUNDED, UNBOUNDED);
            if !h_on {
                child_constraint.width = constraint.width;
                child_available.width = available.width;
            }
            if !v_on {
                child_constraint.height = constraint.height;
                child_available.height = available.height;
            }
            cx.measure_child(content, child_constraint, child_available);
        }

        let mut size = constraint;
        if size.width <= 0.0 {
            log::error!("scroll container has unconstrained width, using {DEFAULT_EXTENT}px");
            size.width = DEFAULT_EXTENT;
        }
        if size.height <= 0.0 {
            log::error!("scroll container has unconstrained height, using {DEFAULT_EXTENT}px");
            size.height = DEFAULT_EXTENT;
        }
        size
    }

    fn arrange(&mut self, cx: &mut WidgetContext<'_>, client_size: Size) {
        let h_on = self.horizontal_scroll_enabled.get();
        let v_on = self.vertical_scroll_enabled.get();

        if let Some((hbar, vbar)) = self.bars {
            let h_thickness = if h_on { cx.child_measured_size(hbar).height } else { 0.0 };
            let v_thickness = if v_on { cx.child_measured_size(vbar).width } else { 0.0 };
            cx.arrange_child(
                hbar,
                Rect::new(
                    0.0,
                    client_size.height - h_thickness,
                    (client_size.width - v_thickness).max(0.0),
                    h_thickness,
                ),
            );
            cx.arrange_child(
                vbar,
                Rect::new(
                    client_size.width - v_thickness,
                    0.0,
                    v_thickness,
                    (client_size.height - h_thickness).max(0.0),
                ),
            );
        }

        match self.content {
            Some(content) => {
                self.content_size = cx.child_measured_size(content);
                let rect = self.content_rect();
                cx.arrange_child(content, rect);
            }
            None => self.content_size = Size::ZERO,
        }
    }

    fn finalize_layout(&mut self, cx: &mut WidgetContext<'_>) {
        let client = cx.client_size();
        self.horizontal_window_size.set(client.width);
        self.vertical_window_size.set(client.height);
        self.horizontal_document_size.set(self.content_size.width);
        self.vertical_document_size.set(self.content_size.height);

        let max_h = (self.content_size.width - client.width).max(0.0);
        let max_v = (self.content_size.height - client.height).max(0.0);
        self.maximum_horizontal_scroll_offset.set(max_h);
        self.maximum_vertical_scroll_offset.set(max_v);
        // Clamping here asks for a reposition, not a relayout.
        if self.horizontal_scroll_offset.get() > max_h {
            self.horizontal_scroll_offset.set(max_h);
        }
        if self.vertical_scroll_offset.get() > max_v {
            self.vertical_scroll_offset.set(max_v);
        }
    }

    fn redo_final_layout(&mut self, cx: &mut WidgetContext<'_>) {
        if let Some(content) = self.content {
            let rect = self.content_rect();
            cx.reposition_child(content, rect);
            cx.invalidate();
        }
    }

    fn clip_children(&self) -> bool {
        true
    }

    fn pointer_target(&mut self) -> Option<&mut dyn PointerTarget> {
        Some(self)
    }

    fn key_target(&mut self) -> Option<&mut dyn KeyTarget> {
        Some(self)
    }
}

impl PointerTarget for ScrollContainer {
    fn scroll_wheel(
        &mut self,
        _cx: &mut WidgetContext<'_>,
        _e: &PointerEvent,
        direction: ScrollDirection,
    ) -> bool {
        match direction {
            ScrollDirection::Up => self.nudge(Axis::Vertical, -WHEEL_STEP),
            ScrollDirection::Down => self.nudge(Axis::Vertical, WHEEL_STEP),
            ScrollDirection::Left => self.nudge(Axis::Horizontal, -WHEEL_STEP),
            ScrollDirection::Right => self.nudge(Axis::Horizontal, WHEEL_STEP),
        }
    }
}

impl KeyTarget for ScrollContainer {
    fn wants_focus(&self) -> bool {
        self.focusable
    }

    fn key_down(&mut self, cx: &mut WidgetContext<'_>, e: &KeyEvent) -> bool {
        let axis = if e.modifiers.contains(Modifiers::SHIFT) {
            Axis::Horizontal
        } else {
            Axis::Vertical
        };
        let client = cx.client_size();
        let extent = match axis {
            Axis::Horizontal => client.width,
            Axis::Vertical => client.height,
        };
        let page = (extent - PAGE_OVERLAP).floor().max(LINE_STEP);
        let max = self.axis_maximum(axis);
        let current = self.axis_properties(axis).0.get();
        let delta = match e.key {
            Key::ArrowUp => -LINE_STEP,
            Key::ArrowDown => LINE_STEP,
            Key::PageUp => -page,
            Key::PageDown => page,
            Key::Home => -current,
            Key::End => max - current,
            _ => return false,
        };
        self.nudge(axis, delta)
    }
}
