//! Measure/arrange driver.
//!
//! Layout is two passes over the mounted tree. `measure` walks down with a
//! constraint and an available-space ceiling and records each widget's
//! desired margin-box size. `arrange` walks down again handing each child
//! its final rectangle. A widget's own `measure_client`/`arrange` only ever
//! see the client area: margin, border and padding are peeled off here.
//!
//! Once the tree is arranged, every widget gets `finalize_layout`. A widget
//! that only needs to shift its children (a scroll container whose offset
//! changed) calls `Invalidation::invalidate_arrangement` and is given
//! `redo_final_layout` on the next `update_layout`, without anything being
//! measured again.

use faceplate_core::{Alignment, Dirty, Rect, Size, Vec2, WidgetId};

use crate::{Window, WidgetContext};

/// Fallback extent when a root or unconstrained container measures as zero.
pub const DEFAULT_EXTENT: f32 = 50.0;

/// Stands in for "unbounded" on scrolled axes.
pub const UNBOUNDED: f32 = 3.0e15;

impl Window {
    pub(crate) fn measure_node(&mut self, id: WidgetId, constraint: Size, available: Size) -> Size {
        self.stats.measure_calls += 1;
        let Some(node) = self.nodes.get_mut(id) else {
            return Size::ZERO;
        };
        let style = node.style;
        if style.is_collapsed() {
            node.layout.measured = Size::ZERO;
            return Size::ZERO;
        }

        let h_stretch = style.horizontal_alignment == Alignment::Stretch;
        let v_stretch = style.vertical_alignment == Alignment::Stretch;
        let constraint = Size::new(
            if h_stretch { constraint.width } else { 0.0 },
            if v_stretch { constraint.height } else { 0.0 },
        )
        .remove_thickness(style.margin);
        let outer_available = available;
        let available = available.remove_thickness(style.margin);

        let frame_w = style.border_width.horizontal() + style.padding.horizontal();
        let frame_h = style.border_width.vertical() + style.padding.vertical();

        // Fixed sizes act as constraints on content.
        let fixed = Size::new(
            if style.width > 0.0 { style.width } else { constraint.width },
            if style.height > 0.0 { style.height } else { constraint.height },
        );
        let client_constraint = fixed
            .remove_thickness(style.border_width)
            .remove_thickness(style.padding);
        let mut client_available = available
            .remove_thickness(style.border_width)
            .remove_thickness(style.padding);
        if client_constraint.width > 0.0 {
            client_available.width = client_available.width.min(client_constraint.width);
        }
        if client_constraint.height > 0.0 {
            client_available.height = client_available.height.min(client_constraint.height);
        }
        if style.max_width > 0.0 {
            client_available.width = client_available.width.min((style.max_width - frame_w).max(0.0));
        }
        if style.max_height > 0.0 {
            client_available.height =
                client_available.height.min((style.max_height - frame_h).max(0.0));
        }

        let client = self
            .with_widget(id, |w, cx| {
                w.measure_client(cx, client_constraint, client_available)
            })
            .unwrap_or_default();

        let mut size = client
            .add_thickness(style.padding)
            .add_thickness(style.border_width);
        if style.width > 0.0 {
            size.width = style.width;
        } else if h_stretch && constraint.width > 0.0 {
            size.width = size.width.max(constraint.width);
        }
        if style.height > 0.0 {
            size.height = style.height;
        } else if v_stretch && constraint.height > 0.0 {
            size.height = size.height.max(constraint.height);
        }
        if style.max_width > 0.0 {
            size.width = size.width.min(style.max_width);
        }
        if style.max_height > 0.0 {
            size.height = size.height.min(style.max_height);
        }
        size.width = size.width.max(style.min_width);
        size.height = size.height.max(style.min_height);

        let mut size = size.add_thickness(style.margin);
        size.width = size.width.min(outer_available.width);
        size.height = size.height.min(outer_available.height);

        if let Some(node) = self.nodes.get_mut(id) {
            node.layout.measured = size;
        }
        size
    }

    fn parent_origin(&self, id: WidgetId) -> Vec2 {
        self.nodes
            .get(id)
            .and_then(|n| n.parent)
            .and_then(|p| self.nodes.get(p))
            .map(|p| Vec2::new(p.layout.screen_client.x, p.layout.screen_client.y))
            .unwrap_or_default()
    }

    /// `rect` is the margin box in the parent's client coordinates.
    pub(crate) fn arrange_node(&mut self, id: WidgetId, rect: Rect) {
        self.stats.arrange_calls += 1;
        let origin = self.parent_origin(id);
        let Some(node) = self.nodes.get_mut(id) else {
            return;
        };
        let style = node.style;
        if style.is_collapsed() {
            node.layout.bounds = Rect::new(rect.x, rect.y, 0.0, 0.0);
            node.layout.client_size = Size::ZERO;
            node.layout.screen_bounds = node.layout.bounds.translate(origin);
            node.layout.screen_client = node.layout.screen_bounds;
            return;
        }
        let bounds = rect.remove_thickness(style.margin);
        let bounds = Rect::new(bounds.x, bounds.y, bounds.w.max(0.0), bounds.h.max(0.0));
        let client_size = bounds
            .size()
            .remove_thickness(style.border_width)
            .remove_thickness(style.padding);
        let screen_bounds = bounds.translate(origin);
        node.layout.bounds = bounds;
        node.layout.client_size = client_size;
        node.layout.screen_bounds = screen_bounds;
        node.layout.screen_client = Rect::new(
            screen_bounds.x + style.border_width.left + style.padding.left,
            screen_bounds.y + style.border_width.top + style.padding.top,
            client_size.width,
            client_size.height,
        );

        self.with_widget(id, |w, cx| w.arrange(cx, client_size));
    }

    pub(crate) fn reposition_node(&mut self, id: WidgetId, rect: Rect) {
        let Some(node) = self.nodes.get_mut(id) else {
            return;
        };
        let bounds = rect.remove_thickness(node.style.margin);
        let old = node.layout.bounds;
        if node.style.is_collapsed() || bounds.size() != old.size() {
            self.arrange_node(id, rect);
            return;
        }
        node.layout.bounds = bounds;
        let d = Vec2::new(bounds.x - old.x, bounds.y - old.y);
        if d != Vec2::default() {
            self.shift_screen(id, d);
        }
    }

    fn shift_screen(&mut self, id: WidgetId, d: Vec2) {
        let mut stack = vec![id];
        while let Some(cur) = stack.pop() {
            if let Some(node) = self.nodes.get_mut(cur) {
                node.layout.screen_bounds = node.layout.screen_bounds.translate(d);
                node.layout.screen_client = node.layout.screen_client.translate(d);
                stack.extend(node.children.iter().copied());
            }
        }
    }

    fn finalize_subtree(&mut self, id: WidgetId) {
        for c in self.children(id).to_vec() {
            self.finalize_subtree(c);
        }
        self.with_widget(id, |w, cx| w.finalize_layout(cx));
    }

    /// Brings geometry up to date. A full measure/arrange pass runs only if
    /// something invalidated layout (or the window was resized); pending
    /// repositions run either way. Returns whether anything moved.
    pub fn update_layout(&mut self) -> bool {
        let Some(root) = self.root else {
            return false;
        };
        let root_dirty = self
            .nodes
            .get(root)
            .is_some_and(|n| n.invalidation.needs_layout());
        let mut changed = false;

        if !self.layout_valid || root_dirty {
            self.stats.layout_passes += 1;
            let mut size = self.measure_node(root, self.size, self.size);
            if size.width <= 0.0 {
                log::error!("root widget measured zero width, using {DEFAULT_EXTENT}px");
                size.width = DEFAULT_EXTENT;
            }
            if size.height <= 0.0 {
                log::error!("root widget measured zero height, using {DEFAULT_EXTENT}px");
                size.height = DEFAULT_EXTENT;
            }
            self.arrange_node(root, Rect::from_size(size));
            self.finalize_subtree(root);
            for node in self.nodes.values() {
                node.invalidation.clear(Dirty::LAYOUT);
            }
            self.layout_valid = true;
            changed = true;
        }

        // Repositioning can clamp offsets, which can ask for another pass.
        for _ in 0..4 {
            let pending: Vec<WidgetId> = self
                .nodes
                .iter()
                .filter(|(_, n)| n.mounted && n.invalidation.needs_reposition())
                .map(|(id, _)| id)
                .collect();
            if pending.is_empty() {
                break;
            }
            self.stats.reposition_passes += 1;
            for id in pending {
                if let Some(node) = self.nodes.get(id) {
                    node.invalidation.clear(Dirty::REPOSITION);
                }
                self.with_widget(id, |w, cx| w.redo_final_layout(cx));
            }
            changed = true;
        }
        changed
    }
}

/// Measures every child against the same client constraint and returns
/// the extent of the largest one.
pub fn measure_stacked(cx: &mut WidgetContext<'_>, constraint: Size, available: Size) -> Size {
    let mut size = Size::ZERO;
    for child in cx.children() {
        let s = cx.measure_child(child, constraint, available);
        size.width = size.width.max(s.width);
        size.height = size.height.max(s.height);
    }
    size
}

/// Places each child inside the client area according to its alignment.
pub fn arrange_stacked(cx: &mut WidgetContext<'_>, client_size: Size) {
    for child in cx.children() {
        let measured = cx.child_measured_size(child);
        let style = cx.child_style(child);
        let (x, w) = align(style.horizontal_alignment, measured.width, client_size.width);
        let (y, h) = align(style.vertical_alignment, measured.height, client_size.height);
        cx.arrange_child(child, Rect::new(x, y, w, h));
    }
}

/// Offset and extent of something `size` long inside `extent`.
pub fn align(alignment: Alignment, size: f32, extent: f32) -> (f32, f32) {
    match alignment {
        Alignment::Start => (0.0, size),
        Alignment::Center => ((extent - size) / 2.0, size),
        Alignment::End => (extent - size, size),
        Alignment::Stretch => (0.0, extent),
    }
}
