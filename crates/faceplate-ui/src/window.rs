//! # Window
//!
//! A `Window` owns every widget in a generational arena. Children are
//! referenced by [`WidgetId`]; parents are plain back-references. While a
//! widget's method runs, its box is taken out of the arena, so the widget
//! can borrow itself mutably and still reach the rest of the tree through
//! its [`WidgetContext`].
//!
//! ```rust
//! use faceplate_core::*;
//! use faceplate_ui::*;
//!
//! let clock = ManualClock::default();
//! let mut window = Window::with_clock(Size::new(200.0, 100.0), clock.clone());
//! let meter = window.insert(VuMeter::new());
//! window.set_root(meter).unwrap();
//!
//! window.widget::<VuMeter>(meter).unwrap().value.set(0.5);
//! let mut scene = Scene::new();
//! window.draw(&mut scene);
//! assert!(scene.fill_count() > 0);
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use faceplate_core::{
    AnimationHandle, Clock, DrawingContext, Error, FrameScheduler, Invalidation, KeyEvent,
    Modifiers, PointerEvent, Rect, Result, ScrollDirection, Size, Style, SystemClock, Theme, Vec2,
    Visibility, WidgetId,
};
use slotmap::SlotMap;
use smallvec::SmallVec;
use web_time::{Duration, Instant};

use crate::widget::{PointerTarget, Widget};

pub type AnimationFn = Box<dyn FnOnce(&mut dyn Widget, &mut WidgetContext<'_>, Instant)>;

/// Shared handle to a window's frame scheduler and clock. Widgets keep a
/// clone when something other than their own handlers (a property
/// subscription, say) needs to start an animation.
#[derive(Clone)]
pub struct Animator {
    scheduler: Rc<RefCell<FrameScheduler<(WidgetId, AnimationFn)>>>,
    clock: Rc<dyn Clock>,
}

impl Animator {
    fn new(clock: Rc<dyn Clock>) -> Self {
        Self {
            scheduler: Rc::new(RefCell::new(FrameScheduler::new())),
            clock,
        }
    }

    pub fn now(&self) -> Instant {
        self.clock.now()
    }

    /// Registers a one-shot callback for the next frame. It is skipped if
    /// the widget is gone or unmounted by then.
    pub fn request<W: Widget>(
        &self,
        id: WidgetId,
        f: impl FnOnce(&mut W, &mut WidgetContext<'_>, Instant) + 'static,
    ) -> AnimationHandle {
        self.scheduler.borrow_mut().request((id, downcasting(f)))
    }

    pub fn post_delayed<W: Widget>(
        &self,
        id: WidgetId,
        delay: Duration,
        f: impl FnOnce(&mut W, &mut WidgetContext<'_>, Instant) + 'static,
    ) -> AnimationHandle {
        let due = self.now() + delay;
        self.scheduler
            .borrow_mut()
            .post_delayed(due, (id, downcasting(f)))
    }

    pub fn cancel(&self, handle: &mut AnimationHandle) -> bool {
        self.scheduler.borrow_mut().cancel(handle)
    }

    pub fn is_pending(&self, handle: AnimationHandle) -> bool {
        self.scheduler.borrow().is_pending(handle)
    }

    pub fn pending(&self) -> usize {
        self.scheduler.borrow().len()
    }

    pub fn wants_frame(&self) -> bool {
        self.scheduler.borrow().wants_frame()
    }

    pub fn next_due(&self) -> Option<Instant> {
        self.scheduler.borrow().next_due()
    }

    fn frame_handles(&self, now: Instant) -> Vec<AnimationHandle> {
        self.scheduler.borrow().frame_handles(now)
    }

    fn take_callback(&self, handle: AnimationHandle) -> Option<(WidgetId, AnimationFn)> {
        self.scheduler.borrow_mut().take_callback(handle)
    }
}

fn downcasting<W: Widget>(
    f: impl FnOnce(&mut W, &mut WidgetContext<'_>, Instant) + 'static,
) -> AnimationFn {
    Box::new(
        move |w: &mut dyn Widget, cx: &mut WidgetContext<'_>, now: Instant| {
            let any: &mut dyn std::any::Any = w;
            match any.downcast_mut::<W>() {
                Some(w) => f(w, cx, now),
                None => log::error!(
                    "animation callback for {} delivered to another widget type",
                    std::any::type_name::<W>()
                ),
            }
        },
    )
}

/// Geometry of one node after layout.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct NodeLayout {
    /// Margin-box size from the last measure.
    pub measured: Size,
    /// Border box, relative to the parent's client origin.
    pub bounds: Rect,
    pub client_size: Size,
    /// Border box in window coordinates.
    pub screen_bounds: Rect,
    /// Client box in window coordinates.
    pub screen_client: Rect,
}

pub(crate) struct Node {
    pub(crate) widget: Option<Box<dyn Widget>>,
    pub(crate) kind: &'static str,
    pub(crate) parent: Option<WidgetId>,
    pub(crate) children: SmallVec<[WidgetId; 4]>,
    pub(crate) style: Style,
    pub(crate) layout: NodeLayout,
    pub(crate) invalidation: Invalidation,
    pub(crate) mounted: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LayoutStats {
    pub layout_passes: u64,
    pub reposition_passes: u64,
    pub measure_calls: u64,
    pub arrange_calls: u64,
}

pub struct Window {
    pub(crate) nodes: SlotMap<WidgetId, Node>,
    pub(crate) root: Option<WidgetId>,
    pub(crate) size: Size,
    pub(crate) theme: Theme,
    pub(crate) animator: Animator,
    pub(crate) capture: Option<WidgetId>,
    pub(crate) focus: Option<WidgetId>,
    pub(crate) hover: SmallVec<[WidgetId; 8]>,
    pub(crate) stats: LayoutStats,
    pub(crate) layout_valid: bool,
}

impl Window {
    pub fn new(size: Size) -> Self {
        Self::with_clock(size, SystemClock)
    }

    pub fn with_clock(size: Size, clock: impl Clock) -> Self {
        Self {
            nodes: SlotMap::with_key(),
            root: None,
            size,
            theme: Theme::default(),
            animator: Animator::new(Rc::new(clock)),
            capture: None,
            focus: None,
            hover: SmallVec::new(),
            stats: LayoutStats::default(),
            layout_valid: false,
        }
    }

    /// Replaces the theme. Styles of widgets already inserted are kept.
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn set_size(&mut self, size: Size) {
        if size != self.size {
            self.size = size;
            self.layout_valid = false;
        }
    }

    pub fn animator(&self) -> Animator {
        self.animator.clone()
    }

    pub fn now(&self) -> Instant {
        self.animator.now()
    }

    pub fn stats(&self) -> LayoutStats {
        self.stats
    }

    // Tree

    /// Adds a detached widget to the arena. It is mounted once it becomes
    /// reachable from the root.
    pub fn insert<W: Widget>(&mut self, widget: W) -> WidgetId {
        self.insert_boxed(Box::new(widget))
    }

    pub fn insert_boxed(&mut self, widget: Box<dyn Widget>) -> WidgetId {
        let style = widget.default_style(&self.theme);
        let kind = widget.kind();
        self.nodes.insert(Node {
            widget: Some(widget),
            kind,
            parent: None,
            children: SmallVec::new(),
            style,
            layout: NodeLayout::default(),
            invalidation: Invalidation::new(),
            mounted: false,
        })
    }

    pub fn set_root(&mut self, id: WidgetId) -> Result<()> {
        let node = self.nodes.get(id).ok_or(Error::UnknownWidget(id))?;
        if node.parent.is_some() {
            return Err(Error::AlreadyParented(id));
        }
        if let Some(old) = self.root.take() {
            self.unmount_subtree(old);
        }
        self.root = Some(id);
        self.layout_valid = false;
        self.mount_subtree(id);
        Ok(())
    }

    pub fn root(&self) -> Option<WidgetId> {
        self.root
    }

    /// Inserts `widget` and appends it to `parent`.
    pub fn add<W: Widget>(&mut self, parent: WidgetId, widget: W) -> Result<WidgetId> {
        if !self.nodes.contains_key(parent) {
            return Err(Error::UnknownWidget(parent));
        }
        let id = self.insert(widget);
        self.append_child(parent, id)?;
        Ok(id)
    }

    pub fn append_child(&mut self, parent: WidgetId, child: WidgetId) -> Result<()> {
        let index = self
            .nodes
            .get(parent)
            .map(|n| n.children.len())
            .ok_or(Error::UnknownWidget(parent))?;
        self.insert_child(parent, index, child)
    }

    pub fn insert_child(&mut self, parent: WidgetId, index: usize, child: WidgetId) -> Result<()> {
        let child_node = self.nodes.get(child).ok_or(Error::UnknownWidget(child))?;
        if child_node.parent.is_some() || self.root == Some(child) {
            return Err(Error::AlreadyParented(child));
        }
        let mut up = Some(parent);
        while let Some(a) = up {
            if a == child {
                return Err(Error::AlreadyParented(child));
            }
            up = self.parent(a);
        }
        let parent_node = self.nodes.get_mut(parent).ok_or(Error::UnknownWidget(parent))?;
        let index = index.min(parent_node.children.len());
        parent_node.children.insert(index, child);
        let parent_inv = parent_node.invalidation.clone();
        let parent_mounted = parent_node.mounted;

        if let Some(node) = self.nodes.get_mut(child) {
            node.parent = Some(parent);
            node.invalidation.set_parent(Some(&parent_inv));
        }
        parent_inv.invalidate_layout();
        if parent_mounted {
            self.mount_subtree(child);
        }
        Ok(())
    }

    /// Unmounts, detaches and drops a widget and all of its descendants.
    pub fn remove(&mut self, id: WidgetId) -> Result<()> {
        if !self.nodes.contains_key(id) {
            return Err(Error::UnknownWidget(id));
        }
        self.unmount_subtree(id);
        if let Some(parent) = self.nodes.get(id).and_then(|n| n.parent)
            && let Some(p) = self.nodes.get_mut(parent)
        {
            p.children.retain(|c| *c != id);
            p.invalidation.invalidate_layout();
        }
        if self.root == Some(id) {
            self.root = None;
        }
        let mut stack = vec![id];
        while let Some(cur) = stack.pop() {
            if let Some(node) = self.nodes.remove(cur) {
                stack.extend(node.children);
            }
        }
        Ok(())
    }

    pub fn contains(&self, id: WidgetId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn is_mounted(&self, id: WidgetId) -> bool {
        self.nodes.get(id).is_some_and(|n| n.mounted)
    }

    pub fn parent(&self, id: WidgetId) -> Option<WidgetId> {
        self.nodes.get(id).and_then(|n| n.parent)
    }

    pub fn children(&self, id: WidgetId) -> &[WidgetId] {
        self.nodes.get(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    pub fn kind(&self, id: WidgetId) -> Option<&'static str> {
        self.nodes.get(id).map(|n| n.kind)
    }

    pub fn layout(&self, id: WidgetId) -> Option<&NodeLayout> {
        self.nodes.get(id).map(|n| &n.layout)
    }

    pub fn style(&self, id: WidgetId) -> Option<Style> {
        self.nodes.get(id).map(|n| n.style)
    }

    pub fn set_style(&mut self, id: WidgetId, style: Style) -> Result<()> {
        let node = self.nodes.get_mut(id).ok_or(Error::UnknownWidget(id))?;
        if node.style != style {
            node.style = style;
            node.invalidation.invalidate_layout();
        }
        Ok(())
    }

    pub fn invalidation(&self, id: WidgetId) -> Option<Invalidation> {
        self.nodes.get(id).map(|n| n.invalidation.clone())
    }

    pub fn widget<W: Widget>(&self, id: WidgetId) -> Result<&W> {
        let node = self.nodes.get(id).ok_or(Error::UnknownWidget(id))?;
        let w: &dyn Widget = node.widget.as_deref().ok_or(Error::UnknownWidget(id))?;
        let any: &dyn std::any::Any = w;
        any.downcast_ref::<W>().ok_or(Error::WrongWidgetType {
            id,
            expected: std::any::type_name::<W>(),
        })
    }

    pub fn widget_mut<W: Widget>(&mut self, id: WidgetId) -> Result<&mut W> {
        let node = self.nodes.get_mut(id).ok_or(Error::UnknownWidget(id))?;
        let w: &mut dyn Widget = node.widget.as_deref_mut().ok_or(Error::UnknownWidget(id))?;
        let any: &mut dyn std::any::Any = w;
        any.downcast_mut::<W>().ok_or(Error::WrongWidgetType {
            id,
            expected: std::any::type_name::<W>(),
        })
    }

    /// Runs `f` against the widget with its context. Returns `None` if the
    /// widget doesn't exist or is already running a method.
    pub(crate) fn with_widget<R>(
        &mut self,
        id: WidgetId,
        f: impl FnOnce(&mut dyn Widget, &mut WidgetContext<'_>) -> R,
    ) -> Option<R> {
        let node = self.nodes.get_mut(id)?;
        let Some(mut widget) = node.widget.take() else {
            log::warn!("re-entrant call into {} {:?} skipped", node.kind, id);
            return None;
        };
        let r = {
            let mut cx = WidgetContext { window: self, id };
            f(widget.as_mut(), &mut cx)
        };
        if let Some(node) = self.nodes.get_mut(id) {
            node.widget = Some(widget);
        }
        Some(r)
    }

    fn mount_subtree(&mut self, id: WidgetId) {
        let Some(node) = self.nodes.get_mut(id) else {
            return;
        };
        if node.mounted {
            return;
        }
        node.mounted = true;
        log::debug!("mount {} {:?}", node.kind, id);
        let children = node.children.clone();
        self.with_widget(id, |w, cx| w.mount(cx));
        for c in children {
            self.mount_subtree(c);
        }
    }

    fn unmount_subtree(&mut self, id: WidgetId) {
        let Some(node) = self.nodes.get(id) else {
            return;
        };
        if !node.mounted {
            return;
        }
        for c in node.children.clone() {
            self.unmount_subtree(c);
        }
        self.with_widget(id, |w, cx| w.unmount(cx));
        if let Some(node) = self.nodes.get_mut(id) {
            log::debug!("unmount {} {:?}", node.kind, id);
            node.mounted = false;
        }
        if self.capture == Some(id) {
            self.capture = None;
        }
        if self.focus == Some(id) {
            self.focus = None;
        }
        self.hover.retain(|h| *h != id);
    }

    /// Depth-first walk of the mounted tree.
    pub fn visit(&self, mut f: impl FnMut(WidgetId, usize)) {
        let Some(root) = self.root else {
            return;
        };
        let mut stack = vec![(root, 0usize)];
        while let Some((id, depth)) = stack.pop() {
            f(id, depth);
            for c in self.children(id).iter().rev() {
                stack.push((*c, depth + 1));
            }
        }
    }

    // Frames

    pub fn needs_redraw(&self) -> bool {
        !self.layout_valid
            || self
                .nodes
                .values()
                .any(|n| n.mounted && !n.invalidation.dirty().is_empty())
    }

    pub fn wants_animation_frame(&self) -> bool {
        self.animator.wants_frame()
    }

    /// Runs every callback due this frame against the current clock time.
    /// Returns how many ran.
    pub fn animate(&mut self) -> usize {
        let now = self.animator.now();
        let mut ran = 0;
        for handle in self.animator.frame_handles(now) {
            // Gone if an earlier callback this frame cancelled it.
            let Some((id, f)) = self.animator.take_callback(handle) else {
                continue;
            };
            if !self.is_mounted(id) {
                log::trace!("dropping animation {handle:?} for unmounted {id:?}");
                continue;
            }
            if self.with_widget(id, |w, cx| f(w, cx, now)).is_some() {
                ran += 1;
            }
        }
        ran
    }

    pub fn draw(&mut self, dc: &mut dyn DrawingContext) {
        self.update_layout();
        if let Some(root) = self.root {
            self.draw_node(root, dc);
        }
        for node in self.nodes.values() {
            node.invalidation.clear(faceplate_core::Dirty::REDRAW);
        }
    }

    fn draw_node(&mut self, id: WidgetId, dc: &mut dyn DrawingContext) {
        let Some(node) = self.nodes.get(id) else {
            return;
        };
        if !node.mounted || !node.style.is_drawn() {
            return;
        }
        let style = node.style;
        let layout = node.layout;
        let children = node.children.clone();

        dc.save();
        dc.translate(layout.bounds.x, layout.bounds.y);
        let local = Rect::from_size(layout.bounds.size());
        let has_border = style.border_width != faceplate_core::Thickness::ZERO;
        if has_border && style.border_color.3 > 0 {
            dc.fill_round_rect(local, style.round_corners, style.border_color);
        }
        if style.background.3 > 0 {
            let inner = if has_border {
                local.remove_thickness(style.border_width)
            } else {
                local
            };
            dc.fill_round_rect(inner, style.round_corners, style.background);
        }
        dc.translate(
            style.border_width.left + style.padding.left,
            style.border_width.top + style.padding.top,
        );

        let clip = self
            .with_widget(id, |w, cx| {
                w.draw(cx, dc);
                w.clip_children()
            })
            .unwrap_or(false);
        if clip {
            dc.rectangle(Rect::from_size(layout.client_size));
            dc.clip();
        }
        for c in children {
            self.draw_node(c, dc);
        }
        dc.restore();
    }

    // Input

    /// Path of visible widgets under `pos`, root first.
    pub fn hit_test(&self, pos: Vec2) -> SmallVec<[WidgetId; 8]> {
        let mut path = SmallVec::new();
        let mut cur = self.root;
        while let Some(id) = cur {
            let Some(node) = self.nodes.get(id) else {
                break;
            };
            if !node.style.is_drawn() || !node.layout.screen_bounds.contains(pos) {
                break;
            }
            path.push(id);
            cur = node.children.iter().rev().copied().find(|c| {
                self.nodes
                    .get(*c)
                    .is_some_and(|n| n.style.is_drawn() && n.layout.screen_bounds.contains(pos))
            });
        }
        path
    }

    fn client_event(&self, id: WidgetId, pos: Vec2, modifiers: Modifiers) -> PointerEvent {
        let origin = self
            .nodes
            .get(id)
            .map(|n| n.layout.screen_client)
            .unwrap_or_default();
        PointerEvent {
            position: Vec2::new(pos.x - origin.x, pos.y - origin.y),
            screen_position: pos,
            modifiers,
        }
    }

    fn deliver_pointer(
        &mut self,
        id: WidgetId,
        pos: Vec2,
        modifiers: Modifiers,
        f: &mut dyn FnMut(&mut dyn PointerTarget, &mut WidgetContext<'_>, &PointerEvent) -> bool,
    ) -> bool {
        let e = self.client_event(id, pos, modifiers);
        self.with_widget(id, |w, cx| match w.pointer_target() {
            Some(t) => f(t, cx, &e),
            None => false,
        })
        .unwrap_or(false)
    }

    /// Captured widget first; otherwise the deepest widget under the pointer,
    /// bubbling up until one handles the event.
    fn route_pointer(
        &mut self,
        pos: Vec2,
        modifiers: Modifiers,
        f: &mut dyn FnMut(&mut dyn PointerTarget, &mut WidgetContext<'_>, &PointerEvent) -> bool,
    ) -> bool {
        if let Some(c) = self.capture {
            return self.deliver_pointer(c, pos, modifiers, f);
        }
        let path = self.hit_test(pos);
        path.iter()
            .rev()
            .any(|id| self.deliver_pointer(*id, pos, modifiers, &mut *f))
    }

    fn has_pointer_target(&mut self, id: WidgetId) -> bool {
        self.with_widget(id, |w, _| w.pointer_target().is_some())
            .unwrap_or(false)
    }

    pub fn dispatch_pointer_move(&mut self, pos: Vec2, modifiers: Modifiers) -> bool {
        self.update_layout();
        if self.capture.is_none() {
            self.update_hover(pos, modifiers);
        }
        self.route_pointer(pos, modifiers, &mut |t, cx, e| t.pointer_move(cx, e))
    }

    fn update_hover(&mut self, pos: Vec2, modifiers: Modifiers) {
        let path = self.hit_test(pos);
        let mut targets: SmallVec<[WidgetId; 8]> = SmallVec::new();
        for id in path {
            if self.has_pointer_target(id) {
                targets.push(id);
            }
        }
        let old = std::mem::take(&mut self.hover);
        for id in old.iter().rev() {
            if !targets.contains(id) {
                self.with_widget(*id, |w, cx| {
                    if let Some(t) = w.pointer_target() {
                        t.pointer_leave(cx);
                    }
                });
            }
        }
        for id in targets.iter() {
            if !old.contains(id) {
                let e = self.client_event(*id, pos, modifiers);
                self.with_widget(*id, |w, cx| {
                    if let Some(t) = w.pointer_target() {
                        t.pointer_enter(cx, &e);
                    }
                });
            }
        }
        self.hover = targets;
    }

    /// The pointer left the window.
    pub fn dispatch_pointer_leave(&mut self) {
        for id in std::mem::take(&mut self.hover).iter().rev() {
            self.with_widget(*id, |w, cx| {
                if let Some(t) = w.pointer_target() {
                    t.pointer_leave(cx);
                }
            });
        }
    }

    pub fn dispatch_pointer_down(&mut self, pos: Vec2, modifiers: Modifiers) -> bool {
        self.update_layout();
        if self.capture.is_none() {
            let path = self.hit_test(pos);
            let focusable = path.iter().rev().copied().find(|id| self.wants_focus(*id));
            if let Some(id) = focusable {
                self.set_focus(Some(id));
            }
        }
        self.route_pointer(pos, modifiers, &mut |t, cx, e| t.pointer_down(cx, e))
    }

    pub fn dispatch_pointer_up(&mut self, pos: Vec2, modifiers: Modifiers) -> bool {
        self.update_layout();
        self.route_pointer(pos, modifiers, &mut |t, cx, e| t.pointer_up(cx, e))
    }

    pub fn dispatch_scroll_wheel(
        &mut self,
        pos: Vec2,
        direction: ScrollDirection,
        modifiers: Modifiers,
    ) -> bool {
        self.update_layout();
        let path = self.hit_test(pos);
        path.iter().rev().any(|id| {
            self.deliver_pointer(*id, pos, modifiers, &mut |t, cx, e| {
                t.scroll_wheel(cx, e, direction)
            })
        })
    }

    /// Delivers to the focused widget, bubbling to its ancestors.
    pub fn dispatch_key_down(&mut self, e: &KeyEvent) -> bool {
        self.update_layout();
        let mut cur = self.focus;
        while let Some(id) = cur {
            let handled = self
                .with_widget(id, |w, cx| match w.key_target() {
                    Some(k) => k.key_down(cx, e),
                    None => false,
                })
                .unwrap_or(false);
            if handled {
                return true;
            }
            cur = self.parent(id);
        }
        false
    }

    fn wants_focus(&mut self, id: WidgetId) -> bool {
        self.with_widget(id, |w, _| w.key_target().is_some_and(|k| k.wants_focus()))
            .unwrap_or(false)
    }

    pub fn focus(&self) -> Option<WidgetId> {
        self.focus
    }

    /// Moves keyboard focus. Returns `false` if `id` can't take focus.
    pub fn set_focus(&mut self, id: Option<WidgetId>) -> bool {
        if id == self.focus {
            return true;
        }
        if let Some(new) = id
            && (!self.is_mounted(new) || !self.wants_focus(new))
        {
            return false;
        }
        if let Some(old) = self.focus.take() {
            self.with_widget(old, |w, cx| {
                if let Some(k) = w.key_target() {
                    k.focus_lost(cx);
                }
            });
        }
        self.focus = id;
        if let Some(new) = id {
            self.with_widget(new, |w, cx| {
                if let Some(k) = w.key_target() {
                    k.focus_gained(cx);
                }
            });
        }
        true
    }

    pub fn capture(&self) -> Option<WidgetId> {
        self.capture
    }
}

/// What a widget can reach while one of its methods runs.
pub struct WidgetContext<'a> {
    pub(crate) window: &'a mut Window,
    pub(crate) id: WidgetId,
}

impl WidgetContext<'_> {
    pub fn id(&self) -> WidgetId {
        self.id
    }

    fn node(&self) -> Option<&Node> {
        self.window.nodes.get(self.id)
    }

    pub fn now(&self) -> Instant {
        self.window.animator.now()
    }

    pub fn animator(&self) -> Animator {
        self.window.animator.clone()
    }

    pub fn theme(&self) -> &Theme {
        &self.window.theme
    }

    pub fn is_mounted(&self) -> bool {
        self.node().is_some_and(|n| n.mounted)
    }

    pub fn style(&self) -> Style {
        self.node().map(|n| n.style).unwrap_or_default()
    }

    pub fn set_style(&mut self, style: Style) {
        if let Some(node) = self.window.nodes.get_mut(self.id)
            && node.style != style
        {
            node.style = style;
            node.invalidation.invalidate_layout();
        }
    }

    pub fn client_size(&self) -> Size {
        self.node().map(|n| n.layout.client_size).unwrap_or_default()
    }

    /// The client area in client coordinates.
    pub fn client_rect(&self) -> Rect {
        Rect::from_size(self.client_size())
    }

    /// The padding box in client coordinates.
    pub fn padding_rect(&self) -> Rect {
        let p = self.style().padding;
        let s = self.client_size();
        Rect::new(-p.left, -p.top, s.width + p.horizontal(), s.height + p.vertical())
    }

    pub fn screen_client_rect(&self) -> Rect {
        self.node().map(|n| n.layout.screen_client).unwrap_or_default()
    }

    pub fn invalidation(&self) -> Invalidation {
        self.node()
            .map(|n| n.invalidation.clone())
            .unwrap_or_default()
    }

    pub fn invalidate(&self) {
        if let Some(n) = self.node() {
            n.invalidation.invalidate();
        }
    }

    pub fn invalidate_layout(&self) {
        if let Some(n) = self.node() {
            n.invalidation.invalidate_layout();
        }
    }

    pub fn request_animation_callback<W: Widget>(
        &mut self,
        f: impl FnOnce(&mut W, &mut WidgetContext<'_>, Instant) + 'static,
    ) -> AnimationHandle {
        self.window.animator.request::<W>(self.id, f)
    }

    pub fn post_delayed<W: Widget>(
        &mut self,
        delay: Duration,
        f: impl FnOnce(&mut W, &mut WidgetContext<'_>, Instant) + 'static,
    ) -> AnimationHandle {
        self.window.animator.post_delayed::<W>(self.id, delay, f)
    }

    pub fn cancel_animation_callback(&mut self, handle: &mut AnimationHandle) -> bool {
        self.window.animator.cancel(handle)
    }

    pub fn capture_pointer(&mut self) {
        log::trace!("pointer captured by {:?}", self.id);
        self.window.capture = Some(self.id);
    }

    pub fn release_capture(&mut self) {
        if self.window.capture == Some(self.id) {
            log::trace!("pointer released by {:?}", self.id);
            self.window.capture = None;
        }
    }

    pub fn has_capture(&self) -> bool {
        self.window.capture == Some(self.id)
    }

    pub fn has_focus(&self) -> bool {
        self.window.focus == Some(self.id)
    }

    pub fn children(&self) -> SmallVec<[WidgetId; 4]> {
        self.node().map(|n| n.children.clone()).unwrap_or_default()
    }

    pub fn measure_child(&mut self, child: WidgetId, constraint: Size, available: Size) -> Size {
        self.window.measure_node(child, constraint, available)
    }

    pub fn child_measured_size(&self, child: WidgetId) -> Size {
        self.window
            .nodes
            .get(child)
            .map(|n| n.layout.measured)
            .unwrap_or_default()
    }

    pub fn child_style(&self, child: WidgetId) -> Style {
        self.window.style(child).unwrap_or_default()
    }

    /// Arranges `child` into `rect` (its margin box, in this widget's client
    /// coordinates).
    pub fn arrange_child(&mut self, child: WidgetId, rect: Rect) {
        self.window.arrange_node(child, rect);
    }

    /// Moves `child` without measuring or arranging it again when its size
    /// hasn't changed.
    pub fn reposition_child(&mut self, child: WidgetId, rect: Rect) {
        self.window.reposition_node(child, rect);
    }

    /// Changes a child's visibility without invalidating layout; meant for
    /// use from inside a layout pass.
    pub fn set_child_visibility(&mut self, child: WidgetId, visibility: Visibility) {
        if let Some(node) = self.window.nodes.get_mut(child) {
            node.style.visibility = visibility;
        }
    }
}
