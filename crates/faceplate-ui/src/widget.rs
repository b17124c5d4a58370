use std::any::Any;

use faceplate_core::{DrawingContext, KeyEvent, PointerEvent, ScrollDirection, Size, Style, Theme};

use crate::WidgetContext;
use crate::layout;

/// A node in a window's widget tree.
///
/// Everything has a default, so a plain box only needs `kind`. Containers
/// override `measure_client`/`arrange` to lay out their children through the
/// context; interactive widgets hand out their [`PointerTarget`] or
/// [`KeyTarget`] side.
pub trait Widget: Any {
    fn kind(&self) -> &'static str;

    /// Style a widget starts with when it is inserted into a window.
    fn default_style(&self, _theme: &Theme) -> Style {
        Style::default()
    }

    fn mount(&mut self, _cx: &mut WidgetContext<'_>) {}

    /// Must cancel every pending animation callback the widget holds.
    fn unmount(&mut self, _cx: &mut WidgetContext<'_>) {}

    /// Desired client size. `constraint` is 0 on an axis the widget should
    /// size to content on.
    fn measure_client(
        &mut self,
        cx: &mut WidgetContext<'_>,
        constraint: Size,
        available: Size,
    ) -> Size {
        layout::measure_stacked(cx, constraint, available)
    }

    /// Positions children inside a client area of `client_size`.
    fn arrange(&mut self, cx: &mut WidgetContext<'_>, client_size: Size) {
        layout::arrange_stacked(cx, client_size);
    }

    /// Runs once the whole tree has its final geometry.
    fn finalize_layout(&mut self, _cx: &mut WidgetContext<'_>) {}

    /// Repositions children with their existing measured sizes. Called after
    /// `Invalidation::invalidate_arrangement`.
    fn redo_final_layout(&mut self, _cx: &mut WidgetContext<'_>) {}

    /// Paints in client coordinates; the background and border are already
    /// drawn by the window.
    fn draw(&mut self, _cx: &mut WidgetContext<'_>, _dc: &mut dyn DrawingContext) {}

    fn clip_children(&self) -> bool {
        false
    }

    fn pointer_target(&mut self) -> Option<&mut dyn PointerTarget> {
        None
    }

    fn key_target(&mut self) -> Option<&mut dyn KeyTarget> {
        None
    }
}

/// Pointer handling. Handlers that return `false` let the event bubble to
/// the parent.
pub trait PointerTarget {
    fn pointer_enter(&mut self, _cx: &mut WidgetContext<'_>, _e: &PointerEvent) {}
    fn pointer_leave(&mut self, _cx: &mut WidgetContext<'_>) {}
    fn pointer_down(&mut self, _cx: &mut WidgetContext<'_>, _e: &PointerEvent) -> bool {
        false
    }
    fn pointer_up(&mut self, _cx: &mut WidgetContext<'_>, _e: &PointerEvent) -> bool {
        false
    }
    fn pointer_move(&mut self, _cx: &mut WidgetContext<'_>, _e: &PointerEvent) -> bool {
        false
    }
    fn scroll_wheel(
        &mut self,
        _cx: &mut WidgetContext<'_>,
        _e: &PointerEvent,
        _direction: ScrollDirection,
    ) -> bool {
        false
    }
}

pub trait KeyTarget {
    fn wants_focus(&self) -> bool {
        true
    }
    fn key_down(&mut self, cx: &mut WidgetContext<'_>, e: &KeyEvent) -> bool;
    fn focus_gained(&mut self, _cx: &mut WidgetContext<'_>) {}
    fn focus_lost(&mut self, _cx: &mut WidgetContext<'_>) {}
}
