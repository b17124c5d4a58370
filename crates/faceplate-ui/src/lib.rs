//! Widget tree, layout, scrollbars, level meters and scroll containers.
//!
//! A [`Window`] owns the widget tree and drives it: `update_layout` for
//! geometry, `animate` once per frame for animation callbacks, `draw` into
//! any [`faceplate_core::DrawingContext`], and the `dispatch_*` methods for
//! host input.
//!
//! Widgets implement [`Widget`], plus [`PointerTarget`] and/or
//! [`KeyTarget`] if they take input. Their state lives in
//! [`faceplate_core::Property`] fields that mark the widget dirty when they
//! change.

pub mod layout;
pub mod panel;
pub mod scroll_container;
pub mod scrollbar;
pub mod vu;
pub mod widget;
pub mod window;

mod tests;

pub use layout::{DEFAULT_EXTENT, UNBOUNDED, align, arrange_stacked, measure_stacked};
pub use panel::Panel;
pub use scroll_container::*;
pub use scrollbar::*;
pub use vu::*;
pub use widget::*;
pub use window::*;
