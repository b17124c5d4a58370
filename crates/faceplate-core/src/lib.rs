//! # Properties, invalidation and frames
//!
//! Faceplate widgets are long-lived objects in a retained tree. Their state
//! lives in `Property<T>` cells, and three small pieces keep the screen in
//! sync with that state:
//!
//! - `Property<T>`: observable value with equality-gated change
//!   notification and one-way bindings to other properties.
//! - `Invalidation`: per-widget dirty flags that properties mark when they
//!   change.
//! - `FrameScheduler`: one-shot "next frame" callbacks that animated
//!   widgets chain to keep moving.
//!
//! ## Properties
//!
//! ```rust
//! use faceplate_core::*;
//!
//! let level = Property::new(0.0f32);
//! level.set(-6.0);
//! level.update(|v| *v -= 1.0);
//! assert_eq!(level.get(), -7.0);
//! ```
//!
//! A property is told which widget owns it with `set_element`, and from then
//! on a change marks that widget for redraw and/or relayout:
//!
//! ```rust
//! use faceplate_core::*;
//!
//! let owner = Invalidation::new();
//! let width = Property::new(8.0f32);
//! width.set_element(&owner, BindingFlags::INVALIDATE_LAYOUT_ON_CHANGED);
//!
//! width.set(8.0); // unchanged: nothing happens
//! assert!(!owner.needs_layout());
//! width.set(12.0);
//! assert!(owner.needs_layout());
//! ```
//!
//! ## Bindings
//!
//! `source.bind(&target)` pushes the source's value into the target now and
//! on every later change. Bindings only fan out: binding a pair twice, a
//! property to itself, or anything that would close a cycle is refused.
//!
//! ## Frames
//!
//! Animations are chains of one-shot callbacks. A tick clears its own
//! handle, does its work against the frame timestamp, and registers again
//! only if it isn't finished. Cancelling a null or already-fired handle is a
//! no-op, so `unmount` can cancel unconditionally.

pub mod animation;
pub mod color;
pub mod error;
pub mod geometry;
pub mod input;
pub mod invalidate;
pub mod prelude;
pub mod property;
pub mod render_api;
pub mod scene;
pub mod scheduler;
pub mod style;
pub mod theme;

pub use animation::*;
pub use color::*;
pub use error::*;
pub use geometry::*;
pub use input::*;
pub use invalidate::*;
pub use property::*;
pub use render_api::*;
pub use scene::*;
pub use scheduler::*;
pub use style::*;
pub use theme::*;

slotmap::new_key_type! {
    /// Generational id of a widget in a window's tree. An id whose widget
    /// was removed never resolves again.
    pub struct WidgetId;
}
