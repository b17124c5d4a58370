use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use bitflags::bitflags;

bitflags! {
    /// What a widget needs before the next frame is presented.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct Dirty: u8 {
        const REDRAW = 1;
        const LAYOUT = 2;
        /// Children need new positions, but no new measurement.
        const REPOSITION = 4;
    }
}

/// Per-widget dirty state. Layout invalidation climbs to every ancestor, so
/// the root always knows whether a layout pass is due.
#[derive(Clone, Default)]
pub struct Invalidation(Rc<Inner>);

#[derive(Default)]
struct Inner {
    dirty: Cell<Dirty>,
    parent: RefCell<Weak<Inner>>,
}

#[derive(Clone, Default)]
pub struct WeakInvalidation(Weak<Inner>);

impl WeakInvalidation {
    pub fn upgrade(&self) -> Option<Invalidation> {
        self.0.upgrade().map(Invalidation)
    }
}

impl Invalidation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn downgrade(&self) -> WeakInvalidation {
        WeakInvalidation(Rc::downgrade(&self.0))
    }

    pub fn set_parent(&self, parent: Option<&Invalidation>) {
        *self.0.parent.borrow_mut() = parent.map(|p| Rc::downgrade(&p.0)).unwrap_or_default();
    }

    pub fn invalidate(&self) {
        self.mark(Dirty::REDRAW);
    }

    pub fn invalidate_layout(&self) {
        let mut cur = Some(self.0.clone());
        while let Some(node) = cur {
            let d = node.dirty.get();
            node.dirty.set(d | Dirty::LAYOUT | Dirty::REDRAW);
            cur = node.parent.borrow().upgrade();
        }
    }

    /// Asks for the widget's children to be repositioned with their existing
    /// measured sizes before the next draw.
    pub fn invalidate_arrangement(&self) {
        self.mark(Dirty::REPOSITION | Dirty::REDRAW);
    }

    fn mark(&self, d: Dirty) {
        self.0.dirty.set(self.0.dirty.get() | d);
    }

    pub fn dirty(&self) -> Dirty {
        self.0.dirty.get()
    }

    pub fn needs_redraw(&self) -> bool {
        self.dirty().contains(Dirty::REDRAW)
    }

    pub fn needs_layout(&self) -> bool {
        self.dirty().contains(Dirty::LAYOUT)
    }

    /// Clears and returns the accumulated flags.
    pub fn take(&self) -> Dirty {
        self.0.dirty.replace(Dirty::empty())
    }

    pub fn needs_reposition(&self) -> bool {
        self.dirty().contains(Dirty::REPOSITION)
    }

    pub fn clear(&self, d: Dirty) {
        self.0.dirty.set(self.dirty() - d);
    }
}
