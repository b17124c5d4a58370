//! Bindable properties.
//!
//! A `Property<T>` is a cloneable handle to one observable value owned by a
//! widget. Writes are equality-gated: setting the value it already holds
//! notifies nobody. Subscribers run synchronously, in the order they were
//! added, and no borrow of the property is held while they run, so a
//! subscriber may freely read the property that notified it.
//!
//! ```rust
//! use faceplate_core::property::Property;
//!
//! let source = Property::new(0.0f32);
//! let target = Property::new(5.0f32);
//! assert!(source.bind(&target));
//! assert_eq!(target.get(), 0.0); // bind pushes the current value
//!
//! source.set(3.0);
//! assert_eq!(target.get(), 3.0);
//! assert!(!target.bind(&source)); // would close a cycle
//! ```

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use bitflags::bitflags;
use smallvec::SmallVec;

use crate::invalidate::{Invalidation, WeakInvalidation};

bitflags! {
    /// How a property notifies the widget that owns it.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct BindingFlags: u8 {
        const INVALIDATE_ON_CHANGED = 1;
        const INVALIDATE_LAYOUT_ON_CHANGED = 2;
    }
}

pub type SubscriptionId = u64;

pub struct Property<T>(Rc<Inner<T>>);

struct Inner<T> {
    value: RefCell<T>,
    subs: RefCell<SmallVec<[Subscriber<T>; 2]>>,
    next_id: Cell<SubscriptionId>,
}

enum Subscriber<T> {
    Element {
        flags: BindingFlags,
        target: WeakInvalidation,
    },
    Callback {
        id: SubscriptionId,
        f: Rc<dyn Fn(&T)>,
    },
    Forward {
        target: Weak<Inner<T>>,
    },
}

impl<T> Clone for Subscriber<T> {
    fn clone(&self) -> Self {
        match self {
            Subscriber::Element { flags, target } => Subscriber::Element {
                flags: *flags,
                target: target.clone(),
            },
            Subscriber::Callback { id, f } => Subscriber::Callback {
                id: *id,
                f: f.clone(),
            },
            Subscriber::Forward { target } => Subscriber::Forward {
                target: target.clone(),
            },
        }
    }
}

impl<T> Clone for Property<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<T: Default> Default for Property<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: fmt::Debug> fmt::Debug for Property<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Property")
            .field("value", &*self.0.value.borrow())
            .field("subscribers", &self.0.subs.borrow().len())
            .finish()
    }
}

impl<T> Property<T> {
    pub fn new(value: T) -> Self {
        Self(Rc::new(Inner {
            value: RefCell::new(value),
            subs: RefCell::new(SmallVec::new()),
            next_id: Cell::new(1),
        }))
    }

    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.0.value.borrow())
    }

    /// Ties change notification to the owning widget. Replaces any previous
    /// element registration.
    pub fn set_element(&self, element: &Invalidation, flags: BindingFlags) {
        let mut subs = self.0.subs.borrow_mut();
        subs.retain(|s| !matches!(s, Subscriber::Element { .. }));
        subs.push(Subscriber::Element {
            flags,
            target: element.downgrade(),
        });
    }

    pub fn subscribe(&self, f: impl Fn(&T) + 'static) -> SubscriptionId {
        let id = self.0.next_id.get();
        self.0.next_id.set(id + 1);
        self.0.subs.borrow_mut().push(Subscriber::Callback { id, f: Rc::new(f) });
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subs = self.0.subs.borrow_mut();
        let before = subs.len();
        subs.retain(|s| !matches!(s, Subscriber::Callback { id: sid, .. } if *sid == id));
        subs.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.0.subs.borrow().len()
    }

    pub fn binding_count(&self) -> usize {
        self.0
            .subs
            .borrow()
            .iter()
            .filter(|s| matches!(s, Subscriber::Forward { .. }))
            .count()
    }

    pub fn ptr_eq(&self, other: &Property<T>) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    fn forwards_to(&self, target: &Rc<Inner<T>>) -> bool {
        self.0.subs.borrow().iter().any(|s| match s {
            Subscriber::Forward { target: t } => t.as_ptr() == Rc::as_ptr(target),
            _ => false,
        })
    }

    /// True if a chain of bindings starting here reaches `other`.
    fn reaches(&self, other: &Rc<Inner<T>>) -> bool {
        let mut stack: Vec<Rc<Inner<T>>> = vec![self.0.clone()];
        let mut seen: Vec<*const Inner<T>> = Vec::new();
        while let Some(node) = stack.pop() {
            if Rc::ptr_eq(&node, other) {
                return true;
            }
            let p = Rc::as_ptr(&node);
            if seen.contains(&p) {
                continue;
            }
            seen.push(p);
            for s in node.subs.borrow().iter() {
                if let Subscriber::Forward { target } = s
                    && let Some(t) = target.upgrade()
                {
                    stack.push(t);
                }
            }
        }
        false
    }

    /// Removes the binding edge to `target`, if there is one.
    pub fn unbind(&self, target: &Property<T>) -> bool {
        let mut subs = self.0.subs.borrow_mut();
        let before = subs.len();
        subs.retain(|s| match s {
            Subscriber::Forward { target: t } => t.as_ptr() != Rc::as_ptr(&target.0),
            _ => true,
        });
        subs.len() != before
    }
}

impl<T: Clone + PartialEq + 'static> Property<T> {
    pub fn get(&self) -> T {
        self.0.value.borrow().clone()
    }

    /// Stores `value` and notifies subscribers, unless it equals the
    /// current value.
    pub fn set(&self, value: T) {
        {
            let mut cur = self.0.value.borrow_mut();
            if *cur == value {
                return;
            }
            *cur = value;
        }
        self.notify();
    }

    pub fn update(&self, f: impl FnOnce(&mut T)) {
        let mut next = self.get();
        f(&mut next);
        self.set(next);
    }

    /// Adds a one-way edge: every change of `self` is written to `target`.
    /// The current value is pushed immediately. Binding a property to
    /// itself, binding the same pair twice, or closing a cycle is refused.
    pub fn bind(&self, target: &Property<T>) -> bool {
        if Rc::ptr_eq(&self.0, &target.0) || self.forwards_to(&target.0) {
            log::warn!("property binding refused: duplicate or self binding");
            return false;
        }
        if target.reaches(&self.0) {
            log::warn!("property binding refused: would create a cycle");
            return false;
        }
        self.0.subs.borrow_mut().push(Subscriber::Forward {
            target: Rc::downgrade(&target.0),
        });
        target.set(self.get());
        true
    }

    fn notify(&self) {
        let value = self.get();
        let subs: SmallVec<[Subscriber<T>; 2]> = self.0.subs.borrow().clone();
        let mut dead_forward = false;
        for s in subs.iter() {
            match s {
                Subscriber::Element { flags, target } => {
                    if let Some(inv) = target.upgrade() {
                        if flags.contains(BindingFlags::INVALIDATE_LAYOUT_ON_CHANGED) {
                            inv.invalidate_layout();
                        }
                        if flags.contains(BindingFlags::INVALIDATE_ON_CHANGED) {
                            inv.invalidate();
                        }
                    }
                }
                Subscriber::Callback { f, .. } => f(&value),
                Subscriber::Forward { target } => match target.upgrade() {
                    Some(t) => Property(t).set(value.clone()),
                    None => dead_forward = true,
                },
            }
        }
        if dead_forward {
            self.0.subs.borrow_mut().retain(|s| match s {
                Subscriber::Forward { target } => target.strong_count() > 0,
                _ => true,
            });
        }
    }
}
