//! Cooperative frame scheduler.
//!
//! Callbacks are one-shot: each registration runs at most once, on the next
//! frame. A widget that wants to keep animating registers again from inside
//! its own callback, so a chain stops by itself as soon as a tick decides
//! there is nothing left to do.
//!
//! ```rust
//! use faceplate_core::scheduler::{AnimationHandle, FrameScheduler};
//! use web_time::Instant;
//!
//! let mut s: FrameScheduler<&'static str> = FrameScheduler::new();
//! let mut h = s.request("tick");
//! assert!(h.is_valid());
//! assert!(s.cancel(&mut h));
//! assert_eq!(h, AnimationHandle::INVALID);
//! assert!(!s.cancel(&mut h)); // already null: no-op
//! assert!(s.take_frame(Instant::now()).is_empty());
//! ```

use std::collections::BTreeMap;

use web_time::Instant;

/// Token for a pending one-shot callback. `INVALID` is the null sentinel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AnimationHandle(u64);

impl AnimationHandle {
    pub const INVALID: AnimationHandle = AnimationHandle(0);

    pub fn is_valid(&self) -> bool {
        self.0 != 0
    }

    /// Returns the handle and leaves `INVALID` in its place.
    pub fn take(&mut self) -> AnimationHandle {
        std::mem::take(self)
    }
}

pub struct FrameScheduler<F> {
    next_id: u64,
    animation: BTreeMap<AnimationHandle, F>,
    delayed: BTreeMap<AnimationHandle, (Instant, F)>,
}

impl<F> Default for FrameScheduler<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F> FrameScheduler<F> {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            animation: BTreeMap::new(),
            delayed: BTreeMap::new(),
        }
    }

    fn next_handle(&mut self) -> AnimationHandle {
        let h = AnimationHandle(self.next_id);
        self.next_id += 1;
        h
    }

    /// Registers `f` for the next frame.
    pub fn request(&mut self, f: F) -> AnimationHandle {
        let h = self.next_handle();
        self.animation.insert(h, f);
        h
    }

    /// Registers `f` to run on the first frame at or after `due`.
    pub fn post_delayed(&mut self, due: Instant, f: F) -> AnimationHandle {
        let h = self.next_handle();
        self.delayed.insert(h, (due, f));
        h
    }

    /// Drops the pending callback and nulls the handle. Returns `false` (and
    /// does nothing else) if the handle is null or has already fired.
    pub fn cancel(&mut self, handle: &mut AnimationHandle) -> bool {
        let h = handle.take();
        if !h.is_valid() {
            return false;
        }
        self.animation.remove(&h).is_some() || self.delayed.remove(&h).is_some()
    }

    pub fn is_pending(&self, handle: AnimationHandle) -> bool {
        self.animation.contains_key(&handle) || self.delayed.contains_key(&handle)
    }

    pub fn len(&self) -> usize {
        self.animation.len() + self.delayed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True when the next frame has animation work; delayed callbacks that
    /// are not yet due don't count.
    pub fn wants_frame(&self) -> bool {
        !self.animation.is_empty()
    }

    /// Earliest due time among delayed callbacks, for hosts that sleep
    /// between frames.
    pub fn next_due(&self) -> Option<Instant> {
        self.delayed.values().map(|(due, _)| *due).min()
    }

    /// Handles of everything that should run this frame: all animation
    /// callbacks registered so far, then delayed callbacks whose time has
    /// come. Nothing is removed; run each one with [`take_callback`], which
    /// yields `None` for a handle cancelled in the meantime. Callbacks
    /// registered while the frame runs get new handles and land in the next
    /// frame.
    ///
    /// [`take_callback`]: FrameScheduler::take_callback
    pub fn frame_handles(&self, now: Instant) -> Vec<AnimationHandle> {
        let mut out: Vec<AnimationHandle> = self.animation.keys().copied().collect();
        out.extend(
            self.delayed
                .iter()
                .filter(|(_, (t, _))| *t <= now)
                .map(|(h, _)| *h),
        );
        out
    }

    /// Removes a pending callback so it can run.
    pub fn take_callback(&mut self, handle: AnimationHandle) -> Option<F> {
        self.animation
            .remove(&handle)
            .or_else(|| self.delayed.remove(&handle).map(|(_, f)| f))
    }

    /// Removes and returns everything that should run this frame, as
    /// [`frame_handles`](FrameScheduler::frame_handles) selects it.
    pub fn take_frame(&mut self, now: Instant) -> Vec<(AnimationHandle, F)> {
        self.frame_handles(now)
            .into_iter()
            .filter_map(|h| self.take_callback(h).map(|f| (h, f)))
            .collect()
    }
}
