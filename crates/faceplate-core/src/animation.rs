//! Frame clock and interpolation helpers.
//!
//! Every animation in Faceplate is wall-clock relative: a widget records the
//! instant an animation started and derives its current value from the time
//! elapsed since then, so a dropped frame never slows an animation down.

use std::cell::Cell;
use std::rc::Rc;

use web_time::{Duration, Instant};

use crate::{Color, Rect};

/// Monotonic time source for animation ticks.
pub trait Clock: 'static {
    fn now(&self) -> Instant;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A clock you can drive deterministically. Clones share the same time.
#[derive(Clone)]
pub struct ManualClock {
    t: Rc<Cell<Instant>>,
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(Instant::now())
    }
}

impl ManualClock {
    pub fn new(start: Instant) -> Self {
        Self {
            t: Rc::new(Cell::new(start)),
        }
    }

    pub fn advance(&self, d: Duration) {
        self.t.set(self.t.get() + d);
    }

    pub fn advance_ms(&self, ms: u64) {
        self.advance(Duration::from_millis(ms));
    }

    pub fn set(&self, t: Instant) {
        self.t.set(t);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.t.get()
    }
}

/// Seconds from `earlier` to `later`; negative when `later` precedes `earlier`.
pub fn signed_seconds(later: Instant, earlier: Instant) -> f32 {
    if later >= earlier {
        (later - earlier).as_secs_f32()
    } else {
        -(earlier - later).as_secs_f32()
    }
}

pub trait Interpolate {
    fn interpolate(&self, other: &Self, t: f32) -> Self;
}

impl Interpolate for f32 {
    fn interpolate(&self, other: &Self, t: f32) -> Self {
        self + (other - self) * t
    }
}

impl Interpolate for Color {
    fn interpolate(&self, other: &Self, t: f32) -> Self {
        Color::blend(t, *self, *other)
    }
}

impl Interpolate for Rect {
    /// Each of the four fields is blended independently.
    fn interpolate(&self, other: &Self, t: f32) -> Self {
        Rect {
            x: self.x.interpolate(&other.x, t),
            y: self.y.interpolate(&other.y, t),
            w: self.w.interpolate(&other.w, t),
            h: self.h.interpolate(&other.h, t),
        }
    }
}
