//! # Level meters
//!
//! Vertical bar meters in four flavours: [`VuMeter`] and [`StereoVuMeter`]
//! over an arbitrary range (0..1 by default), and [`DbVuMeter`] /
//! [`StereoDbVuMeter`] over decibels with tick marks and a peak-hold
//! "telltale" marker.
//!
//! Bars are banded green/yellow/red by the levels in [`VuSettings`]. A
//! meter without thresholds whose range straddles zero draws a bipolar bar
//! from the zero line.
//!
//! ## Peak hold
//!
//! When a dB meter's value rises above its hold value, the hold jumps up,
//! stays there for two seconds, then falls at one full range per second.
//! Once the falling hold would drop below the live value it snaps to it and
//! the animation stops. A stereo meter runs one such state machine per
//! channel on a single frame callback.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use faceplate_core::{
    AnimationHandle, BindingFlags, Color, DrawingContext, Property, Rect, Style, Theme,
    VuSettings, WidgetId, signed_seconds,
};
use smallvec::SmallVec;
use web_time::{Duration, Instant};

use crate::{Animator, Widget, WidgetContext};

pub const HOLD_TIME: Duration = Duration::from_millis(2000);
/// Seconds for the hold marker to fall through the whole range.
pub const HOLD_DECAY_SECONDS: f32 = 1.0;
/// Tick spacing doubles until ticks are more than this many pixels apart.
pub const MIN_TICK_SPACING: f32 = 5.0;

/// Maps `value` to a y coordinate inside `rect` (max at the top), clamped to
/// the rectangle.
pub fn value_to_client(value: f32, min: f32, max: f32, rect: Rect) -> f32 {
    if max == min {
        return rect.bottom();
    }
    let v = (value - min) / (max - min);
    (rect.top() + (1.0 - v) * rect.h).clamp(rect.top(), rect.bottom())
}

/// Draws one meter bar into `rect`.
pub fn draw_vu(
    dc: &mut dyn DrawingContext,
    value: f32,
    min: f32,
    max: f32,
    rect: Rect,
    settings: &VuSettings,
) {
    if max == min || rect.is_empty() {
        return;
    }
    let red = settings.red_level.map(|l| value_to_client(l, min, max, rect));
    let yellow = settings
        .yellow_level
        .map(|l| value_to_client(l, min, max, rect))
        .or(red);
    // Always show at least one pixel.
    let level = value_to_client(value, min, max, rect).min(rect.bottom() - 1.0);
    let (x, w) = (rect.left(), rect.w);

    match yellow {
        Some(yellow) if level < yellow => {
            dc.fill_rect(
                Rect::new(x, yellow, w, rect.bottom() - yellow),
                settings.green,
            );
            match red {
                Some(red) if level < red => {
                    dc.fill_rect(Rect::new(x, red, w, yellow - red), settings.yellow);
                    dc.fill_rect(Rect::new(x, level, w, red - level), settings.red);
                }
                _ => dc.fill_rect(Rect::new(x, level, w, yellow - level), settings.yellow),
            }
        }
        _ => {
            let bipolar = settings.yellow_level.is_none()
                && settings.red_level.is_none()
                && min < 0.0
                && max > 0.0;
            if bipolar {
                let zero = value_to_client(0.0, min, max, rect);
                let bar = if (level - zero).abs() < 1.0 {
                    Rect::new(x, level.min(zero), w, 1.0)
                } else if level < zero {
                    Rect::new(x, level, w, zero - level)
                } else {
                    Rect::new(x, zero, w, level - zero)
                };
                dc.fill_rect(bar, settings.green);
            } else {
                dc.fill_rect(
                    Rect::new(x, level, w, rect.bottom() - level),
                    settings.green,
                );
            }
        }
    }
}

/// Tick marks down the left edge of `rect`: a full-color zero tick, and
/// minor ticks every `tick_db` (doubled until they are far enough apart).
pub fn draw_ticks(
    dc: &mut dyn DrawingContext,
    min: f32,
    max: f32,
    settings: &VuSettings,
    rect: Rect,
    color: Color,
) {
    if max == min || rect.is_empty() {
        return;
    }
    let tick = |y: f32| Rect::new(rect.left(), y, settings.tick_width, 1.0);
    dc.fill_rect(tick(value_to_client(0.0, min, max, rect)), color);

    let mut step = settings.tick_db;
    if step <= 0.0 {
        return;
    }
    while step * rect.h / (max - min).abs() <= MIN_TICK_SPACING {
        step *= 2.0;
    }
    let minor = color.with_opacity(0.6);
    let mut db = step;
    while db < max {
        dc.fill_rect(tick(value_to_client(db, min, max, rect)), minor);
        db += step;
    }
    let mut db = -step;
    while db > min {
        dc.fill_rect(tick(value_to_client(db, min, max, rect)), minor);
        db -= step;
    }
}

/// Peak-hold marker across `bar`, colored by the band it sits in. Skipped
/// when it would touch the live bar.
pub fn draw_telltale(
    dc: &mut dyn DrawingContext,
    hold: f32,
    value: f32,
    min: f32,
    max: f32,
    settings: &VuSettings,
    bar: Rect,
) {
    if max == min || bar.is_empty() {
        return;
    }
    let y = value_to_client(hold, min, max, bar);
    if (y - value_to_client(value, min, max, bar)).abs() <= 1.0 {
        return;
    }
    let mut color = settings.green;
    let mut height = 1.0;
    if let Some(l) = settings.yellow_level
        && y < value_to_client(l, min, max, bar)
    {
        color = settings.yellow;
    }
    if let Some(l) = settings.red_level {
        if y < value_to_client(l, min, max, bar) {
            color = settings.red;
        }
        height = 2.0;
    }
    dc.fill_rect(Rect::new(bar.left(), y, bar.w, height), color);
}

/// Client rect snapped outward to device pixels, less the meter padding.
fn meter_area(cx: &WidgetContext<'_>, dc: &dyn DrawingContext, settings: &VuSettings) -> Rect {
    dc.snap_to_device(cx.client_rect()).inflate(-settings.padding)
}

/// The part of `area` right of the tick column.
fn bar_area(area: Rect, settings: &VuSettings) -> Rect {
    if !settings.has_ticks {
        return area;
    }
    let dx = settings.tick_width + settings.padding;
    Rect::new(area.x + dx, area.y, area.w - dx, area.h)
}

fn split_stereo(bars: Rect, padding: f32) -> (Rect, Rect) {
    let w = (bars.w - padding) / 2.0;
    (
        Rect::new(bars.left(), bars.top(), w, bars.h),
        Rect::new(bars.right() - w, bars.top(), w, bars.h),
    )
}

pub struct VuMeter {
    pub value: Property<f32>,
    pub min_value: Property<f32>,
    pub max_value: Property<f32>,
    /// Theme settings are used while this is `None`.
    pub settings: Property<Option<VuSettings>>,
}

impl Default for VuMeter {
    fn default() -> Self {
        Self::new()
    }
}

impl VuMeter {
    pub fn new() -> Self {
        Self::with_range(0.0, 1.0)
    }

    pub fn with_range(min: f32, max: f32) -> Self {
        Self {
            value: Property::new(min),
            min_value: Property::new(min),
            max_value: Property::new(max),
            settings: Property::new(None),
        }
    }
}

impl Widget for VuMeter {
    fn kind(&self) -> &'static str {
        "VuMeter"
    }

    fn default_style(&self, theme: &Theme) -> Style {
        theme.vu_style
    }

    fn mount(&mut self, cx: &mut WidgetContext<'_>) {
        let inv = cx.invalidation();
        self.value.set_element(&inv, BindingFlags::INVALIDATE_ON_CHANGED);
        self.min_value.set_element(&inv, BindingFlags::INVALIDATE_ON_CHANGED);
        self.max_value.set_element(&inv, BindingFlags::INVALIDATE_ON_CHANGED);
        self.settings.set_element(&inv, BindingFlags::INVALIDATE_ON_CHANGED);
    }

    fn draw(&mut self, cx: &mut WidgetContext<'_>, dc: &mut dyn DrawingContext) {
        let settings = self.settings.get().unwrap_or(cx.theme().vu);
        let bar = bar_area(meter_area(cx, dc, &settings), &settings);
        draw_vu(
            dc,
            self.value.get(),
            self.min_value.get(),
            self.max_value.get(),
            bar,
            &settings,
        );
    }
}

pub struct StereoVuMeter {
    pub value: Property<f32>,
    pub right_value: Property<f32>,
    pub min_value: Property<f32>,
    pub max_value: Property<f32>,
    pub settings: Property<Option<VuSettings>>,
}

impl Default for StereoVuMeter {
    fn default() -> Self {
        Self::new()
    }
}

impl StereoVuMeter {
    pub fn new() -> Self {
        Self::with_range(0.0, 1.0)
    }

    pub fn with_range(min: f32, max: f32) -> Self {
        Self {
            value: Property::new(min),
            right_value: Property::new(min),
            min_value: Property::new(min),
            max_value: Property::new(max),
            settings: Property::new(None),
        }
    }
}

impl Widget for StereoVuMeter {
    fn kind(&self) -> &'static str {
        "StereoVuMeter"
    }

    fn default_style(&self, theme: &Theme) -> Style {
        theme.stereo_vu_style
    }

    fn mount(&mut self, cx: &mut WidgetContext<'_>) {
        let inv = cx.invalidation();
        let flags = BindingFlags::INVALIDATE_ON_CHANGED;
        self.value.set_element(&inv, flags);
        self.right_value.set_element(&inv, flags);
        self.min_value.set_element(&inv, flags);
        self.max_value.set_element(&inv, flags);
        self.settings.set_element(&inv, flags);
    }

    fn draw(&mut self, cx: &mut WidgetContext<'_>, dc: &mut dyn DrawingContext) {
        let settings = self.settings.get().unwrap_or(cx.theme().vu);
        let bars = bar_area(meter_area(cx, dc, &settings), &settings);
        let (left, right) = split_stereo(bars, settings.padding);
        let (min, max) = (self.min_value.get(), self.max_value.get());
        draw_vu(dc, self.value.get(), min, max, left, &settings);
        draw_vu(dc, self.right_value.get(), min, max, right, &settings);
    }
}

struct HoldChannel {
    value: Property<f32>,
    hold: Property<f32>,
    active: bool,
    start: Instant,
    start_value: f32,
}

/// Hold/decay state shared between a meter and the subscriptions on its
/// value properties.
pub(crate) struct PeakHold {
    /// Set while mounted.
    animator: Option<(Animator, WidgetId)>,
    request: fn(&Animator, WidgetId) -> AnimationHandle,
    handle: AnimationHandle,
    min: Property<f32>,
    max: Property<f32>,
    channels: SmallVec<[HoldChannel; 2]>,
}

/// A widget that owns a [`PeakHold`].
trait HoldMeter: Widget {
    fn peak_hold(&self) -> &Rc<RefCell<PeakHold>>;
}

fn request_tick<W: HoldMeter>(animator: &Animator, id: WidgetId) -> AnimationHandle {
    animator.request::<W>(id, |w, _cx, now| {
        let peak = w.peak_hold().clone();
        PeakHold::tick(&peak, now);
    })
}

impl PeakHold {
    fn new<W: HoldMeter>(
        min: &Property<f32>,
        max: &Property<f32>,
        channels: &[(&Property<f32>, &Property<f32>)],
    ) -> Rc<RefCell<Self>> {
        let now = Instant::now();
        let peak = Rc::new(RefCell::new(Self {
            animator: None,
            request: request_tick::<W>,
            handle: AnimationHandle::INVALID,
            min: min.clone(),
            max: max.clone(),
            channels: channels
                .iter()
                .map(|(value, hold)| HoldChannel {
                    value: (*value).clone(),
                    hold: (*hold).clone(),
                    active: false,
                    start: now,
                    start_value: 0.0,
                })
                .collect(),
        }));
        for (i, (value, _)) in channels.iter().enumerate() {
            let weak: Weak<RefCell<PeakHold>> = Rc::downgrade(&peak);
            value.subscribe(move |v| {
                if let Some(peak) = weak.upgrade() {
                    PeakHold::value_changed(&peak, i, *v);
                }
            });
        }
        peak
    }

    fn value_changed(this: &Rc<RefCell<Self>>, channel: usize, value: f32) {
        let Ok(mut p) = this.try_borrow_mut() else {
            log::warn!("meter value changed from inside its own hold update");
            return;
        };
        let Some((animator, _)) = p.animator.clone() else {
            let hold = p.channels[channel].hold.clone();
            drop(p);
            hold.set(value);
            return;
        };
        let now = animator.now();
        let ch = &mut p.channels[channel];
        let hold = ch.hold.clone();
        if value > hold.get() {
            ch.start = now + HOLD_TIME;
            ch.start_value = value;
            ch.active = true;
            p.ensure_ticking();
            drop(p);
            hold.set(value);
        } else if !ch.active {
            ch.start = now;
            ch.start_value = hold.get();
            ch.active = true;
            p.ensure_ticking();
        }
    }

    fn ensure_ticking(&mut self) {
        if self.handle.is_valid() {
            return;
        }
        if let Some((animator, id)) = &self.animator {
            log::trace!("peak hold animation started for {id:?}");
            self.handle = (self.request)(animator, *id);
        }
    }

    fn tick(this: &Rc<RefCell<Self>>, now: Instant) {
        let mut updates: SmallVec<[(Property<f32>, f32); 2]> = SmallVec::new();
        {
            let mut p = this.borrow_mut();
            p.handle = AnimationHandle::INVALID;
            let range = p.max.get() - p.min.get();
            let mut animating = false;
            for ch in p.channels.iter_mut().filter(|c| c.active) {
                let seconds = signed_seconds(now, ch.start);
                if seconds <= 0.0 {
                    animating = true;
                    continue;
                }
                let decayed = ch.start_value - seconds / HOLD_DECAY_SECONDS * range;
                let live = ch.value.get();
                if decayed < live {
                    ch.active = false;
                    updates.push((ch.hold.clone(), live));
                } else {
                    animating = true;
                    updates.push((ch.hold.clone(), decayed));
                }
            }
            if animating {
                p.ensure_ticking();
            } else if let Some((_, id)) = &p.animator {
                log::trace!("peak hold animation stopped for {id:?}");
            }
        }
        for (hold, v) in updates {
            hold.set(v);
        }
    }

    fn mount(this: &Rc<RefCell<Self>>, cx: &mut WidgetContext<'_>) {
        let holds: SmallVec<[(Property<f32>, f32); 2]> = {
            let mut p = this.borrow_mut();
            p.animator = Some((cx.animator(), cx.id()));
            cx.cancel_animation_callback(&mut p.handle);
            p.channels
                .iter_mut()
                .map(|c| {
                    c.active = false;
                    (c.hold.clone(), c.value.get())
                })
                .collect()
        };
        for (hold, v) in holds {
            hold.set(v);
        }
    }

    fn unmount(this: &Rc<RefCell<Self>>, cx: &mut WidgetContext<'_>) {
        let mut p = this.borrow_mut();
        cx.cancel_animation_callback(&mut p.handle);
        p.animator = None;
        for c in p.channels.iter_mut() {
            c.active = false;
        }
    }

    fn is_animating(&self) -> bool {
        self.handle.is_valid()
    }
}

pub struct DbVuMeter {
    pub value: Property<f32>,
    pub min_value: Property<f32>,
    pub max_value: Property<f32>,
    pub settings: Property<Option<VuSettings>>,
    hold_value: Property<f32>,
    peak: Rc<RefCell<PeakHold>>,
}

impl Default for DbVuMeter {
    fn default() -> Self {
        Self::new()
    }
}

impl DbVuMeter {
    /// A meter over -60..+6 dB.
    pub fn new() -> Self {
        Self::with_range(-60.0, 6.0)
    }

    pub fn with_range(min: f32, max: f32) -> Self {
        let value = Property::new(min);
        let min_value = Property::new(min);
        let max_value = Property::new(max);
        let hold_value = Property::new(min);
        let peak = PeakHold::new::<Self>(&min_value, &max_value, &[(&value, &hold_value)]);
        Self {
            value,
            min_value,
            max_value,
            settings: Property::new(None),
            hold_value,
            peak,
        }
    }

    pub fn hold_value(&self) -> f32 {
        self.hold_value.get()
    }

    /// Read-only view of the hold value, for binding or subscribing.
    pub fn hold_value_property(&self) -> &Property<f32> {
        &self.hold_value
    }

    pub fn is_animating(&self) -> bool {
        self.peak.borrow().is_animating()
    }
}

impl HoldMeter for DbVuMeter {
    fn peak_hold(&self) -> &Rc<RefCell<PeakHold>> {
        &self.peak
    }
}

impl Widget for DbVuMeter {
    fn kind(&self) -> &'static str {
        "DbVuMeter"
    }

    fn default_style(&self, theme: &Theme) -> Style {
        theme.db_vu_style
    }

    fn mount(&mut self, cx: &mut WidgetContext<'_>) {
        let inv = cx.invalidation();
        let flags = BindingFlags::INVALIDATE_ON_CHANGED;
        self.value.set_element(&inv, flags);
        self.min_value.set_element(&inv, flags);
        self.max_value.set_element(&inv, flags);
        self.settings.set_element(&inv, flags);
        self.hold_value.set_element(&inv, flags);
        PeakHold::mount(&self.peak, cx);
    }

    fn unmount(&mut self, cx: &mut WidgetContext<'_>) {
        PeakHold::unmount(&self.peak, cx);
    }

    fn draw(&mut self, cx: &mut WidgetContext<'_>, dc: &mut dyn DrawingContext) {
        let settings = self.settings.get().unwrap_or(cx.theme().db_vu);
        let (min, max) = (self.min_value.get(), self.max_value.get());
        let value = self.value.get();
        let area = meter_area(cx, dc, &settings);
        let bar = bar_area(area, &settings);
        draw_vu(dc, value, min, max, bar, &settings);
        if settings.has_ticks {
            draw_ticks(dc, min, max, &settings, area, settings.tick_color);
        }
        let hold = self.hold_value.get();
        if hold != value {
            draw_telltale(dc, hold, value, min, max, &settings, bar);
        }
    }
}

pub struct StereoDbVuMeter {
    pub value: Property<f32>,
    pub right_value: Property<f32>,
    pub min_value: Property<f32>,
    pub max_value: Property<f32>,
    pub settings: Property<Option<VuSettings>>,
    hold_value: Property<f32>,
    right_hold_value: Property<f32>,
    peak: Rc<RefCell<PeakHold>>,
}

impl Default for StereoDbVuMeter {
    fn default() -> Self {
        Self::new()
    }
}

impl StereoDbVuMeter {
    pub fn new() -> Self {
        Self::with_range(-60.0, 6.0)
    }

    pub fn with_range(min: f32, max: f32) -> Self {
        let value = Property::new(min);
        let right_value = Property::new(min);
        let min_value = Property::new(min);
        let max_value = Property::new(max);
        let hold_value = Property::new(min);
        let right_hold_value = Property::new(min);
        let peak = PeakHold::new::<Self>(
            &min_value,
            &max_value,
            &[(&value, &hold_value), (&right_value, &right_hold_value)],
        );
        Self {
            value,
            right_value,
            min_value,
            max_value,
            settings: Property::new(None),
            hold_value,
            right_hold_value,
            peak,
        }
    }

    pub fn hold_value(&self) -> f32 {
        self.hold_value.get()
    }

    pub fn right_hold_value(&self) -> f32 {
        self.right_hold_value.get()
    }

    pub fn is_animating(&self) -> bool {
        self.peak.borrow().is_animating()
    }
}

impl HoldMeter for StereoDbVuMeter {
    fn peak_hold(&self) -> &Rc<RefCell<PeakHold>> {
        &self.peak
    }
}

impl Widget for StereoDbVuMeter {
    fn kind(&self) -> &'static str {
        "StereoDbVuMeter"
    }

    fn default_style(&self, theme: &Theme) -> Style {
        theme.stereo_db_vu_style
    }

    fn mount(&mut self, cx: &mut WidgetContext<'_>) {
        let inv = cx.invalidation();
        let flags = BindingFlags::INVALIDATE_ON_CHANGED;
        self.value.set_element(&inv, flags);
        self.right_value.set_element(&inv, flags);
        self.min_value.set_element(&inv, flags);
        self.max_value.set_element(&inv, flags);
        self.settings.set_element(&inv, flags);
        self.hold_value.set_element(&inv, flags);
        self.right_hold_value.set_element(&inv, flags);
        PeakHold::mount(&self.peak, cx);
    }

    fn unmount(&mut self, cx: &mut WidgetContext<'_>) {
        PeakHold::unmount(&self.peak, cx);
    }

    fn draw(&mut self, cx: &mut WidgetContext<'_>, dc: &mut dyn DrawingContext) {
        let settings = self.settings.get().unwrap_or(cx.theme().db_vu);
        let (min, max) = (self.min_value.get(), self.max_value.get());
        let area = meter_area(cx, dc, &settings);
        let (left, right) = split_stereo(bar_area(area, &settings), settings.padding);

        let (lv, rv) = (self.value.get(), self.right_value.get());
        draw_vu(dc, lv, min, max, left, &settings);
        draw_vu(dc, rv, min, max, right, &settings);
        if settings.has_ticks {
            draw_ticks(dc, min, max, &settings, area, settings.tick_color);
        }
        let (lh, rh) = (self.hold_value.get(), self.right_hold_value.get());
        if lh != lv {
            draw_telltale(dc, lh, lv, min, max, &settings, left);
        }
        if rh != rv {
            draw_telltale(dc, rh, rv, min, max, &settings, right);
        }
    }
}
