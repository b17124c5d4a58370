#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Vec2) -> f32 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const ZERO: Size = Size {
        width: 0.0,
        height: 0.0,
    };

    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Shrinks by a thickness, never going below zero.
    pub fn remove_thickness(self, t: Thickness) -> Size {
        Size {
            width: (self.width - t.left - t.right).max(0.0),
            height: (self.height - t.top - t.bottom).max(0.0),
        }
    }

    pub fn add_thickness(self, t: Thickness) -> Size {
        Size {
            width: self.width + t.left + t.right,
            height: self.height + t.top + t.bottom,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn from_size(size: Size) -> Self {
        Self::new(0.0, 0.0, size.width, size.height)
    }

    pub fn left(&self) -> f32 {
        self.x
    }
    pub fn top(&self) -> f32 {
        self.y
    }
    pub fn right(&self) -> f32 {
        self.x + self.w
    }
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn size(&self) -> Size {
        Size::new(self.w, self.h)
    }

    pub fn is_empty(&self) -> bool {
        self.w <= 0.0 || self.h <= 0.0
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.x && p.x <= self.x + self.w && p.y >= self.y && p.y <= self.y + self.h
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }

    pub fn translate(&self, d: Vec2) -> Rect {
        Rect::new(self.x + d.x, self.y + d.y, self.w, self.h)
    }

    /// Grows the rectangle on all sides; negative amounts shrink it.
    pub fn inflate(&self, amount: f32) -> Rect {
        Rect::new(
            self.x - amount,
            self.y - amount,
            self.w + 2.0 * amount,
            self.h + 2.0 * amount,
        )
    }

    pub fn remove_thickness(&self, t: Thickness) -> Rect {
        Rect::new(
            self.x + t.left,
            self.y + t.top,
            self.w - t.left - t.right,
            self.h - t.top - t.bottom,
        )
    }

    /// Smallest whole-pixel rectangle that covers this one.
    pub fn ceiling(&self) -> Rect {
        let left = self.x.floor();
        let top = self.y.floor();
        let right = self.right().ceil();
        let bottom = self.bottom().ceil();
        Rect::new(left, top, right - left, bottom - top)
    }
}

/// Edge widths for margins, borders and padding.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Thickness {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Thickness {
    pub const ZERO: Thickness = Thickness::all(0.0);

    pub const fn all(v: f32) -> Self {
        Self {
            left: v,
            top: v,
            right: v,
            bottom: v,
        }
    }

    pub const fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn horizontal(&self) -> f32 {
        self.left + self.right
    }
    pub fn vertical(&self) -> f32 {
        self.top + self.bottom
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoundCorners {
    pub top_left: f32,
    pub top_right: f32,
    pub bottom_left: f32,
    pub bottom_right: f32,
}

impl RoundCorners {
    pub const fn all(r: f32) -> Self {
        Self {
            top_left: r,
            top_right: r,
            bottom_left: r,
            bottom_right: r,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.top_left <= 0.0
            && self.top_right <= 0.0
            && self.bottom_left <= 0.0
            && self.bottom_right <= 0.0
    }
}

/// Axis-aligned affine transform (scale, then translate). Rotation is not
/// needed by any widget in this crate.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub translate_x: f32,
    pub translate_y: f32,
    pub scale_x: f32,
    pub scale_y: f32,
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform {
    pub fn identity() -> Self {
        Self {
            translate_x: 0.0,
            translate_y: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
        }
    }

    /// Post-multiplies a translation: user coordinates are translated first.
    pub fn then_translate(&self, dx: f32, dy: f32) -> Transform {
        Transform {
            translate_x: self.translate_x + self.scale_x * dx,
            translate_y: self.translate_y + self.scale_y * dy,
            ..*self
        }
    }

    pub fn then_scale(&self, sx: f32, sy: f32) -> Transform {
        Transform {
            scale_x: self.scale_x * sx,
            scale_y: self.scale_y * sy,
            ..*self
        }
    }

    pub fn apply_to_point(&self, p: Vec2) -> Vec2 {
        Vec2 {
            x: p.x * self.scale_x + self.translate_x,
            y: p.y * self.scale_y + self.translate_y,
        }
    }

    pub fn invert_point(&self, p: Vec2) -> Vec2 {
        let sx = if self.scale_x == 0.0 { 1.0 } else { self.scale_x };
        let sy = if self.scale_y == 0.0 { 1.0 } else { self.scale_y };
        Vec2 {
            x: (p.x - self.translate_x) / sx,
            y: (p.y - self.translate_y) / sy,
        }
    }

    pub fn apply_to_rect(&self, r: Rect) -> Rect {
        let a = self.apply_to_point(Vec2::new(r.x, r.y));
        let b = self.apply_to_point(Vec2::new(r.right(), r.bottom()));
        normalized(a, b)
    }

    pub fn invert_rect(&self, r: Rect) -> Rect {
        let a = self.invert_point(Vec2::new(r.x, r.y));
        let b = self.invert_point(Vec2::new(r.right(), r.bottom()));
        normalized(a, b)
    }
}

fn normalized(a: Vec2, b: Vec2) -> Rect {
    Rect::new(
        a.x.min(b.x),
        a.y.min(b.y),
        (b.x - a.x).abs(),
        (b.y - a.y).abs(),
    )
}
