use crate::{Color, Rect, RoundCorners, Vec2};

/// The 2D vector-drawing backend widgets paint through.
///
/// The model is a cairo-like state machine: build a path with `rectangle`
/// or `round_corner_rectangle`, pick a color with `set_source`, then `fill`
/// or `clip`. Both consume the current path. `save`/`restore` bracket the
/// transform, source and clip.
pub trait DrawingContext {
    fn save(&mut self);
    fn restore(&mut self);

    fn translate(&mut self, dx: f32, dy: f32);
    fn scale(&mut self, sx: f32, sy: f32);

    fn rectangle(&mut self, rect: Rect);
    fn round_corner_rectangle(&mut self, rect: Rect, corners: RoundCorners);

    fn set_source(&mut self, color: Color);
    fn fill(&mut self);
    fn clip(&mut self);

    fn user_to_device(&self, p: Vec2) -> Vec2;
    fn device_to_user(&self, p: Vec2) -> Vec2;

    fn user_to_device_rect(&self, r: Rect) -> Rect {
        let a = self.user_to_device(Vec2::new(r.left(), r.top()));
        let b = self.user_to_device(Vec2::new(r.right(), r.bottom()));
        Rect::new(a.x.min(b.x), a.y.min(b.y), (b.x - a.x).abs(), (b.y - a.y).abs())
    }

    fn device_to_user_rect(&self, r: Rect) -> Rect {
        let a = self.device_to_user(Vec2::new(r.left(), r.top()));
        let b = self.device_to_user(Vec2::new(r.right(), r.bottom()));
        Rect::new(a.x.min(b.x), a.y.min(b.y), (b.x - a.x).abs(), (b.y - a.y).abs())
    }

    /// `rect` rounded outward to whole device pixels, in user space.
    fn snap_to_device(&self, rect: Rect) -> Rect {
        self.device_to_user_rect(self.user_to_device_rect(rect).ceiling())
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.set_source(color);
        self.rectangle(rect);
        self.fill();
    }

    fn fill_round_rect(&mut self, rect: Rect, corners: RoundCorners, color: Color) {
        self.set_source(color);
        if corners.is_empty() {
            self.rectangle(rect);
        } else {
            self.round_corner_rectangle(rect, corners);
        }
        self.fill();
    }
}
