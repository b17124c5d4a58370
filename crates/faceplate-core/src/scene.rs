//! A [`DrawingContext`] that records what was drawn.
//!
//! Every fill lands in `Scene::nodes` in device coordinates, already
//! transformed, so a test (or a real renderer) can consume the frame without
//! replaying any state.

use crate::{Color, DrawingContext, Rect, RoundCorners, Transform, Vec2};

#[derive(Clone, Debug, PartialEq)]
pub enum SceneNode {
    Fill {
        rect: Rect,
        color: Color,
        corners: RoundCorners,
    },
    PushClip {
        rect: Rect,
    },
    PopClip,
}

#[derive(Clone, Copy, Debug)]
struct GState {
    transform: Transform,
    source: Color,
    clips: usize,
}

impl Default for GState {
    fn default() -> Self {
        Self {
            transform: Transform::identity(),
            source: Color::BLACK,
            clips: 0,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct Scene {
    pub clear_color: Color,
    pub nodes: Vec<SceneNode>,
    state: GState,
    stack: Vec<GState>,
    path: Vec<(Rect, RoundCorners)>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops recorded nodes and resets the graphics state.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.state = GState::default();
        self.stack.clear();
        self.path.clear();
    }

    pub fn fills(&self) -> impl Iterator<Item = (Rect, Color)> + '_ {
        self.nodes.iter().filter_map(|n| match n {
            SceneNode::Fill { rect, color, .. } => Some((*rect, *color)),
            _ => None,
        })
    }

    pub fn fills_with(&self, color: Color) -> Vec<Rect> {
        self.fills()
            .filter(|(_, c)| *c == color)
            .map(|(r, _)| r)
            .collect()
    }

    pub fn fill_count(&self) -> usize {
        self.fills().count()
    }

    pub fn transform(&self) -> Transform {
        self.state.transform
    }
}

impl DrawingContext for Scene {
    fn save(&mut self) {
        self.stack.push(self.state);
        self.state.clips = 0;
    }

    fn restore(&mut self) {
        for _ in 0..self.state.clips {
            self.nodes.push(SceneNode::PopClip);
        }
        match self.stack.pop() {
            Some(s) => self.state = s,
            None => log::warn!("Scene::restore without matching save"),
        }
    }

    fn translate(&mut self, dx: f32, dy: f32) {
        self.state.transform = self.state.transform.then_translate(dx, dy);
    }

    fn scale(&mut self, sx: f32, sy: f32) {
        self.state.transform = self.state.transform.then_scale(sx, sy);
    }

    fn rectangle(&mut self, rect: Rect) {
        self.path.push((rect, RoundCorners::default()));
    }

    fn round_corner_rectangle(&mut self, rect: Rect, corners: RoundCorners) {
        self.path.push((rect, corners));
    }

    fn set_source(&mut self, color: Color) {
        self.state.source = color;
    }

    fn fill(&mut self) {
        let t = self.state.transform;
        let color = self.state.source;
        for (rect, corners) in self.path.drain(..) {
            self.nodes.push(SceneNode::Fill {
                rect: t.apply_to_rect(rect),
                color,
                corners,
            });
        }
    }

    fn clip(&mut self) {
        let t = self.state.transform;
        let mut path = std::mem::take(&mut self.path).into_iter();
        let Some((first, _)) = path.next() else {
            return;
        };
        let bounds = path.fold(t.apply_to_rect(first), |acc, (r, _)| {
            let r = t.apply_to_rect(r);
            let left = acc.left().min(r.left());
            let top = acc.top().min(r.top());
            Rect::new(
                left,
                top,
                acc.right().max(r.right()) - left,
                acc.bottom().max(r.bottom()) - top,
            )
        });
        self.nodes.push(SceneNode::PushClip { rect: bounds });
        self.state.clips += 1;
    }

    fn user_to_device(&self, p: Vec2) -> Vec2 {
        self.state.transform.apply_to_point(p)
    }

    fn device_to_user(&self, p: Vec2) -> Vec2 {
        self.state.transform.invert_point(p)
    }
}
