use crate::{Color, RoundCorners, Thickness};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Alignment {
    #[default]
    Start,
    Center,
    End,
    Stretch,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Visibility {
    #[default]
    Visible,
    /// Takes part in layout but isn't drawn.
    Hidden,
    /// Measures as zero and isn't drawn.
    Collapsed,
}

/// Layout and decoration of one widget. A `width`/`height` of 0 means
/// "size to content"; a `max_*` of 0 means "no maximum".
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Style {
    pub width: f32,
    pub height: f32,
    pub min_width: f32,
    pub max_width: f32,
    pub min_height: f32,
    pub max_height: f32,
    pub margin: Thickness,
    pub border_width: Thickness,
    pub padding: Thickness,
    pub horizontal_alignment: Alignment,
    pub vertical_alignment: Alignment,
    pub visibility: Visibility,
    pub round_corners: RoundCorners,
    pub background: Color,
    pub border_color: Color,
}

impl Style {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn width(mut self, w: f32) -> Self {
        self.width = w;
        self
    }
    pub fn height(mut self, h: f32) -> Self {
        self.height = h;
        self
    }
    pub fn size(self, w: f32, h: f32) -> Self {
        self.width(w).height(h)
    }
    pub fn min_width(mut self, w: f32) -> Self {
        self.min_width = w;
        self
    }
    pub fn max_width(mut self, w: f32) -> Self {
        self.max_width = w;
        self
    }
    pub fn min_height(mut self, h: f32) -> Self {
        self.min_height = h;
        self
    }
    pub fn max_height(mut self, h: f32) -> Self {
        self.max_height = h;
        self
    }
    pub fn margin(mut self, t: Thickness) -> Self {
        self.margin = t;
        self
    }
    pub fn border(mut self, width: Thickness, color: Color) -> Self {
        self.border_width = width;
        self.border_color = color;
        self
    }
    pub fn padding(mut self, t: Thickness) -> Self {
        self.padding = t;
        self
    }
    pub fn horizontal_alignment(mut self, a: Alignment) -> Self {
        self.horizontal_alignment = a;
        self
    }
    pub fn vertical_alignment(mut self, a: Alignment) -> Self {
        self.vertical_alignment = a;
        self
    }
    pub fn align(self, horizontal: Alignment, vertical: Alignment) -> Self {
        self.horizontal_alignment(horizontal)
            .vertical_alignment(vertical)
    }
    pub fn stretch(self) -> Self {
        self.align(Alignment::Stretch, Alignment::Stretch)
    }
    pub fn visibility(mut self, v: Visibility) -> Self {
        self.visibility = v;
        self
    }
    pub fn round_corners(mut self, c: RoundCorners) -> Self {
        self.round_corners = c;
        self
    }
    pub fn background(mut self, c: Color) -> Self {
        self.background = c;
        self
    }

    pub fn is_drawn(&self) -> bool {
        self.visibility == Visibility::Visible
    }

    pub fn is_collapsed(&self) -> bool {
        self.visibility == Visibility::Collapsed
    }
}
