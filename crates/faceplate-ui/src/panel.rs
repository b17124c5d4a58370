use faceplate_core::{Style, Theme};

use crate::Widget;

/// Plain box. Draws only its style's background and border, and stacks its
/// children by alignment.
#[derive(Default)]
pub struct Panel {
    style: Option<Style>,
}

impl Panel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_style(style: Style) -> Self {
        Self { style: Some(style) }
    }
}

impl Widget for Panel {
    fn kind(&self) -> &'static str {
        "Panel"
    }

    fn default_style(&self, _theme: &Theme) -> Style {
        self.style.unwrap_or_default()
    }
}
