//! # Theme
//!
//! Colors and default styles, looked up by widget kind when a widget is
//! added to a window. A window owns one `Theme`; widgets read it in
//! `default_style` and at mount time.
//!
//! ```rust
//! use faceplate_core::*;
//!
//! let theme = Theme {
//!     secondary_text: Color::from_hex("#808080"),
//!     ..Theme::default()
//! };
//! assert_eq!(theme.db_vu.yellow_level, Some(-12.0));
//! ```
//!
//! With the `serde` feature a theme can be loaded from JSON; missing fields
//! keep their defaults.

use crate::{Alignment, Color, HoverColors, Style, Thickness};

/// Colors and threshold levels for a level meter. Unset levels disable the
/// corresponding color band.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct VuSettings {
    pub green: Color,
    pub yellow: Color,
    pub red: Color,
    pub tick_color: Color,
    pub has_ticks: bool,
    /// Spacing between tick marks, in meter units.
    pub tick_db: f32,
    pub tick_width: f32,
    pub padding: f32,
    pub yellow_level: Option<f32>,
    pub red_level: Option<f32>,
}

impl Default for VuSettings {
    fn default() -> Self {
        Self {
            green: Color::from_hex("#40C040"),
            yellow: Color::from_hex("#C0C040"),
            red: Color::from_hex("#C04040"),
            tick_color: Color::from_hex("#A0A0A0"),
            has_ticks: false,
            tick_db: 6.0,
            tick_width: 4.0,
            padding: 2.0,
            yellow_level: None,
            red_level: None,
        }
    }
}

impl VuSettings {
    pub fn db() -> Self {
        Self {
            has_ticks: true,
            yellow_level: Some(-12.0),
            red_level: Some(0.0),
            ..Self::default()
        }
    }
}

pub const SCROLLBAR_WIDTH: f32 = 8.0;
pub const SCROLLBAR_PADDING: f32 = 4.0;
pub const COLLAPSED_SCROLLBAR_WIDTH: f32 = 3.0;
pub const VU_BAR_WIDTH: f32 = 4.0;

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Theme {
    pub background: Color,
    pub on_surface: Color,
    /// Low-emphasis foreground; scrollbar colors derive from it.
    pub secondary_text: Color,

    pub scrollbar_thumb: HoverColors,
    pub scrollbar_track: HoverColors,
    pub vertical_scrollbar: Style,
    pub horizontal_scrollbar: Style,
    pub collapsed_vertical_scrollbar: Style,
    pub collapsed_horizontal_scrollbar: Style,

    pub vu: VuSettings,
    pub db_vu: VuSettings,
    pub vu_style: Style,
    pub stereo_vu_style: Style,
    pub db_vu_style: Style,
    pub stereo_db_vu_style: Style,

    pub scroll_container: Style,
}

impl Default for Theme {
    fn default() -> Self {
        Self::with_secondary_text(Color::from_hex("#121212"), Color::from_hex("#A0A0A0"))
    }
}

impl Theme {
    /// Builds the default theme around a background and a secondary text
    /// color.
    pub fn with_secondary_text(background: Color, secondary_text: Color) -> Self {
        let bar = SCROLLBAR_WIDTH + 2.0 * SCROLLBAR_PADDING;
        let collapsed = COLLAPSED_SCROLLBAR_WIDTH + 2.0;
        let vu = VuSettings::default();
        let db_vu = VuSettings::db();

        Self {
            background,
            on_surface: Color::from_hex("#DDDDDD"),
            secondary_text,

            scrollbar_thumb: HoverColors::new(
                secondary_text.with_opacity(0.5),
                secondary_text.with_opacity(0.75),
            ),
            scrollbar_track: HoverColors::with_max_opacity(secondary_text, 0.12),
            vertical_scrollbar: Style::new()
                .width(bar)
                .padding(Thickness::all(SCROLLBAR_PADDING))
                .align(Alignment::End, Alignment::Stretch),
            horizontal_scrollbar: Style::new()
                .height(bar)
                .padding(Thickness::all(SCROLLBAR_PADDING))
                .align(Alignment::Stretch, Alignment::End),
            collapsed_vertical_scrollbar: Style::new()
                .width(collapsed)
                .padding(Thickness::new(0.0, SCROLLBAR_PADDING, 2.0, SCROLLBAR_PADDING)),
            collapsed_horizontal_scrollbar: Style::new()
                .height(collapsed)
                .padding(Thickness::new(SCROLLBAR_PADDING, 0.0, SCROLLBAR_PADDING, 2.0)),

            vu_style: Style::new()
                .size(VU_BAR_WIDTH + 2.0 * vu.padding, 52.0)
                .margin(Thickness::all(1.0)),
            stereo_vu_style: Style::new()
                .size(2.0 * VU_BAR_WIDTH + 3.0 * vu.padding, 52.0)
                .margin(Thickness::all(1.0)),
            db_vu_style: Style::new()
                .size(db_vu.tick_width + VU_BAR_WIDTH + 3.0 * db_vu.padding, 48.0)
                .margin(Thickness::all(1.0)),
            stereo_db_vu_style: Style::new()
                .size(db_vu.tick_width + 2.0 * VU_BAR_WIDTH + 4.0 * db_vu.padding, 48.0)
                .margin(Thickness::all(1.0)),
            vu,
            db_vu,

            scroll_container: Style::new().stretch(),
        }
    }

    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> crate::Result<Theme> {
        serde_json::from_str(json).map_err(|e| crate::Error::Theme(e.to_string()))
    }

    #[cfg(feature = "serde")]
    pub fn to_json(&self) -> crate::Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| crate::Error::Theme(e.to_string()))
    }
}
