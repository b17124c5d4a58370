use bitflags::bitflags;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Color(pub u8, pub u8, pub u8, pub u8);

impl Color {
    pub const TRANSPARENT: Color = Color(0, 0, 0, 0);
    pub const BLACK: Color = Color(0, 0, 0, 255);
    pub const WHITE: Color = Color(255, 255, 255, 255);

    pub fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Color(r, g, b, 255)
    }
    pub fn from_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Color(r, g, b, a)
    }

    /// Lenient parse: malformed channels become 0, unknown lengths become black.
    pub fn from_hex(hex: &str) -> Self {
        Self::parse_hex(hex).unwrap_or(Color::BLACK)
    }

    /// Strict parse of `#RRGGBB` or `#RRGGBBAA`.
    pub fn parse_hex(hex: &str) -> Option<Self> {
        let s = hex.trim_start_matches('#');
        let channel = |i: usize| u8::from_str_radix(s.get(i..i + 2)?, 16).ok();
        match s.len() {
            6 => Some(Color(channel(0)?, channel(2)?, channel(4)?, 255)),
            8 => Some(Color(channel(0)?, channel(2)?, channel(4)?, channel(6)?)),
            _ => None,
        }
    }

    pub fn to_hex(self) -> String {
        if self.3 == 255 {
            format!("#{:02X}{:02X}{:02X}", self.0, self.1, self.2)
        } else {
            format!("#{:02X}{:02X}{:02X}{:02X}", self.0, self.1, self.2, self.3)
        }
    }

    pub fn with_alpha(self, a: u8) -> Self {
        Color(self.0, self.1, self.2, a)
    }

    /// Same color at `opacity` (0..=1) of full alpha.
    pub fn with_opacity(self, opacity: f32) -> Self {
        self.with_alpha((opacity.clamp(0.0, 1.0) * 255.0).round() as u8)
    }

    /// `t == 0` yields `from`, `t == 1` yields `to`.
    pub fn blend(t: f32, from: Color, to: Color) -> Color {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        Color(
            mix(from.0, to.0),
            mix(from.1, to.1),
            mix(from.2, to.2),
            mix(from.3, to.3),
        )
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Color {
    fn serialize<S: serde::Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&self.to_hex())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Color {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let s = String::deserialize(d)?;
        Color::parse_hex(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid color '{s}'")))
    }
}

bitflags! {
    /// Interaction state used to pick colors from a [`HoverColors`] set.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct HoverState: u8 {
        const FOCUS = 1;
        const HOVER = 2;
        const PRESSED = 4;
    }
}

/// One color per combination of [`HoverState`] flags.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HoverColors {
    colors: [Color; 8],
}

impl HoverColors {
    /// Blends from `background` toward `foreground`: focus and hover each add
    /// 15%, pressed goes all the way.
    pub fn new(background: Color, foreground: Color) -> Self {
        let background = if background.3 == 0 {
            foreground.with_alpha(0)
        } else {
            background
        };
        let mut colors = [Color::TRANSPARENT; 8];
        for (i, slot) in colors.iter_mut().enumerate() {
            let state = HoverState::from_bits_truncate(i as u8);
            let mut blend = 0.0;
            if state.contains(HoverState::FOCUS) {
                blend = 0.15;
            }
            if state.contains(HoverState::HOVER) {
                blend += 0.15;
            }
            if state.contains(HoverState::PRESSED) {
                blend = 1.0;
            }
            *slot = Color::blend(blend, background, foreground);
        }
        Self { colors }
    }

    /// Transparent at rest, up to `max_opacity` of `color` when pressed.
    pub fn with_max_opacity(color: Color, max_opacity: f32) -> Self {
        Self::new(color.with_alpha(0), color.with_opacity(max_opacity))
    }

    pub fn color(&self, state: HoverState) -> Color {
        self.colors[state.bits() as usize & 7]
    }
}
