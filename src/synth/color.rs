use super::error::ColorParseError;
use super::prelude::fmt;
use std::str::FromStr;

/// Brightness above which dark text is used.
const BRIGHTNESS_THRESHOLD: u8 = 125;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses a `#rrggbb` value as produced by an HTML color input.
    pub fn from_hex(hex: &str) -> Result<Self, ColorParseError> {
        let trimmed = hex.trim();
        let digits = trimmed
            .strip_prefix('#')
            .ok_or_else(|| ColorParseError::MissingHash(trimmed.to_string()))?;
        if digits.len() != 6 {
            return Err(ColorParseError::BadLength(trimmed.to_string()));
        }
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ColorParseError::BadDigit(trimmed.to_string()));
        }
        let value = u32::from_str_radix(digits, 16)
            .map_err(|_| ColorParseError::BadDigit(trimmed.to_string()))?;
        Ok(Self {
            r: ((value >> 16) & 0xFF) as u8,
            g: ((value >> 8) & 0xFF) as u8,
            b: (value & 0xFF) as u8,
        })
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// CSS `rgb(r, g, b)` form.
    pub fn to_css(self) -> String {
        format!("rgb({}, {}, {})", self.r, self.g, self.b)
    }

    /// Perceived brightness using ITU-R BT.601 luma weights, 0..=255.
    pub fn brightness(self) -> u8 {
        let weighted =
            299.0 * f64::from(self.r) + 587.0 * f64::from(self.g) + 114.0 * f64::from(self.b);
        (weighted / 1000.0).round() as u8
    }
}

impl FromStr for Rgb {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl TryFrom<String> for Rgb {
    type Error = ColorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

impl From<Rgb> for String {
    fn from(rgb: Rgb) -> Self {
        rgb.to_hex()
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextColor {
    Black,
    White,
}

impl TextColor {
    /// Text color readable on top of `background`.
    pub fn for_background(background: Rgb) -> Self {
        if background.brightness() > BRIGHTNESS_THRESHOLD {
            TextColor::Black
        } else {
            TextColor::White
        }
    }

    pub fn as_css(self) -> &'static str {
        match self {
            TextColor::Black => "black",
            TextColor::White => "white",
        }
    }

    pub fn rgb(self) -> Rgb {
        match self {
            TextColor::Black => Rgb::BLACK,
            TextColor::White => Rgb::WHITE,
        }
    }
}

/// Endpoint colors and the frequency domain they span.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorRange {
    pub low: Rgb,
    pub high: Rgb,
    pub min_frequency: f64,
    pub max_frequency: f64,
}

impl ColorRange {
    pub fn new(low: Rgb, high: Rgb, min_frequency: f64, max_frequency: f64) -> Self {
        Self {
            low,
            high,
            min_frequency,
            max_frequency,
        }
    }

    /// Position of `frequency` in the domain, clamped to `[0, 1]`.
    pub fn ratio(&self, frequency: f64) -> f64 {
        let span = self.max_frequency - self.min_frequency;
        if span <= 0.0 || !frequency.is_finite() {
            return 0.0;
        }
        ((frequency - self.min_frequency) / span).clamp(0.0, 1.0)
    }

    pub fn map(&self, frequency: f64) -> Rgb {
        map(
            frequency,
            self.low,
            self.high,
            self.min_frequency,
            self.max_frequency,
        )
    }

    pub fn colors_for(&self, frequency: f64) -> SurfaceColors {
        SurfaceColors::for_background(self.map(frequency))
    }
}

/// Interpolates each channel between `low` and `high` by the clamped
/// position of `frequency` in `[min_frequency, max_frequency]`.
pub fn map(frequency: f64, low: Rgb, high: Rgb, min_frequency: f64, max_frequency: f64) -> Rgb {
    let ratio = ColorRange::new(low, high, min_frequency, max_frequency).ratio(frequency);
    let lerp = |a: u8, b: u8| -> u8 {
        let a = f64::from(a);
        let b = f64::from(b);
        (a + (b - a) * ratio).round().clamp(0.0, 255.0) as u8
    };
    Rgb {
        r: lerp(low.r, high.r),
        g: lerp(low.g, high.g),
        b: lerp(low.b, high.b),
    }
}

/// What the display surface is asked to show for one note.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceColors {
    pub background: Rgb,
    pub text: TextColor,
}

impl SurfaceColors {
    pub fn for_background(background: Rgb) -> Self {
        Self {
            background,
            text: TextColor::for_background(background),
        }
    }
}
