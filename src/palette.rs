//! Ball colour palettes.
//!
//! Five ranged palettes partition `1..=45` into bands of 10, 10, 10, 10 and 5
//! numbers. The bonus ball always uses its own palette.

use std::fmt;

use serde::Serialize;
use tracing::trace;

/// An opaque colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Lowercase `#rrggbb`.
    pub fn hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Nearest colour in the xterm 256-colour cube.
    pub fn to_ansi256(self) -> u8 {
        let level = |c: u8| -> u8 {
            if c < 48 {
                0
            } else if c < 115 {
                1
            } else {
                (c - 35) / 40
            }
        };
        16 + 36 * level(self.r) + 6 * level(self.g) + level(self.b)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.hex())
    }
}

impl Serialize for Rgb {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.hex())
    }
}

/// A colour with alpha, used for the ball ring.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub rgb: Rgb,
    pub alpha: f32,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, alpha: f32) -> Self {
        Self {
            rgb: Rgb::new(r, g, b),
            alpha,
        }
    }

    /// CSS `rgba(...)` notation.
    pub fn css(&self) -> String {
        format!(
            "rgba({}, {}, {}, {})",
            self.rgb.r, self.rgb.g, self.rgb.b, self.alpha
        )
    }
}

impl Serialize for Rgba {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.css())
    }
}

/// Two-stop diagonal gradient.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Gradient {
    pub from: Rgb,
    pub to: Rgb,
}

impl Gradient {
    /// CSS `linear-gradient(135deg, ...)` notation.
    pub fn css(&self) -> String {
        format!("linear-gradient(135deg, {}, {})", self.from, self.to)
    }
}

impl Serialize for Gradient {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.css())
    }
}

/// Which numbers a palette applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Band {
    /// Inclusive number range.
    Range { min: u8, max: u8 },
    /// Reserved for the bonus ball.
    Bonus,
}

impl Band {
    pub const fn contains(&self, number: u8) -> bool {
        match self {
            Self::Range { min, max } => number >= *min && number <= *max,
            Self::Bonus => false,
        }
    }
}

impl fmt::Display for Band {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Range { min, max } => write!(f, "{min}-{max}"),
            Self::Bonus => f.write_str("bonus"),
        }
    }
}

/// Colour scheme for one ball.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Palette {
    pub band: Band,
    pub gradient: Gradient,
    pub ring: Rgba,
    pub text: Rgb,
}

const fn ranged(min: u8, max: u8, from: Rgb, to: Rgb, ring: Rgba, text: Rgb) -> Palette {
    Palette {
        band: Band::Range { min, max },
        gradient: Gradient { from, to },
        ring,
        text,
    }
}

/// Ranged palettes in band order.
pub const PALETTES: [Palette; 5] = [
    ranged(
        1,
        10,
        Rgb::new(0xff, 0xd1, 0x66),
        Rgb::new(0xff, 0x8f, 0x1f),
        Rgba::new(255, 188, 102, 0.8),
        Rgb::new(0x1b, 0x14, 0x0b),
    ),
    ranged(
        11,
        20,
        Rgb::new(0x7b, 0xdf, 0xf2),
        Rgb::new(0x4c, 0x7b, 0xff),
        Rgba::new(91, 142, 255, 0.7),
        Rgb::new(0x0b, 0x1c, 0x3b),
    ),
    ranged(
        21,
        30,
        Rgb::new(0x8b, 0xfb, 0xa0),
        Rgb::new(0x38, 0xb0, 0x00),
        Rgba::new(68, 216, 132, 0.7),
        Rgb::new(0x0c, 0x24, 0x14),
    ),
    ranged(
        31,
        40,
        Rgb::new(0xff, 0x9b, 0xd5),
        Rgb::new(0xff, 0x4d, 0x6d),
        Rgba::new(255, 146, 196, 0.7),
        Rgb::new(0x2c, 0x09, 0x16),
    ),
    ranged(
        41,
        45,
        Rgb::new(0xd7, 0xb5, 0xff),
        Rgb::new(0x8a, 0x5c, 0xff),
        Rgba::new(169, 124, 255, 0.7),
        Rgb::new(0x1d, 0x10, 0x2e),
    ),
];

/// Palette reserved for the bonus ball.
pub const BONUS_PALETTE: Palette = Palette {
    band: Band::Bonus,
    gradient: Gradient {
        from: Rgb::new(0xff, 0xe2, 0x9f),
        to: Rgb::new(0xff, 0xb3, 0x47),
    },
    ring: Rgba::new(255, 179, 71, 0.85),
    text: Rgb::new(0x3a, 0x20, 0x00),
};

/// Pick the palette for a ball.
///
/// Bonus balls always get [`BONUS_PALETTE`]. Otherwise the first band that
/// contains `number` wins, falling back to the first band.
pub fn select_palette(number: u8, is_bonus: bool) -> &'static Palette {
    if is_bonus {
        return &BONUS_PALETTE;
    }
    let palette = PALETTES
        .iter()
        .find(|p| p.band.contains(number))
        .unwrap_or(&PALETTES[0]);
    trace!(number, band = %palette.band, "Palette selected");
    palette
}

/// Every palette, ranged bands first then bonus.
pub fn all_palettes() -> impl Iterator<Item = &'static Palette> {
    PALETTES.iter().chain(std::iter::once(&BONUS_PALETTE))
}
