#![forbid(unsafe_code)]

//! Region colors and injectable color generation.
//!
//! Every leaf region carries an [`Rgb`] value. Splitting a leaf needs one
//! fresh color for the new sibling; where that color comes from is decided
//! by the caller through [`ColorSource`], so tests and scripted sessions can
//! use a deterministic [`PaletteColors`] while interactive hosts use
//! [`RandomColors`].

use std::fmt;
use std::str::FromStr;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// 24-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Failure to parse a `#rrggbb` color literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseRgbError {
    input: String,
}

impl fmt::Display for ParseRgbError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid color literal {:?} (expected #rrggbb)", self.input)
    }
}

impl std::error::Error for ParseRgbError {}

impl FromStr for Rgb {
    type Err = ParseRgbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseRgbError {
            input: s.to_string(),
        };
        let hex = s.strip_prefix('#').ok_or_else(err)?;
        if hex.len() != 6 || !hex.bytes().all(|byte| byte.is_ascii_hexdigit()) {
            return Err(err());
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16).map_err(|_| err())
        };
        Ok(Self {
            r: channel(0..2)?,
            g: channel(2..4)?,
            b: channel(4..6)?,
        })
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Rgb {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Rgb {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Producer of fresh region colors.
pub trait ColorSource {
    /// Return the next color. Called once per split.
    fn next_color(&mut self) -> Rgb;
}

impl<T: ColorSource + ?Sized> ColorSource for &mut T {
    fn next_color(&mut self) -> Rgb {
        (**self).next_color()
    }
}

impl<T: ColorSource + ?Sized> ColorSource for Box<T> {
    fn next_color(&mut self) -> Rgb {
        (**self).next_color()
    }
}

/// Uniformly random colors, one independent draw per channel.
#[derive(Debug, Clone)]
pub struct RandomColors {
    rng: SmallRng,
}

impl RandomColors {
    /// Seed from the operating system.
    #[must_use]
    pub fn from_os_rng() -> Self {
        Self {
            rng: SmallRng::from_os_rng(),
        }
    }

    /// Deterministic stream for a given seed.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomColors {
    fn default() -> Self {
        Self::from_os_rng()
    }
}

impl ColorSource for RandomColors {
    fn next_color(&mut self) -> Rgb {
        Rgb::new(self.rng.random(), self.rng.random(), self.rng.random())
    }
}

/// Cycles through a fixed palette.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaletteColors {
    palette: Vec<Rgb>,
    cursor: usize,
}

impl PaletteColors {
    /// Build from a palette. An empty palette yields black.
    #[must_use]
    pub fn new(palette: impl Into<Vec<Rgb>>) -> Self {
        Self {
            palette: palette.into(),
            cursor: 0,
        }
    }
}

impl ColorSource for PaletteColors {
    fn next_color(&mut self) -> Rgb {
        if self.palette.is_empty() {
            return Rgb::default();
        }
        let color = self.palette[self.cursor % self.palette.len()];
        self.cursor = self.cursor.wrapping_add(1);
        color
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn display_is_lowercase_hex() {
        assert_eq!(Rgb::new(255, 8, 171).to_string(), "#ff08ab");
    }

    #[test]
    fn parse_rejects_malformed_literals() {
        assert!("ff08ab".parse::<Rgb>().is_err());
        assert!("#ff08a".parse::<Rgb>().is_err());
        assert!("#gg0000".parse::<Rgb>().is_err());
        assert!("#ééé".parse::<Rgb>().is_err());
        assert_eq!("#FF08AB".parse::<Rgb>(), Ok(Rgb::new(255, 8, 171)));
    }

    #[test]
    fn seeded_random_colors_are_reproducible() {
        let mut a = RandomColors::seeded(7);
        let mut b = RandomColors::seeded(7);
        let first: Vec<Rgb> = (0..8).map(|_| a.next_color()).collect();
        let second: Vec<Rgb> = (0..8).map(|_| b.next_color()).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn palette_cycles() {
        let red = Rgb::new(255, 0, 0);
        let blue = Rgb::new(0, 0, 255);
        let mut colors = PaletteColors::new(vec![red, blue]);
        assert_eq!(colors.next_color(), red);
        assert_eq!(colors.next_color(), blue);
        assert_eq!(colors.next_color(), red);
        assert_eq!(PaletteColors::new(Vec::<Rgb>::new()).next_color(), Rgb::default());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_uses_hex_literal() {
        let json = serde_json::to_string(&Rgb::new(16, 32, 48)).expect("serialize");
        assert_eq!(json, "\"#102030\"");
        let back: Rgb = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, Rgb::new(16, 32, 48));
    }

    proptest! {
        #[test]
        fn display_parse_inverse(r in any::<u8>(), g in any::<u8>(), b in any::<u8>()) {
            let color = Rgb::new(r, g, b);
            prop_assert_eq!(color.to_string().parse::<Rgb>(), Ok(color));
        }
    }
}
