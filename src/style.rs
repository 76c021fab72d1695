use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseColorError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Color {
    type Err = ParseColorError;

    /// Parses `#rgb` and `#rrggbb` hex notation.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseColorError(value.to_string());
        let hex = value.trim().strip_prefix('#').ok_or_else(invalid)?;
        if !hex.chars().all(|ch| ch.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let channel = |digits: &str| u8::from_str_radix(digits, 16).map_err(|_| invalid());
        match hex.len() {
            3 => {
                let expand = |idx: usize| channel(&hex[idx..idx + 1].repeat(2));
                Ok(Self::rgb(expand(0)?, expand(1)?, expand(2)?))
            }
            6 => Ok(Self::rgb(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
            )),
            _ => Err(invalid()),
        }
    }
}

impl Serialize for Color {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Alignment {
    Left,
    Center,
    Right,
}

impl Alignment {
    pub const ALL: [Alignment; 3] = [Alignment::Left, Alignment::Center, Alignment::Right];

    pub fn as_str(self) -> &'static str {
        match self {
            Alignment::Left => "left",
            Alignment::Center => "center",
            Alignment::Right => "right",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "left" => Some(Alignment::Left),
            "center" => Some(Alignment::Center),
            "right" => Some(Alignment::Right),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ColorChannel {
    Foreground,
    Background,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StyleFlag {
    Bold,
    Italic,
    Underline,
    Strike,
}

impl StyleFlag {
    pub const ALL: [StyleFlag; 4] = [
        StyleFlag::Bold,
        StyleFlag::Italic,
        StyleFlag::Underline,
        StyleFlag::Strike,
    ];

    pub fn label(self) -> &'static str {
        match self {
            StyleFlag::Bold => "Bold",
            StyleFlag::Italic => "Italic",
            StyleFlag::Underline => "Underline",
            StyleFlag::Strike => "Strikethrough",
        }
    }
}

/// The combined style bundle: everything that is resolved as one unit per
/// position. At most one bundle applies to any character.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FontBundle {
    pub family: String,
    pub size: u16,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strike: bool,
}

impl FontBundle {
    pub fn plain(family: impl Into<String>, size: u16) -> Self {
        Self {
            family: family.into(),
            size,
            bold: false,
            italic: false,
            underline: false,
            strike: false,
        }
    }

    pub fn flag(&self, flag: StyleFlag) -> bool {
        match flag {
            StyleFlag::Bold => self.bold,
            StyleFlag::Italic => self.italic,
            StyleFlag::Underline => self.underline,
            StyleFlag::Strike => self.strike,
        }
    }

    pub fn set_flag(&mut self, flag: StyleFlag, value: bool) {
        match flag {
            StyleFlag::Bold => self.bold = value,
            StyleFlag::Italic => self.italic = value,
            StyleFlag::Underline => self.underline = value,
            StyleFlag::Strike => self.strike = value,
        }
    }

    pub fn with_flag(mut self, flag: StyleFlag, value: bool) -> Self {
        self.set_flag(flag, value);
        self
    }
}

/// Effective formatting of a single character.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct StyleSpec {
    pub family: String,
    /// Point size at 100% zoom.
    pub size: u16,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strike: bool,
    pub foreground: Option<Color>,
    pub background: Option<Color>,
}

impl StyleSpec {
    pub fn from_parts(bundle: FontBundle, foreground: Option<Color>, background: Option<Color>) -> Self {
        Self {
            family: bundle.family,
            size: bundle.size,
            bold: bundle.bold,
            italic: bundle.italic,
            underline: bundle.underline,
            strike: bundle.strike,
            foreground,
            background,
        }
    }

    pub fn bundle(&self) -> FontBundle {
        FontBundle {
            family: self.family.clone(),
            size: self.size,
            bold: self.bold,
            italic: self.italic,
            underline: self.underline,
            strike: self.strike,
        }
    }

    pub fn flag(&self, flag: StyleFlag) -> bool {
        match flag {
            StyleFlag::Bold => self.bold,
            StyleFlag::Italic => self.italic,
            StyleFlag::Underline => self.underline,
            StyleFlag::Strike => self.strike,
        }
    }

    pub fn set_flag(&mut self, flag: StyleFlag, value: bool) {
        match flag {
            StyleFlag::Bold => self.bold = value,
            StyleFlag::Italic => self.italic = value,
            StyleFlag::Underline => self.underline = value,
            StyleFlag::Strike => self.strike = value,
        }
    }

    pub fn color(&self, channel: ColorChannel) -> Option<Color> {
        match channel {
            ColorChannel::Foreground => self.foreground,
            ColorChannel::Background => self.background,
        }
    }

    pub fn set_color(&mut self, channel: ColorChannel, color: Option<Color>) {
        match channel {
            ColorChannel::Foreground => self.foreground = color,
            ColorChannel::Background => self.background = color,
        }
    }

    /// Point size a renderer should use at the given zoom level.
    pub fn scaled_size(&self, zoom_percent: u16) -> u16 {
        let zoom = if zoom_percent == 0 { 100 } else { zoom_percent };
        let scaled = (u32::from(self.size) * u32::from(zoom) + 50) / 100;
        u16::try_from(scaled).unwrap_or(u16::MAX).max(1)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StyleId(u32);

impl StyleId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Interning table for font bundles. Structurally equal bundles always map
/// to the same id; ids are never reused or invalidated.
#[derive(Clone, Debug, Default)]
pub struct StyleTable {
    bundles: Vec<FontBundle>,
    index: HashMap<FontBundle, StyleId>,
}

impl StyleTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn intern(&mut self, bundle: FontBundle) -> StyleId {
        if let Some(id) = self.index.get(&bundle) {
            return *id;
        }
        let id = StyleId(u32::try_from(self.bundles.len()).unwrap_or(u32::MAX));
        self.bundles.push(bundle.clone());
        self.index.insert(bundle, id);
        id
    }

    pub fn get(&self, id: StyleId) -> Option<&FontBundle> {
        self.bundles.get(id.index())
    }

    pub fn len(&self) -> usize {
        self.bundles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bundles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_short_and_long_hex_colors() {
        assert_eq!("#f00".parse::<Color>().ok(), Some(Color::rgb(255, 0, 0)));
        assert_eq!("#00ff7f".parse::<Color>().ok(), Some(Color::rgb(0, 255, 127)));
        assert!("red".parse::<Color>().is_err());
        assert!("#12345".parse::<Color>().is_err());
        assert_eq!(Color::rgb(255, 255, 0).to_string(), "#ffff00");
    }

    #[test]
    fn interning_is_structural() {
        let mut table = StyleTable::new();
        let a = table.intern(FontBundle::plain("Calibri", 11).with_flag(StyleFlag::Bold, true));
        let b = table.intern(FontBundle::plain("Calibri", 11).with_flag(StyleFlag::Bold, true));
        let c = table.intern(FontBundle::plain("Calibri", 12));
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn scaled_size_rounds_and_never_hits_zero() {
        let spec = StyleSpec::from_parts(FontBundle::plain("Calibri", 11), None, None);
        assert_eq!(spec.scaled_size(100), 11);
        assert_eq!(spec.scaled_size(150), 17);
        assert_eq!(spec.scaled_size(1), 1);
    }
}
