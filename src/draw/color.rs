//! RGBA color type, packed ARGB conversion and predefined color constants.

use std::fmt;

/// Represents an RGBA color with 8-bit components.
///
/// Colors are persisted as a packed 32-bit ARGB integer (`0xAARRGGBB`), written
/// as a signed decimal so files stay compatible with editors that store the
/// value in a signed 32-bit slot.
///
/// # Examples
///
/// ```
/// use shapeboard::draw::Color;
/// let red = Color::rgb(255, 0, 0);
/// assert_eq!(red.to_argb(), 0xFFFF_0000);
/// assert_eq!(Color::from_argb(0xFFFF_0000), red);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Color {
    /// Red component (0 = no red, 255 = full red)
    pub r: u8,
    /// Green component (0 = no green, 255 = full green)
    pub g: u8,
    /// Blue component (0 = no blue, 255 = full blue)
    pub b: u8,
    /// Alpha/opacity (0 = fully transparent, 255 = fully opaque)
    pub a: u8,
}

impl Color {
    /// Creates a new color from RGBA components.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Creates a fully opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Unpacks a `0xAARRGGBB` value.
    pub const fn from_argb(argb: u32) -> Self {
        Self {
            a: (argb >> 24) as u8,
            r: (argb >> 16) as u8,
            g: (argb >> 8) as u8,
            b: argb as u8,
        }
    }

    /// Packs the color as `0xAARRGGBB`.
    pub const fn to_argb(self) -> u32 {
        ((self.a as u32) << 24) | ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }

    /// Returns true when the color has no opacity and should not be filled.
    pub const fn is_transparent(self) -> bool {
        self.a == 0
    }

    /// Components scaled to 0.0-1.0, in `(r, g, b, a)` order.
    pub fn to_rgba_f64(self) -> (f64, f64, f64, f64) {
        (
            self.r as f64 / 255.0,
            self.g as f64 / 255.0,
            self.b as f64 / 255.0,
            self.a as f64 / 255.0,
        )
    }
}

impl Default for Color {
    fn default() -> Self {
        BLACK
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match name_of(*self) {
            Some(name) => f.write_str(name),
            None => write!(f, "#{:08X}", self.to_argb()),
        }
    }
}

// ============================================================================
// Predefined Color Constants
// ============================================================================

pub const RED: Color = Color::rgb(255, 0, 0);
pub const GREEN: Color = Color::rgb(0, 128, 0);
pub const BLUE: Color = Color::rgb(0, 0, 255);
pub const YELLOW: Color = Color::rgb(255, 255, 0);
pub const ORANGE: Color = Color::rgb(255, 165, 0);
pub const PINK: Color = Color::rgb(255, 192, 203);
pub const WHITE: Color = Color::rgb(255, 255, 255);
pub const BLACK: Color = Color::rgb(0, 0, 0);
pub const GRAY: Color = Color::rgb(128, 128, 128);

/// The "do not fill" sentinel (packed value `16777215`).
pub const TRANSPARENT: Color = Color::new(255, 255, 255, 0);

const NAMED: [(&str, Color); 10] = [
    ("red", RED),
    ("green", GREEN),
    ("blue", BLUE),
    ("yellow", YELLOW),
    ("orange", ORANGE),
    ("pink", PINK),
    ("white", WHITE),
    ("black", BLACK),
    ("gray", GRAY),
    ("transparent", TRANSPARENT),
];

/// Maps a color name (case-insensitive) to its value.
pub fn name_to_color(name: &str) -> Option<Color> {
    NAMED
        .iter()
        .find(|(candidate, _)| candidate.eq_ignore_ascii_case(name))
        .map(|(_, color)| *color)
}

fn name_of(color: Color) -> Option<&'static str> {
    NAMED
        .iter()
        .find(|(_, candidate)| *candidate == color)
        .map(|(name, _)| *name)
}

/// Parses a user-supplied color: a name, `#RRGGBB`, `#AARRGGBB`, or a packed
/// decimal ARGB value as found in scene files.
pub fn parse_color(input: &str) -> Option<Color> {
    let input = input.trim();
    if let Some(color) = name_to_color(input) {
        return Some(color);
    }
    if let Some(hex) = input.strip_prefix('#') {
        let value = u32::from_str_radix(hex, 16).ok()?;
        return match hex.len() {
            6 => Some(Color::from_argb(0xFF00_0000 | value)),
            8 => Some(Color::from_argb(value)),
            _ => None,
        };
    }
    input
        .parse::<i64>()
        .ok()
        .and_then(argb_from_decimal)
        .map(Color::from_argb)
}

/// Accepts both the signed and the unsigned reading of a packed ARGB value.
pub(crate) fn argb_from_decimal(value: i64) -> Option<u32> {
    if (i32::MIN as i64..=u32::MAX as i64).contains(&value) {
        Some(value as u32)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn argb_packing_round_trips() {
        let color = Color::new(0x12, 0x34, 0x56, 0x78);
        assert_eq!(color.to_argb(), 0x7812_3456);
        assert_eq!(Color::from_argb(0x7812_3456), color);
    }

    #[test]
    fn black_packs_to_the_signed_value_seen_in_files() {
        assert_eq!(BLACK.to_argb() as i32, -16_777_216);
        assert_eq!(TRANSPARENT.to_argb() as i32, 16_777_215);
    }

    #[test]
    fn transparency_is_alpha_based() {
        assert!(TRANSPARENT.is_transparent());
        assert!(Color::new(1, 2, 3, 0).is_transparent());
        assert!(!RED.is_transparent());
    }

    #[test]
    fn parse_color_accepts_names_hex_and_decimal() {
        assert_eq!(parse_color("Red"), Some(RED));
        assert_eq!(parse_color("#00FF00"), Some(Color::rgb(0, 255, 0)));
        assert_eq!(parse_color("#80FF0000"), Some(Color::new(255, 0, 0, 0x80)));
        assert_eq!(parse_color("-16777216"), Some(BLACK));
        assert_eq!(parse_color("4278190080"), Some(BLACK));
        assert_eq!(parse_color("chartreuse"), None);
        assert_eq!(parse_color("99999999999"), None);
    }

    #[test]
    fn display_prefers_names() {
        assert_eq!(RED.to_string(), "red");
        assert_eq!(Color::rgb(1, 2, 3).to_string(), "#FF010203");
    }
}
