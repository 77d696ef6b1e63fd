use rand::Rng;
use ratatui::style::Color;
use serde::{Deserialize, Serialize};

/// Opaque RGB color used for particles, emitters and the surface backdrop.
///
/// Serializes as a CSS hex string (`"#rrggbb"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// Named CSS colors accepted by [`Rgb::parse_css`]
const NAMED_COLORS: &[(&str, Rgb)] = &[
    ("white", Rgb::WHITE),
    ("black", Rgb::BLACK),
    ("red", Rgb::new(255, 0, 0)),
    ("green", Rgb::new(0, 128, 0)),
    ("blue", Rgb::new(0, 0, 255)),
    ("gray", Rgb::new(128, 128, 128)),
    ("grey", Rgb::new(128, 128, 128)),
    ("navy", Rgb::new(0, 0, 128)),
    ("silver", Rgb::new(192, 192, 192)),
];

/// Backdrop colors offered by the parameter panel, in cycling order
pub const BACKGROUND_PALETTE: &[(&str, Rgb)] = &[
    ("White", Rgb::WHITE),
    ("Black", Rgb::BLACK),
    ("Slate", Rgb::new(0x1e, 0x29, 0x3b)),
    ("Navy", Rgb::new(0x00, 0x1f, 0x3f)),
    ("Cream", Rgb::new(0xfd, 0xf6, 0xe3)),
    ("Gray", Rgb::new(0x80, 0x80, 0x80)),
];

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Each channel independently uniform over the full byte range
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::new(rng.gen(), rng.gen(), rng.gen())
    }

    pub fn to_color(self) -> Color {
        Color::Rgb(self.r, self.g, self.b)
    }

    /// Relative luminance in 0.0..=1.0 (Rec. 709 weights, no gamma)
    pub fn luminance(self) -> f32 {
        (0.2126 * self.r as f32 + 0.7152 * self.g as f32 + 0.0722 * self.b as f32) / 255.0
    }

    /// Black on light colors, white on dark ones
    pub fn contrasting(self) -> Rgb {
        if self.luminance() > 0.5 {
            Rgb::BLACK
        } else {
            Rgb::WHITE
        }
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Parse a CSS color: `#rgb`, `#rrggbb` or one of a few named colors
    pub fn parse_css(input: &str) -> Result<Rgb, String> {
        let s = input.trim().to_lowercase();

        if let Some(hex) = s.strip_prefix('#') {
            if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
                return Err(format!("Invalid hex digits in color '{}'", input));
            }
            let channel = |digits: &str| {
                u8::from_str_radix(digits, 16)
                    .map_err(|_| format!("Invalid hex digits in color '{}'", input))
            };
            return match hex.len() {
                3 => {
                    // #abc expands to #aabbcc
                    let r = channel(&hex[0..1].repeat(2))?;
                    let g = channel(&hex[1..2].repeat(2))?;
                    let b = channel(&hex[2..3].repeat(2))?;
                    Ok(Rgb::new(r, g, b))
                }
                6 => Ok(Rgb::new(
                    channel(&hex[0..2])?,
                    channel(&hex[2..4])?,
                    channel(&hex[4..6])?,
                )),
                _ => Err(format!("Color '{}' must be #rgb or #rrggbb", input)),
            };
        }

        NAMED_COLORS
            .iter()
            .find(|(name, _)| *name == s)
            .map(|(_, rgb)| *rgb)
            .ok_or_else(|| format!("Unknown color '{}'", input))
    }

    /// Palette name for this color, or its hex string if it is not in the palette
    pub fn display_name(self) -> String {
        BACKGROUND_PALETTE
            .iter()
            .find(|(_, rgb)| *rgb == self)
            .map(|(name, _)| name.to_string())
            .unwrap_or_else(|| self.to_hex())
    }

    /// Next backdrop in the palette (first entry if this color is not in it)
    pub fn next_background(self) -> Rgb {
        match BACKGROUND_PALETTE.iter().position(|(_, rgb)| *rgb == self) {
            Some(i) => BACKGROUND_PALETTE[(i + 1) % BACKGROUND_PALETTE.len()].1,
            None => BACKGROUND_PALETTE[0].1,
        }
    }

    /// Previous backdrop in the palette (last entry if this color is not in it)
    pub fn prev_background(self) -> Rgb {
        let len = BACKGROUND_PALETTE.len();
        match BACKGROUND_PALETTE.iter().position(|(_, rgb)| *rgb == self) {
            Some(i) => BACKGROUND_PALETTE[(i + len - 1) % len].1,
            None => BACKGROUND_PALETTE[len - 1].1,
        }
    }
}

impl Default for Rgb {
    fn default() -> Self {
        Rgb::WHITE
    }
}

impl TryFrom<String> for Rgb {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Rgb::parse_css(&value)
    }
}

impl From<Rgb> for String {
    fn from(rgb: Rgb) -> Self {
        rgb.to_hex()
    }
}
