//! Calendar color resolution.
//!
//! Calendar sources report colors as fractional RGB intensities. Reports need
//! them as `RRGGBB` strings for cell fills and chart series. Resolution is
//! total: anything that cannot be converted becomes [`FALLBACK_COLOR`], so a
//! broken color never aborts report generation.

use std::collections::BTreeMap;

/// Light gray used when a calendar has no usable color.
pub const FALLBACK_COLOR: &str = "D3D3D3";

/// Color as reported by a calendar source.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum SourceColor {
    /// Red, green and blue intensities, each expected in `[0, 1]`.
    Rgb { red: f64, green: f64, blue: f64 },
    #[default]
    Unavailable,
}

impl SourceColor {
    pub fn rgb(red: f64, green: f64, blue: f64) -> Self {
        SourceColor::Rgb { red, green, blue }
    }
}

/// Converts a source color into an uppercase `RRGGBB` string.
///
/// Each channel is `round(fraction * 255)`. Unavailable colors and components
/// that are not finite or lie outside `[0, 1]` yield [`FALLBACK_COLOR`].
pub fn resolve_hex(color: &SourceColor) -> String {
    match *color {
        SourceColor::Rgb { red, green, blue } => match (channel(red), channel(green), channel(blue)) {
            (Some(r), Some(g), Some(b)) => format!("{:02X}{:02X}{:02X}", r, g, b),
            _ => {
                tracing::warn!(red, green, blue, "malformed calendar color, using fallback");
                FALLBACK_COLOR.to_string()
            }
        },
        SourceColor::Unavailable => FALLBACK_COLOR.to_string(),
    }
}

fn channel(fraction: f64) -> Option<u8> {
    if fraction.is_finite() && (0.0..=1.0).contains(&fraction) {
        Some((fraction * 255.0).round() as u8)
    } else {
        None
    }
}

/// Parses an `RRGGBB` string into a `0xRRGGBB` value for the document writer.
/// Malformed input maps to the fallback color.
pub fn hex_to_rgb(hex: &str) -> u32 {
    let parsed = if hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit()) {
        u32::from_str_radix(hex, 16).ok()
    } else {
        None
    };
    parsed.unwrap_or(0xD3D3D3)
}

/// Calendar name to `RRGGBB`, one entry per calendar known to the source.
///
/// Calendars sharing a name share one entry; the first one listed sets the color.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CalendarColorMap {
    colors: BTreeMap<String, String>,
}

impl CalendarColorMap {
    pub fn build<'a, I>(calendars: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a SourceColor)>,
    {
        let mut colors = BTreeMap::new();
        for (name, color) in calendars {
            colors.entry(name.to_string()).or_insert_with(|| resolve_hex(color));
        }
        Self { colors }
    }

    /// Color of `calendar_name`, or the fallback for calendars the source never listed.
    pub fn get(&self, calendar_name: &str) -> &str {
        self.colors.get(calendar_name).map(String::as_str).unwrap_or(FALLBACK_COLOR)
    }
}
