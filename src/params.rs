//! Parameter parsing and validation shared by the CLI and HTTP adapters.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

/// Smallest accepted canvas size in pixels.
pub const MIN_SIZE: u32 = 64;

/// Largest accepted canvas size in pixels.
pub const MAX_SIZE: u32 = 2048;

/// Canvas size used when the caller does not pick one.
pub const DEFAULT_SIZE: u32 = 256;

/// Which symbology to render.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Symbology {
    /// 2D QR code, optionally with a centre icon.
    #[default]
    Qr,
    /// 1D Code 128 barcode.
    Barcode,
}

impl Symbology {
    /// Name used on the wire and in file names.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Qr => "qr",
            Self::Barcode => "barcode",
        }
    }

    /// Whether a centre icon may be composited onto this symbology.
    #[must_use]
    pub fn supports_icon(self) -> bool {
        self == Self::Qr
    }

    /// `Content-Disposition` value for an inline PNG response.
    #[must_use]
    pub fn content_disposition(self) -> &'static str {
        match self {
            Self::Qr => "inline; filename=qr.png",
            Self::Barcode => "inline; filename=barcode.png",
        }
    }
}

impl fmt::Display for Symbology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Symbology {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "qr" => Ok(Self::Qr),
            "barcode" => Ok(Self::Barcode),
            _ => Err("invalid type, must be 'qr' or 'barcode'".to_string()),
        }
    }
}

/// Parse the optional `type` parameter. Missing or blank means QR.
///
/// # Errors
///
/// Returns an error if the value is neither `qr` nor `barcode`.
pub fn parse_symbology(raw: Option<&str>) -> Result<Symbology, String> {
    match raw.map(str::trim) {
        None | Some("") => Ok(Symbology::Qr),
        Some(value) => value.parse(),
    }
}

/// Validate that a canvas size lies within [`MIN_SIZE`, `MAX_SIZE`].
///
/// # Errors
///
/// Returns an error if the size is out of range.
pub fn validate_size(size: u32) -> Result<(), String> {
    if (MIN_SIZE..=MAX_SIZE).contains(&size) {
        Ok(())
    } else {
        Err(format!("size out of range ({MIN_SIZE}-{MAX_SIZE})"))
    }
}

/// Parse the optional `size` parameter, falling back to `default` when absent.
///
/// # Errors
///
/// Returns an error if the value is not an integer or is out of range.
pub fn parse_size(raw: Option<&str>, default: u32) -> Result<u32, String> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(default);
    };
    // Negative and oversized integers are range errors, not parse errors.
    let parsed: i64 = raw.parse().map_err(|_| "size must be an integer".to_string())?;
    let size = u32::try_from(parsed).unwrap_or(u32::MAX);
    validate_size(size)?;
    Ok(size)
}

/// Validate the text to encode.
///
/// # Errors
///
/// Returns an error if the text is empty.
pub fn validate_text(text: &str) -> Result<(), String> {
    if text.is_empty() {
        Err("text is required".to_string())
    } else {
        Ok(())
    }
}
