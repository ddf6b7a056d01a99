//! Pixel-level helpers: module grid scaling, icon compositing and PNG output.

use std::io::Cursor;

use image::imageops::{self, FilterType};
use image::error::ImageError;
use image::{DynamicImage, GrayImage, ImageFormat, ImageReader, Limits, Luma, RgbaImage};

use crate::error::CodeError;

const LIGHT: Luma<u8> = Luma([255]);
const DARK: Luma<u8> = Luma([0]);

/// Icon side length as a divisor of the canvas side.
pub const ICON_DIVISOR: u32 = 5;

/// Largest icon width or height accepted for decoding, in pixels.
pub const MAX_ICON_DIMENSION: u32 = 4096;

/// Maps output pixels along one axis onto a row of `modules` cells.
///
/// When the modules fit, each one covers the same whole number of pixels and
/// the run is centred. When they do not, pixels sample the nearest module.
/// Either way no pixel ever mixes two modules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ModuleScale {
    modules: u32,
    extent: u32,
    pitch: u32,
    offset: u32,
}

impl ModuleScale {
    pub(crate) fn new(modules: u32, extent: u32) -> Self {
        let modules = modules.max(1);
        let pitch = extent / modules;
        let offset = if pitch == 0 { 0 } else { (extent - modules * pitch) / 2 };
        Self { modules, extent, pitch, offset }
    }

    /// Module under pixel `px`, or `None` for the margin around the grid.
    pub(crate) fn module_at(self, px: u32) -> Option<u32> {
        if px >= self.extent {
            return None;
        }
        if self.pitch == 0 {
            let module = u64::from(px) * u64::from(self.modules) / u64::from(self.extent);
            return u32::try_from(module).ok();
        }
        let module = px.checked_sub(self.offset)? / self.pitch;
        (module < self.modules).then_some(module)
    }
}

/// Rasterise a `cols × rows` module grid onto a white `width × height` canvas.
pub(crate) fn rasterize(
    width: u32,
    height: u32,
    cols: u32,
    rows: u32,
    is_dark: impl Fn(u32, u32) -> bool,
) -> GrayImage {
    let x_scale = ModuleScale::new(cols, width);
    let y_scale = ModuleScale::new(rows, height);
    let col_of: Vec<Option<u32>> = (0..width).map(|px| x_scale.module_at(px)).collect();
    let row_of: Vec<Option<u32>> = (0..height).map(|py| y_scale.module_at(py)).collect();

    GrayImage::from_fn(width, height, |x, y| {
        match (col_of[x as usize], row_of[y as usize]) {
            (Some(col), Some(row)) if is_dark(col, row) => DARK,
            _ => LIGHT,
        }
    })
}

/// Decode `icon`, scale it to a fifth of the canvas and blend it over the centre.
///
/// # Errors
///
/// Returns [`CodeError::Decode`] if the icon bytes are not a supported image
/// or are larger than [`MAX_ICON_DIMENSION`] on either side.
pub(crate) fn composite_icon(canvas: &GrayImage, icon: &[u8]) -> Result<RgbaImage, CodeError> {
    let icon = decode_icon(icon)?;

    let (width, height) = canvas.dimensions();
    let target = width.min(height) / ICON_DIVISOR;
    let resized = icon.resize_exact(target, target, FilterType::Nearest).to_rgba8();

    let mut out = DynamicImage::ImageLuma8(canvas.clone()).to_rgba8();
    let x = i64::from((width - target) / 2);
    let y = i64::from((height - target) / 2);
    imageops::overlay(&mut out, &resized, x, y);
    Ok(out)
}

/// Decode icon bytes, refusing dimensions the compositor would never need.
fn decode_icon(icon: &[u8]) -> Result<DynamicImage, CodeError> {
    let mut limits = Limits::default();
    limits.max_image_width = Some(MAX_ICON_DIMENSION);
    limits.max_image_height = Some(MAX_ICON_DIMENSION);

    let mut reader = ImageReader::new(Cursor::new(icon))
        .with_guessed_format()
        .map_err(|e| CodeError::Decode(format!("invalid icon image: {e}")))?;
    reader.limits(limits);
    reader.decode().map_err(|e| match e {
        ImageError::Limits(_) => CodeError::Decode(format!(
            "invalid icon image: dimensions exceed {MAX_ICON_DIMENSION}x{MAX_ICON_DIMENSION}"
        )),
        other => CodeError::Decode(format!("invalid icon image: {other}")),
    })
}

/// Serialize an image as PNG.
///
/// # Errors
///
/// Returns [`CodeError::Encode`] if the encoder fails.
pub(crate) fn encode_png(image: &DynamicImage) -> Result<Vec<u8>, CodeError> {
    let mut buf = Cursor::new(Vec::new());
    image
        .write_to(&mut buf, ImageFormat::Png)
        .map_err(|e| CodeError::Encode(format!("failed to encode PNG: {e}")))?;
    Ok(buf.into_inner())
}
