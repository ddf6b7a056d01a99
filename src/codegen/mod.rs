//! The image code generator: text in, PNG bytes out.
//!
//! Everything here is synchronous and free of shared state, so a single
//! [`ImageCodeGenerator`] can serve any number of threads at once.

pub mod barcode;
pub mod qr;
pub mod raster;

use image::DynamicImage;

use crate::error::CodeError;
use crate::params::{validate_size, Symbology, DEFAULT_SIZE};
use crate::ports::{CodeGenerator, CodeRequest};

/// Renders QR codes and Code 128 barcodes as PNG images.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageCodeGenerator {
    size: u32,
}

impl Default for ImageCodeGenerator {
    fn default() -> Self {
        Self { size: DEFAULT_SIZE }
    }
}

impl ImageCodeGenerator {
    /// Create a generator whose default canvas is `size` pixels.
    ///
    /// # Errors
    ///
    /// Returns [`CodeError::Validation`] if `size` is outside 64..=2048.
    pub fn new(size: u32) -> Result<Self, CodeError> {
        validate_size(size).map_err(CodeError::Validation)?;
        Ok(Self { size })
    }

    /// The configured canvas size in pixels.
    #[must_use]
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Render `text` as a QR code at the configured size, with an optional
    /// centre icon. An empty icon slice is the same as no icon.
    ///
    /// # Errors
    ///
    /// See [`ImageCodeGenerator::render`].
    pub fn generate(&self, text: &str, icon: Option<&[u8]>) -> Result<Vec<u8>, CodeError> {
        qr_png(text, icon, self.size)
    }

    /// Render `text` as a Code 128 barcode at the configured width.
    ///
    /// # Errors
    ///
    /// See [`ImageCodeGenerator::render`].
    pub fn generate_barcode(&self, text: &str) -> Result<Vec<u8>, CodeError> {
        barcode_png(text, self.size)
    }

    /// Render a request, using the size it carries rather than the configured one.
    ///
    /// Icons are only composited onto QR codes; barcode requests ignore them.
    ///
    /// # Errors
    ///
    /// - [`CodeError::Validation`] for empty text, an out-of-range size, text
    ///   the symbology cannot represent or text too long to encode.
    /// - [`CodeError::Decode`] if the icon is not a decodable image.
    /// - [`CodeError::Encode`] if writing the PNG fails.
    pub fn render(&self, request: &CodeRequest) -> Result<Vec<u8>, CodeError> {
        tracing::debug!(
            symbology = %request.symbology,
            size = request.size,
            text_len = request.text.len(),
            icon_bytes = request.icon.as_ref().map_or(0, Vec::len),
            "rendering code"
        );
        match request.symbology {
            Symbology::Qr => qr_png(&request.text, request.icon.as_deref(), request.size),
            Symbology::Barcode => {
                if request.icon.is_some() {
                    tracing::debug!("icon ignored for barcode request");
                }
                barcode_png(&request.text, request.size)
            }
        }
    }
}

impl CodeGenerator for ImageCodeGenerator {
    fn generate(&self, request: &CodeRequest) -> Result<Vec<u8>, CodeError> {
        self.render(request)
    }

    fn default_size(&self) -> u32 {
        self.size
    }
}

fn check_inputs(text: &str, size: u32) -> Result<(), CodeError> {
    if text.is_empty() {
        return Err(CodeError::Validation("text is required".to_string()));
    }
    validate_size(size).map_err(CodeError::Validation)
}

fn qr_png(text: &str, icon: Option<&[u8]>, size: u32) -> Result<Vec<u8>, CodeError> {
    check_inputs(text, size)?;
    let canvas = qr::render(text, size)?;
    let image = match icon.filter(|bytes| !bytes.is_empty()) {
        Some(icon) => DynamicImage::ImageRgba8(raster::composite_icon(&canvas, icon)?),
        None => DynamicImage::ImageLuma8(canvas),
    };
    raster::encode_png(&image)
}

fn barcode_png(text: &str, size: u32) -> Result<Vec<u8>, CodeError> {
    check_inputs(text, size)?;
    let canvas = barcode::render(text, size)?;
    raster::encode_png(&DynamicImage::ImageLuma8(canvas))
}
