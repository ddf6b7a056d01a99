//! Code generator port: the one entry point every transport calls.

use std::fmt;

use crate::error::CodeError;
use crate::params::{Symbology, DEFAULT_SIZE};

/// A request to render one code image.
#[derive(Clone, PartialEq, Eq)]
pub struct CodeRequest {
    /// The text to encode.
    pub text: String,
    /// Which symbology to render.
    pub symbology: Symbology,
    /// Output size in pixels (square side for QR, width for barcodes).
    pub size: u32,
    /// Encoded raster image to composite at the centre of a QR code.
    pub icon: Option<Vec<u8>>,
}

impl CodeRequest {
    /// A QR request at the default size with no icon.
    pub fn qr(text: impl Into<String>) -> Self {
        Self { text: text.into(), symbology: Symbology::Qr, size: DEFAULT_SIZE, icon: None }
    }

    /// A barcode request at the default size.
    pub fn barcode(text: impl Into<String>) -> Self {
        Self { text: text.into(), symbology: Symbology::Barcode, size: DEFAULT_SIZE, icon: None }
    }

    /// Set the output size.
    #[must_use]
    pub fn with_size(mut self, size: u32) -> Self {
        self.size = size;
        self
    }

    /// Attach icon bytes. An empty buffer is treated as no icon.
    #[must_use]
    pub fn with_icon(mut self, icon: Vec<u8>) -> Self {
        self.icon = if icon.is_empty() { None } else { Some(icon) };
        self
    }
}

// Icons can be megabytes; log their length instead.
impl fmt::Debug for CodeRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CodeRequest")
            .field("text", &self.text)
            .field("symbology", &self.symbology)
            .field("size", &self.size)
            .field("icon_bytes", &self.icon.as_ref().map(Vec::len))
            .finish()
    }
}

/// Renders code images. Implementations must be stateless per call.
pub trait CodeGenerator: Send + Sync {
    /// Render the request into PNG bytes.
    ///
    /// # Errors
    ///
    /// Returns [`CodeError::Validation`] for rejected input,
    /// [`CodeError::Decode`] for an undecodable icon and
    /// [`CodeError::Encode`] if the PNG cannot be written.
    fn generate(&self, request: &CodeRequest) -> Result<Vec<u8>, CodeError>;

    /// Size used when a transport has no explicit size.
    fn default_size(&self) -> u32;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn qr_request_defaults() {
        let request = CodeRequest::qr("hello");
        assert_eq!(request.symbology, Symbology::Qr);
        assert_eq!(request.size, DEFAULT_SIZE);
        assert!(request.icon.is_none());
    }

    #[test]
    fn empty_icon_is_dropped() {
        let request = CodeRequest::qr("hello").with_icon(Vec::new());
        assert!(request.icon.is_none());

        let request = CodeRequest::qr("hello").with_icon(vec![1, 2, 3]);
        assert_eq!(request.icon.as_deref(), Some(&[1, 2, 3][..]));
    }

    #[test]
    fn debug_hides_icon_bytes() {
        let request = CodeRequest::barcode("123").with_size(128).with_icon(vec![0; 4096]);
        let debug = format!("{request:?}");
        assert!(debug.contains("icon_bytes: Some(4096)"));
        assert!(debug.contains("size: 128"));
    }
}
