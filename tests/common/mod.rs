//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::io::Cursor;

use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};

/// Encode a solid-colour RGBA image as PNG.
pub fn solid_png(width: u32, height: u32, color: [u8; 4]) -> Vec<u8> {
    let img = RgbaImage::from_pixel(width, height, Rgba(color));
    let mut buf = Cursor::new(Vec::new());
    DynamicImage::ImageRgba8(img).write_to(&mut buf, ImageFormat::Png).unwrap();
    buf.into_inner()
}

/// A 10×10 opaque red PNG.
pub fn red_png() -> Vec<u8> {
    solid_png(10, 10, [255, 0, 0, 255])
}

/// Decode PNG bytes, asserting the signature first.
pub fn decode_png(bytes: &[u8]) -> DynamicImage {
    assert_eq!(&bytes[..8], &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A], "not a PNG");
    image::load_from_memory_with_format(bytes, ImageFormat::Png).unwrap()
}
