use image::codecs::webp::WebPEncoder;
use image::{ExtendedColorType, Rgba, RgbaImage};

use super::selection::SelectedFile;

fn encode_lossless(image: &RgbaImage) -> Vec<u8> {
    let mut bytes = Vec::new();
    WebPEncoder::new_lossless(&mut bytes)
        .encode(image.as_raw(), image.width(), image.height(), ExtendedColorType::Rgba8)
        .unwrap();
    bytes
}

pub fn webp_fixture(width: u32, height: u32) -> Vec<u8> {
    let image = RgbaImage::from_fn(width, height, |x, y| {
        Rgba([(x * 7) as u8, (y * 5) as u8, 128, 255])
    });
    encode_lossless(&image)
}

/// 2x1 image: fully transparent pixel, then an opaque one.
pub fn transparent_webp() -> Vec<u8> {
    let image = RgbaImage::from_vec(2, 1, vec![0, 0, 0, 0, 10, 20, 30, 255]).unwrap();
    encode_lossless(&image)
}

pub fn webp_file(name: &str, width: u32, height: u32) -> SelectedFile {
    SelectedFile::from_bytes(name, Some("image/webp".to_string()), webp_fixture(width, height))
}

pub fn corrupt_file(name: &str) -> SelectedFile {
    SelectedFile::from_bytes(name, Some("image/webp".to_string()), b"not really a webp".to_vec())
}
