use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ExtendedColorType, ImageEncoder, Rgb, RgbImage};

use super::error::ConvertError;
use super::selection::SelectedFile;

/// Fixed JPEG quality (0.9 on the usual 0..1 scale).
pub const JPEG_QUALITY: u8 = 90;
const JPEG_DATA_PREFIX: &str = "data:image/jpeg;base64,";

#[derive(Debug, Clone)]
pub struct ConversionResult {
    pub name: String,
    /// Inline `data:` reference to the encoded JPEG.
    pub url: String,
    pub original: SelectedFile,
    pub width: u32,
    pub height: u32,
}

impl ConversionResult {
    pub fn jpeg_bytes(&self) -> Result<Vec<u8>, ConvertError> {
        decode_data_url(&self.name, &self.url)
    }
}

/// Output name for the file at 1-based `position` in a run.
pub fn output_name(position: usize) -> String {
    format!("img-{position}.jpg")
}

/// Read, decode, draw, encode. Each step finishes before the next starts and
/// the first failing step decides the error.
pub fn convert_file(file: &SelectedFile, position: usize) -> Result<ConversionResult, ConvertError> {
    let bytes = file.read_bytes().map_err(|source| ConvertError::Read {
        name: file.name().to_string(),
        source,
    })?;

    let decoded = image::load_from_memory(&bytes).map_err(|source| ConvertError::Decode {
        name: file.name().to_string(),
        source,
    })?;
    drop(bytes);

    let surface = draw_surface(&decoded);
    let jpeg = encode_jpeg(&surface).map_err(|source| ConvertError::Encode {
        name: file.name().to_string(),
        source,
    })?;

    Ok(ConversionResult {
        name: output_name(position),
        url: encode_data_url(&jpeg),
        original: file.clone(),
        width: surface.width(),
        height: surface.height(),
    })
}

/// Paints the decoded image onto an opaque surface of the same size.
/// Transparent regions end up white since JPEG has no alpha channel.
pub(crate) fn draw_surface(image: &DynamicImage) -> RgbImage {
    let rgba = image.to_rgba8();
    let mut surface = RgbImage::from_pixel(rgba.width(), rgba.height(), Rgb([255, 255, 255]));

    for (dst, src) in surface.pixels_mut().zip(rgba.pixels()) {
        let [r, g, b, a] = src.0;
        let alpha = u16::from(a);
        let over_white = |c: u8| ((u16::from(c) * alpha + 255 * (255 - alpha) + 127) / 255) as u8;
        *dst = Rgb([over_white(r), over_white(g), over_white(b)]);
    }

    surface
}

fn encode_jpeg(surface: &RgbImage) -> image::ImageResult<Vec<u8>> {
    let mut jpeg = Vec::new();
    JpegEncoder::new_with_quality(&mut jpeg, JPEG_QUALITY).write_image(
        surface.as_raw(),
        surface.width(),
        surface.height(),
        ExtendedColorType::Rgb8,
    )?;
    Ok(jpeg)
}

pub fn encode_data_url(jpeg: &[u8]) -> String {
    format!("{JPEG_DATA_PREFIX}{}", BASE64.encode(jpeg))
}

/// Strips the `data:<type>;base64,` header and returns the raw payload.
pub fn decode_data_url(name: &str, url: &str) -> Result<Vec<u8>, ConvertError> {
    let malformed = |reason: String| ConvertError::Payload {
        name: name.to_string(),
        reason,
    };

    let (header, payload) = url
        .split_once(',')
        .ok_or_else(|| malformed("missing ',' separator".to_string()))?;
    if !header.starts_with("data:") || !header.ends_with(";base64") {
        return Err(malformed(format!("unsupported header '{header}'")));
    }

    BASE64.decode(payload).map_err(|e| malformed(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversion::test_support::{transparent_webp, webp_fixture};
    use image::GenericImageView;
    use pretty_assertions::assert_eq;

    #[test]
    fn output_names_follow_position() {
        assert_eq!(output_name(1), "img-1.jpg");
        assert_eq!(output_name(2), "img-2.jpg");
        assert_eq!(output_name(10), "img-10.jpg");
    }

    #[test]
    fn converted_jpeg_keeps_source_dimensions() {
        let file = SelectedFile::from_bytes("wide.webp", None, webp_fixture(37, 21));

        let result = convert_file(&file, 3).unwrap();

        assert_eq!(result.name, "img-3.jpg");
        assert_eq!(result.original.name(), "wide.webp");
        assert!(result.url.starts_with(JPEG_DATA_PREFIX));
        assert_eq!((result.width, result.height), (37, 21));

        let jpeg = result.jpeg_bytes().unwrap();
        assert_eq!(image::guess_format(&jpeg).unwrap(), image::ImageFormat::Jpeg);
        let decoded = image::load_from_memory(&jpeg).unwrap();
        assert_eq!(decoded.dimensions(), (37, 21));
    }

    #[test]
    fn corrupt_data_is_a_decode_error_naming_the_file() {
        let file = SelectedFile::from_bytes("broken.webp", None, b"RIFF\0\0\0\0WEBPjunk".to_vec());

        let err = convert_file(&file, 1).unwrap_err();

        assert!(matches!(err, ConvertError::Decode { .. }));
        assert!(err.to_string().contains("broken.webp"));
    }

    #[test]
    fn unreadable_file_is_a_read_error_naming_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = SelectedFile::from_path(dir.path().join("missing.webp"));

        let err = convert_file(&file, 1).unwrap_err();

        assert!(matches!(err, ConvertError::Read { .. }));
        assert!(err.to_string().contains("missing.webp"));
    }

    #[test]
    fn transparent_pixels_are_drawn_over_white() {
        let decoded = image::load_from_memory(&transparent_webp()).unwrap();

        let surface = draw_surface(&decoded);

        assert_eq!(surface.dimensions(), (2, 1));
        assert_eq!(surface.get_pixel(0, 0), &Rgb([255, 255, 255]));
        assert_eq!(surface.get_pixel(1, 0), &Rgb([10, 20, 30]));
    }

    #[test]
    fn data_url_payload_round_trips() {
        let url = encode_data_url(&[0xFF, 0xD8, 0x00, 0x7F]);

        assert_eq!(decode_data_url("img-1.jpg", &url).unwrap(), vec![0xFF, 0xD8, 0x00, 0x7F]);
    }

    #[test]
    fn malformed_data_url_is_rejected() {
        for url in ["no-separator", "blob:abc,AAAA", "data:image/jpeg;base64,@@@"] {
            let err = decode_data_url("img-1.jpg", url).unwrap_err();
            assert!(matches!(err, ConvertError::Payload { .. }), "{url}");
        }
    }
}
