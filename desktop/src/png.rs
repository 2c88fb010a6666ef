use image::ImageFormat;
use log::debug;
use pwnface_core::{
    bitmap::{DecodeError, PngDecoder, RgbaImage},
    fs::File,
};

/// PNG decoding through the `image` crate. Every color type and bit depth
/// is expanded to 8-bit RGBA.
#[derive(Debug, Default, Clone, Copy)]
pub struct ImageDecoder;

impl PngDecoder for ImageDecoder {
    fn decode<F: File>(&self, file: &mut F) -> Result<RgbaImage, DecodeError> {
        let data = file.read_to_end().map_err(DecodeError::from)?;
        let image = image::load_from_memory_with_format(&data, ImageFormat::Png).map_err(|err| {
            debug!("PNG decode failed: {}", err);
            match err {
                image::ImageError::Unsupported(_) => DecodeError::Unsupported,
                image::ImageError::IoError(err) => DecodeError::from(err),
                _ => DecodeError::Malformed,
            }
        })?;
        let rgba = image.into_rgba8();
        Ok(RgbaImage {
            width: rgba.width(),
            height: rgba.height(),
            pixels: rgba.into_raw(),
        })
    }
}
