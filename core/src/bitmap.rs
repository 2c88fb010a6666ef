use alloc::{vec, vec::Vec};

use crate::fs;

/// Luminance at or above this is background.
const LUMINANCE_THRESHOLD: u32 = 128;
/// Alpha below this is background regardless of color.
const ALPHA_THRESHOLD: u8 = 128;

/// Decoded image, 4 bytes (R, G, B, A) per pixel, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbaImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    Missing,
    Io(embedded_io::ErrorKind),
    Malformed,
    Unsupported,
}

impl DecodeError {
    pub fn from<Error: embedded_io::Error>(err: Error) -> Self {
        Self::Io(embedded_io::Error::kind(&err))
    }
}

impl embedded_io::Error for DecodeError {
    fn kind(&self) -> embedded_io::ErrorKind {
        match self {
            DecodeError::Missing => embedded_io::ErrorKind::NotFound,
            DecodeError::Io(kind) => *kind,
            DecodeError::Malformed => embedded_io::ErrorKind::InvalidData,
            DecodeError::Unsupported => embedded_io::ErrorKind::Unsupported,
        }
    }
}

impl core::fmt::Display for DecodeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            DecodeError::Missing => f.write_str("image file not found"),
            DecodeError::Io(kind) => write!(f, "i/o error: {:?}", kind),
            DecodeError::Malformed => f.write_str("malformed image"),
            DecodeError::Unsupported => f.write_str("unsupported image format"),
        }
    }
}

impl core::error::Error for DecodeError {}

type Result<T> = core::result::Result<T, DecodeError>;

/// Turns the bytes of an opened file into RGBA pixels.
pub trait PngDecoder {
    fn decode<F: fs::File>(&self, file: &mut F) -> Result<RgbaImage>;
}

/// 1-bit face image. A set bit is ink (opaque and dark).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FaceBitmap {
    width: u32,
    height: u32,
    stride: usize,
    data: Vec<u8>,
    loaded: bool,
}

impl FaceBitmap {
    pub fn from_rgba(image: &RgbaImage) -> Result<Self> {
        let RgbaImage { width, height, pixels } = image;
        let (width, height) = (*width, *height);
        if width == 0 || height == 0 {
            return Err(DecodeError::Malformed);
        }
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(4))
            .ok_or(DecodeError::Malformed)?;
        if pixels.len() != expected {
            return Err(DecodeError::Malformed);
        }

        let stride = (width as usize).div_ceil(8);
        let mut data = vec![0u8; stride * height as usize];
        let mut ink = 0usize;
        for (i, px) in pixels.chunks_exact(4).enumerate() {
            if is_ink(px[0], px[1], px[2], px[3]) {
                let x = i % width as usize;
                let y = i / width as usize;
                data[y * stride + x / 8] |= 0x80 >> (x % 8);
                ink += 1;
            }
        }
        log::debug!("Converted {}x{} face, {} ink pixels", width, height, ink);

        Ok(Self {
            width,
            height,
            stride,
            data,
            loaded: true,
        })
    }

    pub fn decode<F: fs::File>(decoder: &impl PngDecoder, file: &mut F) -> Result<Self> {
        Self::from_rgba(&decoder.decode(file)?)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Ink bit at (x, y); out-of-range coordinates read as background.
    pub fn get(&self, x: u32, y: u32) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        let byte = self.data[y as usize * self.stride + x as usize / 8];
        (byte >> (7 - x % 8)) & 1 == 1
    }

    /// Frees the pixel buffer and marks the slot unloaded.
    pub fn release(&mut self) {
        *self = Self::default();
    }
}

fn is_ink(r: u8, g: u8, b: u8, a: u8) -> bool {
    let luminance = (299 * r as u32 + 587 * g as u32 + 114 * b as u32) / 1000;
    a >= ALPHA_THRESHOLD && luminance < LUMINANCE_THRESHOLD
}


#[cfg(test)]
mod tests {
    use super::*;

    const BLACK: [u8; 4] = [0, 0, 0, 255];
    const WHITE: [u8; 4] = [255, 255, 255, 255];

    fn image(width: u32, height: u32, pixel: impl Fn(u32, u32) -> [u8; 4]) -> RgbaImage {
        let mut pixels = Vec::new();
        for y in 0..height {
            for x in 0..width {
                pixels.extend_from_slice(&pixel(x, y));
            }
        }
        RgbaImage { width, height, pixels }
    }

    #[test]
    fn opaque_dark_pixels_are_ink() {
        let img = image(3, 1, |x, _| match x {
            0 => BLACK,
            1 => [127, 127, 127, 128],
            _ => [128, 128, 128, 255],
        });
        let bmp = FaceBitmap::from_rgba(&img).unwrap();
        assert!(bmp.get(0, 0));
        assert!(bmp.get(1, 0));
        assert!(!bmp.get(2, 0));
    }

    #[test]
    fn transparent_pixels_are_background() {
        for alpha in [0u8, 1, 64, 127] {
            let img = image(2, 2, |_, _| [0, 0, 0, alpha]);
            let bmp = FaceBitmap::from_rgba(&img).unwrap();
            assert!(bmp.data().iter().all(|b| *b == 0), "alpha {}", alpha);
        }
    }

    #[test]
    fn luminance_weights_channels() {
        // Pure green is bright enough to be background, pure red and blue are not.
        let img = image(3, 1, |x, _| match x {
            0 => [255, 0, 0, 255],
            1 => [0, 255, 0, 255],
            _ => [0, 0, 255, 255],
        });
        let bmp = FaceBitmap::from_rgba(&img).unwrap();
        assert!(bmp.get(0, 0));
        assert!(!bmp.get(1, 0));
        assert!(bmp.get(2, 0));
    }

    #[test]
    fn stride_rounds_up_for_all_widths() {
        for width in 1..=512u32 {
            let img = image(width, 2, |x, y| if (x + y) % 2 == 0 { BLACK } else { WHITE });
            let bmp = FaceBitmap::from_rgba(&img).unwrap();
            assert_eq!(bmp.stride(), (width as usize + 7) / 8);
            assert_eq!(bmp.data().len(), bmp.stride() * 2);
            for x in 0..width {
                assert_eq!(bmp.get(x, 0), x % 2 == 0);
                assert_eq!(bmp.get(x, 1), x % 2 == 1);
            }
        }
    }

    #[test]
    fn bits_are_msb_first_per_row() {
        let img = image(10, 2, |x, y| if x == 0 || (x == 9 && y == 1) { BLACK } else { WHITE });
        let bmp = FaceBitmap::from_rgba(&img).unwrap();
        assert_eq!(bmp.data(), &[0x80, 0x00, 0x80, 0x40]);
    }

    #[test]
    fn rejects_inconsistent_buffers() {
        let short = RgbaImage { width: 4, height: 4, pixels: vec![0; 10] };
        assert_eq!(FaceBitmap::from_rgba(&short), Err(DecodeError::Malformed));
        let empty = RgbaImage { width: 0, height: 4, pixels: Vec::new() };
        assert_eq!(FaceBitmap::from_rgba(&empty), Err(DecodeError::Malformed));
    }

    #[test]
    fn release_clears_the_slot() {
        let mut bmp = FaceBitmap::from_rgba(&image(8, 8, |_, _| BLACK)).unwrap();
        assert!(bmp.is_loaded());
        bmp.release();
        assert!(!bmp.is_loaded());
        assert!(bmp.data().is_empty());
        assert!(!bmp.get(0, 0));
    }

    #[test]
    fn decodes_through_a_decoder() {
        use crate::fs::{Filesystem, memory::MemoryFilesystem};

        let fs = MemoryFilesystem::new();
        fs.add_file("HAPPY.png", &raw::solid(4, 3, BLACK));
        fs.add_file("broken.png", b"not an image");
        let mut file = fs.open_file("HAPPY.png").unwrap();
        let bmp = FaceBitmap::decode(&raw::RawDecoder, &mut file).unwrap();
        assert_eq!((bmp.width(), bmp.height(), bmp.stride()), (4, 3, 1));
        assert_eq!(bmp.data(), &[0xF0, 0xF0, 0xF0]);

        let mut file = fs.open_file("broken.png").unwrap();
        assert_eq!(
            FaceBitmap::decode(&raw::RawDecoder, &mut file),
            Err(DecodeError::Malformed)
        );
    }
}
