use embedded_graphics::{
    Pixel,
    pixelcolor::BinaryColor,
    prelude::{DrawTarget, OriginDimensions, Size},
};

/// Bytes needed for a `width` x `height` panel, one bit per pixel.
pub const fn buffer_size(width: u32, height: u32) -> usize {
    (width as usize * height as usize).div_ceil(8)
}

/// A caller-owned 1-bit framebuffer.
///
/// Pixels are packed row-major, MSB first, without row padding: pixel
/// (x, y) lives at bit `7 - i % 8` of byte `i / 8` where `i = y * width + x`.
/// Like the e-paper controllers it feeds, a clear bit is black unless the
/// panel reports inverted polarity. Writes outside the panel, or past the
/// end of an undersized buffer, are dropped.
pub struct Framebuffer<'a> {
    buffer: &'a mut [u8],
    width: u32,
    height: u32,
}

impl<'a> Framebuffer<'a> {
    pub fn new(buffer: &'a mut [u8], width: u32, height: u32) -> Self {
        if buffer.len() < buffer_size(width, height) {
            log::warn!(
                "Framebuffer of {} bytes is too small for {}x{}",
                buffer.len(),
                width,
                height
            );
        }
        Self { buffer, width, height }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn buffer(&self) -> &[u8] {
        &self.buffer[..]
    }

    pub fn clear_screen(&mut self, fill: u8) {
        self.buffer.fill(fill);
    }

    fn locate(&self, x: i32, y: i32) -> Option<(usize, u8)> {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return None;
        }
        let index = y as usize * self.width as usize + x as usize;
        let byte_index = index / 8;
        if byte_index >= self.buffer.len() {
            return None;
        }
        Some((byte_index, 0x80 >> (index % 8)))
    }

    pub fn set_pixel(&mut self, x: i32, y: i32, on: bool) {
        let Some((byte_index, mask)) = self.locate(x, y) else {
            return;
        };
        if on {
            self.buffer[byte_index] |= mask;
        } else {
            self.buffer[byte_index] &= !mask;
        }
    }

    pub fn get_pixel(&self, x: i32, y: i32) -> Option<bool> {
        self.locate(x, y)
            .map(|(byte_index, mask)| self.buffer[byte_index] & mask != 0)
    }
}

impl OriginDimensions for Framebuffer<'_> {
    fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

impl DrawTarget for Framebuffer<'_> {
    type Color = BinaryColor;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(coord, color) in pixels {
            self.set_pixel(coord.x, coord.y, color.is_on());
        }
        Ok(())
    }
}
