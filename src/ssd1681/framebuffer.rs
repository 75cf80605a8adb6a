//! Packed 1-bit frame buffer owned by the driver
//!
//! Rows are `ceil(width / 8)` bytes, most significant bit first. A set bit is
//! a white pixel, matching what the controller expects in its B/W RAM, so the
//! buffer can be streamed without conversion.
//!
//! The buffer implements [`DrawTarget`] for [`BinaryColor`]: `On` draws black
//! (bit cleared), `Off` draws white (bit set).

use core::convert::Infallible;

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;

use crate::ssd1681::error::Error;

/// Number of bytes one row of `width` pixels occupies
pub const fn bytes_per_row(width: u16) -> usize {
    (width as usize).div_ceil(8)
}

/// Monochrome frame buffer, allocated once at construction
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FrameBuffer {
    width: u16,
    height: u16,
    data: Box<[u8]>,
}

impl FrameBuffer {
    /// All-white buffer of the given size
    pub fn new(width: u16, height: u16) -> Self {
        let len = bytes_per_row(width) * usize::from(height);
        FrameBuffer {
            width,
            height,
            data: vec![0xFF; len].into_boxed_slice(),
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn bytes_per_row(&self) -> usize {
        bytes_per_row(self.width)
    }

    /// Raw packed rows
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Set every byte to `value`
    pub fn fill(&mut self, value: u8) {
        self.data.fill(value);
    }

    fn bit_index(&self, x: u16, y: u16) -> Option<(usize, u8)> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let index = usize::from(y) * self.bytes_per_row() + usize::from(x / 8);
        Some((index, 0x80 >> (x % 8)))
    }

    /// Bit value at `(x, y)`, `true` for white
    pub fn get_pixel(&self, x: u16, y: u16) -> Option<bool> {
        self.bit_index(x, y)
            .map(|(index, mask)| self.data[index] & mask != 0)
    }

    /// Set the bit at `(x, y)`; out-of-range coordinates are ignored
    pub fn set_pixel(&mut self, x: u16, y: u16, white: bool) {
        if let Some((index, mask)) = self.bit_index(x, y) {
            if white {
                self.data[index] |= mask;
            } else {
                self.data[index] &= !mask;
            }
        }
    }

    fn check_region(&self, x: u16, y: u16, w: u16, h: u16) -> Result<(), Error> {
        let fits = |start: u16, len: u16, limit: u16| {
            len > 0 && u32::from(start) + u32::from(len) <= u32::from(limit)
        };
        if fits(x, w, self.width) && fits(y, h, self.height) {
            Ok(())
        } else {
            Err(Error::OutOfBounds)
        }
    }

    /// Copy a rectangle out as its own packed bitmap of `ceil(w / 8) * h` bytes.
    ///
    /// `x` need not be byte aligned; padding bits at the end of each row are
    /// left set (white).
    pub fn read_region(&self, x: u16, y: u16, w: u16, h: u16) -> Result<Vec<u8>, Error> {
        self.check_region(x, y, w, h)?;
        let row_bytes = bytes_per_row(w);
        let mut out = vec![0xFF; row_bytes * usize::from(h)];
        for row in 0..h {
            for col in 0..w {
                if self.get_pixel(x + col, y + row) == Some(false) {
                    let index = usize::from(row) * row_bytes + usize::from(col / 8);
                    out[index] &= !(0x80 >> (col % 8));
                }
            }
        }
        Ok(out)
    }

    /// Paste a packed bitmap of `ceil(w / 8) * h` bytes at `(x, y)`
    pub fn write_region(
        &mut self,
        x: u16,
        y: u16,
        w: u16,
        h: u16,
        src: &[u8],
    ) -> Result<(), Error> {
        self.check_region(x, y, w, h)?;
        let row_bytes = bytes_per_row(w);
        let expected = row_bytes * usize::from(h);
        if src.len() < expected {
            return Err(Error::SourceTooSmall {
                expected,
                actual: src.len(),
            });
        }
        for row in 0..h {
            for col in 0..w {
                let index = usize::from(row) * row_bytes + usize::from(col / 8);
                let white = src[index] & (0x80 >> (col % 8)) != 0;
                self.set_pixel(x + col, y + row, white);
            }
        }
        Ok(())
    }
}

impl OriginDimensions for FrameBuffer {
    fn size(&self) -> Size {
        Size::new(u32::from(self.width), u32::from(self.height))
    }
}

impl DrawTarget for FrameBuffer {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if let (Ok(x), Ok(y)) = (u16::try_from(point.x), u16::try_from(point.y)) {
                self.set_pixel(x, y, color.is_off());
            }
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.fill(if color.is_on() { 0x00 } else { 0xFF });
        Ok(())
    }
}
