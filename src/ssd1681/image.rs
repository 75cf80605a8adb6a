//! Writing packed bitmaps into the controller RAM
//!
//! Images are not shown until the next [`Epd::refresh`] or
//! [`Epd::refresh_area`].

use embedded_graphics::primitives::Rectangle;

use crate::ssd1681::{
    cmd::Cmd,
    driver::Epd,
    error::Error,
    framebuffer::{bytes_per_row, FrameBuffer},
    interface::Transport,
    window::clip_image,
};

/// Borrowed 1-bit image: rows of `ceil(width / 8)` bytes, MSB first, set bit
/// is white
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bitmap<'a> {
    data: &'a [u8],
    width: u16,
    height: u16,
}

impl<'a> Bitmap<'a> {
    /// Fails when `data` is shorter than `ceil(width / 8) * height`; extra
    /// bytes are ignored
    pub fn new(data: &'a [u8], width: u16, height: u16) -> Result<Self, Error> {
        let expected = bytes_per_row(width) * usize::from(height);
        if data.len() < expected {
            return Err(Error::SourceTooSmall {
                expected,
                actual: data.len(),
            });
        }
        Ok(Bitmap {
            data,
            width,
            height,
        })
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    fn byte(&self, row: u32, column: u32) -> u8 {
        let index = row as usize * bytes_per_row(self.width) + column as usize;
        // white past the end, unreachable for clipped reads
        self.data.get(index).copied().unwrap_or(0xFF)
    }
}

impl FrameBuffer {
    /// View the buffer as a [`Bitmap`] for [`Epd::write_image`]
    pub fn as_bitmap(&self) -> Bitmap<'_> {
        Bitmap {
            data: self.as_bytes(),
            width: self.width(),
            height: self.height(),
        }
    }
}

/// Byte transforms applied while streaming an image
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Transform {
    /// Complement every byte
    pub invert: bool,
    /// Flip the image top to bottom
    pub mirror_y: bool,
}

impl Transform {
    pub const NONE: Transform = Transform {
        invert: false,
        mirror_y: false,
    };

    pub fn inverted(mut self) -> Self {
        self.invert = !self.invert;
        self
    }

    pub fn mirrored(mut self) -> Self {
        self.mirror_y = !self.mirror_y;
        self
    }
}

impl<T: Transport> Epd<T> {
    /// Write `bitmap` with its top-left corner at `(x, y)`.
    ///
    /// `x` is rounded down to a multiple of 8 and the image is clipped to
    /// the panel. An image entirely off the panel is a no-op.
    pub fn write_image(
        &mut self,
        bitmap: &Bitmap<'_>,
        x: i32,
        y: i32,
        transform: Transform,
    ) -> Result<(), Error> {
        self.stream_image(
            bitmap,
            0,
            0,
            u32::from(bitmap.width),
            u32::from(bitmap.height),
            x,
            y,
            transform,
        )
    }

    /// Write the `part` rectangle of `bitmap` with its top-left corner at
    /// `(x, y)`.
    ///
    /// `part.top_left.x` is rounded down to a multiple of 8 and the part is
    /// cut to the bitmap. A part starting outside the bitmap is a no-op.
    pub fn write_image_part(
        &mut self,
        bitmap: &Bitmap<'_>,
        part: Rectangle,
        x: i32,
        y: i32,
        transform: Transform,
    ) -> Result<(), Error> {
        self.state.ensure_awake()?;

        let bitmap_width = u32::from(bitmap.width);
        let bitmap_height = u32::from(bitmap.height);
        let (Ok(x_part), Ok(y_part)) = (
            u32::try_from(part.top_left.x),
            u32::try_from(part.top_left.y),
        ) else {
            log::debug!("Image part starts left of or above the bitmap, nothing to write");
            return Ok(());
        };
        if x_part >= bitmap_width || y_part >= bitmap_height {
            log::debug!("Image part starts outside the bitmap, nothing to write");
            return Ok(());
        }

        let x_part = x_part - x_part % 8;
        let w = part.size.width.min(bitmap_width - x_part);
        let h = part.size.height.min(bitmap_height - y_part);

        self.stream_image(bitmap, x_part, y_part, w, h, x, y, transform)
    }

    #[allow(clippy::too_many_arguments)]
    fn stream_image(
        &mut self,
        bitmap: &Bitmap<'_>,
        x_part: u32,
        y_part: u32,
        w: u32,
        h: u32,
        x: i32,
        y: i32,
        transform: Transform,
    ) -> Result<(), Error> {
        self.state.ensure_awake()?;

        let Some(clip) = clip_image(x, y, w, h, self.width, self.height) else {
            log::debug!("Image at ({}, {}) is outside the panel, nothing to write", x, y);
            return Ok(());
        };
        let window = clip.window;

        if self.state.needs_ram_prime() {
            if window == self.full_window() {
                // overwritten completely anyway
                self.state.ram_primed();
            } else {
                self.prime_ram();
            }
        }

        self.bus.set_window(window);
        self.bus.cmd(Cmd::WRITE_BW_DATA);

        let rows = u32::from(window.height);
        let row_bytes = window.bytes_per_row() as u32;
        let last_row = u32::from(bitmap.height).saturating_sub(1);
        let first_column = x_part / 8 + clip.dx / 8;

        let bytes = (0..rows).flat_map(move |i| {
            let source_row = y_part + i + clip.dy;
            let row = if transform.mirror_y {
                last_row - source_row
            } else {
                source_row
            };
            (0..row_bytes).map(move |j| {
                let byte = bitmap.byte(row, first_column + j);
                if transform.invert {
                    !byte
                } else {
                    byte
                }
            })
        });
        self.bus.stream(bytes);
        Ok(())
    }

    /// Send the whole frame buffer to the controller RAM
    pub fn flush(&mut self) -> Result<(), Error> {
        let frame = core::mem::take(&mut self.frame);
        let result = self.write_image(&frame.as_bitmap(), 0, 0, Transform::NONE);
        self.frame = frame;
        result
    }

    /// Send the part of the frame buffer under `area`, at the same place
    pub fn flush_area(&mut self, area: Rectangle) -> Result<(), Error> {
        let frame = core::mem::take(&mut self.frame);
        let result = self.write_image_part(
            &frame.as_bitmap(),
            area,
            area.top_left.x,
            area.top_left.y,
            Transform::NONE,
        );
        self.frame = frame;
        result
    }
}
