//! RAM window addressing and rectangle clipping
//!
//! The controller addresses X in whole bytes, so every window covers whole
//! byte columns. Writing to a rectangle that does not start or end on a byte
//! boundary touches up to 7 neighbouring columns; callers have to live with
//! that.

use crate::ssd1681::{cmd::Cmd, driver::Bus, flag::Flag, framebuffer, interface::Transport};

/// A window inside the panel, already clipped to it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl Window {
    /// The whole panel
    pub fn full(width: u16, height: u16) -> Self {
        Window {
            x: 0,
            y: 0,
            width,
            height,
        }
    }

    /// Data bytes streamed per row of this window
    pub fn bytes_per_row(&self) -> usize {
        framebuffer::bytes_per_row(self.width)
    }

    /// Number of RAM bytes covered
    pub fn byte_len(&self) -> usize {
        self.bytes_per_row() * usize::from(self.height)
    }

    /// RAM X address of the first byte column
    pub fn x_start_byte(&self) -> u8 {
        (self.x / 8) as u8
    }

    /// RAM X address of the last byte column; the first one for an empty
    /// window
    pub fn x_end_byte(&self) -> u8 {
        let last = u32::from(self.x) + u32::from(self.width.max(1)) - 1;
        (last / 8) as u8
    }

    /// Last row; the first row for an empty window
    pub fn y_end(&self) -> u16 {
        self.y.saturating_add(self.height.max(1) - 1)
    }
}

/// Where a clipped image lands and which part of the source feeds it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ImageClip {
    pub window: Window,
    /// Source pixel column of the window's first column (multiple of 8)
    pub dx: u32,
    /// Source row of the window's first row
    pub dy: u32,
}

/// Byte-align and clip an image of `w` x `h` pixels placed at `(x, y)`.
///
/// `x` is rounded down to a multiple of 8 and `w` up to whole bytes before
/// clipping. `None` when nothing of the image is on the panel.
pub(crate) fn clip_image(
    x: i32,
    y: i32,
    w: u32,
    h: u32,
    panel_width: u16,
    panel_height: u16,
) -> Option<ImageClip> {
    let w = i64::from(w.div_ceil(8)) * 8;
    let x = i64::from(x) - i64::from(x).rem_euclid(8);
    let y = i64::from(y);
    let h = i64::from(h);

    let x1 = x.max(0);
    let y1 = y.max(0);
    let w1 = (x + w).min(i64::from(panel_width)) - x1;
    let h1 = (y + h).min(i64::from(panel_height)) - y1;
    if w1 <= 0 || h1 <= 0 {
        return None;
    }

    Some(ImageClip {
        window: Window {
            x: u16::try_from(x1).ok()?,
            y: u16::try_from(y1).ok()?,
            width: u16::try_from(w1).ok()?,
            height: u16::try_from(h1).ok()?,
        },
        dx: u32::try_from(x1 - x).ok()?,
        dy: u32::try_from(y1 - y).ok()?,
    })
}

/// Clip a refresh rectangle to the panel, then widen it outwards to whole
/// byte columns so the refreshed window covers the requested area.
pub(crate) fn clip_refresh(
    x: i32,
    y: i32,
    w: u32,
    h: u32,
    panel_width: u16,
    panel_height: u16,
) -> Option<Window> {
    let (x, y, w, h) = (i64::from(x), i64::from(y), i64::from(w), i64::from(h));
    let panel_width = i64::from(panel_width);

    let x1 = x.max(0);
    let y1 = y.max(0);
    let w1 = (x + w).min(panel_width) - x1;
    let h1 = (y + h).min(i64::from(panel_height)) - y1;
    if w1 <= 0 || h1 <= 0 {
        return None;
    }

    let offset = x1 % 8;
    let x1 = x1 - offset;
    let w1 = ((w1 + offset + 7) / 8 * 8).min(panel_width - x1);

    Some(Window {
        x: u16::try_from(x1).ok()?,
        y: u16::try_from(y1).ok()?,
        width: u16::try_from(w1).ok()?,
        height: u16::try_from(h1).ok()?,
    })
}

impl<T: Transport> Bus<T> {
    /// Point the controller's RAM window and address counters at `window`
    pub(crate) fn set_window(&mut self, window: Window) {
        log::debug!(
            "RAM window x {}..={} bytes, y {}..={}",
            window.x_start_byte(),
            window.x_end_byte(),
            window.y,
            window.y_end()
        );

        self.cmd_with_data(Cmd::DATA_ENTRY_MODE, &[Flag::DATA_ENTRY_INCRY_INCRX]);

        self.cmd_with_data(
            Cmd::SET_RAMX_START_END,
            &[window.x_start_byte(), window.x_end_byte()],
        );

        // 2 Databytes each: A[7:0] & 0..A[8]
        let y_end = window.y_end();
        self.cmd_with_data(
            Cmd::SET_RAMY_START_END,
            &[
                (window.y & 0xFF) as u8,
                (window.y >> 8) as u8,
                (y_end & 0xFF) as u8,
                (y_end >> 8) as u8,
            ],
        );

        self.cmd_with_data(Cmd::SET_RAMX_COUNTER, &[window.x_start_byte()]);
        self.cmd_with_data(
            Cmd::SET_RAMY_COUNTER,
            &[(window.y & 0xFF) as u8, (window.y >> 8) as u8],
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::ssd1681::recorder::{Op, Recorder};

    fn window(x: u16, y: u16, width: u16, height: u16) -> Window {
        Window {
            x,
            y,
            width,
            height,
        }
    }

    #[test]
    fn set_window_byte_sequence() {
        let mut bus = Bus::new(Recorder::default());
        bus.set_window(window(16, 260, 24, 10));

        assert_eq!(
            bus.transport.ops,
            vec![
                Op::Command(0x11),
                Op::Data(0x03),
                Op::Command(0x44),
                Op::Data(2),
                Op::Data(4),
                Op::Command(0x45),
                Op::Data(0x04),
                Op::Data(0x01),
                Op::Data(0x0D),
                Op::Data(0x01),
                Op::Command(0x4E),
                Op::Data(2),
                Op::Command(0x4F),
                Op::Data(0x04),
                Op::Data(0x01),
            ]
        );
    }

    #[test]
    fn image_inside_panel_is_aligned_outwards() {
        let clip = clip_image(13, 5, 10, 4, 200, 200).unwrap();
        // x 13 -> 8, 10px -> 2 bytes
        assert_eq!(clip.window, window(8, 5, 16, 4));
        assert_eq!((clip.dx, clip.dy), (0, 0));
    }

    #[test]
    fn image_clipped_at_origin() {
        let clip = clip_image(-16, -3, 40, 10, 200, 200).unwrap();
        assert_eq!(clip.window, window(0, 0, 24, 7));
        assert_eq!((clip.dx, clip.dy), (16, 3));

        // -3 rounds down to -8, so one source byte lies left of the panel
        let clip = clip_image(-3, 0, 16, 1, 200, 200).unwrap();
        assert_eq!(clip.window, window(0, 0, 8, 1));
        assert_eq!(clip.dx, 8);
    }

    #[test]
    fn image_clipped_at_far_edges() {
        let clip = clip_image(192, 195, 32, 32, 200, 200).unwrap();
        assert_eq!(clip.window, window(192, 195, 8, 5));
        assert_eq!((clip.dx, clip.dy), (0, 0));
    }

    #[test]
    fn image_outside_panel_is_empty() {
        assert_eq!(clip_image(200, 0, 8, 8, 200, 200), None);
        assert_eq!(clip_image(0, 200, 8, 8, 200, 200), None);
        assert_eq!(clip_image(-8, 0, 8, 8, 200, 200), None);
        assert_eq!(clip_image(0, -8, 8, 8, 200, 200), None);
        assert_eq!(clip_image(0, 0, 0, 8, 200, 200), None);
    }

    #[test]
    fn refresh_window_covers_request() {
        // 3..13 widens to 0..16
        assert_eq!(
            clip_refresh(3, 10, 10, 5, 200, 200),
            Some(window(0, 10, 16, 5))
        );
        assert_eq!(
            clip_refresh(-5, -5, 20, 20, 200, 200),
            Some(window(0, 0, 16, 15))
        );
        assert_eq!(clip_refresh(0, 0, 200, 200, 200, 200), Some(window(0, 0, 200, 200)));
        assert_eq!(clip_refresh(250, 0, 10, 10, 200, 200), None);
    }

    #[test]
    fn refresh_window_stays_on_narrow_panel() {
        // 122 px wide panel: widening 120..122 must not run past the edge
        assert_eq!(
            clip_refresh(121, 0, 8, 1, 122, 250),
            Some(window(120, 0, 2, 1))
        );
    }

    #[test]
    fn window_byte_addresses() {
        let w = window(8, 0, 13, 2);
        assert_eq!(w.x_start_byte(), 1);
        assert_eq!(w.x_end_byte(), 2);
        assert_eq!(w.bytes_per_row(), 2);
        assert_eq!(w.byte_len(), 4);
    }

    #[test]
    fn empty_window_addresses_stay_in_range() {
        let w = window(16, 0, 0, 0);
        assert_eq!(w.x_start_byte(), 2);
        assert_eq!(w.x_end_byte(), 2);
        assert_eq!(w.y_end(), 0);
        assert_eq!(w.byte_len(), 0);

        let w = window(0, u16::MAX, 8, 4);
        assert_eq!(w.y_end(), u16::MAX);
    }
}
