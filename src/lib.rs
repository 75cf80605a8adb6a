//! Driver for 1.54" SSD1681 e-paper panels

pub mod ssd1681;

pub use ssd1681::{Bitmap, DisplayConfig, Epd, Error, FrameBuffer, SpiTransport, Transform};
