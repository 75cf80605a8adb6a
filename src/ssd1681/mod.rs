//! SSD1681 ePaper Display Driver
//!
//! Used in the 1.54" 200x200 black/white panels (GDEY0154D67 and compatible).
//!
//! This driver is loosely modeled after the
//! [epd-waveshare](https://github.com/caemor/epd-waveshare) and GxEPD2 drivers.
//!
//! ### Usage
//! The driver owns one black/white frame buffer. To display something you:
//!
//! 1. wrap the bus in a [`Transport`], for real hardware [`SpiTransport`]
//! 1. bring the panel up with [`Epd::init`]
//! 1. draw onto [`Epd::frame_buffer_mut`], preferably with
//!    [`embedded_graphics`](https://github.com/embedded-graphics/embedded-graphics),
//!    and send it with [`Epd::flush`], or write packed bitmaps directly with
//!    [`Epd::write_image`]
//! 1. kick off a display update using [`Epd::refresh`] or [`Epd::refresh_area`]
//! 1. when done, [`Epd::power_off`] and [`Epd::hibernate`], or [`Epd::deinit`]
//!
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]

mod cmd;
pub mod flag;

pub mod config;
pub mod driver;
pub mod error;
pub mod framebuffer;
pub mod image;
pub mod interface;
pub mod refresh;
pub mod state;
pub mod window;

#[cfg(test)]
mod recorder;

pub use config::{DisplayConfig, Timing};
pub use driver::Epd;
pub use error::{DisplayError, Error};
pub use flag::Flag;
pub use framebuffer::FrameBuffer;
pub use image::{Bitmap, Transform};
pub use interface::{SpiTransport, Transport};
pub use state::{PanelState, PowerState};
pub use window::Window;

/// Maximum display height this driver supports
pub const MAX_HEIGHT: u16 = 200;

/// Maximum display width this driver supports
pub const MAX_WIDTH: u16 = 200;

/// Display height, pixels vertically
pub const HEIGHT: u16 = 200;

/// Display width, pixels horizontally
pub const WIDTH: u16 = 200;
