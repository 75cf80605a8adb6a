//! SSD1681 Display Driver Implementation
//!
//! [`Epd`] owns the frame buffer and the panel state, and drives the
//! controller through a [`Transport`]. The operations are spread over a few
//! files:
//!
//! - this file: initialisation, RAM fills and power management
//! - [`super::image`]: `write_image`, `write_image_part`, `flush`
//! - [`super::refresh`]: `refresh`, `refresh_area`
//! - [`super::window`]: RAM window programming
//!
//! ## Call order
//!
//! `init` -> one or more image writes -> `refresh` -> ... -> `power_off` ->
//! `hibernate`. The first write after init blanks the controller RAM, and the
//! first refresh after init is always a full one so the controller has its
//! waveform tables loaded before any partial update.
//!
//! ## Transport failures
//!
//! Nothing is read back from the controller. A failed byte is logged and the
//! sequence continues, so a flaky bus shows up as a corrupt image rather than
//! an error.

use core::time::Duration;

use crate::ssd1681::{
    cmd::Cmd,
    config::{DisplayConfig, Timing},
    error::Error,
    flag::Flag,
    framebuffer::FrameBuffer,
    interface::Transport,
    state::PanelState,
    window::Window,
};

/// Bound for the busy wait after a software reset
const SW_RESET_TIMEOUT: Duration = Duration::from_millis(20);

/// Command/data helpers on top of a [`Transport`] that log failures instead
/// of returning them
pub(crate) struct Bus<T> {
    pub(crate) transport: T,
}

impl<T: Transport> Bus<T> {
    pub(crate) fn new(transport: T) -> Self {
        Bus { transport }
    }

    pub(crate) fn cmd(&mut self, command: u8) {
        if let Err(e) = self.transport.write_command(command) {
            log::error!("Command 0x{:02X} failed: {:?}", command, e);
        }
    }

    /// Send bytes one by one, reporting failures once for the whole block
    pub(crate) fn stream(&mut self, bytes: impl IntoIterator<Item = u8>) {
        let mut total = 0usize;
        let mut failed = 0usize;
        let mut last_error = None;
        for byte in bytes {
            total += 1;
            if let Err(e) = self.transport.write_data(byte) {
                failed += 1;
                last_error = Some(e);
            }
        }
        if let Some(e) = last_error {
            log::error!(
                "{} of {} data bytes failed (last error {:?})",
                failed,
                total,
                e
            );
        }
    }

    pub(crate) fn cmd_with_data(&mut self, command: u8, data: &[u8]) {
        self.cmd(command);
        self.stream(data.iter().copied());
    }

    /// Send the same byte `repetitions` times, used to fill RAM with one value
    pub(crate) fn data_x_times(&mut self, val: u8, repetitions: usize) {
        self.stream(core::iter::repeat(val).take(repetitions));
    }

    pub(crate) fn wait_until_idle(&mut self, timeout: Duration, operation: &str) {
        if !self.transport.wait_while_busy(timeout) {
            log::warn!(
                "{}: controller still busy after {:?}, continuing",
                operation,
                timeout
            );
        }
    }

    /// Run an update sequence and wait for it, at most `timeout`
    pub(crate) fn trigger_display_update(
        &mut self,
        sequence: u8,
        timeout: Duration,
        operation: &str,
    ) {
        self.cmd_with_data(Cmd::UPDATE_DISPLAY_CTRL2, &[sequence]);
        self.cmd(Cmd::MASTER_ACTIVATE);
        self.wait_until_idle(timeout, operation);
    }
}

/// SSD1681 E-Paper Display Driver
///
/// Generic over the [`Transport`] that carries bytes to the controller; use
/// [`super::SpiTransport`] on real hardware.
pub struct Epd<T> {
    pub(crate) bus: Bus<T>,
    pub(crate) state: PanelState,
    pub(crate) width: u16,
    pub(crate) height: u16,
    pub(crate) timing: Timing,
    pub(crate) frame: FrameBuffer,
}

impl<T: Transport> Epd<T> {
    /// Bind the driver to `transport` and bring the panel up.
    ///
    /// Fails on an invalid configuration or when the reset line can't be
    /// driven; nothing is sent to the controller in the first case.
    pub fn init(transport: T, config: DisplayConfig) -> Result<Self, Error> {
        config.validate()?;

        let mut epd = Epd {
            bus: Bus::new(transport),
            state: PanelState::new(),
            width: config.width,
            height: config.height,
            timing: config.timing,
            frame: FrameBuffer::new(config.width, config.height),
        };
        epd.reinit()?;
        Ok(epd)
    }

    /// Run the initialisation sequence again, also the way out of hibernation.
    ///
    /// The frame buffer keeps its content; the controller RAM is considered
    /// unknown and the next refresh is a full one.
    pub fn reinit(&mut self) -> Result<(), Error> {
        log::info!("Initializing {}x{} e-paper display", self.width, self.height);
        self.state.reset();

        // Hardware reset first - the only step that can tell us the bus is unusable
        self.bus.transport.reset().map_err(|e| {
            log::error!("Display reset failed: {:?}", e);
            Error::Transport(e)
        })?;

        self.bus.cmd(Cmd::SW_RESET);
        self.bus.wait_until_idle(SW_RESET_TIMEOUT, "software reset");

        let last_gate = self.height - 1;
        self.bus.cmd_with_data(
            Cmd::DRIVER_CONTROL,
            &[
                (last_gate & 0xFF) as u8,
                (last_gate >> 8) as u8,
                Flag::DRIVER_OUTPUT_GATE_SCAN_FROM_G0,
            ],
        );
        self.bus.cmd_with_data(
            Cmd::BORDER_WAVEFORM_CONTROL,
            &[Flag::BORDER_WAVEFORM_FOLLOW_LUT_WHITE],
        );
        self.bus
            .cmd_with_data(Cmd::TEMP_CONTROL, &[Flag::INTERNAL_TEMP_SENSOR]);

        let window = self.full_window();
        self.bus.set_window(window);
        self.bus
            .trigger_display_update(Flag::UPDATE_POWER_ON, self.timing.power_on, "power on");

        self.state.initialized();
        log::info!("Display initialization complete");
        Ok(())
    }

    /// Power off, enter deep sleep and hand the transport back
    pub fn deinit(mut self) -> T {
        self.power_off();
        self.hibernate();
        self.bus.transport
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn timing(&self) -> Timing {
        self.timing
    }

    pub fn state(&self) -> PanelState {
        self.state
    }

    pub fn is_power_on(&self) -> bool {
        self.state.is_power_on()
    }

    pub fn is_hibernating(&self) -> bool {
        self.state.is_hibernating()
    }

    /// The driver's own drawing surface, sent with [`Epd::flush`]
    pub fn frame_buffer(&self) -> &FrameBuffer {
        &self.frame
    }

    pub fn frame_buffer_mut(&mut self) -> &mut FrameBuffer {
        &mut self.frame
    }

    pub(crate) fn full_window(&self) -> Window {
        Window::full(self.width, self.height)
    }

    /// Fill the whole controller RAM with `value`
    fn write_ram_fill(&mut self, value: u8) {
        let window = self.full_window();
        self.bus.set_window(window);
        self.bus.cmd(Cmd::WRITE_BW_DATA);
        self.bus.data_x_times(value, window.byte_len());
    }

    /// Blank the controller RAM before the first partial image lands on it
    pub(crate) fn prime_ram(&mut self) {
        log::debug!("Priming controller RAM before first image write");
        self.write_ram_fill(Flag::RAM_ALL_WHITE);
        self.state.ram_primed();
    }

    /// Fill frame buffer and controller RAM with `value`, without refreshing
    pub fn write_screen_buffer(&mut self, value: u8) -> Result<(), Error> {
        self.state.ensure_awake()?;
        self.frame.fill(value);
        self.write_ram_fill(value);
        self.state.ram_primed();
        Ok(())
    }

    /// Fill everything with `value` and show it with a full refresh
    pub fn clear(&mut self, value: u8) -> Result<(), Error> {
        self.write_screen_buffer(value)?;
        self.full_refresh();
        Ok(())
    }

    /// Switch the analog stage on; no-op when already on
    pub fn power_on(&mut self) -> Result<(), Error> {
        self.state.ensure_awake()?;
        if self.state.is_power_on() {
            log::debug!("Display already powered on");
            return Ok(());
        }
        self.bus
            .trigger_display_update(Flag::UPDATE_POWER_ON, self.timing.power_on, "power on");
        self.state.powered_on();
        Ok(())
    }

    /// Switch the analog stage and clock off; no-op when already off
    pub fn power_off(&mut self) {
        if !self.state.needs_power_off() {
            log::debug!("Display already powered off");
            return;
        }
        log::info!("Powering off display");
        self.bus.trigger_display_update(
            Flag::UPDATE_POWER_OFF,
            self.timing.power_off,
            "power off",
        );
        self.state.powered_off();
    }

    /// Enter deep sleep; only [`Epd::reinit`] wakes the panel again.
    ///
    /// Meant to follow [`Epd::power_off`]. Hibernating a powered panel is
    /// allowed but logged.
    pub fn hibernate(&mut self) {
        if !self.state.can_hibernate() {
            log::debug!("Display already hibernating");
            return;
        }
        if self.state.is_power_on() {
            log::warn!("Hibernating while the panel is still powered on");
        }
        self.bus
            .cmd_with_data(Cmd::DEEP_SLEEP_MODE, &[Flag::DEEP_SLEEP_MODE_1]);
        self.state.hibernated();
        log::info!("Display hibernating");
    }
}
