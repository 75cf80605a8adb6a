//! Byte transport between the driver and the panel controller
use core::time::Duration;

use display_interface::DisplayError;
use embedded_hal::{
    delay::DelayNs,
    digital::{InputPin, OutputPin},
    spi::SpiDevice,
};

/// Delays of the hardware reset pulse: settle high, hold low, recover high,
/// then wait before the first command
const RESET_SETTLE_MS: u32 = 100;
const RESET_PULSE_MS: u32 = 20;
const RESET_RECOVER_MS: u32 = 200;
const RESET_READY_MS: u32 = 20;

/// Sleep between two reads of the busy line
const BUSY_POLL_INTERVAL_MS: u32 = 10;

/// What the driver needs from the wire.
///
/// Every call is one complete transaction; there is no read-back.
/// Implement it for the physical bus on the board, or for a recorder in tests.
pub trait Transport {
    /// Send one command byte (DC low)
    fn write_command(&mut self, command: u8) -> Result<(), DisplayError>;

    /// Send one data byte (DC high)
    fn write_data(&mut self, data: u8) -> Result<(), DisplayError>;

    /// Block while the controller reports busy, at most `timeout`.
    ///
    /// Returns `false` when the timeout ran out with the line still busy.
    fn wait_while_busy(&mut self, timeout: Duration) -> bool;

    /// Drive the reset line through the hardware reset pulse. Returns once
    /// the controller accepts commands.
    fn reset(&mut self) -> Result<(), DisplayError>;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn write_command(&mut self, command: u8) -> Result<(), DisplayError> {
        T::write_command(self, command)
    }

    fn write_data(&mut self, data: u8) -> Result<(), DisplayError> {
        T::write_data(self, data)
    }

    fn wait_while_busy(&mut self, timeout: Duration) -> bool {
        T::wait_while_busy(self, timeout)
    }

    fn reset(&mut self) -> Result<(), DisplayError> {
        T::reset(self)
    }
}

/// 4-wire SPI connection: SPI device (owns chip select), DC, RST and BUSY
pub struct SpiTransport<SPI, BSY, DC, RST, DELAY> {
    /// SPI device, frames every byte with chip select
    spi: SPI,
    /// High while the controller is busy
    busy: BSY,
    /// Data/Command Control Pin (High for data, Low for command)
    dc: DC,
    /// Pin for Reseting
    rst: RST,
    delay: DELAY,
    poll_interval_ms: u32,
}

impl<SPI, BSY, DC, RST, DELAY> SpiTransport<SPI, BSY, DC, RST, DELAY> {
    pub fn new(spi: SPI, busy: BSY, dc: DC, rst: RST, delay: DELAY) -> Self {
        SpiTransport {
            spi,
            busy,
            dc,
            rst,
            delay,
            poll_interval_ms: BUSY_POLL_INTERVAL_MS,
        }
    }

    /// Change the sleep between busy-line reads (minimum 1ms)
    pub fn with_poll_interval(mut self, poll_interval_ms: u32) -> Self {
        self.poll_interval_ms = poll_interval_ms.max(1);
        self
    }

    /// Give the peripherals back
    pub fn release(self) -> (SPI, BSY, DC, RST, DELAY) {
        (self.spi, self.busy, self.dc, self.rst, self.delay)
    }
}

impl<SPI, BSY, DC, RST, DELAY> Transport for SpiTransport<SPI, BSY, DC, RST, DELAY>
where
    SPI: SpiDevice,
    BSY: InputPin,
    DC: OutputPin,
    RST: OutputPin,
    DELAY: DelayNs,
{
    fn write_command(&mut self, command: u8) -> Result<(), DisplayError> {
        // low for commands
        self.dc.set_low().map_err(|_| DisplayError::DCError)?;

        self.spi
            .write(&[command])
            .map_err(|_| DisplayError::BusWriteError)
    }

    fn write_data(&mut self, data: u8) -> Result<(), DisplayError> {
        // high for data
        self.dc.set_high().map_err(|_| DisplayError::DCError)?;
        self.spi
            .write(&[data])
            .map_err(|_| DisplayError::BusWriteError)
    }

    fn wait_while_busy(&mut self, timeout: Duration) -> bool {
        let timeout_ms = timeout.as_millis();
        let mut waited_ms: u128 = 0;

        loop {
            match self.busy.is_high() {
                Ok(false) => return true,
                Ok(true) if waited_ms >= timeout_ms => return false,
                Ok(true) => {
                    self.delay.delay_ms(self.poll_interval_ms);
                    waited_ms += u128::from(self.poll_interval_ms);
                }
                Err(_) => {
                    // Error reading pin - bail out to avoid hanging on a broken line
                    log::error!("Error reading BUSY pin state - assuming not busy to continue");
                    return true;
                }
            }
        }
    }

    fn reset(&mut self) -> Result<(), DisplayError> {
        self.rst.set_high().map_err(|_| DisplayError::RSError)?;
        self.delay.delay_ms(RESET_SETTLE_MS);
        self.rst.set_low().map_err(|_| DisplayError::RSError)?;
        self.delay.delay_ms(RESET_PULSE_MS);
        self.rst.set_high().map_err(|_| DisplayError::RSError)?;
        self.delay.delay_ms(RESET_RECOVER_MS);
        self.delay.delay_ms(RESET_READY_MS);
        Ok(())
    }
}
