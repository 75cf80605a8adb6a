//! Panel geometry and busy-wait timing

use core::time::Duration;

use crate::ssd1681::{error::Error, HEIGHT, MAX_HEIGHT, MAX_WIDTH, WIDTH};

/// Upper bounds for the busy waits of each controller operation.
///
/// A wait that runs out is logged and the driver proceeds as if the
/// controller had finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    /// After the power-on sequence
    pub power_on: Duration,
    /// After the power-off sequence
    pub power_off: Duration,
    /// After a full refresh
    pub full_refresh: Duration,
    /// After a partial refresh
    pub partial_refresh: Duration,
}

impl Timing {
    /// Values for the 1.54" GDEY0154D67 panel
    pub const GDEY0154D67: Timing = Timing {
        power_on: Duration::from_millis(200),
        power_off: Duration::from_millis(200),
        full_refresh: Duration::from_millis(3000),
        partial_refresh: Duration::from_millis(1000),
    };

    pub fn with_power_on(mut self, power_on: Duration) -> Self {
        self.power_on = power_on;
        self
    }

    pub fn with_power_off(mut self, power_off: Duration) -> Self {
        self.power_off = power_off;
        self
    }

    pub fn with_full_refresh(mut self, full_refresh: Duration) -> Self {
        self.full_refresh = full_refresh;
        self
    }

    pub fn with_partial_refresh(mut self, partial_refresh: Duration) -> Self {
        self.partial_refresh = partial_refresh;
        self
    }

    fn validate(&self) -> Result<(), Error> {
        let named = [
            ("power_on", self.power_on),
            ("power_off", self.power_off),
            ("full_refresh", self.full_refresh),
            ("partial_refresh", self.partial_refresh),
        ];
        match named.iter().find(|(_, value)| value.is_zero()) {
            Some(&(name, _)) => Err(Error::InvalidTiming(name)),
            None => Ok(()),
        }
    }
}

impl Default for Timing {
    fn default() -> Self {
        Self::GDEY0154D67
    }
}

/// Everything [`crate::ssd1681::Epd::init`] needs besides the transport
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayConfig {
    /// Width in pixels
    pub width: u16,
    /// Height in pixels (gate lines)
    pub height: u16,
    /// Busy-wait bounds
    pub timing: Timing,
}

impl DisplayConfig {
    pub fn new(width: u16, height: u16, timing: Timing) -> Self {
        DisplayConfig {
            width,
            height,
            timing,
        }
    }

    /// Check geometry and timing against what the controller supports
    pub fn validate(&self) -> Result<(), Error> {
        if self.width == 0
            || self.height == 0
            || self.width > MAX_WIDTH
            || self.height > MAX_HEIGHT
        {
            return Err(Error::InvalidGeometry {
                width: self.width,
                height: self.height,
            });
        }
        self.timing.validate()
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        DisplayConfig::new(WIDTH, HEIGHT, Timing::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = DisplayConfig::default();
        assert_eq!((config.width, config.height), (200, 200));
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn geometry_limits() {
        for (width, height) in [(0, 200), (200, 0), (201, 200), (200, 201)] {
            let config = DisplayConfig::new(width, height, Timing::default());
            assert_eq!(
                config.validate(),
                Err(Error::InvalidGeometry { width, height })
            );
        }
        assert!(DisplayConfig::new(122, 64, Timing::default())
            .validate()
            .is_ok());
    }

    #[test]
    fn zero_timing_is_named() {
        let timing = Timing::default().with_partial_refresh(Duration::ZERO);
        let config = DisplayConfig::new(200, 200, timing);
        assert_eq!(
            config.validate(),
            Err(Error::InvalidTiming("partial_refresh"))
        );
    }
}
