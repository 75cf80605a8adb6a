//! Power and waveform state of the panel
//!
//! ```text
//! Uninitialized --init--> PoweredOn <--partial refresh / power_on-- Standby, PoweredOff
//!                         PoweredOn --full refresh--> Standby
//!              PoweredOn, Standby --power_off--> PoweredOff
//!                         any initialized --hibernate--> Hibernating --reinit--> PoweredOn
//! ```

use crate::ssd1681::error::Error;

/// Power lifecycle of the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerState {
    /// No successful init yet
    Uninitialized,
    /// Analog stage on and driving the panel
    PoweredOn,
    /// A full update switched the analog stage off by itself; no explicit
    /// power-off has been sent yet
    Standby,
    /// Explicitly powered off
    PoweredOff,
    /// Deep sleep, only a reinit brings it back
    Hibernating,
}

/// Everything the driver tracks between calls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelState {
    power: PowerState,
    /// Controller RAM holds known content
    ram_primed: bool,
    /// A full refresh loaded the waveform tables partial refresh depends on
    waveform_seeded: bool,
    /// The last refresh was partial
    partial_mode: bool,
}

impl PanelState {
    pub const fn new() -> Self {
        PanelState {
            power: PowerState::Uninitialized,
            ram_primed: false,
            waveform_seeded: false,
            partial_mode: false,
        }
    }

    pub fn power(&self) -> PowerState {
        self.power
    }

    pub fn is_power_on(&self) -> bool {
        self.power == PowerState::PoweredOn
    }

    pub fn is_hibernating(&self) -> bool {
        self.power == PowerState::Hibernating
    }

    pub fn is_partial_mode(&self) -> bool {
        self.partial_mode
    }

    /// The next image write must blank the controller RAM first
    pub fn needs_ram_prime(&self) -> bool {
        !self.ram_primed
    }

    /// Partial refreshes are upgraded to full until this is false
    pub fn needs_full_refresh(&self) -> bool {
        !self.waveform_seeded
    }

    /// Ok when the panel can take RAM writes and refreshes
    pub(crate) fn ensure_awake(&self) -> Result<(), Error> {
        match self.power {
            PowerState::Uninitialized => Err(Error::NotInitialized),
            PowerState::Hibernating => Err(Error::Hibernating),
            _ => Ok(()),
        }
    }

    /// `power_off` has something to do
    pub(crate) fn needs_power_off(&self) -> bool {
        matches!(self.power, PowerState::PoweredOn | PowerState::Standby)
    }

    /// `hibernate` has something to do
    pub(crate) fn can_hibernate(&self) -> bool {
        !matches!(
            self.power,
            PowerState::Uninitialized | PowerState::Hibernating
        )
    }

    pub(crate) fn reset(&mut self) {
        *self = PanelState::new();
    }

    pub(crate) fn initialized(&mut self) {
        *self = PanelState {
            power: PowerState::PoweredOn,
            ..PanelState::new()
        };
    }

    pub(crate) fn ram_primed(&mut self) {
        self.ram_primed = true;
    }

    pub(crate) fn powered_on(&mut self) {
        self.power = PowerState::PoweredOn;
    }

    pub(crate) fn full_refreshed(&mut self) {
        self.power = PowerState::Standby;
        self.waveform_seeded = true;
        self.partial_mode = false;
    }

    pub(crate) fn partial_refreshed(&mut self) {
        self.power = PowerState::PoweredOn;
        self.partial_mode = true;
    }

    pub(crate) fn powered_off(&mut self) {
        self.power = PowerState::PoweredOff;
        self.partial_mode = false;
    }

    pub(crate) fn hibernated(&mut self) {
        self.power = PowerState::Hibernating;
    }
}

impl Default for PanelState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_state_refuses_io() {
        let state = PanelState::new();
        assert_eq!(state.ensure_awake(), Err(Error::NotInitialized));
        assert!(!state.needs_power_off());
        assert!(!state.can_hibernate());
    }

    #[test]
    fn init_needs_prime_and_seed() {
        let mut state = PanelState::new();
        state.initialized();
        assert!(state.is_power_on());
        assert!(state.needs_ram_prime());
        assert!(state.needs_full_refresh());
        assert_eq!(state.ensure_awake(), Ok(()));
    }

    #[test]
    fn full_refresh_leaves_standby() {
        let mut state = PanelState::new();
        state.initialized();
        state.full_refreshed();
        assert_eq!(state.power(), PowerState::Standby);
        assert!(!state.is_power_on());
        assert!(state.needs_power_off());
        assert!(!state.needs_full_refresh());

        state.partial_refreshed();
        assert!(state.is_power_on());
        assert!(state.is_partial_mode());
    }

    #[test]
    fn power_off_then_hibernate() {
        let mut state = PanelState::new();
        state.initialized();
        state.powered_off();
        assert!(!state.needs_power_off());
        assert!(state.can_hibernate());

        state.hibernated();
        assert_eq!(state.ensure_awake(), Err(Error::Hibernating));
        assert!(!state.can_hibernate());
        assert!(!state.needs_power_off());
    }

    #[test]
    fn reinit_clears_hibernation() {
        let mut state = PanelState::new();
        state.initialized();
        state.ram_primed();
        state.full_refreshed();
        state.hibernated();

        state.initialized();
        assert!(state.is_power_on());
        assert!(state.needs_ram_prime());
        assert!(state.needs_full_refresh());
    }
}
