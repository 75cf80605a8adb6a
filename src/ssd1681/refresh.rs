//! Display updates: full and partial refresh
use embedded_graphics::{
    prelude::{Point, Size},
    primitives::Rectangle,
};

use crate::ssd1681::{
    driver::Epd, error::Error, flag::Flag, interface::Transport, window::clip_refresh,
};

impl<T: Transport> Epd<T> {
    /// Show the RAM content on the whole panel.
    ///
    /// `partial == true` is a partial update of the full panel area.
    pub fn refresh(&mut self, partial: bool) -> Result<(), Error> {
        self.state.ensure_awake()?;
        if partial {
            let area = Rectangle::new(
                Point::zero(),
                Size::new(u32::from(self.width), u32::from(self.height)),
            );
            self.refresh_area(area)
        } else {
            self.full_refresh();
            Ok(())
        }
    }

    /// Partial update of `area`, widened to whole byte columns.
    ///
    /// The first refresh after init is turned into a full refresh. An area
    /// entirely off the panel is a no-op.
    pub fn refresh_area(&mut self, area: Rectangle) -> Result<(), Error> {
        self.state.ensure_awake()?;

        if self.state.needs_full_refresh() {
            log::info!("First refresh since init, doing a full refresh instead");
            self.full_refresh();
            return Ok(());
        }

        let Some(window) = clip_refresh(
            area.top_left.x,
            area.top_left.y,
            area.size.width,
            area.size.height,
            self.width,
            self.height,
        ) else {
            log::debug!("Refresh area {:?} is outside the panel", area);
            return Ok(());
        };

        log::debug!("Partial refresh {:?}", window);
        self.bus.set_window(window);
        self.bus.trigger_display_update(
            Flag::UPDATE_PARTIAL,
            self.timing.partial_refresh,
            "partial refresh",
        );
        self.state.partial_refreshed();
        Ok(())
    }

    pub(crate) fn full_refresh(&mut self) {
        log::info!("Full refresh");
        self.bus.trigger_display_update(
            Flag::UPDATE_FULL,
            self.timing.full_refresh,
            "full refresh",
        );
        self.state.full_refreshed();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use core::time::Duration;

    use crate::ssd1681::config::DisplayConfig;
    use crate::ssd1681::recorder::{Op, Recorder};
    use crate::ssd1681::state::PowerState;

    fn ready() -> Epd<Recorder> {
        let mut epd = Epd::init(Recorder::default(), DisplayConfig::default()).unwrap();
        epd.bus.transport.clear();
        epd
    }

    fn area(x: i32, y: i32, w: u32, h: u32) -> Rectangle {
        Rectangle::new(Point::new(x, y), Size::new(w, h))
    }

    #[test]
    fn full_refresh_sequence() {
        let mut epd = ready();
        epd.refresh(false).unwrap();
        assert_eq!(
            epd.bus.transport.ops,
            vec![
                Op::Command(0x22),
                Op::Data(0xF7),
                Op::Command(0x20),
                Op::Wait(Duration::from_millis(3000)),
            ]
        );
        assert_eq!(epd.state().power(), PowerState::Standby);
        assert!(!epd.is_power_on());
    }

    #[test]
    fn first_partial_refresh_is_full() {
        let mut epd = ready();
        epd.refresh_area(area(0, 0, 8, 8)).unwrap();
        assert_eq!(epd.bus.transport.data_after_last(0x22), vec![0xF7]);
        // no window programmed for the upgraded refresh
        assert!(!epd.bus.transport.commands().contains(&0x44));

        epd.bus.transport.clear();
        epd.refresh(true).unwrap();
        assert_eq!(epd.bus.transport.data_after_last(0x22), vec![0xFC]);
    }

    #[test]
    fn partial_refresh_sequence() {
        let mut epd = ready();
        epd.refresh(false).unwrap();
        epd.bus.transport.clear();

        epd.refresh_area(area(3, 10, 10, 5)).unwrap();
        assert_eq!(
            epd.bus.transport.commands(),
            vec![0x11, 0x44, 0x45, 0x4E, 0x4F, 0x22, 0x20]
        );
        assert_eq!(epd.bus.transport.data_after_last(0x44), vec![0, 1]);
        assert_eq!(epd.bus.transport.data_after_last(0x45), vec![10, 0, 14, 0]);
        assert_eq!(epd.bus.transport.data_after_last(0x22), vec![0xFC]);
        assert_eq!(
            epd.bus.transport.ops.last(),
            Some(&Op::Wait(Duration::from_millis(1000)))
        );

        assert!(epd.is_power_on());
        assert!(epd.state().is_partial_mode());
    }

    #[test]
    fn refresh_outside_panel_is_noop() {
        let mut epd = ready();
        epd.refresh(false).unwrap();
        epd.bus.transport.clear();

        epd.refresh_area(area(200, 0, 10, 10)).unwrap();
        epd.refresh_area(area(-20, 0, 10, 10)).unwrap();
        assert!(epd.bus.transport.ops.is_empty());
    }

    #[test]
    fn reinit_requires_full_refresh_again() {
        let mut epd = ready();
        epd.refresh(false).unwrap();
        epd.reinit().unwrap();
        epd.bus.transport.clear();

        epd.refresh(true).unwrap();
        assert_eq!(epd.bus.transport.data_after_last(0x22), vec![0xF7]);
    }

    #[test]
    fn refresh_after_failed_reinit_is_rejected() {
        let mut epd = ready();
        epd.bus.transport.fail_reset = true;
        let _ = epd.reinit();
        assert_eq!(epd.refresh(false), Err(Error::NotInitialized));
        assert_eq!(epd.refresh_area(area(0, 0, 8, 8)), Err(Error::NotInitialized));
    }
}
