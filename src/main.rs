use embedded_graphics::mono_font::{
    iso_8859_15::{FONT_10X20 as ISO15_10, FONT_5X8},
    MonoTextStyle, MonoTextStyleBuilder,
};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
use embedded_graphics::{prelude::*, text::Text};

use esp_idf_svc::hal::delay::Delay;
use esp_idf_svc::hal::gpio;
use esp_idf_svc::hal::peripherals::Peripherals;
use esp_idf_svc::hal::prelude::*;
use esp_idf_svc::hal::spi;

use epd154::ssd1681::{Bitmap, DisplayConfig, Epd, Flag, SpiTransport, Transform};

// Include the pre-converted logo image binary data (generated at build time)
const LOGO_IMAGE: &[u8] = include_bytes!(concat!(env!("OUT_DIR"), "/logo.bin"));

/// Strip at the bottom of the panel redrawn with partial refreshes
const COUNTER_AREA: Rectangle = Rectangle::new(Point::new(0, 168), Size::new(200, 32));

// https://docs.esp-rs.org/esp-idf-svc/esp_idf_svc/
fn main() -> anyhow::Result<()> {
    // It is necessary to call this function once. Otherwise some patches to the runtime
    // implemented by esp-idf-sys might not link properly.
    // See https://github.com/esp-rs/esp-idf-template/issues/71
    esp_idf_svc::sys::link_patches();

    // Bind the log crate to the ESP Logging facilities
    esp_idf_svc::log::EspLogger::initialize_default();

    let peripherals = Peripherals::take()?;
    let pins = peripherals.pins;

    log::info!("Configuring SPI for the display");
    let spi = spi::SpiDeviceDriver::new_single(
        peripherals.spi2,
        pins.gpio12,                    // SCK
        pins.gpio11,                    // MOSI
        Option::<gpio::AnyIOPin>::None, // No MISO needed for display
        Some(pins.gpio45),              // CS
        &spi::SpiDriverConfig::new(),
        &spi::SpiConfig::new().baudrate(4.MHz().into()),
    )?;

    // Display power is switched by a GPIO on this board
    let mut power_pin = gpio::PinDriver::output(pins.gpio7)?;
    power_pin.set_high()?;

    let delay = Delay::default();
    delay.delay_ms(100); // Wait for power to stabilize

    let transport = SpiTransport::new(
        spi,
        gpio::PinDriver::input(pins.gpio48)?,  // BUSY
        gpio::PinDriver::output(pins.gpio46)?, // DC
        gpio::PinDriver::output(pins.gpio47)?, // RST
        Delay::default(),
    );

    let mut epd = Epd::init(transport, DisplayConfig::default())
        .map_err(|e| anyhow::anyhow!("Display init failed: {}", e))?;

    if LOGO_IMAGE.is_empty() {
        log::warn!("Logo image not available (logo.png not found at build time)");
        epd.clear(Flag::RAM_ALL_WHITE)
            .map_err(|e| anyhow::anyhow!("Failed to clear display: {}", e))?;
    } else {
        log::info!("Logo image embedded, size: {} bytes", LOGO_IMAGE.len());
        let logo = Bitmap::new(LOGO_IMAGE, epd.width(), epd.height())
            .map_err(|e| anyhow::anyhow!("Logo does not fit the panel: {}", e))?;
        epd.frame_buffer_mut()
            .write_region(0, 0, logo.width(), logo.height(), logo.data())
            .map_err(|e| anyhow::anyhow!("Failed to copy logo: {}", e))?;
    }

    // Add a label
    let label_style = MonoTextStyle::new(&FONT_5X8, BinaryColor::On);
    Text::new("SSD1681 200x200", Point::new(4, 10), label_style).draw(epd.frame_buffer_mut())?;

    epd.flush()
        .and_then(|()| epd.refresh(false))
        .map_err(|e| anyhow::anyhow!("Failed to show first frame: {}", e))?;
    delay.delay_ms(2000);

    let counter_style = MonoTextStyleBuilder::new()
        .font(&ISO15_10)
        .text_color(BinaryColor::On) // On = black pixels
        .build();

    for count in 1..=10 {
        COUNTER_AREA
            .into_styled(PrimitiveStyle::with_fill(BinaryColor::Off))
            .draw(epd.frame_buffer_mut())?;
        Text::new(&format!("Update {:>2}", count), Point::new(40, 190), counter_style)
            .draw(epd.frame_buffer_mut())?;

        if let Err(e) = epd
            .flush_area(COUNTER_AREA)
            .and_then(|()| epd.refresh_area(COUNTER_AREA))
        {
            log::error!("Partial update {} failed: {}", count, e);
        }
        delay.delay_ms(1000);
    }

    // Inverted logo as the last frame, with a full refresh to clear ghosting
    if !LOGO_IMAGE.is_empty() {
        let logo = Bitmap::new(LOGO_IMAGE, epd.width(), epd.height())
            .map_err(|e| anyhow::anyhow!("Logo does not fit the panel: {}", e))?;
        epd.write_image(&logo, 0, 0, Transform::NONE.inverted())
            .and_then(|()| epd.refresh(false))
            .map_err(|e| anyhow::anyhow!("Failed to show inverted logo: {}", e))?;
    }

    let transport = epd.deinit();
    let (_spi, _busy, _dc, _rst, _delay) = transport.release();
    power_pin.set_low()?;

    let reset_reason = esp_idf_svc::hal::reset::ResetReason::get();
    log::info!("Reset reason: {:?}", reset_reason);

    Ok(())
}
