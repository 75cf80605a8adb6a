/// Data bytes sent along with the commands in [`super::cmd::Cmd`].
///
/// The update sequences are the values written after `UPDATE_DISPLAY_CTRL2`
/// (0x22) and executed on `MASTER_ACTIVATE` (0x20).
pub struct Flag;
#[allow(missing_docs)]
impl Flag {
    // Display Update Control 2 (0x22) sequences
    // clock + analog on, load temp + LUT, display, analog + clock off
    pub const UPDATE_FULL: u8 = 0xF7;
    pub const UPDATE_PARTIAL: u8 = 0xFC; // clock + analog on, display mode 2, panel stays driven
    pub const UPDATE_POWER_ON: u8 = 0xE0; // clock + analog on
    pub const UPDATE_POWER_OFF: u8 = 0x83; // analog + clock off

    // Data Entry Mode (0x11)
    pub const DATA_ENTRY_INCRY_INCRX: u8 = 0x03; // Y increment, X increment

    // Deep Sleep Mode (0x10)
    pub const DEEP_SLEEP_MODE_1: u8 = 0x01; // RAM retained, wake needs hardware reset

    // Driver Output Control (0x01), third byte
    pub const DRIVER_OUTPUT_GATE_SCAN_FROM_G0: u8 = 0x00;

    // Border Waveform Control (0x3C)
    pub const BORDER_WAVEFORM_FOLLOW_LUT_WHITE: u8 = 0x05;

    // Temperature Sensor Control (0x18)
    pub const INTERNAL_TEMP_SENSOR: u8 = 0x80;

    // RAM fill patterns for WRITE_BW_DATA, a set bit is a white pixel
    pub const RAM_ALL_WHITE: u8 = 0xFF;
    pub const RAM_ALL_BLACK: u8 = 0x00;
}
