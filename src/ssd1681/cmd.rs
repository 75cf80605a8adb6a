/// SSD1681 command opcodes used by this driver.
pub struct Cmd;
impl Cmd {
    // Init
    pub const DRIVER_CONTROL: u8 = 0x01;
    pub const DEEP_SLEEP_MODE: u8 = 0x10;
    pub const DATA_ENTRY_MODE: u8 = 0x11;
    pub const SW_RESET: u8 = 0x12;
    pub const TEMP_CONTROL: u8 = 0x18;
    pub const BORDER_WAVEFORM_CONTROL: u8 = 0x3C;

    // RAM window
    pub const SET_RAMX_START_END: u8 = 0x44;
    pub const SET_RAMY_START_END: u8 = 0x45;
    pub const SET_RAMX_COUNTER: u8 = 0x4E;
    pub const SET_RAMY_COUNTER: u8 = 0x4F;

    // Update
    pub const WRITE_BW_DATA: u8 = 0x24;
    pub const UPDATE_DISPLAY_CTRL2: u8 = 0x22;
    pub const MASTER_ACTIVATE: u8 = 0x20;
}
