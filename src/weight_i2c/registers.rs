//! Register map of the weight unit firmware.
//!
//! All multi-byte registers are little endian.

/// Raw 24-bit ADC reading, sign extended to i32 (R, 4 bytes)
pub const RAW_ADC: u8 = 0x00;
/// Calibrated weight as f32 (R, 4 bytes)
pub const WEIGHT: u8 = 0x10;
/// Button state of the scale variants, 0 = pressed (R, 1 byte)
pub const BUTTON: u8 = 0x20;
/// RGB LED of the scale variants (R/W, 3 bytes)
pub const RGB_LED: u8 = 0x30;
/// Calibration gap as f32 (R/W, 4 bytes)
pub const GAP: u8 = 0x40;
/// Write 1 to reset the offset (W, 1 byte)
pub const OFFSET: u8 = 0x50;
/// Weight x100 as i32 (R, 4 bytes)
pub const WEIGHTX100_INT: u8 = 0x60;
/// Weight x100 as NUL padded ASCII (R, 16 bytes)
pub const WEIGHTX100_STRING: u8 = 0x70;
pub const FILTER_LP: u8 = 0x80;
pub const FILTER_AVG: u8 = 0x81;
pub const FILTER_EMA: u8 = 0x82;
pub const FIRMWARE_VERSION: u8 = 0xFE;
pub const I2C_ADDRESS: u8 = 0xFF;

pub const WEIGHT_STRING_LEN: usize = 16;
