//! RGB LED of the scale variants.

/// 8-bit per channel color.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// From `0x00RRGGBB`.
    pub const fn from_rgb32(rgb32: u32) -> Self {
        Self {
            r: (rgb32 >> 16) as u8,
            g: (rgb32 >> 8) as u8,
            b: rgb32 as u8,
        }
    }

    /// As `0x00RRGGBB`.
    pub const fn to_rgb32(self) -> u32 {
        (self.r as u32) << 16 | (self.g as u32) << 8 | self.b as u32
    }

    /// From RGB565 (`RRRRRGGGGGGBBBBB`), low bits filled by replicating the
    /// high bits so that full scale maps to 0xFF.
    pub const fn from_rgb565(rgb16: u16) -> Self {
        let r5 = ((rgb16 >> 11) & 0x1F) as u8;
        let g6 = ((rgb16 >> 5) & 0x3F) as u8;
        let b5 = (rgb16 & 0x1F) as u8;
        Self {
            r: (r5 << 3) | (r5 >> 2),
            g: (g6 << 2) | (g6 >> 4),
            b: (b5 << 3) | (b5 >> 2),
        }
    }

    pub(crate) const fn to_bytes(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    pub(crate) const fn from_bytes(bytes: [u8; 3]) -> Self {
        Self::new(bytes[0], bytes[1], bytes[2])
    }
}

/// A unit with an RGB LED.
pub trait RgbLed {
    type Error;

    fn read_led_color(&mut self) -> Result<Rgb, Self::Error>;

    fn write_led_color(&mut self, color: Rgb) -> Result<(), Self::Error>;

    /// Read the color as `0x00RRGGBB`.
    fn read_led_rgb32(&mut self) -> Result<u32, Self::Error> {
        self.read_led_color().map(Rgb::to_rgb32)
    }

    /// Write the color as `0x00RRGGBB`.
    fn write_led_rgb32(&mut self, rgb32: u32) -> Result<(), Self::Error> {
        self.write_led_color(Rgb::from_rgb32(rgb32))
    }

    /// Write the color as RGB565.
    fn write_led_rgb565(&mut self, rgb16: u16) -> Result<(), Self::Error> {
        self.write_led_color(Rgb::from_rgb565(rgb16))
    }
}
