//! Miniscale unit: a weight unit with an RGB LED and a button that is read
//! on demand.

use core::ops::{Deref, DerefMut};

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

use crate::led::{Rgb, RgbLed};
use crate::weight_i2c::{self, registers, Data, Mode, WeightI2c};
use crate::{Error, PeriodicMeasurement};

pub struct Miniscale<I2C, D, const N: usize = 1> {
    unit: WeightI2c<I2C, D, N>,
}

impl<I2C, D, const N: usize> Miniscale<I2C, D, N>
where
    I2C: I2c,
    D: DelayNs,
{
    pub fn new(i2c: I2C, delay: D, address: u8) -> Self {
        Self {
            unit: WeightI2c::new(i2c, delay, address),
        }
    }

    pub fn with_default_address(i2c: I2C, delay: D) -> Self {
        Self::new(i2c, delay, weight_i2c::DEFAULT_ADDRESS)
    }

    pub fn release(self) -> (I2C, D) {
        self.unit.release()
    }

    pub fn is_pressed(&mut self) -> Result<bool, Error<I2C::Error>> {
        Ok(self.unit.read_register8(registers::BUTTON)? == 0)
    }
}

impl<I2C, D, const N: usize> Deref for Miniscale<I2C, D, N> {
    type Target = WeightI2c<I2C, D, N>;

    fn deref(&self) -> &Self::Target {
        &self.unit
    }
}

impl<I2C, D, const N: usize> DerefMut for Miniscale<I2C, D, N> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.unit
    }
}

impl<I2C, D, const N: usize> PeriodicMeasurement for Miniscale<I2C, D, N>
where
    I2C: I2c,
    D: DelayNs,
{
    type Mode = Mode;
    type Data = Data;
    type Error = Error<I2C::Error>;

    fn start_periodic_measurement(&mut self, mode: Mode, interval_ms: u32) -> Result<(), Self::Error> {
        self.unit.start_periodic_measurement(mode, interval_ms)
    }

    fn stop_periodic_measurement(&mut self) -> Result<(), Self::Error> {
        self.unit.stop_periodic_measurement()
    }

    fn in_periodic(&self) -> bool {
        self.unit.in_periodic()
    }

    fn interval(&self) -> u32 {
        self.unit.interval()
    }

    fn update(&mut self, now_ms: u64, force: bool) -> Result<(), Self::Error> {
        self.unit.update(now_ms, force)
    }

    fn updated(&self) -> bool {
        self.unit.updated()
    }

    fn available(&self) -> usize {
        self.unit.available()
    }

    fn is_full(&self) -> bool {
        self.unit.is_full()
    }

    fn oldest(&self) -> Option<Data> {
        self.unit.oldest()
    }

    fn latest(&self) -> Option<Data> {
        self.unit.latest()
    }

    fn discard(&mut self) {
        self.unit.discard()
    }

    fn flush(&mut self) {
        self.unit.flush()
    }
}

impl<I2C, D, const N: usize> RgbLed for Miniscale<I2C, D, N>
where
    I2C: I2c,
    D: DelayNs,
{
    type Error = Error<I2C::Error>;

    fn read_led_color(&mut self) -> Result<Rgb, Self::Error> {
        let mut buf = [0u8; 3];
        self.unit.read_register(registers::RGB_LED, &mut buf)?;
        Ok(Rgb::from_bytes(buf))
    }

    fn write_led_color(&mut self, color: Rgb) -> Result<(), Self::Error> {
        self.unit.write_register(registers::RGB_LED, &color.to_bytes())
    }
}

#[cfg(test)]
mod tests {
    extern crate std;
    use std::vec;

    use embedded_hal::i2c::ErrorKind;
    use embedded_hal_mock::eh1::delay::NoopDelay;
    use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTransaction};

    use super::*;

    const ADDR: u8 = 0x30;

    fn miniscale(expectations: &[I2cTransaction]) -> (Miniscale<I2cMock, NoopDelay>, I2cMock) {
        let i2c = I2cMock::new(expectations);
        let handle = i2c.clone();
        (Miniscale::new(i2c, NoopDelay::new(), ADDR), handle)
    }

    #[test]
    fn button_is_read_on_demand() {
        let expectations = [
            I2cTransaction::write_read(ADDR, vec![registers::BUTTON], vec![0]),
            I2cTransaction::write_read(ADDR, vec![registers::BUTTON], vec![1]),
            I2cTransaction::write_read(ADDR, vec![registers::BUTTON], vec![0])
                .with_error(ErrorKind::Other),
        ];
        let (mut scale, mut i2c) = miniscale(&expectations);

        assert!(scale.is_pressed().unwrap());
        assert!(!scale.is_pressed().unwrap());
        assert_eq!(scale.is_pressed(), Err(Error::I2c(ErrorKind::Other)));
        i2c.done();
    }

    #[test]
    fn update_does_not_touch_button() {
        let expectations = [I2cTransaction::write_read(
            ADDR,
            vec![registers::WEIGHTX100_INT],
            (-300i32).to_le_bytes().to_vec(),
        )];
        let (mut scale, mut i2c) = miniscale(&expectations);

        scale.start_periodic_measurement(Mode::Int, 50).unwrap();
        scale.update(0, false).unwrap();
        scale.update(49, false).unwrap();
        assert_eq!(scale.iweight(), -300);
        assert!(scale.is_full());
        i2c.done();
    }

    #[test]
    fn led_rgb565() {
        let expectations = [
            I2cTransaction::write(ADDR, vec![registers::RGB_LED, 0x84, 0x82, 0x08]),
            I2cTransaction::write_read(ADDR, vec![registers::RGB_LED], vec![0x84, 0x82, 0x08]),
        ];
        let (mut scale, mut i2c) = miniscale(&expectations);

        scale.write_led_rgb565(0x8401).unwrap();
        assert_eq!(scale.read_led_rgb32().unwrap(), 0x0084_8208);
        i2c.done();
    }
}
