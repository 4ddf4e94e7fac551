//! MiniScales unit: a weight unit with an RGB LED and a button whose state
//! is tracked by [`update`](PeriodicMeasurement::update).

use core::ops::{Deref, DerefMut};

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

use crate::led::{Rgb, RgbLed};
use crate::weight_i2c::{self, registers, Data, Mode, WeightI2c};
use crate::{Error, PeriodicMeasurement};

/// Settings applied by [`WeightI2c::begin`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    pub unit: weight_i2c::Config,
    /// Read the button on every update
    pub manage_button_status: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            unit: weight_i2c::Config::default(),
            manage_button_status: true,
        }
    }
}

pub struct MiniScales<I2C, D, const N: usize = 1> {
    unit: WeightI2c<I2C, D, N>,
    manage_button_status: bool,
    button: bool,
    prev_button: bool,
}

impl<I2C, D, const N: usize> MiniScales<I2C, D, N>
where
    I2C: I2c,
    D: DelayNs,
{
    pub fn new(i2c: I2C, delay: D, address: u8) -> Self {
        Self {
            unit: WeightI2c::new(i2c, delay, address),
            manage_button_status: Config::default().manage_button_status,
            button: false,
            prev_button: false,
        }
    }

    pub fn with_default_address(i2c: I2C, delay: D) -> Self {
        Self::new(i2c, delay, weight_i2c::DEFAULT_ADDRESS)
    }

    pub fn release(self) -> (I2C, D) {
        self.unit.release()
    }

    pub fn config(&self) -> Config {
        Config {
            unit: self.unit.config(),
            manage_button_status: self.manage_button_status,
        }
    }

    pub fn set_config(&mut self, config: Config) {
        self.unit.set_config(config.unit);
        self.manage_button_status = config.manage_button_status;
    }

    /// Read the button directly.
    pub fn read_button_status(&mut self) -> Result<bool, Error<I2C::Error>> {
        // 0: pressed, 1: released
        Ok(self.unit.read_register8(registers::BUTTON)? == 0)
    }

    /// Button state as of the last update.
    pub fn is_pressed(&self) -> bool {
        self.button
    }

    /// Pressed since the update before the last one.
    pub fn was_pressed(&self) -> bool {
        self.button && !self.prev_button
    }

    /// Released since the update before the last one.
    pub fn was_released(&self) -> bool {
        !self.button && self.prev_button
    }
}

impl<I2C, D, const N: usize> Deref for MiniScales<I2C, D, N> {
    type Target = WeightI2c<I2C, D, N>;

    fn deref(&self) -> &Self::Target {
        &self.unit
    }
}

impl<I2C, D, const N: usize> DerefMut for MiniScales<I2C, D, N> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.unit
    }
}

impl<I2C, D, const N: usize> PeriodicMeasurement for MiniScales<I2C, D, N>
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

    /// Sample weight if due, then refresh the button state.
    fn update(&mut self, now_ms: u64, force: bool) -> Result<(), Self::Error> {
        let measured = self.unit.update(now_ms, force);
        if self.manage_button_status {
            self.prev_button = self.button;
            let status = self.read_button_status();
            self.button = matches!(status, Ok(true));
            status?;
        }
        measured
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

impl<I2C, D, const N: usize> RgbLed for MiniScales<I2C, D, N>
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
