#![no_std]
//! Drivers for the M5Stack Weight I2C load cell unit and its scale variants.
//!
//! All drivers are generic over an [`embedded_hal::i2c::I2c`] bus and an
//! [`embedded_hal::delay::DelayNs`]. Periodic measurement is driven by the
//! caller passing the current time in milliseconds to
//! [`PeriodicMeasurement::update`].

pub mod buffer;
mod error;
pub mod led;
pub mod mini_scales;
pub mod miniscale;
pub mod weight_i2c;

pub use error::Error;
pub use led::{Rgb, RgbLed};
pub use mini_scales::MiniScales;
pub use miniscale::Miniscale;
pub use weight_i2c::{Config, Data, Mode, WeightI2c, DEFAULT_ADDRESS};

/// Periodic measurement with a bounded buffer of samples.
pub trait PeriodicMeasurement {
    type Mode;
    type Data;
    type Error;

    /// Start sampling every `interval_ms` in `mode`.
    /// Fails if periodic measurement is already running.
    fn start_periodic_measurement(
        &mut self,
        mode: Self::Mode,
        interval_ms: u32,
    ) -> Result<(), Self::Error>;

    fn stop_periodic_measurement(&mut self) -> Result<(), Self::Error>;

    fn in_periodic(&self) -> bool;

    /// Sampling interval in milliseconds.
    fn interval(&self) -> u32;

    /// Take a sample if one is due at `now_ms`, or unconditionally if `force`.
    fn update(&mut self, now_ms: u64, force: bool) -> Result<(), Self::Error>;

    /// Whether the last [`update`](Self::update) stored a new sample.
    fn updated(&self) -> bool;

    /// Number of buffered samples.
    fn available(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.available() == 0
    }

    fn is_full(&self) -> bool;

    fn oldest(&self) -> Option<Self::Data>;

    fn latest(&self) -> Option<Self::Data>;

    /// Drop the oldest sample.
    fn discard(&mut self);

    /// Drop all samples.
    fn flush(&mut self);
}
