//! Driver for the Weight I2C unit.

pub mod registers;

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;
use heapless::String;
use log::{debug, error, trace};

use crate::buffer::SampleBuffer;
use crate::{Error, PeriodicMeasurement};

use registers::*;

pub const DEFAULT_ADDRESS: u8 = 0x26;
/// Time the unit needs to store a new gap value.
pub const DEFAULT_GAP_DURATION_MS: u32 = 100;
pub const AVG_FILTER_LEVEL_MAX: u8 = 50;
pub const EMA_FILTER_ALPHA_MAX: u8 = 99;

const I2C_ADDRESS_MIN: u8 = 0x08;
const I2C_ADDRESS_MAX: u8 = 0x77;
const ADDRESS_CHANGE_TIMEOUT_MS: u32 = 1000;
// longest register write payload (gap, f32)
const MAX_WRITE_LEN: usize = 4;

struct WriteLen<const L: usize>;

impl<const L: usize> WriteLen<L> {
    const FITS: () = assert!(L <= MAX_WRITE_LEN, "register payload longer than 4 bytes");
}

/// Measurement mode
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Mode {
    /// Calibrated weight as f32
    #[default]
    Float,
    /// Weight x100 as i32
    Int,
}

impl Mode {
    const fn register(self) -> u8 {
        match self {
            Mode::Float => WEIGHT,
            Mode::Int => WEIGHTX100_INT,
        }
    }
}

/// One measurement sample.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Data {
    pub raw: [u8; 4],
    pub is_float: bool,
}

impl Data {
    /// Weight, or NaN if the sample was taken in [`Mode::Int`].
    pub fn weight(&self) -> f32 {
        if self.is_float {
            f32::from_le_bytes(self.raw)
        } else {
            f32::NAN
        }
    }

    /// Weight x100, or `i32::MIN` if the sample was taken in [`Mode::Float`].
    pub fn iweight(&self) -> i32 {
        if self.is_float {
            i32::MIN
        } else {
            i32::from_le_bytes(self.raw)
        }
    }
}

/// Settings applied by [`WeightI2c::begin`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    /// Enable the low-pass filter
    pub lp_enable: bool,
    /// Averaging filter level (0-50)
    pub avg_filter_level: u8,
    /// Exponential moving average filter alpha (0-99)
    pub ema_filter_alpha: u8,
    /// Start periodic measurement on begin
    pub start_periodic: bool,
    /// Periodic mode if started on begin
    pub mode: Mode,
    /// Periodic interval in ms
    pub interval: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            lp_enable: true,
            avg_filter_level: 10,
            ema_filter_alpha: 10,
            start_periodic: true,
            mode: Mode::Float,
            interval: 80,
        }
    }
}

/// Weight I2C unit, buffering up to `N` periodic samples.
pub struct WeightI2c<I2C, D, const N: usize = 1> {
    i2c: I2C,
    delay: D,
    address: u8,
    config: Config,
    mode: Mode,
    periodic: bool,
    interval: u32,
    latest_at: Option<u64>,
    updated: bool,
    data: SampleBuffer<Data, N>,
}

impl<I2C, D, const N: usize> WeightI2c<I2C, D, N>
where
    I2C: I2c,
    D: DelayNs,
{
    pub fn new(i2c: I2C, delay: D, address: u8) -> Self {
        Self {
            i2c,
            delay,
            address,
            config: Config::default(),
            mode: Mode::Float,
            periodic: false,
            interval: 0,
            latest_at: None,
            updated: false,
            data: SampleBuffer::new(),
        }
    }

    pub fn with_default_address(i2c: I2C, delay: D) -> Self {
        Self::new(i2c, delay, DEFAULT_ADDRESS)
    }

    /// Give back the bus and delay.
    pub fn release(self) -> (I2C, D) {
        (self.i2c, self.delay)
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    pub fn config(&self) -> Config {
        self.config
    }

    /// Takes effect on the next [`begin`](Self::begin).
    pub fn set_config(&mut self, config: Config) {
        self.config = config;
    }

    /// Check the unit is present, apply the filter settings and optionally
    /// start periodic measurement.
    pub fn begin(&mut self) -> Result<(), Error<I2C::Error>> {
        let version = match self.read_firmware_version() {
            Ok(v) => v,
            Err(e) => {
                error!("Failed to read firmware version");
                return Err(e);
            }
        };
        if version == 0 {
            error!("Failed to read firmware version {version:#x}");
            return Err(Error::NotDetected);
        }
        debug!("firmware: {version:#x}");

        let cfg = self.config;
        self.enable_lp_filter(cfg.lp_enable)?;
        self.write_avg_filter_level(cfg.avg_filter_level)?;
        self.write_ema_filter_alpha(cfg.ema_filter_alpha)?;

        if cfg.start_periodic {
            self.start_periodic_measurement(cfg.mode, cfg.interval)
        } else {
            Ok(())
        }
    }

    /// Oldest buffered weight, NaN when empty or sampled in [`Mode::Int`].
    pub fn weight(&self) -> f32 {
        self.data.oldest().map_or(f32::NAN, |d| d.weight())
    }

    /// Oldest buffered weight x100, `i32::MIN` when empty or sampled in
    /// [`Mode::Float`].
    pub fn iweight(&self) -> i32 {
        self.data.oldest().map_or(i32::MIN, |d| d.iweight())
    }

    /// Read one sample outside of periodic measurement.
    pub fn measure_singleshot(&mut self, mode: Mode) -> Result<Data, Error<I2C::Error>> {
        self.ensure_not_periodic()?;
        self.read_measurement(mode)
    }

    /// Read the weight as the unit formats it.
    pub fn measure_singleshot_text(
        &mut self,
    ) -> Result<String<WEIGHT_STRING_LEN>, Error<I2C::Error>> {
        self.ensure_not_periodic()?;
        let mut buf = [0u8; WEIGHT_STRING_LEN];
        self.read_register(WEIGHTX100_STRING, &mut buf)?;

        let len = buf.iter().position(|&b| b == 0).unwrap_or(buf.len());
        let text = core::str::from_utf8(&buf[..len]).map_err(|_| Error::InvalidText)?;
        let mut out = String::new();
        out.push_str(text).map_err(|_| Error::InvalidText)?;
        Ok(out)
    }

    pub fn read_gap(&mut self) -> Result<f32, Error<I2C::Error>> {
        let mut buf = [0u8; 4];
        self.read_register(GAP, &mut buf)?;
        Ok(f32::from_le_bytes(buf))
    }

    /// Write the calibration gap and wait `duration_ms` for the unit to
    /// store it, see [`DEFAULT_GAP_DURATION_MS`].
    pub fn write_gap(&mut self, gap: f32, duration_ms: u32) -> Result<(), Error<I2C::Error>> {
        self.write_register(GAP, &gap.to_le_bytes())?;
        self.delay.delay_ms(duration_ms);
        Ok(())
    }

    /// Zero the scale at the current load.
    pub fn reset_offset(&mut self) -> Result<(), Error<I2C::Error>> {
        self.write_register(OFFSET, &[0x01])
    }

    pub fn is_enabled_lp_filter(&mut self) -> Result<bool, Error<I2C::Error>> {
        Ok(self.read_register8(FILTER_LP)? != 0)
    }

    pub fn enable_lp_filter(&mut self, enable: bool) -> Result<(), Error<I2C::Error>> {
        self.write_register(FILTER_LP, &[enable as u8])
    }

    pub fn read_avg_filter_level(&mut self) -> Result<u8, Error<I2C::Error>> {
        self.read_register8(FILTER_AVG)
    }

    pub fn write_avg_filter_level(&mut self, level: u8) -> Result<(), Error<I2C::Error>> {
        check_range(level, AVG_FILTER_LEVEL_MAX)?;
        self.write_register(FILTER_AVG, &[level])
    }

    pub fn read_ema_filter_alpha(&mut self) -> Result<u8, Error<I2C::Error>> {
        self.read_register8(FILTER_EMA)
    }

    pub fn write_ema_filter_alpha(&mut self, alpha: u8) -> Result<(), Error<I2C::Error>> {
        check_range(alpha, EMA_FILTER_ALPHA_MAX)?;
        self.write_register(FILTER_EMA, &[alpha])
    }

    pub fn read_raw_adc(&mut self) -> Result<i32, Error<I2C::Error>> {
        let mut buf = [0u8; 4];
        self.read_register(RAW_ADC, &mut buf)?;
        Ok(i32::from_le_bytes(buf))
    }

    pub fn read_firmware_version(&mut self) -> Result<u8, Error<I2C::Error>> {
        self.read_register8(FIRMWARE_VERSION)
    }

    pub fn read_i2c_address(&mut self) -> Result<u8, Error<I2C::Error>> {
        self.read_register8(I2C_ADDRESS)
    }

    /// Move the unit to `address` and wait until it answers there.
    ///
    /// The unit keeps the new address across power cycles.
    pub fn change_i2c_address(&mut self, address: u8) -> Result<(), Error<I2C::Error>> {
        if !(I2C_ADDRESS_MIN..=I2C_ADDRESS_MAX).contains(&address) {
            error!("Invalid address : {address:02X}");
            return Err(Error::InvalidAddress(address));
        }
        self.write_register(I2C_ADDRESS, &[address])?;
        self.address = address;

        // unit restarts, bus errors are expected until it is back
        for _ in 0..ADDRESS_CHANGE_TIMEOUT_MS {
            self.delay.delay_ms(1);
            if matches!(self.read_i2c_address(), Ok(a) if a == address) {
                debug!("address changed to {address:#04x}");
                return Ok(());
            }
        }
        Err(Error::Timeout)
    }

    pub(crate) fn read_register(
        &mut self,
        reg: u8,
        buf: &mut [u8],
    ) -> Result<(), Error<I2C::Error>> {
        self.i2c
            .write_read(self.address, &[reg], buf)
            .map_err(Error::I2c)?;
        trace!("read {reg:#04x} = {buf:02x?}");
        Ok(())
    }

    pub(crate) fn read_register8(&mut self, reg: u8) -> Result<u8, Error<I2C::Error>> {
        let mut buf = [0u8];
        self.read_register(reg, &mut buf)?;
        Ok(buf[0])
    }

    pub(crate) fn write_register<const L: usize>(
        &mut self,
        reg: u8,
        data: &[u8; L],
    ) -> Result<(), Error<I2C::Error>> {
        #[allow(clippy::let_unit_value)]
        let () = WriteLen::<L>::FITS;
        let mut buf = [0u8; MAX_WRITE_LEN + 1];
        buf[0] = reg;
        buf[1..=L].copy_from_slice(data);
        trace!("write {reg:#04x} = {data:02x?}");
        self.i2c
            .write(self.address, &buf[..=L])
            .map_err(Error::I2c)
    }

    fn read_measurement(&mut self, mode: Mode) -> Result<Data, Error<I2C::Error>> {
        let mut data = Data {
            raw: [0; 4],
            is_float: mode == Mode::Float,
        };
        self.read_register(mode.register(), &mut data.raw)?;
        Ok(data)
    }

    fn ensure_not_periodic(&self) -> Result<(), Error<I2C::Error>> {
        if self.periodic {
            debug!("Periodic measurements are running");
            return Err(Error::PeriodicRunning);
        }
        Ok(())
    }
}

fn check_range<E>(value: u8, max: u8) -> Result<(), Error<E>> {
    if value > max {
        error!("Must be 0-{max}, got {value}");
        return Err(Error::OutOfRange { value, max });
    }
    Ok(())
}

impl<I2C, D, const N: usize> PeriodicMeasurement for WeightI2c<I2C, D, N>
where
    I2C: I2c,
    D: DelayNs,
{
    type Mode = Mode;
    type Data = Data;
    type Error = Error<I2C::Error>;

    fn start_periodic_measurement(&mut self, mode: Mode, interval_ms: u32) -> Result<(), Self::Error> {
        self.ensure_not_periodic()?;
        self.mode = mode;
        self.interval = interval_ms;
        self.latest_at = None;
        self.periodic = true;
        debug!("periodic start {mode:?} every {interval_ms}ms");
        Ok(())
    }

    fn stop_periodic_measurement(&mut self) -> Result<(), Self::Error> {
        self.periodic = false;
        Ok(())
    }

    fn in_periodic(&self) -> bool {
        self.periodic
    }

    fn interval(&self) -> u32 {
        self.interval
    }

    fn update(&mut self, now_ms: u64, force: bool) -> Result<(), Self::Error> {
        self.updated = false;
        if !self.periodic {
            return Ok(());
        }
        let due = self
            .latest_at
            .map_or(true, |at| now_ms >= at.saturating_add(u64::from(self.interval)));
        if force || due {
            let data = self.read_measurement(self.mode)?;
            self.latest_at = Some(now_ms);
            self.data.push(data);
            self.updated = true;
        }
        Ok(())
    }

    fn updated(&self) -> bool {
        self.updated
    }

    fn available(&self) -> usize {
        self.data.len()
    }

    fn is_full(&self) -> bool {
        self.data.is_full()
    }

    fn oldest(&self) -> Option<Data> {
        self.data.oldest()
    }

    fn latest(&self) -> Option<Data> {
        self.data.latest()
    }

    fn discard(&mut self) {
        self.data.discard();
    }

    fn flush(&mut self) {
        self.data.flush();
    }
}
