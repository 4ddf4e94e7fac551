//! Full begin / periodic / consume cycle against a mocked bus.

use embedded_hal_mock::eh1::delay::NoopDelay;
use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTransaction};

use unit_weight::weight_i2c::registers;
use unit_weight::{Config, Mode, PeriodicMeasurement, WeightI2c, DEFAULT_ADDRESS};

const STORED: usize = 8;

fn begin_transactions(lp: u8, avg: u8, ema: u8) -> Vec<I2cTransaction> {
    vec![
        I2cTransaction::write_read(DEFAULT_ADDRESS, vec![registers::FIRMWARE_VERSION], vec![0x02]),
        I2cTransaction::write(DEFAULT_ADDRESS, vec![registers::FILTER_LP, lp]),
        I2cTransaction::write(DEFAULT_ADDRESS, vec![registers::FILTER_AVG, avg]),
        I2cTransaction::write(DEFAULT_ADDRESS, vec![registers::FILTER_EMA, ema]),
    ]
}

#[test]
fn periodic_fill_and_drain() {
    let mut expectations = begin_transactions(1, 10, 10);
    // two more samples than fit, the first two get evicted
    for i in 0..(STORED as i32 + 2) {
        expectations.push(I2cTransaction::write_read(
            DEFAULT_ADDRESS,
            vec![registers::WEIGHTX100_INT],
            (i * 100).to_le_bytes().to_vec(),
        ));
    }
    let i2c = I2cMock::new(&expectations);
    let mut handle = i2c.clone();

    let mut unit: WeightI2c<_, _, STORED> = WeightI2c::with_default_address(i2c, NoopDelay::new());
    unit.set_config(Config {
        mode: Mode::Int,
        interval: 20,
        ..Default::default()
    });
    unit.begin().unwrap();
    assert!(unit.in_periodic());
    assert_eq!(unit.interval(), 20);

    let mut now = 0u64;
    let mut taken = 0;
    while taken < STORED + 2 {
        unit.update(now, false).unwrap();
        if unit.updated() {
            taken += 1;
        }
        now += 5;
    }
    unit.stop_periodic_measurement().unwrap();
    assert!(!unit.in_periodic());

    assert!(unit.is_full());
    assert_eq!(unit.available(), STORED);
    assert_eq!(unit.iweight(), 200);

    for _ in 0..4 {
        assert!(unit.weight().is_nan());
        unit.discard();
        assert!(!unit.is_empty());
        assert!(!unit.is_full());
    }
    assert_eq!(unit.available(), 4);
    assert_eq!(unit.iweight(), 600);
    assert_eq!(unit.latest().map(|d| d.iweight()), Some(900));

    unit.flush();
    assert_eq!(unit.available(), 0);
    assert!(unit.is_empty());
    assert!(unit.weight().is_nan());
    assert_eq!(unit.iweight(), i32::MIN);

    handle.done();
}

#[test]
fn begin_twice_needs_stop() {
    let mut expectations = begin_transactions(1, 10, 10);
    expectations.extend(begin_transactions(1, 10, 10));
    expectations.extend(begin_transactions(0, 34, 56));
    let i2c = I2cMock::new(&expectations);
    let mut handle = i2c.clone();

    let mut unit: WeightI2c<_, _> = WeightI2c::with_default_address(i2c, NoopDelay::new());
    unit.begin().unwrap();
    assert_eq!(
        unit.begin(),
        Err(unit_weight::Error::PeriodicRunning),
        "periodic is already running"
    );

    unit.stop_periodic_measurement().unwrap();
    unit.set_config(Config {
        lp_enable: false,
        avg_filter_level: 34,
        ema_filter_alpha: 56,
        interval: 78,
        ..Default::default()
    });
    unit.begin().unwrap();
    assert_eq!(unit.interval(), 78);

    handle.done();
}
