#![cfg(not(feature = "async"))]

#[path = "common.rs"]
mod common;

use common::{create_driver, done, RegisterFile, LTC2943_ADDR};
use embedded_hal::i2c::ErrorKind;
use embedded_hal_mock::eh1::i2c::Transaction as I2cTransaction;
use ltc2943_async_rs::{registers::Register, ChargeStatus, Error, Status, TempStatus};

fn read_status(value: u8) -> I2cTransaction {
    I2cTransaction::write_read(LTC2943_ADDR, vec![Register::Status as u8], vec![value])
}

#[test]
fn test_check_temp_alert() {
    let cases = [
        (0x00, TempStatus::Ok),
        (0x10, TempStatus::Alert),
        (0xEF, TempStatus::Ok),
        (0xFF, TempStatus::Alert),
    ];
    for (status, expected) in cases {
        let mut driver = create_driver(&[read_status(status)]);
        assert_eq!(driver.check_temp_alert(), Ok(expected));
        done(driver);
    }
}

#[test]
fn test_check_charge_status_all_combinations() {
    let cases = [
        (0x00, ChargeStatus::Ok),
        (0x08, ChargeStatus::High),
        (0x04, ChargeStatus::Low),
        (0x0C, ChargeStatus::Invalid),
    ];
    for (status, expected) in cases {
        let mut driver = create_driver(&[read_status(status)]);
        assert_eq!(driver.check_charge_status(), Ok(expected));
        done(driver);

        // Unrelated status bits must not change the outcome
        let mut driver = create_driver(&[read_status(status | 0x73)]);
        assert_eq!(driver.check_charge_status(), Ok(expected));
        done(driver);
    }
}

#[test]
fn test_status_read_failure() {
    let mut driver = create_driver(&[
        read_status(0x00).with_error(ErrorKind::Other),
        read_status(0x00).with_error(ErrorKind::Other),
        read_status(0x00).with_error(ErrorKind::Other),
    ]);
    assert_eq!(driver.check_temp_alert(), Err(Error::Read(ErrorKind::Other)));
    assert_eq!(
        driver.check_charge_status(),
        Err(Error::Read(ErrorKind::Other))
    );
    assert_eq!(driver.read_status(), Err(Error::Read(ErrorKind::Other)));
    done(driver);
}

#[test]
fn test_read_status() {
    let mut driver = create_driver(&[read_status(0b0010_1010)]);
    assert_eq!(
        driver.read_status(),
        Ok(Status {
            current_alert: false,
            charge_overflow: true,
            temperature_alert: false,
            charge_alert_high: true,
            charge_alert_low: false,
            voltage_alert: true,
            undervoltage_lockout: false,
        })
    );
    done(driver);
}

#[test]
fn test_status_checks_do_not_write() {
    let mut driver = RegisterFile::new().with(0x00, 0x1C).driver();
    assert_eq!(driver.check_temp_alert(), Ok(TempStatus::Alert));
    assert_eq!(driver.check_charge_status(), Ok(ChargeStatus::Invalid));

    let chip = driver.release();
    assert!(chip.writes.is_empty());
}
