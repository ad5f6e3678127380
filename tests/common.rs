#![allow(dead_code)]
#![cfg(not(feature = "async"))]

use embedded_hal::i2c::{ErrorKind, ErrorType, I2c, Operation};
use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTransaction};
use ltc2943_async_rs::{registers::REGISTER_COUNT, Ltc2943};

pub use ltc2943_async_rs::LTC2943_ADDR;

/// Helper function to create a driver over a scripted I2C mock.
pub fn create_driver(expectations: &[I2cTransaction]) -> Ltc2943<I2cMock> {
    Ltc2943::new(I2cMock::new(expectations), LTC2943_ADDR)
}

/// Consumes the driver and verifies that all expected transactions occurred.
pub fn done(driver: Ltc2943<I2cMock>) {
    let mut i2c = driver.release();
    i2c.done();
}

/// In-memory LTC2943 register file behind an I2C bus.
///
/// Honors the chip's auto-incrementing address pointer and records every byte written,
/// so tests can check what reached the chip rather than how it was framed.
pub struct RegisterFile {
    pub regs: [u8; REGISTER_COUNT],
    /// Every `(register, value)` written, in order.
    pub writes: Vec<(u8, u8)>,
    /// Fail every read phase.
    pub fail_reads: bool,
    /// Fail the write that would become entry `n` of `writes`.
    pub fail_write_at: Option<usize>,
    pointer: usize,
}

impl RegisterFile {
    pub fn new() -> Self {
        let mut regs = [0u8; REGISTER_COUNT];
        // Power-on defaults: prescaler 4096, ALCC alert mode, thresholds 0xFFFF/0x0000
        regs[0x01] = 0x3C;
        regs[0x02] = 0x7F;
        regs[0x03] = 0xFF;
        regs[0x04] = 0xFF;
        regs[0x05] = 0xFF;
        Self {
            regs,
            writes: Vec::new(),
            fail_reads: false,
            fail_write_at: None,
            pointer: 0,
        }
    }

    pub fn with(mut self, reg: u8, value: u8) -> Self {
        self.regs[reg as usize] = value;
        self
    }

    pub fn driver(self) -> Ltc2943<RegisterFile> {
        Ltc2943::new(self, LTC2943_ADDR)
    }
}

impl ErrorType for RegisterFile {
    type Error = ErrorKind;
}

impl I2c for RegisterFile {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        if address != LTC2943_ADDR {
            return Err(ErrorKind::NoAcknowledge(
                embedded_hal::i2c::NoAcknowledgeSource::Address,
            ));
        }

        for operation in operations.iter_mut() {
            match operation {
                Operation::Write(bytes) => {
                    let (reg, data) = bytes.split_first().ok_or(ErrorKind::Other)?;
                    self.pointer = *reg as usize;
                    for value in data {
                        if self.fail_write_at == Some(self.writes.len()) {
                            return Err(ErrorKind::Other);
                        }
                        let reg = self.pointer % REGISTER_COUNT;
                        self.regs[reg] = *value;
                        self.writes.push((reg as u8, *value));
                        self.pointer += 1;
                    }
                }
                Operation::Read(buffer) => {
                    if self.fail_reads {
                        return Err(ErrorKind::Other);
                    }
                    for byte in buffer.iter_mut() {
                        *byte = self.regs[self.pointer % REGISTER_COUNT];
                        self.pointer += 1;
                    }
                }
            }
        }
        Ok(())
    }
}
