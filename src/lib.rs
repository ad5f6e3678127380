#![no_std]

#[macro_use]
extern crate uom;

#[cfg(feature = "defmt")]
extern crate defmt;

use core::ops::Deref;

#[cfg(not(feature = "async"))]
use embedded_hal::i2c::I2c;
#[cfg(feature = "async")]
use embedded_hal_async::i2c::I2c;

pub mod registers;
use registers::*; // Import field masks and helpers

pub mod data_types;
pub mod errors;
pub mod units;

pub use data_types::{
    AdcMode, ChargeScale, ChargeStatus, ChargeThresholds, GaugeConfig, Prescaler, Status,
    TempStatus,
};
pub use errors::Error;

use crate::units::ElectricCharge;

/// Default 7-bit I2C address of the LTC2943.
pub const LTC2943_ADDR: u8 = 0x64;

/// LTC2943 driver
pub struct Ltc2943<I2C>
where
    I2C: I2c,
{
    address: u8,
    i2c: I2C,
}

#[maybe_async_cfg::maybe(
    sync(cfg(not(feature = "async")), self = "RegisterAccess",),
    async(feature = "async", keep_self)
)]
#[allow(async_fn_in_trait)]
/// Trait for abstracting byte-level register access.
pub trait RegisterAccess<E>
where
    Self: Sized,
{
    /// The buffer type used for reading multiple registers.
    type ReadBuffer: Deref<Target = [u8]>;

    /// Reads a single byte from the specified register.
    async fn read_register(&mut self, reg: Register) -> Result<u8, Error<E>>;

    /// Reads `len` consecutive registers starting at `reg`.
    async fn read_registers(
        &mut self,
        reg: Register,
        len: usize,
    ) -> Result<Self::ReadBuffer, Error<E>>;

    /// Writes a single byte to the specified register.
    async fn write_register(&mut self, reg: Register, value: u8) -> Result<(), Error<E>>;
}

#[maybe_async_cfg::maybe(
    sync(cfg(not(feature = "async")), self = "Ltc2943",),
    async(feature = "async", keep_self)
)]
impl<I2C, E> Ltc2943<I2C>
where
    I2C: I2c<Error = E>,
{
    /// Creates a new instance of the LTC2943 driver.
    ///
    /// # Arguments
    ///
    /// * `i2c` - The I2C peripheral.
    /// * `address` - The I2C address of the LTC2943 chip, usually [`LTC2943_ADDR`].
    pub fn new(i2c: I2C, address: u8) -> Self {
        Self { address, i2c }
    }

    /// Destroys the driver and returns the I2C peripheral.
    pub fn release(self) -> I2C {
        self.i2c
    }
}

#[maybe_async_cfg::maybe(
    sync(cfg(not(feature = "async")), self = "Ltc2943",),
    async(feature = "async", keep_self)
)]
impl<I2C, E> RegisterAccess<E> for Ltc2943<I2C>
where
    I2C: I2c<Error = E>,
{
    type ReadBuffer = heapless::Vec<u8, REGISTER_COUNT>;

    async fn read_register(&mut self, reg: Register) -> Result<u8, Error<E>> {
        let mut data = [0u8; 1];
        self.i2c
            .write_read(self.address, &[reg as u8], &mut data)
            .await
            .map_err(Error::Read)?;
        Ok(data[0])
    }

    async fn read_registers(
        &mut self,
        reg: Register,
        len: usize,
    ) -> Result<Self::ReadBuffer, Error<E>> {
        if len == 0 || reg as usize + len > REGISTER_COUNT {
            #[cfg(feature = "defmt")]
            defmt::error!("Invalid read length {} from {}", len, reg);
            return Err(Error::InvalidData);
        }

        let mut data: heapless::Vec<u8, REGISTER_COUNT> = heapless::Vec::new();
        data.resize(len, 0).map_err(|_| Error::InvalidData)?;
        // The address pointer auto-increments after every byte.
        self.i2c
            .write_read(self.address, &[reg as u8], &mut data)
            .await
            .map_err(Error::Read)?;
        Ok(data)
    }

    async fn write_register(&mut self, reg: Register, value: u8) -> Result<(), Error<E>> {
        self.i2c
            .write(self.address, &[reg as u8, value])
            .await
            .map_err(Error::Write)
    }
}

// Generic impl block for methods that use RegisterAccess
#[maybe_async_cfg::maybe(
    sync(cfg(not(feature = "async")), self = "Ltc2943",),
    async(feature = "async", keep_self)
)]
impl<I2C, E> Ltc2943<I2C>
where
    I2C: I2c<Error = E>,
    Self: RegisterAccess<E>,
{
    /// Checks that the chip answers on the bus by reading the status register.
    ///
    /// Call once before anything else; a failure here means no other operation can succeed.
    pub async fn init(&mut self) -> Result<(), Error<E>> {
        let _status = self.read_register(Register::Status).await?;
        #[cfg(feature = "defmt")]
        defmt::info!(
            "LTC2943 at 0x{:02x} responded, status = 0x{:02x}",
            self.address,
            _status
        );
        Ok(())
    }

    /// Read-modify-write of one field. Nothing is written when the field already holds `field`.
    ///
    /// Another bus master touching `reg` between the read and the write loses its change.
    async fn update_field(&mut self, reg: Register, mask: u8, field: u8) -> Result<(), Error<E>> {
        let current = self.read_register(reg).await?;
        if extract_field(current, mask) == extract_field(field, mask) {
            #[cfg(feature = "defmt")]
            defmt::debug!("{} field 0x{:02x} unchanged, skipping write", reg, mask);
            return Ok(());
        }

        let updated = merge_field(current, mask, field);
        #[cfg(feature = "defmt")]
        defmt::debug!("{}: 0x{:02x} -> 0x{:02x}", reg, current, updated);
        self.write_register(reg, updated).await
    }

    /// Reads the ADC mode from the control register.
    pub async fn get_adc_mode(&mut self) -> Result<AdcMode, Error<E>> {
        let control = self.read_register(Register::Control).await?;
        let bits = extract_field(control, CONTROL_ADC_MODE);
        AdcMode::from_bits(bits).ok_or(Error::UnmappedField {
            register: Register::Control,
            bits,
        })
    }

    /// Sets the ADC mode, leaving the other control bits alone.
    ///
    /// No write is issued if the chip is already in `mode`.
    pub async fn set_adc_mode(&mut self, mode: AdcMode) -> Result<(), Error<E>> {
        self.update_field(Register::Control, CONTROL_ADC_MODE, mode.bits())
            .await
    }

    /// Reads the coulomb counter prescaler from the control register.
    pub async fn get_prescaler(&mut self) -> Result<Prescaler, Error<E>> {
        let control = self.read_register(Register::Control).await?;
        let bits = extract_field(control, CONTROL_PRESCALER);
        Prescaler::from_bits(bits).ok_or(Error::UnmappedField {
            register: Register::Control,
            bits,
        })
    }

    /// Sets the coulomb counter prescaler. Same write avoidance as [`Self::set_adc_mode`].
    pub async fn set_prescaler(&mut self, prescaler: Prescaler) -> Result<(), Error<E>> {
        self.update_field(Register::Control, CONTROL_PRESCALER, prescaler.bits())
            .await
    }

    /// Reads the temperature alert bit from the status register.
    pub async fn check_temp_alert(&mut self) -> Result<TempStatus, Error<E>> {
        let status = self.read_register(Register::Status).await?;
        let bits = extract_field(status, STATUS_TEMP_ALERT);
        TempStatus::from_bits(bits).ok_or(Error::UnmappedField {
            register: Register::Status,
            bits,
        })
    }

    /// Reads the charge alert bits from the status register.
    ///
    /// Both alerts set at once is reported as [`ChargeStatus::Invalid`].
    pub async fn check_charge_status(&mut self) -> Result<ChargeStatus, Error<E>> {
        let status = self.read_register(Register::Status).await?;
        let bits = extract_field(status, STATUS_CHARGE_ALERT);
        let charge_status = ChargeStatus::from_bits(bits).ok_or(Error::UnmappedField {
            register: Register::Status,
            bits,
        })?;
        #[cfg(feature = "defmt")]
        {
            if charge_status == ChargeStatus::Invalid {
                defmt::warn!("Charge alert high and low are both set");
            }
        }
        Ok(charge_status)
    }

    /// Reads all status register flags.
    pub async fn read_status(&mut self) -> Result<Status, Error<E>> {
        let status_byte = self.read_register(Register::Status).await?;
        Ok(Status::new(status_byte))
    }

    /// Writes the raw charge thresholds, MSB first: E, F (max) then G, H (min).
    ///
    /// The four writes are not atomic. If one fails the remaining ones are skipped and
    /// the chip is left with a mix of old and new threshold bytes.
    pub async fn set_charge_threshold(&mut self, min: u16, max: u16) -> Result<(), Error<E>> {
        let (max_hi, max_lo) = split_u16(max);
        let (min_hi, min_lo) = split_u16(min);

        self.write_register(Register::ChargeThresholdHighMsb, max_hi)
            .await?;
        self.write_register(Register::ChargeThresholdHighLsb, max_lo)
            .await?;
        self.write_register(Register::ChargeThresholdLowMsb, min_hi)
            .await?;
        self.write_register(Register::ChargeThresholdLowLsb, min_lo)
            .await?;

        #[cfg(feature = "defmt")]
        defmt::debug!("Charge thresholds set: min=0x{:04x}, max=0x{:04x}", min, max);
        Ok(())
    }

    /// Converts physical charge bounds with `scale` and writes them as raw thresholds.
    pub async fn set_charge_threshold_scaled(
        &mut self,
        min: ElectricCharge,
        max: ElectricCharge,
        scale: &ChargeScale,
    ) -> Result<(), Error<E>> {
        self.set_charge_threshold(scale.counts(min), scale.counts(max))
            .await
    }

    /// Reads both raw charge thresholds in one block read.
    pub async fn read_charge_threshold(&mut self) -> Result<ChargeThresholds, Error<E>> {
        let raw = self
            .read_registers(Register::ChargeThresholdHighMsb, 4)
            .await?;
        Ok(ChargeThresholds {
            max: combine_u16(raw[0], raw[1]),
            min: combine_u16(raw[2], raw[3]),
        })
    }

    /// Reads the raw accumulated charge register (C/D).
    pub async fn read_accumulated_charge(&mut self) -> Result<u16, Error<E>> {
        let raw = self
            .read_registers(Register::AccumulatedChargeMsb, 2)
            .await?;
        Ok(combine_u16(raw[0], raw[1]))
    }

    /// Reads the accumulated charge and converts it with `scale`.
    pub async fn read_accumulated_charge_scaled(
        &mut self,
        scale: &ChargeScale,
    ) -> Result<ElectricCharge, Error<E>> {
        let raw = self.read_accumulated_charge().await?;
        Ok(scale.charge(raw))
    }

    /// Applies `config` to the chip.
    ///
    /// ADC mode and prescaler share one read-modify-write of the control register, which
    /// is skipped when both already match. Thresholds are written only when present.
    pub async fn set_config(&mut self, config: &GaugeConfig) -> Result<(), Error<E>> {
        let fields = config.adc_mode.bits() | config.prescaler.bits();
        self.update_field(Register::Control, CONTROL_ADC_MODE | CONTROL_PRESCALER, fields)
            .await?;

        if let Some(thresholds) = config.charge_thresholds {
            self.set_charge_threshold(thresholds.min, thresholds.max)
                .await?;
        }

        Ok(())
    }
}
