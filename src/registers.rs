#[cfg(feature = "defmt")]
use defmt::Format;

/// LTC2943 register map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(Format))]
#[repr(u8)]
pub enum Register {
    /// Status Register (A)
    Status = 0x00,
    /// Control Register (B)
    Control = 0x01,
    /// Accumulated Charge MSB (C)
    AccumulatedChargeMsb = 0x02,
    /// Accumulated Charge LSB (D)
    AccumulatedChargeLsb = 0x03,
    /// Charge Threshold High MSB (E)
    ChargeThresholdHighMsb = 0x04,
    /// Charge Threshold High LSB (F)
    ChargeThresholdHighLsb = 0x05,
    /// Charge Threshold Low MSB (G)
    ChargeThresholdLowMsb = 0x06,
    /// Charge Threshold Low LSB (H)
    ChargeThresholdLowLsb = 0x07,
    /// Voltage MSB (I)
    VoltageMsb = 0x08,
    /// Voltage LSB (J)
    VoltageLsb = 0x09,
    /// Voltage Threshold High MSB (K)
    VoltageThresholdHighMsb = 0x0A,
    /// Voltage Threshold High LSB (L)
    VoltageThresholdHighLsb = 0x0B,
    /// Voltage Threshold Low MSB (M)
    VoltageThresholdLowMsb = 0x0C,
    /// Voltage Threshold Low LSB (N)
    VoltageThresholdLowLsb = 0x0D,
    /// Current MSB (O)
    CurrentMsb = 0x0E,
    /// Current LSB (P)
    CurrentLsb = 0x0F,
    /// Current Threshold High MSB (Q)
    CurrentThresholdHighMsb = 0x10,
    /// Current Threshold High LSB (R)
    CurrentThresholdHighLsb = 0x11,
    /// Current Threshold Low MSB (S)
    CurrentThresholdLowMsb = 0x12,
    /// Current Threshold Low LSB (T)
    CurrentThresholdLowLsb = 0x13,
    /// Temperature MSB (U)
    TemperatureMsb = 0x14,
    /// Temperature LSB (V)
    TemperatureLsb = 0x15,
    /// Temperature Threshold High (W)
    TemperatureThresholdHigh = 0x16,
    /// Temperature Threshold Low (X)
    TemperatureThresholdLow = 0x17,
}

/// Number of addressable registers, the upper bound for a block read.
pub const REGISTER_COUNT: usize = 0x18;

// STATUS register bit masks
pub const STATUS_CURRENT_ALERT: u8 = 1 << 6;
pub const STATUS_ACR_OVERFLOW: u8 = 1 << 5;
pub const STATUS_TEMP_ALERT: u8 = 1 << 4;
pub const STATUS_CHARGE_ALERT_HIGH: u8 = 1 << 3;
pub const STATUS_CHARGE_ALERT_LOW: u8 = 1 << 2;
pub const STATUS_VOLTAGE_ALERT: u8 = 1 << 1;
pub const STATUS_UVLO_ALERT: u8 = 1 << 0;
pub const STATUS_CHARGE_ALERT: u8 = STATUS_CHARGE_ALERT_HIGH | STATUS_CHARGE_ALERT_LOW;

// CONTROL register field masks
pub const CONTROL_ADC_MODE: u8 = 0b11 << 6; // ADC mode [7:6]
pub const CONTROL_PRESCALER: u8 = 0b111 << 3; // Prescaler M [5:3]
pub const CONTROL_ALCC: u8 = 0b11 << 1; // ALCC configure [2:1]
pub const CONTROL_SHUTDOWN: u8 = 1 << 0;

const _: () = assert!(STATUS_TEMP_ALERT & STATUS_CHARGE_ALERT == 0);
const _: () = assert!(
    CONTROL_ADC_MODE & CONTROL_PRESCALER == 0
        && (CONTROL_ADC_MODE | CONTROL_PRESCALER) & (CONTROL_ALCC | CONTROL_SHUTDOWN) == 0
        && CONTROL_ALCC & CONTROL_SHUTDOWN == 0
);

/// Returns the bits of `value` selected by `mask`.
#[inline]
pub const fn extract_field(value: u8, mask: u8) -> u8 {
    value & mask
}

/// Replaces the bits of `value` selected by `mask` with the same bits of `field`.
///
/// Bits outside `mask` are kept as they are, bits of `field` outside `mask` are ignored.
#[inline]
pub const fn merge_field(value: u8, mask: u8, field: u8) -> u8 {
    (value & !mask) | (field & mask)
}

/// Splits a 16-bit value into its (MSB, LSB) register pair.
#[inline]
pub const fn split_u16(value: u16) -> (u8, u8) {
    let [hi, lo] = value.to_be_bytes();
    (hi, lo)
}

/// Joins an (MSB, LSB) register pair into a 16-bit value.
#[inline]
pub const fn combine_u16(hi: u8, lo: u8) -> u16 {
    u16::from_be_bytes([hi, lo])
}
