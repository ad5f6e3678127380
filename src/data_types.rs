use crate::registers::*;
use crate::units::{ElectricCharge, ElectricalResistance};
use uom::si::electric_charge::milliampere_hour;
use uom::si::electrical_resistance::milliohm;

#[cfg(feature = "defmt")]
use defmt::Format;

/// ADC mode, stored in CONTROL[7:6].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(Format))]
#[repr(u8)]
pub enum AdcMode {
    /// Voltage, current and temperature are converted continuously.
    Automatic = 0b11 << 6,
    /// A conversion every 10 seconds.
    Scan = 0b10 << 6,
    /// A single conversion, then back to sleep.
    Manual = 0b01 << 6,
    /// ADC off, only the coulomb counter runs.
    Sleep = 0b00 << 6,
}

impl AdcMode {
    /// Field bits, aligned to [`CONTROL_ADC_MODE`].
    pub const fn bits(self) -> u8 {
        self as u8
    }

    /// Decodes masked CONTROL bits. Anything outside the four patterns is `None`.
    pub const fn from_bits(bits: u8) -> Option<Self> {
        match bits {
            0b1100_0000 => Some(Self::Automatic),
            0b1000_0000 => Some(Self::Scan),
            0b0100_0000 => Some(Self::Manual),
            0b0000_0000 => Some(Self::Sleep),
            _ => None,
        }
    }
}

/// Coulomb counter prescaler M, stored in CONTROL[5:3].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(Format))]
#[repr(u8)]
pub enum Prescaler {
    M1 = 0b000 << 3,
    M4 = 0b001 << 3,
    M16 = 0b010 << 3,
    M64 = 0b011 << 3,
    M256 = 0b100 << 3,
    M1024 = 0b101 << 3,
    /// Power-on default. Written as `0b111`, `0b110` reads back as the same factor.
    M4096 = 0b111 << 3,
}

impl Prescaler {
    /// Field bits, aligned to [`CONTROL_PRESCALER`].
    pub const fn bits(self) -> u8 {
        self as u8
    }

    /// Decodes masked CONTROL bits.
    pub const fn from_bits(bits: u8) -> Option<Self> {
        match bits {
            0b0000_0000 => Some(Self::M1),
            0b0000_1000 => Some(Self::M4),
            0b0001_0000 => Some(Self::M16),
            0b0001_1000 => Some(Self::M64),
            0b0010_0000 => Some(Self::M256),
            0b0010_1000 => Some(Self::M1024),
            0b0011_0000 | 0b0011_1000 => Some(Self::M4096),
            _ => None,
        }
    }

    /// The prescaling factor M.
    pub const fn factor(self) -> u16 {
        match self {
            Self::M1 => 1,
            Self::M4 => 4,
            Self::M16 => 16,
            Self::M64 => 64,
            Self::M256 => 256,
            Self::M1024 => 1024,
            Self::M4096 => 4096,
        }
    }
}

/// Charge alert state decoded from STATUS[3:2].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(Format))]
pub enum ChargeStatus {
    /// Accumulated charge is between the thresholds.
    Ok,
    /// Accumulated charge exceeded the high threshold.
    High,
    /// Accumulated charge dropped below the low threshold.
    Low,
    /// High and low alerts are both set. The chip should never report this.
    Invalid,
}

impl ChargeStatus {
    /// Decodes bits masked with [`STATUS_CHARGE_ALERT`].
    pub const fn from_bits(bits: u8) -> Option<Self> {
        match bits {
            0 => Some(Self::Ok),
            STATUS_CHARGE_ALERT_HIGH => Some(Self::High),
            STATUS_CHARGE_ALERT_LOW => Some(Self::Low),
            STATUS_CHARGE_ALERT => Some(Self::Invalid),
            _ => None,
        }
    }
}

/// Temperature alert state decoded from STATUS[4].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(Format))]
pub enum TempStatus {
    Ok,
    Alert,
}

impl TempStatus {
    /// Decodes bits masked with [`STATUS_TEMP_ALERT`].
    pub const fn from_bits(bits: u8) -> Option<Self> {
        match bits {
            0 => Some(Self::Ok),
            STATUS_TEMP_ALERT => Some(Self::Alert),
            _ => None,
        }
    }
}

/// Represents the status register flags.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(Format))]
pub struct Status {
    pub current_alert: bool,        // Bit 6
    pub charge_overflow: bool,      // Bit 5, accumulated charge over/underflow
    pub temperature_alert: bool,    // Bit 4
    pub charge_alert_high: bool,    // Bit 3
    pub charge_alert_low: bool,     // Bit 2
    pub voltage_alert: bool,        // Bit 1
    pub undervoltage_lockout: bool, // Bit 0
}

impl Status {
    pub fn new(status_byte: u8) -> Self {
        Self {
            current_alert: (status_byte & STATUS_CURRENT_ALERT) != 0,
            charge_overflow: (status_byte & STATUS_ACR_OVERFLOW) != 0,
            temperature_alert: (status_byte & STATUS_TEMP_ALERT) != 0,
            charge_alert_high: (status_byte & STATUS_CHARGE_ALERT_HIGH) != 0,
            charge_alert_low: (status_byte & STATUS_CHARGE_ALERT_LOW) != 0,
            voltage_alert: (status_byte & STATUS_VOLTAGE_ALERT) != 0,
            undervoltage_lockout: (status_byte & STATUS_UVLO_ALERT) != 0,
        }
    }
}

/// Raw 16-bit charge thresholds compared against the accumulated charge register.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(Format))]
pub struct ChargeThresholds {
    /// Low threshold, registers G/H.
    pub min: u16,
    /// High threshold, registers E/F.
    pub max: u16,
}

impl Default for ChargeThresholds {
    fn default() -> Self {
        // Power-on values
        Self {
            min: 0x0000,
            max: 0xFFFF,
        }
    }
}

/// Converts between raw accumulated charge counts and physical charge.
///
/// qLSB = 0.340 mAh * (50 mOhm / RSENSE) * (M / 4096)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChargeScale {
    /// Sense resistor between SENSE+ and SENSE-.
    pub rsense: ElectricalResistance,
    pub prescaler: Prescaler,
}

impl Default for ChargeScale {
    fn default() -> Self {
        Self {
            rsense: ElectricalResistance::new::<milliohm>(50.0),
            prescaler: Prescaler::M4096,
        }
    }
}

impl ChargeScale {
    /// Charge represented by one count of the accumulated charge register.
    pub fn lsb(&self) -> ElectricCharge {
        let lsb_mah = 0.340 * (50.0 / self.rsense.get::<milliohm>())
            * (self.prescaler.factor() as f32 / 4096.0);
        ElectricCharge::new::<milliampere_hour>(lsb_mah)
    }

    /// Nearest raw count for `charge`, saturating at `0..=0xFFFF`.
    pub fn counts(&self, charge: ElectricCharge) -> u16 {
        let counts = charge.get::<milliampere_hour>() / self.lsb().get::<milliampere_hour>();
        if counts.is_nan() || counts <= 0.0 {
            0
        } else if counts >= u16::MAX as f32 {
            u16::MAX
        } else {
            (counts + 0.5) as u16 // Use simple cast for rounding
        }
    }

    pub fn charge(&self, raw: u16) -> ElectricCharge {
        self.lsb() * raw as f32
    }
}

/// Runtime configuration applied by `set_config`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(Format))]
pub struct GaugeConfig {
    pub adc_mode: AdcMode,
    pub prescaler: Prescaler,
    /// Left untouched on the chip when `None`.
    pub charge_thresholds: Option<ChargeThresholds>,
}

impl Default for GaugeConfig {
    fn default() -> Self {
        Self {
            adc_mode: AdcMode::Sleep,
            prescaler: Prescaler::M4096,
            charge_thresholds: None,
        }
    }
}
