#[cfg(feature = "defmt")]
use defmt::Format;

/// Represents potential errors when interacting with the LTC2943 chip.
#[derive(Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(Format))]
pub enum Error<E> {
    /// The bus reported a failure while reading a register.
    Read(E),
    /// The bus reported a failure while writing a register.
    Write(E),
    /// Block read length is zero or exceeds the register map.
    InvalidData,
    /// A register field holds a bit pattern with no defined meaning.
    UnmappedField {
        /// The register the field was read from.
        register: crate::registers::Register,
        /// The masked field bits.
        bits: u8,
    },
}
