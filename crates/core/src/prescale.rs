//! Prescale codecs.
//!
//! A prescale factor `f` means "divide the clock by 2^f". The hardware
//! selects it with a 3-bit drive-source constant whose ordering is not a
//! function of `f`, so each counter family carries an explicit table and both
//! directions are lookups in it. Anything missing from the table is an error;
//! writing an unlisted constant would pick an unintended clock source.
//!
//! | factor | counters 1 & 2 | counter 3 |
//! |--------|----------------|-----------|
//! | 0      | 1              | 1         |
//! | 3      | 2              | 2         |
//! | 5      | -              | 3         |
//! | 6      | 3              | 4         |
//! | 7      | -              | 5         |
//! | 8      | 4              | 6         |
//! | 10     | 5              | 7         |

use serde::{Deserialize, Serialize};

use crate::error::PrescaleError;

/// Drive-source constants of counters 1 and 2.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum DriveSource {
    #[default]
    None = 0,
    FullSpeed = 1,
    SlowBy2Pow3 = 2,
    SlowBy2Pow6 = 3,
    SlowBy2Pow8 = 4,
    SlowBy2Pow10 = 5,
    /// Tick on the falling edge of the external pulse pin.
    ExternalDownbeat = 6,
    /// Tick on the rising edge of the external pulse pin.
    ExternalUpbeat = 7,
}

/// Drive-source constants of counter 3.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Speed {
    #[default]
    None = 0,
    Full = 1,
    SlowBy2Pow3 = 2,
    SlowBy2Pow5 = 3,
    SlowBy2Pow6 = 4,
    SlowBy2Pow7 = 5,
    SlowBy2Pow8 = 6,
    SlowBy2Pow10 = 7,
}

impl TryFrom<u8> for DriveSource {
    type Error = PrescaleError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Ok(match value {
            0 => DriveSource::None,
            1 => DriveSource::FullSpeed,
            2 => DriveSource::SlowBy2Pow3,
            3 => DriveSource::SlowBy2Pow6,
            4 => DriveSource::SlowBy2Pow8,
            5 => DriveSource::SlowBy2Pow10,
            6 => DriveSource::ExternalDownbeat,
            7 => DriveSource::ExternalUpbeat,
            _ => return Err(PrescaleError::UnsupportedSource(value)),
        })
    }
}

impl TryFrom<u8> for Speed {
    type Error = PrescaleError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Ok(match value {
            0 => Speed::None,
            1 => Speed::Full,
            2 => Speed::SlowBy2Pow3,
            3 => Speed::SlowBy2Pow5,
            4 => Speed::SlowBy2Pow6,
            5 => Speed::SlowBy2Pow7,
            6 => Speed::SlowBy2Pow8,
            7 => Speed::SlowBy2Pow10,
            _ => return Err(PrescaleError::UnsupportedSource(value)),
        })
    }
}

impl From<DriveSource> for u8 {
    fn from(source: DriveSource) -> u8 {
        source as u8
    }
}

impl From<Speed> for u8 {
    fn from(speed: Speed) -> u8 {
        speed as u8
    }
}

/// Mapping between prescale factors and a counter family's drive-source
/// constants.
pub trait PrescaleCodec {
    type Source: Copy + Eq + Into<u8> + 'static + TryFrom<u8, Error = PrescaleError>;

    /// `(factor, constant)` pairs the silicon supports.
    const TABLE: &'static [(u8, Self::Source)];

    fn hardware_from_factor(factor: u8) -> Result<Self::Source, PrescaleError> {
        Self::TABLE
            .iter()
            .find(|(f, _)| *f == factor)
            .map(|(_, source)| *source)
            .ok_or(PrescaleError::UnsupportedFactor(factor))
    }

    fn factor_from_hardware(source: Self::Source) -> Result<u8, PrescaleError> {
        Self::TABLE
            .iter()
            .find(|(_, s)| *s == source)
            .map(|(f, _)| *f)
            .ok_or(PrescaleError::UnsupportedSource(source.into()))
    }

    /// [`hardware_from_factor`](Self::hardware_from_factor) as the raw
    /// constant for the control register.
    fn bits_from_factor(factor: u8) -> Result<u8, PrescaleError> {
        Self::hardware_from_factor(factor).map(Into::into)
    }

    /// [`factor_from_hardware`](Self::factor_from_hardware) from the raw
    /// 3-bit control register field.
    fn factor_from_bits(bits: u8) -> Result<u8, PrescaleError> {
        Self::factor_from_hardware(<Self::Source as TryFrom<u8>>::try_from(bits)?)
    }
}

/// Counters 1 and 2 share the prescaler and its encoding; both counters use
/// this one codec.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counters12Prescale;

impl PrescaleCodec for Counters12Prescale {
    type Source = DriveSource;

    const TABLE: &'static [(u8, DriveSource)] = &[
        (0, DriveSource::FullSpeed),
        (3, DriveSource::SlowBy2Pow3),
        (6, DriveSource::SlowBy2Pow6),
        (8, DriveSource::SlowBy2Pow8),
        (10, DriveSource::SlowBy2Pow10),
    ];
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counter3Prescale;

impl PrescaleCodec for Counter3Prescale {
    type Source = Speed;

    const TABLE: &'static [(u8, Speed)] = &[
        (0, Speed::Full),
        (3, Speed::SlowBy2Pow3),
        (5, Speed::SlowBy2Pow5),
        (6, Speed::SlowBy2Pow6),
        (7, Speed::SlowBy2Pow7),
        (8, Speed::SlowBy2Pow8),
        (10, Speed::SlowBy2Pow10),
    ];
}

pub type Counter1Prescale = Counters12Prescale;
pub type Counter2Prescale = Counters12Prescale;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters12_round_trip() {
        for &(factor, source) in Counters12Prescale::TABLE {
            assert_eq!(Counters12Prescale::hardware_from_factor(factor), Ok(source));
            assert_eq!(Counters12Prescale::factor_from_hardware(source), Ok(factor));
        }
    }

    #[test]
    fn test_counter3_round_trip() {
        for &(factor, speed) in Counter3Prescale::TABLE {
            assert_eq!(Counter3Prescale::hardware_from_factor(factor), Ok(speed));
            assert_eq!(Counter3Prescale::factor_from_hardware(speed), Ok(factor));
        }
    }

    #[test]
    fn test_counters12_rejects_unsupported_factors() {
        for factor in [1, 2, 4, 5, 7, 9, 11, 255] {
            assert_eq!(
                Counters12Prescale::hardware_from_factor(factor),
                Err(PrescaleError::UnsupportedFactor(factor))
            );
        }
    }

    #[test]
    fn test_counter3_rejects_unsupported_factors() {
        for factor in [1, 2, 4, 9, 11] {
            assert_eq!(
                Counter3Prescale::hardware_from_factor(factor),
                Err(PrescaleError::UnsupportedFactor(factor))
            );
        }
    }

    #[test]
    fn test_no_factor_for_stopped_or_external() {
        for source in [DriveSource::None, DriveSource::ExternalDownbeat, DriveSource::ExternalUpbeat] {
            assert_eq!(
                Counters12Prescale::factor_from_hardware(source),
                Err(PrescaleError::UnsupportedSource(source as u8))
            );
        }
        assert_eq!(
            Counter3Prescale::factor_from_hardware(Speed::None),
            Err(PrescaleError::UnsupportedSource(0))
        );
    }

    #[test]
    fn test_raw_bits() {
        assert_eq!(Counter3Prescale::bits_from_factor(7), Ok(5));
        assert_eq!(Counter3Prescale::factor_from_bits(5), Ok(7));
        assert_eq!(Counters12Prescale::factor_from_bits(3), Ok(6));
        assert_eq!(Counters12Prescale::factor_from_bits(8), Err(PrescaleError::UnsupportedSource(8)));
    }

    #[test]
    fn test_counter3_factor_7() {
        assert_eq!(Counter3Prescale::hardware_from_factor(7), Ok(Speed::SlowBy2Pow7));
    }

    #[test]
    fn test_counter2_matches_counter1() {
        for factor in 0..=16 {
            assert_eq!(
                Counter2Prescale::bits_from_factor(factor),
                Counter1Prescale::bits_from_factor(factor)
            );
        }
        for bits in 0..8 {
            assert_eq!(
                Counter2Prescale::factor_from_bits(bits),
                Counter1Prescale::factor_from_bits(bits)
            );
        }
        assert_eq!(
            Counter2Prescale::hardware_from_factor(6),
            Ok(DriveSource::SlowBy2Pow6)
        );
    }
}
