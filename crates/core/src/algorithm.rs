//! Algorithm codecs.
//!
//! The hardware splits the algorithm number over two bit groups that live in
//! different control bytes: the low two bits in byte 1, the high bit(s) in
//! byte 2, with pin actions and the drive source in between.
//!
//! Both codecs are total: every bit pattern the fields can hold has a variant,
//! including the ones the silicon reserves.

use serde::{Deserialize, Serialize};

/// The two bit groups an algorithm number is split into.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct AlgorithmBits {
    /// Bits 0..=1 of the algorithm number.
    pub low: u8,
    /// Bit 2 (counters 1 and 3) or bits 2..=3 (counter 2).
    pub high: u8,
}

/// Operating algorithm of counters 1 and 3 (3-bit).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
#[allow(non_camel_case_types)]
pub enum Counters13Algorithm {
    #[default]
    Count_To2Pow8 = 0,
    Pwm_To2Pow8 = 1,
    Count_ToMarkA = 2,
    FastPwm_To2Pow8 = 3,
    Reserved4 = 4,
    Pwm_ToMarkA = 5,
    Reserved6 = 6,
    FastPwm_ToMarkA = 7,
}

impl Counters13Algorithm {
    pub const ALL: [Counters13Algorithm; 8] = [
        Counters13Algorithm::Count_To2Pow8,
        Counters13Algorithm::Pwm_To2Pow8,
        Counters13Algorithm::Count_ToMarkA,
        Counters13Algorithm::FastPwm_To2Pow8,
        Counters13Algorithm::Reserved4,
        Counters13Algorithm::Pwm_ToMarkA,
        Counters13Algorithm::Reserved6,
        Counters13Algorithm::FastPwm_ToMarkA,
    ];

    /// Decode an algorithm number; bits above bit 2 are ignored.
    pub const fn from_number(n: u8) -> Self {
        Self::ALL[(n & 0b111) as usize]
    }

    pub const fn number(self) -> u8 {
        self as u8
    }

    pub const fn encode(self) -> AlgorithmBits {
        let n = self as u8;
        AlgorithmBits { low: n & 0b11, high: (n >> 2) & 0b1 }
    }

    pub const fn decode(bits: AlgorithmBits) -> Self {
        Self::from_number(((bits.high & 0b1) << 2) | (bits.low & 0b11))
    }

    pub const fn is_reserved(self) -> bool {
        matches!(self, Counters13Algorithm::Reserved4 | Counters13Algorithm::Reserved6)
    }
}

/// Operating algorithm of counter 2 (4-bit).
///
/// `EventMark` variants count up to the value captured in the event mark
/// register; `SymPwm` counts up and back down.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
#[allow(non_camel_case_types)]
pub enum Counter2Algorithm {
    #[default]
    Count_To2Pow16 = 0,
    Pwm_To2Pow8 = 1,
    Pwm_To2Pow9 = 2,
    Pwm_To2Pow10 = 3,
    Count_ToMarkA = 4,
    FastPwm_To2Pow8 = 5,
    FastPwm_To2Pow9 = 6,
    FastPwm_To2Pow10 = 7,
    SymPwm_ToEventMark = 8,
    SymPwm_ToMarkA = 9,
    Pwm_ToEventMark = 10,
    Pwm_ToMarkA = 11,
    Count_ToEventMark = 12,
    Reserved13 = 13,
    FastPwm_ToEventMark = 14,
    FastPwm_ToMarkA = 15,
}

impl Counter2Algorithm {
    pub const ALL: [Counter2Algorithm; 16] = [
        Counter2Algorithm::Count_To2Pow16,
        Counter2Algorithm::Pwm_To2Pow8,
        Counter2Algorithm::Pwm_To2Pow9,
        Counter2Algorithm::Pwm_To2Pow10,
        Counter2Algorithm::Count_ToMarkA,
        Counter2Algorithm::FastPwm_To2Pow8,
        Counter2Algorithm::FastPwm_To2Pow9,
        Counter2Algorithm::FastPwm_To2Pow10,
        Counter2Algorithm::SymPwm_ToEventMark,
        Counter2Algorithm::SymPwm_ToMarkA,
        Counter2Algorithm::Pwm_ToEventMark,
        Counter2Algorithm::Pwm_ToMarkA,
        Counter2Algorithm::Count_ToEventMark,
        Counter2Algorithm::Reserved13,
        Counter2Algorithm::FastPwm_ToEventMark,
        Counter2Algorithm::FastPwm_ToMarkA,
    ];

    /// Decode an algorithm number; bits above bit 3 are ignored.
    pub const fn from_number(n: u8) -> Self {
        Self::ALL[(n & 0b1111) as usize]
    }

    pub const fn number(self) -> u8 {
        self as u8
    }

    pub const fn encode(self) -> AlgorithmBits {
        let n = self as u8;
        AlgorithmBits { low: n & 0b11, high: (n >> 2) & 0b11 }
    }

    pub const fn decode(bits: AlgorithmBits) -> Self {
        Self::from_number(((bits.high & 0b11) << 2) | (bits.low & 0b11))
    }

    pub const fn is_reserved(self) -> bool {
        matches!(self, Counter2Algorithm::Reserved13)
    }
}
