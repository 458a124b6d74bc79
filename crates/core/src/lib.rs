//! # atmega-counters
//!
//! Typed register model for the three hardware counters of the ATmega328P.
//!
//! There is no notion of time here. A counter ticks at the main clock
//! divided by a power of two, compares its value against one or two marks,
//! and toggles pins or raises flags when a mark or the end of its range is
//! reached. This crate only shapes the configuration bytes that select that
//! behavior; the ticking itself happens in silicon.
//!
//! ## Architecture
//!
//! - [`registers`] — Fixed data-space addresses of every counter register
//! - [`layout`] — [`BitField`](layout::BitField) descriptors and the shared one-byte images
//! - [`algorithm`] — Algorithm codecs: symbolic mode <-> split hardware bit groups
//! - [`prescale`] — Prescale codecs: power-of-two slowdown <-> drive-source constant
//! - [`peripherals`] — Per-counter accessors and the global start/stop control
//! - [`memory`] — [`RegisterAccess`] seam with volatile and host-side backends
//! - [`settings`] — Whole-counter symbolic configuration
//! - [`snapshot`] — Capture/restore of all counter configuration registers
//!
//! | Counter | Silicon        | Width  | Algorithms | Prescale exponents         |
//! |---------|----------------|--------|------------|----------------------------|
//! | 1       | Timer/Counter0 | 8 bit  | 6          | 0 3 6 8 10 + external pin  |
//! | 2       | Timer/Counter1 | 16 bit | 15         | same as counter 1          |
//! | 3       | Timer/Counter2 | 8 bit  | 6          | 0 3 5 6 7 8 10             |
//!
//! ## Example
//!
//! ```
//! use atmega_counters::{Counter1, Counters13Algorithm, CountersControl, Memory};
//!
//! let mut regs = Memory::new();
//! let counter = Counter1::counter1();
//! counter.set_algorithm(&mut regs, Counters13Algorithm::FastPwm_ToMarkA);
//! assert_eq!(counter.algorithm(&regs), Counters13Algorithm::FastPwm_ToMarkA);
//!
//! CountersControl::new().stop(&mut regs);
//! ```

pub mod algorithm;
pub mod error;
pub mod layout;
pub mod memory;
pub mod peripherals;
pub mod prescale;
pub mod registers;
pub mod settings;
pub mod snapshot;

pub use algorithm::{AlgorithmBits, Counter2Algorithm, Counters13Algorithm};
pub use error::PrescaleError;
pub use layout::PinAction;
pub use memory::{Memory, Mmio, RegisterAccess};
pub use peripherals::{Counter1, Counter16, Counter3, CountersControl};
pub use prescale::{Counter1Prescale, Counter2Prescale, Counter3Prescale, PrescaleCodec};
pub use settings::{Counter16Settings, Counter8Settings};
pub use snapshot::CountersSnapshot;

use serde::{Deserialize, Serialize};

// ATmega328P data space
/// Number of general-purpose registers (R0–R31)
pub const REG_COUNT: usize = 32;
/// I/O + extended I/O register space size (0x20..0xFF)
pub const IO_SIZE: usize = 224;
/// SRAM size: 2 KB
pub const SRAM_SIZE: usize = 2 * 1024;
/// Total data space: registers + I/O + SRAM
pub const DATA_SIZE: usize = REG_COUNT + IO_SIZE + SRAM_SIZE;

/// Which of the three counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CounterId {
    /// 8-bit, can count pulses on an input pin
    Counter1,
    /// 16-bit, with event capture input
    Counter2,
    /// 8-bit, can run from an external 32 kHz oscillator
    Counter3,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_space_covers_registers() {
        for r in registers::ALL.iter() {
            assert!((r.addr as usize + r.width as usize) <= REG_COUNT + IO_SIZE, "{}", r.name);
            assert!(r.addr as usize >= REG_COUNT, "{}", r.name);
        }
        assert_eq!(DATA_SIZE, 0x900);
    }

    #[test]
    fn test_counter_ids() {
        assert_eq!(registers::COUNTER1.id, CounterId::Counter1);
        assert_eq!(registers::COUNTER2.id, CounterId::Counter2);
        assert_eq!(registers::COUNTER3.id, CounterId::Counter3);
    }
}
