//! 16-bit counter (counter 2).
//!
//! Adds an event input: a pin edge copies the current value into the event
//! mark register, and four algorithms count up to that captured value. The
//! algorithm number is 4 bits wide and the control image is 3 bytes.
//!
//! ```text
//! byte 1   7 6 | 5 4 | 3 2 | 1 0
//!          PinA| PinB|  -  | algorithm bits 0-1
//! byte 2   7   | 6      | 5 | 4 3            | 2 1 0
//!          Deb | Upbeat | - | algorithm 2-3  | drive source
//! byte 3   7   | 6   | 5..0
//!          ImA | ImB |  -
//! ```
//!
//! Prescale encoding is the one counter 1 uses; see
//! [`Counter2Prescale`](crate::prescale::Counter2Prescale).

use serde::{Deserialize, Serialize};

use crate::algorithm::{AlgorithmBits, Counter2Algorithm};
use crate::layout::{BitField, PinAction};
use crate::memory::RegisterAccess;
use crate::registers::{Counter16Addrs, COUNTER2};

use super::write_changed;

/// Control register image of the 16-bit counter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Behavior16(pub [u8; 3]);

impl Behavior16 {
    pub const ALGORITHM_LOW: BitField = BitField::new(0, 0, 2);
    pub const PIN_ACTION_B: BitField = BitField::new(0, 4, 2);
    pub const PIN_ACTION_A: BitField = BitField::new(0, 6, 2);
    pub const DRIVE_SOURCE: BitField = BitField::new(1, 0, 3);
    pub const ALGORITHM_HIGH: BitField = BitField::new(1, 3, 2);
    pub const EVENT_ON_UPBEAT: BitField = BitField::new(1, 6, 1);
    pub const INPUT_DEBOUNCER: BitField = BitField::new(1, 7, 1);
    pub const IMITATE_MARK_B: BitField = BitField::new(2, 6, 1);
    pub const IMITATE_MARK_A: BitField = BitField::new(2, 7, 1);

    /// Bits no field covers. Carried through unchanged.
    pub const RESERVED: [u8; 3] = [0b0000_1100, 0b0010_0000, 0b0011_1111];

    pub fn algorithm(&self) -> Counter2Algorithm {
        Counter2Algorithm::decode(AlgorithmBits {
            low: Self::ALGORITHM_LOW.get(&self.0),
            high: Self::ALGORITHM_HIGH.get(&self.0),
        })
    }

    pub fn set_algorithm(&mut self, algorithm: Counter2Algorithm) {
        let bits = algorithm.encode();
        Self::ALGORITHM_LOW.set(&mut self.0, bits.low);
        Self::ALGORITHM_HIGH.set(&mut self.0, bits.high);
    }

    pub fn pin_action_a(&self) -> PinAction {
        PinAction::from_bits(Self::PIN_ACTION_A.get(&self.0))
    }

    pub fn set_pin_action_a(&mut self, action: PinAction) {
        Self::PIN_ACTION_A.set(&mut self.0, action.bits());
    }

    pub fn pin_action_b(&self) -> PinAction {
        PinAction::from_bits(Self::PIN_ACTION_B.get(&self.0))
    }

    pub fn set_pin_action_b(&mut self, action: PinAction) {
        Self::PIN_ACTION_B.set(&mut self.0, action.bits());
    }

    pub fn drive_source_bits(&self) -> u8 {
        Self::DRIVE_SOURCE.get(&self.0)
    }

    pub fn set_drive_source_bits(&mut self, bits: u8) {
        Self::DRIVE_SOURCE.set(&mut self.0, bits);
    }

    /// Capture on the rising edge of the event pin instead of the falling one.
    pub fn event_on_upbeat(&self) -> bool {
        Self::EVENT_ON_UPBEAT.is_set(&self.0)
    }

    pub fn set_event_on_upbeat(&mut self, on: bool) {
        Self::EVENT_ON_UPBEAT.set_flag(&mut self.0, on);
    }

    /// Require four equal samples on the event pin before accepting an edge.
    pub fn input_debouncer(&self) -> bool {
        Self::INPUT_DEBOUNCER.is_set(&self.0)
    }

    pub fn set_input_debouncer(&mut self, on: bool) {
        Self::INPUT_DEBOUNCER.set_flag(&mut self.0, on);
    }

    pub fn imitate_mark_a(&self) -> bool {
        Self::IMITATE_MARK_A.is_set(&self.0)
    }

    pub fn set_imitate_mark_a(&mut self, on: bool) {
        Self::IMITATE_MARK_A.set_flag(&mut self.0, on);
    }

    pub fn imitate_mark_b(&self) -> bool {
        Self::IMITATE_MARK_B.is_set(&self.0)
    }

    pub fn set_imitate_mark_b(&mut self, on: bool) {
        Self::IMITATE_MARK_B.set_flag(&mut self.0, on);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Counter16 {
    addrs: Counter16Addrs,
}

impl Counter16 {
    pub const fn counter2() -> Self {
        Counter16 { addrs: COUNTER2 }
    }

    pub fn addrs(&self) -> &Counter16Addrs {
        &self.addrs
    }

    pub fn behavior<R: RegisterAccess>(&self, regs: &R) -> Behavior16 {
        Behavior16(regs.read_bytes(self.addrs.control.addr))
    }

    pub fn set_behavior<R: RegisterAccess>(&self, regs: &mut R, behavior: Behavior16) {
        regs.write_bytes(self.addrs.control.addr, &behavior.0);
    }

    /// Read-modify-write of the control image. Only bytes that changed are
    /// written back.
    pub fn modify_behavior<R, F>(&self, regs: &mut R, f: F)
    where
        R: RegisterAccess,
        F: FnOnce(&mut Behavior16),
    {
        let old = self.behavior(regs);
        let mut new = old;
        f(&mut new);
        write_changed(regs, self.addrs.control.addr, &old.0, &new.0);
    }

    pub fn algorithm<R: RegisterAccess>(&self, regs: &R) -> Counter2Algorithm {
        self.behavior(regs).algorithm()
    }

    pub fn set_algorithm<R: RegisterAccess>(&self, regs: &mut R, algorithm: Counter2Algorithm) {
        self.modify_behavior(regs, |b| b.set_algorithm(algorithm));
    }
}

impl Default for Counter16 {
    fn default() -> Self {
        Self::counter2()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::Memory;

    const ALGORITHM_MASK: [u8; 3] = [0b0000_0011, 0b0001_1000, 0];

    #[test]
    fn test_reserved_is_complement_of_fields() {
        let fields = [
            Behavior16::ALGORITHM_LOW,
            Behavior16::PIN_ACTION_B,
            Behavior16::PIN_ACTION_A,
            Behavior16::DRIVE_SOURCE,
            Behavior16::ALGORITHM_HIGH,
            Behavior16::EVENT_ON_UPBEAT,
            Behavior16::INPUT_DEBOUNCER,
            Behavior16::IMITATE_MARK_B,
            Behavior16::IMITATE_MARK_A,
        ];
        let mut covered = [0u8; 3];
        for f in fields {
            assert_eq!(covered[f.byte] & f.mask(), 0, "fields overlap");
            covered[f.byte] |= f.mask();
        }
        assert_eq!([!covered[0], !covered[1], !covered[2]], Behavior16::RESERVED);
    }

    #[test]
    fn test_algorithm_round_trip() {
        let c = Counter16::counter2();
        let mut mem = Memory::new();
        for a in Counter2Algorithm::ALL {
            c.set_algorithm(&mut mem, a);
            assert_eq!(c.algorithm(&mem), a);
        }
    }

    #[test]
    fn test_event_mark_algorithm_bits() {
        let c = Counter16::counter2();
        let mut mem = Memory::new();
        c.set_algorithm(&mut mem, Counter2Algorithm::Count_ToEventMark);
        // 12 = 0b11_00
        assert_eq!(&mem.data[0x80..0x83], &[0b0000_0000, 0b0001_1000, 0]);
    }

    #[test]
    fn test_set_algorithm_touches_only_algorithm_bits() {
        let c = Counter16::counter2();
        let control = c.addrs().control.addr as usize;
        for fill in [0x00u8, 0xFF, 0x3C, 0xC3] {
            for a in Counter2Algorithm::ALL {
                let mut mem = Memory::new();
                mem.data.iter_mut().for_each(|b| *b = fill);
                let before = mem.data.clone();

                c.set_algorithm(&mut mem, a);
                assert_eq!(c.algorithm(&mem), a);

                for (addr, (b, n)) in before.iter().zip(&mem.data).enumerate() {
                    let mask = match addr.checked_sub(control) {
                        Some(off) if off < 3 => ALGORITHM_MASK[off],
                        _ => 0,
                    };
                    assert_eq!(b & !mask, n & !mask, "byte 0x{:02X} changed", addr);
                }
            }
        }
    }

    #[test]
    fn test_behavior_fields() {
        let mut b = Behavior16([0, 0, 0b0011_1111]);
        b.set_event_on_upbeat(true);
        b.set_input_debouncer(true);
        b.set_imitate_mark_a(true);
        b.set_pin_action_a(PinAction::Set);
        assert_eq!(b.0, [0b1000_0000, 0b1100_0000, 0b1011_1111]);
        assert!(b.event_on_upbeat());
        assert!(b.input_debouncer());
        assert_eq!(b.pin_action_a(), PinAction::Set);
        assert_eq!(b.pin_action_b(), PinAction::None);
        assert!(!b.imitate_mark_b());
    }
}
