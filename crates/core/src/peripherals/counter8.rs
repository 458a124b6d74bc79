//! 8-bit counters.
//!
//! Counter 1 and counter 3 share the control layout and the 6-mode
//! algorithm set. They differ only in the drive-source table: counter 3 has
//! finer prescale steps and can run from an external oscillator (see
//! [`AsyncState`](crate::layout::AsyncState)), counter 1 can count pulses on
//! its input pin.
//!
//! ```text
//! byte 1   7 6 | 5 4 | 3 2 | 1 0
//!          PinA| PinB|  -  | algorithm bits 0-1
//! byte 2   7   | 6   | 5 4 | 3           | 2 1 0
//!          ImA | ImB |  -  | algorithm 2 | drive source
//! ```

use std::marker::PhantomData;

use serde::{Deserialize, Serialize};

use crate::algorithm::{AlgorithmBits, Counters13Algorithm};
use crate::layout::{BitField, PinAction};
use crate::memory::RegisterAccess;
use crate::prescale::{Counter1Prescale, Counter3Prescale, PrescaleCodec};
use crate::registers::{Counter8Addrs, COUNTER1, COUNTER3};

use super::write_changed;

/// Control register image of an 8-bit counter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Behavior8(pub [u8; 2]);

impl Behavior8 {
    pub const ALGORITHM_LOW: BitField = BitField::new(0, 0, 2);
    pub const PIN_ACTION_B: BitField = BitField::new(0, 4, 2);
    pub const PIN_ACTION_A: BitField = BitField::new(0, 6, 2);
    pub const DRIVE_SOURCE: BitField = BitField::new(1, 0, 3);
    pub const ALGORITHM_HIGH: BitField = BitField::new(1, 3, 1);
    pub const IMITATE_MARK_B: BitField = BitField::new(1, 6, 1);
    pub const IMITATE_MARK_A: BitField = BitField::new(1, 7, 1);

    /// Bits no field covers. Carried through unchanged.
    pub const RESERVED: [u8; 2] = [0b0000_1100, 0b0011_0000];

    pub fn algorithm(&self) -> Counters13Algorithm {
        Counters13Algorithm::decode(AlgorithmBits {
            low: Self::ALGORITHM_LOW.get(&self.0),
            high: Self::ALGORITHM_HIGH.get(&self.0),
        })
    }

    pub fn set_algorithm(&mut self, algorithm: Counters13Algorithm) {
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

    /// Raw drive-source constant; decode with the counter's
    /// [`PrescaleCodec`]. On counter 1 this is a
    /// [`DriveSource`](crate::prescale::DriveSource), on counter 3 a
    /// [`Speed`](crate::prescale::Speed): the same bits select different
    /// slowdowns.
    pub fn drive_source_bits(&self) -> u8 {
        Self::DRIVE_SOURCE.get(&self.0)
    }

    pub fn set_drive_source_bits(&mut self, bits: u8) {
        Self::DRIVE_SOURCE.set(&mut self.0, bits);
    }

    /// Strobe bits: writing 1 acts as if mark A/B matched. Always read as 0
    /// on the silicon.
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

/// Accessor for an 8-bit counter, parameterised by its prescale table.
///
/// Only [`Counter1::counter1`] and [`Counter3::counter3`] build one, so an
/// address map always comes with the drive-source table of the same counter.
///
/// ```compile_fail
/// use atmega_counters::{registers::COUNTER3, Counter1};
///
/// let _c = Counter1::new(COUNTER3);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Counter8<P: PrescaleCodec> {
    addrs: Counter8Addrs,
    _codec: PhantomData<P>,
}

pub type Counter1 = Counter8<Counter1Prescale>;
pub type Counter3 = Counter8<Counter3Prescale>;

impl Counter8<Counter1Prescale> {
    pub const fn counter1() -> Self {
        Counter8::new(COUNTER1)
    }
}

impl Counter8<Counter3Prescale> {
    pub const fn counter3() -> Self {
        Counter8::new(COUNTER3)
    }
}

impl<P: PrescaleCodec> Counter8<P> {
    const fn new(addrs: Counter8Addrs) -> Self {
        Counter8 { addrs, _codec: PhantomData }
    }

    pub fn addrs(&self) -> &Counter8Addrs {
        &self.addrs
    }

    pub fn behavior<R: RegisterAccess>(&self, regs: &R) -> Behavior8 {
        Behavior8(regs.read_bytes(self.addrs.control.addr))
    }

    /// Overwrite the whole control image, both bytes in order.
    pub fn set_behavior<R: RegisterAccess>(&self, regs: &mut R, behavior: Behavior8) {
        regs.write_bytes(self.addrs.control.addr, &behavior.0);
    }

    /// Read-modify-write of the control image. Only bytes that changed are
    /// written back.
    pub fn modify_behavior<R, F>(&self, regs: &mut R, f: F)
    where
        R: RegisterAccess,
        F: FnOnce(&mut Behavior8),
    {
        let old = self.behavior(regs);
        let mut new = old;
        f(&mut new);
        write_changed(regs, self.addrs.control.addr, &old.0, &new.0);
    }

    pub fn algorithm<R: RegisterAccess>(&self, regs: &R) -> Counters13Algorithm {
        self.behavior(regs).algorithm()
    }

    /// Change the two algorithm groups, nothing else.
    pub fn set_algorithm<R: RegisterAccess>(&self, regs: &mut R, algorithm: Counters13Algorithm) {
        self.modify_behavior(regs, |b| b.set_algorithm(algorithm));
    }
}
