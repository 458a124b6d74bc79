//! Symbolic counter configuration.
//!
//! A settings value names everything the control image holds (algorithm,
//! clock slowdown, pin actions, event input options) in hardware-agnostic
//! terms. [`Counter8Settings::apply`] validates first and then writes the
//! image in one read-modify-write, so a rejected prescale factor leaves the
//! counter untouched.
//!
//! Settings derive serde traits and can be kept in whatever configuration
//! format the firmware or its host tooling uses.

use serde::{Deserialize, Serialize};

use crate::algorithm::{Counter2Algorithm, Counters13Algorithm};
use crate::error::PrescaleError;
use crate::layout::PinAction;
use crate::memory::RegisterAccess;
use crate::peripherals::{Counter16, Counter8};
use crate::prescale::{Counter2Prescale, PrescaleCodec};

/// Drive-source bits meaning "no clock", identical for every counter.
const NO_SOURCE: u8 = 0;

fn source_bits<P: PrescaleCodec>(prescale: Option<u8>) -> Result<u8, PrescaleError> {
    match prescale {
        Some(factor) => P::bits_from_factor(factor),
        None => Ok(NO_SOURCE),
    }
}

fn prescale_from_bits<P: PrescaleCodec>(bits: u8) -> Result<Option<u8>, PrescaleError> {
    match bits {
        NO_SOURCE => Ok(None),
        _ => P::factor_from_bits(bits).map(Some),
    }
}

/// Configuration of counter 1 or counter 3.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counter8Settings {
    pub algorithm: Counters13Algorithm,
    /// Clock divided by 2^factor; `None` halts the counter.
    pub prescale: Option<u8>,
    pub pin_action_a: PinAction,
    pub pin_action_b: PinAction,
}

impl Counter8Settings {
    pub fn apply<P, R>(&self, counter: &Counter8<P>, regs: &mut R) -> Result<(), PrescaleError>
    where
        P: PrescaleCodec,
        R: RegisterAccess,
    {
        let source = source_bits::<P>(self.prescale)?;
        counter.modify_behavior(regs, |b| {
            b.set_algorithm(self.algorithm);
            b.set_drive_source_bits(source);
            b.set_pin_action_a(self.pin_action_a);
            b.set_pin_action_b(self.pin_action_b);
        });
        log::trace!(
            "{:?}: applied {:?} -> {:02X?}",
            counter.addrs().id,
            self,
            counter.behavior(regs).0
        );
        Ok(())
    }

    /// Fails with [`PrescaleError::UnsupportedSource`] when the counter runs
    /// from an external clock.
    pub fn read<P, R>(counter: &Counter8<P>, regs: &R) -> Result<Self, PrescaleError>
    where
        P: PrescaleCodec,
        R: RegisterAccess,
    {
        let b = counter.behavior(regs);
        Ok(Counter8Settings {
            algorithm: b.algorithm(),
            prescale: prescale_from_bits::<P>(b.drive_source_bits())?,
            pin_action_a: b.pin_action_a(),
            pin_action_b: b.pin_action_b(),
        })
    }
}

/// Configuration of counter 2.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counter16Settings {
    pub algorithm: Counter2Algorithm,
    /// Clock divided by 2^factor; `None` halts the counter.
    pub prescale: Option<u8>,
    pub pin_action_a: PinAction,
    pub pin_action_b: PinAction,
    pub event_on_upbeat: bool,
    pub input_debouncer: bool,
}

impl Counter16Settings {
    pub fn apply<R: RegisterAccess>(&self, counter: &Counter16, regs: &mut R) -> Result<(), PrescaleError> {
        let source = source_bits::<Counter2Prescale>(self.prescale)?;
        counter.modify_behavior(regs, |b| {
            b.set_algorithm(self.algorithm);
            b.set_drive_source_bits(source);
            b.set_pin_action_a(self.pin_action_a);
            b.set_pin_action_b(self.pin_action_b);
            b.set_event_on_upbeat(self.event_on_upbeat);
            b.set_input_debouncer(self.input_debouncer);
        });
        log::trace!(
            "{:?}: applied {:?} -> {:02X?}",
            counter.addrs().id,
            self,
            counter.behavior(regs).0
        );
        Ok(())
    }

    pub fn read<R: RegisterAccess>(counter: &Counter16, regs: &R) -> Result<Self, PrescaleError> {
        let b = counter.behavior(regs);
        Ok(Counter16Settings {
            algorithm: b.algorithm(),
            prescale: prescale_from_bits::<Counter2Prescale>(b.drive_source_bits())?,
            pin_action_a: b.pin_action_a(),
            pin_action_b: b.pin_action_b(),
            event_on_upbeat: b.event_on_upbeat(),
            input_debouncer: b.input_debouncer(),
        })
    }
}
