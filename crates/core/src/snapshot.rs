//! Counter configuration snapshot.
//!
//! Captures every register that shapes counter behavior so a configuration
//! can be put aside and re-established later (e.g. around a sleep mode that
//! needs a different counter setup). Registers the hardware updates on its
//! own (status, current value) are not captured. Of counter 3's async state
//! only the two clock-select bits are kept; its busy flags are hardware-owned.
//!
//! Restore order:
//!
//! ```text
//! stop all counters -> clock select (counter 3) -> control images -> marks
//!                   -> interrupt enables -> global control
//! ```

use serde::{Deserialize, Serialize};

use crate::layout::{AsyncState, GlobalControl, Interrupts};
use crate::memory::RegisterAccess;
use crate::peripherals::{Behavior16, Behavior8, Counter1, Counter16, Counter3, Counter8, CountersControl};
use crate::prescale::PrescaleCodec;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counter8State {
    pub control: Behavior8,
    pub interrupts: Interrupts,
    pub mark_a: u8,
    pub mark_b: u8,
    /// Clock-select bits of the async state; always empty for counter 1.
    pub async_config: AsyncState,
}

impl Counter8State {
    pub fn capture<P: PrescaleCodec, R: RegisterAccess>(counter: &Counter8<P>, regs: &R) -> Self {
        let a = counter.addrs();
        Counter8State {
            control: counter.behavior(regs),
            interrupts: Interrupts(regs.read_u8(a.interrupts.addr)),
            mark_a: regs.read_u8(a.mark_a.addr),
            mark_b: regs.read_u8(a.mark_b.addr),
            async_config: a
                .async_state
                .map(|r| AsyncState(regs.read_u8(r.addr) & AsyncState::CLOCK_SELECT))
                .unwrap_or_default(),
        }
    }

    pub fn restore<P: PrescaleCodec, R: RegisterAccess>(&self, counter: &Counter8<P>, regs: &mut R) {
        let a = counter.addrs();
        // Clock source first: the drive-source constant was picked for it.
        if let Some(r) = a.async_state {
            regs.write_u8(r.addr, self.async_config.0 & AsyncState::CLOCK_SELECT);
        }
        let mut control = self.control;
        // Strobe bits would fire a fake match.
        control.set_imitate_mark_a(false);
        control.set_imitate_mark_b(false);
        counter.set_behavior(regs, control);
        regs.write_u8(a.mark_a.addr, self.mark_a);
        regs.write_u8(a.mark_b.addr, self.mark_b);
        regs.write_u8(a.interrupts.addr, self.interrupts.0);
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counter16State {
    pub control: Behavior16,
    pub interrupts: Interrupts,
    /// Only meaningful as a ceiling for the `EventMark` algorithms.
    pub event_mark: u16,
    pub mark_a: u16,
    pub mark_b: u16,
}

impl Counter16State {
    pub fn capture<R: RegisterAccess>(counter: &Counter16, regs: &R) -> Self {
        let a = counter.addrs();
        Counter16State {
            control: counter.behavior(regs),
            interrupts: Interrupts(regs.read_u8(a.interrupts.addr)),
            event_mark: regs.read_u16(a.event_mark.addr),
            mark_a: regs.read_u16(a.mark_a.addr),
            mark_b: regs.read_u16(a.mark_b.addr),
        }
    }

    pub fn restore<R: RegisterAccess>(&self, counter: &Counter16, regs: &mut R) {
        let a = counter.addrs();
        let mut control = self.control;
        control.set_imitate_mark_a(false);
        control.set_imitate_mark_b(false);
        counter.set_behavior(regs, control);
        regs.write_u16(a.event_mark.addr, self.event_mark);
        regs.write_u16(a.mark_a.addr, self.mark_a);
        regs.write_u16(a.mark_b.addr, self.mark_b);
        regs.write_u8(a.interrupts.addr, self.interrupts.0);
    }
}

/// Configuration of all three counters plus the shared start/stop register.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountersSnapshot {
    pub global: GlobalControl,
    pub counter1: Counter8State,
    pub counter2: Counter16State,
    pub counter3: Counter8State,
}

impl CountersSnapshot {
    pub fn capture<R: RegisterAccess>(regs: &R) -> Self {
        CountersSnapshot {
            global: CountersControl::new().read(regs),
            counter1: Counter8State::capture(&Counter1::counter1(), regs),
            counter2: Counter16State::capture(&Counter16::counter2(), regs),
            counter3: Counter8State::capture(&Counter3::counter3(), regs),
        }
    }

    /// Counters are held stopped while the images are written, so none of
    /// them ticks with a half-restored configuration.
    pub fn restore<R: RegisterAccess>(&self, regs: &mut R) {
        let control = CountersControl::new();
        control.stop(regs);
        self.counter1.restore(&Counter1::counter1(), regs);
        self.counter2.restore(&Counter16::counter2(), regs);
        self.counter3.restore(&Counter3::counter3(), regs);
        control.write(regs, self.global);
        log::trace!("restored counters snapshot: {:?}", self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::{Counter2Algorithm, Counters13Algorithm};
    use crate::memory::Memory;
    use crate::settings::{Counter16Settings, Counter8Settings};

    fn configured() -> Memory {
        let mut mem = Memory::new();
        Counter8Settings {
            algorithm: Counters13Algorithm::FastPwm_ToMarkA,
            prescale: Some(6),
            ..Default::default()
        }
        .apply(&Counter1::counter1(), &mut mem)
        .unwrap();
        Counter16Settings {
            algorithm: Counter2Algorithm::Count_ToEventMark,
            prescale: Some(0),
            ..Default::default()
        }
        .apply(&Counter16::counter2(), &mut mem)
        .unwrap();
        mem.write_u16(0x86, 40_000);
        mem.write_u16(0x88, 1234);
        mem.write_u8(0x47, 200);
        mem.write_u8(0x70, Interrupts::ON_MARK_A);
        mem
    }

    #[test]
    fn test_capture_restore() {
        let mem = configured();
        let snap = CountersSnapshot::capture(&mem);
        assert_eq!(snap.counter2.event_mark, 40_000);
        assert_eq!(snap.counter1.mark_a, 200);
        assert!(snap.counter3.interrupts.on_mark_a());

        let mut other = Memory::new();
        other.write_u8(0x43, GlobalControl::STOP_COUNTERS);
        snap.restore(&mut other);
        assert_eq!(CountersSnapshot::capture(&other), snap);
        assert!(!CountersControl::new().is_stopped(&other));
        assert_eq!(Counter1::counter1().algorithm(&other), Counters13Algorithm::FastPwm_ToMarkA);
    }

    #[test]
    fn test_restore_skips_live_registers() {
        let mut mem = configured();
        let snap = CountersSnapshot::capture(&mem);
        mem.write_u8(0x46, 0x77);
        mem.write_u8(0x35, 0x07);
        snap.restore(&mut mem);
        assert_eq!(mem.read_u8(0x46), 0x77);
        assert_eq!(mem.read_u8(0x35), 0x07);
    }

    #[test]
    fn test_restore_clears_imitate_bits() {
        let mut mem = Memory::new();
        Counter3::counter3().modify_behavior(&mut mem, |b| b.set_imitate_mark_a(true));
        let snap = CountersSnapshot::capture(&mem);
        snap.restore(&mut mem);
        assert!(!Counter3::counter3().behavior(&mem).imitate_mark_a());
    }

    #[test]
    fn test_restore_keeps_counter3_clock_select() {
        let mut mem = configured();
        mem.write_u8(0xB6, AsyncState::RUN_FROM_EXTERNAL_CLOCK | AsyncState::UPDATING_MARK_A);
        let snap = CountersSnapshot::capture(&mem);
        assert_eq!(snap.counter3.async_config, AsyncState(AsyncState::RUN_FROM_EXTERNAL_CLOCK));
        assert_eq!(snap.counter1.async_config, AsyncState::default());

        let mut other = Memory::new();
        snap.restore(&mut other);
        assert!(AsyncState(other.read_u8(0xB6)).run_from_external_clock());
        assert!(!AsyncState(other.read_u8(0xB6)).is_updating());
    }

    #[test]
    fn test_snapshot_serde() {
        let snap = CountersSnapshot::capture(&configured());
        let bytes = bincode::serialize(&snap).unwrap();
        let back: CountersSnapshot = bincode::deserialize(&bytes).unwrap();
        assert_eq!(back, snap);
    }
}
