//! ATmega328P counter accessors.
//!
//! - [`Counter8`] — 8-bit counters 1 and 3 (same control layout, different
//!   prescale codecs, see [`Counter1`] and [`Counter3`])
//! - [`Counter16`] — 16-bit counter 2 with the event mark input
//! - [`CountersControl`] — start/stop gate shared by all counters
//!
//! Accessors hold no state besides their address map. Every operation is a
//! handful of byte accesses through a [`RegisterAccess`] backend.

mod control;
mod counter16;
mod counter8;

pub use control::{CountersControl, PrescalerGroup};
pub use counter16::{Behavior16, Counter16};
pub use counter8::{Behavior8, Counter1, Counter3, Counter8};

use crate::memory::RegisterAccess;

/// Write back the bytes of a register image that differ from what was read.
pub(crate) fn write_changed<R: RegisterAccess>(regs: &mut R, addr: u16, old: &[u8], new: &[u8]) {
    for (i, (o, n)) in old.iter().zip(new).enumerate() {
        if o != n {
            regs.write_u8(addr + i as u16, *n);
        }
    }
}
