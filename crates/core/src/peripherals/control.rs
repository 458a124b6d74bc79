//! Global start/stop of all counters.
//!
//! One register gates the prescalers of every counter at once, so stopping
//! here freezes counters 1, 2 and 3 together. There is no per-counter
//! variant of these operations.

use serde::{Deserialize, Serialize};

use crate::layout::GlobalControl;
use crate::memory::RegisterAccess;
use crate::registers::{Register, GLOBAL_CONTROL};

/// Which prescaler a reset applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PrescalerGroup {
    /// The prescaler shared by counters 1 and 2.
    Counters12,
    Counter3,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountersControl {
    reg: Register,
}

impl CountersControl {
    pub const fn new() -> Self {
        CountersControl { reg: GLOBAL_CONTROL }
    }

    pub fn read<R: RegisterAccess>(&self, regs: &R) -> GlobalControl {
        GlobalControl(regs.read_u8(self.reg.addr))
    }

    pub fn write<R: RegisterAccess>(&self, regs: &mut R, value: GlobalControl) {
        regs.write_u8(self.reg.addr, value.0);
    }

    fn modify<R: RegisterAccess>(&self, regs: &mut R, f: impl FnOnce(&mut GlobalControl)) {
        let mut value = self.read(regs);
        f(&mut value);
        self.write(regs, value);
    }

    pub fn start<R: RegisterAccess>(&self, regs: &mut R) {
        self.modify(regs, |c| c.set_stop_counters(false));
    }

    pub fn stop<R: RegisterAccess>(&self, regs: &mut R) {
        self.modify(regs, |c| c.set_stop_counters(true));
    }

    pub fn is_stopped<R: RegisterAccess>(&self, regs: &R) -> bool {
        self.read(regs).stop_counters()
    }

    /// Restart the prescaler phase. While counters are stopped the reset
    /// bit stays asserted until [`start`](Self::start).
    pub fn reset_prescaler<R: RegisterAccess>(&self, regs: &mut R, group: PrescalerGroup) {
        self.modify(regs, |c| match group {
            PrescalerGroup::Counters12 => c.set_reset_counters12_prescaler(true),
            PrescalerGroup::Counter3 => c.set_reset_counter3_prescaler(true),
        });
    }
}

impl Default for CountersControl {
    fn default() -> Self {
        Self::new()
    }
}
