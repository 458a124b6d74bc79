//! Register access.
//!
//! The counters are configured through the AVR unified data space:
//!
//! | Address Range | Content                      |
//! |---------------|------------------------------|
//! | 0x0000–0x001F | General registers R0–R31     |
//! | 0x0020–0x00FF | I/O + extended I/O registers |
//! | 0x0100–0x08FF | SRAM (2048 bytes)            |
//!
//! [`RegisterAccess`] is the only seam between the register model and the
//! bus. [`Mmio`] talks to the real silicon, [`Memory`] is a plain byte array
//! for host-side use.
//!
//! ## Ordering
//!
//! Sub-field writes are read-modify-write sequences of single byte accesses.
//! They are not atomic: if an interrupt handler touches the same register
//! between the read and the write, one of the updates is lost. Callers that
//! configure counters from both contexts must mask interrupts around the
//! write.

use crate::DATA_SIZE;

/// Byte-level access to the data space.
pub trait RegisterAccess {
    fn read_u8(&self, addr: u16) -> u8;

    fn write_u8(&mut self, addr: u16, value: u8);

    /// Read a 16-bit register, low byte first.
    ///
    /// Reading the low byte latches the high byte into the shared temporary
    /// register, so the pair is consistent even while the counter ticks.
    fn read_u16(&self, addr: u16) -> u16 {
        let [lo, hi] = self.read_bytes::<2>(addr);
        lo as u16 | ((hi as u16) << 8)
    }

    /// Write a 16-bit register, high byte first.
    ///
    /// The high byte is parked in the temporary register and committed
    /// together with the low byte.
    fn write_u16(&mut self, addr: u16, value: u16) {
        if let Some(hi) = addr.checked_add(1) {
            self.write_u8(hi, (value >> 8) as u8);
        }
        self.write_u8(addr, value as u8);
    }

    fn read_bytes<const N: usize>(&self, addr: u16) -> [u8; N] {
        let mut out = [0u8; N];
        for (i, b) in out.iter_mut().enumerate() {
            *b = offset(addr, i).map_or(0, |a| self.read_u8(a));
        }
        out
    }

    fn write_bytes(&mut self, addr: u16, bytes: &[u8]) {
        for (i, b) in bytes.iter().enumerate() {
            if let Some(a) = offset(addr, i) {
                self.write_u8(a, *b);
            }
        }
    }
}

/// Address of byte `i` of a register at `addr`; `None` past the end of the
/// data space. Bytes there read as 0 and writes to them are dropped.
fn offset(addr: u16, i: usize) -> Option<u16> {
    u16::try_from(i).ok().and_then(|i| addr.checked_add(i))
}

/// Volatile access to the memory-mapped registers of the running chip.
pub struct Mmio {
    _private: (),
}

impl Mmio {
    /// # Safety
    ///
    /// Only sound on the target itself, where data-space addresses map to
    /// the peripheral registers. The caller must not create aliasing
    /// handles that write the same registers concurrently.
    pub const unsafe fn new() -> Self {
        Mmio { _private: () }
    }
}

impl RegisterAccess for Mmio {
    #[inline(always)]
    fn read_u8(&self, addr: u16) -> u8 {
        // SAFETY: `Mmio::new` contract; every register is read volatile so
        // hardware-updated values (status, current) are never cached.
        unsafe { core::ptr::read_volatile(addr as usize as *const u8) }
    }

    #[inline(always)]
    fn write_u8(&mut self, addr: u16, value: u8) {
        // SAFETY: see `read_u8`.
        unsafe { core::ptr::write_volatile(addr as usize as *mut u8, value) }
    }
}

/// Host-side data space. Out-of-range reads return 0, writes are dropped.
pub struct Memory {
    pub data: Vec<u8>,
}

impl Memory {
    pub fn new() -> Self {
        Memory {
            data: vec![0u8; DATA_SIZE],
        }
    }

    #[inline(always)]
    pub fn read_raw(&self, addr: u16) -> u8 {
        let a = addr as usize;
        if a < self.data.len() { self.data[a] } else { 0 }
    }

    #[inline(always)]
    pub fn write_raw(&mut self, addr: u16, v: u8) {
        let a = addr as usize;
        if a < self.data.len() { self.data[a] = v; }
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

impl RegisterAccess for Memory {
    fn read_u8(&self, addr: u16) -> u8 {
        self.read_raw(addr)
    }

    fn write_u8(&mut self, addr: u16, value: u8) {
        self.write_raw(addr, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records the order of byte writes.
    struct Trace {
        mem: Memory,
        writes: Vec<u16>,
    }

    impl RegisterAccess for Trace {
        fn read_u8(&self, addr: u16) -> u8 {
            self.mem.read_u8(addr)
        }

        fn write_u8(&mut self, addr: u16, value: u8) {
            self.writes.push(addr);
            self.mem.write_u8(addr, value);
        }
    }

    #[test]
    fn test_u16_little_endian() {
        let mut mem = Memory::new();
        mem.write_u16(0x86, 0x1234);
        assert_eq!(mem.data[0x86], 0x34);
        assert_eq!(mem.data[0x87], 0x12);
        assert_eq!(mem.read_u16(0x86), 0x1234);
    }

    #[test]
    fn test_u16_writes_high_byte_first() {
        let mut t = Trace { mem: Memory::new(), writes: Vec::new() };
        t.write_u16(0x88, 0xBEEF);
        assert_eq!(t.writes, vec![0x89, 0x88]);
    }

    #[test]
    fn test_out_of_range() {
        let mut mem = Memory::new();
        mem.write_u8(0xFFFF, 0xAA);
        assert_eq!(mem.read_u8(0xFFFF), 0);
    }

    #[test]
    fn test_wide_access_at_end_of_address_space() {
        let mut mem = Memory::new();
        mem.write_u16(0xFFFF, 0x1234);
        assert_eq!(mem.read_u16(0xFFFF), 0);
        mem.write_bytes(0xFFFE, &[1, 2, 3]);
        assert_eq!(mem.read_bytes::<3>(0xFFFE), [0, 0, 0]);
        assert!(mem.data.iter().all(|&b| b == 0));
    }

    #[test]
    fn test_bytes() {
        let mut mem = Memory::new();
        mem.write_bytes(0x80, &[1, 2, 3]);
        assert_eq!(mem.read_bytes::<3>(0x80), [1, 2, 3]);
    }
}
