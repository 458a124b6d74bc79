//! Register address map.
//!
//! Fixed data-space addresses of every register the counters use, as
//! documented for the ATmega328P. Multi-byte registers are little-endian.
//!
//! | Counter | Status | Interrupts | Control     | Current | Marks          | Extra            |
//! |---------|--------|------------|-------------|---------|----------------|------------------|
//! | 1       | 0x35   | 0x6E       | 0x44 (2)    | 0x46    | A 0x47, B 0x48 |                  |
//! | 2       | 0x36   | 0x6F       | 0x80 (3)    | 0x84 (2)| A 0x88, B 0x8A | event mark 0x86  |
//! | 3       | 0x37   | 0x70       | 0xB0 (2)    | 0xB2    | A 0xB3, B 0xB4 | async state 0xB6 |
//!
//! The global start/stop register at 0x43 is shared by all three counters.

use crate::CounterId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Register {
    /// Datasheet name of the (first byte of the) register.
    pub name: &'static str,
    pub addr: u16,
    /// Width in bytes.
    pub width: u8,
    /// Updated by the hardware on its own; never cache, never restore.
    pub volatile: bool,
}

impl Register {
    const fn config(name: &'static str, addr: u16, width: u8) -> Self {
        Register { name, addr, width, volatile: false }
    }

    const fn live(name: &'static str, addr: u16, width: u8) -> Self {
        Register { name, addr, width, volatile: true }
    }

    pub const fn contains(&self, addr: u16) -> bool {
        addr >= self.addr && addr < self.addr + self.width as u16
    }
}

/// Registers of an 8-bit counter (counters 1 and 3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Counter8Addrs {
    pub id: CounterId,
    pub status: Register,
    pub interrupts: Register,
    pub control: Register,
    pub current: Register,
    pub mark_a: Register,
    pub mark_b: Register,
    /// Only counter 3 can run from the asynchronous clock domain.
    pub async_state: Option<Register>,
}

/// Registers of the 16-bit counter (counter 2).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Counter16Addrs {
    pub id: CounterId,
    pub status: Register,
    pub interrupts: Register,
    pub control: Register,
    pub current: Register,
    /// Value captured from the event input pin.
    pub event_mark: Register,
    pub mark_a: Register,
    pub mark_b: Register,
}

pub const COUNTER1: Counter8Addrs = Counter8Addrs {
    id: CounterId::Counter1,
    status: Register::live("TIFR0", 0x35, 1),
    interrupts: Register::config("TIMSK0", 0x6E, 1),
    control: Register::config("TCCR0A", 0x44, 2),
    current: Register::live("TCNT0", 0x46, 1),
    mark_a: Register::config("OCR0A", 0x47, 1),
    mark_b: Register::config("OCR0B", 0x48, 1),
    async_state: None,
};

pub const COUNTER2: Counter16Addrs = Counter16Addrs {
    id: CounterId::Counter2,
    status: Register::live("TIFR1", 0x36, 1),
    interrupts: Register::config("TIMSK1", 0x6F, 1),
    control: Register::config("TCCR1A", 0x80, 3),
    current: Register::live("TCNT1", 0x84, 2),
    event_mark: Register::live("ICR1", 0x86, 2),
    mark_a: Register::config("OCR1A", 0x88, 2),
    mark_b: Register::config("OCR1B", 0x8A, 2),
};

/// Busy flags are hardware-owned; the clock-select bits are configuration.
const ASYNC_STATE: Register = Register::live("ASSR", 0xB6, 1);

pub const COUNTER3: Counter8Addrs = Counter8Addrs {
    id: CounterId::Counter3,
    status: Register::live("TIFR2", 0x37, 1),
    interrupts: Register::config("TIMSK2", 0x70, 1),
    control: Register::config("TCCR2A", 0xB0, 2),
    current: Register::live("TCNT2", 0xB2, 1),
    mark_a: Register::config("OCR2A", 0xB3, 1),
    mark_b: Register::config("OCR2B", 0xB4, 1),
    async_state: Some(ASYNC_STATE),
};

/// Prescaler reset and stop-all bits, shared by every counter.
pub const GLOBAL_CONTROL: Register = Register::config("GTCCR", 0x43, 1);

/// Every register in the map.
pub static ALL: [Register; 21] = [
    GLOBAL_CONTROL,
    COUNTER1.status,
    COUNTER1.interrupts,
    COUNTER1.control,
    COUNTER1.current,
    COUNTER1.mark_a,
    COUNTER1.mark_b,
    COUNTER2.status,
    COUNTER2.interrupts,
    COUNTER2.control,
    COUNTER2.current,
    COUNTER2.event_mark,
    COUNTER2.mark_a,
    COUNTER2.mark_b,
    COUNTER3.status,
    COUNTER3.interrupts,
    COUNTER3.control,
    COUNTER3.current,
    COUNTER3.mark_a,
    COUNTER3.mark_b,
    ASYNC_STATE,
];

/// Resolve a data-space address to the register covering it (if known).
pub fn register_at(addr: u16) -> Option<&'static Register> {
    ALL.iter().find(|r| r.contains(addr))
}
