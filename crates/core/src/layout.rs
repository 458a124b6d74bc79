//! Bit-field layouts.
//!
//! Multi-purpose registers are modelled as plain byte images. Each named
//! sub-field is a [`BitField`] (byte index + shift + width); bits no field
//! covers are reserved and are carried through every read-modify-write
//! untouched.
//!
//! The one-byte images here are shared by all counters:
//!
//! ```text
//! Status / Interrupts   7 6 5 4 3 2 1 0
//!                       - - E - - B A D    D=done A/B=mark E=event (counter 2)
//! Global control        S - - - - - 3 P    P=reset 1/2 prescaler 3=reset counter 3 prescaler S=stop
//! Async state           - X R C A B 1 2    2/1=control byte busy B/A=mark busy C=current busy
//!                                          R=run from external clock X=enable external clock
//! ```

use serde::{Deserialize, Serialize};

/// A named sub-field of a register image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitField {
    pub byte: usize,
    pub shift: u8,
    pub width: u8,
}

impl BitField {
    pub const fn new(byte: usize, shift: u8, width: u8) -> Self {
        BitField { byte, shift, width }
    }

    /// Mask of the field within its byte.
    pub const fn mask(self) -> u8 {
        (((1u16 << self.width) - 1) as u8) << self.shift
    }

    pub const fn get(self, bytes: &[u8]) -> u8 {
        (bytes[self.byte] & self.mask()) >> self.shift
    }

    /// Replace the field, leaving every other bit of the byte as it was.
    /// Excess high bits of `value` are discarded.
    pub fn set(self, bytes: &mut [u8], value: u8) {
        let m = self.mask();
        bytes[self.byte] = (bytes[self.byte] & !m) | ((value << self.shift) & m);
    }

    pub const fn is_set(self, bytes: &[u8]) -> bool {
        self.get(bytes) != 0
    }

    pub fn set_flag(self, bytes: &mut [u8], on: bool) {
        self.set(bytes, on as u8);
    }
}

/// What a mark match does to the counter's output pin.
///
/// "Set" and "Clear" swap meaning in some PWM algorithms, so the names are
/// the raw hardware actions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum PinAction {
    #[default]
    None = 0,
    Toggle = 1,
    Set = 2,
    Clear = 3,
}

impl PinAction {
    /// Decode a 2-bit field; upper bits are ignored.
    pub const fn from_bits(bits: u8) -> Self {
        match bits & 0b11 {
            0 => PinAction::None,
            1 => PinAction::Toggle,
            2 => PinAction::Set,
            _ => PinAction::Clear,
        }
    }

    pub const fn bits(self) -> u8 {
        self as u8
    }
}

macro_rules! flag_accessors {
    ($($(#[$attr:meta])* $mask:ident = $bit:literal: $get:ident, $set:ident;)+) => {
        $(
            $(#[$attr])*
            pub const $mask: u8 = 1 << $bit;

            #[inline]
            pub const fn $get(self) -> bool {
                self.0 & Self::$mask != 0
            }

            #[inline]
            pub fn $set(&mut self, on: bool) {
                if on { self.0 |= Self::$mask } else { self.0 &= !Self::$mask }
            }
        )+
    };
}

/// Flags raised by the hardware. Writing a 1 to a flag clears it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status(pub u8);

impl Status {
    flag_accessors! {
        /// Counter wrapped around (or reached the bottom in symmetric modes).
        DONE = 0: done, set_done;
        GOT_MARK_A = 1: got_mark_a, set_got_mark_a;
        GOT_MARK_B = 2: got_mark_b, set_got_mark_b;
        /// Counter 2 only.
        GOT_EVENT_MARK = 5: got_event_mark, set_got_event_mark;
    }
}

/// Interrupt enables, same bit positions as [`Status`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interrupts(pub u8);

impl Interrupts {
    flag_accessors! {
        ON_DONE = 0: on_done, set_on_done;
        ON_MARK_A = 1: on_mark_a, set_on_mark_a;
        ON_MARK_B = 2: on_mark_b, set_on_mark_b;
        /// Counter 2 only.
        ON_EVENT = 5: on_event, set_on_event;
    }
}

/// Start/stop gate for the prescalers of all counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalControl(pub u8);

impl GlobalControl {
    flag_accessors! {
        RESET_COUNTERS12_PRESCALER = 0: reset_counters12_prescaler, set_reset_counters12_prescaler;
        RESET_COUNTER3_PRESCALER = 1: reset_counter3_prescaler, set_reset_counter3_prescaler;
        /// While set, the prescaler reset bits stay asserted and no counter ticks.
        STOP_COUNTERS = 7: stop_counters, set_stop_counters;
    }
}

/// Counter 3 asynchronous domain state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AsyncState(pub u8);

impl AsyncState {
    flag_accessors! {
        UPDATING_CONTROL_BYTE2 = 0: updating_control_byte2, set_updating_control_byte2;
        UPDATING_CONTROL_BYTE1 = 1: updating_control_byte1, set_updating_control_byte1;
        UPDATING_MARK_B = 2: updating_mark_b, set_updating_mark_b;
        UPDATING_MARK_A = 3: updating_mark_a, set_updating_mark_a;
        UPDATING_CURRENT = 4: updating_current, set_updating_current;
        RUN_FROM_EXTERNAL_CLOCK = 5: run_from_external_clock, set_run_from_external_clock;
        ENABLE_EXTERNAL_CLOCK = 6: enable_external_clock, set_enable_external_clock;
    }

    /// Bits that select counter 3's clock; the rest are busy flags.
    pub const CLOCK_SELECT: u8 = Self::RUN_FROM_EXTERNAL_CLOCK | Self::ENABLE_EXTERNAL_CLOCK;

    /// A write to the asynchronous domain has not landed yet.
    pub const fn is_updating(self) -> bool {
        self.0 & 0b1_1111 != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bitfield_mask() {
        assert_eq!(BitField::new(0, 0, 2).mask(), 0b0000_0011);
        assert_eq!(BitField::new(0, 6, 2).mask(), 0b1100_0000);
        assert_eq!(BitField::new(1, 3, 2).mask(), 0b0001_1000);
        assert_eq!(BitField::new(0, 0, 8).mask(), 0xFF);
    }

    #[test]
    fn test_bitfield_set_preserves_neighbours() {
        let field = BitField::new(1, 3, 2);
        let mut bytes = [0xFF, 0xFF];
        field.set(&mut bytes, 0b10);
        assert_eq!(bytes, [0xFF, 0b1111_0111]);
        assert_eq!(field.get(&bytes), 0b10);

        // Only the low `width` bits of the value land in the field.
        field.set(&mut bytes, 0xFD);
        assert_eq!(bytes, [0xFF, 0b1110_1111]);
    }

    #[test]
    fn test_pin_action_bits() {
        for action in [PinAction::None, PinAction::Toggle, PinAction::Set, PinAction::Clear] {
            assert_eq!(PinAction::from_bits(action.bits()), action);
        }
        assert_eq!(PinAction::from_bits(0b110), PinAction::Set);
    }

    #[test]
    fn test_status_flags() {
        let s = Status(0b0010_0010);
        assert!(s.got_mark_a());
        assert!(s.got_event_mark());
        assert!(!s.done());
        assert!(!s.got_mark_b());
    }

    #[test]
    fn test_global_control_flags() {
        let mut c = GlobalControl(0b0000_0001);
        c.set_stop_counters(true);
        assert_eq!(c.0, 0b1000_0001);
        c.set_reset_counters12_prescaler(false);
        assert_eq!(c.0, 0b1000_0000);
    }

    #[test]
    fn test_async_state_updating() {
        assert!(!AsyncState(AsyncState::RUN_FROM_EXTERNAL_CLOCK).is_updating());
        assert!(AsyncState(AsyncState::UPDATING_MARK_A).is_updating());
        assert!(!AsyncState(AsyncState::CLOCK_SELECT).is_updating());
        assert_eq!(AsyncState::CLOCK_SELECT, 0b0110_0000);
    }
}
