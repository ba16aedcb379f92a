//! 2A03 processor status register (P).
//!
//! Stored as six booleans. The packed byte only exists at the edges: when
//! P is pushed, pulled, or shown in a trace.

/// Carry flag - set if operation resulted in carry/no borrow.
pub const C: u8 = 0x01;

/// Zero flag - set if result is zero.
pub const Z: u8 = 0x02;

/// Interrupt disable - when set, IRQ interrupts are ignored.
pub const I: u8 = 0x04;

/// Decimal mode - stored and pushed, but the 2A03 has no BCD adder.
pub const D: u8 = 0x08;

/// Break bit - only exists in a pushed copy of P.
/// Set when BRK/PHP push status, clear when IRQ/NMI push status.
pub const B: u8 = 0x10;

/// Unused bit - always reads as 1.
pub const U: u8 = 0x20;

/// Overflow flag - set if signed arithmetic overflowed.
pub const V: u8 = 0x40;

/// Negative flag - set if result has bit 7 set.
pub const N: u8 = 0x80;

/// Processor status register.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Status {
    pub n: bool,
    pub v: bool,
    pub d: bool,
    pub i: bool,
    pub z: bool,
    pub c: bool,
}

impl Status {
    /// Unpack a byte in N V - - D I Z C order. Bits 5 and 4 are dropped.
    #[must_use]
    pub const fn from_byte(value: u8) -> Self {
        Self {
            n: value & N != 0,
            v: value & V != 0,
            d: value & D != 0,
            i: value & I != 0,
            z: value & Z != 0,
            c: value & C != 0,
        }
    }

    /// Packed value as the CPU reports it: bits 5 and 4 read as 1.
    #[must_use]
    pub const fn to_byte(self) -> u8 {
        self.pushed(true)
    }

    /// Packed value for a stack push.
    ///
    /// `brk` is true for BRK and PHP, false for hardware IRQ and NMI.
    #[must_use]
    pub const fn pushed(self, brk: bool) -> u8 {
        let mut value = U;
        if brk {
            value |= B;
        }
        if self.n {
            value |= N;
        }
        if self.v {
            value |= V;
        }
        if self.d {
            value |= D;
        }
        if self.i {
            value |= I;
        }
        if self.z {
            value |= Z;
        }
        if self.c {
            value |= C;
        }
        value
    }

    /// Check a flag by mask.
    #[must_use]
    pub const fn is_set(self, flag: u8) -> bool {
        self.to_byte() & flag != 0
    }

    /// Set Z and N from a result byte.
    pub fn set_zn(&mut self, value: u8) {
        self.z = value == 0;
        self.n = (value as i8) < 0;
    }
}
