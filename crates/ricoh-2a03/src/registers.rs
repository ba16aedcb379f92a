//! 2A03 CPU registers.

use crate::Status;

/// Power-on value of P: I set, bits 5 and 4 reading as 1.
pub const POWER_ON_STATUS: u8 = 0x34;

/// CPU register set.
///
/// - A: 8-bit accumulator
/// - X, Y: 8-bit index registers
/// - S: 8-bit stack pointer (stack is at $0100-$01FF)
/// - PC: 16-bit program counter
/// - P: processor status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Registers {
    pub a: u8,
    pub x: u8,
    pub y: u8,
    /// Stack pointer (points to next free location).
    pub s: u8,
    pub pc: u16,
    pub p: Status,
}

impl Default for Registers {
    fn default() -> Self {
        Self::power_on()
    }
}

impl Registers {
    /// Registers as they are before the first reset sequence runs.
    ///
    /// Everything is zero except P. The reset sequence then moves S to $FD
    /// and loads PC from the reset vector.
    #[must_use]
    pub const fn power_on() -> Self {
        Self {
            a: 0,
            x: 0,
            y: 0,
            s: 0,
            pc: 0,
            p: Status::from_byte(POWER_ON_STATUS),
        }
    }

    /// Push slot: returns the address to write, then decrements S.
    pub fn push(&mut self) -> u16 {
        let addr = self.stack_addr();
        self.s = self.s.wrapping_sub(1);
        addr
    }

    /// Pull slot: increments S, then returns the address to read.
    pub fn pop(&mut self) -> u16 {
        self.s = self.s.wrapping_add(1);
        self.stack_addr()
    }

    /// Current stack address without modifying S.
    #[must_use]
    pub const fn stack_addr(&self) -> u16 {
        0x0100 | self.s as u16
    }
}
