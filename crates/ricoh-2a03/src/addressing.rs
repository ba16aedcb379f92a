//! Bus access helpers and the addressing-mode resolver.
//!
//! Every bus access the CPU makes costs one cycle, and so does every
//! internal cycle where the real chip does a throwaway read. Dummy reads go
//! through `peek` so they never trigger register side effects. The dummy
//! write of a read-modify-write goes through `write`: it stores to the real
//! target, and memory-mapped registers must see both writes.
//!
//! The resolver consumes the operand bytes and computes where the operand
//! lives. It never touches the operand itself: that is the instruction's
//! job, so loads, stores and read-modify-write instructions can all share
//! one resolver.

use emu_core::Bus;

use crate::Ricoh2A03;
use crate::opcodes::{Access, Mode};

/// Resolved operand location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    /// No operand (implied instructions).
    Implied,
    /// The accumulator (shift/rotate on A).
    Accumulator,
    /// A memory address: effective address, immediate byte address, or
    /// jump/branch target.
    Memory(u16),
}

/// True if `a` and `b` are on different 256-byte pages.
#[must_use]
pub(crate) const fn page_crossed(a: u16, b: u16) -> bool {
    a & 0xFF00 != b & 0xFF00
}

impl Ricoh2A03 {
    // =========================================================================
    // Bus access
    // =========================================================================

    pub(crate) fn read<B: Bus>(&mut self, bus: &mut B, addr: u16) -> u8 {
        self.cycles += 1;
        bus.read(addr)
    }

    pub(crate) fn write<B: Bus>(&mut self, bus: &mut B, addr: u16, value: u8) {
        self.cycles += 1;
        bus.write(addr, value);
    }

    /// Throwaway read: costs a cycle, has no side effects.
    pub(crate) fn dummy_read<B: Bus>(&mut self, bus: &B, addr: u16) {
        self.cycles += 1;
        let _ = bus.peek(addr);
    }

    /// Internal cycle with no bus access of interest.
    pub(crate) fn idle(&mut self) {
        self.cycles += 1;
    }

    /// Read the byte at PC and advance PC.
    pub(crate) fn fetch<B: Bus>(&mut self, bus: &mut B) -> u8 {
        let value = self.read(bus, self.regs.pc);
        self.regs.pc = self.regs.pc.wrapping_add(1);
        value
    }

    /// Read a little-endian word at PC and advance PC by 2.
    pub(crate) fn fetch_word<B: Bus>(&mut self, bus: &mut B) -> u16 {
        let lo = self.fetch(bus);
        let hi = self.fetch(bus);
        u16::from_le_bytes([lo, hi])
    }

    /// Read a word through a pointer, with the 6502 page-wrap bug: the high
    /// byte comes from the same page as the low byte.
    pub(crate) fn read_indirect<B: Bus>(&mut self, bus: &mut B, ptr: u16) -> u16 {
        let lo = self.read(bus, ptr);
        let hi = self.read(bus, (ptr & 0xFF00) | (ptr.wrapping_add(1) & 0x00FF));
        u16::from_le_bytes([lo, hi])
    }

    /// Read a word from zero page; the pointer wraps within page zero.
    fn read_zero_page_word<B: Bus>(&mut self, bus: &mut B, ptr: u8) -> u16 {
        let lo = self.read(bus, u16::from(ptr));
        let hi = self.read(bus, u16::from(ptr.wrapping_add(1)));
        u16::from_le_bytes([lo, hi])
    }

    pub(crate) fn push<B: Bus>(&mut self, bus: &mut B, value: u8) {
        let addr = self.regs.push();
        self.write(bus, addr, value);
    }

    pub(crate) fn pull<B: Bus>(&mut self, bus: &mut B) -> u8 {
        let addr = self.regs.pop();
        self.read(bus, addr)
    }

    pub(crate) fn push_word<B: Bus>(&mut self, bus: &mut B, value: u16) {
        let [lo, hi] = value.to_le_bytes();
        self.push(bus, hi);
        self.push(bus, lo);
    }

    pub(crate) fn pull_word<B: Bus>(&mut self, bus: &mut B) -> u16 {
        let lo = self.pull(bus);
        let hi = self.pull(bus);
        u16::from_le_bytes([lo, hi])
    }

    // =========================================================================
    // Resolver
    // =========================================================================

    /// Consume the operand bytes for `mode` and locate the operand.
    pub(crate) fn resolve<B: Bus>(&mut self, bus: &mut B, mode: Mode, access: Access) -> Operand {
        match mode {
            Mode::Implied => {
                self.dummy_read(bus, self.regs.pc);
                Operand::Implied
            }
            Mode::Accumulator => {
                self.dummy_read(bus, self.regs.pc);
                Operand::Accumulator
            }
            Mode::Immediate => {
                let addr = self.regs.pc;
                self.regs.pc = self.regs.pc.wrapping_add(1);
                Operand::Memory(addr)
            }
            Mode::ZeroPage => Operand::Memory(u16::from(self.fetch(bus))),
            Mode::ZeroPageX => self.zero_page_indexed(bus, self.regs.x),
            Mode::ZeroPageY => self.zero_page_indexed(bus, self.regs.y),
            Mode::Absolute => Operand::Memory(self.fetch_word(bus)),
            Mode::AbsoluteX => {
                let base = self.fetch_word(bus);
                self.indexed(bus, base, self.regs.x, access)
            }
            Mode::AbsoluteY => {
                let base = self.fetch_word(bus);
                self.indexed(bus, base, self.regs.y, access)
            }
            Mode::Indirect => {
                let ptr = self.fetch_word(bus);
                Operand::Memory(self.read_indirect(bus, ptr))
            }
            Mode::IndexedIndirect => {
                let base = self.fetch(bus);
                // Index added during a throwaway read of the base pointer
                self.dummy_read(bus, u16::from(base));
                let ptr = base.wrapping_add(self.regs.x);
                Operand::Memory(self.read_zero_page_word(bus, ptr))
            }
            Mode::IndirectIndexed => {
                let ptr = self.fetch(bus);
                let base = self.read_zero_page_word(bus, ptr);
                self.indexed(bus, base, self.regs.y, access)
            }
            Mode::Relative => {
                let offset = self.fetch(bus) as i8;
                Operand::Memory(self.regs.pc.wrapping_add_signed(i16::from(offset)))
            }
        }
    }

    fn zero_page_indexed<B: Bus>(&mut self, bus: &mut B, index: u8) -> Operand {
        let base = self.fetch(bus);
        self.dummy_read(bus, u16::from(base));
        Operand::Memory(u16::from(base.wrapping_add(index)))
    }

    /// Add an index to a 16-bit base. Reads pay the extra cycle only when the
    /// page changes; writes and read-modify-writes always pay it.
    fn indexed<B: Bus>(&mut self, bus: &mut B, base: u16, index: u8, access: Access) -> Operand {
        let addr = base.wrapping_add(u16::from(index));
        if access != Access::Read || page_crossed(base, addr) {
            // The chip reads from the un-carried address first
            self.dummy_read(bus, (base & 0xFF00) | (addr & 0x00FF));
        }
        Operand::Memory(addr)
    }
}
