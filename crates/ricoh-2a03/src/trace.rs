//! Per-instruction trace records in the `nestest.log` layout.

use std::fmt;

use emu_core::Bus;

use crate::Registers;
use crate::disasm::{Disassembly, disassemble};

/// Callback invoked with each instruction before it executes.
pub type TraceSink = Box<dyn FnMut(&TraceLine)>;

/// CPU state at the start of one instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceLine {
    pub disassembly: Disassembly,
    pub regs: Registers,
    /// Cycle count before the instruction's opcode fetch.
    pub cycles: u64,
}

impl TraceLine {
    /// Snapshot the instruction at PC. Uses `peek` only.
    #[must_use]
    pub fn capture<B: Bus + ?Sized>(bus: &B, regs: &Registers, cycles: u64) -> Self {
        Self {
            disassembly: disassemble(bus, regs, regs.pc),
            regs: *regs,
            cycles,
        }
    }
}

impl fmt::Display for TraceLine {
    /// `C000  4C F5 C5  JMP $C5F5    A:00 X:00 Y:00 P:34 SP:FD CYC:7`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = &self.disassembly.text;
        let (marker, body) = match text.strip_prefix('*') {
            Some(rest) => ('*', rest),
            None => (' ', text.as_str()),
        };
        write!(
            f,
            "{:04X}  {:<8} {}{:<31} A:{:02X} X:{:02X} Y:{:02X} P:{:02X} SP:{:02X} CYC:{}",
            self.disassembly.address,
            self.disassembly.hex_bytes(),
            marker,
            body,
            self.regs.a,
            self.regs.x,
            self.regs.y,
            self.regs.p.to_byte(),
            self.regs.s,
            self.cycles
        )
    }
}
