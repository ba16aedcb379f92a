//! Ricoh 2A03 CPU core.
//!
//! The NES CPU is an NMOS 6502 without decimal mode. This crate steps it one
//! instruction at a time and counts every bus cycle, which is enough to
//! match the cycle column of the well-known `nestest.log` trace.
//!
//! - [`Ricoh2A03`]: registers, executor and interrupt entry points
//! - [`OPCODES`]: the 256-entry decode table shared by execution and
//!   disassembly
//! - [`Disassembly`]/[`TraceLine`]: side-effect-free debugging output

mod addressing;
mod cpu;
mod disasm;
pub mod flags;
mod interrupts;
mod opcodes;
mod registers;
mod trace;

pub use addressing::Operand;
pub use cpu::Ricoh2A03;
pub use disasm::{Disassembly, disassemble};
pub use flags::Status;
pub use interrupts::{IRQ_VECTOR, NMI_VECTOR, RESET_VECTOR};
pub use opcodes::{Access, Mnemonic, Mode, OPCODES, Opcode};
pub use registers::Registers;
pub use trace::{TraceLine, TraceSink};
