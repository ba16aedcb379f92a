//! Disassembler.
//!
//! Produces nestest-style text: operands are followed by the address they
//! resolve to and the value found there, e.g. `LDA ($80),Y = 0300 @ 0302 = 89`.
//! Everything is read with `peek`, so disassembling never disturbs device
//! registers and never costs cycles.

use emu_core::Bus;

use crate::Registers;
use crate::opcodes::{Mnemonic, Mode, OPCODES};

/// One disassembled instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Disassembly {
    /// Address of the opcode byte.
    pub address: u16,
    /// Opcode and operand bytes (1 to 3).
    pub bytes: Vec<u8>,
    /// Mnemonic and operand. Undocumented opcodes start with `*`.
    pub text: String,
}

impl Disassembly {
    /// Address of the following instruction.
    #[must_use]
    pub fn next_address(&self) -> u16 {
        self.address.wrapping_add(self.bytes.len() as u16)
    }

    /// Bytes as space-separated hex, e.g. `4C F5 C5`.
    #[must_use]
    pub fn hex_bytes(&self) -> String {
        self.bytes
            .iter()
            .map(|b| format!("{b:02X}"))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Disassemble the instruction at `address`.
///
/// `regs` supplies X and Y for resolving indexed operands.
#[must_use]
pub fn disassemble<B: Bus + ?Sized>(bus: &B, regs: &Registers, address: u16) -> Disassembly {
    let opcode = bus.peek(address);
    let op = OPCODES[usize::from(opcode)];
    let bytes: Vec<u8> = (0..op.mode.size())
        .map(|i| bus.peek(address.wrapping_add(i)))
        .collect();

    let b1 = bus.peek(address.wrapping_add(1));
    let word = u16::from_le_bytes([b1, bus.peek(address.wrapping_add(2))]);

    let operand = match op.mode {
        Mode::Implied => String::new(),
        Mode::Accumulator => "A".to_string(),
        Mode::Immediate => format!("#${b1:02X}"),
        Mode::ZeroPage => format!("${b1:02X} = {:02X}", bus.peek(u16::from(b1))),
        Mode::ZeroPageX => zero_page_indexed(bus, b1, 'X', regs.x),
        Mode::ZeroPageY => zero_page_indexed(bus, b1, 'Y', regs.y),
        Mode::Absolute => match op.mnemonic {
            Mnemonic::Jmp | Mnemonic::Jsr => format!("${word:04X}"),
            _ => format!("${word:04X} = {:02X}", bus.peek(word)),
        },
        Mode::AbsoluteX => absolute_indexed(bus, word, 'X', regs.x),
        Mode::AbsoluteY => absolute_indexed(bus, word, 'Y', regs.y),
        Mode::Indirect => format!("(${word:04X}) = {:04X}", peek_indirect(bus, word)),
        Mode::IndexedIndirect => {
            let ptr = b1.wrapping_add(regs.x);
            let addr = peek_zero_page_word(bus, ptr);
            format!(
                "(${b1:02X},X) @ {ptr:02X} = {addr:04X} = {:02X}",
                bus.peek(addr)
            )
        }
        Mode::IndirectIndexed => {
            let base = peek_zero_page_word(bus, b1);
            let addr = base.wrapping_add(u16::from(regs.y));
            format!(
                "(${b1:02X}),Y = {base:04X} @ {addr:04X} = {:02X}",
                bus.peek(addr)
            )
        }
        Mode::Relative => {
            let target = address
                .wrapping_add(2)
                .wrapping_add_signed(i16::from(b1 as i8));
            format!("${target:04X}")
        }
    };

    let marker = if op.official { "" } else { "*" };
    let name = op.mnemonic.name();
    let text = if operand.is_empty() {
        format!("{marker}{name}")
    } else {
        format!("{marker}{name} {operand}")
    };

    Disassembly {
        address,
        bytes,
        text,
    }
}

fn zero_page_indexed<B: Bus + ?Sized>(bus: &B, base: u8, reg: char, index: u8) -> String {
    let addr = base.wrapping_add(index);
    format!(
        "${base:02X},{reg} @ {addr:02X} = {:02X}",
        bus.peek(u16::from(addr))
    )
}

fn absolute_indexed<B: Bus + ?Sized>(bus: &B, base: u16, reg: char, index: u8) -> String {
    let addr = base.wrapping_add(u16::from(index));
    format!("${base:04X},{reg} @ {addr:04X} = {:02X}", bus.peek(addr))
}

fn peek_zero_page_word<B: Bus + ?Sized>(bus: &B, ptr: u8) -> u16 {
    u16::from_le_bytes([
        bus.peek(u16::from(ptr)),
        bus.peek(u16::from(ptr.wrapping_add(1))),
    ])
}

/// Same page-wrap as the executor's indirect read.
fn peek_indirect<B: Bus + ?Sized>(bus: &B, ptr: u16) -> u16 {
    u16::from_le_bytes([
        bus.peek(ptr),
        bus.peek((ptr & 0xFF00) | (ptr.wrapping_add(1) & 0x00FF)),
    ])
}
