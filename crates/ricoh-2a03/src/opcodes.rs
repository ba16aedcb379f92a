//! Opcode decode table.
//!
//! One entry per opcode byte: mnemonic, addressing mode, base cycle cost and
//! whether the opcode belongs to the documented instruction set. The
//! executor and the disassembler both index [`OPCODES`], so they cannot
//! disagree about how an opcode is laid out.
//!
//! `decode` matches on every `u8` value without a wildcard arm, so a missing
//! opcode is a compile error rather than a runtime fall-through.

/// Instruction mnemonic.
#[rustfmt::skip]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mnemonic {
    Adc, And, Asl, Bcc, Bcs, Beq, Bit, Bmi, Bne, Bpl, Brk, Bvc, Bvs, Clc,
    Cld, Cli, Clv, Cmp, Cpx, Cpy, Dec, Dex, Dey, Eor, Inc, Inx, Iny, Jmp,
    Jsr, Lda, Ldx, Ldy, Lsr, Nop, Ora, Pha, Php, Pla, Plp, Rol, Ror, Rti,
    Rts, Sbc, Sec, Sed, Sei, Sta, Stx, Sty, Tax, Tay, Tsx, Txa, Txs, Tya,
    // Undocumented
    Ahx, Alr, Anc, Arr, Axs, Dcp, Isb, Kil, Las, Lax, Lxa, Rla, Rra, Sax,
    Shx, Shy, Slo, Sre, Tas, Xaa,
}

impl Mnemonic {
    /// Three-letter name as printed by the disassembler.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Adc => "ADC",
            Self::And => "AND",
            Self::Asl => "ASL",
            Self::Bcc => "BCC",
            Self::Bcs => "BCS",
            Self::Beq => "BEQ",
            Self::Bit => "BIT",
            Self::Bmi => "BMI",
            Self::Bne => "BNE",
            Self::Bpl => "BPL",
            Self::Brk => "BRK",
            Self::Bvc => "BVC",
            Self::Bvs => "BVS",
            Self::Clc => "CLC",
            Self::Cld => "CLD",
            Self::Cli => "CLI",
            Self::Clv => "CLV",
            Self::Cmp => "CMP",
            Self::Cpx => "CPX",
            Self::Cpy => "CPY",
            Self::Dec => "DEC",
            Self::Dex => "DEX",
            Self::Dey => "DEY",
            Self::Eor => "EOR",
            Self::Inc => "INC",
            Self::Inx => "INX",
            Self::Iny => "INY",
            Self::Jmp => "JMP",
            Self::Jsr => "JSR",
            Self::Lda => "LDA",
            Self::Ldx => "LDX",
            Self::Ldy => "LDY",
            Self::Lsr => "LSR",
            Self::Nop => "NOP",
            Self::Ora => "ORA",
            Self::Pha => "PHA",
            Self::Php => "PHP",
            Self::Pla => "PLA",
            Self::Plp => "PLP",
            Self::Rol => "ROL",
            Self::Ror => "ROR",
            Self::Rti => "RTI",
            Self::Rts => "RTS",
            Self::Sbc => "SBC",
            Self::Sec => "SEC",
            Self::Sed => "SED",
            Self::Sei => "SEI",
            Self::Sta => "STA",
            Self::Stx => "STX",
            Self::Sty => "STY",
            Self::Tax => "TAX",
            Self::Tay => "TAY",
            Self::Tsx => "TSX",
            Self::Txa => "TXA",
            Self::Txs => "TXS",
            Self::Tya => "TYA",
            Self::Ahx => "AHX",
            Self::Alr => "ALR",
            Self::Anc => "ANC",
            Self::Arr => "ARR",
            Self::Axs => "AXS",
            Self::Dcp => "DCP",
            Self::Isb => "ISB",
            Self::Kil => "KIL",
            Self::Las => "LAS",
            Self::Lax => "LAX",
            Self::Lxa => "LXA",
            Self::Rla => "RLA",
            Self::Rra => "RRA",
            Self::Sax => "SAX",
            Self::Shx => "SHX",
            Self::Shy => "SHY",
            Self::Slo => "SLO",
            Self::Sre => "SRE",
            Self::Tas => "TAS",
            Self::Xaa => "XAA",
        }
    }

    /// How the instruction touches its operand.
    #[must_use]
    pub const fn access(self) -> Access {
        match self {
            Self::Sta | Self::Stx | Self::Sty | Self::Sax | Self::Ahx | Self::Shx | Self::Shy
            | Self::Tas => Access::Write,
            Self::Asl | Self::Lsr | Self::Rol | Self::Ror | Self::Inc | Self::Dec | Self::Slo
            | Self::Rla | Self::Sre | Self::Rra | Self::Dcp | Self::Isb => Access::Modify,
            _ => Access::Read,
        }
    }

    /// True for the conditional branches.
    #[must_use]
    pub const fn is_branch(self) -> bool {
        matches!(
            self,
            Self::Bcc | Self::Bcs | Self::Beq | Self::Bmi | Self::Bne | Self::Bpl | Self::Bvc | Self::Bvs
        )
    }
}

/// Operand access kind. Decides when indexed modes pay the page penalty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Penalty cycle only when the index crosses a page.
    Read,
    /// Penalty cycle always.
    Write,
    /// Penalty cycle always, plus the dummy write-back.
    Modify,
}

/// Addressing mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Implied,
    Accumulator,
    Immediate,
    ZeroPage,
    ZeroPageX,
    ZeroPageY,
    Absolute,
    AbsoluteX,
    AbsoluteY,
    Indirect,
    IndexedIndirect,
    IndirectIndexed,
    Relative,
}

impl Mode {
    /// Instruction length in bytes, opcode included.
    #[must_use]
    pub const fn size(self) -> u16 {
        match self {
            Self::Implied | Self::Accumulator => 1,
            Self::Immediate
            | Self::ZeroPage
            | Self::ZeroPageX
            | Self::ZeroPageY
            | Self::IndexedIndirect
            | Self::IndirectIndexed
            | Self::Relative => 2,
            Self::Absolute | Self::AbsoluteX | Self::AbsoluteY | Self::Indirect => 3,
        }
    }
}

/// One decoded opcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Opcode {
    pub mnemonic: Mnemonic,
    pub mode: Mode,
    /// Cycles without page-cross or branch penalties.
    pub cycles: u8,
    /// False for undocumented opcodes.
    pub official: bool,
}

const fn op(mnemonic: Mnemonic, mode: Mode, cycles: u8) -> Opcode {
    Opcode {
        mnemonic,
        mode,
        cycles,
        official: true,
    }
}

const fn un(mnemonic: Mnemonic, mode: Mode, cycles: u8) -> Opcode {
    Opcode {
        mnemonic,
        mode,
        cycles,
        official: false,
    }
}

/// Decode table indexed by opcode byte.
pub static OPCODES: [Opcode; 256] = build_table();

const fn build_table() -> [Opcode; 256] {
    let mut table = [op(Mnemonic::Brk, Mode::Implied, 7); 256];
    let mut i = 0;
    while i < 256 {
        table[i] = decode(i as u8);
        i += 1;
    }
    table
}

#[rustfmt::skip]
#[allow(clippy::enum_glob_use)]
const fn decode(opcode: u8) -> Opcode {
    use Mnemonic::*;
    use Mode::*;

    match opcode {
        // Loads
        0xA9 => op(Lda, Immediate, 2),
        0xA5 => op(Lda, ZeroPage, 3),
        0xB5 => op(Lda, ZeroPageX, 4),
        0xAD => op(Lda, Absolute, 4),
        0xBD => op(Lda, AbsoluteX, 4),
        0xB9 => op(Lda, AbsoluteY, 4),
        0xA1 => op(Lda, IndexedIndirect, 6),
        0xB1 => op(Lda, IndirectIndexed, 5),

        0xA2 => op(Ldx, Immediate, 2),
        0xA6 => op(Ldx, ZeroPage, 3),
        0xB6 => op(Ldx, ZeroPageY, 4),
        0xAE => op(Ldx, Absolute, 4),
        0xBE => op(Ldx, AbsoluteY, 4),

        0xA0 => op(Ldy, Immediate, 2),
        0xA4 => op(Ldy, ZeroPage, 3),
        0xB4 => op(Ldy, ZeroPageX, 4),
        0xAC => op(Ldy, Absolute, 4),
        0xBC => op(Ldy, AbsoluteX, 4),

        // Stores
        0x85 => op(Sta, ZeroPage, 3),
        0x95 => op(Sta, ZeroPageX, 4),
        0x8D => op(Sta, Absolute, 4),
        0x9D => op(Sta, AbsoluteX, 5),
        0x99 => op(Sta, AbsoluteY, 5),
        0x81 => op(Sta, IndexedIndirect, 6),
        0x91 => op(Sta, IndirectIndexed, 6),

        0x86 => op(Stx, ZeroPage, 3),
        0x96 => op(Stx, ZeroPageY, 4),
        0x8E => op(Stx, Absolute, 4),

        0x84 => op(Sty, ZeroPage, 3),
        0x94 => op(Sty, ZeroPageX, 4),
        0x8C => op(Sty, Absolute, 4),

        // Arithmetic and logic
        0x69 => op(Adc, Immediate, 2),
        0x65 => op(Adc, ZeroPage, 3),
        0x75 => op(Adc, ZeroPageX, 4),
        0x6D => op(Adc, Absolute, 4),
        0x7D => op(Adc, AbsoluteX, 4),
        0x79 => op(Adc, AbsoluteY, 4),
        0x61 => op(Adc, IndexedIndirect, 6),
        0x71 => op(Adc, IndirectIndexed, 5),

        0xE9 => op(Sbc, Immediate, 2),
        0xE5 => op(Sbc, ZeroPage, 3),
        0xF5 => op(Sbc, ZeroPageX, 4),
        0xED => op(Sbc, Absolute, 4),
        0xFD => op(Sbc, AbsoluteX, 4),
        0xF9 => op(Sbc, AbsoluteY, 4),
        0xE1 => op(Sbc, IndexedIndirect, 6),
        0xF1 => op(Sbc, IndirectIndexed, 5),

        0x29 => op(And, Immediate, 2),
        0x25 => op(And, ZeroPage, 3),
        0x35 => op(And, ZeroPageX, 4),
        0x2D => op(And, Absolute, 4),
        0x3D => op(And, AbsoluteX, 4),
        0x39 => op(And, AbsoluteY, 4),
        0x21 => op(And, IndexedIndirect, 6),
        0x31 => op(And, IndirectIndexed, 5),

        0x09 => op(Ora, Immediate, 2),
        0x05 => op(Ora, ZeroPage, 3),
        0x15 => op(Ora, ZeroPageX, 4),
        0x0D => op(Ora, Absolute, 4),
        0x1D => op(Ora, AbsoluteX, 4),
        0x19 => op(Ora, AbsoluteY, 4),
        0x01 => op(Ora, IndexedIndirect, 6),
        0x11 => op(Ora, IndirectIndexed, 5),

        0x49 => op(Eor, Immediate, 2),
        0x45 => op(Eor, ZeroPage, 3),
        0x55 => op(Eor, ZeroPageX, 4),
        0x4D => op(Eor, Absolute, 4),
        0x5D => op(Eor, AbsoluteX, 4),
        0x59 => op(Eor, AbsoluteY, 4),
        0x41 => op(Eor, IndexedIndirect, 6),
        0x51 => op(Eor, IndirectIndexed, 5),

        0xC9 => op(Cmp, Immediate, 2),
        0xC5 => op(Cmp, ZeroPage, 3),
        0xD5 => op(Cmp, ZeroPageX, 4),
        0xCD => op(Cmp, Absolute, 4),
        0xDD => op(Cmp, AbsoluteX, 4),
        0xD9 => op(Cmp, AbsoluteY, 4),
        0xC1 => op(Cmp, IndexedIndirect, 6),
        0xD1 => op(Cmp, IndirectIndexed, 5),

        0xE0 => op(Cpx, Immediate, 2),
        0xE4 => op(Cpx, ZeroPage, 3),
        0xEC => op(Cpx, Absolute, 4),

        0xC0 => op(Cpy, Immediate, 2),
        0xC4 => op(Cpy, ZeroPage, 3),
        0xCC => op(Cpy, Absolute, 4),

        0x24 => op(Bit, ZeroPage, 3),
        0x2C => op(Bit, Absolute, 4),

        // Shifts, rotates, increments
        0x0A => op(Asl, Accumulator, 2),
        0x06 => op(Asl, ZeroPage, 5),
        0x16 => op(Asl, ZeroPageX, 6),
        0x0E => op(Asl, Absolute, 6),
        0x1E => op(Asl, AbsoluteX, 7),

        0x4A => op(Lsr, Accumulator, 2),
        0x46 => op(Lsr, ZeroPage, 5),
        0x56 => op(Lsr, ZeroPageX, 6),
        0x4E => op(Lsr, Absolute, 6),
        0x5E => op(Lsr, AbsoluteX, 7),

        0x2A => op(Rol, Accumulator, 2),
        0x26 => op(Rol, ZeroPage, 5),
        0x36 => op(Rol, ZeroPageX, 6),
        0x2E => op(Rol, Absolute, 6),
        0x3E => op(Rol, AbsoluteX, 7),

        0x6A => op(Ror, Accumulator, 2),
        0x66 => op(Ror, ZeroPage, 5),
        0x76 => op(Ror, ZeroPageX, 6),
        0x6E => op(Ror, Absolute, 6),
        0x7E => op(Ror, AbsoluteX, 7),

        0xE6 => op(Inc, ZeroPage, 5),
        0xF6 => op(Inc, ZeroPageX, 6),
        0xEE => op(Inc, Absolute, 6),
        0xFE => op(Inc, AbsoluteX, 7),

        0xC6 => op(Dec, ZeroPage, 5),
        0xD6 => op(Dec, ZeroPageX, 6),
        0xCE => op(Dec, Absolute, 6),
        0xDE => op(Dec, AbsoluteX, 7),

        0xE8 => op(Inx, Implied, 2),
        0xC8 => op(Iny, Implied, 2),
        0xCA => op(Dex, Implied, 2),
        0x88 => op(Dey, Implied, 2),

        // Transfers
        0xAA => op(Tax, Implied, 2),
        0xA8 => op(Tay, Implied, 2),
        0x8A => op(Txa, Implied, 2),
        0x98 => op(Tya, Implied, 2),
        0xBA => op(Tsx, Implied, 2),
        0x9A => op(Txs, Implied, 2),

        // Flags
        0x18 => op(Clc, Implied, 2),
        0x38 => op(Sec, Implied, 2),
        0x58 => op(Cli, Implied, 2),
        0x78 => op(Sei, Implied, 2),
        0xB8 => op(Clv, Implied, 2),
        0xD8 => op(Cld, Implied, 2),
        0xF8 => op(Sed, Implied, 2),

        // Stack
        0x48 => op(Pha, Implied, 3),
        0x08 => op(Php, Implied, 3),
        0x68 => op(Pla, Implied, 4),
        0x28 => op(Plp, Implied, 4),

        // Control flow
        0x4C => op(Jmp, Absolute, 3),
        0x6C => op(Jmp, Indirect, 5),
        0x20 => op(Jsr, Absolute, 6),
        0x60 => op(Rts, Implied, 6),
        0x40 => op(Rti, Implied, 6),
        0x00 => op(Brk, Implied, 7),

        0x90 => op(Bcc, Relative, 2),
        0xB0 => op(Bcs, Relative, 2),
        0xF0 => op(Beq, Relative, 2),
        0xD0 => op(Bne, Relative, 2),
        0x30 => op(Bmi, Relative, 2),
        0x10 => op(Bpl, Relative, 2),
        0x50 => op(Bvc, Relative, 2),
        0x70 => op(Bvs, Relative, 2),

        0xEA => op(Nop, Implied, 2),

        // Undocumented: jam
        0x02 | 0x12 | 0x22 | 0x32 | 0x42 | 0x52 | 0x62 | 0x72 | 0x92 | 0xB2 | 0xD2 | 0xF2 => {
            un(Kil, Implied, 2)
        }

        // Undocumented: NOPs grouped by addressing mode
        0x1A | 0x3A | 0x5A | 0x7A | 0xDA | 0xFA => un(Nop, Implied, 2),
        0x80 | 0x82 | 0x89 | 0xC2 | 0xE2 => un(Nop, Immediate, 2),
        0x04 | 0x44 | 0x64 => un(Nop, ZeroPage, 3),
        0x14 | 0x34 | 0x54 | 0x74 | 0xD4 | 0xF4 => un(Nop, ZeroPageX, 4),
        0x0C => un(Nop, Absolute, 4),
        0x1C | 0x3C | 0x5C | 0x7C | 0xDC | 0xFC => un(Nop, AbsoluteX, 4),

        // Undocumented: combined read-modify-write + ALU
        0x07 => un(Slo, ZeroPage, 5),
        0x17 => un(Slo, ZeroPageX, 6),
        0x0F => un(Slo, Absolute, 6),
        0x1F => un(Slo, AbsoluteX, 7),
        0x1B => un(Slo, AbsoluteY, 7),
        0x03 => un(Slo, IndexedIndirect, 8),
        0x13 => un(Slo, IndirectIndexed, 8),

        0x27 => un(Rla, ZeroPage, 5),
        0x37 => un(Rla, ZeroPageX, 6),
        0x2F => un(Rla, Absolute, 6),
        0x3F => un(Rla, AbsoluteX, 7),
        0x3B => un(Rla, AbsoluteY, 7),
        0x23 => un(Rla, IndexedIndirect, 8),
        0x33 => un(Rla, IndirectIndexed, 8),

        0x47 => un(Sre, ZeroPage, 5),
        0x57 => un(Sre, ZeroPageX, 6),
        0x4F => un(Sre, Absolute, 6),
        0x5F => un(Sre, AbsoluteX, 7),
        0x5B => un(Sre, AbsoluteY, 7),
        0x43 => un(Sre, IndexedIndirect, 8),
        0x53 => un(Sre, IndirectIndexed, 8),

        0x67 => un(Rra, ZeroPage, 5),
        0x77 => un(Rra, ZeroPageX, 6),
        0x6F => un(Rra, Absolute, 6),
        0x7F => un(Rra, AbsoluteX, 7),
        0x7B => un(Rra, AbsoluteY, 7),
        0x63 => un(Rra, IndexedIndirect, 8),
        0x73 => un(Rra, IndirectIndexed, 8),

        0xC7 => un(Dcp, ZeroPage, 5),
        0xD7 => un(Dcp, ZeroPageX, 6),
        0xCF => un(Dcp, Absolute, 6),
        0xDF => un(Dcp, AbsoluteX, 7),
        0xDB => un(Dcp, AbsoluteY, 7),
        0xC3 => un(Dcp, IndexedIndirect, 8),
        0xD3 => un(Dcp, IndirectIndexed, 8),

        0xE7 => un(Isb, ZeroPage, 5),
        0xF7 => un(Isb, ZeroPageX, 6),
        0xEF => un(Isb, Absolute, 6),
        0xFF => un(Isb, AbsoluteX, 7),
        0xFB => un(Isb, AbsoluteY, 7),
        0xE3 => un(Isb, IndexedIndirect, 8),
        0xF3 => un(Isb, IndirectIndexed, 8),

        // Undocumented: loads and stores of A&X
        0xA7 => un(Lax, ZeroPage, 3),
        0xB7 => un(Lax, ZeroPageY, 4),
        0xAF => un(Lax, Absolute, 4),
        0xBF => un(Lax, AbsoluteY, 4),
        0xA3 => un(Lax, IndexedIndirect, 6),
        0xB3 => un(Lax, IndirectIndexed, 5),

        0x87 => un(Sax, ZeroPage, 3),
        0x97 => un(Sax, ZeroPageY, 4),
        0x8F => un(Sax, Absolute, 4),
        0x83 => un(Sax, IndexedIndirect, 6),

        // Undocumented: immediate ALU combinations
        0x0B | 0x2B => un(Anc, Immediate, 2),
        0x4B => un(Alr, Immediate, 2),
        0x6B => un(Arr, Immediate, 2),
        0x8B => un(Xaa, Immediate, 2),
        0xAB => un(Lxa, Immediate, 2),
        0xCB => un(Axs, Immediate, 2),
        0xEB => un(Sbc, Immediate, 2),

        // Undocumented: high-byte-and stores, LAS
        0x93 => un(Ahx, IndirectIndexed, 6),
        0x9F => un(Ahx, AbsoluteY, 5),
        0x9B => un(Tas, AbsoluteY, 5),
        0x9C => un(Shy, AbsoluteX, 5),
        0x9E => un(Shx, AbsoluteY, 5),
        0xBB => un(Las, AbsoluteY, 4),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documented_opcode_count() {
        let official = OPCODES.iter().filter(|op| op.official).count();
        assert_eq!(official, 151);
    }

    #[test]
    fn twelve_jam_opcodes() {
        let jams: Vec<usize> = (0..256)
            .filter(|&i| OPCODES[i].mnemonic == Mnemonic::Kil)
            .collect();
        assert_eq!(
            jams,
            vec![0x02, 0x12, 0x22, 0x32, 0x42, 0x52, 0x62, 0x72, 0x92, 0xB2, 0xD2, 0xF2]
        );
    }

    #[test]
    fn branches_use_relative_mode() {
        for entry in OPCODES.iter().filter(|op| op.mnemonic.is_branch()) {
            assert_eq!(entry.mode, Mode::Relative);
            assert_eq!(entry.cycles, 2);
        }
    }

    #[test]
    fn indexed_stores_have_fixed_cost() {
        assert_eq!(OPCODES[0x9D].cycles, 5);
        assert_eq!(OPCODES[0x99].cycles, 5);
        assert_eq!(OPCODES[0x91].cycles, 6);
        assert_eq!(OPCODES[0x9D].mnemonic.access(), Access::Write);
        assert_eq!(OPCODES[0xDF].mnemonic.access(), Access::Modify);
    }

    #[test]
    fn instruction_lengths() {
        assert_eq!(OPCODES[0xEA].mode.size(), 1);
        assert_eq!(OPCODES[0x0A].mode.size(), 1);
        assert_eq!(OPCODES[0xA9].mode.size(), 2);
        assert_eq!(OPCODES[0xD0].mode.size(), 2);
        assert_eq!(OPCODES[0x6C].mode.size(), 3);
        assert_eq!(OPCODES[0x20].mode.size(), 3);
    }
}
