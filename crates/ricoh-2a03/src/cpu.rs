//! 2A03 CPU implementation.
//!
//! Instruction-stepped: each `step()` runs one whole instruction and the
//! cycle counter advances once per bus access or internal cycle, so the
//! count after every instruction matches real hardware.

use std::fmt;

use emu_core::{Bus, Cpu, Observable, Value};
use tracing::debug;

use crate::addressing::{Operand, page_crossed};
use crate::disasm::{self, Disassembly};
use crate::flags::{C, D, I, N, V, Z};
use crate::interrupts::{IRQ_VECTOR, NMI_VECTOR};
use crate::opcodes::{Mnemonic, OPCODES, Opcode};
use crate::trace::{TraceLine, TraceSink};
use crate::{Registers, Status};

/// Magic constant ORed into A by the unstable XAA and LXA opcodes.
const UNSTABLE_MAGIC: u8 = 0xEE;

/// The NES CPU.
pub struct Ricoh2A03 {
    /// CPU registers.
    pub regs: Registers,

    /// Cycles elapsed since power-on.
    pub(crate) cycles: u64,

    /// Set by a KIL opcode, cleared by reset.
    pub(crate) halted: bool,

    /// Optional per-instruction trace callback.
    trace: Option<TraceSink>,
}

impl fmt::Debug for Ricoh2A03 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ricoh2A03")
            .field("regs", &self.regs)
            .field("cycles", &self.cycles)
            .field("halted", &self.halted)
            .field("trace", &self.trace.is_some())
            .finish()
    }
}

impl Ricoh2A03 {
    /// Power on and run the reset sequence.
    ///
    /// Registers start at zero with P = $34; reset then moves S to $FD,
    /// loads PC from $FFFC and leaves the cycle count at 7.
    #[must_use]
    pub fn new<B: Bus>(bus: &mut B) -> Self {
        let mut cpu = Self {
            regs: Registers::power_on(),
            cycles: 0,
            halted: false,
            trace: None,
        };
        cpu.reset(bus);
        cpu
    }

    /// Total cycles elapsed since power-on.
    #[must_use]
    pub const fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Set PC directly, e.g. to enter a test ROM's automation entry point.
    pub fn jump(&mut self, address: u16) {
        self.regs.pc = address;
    }

    /// Disassemble the instruction at `address` using the current X and Y.
    ///
    /// Reads through `peek` only; no registers or cycles change.
    #[must_use]
    pub fn disassemble<B: Bus + ?Sized>(&self, bus: &B, address: u16) -> String {
        self.disassemble_instruction(bus, address).text
    }

    /// Like [`disassemble`](Self::disassemble) but keeps the raw bytes.
    #[must_use]
    pub fn disassemble_instruction<B: Bus + ?Sized>(&self, bus: &B, address: u16) -> Disassembly {
        disasm::disassemble(bus, &self.regs, address)
    }

    /// Install a callback that receives every instruction before it runs.
    pub fn set_trace_sink(&mut self, sink: impl FnMut(&TraceLine) + 'static) {
        self.trace = Some(Box::new(sink));
    }

    pub fn clear_trace_sink(&mut self) {
        self.trace = None;
    }

    // =========================================================================
    // Execution
    // =========================================================================

    fn execute<B: Bus>(&mut self, bus: &mut B, opcode: u8, op: Opcode, operand: Operand) {
        match op.mnemonic {
            // Loads and stores
            Mnemonic::Lda => {
                let val = self.load(bus, operand);
                self.do_lda(val);
            }
            Mnemonic::Ldx => {
                let val = self.load(bus, operand);
                self.do_ldx(val);
            }
            Mnemonic::Ldy => {
                let val = self.load(bus, operand);
                self.do_ldy(val);
            }
            Mnemonic::Sta => self.store(bus, operand, self.regs.a),
            Mnemonic::Stx => self.store(bus, operand, self.regs.x),
            Mnemonic::Sty => self.store(bus, operand, self.regs.y),

            // ALU
            Mnemonic::Adc => {
                let val = self.load(bus, operand);
                self.do_adc(val);
            }
            Mnemonic::Sbc => {
                let val = self.load(bus, operand);
                self.do_sbc(val);
            }
            Mnemonic::And => {
                let val = self.load(bus, operand);
                self.do_and(val);
            }
            Mnemonic::Ora => {
                let val = self.load(bus, operand);
                self.do_ora(val);
            }
            Mnemonic::Eor => {
                let val = self.load(bus, operand);
                self.do_eor(val);
            }
            Mnemonic::Cmp => {
                let val = self.load(bus, operand);
                self.do_compare(self.regs.a, val);
            }
            Mnemonic::Cpx => {
                let val = self.load(bus, operand);
                self.do_compare(self.regs.x, val);
            }
            Mnemonic::Cpy => {
                let val = self.load(bus, operand);
                self.do_compare(self.regs.y, val);
            }
            Mnemonic::Bit => {
                let val = self.load(bus, operand);
                self.do_bit(val);
            }

            // Read-modify-write
            Mnemonic::Asl => {
                self.modify(bus, operand, Self::do_asl);
            }
            Mnemonic::Lsr => {
                self.modify(bus, operand, Self::do_lsr);
            }
            Mnemonic::Rol => {
                self.modify(bus, operand, Self::do_rol);
            }
            Mnemonic::Ror => {
                self.modify(bus, operand, Self::do_ror);
            }
            Mnemonic::Inc => {
                self.modify(bus, operand, Self::do_inc);
            }
            Mnemonic::Dec => {
                self.modify(bus, operand, Self::do_dec);
            }

            // Register increments and transfers
            Mnemonic::Inx => {
                self.regs.x = self.regs.x.wrapping_add(1);
                self.regs.p.set_zn(self.regs.x);
            }
            Mnemonic::Iny => {
                self.regs.y = self.regs.y.wrapping_add(1);
                self.regs.p.set_zn(self.regs.y);
            }
            Mnemonic::Dex => {
                self.regs.x = self.regs.x.wrapping_sub(1);
                self.regs.p.set_zn(self.regs.x);
            }
            Mnemonic::Dey => {
                self.regs.y = self.regs.y.wrapping_sub(1);
                self.regs.p.set_zn(self.regs.y);
            }
            Mnemonic::Tax => self.do_ldx(self.regs.a),
            Mnemonic::Tay => self.do_ldy(self.regs.a),
            Mnemonic::Txa => self.do_lda(self.regs.x),
            Mnemonic::Tya => self.do_lda(self.regs.y),
            Mnemonic::Tsx => self.do_ldx(self.regs.s),
            // TXS does not touch flags
            Mnemonic::Txs => self.regs.s = self.regs.x,

            // Flags
            Mnemonic::Clc => self.regs.p.c = false,
            Mnemonic::Sec => self.regs.p.c = true,
            Mnemonic::Cli => self.regs.p.i = false,
            Mnemonic::Sei => self.regs.p.i = true,
            Mnemonic::Clv => self.regs.p.v = false,
            Mnemonic::Cld => self.regs.p.d = false,
            Mnemonic::Sed => self.regs.p.d = true,

            // Stack
            Mnemonic::Pha => self.push(bus, self.regs.a),
            Mnemonic::Php => {
                let value = self.regs.p.pushed(true);
                self.push(bus, value);
            }
            Mnemonic::Pla => {
                self.idle();
                let value = self.pull(bus);
                self.do_lda(value);
            }
            Mnemonic::Plp => {
                self.idle();
                let value = self.pull(bus);
                self.regs.p = Status::from_byte(value);
            }

            // Control flow
            Mnemonic::Jmp => self.regs.pc = Self::target(operand),
            Mnemonic::Jsr => self.op_jsr(bus, Self::target(operand)),
            Mnemonic::Rts => self.op_rts(bus),
            Mnemonic::Rti => self.op_rti(bus),
            Mnemonic::Brk => {
                // The padding byte after BRK is skipped
                let return_addr = self.regs.pc.wrapping_add(1);
                self.enter_interrupt(bus, IRQ_VECTOR, return_addr, true);
            }
            Mnemonic::Bcc => self.op_branch(operand, !self.regs.p.c),
            Mnemonic::Bcs => self.op_branch(operand, self.regs.p.c),
            Mnemonic::Bne => self.op_branch(operand, !self.regs.p.z),
            Mnemonic::Beq => self.op_branch(operand, self.regs.p.z),
            Mnemonic::Bpl => self.op_branch(operand, !self.regs.p.n),
            Mnemonic::Bmi => self.op_branch(operand, self.regs.p.n),
            Mnemonic::Bvc => self.op_branch(operand, !self.regs.p.v),
            Mnemonic::Bvs => self.op_branch(operand, self.regs.p.v),

            Mnemonic::Nop => {
                // Undocumented NOPs still perform their operand read
                if let Operand::Memory(addr) = operand {
                    self.dummy_read(bus, addr);
                }
            }

            // Undocumented
            Mnemonic::Lax => {
                let val = self.load(bus, operand);
                self.do_lda(val);
                self.regs.x = val;
            }
            Mnemonic::Sax => self.store(bus, operand, self.regs.a & self.regs.x),
            Mnemonic::Slo => {
                let val = self.modify(bus, operand, Self::do_asl);
                self.do_ora(val);
            }
            Mnemonic::Rla => {
                let val = self.modify(bus, operand, Self::do_rol);
                self.do_and(val);
            }
            Mnemonic::Sre => {
                let val = self.modify(bus, operand, Self::do_lsr);
                self.do_eor(val);
            }
            Mnemonic::Rra => {
                let val = self.modify(bus, operand, Self::do_ror);
                self.do_adc(val);
            }
            Mnemonic::Dcp => {
                let val = self.modify(bus, operand, Self::do_dec);
                self.do_compare(self.regs.a, val);
            }
            Mnemonic::Isb => {
                let val = self.modify(bus, operand, Self::do_inc);
                self.do_sbc(val);
            }
            Mnemonic::Anc => {
                let val = self.load(bus, operand);
                self.do_and(val);
                self.regs.p.c = self.regs.p.n;
            }
            Mnemonic::Alr => {
                let val = self.load(bus, operand);
                self.do_and(val);
                self.regs.a = self.do_lsr(self.regs.a);
            }
            Mnemonic::Arr => {
                let val = self.load(bus, operand);
                self.do_arr(val);
            }
            Mnemonic::Axs => {
                let val = self.load(bus, operand);
                let ax = self.regs.a & self.regs.x;
                self.regs.p.c = ax >= val;
                self.regs.x = ax.wrapping_sub(val);
                self.regs.p.set_zn(self.regs.x);
            }
            Mnemonic::Xaa => {
                let val = self.load(bus, operand);
                self.do_lda((self.regs.a | UNSTABLE_MAGIC) & self.regs.x & val);
            }
            Mnemonic::Lxa => {
                let val = self.load(bus, operand);
                let result = (self.regs.a | UNSTABLE_MAGIC) & val;
                self.do_lda(result);
                self.regs.x = result;
            }
            Mnemonic::Las => {
                let val = self.load(bus, operand) & self.regs.s;
                self.regs.s = val;
                self.regs.x = val;
                self.do_lda(val);
            }
            Mnemonic::Ahx => {
                let index = self.regs.y;
                self.store_high_and(bus, operand, index, self.regs.a & self.regs.x);
            }
            Mnemonic::Shx => {
                let index = self.regs.y;
                self.store_high_and(bus, operand, index, self.regs.x);
            }
            Mnemonic::Shy => {
                let index = self.regs.x;
                self.store_high_and(bus, operand, index, self.regs.y);
            }
            Mnemonic::Tas => {
                self.regs.s = self.regs.a & self.regs.x;
                let index = self.regs.y;
                self.store_high_and(bus, operand, index, self.regs.s);
            }

            Mnemonic::Kil => {
                debug!(opcode, pc = self.regs.pc.wrapping_sub(1), "CPU jammed");
                self.halted = true;
            }
        }
    }

    // =========================================================================
    // Operand access
    // =========================================================================

    fn load<B: Bus>(&mut self, bus: &mut B, operand: Operand) -> u8 {
        match operand {
            Operand::Memory(addr) => self.read(bus, addr),
            Operand::Accumulator => self.regs.a,
            Operand::Implied => unreachable!("implied operand has no value"),
        }
    }

    fn store<B: Bus>(&mut self, bus: &mut B, operand: Operand, value: u8) {
        match operand {
            Operand::Memory(addr) => self.write(bus, addr, value),
            Operand::Accumulator => self.regs.a = value,
            Operand::Implied => unreachable!("implied operand cannot be stored"),
        }
    }

    /// Read-modify-write through one code path for memory and A.
    ///
    /// Memory operands get the hardware's dummy write of the unmodified
    /// value before the real write. Returns the new value.
    fn modify<B: Bus>(&mut self, bus: &mut B, operand: Operand, op: fn(&mut Self, u8) -> u8) -> u8 {
        match operand {
            Operand::Memory(addr) => {
                let val = self.read(bus, addr);
                self.write(bus, addr, val);
                let result = op(self, val);
                self.write(bus, addr, result);
                result
            }
            Operand::Accumulator => {
                let a = self.regs.a;
                let result = op(self, a);
                self.regs.a = result;
                result
            }
            Operand::Implied => unreachable!("implied operand cannot be modified"),
        }
    }

    fn target(operand: Operand) -> u16 {
        match operand {
            Operand::Memory(addr) => addr,
            Operand::Implied | Operand::Accumulator => unreachable!("jump without target"),
        }
    }

    /// SHA/SHX/SHY/TAS store: value ANDed with (high byte of base + 1).
    ///
    /// When indexing crossed a page, the high byte of the effective address
    /// is replaced by the stored value.
    fn store_high_and<B: Bus>(&mut self, bus: &mut B, operand: Operand, index: u8, value: u8) {
        let addr = Self::target(operand);
        let base = addr.wrapping_sub(u16::from(index));
        let high = (base >> 8) as u8;
        let result = value & high.wrapping_add(1);
        let addr = if page_crossed(base, addr) {
            (u16::from(result) << 8) | (addr & 0x00FF)
        } else {
            addr
        };
        self.write(bus, addr, result);
    }

    // =========================================================================
    // ALU operations
    // =========================================================================

    fn do_lda(&mut self, val: u8) {
        self.regs.a = val;
        self.regs.p.set_zn(val);
    }

    fn do_ldx(&mut self, val: u8) {
        self.regs.x = val;
        self.regs.p.set_zn(val);
    }

    fn do_ldy(&mut self, val: u8) {
        self.regs.y = val;
        self.regs.p.set_zn(val);
    }

    fn do_ora(&mut self, val: u8) {
        self.do_lda(self.regs.a | val);
    }

    fn do_and(&mut self, val: u8) {
        self.do_lda(self.regs.a & val);
    }

    fn do_eor(&mut self, val: u8) {
        self.do_lda(self.regs.a ^ val);
    }

    /// Binary add with carry. The 2A03 ignores D.
    fn do_adc(&mut self, val: u8) {
        let a = self.regs.a;
        let sum = u16::from(a) + u16::from(val) + u16::from(self.regs.p.c);
        let result = sum as u8;
        self.regs.p.c = sum > 0xFF;
        self.regs.p.v = (a ^ result) & (val ^ result) & 0x80 != 0;
        self.do_lda(result);
    }

    /// Binary subtract with borrow (borrow = !C). The 2A03 ignores D.
    fn do_sbc(&mut self, val: u8) {
        let a = self.regs.a;
        let borrow = u16::from(!self.regs.p.c);
        let diff = u16::from(a).wrapping_sub(u16::from(val)).wrapping_sub(borrow);
        let result = diff as u8;
        self.regs.p.c = diff < 0x100;
        self.regs.p.v = (a ^ val) & (a ^ result) & 0x80 != 0;
        self.do_lda(result);
    }

    fn do_compare(&mut self, reg: u8, val: u8) {
        self.regs.p.c = reg >= val;
        self.regs.p.set_zn(reg.wrapping_sub(val));
    }

    fn do_bit(&mut self, val: u8) {
        self.regs.p.z = self.regs.a & val == 0;
        self.regs.p.n = val & 0x80 != 0;
        self.regs.p.v = val & 0x40 != 0;
    }

    fn do_asl(&mut self, val: u8) -> u8 {
        self.regs.p.c = val & 0x80 != 0;
        let result = val << 1;
        self.regs.p.set_zn(result);
        result
    }

    fn do_lsr(&mut self, val: u8) -> u8 {
        self.regs.p.c = val & 0x01 != 0;
        let result = val >> 1;
        self.regs.p.set_zn(result);
        result
    }

    fn do_rol(&mut self, val: u8) -> u8 {
        let carry_in = u8::from(self.regs.p.c);
        self.regs.p.c = val & 0x80 != 0;
        let result = (val << 1) | carry_in;
        self.regs.p.set_zn(result);
        result
    }

    fn do_ror(&mut self, val: u8) -> u8 {
        let carry_in = u8::from(self.regs.p.c) << 7;
        self.regs.p.c = val & 0x01 != 0;
        let result = (val >> 1) | carry_in;
        self.regs.p.set_zn(result);
        result
    }

    fn do_inc(&mut self, val: u8) -> u8 {
        let result = val.wrapping_add(1);
        self.regs.p.set_zn(result);
        result
    }

    fn do_dec(&mut self, val: u8) -> u8 {
        let result = val.wrapping_sub(1);
        self.regs.p.set_zn(result);
        result
    }

    /// ARR: AND then ROR A, with C from bit 6 and V from bit 6 ^ bit 5.
    fn do_arr(&mut self, val: u8) {
        let anded = self.regs.a & val;
        let result = (anded >> 1) | (u8::from(self.regs.p.c) << 7);
        self.do_lda(result);
        self.regs.p.c = result & 0x40 != 0;
        self.regs.p.v = ((result >> 6) ^ (result >> 5)) & 0x01 != 0;
    }

    // =========================================================================
    // Control flow
    // =========================================================================

    /// JSR - 6 cycles. Pushes the address of its own last byte.
    fn op_jsr<B: Bus>(&mut self, bus: &mut B, target: u16) {
        self.idle();
        let return_addr = self.regs.pc.wrapping_sub(1);
        self.push_word(bus, return_addr);
        self.regs.pc = target;
    }

    /// RTS - 6 cycles.
    fn op_rts<B: Bus>(&mut self, bus: &mut B) {
        self.idle();
        let addr = self.pull_word(bus);
        self.idle();
        self.regs.pc = addr.wrapping_add(1);
    }

    /// RTI - 6 cycles. P is restored exactly as pulled.
    fn op_rti<B: Bus>(&mut self, bus: &mut B) {
        self.idle();
        let p = self.pull(bus);
        self.regs.p = Status::from_byte(p);
        self.regs.pc = self.pull_word(bus);
    }

    /// Branch - 2 cycles, +1 if taken, +1 more if the target is on another page.
    fn op_branch(&mut self, operand: Operand, taken: bool) {
        if !taken {
            return;
        }
        let target = Self::target(operand);
        self.idle();
        if page_crossed(self.regs.pc, target) {
            self.idle();
        }
        self.regs.pc = target;
    }
}

impl Cpu for Ricoh2A03 {
    type Registers = Registers;

    fn step<B: Bus>(&mut self, bus: &mut B) -> bool {
        if self.halted {
            return true;
        }

        if let Some(sink) = self.trace.as_mut() {
            let line = TraceLine::capture(&*bus, &self.regs, self.cycles);
            sink(&line);
        }

        let opcode = self.fetch(bus);
        let op = OPCODES[usize::from(opcode)];
        let operand = self.resolve(bus, op.mode, op.mnemonic.access());
        self.execute(bus, opcode, op, operand);
        self.halted
    }

    fn pc(&self) -> u16 {
        self.regs.pc
    }

    fn registers(&self) -> Registers {
        self.regs
    }

    fn is_halted(&self) -> bool {
        self.halted
    }

    /// IRQ - 7 cycles. Ignored while I is set or the CPU is jammed.
    fn irq<B: Bus>(&mut self, bus: &mut B) -> bool {
        if self.halted || self.regs.p.i {
            return false;
        }
        self.idle();
        self.idle();
        let return_addr = self.regs.pc;
        self.enter_interrupt(bus, IRQ_VECTOR, return_addr, false);
        true
    }

    /// NMI - 7 cycles. Ignored while the CPU is jammed.
    fn nmi<B: Bus>(&mut self, bus: &mut B) {
        if self.halted {
            return;
        }
        self.idle();
        self.idle();
        let return_addr = self.regs.pc;
        self.enter_interrupt(bus, NMI_VECTOR, return_addr, false);
    }

    fn reset<B: Bus>(&mut self, bus: &mut B) {
        self.reset_sequence(bus);
    }
}

impl Observable for Ricoh2A03 {
    fn query(&self, path: &str) -> Option<Value> {
        match path {
            "pc" => Some(self.regs.pc.into()),
            "a" => Some(self.regs.a.into()),
            "x" => Some(self.regs.x.into()),
            "y" => Some(self.regs.y.into()),
            "s" | "sp" => Some(self.regs.s.into()),
            "p" | "status" => Some(self.regs.p.to_byte().into()),
            "flags.c" | "c" => Some(self.regs.p.is_set(C).into()),
            "flags.z" | "z" => Some(self.regs.p.is_set(Z).into()),
            "flags.i" | "i" => Some(self.regs.p.is_set(I).into()),
            "flags.d" | "d" => Some(self.regs.p.is_set(D).into()),
            "flags.v" | "v" => Some(self.regs.p.is_set(V).into()),
            "flags.n" | "n" => Some(self.regs.p.is_set(N).into()),
            "cycles" => Some(Value::U64(self.cycles)),
            "halted" => Some(self.halted.into()),
            _ => None,
        }
    }

    fn query_paths(&self) -> &'static [&'static str] {
        &[
            "pc", "a", "x", "y", "s", "p", "flags.c", "flags.z", "flags.i", "flags.d", "flags.v",
            "flags.n", "cycles", "halted",
        ]
    }
}
