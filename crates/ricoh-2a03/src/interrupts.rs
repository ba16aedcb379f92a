//! Reset, NMI and IRQ/BRK entry.
//!
//! BRK, IRQ and NMI share `enter_interrupt`; only the vector, the pushed
//! return address and the B bit differ.

use emu_core::Bus;
use tracing::debug;

use crate::Ricoh2A03;

/// NMI vector.
pub const NMI_VECTOR: u16 = 0xFFFA;

/// Reset vector.
pub const RESET_VECTOR: u16 = 0xFFFC;

/// IRQ and BRK vector.
pub const IRQ_VECTOR: u16 = 0xFFFE;

impl Ricoh2A03 {
    /// Push PC and P, set I, load PC through `vector`. 5 cycles.
    pub(crate) fn enter_interrupt<B: Bus>(
        &mut self,
        bus: &mut B,
        vector: u16,
        return_addr: u16,
        brk: bool,
    ) {
        self.push_word(bus, return_addr);
        let p = self.regs.p.pushed(brk);
        self.push(bus, p);
        self.regs.p.i = true;
        self.regs.pc = self.read_indirect(bus, vector);
    }

    /// Reset - 7 cycles.
    ///
    /// The three stack pushes happen as reads on hardware, so S drops by 3
    /// and memory is left alone. The cycle count keeps running.
    pub(crate) fn reset_sequence<B: Bus>(&mut self, bus: &mut B) {
        self.idle();
        self.idle();
        for _ in 0..3 {
            self.idle();
            self.regs.s = self.regs.s.wrapping_sub(1);
        }
        self.regs.p.i = true;
        self.regs.pc = self.read_indirect(bus, RESET_VECTOR);
        self.halted = false;
        debug!(pc = self.regs.pc, cycles = self.cycles, "CPU reset");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use emu_core::{Cpu, SimpleBus};

    fn bus_with_vectors() -> SimpleBus {
        let mut bus = SimpleBus::new();
        bus.load(NMI_VECTOR, &[0x00, 0x90]);
        bus.load(RESET_VECTOR, &[0x00, 0x80]);
        bus.load(IRQ_VECTOR, &[0x00, 0xA0]);
        bus
    }

    #[test]
    fn power_on_state() {
        let mut bus = bus_with_vectors();
        let cpu = Ricoh2A03::new(&mut bus);
        assert_eq!(cpu.regs.pc, 0x8000);
        assert_eq!(cpu.regs.s, 0xFD);
        assert_eq!(cpu.regs.p.to_byte(), 0x34);
        assert_eq!((cpu.regs.a, cpu.regs.x, cpu.regs.y), (0, 0, 0));
        assert_eq!(cpu.cycles(), 7);
    }

    #[test]
    fn warm_reset_keeps_cycle_count_and_memory() {
        let mut bus = bus_with_vectors();
        let mut cpu = Ricoh2A03::new(&mut bus);
        cpu.regs.s = 0x80;
        cpu.regs.p.i = false;
        bus.load(0x017F, &[0xAA, 0xBB, 0xCC]);

        cpu.reset(&mut bus);

        assert_eq!(cpu.regs.s, 0x7D);
        assert!(cpu.regs.p.i);
        assert_eq!(cpu.regs.pc, 0x8000);
        assert_eq!(cpu.cycles(), 14);
        assert_eq!(bus.peek(0x017F), 0xAA);
        assert_eq!(bus.peek(0x0180), 0xBB);
        assert_eq!(bus.peek(0x0181), 0xCC);
    }

    #[test]
    fn nmi_pushes_pc_and_status_without_break() {
        let mut bus = bus_with_vectors();
        let mut cpu = Ricoh2A03::new(&mut bus);
        cpu.regs.pc = 0x1234;
        cpu.regs.p = crate::Status::from_byte(0xC3);
        let before = cpu.cycles();

        cpu.nmi(&mut bus);

        assert_eq!(cpu.regs.pc, 0x9000);
        assert_eq!(cpu.regs.s, 0xFA);
        assert_eq!(bus.peek(0x01FD), 0x12);
        assert_eq!(bus.peek(0x01FC), 0x34);
        assert_eq!(bus.peek(0x01FB), 0xE3, "B clear, unused set");
        assert!(cpu.regs.p.i);
        assert_eq!(cpu.cycles() - before, 7);
    }

    #[test]
    fn irq_is_masked_by_interrupt_disable() {
        let mut bus = bus_with_vectors();
        let mut cpu = Ricoh2A03::new(&mut bus);
        cpu.regs.pc = 0x1234;
        let before = cpu.cycles();

        assert!(!cpu.irq(&mut bus));
        assert_eq!(cpu.regs.pc, 0x1234);
        assert_eq!(cpu.cycles(), before);

        cpu.regs.p.i = false;
        assert!(cpu.irq(&mut bus));
        assert_eq!(cpu.regs.pc, 0xA000);
        assert_eq!(bus.peek(0x01FB) & 0x10, 0);
        assert_eq!(cpu.cycles() - before, 7);
    }

    #[test]
    fn interrupt_vector_read_uses_page_wrap() {
        // A vector at $xxFF would take its high byte from $xx00. The real
        // vectors are even-aligned, so only the ordinary path is observable.
        let mut bus = bus_with_vectors();
        let mut cpu = Ricoh2A03::new(&mut bus);
        assert_eq!(cpu.read_indirect(&mut bus, IRQ_VECTOR), 0xA000);
        bus.load(0x12FF, &[0x34]);
        bus.load(0x1200, &[0x56]);
        assert_eq!(cpu.read_indirect(&mut bus, 0x12FF), 0x5634);
    }
}
