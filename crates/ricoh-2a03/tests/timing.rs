//! The decode table's cycle column must match what the executor charges.

use emu_core::{Cpu, SimpleBus};
use ricoh_2a03::{Access, Mnemonic, Mode, OPCODES, Ricoh2A03};

/// Run `opcode $10 $03` at $0200 with the given index registers and return
/// the cycles taken and the final PC.
fn run_opcode(opcode: u8, index: u8) -> (u64, u16) {
    let mut bus = SimpleBus::new();
    bus.load(0xFFFC, &[0x00, 0x02]);
    bus.load(0xFFFE, &[0x00, 0x06]);
    bus.load(0x0200, &[opcode, 0x10, 0x03]);
    // Zero-page pointer for ($10),Y and the indirect JMP target at $0310
    bus.load(0x0010, &[0x10, 0x03]);

    let mut cpu = Ricoh2A03::new(&mut bus);
    cpu.regs.x = index;
    cpu.regs.y = index;
    let before = cpu.cycles();
    cpu.step(&mut bus);
    (cpu.cycles() - before, cpu.regs.pc)
}

/// Power-on flags are all clear apart from I, so these branches are taken.
fn branch_taken(mnemonic: Mnemonic) -> bool {
    matches!(mnemonic, Mnemonic::Bpl | Mnemonic::Bvc | Mnemonic::Bne | Mnemonic::Bcc)
}

fn changes_flow(mnemonic: Mnemonic) -> bool {
    mnemonic.is_branch()
        || matches!(
            mnemonic,
            Mnemonic::Jmp | Mnemonic::Jsr | Mnemonic::Rts | Mnemonic::Rti | Mnemonic::Brk
        )
}

#[test]
fn base_cycles_match_table_for_every_opcode() {
    for opcode in 0..=255u8 {
        let entry = OPCODES[usize::from(opcode)];
        let (cycles, pc) = run_opcode(opcode, 0);

        let expected = u64::from(entry.cycles) + u64::from(branch_taken(entry.mnemonic));
        assert_eq!(
            cycles, expected,
            "{opcode:02X} {} {:?}",
            entry.mnemonic.name(),
            entry.mode
        );

        if !changes_flow(entry.mnemonic) {
            assert_eq!(pc, 0x0200 + entry.mode.size(), "{opcode:02X} length");
        }
    }
}

#[test]
fn page_cross_penalty_applies_to_reads_only() {
    for opcode in 0..=255u8 {
        let entry = OPCODES[usize::from(opcode)];
        if changes_flow(entry.mnemonic) {
            continue;
        }
        let indexed = matches!(
            entry.mode,
            Mode::AbsoluteX | Mode::AbsoluteY | Mode::IndirectIndexed
        );
        // Base $0310 + $FF crosses into page $04
        let (cycles, _) = run_opcode(opcode, 0xFF);

        let penalty = indexed && entry.mnemonic.access() == Access::Read;
        let expected = u64::from(entry.cycles) + u64::from(penalty);
        assert_eq!(
            cycles, expected,
            "{opcode:02X} {} {:?}",
            entry.mnemonic.name(),
            entry.mode
        );
    }
}
