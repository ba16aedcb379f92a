//! Top-level NES system.
//!
//! Owns the CPU and the bus and turns bus faults and jams into errors and
//! run outcomes. The CPU is stepped one instruction at a time; with the PPU
//! and APU stubbed there is nothing to interleave between instructions.

use emu_core::{Bus, Cpu, Observable, Value};
use nes_cartridge::Cartridge;
use ricoh_2a03::{Ricoh2A03, TraceLine};
use tracing::{debug, trace};

use crate::bus::NesBus;
use crate::config::{NesConfig, NesRegion};
use crate::error::NesError;

/// Longest string [`Nes::peek_string`] will read before giving up on a NUL.
const MAX_STRING_LEN: usize = 4096;

/// Why [`Nes::run_until`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The CPU executed a KIL opcode.
    Halted,
    /// The stop predicate returned true.
    Stopped,
    /// The cycle budget ran out.
    LimitReached,
}

/// NES system.
pub struct Nes {
    cpu: Ricoh2A03,
    bus: NesBus,
    region: NesRegion,
}

impl Nes {
    /// Load the cartridge and power on.
    pub fn new(config: &NesConfig) -> Result<Self, NesError> {
        let cartridge = Cartridge::from_ines(&config.rom_data)?;
        let mut bus = NesBus::new(cartridge, config.strict_memory);
        let mut cpu = Ricoh2A03::new(&mut bus);
        if config.trace_cpu {
            cpu.set_trace_sink(|line| trace!(target: "nes_console::cpu", "{line}"));
        }
        debug!(region = ?config.region, "powered on, PC=${:04X}", cpu.pc());
        Ok(Self {
            cpu,
            bus,
            region: config.region,
        })
    }

    /// Execute one instruction. Returns true once the CPU is jammed.
    pub fn step(&mut self) -> Result<bool, NesError> {
        let halted = self.cpu.step(&mut self.bus);
        match self.bus.take_fault() {
            Some(fault) => Err(fault.into()),
            None => Ok(halted),
        }
    }

    /// Run for up to `limit` cycles.
    pub fn run(&mut self, limit: u64) -> Result<RunOutcome, NesError> {
        self.run_until(limit, |_| false)
    }

    /// Run until `stop` returns true, the CPU jams or `limit` cycles pass.
    ///
    /// `stop` is checked before each instruction, so a PC breakpoint stops
    /// with the instruction at that address still unexecuted.
    pub fn run_until(
        &mut self,
        limit: u64,
        mut stop: impl FnMut(&Self) -> bool,
    ) -> Result<RunOutcome, NesError> {
        let start = self.cpu.cycles();
        loop {
            if stop(self) {
                return Ok(RunOutcome::Stopped);
            }
            if self.cpu.cycles() - start >= limit {
                return Ok(RunOutcome::LimitReached);
            }
            if self.step()? {
                return Ok(RunOutcome::Halted);
            }
        }
    }

    /// Press the reset button. RAM and cartridge RAM survive.
    pub fn reset(&mut self) {
        self.cpu.reset(&mut self.bus);
    }

    pub fn nmi(&mut self) {
        self.cpu.nmi(&mut self.bus);
    }

    /// Returns false when the interrupt is masked.
    pub fn irq(&mut self) -> bool {
        self.cpu.irq(&mut self.bus)
    }

    pub fn jump(&mut self, address: u16) {
        self.cpu.jump(address);
    }

    #[must_use]
    pub fn peek(&self, address: u16) -> u8 {
        self.bus.peek(address)
    }

    /// Read a NUL-terminated string without side effects.
    #[must_use]
    pub fn peek_string(&self, address: u16) -> String {
        let mut bytes = Vec::new();
        let mut addr = address;
        while bytes.len() < MAX_STRING_LEN {
            let byte = self.bus.peek(addr);
            if byte == 0 {
                break;
            }
            bytes.push(byte);
            addr = addr.wrapping_add(1);
        }
        String::from_utf8_lossy(&bytes).into_owned()
    }

    /// Replace the CPU trace callback (including the `trace_cpu` logger).
    pub fn set_trace_sink(&mut self, sink: impl FnMut(&TraceLine) + 'static) {
        self.cpu.set_trace_sink(sink);
    }

    /// Disassemble the instruction at `address`.
    #[must_use]
    pub fn disassemble(&self, address: u16) -> String {
        self.cpu.disassemble(&self.bus, address)
    }

    #[must_use]
    pub fn cpu(&self) -> &Ricoh2A03 {
        &self.cpu
    }

    pub fn cpu_mut(&mut self) -> &mut Ricoh2A03 {
        &mut self.cpu
    }

    #[must_use]
    pub fn bus(&self) -> &NesBus {
        &self.bus
    }

    pub fn bus_mut(&mut self) -> &mut NesBus {
        &mut self.bus
    }

    #[must_use]
    pub fn cycles(&self) -> u64 {
        self.cpu.cycles()
    }

    #[must_use]
    pub fn region(&self) -> NesRegion {
        self.region
    }
}

impl Observable for Nes {
    fn query(&self, path: &str) -> Option<Value> {
        if let Some(rest) = path.strip_prefix("cpu.") {
            self.cpu.query(rest)
        } else if let Some(rest) = path.strip_prefix("ppu.") {
            match rest {
                "vblank" => Some(self.bus.ppu.in_vblank().into()),
                "write_toggle" => Some(self.bus.ppu.write_toggle().into()),
                _ => None,
            }
        } else if let Some(rest) = path.strip_prefix("cartridge.") {
            let mapper = self.bus.cartridge().mapper();
            match rest {
                "mirroring" => Some(format!("{:?}", mapper.mirroring()).into()),
                "chr_rom_len" => Some((mapper.chr_rom().len() as u64).into()),
                "prg_ram" => Some(mapper.has_prg_ram().into()),
                _ => None,
            }
        } else if let Some(rest) = path.strip_prefix("memory.") {
            let addr =
                if let Some(hex) = rest.strip_prefix("0x").or_else(|| rest.strip_prefix("0X")) {
                    u16::from_str_radix(hex, 16).ok()
                } else if let Some(hex) = rest.strip_prefix('$') {
                    u16::from_str_radix(hex, 16).ok()
                } else {
                    rest.parse().ok()
                };
            addr.map(|a| Value::U8(self.bus.peek(a)))
        } else {
            self.cpu.query(path)
        }
    }

    fn query_paths(&self) -> &'static [&'static str] {
        &[
            "cpu.<2a03_paths>",
            "ppu.vblank",
            "ppu.write_toggle",
            "cartridge.mirroring",
            "cartridge.chr_rom_len",
            "cartridge.prg_ram",
            "memory.<address>",
        ]
    }
}
