//! NES bus: CPU address routing.
//!
//! | Range           | Device                                 |
//! |-----------------|----------------------------------------|
//! | `$0000-$1FFF`   | 2 KiB work RAM, mirrored every `$800`  |
//! | `$2000-$3FFF`   | PPU registers, mirrored every 8 bytes  |
//! | `$4000-$4017`   | APU and I/O registers                  |
//! | `$4018-$5FFF`   | unmapped                               |
//! | `$6000-$7FFF`   | cartridge PRG RAM                      |
//! | `$8000-$FFFF`   | cartridge PRG ROM                      |
//!
//! Writes to ROM and any access to unmapped space are faults. A strict bus
//! latches the first one for the console to report; a lenient bus logs it
//! and carries on, reading 0.

use emu_core::Bus;
use nes_cartridge::Cartridge;
use thiserror::Error;
use tracing::warn;

use crate::apu::Apu;
use crate::ppu::Ppu;

/// A CPU access the hardware map has no device for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BusFault {
    #[error("write of ${value:02X} to ROM at ${addr:04X}")]
    RomWrite { addr: u16, value: u8 },
    #[error("read from unmapped ${addr:04X}")]
    UnmappedRead { addr: u16 },
    #[error("write of ${value:02X} to unmapped ${addr:04X}")]
    UnmappedWrite { addr: u16, value: u8 },
}

/// The NES bus, implementing `emu_core::Bus`.
pub struct NesBus {
    /// 2K internal RAM ($0000-$07FF, mirrored to $1FFF).
    pub ram: [u8; 2048],
    pub ppu: Ppu,
    pub apu: Apu,
    cartridge: Cartridge,
    strict: bool,
    fault: Option<BusFault>,
}

impl NesBus {
    #[must_use]
    pub fn new(cartridge: Cartridge, strict: bool) -> Self {
        Self {
            ram: [0; 2048],
            ppu: Ppu::new(),
            apu: Apu::new(),
            cartridge,
            strict,
            fault: None,
        }
    }

    #[must_use]
    pub fn cartridge(&self) -> &Cartridge {
        &self.cartridge
    }

    #[must_use]
    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// The first fault since the last call, if the bus is strict.
    pub fn take_fault(&mut self) -> Option<BusFault> {
        self.fault.take()
    }

    fn fault(&mut self, fault: BusFault) {
        if self.strict {
            self.fault.get_or_insert(fault);
        } else {
            warn!(%fault, "ignoring bus fault");
        }
    }

    fn prg_ram_mapped(&self) -> bool {
        self.cartridge.mapper().has_prg_ram()
    }
}

impl Bus for NesBus {
    fn read(&mut self, addr: u16) -> u8 {
        match addr {
            0x0000..=0x1FFF => self.ram[usize::from(addr & 0x07FF)],
            0x2000..=0x3FFF => self.ppu.cpu_read(addr & 0x0007),
            0x4000..=0x4017 => self.apu.peek(addr),
            0x6000..=0x7FFF if self.prg_ram_mapped() => self.cartridge.mapper_mut().cpu_read(addr),
            0x8000..=0xFFFF => self.cartridge.mapper_mut().cpu_read(addr),
            _ => {
                self.fault(BusFault::UnmappedRead { addr });
                0
            }
        }
    }

    fn peek(&self, addr: u16) -> u8 {
        match addr {
            0x0000..=0x1FFF => self.ram[usize::from(addr & 0x07FF)],
            0x2000..=0x3FFF => self.ppu.peek(addr & 0x0007),
            0x4000..=0x4017 => self.apu.peek(addr),
            0x6000..=0xFFFF => self.cartridge.mapper().cpu_peek(addr),
            _ => 0,
        }
    }

    fn write(&mut self, addr: u16, value: u8) {
        match addr {
            0x0000..=0x1FFF => self.ram[usize::from(addr & 0x07FF)] = value,
            0x2000..=0x3FFF => self.ppu.cpu_write(addr & 0x0007, value),
            0x4000..=0x4017 => self.apu.write(addr, value),
            0x6000..=0x7FFF if self.prg_ram_mapped() => {
                self.cartridge.mapper_mut().cpu_write(addr, value);
            }
            0x8000..=0xFFFF => {
                if !self.cartridge.mapper_mut().cpu_write(addr, value) {
                    self.fault(BusFault::RomWrite { addr, value });
                }
            }
            _ => self.fault(BusFault::UnmappedWrite { addr, value }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_bus(strict: bool) -> NesBus {
        let mut rom = vec![0u8; 16];
        rom[0..4].copy_from_slice(b"NES\x1a");
        rom[4] = 2;
        rom.extend(std::iter::repeat_n(0xEA, 32768));
        let cartridge = Cartridge::from_ines(&rom).expect("valid image");
        NesBus::new(cartridge, strict)
    }

    #[test]
    fn ram_is_mirrored() {
        let mut bus = make_bus(true);
        bus.write(0x0001, 0xAB);
        assert_eq!(bus.read(0x0801), 0xAB);
        assert_eq!(bus.read(0x1001), 0xAB);
        assert_eq!(bus.peek(0x1801), 0xAB);
    }

    #[test]
    fn ppu_registers_are_mirrored() {
        let mut bus = make_bus(true);
        bus.write(0x3FF8, 0x80);
        assert_eq!(bus.ppu.peek(0), 0x80);
    }

    #[test]
    fn prg_rom_and_ram() {
        let mut bus = make_bus(true);
        assert_eq!(bus.read(0x8000), 0xEA);
        bus.write(0x6000, 0x81);
        assert_eq!(bus.read(0x6000), 0x81);
        assert_eq!(bus.take_fault(), None);
    }

    #[test]
    fn strict_bus_latches_first_fault() {
        let mut bus = make_bus(true);
        bus.write(0x8000, 0x01);
        bus.write(0x5000, 0x02);
        assert_eq!(bus.read(0x8000), 0xEA);
        assert_eq!(
            bus.take_fault(),
            Some(BusFault::RomWrite { addr: 0x8000, value: 0x01 })
        );
        assert_eq!(bus.take_fault(), None);
    }

    #[test]
    fn unmapped_read_faults_but_peek_does_not() {
        let mut bus = make_bus(true);
        assert_eq!(bus.peek(0x4020), 0);
        assert_eq!(bus.take_fault(), None);
        assert_eq!(bus.read(0x4020), 0);
        assert_eq!(bus.take_fault(), Some(BusFault::UnmappedRead { addr: 0x4020 }));
    }

    #[test]
    fn lenient_bus_ignores_faults() {
        let mut bus = make_bus(false);
        bus.write(0x8000, 0x01);
        bus.write(0x4018, 0x01);
        assert_eq!(bus.read(0x5FFF), 0);
        assert_eq!(bus.take_fault(), None);
        assert_eq!(bus.read(0x8000), 0xEA);
    }
}
