use crate::Mirroring;

/// CPU-side cartridge address translation.
///
/// `cpu_read` takes `&mut self` so mappers with read side effects fit;
/// `cpu_peek` must not change state.
pub trait Mapper {
    fn cpu_read(&mut self, addr: u16) -> u8 {
        self.cpu_peek(addr)
    }
    fn cpu_peek(&self, addr: u16) -> u8;
    /// Returns `false` when the address is not writable (PRG ROM, or PRG RAM
    /// that isn't fitted).
    fn cpu_write(&mut self, addr: u16, value: u8) -> bool;
    fn mirroring(&self) -> Mirroring;
    fn chr_rom(&self) -> &[u8];
    /// Whether `$6000-$7FFF` is backed by RAM.
    fn has_prg_ram(&self) -> bool;
}

/// NROM (Mapper 0): no bank switching.
///
/// - PRG: 16K mirrored at $8000-$FFFF, or 32K at $8000-$FFFF
/// - PRG RAM: at $6000-$7FFF, mirrored if smaller than 8K
pub struct Nrom {
    prg_rom: Vec<u8>,
    chr_rom: Vec<u8>,
    prg_ram: Vec<u8>,
    mirroring: Mirroring,
}

impl Nrom {
    #[must_use]
    pub fn new(prg_rom: Vec<u8>, chr_rom: Vec<u8>, prg_ram_len: usize, mirroring: Mirroring) -> Self {
        Self {
            prg_rom,
            chr_rom,
            prg_ram: vec![0; prg_ram_len.min(0x2000)],
            mirroring,
        }
    }
}

impl Mapper for Nrom {
    fn cpu_peek(&self, addr: u16) -> u8 {
        match addr {
            0x6000..=0x7FFF if !self.prg_ram.is_empty() => {
                self.prg_ram[usize::from(addr - 0x6000) % self.prg_ram.len()]
            }
            0x8000..=0xFFFF if !self.prg_rom.is_empty() => {
                // 16K images repeat at $C000
                self.prg_rom[usize::from(addr - 0x8000) % self.prg_rom.len()]
            }
            _ => 0,
        }
    }

    fn cpu_write(&mut self, addr: u16, value: u8) -> bool {
        match addr {
            0x6000..=0x7FFF if !self.prg_ram.is_empty() => {
                let len = self.prg_ram.len();
                self.prg_ram[usize::from(addr - 0x6000) % len] = value;
                true
            }
            _ => false,
        }
    }

    fn mirroring(&self) -> Mirroring {
        self.mirroring
    }

    fn chr_rom(&self) -> &[u8] {
        &self.chr_rom
    }

    fn has_prg_ram(&self) -> bool {
        !self.prg_ram.is_empty()
    }
}
