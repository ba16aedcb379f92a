//! PPU register stub.
//!
//! Eight latched registers mirrored across `$2000-$3FFF`. Reading PPUSTATUS
//! alternates the vblank bit so `BIT $2002 / BPL` wait loops finish, and
//! clears the shared `$2005/$2006` write toggle as the real chip does.

const PPUSTATUS: usize = 2;
const PPUSCROLL: usize = 5;
const PPUADDR: usize = 6;
const VBLANK: u8 = 0x80;

#[derive(Debug, Clone, Default)]
pub struct Ppu {
    regs: [u8; 8],
    vblank: bool,
    write_toggle: bool,
}

impl Ppu {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// CPU read of register `reg` (0-7).
    pub fn cpu_read(&mut self, reg: u16) -> u8 {
        let value = self.peek(reg);
        if usize::from(reg & 7) == PPUSTATUS {
            self.vblank = !self.vblank;
            self.write_toggle = false;
        }
        value
    }

    #[must_use]
    pub fn peek(&self, reg: u16) -> u8 {
        let reg = usize::from(reg & 7);
        if reg == PPUSTATUS {
            (self.regs[PPUSTATUS] & 0x1F) | if self.vblank { VBLANK } else { 0 }
        } else {
            self.regs[reg]
        }
    }

    pub fn cpu_write(&mut self, reg: u16, value: u8) {
        let reg = usize::from(reg & 7);
        // Low bits of PPUSTATUS echo the last write to any register
        self.regs[PPUSTATUS] = (self.regs[PPUSTATUS] & !0x1F) | (value & 0x1F);
        if reg != PPUSTATUS {
            self.regs[reg] = value;
        }
        if reg == PPUSCROLL || reg == PPUADDR {
            self.write_toggle = !self.write_toggle;
        }
    }

    #[must_use]
    pub fn write_toggle(&self) -> bool {
        self.write_toggle
    }

    #[must_use]
    pub fn in_vblank(&self) -> bool {
        self.vblank
    }
}
