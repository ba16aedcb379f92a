//! APU register stub.
//!
//! Latches writes to `$4000-$4017` so test ROMs that poke sound and
//! controller registers keep running. Reads return the last value written.

pub const APU_REGISTERS: usize = 0x18;

#[derive(Debug, Clone, Default)]
pub struct Apu {
    regs: [u8; APU_REGISTERS],
}

impl Apu {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn peek(&self, addr: u16) -> u8 {
        self.regs[usize::from(addr - 0x4000) % APU_REGISTERS]
    }

    pub fn write(&mut self, addr: u16, value: u8) {
        self.regs[usize::from(addr - 0x4000) % APU_REGISTERS] = value;
    }
}
