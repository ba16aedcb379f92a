//! NES configuration.

/// Video region. Only the CPU clock matters without a PPU.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum NesRegion {
    /// NTSC: 1,789,773 Hz CPU.
    #[default]
    Ntsc,
    /// PAL: 1,662,607 Hz CPU.
    Pal,
}

impl NesRegion {
    /// CPU frequency in Hz.
    #[must_use]
    pub const fn cpu_hz(self) -> u32 {
        match self {
            Self::Ntsc => 1_789_773,
            Self::Pal => 1_662_607,
        }
    }

    /// CPU cycles in `millis` milliseconds of emulated time.
    #[must_use]
    pub const fn cycles_for_millis(self, millis: u64) -> u64 {
        self.cpu_hz() as u64 * millis / 1000
    }
}

/// NES configuration.
#[derive(Clone)]
pub struct NesConfig {
    /// iNES file contents.
    pub rom_data: Vec<u8>,
    /// Video region (NTSC or PAL). Defaults to NTSC.
    pub region: NesRegion,
    /// Stop on writes to ROM and accesses to unmapped space instead of
    /// logging them.
    pub strict_memory: bool,
    /// Emit every instruction as a `trace`-level event.
    pub trace_cpu: bool,
}

impl NesConfig {
    /// NTSC, strict memory, no tracing.
    #[must_use]
    pub fn new(rom_data: Vec<u8>) -> Self {
        Self {
            rom_data,
            region: NesRegion::default(),
            strict_memory: true,
            trace_cpu: false,
        }
    }
}

impl std::fmt::Debug for NesConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NesConfig")
            .field("rom_len", &self.rom_data.len())
            .field("region", &self.region)
            .field("strict_memory", &self.strict_memory)
            .field("trace_cpu", &self.trace_cpu)
            .finish()
    }
}
