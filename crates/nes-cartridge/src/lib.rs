//! iNES cartridge images.
//!
//! Parses the iNES container (header, optional trainer, PRG ROM, CHR ROM)
//! and maps the CPU-visible cartridge space. Only NROM (mapper 0) is
//! supported: 16K or 32K of PRG at $8000-$FFFF and PRG RAM at $6000-$7FFF.

mod error;
mod ines;
mod nrom;

pub use error::CartridgeError;
pub use ines::{InesHeader, Mirroring};
pub use nrom::{Mapper, Nrom};

/// A parsed cartridge: header plus mapper.
pub struct Cartridge {
    header: InesHeader,
    mapper: Box<dyn Mapper>,
}

impl Cartridge {
    /// Parse an iNES image. Rejects every mapper but NROM.
    pub fn from_ines(data: &[u8]) -> Result<Self, CartridgeError> {
        let header = InesHeader::parse(data)?;
        let prg_start = ines::HEADER_LEN + if header.has_trainer { ines::TRAINER_LEN } else { 0 };
        let chr_start = prg_start + header.prg_rom_len();
        let end = chr_start + header.chr_rom_len();

        if data.len() < end {
            return Err(CartridgeError::Truncated {
                expected: end,
                actual: data.len(),
            });
        }

        let prg_rom = data[prg_start..chr_start].to_vec();
        let chr_rom = data[chr_start..end].to_vec();

        let mapper: Box<dyn Mapper> = match header.mapper_number {
            0 => Box::new(Nrom::new(prg_rom, chr_rom, header.prg_ram_len(), header.mirroring)),
            other => return Err(CartridgeError::UnsupportedMapper(other)),
        };

        tracing::debug!(
            mapper = header.mapper_number,
            prg_kib = header.prg_rom_len() / 1024,
            chr_kib = header.chr_rom_len() / 1024,
            prg_ram_kib = header.prg_ram_len() / 1024,
            mirroring = ?header.mirroring,
            "cartridge loaded"
        );

        Ok(Self { header, mapper })
    }

    #[must_use]
    pub fn header(&self) -> &InesHeader {
        &self.header
    }

    #[must_use]
    pub fn mapper(&self) -> &dyn Mapper {
        self.mapper.as_ref()
    }

    pub fn mapper_mut(&mut self) -> &mut dyn Mapper {
        self.mapper.as_mut()
    }
}

impl std::fmt::Debug for Cartridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cartridge")
            .field("header", &self.header)
            .finish_non_exhaustive()
    }
}
