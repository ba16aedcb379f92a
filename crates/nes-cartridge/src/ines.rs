use crate::CartridgeError;

pub(crate) const HEADER_LEN: usize = 16;
pub(crate) const TRAINER_LEN: usize = 512;

const MAGIC: &[u8; 4] = b"NES\x1a";
const PRG_BANK: usize = 16 * 1024;
const CHR_BANK: usize = 8 * 1024;
const PRG_RAM_UNIT: usize = 8 * 1024;

/// Nametable mirroring mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mirroring {
    Horizontal,
    Vertical,
    FourScreen,
}

/// Parsed iNES file header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InesHeader {
    pub prg_rom_banks: u8,
    pub chr_rom_banks: u8,
    pub mapper_number: u8,
    pub mirroring: Mirroring,
    pub has_battery: bool,
    pub has_trainer: bool,
    /// PRG RAM in 8 KiB units. Zero in the file means one unit.
    pub prg_ram_banks: u8,
}

impl InesHeader {
    pub fn parse(data: &[u8]) -> Result<Self, CartridgeError> {
        if data.len() < HEADER_LEN {
            return Err(CartridgeError::HeaderTooShort(data.len()));
        }
        if &data[0..4] != MAGIC {
            return Err(CartridgeError::BadMagic);
        }

        let prg_rom_banks = data[4];
        let chr_rom_banks = data[5];
        let flags6 = data[6];
        let flags7 = data[7];
        let flags8 = data[8];

        if prg_rom_banks == 0 {
            return Err(CartridgeError::NoPrgRom);
        }

        // Old dumpers wrote signatures into bytes 12-15 ("DiskDude!"),
        // which corrupts flags 7. Only trust the upper nibble on a clean tail.
        let dirty_tail = data[12..16].iter().any(|&b| b != 0);
        let mapper_high = if dirty_tail {
            tracing::warn!("dirty iNES header tail, ignoring mapper high nibble");
            0
        } else {
            flags7 & 0xF0
        };
        let mapper_number = mapper_high | (flags6 >> 4);

        let mirroring = if flags6 & 0x08 != 0 {
            Mirroring::FourScreen
        } else if flags6 & 0x01 != 0 {
            Mirroring::Vertical
        } else {
            Mirroring::Horizontal
        };

        Ok(Self {
            prg_rom_banks,
            chr_rom_banks,
            mapper_number,
            mirroring,
            has_battery: flags6 & 0x02 != 0,
            has_trainer: flags6 & 0x04 != 0,
            prg_ram_banks: flags8.max(1),
        })
    }

    #[must_use]
    pub fn prg_rom_len(&self) -> usize {
        usize::from(self.prg_rom_banks) * PRG_BANK
    }

    #[must_use]
    pub fn chr_rom_len(&self) -> usize {
        usize::from(self.chr_rom_banks) * CHR_BANK
    }

    #[must_use]
    pub fn prg_ram_len(&self) -> usize {
        usize::from(self.prg_ram_banks) * PRG_RAM_UNIT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(bytes: [u8; 16]) -> Result<InesHeader, CartridgeError> {
        InesHeader::parse(&bytes)
    }

    #[test]
    fn reject_bad_magic() {
        let mut data = [0u8; 16];
        data[0..4].copy_from_slice(b"NES\x00");
        data[4] = 1;
        assert_eq!(header(data), Err(CartridgeError::BadMagic));
    }

    #[test]
    fn reject_short_image() {
        assert_eq!(
            InesHeader::parse(b"NES\x1a"),
            Err(CartridgeError::HeaderTooShort(4))
        );
    }

    #[test]
    fn reject_zero_prg() {
        let mut data = [0u8; 16];
        data[0..4].copy_from_slice(MAGIC);
        assert_eq!(header(data), Err(CartridgeError::NoPrgRom));
    }

    #[test]
    fn mapper_number_combines_nibbles() {
        let mut data = [0u8; 16];
        data[0..4].copy_from_slice(MAGIC);
        data[4] = 1;
        data[6] = 0x40;
        data[7] = 0x10;
        assert_eq!(header(data).map(|h| h.mapper_number), Ok(0x14));
    }

    #[test]
    fn dirty_tail_drops_high_nibble() {
        let mut data = [0u8; 16];
        data[0..4].copy_from_slice(MAGIC);
        data[4] = 1;
        data[7] = 0x44;
        data[12..16].copy_from_slice(b"Dude");
        assert_eq!(header(data).map(|h| h.mapper_number), Ok(0));
    }

    #[test]
    fn flags_and_prg_ram() {
        let mut data = [0u8; 16];
        data[0..4].copy_from_slice(MAGIC);
        data[4] = 2;
        data[5] = 1;
        data[6] = 0x0B;
        data[8] = 0;
        let h = header(data).expect("valid header");
        assert_eq!(h.mirroring, Mirroring::FourScreen);
        assert!(h.has_battery);
        assert!(!h.has_trainer);
        assert_eq!(h.prg_rom_len(), 32768);
        assert_eq!(h.chr_rom_len(), 8192);
        assert_eq!(h.prg_ram_len(), 8192);

        data[8] = 4;
        assert_eq!(header(data).map(|h| h.prg_ram_len()), Ok(32768));
    }
}
