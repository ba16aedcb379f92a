use nes_cartridge::CartridgeError;
use thiserror::Error;

use crate::BusFault;

#[derive(Debug, Error)]
pub enum NesError {
    #[error("cartridge: {0}")]
    Cartridge(#[from] CartridgeError),
    #[error("memory fault: {0}")]
    MemoryFault(#[from] BusFault),
    #[error("CPU jammed by opcode ${opcode:02X} at ${pc:04X}")]
    Jammed { pc: u16, opcode: u8 },
    #[error("no result after {cycles} cycles")]
    Timeout { cycles: u64 },
}
