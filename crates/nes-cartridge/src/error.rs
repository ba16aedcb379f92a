use thiserror::Error;

/// Reasons an iNES image cannot be turned into a cartridge.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartridgeError {
    #[error("image too short for iNES header ({0} bytes)")]
    HeaderTooShort(usize),
    #[error("missing iNES magic (expected NES\\x1A)")]
    BadMagic,
    #[error("image declares no PRG ROM")]
    NoPrgRom,
    #[error("image truncated: expected {expected} bytes, found {actual}")]
    Truncated { expected: usize, actual: usize },
    #[error("unsupported mapper {0}")]
    UnsupportedMapper(u8),
}
