//! NES console around the 2A03 core.
//!
//! Wires the CPU to 2 KiB of work RAM, stubbed PPU and APU registers and an
//! NROM cartridge, and drives test ROMs that report through the blargg
//! `$6000` protocol. There is no video or audio output: the PPU and APU only
//! latch register writes so CPU test programs run to completion.

mod apu;
pub mod blargg;
mod bus;
mod config;
mod error;
mod nes;
mod ppu;

pub use apu::Apu;
pub use blargg::BlarggReport;
pub use bus::{BusFault, NesBus};
pub use config::{NesConfig, NesRegion};
pub use error::NesError;
pub use nes::{Nes, RunOutcome};
pub use ppu::Ppu;
