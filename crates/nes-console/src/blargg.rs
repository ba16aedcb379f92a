//! blargg test-ROM result protocol.
//!
//! The ROM writes `$80` to `$6000` while running and puts the signature
//! `DE B0 61` at `$6001-$6003`. `$81` asks for the reset button to be
//! pressed at least 100 ms later. Any other status is the final result code
//! (0 is a pass) with a NUL-terminated message at `$6004`.

use emu_core::Cpu;
use tracing::{debug, info};

use crate::{Nes, NesError};

pub const STATUS: u16 = 0x6000;
pub const SIGNATURE: u16 = 0x6001;
pub const MESSAGE: u16 = 0x6004;

pub const RUNNING: u8 = 0x80;
pub const NEEDS_RESET: u8 = 0x81;

const SIGNATURE_BYTES: [u8; 3] = [0xDE, 0xB0, 0x61];
const RESET_DELAY_MILLIS: u64 = 100;

/// Final result reported by a test ROM.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlarggReport {
    pub code: u8,
    pub message: String,
    /// CPU cycles from the start of [`run`] to the result.
    pub cycles: u64,
}

impl BlarggReport {
    #[must_use]
    pub fn passed(&self) -> bool {
        self.code == 0
    }
}

/// True once the ROM has written its signature.
#[must_use]
pub fn started(nes: &Nes) -> bool {
    (0..3).all(|i| nes.peek(SIGNATURE + i) == SIGNATURE_BYTES[usize::from(i)])
}

/// Run until the ROM reports a result or `budget` cycles pass.
pub fn run(nes: &mut Nes, budget: u64) -> Result<BlarggReport, NesError> {
    let start = nes.cycles();
    let reset_delay = nes.region().cycles_for_millis(RESET_DELAY_MILLIS);
    let mut reset_at = None;
    let mut last_status = None;

    loop {
        let elapsed = nes.cycles() - start;

        if started(nes) {
            let status = nes.peek(STATUS);
            match status {
                RUNNING => {}
                NEEDS_RESET => {
                    if last_status != Some(NEEDS_RESET) {
                        debug!(cycles = elapsed, "reset requested");
                        reset_at = Some(nes.cycles() + reset_delay);
                    }
                }
                code => {
                    let message = nes.peek_string(MESSAGE);
                    info!(code, cycles = elapsed, "test finished");
                    return Ok(BlarggReport {
                        code,
                        message,
                        cycles: elapsed,
                    });
                }
            }
            last_status = Some(status);
        }

        if reset_at.is_some_and(|at| nes.cycles() >= at) {
            debug!(cycles = elapsed, "pressing reset");
            reset_at = None;
            nes.reset();
        }

        if elapsed >= budget {
            return Err(NesError::Timeout { cycles: elapsed });
        }

        if nes.step()? {
            let pc = nes.cpu().pc().wrapping_sub(1);
            return Err(NesError::Jammed {
                pc,
                opcode: nes.peek(pc),
            });
        }
    }
}
