//! CPU core trait.

use crate::Bus;

/// A CPU core stepped one instruction at a time.
///
/// The bus is passed in, not owned, so the console can keep ownership of
/// RAM, cartridge and device registers and inspect them between steps.
pub trait Cpu {
    /// The type used for register inspection.
    type Registers;

    /// Execute exactly one instruction.
    ///
    /// Returns true if the CPU is halted (jammed) after the instruction.
    fn step<B: Bus>(&mut self, bus: &mut B) -> bool;

    /// Returns the current program counter.
    fn pc(&self) -> u16;

    /// Returns a snapshot of all registers for inspection.
    fn registers(&self) -> Self::Registers;

    /// Returns true if the CPU is halted.
    fn is_halted(&self) -> bool;

    /// Service a maskable interrupt now. Returns true if it was taken.
    fn irq<B: Bus>(&mut self, bus: &mut B) -> bool;

    /// Service a non-maskable interrupt now.
    fn nmi<B: Bus>(&mut self, bus: &mut B);

    /// Run the reset sequence (warm or cold start).
    fn reset<B: Bus>(&mut self, bus: &mut B);
}
