//! Core traits and types shared by the CPU core and the console.
//!
//! The CPU never owns memory. It is handed a [`Bus`] on every call and
//! everything it touches goes through `read`, `peek` or `write`.

mod bus;
mod cpu;
mod observable;

pub use bus::{Bus, SimpleBus};
pub use cpu::Cpu;
pub use observable::{Observable, Value};
