//! Memory and I/O bus interface.

/// Memory and I/O bus interface.
///
/// Components access memory and peripherals through this trait. The bus
/// handles address decoding and routing to the appropriate device.
pub trait Bus {
    /// Read a byte from the given address.
    ///
    /// Reads may have side effects on memory-mapped registers.
    fn read(&mut self, address: u16) -> u8;

    /// Read a byte without side effects.
    ///
    /// Used by disassemblers, tracers and test harnesses. Must return what
    /// `read` would return, minus any register side effects.
    fn peek(&self, address: u16) -> u8;

    /// Write a byte to the given address.
    fn write(&mut self, address: u16, value: u8);
}

/// Flat 64 KiB RAM with no mapped devices.
///
/// Every address is readable and writable. Used by CPU tests.
pub struct SimpleBus {
    memory: Box<[u8]>,
}

impl SimpleBus {
    #[must_use]
    pub fn new() -> Self {
        Self {
            memory: vec![0; 0x1_0000].into_boxed_slice(),
        }
    }

    /// Copy `data` into memory starting at `address`, wrapping at $FFFF.
    pub fn load(&mut self, address: u16, data: &[u8]) {
        let mut addr = address;
        for &byte in data {
            self.memory[usize::from(addr)] = byte;
            addr = addr.wrapping_add(1);
        }
    }
}

impl Default for SimpleBus {
    fn default() -> Self {
        Self::new()
    }
}

impl Bus for SimpleBus {
    fn read(&mut self, address: u16) -> u8 {
        self.memory[usize::from(address)]
    }

    fn peek(&self, address: u16) -> u8 {
        self.memory[usize::from(address)]
    }

    fn write(&mut self, address: u16, value: u8) {
        self.memory[usize::from(address)] = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_wraps_at_top_of_memory() {
        let mut bus = SimpleBus::new();
        bus.load(0xFFFE, &[0x11, 0x22, 0x33]);
        assert_eq!(bus.peek(0xFFFE), 0x11);
        assert_eq!(bus.peek(0xFFFF), 0x22);
        assert_eq!(bus.peek(0x0000), 0x33);
    }

    #[test]
    fn read_and_peek_agree() {
        let mut bus = SimpleBus::new();
        bus.write(0x1234, 0xAB);
        assert_eq!(bus.read(0x1234), 0xAB);
        assert_eq!(bus.peek(0x1234), 0xAB);
    }
}
