//! Pin multiplexing on GPIO port A.

use crate::regs::{gpioa, RegisterMap};

/// MODER encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    Input = 0b00,
    Output = 0b01,
    Alternate = 0b10,
    Analog = 0b11,
}

impl Mode {
    pub const fn from_bits(bits: u32) -> Self {
        match bits & 0b11 {
            0b00 => Mode::Input,
            0b01 => Mode::Output,
            0b10 => Mode::Alternate,
            _ => Mode::Analog,
        }
    }
}

/// PUPDR encoding. `0b11` is reserved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Pull {
    None = 0b00,
    Up = 0b01,
    Down = 0b10,
}

impl Pull {
    pub const fn from_bits(bits: u32) -> Option<Self> {
        match bits & 0b11 {
            0b00 => Some(Pull::None),
            0b01 => Some(Pull::Up),
            0b10 => Some(Pull::Down),
            _ => None,
        }
    }
}

/// Alternate function number routing PA2/PA3 to USART2.
pub const AF7_USART2: u8 = 7;

pub struct PinMux<M> {
    regs: M,
}

impl<M: RegisterMap> PinMux<M> {
    pub fn new(regs: M) -> Self {
        Self { regs }
    }

    pub fn set_mode(&mut self, pin: u8, mode: Mode) {
        self.regs.write_field(gpioa::moder(pin), mode as u32);
    }

    pub fn set_pull(&mut self, pin: u8, pull: Pull) {
        self.regs.write_field(gpioa::pupdr(pin), pull as u32);
    }

    /// Routes `pin` to a peripheral. The function number is latched before
    /// the mode switch so the pin never drives the wrong signal.
    pub fn into_alternate(&mut self, pin: u8, function: u8) {
        self.regs.write_field(gpioa::afr(pin), u32::from(function));
        self.set_mode(pin, Mode::Alternate);
        self.set_pull(pin, Pull::None);
    }

    /// Analog input with pull resistors disconnected.
    pub fn into_analog(&mut self, pin: u8) {
        self.set_mode(pin, Mode::Analog);
        self.set_pull(pin, Pull::None);
    }

    pub fn mode(&mut self, pin: u8) -> Mode {
        Mode::from_bits(self.regs.read_field(gpioa::moder(pin)))
    }

    pub fn pull(&mut self, pin: u8) -> Option<Pull> {
        Pull::from_bits(self.regs.read_field(gpioa::pupdr(pin)))
    }

    pub fn alternate_function(&mut self, pin: u8) -> u8 {
        self.regs.read_field(gpioa::afr(pin)) as u8
    }

    pub fn free(self) -> M {
        self.regs
    }
}
