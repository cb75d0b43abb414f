//! USART2 transmit path on PA2 (TX) / PA3 (RX).
//!
//! Transmission is a pure busy-wait on TXE, one byte at a time. There is no
//! buffering and no interrupt.

use core::convert::Infallible;
use core::fmt;

use embedded_hal::serial;

use crate::config::UartConfig;
use crate::error::Error;
use crate::gpio::PinMux;
use crate::regs::{rcc, usart2, Register, RegisterMap};
use crate::wait::{self, Bounded, Poll};

pub struct Uart<M> {
    regs: M,
    config: UartConfig,
}

impl<M: RegisterMap> Uart<M> {
    pub fn new(regs: M, config: UartConfig) -> Self {
        Self { regs, config }
    }

    /// Pins to AF7, baud divisor, then TE | UE. Assumes SYSCLK is already
    /// running at `config.clock_hz`.
    pub fn configure(&mut self) {
        // clock to USART2 and GPIOA
        self.regs.set(rcc::APB1ENR_USART2EN);
        self.regs.set(rcc::AHB1ENR_GPIOAEN);

        let mut pins = PinMux::new(&mut self.regs);
        pins.into_alternate(self.config.tx_pin, self.config.alternate_function);
        pins.into_alternate(self.config.rx_pin, self.config.alternate_function);

        // 16 MHz / 115200 = ~139
        self.regs.write(Register::Usart2Brr, self.config.divisor());
        // transmitter and peripheral on, everything else default
        self.regs.write(
            Register::Usart2Cr1,
            usart2::CR1_TE.mask() | usart2::CR1_UE.mask(),
        );
    }

    /// Waits for TXE, then latches `byte` into DR. Blocks indefinitely.
    pub fn send_byte(&mut self, byte: u8) {
        wait::never_fails(nb::block!(serial::Write::write(&mut *self, byte)))
    }

    /// Bounded variant of [`send_byte`](Self::send_byte).
    pub fn try_send_byte(&mut self, byte: u8, max_attempts: u32) -> Result<(), Error> {
        self.send_byte_with(byte, Bounded::new(max_attempts))
    }

    pub fn send_byte_with<P: Poll>(&mut self, byte: u8, poll: P) -> Result<(), P::Error> {
        wait::until_set(&mut self.regs, usart2::SR_TXE, poll)?;
        self.regs.write(Register::Usart2Dr, u32::from(byte));
        Ok(())
    }

    /// Sends every byte in order. Returns `bytes.len()`.
    pub fn send_buffer(&mut self, bytes: &[u8]) -> usize {
        for &byte in bytes {
            self.send_byte(byte);
        }
        bytes.len()
    }

    pub fn send_buffer_with<P: Poll>(&mut self, bytes: &[u8], poll: P) -> Result<usize, P::Error> {
        for &byte in bytes {
            self.send_byte_with(byte, poll)?;
        }
        Ok(bytes.len())
    }

    pub fn is_enabled(&mut self) -> bool {
        self.regs.is_set(usart2::CR1_TE) && self.regs.is_set(usart2::CR1_UE)
    }

    pub fn free(self) -> M {
        self.regs
    }
}

impl<M: RegisterMap> serial::Write<u8> for Uart<M> {
    type Error = Infallible;

    fn write(&mut self, word: u8) -> nb::Result<(), Infallible> {
        if !self.regs.is_set(usart2::SR_TXE) {
            return Err(nb::Error::WouldBlock);
        }
        self.regs.write(Register::Usart2Dr, u32::from(word));
        Ok(())
    }

    fn flush(&mut self) -> nb::Result<(), Infallible> {
        if self.regs.is_set(usart2::SR_TC) {
            Ok(())
        } else {
            Err(nb::Error::WouldBlock)
        }
    }
}

impl<M: RegisterMap> fmt::Write for Uart<M> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.send_buffer(s.as_bytes());
        Ok(())
    }
}
