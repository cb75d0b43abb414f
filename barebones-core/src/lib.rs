//! Register-level bring-up for the STM32F446 (NUCLEO-F446RE).
//!
//! Brings up the system clock, USART2 on PA2/PA3 and ADC1 on PA0, then
//! prints two lines over the UART. All hardware access goes through
//! [`RegisterMap`], which the firmware binds to the `stm32f4` PAC and the
//! tests bind to an in-memory mock.
//!
//! ```text
//! startup::run
//!   ├── Clock     (optional HSI switch)
//!   ├── Uart      (PinMux AF7, BRR, TE|UE)
//!   ├── Adc       (PinMux analog, ADCPRE, SQR, SMPR, ADON)
//!   └── Uart::send_buffer x2
//! ```

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod adc;
pub mod clock;
pub mod config;
pub mod error;
pub mod gpio;
pub mod regs;
pub mod startup;
pub mod uart;
pub mod wait;

#[cfg(test)]
mod mock;

pub use adc::Adc;
pub use clock::Clock;
pub use config::{AdcConfig, BringupConfig, UartConfig};
pub use error::Error;
pub use gpio::PinMux;
pub use regs::{Field, Register, RegisterMap};
pub use uart::Uart;
