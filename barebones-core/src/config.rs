//! Compile-time bring-up settings.
//!
//! Nothing here is read at runtime from anywhere but the binary itself;
//! firmware picks [`BringupConfig::DEFAULT`] or a `const` derived from it.

use crate::adc::{Prescaler, SampleTime};
use crate::gpio::AF7_USART2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BringupConfig {
    /// Explicitly switch SYSCLK to HSI before touching peripherals.
    /// Off by default: the post-reset clock already is HSI.
    pub switch_to_hsi: bool,
    /// Give up on a status flag after this many reads instead of spinning
    /// forever.
    pub poll_limit: Option<u32>,
    pub uart: UartConfig,
    pub adc: AdcConfig,
}

impl BringupConfig {
    pub const DEFAULT: Self = Self {
        switch_to_hsi: false,
        poll_limit: None,
        uart: UartConfig::DEFAULT,
        adc: AdcConfig::DEFAULT,
    };
}

impl Default for BringupConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// USART2 settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UartConfig {
    /// Kernel clock of USART2 (APB1) in Hz.
    pub clock_hz: u32,
    pub baudrate: u32,
    pub tx_pin: u8,
    pub rx_pin: u8,
    pub alternate_function: u8,
}

impl UartConfig {
    pub const DEFAULT: Self = Self {
        clock_hz: 16_000_000,
        baudrate: 115_200,
        tx_pin: 2,
        rx_pin: 3,
        alternate_function: AF7_USART2,
    };

    /// BRR value with 16x oversampling, rounded to nearest.
    pub const fn divisor(&self) -> u32 {
        (self.clock_hz + self.baudrate / 2) / self.baudrate
    }
}

/// ADC1 settings for a single regular channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AdcConfig {
    /// GPIOA pin carrying the analog input.
    pub pin: u8,
    pub channel: u8,
    pub prescaler: Prescaler,
    pub sample_time: SampleTime,
    pub continuous: bool,
    /// Busy-loop iterations after ADON before the converter may be used.
    pub settle_spins: u32,
}

impl AdcConfig {
    /// PA0 / ADC1_IN0.
    pub const DEFAULT: Self = Self {
        pin: 0,
        channel: 0,
        prescaler: Prescaler::Div4,
        sample_time: SampleTime::Cycles84,
        continuous: true,
        settle_spins: 1000,
    };
}
