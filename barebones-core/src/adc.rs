//! ADC1, single regular channel.
//!
//! [`Adc::configure`] leaves the converter powered and armed but idle; the
//! bring-up never triggers a conversion. [`Adc::read_blocking`] is there for
//! callers that do.

use crate::config::AdcConfig;
use crate::error::Error;
use crate::gpio::PinMux;
use crate::regs::{adc, rcc, Register, RegisterMap};
use crate::wait::{self, Bounded, Forever, Poll};

/// ADCCLK = PCLK2 / n.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Prescaler {
    Div2 = 0b00,
    Div4 = 0b01,
    Div6 = 0b10,
    Div8 = 0b11,
}

/// SMPx encoding, in ADCCLK cycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SampleTime {
    Cycles3 = 0b000,
    Cycles15 = 0b001,
    Cycles28 = 0b010,
    Cycles56 = 0b011,
    Cycles84 = 0b100,
    Cycles112 = 0b101,
    Cycles144 = 0b110,
    Cycles480 = 0b111,
}

/// RES encoding for 12-bit conversions.
const RESOLUTION_12_BIT: u32 = 0b00;

pub struct Adc<M> {
    regs: M,
    config: AdcConfig,
}

impl<M: RegisterMap> Adc<M> {
    pub fn new(regs: M, config: AdcConfig) -> Self {
        Self { regs, config }
    }

    /// Clocks, analog pin, prescaler, 12-bit continuous mode, one-entry
    /// sequence, sample time, power on, then a fixed stabilization spin.
    /// No conversion is started.
    pub fn configure(&mut self) {
        // clock to GPIOA and ADC1
        self.regs.set(rcc::AHB1ENR_GPIOAEN);
        self.regs.set(rcc::APB2ENR_ADC1EN);

        // analog input, no pull-up/pull-down
        PinMux::new(&mut self.regs).into_analog(self.config.pin);

        // PCLK2 / 4 by default
        self.regs
            .write_field(adc::CCR_ADCPRE, self.config.prescaler as u32);

        // 12-bit, no scan, no interrupts
        self.regs.write(
            Register::Adc1Cr1,
            adc::CR1_RES.insert(0, RESOLUTION_12_BIT),
        );
        // continuous mode, no external trigger
        let cr2 = if self.config.continuous {
            adc::CR2_CONT.mask()
        } else {
            0
        };
        self.regs.write(Register::Adc1Cr2, cr2);

        // L = 0: one conversion
        self.regs.write(Register::Adc1Sqr1, adc::SQR1_L.insert(0, 0));
        self.regs.write(
            Register::Adc1Sqr3,
            adc::SQR3_SQ1.insert(0, u32::from(self.config.channel)),
        );

        self.regs.write_field(
            adc::smp(self.config.channel),
            self.config.sample_time as u32,
        );

        // power on and let the reference settle
        self.regs.set(adc::CR2_ADON);
        self.regs.settle(self.config.settle_spins);
    }

    /// Software trigger for the regular sequence.
    pub fn start_conversion(&mut self) {
        self.regs.set(adc::CR2_SWSTART);
    }

    /// Starts a conversion and spins until EOC. Reading DR clears EOC.
    pub fn read_blocking(&mut self) -> u16 {
        wait::never_fails(self.read_with(Forever))
    }

    pub fn read_within(&mut self, max_attempts: u32) -> Result<u16, Error> {
        self.read_with(Bounded::new(max_attempts))
    }

    pub fn read_with<P: Poll>(&mut self, poll: P) -> Result<u16, P::Error> {
        self.start_conversion();
        wait::until_set(&mut self.regs, adc::SR_EOC, poll)?;
        let sample = self.regs.read_field(adc::DR_DATA) as u16;
        // conversion-started flag is sticky
        self.regs.clear(adc::SR_STRT);
        Ok(sample)
    }

    pub fn is_powered(&mut self) -> bool {
        self.regs.is_set(adc::CR2_ADON)
    }

    /// Number of conversions in the regular sequence.
    pub fn sequence_length(&mut self) -> u8 {
        self.regs.read_field(adc::SQR1_L) as u8 + 1
    }

    /// Channel converted first in the regular sequence.
    pub fn channel(&mut self) -> u8 {
        self.regs.read_field(adc::SQR3_SQ1) as u8
    }

    pub fn free(self) -> M {
        self.regs
    }
}
