//! Register map access.
//!
//! Registers are named by peripheral and offset (RM0390), bit fields by
//! register, offset and width. Everything else in this crate talks to the
//! hardware through [`RegisterMap`], so the same sequences run against the
//! PAC on the board and against a mock on the host.

use core::fmt;

/// Memory-mapped registers touched by the bring-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Register {
    RccCr,
    RccCfgr,
    RccAhb1enr,
    RccApb1enr,
    RccApb2enr,
    GpioaModer,
    GpioaPupdr,
    GpioaAfrl,
    GpioaAfrh,
    Usart2Sr,
    Usart2Dr,
    Usart2Brr,
    Usart2Cr1,
    AdcCcr,
    Adc1Sr,
    Adc1Cr1,
    Adc1Cr2,
    Adc1Smpr1,
    Adc1Smpr2,
    Adc1Sqr1,
    Adc1Sqr3,
    Adc1Dr,
}

impl Register {
    pub const COUNT: usize = 22;

    pub const ALL: [Register; Register::COUNT] = [
        Register::RccCr,
        Register::RccCfgr,
        Register::RccAhb1enr,
        Register::RccApb1enr,
        Register::RccApb2enr,
        Register::GpioaModer,
        Register::GpioaPupdr,
        Register::GpioaAfrl,
        Register::GpioaAfrh,
        Register::Usart2Sr,
        Register::Usart2Dr,
        Register::Usart2Brr,
        Register::Usart2Cr1,
        Register::AdcCcr,
        Register::Adc1Sr,
        Register::Adc1Cr1,
        Register::Adc1Cr2,
        Register::Adc1Smpr1,
        Register::Adc1Smpr2,
        Register::Adc1Sqr1,
        Register::Adc1Sqr3,
        Register::Adc1Dr,
    ];

    /// Position in [`Register::ALL`].
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Absolute bus address on the STM32F446.
    pub const fn address(self) -> u32 {
        const RCC: u32 = 0x4002_3800;
        const GPIOA: u32 = 0x4002_0000;
        const USART2: u32 = 0x4000_4400;
        const ADC1: u32 = 0x4001_2000;
        const ADC_COMMON: u32 = 0x4001_2300;

        match self {
            Register::RccCr => RCC,
            Register::RccCfgr => RCC + 0x08,
            Register::RccAhb1enr => RCC + 0x30,
            Register::RccApb1enr => RCC + 0x40,
            Register::RccApb2enr => RCC + 0x44,
            Register::GpioaModer => GPIOA,
            Register::GpioaPupdr => GPIOA + 0x0C,
            Register::GpioaAfrl => GPIOA + 0x20,
            Register::GpioaAfrh => GPIOA + 0x24,
            Register::Usart2Sr => USART2,
            Register::Usart2Dr => USART2 + 0x04,
            Register::Usart2Brr => USART2 + 0x08,
            Register::Usart2Cr1 => USART2 + 0x0C,
            Register::AdcCcr => ADC_COMMON + 0x04,
            Register::Adc1Sr => ADC1,
            Register::Adc1Cr1 => ADC1 + 0x04,
            Register::Adc1Cr2 => ADC1 + 0x08,
            Register::Adc1Smpr1 => ADC1 + 0x0C,
            Register::Adc1Smpr2 => ADC1 + 0x10,
            Register::Adc1Sqr1 => ADC1 + 0x2C,
            Register::Adc1Sqr3 => ADC1 + 0x34,
            Register::Adc1Dr => ADC1 + 0x4C,
        }
    }

    /// Value after a system reset.
    pub const fn reset_value(self) -> u32 {
        match self {
            // HSION | HSIRDY | HSITRIM = 16
            Register::RccCr => 0x0000_0083,
            Register::RccAhb1enr => 0x0010_0000,
            // PA13/PA14/PA15 belong to the debug port
            Register::GpioaModer => 0xA800_0000,
            Register::GpioaPupdr => 0x6400_0000,
            // TXE | TC
            Register::Usart2Sr => 0x0000_00C0,
            _ => 0,
        }
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}@{:#010x}", self, self.address())
    }
}

/// A contiguous bit field inside one register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Field {
    pub register: Register,
    pub offset: u8,
    pub width: u8,
}

impl Field {
    pub const fn new(register: Register, offset: u8, width: u8) -> Self {
        Self {
            register,
            offset,
            width,
        }
    }

    /// Largest value the field can hold.
    pub const fn max_value(self) -> u32 {
        ((1u64 << self.width) - 1) as u32
    }

    pub const fn mask(self) -> u32 {
        self.max_value() << self.offset
    }

    pub const fn extract(self, register_value: u32) -> u32 {
        (register_value & self.mask()) >> self.offset
    }

    /// Returns `register_value` with the field replaced by `value`.
    /// Bits of `value` beyond the field width are dropped.
    pub const fn insert(self, register_value: u32, value: u32) -> u32 {
        (register_value & !self.mask()) | ((value << self.offset) & self.mask())
    }
}

/// Reset and clock control.
pub mod rcc {
    use super::{Field, Register};

    pub const CR_HSION: Field = Field::new(Register::RccCr, 0, 1);
    pub const CR_HSIRDY: Field = Field::new(Register::RccCr, 1, 1);

    pub const CFGR_SW: Field = Field::new(Register::RccCfgr, 0, 2);
    pub const CFGR_SWS: Field = Field::new(Register::RccCfgr, 2, 2);
    /// SW/SWS encoding for the internal 16 MHz oscillator.
    pub const SYSCLK_HSI: u32 = 0b00;
    pub const SYSCLK_HSE: u32 = 0b01;
    pub const SYSCLK_PLL: u32 = 0b10;

    pub const AHB1ENR_GPIOAEN: Field = Field::new(Register::RccAhb1enr, 0, 1);
    pub const APB1ENR_USART2EN: Field = Field::new(Register::RccApb1enr, 17, 1);
    pub const APB2ENR_ADC1EN: Field = Field::new(Register::RccApb2enr, 8, 1);
}

/// GPIO port A. Fields are per pin.
pub mod gpioa {
    use super::{Field, Register};

    pub const fn moder(pin: u8) -> Field {
        Field::new(Register::GpioaModer, pin * 2, 2)
    }

    pub const fn pupdr(pin: u8) -> Field {
        Field::new(Register::GpioaPupdr, pin * 2, 2)
    }

    /// Alternate-function selector, AFRL for pins 0-7 and AFRH for 8-15.
    pub const fn afr(pin: u8) -> Field {
        if pin < 8 {
            Field::new(Register::GpioaAfrl, pin * 4, 4)
        } else {
            Field::new(Register::GpioaAfrh, (pin - 8) * 4, 4)
        }
    }
}

pub mod usart2 {
    use super::{Field, Register};

    pub const SR_TC: Field = Field::new(Register::Usart2Sr, 6, 1);
    pub const SR_TXE: Field = Field::new(Register::Usart2Sr, 7, 1);

    pub const DR_DR: Field = Field::new(Register::Usart2Dr, 0, 9);

    pub const BRR: Field = Field::new(Register::Usart2Brr, 0, 16);

    pub const CR1_TE: Field = Field::new(Register::Usart2Cr1, 3, 1);
    pub const CR1_UE: Field = Field::new(Register::Usart2Cr1, 13, 1);
}

/// ADC1 and the registers shared by all ADCs.
pub mod adc {
    use super::{Field, Register};

    pub const CCR_ADCPRE: Field = Field::new(Register::AdcCcr, 16, 2);

    pub const SR_EOC: Field = Field::new(Register::Adc1Sr, 1, 1);
    pub const SR_STRT: Field = Field::new(Register::Adc1Sr, 4, 1);

    pub const CR1_RES: Field = Field::new(Register::Adc1Cr1, 24, 2);

    pub const CR2_ADON: Field = Field::new(Register::Adc1Cr2, 0, 1);
    pub const CR2_CONT: Field = Field::new(Register::Adc1Cr2, 1, 1);
    pub const CR2_SWSTART: Field = Field::new(Register::Adc1Cr2, 30, 1);

    /// Regular sequence length, encoded as `conversions - 1`.
    pub const SQR1_L: Field = Field::new(Register::Adc1Sqr1, 20, 4);
    /// First conversion in the regular sequence.
    pub const SQR3_SQ1: Field = Field::new(Register::Adc1Sqr3, 0, 5);

    pub const DR_DATA: Field = Field::new(Register::Adc1Dr, 0, 16);

    /// Sample-time selector for `channel` (SMPR2 for 0-9, SMPR1 for 10-18).
    pub const fn smp(channel: u8) -> Field {
        if channel < 10 {
            Field::new(Register::Adc1Smpr2, channel * 3, 3)
        } else {
            Field::new(Register::Adc1Smpr1, (channel - 10) * 3, 3)
        }
    }
}

/// Read/write access to the peripheral registers.
///
/// `read` takes `&mut self` because status reads have side effects on real
/// hardware (and in the mock).
pub trait RegisterMap {
    fn read(&mut self, register: Register) -> u32;

    fn write(&mut self, register: Register, value: u32);

    /// Burns `spins` iterations of a busy loop that the compiler may not
    /// remove. Not time based.
    fn settle(&mut self, spins: u32) {
        for _ in 0..spins {
            core::hint::spin_loop();
        }
    }

    fn modify<F>(&mut self, register: Register, f: F)
    where
        F: FnOnce(u32) -> u32,
    {
        let value = self.read(register);
        self.write(register, f(value));
    }

    fn read_field(&mut self, field: Field) -> u32 {
        field.extract(self.read(field.register))
    }

    fn write_field(&mut self, field: Field, value: u32) {
        self.modify(field.register, |r| field.insert(r, value));
    }

    fn set(&mut self, field: Field) {
        self.write_field(field, field.max_value());
    }

    fn clear(&mut self, field: Field) {
        self.write_field(field, 0);
    }

    fn is_set(&mut self, field: Field) -> bool {
        self.read_field(field) != 0
    }
}

impl<T: RegisterMap> RegisterMap for &mut T {
    fn read(&mut self, register: Register) -> u32 {
        (**self).read(register)
    }

    fn write(&mut self, register: Register, value: u32) {
        (**self).write(register, value)
    }

    fn settle(&mut self, spins: u32) {
        (**self).settle(spins)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_order_matches_index() {
        for (i, register) in Register::ALL.iter().enumerate() {
            assert_eq!(register.index(), i);
        }
    }

    #[test]
    fn test_field_insert_and_extract() {
        let field = Field::new(Register::Usart2Cr1, 4, 3);
        assert_eq!(field.mask(), 0b111_0000);

        let value = field.insert(0xFFFF_FFFF, 0b010);
        assert_eq!(value, 0xFFFF_FFAF);
        assert_eq!(field.extract(value), 0b010);

        // overflow is truncated to the field
        assert_eq!(field.insert(0, 0xFF), 0b111_0000);
    }

    #[test]
    fn test_full_width_field() {
        let field = Field::new(Register::Adc1Cr1, 0, 32);
        assert_eq!(field.max_value(), u32::MAX);
        assert_eq!(field.insert(0x1234_5678, 0xCAFE_F00D), 0xCAFE_F00D);
    }

    #[test]
    fn test_per_pin_fields() {
        assert_eq!(gpioa::moder(3).mask(), 0b11 << 6);
        assert_eq!(gpioa::afr(2), Field::new(Register::GpioaAfrl, 8, 4));
        assert_eq!(gpioa::afr(9), Field::new(Register::GpioaAfrh, 4, 4));
        assert_eq!(adc::smp(0), Field::new(Register::Adc1Smpr2, 0, 3));
        assert_eq!(adc::smp(11), Field::new(Register::Adc1Smpr1, 3, 3));
    }

    #[test]
    fn test_addresses() {
        assert_eq!(Register::RccApb1enr.address(), 0x4002_3840);
        assert_eq!(Register::Usart2Dr.address(), 0x4000_4404);
        assert_eq!(Register::AdcCcr.address(), 0x4001_2304);
        assert_eq!(Register::Adc1Dr.address(), 0x4001_204C);
    }
}
