// barebones-core の RegisterMap を stm32f446 PAC のレジスタに割り当てる
// 読み書きはレジスタ単位の bits() のみ。ビットフィールドの意味は barebones-core 側で持つ

use barebones_core::{Register, RegisterMap};
use stm32f4::stm32f446;

// write は対象レジスタを全部書き換える（modify は core 側で read + write に分解済み）
macro_rules! write_bits {
    ($reg:expr, $value:expr) => {
        $reg.write(|w| unsafe { w.bits($value) })
    };
}

pub struct PacRegisters {
    rcc: stm32f446::RCC,
    gpioa: stm32f446::GPIOA,
    usart2: stm32f446::USART2,
    adc1: stm32f446::ADC1,
    adc_common: stm32f446::ADC_COMMON,
}

impl PacRegisters {
    pub fn new(peripheral: stm32f446::Peripherals) -> Self {
        Self {
            rcc: peripheral.RCC,
            gpioa: peripheral.GPIOA,
            usart2: peripheral.USART2,
            adc1: peripheral.ADC1,
            adc_common: peripheral.ADC_COMMON,
        }
    }
}

impl RegisterMap for PacRegisters {
    fn read(&mut self, register: Register) -> u32 {
        match register {
            Register::RccCr => self.rcc.cr.read().bits(),
            Register::RccCfgr => self.rcc.cfgr.read().bits(),
            Register::RccAhb1enr => self.rcc.ahb1enr.read().bits(),
            Register::RccApb1enr => self.rcc.apb1enr.read().bits(),
            Register::RccApb2enr => self.rcc.apb2enr.read().bits(),
            Register::GpioaModer => self.gpioa.moder.read().bits(),
            Register::GpioaPupdr => self.gpioa.pupdr.read().bits(),
            Register::GpioaAfrl => self.gpioa.afrl.read().bits(),
            Register::GpioaAfrh => self.gpioa.afrh.read().bits(),
            Register::Usart2Sr => self.usart2.sr.read().bits(),
            Register::Usart2Dr => self.usart2.dr.read().bits(),
            Register::Usart2Brr => self.usart2.brr.read().bits(),
            Register::Usart2Cr1 => self.usart2.cr1.read().bits(),
            Register::AdcCcr => self.adc_common.ccr.read().bits(),
            Register::Adc1Sr => self.adc1.sr.read().bits(),
            Register::Adc1Cr1 => self.adc1.cr1.read().bits(),
            Register::Adc1Cr2 => self.adc1.cr2.read().bits(),
            Register::Adc1Smpr1 => self.adc1.smpr1.read().bits(),
            Register::Adc1Smpr2 => self.adc1.smpr2.read().bits(),
            Register::Adc1Sqr1 => self.adc1.sqr1.read().bits(),
            Register::Adc1Sqr3 => self.adc1.sqr3.read().bits(),
            Register::Adc1Dr => self.adc1.dr.read().bits(),
        }
    }

    #[allow(unused_unsafe)]
    fn write(&mut self, register: Register, value: u32) {
        match register {
            Register::RccCr => write_bits!(self.rcc.cr, value),
            Register::RccCfgr => write_bits!(self.rcc.cfgr, value),
            Register::RccAhb1enr => write_bits!(self.rcc.ahb1enr, value),
            Register::RccApb1enr => write_bits!(self.rcc.apb1enr, value),
            Register::RccApb2enr => write_bits!(self.rcc.apb2enr, value),
            Register::GpioaModer => write_bits!(self.gpioa.moder, value),
            Register::GpioaPupdr => write_bits!(self.gpioa.pupdr, value),
            Register::GpioaAfrl => write_bits!(self.gpioa.afrl, value),
            Register::GpioaAfrh => write_bits!(self.gpioa.afrh, value),
            Register::Usart2Sr => write_bits!(self.usart2.sr, value),
            Register::Usart2Dr => write_bits!(self.usart2.dr, value),
            Register::Usart2Brr => write_bits!(self.usart2.brr, value),
            Register::Usart2Cr1 => write_bits!(self.usart2.cr1, value),
            Register::AdcCcr => write_bits!(self.adc_common.ccr, value),
            Register::Adc1Sr => write_bits!(self.adc1.sr, value),
            Register::Adc1Cr1 => write_bits!(self.adc1.cr1, value),
            Register::Adc1Cr2 => write_bits!(self.adc1.cr2, value),
            Register::Adc1Smpr1 => write_bits!(self.adc1.smpr1, value),
            Register::Adc1Smpr2 => write_bits!(self.adc1.smpr2, value),
            Register::Adc1Sqr1 => write_bits!(self.adc1.sqr1, value),
            Register::Adc1Sqr3 => write_bits!(self.adc1.sqr3, value),
            // DR は読み出し専用
            Register::Adc1Dr => {}
        }
    }

    // volatile ループ相当。nop は最適化で消されない
    fn settle(&mut self, spins: u32) {
        for _ in 0..spins {
            cortex_m::asm::nop();
        }
    }
}
