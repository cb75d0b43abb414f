//! Host-side stand-in for the STM32F446 register file.
//!
//! Starts from reset values and reproduces the handful of hardware reactions
//! the bring-up depends on: HSIRDY after HSION, SWS following SW, TXE/TC
//! dropping after a DR write, EOC after SWSTART. Flags come up after
//! `latency` further reads of their register.

use crate::regs::{adc, rcc, usart2, Field, Register, RegisterMap};

/// A flag the mock will raise after some more reads of its register.
#[derive(Debug, Clone, Copy)]
struct Pending {
    field: Field,
    value: u32,
    remaining: u32,
}

#[derive(Debug)]
pub(crate) struct MockRegisters {
    values: [u32; Register::COUNT],
    reads: [usize; Register::COUNT],
    writes: Vec<(Register, u32)>,
    pending: Vec<Pending>,
    stalled: Vec<Field>,
    latency: u32,
    tx: Vec<u8>,
    tx_while_busy: usize,
    tx_while_disabled: usize,
    settled: Vec<u32>,
    adc_sample: u16,
}

impl MockRegisters {
    pub(crate) fn new() -> Self {
        let mut values = [0; Register::COUNT];
        for register in Register::ALL {
            values[register.index()] = register.reset_value();
        }

        Self {
            values,
            reads: [0; Register::COUNT],
            writes: Vec::new(),
            pending: Vec::new(),
            stalled: Vec::new(),
            latency: 2,
            tx: Vec::new(),
            tx_while_busy: 0,
            tx_while_disabled: 0,
            settled: Vec::new(),
            adc_sample: 0,
        }
    }

    /// Number of extra reads before a scheduled flag becomes visible.
    pub(crate) fn set_latency(&mut self, reads: u32) {
        self.latency = reads;
    }

    /// Never raise `field`, whatever software does.
    pub(crate) fn stall(&mut self, field: Field) {
        self.pending.retain(|p| p.field != field);
        self.stalled.push(field);
    }

    /// Value DR returns for the next conversion.
    pub(crate) fn set_adc_sample(&mut self, sample: u16) {
        self.adc_sample = sample;
    }

    /// Overwrites a register without side effects or bookkeeping.
    pub(crate) fn preset(&mut self, register: Register, value: u32) {
        self.values[register.index()] = value;
    }

    pub(crate) fn peek(&self, register: Register) -> u32 {
        self.values[register.index()]
    }

    pub(crate) fn peek_field(&self, field: Field) -> u32 {
        field.extract(self.peek(field.register))
    }

    pub(crate) fn reads(&self, register: Register) -> usize {
        self.reads[register.index()]
    }

    /// Every write in program order, as software issued it.
    pub(crate) fn writes(&self) -> &[(Register, u32)] {
        &self.writes
    }

    pub(crate) fn writes_to(&self, register: Register) -> Vec<u32> {
        self.writes
            .iter()
            .filter(|(r, _)| *r == register)
            .map(|(_, v)| *v)
            .collect()
    }

    /// Bytes latched into USART2 DR.
    pub(crate) fn transmitted(&self) -> &[u8] {
        &self.tx
    }

    /// DR writes issued while TXE was clear.
    pub(crate) fn overruns(&self) -> usize {
        self.tx_while_busy
    }

    /// DR writes issued before TE and UE were both set.
    pub(crate) fn early_writes(&self) -> usize {
        self.tx_while_disabled
    }

    pub(crate) fn settled(&self) -> &[u32] {
        &self.settled
    }

    fn poke_field(&mut self, field: Field, value: u32) {
        let register = field.register.index();
        self.values[register] = field.insert(self.values[register], value);
    }

    fn schedule(&mut self, field: Field, value: u32) {
        self.pending.retain(|p| p.field != field);
        if self.stalled.contains(&field) {
            return;
        }
        self.pending.push(Pending {
            field,
            value,
            remaining: self.latency,
        });
    }

    fn cancel(&mut self, field: Field) {
        self.pending.retain(|p| p.field != field);
    }

    fn advance(&mut self, register: Register) {
        let mut due = Vec::new();
        self.pending.retain_mut(|p| {
            if p.field.register != register {
                return true;
            }
            if p.remaining == 0 {
                due.push((p.field, p.value));
                false
            } else {
                p.remaining -= 1;
                true
            }
        });
        for (field, value) in due {
            self.poke_field(field, value);
        }
    }

    /// Bits software cannot change by writing.
    fn hardware_owned(register: Register) -> u32 {
        match register {
            Register::RccCr => rcc::CR_HSIRDY.mask(),
            Register::RccCfgr => rcc::CFGR_SWS.mask(),
            Register::Usart2Sr => usart2::SR_TXE.mask() | usart2::SR_TC.mask(),
            Register::Adc1Dr => u32::MAX,
            _ => 0,
        }
    }

    fn on_write(&mut self, register: Register, value: u32) {
        match register {
            Register::RccCr => {
                if rcc::CR_HSION.extract(value) == 0 {
                    self.cancel(rcc::CR_HSIRDY);
                    self.poke_field(rcc::CR_HSIRDY, 0);
                } else if self.peek_field(rcc::CR_HSIRDY) == 0 {
                    self.schedule(rcc::CR_HSIRDY, 1);
                }
            }
            Register::RccCfgr => {
                let sw = rcc::CFGR_SW.extract(value);
                if sw != self.peek_field(rcc::CFGR_SWS) {
                    self.schedule(rcc::CFGR_SWS, sw);
                }
            }
            Register::Usart2Dr => {
                if self.peek_field(usart2::SR_TXE) == 0 {
                    self.tx_while_busy += 1;
                }
                if self.peek_field(usart2::CR1_TE) == 0 || self.peek_field(usart2::CR1_UE) == 0 {
                    self.tx_while_disabled += 1;
                }
                self.tx.push(value as u8);
                self.poke_field(usart2::SR_TXE, 0);
                self.poke_field(usart2::SR_TC, 0);
                self.schedule(usart2::SR_TXE, 1);
                self.schedule(usart2::SR_TC, 1);
            }
            Register::Adc1Cr2 => {
                if adc::CR2_SWSTART.extract(value) == 1 {
                    // SWSTART reads back as zero once the conversion begins
                    self.poke_field(adc::CR2_SWSTART, 0);
                    if adc::CR2_ADON.extract(value) == 1 {
                        self.poke_field(adc::SR_STRT, 1);
                        self.poke_field(adc::SR_EOC, 0);
                        self.poke_field(adc::DR_DATA, u32::from(self.adc_sample));
                        self.schedule(adc::SR_EOC, 1);
                    }
                }
            }
            _ => {}
        }
    }
}

impl RegisterMap for MockRegisters {
    fn read(&mut self, register: Register) -> u32 {
        self.reads[register.index()] += 1;
        self.advance(register);
        let value = self.peek(register);
        if register == Register::Adc1Dr {
            // reading DR clears EOC
            self.poke_field(adc::SR_EOC, 0);
        }
        value
    }

    fn write(&mut self, register: Register, value: u32) {
        self.writes.push((register, value));
        let owned = Self::hardware_owned(register);
        let index = register.index();
        self.values[index] = (self.values[index] & owned) | (value & !owned);
        self.on_write(register, value);
    }

    fn settle(&mut self, spins: u32) {
        self.settled.push(spins);
    }
}
