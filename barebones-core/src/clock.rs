//! System clock selection.
//!
//! After reset the F446 already runs from HSI, so the bring-up normally skips
//! this step. It is kept callable for boards where a bootloader left the
//! system clock on HSE or the PLL.

use crate::error::Error;
use crate::regs::{rcc, RegisterMap};
use crate::wait::{self, Bounded, Forever, Poll};

pub struct Clock<M> {
    regs: M,
}

impl<M: RegisterMap> Clock<M> {
    pub fn new(regs: M) -> Self {
        Self { regs }
    }

    /// Switches SYSCLK to the 16 MHz internal oscillator.
    ///
    /// Spins forever if the oscillator never reports ready.
    pub fn configure(&mut self) {
        wait::never_fails(self.configure_with(Forever))
    }

    /// Like [`configure`](Self::configure), but each wait gives up after
    /// `max_attempts` reads.
    pub fn configure_within(&mut self, max_attempts: u32) -> Result<(), Error> {
        self.configure_with(Bounded::new(max_attempts))
    }

    pub fn configure_with<P: Poll>(&mut self, poll: P) -> Result<(), P::Error> {
        // HSI ON
        self.regs.set(rcc::CR_HSION);
        // wait for HSI to stabilize
        wait::until_set(&mut self.regs, rcc::CR_HSIRDY, poll)?;

        // select HSI as system clock
        self.regs.write_field(rcc::CFGR_SW, rcc::SYSCLK_HSI);
        // wait for the switch to take effect
        wait::until(&mut self.regs, rcc::CFGR_SWS, rcc::SYSCLK_HSI, poll)?;

        Ok(())
    }

    pub fn is_hsi_selected(&mut self) -> bool {
        self.regs.read_field(rcc::CFGR_SWS) == rcc::SYSCLK_HSI
    }

    pub fn free(self) -> M {
        self.regs
    }
}
