//! The one-shot bring-up: clock (optional), USART2, ADC1, two diagnostic
//! lines.

use crate::adc::Adc;
use crate::clock::Clock;
use crate::config::BringupConfig;
use crate::error::Error;
use crate::regs::RegisterMap;
use crate::uart::Uart;
use crate::wait::{self, Bounded, Forever, Poll};

pub const GREETING: &str = "hello uart from barebones\n";
pub const COMPLETE: &str = "test complete\n";

/// Runs the bring-up, spinning on every status flag for as long as it
/// takes. Returns the number of bytes written to the UART.
pub fn run<M: RegisterMap>(regs: &mut M, config: &BringupConfig) -> usize {
    wait::never_fails(run_with(regs, config, Forever))
}

/// Bounded variant of [`run`]: every wait gives up after `max_attempts`
/// reads.
pub fn run_within<M: RegisterMap>(
    regs: &mut M,
    config: &BringupConfig,
    max_attempts: u32,
) -> Result<usize, Error> {
    run_with(regs, config, Bounded::new(max_attempts))
}

pub fn run_with<M, P>(regs: &mut M, config: &BringupConfig, poll: P) -> Result<usize, P::Error>
where
    M: RegisterMap,
    P: Poll,
{
    if config.switch_to_hsi {
        Clock::new(&mut *regs).configure_with(poll)?;
    }

    Uart::new(&mut *regs, config.uart).configure();
    Adc::new(&mut *regs, config.adc).configure();

    let mut uart = Uart::new(&mut *regs, config.uart);
    let mut sent = uart.send_buffer_with(GREETING.as_bytes(), poll)?;
    sent += uart.send_buffer_with(COMPLETE.as_bytes(), poll)?;

    Ok(sent)
}
