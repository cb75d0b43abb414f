//! Busy-polling on status flags.
//!
//! [`Forever`] keeps the classic bring-up contract: spin until the hardware
//! answers, however long that takes. [`Bounded`] gives up after a number of
//! reads and reports [`Error::Timeout`].

use core::convert::Infallible;

use crate::error::Error;
use crate::regs::{Field, RegisterMap};

/// Decides whether a poll loop may keep spinning.
pub trait Poll: Copy {
    type Error;

    /// Called after the `attempts`-th read of `field` that did not match.
    fn check(&self, attempts: u32, field: Field) -> Result<(), Self::Error>;
}

/// Blocks indefinitely. Cannot fail.
#[derive(Debug, Clone, Copy, Default)]
pub struct Forever;

impl Poll for Forever {
    type Error = Infallible;

    fn check(&self, _attempts: u32, _field: Field) -> Result<(), Infallible> {
        Ok(())
    }
}

/// Gives up after `max_attempts` unmatched reads. At least one read is
/// always made.
#[derive(Debug, Clone, Copy)]
pub struct Bounded {
    max_attempts: u32,
}

impl Bounded {
    pub const fn new(max_attempts: u32) -> Self {
        Self { max_attempts }
    }
}

impl Poll for Bounded {
    type Error = Error;

    fn check(&self, attempts: u32, field: Field) -> Result<(), Error> {
        if attempts >= self.max_attempts {
            Err(Error::Timeout {
                register: field.register,
                attempts,
            })
        } else {
            Ok(())
        }
    }
}

/// Spins until `field` reads `expected`. Returns how many reads missed.
pub fn until<M, P>(regs: &mut M, field: Field, expected: u32, poll: P) -> Result<u32, P::Error>
where
    M: RegisterMap,
    P: Poll,
{
    let mut attempts = 0u32;
    while regs.read_field(field) != expected {
        attempts = attempts.saturating_add(1);
        poll.check(attempts, field)?;
    }
    Ok(attempts)
}

/// Spins until every bit of `field` is set.
pub fn until_set<M, P>(regs: &mut M, field: Field, poll: P) -> Result<u32, P::Error>
where
    M: RegisterMap,
    P: Poll,
{
    until(regs, field, field.max_value(), poll)
}

/// Unwraps the result of a [`Forever`] poll.
pub fn never_fails<T>(result: Result<T, Infallible>) -> T {
    match result {
        Ok(value) => value,
        Err(never) => match never {},
    }
}
