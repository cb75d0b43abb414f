use core::fmt;

use crate::regs::Register;

/// Failures reported by the bounded bring-up variants.
///
/// The blocking variants never produce one; they spin instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// A status flag did not reach its expected value in time.
    Timeout { register: Register, attempts: u32 },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Timeout { register, attempts } => {
                write!(f, "timed out polling {} after {} reads", register, attempts)
            }
        }
    }
}
