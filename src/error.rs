//! Error definitions shared across library modules.
use thiserror_no_std::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Failures surfaced by the transmit path. None of them is fatal: the bus
/// is left in a consistent receive-capable state and the caller decides
/// whether to retry.
pub enum WriteError {
    /// The message is empty or longer than the 16-byte frame capacity.
    #[error("Message length must be between 1 and 16 bytes")]
    InvalidArgument,
    /// The bus never reached the idle condition within the 1-second budget;
    /// the bus was left untouched.
    #[error("Bus never went idle within the wait budget")]
    Timeout,
    /// Bit-level arbitration was lost to another node during the ID byte;
    /// the remainder of the message was discarded and the bus relinquished
    /// to the winner.
    #[error("Bus arbitration lost to another node")]
    Collision,
}
