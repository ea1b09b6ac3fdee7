//! Driver error type shared by every collaborator

/// Errors reported by bus, panel and touch collaborators
///
/// Implementations map their native error types onto these variants so the
/// core can attach the failing step without knowing the chip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DriverError {
    /// Bus transfer failed (NACK, arbitration loss, DMA fault)
    Bus,
    /// Device did not answer within its bounded wait
    Timeout,
    /// Device absent or identified as the wrong chip
    NotFound,
    /// Parameter out of range for this device
    InvalidArgument,
    /// Operation not valid in the current device state
    InvalidState,
    /// Operation not supported by this device
    Unsupported,
}
