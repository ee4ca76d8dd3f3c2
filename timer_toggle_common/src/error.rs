use thiserror_no_std::Error;

#[cfg(feature = "defmt")]
use defmt::Format;

use crate::config::CompareChannel;

/// Rejected timer configuration. Raised before anything is written to the peripheral.
#[cfg_attr(feature = "defmt", derive(Format))]
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("compare value {value} on {channel:?} does not fit the bit width (max {max})")]
    ThresholdOutOfRange {
        channel: CompareChannel,
        value: u32,
        max: u32,
    },
    #[error("prescaler {0} out of range (0..=9)")]
    PrescalerOutOfRange(u8),
    /// The prescaler only divides the internal clock; counter mode has no use for it.
    #[error("prescaler has no effect in counter mode")]
    PrescalerInCounterMode,
}
