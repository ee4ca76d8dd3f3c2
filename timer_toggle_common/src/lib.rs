#![cfg_attr(not(test), no_std)]

//! Shared logic for the TIMER compare-match LED programs.
//!
//! The firmware binaries bind these pieces to the nRF52810 `TIMER2` peripheral:
//!
//!  - [`configure::start_timer`] programs mode, prescaler, bit width and both compare
//!    registers, enables the compare interrupts and starts the timer
//!  - [`handler::CompareHandler`] acknowledges compare events from the interrupt and drives
//!    the LED: CC\[0\] sets it, CC\[1\] clears it
//!  - [`drive::ManualAdvance`] and [`drive::LowPowerWait`] are the two main loops, one for
//!    counter mode and one for timer mode
//!
//! Everything touching hardware goes through the traits in [`hw`], so the whole pattern can
//! run against the models in `sim` on a host.

#[cfg(all(feature = "sim", not(test)))]
extern crate std;

pub mod config;
pub mod configure;
pub mod drive;
pub mod error;
pub mod handler;
pub mod hw;

#[cfg(any(test, feature = "sim"))]
pub mod sim;

pub use config::{BitWidth, CompareChannel, LineLevel, Mode, Prescaler, Thresholds, TimerConfig};
pub use error::ConfigError;
pub use handler::{CompareHandler, Serviced};
