//! Hardware seams.
//!
//! The firmware implements these on the nRF52810 PAC; `sim` implements them on plain structs.
//! The LED is an embedded-hal `OutputPin` and the spin delay an embedded-hal `DelayUs<u32>`,
//! so neither needs a trait of its own.

use crate::config::{BitWidth, CompareChannel, Mode, Prescaler};

/// Register-level access to one TIMER instance.
///
/// Method names follow the peripheral's registers and tasks. None of them can fail.
pub trait CompareTimer {
    /// MODE
    fn set_mode(&mut self, mode: Mode);
    /// PRESCALER
    fn set_prescaler(&mut self, prescaler: Prescaler);
    /// BITMODE
    fn set_bit_width(&mut self, bit_width: BitWidth);
    /// CC\[n\]
    fn set_compare(&mut self, channel: CompareChannel, value: u32);
    /// INTENSET
    fn enable_compare_interrupt(&mut self, channel: CompareChannel);
    /// INTENSET read back
    fn is_compare_interrupt_enabled(&self, channel: CompareChannel) -> bool;
    /// EVENTS_COMPARE\[n\] != 0
    fn is_compare_event(&self, channel: CompareChannel) -> bool;
    /// EVENTS_COMPARE\[n\] = 0
    fn clear_compare_event(&mut self, channel: CompareChannel);
    /// TASKS_CLEAR
    fn clear(&mut self);
    /// TASKS_START
    fn start(&mut self);
    /// Enable delivery of this timer's interrupt in the NVIC.
    fn unmask_interrupt(&mut self);
}

/// TASKS_COUNT: advance a counter-mode timer by one.
pub trait CountTrigger {
    fn trigger_count(&mut self);
}

/// Processor event register, as used by the WFE/SEV instructions.
pub trait WakeSource {
    /// Sleep until an event, or return at once (clearing it) if one is already latched.
    fn wait_for_event(&mut self);
    /// Latch an event.
    fn send_event(&mut self);
}
