//! Host models of the hardware behind [`crate::hw`].
//!
//! [`SimTimer`] follows the nRF52 TIMER closely enough to replay both programs: a compare
//! event is raised when the counter becomes equal to CC\[n\], it stays set until software clears
//! it, and the interrupt line is high while any enabled event is set.

use std::vec::Vec;

use embedded_hal::blocking::delay::DelayUs;
use embedded_hal::digital::v2::OutputPin;

use crate::config::{BitWidth, CompareChannel, Mode, Prescaler};
use crate::hw::{CompareTimer, CountTrigger, WakeSource};

/// One register write or task, in the order the driver issued them.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TimerOp {
    Mode(Mode),
    Prescaler(u8),
    BitWidth(BitWidth),
    Compare(CompareChannel, u32),
    EnableInterrupt(CompareChannel),
    ClearEvent(CompareChannel),
    Clear,
    Start,
    Unmask,
}

#[derive(Debug)]
pub struct SimTimer {
    mode: Mode,
    prescaler: u8,
    bit_width: BitWidth,
    compare: [u32; 2],
    events: [bool; 2],
    inten: [bool; 2],
    count: u32,
    /// Base clock cycles since the last prescaled tick.
    phase: u64,
    running: bool,
    unmasked: bool,
    ops: Vec<TimerOp>,
}

impl Default for SimTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl SimTimer {
    /// Reset state: timer mode, prescaler 4, 16 bit, stopped.
    pub fn new() -> Self {
        Self {
            mode: Mode::Timer,
            prescaler: 4,
            bit_width: BitWidth::Bits16,
            compare: [0; 2],
            events: [false; 2],
            inten: [false; 2],
            count: 0,
            phase: 0,
            running: false,
            unmasked: false,
            ops: Vec::new(),
        }
    }

    /// Started counter-mode timer with no interrupts, for exercising the driving loop alone.
    pub fn counting() -> Self {
        let mut timer = Self::new();
        timer.set_mode(Mode::Counter);
        timer.set_bit_width(BitWidth::Bits32);
        timer.start();
        timer.ops.clear();
        timer
    }

    pub fn ops(&self) -> &[TimerOp] {
        &self.ops
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_unmasked(&self) -> bool {
        self.unmasked
    }

    pub fn prescaler_exponent(&self) -> u8 {
        self.prescaler
    }

    /// Force the counter to a value without raising events.
    pub fn preload(&mut self, count: u32) {
        self.count = count;
    }

    /// Set a compare event as if the hardware matched.
    pub fn raise_event(&mut self, channel: CompareChannel) {
        self.events[channel.index()] = true;
    }

    /// State of the TIMER interrupt line as the NVIC sees it.
    pub fn irq_pending(&self) -> bool {
        self.unmasked && CompareChannel::ALL.iter().any(|c| self.events[c.index()] && self.inten[c.index()])
    }

    /// TASKS_COUNT. Ignored unless running in counter mode.
    pub fn count_task(&mut self) {
        if self.running && self.mode == Mode::Counter {
            self.increment();
        }
    }

    /// Feed base clock cycles. Ignored unless running in timer mode.
    pub fn advance_base_clock(&mut self, cycles: u64) {
        if !(self.running && self.mode == Mode::Timer) {
            return;
        }
        let divisor = 1u64 << self.prescaler;
        let total = self.phase + cycles;
        self.phase = total % divisor;
        for _ in 0..total / divisor {
            self.increment();
        }
    }

    fn increment(&mut self) {
        self.count = ((self.count as u64 + 1) % self.bit_width.modulus()) as u32;
        for channel in CompareChannel::ALL {
            if self.count == self.compare[channel.index()] {
                self.events[channel.index()] = true;
            }
        }
    }
}

impl CompareTimer for SimTimer {
    fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
        self.ops.push(TimerOp::Mode(mode));
    }

    fn set_prescaler(&mut self, prescaler: Prescaler) {
        self.prescaler = prescaler.exponent();
        self.ops.push(TimerOp::Prescaler(prescaler.exponent()));
    }

    fn set_bit_width(&mut self, bit_width: BitWidth) {
        self.bit_width = bit_width;
        self.ops.push(TimerOp::BitWidth(bit_width));
    }

    fn set_compare(&mut self, channel: CompareChannel, value: u32) {
        self.compare[channel.index()] = value;
        self.ops.push(TimerOp::Compare(channel, value));
    }

    fn enable_compare_interrupt(&mut self, channel: CompareChannel) {
        self.inten[channel.index()] = true;
        self.ops.push(TimerOp::EnableInterrupt(channel));
    }

    fn is_compare_interrupt_enabled(&self, channel: CompareChannel) -> bool {
        self.inten[channel.index()]
    }

    fn is_compare_event(&self, channel: CompareChannel) -> bool {
        self.events[channel.index()]
    }

    fn clear_compare_event(&mut self, channel: CompareChannel) {
        self.events[channel.index()] = false;
        self.ops.push(TimerOp::ClearEvent(channel));
    }

    fn clear(&mut self) {
        self.count = 0;
        self.phase = 0;
        self.ops.push(TimerOp::Clear);
    }

    fn start(&mut self) {
        self.running = true;
        self.ops.push(TimerOp::Start);
    }

    fn unmask_interrupt(&mut self) {
        self.unmasked = true;
        self.ops.push(TimerOp::Unmask);
    }
}

impl CountTrigger for SimTimer {
    fn trigger_count(&mut self) {
        self.count_task();
    }
}

/// Error from a [`SimPin::faulty`] pin.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PinFault;

/// Output pin that records every write. `true` is high.
#[derive(Debug, Default)]
pub struct SimPin {
    writes: Vec<bool>,
    faulty: bool,
}

impl SimPin {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every write fails.
    pub fn faulty() -> Self {
        Self { writes: Vec::new(), faulty: true }
    }

    pub fn writes(&self) -> &[bool] {
        &self.writes
    }

    /// Last written level. An unwritten pin reads low.
    pub fn is_set_high(&self) -> bool {
        self.writes.last().copied().unwrap_or(false)
    }

    fn write(&mut self, high: bool) -> Result<(), PinFault> {
        if self.faulty {
            return Err(PinFault);
        }
        self.writes.push(high);
        Ok(())
    }
}

impl OutputPin for SimPin {
    type Error = PinFault;

    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.write(false)
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.write(true)
    }
}

/// Virtual microsecond clock. Delays return at once and move the clock forward.
#[derive(Debug, Default)]
pub struct SimClock {
    now_us: u64,
    calls: u32,
}

impl SimClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now_us(&self) -> u64 {
        self.now_us
    }

    pub fn calls(&self) -> u32 {
        self.calls
    }
}

impl DelayUs<u32> for SimClock {
    fn delay_us(&mut self, us: u32) {
        self.now_us += us as u64;
        self.calls += 1;
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum WakeOp {
    Wait,
    Send,
}

/// Event register plus a queue of interrupts waiting to wake the core.
///
/// A WFE with neither a latched event nor a queued interrupt would sleep forever; the model
/// counts it as a park and returns.
#[derive(Debug, Default)]
pub struct SimWake {
    latched: bool,
    queued: u32,
    wakes: u32,
    parks: u32,
    ops: Vec<WakeOp>,
}

impl SimWake {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue interrupts.
    pub fn notify(&mut self, interrupts: u32) {
        self.queued += interrupts;
    }

    pub fn event_latched(&self) -> bool {
        self.latched
    }

    /// WFEs ended by an interrupt.
    pub fn wakes(&self) -> u32 {
        self.wakes
    }

    /// WFEs that found nothing to wake them.
    pub fn parks(&self) -> u32 {
        self.parks
    }

    pub fn ops(&self) -> &[WakeOp] {
        &self.ops
    }
}

impl WakeSource for SimWake {
    fn wait_for_event(&mut self) {
        self.ops.push(WakeOp::Wait);
        if self.latched {
            self.latched = false;
        } else if self.queued > 0 {
            self.queued -= 1;
            self.wakes += 1;
        } else {
            self.parks += 1;
        }
    }

    fn send_event(&mut self) {
        self.ops.push(WakeOp::Send);
        self.latched = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counter_wraps_at_bit_width() {
        let mut timer = SimTimer::new();
        timer.set_mode(Mode::Counter);
        timer.set_compare(CompareChannel::Cc0, 0);
        timer.start();
        timer.preload(65_535);

        timer.count_task();

        assert_eq!(timer.count(), 0);
        assert!(timer.is_compare_event(CompareChannel::Cc0));
    }

    #[test]
    fn count_task_ignored_in_timer_mode() {
        let mut timer = SimTimer::new();
        timer.start();
        timer.count_task();
        assert_eq!(timer.count(), 0);

        timer.advance_base_clock(16);
        assert_eq!(timer.count(), 1);
    }

    #[test]
    fn stopped_timer_holds() {
        let mut timer = SimTimer::new();
        timer.set_mode(Mode::Counter);
        timer.count_task();
        timer.advance_base_clock(1_000);
        assert_eq!(timer.count(), 0);
    }

    #[test]
    fn irq_needs_enable_and_unmask() {
        let mut timer = SimTimer::new();
        timer.raise_event(CompareChannel::Cc1);
        assert!(!timer.irq_pending());
        timer.enable_compare_interrupt(CompareChannel::Cc1);
        assert!(!timer.irq_pending());
        timer.unmask_interrupt();
        assert!(timer.irq_pending());
        timer.clear_compare_event(CompareChannel::Cc1);
        assert!(!timer.irq_pending());
    }
}
