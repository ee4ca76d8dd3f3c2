//! Main loops. Neither ever returns.

use embedded_hal::blocking::delay::DelayUs;

use crate::hw::{CountTrigger, WakeSource};

/// Spins between TASKS_COUNT triggers. Needed in counter mode, where nothing else moves the
/// counter.
pub struct ManualAdvance<C, D> {
    trigger: C,
    delay: D,
    period_us: u32,
}

impl<C, D> ManualAdvance<C, D>
where
    C: CountTrigger,
    D: DelayUs<u32>,
{
    pub fn new(trigger: C, delay: D, period_us: u32) -> Self {
        Self { trigger, delay, period_us }
    }

    /// Count one, then busy-wait `period_us`.
    pub fn step(&mut self) {
        self.trigger.trigger_count();
        self.delay.delay_us(self.period_us);
    }

    pub fn run(&mut self) -> ! {
        loop {
            self.step();
        }
    }

    pub fn period_us(&self) -> u32 {
        self.period_us
    }

    pub fn trigger_mut(&mut self) -> &mut C {
        &mut self.trigger
    }

    pub fn delay_mut(&mut self) -> &mut D {
        &mut self.delay
    }
}

/// Sleeps until an interrupt. Only useful when the timer runs on its own clock.
pub struct LowPowerWait<W> {
    wake: W,
}

impl<W: WakeSource> LowPowerWait<W> {
    pub fn new(wake: W) -> Self {
        Self { wake }
    }

    /// WFE, SEV, WFE.
    ///
    /// The first WFE sleeps, or falls straight through on an event latched earlier. SEV then
    /// WFE leaves the event register clear, so the next iteration really sleeps and an event
    /// that arrived before the first WFE cannot keep the core parked past it.
    pub fn step(&mut self) {
        self.wake.wait_for_event();
        self.wake.send_event();
        self.wake.wait_for_event();
    }

    pub fn run(&mut self) -> ! {
        loop {
            self.step();
        }
    }

    pub fn wake_mut(&mut self) -> &mut W {
        &mut self.wake
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BitWidth, CompareChannel, LineLevel, Thresholds, TimerConfig};
    use crate::configure::start_timer;
    use crate::handler::CompareHandler;
    use crate::hw::CompareTimer;
    use crate::sim::{SimClock, SimPin, SimTimer, SimWake, WakeOp};

    #[test]
    fn manual_advance_counts_once_per_period() {
        let mut timer = SimTimer::new();
        start_timer(
            &mut timer,
            &TimerConfig::counter(BitWidth::Bits16, Thresholds::new(10_000, 5)).unwrap(),
        );
        let mut advance = ManualAdvance::new(timer, SimClock::new(), 10);

        const DURATION_US: u64 = 1_000;
        while advance.delay_mut().now_us() < DURATION_US {
            advance.step();
        }

        assert_eq!(advance.trigger_mut().count(), 100);
        assert_eq!(advance.delay_mut().calls(), 100);
    }

    #[test]
    fn manual_advance_never_undercounts() {
        for period_us in [1u32, 3, 7, 10, 33] {
            let mut advance = ManualAdvance::new(SimTimer::counting(), SimClock::new(), period_us);
            const DURATION_US: u64 = 10_000;
            while advance.delay_mut().now_us() < DURATION_US {
                advance.step();
            }
            let expected = DURATION_US / period_us as u64;
            let triggers = advance.trigger_mut().count() as u64;
            assert!(triggers >= expected && triggers <= expected + 1, "{period_us}us: {triggers}");
        }
    }

    #[test]
    fn manual_advance_triggers_before_waiting() {
        let mut advance = ManualAdvance::new(SimTimer::counting(), SimClock::new(), 10);
        advance.step();
        assert_eq!(advance.trigger_mut().count(), 1);
        assert_eq!(advance.delay_mut().now_us(), 10);
    }

    #[test]
    fn manual_advance_drives_the_led() {
        let mut timer = SimTimer::new();
        start_timer(
            &mut timer,
            &TimerConfig::counter(BitWidth::Bits16, Thresholds::new(10_000, 5)).unwrap(),
        );
        let mut advance = ManualAdvance::new(timer, SimClock::new(), 10);
        let mut pin = SimPin::new();
        let mut handler = CompareHandler::new();

        for _ in 0..10_000 {
            advance.step();
            if advance.trigger_mut().irq_pending() {
                handler.service(advance.trigger_mut(), &mut pin).unwrap();
            }
            if advance.trigger_mut().count() == 5 {
                assert_eq!(handler.level(), Some(LineLevel::Deasserted));
            }
        }

        assert_eq!(handler.level(), Some(LineLevel::Asserted));
        assert_eq!(advance.delay_mut().now_us(), 100_000);
    }

    #[test]
    fn low_power_wait_sequence() {
        let mut idle = LowPowerWait::new(SimWake::new());
        idle.wake_mut().notify(1);
        idle.step();
        assert_eq!(idle.wake_mut().ops(), &[WakeOp::Wait, WakeOp::Send, WakeOp::Wait]);
    }

    #[test]
    fn low_power_wait_runs_once_per_notification() {
        let mut idle = LowPowerWait::new(SimWake::new());
        idle.wake_mut().notify(3);

        for iteration in 1..=3 {
            idle.step();
            assert_eq!(idle.wake_mut().wakes(), iteration);
            assert_eq!(idle.wake_mut().parks(), 0);
            assert!(!idle.wake_mut().event_latched());
        }

        idle.step();
        assert_eq!(idle.wake_mut().wakes(), 3);
        assert_eq!(idle.wake_mut().parks(), 1);
    }

    #[test]
    fn stale_event_is_drained_in_one_pass() {
        let mut wake = SimWake::new();
        wake.send_event();
        let mut idle = LowPowerWait::new(wake);

        idle.step();
        assert!(!idle.wake_mut().event_latched());
        assert_eq!(idle.wake_mut().parks(), 0);

        idle.step();
        assert_eq!(idle.wake_mut().parks(), 1);
    }

    #[test]
    fn timer_mode_interrupts_wake_the_loop() {
        let config = TimerConfig::timer(BitWidth::Bits16, 6, Thresholds::new(25_000, 5)).unwrap();
        let divisor = config.prescaler().unwrap().divisor() as u64;
        let mut timer = SimTimer::new();
        start_timer(&mut timer, &config);
        let mut idle = LowPowerWait::new(SimWake::new());
        let mut pin = SimPin::new();
        let mut handler = CompareHandler::new();

        // One full wrap: CC[1] at 5, CC[0] at 25000.
        for _ in 0..65_536u32 {
            timer.advance_base_clock(divisor);
            if timer.irq_pending() {
                handler.service(&mut timer, &mut pin).unwrap();
                idle.wake_mut().notify(1);
                idle.step();
            }
        }

        assert_eq!(idle.wake_mut().wakes(), 2);
        assert_eq!(idle.wake_mut().parks(), 0);
        assert_eq!(handler.invocations(), 2);
        assert_eq!(pin.writes(), &[false, true]);
        assert!(!timer.is_compare_event(CompareChannel::Cc0));
    }
}
