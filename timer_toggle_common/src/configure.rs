use crate::config::{CompareChannel, Mode, TimerConfig};
use crate::hw::CompareTimer;

/// Configure the timer and start it.
///
/// Sets the following, in this order:
///  - MODE from the config
///  - TASKS_CLEAR, so counting starts from zero
///  - PRESCALER, timer mode only
///  - BITMODE
///  - CC\[0\] and CC\[1\]
///  - INTENSET for both compare events, then unmask the interrupt in the NVIC
///  - TASKS_START
///
/// Call once, before the compare interrupt can fire.
pub fn start_timer<T: CompareTimer>(timer: &mut T, config: &TimerConfig) {
    timer.set_mode(config.mode());
    timer.clear();
    if let (Mode::Timer, Some(prescaler)) = (config.mode(), config.prescaler()) {
        timer.set_prescaler(prescaler);
    }
    timer.set_bit_width(config.bit_width());

    let thresholds = config.thresholds();
    for channel in CompareChannel::ALL {
        timer.set_compare(channel, thresholds.get(channel));
    }

    for channel in CompareChannel::ALL {
        timer.enable_compare_interrupt(channel);
    }
    timer.unmask_interrupt();

    timer.start();

    #[cfg(feature = "defmt")]
    defmt::info!(
        "Timer started: {} mode, {} bit, CC0 = {}, CC1 = {}",
        config.mode(),
        config.bit_width().bits(),
        thresholds.cc0,
        thresholds.cc1
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BitWidth, Thresholds};
    use crate::sim::{SimTimer, TimerOp};

    #[test]
    fn counter_mode_register_sequence() {
        let config = TimerConfig::counter(BitWidth::Bits16, Thresholds::new(10_000, 5)).unwrap();
        let mut timer = SimTimer::new();
        start_timer(&mut timer, &config);

        assert_eq!(
            timer.ops(),
            &[
                TimerOp::Mode(Mode::Counter),
                TimerOp::Clear,
                TimerOp::BitWidth(BitWidth::Bits16),
                TimerOp::Compare(CompareChannel::Cc0, 10_000),
                TimerOp::Compare(CompareChannel::Cc1, 5),
                TimerOp::EnableInterrupt(CompareChannel::Cc0),
                TimerOp::EnableInterrupt(CompareChannel::Cc1),
                TimerOp::Unmask,
                TimerOp::Start,
            ]
        );
        assert!(timer.is_running());
        assert_eq!(timer.count(), 0);
    }

    #[test]
    fn timer_mode_writes_prescaler() {
        let config = TimerConfig::timer(BitWidth::Bits16, 6, Thresholds::new(25_000, 5)).unwrap();
        let mut timer = SimTimer::new();
        start_timer(&mut timer, &config);

        assert_eq!(timer.prescaler_exponent(), 6);
        assert_eq!(timer.ops()[2], TimerOp::Prescaler(6));
        assert_eq!(timer.ops().last(), Some(&TimerOp::Start));
        for channel in CompareChannel::ALL {
            assert!(timer.is_compare_interrupt_enabled(channel));
        }
        assert!(timer.is_unmasked());
    }

    #[test]
    fn clear_resets_a_dirty_counter() {
        let config = TimerConfig::counter(BitWidth::Bits16, Thresholds::new(10_000, 5)).unwrap();
        let mut timer = SimTimer::new();
        timer.preload(1234);
        start_timer(&mut timer, &config);
        assert_eq!(timer.count(), 0);
    }
}
