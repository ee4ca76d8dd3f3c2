use nrf52810_hal::gpio::{Output, Pin, PushPull};
use timer_toggle_common::{BitWidth, ConfigError, Thresholds, TimerConfig};

/// LED pin: P0_17, push-pull, driven from the TIMER2 interrupt.
pub type LedPin = Pin<Output<PushPull>>;

/// Both programs use a 16 bit counter, so it wraps at 65536.
pub const BIT_WIDTH: BitWidth = BitWidth::Bits16;

/// Counter mode compare values. CC[0] sets the LED, CC[1] clears it.
/// Values are 16 bit. Anything above 65535 will result in a panic on startup.
pub const COUNTER_THRESHOLDS: Thresholds = Thresholds::new(10_000, 5);

/// Time between TASKS_COUNT triggers in the counter mode main loop.
/// At 10us the counter runs at roughly 100kHz, minus loop overhead.
pub const COUNT_PERIOD_US: u32 = 10;

/// Timer mode prescaler exponent: the counter ticks at 16MHz / 2^6 = 250kHz.
/// Higher is slower. 0 gives a 16MHz timer, 9 is the maximum.
pub const TIMER_PRESCALER: u8 = 6;

/// Timer mode compare values. At 250kHz the LED comes on 100ms into each
/// 262ms cycle and goes off 20us after the wrap.
pub const TIMER_THRESHOLDS: Thresholds = Thresholds::new(25_000, 5);

pub fn counter_mode_config() -> Result<TimerConfig, ConfigError> {
    TimerConfig::counter(BIT_WIDTH, COUNTER_THRESHOLDS)
}

pub fn timer_mode_config() -> Result<TimerConfig, ConfigError> {
    TimerConfig::timer(BIT_WIDTH, TIMER_PRESCALER, TIMER_THRESHOLDS)
}
