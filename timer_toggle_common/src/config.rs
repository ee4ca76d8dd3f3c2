#[cfg(feature = "defmt")]
use defmt::Format;

use crate::error::ConfigError;

/// TIMER base clock on nRF52 (HFCLK), before the prescaler.
pub const BASE_CLOCK_HZ: u32 = 16_000_000;

/// How the counter advances.
#[cfg_attr(feature = "defmt", derive(Format))]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Only advances on TASKS_COUNT.
    Counter,
    /// Advances on every prescaled tick of the base clock.
    Timer,
}

#[cfg_attr(feature = "defmt", derive(Format))]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BitWidth {
    Bits08,
    Bits16,
    Bits24,
    Bits32,
}

impl BitWidth {
    pub const fn bits(self) -> u32 {
        match self {
            BitWidth::Bits08 => 8,
            BitWidth::Bits16 => 16,
            BitWidth::Bits24 => 24,
            BitWidth::Bits32 => 32,
        }
    }

    /// Count at which the counter wraps back to zero.
    pub const fn modulus(self) -> u64 {
        1u64 << self.bits()
    }

    /// Largest value the counter (and a compare register) can hold.
    pub const fn max_value(self) -> u32 {
        (self.modulus() - 1) as u32
    }
}

/// Prescaler exponent: timer mode ticks at `BASE_CLOCK_HZ / 2^n`.
#[cfg_attr(feature = "defmt", derive(Format))]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Prescaler(u8);

impl Prescaler {
    pub const MAX: u8 = 9;

    pub fn new(exponent: u8) -> Result<Self, ConfigError> {
        if exponent > Self::MAX {
            return Err(ConfigError::PrescalerOutOfRange(exponent));
        }
        Ok(Self(exponent))
    }

    pub const fn exponent(self) -> u8 {
        self.0
    }

    pub const fn divisor(self) -> u32 {
        1 << self.0
    }
}

#[cfg_attr(feature = "defmt", derive(Format))]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CompareChannel {
    Cc0,
    Cc1,
}

impl CompareChannel {
    /// Service order of the interrupt handler. CC\[1\] comes last, so it wins a tie.
    pub const ALL: [CompareChannel; 2] = [CompareChannel::Cc0, CompareChannel::Cc1];

    pub const fn index(self) -> usize {
        match self {
            CompareChannel::Cc0 => 0,
            CompareChannel::Cc1 => 1,
        }
    }

    /// LED level applied when this channel matches.
    pub const fn level(self) -> LineLevel {
        match self {
            CompareChannel::Cc0 => LineLevel::Asserted,
            CompareChannel::Cc1 => LineLevel::Deasserted,
        }
    }
}

#[cfg_attr(feature = "defmt", derive(Format))]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LineLevel {
    Asserted,
    Deasserted,
}

impl LineLevel {
    pub const fn is_asserted(self) -> bool {
        matches!(self, LineLevel::Asserted)
    }
}

/// Compare register values. CC\[0\] asserts the LED, CC\[1\] deasserts it.
#[cfg_attr(feature = "defmt", derive(Format))]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Thresholds {
    pub cc0: u32,
    pub cc1: u32,
}

impl Thresholds {
    pub const fn new(cc0: u32, cc1: u32) -> Self {
        Self { cc0, cc1 }
    }

    pub const fn get(&self, channel: CompareChannel) -> u32 {
        match channel {
            CompareChannel::Cc0 => self.cc0,
            CompareChannel::Cc1 => self.cc1,
        }
    }
}

/// A validated TIMER setup. Every value in here fits the register it is written to.
#[cfg_attr(feature = "defmt", derive(Format))]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct TimerConfig {
    mode: Mode,
    bit_width: BitWidth,
    /// `Some` exactly when `mode` is [`Mode::Timer`].
    prescaler: Option<Prescaler>,
    thresholds: Thresholds,
}

impl TimerConfig {
    pub fn new(
        mode: Mode,
        bit_width: BitWidth,
        prescaler: Option<u8>,
        thresholds: Thresholds,
    ) -> Result<Self, ConfigError> {
        let prescaler = match (mode, prescaler) {
            (Mode::Counter, Some(_)) => return Err(ConfigError::PrescalerInCounterMode),
            (Mode::Counter, None) => None,
            (Mode::Timer, exponent) => Some(Prescaler::new(exponent.unwrap_or(0))?),
        };

        for channel in CompareChannel::ALL {
            let value = thresholds.get(channel);
            if value > bit_width.max_value() {
                return Err(ConfigError::ThresholdOutOfRange {
                    channel,
                    value,
                    max: bit_width.max_value(),
                });
            }
        }

        Ok(Self { mode, bit_width, prescaler, thresholds })
    }

    /// Externally clocked: the counter moves only when TASKS_COUNT is triggered.
    pub fn counter(bit_width: BitWidth, thresholds: Thresholds) -> Result<Self, ConfigError> {
        Self::new(Mode::Counter, bit_width, None, thresholds)
    }

    /// Free running from the prescaled base clock.
    pub fn timer(bit_width: BitWidth, prescaler: u8, thresholds: Thresholds) -> Result<Self, ConfigError> {
        Self::new(Mode::Timer, bit_width, Some(prescaler), thresholds)
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn bit_width(&self) -> BitWidth {
        self.bit_width
    }

    pub fn prescaler(&self) -> Option<Prescaler> {
        self.prescaler
    }

    pub fn thresholds(&self) -> Thresholds {
        self.thresholds
    }

    /// Counter increments per second in timer mode. `None` in counter mode, where the rate is
    /// whatever the driving loop makes it.
    pub fn tick_hz(&self) -> Option<u32> {
        self.prescaler.map(|p| BASE_CLOCK_HZ / p.divisor())
    }

    pub fn wrap_ticks(&self) -> u64 {
        self.bit_width.modulus()
    }

    /// Length of one full counter cycle in timer mode.
    pub fn wrap_period_us(&self) -> Option<u64> {
        self.tick_hz().map(|hz| self.wrap_ticks() * 1_000_000 / hz as u64)
    }

    /// Ticks per counter cycle during which the LED is asserted, i.e. from CC\[0\] forward to
    /// CC\[1\], wrapping if needed. Equal thresholds fire together and CC\[1\] wins, so the LED
    /// never lights.
    pub fn asserted_ticks(&self) -> u64 {
        let modulus = self.wrap_ticks();
        let cc0 = self.thresholds.cc0 as u64;
        let cc1 = self.thresholds.cc1 as u64;
        (cc1 + modulus - cc0) % modulus
    }

    /// LED duty cycle in tenths of a percent.
    pub fn duty_permille(&self) -> u32 {
        (self.asserted_ticks() * 1000 / self.wrap_ticks()) as u32
    }
}
