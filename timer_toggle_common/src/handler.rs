use embedded_hal::digital::v2::OutputPin;

#[cfg(feature = "defmt")]
use defmt::Format;

use crate::config::{CompareChannel, LineLevel};
use crate::hw::CompareTimer;

/// Which compare events one interrupt acknowledged.
#[cfg_attr(feature = "defmt", derive(Format))]
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct Serviced {
    pub cc0: bool,
    pub cc1: bool,
}

impl Serviced {
    pub const NONE: Serviced = Serviced { cc0: false, cc1: false };

    pub fn any(&self) -> bool {
        self.cc0 || self.cc1
    }

    pub fn contains(&self, channel: CompareChannel) -> bool {
        match channel {
            CompareChannel::Cc0 => self.cc0,
            CompareChannel::Cc1 => self.cc1,
        }
    }

    fn mark(&mut self, channel: CompareChannel) {
        match channel {
            CompareChannel::Cc0 => self.cc0 = true,
            CompareChannel::Cc1 => self.cc1 = true,
        }
    }
}

/// Body of the TIMER interrupt.
///
/// Owned by the interrupt task together with the timer and the LED pin; nothing else writes
/// either of them.
#[derive(Debug, Default)]
pub struct CompareHandler {
    invocations: u32,
    level: Option<LineLevel>,
}

impl CompareHandler {
    pub const fn new() -> Self {
        Self { invocations: 0, level: None }
    }

    /// Acknowledge every pending, enabled compare event and drive the pin.
    ///
    /// Both channels are checked on every call, CC\[0\] first. With both pending the pin ends low.
    /// The event is cleared before the pin is touched so a new match is never lost.
    pub fn service<T, P>(&mut self, timer: &mut T, pin: &mut P) -> Result<Serviced, P::Error>
    where
        T: CompareTimer,
        P: OutputPin,
    {
        self.invocations = self.invocations.wrapping_add(1);
        let mut serviced = Serviced::NONE;

        for channel in CompareChannel::ALL {
            if !(timer.is_compare_event(channel) && timer.is_compare_interrupt_enabled(channel)) {
                continue;
            }
            timer.clear_compare_event(channel);
            serviced.mark(channel);

            let level = channel.level();
            match level {
                LineLevel::Asserted => pin.set_high()?,
                LineLevel::Deasserted => pin.set_low()?,
            }
            self.level = Some(level);

            #[cfg(feature = "defmt")]
            defmt::trace!("{} matched, LED {}", channel, level);
        }

        Ok(serviced)
    }

    /// Number of times [`service`](Self::service) ran, wrapping.
    pub fn invocations(&self) -> u32 {
        self.invocations
    }

    /// Level most recently driven, `None` before the first match.
    pub fn level(&self) -> Option<LineLevel> {
        self.level
    }
}
