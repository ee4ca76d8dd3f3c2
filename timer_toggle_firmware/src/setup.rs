use cortex_m::asm;
use cortex_m::peripheral::NVIC;

use nrf52810_hal::{gpio, pac};
use gpio::Level;

use timer_toggle_common::hw::{CompareTimer, CountTrigger, WakeSource};
use timer_toggle_common::{BitWidth, CompareChannel, Mode, Prescaler};

use crate::config::LedPin;

/// Owned TIMER2. Only the compare interrupt task holds one of these.
///
/// The higher-level Timer HAL only knows about CC[0], so we must get nasty with the PAC
pub struct Timer2 {
    timer: pac::TIMER2,
}

impl Timer2 {
    pub fn new(timer: pac::TIMER2) -> Self {
        Self { timer }
    }

    /// Handle for the main loop to advance the counter with.
    pub fn count_task(&self) -> CountTask {
        CountTask(())
    }
}

impl CompareTimer for Timer2 {
    fn set_mode(&mut self, mode: Mode) {
        self.timer.mode.write(|w| match mode {
            Mode::Counter => w.mode().counter(),
            Mode::Timer => w.mode().timer(),
        });
    }

    fn set_prescaler(&mut self, prescaler: Prescaler) {
        self.timer.prescaler.write(|w| unsafe { w.prescaler().bits(prescaler.exponent()) });
    }

    fn set_bit_width(&mut self, bit_width: BitWidth) {
        self.timer.bitmode.write(|w| match bit_width {
            BitWidth::Bits08 => w.bitmode()._08bit(),
            BitWidth::Bits16 => w.bitmode()._16bit(),
            BitWidth::Bits24 => w.bitmode()._24bit(),
            BitWidth::Bits32 => w.bitmode()._32bit(),
        });
    }

    fn set_compare(&mut self, channel: CompareChannel, value: u32) {
        self.timer.cc[channel.index()].write(|w| unsafe { w.cc().bits(value) });
    }

    fn enable_compare_interrupt(&mut self, channel: CompareChannel) {
        // INTENSET is write-one-to-set, other bits are left alone
        self.timer.intenset.write(|w| match channel {
            CompareChannel::Cc0 => w.compare0().set(),
            CompareChannel::Cc1 => w.compare1().set(),
        });
    }

    fn is_compare_interrupt_enabled(&self, channel: CompareChannel) -> bool {
        let intenset = self.timer.intenset.read();
        match channel {
            CompareChannel::Cc0 => intenset.compare0().is_enabled(),
            CompareChannel::Cc1 => intenset.compare1().is_enabled(),
        }
    }

    fn is_compare_event(&self, channel: CompareChannel) -> bool {
        self.timer.events_compare[channel.index()].read().bits() != 0
    }

    fn clear_compare_event(&mut self, channel: CompareChannel) {
        self.timer.events_compare[channel.index()].reset();
    }

    fn clear(&mut self) {
        self.timer.tasks_clear.write(|w| w.tasks_clear().set_bit());
    }

    fn start(&mut self) {
        self.timer.tasks_start.write(|w| w.tasks_start().set_bit());
    }

    fn unmask_interrupt(&mut self) {
        unsafe {
            NVIC::unmask(pac::Interrupt::TIMER2);
        }
    }
}

/// Write access to TIMER2's TASKS_COUNT and nothing else.
///
/// TASKS_COUNT is a write-only trigger that the interrupt task never touches, so this can live
/// in `idle` alongside the [`Timer2`] owned by the interrupt without a lock.
pub struct CountTask(());

impl CountTrigger for CountTask {
    fn trigger_count(&mut self) {
        let timer = unsafe { &*pac::TIMER2::ptr() };
        timer.tasks_count.write(|w| w.tasks_count().set_bit());
    }
}

/// WFE / SEV on the Cortex-M4 core.
pub struct CortexWake;

impl WakeSource for CortexWake {
    fn wait_for_event(&mut self) {
        asm::wfe();
    }

    fn send_event(&mut self) {
        asm::sev();
    }
}

/// Configure P0_17 (LED 1 on the nRF52 DK) as a push-pull output, initially low
pub fn setup_gpio(p0: pac::P0) -> LedPin
{
    let p0 = gpio::p0::Parts::new(p0);

    p0.p0_17
        .into_push_pull_output(Level::Low)
        .degrade()
}
