//! TIMER2 in timer mode.
//!
//! The counter runs by itself from the 16MHz clock divided by the prescaler. The TIMER2
//! interrupt sets the LED when the count reaches CC[0] and clears it at CC[1]; between
//! interrupts the CPU sleeps in the main loop with WFE, SEV, WFE.

#![no_main]
#![no_std]

use defmt_rtt as _;
use panic_probe as _;

use nrf52810_hal as hal;
use hal::pac;

#[rtic::app(device = pac, peripherals = true)]
mod app {
    use super::*;

    use defmt::{info, unwrap};
    use void::ResultVoidExt;

    use timer_toggle_common::configure::start_timer;
    use timer_toggle_common::drive::LowPowerWait;
    use timer_toggle_common::CompareHandler;
    use timer_toggle_firmware::config;
    use timer_toggle_firmware::setup::{self, CortexWake, Timer2};
    use timer_toggle_firmware::LedPin;

    #[shared]
    struct Shared {}

    #[local]
    struct Local {
        timer: Timer2,
        led: LedPin,
        handler: CompareHandler,
        sleep: LowPowerWait<CortexWake>,
    }

    #[init]
    fn init(cx: init::Context) -> (Shared, Local) {
        let led = setup::setup_gpio(cx.device.P0);

        let timer_config = unwrap!(config::timer_mode_config());
        let mut timer = Timer2::new(cx.device.TIMER2);
        start_timer(&mut timer, &timer_config);

        if let (Some(hz), Some(period)) = (timer_config.tick_hz(), timer_config.wrap_period_us()) {
            info!("Ticking at {}Hz, wrapping every {}us, LED duty {} permille", hz, period, timer_config.duty_permille());
        }

        (
            Shared {},
            Local {
                timer,
                led,
                handler: CompareHandler::new(),
                sleep: LowPowerWait::new(CortexWake),
            }
        )
    }

    #[idle(local = [sleep])]
    fn idle(cx: idle::Context) -> ! {
        // Enter System ON sleep until the next interrupt
        cx.local.sleep.run()
    }

    #[task(binds = TIMER2, local = [timer, led, handler])]
    fn on_compare(cx: on_compare::Context) {
        let serviced = cx.local.handler.service(cx.local.timer, cx.local.led).void_unwrap();
        if !serviced.any() {
            defmt::debug!("Spurious TIMER2 interrupt");
        }
    }
}
