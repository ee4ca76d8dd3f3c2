//! TIMER2 in counter mode.
//!
//! The counter only moves when the main loop triggers TASKS_COUNT, once every 10us. The TIMER2
//! interrupt sets the LED when the count reaches CC[0] and clears it at CC[1]. The counter is 16
//! bit, so it wraps at 65536 and the cycle repeats.

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
    use timer_toggle_common::drive::ManualAdvance;
    use timer_toggle_common::CompareHandler;
    use timer_toggle_firmware::config;
    use timer_toggle_firmware::setup::{self, CountTask, Timer2};
    use timer_toggle_firmware::LedPin;

    #[shared]
    struct Shared {}

    #[local]
    struct Local {
        timer: Timer2,
        led: LedPin,
        handler: CompareHandler,
        advance: ManualAdvance<CountTask, hal::delay::Delay>,
    }

    #[init]
    fn init(cx: init::Context) -> (Shared, Local) {
        let led = setup::setup_gpio(cx.device.P0);

        let timer_config = unwrap!(config::counter_mode_config());
        let mut timer = Timer2::new(cx.device.TIMER2);
        start_timer(&mut timer, &timer_config);

        let delay = hal::delay::Delay::new(cx.core.SYST);
        let advance = ManualAdvance::new(timer.count_task(), delay, config::COUNT_PERIOD_US);
        info!("Counting every {}us, LED duty {} permille", advance.period_us(), timer_config.duty_permille());

        (
            Shared {},
            Local {
                timer,
                led,
                handler: CompareHandler::new(),
                advance,
            }
        )
    }

    #[idle(local = [advance])]
    fn idle(cx: idle::Context) -> ! {
        cx.local.advance.run()
    }

    #[task(binds = TIMER2, local = [timer, led, handler])]
    fn on_compare(cx: on_compare::Context) {
        cx.local.handler.service(cx.local.timer, cx.local.led).void_unwrap();
    }
}
