//! This example demonstrates the usage of embedded_hal trait usage.
//!
//! The main benefit over the blinking_led example is that `blink_led`
//! can be used for _any_ device with embedded-hal digital pins abstraction.
//!
//! This example assumes that GPIO line 17 is connected to diode's anode (+),
//! and treats line 27 as an optional status LED that some boards don't wire up.

use embedded_hal::digital::v2::*;
use std::error::Error;
use std::thread::sleep;
use std::time::Duration;
use sysfs_gpio_pin::{InitParam, Sysfs, Value};

fn blink_led<T: OutputPin<Error = impl Error + 'static>>(
    pin: &mut T,
    times: usize,
) -> Result<(), Box<dyn Error>> {
    let blink_interval = Duration::from_millis(500);

    for _ in 0..times {
        // Every sysfs write can fail, so errors are propagated here.
        pin.set_high()?;
        sleep(blink_interval);
        pin.set_low()?;
        sleep(blink_interval);
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let sysfs = Sysfs::new();
    let mut led_pin = sysfs.acquire(&InitParam { number: 17 })?;
    led_pin.direction_output(Value::Low)?;

    let mut status_pin = sysfs.acquire_optional(&InitParam { number: 27 });
    if let Some(pin) = status_pin.as_mut() {
        pin.direction_output(Value::High)?;
    }

    blink_led(&mut led_pin, 10)?;

    if let Some(pin) = status_pin {
        pin.release()?;
    }
    led_pin.release()?;
    Ok(())
}
