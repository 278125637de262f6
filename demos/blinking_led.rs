//! A very basic example of a program blinking a LED diode using native library API.
//!
//! This example assumes that GPIO line 17 is connected to diode's anode (+).
//! Make sure to put resistor to reduce current flowing through the diode.
//! Run with `RUST_LOG=debug` to see every sysfs access.

use std::error::Error;
use std::thread::sleep;
use std::time::Duration;
use sysfs_gpio_pin::{InitParam, Sysfs, Value};

const BLINKS: usize = 10;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let sysfs = Sysfs::new();
    let mut led_pin = sysfs.acquire(&InitParam { number: 17 })?;
    let blink_interval = Duration::from_millis(500);

    led_pin.direction_output(Value::Low)?;
    for _ in 0..BLINKS {
        led_pin.set_value(Value::High)?;
        sleep(blink_interval);
        led_pin.set_value(Value::Low)?;
        sleep(blink_interval);
    }

    led_pin.release()?;
    Ok(())
}
