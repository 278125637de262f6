use crate::backend::Backend;
use crate::pin::{Direction, GpioDesc, InitParam, Value};
use crate::GpioResult;

mod config;
mod endpoint;
pub mod error;

pub use config::SysfsConfig;
use endpoint::Endpoint;
use error::{EndpointError, EndpointResult};

/// GPIO backend driving lines through the legacy sysfs interface.
///
/// Exporting a line makes the kernel create `gpioN/direction` and `gpioN/value` under the
/// configured root; an acquired [`GpioDesc`] keeps both files open until it is released.
///
/// Every operation is a plain blocking system call. There is no timeout: a sysfs attribute that
/// never completes a read or write blocks the caller indefinitely.
#[derive(Debug, Default)]
pub struct Sysfs {
    config: SysfsConfig,
}

/// Line state of the sysfs backend: the two persistent control files of an exported pin.
#[derive(Debug)]
pub struct SysfsLine {
    direction: Endpoint,
    value: Endpoint,
}

impl Sysfs {
    const DIRECTION_IN: &'static [u8] = b"in\0";
    const DIRECTION_OUT: &'static [u8] = b"out\0";
    const VALUE_LOW: &'static [u8] = b"0\0";
    const VALUE_HIGH: &'static [u8] = b"1\0";

    /// Backend for the kernel's `/sys/class/gpio` tree.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: SysfsConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SysfsConfig {
        &self.config
    }

    /// Exports a pin and opens its direction and value files.
    ///
    /// Fails if the pin is already exported, including by this process.
    pub fn acquire(&self, param: &InitParam) -> GpioResult<GpioDesc<'_, Self>> {
        GpioDesc::acquire(self, param)
    }

    /// Like `acquire`, but a pin that can't be acquired is reported as absent.
    pub fn acquire_optional(&self, param: &InitParam) -> Option<GpioDesc<'_, Self>> {
        GpioDesc::acquire_optional(self, param)
    }

    fn export(&self, number: u32) -> EndpointResult<()> {
        let export = Endpoint::open_write(self.config.export_path())?;
        export.write(number.to_string().as_bytes())?;
        export.close()?;
        log::debug!("exported gpio{}", number);
        Ok(())
    }

    fn unexport(&self, number: u32) -> EndpointResult<()> {
        let unexport = Endpoint::open_write(self.config.unexport_path())?;
        unexport.write(number.to_string().as_bytes())?;
        unexport.close()?;
        log::debug!("unexported gpio{}", number);
        Ok(())
    }

    fn open_line(&self, number: u32) -> EndpointResult<SysfsLine> {
        let direction = Endpoint::open_write(self.config.direction_path(number))?;
        // sysfs accepts writes to `value` for outputs only, but reads need the same descriptor.
        let value = Endpoint::open_read_write(self.config.value_path(number))?;
        Ok(SysfsLine { direction, value })
    }
}

/// Decodes the first byte of a `value` attribute: `'0'` is low, anything else is high.
pub(crate) fn decode_value(byte: u8) -> Value {
    if byte == b'0' {
        Value::Low
    } else {
        Value::High
    }
}

impl Backend for Sysfs {
    type Line = SysfsLine;
    type Error = EndpointError;

    fn request_line(&self, number: u32) -> EndpointResult<SysfsLine> {
        self.export(number)?;

        self.open_line(number).map_err(|err| {
            if self.config.unexports_on_failure() {
                if let Err(unexport_err) = self.unexport(number) {
                    log::warn!("gpio{} left exported: {}", number, unexport_err);
                }
            }
            err
        })
    }

    fn write_direction(&self, line: &mut SysfsLine, direction: Direction) -> EndpointResult<()> {
        let payload = match direction {
            Direction::Input => Self::DIRECTION_IN,
            Direction::Output(_) => Self::DIRECTION_OUT,
        };
        line.direction.write_at_start(payload)
    }

    fn write_value(&self, line: &mut SysfsLine, value: Value) -> EndpointResult<()> {
        let payload = match value {
            Value::Low => Self::VALUE_LOW,
            Value::High => Self::VALUE_HIGH,
        };
        line.value.write_at_start(payload)
    }

    fn read_value(&self, line: &SysfsLine) -> EndpointResult<Value> {
        line.value.read_first_byte().map(decode_value)
    }

    fn free_line(&self, number: u32, line: SysfsLine) -> EndpointResult<()> {
        let SysfsLine { direction, value } = line;

        value.close()?;
        direction.close()?;
        self.unexport(number)
    }
}
