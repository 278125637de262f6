use embedded_hal::digital::v2 as eh;
use std::fmt;

use crate::backend::Backend;
use crate::{GpioError, GpioResult};

/// Logic level of a pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Value {
    High,
    Low,
}

impl From<bool> for Value {
    fn from(high: bool) -> Self {
        if high {
            Value::High
        } else {
            Value::Low
        }
    }
}

/// Direction of a pin. An output carries the level it is driven to right after switching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Input,
    Output(Value),
}

/// Initialization parameters supplied by the caller when requesting a pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InitParam {
    pub number: u32,
}

impl From<u32> for InitParam {
    fn from(number: u32) -> Self {
        Self { number }
    }
}

/// An acquired GPIO pin.
///
/// Holds the pin number and the backend's private line state. A descriptor only exists while
/// the pin is fully acquired; it is given back with [`release`](GpioDesc::release), which
/// consumes it, so a released descriptor can't be used or released again:
///
/// ```compile_fail
/// use sysfs_gpio_pin::{InitParam, Sysfs};
///
/// let sysfs = Sysfs::new();
/// let pin = sysfs.acquire(&InitParam { number: 17 }).unwrap();
/// pin.release().unwrap();
/// pin.release().unwrap();
/// ```
///
/// Dropping a descriptor without releasing it closes the backend's resources but leaves the pin
/// exported.
///
/// A descriptor is meant for a single owner issuing operations one after another; it has no
/// internal locking.
pub struct GpioDesc<'backend, B: Backend> {
    backend: &'backend B,
    number: u32,
    line: B::Line,
}

impl<'backend, B: Backend> GpioDesc<'backend, B> {
    pub fn acquire(backend: &'backend B, param: &InitParam) -> GpioResult<Self> {
        Self::request(backend, param).map_err(reported)
    }

    fn request(backend: &'backend B, param: &InitParam) -> GpioResult<Self> {
        let number = param.number;
        let line = backend
            .request_line(number)
            .map_err(|err| GpioError::Acquire(number, err.into()))?;

        Ok(Self {
            backend,
            number,
            line,
        })
    }

    /// Acquires a pin that a board may not have.
    ///
    /// Any failure is logged and reported as `None`; a returned descriptor is always a pin that
    /// was acquired for real.
    pub fn acquire_optional(backend: &'backend B, param: &InitParam) -> Option<Self> {
        match Self::request(backend, param) {
            Ok(desc) => Some(desc),
            Err(err) => {
                log::warn!(
                    "optional gpio{} not available: {}",
                    param.number,
                    describe(&err)
                );
                None
            }
        }
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    /// Writes the pin direction; for an output, drives the initial value right after.
    ///
    /// The pin briefly sits at whatever level the kernel picks between the two writes. A failed
    /// initial value is reported as `GpioError::InitialValue`, not `GpioError::Direction`.
    pub fn set_direction(&mut self, direction: Direction) -> GpioResult<()> {
        let number = self.number;
        self.backend
            .write_direction(&mut self.line, direction)
            .map_err(|err| reported(GpioError::Direction(number, err.into())))?;

        if let Direction::Output(value) = direction {
            self.backend
                .write_value(&mut self.line, value)
                .map_err(|err| reported(GpioError::InitialValue(number, err.into())))?;
        }

        Ok(())
    }

    pub fn direction_input(&mut self) -> GpioResult<()> {
        self.set_direction(Direction::Input)
    }

    pub fn direction_output(&mut self, value: Value) -> GpioResult<()> {
        self.set_direction(Direction::Output(value))
    }

    /// Drives the pin. The direction is not checked; writing to an input fails if the OS refuses it.
    pub fn set_value(&mut self, value: Value) -> GpioResult<()> {
        let number = self.number;
        self.backend
            .write_value(&mut self.line, value)
            .map_err(|err| reported(GpioError::SetValue(number, err.into())))
    }

    pub fn get_value(&self) -> GpioResult<Value> {
        self.backend
            .read_value(&self.line)
            .map_err(|err| reported(GpioError::GetValue(self.number, err.into())))
    }

    /// Frees the descriptor and hands the pin back to the system.
    ///
    /// Stops at the first failing step; resources not freed by then are dropped without the pin
    /// being unexported.
    pub fn release(self) -> GpioResult<()> {
        let Self {
            backend,
            number,
            line,
        } = self;

        backend
            .free_line(number, line)
            .map_err(|err| reported(GpioError::Release(number, err.into())))
    }
}

fn describe(err: &GpioError) -> String {
    match std::error::Error::source(err) {
        Some(cause) => format!("{}: {}", err, cause),
        None => err.to_string(),
    }
}

/// Logs a failure that is about to be returned to the caller.
fn reported(err: GpioError) -> GpioError {
    log::error!("{}", describe(&err));
    err
}

impl<B: Backend> fmt::Debug for GpioDesc<'_, B> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("GpioDesc")
            .field("number", &self.number)
            .finish_non_exhaustive()
    }
}

impl<B: Backend> eh::OutputPin for GpioDesc<'_, B> {
    type Error = GpioError;

    fn set_low(&mut self) -> Result<(), GpioError> {
        self.set_value(Value::Low)
    }

    fn set_high(&mut self) -> Result<(), GpioError> {
        self.set_value(Value::High)
    }
}

impl<B: Backend> eh::StatefulOutputPin for GpioDesc<'_, B> {
    fn is_set_high(&self) -> Result<bool, GpioError> {
        self.get_value().map(|value| value == Value::High)
    }

    fn is_set_low(&self) -> Result<bool, GpioError> {
        self.is_set_high().map(|v| !v)
    }
}

impl<B: Backend> eh::InputPin for GpioDesc<'_, B> {
    type Error = GpioError;

    fn is_high(&self) -> Result<bool, GpioError> {
        use Value::*;

        Ok(match self.get_value()? {
            High => true,
            Low => false,
        })
    }

    fn is_low(&self) -> Result<bool, GpioError> {
        self.is_high().map(|v| !v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal::digital::v2::{InputPin, OutputPin};
    use std::cell::RefCell;
    use thiserror::Error;

    #[derive(Error, Debug)]
    #[error("mock failure: {0}")]
    struct MockError(&'static str);

    /// Records every call so the descriptor's composition of backend steps can be checked.
    #[derive(Default)]
    struct MockBackend {
        missing: Vec<u32>,
        fail_direction: bool,
        fail_value: bool,
        calls: RefCell<Vec<String>>,
    }

    struct MockLine {
        value: Value,
    }

    impl MockBackend {
        fn calls(&self) -> Vec<String> {
            self.calls.borrow().clone()
        }
    }

    impl Backend for MockBackend {
        type Line = MockLine;
        type Error = MockError;

        fn request_line(&self, number: u32) -> Result<MockLine, MockError> {
            self.calls.borrow_mut().push(format!("acquire {}", number));
            if self.missing.contains(&number) {
                return Err(MockError("no such line"));
            }
            Ok(MockLine { value: Value::Low })
        }

        fn write_direction(&self, _: &mut MockLine, direction: Direction) -> Result<(), MockError> {
            self.calls
                .borrow_mut()
                .push(format!("direction {:?}", direction));
            if self.fail_direction {
                return Err(MockError("direction rejected"));
            }
            Ok(())
        }

        fn write_value(&self, line: &mut MockLine, value: Value) -> Result<(), MockError> {
            self.calls.borrow_mut().push(format!("value {:?}", value));
            if self.fail_value {
                return Err(MockError("value rejected"));
            }
            line.value = value;
            Ok(())
        }

        fn read_value(&self, line: &MockLine) -> Result<Value, MockError> {
            Ok(line.value)
        }

        fn free_line(&self, number: u32, _: MockLine) -> Result<(), MockError> {
            self.calls.borrow_mut().push(format!("release {}", number));
            Ok(())
        }
    }

    #[test]
    fn test_output_direction_drives_initial_value() {
        let backend = MockBackend::default();
        let mut pin = GpioDesc::acquire(&backend, &InitParam { number: 17 }).unwrap();

        pin.direction_output(Value::High).unwrap();
        assert_eq!(pin.get_value().unwrap(), Value::High);
        pin.release().unwrap();

        assert_eq!(
            backend.calls(),
            vec![
                "acquire 17",
                "direction Output(High)",
                "value High",
                "release 17"
            ]
        );
    }

    #[test]
    fn test_input_direction_writes_no_value() {
        let backend = MockBackend::default();
        let mut pin = GpioDesc::acquire(&backend, &InitParam::from(17)).unwrap();

        pin.direction_input().unwrap();
        assert_eq!(backend.calls(), vec!["acquire 17", "direction Input"]);
        pin.release().unwrap();
    }

    #[test]
    fn test_direction_failure_skips_initial_value() {
        let backend = MockBackend {
            fail_direction: true,
            ..Default::default()
        };
        let mut pin = GpioDesc::acquire(&backend, &InitParam::from(17)).unwrap();

        let err = pin.direction_output(Value::High).unwrap_err();
        assert!(matches!(err, GpioError::Direction(17, _)));
        assert!(!backend.calls().iter().any(|call| call.starts_with("value")));
        pin.release().unwrap();
    }

    #[test]
    fn test_initial_value_failure_is_distinguished() {
        let backend = MockBackend {
            fail_value: true,
            ..Default::default()
        };
        let mut pin = GpioDesc::acquire(&backend, &InitParam::from(17)).unwrap();

        let err = pin.direction_output(Value::Low).unwrap_err();
        assert!(matches!(err, GpioError::InitialValue(17, _)));

        let err = pin.set_value(Value::Low).unwrap_err();
        assert!(matches!(err, GpioError::SetValue(17, _)));
        pin.release().unwrap();
    }

    #[test]
    fn test_acquire_failure_reports_pin() {
        let backend = MockBackend {
            missing: vec![5],
            ..Default::default()
        };

        let err = GpioDesc::acquire(&backend, &InitParam::from(5)).unwrap_err();
        assert!(matches!(err, GpioError::Acquire(5, _)));
        assert_eq!(err.to_string(), "failed to acquire gpio5");
    }

    #[test]
    fn test_acquire_optional() {
        let backend = MockBackend {
            missing: vec![5],
            ..Default::default()
        };

        assert!(GpioDesc::acquire_optional(&backend, &InitParam::from(5)).is_none());

        let pin = GpioDesc::acquire_optional(&backend, &InitParam::from(6)).unwrap();
        assert_eq!(pin.number(), 6);
        pin.release().unwrap();
    }

    #[test]
    fn test_embedded_hal_traits() {
        let backend = MockBackend::default();
        let mut pin = GpioDesc::acquire(&backend, &InitParam::from(3)).unwrap();

        pin.set_high().unwrap();
        assert!(pin.is_high().unwrap());
        pin.set_low().unwrap();
        assert!(pin.is_low().unwrap());
        pin.release().unwrap();
    }

    #[test]
    fn test_value_from_bool() {
        assert_eq!(Value::from(true), Value::High);
        assert_eq!(Value::from(false), Value::Low);
    }
}
