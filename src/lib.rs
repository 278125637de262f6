//! This crate drives GPIO pins of Linux boards through the legacy [sysfs GPIO interface](https://www.kernel.org/doc/Documentation/gpio/sysfs.txt).
//!
//! A pin is requested by number. Acquiring it exports the line (`/sys/class/gpio/export`) and keeps its
//! `direction` and `value` files open; releasing it closes both and unexports the line again.
//! In between you can switch the direction and read or drive the level without touching any paths yourself.
//!
//! ```no_run
//! use sysfs_gpio_pin::{InitParam, Sysfs, Value};
//!
//! # fn main() -> Result<(), sysfs_gpio_pin::GpioError> {
//! let sysfs = Sysfs::new();
//! let mut pin = sysfs.acquire(&InitParam { number: 17 })?;
//! pin.direction_output(Value::Low)?;
//! pin.set_value(Value::High)?;
//! assert_eq!(pin.get_value()?, Value::High);
//! pin.release()?;
//! # Ok(()) }
//! ```
//!
//! Acquired pins (`GpioDesc`) implement the relevant [`embedded_hal`](https://crates.io/crates/embedded-hal)
//! digital traits, so they can be handed to drivers written against `embedded_hal`.
//!
//! The descriptor is generic over a [`Backend`]; sysfs is the only backend shipped by this crate.
//!
//! Every operation is a blocking system call with no timeout. Nothing is tracked in-process: the sysfs
//! tree is the only record of which pins are exported.

use thiserror::Error;

mod backend;
mod pin;
pub mod sysfs;

pub use backend::Backend;
pub use pin::{Direction, GpioDesc, InitParam, Value};
pub use sysfs::{Sysfs, SysfsConfig};

/// Cause reported by a backend, e.g. [`sysfs::error::EndpointError`].
pub type BackendError = Box<dyn std::error::Error + Send + Sync>;

/// Main error type for this crate.
///
/// Each variant names the pin and the operation that failed; the source is the backend error, which for
/// sysfs carries the failing system call, the path of the control file and the errno.
#[derive(Error, Debug)]
pub enum GpioError {
    #[error("failed to acquire gpio{0}")]
    Acquire(u32, #[source] BackendError),
    #[error("failed to set direction of gpio{0}")]
    Direction(u32, #[source] BackendError),
    #[error("failed to drive initial value of gpio{0}")]
    InitialValue(u32, #[source] BackendError),
    #[error("failed to set value of gpio{0}")]
    SetValue(u32, #[source] BackendError),
    #[error("failed to get value of gpio{0}")]
    GetValue(u32, #[source] BackendError),
    #[error("failed to release gpio{0}")]
    Release(u32, #[source] BackendError),
}

impl GpioError {
    /// Number of the pin the failed operation was issued on.
    pub fn pin(&self) -> u32 {
        use GpioError::*;
        match self {
            Acquire(pin, _)
            | Direction(pin, _)
            | InitialValue(pin, _)
            | SetValue(pin, _)
            | GetValue(pin, _)
            | Release(pin, _) => *pin,
        }
    }
}

pub type GpioResult<T> = Result<T, GpioError>;
