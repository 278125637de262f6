use crate::pin::{Direction, Value};

/// Capability interface of a GPIO backend.
///
/// A backend turns a line number into backend-private line state (`Line`) and performs the
/// elementary operations on it. Composite behaviour (driving the initial value of an output,
/// treating an optional pin as absent) lives in [`GpioDesc`](crate::GpioDesc), which is generic
/// over the backend, so every backend gets the same lifecycle and error reporting.
///
/// All operations are blocking; a backend keeps no registry of the lines it handed out.
pub trait Backend {
    /// Per-line resources owned by an acquired descriptor.
    type Line;
    type Error: std::error::Error + Send + Sync + 'static;

    /// Makes the line usable and opens everything later operations need.
    ///
    /// On failure, every resource opened by this call is released before returning.
    fn request_line(&self, number: u32) -> Result<Self::Line, Self::Error>;

    /// Configures the direction only; an output's initial level is written separately.
    fn write_direction(
        &self,
        line: &mut Self::Line,
        direction: Direction,
    ) -> Result<(), Self::Error>;

    fn write_value(&self, line: &mut Self::Line, value: Value) -> Result<(), Self::Error>;

    fn read_value(&self, line: &Self::Line) -> Result<Value, Self::Error>;

    /// Frees the line's resources and hands the line back to the system.
    ///
    /// The first failing step aborts the remaining ones.
    fn free_line(&self, number: u32, line: Self::Line) -> Result<(), Self::Error>;
}
