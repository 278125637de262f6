use std::path::{Path, PathBuf};

/// Settings of the sysfs backend.
///
/// The default targets the kernel's `/sys/class/gpio` directory and keeps the inherited behaviour
/// of leaving a pin exported when opening its control files fails.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SysfsConfig {
    root: PathBuf,
    unexport_on_failure: bool,
}

impl SysfsConfig {
    pub const DEFAULT_ROOT: &'static str = "/sys/class/gpio";

    /// Directory holding the `export`/`unexport` files and the `gpioN` directories.
    pub fn root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    /// Unexport a pin (best effort) when acquiring it fails after the export step succeeded.
    pub fn unexport_on_failure(mut self, enabled: bool) -> Self {
        self.unexport_on_failure = enabled;
        self
    }

    pub fn root_path(&self) -> &Path {
        &self.root
    }

    pub fn unexports_on_failure(&self) -> bool {
        self.unexport_on_failure
    }

    pub(crate) fn export_path(&self) -> PathBuf {
        self.root.join("export")
    }

    pub(crate) fn unexport_path(&self) -> PathBuf {
        self.root.join("unexport")
    }

    pub(crate) fn direction_path(&self, number: u32) -> PathBuf {
        self.line_dir(number).join("direction")
    }

    pub(crate) fn value_path(&self, number: u32) -> PathBuf {
        self.line_dir(number).join("value")
    }

    fn line_dir(&self, number: u32) -> PathBuf {
        self.root.join(format!("gpio{}", number))
    }
}

impl Default for SysfsConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from(Self::DEFAULT_ROOT),
            unexport_on_failure: false,
        }
    }
}
