use std::fs;
use std::path::{Path, PathBuf};

use sysfs_gpio_pin::{Sysfs, SysfsConfig};
use tempfile::TempDir;

/// A `/sys/class/gpio` lookalike in a temporary directory.
///
/// Plain files can't react to writes the way the kernel does, so line directories are created up
/// front with `add_line` and unexport requests are applied on demand with `settle`.
pub struct FakeSysfs {
    dir: TempDir,
}

#[allow(dead_code)]
impl FakeSysfs {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("export"), b"").unwrap();
        fs::write(dir.path().join("unexport"), b"").unwrap();
        Self { dir }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn config(&self) -> SysfsConfig {
        SysfsConfig::default().root(self.root())
    }

    pub fn backend(&self) -> Sysfs {
        Sysfs::with_config(self.config())
    }

    /// Creates `gpioN` with empty `direction` and `value` files, as the kernel does on export.
    pub fn add_line(&self, number: u32) {
        let line = self.line_dir(number);
        fs::create_dir(&line).unwrap();
        fs::write(line.join("direction"), b"").unwrap();
        fs::write(line.join("value"), b"").unwrap();
    }

    pub fn line_dir(&self, number: u32) -> PathBuf {
        self.root().join(format!("gpio{}", number))
    }

    pub fn direction(&self, number: u32) -> Vec<u8> {
        fs::read(self.line_dir(number).join("direction")).unwrap()
    }

    pub fn value(&self, number: u32) -> Vec<u8> {
        fs::read(self.line_dir(number).join("value")).unwrap()
    }

    pub fn set_value(&self, number: u32, contents: &[u8]) {
        fs::write(self.line_dir(number).join("value"), contents).unwrap();
    }

    pub fn exported(&self) -> String {
        fs::read_to_string(self.root().join("export")).unwrap()
    }

    pub fn unexported(&self) -> String {
        fs::read_to_string(self.root().join("unexport")).unwrap()
    }

    /// Replaces a control file with a symlink, e.g. to `/dev/full` to make writes fail.
    pub fn redirect(&self, name: &str, target: &str) {
        let path = self.root().join(name);
        fs::remove_file(&path).unwrap();
        std::os::unix::fs::symlink(target, &path).unwrap();
    }

    /// Number of descriptors of this process open on `gpioN/<name>`.
    pub fn open_fds(&self, number: u32, name: &str) -> usize {
        let target = fs::canonicalize(self.line_dir(number).join(name)).unwrap();
        fs::read_dir("/proc/self/fd")
            .unwrap()
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| fs::read_link(entry.path()).ok())
            .filter(|link| *link == target)
            .count()
    }

    /// Removes the line directory of the pin last written to `unexport`.
    pub fn settle(&self) {
        let requested = self.unexported();
        let number: u32 = requested.parse().unwrap();
        if self.line_dir(number).exists() {
            fs::remove_dir_all(self.line_dir(number)).unwrap();
        }
    }
}
