use nix::errno::Errno;
use nix::fcntl::{open, OFlag};
use nix::sys::stat::Mode;
use nix::sys::uio::{pread, pwrite};
use nix::unistd::{close, write};
use std::os::unix::io::RawFd;
use std::path::PathBuf;

use super::error::{EndpointError, EndpointResult, Operation};

/// Open file descriptor on one sysfs control file.
///
/// The descriptor is closed when the endpoint is dropped, so an early return while acquiring a pin
/// releases exactly the endpoints opened so far, newest first. Use `close` where the outcome
/// of closing has to be observed.
#[derive(Debug)]
pub(crate) struct Endpoint {
    fd: RawFd,
    path: PathBuf,
}

impl Endpoint {
    pub fn open_write(path: PathBuf) -> EndpointResult<Self> {
        Self::open(path, OFlag::O_WRONLY)
    }

    pub fn open_read_write(path: PathBuf) -> EndpointResult<Self> {
        Self::open(path, OFlag::O_RDWR)
    }

    fn open(path: PathBuf, access: OFlag) -> EndpointResult<Self> {
        let mut open_flags = OFlag::empty();
        open_flags.insert(access);
        open_flags.insert(OFlag::O_CLOEXEC);

        let fd = open(path.as_path(), open_flags, Mode::empty())
            .map_err(|err| EndpointError::new(Operation::Open, &path, err))?;
        log::debug!("opened {}", path.display());

        Ok(Self { fd, path })
    }

    /// Writes `payload` at the current file position.
    pub fn write(&self, payload: &[u8]) -> EndpointResult<()> {
        write(self.fd, payload)
            .map(drop)
            .map_err(|err| EndpointError::new(Operation::Write, &self.path, err))
    }

    /// Writes `payload` at the start of the attribute.
    pub fn write_at_start(&self, payload: &[u8]) -> EndpointResult<()> {
        pwrite(self.fd, payload, 0)
            .map(drop)
            .map_err(|err| EndpointError::new(Operation::Write, &self.path, err))
    }

    /// Reads the first byte of the attribute.
    pub fn read_first_byte(&self) -> EndpointResult<u8> {
        let mut data = [0u8; 1];
        match pread(self.fd, &mut data, 0) {
            Ok(0) => Err(EndpointError::new(
                Operation::Read,
                &self.path,
                Errno::ENODATA,
            )),
            Ok(_) => Ok(data[0]),
            Err(err) => Err(EndpointError::new(Operation::Read, &self.path, err)),
        }
    }

    /// Closes the descriptor, reporting a failed `close(2)`.
    ///
    /// The descriptor is gone afterwards either way; Linux never leaves it open after a failed close.
    pub fn close(mut self) -> EndpointResult<()> {
        let fd = self.fd;
        let path = std::mem::take(&mut self.path);
        std::mem::forget(self);

        close(fd).map_err(|err| EndpointError::new(Operation::Close, &path, err))?;
        log::debug!("closed {}", path.display());
        Ok(())
    }
}

impl Drop for Endpoint {
    fn drop(&mut self) {
        if let Err(err) = close(self.fd) {
            log::warn!("can't close {}: {}", self.path.display(), err);
        }
    }
}
