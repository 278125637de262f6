use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// System call performed on a sysfs control file.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Operation {
    Open,
    Write,
    Read,
    Close,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use Operation::*;
        f.write_str(match self {
            Open => "open",
            Write => "write to",
            Read => "read from",
            Close => "close",
        })
    }
}

/// Failure of a single system call on a sysfs control file.
///
/// Carries the failing call, the path of the control file and the errno reported by the kernel.
/// An end of file on a read is reported as `ENODATA`.
#[derive(Error, Debug)]
#[error("can't {operation} {}", .path.display())]
pub struct EndpointError {
    operation: Operation,
    path: PathBuf,
    #[source]
    source: nix::Error,
}

impl EndpointError {
    pub(crate) fn new(operation: Operation, path: &Path, source: nix::Error) -> Self {
        log::debug!("can't {} {}: {}", operation, path.display(), source);
        Self {
            operation,
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn operation(&self) -> Operation {
        self.operation
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn errno(&self) -> nix::Error {
        self.source
    }
}

pub(crate) type EndpointResult<T> = Result<T, EndpointError>;
