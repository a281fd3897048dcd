//! Diagnostic log sink for on-target test harnesses.
//!
//! Bring-up itself never logs through here. A harness that cannot record its
//! results has nothing useful left to do, so [`log_to`] halts on sink failure.

use core::fmt::{self, Write as _};

use heapless::String;

/// Longest line [`log_to`] emits; the rest is dropped.
pub const LINE_CAPACITY: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SinkError {
    /// The sink could not be opened.
    Unavailable,
    /// A write was rejected or cut short.
    Write,
}

pub trait LogSink {
    fn write(&mut self, bytes: &[u8]) -> Result<(), SinkError>;
}

/// Fills a fixed buffer and silently drops what does not fit.
struct Line(String<LINE_CAPACITY>);

impl fmt::Write for Line {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for c in s.chars() {
            if self.0.push(c).is_err() {
                break;
            }
        }
        Ok(())
    }
}

/// Format `args` and write them to `sink` in one call.
///
/// # Panics
///
/// Panics if the sink reports an error.
pub fn log_to<S: LogSink + ?Sized>(sink: &mut S, args: fmt::Arguments<'_>) {
    let mut line = Line(String::new());
    let _ = line.write_fmt(args);
    if let Err(e) = sink.write(line.0.as_bytes()) {
        panic!("diag: log sink failed: {:?}", e);
    }
}

/// `diag_log!(sink, "fmt", args..)` formats like `format_args!` into [`log_to`].
#[macro_export]
macro_rules! diag_log {
    ($sink:expr, $($arg:tt)*) => {
        $crate::diag::log_to($sink, ::core::format_args!($($arg)*))
    };
}

/// File calls on the debug host.
pub trait HostFiles {
    /// Open `path` (NUL-terminated) for appending and return its handle.
    fn open_append(&mut self, path: &str) -> Result<usize, SinkError>;
    fn write(&mut self, handle: usize, bytes: &[u8]) -> Result<(), SinkError>;
    fn close(&mut self, handle: usize);
}

/// Open `path`, append `bytes`, close it again.
///
/// The file is closed even when the write fails, so no handle outlives the call.
pub fn append<H: HostFiles + ?Sized>(host: &mut H, path: &str, bytes: &[u8]) -> Result<(), SinkError> {
    let handle = host.open_append(path)?;
    let written = host.write(handle, bytes);
    host.close(handle);
    written
}

#[cfg(feature = "semihosting")]
pub use semihost::SemihostFile;

#[cfg(feature = "semihosting")]
mod semihost {
    use cortex_m_semihosting::{nr, syscall};

    use super::{append, HostFiles, LogSink, SinkError};

    /// Appends each line to a file on the debug host.
    #[derive(Debug, Default)]
    pub struct SemihostFile;

    impl SemihostFile {
        /// NUL-terminated for the semihosting `SYS_OPEN` call.
        pub const PATH: &'static str = "./test_results/test_log.txt\0";

        pub const fn new() -> Self {
            Self
        }
    }

    impl HostFiles for SemihostFile {
        fn open_append(&mut self, path: &str) -> Result<usize, SinkError> {
            // SYS_OPEN takes the length without the terminator.
            let len = path.len().saturating_sub(1);
            let fd = unsafe { syscall!(OPEN, path.as_ptr(), nr::open::W_APPEND, len) } as isize;
            if fd < 0 {
                return Err(SinkError::Unavailable);
            }
            Ok(fd as usize)
        }

        fn write(&mut self, handle: usize, bytes: &[u8]) -> Result<(), SinkError> {
            // SYS_WRITE returns the number of bytes not written.
            match unsafe { syscall!(WRITE, handle, bytes.as_ptr(), bytes.len()) } {
                0 => Ok(()),
                _ => Err(SinkError::Write),
            }
        }

        fn close(&mut self, handle: usize) {
            unsafe { syscall!(CLOSE, handle) };
        }
    }

    impl LogSink for SemihostFile {
        fn write(&mut self, bytes: &[u8]) -> Result<(), SinkError> {
            append(self, Self::PATH, bytes)
        }
    }
}
