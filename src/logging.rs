//! Logger setup: stdout plus an append-only log file
use std::{
    fs::{File, OpenOptions},
    io::{self, Write},
    path::Path,
};

use env_logger::{Builder, Target, WriteStyle};
use log::LevelFilter;

use crate::errors::GitMoverError;

/// Default log file, relative to the working directory
pub const DEFAULT_LOG_FILE: &str = "migration.log";

/// Writes every record to stdout and to the log file
struct TeeWriter {
    /// Log file, absent if it couldn't be opened
    file: Option<File>,
}

impl Write for TeeWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        io::stdout().write_all(buf)?;
        if let Some(file) = &mut self.file {
            file.write_all(buf)?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stdout().flush()?;
        if let Some(file) = &mut self.file {
            file.flush()?;
        }
        Ok(())
    }
}

/// Level for a `-v` count
pub(crate) fn level_for(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Open `path` in append mode
fn open_log_file(path: &Path) -> Result<File, GitMoverError> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| {
            GitMoverError::new_with_source(&format!("Unable to open {}", path.display()), e)
        })
}

/// Install the global logger.
///
/// An unwritable log file only leaves stdout; a second call keeps the first logger.
pub fn init_logging(verbose: u8, log_file: &Path) {
    let file = match open_log_file(log_file) {
        Ok(file) => Some(file),
        Err(e) => {
            eprintln!("{e}");
            None
        }
    };
    let _ = Builder::new()
        .filter_level(level_for(verbose))
        .format_target(false)
        .format_timestamp_secs()
        .write_style(WriteStyle::Never)
        .target(Target::Pipe(Box::new(TeeWriter { file })))
        .try_init();
}
