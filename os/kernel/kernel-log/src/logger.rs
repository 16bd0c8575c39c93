use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::fmt::{self, Write as _};
use std::io::{self, Write};
use std::sync::OnceLock;

pub struct KlogLogger {
    max_level: LevelFilter,
}

impl KlogLogger {
    #[must_use]
    pub const fn new(max_level: LevelFilter) -> Self {
        Self { max_level }
    }

    /// Call this once during startup.
    ///
    /// # Errors
    /// Fails if another logger has already been installed.
    pub fn init(self) -> Result<(), SetLoggerError> {
        static LOGGER: OnceLock<KlogLogger> = OnceLock::new();

        let logger = LOGGER.get_or_init(|| self);
        log::set_logger(logger)?;
        log::set_max_level(logger.max_level);
        Ok(())
    }
}

impl Log for KlogLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.max_level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        // Best effort, like a console.
        let mut err = io::stderr().lock();
        let _ = write_record(&mut err, record.level(), record.target(), record.args());
    }

    fn flush(&self) {
        let _ = io::stderr().flush();
    }
}

/// Writes one record as `[LEVEL] target: line`, once per line of the message.
///
/// An empty message still produces one (empty) prefixed line.
///
/// # Errors
/// Propagates write errors of `out`.
pub fn write_record<W: Write>(
    out: &mut W,
    level: Level,
    target: &str,
    args: &fmt::Arguments,
) -> io::Result<()> {
    let mut message = String::new();
    // Formatting into a String only fails if a Display impl fails.
    if message.write_fmt(*args).is_err() {
        return Err(io::Error::other("formatter error"));
    }

    let mut lines = message.lines().peekable();
    if lines.peek().is_none() {
        return writeln!(out, "[{level}] {target}: ");
    }

    for line in lines {
        writeln!(out, "[{level}] {target}: {line}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(level: Level, message: &str) -> String {
        let mut out = Vec::new();
        write_record(&mut out, level, "kernel_vas", &format_args!("{message}")).expect("write");
        String::from_utf8(out).expect("utf8")
    }

    #[test]
    fn single_line() {
        assert_eq!(
            render(Level::Info, "kernel_vas is INSERTED"),
            "[INFO] kernel_vas: kernel_vas is INSERTED\n"
        );
    }

    #[test]
    fn every_line_is_prefixed() {
        assert_eq!(
            render(Level::Warn, "first\nsecond\n"),
            "[WARN] kernel_vas: first\n[WARN] kernel_vas: second\n"
        );
    }

    #[test]
    fn empty_message_keeps_prefix() {
        assert_eq!(render(Level::Info, ""), "[INFO] kernel_vas: \n");
    }

    #[test]
    fn level_filter() {
        let logger = KlogLogger::new(LevelFilter::Info);
        let debug = Metadata::builder().level(Level::Debug).build();
        let info = Metadata::builder().level(Level::Info).build();
        assert!(!logger.enabled(&debug));
        assert!(logger.enabled(&info));
    }
}
