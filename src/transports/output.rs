//! Output devices for formatted log lines

use crate::core::style::colors_enabled;
use crate::core::{LogLevel, LoggerError, Result};
use std::io::Write;

/// Destination of one formatted record
pub trait Output: Send + Sync {
    fn write(&mut self, formatted: &str, log_level_id: u32) -> Result<()>;

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Closures receive the formatted text and the level id
impl<F> Output for F
where
    F: FnMut(&str, u32) -> Result<()> + Send + Sync,
{
    fn write(&mut self, formatted: &str, log_level_id: u32) -> Result<()> {
        (*self)(formatted, log_level_id)
    }
}

/// Process console; WARN and above go to stderr
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleOutput;

impl ConsoleOutput {
    pub fn new() -> Self {
        Self
    }

    /// Whether the terminal should receive ANSI styles
    pub fn supports_styles() -> bool {
        colors_enabled()
    }
}

impl Output for ConsoleOutput {
    fn write(&mut self, formatted: &str, log_level_id: u32) -> Result<()> {
        if log_level_id >= LogLevel::Warn.id() {
            let mut stderr = std::io::stderr().lock();
            writeln!(stderr, "{}", formatted)?;
        } else {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{}", formatted)?;
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        std::io::stdout().flush()?;
        std::io::stderr().flush()?;
        Ok(())
    }
}

/// Any `io::Write`, one line per record
pub struct WriterOutput<W> {
    writer: W,
}

impl<W: Write + Send + Sync> WriterOutput<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write + Send + Sync> Output for WriterOutput<W> {
    fn write(&mut self, formatted: &str, _log_level_id: u32) -> Result<()> {
        writeln!(self.writer, "{}", formatted)
            .map_err(|e| LoggerError::writer(format!("failed to write record: {}", e)))
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
