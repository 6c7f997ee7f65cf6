//! Log output setup.

use std::{
    io::{self, Write},
    sync::{Arc, Mutex},
};

use tracing::Level;
use tracing_subscriber::fmt;

use crate::error::{Error, Result};

/// Install a global subscriber writing compact lines to stderr at `level`
/// and above. Fails if a global subscriber is already set.
pub fn init(level: Level) -> Result<()> {
    fmt()
        .event_format(format())
        .with_max_level(level)
        .with_writer(io::stderr)
        .try_init()
        .map_err(|e| Error::Internal(e.to_string()))
}

/// Install a global subscriber that appends log lines to a shared buffer,
/// for displaying logs inside the app or inspecting them in tests.
pub fn init_buffer(level: Level) -> Result<LogBuffer> {
    let buf = LogBuffer::default();
    let writer = buf.clone();
    fmt()
        .event_format(format())
        .with_max_level(level)
        .with_writer(move || writer.clone())
        .try_init()
        .map_err(|e| Error::Internal(e.to_string()))?;
    Ok(buf)
}

/// Compact line format: level and line number, no timestamps or colors.
fn format() -> fmt::format::Format<fmt::format::Compact, ()> {
    fmt::format()
        .with_level(true)
        .with_line_number(true)
        .with_ansi(false)
        .without_time()
        .compact()
}

/// A shared, line-oriented log sink.
#[derive(Clone, Default)]
pub struct LogBuffer {
    /// Complete lines.
    lines: Arc<Mutex<Vec<String>>>,
}

impl LogBuffer {
    /// Remove and return the buffered lines.
    pub fn drain(&self) -> Vec<String> {
        match self.lines.lock() {
            Ok(mut l) => l.drain(..).collect(),
            Err(_) => vec![],
        }
    }
}

impl Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let text = String::from_utf8_lossy(buf);
        let mut lines = self
            .lines
            .lock()
            .map_err(|e| io::Error::other(e.to_string()))?;
        lines.extend(text.lines().map(String::from));
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use tracing::{debug, trace};

    use super::*;

    #[test]
    fn buffer_captures_lines() -> Result<()> {
        let buf = init_buffer(Level::DEBUG)?;
        debug!("focus moved");
        trace!("not shown");
        let lines = buf.drain();
        assert!(
            lines
                .iter()
                .any(|l| l.contains("DEBUG") && l.contains("focus moved"))
        );
        assert!(!lines.iter().any(|l| l.contains("not shown")));
        assert!(init(Level::INFO).is_err());
        Ok(())
    }
}
