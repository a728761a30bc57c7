//! Line decoder — turns a blocking byte stream into [`RawEvent`]s.
//!
//! Framing: one event per `\n`-terminated line (a preceding `\r` is
//! tolerated). Bytes are buffered until a full line is available, so a line
//! split across reads or across a timeout is reassembled. Malformed lines are
//! logged and skipped; they never end the sequence.

use std::io::{ErrorKind, Read};

use alerthub_domain::error::MalformedLineError;
use alerthub_domain::event::RawEvent;

use crate::error::SerialError;

/// Longest line accepted; anything longer is dropped up to the next newline.
pub const MAX_LINE_LEN: usize = 4096;

const READ_CHUNK: usize = 256;

/// Lazy, non-restartable sequence of events read from `R`.
///
/// Yields `Err(SerialError::Timeout)` whenever a read times out so the caller
/// can check for cancellation before pulling the next item. Ends (`None`)
/// once the stream reports end of file and the buffer is drained.
pub struct LineDecoder<R> {
    reader: R,
    buf: Vec<u8>,
    discarding: bool,
    eof: bool,
}

impl<R: Read> LineDecoder<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: Vec::with_capacity(READ_CHUNK),
            discarding: false,
            eof: false,
        }
    }

    /// Take the next complete line out of the buffer, if any.
    fn take_line(&mut self) -> Option<Vec<u8>> {
        let pos = self.buf.iter().position(|&b| b == b'\n')?;
        let mut line: Vec<u8> = self.buf.drain(..=pos).collect();
        line.pop();
        Some(line)
    }

    fn decode(line: &[u8]) -> Option<RawEvent> {
        if line.len() > MAX_LINE_LEN {
            let err = MalformedLineError::TooLong {
                limit: MAX_LINE_LEN,
            };
            tracing::debug!(%err, len = line.len(), "skipping malformed line");
            return None;
        }
        let text = String::from_utf8_lossy(line);
        match RawEvent::parse_line(&text) {
            Ok(event) => event,
            Err(err) => {
                tracing::debug!(%err, line = %text.trim(), "skipping malformed line");
                None
            }
        }
    }

    fn fill(&mut self) -> Result<(), SerialError> {
        let mut chunk = [0_u8; READ_CHUNK];
        loop {
            match self.reader.read(&mut chunk) {
                Ok(0) => {
                    self.eof = true;
                    return Ok(());
                }
                Ok(n) => {
                    self.buf.extend_from_slice(&chunk[..n]);
                    return Ok(());
                }
                Err(err) if err.kind() == ErrorKind::Interrupted => {}
                Err(err) if matches!(err.kind(), ErrorKind::TimedOut | ErrorKind::WouldBlock) => {
                    return Err(SerialError::Timeout);
                }
                Err(err) => return Err(SerialError::Io(err)),
            }
        }
    }
}

impl<R: Read> Iterator for LineDecoder<R> {
    type Item = Result<RawEvent, SerialError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(line) = self.take_line() {
                if std::mem::take(&mut self.discarding) {
                    continue;
                }
                if let Some(event) = Self::decode(&line) {
                    return Some(Ok(event));
                }
                continue;
            }

            if self.buf.len() > MAX_LINE_LEN {
                let err = MalformedLineError::TooLong {
                    limit: MAX_LINE_LEN,
                };
                tracing::debug!(%err, "dropping overlong line without terminator");
                self.buf.clear();
                self.discarding = true;
            }

            if self.eof {
                if self.buf.is_empty() || std::mem::take(&mut self.discarding) {
                    self.buf.clear();
                    return None;
                }
                let line = std::mem::take(&mut self.buf);
                if let Some(event) = Self::decode(&line) {
                    return Some(Ok(event));
                }
                return None;
            }

            if let Err(err) = self.fill() {
                return Some(Err(err));
            }
        }
    }
}
