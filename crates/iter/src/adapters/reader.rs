//! Adapters over byte readers: bytes, UTF-8 characters and lines.
//!
//! Each layer pulls from the one below it. End of stream is ordinary
//! exhaustion; any other read failure and any malformed UTF-8 is fatal.

use crate::adapters::IterFn;
use crate::error::{IterError, IterResult};
use crate::value::Value;
use std::io::{self, Read};

/// The maximum number of bytes in one UTF-8 encoded character.
pub const UTF8_MAX_WIDTH: usize = 4;

/// Iterates the bytes of a reader, yielding [`Value::Byte`].
pub fn reader_iter_fn<R: Read + 'static>(src: R) -> IterFn {
    let mut bytes = ByteReader::new(src);
    Box::new(move || Ok(bytes.next_byte()?.map(Value::Byte)))
}

/// Iterates the UTF-8 characters of a reader, yielding [`Value::Char`].
pub fn reader_runes_iter_fn<R: Read + 'static>(src: R) -> IterFn {
    let mut runes = RuneReader::new(src);
    Box::new(move || Ok(runes.next_char()?.map(Value::Char)))
}

/// Iterates the lines of a reader, yielding [`Value::String`].
///
/// Lines end at `\r`, `\n` or `\r\n`; the terminator is not part of the
/// line. A final fragment without a terminator is the last line. An empty
/// source has no lines.
pub fn reader_lines_iter_fn<R: Read + 'static>(src: R) -> IterFn {
    let mut lines = LineReader::new(src);
    Box::new(move || Ok(lines.next_line()?.map(Value::String)))
}

/// Reads a source one byte at a time.
pub(crate) struct ByteReader<R> {
    src: R,
    done: bool,
}

impl<R: Read> ByteReader<R> {
    pub(crate) fn new(src: R) -> Self {
        Self { src, done: false }
    }

    pub(crate) fn next_byte(&mut self) -> IterResult<Option<u8>> {
        if self.done {
            return Ok(None);
        }

        let mut buf = [0u8; 1];
        loop {
            match self.src.read(&mut buf) {
                Ok(0) => {
                    log::trace!("reader exhausted");
                    self.done = true;
                    return Ok(None);
                }
                Ok(_) => return Ok(Some(buf[0])),
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => {
                    log::warn!("reader failed: {err}");
                    return Err(err.into());
                }
            }
        }
    }
}

/// Decodes UTF-8 characters from a byte reader.
pub(crate) struct RuneReader<R> {
    bytes: ByteReader<R>,
}

impl<R: Read> RuneReader<R> {
    pub(crate) fn new(src: R) -> Self {
        Self {
            bytes: ByteReader::new(src),
        }
    }

    pub(crate) fn next_char(&mut self) -> IterResult<Option<char>> {
        let Some(lead) = self.bytes.next_byte()? else {
            return Ok(None);
        };

        let width = utf8_width(lead);
        if width == 0 {
            log::warn!("invalid UTF-8 lead byte {lead:#04x}");
            return Err(IterError::InvalidUtf8);
        }

        let mut buf = [0u8; UTF8_MAX_WIDTH];
        buf[0] = lead;
        for slot in buf.iter_mut().take(width).skip(1) {
            match self.bytes.next_byte()? {
                Some(byte) => *slot = byte,
                None => {
                    log::warn!("stream ended inside a {width} byte UTF-8 sequence");
                    return Err(IterError::InvalidUtf8);
                }
            }
        }

        // Catches bad continuation bytes, overlong forms and surrogates.
        std::str::from_utf8(&buf[..width])
            .ok()
            .and_then(|s| s.chars().next())
            .map(Some)
            .ok_or_else(|| {
                log::warn!("invalid UTF-8 sequence {:x?}", &buf[..width]);
                IterError::InvalidUtf8
            })
    }
}

// Width of the sequence introduced by a lead byte, 0 if it cannot start one.
fn utf8_width(lead: u8) -> usize {
    match lead {
        0x00..=0x7F => 1,
        0xC2..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF4 => 4,
        _ => 0,
    }
}

/// Splits decoded characters into lines.
pub(crate) struct LineReader<R> {
    runes: RuneReader<R>,
    last_cr: bool,
}

impl<R: Read> LineReader<R> {
    pub(crate) fn new(src: R) -> Self {
        Self {
            runes: RuneReader::new(src),
            last_cr: false,
        }
    }

    pub(crate) fn next_line(&mut self) -> IterResult<Option<String>> {
        let mut line = String::new();

        loop {
            let Some(c) = self.runes.next_char()? else {
                return Ok((!line.is_empty()).then_some(line));
            };

            let after_cr = std::mem::replace(&mut self.last_cr, false);
            match c {
                '\r' => {
                    self.last_cr = true;
                    return Ok(Some(line));
                }
                // Second half of a CRLF pair
                '\n' if after_cr => continue,
                '\n' => return Ok(Some(line)),
                c => line.push(c),
            }
        }
    }
}
