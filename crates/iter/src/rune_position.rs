//! Character iteration with line and column tracking.

use crate::adapters::reader::RuneReader;
use crate::error::{IterError, IterResult};
use std::io::Read;

/// Iterates the UTF-8 characters of a reader, tracking line and position.
///
/// Every line terminator (`\r`, `\n` or `\r\n`) is delivered as a single
/// `'\n'`. The protocol is the one [`Iter`](crate::Iter) follows: call
/// [`next`](Self::next), then [`value`](Self::value) once, and push characters
/// back with [`unread`](Self::unread).
///
/// # Example
///
/// ```
/// use pull_iter::RunePositionIter;
///
/// let mut iter = RunePositionIter::new("ab\r\nc".as_bytes());
/// let mut text = String::new();
/// while iter.next()? {
///     text.push(iter.value()?);
/// }
///
/// assert_eq!(text, "ab\nc");
/// assert_eq!((iter.line(), iter.position()), (2, 1));
/// # Ok::<(), pull_iter::IterError>(())
/// ```
pub struct RunePositionIter<R> {
    runes: RuneReader<R>,
    last_cr: bool,
    exhausted: bool,
    current: Option<char>,
    buffer: Vec<char>,
    line: usize,
    position: usize,
    /// Length of each completed line, so unreading a newline can restore it.
    line_ends: Vec<usize>,
}

impl<R: Read> RunePositionIter<R> {
    /// Creates an iterator positioned before the first character of line 1.
    pub fn new(src: R) -> Self {
        Self {
            runes: RuneReader::new(src),
            last_cr: false,
            exhausted: false,
            current: None,
            buffer: Vec::new(),
            line: 1,
            position: 0,
            line_ends: Vec::new(),
        }
    }

    /// The line of the last character read, starting at 1.
    ///
    /// A newline belongs to the line it starts.
    pub fn line(&self) -> usize {
        self.line
    }

    /// The position of the last character read within its line, starting at 1.
    ///
    /// 0 before anything is read on the current line.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Returns true once `next` has returned false.
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Advances to the next character, returning true if there is one to read.
    pub fn next(&mut self) -> IterResult<bool> {
        if self.exhausted {
            log::debug!("{}", IterError::NextOnExhausted);
            return Err(IterError::NextOnExhausted);
        }

        let c = match self.buffer.pop() {
            Some(c) => c,
            None => match self.read_normalized()? {
                Some(c) => c,
                None => {
                    log::trace!("rune position iterator exhausted at line {}", self.line);
                    self.exhausted = true;
                    self.current = None;
                    return Ok(false);
                }
            },
        };

        if c == '\n' {
            self.line_ends.push(self.position);
            self.line += 1;
            self.position = 0;
        } else {
            self.position += 1;
        }

        self.current = Some(c);
        Ok(true)
    }

    /// Reads the character produced by the last call to `next`.
    pub fn value(&mut self) -> IterResult<char> {
        if self.exhausted {
            log::debug!("{}", IterError::ValueOnExhausted);
            return Err(IterError::ValueOnExhausted);
        }

        self.current.take().ok_or_else(|| {
            log::debug!("{}", IterError::ValueBeforeNext);
            IterError::ValueBeforeNext
        })
    }

    /// Pushes a character back, stepping line and position back over it.
    pub fn unread(&mut self, c: char) -> IterResult<()> {
        if self.exhausted {
            log::debug!("{}", IterError::UnreadOnExhausted);
            return Err(IterError::UnreadOnExhausted);
        }

        if c == '\n' {
            if let Some(end) = self.line_ends.pop() {
                self.line -= 1;
                self.position = end;
            } else {
                self.position = 0;
            }
        } else {
            self.position = self.position.saturating_sub(1);
        }

        self.buffer.push(c);
        Ok(())
    }

    fn read_normalized(&mut self) -> IterResult<Option<char>> {
        loop {
            let Some(c) = self.runes.next_char()? else {
                return Ok(None);
            };

            let after_cr = std::mem::replace(&mut self.last_cr, false);
            match c {
                '\r' => {
                    self.last_cr = true;
                    return Ok(Some('\n'));
                }
                '\n' if after_cr => continue,
                c => return Ok(Some(c)),
            }
        }
    }
}

impl<R> std::fmt::Debug for RunePositionIter<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunePositionIter")
            .field("line", &self.line)
            .field("position", &self.position)
            .field("exhausted", &self.exhausted)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_and_position() {
        let text = "line 1\rline 2\nline3\r\nline44";
        let lines = ["line 1", "line 2", "line3", "line44"];
        let mut iter = RunePositionIter::new(text.as_bytes());

        let mut line_num = 0;
        let mut last_char_pos = 0;
        let mut line_text = String::new();
        while iter.next().unwrap() {
            let c = iter.value().unwrap();
            if c == '\n' {
                assert_eq!(line_text, lines[line_num]);
                assert_eq!(last_char_pos, lines[line_num].len());
                line_num += 1;
                assert_eq!(iter.line(), line_num + 1);
                assert_eq!(iter.position(), 0);

                line_text.clear();
            } else {
                line_text.push(c);
                last_char_pos = iter.position();
            }
        }

        assert_eq!(line_num, lines.len() - 1);
        assert_eq!(iter.line(), lines.len());
        assert_eq!(iter.position(), lines[lines.len() - 1].len());
    }

    #[test]
    fn test_unread() {
        let mut iter = RunePositionIter::new("a".as_bytes());
        assert!(iter.next().unwrap());
        assert_eq!(iter.value().unwrap(), 'a');
        assert_eq!(iter.position(), 1);

        iter.unread('a').unwrap();
        assert_eq!(iter.position(), 0);
        assert!(iter.next().unwrap());
        assert_eq!(iter.value().unwrap(), 'a');
        assert_eq!(iter.position(), 1);

        assert!(!iter.is_exhausted());
        assert!(!iter.next().unwrap());
        assert!(iter.is_exhausted());
        assert_eq!(iter.next(), Err(IterError::NextOnExhausted));
        assert_eq!(iter.unread('a'), Err(IterError::UnreadOnExhausted));
    }

    #[test]
    fn test_unread_newline_restores_line() {
        let mut iter = RunePositionIter::new("ab\ncd".as_bytes());
        for _ in 0..3 {
            assert!(iter.next().unwrap());
        }
        assert_eq!(iter.value().unwrap(), '\n');
        assert_eq!((iter.line(), iter.position()), (2, 0));

        iter.unread('\n').unwrap();
        assert_eq!((iter.line(), iter.position()), (1, 2));

        assert!(iter.next().unwrap());
        assert_eq!(iter.value().unwrap(), '\n');
        assert_eq!((iter.line(), iter.position()), (2, 0));
    }

    #[test]
    fn test_value_protocol() {
        let mut iter = RunePositionIter::new("x".as_bytes());
        assert_eq!(iter.value(), Err(IterError::ValueBeforeNext));

        assert!(iter.next().unwrap());
        assert_eq!(iter.value().unwrap(), 'x');
        assert_eq!(iter.value(), Err(IterError::ValueBeforeNext));

        assert!(!iter.next().unwrap());
        assert_eq!(iter.value(), Err(IterError::ValueOnExhausted));
    }

    #[test]
    fn test_invalid_utf8() {
        let mut iter = RunePositionIter::new(&[b'a', 0xFF][..]);
        assert!(iter.next().unwrap());
        assert_eq!(iter.next(), Err(IterError::InvalidUtf8));
    }
}
