//! Line-oriented scanning of Markdown text.
//!
//! Lines are split on `\n`. A single trailing `\r` is dropped, a final line
//! without a terminator still counts, and nothing is yielded for the empty
//! remainder after a final newline. Line numbers start at 1.

use crate::{Error, Result};
use std::io::BufRead;

/// A line read by [`LineScanner`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedLine {
    /// 1-indexed line number.
    pub number: usize,
    /// Line content without its terminator.
    pub bytes: Vec<u8>,
}

impl ScannedLine {
    /// Heading level of this line, if it is a heading line.
    #[must_use]
    pub fn heading_level(&self) -> Option<u8> {
        heading_level(&self.bytes)
    }
}

/// Iterator over the lines of a byte source.
pub struct LineScanner<R> {
    reader: R,
    number: usize,
    buf: Vec<u8>,
    done: bool,
}

impl<R: BufRead> LineScanner<R> {
    /// Scanner starting at line 1 of `reader`.
    pub const fn new(reader: R) -> Self {
        Self {
            reader,
            number: 0,
            buf: Vec::new(),
            done: false,
        }
    }

    /// Number of lines yielded so far.
    #[must_use]
    pub const fn lines_read(&self) -> usize {
        self.number
    }

    fn next_line(&mut self) -> Result<Option<ScannedLine>> {
        self.buf.clear();
        let read = self
            .reader
            .read_until(b'\n', &mut self.buf)
            .map_err(Error::MalformedInput)?;
        if read == 0 {
            return Ok(None);
        }

        if self.buf.last() == Some(&b'\n') {
            self.buf.pop();
        }
        if self.buf.last() == Some(&b'\r') {
            self.buf.pop();
        }

        self.number += 1;
        Ok(Some(ScannedLine {
            number: self.number,
            bytes: self.buf.clone(),
        }))
    }
}

impl<R: BufRead> Iterator for LineScanner<R> {
    type Item = Result<ScannedLine>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        match self.next_line() {
            Ok(Some(line)) => Some(Ok(line)),
            Ok(None) => {
                self.done = true;
                None
            },
            Err(e) => {
                self.done = true;
                Some(Err(e))
            },
        }
    }
}

/// Count of leading `#` bytes, or `None` when the line does not start with `#`.
///
/// Levels above 6 are returned as-is, saturating at `u8::MAX`.
#[must_use]
pub fn heading_level(line: &[u8]) -> Option<u8> {
    let hashes = line.iter().take_while(|&&b| b == b'#').count();
    if hashes == 0 {
        None
    } else {
        Some(u8::try_from(hashes).unwrap_or(u8::MAX))
    }
}

/// Total number of lines in `text` under the scanner's rules.
#[must_use]
pub fn count_lines(text: &[u8]) -> usize {
    if text.is_empty() {
        return 0;
    }
    let newlines = text.iter().filter(|&&b| b == b'\n').count();
    if text.ends_with(b"\n") {
        newlines
    } else {
        newlines + 1
    }
}
