//! Pull-mode byte input with source position tracking.

use oxevent::{Caret, Status};
use std::io::Read;
use std::sync::Arc;

/// A paged pull-mode byte source.
///
/// After [`prepare`](ByteSource::prepare), [`peek`](ByteSource::peek) yields
/// the current byte (0 at end of input) and [`advance`](ByteSource::advance)
/// consumes it, refilling the page on underflow and keeping the caret in
/// step. A `block_size` of 1 degrades to unbuffered byte-at-a-time reads.
pub struct ByteSource<'a> {
    reader: Box<dyn Read + 'a>,
    page: Vec<u8>,
    head: usize,
    block_size: usize,
    caret: Caret,
    eof: bool,
}

impl<'a> ByteSource<'a> {
    pub fn new(reader: impl Read + 'a, block_size: usize, document: Option<Arc<str>>) -> Self {
        Self {
            reader: Box::new(reader),
            page: Vec::new(),
            head: 0,
            block_size: block_size.max(1),
            caret: Caret::new(document),
            eof: false,
        }
    }

    /// The position of the byte [`peek`](ByteSource::peek) returns.
    pub fn caret(&self) -> &Caret {
        &self.caret
    }

    /// Seeds the page so that the first [`peek`](ByteSource::peek) is valid.
    pub fn prepare(&mut self) -> Result<(), Status> {
        self.fill_page()
    }

    /// The current byte, or 0 past the end of input.
    pub fn peek(&self) -> u8 {
        self.page.get(self.head).copied().unwrap_or(0)
    }

    /// True when the input is exhausted.
    pub fn is_eof(&self) -> bool {
        self.eof && self.head >= self.page.len()
    }

    /// Consumes the current byte. Returns `Ok(false)` when the end of input
    /// is reached (the soft-failure case) and `BadRead` on stream errors.
    pub fn advance(&mut self) -> Result<bool, Status> {
        let Some(consumed) = self.page.get(self.head).copied() else {
            return Ok(false);
        };
        if consumed == b'\n' {
            self.caret.line += 1;
            self.caret.col = 1;
        } else {
            self.caret.col += 1;
        }
        self.head += 1;
        if self.head >= self.page.len() && !self.eof {
            self.fill_page()?;
        }
        Ok(!self.is_eof())
    }

    /// Consumes a UTF-8 byte-order mark if the input starts with one.
    ///
    /// A truncated mark is `BadSyntax`: the source cannot rewind.
    pub fn skip_bom(&mut self) -> Result<(), Status> {
        if self.peek() != 0xEF {
            return Ok(());
        }
        self.advance()?;
        if self.peek() != 0xBB {
            return Err(Status::BadSyntax);
        }
        self.advance()?;
        if self.peek() != 0xBF {
            return Err(Status::BadSyntax);
        }
        self.advance()?;
        // The mark is not content
        self.caret.col = 1;
        Ok(())
    }

    fn fill_page(&mut self) -> Result<(), Status> {
        self.page.resize(self.block_size, 0);
        self.head = 0;
        let mut filled = 0;
        loop {
            match self.reader.read(&mut self.page[filled..]) {
                Ok(0) => {
                    self.eof = true;
                    break;
                }
                Ok(n) => {
                    filled += n;
                    if filled == self.page.len() {
                        break;
                    }
                    // A short read is not the end of the stream, keep the
                    // page as full as possible so peeks stay cheap
                }
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => {}
                Err(_) => {
                    self.eof = true;
                    return Err(Status::BadRead);
                }
            }
        }
        self.page.truncate(filled);
        Ok(())
    }
}
