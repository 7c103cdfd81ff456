//! Buffered push-mode byte output.

use oxevent::Status;
use std::io::Write;

/// Accumulates bytes and hands them to the underlying writer one full block
/// at a time.
///
/// Partial writes surface as `BadWrite`. A `block_size` of 1 bypasses
/// buffering entirely.
pub struct BlockDumper<'a> {
    writer: Box<dyn Write + 'a>,
    block: Vec<u8>,
    block_size: usize,
}

impl<'a> BlockDumper<'a> {
    pub fn new(writer: impl Write + 'a, block_size: usize) -> Self {
        let block_size = block_size.max(1);
        Self {
            writer: Box::new(writer),
            block: Vec::with_capacity(if block_size > 1 { block_size } else { 0 }),
            block_size,
        }
    }

    pub fn write(&mut self, bytes: &[u8]) -> Result<(), Status> {
        if self.block_size == 1 {
            return self.writer.write_all(bytes).map_err(|_| Status::BadWrite);
        }
        self.block.extend_from_slice(bytes);
        if self.block.len() >= self.block_size {
            self.dump()?;
        }
        Ok(())
    }

    pub fn write_byte(&mut self, byte: u8) -> Result<(), Status> {
        self.write(&[byte])
    }

    pub fn write_str(&mut self, text: &str) -> Result<(), Status> {
        self.write(text.as_bytes())
    }

    pub fn write_char(&mut self, c: char) -> Result<(), Status> {
        let mut utf8 = [0; 4];
        self.write(c.encode_utf8(&mut utf8).as_bytes())
    }

    /// Changes the block size. Only meaningful before the first write.
    pub fn set_block_size(&mut self, block_size: usize) {
        self.block_size = block_size.max(1);
    }

    /// Writes out any partial block and flushes the underlying writer.
    pub fn flush(&mut self) -> Result<(), Status> {
        self.dump()?;
        self.writer.flush().map_err(|_| Status::BadWrite)
    }

    fn dump(&mut self) -> Result<(), Status> {
        if !self.block.is_empty() {
            self.writer
                .write_all(&self.block)
                .map_err(|_| Status::BadWrite)?;
            self.block.clear();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct ChunkRecorder {
        chunks: Rc<RefCell<Vec<Vec<u8>>>>,
    }

    impl Write for ChunkRecorder {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.chunks.borrow_mut().push(buf.to_vec());
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn blocks_are_accumulated() {
        let chunks = Rc::new(RefCell::new(Vec::new()));
        let mut dumper = BlockDumper::new(
            ChunkRecorder {
                chunks: Rc::clone(&chunks),
            },
            4,
        );
        dumper.write(b"ab").unwrap();
        assert!(chunks.borrow().is_empty());
        dumper.write(b"cd").unwrap();
        assert_eq!(chunks.borrow().len(), 1);
        dumper.write(b"e").unwrap();
        dumper.flush().unwrap();
        assert_eq!(*chunks.borrow(), [b"abcd".to_vec(), b"e".to_vec()]);
    }

    #[test]
    fn unbuffered_mode_passes_through() {
        let chunks = Rc::new(RefCell::new(Vec::new()));
        let mut dumper = BlockDumper::new(
            ChunkRecorder {
                chunks: Rc::clone(&chunks),
            },
            1,
        );
        dumper.write(b"xy").unwrap();
        assert_eq!(chunks.borrow().len(), 1);
    }

    #[test]
    fn write_errors_are_bad_write() {
        struct Full;
        impl Write for Full {
            fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
                Err(std::io::Error::other("full"))
            }
            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }
        let mut dumper = BlockDumper::new(Full, 1);
        assert_eq!(dumper.write(b"x"), Err(Status::BadWrite));
    }
}
