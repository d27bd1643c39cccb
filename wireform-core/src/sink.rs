//! Write-side position tracking over a growable byte buffer
//!
//! [`Sink`] mirrors [`crate::cursor::Cursor`]: the same position, save
//! stack, window and seek semantics, but writing. An unwindowed sink grows
//! its buffer as needed, zero-filling any gap a forward seek leaves behind;
//! a windowed sink (from [`Sink::slice`]) never writes a byte outside its
//! window.

use crate::cursor::SeekOrigin;
use crate::error::WireError;
use crate::Result;
use alloc::format;
use alloc::vec::Vec;

/// Write-side position tracker
#[derive(Debug)]
pub struct Sink<'a> {
    buf: &'a mut Vec<u8>,
    /// Window start, absolute into `buf`
    start: usize,
    /// Window end; `None` means the sink may grow the buffer freely
    limit: Option<usize>,
    /// Current position, absolute into `buf`
    pos: usize,
    saved: Vec<usize>,
    seekable: bool,
}

impl<'a> Sink<'a> {
    /// Sink appending to `buf`, positioned at its current end
    pub fn new(buf: &'a mut Vec<u8>) -> Self {
        let pos = buf.len();
        Self {
            buf,
            start: 0,
            limit: None,
            pos,
            saved: Vec::new(),
            seekable: true,
        }
    }

    /// Sink over a sequential-only destination
    ///
    /// Writes append normally; `push`, `pop`, `seek` and `slice` fail with
    /// [`WireError::Unsupported`].
    pub fn forward_only(buf: &'a mut Vec<u8>) -> Self {
        Self {
            seekable: false,
            ..Self::new(buf)
        }
    }

    fn window_end(&self) -> usize {
        self.limit.unwrap_or(self.buf.len())
    }

    /// Current position, relative to the window start
    pub fn position(&self) -> usize {
        self.pos - self.start
    }

    /// Bytes between the current position and the window end
    ///
    /// For an unwindowed sink this is the distance to the buffer's current
    /// end; writes past it simply grow the buffer.
    pub fn bytes_left(&self) -> usize {
        self.window_end().saturating_sub(self.pos)
    }

    fn require_seekable(&self, op: &str) -> Result<()> {
        if self.seekable {
            Ok(())
        } else {
            Err(WireError::Unsupported(format!(
                "{op} requires a seekable destination"
            )))
        }
    }

    fn resolve(&self, offset: i64, origin: SeekOrigin) -> Result<usize> {
        let base = match origin {
            SeekOrigin::Start => self.start as i64,
            SeekOrigin::Current => self.pos as i64,
            SeekOrigin::End => self.window_end() as i64,
        };
        let target = base + offset;
        if target < self.start as i64 {
            return Err(WireError::Unsupported(format!(
                "seek target {target} before window start"
            )));
        }
        if let Some(limit) = self.limit {
            if target > limit as i64 {
                return Err(WireError::Unsupported(format!(
                    "seek target {target} outside window [0, {})",
                    limit - self.start
                )));
            }
        }
        Ok(target as usize)
    }

    /// Move the position without saving the old one
    pub fn seek(&mut self, offset: i64, origin: SeekOrigin) -> Result<()> {
        self.require_seekable("seek")?;
        self.pos = self.resolve(offset, origin)?;
        Ok(())
    }

    /// Save the current position on the stack
    pub fn push(&mut self) -> Result<()> {
        self.require_seekable("push")?;
        self.saved.push(self.pos);
        Ok(())
    }

    /// Save the current position, then seek
    pub fn push_seek(&mut self, offset: i64, origin: SeekOrigin) -> Result<()> {
        self.require_seekable("push")?;
        let target = self.resolve(offset, origin)?;
        self.saved.push(self.pos);
        self.pos = target;
        Ok(())
    }

    /// Restore the most recently saved position
    ///
    /// The current position is left untouched on failure.
    pub fn pop(&mut self) -> Result<()> {
        self.require_seekable("pop")?;
        match self.saved.pop() {
            Some(pos) => {
                self.pos = pos;
                Ok(())
            }
            None => Err(WireError::Unsupported(
                "pop with no saved position".into(),
            )),
        }
    }

    /// Carve a bounded sub-view at a window-relative position
    ///
    /// The child writes into the same buffer, confined to
    /// `[position, position + length)`, with its own position and save
    /// stack. The parent is inaccessible while the child is alive (the
    /// borrow moves), and its position is untouched when it comes back.
    pub fn slice(&mut self, position: usize, length: usize) -> Result<Sink<'_>> {
        self.require_seekable("slice")?;
        let abs_start = self.start.checked_add(position).ok_or_else(|| {
            WireError::Unsupported(format!("slice position {position} overflows"))
        })?;
        let abs_end = abs_start.checked_add(length).ok_or_else(|| {
            WireError::Unsupported(format!("slice length {length} overflows"))
        })?;
        if let Some(limit) = self.limit {
            if abs_end > limit {
                return Err(WireError::EndOfInput {
                    expected: length,
                    actual: limit.saturating_sub(abs_start),
                });
            }
        }
        Ok(Sink {
            buf: self.buf,
            start: abs_start,
            limit: Some(abs_end),
            pos: abs_start,
            saved: Vec::new(),
            seekable: true,
        })
    }

    /// Write a single byte
    pub fn write_byte(&mut self, byte: u8) -> Result<()> {
        self.write_bytes(&[byte])
    }

    /// Write all of `bytes` at the current position
    ///
    /// A windowed sink fails with [`WireError::EndOfInput`] and writes
    /// nothing if the bytes would cross the window end. An unwindowed sink
    /// grows the buffer, zero-filling any gap left by a forward seek.
    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        let end = self.pos + bytes.len();
        if let Some(limit) = self.limit {
            if end > limit {
                return Err(WireError::EndOfInput {
                    expected: bytes.len(),
                    actual: limit.saturating_sub(self.pos),
                });
            }
        }
        if self.buf.len() < end {
            self.buf.resize(end, 0);
        }
        self.buf[self.pos..end].copy_from_slice(bytes);
        self.pos = end;
        Ok(())
    }
}
