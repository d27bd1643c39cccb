//! Read-side position tracking over a byte source
//!
//! A [`Cursor`] owns a position into a borrowed byte slice, a LIFO stack of
//! saved positions, and an optional window that confines every read. Nested
//! container formats (a table of relative offsets pointing into a shared
//! blob, say) jump into a region with [`Cursor::push_seek`] or carve it out
//! with [`Cursor::slice`], decode, then [`Cursor::pop`] back to exactly
//! where the outer layout left off.

use crate::error::WireError;
use crate::Result;
use alloc::format;
use alloc::vec::Vec;

/// Reference point for a seek
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeekOrigin {
    /// Offset from the start of the window
    Start,
    /// Offset from the current position
    Current,
    /// Offset from the end of the window (usually negative)
    End,
}

/// Read-side position tracker
#[derive(Debug)]
pub struct Cursor<'a> {
    data: &'a [u8],
    /// Window bounds, absolute into `data`
    start: usize,
    end: usize,
    /// Current position, absolute into `data`
    pos: usize,
    saved: Vec<usize>,
    seekable: bool,
}

impl<'a> Cursor<'a> {
    /// Cursor over the whole slice with random access
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            start: 0,
            end: data.len(),
            pos: 0,
            saved: Vec::new(),
            seekable: true,
        }
    }

    /// Cursor over a sequential-only source
    ///
    /// Reads work normally; `push`, `pop`, `seek` and `slice` fail with
    /// [`WireError::Unsupported`].
    pub fn forward_only(data: &'a [u8]) -> Self {
        Self {
            seekable: false,
            ..Self::new(data)
        }
    }

    /// Current position, relative to the window start
    pub fn position(&self) -> usize {
        self.pos - self.start
    }

    /// Bytes remaining before the window end
    ///
    /// Never exceeds the window length, regardless of how much of the
    /// underlying slice lies beyond it.
    pub fn bytes_left(&self) -> usize {
        self.end.saturating_sub(self.pos)
    }

    /// Total window length in bytes
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// True if the window is empty
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    fn require_seekable(&self, op: &str) -> Result<()> {
        if self.seekable {
            Ok(())
        } else {
            Err(WireError::Unsupported(format!(
                "{op} requires a seekable source"
            )))
        }
    }

    fn resolve(&self, offset: i64, origin: SeekOrigin) -> Result<usize> {
        let base = match origin {
            SeekOrigin::Start => self.start as i64,
            SeekOrigin::Current => self.pos as i64,
            SeekOrigin::End => self.end as i64,
        };
        let target = base + offset;
        if target < self.start as i64 || target > self.end as i64 {
            return Err(WireError::Unsupported(format!(
                "seek target {target} outside window [0, {})",
                self.end - self.start
            )));
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
    /// The child shares the underlying bytes but has its own position and
    /// save stack, starting at zero; its reads can never leave
    /// `[position, position + length)`. The parent's position is untouched.
    pub fn slice(&self, position: usize, length: usize) -> Result<Cursor<'a>> {
        self.require_seekable("slice")?;
        let abs_start = self.start.checked_add(position).ok_or_else(|| {
            WireError::Unsupported(format!("slice position {position} overflows"))
        })?;
        let abs_end = abs_start.checked_add(length).ok_or_else(|| {
            WireError::Unsupported(format!("slice length {length} overflows"))
        })?;
        if abs_end > self.end {
            return Err(WireError::EndOfInput {
                expected: length,
                actual: self.end.saturating_sub(abs_start),
            });
        }
        Ok(Cursor {
            data: self.data,
            start: abs_start,
            end: abs_end,
            pos: abs_start,
            saved: Vec::new(),
            seekable: true,
        })
    }

    /// Read a single byte
    pub fn read_byte(&mut self) -> Result<u8> {
        let bytes = self.read_bytes(1)?;
        Ok(bytes[0])
    }

    /// Read exactly `n` bytes as a borrowed subslice
    ///
    /// Fails with [`WireError::EndOfInput`] without consuming anything if
    /// fewer than `n` bytes remain in the window.
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        let left = self.bytes_left();
        if n > left {
            return Err(WireError::EndOfInput {
                expected: n,
                actual: left,
            });
        }
        let bytes = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(bytes)
    }

    /// Read exactly `buf.len()` bytes into `buf`
    pub fn read_into(&mut self, buf: &mut [u8]) -> Result<()> {
        let bytes = self.read_bytes(buf.len())?;
        buf.copy_from_slice(bytes);
        Ok(())
    }

    /// The unread remainder of the window, without consuming it
    pub fn remaining(&self) -> &'a [u8] {
        &self.data[self.pos..self.end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_tracks_position() {
        let data = [1u8, 2, 3, 4, 5];
        let mut cur = Cursor::new(&data);
        assert_eq!(cur.read_byte().unwrap(), 1);
        assert_eq!(cur.read_bytes(2).unwrap(), &[2, 3]);
        assert_eq!(cur.position(), 3);
        assert_eq!(cur.bytes_left(), 2);
    }

    #[test]
    fn test_short_read_consumes_nothing() {
        let data = [1u8, 2];
        let mut cur = Cursor::new(&data);
        let err = cur.read_bytes(3).unwrap_err();
        assert_eq!(
            err,
            WireError::EndOfInput {
                expected: 3,
                actual: 2
            }
        );
        // Position unchanged, a smaller read still works
        assert_eq!(cur.position(), 0);
        assert_eq!(cur.read_bytes(2).unwrap(), &[1, 2]);
    }

    #[test]
    fn test_push_pop_balance() {
        let data = [0u8; 16];
        let mut cur = Cursor::new(&data);
        cur.read_bytes(3).unwrap();
        for n in 0..4 {
            for _ in 0..n {
                cur.push().unwrap();
                cur.seek(1, SeekOrigin::Current).unwrap();
            }
            for _ in 0..n {
                cur.pop().unwrap();
            }
            assert_eq!(cur.position(), 3);
        }
    }

    #[test]
    fn test_unmatched_pop_keeps_position() {
        let data = [0u8; 8];
        let mut cur = Cursor::new(&data);
        cur.read_bytes(5).unwrap();
        assert!(matches!(cur.pop(), Err(WireError::Unsupported(_))));
        assert_eq!(cur.position(), 5);
    }

    #[test]
    fn test_push_seek_jump_and_return() {
        let data = [10u8, 11, 12, 13, 14, 15];
        let mut cur = Cursor::new(&data);
        cur.read_byte().unwrap();
        cur.push_seek(4, SeekOrigin::Start).unwrap();
        assert_eq!(cur.read_byte().unwrap(), 14);
        cur.pop().unwrap();
        assert_eq!(cur.read_byte().unwrap(), 11);
    }

    #[test]
    fn test_slice_confines_reads() {
        let data = [1u8, 2, 3, 4, 5, 6];
        let cur = Cursor::new(&data);
        let mut sub = cur.slice(2, 3).unwrap();
        assert_eq!(sub.bytes_left(), 3);
        assert_eq!(sub.read_bytes(3).unwrap(), &[3, 4, 5]);
        assert!(matches!(
            sub.read_byte(),
            Err(WireError::EndOfInput { .. })
        ));
    }

    #[test]
    fn test_slice_is_independent_of_parent() {
        let data = [1u8, 2, 3, 4, 5, 6];
        let mut cur = Cursor::new(&data);
        cur.read_bytes(2).unwrap();
        let mut sub = cur.slice(3, 2).unwrap();
        sub.read_byte().unwrap();
        sub.push().unwrap();
        // Parent position and stack untouched by the child
        assert_eq!(cur.position(), 2);
        assert!(matches!(cur.pop(), Err(WireError::Unsupported(_))));
        assert_eq!(cur.read_byte().unwrap(), 3);
    }

    #[test]
    fn test_slice_beyond_window_fails() {
        let data = [0u8; 4];
        let cur = Cursor::new(&data);
        assert!(matches!(
            cur.slice(2, 3),
            Err(WireError::EndOfInput { .. })
        ));
    }

    #[test]
    fn test_nested_slice_relative_to_child_window() {
        let data = [0u8, 1, 2, 3, 4, 5, 6, 7];
        let cur = Cursor::new(&data);
        let sub = cur.slice(2, 5).unwrap();
        let mut inner = sub.slice(1, 2).unwrap();
        assert_eq!(inner.read_bytes(2).unwrap(), &[3, 4]);
    }

    #[test]
    fn test_forward_only_rejects_positioning() {
        let data = [1u8, 2, 3];
        let mut cur = Cursor::forward_only(&data);
        assert_eq!(cur.read_byte().unwrap(), 1);
        assert!(matches!(cur.push(), Err(WireError::Unsupported(_))));
        assert!(matches!(cur.pop(), Err(WireError::Unsupported(_))));
        assert!(matches!(
            cur.seek(0, SeekOrigin::Start),
            Err(WireError::Unsupported(_))
        ));
        assert!(matches!(cur.slice(0, 1), Err(WireError::Unsupported(_))));
        // Sequential reading still fine
        assert_eq!(cur.read_bytes(2).unwrap(), &[2, 3]);
    }

    #[test]
    fn test_seek_from_end() {
        let data = [1u8, 2, 3, 4];
        let mut cur = Cursor::new(&data);
        cur.seek(-1, SeekOrigin::End).unwrap();
        assert_eq!(cur.read_byte().unwrap(), 4);
    }

    #[test]
    fn test_seek_outside_window_fails() {
        let data = [0u8; 4];
        let mut cur = Cursor::new(&data);
        assert!(cur.seek(-1, SeekOrigin::Start).is_err());
        assert!(cur.seek(5, SeekOrigin::Start).is_err());
        assert_eq!(cur.position(), 0);
    }
}
