//! Positioned byte cursor handed to parse handlers

use crate::error::{DerError, DerResult};
use bytes::Buf;

/// Cursor over DER-encoded bytes with a movable read window
///
/// The cursor keeps `0 <= position <= limit <= capacity` at all times. Reads
/// never go past `limit`, which lets the parser narrow the window to exactly
/// one value before handing the cursor to a handler.
///
/// `DerBuffer` implements [`bytes::Buf`] over the `[position, limit)` window,
/// so handlers can use the usual `Buf` accessors or the functions in
/// [`decoder`](super::decoder).
///
/// # Position Tracking
///
/// The parser moves `position` and `limit` in place while it walks the tag
/// tree. After a parse the cursor is not restored to its initial state.
#[derive(Debug, Clone)]
pub struct DerBuffer<'a> {
    data: &'a [u8],
    position: usize,
    limit: usize,
}

impl<'a> DerBuffer<'a> {
    /// Create a cursor spanning the whole slice
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            position: 0,
            limit: data.len(),
        }
    }

    /// Total number of bytes backing the cursor
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Get current read position
    pub fn position(&self) -> usize {
        self.position
    }

    /// Get the end of the readable window
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Move the read position
    ///
    /// # Error Handling
    /// Returns `OutOfBounds` if `position` is past the current limit.
    pub fn set_position(&mut self, position: usize) -> DerResult<()> {
        if position > self.limit {
            return Err(DerError::OutOfBounds {
                needed: position,
                available: self.limit,
            });
        }
        self.position = position;
        Ok(())
    }

    /// Move the end of the readable window
    ///
    /// If the current position lies beyond the new limit it is moved back to
    /// the limit.
    ///
    /// # Error Handling
    /// Returns `OutOfBounds` if `limit` is past the capacity.
    pub fn set_limit(&mut self, limit: usize) -> DerResult<()> {
        if limit > self.data.len() {
            return Err(DerError::OutOfBounds {
                needed: limit,
                available: self.data.len(),
            });
        }
        self.limit = limit;
        if self.position > limit {
            self.position = limit;
        }
        Ok(())
    }

    /// Read a byte, advancing the position
    ///
    /// # Error Handling
    /// Returns `OutOfBounds` if the window is exhausted.
    pub fn read_u8(&mut self) -> DerResult<u8> {
        if self.position >= self.limit {
            return Err(DerError::OutOfBounds {
                needed: 1,
                available: 0,
            });
        }
        let byte = self.data[self.position];
        self.position += 1;
        Ok(byte)
    }

    /// Read `count` bytes, advancing the position
    ///
    /// # Error Handling
    /// Returns `OutOfBounds` if fewer than `count` bytes remain in the window.
    pub fn read_bytes(&mut self, count: usize) -> DerResult<&'a [u8]> {
        let available = self.limit - self.position;
        if count > available {
            return Err(DerError::OutOfBounds {
                needed: count,
                available,
            });
        }
        let start = self.position;
        self.position += count;
        Ok(&self.data[start..start + count])
    }

    /// Get the unread part of the window without consuming it
    pub fn as_slice(&self) -> &'a [u8] {
        &self.data[self.position..self.limit]
    }
}

impl<'a> From<&'a [u8]> for DerBuffer<'a> {
    fn from(data: &'a [u8]) -> Self {
        Self::new(data)
    }
}

impl Buf for DerBuffer<'_> {
    fn remaining(&self) -> usize {
        self.limit - self.position
    }

    fn chunk(&self) -> &[u8] {
        &self.data[self.position..self.limit]
    }

    fn advance(&mut self, cnt: usize) {
        assert!(
            cnt <= self.remaining(),
            "cannot advance past `remaining`: {:?} <= {:?}",
            cnt,
            self.remaining()
        );
        self.position += cnt;
    }
}
