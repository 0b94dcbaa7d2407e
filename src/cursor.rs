/***************************************************************************************************
 * Copyright (c) 2021-2023 Qualcomm Innovation Center, Inc. All rights reserved.
 *
 * Permission is hereby granted, free of charge, to any person obtaining a copy of this software
 * and associated documentation files (the “Software”), to deal in the Software without
 * restriction, including without limitation the rights to use, copy, modify, merge, publish,
 * distribute, sublicense, and/or sell copies of the Software, and to permit persons to whom the
 * Software is furnished to do so, subject to the following conditions:
 *
 * The above copyright notice and this permission notice (including the next
 * paragraph) shall be included in all copies or substantial portions of the
 * Software.
 *
 * THE SOFTWARE IS PROVIDED “AS IS”, WITHOUT WARRANTY OF ANY KIND, EXPRESS OR IMPLIED, INCLUDING
 * BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
 * NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM,
 * DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
 * OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.
 **************************************************************************************************/
/***************************************************************************************************
 * packed_cbor decode cursor
 *
 * A fairly comprehensive, memory efficient, deserializer and serializer for CBOR (RFC8949),
 * including support for unpacking packed-CBOR encoded data. This implementation is designed for
 * use in constrained systems and requires neither the Rust standard library nor an allocator.
 **************************************************************************************************/
use crate::constants::{major_type, MT_ARRAY, MT_MAP, MAX_ACTIVE_TABLES, PAYLOAD_INDEFINITE};
use crate::error::{CBORError, Result};
use crate::wire::decode_header;

#[cfg(feature = "trace")]
use func_trace::trace;

#[cfg(feature = "trace")]
func_trace::init_depth_var!();

/// Bits of `Cursor::flags`.
pub(crate) mod flags {
    /// The cursor denotes a position inside an array or map, not the top level.
    pub const INSIDE_CONTAINER: u8 = 0b0001;
    /// The enclosing container is indefinite-length (terminated by a break byte).
    pub const INDEFINITE: u8 = 0b0010;
    /// Packed-CBOR unpacking is active for this cursor and any cursor derived from it.
    pub const PACKED_ENABLED: u8 = 0b0100;
    /// This container cursor was produced by following a packed-CBOR reference: its bytes live
    /// in a table, not in the parent's own stream, so leaving it must not advance the parent by
    /// the container's length.
    pub const IS_SHARED_ITEM: u8 = 0b1000;
}

/// A byte range, inside some (possibly external) buffer, holding the CBOR array that backs a
/// packed-CBOR shared-item table.
#[derive(Debug, Copy, Clone)]
pub(crate) struct ActiveTable<'buf> {
    pub buf: &'buf [u8],
    pub start: usize,
    pub end: usize,
    /// `Some(n)` for a definite-length array of `n` items; `None` for indefinite-length, whose
    /// true size is only known by iterating to the break byte.
    pub count: Option<usize>,
}

/// A position in a CBOR byte stream, optionally nested inside containers and optionally backed
/// by a stack of packed-CBOR shared-item tables.
///
/// `Cursor` never owns or copies the bytes it reads: every typed read borrows directly from the
/// buffer the cursor was constructed over (or, after a packed-CBOR reference has been followed,
/// from whichever table supplied the referenced item).
#[derive(Debug, Copy, Clone)]
pub struct Cursor<'buf> {
    pub(crate) buf: &'buf [u8],
    pub(crate) pos: usize,
    pub(crate) end: usize,
    pub(crate) remaining: Option<usize>,
    pub(crate) flags: u8,
    pub(crate) tables: [Option<ActiveTable<'buf>>; MAX_ACTIVE_TABLES],
    pub(crate) active_count: usize,
}

impl<'buf> Cursor<'buf> {
    /// Construct a cursor over `buf`, positioned at the start, with packed-CBOR support disabled.
    #[cfg_attr(feature = "trace", trace)]
    pub fn new(buf: &'buf [u8]) -> Self {
        Cursor {
            buf,
            pos: 0,
            end: buf.len(),
            remaining: None,
            flags: 0,
            tables: [None; MAX_ACTIVE_TABLES],
            active_count: 0,
        }
    }

    /// Construct a cursor over `buf`, positioned at the start, with packed-CBOR unpacking
    /// enabled. Requires the `packed` feature.
    #[cfg(feature = "packed")]
    #[cfg_attr(feature = "trace", trace)]
    pub fn new_packed(buf: &'buf [u8]) -> Self {
        let mut c = Self::new(buf);
        c.flags |= flags::PACKED_ENABLED;
        c
    }

    /// Construct a packed-CBOR cursor with an externally-supplied initial shared-item table.
    /// `table` must hold exactly one CBOR array (definite or indefinite length); it is installed
    /// as the sole active table before any item is read from `buf`.
    #[cfg(feature = "packed")]
    #[cfg_attr(feature = "trace", trace)]
    pub fn new_packed_with_table(buf: &'buf [u8], table: &'buf [u8]) -> Result<Self> {
        let hdr = decode_header(table, 0).map_err(|_| CBORError::PackedFormat)?;
        if hdr.mt != MT_ARRAY {
            return Err(CBORError::PackedFormat);
        }
        let count = if hdr.ai == PAYLOAD_INDEFINITE {
            None
        } else {
            Some(hdr.arg as usize)
        };
        let mut c = Self::new(buf);
        c.flags |= flags::PACKED_ENABLED;
        c.tables[0] = Some(ActiveTable {
            buf: table,
            start: hdr.hdr_len,
            end: table.len(),
            count,
        });
        c.active_count = 1;
        Ok(c)
    }

    /// Absolute byte offset of the cursor's current position within the buffer it was
    /// constructed over (or, for a cursor produced by entering a container, within that same
    /// buffer - container cursors never switch buffers unless they were produced by following a
    /// packed-CBOR reference).
    #[inline]
    pub fn pos(&self) -> usize {
        self.pos
    }

    #[inline]
    pub(crate) fn packed_enabled(&self) -> bool {
        self.flags & flags::PACKED_ENABLED != 0
    }

    #[inline]
    pub(crate) fn inside_container(&self) -> bool {
        self.flags & flags::INSIDE_CONTAINER != 0
    }

    /// `true` if the enclosing container (if any) is indefinite-length.
    #[inline]
    pub fn is_indefinite(&self) -> bool {
        self.flags & flags::INDEFINITE != 0
    }

    #[inline]
    pub(crate) fn is_shared_item(&self) -> bool {
        self.flags & flags::IS_SHARED_ITEM != 0
    }

    /// Number of items (arrays) or key/value steps (maps, counted individually) still to consume
    /// in the enclosing definite-length container; `None` at the top level or inside an
    /// indefinite-length container.
    #[inline]
    pub fn remaining(&self) -> Option<usize> {
        self.remaining
    }

    /// `true` if there is no more input to read at this nesting level: at the top level, the
    /// buffer is exhausted; inside a definite-length container, the item count has reached zero;
    /// inside an indefinite-length container, the next byte is the break marker.
    #[cfg_attr(feature = "trace", trace)]
    pub fn at_end(&self) -> bool {
        if self.inside_container() {
            if self.is_indefinite() {
                self.byte_at(self.pos) == Ok(crate::constants::MT_SIMPLE | PAYLOAD_INDEFINITE)
            } else {
                self.remaining == Some(0)
            }
        } else {
            self.pos >= self.end
        }
    }

    /// Major type of the item at the current position, without consuming anything. Fails with
    /// `EndOfInput` if the cursor is already at the end.
    #[cfg_attr(feature = "trace", trace)]
    pub fn major_type(&self) -> Result<u8> {
        if self.at_end() {
            return Err(CBORError::EndOfInput);
        }
        Ok(major_type(self.byte_at(self.pos)?))
    }

    #[inline]
    pub(crate) fn byte_at(&self, i: usize) -> Result<u8> {
        self.buf.get(i).copied().ok_or(CBORError::EndOfInput)
    }

    #[inline]
    pub(crate) fn remaining_bytes(&self) -> &'buf [u8] {
        &self.buf[self.pos..self.end]
    }

    /// Advance the cursor `n` bytes, bounds-checked against `end`, and decrement a definite
    /// container's item count by one if applicable.
    #[cfg_attr(feature = "trace", trace)]
    pub(crate) fn advance(&mut self, n: usize) -> Result<()> {
        let new_pos = self.pos.checked_add(n).ok_or(CBORError::Overflow)?;
        if new_pos > self.end {
            return Err(CBORError::EndOfInput);
        }
        self.pos = new_pos;
        if self.inside_container() && !self.is_indefinite() {
            if let Some(r) = self.remaining {
                self.remaining = Some(r.saturating_sub(1));
            }
        }
        Ok(())
    }

    /// Enter a definite- or indefinite-length array at the current position, returning a fresh
    /// cursor for its contents. The parent cursor is not advanced; that happens when the returned
    /// cursor is passed to `leave_container`.
    #[cfg_attr(feature = "trace", trace)]
    pub fn enter_array(&mut self) -> Result<Cursor<'buf>> {
        self.enter_container(MT_ARRAY, false)
    }

    /// Enter a definite- or indefinite-length map at the current position. `remaining` on the
    /// returned cursor counts key/value steps (twice the pair count), matching the way
    /// `leave_container`/`advance` decrement by one step per read.
    #[cfg_attr(feature = "trace", trace)]
    pub fn enter_map(&mut self) -> Result<Cursor<'buf>> {
        self.enter_container(MT_MAP, true)
    }

    fn enter_container(&mut self, expected_mt: u8, is_map: bool) -> Result<Cursor<'buf>> {
        #[cfg(feature = "packed")]
        let resolved = if self.packed_enabled() {
            crate::packed::maybe_unpack(&*self, crate::constants::MAX_RECURSION_DEPTH)?
        } else {
            None
        };
        #[cfg(not(feature = "packed"))]
        let resolved: Option<(Cursor<'buf>, usize, bool)> = None;

        // `is_shared` must reflect whether a simple-value/tag-6 reference was actually followed
        // into a shared-item table, not merely whether `maybe_unpack` touched anything: a table
        // definition whose rump is a literal container leaves the item in `self`'s own stream, so
        // `leave_container` must still advance `self` normally rather than short-circuiting.
        let (buf, pos, end, tables, active_count, is_shared, used) = match &resolved {
            Some((r, used, crossed)) => (r.buf, r.pos, r.end, r.tables, r.active_count, *crossed, *used),
            None => (self.buf, self.pos, self.end, self.tables, self.active_count, false, 0),
        };

        let hdr = decode_header(buf, pos)?;
        if hdr.mt != expected_mt {
            return Err(CBORError::InvalidType);
        }

        let mut child = Cursor {
            buf,
            pos: pos + hdr.hdr_len,
            end,
            remaining: None,
            flags: flags::INSIDE_CONTAINER,
            tables,
            active_count,
        };
        if self.packed_enabled() {
            child.flags |= flags::PACKED_ENABLED;
        }
        if is_shared {
            child.flags |= flags::IS_SHARED_ITEM;
        }

        if hdr.ai == PAYLOAD_INDEFINITE {
            child.flags |= flags::INDEFINITE;
        } else {
            let mut n = hdr.arg as usize;
            if is_map {
                n = n.checked_mul(2).ok_or(CBORError::Overflow)?;
            }
            child.remaining = Some(n);
        }

        if is_shared {
            // The reference form itself lives in our own stream; the container contents do not.
            // Charge the reference's bytes now rather than waiting for `leave_container`.
            self.advance(used)?;
        }
        Ok(child)
    }

    /// Leave a container entered via `enter_array`/`enter_map`. The child must be positioned at
    /// its own end (all items consumed, or the break byte reached for indefinite containers);
    /// otherwise this fails with `InvalidType` rather than silently skipping ahead.
    #[cfg_attr(feature = "trace", trace)]
    pub fn leave_container(&mut self, child: Cursor<'buf>) -> Result<()> {
        if !child.inside_container() || !child.at_end() {
            return Err(CBORError::InvalidType);
        }

        if child.is_shared_item() {
            // The container's bytes live in a table, and the parent already advanced past the
            // reference form itself when the container was entered (see `enter_container`).
            return Ok(());
        }

        if child.pos < self.pos || child.pos > self.end {
            return Err(CBORError::InvalidType);
        }
        let end_pos = if child.is_indefinite() {
            child.pos + 1 // step over the break byte
        } else {
            child.pos
        };
        if end_pos > self.end {
            return Err(CBORError::EndOfInput);
        }
        self.pos = end_pos;
        if self.inside_container() && !self.is_indefinite() {
            if let Some(r) = self.remaining {
                self.remaining = Some(r.saturating_sub(1));
            }
        }
        Ok(())
    }
}
