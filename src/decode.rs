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
 * packed_cbor typed decode API
 *
 * A fairly comprehensive, memory efficient, deserializer and serializer for CBOR (RFC8949),
 * including support for unpacking packed-CBOR encoded data. This implementation is designed for
 * use in constrained systems and requires neither the Rust standard library nor an allocator.
 **************************************************************************************************/
use crate::constants::*;
use crate::cursor::Cursor;
use crate::error::{CBORError, Result};
use crate::wire::{decode_header, read_extent, Header};

#[cfg(feature = "trace")]
use func_trace::trace;

#[cfg(feature = "trace")]
func_trace::init_depth_var!();

/// Structurally skip exactly one CBOR item starting at `buf[*pos..]`, recursing into containers
/// and tag chains, never reading past `end`. Does not interpret packed-CBOR semantics - a
/// shared-item reference (a simple value 0..=15, or a tag wrapping an integer) is itself a
/// complete, self-delimiting plain CBOR item and is skipped as such without being resolved.
pub(crate) fn skip_item_at(buf: &[u8], pos: &mut usize, end: usize, limit: usize) -> Result<()> {
    if limit == 0 {
        return Err(CBORError::Recursion);
    }
    if *pos >= end {
        return Err(CBORError::EndOfInput);
    }
    let hdr = decode_header(buf, *pos)?;
    let after_header = pos.checked_add(hdr.hdr_len).ok_or(CBORError::Overflow)?;
    if after_header > end {
        return Err(CBORError::EndOfInput);
    }

    match hdr.mt {
        MT_UINT | MT_NINT => {
            *pos = after_header;
        }
        MT_BSTR | MT_TSTR => {
            *pos = after_header;
            if hdr.ai == PAYLOAD_INDEFINITE {
                skip_indefinite_chunks(buf, pos, end, hdr.mt)?;
            } else {
                let len = hdr.arg as usize;
                let new_pos = pos.checked_add(len).ok_or(CBORError::Overflow)?;
                if new_pos > end {
                    return Err(CBORError::EndOfInput);
                }
                *pos = new_pos;
            }
        }
        MT_ARRAY => {
            *pos = after_header;
            if hdr.ai == PAYLOAD_INDEFINITE {
                while !at_break(buf, *pos, end)? {
                    skip_item_at(buf, pos, end, limit - 1)?;
                }
                *pos += 1;
            } else {
                for _ in 0..hdr.arg {
                    skip_item_at(buf, pos, end, limit - 1)?;
                }
            }
        }
        MT_MAP => {
            *pos = after_header;
            if hdr.ai == PAYLOAD_INDEFINITE {
                while !at_break(buf, *pos, end)? {
                    skip_item_at(buf, pos, end, limit - 1)?;
                    skip_item_at(buf, pos, end, limit - 1)?;
                }
                *pos += 1;
            } else {
                let steps = (hdr.arg as usize)
                    .checked_mul(2)
                    .ok_or(CBORError::Overflow)?;
                for _ in 0..steps {
                    skip_item_at(buf, pos, end, limit - 1)?;
                }
            }
        }
        MT_TAG => {
            *pos = after_header;
            skip_item_at(buf, pos, end, limit - 1)?;
        }
        MT_SIMPLE => {
            *pos = after_header;
        }
        _ => return Err(CBORError::InvalidType),
    }
    Ok(())
}

fn at_break(buf: &[u8], pos: usize, end: usize) -> Result<bool> {
    if pos >= end {
        return Err(CBORError::EndOfInput);
    }
    Ok(buf[pos] == (MT_SIMPLE | PAYLOAD_INDEFINITE))
}

fn skip_indefinite_chunks(buf: &[u8], pos: &mut usize, end: usize, mt: u8) -> Result<()> {
    loop {
        if at_break(buf, *pos, end)? {
            *pos += 1;
            return Ok(());
        }
        let hdr = decode_header(buf, *pos)?;
        if hdr.mt != mt || hdr.ai == PAYLOAD_INDEFINITE {
            return Err(CBORError::InvalidType);
        }
        let after_header = pos.checked_add(hdr.hdr_len).ok_or(CBORError::Overflow)?;
        let new_pos = after_header
            .checked_add(hdr.arg as usize)
            .ok_or(CBORError::Overflow)?;
        if new_pos > end {
            return Err(CBORError::EndOfInput);
        }
        *pos = new_pos;
    }
}

/// Skip `count` items (or, if `count` is `None`, items up to and including a break byte) starting
/// at `start`, returning the position immediately following - i.e. the end of the array's
/// contents. Used by the packed-CBOR engine to locate where a table definition's embedded table
/// array ends and its rump begins.
pub(crate) fn skip_array_contents(
    buf: &[u8],
    start: usize,
    count: Option<usize>,
    end: usize,
    limit: usize,
) -> Result<usize> {
    let mut pos = start;
    match count {
        Some(n) => {
            for _ in 0..n {
                skip_item_at(buf, &mut pos, end, limit)?;
            }
        }
        None => {
            while !at_break(buf, pos, end)? {
                skip_item_at(buf, &mut pos, end, limit)?;
            }
            pos += 1;
        }
    }
    Ok(pos)
}

/// A view of the item to actually read: either `self` unchanged (no packed form recognized), or a
/// position possibly inside a different (table) buffer, together with the number of bytes that
/// must be charged against the original cursor's own stream and whether resolution actually
/// crossed into that table (as opposed to merely unwrapping a transparent table-definition
/// wrapper whose rump is the item itself, still in `self`'s own stream).
enum Source<'buf> {
    Direct,
    Resolved(Cursor<'buf>, usize, bool),
}

impl<'buf> Cursor<'buf> {
    #[cfg_attr(feature = "trace", trace)]
    #[cfg_attr(not(feature = "packed"), allow(unused_variables))]
    fn source(&mut self, limit: usize) -> Result<Source<'buf>> {
        #[cfg(feature = "packed")]
        {
            if self.packed_enabled() {
                if let Some((resolved, used, crossed)) = crate::packed::maybe_unpack(&*self, limit)? {
                    return Ok(Source::Resolved(resolved, used, crossed));
                }
            }
        }
        Ok(Source::Direct)
    }

    fn header_at(buf: &[u8], pos: usize, end: usize) -> Result<Header> {
        let hdr = decode_header(buf, pos)?;
        if pos.checked_add(hdr.hdr_len).ok_or(CBORError::Overflow)? > end {
            return Err(CBORError::EndOfInput);
        }
        Ok(hdr)
    }

    /// Advance `self` past a resolved item. A reference that actually crossed into a shared-item
    /// table (`crossed`) is fully accounted for by `used` alone - the reference token is the
    /// entire footprint the item has in `self`'s own stream. Otherwise the item lives in `self`'s
    /// own stream right after whatever table-definition wrappers were transparently unwrapped, so
    /// `self` must additionally skip over the item's own encoding, `item_len` bytes long.
    fn advance_resolved(&mut self, used: usize, crossed: bool, item_len: usize) -> Result<()> {
        let n = if crossed {
            used
        } else {
            used.checked_add(item_len).ok_or(CBORError::Overflow)?
        };
        self.advance(n)
    }

    /// Read an unsigned integer, truncated to `u8`. Fails with `Overflow` if the encoded value
    /// does not fit.
    #[cfg_attr(feature = "trace", trace)]
    pub fn get_u8(&mut self) -> Result<u8> {
        Ok(self.get_u64_checked(u8::MAX as u64)? as u8)
    }

    /// Read an unsigned integer, truncated to `u16`.
    #[cfg_attr(feature = "trace", trace)]
    pub fn get_u16(&mut self) -> Result<u16> {
        Ok(self.get_u64_checked(u16::MAX as u64)? as u16)
    }

    /// Read an unsigned integer, truncated to `u32`.
    #[cfg_attr(feature = "trace", trace)]
    pub fn get_u32(&mut self) -> Result<u32> {
        Ok(self.get_u64_checked(u32::MAX as u64)? as u32)
    }

    /// Read an unsigned 64-bit integer.
    #[cfg_attr(feature = "trace", trace)]
    pub fn get_u64(&mut self) -> Result<u64> {
        self.get_u64_checked(u64::MAX)
    }

    fn get_u64_checked(&mut self, max: u64) -> Result<u64> {
        match self.source(MAX_RECURSION_DEPTH)? {
            Source::Direct => {
                let hdr = Self::header_at(self.buf, self.pos, self.end)?;
                if hdr.mt != MT_UINT {
                    return Err(CBORError::InvalidType);
                }
                if hdr.arg > max {
                    return Err(CBORError::Overflow);
                }
                let len = hdr.hdr_len;
                self.advance(len)?;
                Ok(hdr.arg)
            }
            Source::Resolved(resolved, used, crossed) => {
                let hdr = Self::header_at(resolved.buf, resolved.pos, resolved.end)?;
                if hdr.mt != MT_UINT {
                    return Err(CBORError::InvalidType);
                }
                if hdr.arg > max {
                    return Err(CBORError::Overflow);
                }
                self.advance_resolved(used, crossed, hdr.hdr_len)?;
                Ok(hdr.arg)
            }
        }
    }

    /// Read a signed integer, as `i8`. The most negative representable value of `i8` is not
    /// accepted (for symmetry with the unsigned readers' width check).
    #[cfg_attr(feature = "trace", trace)]
    pub fn get_i8(&mut self) -> Result<i8> {
        Ok(self.get_i64_checked(i8::MAX as i64)? as i8)
    }

    /// Read a signed integer, as `i16`.
    #[cfg_attr(feature = "trace", trace)]
    pub fn get_i16(&mut self) -> Result<i16> {
        Ok(self.get_i64_checked(i16::MAX as i64)? as i16)
    }

    /// Read a signed integer, as `i32`.
    #[cfg_attr(feature = "trace", trace)]
    pub fn get_i32(&mut self) -> Result<i32> {
        Ok(self.get_i64_checked(i32::MAX as i64)? as i32)
    }

    /// Read a signed integer, as `i64`.
    #[cfg_attr(feature = "trace", trace)]
    pub fn get_i64(&mut self) -> Result<i64> {
        self.get_i64_checked(i64::MAX)
    }

    fn get_i64_checked(&mut self, max_magnitude: i64) -> Result<i64> {
        let (hdr, n) = match self.source(MAX_RECURSION_DEPTH)? {
            Source::Direct => {
                let hdr = Self::header_at(self.buf, self.pos, self.end)?;
                let len = hdr.hdr_len;
                (hdr, len)
            }
            Source::Resolved(resolved, used, crossed) => {
                let hdr = Self::header_at(resolved.buf, resolved.pos, resolved.end)?;
                let n = if crossed {
                    used
                } else {
                    used.checked_add(hdr.hdr_len).ok_or(CBORError::Overflow)?
                };
                (hdr, n)
            }
        };
        let value: i64 = match hdr.mt {
            MT_UINT => {
                if hdr.arg > max_magnitude as u64 {
                    return Err(CBORError::Overflow);
                }
                hdr.arg as i64
            }
            MT_NINT => {
                if hdr.arg > (max_magnitude as u64).saturating_sub(1) {
                    return Err(CBORError::Overflow);
                }
                -1 - hdr.arg as i64
            }
            _ => return Err(CBORError::InvalidType),
        };
        self.advance(n)?;
        Ok(value)
    }

    /// Read a byte string, returning a zero-copy slice borrowed from the underlying buffer (or,
    /// if the string was reached via a packed-CBOR reference, from the table that held it).
    /// Indefinite-length byte strings are not reassembled; use `skip` if you only need to pass
    /// over one.
    #[cfg_attr(feature = "trace", trace)]
    pub fn get_bstr(&mut self) -> Result<&'buf [u8]> {
        self.get_str_payload(MT_BSTR)
    }

    /// Read a text string, validating it as UTF-8, returning a zero-copy `&str`.
    #[cfg_attr(feature = "trace", trace)]
    pub fn get_tstr(&mut self) -> Result<&'buf str> {
        let bytes = self.get_str_payload(MT_TSTR)?;
        core::str::from_utf8(bytes).map_err(|_| CBORError::InvalidType)
    }

    fn get_str_payload(&mut self, expect_mt: u8) -> Result<&'buf [u8]> {
        match self.source(MAX_RECURSION_DEPTH)? {
            Source::Direct => {
                let hdr = Self::header_at(self.buf, self.pos, self.end)?;
                if hdr.mt != expect_mt || hdr.ai == PAYLOAD_INDEFINITE {
                    return Err(CBORError::InvalidType);
                }
                let payload = read_extent(self.buf, self.pos + hdr.hdr_len, hdr.arg as usize)?;
                self.advance(hdr.hdr_len + hdr.arg as usize)?;
                Ok(payload)
            }
            Source::Resolved(resolved, used, crossed) => {
                let hdr = Self::header_at(resolved.buf, resolved.pos, resolved.end)?;
                if hdr.mt != expect_mt || hdr.ai == PAYLOAD_INDEFINITE {
                    return Err(CBORError::InvalidType);
                }
                let payload =
                    read_extent(resolved.buf, resolved.pos + hdr.hdr_len, hdr.arg as usize)?;
                let item_len = hdr.hdr_len + hdr.arg as usize;
                self.advance_resolved(used, crossed, item_len)?;
                Ok(payload)
            }
        }
    }

    /// Read a tag number, leaving the cursor positioned at the tagged item (which is not itself
    /// consumed). Tag numbers that do not fit in 32 bits fail with `Overflow`.
    ///
    /// A table-definition wrapper (tag 113) standing at the cursor is itself a packed-CBOR form,
    /// so this goes through `source()` like every other typed reader: a literal, un-resolved tag
    /// byte is only guaranteed once packed resolution has run.
    #[cfg_attr(feature = "trace", trace)]
    pub fn get_tag(&mut self) -> Result<u32> {
        match self.source(MAX_RECURSION_DEPTH)? {
            Source::Direct => {
                let hdr = Self::header_at(self.buf, self.pos, self.end)?;
                if hdr.mt != MT_TAG {
                    return Err(CBORError::InvalidType);
                }
                if hdr.arg > u32::MAX as u64 {
                    return Err(CBORError::Overflow);
                }
                self.advance(hdr.hdr_len)?;
                Ok(hdr.arg as u32)
            }
            Source::Resolved(resolved, used, crossed) => {
                let hdr = Self::header_at(resolved.buf, resolved.pos, resolved.end)?;
                if hdr.mt != MT_TAG {
                    return Err(CBORError::InvalidType);
                }
                if hdr.arg > u32::MAX as u64 {
                    return Err(CBORError::Overflow);
                }
                self.advance_resolved(used, crossed, hdr.hdr_len)?;
                Ok(hdr.arg as u32)
            }
        }
    }

    /// Consume a `null` item.
    #[cfg_attr(feature = "trace", trace)]
    pub fn get_null(&mut self) -> Result<()> {
        self.expect_simple(22)
    }

    /// Consume an `undefined` item.
    #[cfg_attr(feature = "trace", trace)]
    pub fn get_undefined(&mut self) -> Result<()> {
        self.expect_simple(23)
    }

    /// Read a boolean.
    #[cfg_attr(feature = "trace", trace)]
    pub fn get_bool(&mut self) -> Result<bool> {
        match self.source(MAX_RECURSION_DEPTH)? {
            Source::Direct => {
                let hdr = Self::header_at(self.buf, self.pos, self.end)?;
                let v = Self::decode_bool(hdr)?;
                self.advance(hdr.hdr_len)?;
                Ok(v)
            }
            Source::Resolved(resolved, used, crossed) => {
                let hdr = Self::header_at(resolved.buf, resolved.pos, resolved.end)?;
                let v = Self::decode_bool(hdr)?;
                self.advance_resolved(used, crossed, hdr.hdr_len)?;
                Ok(v)
            }
        }
    }

    fn decode_bool(hdr: Header) -> Result<bool> {
        if hdr.mt != MT_SIMPLE {
            return Err(CBORError::InvalidType);
        }
        match hdr.arg {
            20 => Ok(false),
            21 => Ok(true),
            _ => Err(CBORError::InvalidType),
        }
    }

    fn expect_simple(&mut self, expect: u64) -> Result<()> {
        match self.source(MAX_RECURSION_DEPTH)? {
            Source::Direct => {
                let hdr = Self::header_at(self.buf, self.pos, self.end)?;
                if hdr.mt != MT_SIMPLE || hdr.arg != expect {
                    return Err(CBORError::InvalidType);
                }
                self.advance(hdr.hdr_len)
            }
            Source::Resolved(resolved, used, crossed) => {
                let hdr = Self::header_at(resolved.buf, resolved.pos, resolved.end)?;
                if hdr.mt != MT_SIMPLE || hdr.arg != expect {
                    return Err(CBORError::InvalidType);
                }
                self.advance_resolved(used, crossed, hdr.hdr_len)
            }
        }
    }

    /// Read a simple value (major type 7, excluding booleans, null, undefined, and floats). The
    /// reserved additional-information range 24..=31 is rejected with `InvalidType`.
    #[cfg_attr(feature = "trace", trace)]
    pub fn get_simple(&mut self) -> Result<u8> {
        match self.source(MAX_RECURSION_DEPTH)? {
            Source::Direct => {
                let hdr = Self::header_at(self.buf, self.pos, self.end)?;
                let v = Self::decode_simple(hdr)?;
                self.advance(hdr.hdr_len)?;
                Ok(v)
            }
            Source::Resolved(resolved, used, crossed) => {
                let hdr = Self::header_at(resolved.buf, resolved.pos, resolved.end)?;
                let v = Self::decode_simple(hdr)?;
                self.advance_resolved(used, crossed, hdr.hdr_len)?;
                Ok(v)
            }
        }
    }

    fn decode_simple(hdr: Header) -> Result<u8> {
        if hdr.mt != MT_SIMPLE {
            return Err(CBORError::InvalidType);
        }
        if hdr.ai >= PAYLOAD_ONE_BYTE && hdr.ai <= PAYLOAD_INDEFINITE {
            return Err(CBORError::InvalidType);
        }
        if hdr.arg > u8::MAX as u64 {
            return Err(CBORError::Overflow);
        }
        Ok(hdr.arg as u8)
    }

    /// Read a float, widening half- and single-precision values to `f32`. Requires the `float`
    /// feature.
    #[cfg(feature = "float")]
    #[cfg_attr(feature = "trace", trace)]
    pub fn get_f32(&mut self) -> Result<f32> {
        match self.source(MAX_RECURSION_DEPTH)? {
            Source::Direct => {
                let hdr = Self::header_at(self.buf, self.pos, self.end)?;
                let v = Self::decode_f32(hdr)?;
                self.advance(hdr.hdr_len)?;
                Ok(v)
            }
            Source::Resolved(resolved, used, crossed) => {
                let hdr = Self::header_at(resolved.buf, resolved.pos, resolved.end)?;
                let v = Self::decode_f32(hdr)?;
                self.advance_resolved(used, crossed, hdr.hdr_len)?;
                Ok(v)
            }
        }
    }

    #[cfg(feature = "float")]
    fn decode_f32(hdr: Header) -> Result<f32> {
        if hdr.mt != MT_SIMPLE {
            return Err(CBORError::InvalidType);
        }
        match hdr.ai {
            PAYLOAD_TWO_BYTES => Ok(crate::wire::widen_f16_to_f32(hdr.arg)),
            PAYLOAD_FOUR_BYTES => Ok(crate::wire::bits_to_f32(hdr.arg)),
            _ => Err(CBORError::InvalidType),
        }
    }

    /// Read a float, widening half-, single- and double-precision values to `f64`. Requires the
    /// `float` feature.
    #[cfg(feature = "float")]
    #[cfg_attr(feature = "trace", trace)]
    pub fn get_f64(&mut self) -> Result<f64> {
        match self.source(MAX_RECURSION_DEPTH)? {
            Source::Direct => {
                let hdr = Self::header_at(self.buf, self.pos, self.end)?;
                let v = Self::decode_f64(hdr)?;
                self.advance(hdr.hdr_len)?;
                Ok(v)
            }
            Source::Resolved(resolved, used, crossed) => {
                let hdr = Self::header_at(resolved.buf, resolved.pos, resolved.end)?;
                let v = Self::decode_f64(hdr)?;
                self.advance_resolved(used, crossed, hdr.hdr_len)?;
                Ok(v)
            }
        }
    }

    #[cfg(feature = "float")]
    fn decode_f64(hdr: Header) -> Result<f64> {
        if hdr.mt != MT_SIMPLE {
            return Err(CBORError::InvalidType);
        }
        match hdr.ai {
            PAYLOAD_TWO_BYTES => Ok(crate::wire::widen_f16_to_f64(hdr.arg)),
            PAYLOAD_FOUR_BYTES => Ok(crate::wire::bits_to_f32(hdr.arg) as f64),
            PAYLOAD_EIGHT_BYTES => Ok(crate::wire::bits_to_f64(hdr.arg)),
            _ => Err(CBORError::InvalidType),
        }
    }

    /// Read a decimal fraction (tag 4 wrapping a 2-element array `[exponent, mantissa]`),
    /// returning `(exponent, mantissa)` as signed 32-bit integers.
    #[cfg_attr(feature = "trace", trace)]
    pub fn get_decimal_fraction(&mut self) -> Result<(i32, i32)> {
        let tag = self.get_tag()?;
        if tag != 4 {
            return Err(CBORError::InvalidType);
        }
        let mut arr = self.enter_array()?;
        if arr.remaining() != Some(2) {
            return Err(CBORError::InvalidType);
        }
        let exponent = arr.get_i32()?;
        let mantissa = arr.get_i32()?;
        self.leave_container(arr)?;
        Ok((exponent, mantissa))
    }

    /// Skip exactly one item at the current position, recursively. Does not resolve packed-CBOR
    /// references before skipping - see `skip_item_at`'s documentation for why that is both
    /// correct and sufficient.
    #[cfg_attr(feature = "trace", trace)]
    pub fn skip(&mut self) -> Result<()> {
        let mut pos = self.pos;
        skip_item_at(self.buf, &mut pos, self.end, MAX_RECURSION_DEPTH)?;
        let len = pos - self.pos;
        self.advance(len)
    }
}
