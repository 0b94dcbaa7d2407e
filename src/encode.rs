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
 * packed_cbor encoder
 *
 * A zero-allocation, append-only CBOR writer over a caller-supplied buffer. Unlike the decoder,
 * the encoder does not support packed-CBOR: callers who want a packed representation build it
 * themselves by writing tag 113 and the reference forms directly.
 *
 * Array and map lengths must be known up front (or the container written as indefinite-length and
 * terminated with `array_end`/`map_end`), so there is no backpatching of a length field once
 * contents have already been written - this keeps the encoder allocation-free and single-pass.
 **************************************************************************************************/
use crate::constants::*;
use crate::error::{CBORError, Result};

#[cfg(feature = "trace")]
use func_trace::trace;

#[cfg(feature = "trace")]
func_trace::init_depth_var!();

/// An append-only CBOR writer over `buf`.
///
/// Every `put_*` method still advances the internal accounting even once the buffer is full,
/// so that [`Encoder::needed`] reports the total size a large enough buffer would have required -
/// useful for sizing a buffer on a constrained target without encoding twice.
pub struct Encoder<'buf> {
    buf: &'buf mut [u8],
    pos: usize,
    needed: usize,
}

impl<'buf> Encoder<'buf> {
    /// Construct an encoder writing into `buf`, starting at the beginning.
    #[cfg_attr(feature = "trace", trace)]
    pub fn new(buf: &'buf mut [u8]) -> Self {
        Encoder {
            buf,
            pos: 0,
            needed: 0,
        }
    }

    /// Number of bytes written so far (bounded by the buffer's capacity).
    #[inline]
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Total number of bytes that have been requested, including any that did not fit. Compare
    /// against the buffer's capacity to discover how large a buffer this encoding would need.
    #[inline]
    pub fn needed(&self) -> usize {
        self.needed
    }

    /// Return the bytes written so far. Fails with `EndOfInput` if any write since construction
    /// did not fit in the buffer.
    #[cfg_attr(feature = "trace", trace)]
    pub fn encoded(&self) -> Result<&[u8]> {
        if self.needed > self.buf.len() {
            return Err(CBORError::EndOfInput);
        }
        Ok(&self.buf[..self.pos])
    }

    fn put_byte(&mut self, val: u8) -> Result<()> {
        self.needed += 1;
        if self.pos < self.buf.len() {
            self.buf[self.pos] = val;
            self.pos += 1;
            Ok(())
        } else {
            Err(CBORError::EndOfInput)
        }
    }

    fn put_slice(&mut self, src: &[u8]) -> Result<()> {
        self.needed += src.len();
        let end = self.pos.checked_add(src.len()).ok_or(CBORError::Overflow)?;
        if end <= self.buf.len() {
            self.buf[self.pos..end].copy_from_slice(src);
            self.pos = end;
            Ok(())
        } else {
            // Still account for whatever room remains, then fail.
            let room = self.buf.len().saturating_sub(self.pos);
            self.pos += room;
            Err(CBORError::EndOfInput)
        }
    }

    /// Write a major-type/argument header using the shortest encoding RFC 8949 allows for `arg`.
    fn put_header(&mut self, mt: u8, arg: u64) -> Result<()> {
        if arg <= PAYLOAD_AI_BITS as u64 {
            self.put_byte(mt | arg as u8)
        } else if arg <= u8::MAX as u64 {
            self.put_byte(mt | PAYLOAD_ONE_BYTE)?;
            self.put_byte(arg as u8)
        } else if arg <= u16::MAX as u64 {
            self.put_byte(mt | PAYLOAD_TWO_BYTES)?;
            self.put_slice(&(arg as u16).to_be_bytes())
        } else if arg <= u32::MAX as u64 {
            self.put_byte(mt | PAYLOAD_FOUR_BYTES)?;
            self.put_slice(&(arg as u32).to_be_bytes())
        } else {
            self.put_byte(mt | PAYLOAD_EIGHT_BYTES)?;
            self.put_slice(&arg.to_be_bytes())
        }
    }

    /// Write an unsigned integer using the shortest encoding that represents it.
    #[cfg_attr(feature = "trace", trace)]
    pub fn put_u64(&mut self, v: u64) -> Result<()> {
        self.put_header(MT_UINT, v)
    }

    /// Write an unsigned integer.
    #[cfg_attr(feature = "trace", trace)]
    pub fn put_u32(&mut self, v: u32) -> Result<()> {
        self.put_u64(v as u64)
    }

    /// Write an unsigned integer.
    #[cfg_attr(feature = "trace", trace)]
    pub fn put_u16(&mut self, v: u16) -> Result<()> {
        self.put_u64(v as u64)
    }

    /// Write an unsigned integer.
    #[cfg_attr(feature = "trace", trace)]
    pub fn put_u8(&mut self, v: u8) -> Result<()> {
        self.put_u64(v as u64)
    }

    /// Write a signed integer, choosing major type 0 or 1 and the shortest argument width.
    #[cfg_attr(feature = "trace", trace)]
    pub fn put_i64(&mut self, v: i64) -> Result<()> {
        if v >= 0 {
            self.put_header(MT_UINT, v as u64)
        } else {
            self.put_header(MT_NINT, (-1 - v) as u64)
        }
    }

    /// Write a signed integer.
    #[cfg_attr(feature = "trace", trace)]
    pub fn put_i32(&mut self, v: i32) -> Result<()> {
        self.put_i64(v as i64)
    }

    /// Write a signed integer.
    #[cfg_attr(feature = "trace", trace)]
    pub fn put_i16(&mut self, v: i16) -> Result<()> {
        self.put_i64(v as i64)
    }

    /// Write a signed integer.
    #[cfg_attr(feature = "trace", trace)]
    pub fn put_i8(&mut self, v: i8) -> Result<()> {
        self.put_i64(v as i64)
    }

    /// Write a definite-length byte string.
    #[cfg_attr(feature = "trace", trace)]
    pub fn put_bstr(&mut self, v: &[u8]) -> Result<()> {
        self.put_header(MT_BSTR, v.len() as u64)?;
        self.put_slice(v)
    }

    /// Write a definite-length text string.
    #[cfg_attr(feature = "trace", trace)]
    pub fn put_tstr(&mut self, v: &str) -> Result<()> {
        self.put_header(MT_TSTR, v.len() as u64)?;
        self.put_slice(v.as_bytes())
    }

    /// Write a tag number, to be immediately followed by the tagged item.
    #[cfg_attr(feature = "trace", trace)]
    pub fn put_tag(&mut self, tag: u32) -> Result<()> {
        self.put_header(MT_TAG, tag as u64)
    }

    /// Write `null`.
    #[cfg_attr(feature = "trace", trace)]
    pub fn put_null(&mut self) -> Result<()> {
        self.put_byte(MT_SIMPLE | 22)
    }

    /// Write `undefined`.
    #[cfg_attr(feature = "trace", trace)]
    pub fn put_undefined(&mut self) -> Result<()> {
        self.put_byte(MT_SIMPLE | 23)
    }

    /// Write a boolean.
    #[cfg_attr(feature = "trace", trace)]
    pub fn put_bool(&mut self, v: bool) -> Result<()> {
        self.put_byte(MT_SIMPLE | if v { 21 } else { 20 })
    }

    /// Write a simple value (major type 7, excluding booleans, null, undefined, and floats). The
    /// reserved additional-information range 24..=31 is rejected with `InvalidType`.
    #[cfg_attr(feature = "trace", trace)]
    pub fn put_simple(&mut self, v: u8) -> Result<()> {
        if (24..=31).contains(&v) {
            return Err(CBORError::InvalidType);
        }
        self.put_header(MT_SIMPLE, v as u64)
    }

    /// Write a single-precision float.
    #[cfg(feature = "float")]
    #[cfg_attr(feature = "trace", trace)]
    pub fn put_f32(&mut self, v: f32) -> Result<()> {
        self.put_byte(MT_FLOAT | PAYLOAD_FOUR_BYTES)?;
        self.put_slice(&v.to_be_bytes())
    }

    /// Write a double-precision float.
    #[cfg(feature = "float")]
    #[cfg_attr(feature = "trace", trace)]
    pub fn put_f64(&mut self, v: f64) -> Result<()> {
        self.put_byte(MT_FLOAT | PAYLOAD_EIGHT_BYTES)?;
        self.put_slice(&v.to_be_bytes())
    }

    /// Write `v` narrowed to half precision.
    #[cfg(feature = "float")]
    #[cfg_attr(feature = "trace", trace)]
    pub fn put_f16(&mut self, v: f32) -> Result<()> {
        self.put_byte(MT_FLOAT | PAYLOAD_TWO_BYTES)?;
        self.put_slice(&crate::wire::narrow_f32_to_f16_bits(v).to_be_bytes())
    }

    /// Write a decimal fraction (tag 4 wrapping `[exponent, mantissa]`).
    #[cfg_attr(feature = "trace", trace)]
    pub fn put_decimal_fraction(&mut self, exponent: i32, mantissa: i32) -> Result<()> {
        self.put_tag(4)?;
        self.array_start(Some(2))?;
        self.put_i32(exponent)?;
        self.put_i32(mantissa)?;
        self.array_end(Some(2))
    }

    /// Begin an array. `count` fixes a definite length; `None` starts an indefinite-length array,
    /// which must be closed with `array_end(None)`.
    #[cfg_attr(feature = "trace", trace)]
    pub fn array_start(&mut self, count: Option<usize>) -> Result<()> {
        match count {
            Some(n) => self.put_header(MT_ARRAY, n as u64),
            None => self.put_byte(MT_ARRAY | PAYLOAD_INDEFINITE),
        }
    }

    /// Close an array begun with `array_start`. `count` must match what was passed to
    /// `array_start`: for a definite-length array nothing further is written; for an
    /// indefinite-length array the break byte is written.
    #[cfg_attr(feature = "trace", trace)]
    pub fn array_end(&mut self, count: Option<usize>) -> Result<()> {
        match count {
            Some(_) => Ok(()),
            None => self.put_byte(MT_SIMPLE | PAYLOAD_INDEFINITE),
        }
    }

    /// Begin a map. `pairs` fixes a definite number of key/value pairs; `None` starts an
    /// indefinite-length map, which must be closed with `map_end(None)`.
    #[cfg_attr(feature = "trace", trace)]
    pub fn map_start(&mut self, pairs: Option<usize>) -> Result<()> {
        match pairs {
            Some(n) => self.put_header(MT_MAP, n as u64),
            None => self.put_byte(MT_MAP | PAYLOAD_INDEFINITE),
        }
    }

    /// Close a map begun with `map_start`, mirroring `array_end`.
    #[cfg_attr(feature = "trace", trace)]
    pub fn map_end(&mut self, pairs: Option<usize>) -> Result<()> {
        match pairs {
            Some(_) => Ok(()),
            None => self.put_byte(MT_SIMPLE | PAYLOAD_INDEFINITE),
        }
    }
}
