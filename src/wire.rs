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
 * packed_cbor wire-level primitives
 *
 * Free functions operating directly on a byte slice: decoding the major-type/argument header and
 * widening floats. These have no notion of a cursor or of containers - that is `cursor.rs`'s job.
 **************************************************************************************************/
use crate::constants::*;
use crate::error::{CBORError, Result};

#[cfg(feature = "trace")]
use func_trace::trace;

#[cfg(feature = "trace")]
func_trace::init_depth_var!();

/// The initial byte's major type together with the decoded argument and the number of header
/// bytes (initial byte + any following argument bytes) consumed.
#[derive(Debug, Copy, Clone)]
pub(crate) struct Header {
    pub mt: u8,
    pub ai: u8,
    pub arg: u64,
    pub hdr_len: usize,
}

/// Decode the initial byte and, if present, the following big-endian argument, from `buf[start..]`.
/// Does not interpret payload bytes (string/array/map contents); the caller advances past those
/// itself once it knows their length.
///
/// `ai == PAYLOAD_INDEFINITE` is returned as-is (arg is meaningless in that case) - callers that
/// do not accept indefinite-length items must check for it themselves.
#[cfg_attr(feature = "trace", trace)]
pub(crate) fn decode_header(buf: &[u8], start: usize) -> Result<Header> {
    if start >= buf.len() {
        return Err(CBORError::EndOfInput);
    }
    let initial = buf[start];
    let mt = major_type(initial);
    let ai = additional_info(initial);

    match ai {
        0..=0x17 => Ok(Header {
            mt,
            ai,
            arg: ai as u64,
            hdr_len: 1,
        }),
        _ if ai == PAYLOAD_ONE_BYTE => {
            let v = *buf.get(start + 1).ok_or(CBORError::EndOfInput)?;
            Ok(Header {
                mt,
                ai,
                arg: v as u64,
                hdr_len: 2,
            })
        }
        _ if ai == PAYLOAD_TWO_BYTES => {
            let bytes = read_extent(buf, start + 1, 2)?;
            Ok(Header {
                mt,
                ai,
                arg: u16::from_be_bytes([bytes[0], bytes[1]]) as u64,
                hdr_len: 3,
            })
        }
        _ if ai == PAYLOAD_FOUR_BYTES => {
            let bytes = read_extent(buf, start + 1, 4)?;
            Ok(Header {
                mt,
                ai,
                arg: u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as u64,
                hdr_len: 5,
            })
        }
        _ if ai == PAYLOAD_EIGHT_BYTES => {
            let bytes = read_extent(buf, start + 1, 8)?;
            let mut b = [0u8; 8];
            b.copy_from_slice(bytes);
            Ok(Header {
                mt,
                ai,
                arg: u64::from_be_bytes(b),
                hdr_len: 9,
            })
        }
        _ if ai == PAYLOAD_INDEFINITE => Ok(Header {
            mt,
            ai,
            arg: 0,
            hdr_len: 1,
        }),
        _ => Err(CBORError::InvalidType),
    }
}

/// Return `buf[start..start+len]`, or `EndOfInput` if that range runs past `buf`.
#[cfg_attr(feature = "trace", trace)]
#[inline]
pub(crate) fn read_extent(buf: &[u8], start: usize, len: usize) -> Result<&[u8]> {
    if !crate::utils::within(buf, start, len) {
        return Err(CBORError::EndOfInput);
    }
    Ok(&buf[start..start + len])
}

/// Widen a half-precision float argument (as decoded into a `u64` by `decode_header`, `hdr_len`
/// having indicated a 2-byte argument) to `f32`.
#[cfg(feature = "float")]
#[cfg_attr(feature = "trace", trace)]
pub(crate) fn widen_f16_to_f32(bits: u64) -> f32 {
    half::f16::from_bits(bits as u16).to_f32()
}

/// Widen a half-precision float argument to `f64`.
#[cfg(feature = "float")]
#[cfg_attr(feature = "trace", trace)]
pub(crate) fn widen_f16_to_f64(bits: u64) -> f64 {
    half::f16::from_bits(bits as u16).to_f64()
}

/// Reinterpret a single-precision float argument (4-byte) as `f32`.
#[cfg(feature = "float")]
#[cfg_attr(feature = "trace", trace)]
pub(crate) fn bits_to_f32(bits: u64) -> f32 {
    f32::from_bits(bits as u32)
}

/// Reinterpret a double-precision float argument (8-byte) as `f64`.
#[cfg(feature = "float")]
#[cfg_attr(feature = "trace", trace)]
pub(crate) fn bits_to_f64(bits: u64) -> f64 {
    f64::from_bits(bits)
}

/// Narrow an `f32` to its half-precision wire bits, for the encoder.
#[cfg(feature = "float")]
#[cfg_attr(feature = "trace", trace)]
pub(crate) fn narrow_f32_to_f16_bits(v: f32) -> u16 {
    half::f16::from_f32(v).to_bits()
}

/// Narrow an `f64` to its half-precision wire bits, for the encoder.
#[cfg(feature = "float")]
#[cfg_attr(feature = "trace", trace)]
pub(crate) fn narrow_f64_to_f16_bits(v: f64) -> u16 {
    half::f16::from_f64(v).to_bits()
}
