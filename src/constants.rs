/***************************************************************************************************
 * Copyright (c) 2020-2022 Qualcomm Innovation Center, Inc. All rights reserved.
 *
 * Permission is hereby granted, free of charge, to any person obtaining a copy of this software
 * and associated documentation files (the “Software”), to deal in the Software without
 * restriction, including without limitation the rights to use, copy, modify, merge, publish,
 * distribute, sublicense, and/or sell copies of the Software, and to permit persons to whom the
 * Software is furnished to do so, subject to the following conditions:
 *
 * The above copyright notice and this permission notice shall be included in all copies or
 * substantial portions of the Software.
 *
 * THE SOFTWARE IS PROVIDED “AS IS”, WITHOUT WARRANTY OF ANY KIND, EXPRESS OR IMPLIED, INCLUDING
 * BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
 * NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM,
 * DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
 * OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.
 **************************************************************************************************/
/***************************************************************************************************
 * packed_cbor wire constants
 *
 * A fairly comprehensive, memory efficient, deserializer and serializer for CBOR (RFC8949),
 * including support for unpacking packed-CBOR encoded data. This implementation is designed for
 * use in constrained systems and requires neither the Rust standard library nor an allocator.
 **************************************************************************************************/

/// Additional Information bitmask
pub const AI_MASK: u8 = 0b000_11111;

/// Major Type 0 (Positive integers)
pub const MT_UINT: u8 = 0b000_00000;
/// Major Type 1 (Negative integers)
pub const MT_NINT: u8 = 0b001_00000;
/// Major Type 2 (Byte Strings)
pub const MT_BSTR: u8 = 0b010_00000;
/// Major Type 3 (Text Strings)
pub const MT_TSTR: u8 = 0b011_00000;
/// Major Type 4 (Array)
pub const MT_ARRAY: u8 = 0b100_00000;
/// Major Type 5 (Map)
pub const MT_MAP: u8 = 0b101_00000;
/// Major Type 6 (Tag)
pub const MT_TAG: u8 = 0b110_00000;
/// Major Type 7 (Floats, simple types etc.)
pub const MT_SIMPLE: u8 = 0b111_00000;
/// Alias of `MT_SIMPLE` - major type 7 also carries floating point values.
pub const MT_FLOAT: u8 = 0b111_00000;

/// Maximum value of a "simple" payload mapped directly onto the AI bits.
pub const PAYLOAD_AI_BITS: u8 = 23;
/// Indicates one byte of argument follows the initial byte.
pub const PAYLOAD_ONE_BYTE: u8 = 24;
/// Indicates two bytes of argument follow the initial byte.
pub const PAYLOAD_TWO_BYTES: u8 = 25;
/// Indicates four bytes of argument follow the initial byte.
pub const PAYLOAD_FOUR_BYTES: u8 = 26;
/// Indicates eight bytes of argument follow the initial byte.
pub const PAYLOAD_EIGHT_BYTES: u8 = 27;
/// Indicates an indefinite-length item (arrays, maps, byte/text strings) or the "break" stop
/// code for major type 7.
pub const PAYLOAD_INDEFINITE: u8 = 31;

/// `major_type(byte)` extracts the 3-bit major type from an initial byte, left in place (not
/// shifted down) so it can be compared directly against the `MT_*` constants above.
#[inline]
pub const fn major_type(byte: u8) -> u8 {
    byte & !AI_MASK
}

/// `additional_info(byte)` extracts the 5-bit additional-information field from an initial byte.
#[inline]
pub const fn additional_info(byte: u8) -> u8 {
    byte & AI_MASK
}

/// The tag number used by packed CBOR to introduce a table definition: a 2-element array of
/// `[table, rump]`.
pub const TAG_PACKED_TABLE: u64 = 113;

/// Simple values 0..=15 address the first 16 shared-item slots directly.
pub const PACKED_SIMPLE_REF_MAX: u8 = 15;

/// The first shared-item index addressable only via a tag-6 wrapped integer (see
/// `packed::reference_index`).
pub const PACKED_TAG_REF_BASE: u64 = 16;

/// Maximum number of active tables that may be simultaneously in scope on a single cursor. This
/// bounds the memory a packed-CBOR-enabled `Cursor` occupies regardless of how deeply table
/// definitions nest.
pub const MAX_ACTIVE_TABLES: usize = 4;

/// Maximum recursion depth for `skip` and for packed-CBOR unpacking. Also the mechanism by which
/// a cyclic packed-CBOR reference is defeated, rather than causing unbounded recursion.
pub const MAX_RECURSION_DEPTH: usize = 16;
