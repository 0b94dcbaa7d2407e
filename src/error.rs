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
 * packed_cbor error API
 *
 * A fairly comprehensive, memory efficient, deserializer and serializer for CBOR (RFC8949),
 * including support for unpacking packed-CBOR encoded data. This implementation is designed for
 * use in constrained systems and requires neither the Rust standard library nor an allocator.
 **************************************************************************************************/
use core::result;

#[cfg(any(feature = "full", test))]
use thiserror::Error;

/// An alias for `Result<T, CBORError>` used throughout this crate.
pub type Result<T> = result::Result<T, CBORError>;

/// `CBORError` enumerates every way decoding or encoding can fail. No variant carries data beyond
/// what is needed to describe the failure; callers that need to report a byte offset should use
/// `Cursor::pos` at the point the error was returned rather than expect it bundled into the error.
#[cfg_attr(any(feature = "full", test), derive(Copy, Clone, Error, Debug))]
#[cfg_attr(all(not(feature = "full"), not(test)), derive(Copy, Clone, Debug))]
pub enum CBORError {
    /// A decoded value does not fit the requested target width, a declared length does not fit
    /// `usize`, or a tag number does not fit in 32 bits.
    #[cfg_attr(any(feature = "full", test), error("Value does not fit the requested width"))]
    Overflow,
    /// The item at the cursor is not of the expected major type or shape.
    #[cfg_attr(any(feature = "full", test), error("Item is not of the expected type"))]
    InvalidType,
    /// The operation would read past the end of the input, past a container's declared item
    /// count, or (encoding) past the destination buffer's capacity.
    #[cfg_attr(any(feature = "full", test), error("Attempt to read or write past the end of the buffer"))]
    EndOfInput,
    /// Map key lookup reached the end of the map without finding a match.
    #[cfg_attr(any(feature = "full", test), error("Requested key was not found in the map"))]
    NotFound,
    /// The recursion bound for `skip` or for packed-CBOR unpacking was exhausted. Used both for
    /// legitimately deep input and to terminate packed-CBOR reference cycles.
    #[cfg_attr(any(feature = "full", test), error("Recursion limit exceeded"))]
    Recursion,
    /// A packed-CBOR construct is malformed: wrong tag content shape, a table element that is
    /// not an array, or a table-definition array that does not have exactly two elements.
    #[cfg_attr(any(feature = "full", test), error("Packed-CBOR construct is malformed"))]
    PackedFormat,
    /// Installing a new active table would exceed the fixed bound on simultaneously active
    /// tables.
    #[cfg_attr(any(feature = "full", test), error("No space left to install another packed-CBOR table"))]
    PackedMemory,
    /// A packed-CBOR reference index exceeds the total capacity of all tables currently in
    /// scope.
    #[cfg_attr(any(feature = "full", test), error("Packed-CBOR reference index has no corresponding table entry"))]
    PackedUndefinedReference,
}
