/***************************************************************************************************
 * Copyright (c) 2020-2022, Qualcomm Innovation Center, Inc. All rights reserved.
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
 * packed_cbor module definition
 *
 * A streaming, zero-copy, zero-allocation CBOR (RFC 8949) decoder and encoder, with optional
 * support for unpacking packed-CBOR encoded data. This implementation is designed for use in
 * constrained systems and requires neither the Rust standard library nor an allocator.
 **************************************************************************************************/

// Default configuration
#![no_std]
#![warn(missing_docs)]

//! # packed_cbor
//!
//! `packed_cbor` is a CBOR implementation aimed at embedded and other memory-constrained targets
//! where the programmer wants low-level control over serialization and deserialization without an
//! allocator. It decodes directly off of a borrowed byte slice: every string or byte string read
//! from the input borrows from it rather than being copied, and container traversal is driven by
//! an explicit cursor rather than an intermediate parsed tree.
//!
//! ## Features
//!
//! - `std` - build against the standard library instead of `core`/`alloc`.
//! - `packed` (default) - enable the packed-CBOR unpacking engine (tag 113 table definitions and
//!   simple-value/tag-6 shared-item references).
//! - `float` (default) - enable half/single/double precision float support.
//! - `full` - `std` + `packed` + `float`, the configuration used to build and run the test suite.
//! - `trace` - enable `func_trace`-based call tracing, for debugging the decoder itself.
//!
//! ## Example
//!
//! ```
//! use packed_cbor::Cursor;
//!
//! fn main() -> Result<(), packed_cbor::CBORError> {
//!     // { 1: "a", 2: "b" }
//!     let bytes: &[u8] = &[0xa2, 0x01, 0x61, 0x61, 0x02, 0x61, 0x62];
//!     let mut cur = Cursor::new(bytes);
//!     let mut map = cur.enter_map()?;
//!     map.lookup_int(2)?;
//!     assert_eq!(map.get_tstr()?, "b");
//!     Ok(())
//! }
//! ```

// Pull in std if we are testing or if it is defined as feature (because we run tests on a
// platform supporting I/O and full feature set.
#[cfg(any(feature = "full", test))]
extern crate std;

// If we are really building no_std, pull in core as well. It is aliased as std so that "use"
// statements are always the same
#[cfg(all(not(feature = "std"), not(test)))]
extern crate core as std;

#[cfg(any(feature = "float", test))]
extern crate half;

pub(crate) mod constants;
pub(crate) mod cursor;
pub(crate) mod decode;
pub(crate) mod encode;
pub(crate) mod map;
#[cfg(feature = "packed")]
pub(crate) mod packed;
pub(crate) mod utils;
pub(crate) mod wire;

/// The `error` module contains error definitions used throughout `packed_cbor`.
pub mod error;

pub use crate::cursor::Cursor;
pub use crate::encode::Encoder;
pub use crate::error::CBORError;
