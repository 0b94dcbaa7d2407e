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
 * packed_cbor map key lookup
 *
 * Linear-scan lookup of a key within a map a cursor has already entered via `enter_map`. There is
 * no pre-parsed map representation: each candidate key is read directly off the wire and, on a
 * mismatch, its value is skipped structurally before moving on to the next key.
 **************************************************************************************************/
use crate::cursor::Cursor;
use crate::error::{CBORError, Result};

#[cfg(feature = "trace")]
use func_trace::trace;

#[cfg(feature = "trace")]
func_trace::init_depth_var!();

impl<'buf> Cursor<'buf> {
    /// Search a map `self` has already entered for a text-string key equal to `key`. On success,
    /// `self` is left positioned at the corresponding value. On `NotFound`, `self` is left at the
    /// end of the map, as if every key had been examined. A key that is not itself a text string
    /// is not a match; it and its value are skipped structurally rather than aborting the search.
    #[cfg_attr(feature = "trace", trace)]
    pub fn lookup_tstr(&mut self, key: &str) -> Result<()> {
        while !self.at_end() {
            match self.get_tstr() {
                Ok(item_key) => {
                    if item_key == key {
                        return Ok(());
                    }
                    self.skip()?;
                }
                Err(CBORError::InvalidType) => {
                    self.skip()?;
                    self.skip()?;
                }
                Err(e) => return Err(e),
            }
        }
        Err(CBORError::NotFound)
    }

    /// Search a map `self` has already entered for an integer key equal to `key`. On success,
    /// `self` is left positioned at the corresponding value. On `NotFound`, `self` is left at the
    /// end of the map, as if every key had been examined. A key that is not itself an integer is
    /// not a match; it and its value are skipped structurally rather than aborting the search.
    #[cfg_attr(feature = "trace", trace)]
    pub fn lookup_int(&mut self, key: i64) -> Result<()> {
        while !self.at_end() {
            match self.get_i64() {
                Ok(item_key) => {
                    if item_key == key {
                        return Ok(());
                    }
                    self.skip()?;
                }
                Err(CBORError::InvalidType) => {
                    self.skip()?;
                    self.skip()?;
                }
                Err(e) => return Err(e),
            }
        }
        Err(CBORError::NotFound)
    }
}
