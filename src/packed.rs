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
 * packed_cbor packed-CBOR unpacking engine
 *
 * Transparently resolves packed-CBOR shared-item references and table definitions, as described
 * by the packed-CBOR draft, on top of the plain CBOR cursor in `cursor.rs`. This implementation is
 * designed for use in constrained systems and requires neither the Rust standard library nor an
 * allocator. Requires the `packed` feature.
 **************************************************************************************************/
use crate::constants::*;
use crate::cursor::{flags, ActiveTable, Cursor};
use crate::decode::skip_array_contents;
use crate::error::{CBORError, Result};
use crate::wire::decode_header;

#[cfg(feature = "trace")]
use func_trace::trace;

#[cfg(feature = "trace")]
func_trace::init_depth_var!();

/// If the item at `cur`'s current position is a packed-CBOR reference or table-definition chain,
/// follow it to the plain item it ultimately denotes and return `Some((resolved, used, crossed))`,
/// where `used` is the number of bytes the whole chain occupies in `cur`'s own stream (the bytes
/// `cur` itself must be advanced by), and `crossed` is true only if resolution actually followed a
/// simple-value or tag-6 reference into a shared-item table (as opposed to merely unwrapping one
/// or more tag-113 table-definition wrappers whose rump is a literal item in `cur`'s own stream).
/// Returns `None` if `cur` is not standing on any recognized packed form, in which case the caller
/// should decode directly from `cur`.
///
/// Recursion (following a reference whose target is itself another reference, or chained table
/// definitions) is bounded by `limit`; a chain that does not terminate within `limit` steps fails
/// with `Recursion`, which is also how a reference cycle is defeated.
#[cfg_attr(feature = "trace", trace)]
pub(crate) fn maybe_unpack<'buf>(
    cur: &Cursor<'buf>,
    mut limit: usize,
) -> Result<Option<(Cursor<'buf>, usize, bool)>> {
    let mut probe = *cur;
    let mut used = 0usize;
    let mut in_self_stream = true;
    let mut touched = false;

    loop {
        if probe.pos >= probe.end {
            break;
        }
        let byte = probe.byte_at(probe.pos)?;
        let mt = major_type(byte);
        let ai = additional_info(byte);

        if mt == MT_TAG {
            let hdr = decode_header(probe.buf, probe.pos)?;
            if hdr.arg == TAG_PACKED_TABLE {
                if limit == 0 {
                    return Err(CBORError::Recursion);
                }
                limit -= 1;
                touched = true;
                let before = probe.pos;
                consume_table_definition(&mut probe, limit)?;
                if in_self_stream {
                    used += probe.pos - before;
                }
                continue;
            } else if hdr.arg == 6 {
                if limit == 0 {
                    return Err(CBORError::Recursion);
                }
                limit -= 1;
                touched = true;
                let before = probe.pos;
                let index = consume_tag_reference(&mut probe, hdr.hdr_len)?;
                if in_self_stream {
                    used += probe.pos - before;
                }
                resolve_index(&mut probe, index)?;
                in_self_stream = false;
                continue;
            }
            break;
        } else if mt == MT_SIMPLE && ai <= PACKED_SIMPLE_REF_MAX {
            if limit == 0 {
                return Err(CBORError::Recursion);
            }
            limit -= 1;
            touched = true;
            let index = ai as u64;
            if in_self_stream {
                used += 1;
            }
            probe.pos += 1;
            resolve_index(&mut probe, index)?;
            in_self_stream = false;
            continue;
        }
        break;
    }

    if touched {
        Ok(Some((probe, used, !in_self_stream)))
    } else {
        Ok(None)
    }
}

/// Consume a tag-6-wrapped integer reference form from `probe`'s own stream, returning the
/// resolved shared-item index per the packed-CBOR draft's numbering: a non-negative argument `n`
/// maps to `16 + 2n`; a negative argument `-1-u` maps to `16 + 2u + 1`.
fn consume_tag_reference<'buf>(probe: &mut Cursor<'buf>, tag_hdr_len: usize) -> Result<u64> {
    let int_pos = probe.pos + tag_hdr_len;
    let int_hdr = decode_header(probe.buf, int_pos).map_err(|_| CBORError::PackedFormat)?;
    let index = match int_hdr.mt {
        MT_UINT => PACKED_TAG_REF_BASE
            .checked_add(int_hdr.arg.checked_mul(2).ok_or(CBORError::Overflow)?)
            .ok_or(CBORError::Overflow)?,
        MT_NINT => {
            let doubled = int_hdr.arg.checked_mul(2).ok_or(CBORError::Overflow)?;
            PACKED_TAG_REF_BASE
                .checked_add(1)
                .and_then(|b| b.checked_add(doubled))
                .ok_or(CBORError::Overflow)?
        }
        _ => return Err(CBORError::PackedFormat),
    };
    probe.pos = int_pos + int_hdr.hdr_len;
    Ok(index)
}

/// Consume a packed-CBOR table definition (tag 113 wrapping `[table, rump]`) from `probe`'s own
/// stream: install `table` as a new active table and leave `probe` positioned at `rump`.
fn consume_table_definition<'buf>(probe: &mut Cursor<'buf>, limit: usize) -> Result<()> {
    let tag_hdr = decode_header(probe.buf, probe.pos).map_err(|_| CBORError::PackedFormat)?;
    let mut pos = probe.pos + tag_hdr.hdr_len;

    let outer_hdr = decode_header(probe.buf, pos).map_err(|_| CBORError::PackedFormat)?;
    if outer_hdr.mt != MT_ARRAY || outer_hdr.ai == PAYLOAD_INDEFINITE || outer_hdr.arg != 2 {
        return Err(CBORError::PackedFormat);
    }
    pos += outer_hdr.hdr_len;

    let table_hdr = decode_header(probe.buf, pos).map_err(|_| CBORError::PackedFormat)?;
    if table_hdr.mt != MT_ARRAY {
        return Err(CBORError::PackedFormat);
    }
    let table_start = pos + table_hdr.hdr_len;
    let table_count = if table_hdr.ai == PAYLOAD_INDEFINITE {
        None
    } else {
        Some(table_hdr.arg as usize)
    };
    let table_end = skip_array_contents(probe.buf, table_start, table_count, probe.end, limit)?;

    if probe.active_count >= MAX_ACTIVE_TABLES {
        return Err(CBORError::PackedMemory);
    }
    probe.tables[probe.active_count] = Some(ActiveTable {
        buf: probe.buf,
        start: table_start,
        end: table_end,
        count: table_count,
    });
    probe.active_count += 1;

    probe.pos = table_end;
    Ok(())
}

/// Resolve shared-item `index` against `probe`'s active-table stack, walking from the innermost
/// (most recently installed) table outward, and reposition `probe` at the referenced item. The
/// resolving cursor's table stack is restricted to the prefix up to and including the table that
/// contained the index, per the packed-CBOR draft.
fn resolve_index<'buf>(probe: &mut Cursor<'buf>, mut index: u64) -> Result<()> {
    for slot in (0..probe.active_count).rev() {
        let table = probe.tables[slot].expect("active_count bounds valid tables");
        let size = table_len(&table)?;
        if index < size as u64 {
            let item_pos = nth_item_pos(table.buf, table.start, index as usize, table.end)?;
            probe.buf = table.buf;
            probe.pos = item_pos;
            probe.end = table.end;
            for i in (slot + 1)..MAX_ACTIVE_TABLES {
                probe.tables[i] = None;
            }
            probe.active_count = slot + 1;
            probe.remaining = None;
            probe.flags &= flags::PACKED_ENABLED;
            return Ok(());
        }
        index -= size as u64;
    }
    Err(CBORError::PackedUndefinedReference)
}

fn table_len(table: &ActiveTable) -> Result<usize> {
    match table.count {
        Some(n) => Ok(n),
        None => {
            let mut pos = table.start;
            let mut n = 0usize;
            loop {
                if pos >= table.end {
                    return Err(CBORError::PackedFormat);
                }
                if table.buf[pos] == (MT_SIMPLE | PAYLOAD_INDEFINITE) {
                    return Ok(n);
                }
                crate::decode::skip_item_at(table.buf, &mut pos, table.end, MAX_RECURSION_DEPTH)?;
                n += 1;
            }
        }
    }
}

fn nth_item_pos(buf: &[u8], start: usize, n: usize, end: usize) -> Result<usize> {
    let mut pos = start;
    for _ in 0..n {
        crate::decode::skip_item_at(buf, &mut pos, end, MAX_RECURSION_DEPTH)?;
    }
    Ok(pos)
}
