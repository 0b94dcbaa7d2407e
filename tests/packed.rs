#![cfg(feature = "packed")]

use packed_cbor::{CBORError, Cursor};

#[test]
fn table_definition_followed_by_simple_value_reference() {
    // 113([["hello", "world"], 0])  -- table def whose rump is a direct reference to slot 0
    let bytes: &[u8] = &[
        0xd8, 0x71, // tag 113
        0x82, // outer array, 2 elements: [table, rump]
        0x82, // table array, 2 elements
        0x65, b'h', b'e', b'l', b'l', b'o', // "hello"
        0x65, b'w', b'o', b'r', b'l', b'd', // "world"
        0xe0, // rump: simple(0) -> slot 0
    ];
    let mut cur = Cursor::new_packed(bytes);
    assert_eq!(cur.get_tstr().unwrap(), "hello");
    assert_eq!(cur.pos(), bytes.len());
}

#[test]
fn table_definition_resolves_a_container_reference() {
    // 113([[[1, 2, 3]], 0]) -- rump references slot 0, which holds an array
    let bytes: &[u8] = &[
        0xd8, 0x71, // tag 113
        0x82, // outer array
        0x81, // table array, 1 element
        0x83, 0x01, 0x02, 0x03, // the table's only entry: [1, 2, 3]
        0xe0, // rump: simple(0)
    ];
    let mut cur = Cursor::new_packed(bytes);
    let mut arr = cur.enter_array().unwrap();
    assert_eq!(arr.get_u8().unwrap(), 1);
    assert_eq!(arr.get_u8().unwrap(), 2);
    assert_eq!(arr.get_u8().unwrap(), 3);
    assert!(arr.at_end());
    cur.leave_container(arr).unwrap();
    assert_eq!(cur.pos(), bytes.len());
}

#[test]
fn table_definition_with_a_literal_rump_container_advances_normally() {
    // 113([[1], [2, 3]]) -- the rump is a literal array, not a reference, so the bytes it and the
    // table definition occupy all belong to the cursor's own stream.
    let bytes: &[u8] = &[0xd8, 0x71, 0x82, 0x81, 0x01, 0x82, 0x02, 0x03];
    let mut cur = Cursor::new_packed(bytes);
    let mut arr = cur.enter_array().unwrap();
    assert_eq!(arr.get_u8().unwrap(), 2);
    assert_eq!(arr.get_u8().unwrap(), 3);
    assert!(arr.at_end());
    cur.leave_container(arr).unwrap();
    assert_eq!(cur.pos(), bytes.len());
}

#[test]
fn reference_cycle_is_rejected_as_recursion() {
    // 113([[0], 0]) -- the table's only entry is itself a reference back to slot 0
    let bytes: &[u8] = &[
        0xd8, 0x71, // tag 113
        0x82, // outer array
        0x81, // table array, 1 element
        0xe0, // entry 0: simple(0), a self-reference
        0xe0, // rump: simple(0)
    ];
    let mut cur = Cursor::new_packed(bytes);
    assert!(matches!(cur.get_u8(), Err(CBORError::Recursion)));
}

#[test]
fn reference_past_table_end_is_undefined_reference() {
    // 113([[7], 6(5)]) -- rump references slot 16 + 2*5 = 26, but the table only has 1 slot
    let bytes: &[u8] = &[
        0xd8, 0x71, // tag 113
        0x82, // outer array
        0x81, 0xe7, // table array, 1 element: simple(7)
        0xc6, 0x05, // rump: tag 6(5)
    ];
    let mut cur = Cursor::new_packed(bytes);
    assert!(matches!(
        cur.get_u8(),
        Err(CBORError::PackedUndefinedReference)
    ));
}

#[test]
fn table_definition_wrapping_a_tagged_value_unwraps_before_reading_the_tag() {
    // 113([[1], 4([-2, 27315])]) -- the rump is a decimal fraction standing behind a
    // table-definition wrapper; get_tag must see tag 4, not the literal tag 113 byte.
    let bytes: &[u8] = &[
        0xd8, 0x71, 0x82, 0x81, 0x01, 0xc4, 0x82, 0x21, 0x19, 0x6a, 0xb3,
    ];
    let mut cur = Cursor::new_packed(bytes);
    assert_eq!(cur.get_decimal_fraction().unwrap(), (-2, 27315));
    assert_eq!(cur.pos(), bytes.len());
}

#[test]
fn externally_supplied_table_resolves_simple_value_references() {
    let table: &[u8] = &[0x82, 0x61, b'x', 0x61, b'y']; // ["x", "y"]
    let bytes: &[u8] = &[0xe1]; // simple(1) -> slot 1 -> "y"
    let mut cur = Cursor::new_packed_with_table(bytes, table).unwrap();
    assert_eq!(cur.get_tstr().unwrap(), "y");
}

#[test]
fn tag_six_reference_addresses_slots_beyond_the_first_sixteen() {
    // 113([[10, 11, ...16 entries..., 99], 6(0)]) -- 6(0) addresses slot 16 + 2*0 = 16
    let mut table_items = alloc_table();
    table_items.extend_from_slice(&[0x18, 0x63]); // 99, the 17th entry (index 16)
    let table_len = 17u8;

    let mut bytes = vec![0xd8, 0x71, 0x82];
    bytes.push(0x80 | table_len); // table array header, 17 elements (fits on the AI bits)
    bytes.extend_from_slice(&table_items);
    bytes.extend_from_slice(&[0xc6, 0x00]); // rump: tag 6(0)

    let mut cur = Cursor::new_packed(&bytes);
    assert_eq!(cur.get_u8().unwrap(), 99);
}

fn alloc_table() -> Vec<u8> {
    // 16 simple(0) filler entries so the 17th entry lands at index 16.
    let mut v = Vec::new();
    for _ in 0..16 {
        v.push(0xe0);
    }
    v
}
