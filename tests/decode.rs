use packed_cbor::{CBORError, Cursor};

#[test]
fn indefinite_length_array_of_uints() {
    // [_ 1, 2]
    let bytes: &[u8] = &[0x9f, 0x01, 0x02, 0xff];
    let mut cur = Cursor::new(bytes);
    let mut arr = cur.enter_array().unwrap();
    assert!(arr.is_indefinite());
    assert_eq!(arr.get_u8().unwrap(), 1);
    assert_eq!(arr.get_u8().unwrap(), 2);
    assert!(arr.at_end());
    cur.leave_container(arr).unwrap();
    assert_eq!(cur.pos(), bytes.len());
}

#[test]
fn map_with_nested_empty_arrays() {
    // { 1: [], 2: [] }
    let bytes: &[u8] = &[0xa2, 0x01, 0x80, 0x02, 0x80];
    let mut cur = Cursor::new(bytes);
    let mut map = cur.enter_map().unwrap();
    assert_eq!(map.remaining(), Some(4));

    assert_eq!(map.get_u8().unwrap(), 1);
    let inner = map.enter_array().unwrap();
    assert_eq!(inner.remaining(), Some(0));
    map.leave_container(inner).unwrap();

    assert_eq!(map.get_u8().unwrap(), 2);
    let inner = map.enter_array().unwrap();
    map.leave_container(inner).unwrap();

    assert!(map.at_end());
    cur.leave_container(map).unwrap();
}

#[test]
fn tag_chain() {
    // 100(200(5))
    let bytes: &[u8] = &[0xd8, 0x64, 0xd8, 0xc8, 0x05];
    let mut cur = Cursor::new(bytes);
    assert_eq!(cur.get_tag().unwrap(), 100);
    assert_eq!(cur.get_tag().unwrap(), 200);
    assert_eq!(cur.get_u8().unwrap(), 5);
}

#[test]
fn decimal_fraction() {
    // 4([-2, 27315])  ==  273.15
    let bytes: &[u8] = &[0xc4, 0x82, 0x21, 0x19, 0x6a, 0xb3];
    let mut cur = Cursor::new(bytes);
    assert_eq!(cur.get_decimal_fraction().unwrap(), (-2, 27315));
}

#[test]
fn lookup_tstr_finds_value_and_leaves_cursor_positioned() {
    // { "a": 1, "b": 2 }
    let bytes: &[u8] = &[0xa2, 0x61, 0x61, 0x01, 0x61, 0x62, 0x02];
    let mut cur = Cursor::new(bytes);
    let mut map = cur.enter_map().unwrap();
    map.lookup_tstr("b").unwrap();
    assert_eq!(map.get_u8().unwrap(), 2);
}

#[test]
fn lookup_int_not_found() {
    // { 1: "x" }
    let bytes: &[u8] = &[0xa1, 0x01, 0x61, 0x78];
    let mut cur = Cursor::new(bytes);
    let mut map = cur.enter_map().unwrap();
    let err = map.lookup_int(2).unwrap_err();
    assert!(matches!(err, CBORError::NotFound));
}

#[test]
fn lookup_tstr_skips_a_non_text_key_and_its_value() {
    // { 1: "x", "b": 2 }
    let bytes: &[u8] = &[0xa2, 0x01, 0x61, b'x', 0x61, b'b', 0x02];
    let mut cur = Cursor::new(bytes);
    let mut map = cur.enter_map().unwrap();
    map.lookup_tstr("b").unwrap();
    assert_eq!(map.get_u8().unwrap(), 2);
}

#[test]
fn lookup_int_skips_a_non_int_key_and_its_value() {
    // { "a": 1, 2: "y" }
    let bytes: &[u8] = &[0xa2, 0x61, b'a', 0x01, 0x02, 0x61, b'y'];
    let mut cur = Cursor::new(bytes);
    let mut map = cur.enter_map().unwrap();
    map.lookup_int(2).unwrap();
    assert_eq!(map.get_tstr().unwrap(), "y");
}

#[test]
fn skip_passes_over_a_nested_structure() {
    // [[1, 2], "after"]
    let bytes: &[u8] = &[0x82, 0x82, 0x01, 0x02, 0x65, 0x61, 0x66, 0x74, 0x65, 0x72];
    let mut cur = Cursor::new(bytes);
    let mut arr = cur.enter_array().unwrap();
    arr.skip().unwrap();
    assert_eq!(arr.get_tstr().unwrap(), "after");
}

#[test]
fn bool_null_undefined_simple() {
    let bytes: &[u8] = &[0xf5, 0xf4, 0xf6, 0xf7, 0xe7];
    let mut cur = Cursor::new(bytes);
    assert_eq!(cur.get_bool().unwrap(), true);
    assert_eq!(cur.get_bool().unwrap(), false);
    cur.get_null().unwrap();
    cur.get_undefined().unwrap();
    assert_eq!(cur.get_simple().unwrap(), 7);
}

#[cfg(feature = "float")]
#[test]
fn floats_of_every_width_widen_correctly() {
    // half(1.5), single(2.5), double(3.5)
    let bytes: &[u8] = &[
        0xf9, 0x3e, 0x00, 0xfa, 0x40, 0x20, 0x00, 0x00, 0xfb, 0x40, 0x0c, 0x00, 0x00, 0x00, 0x00,
        0x00, 0x00,
    ];
    let mut cur = Cursor::new(bytes);
    assert_eq!(cur.get_f32().unwrap(), 1.5f32);
    assert_eq!(cur.get_f32().unwrap(), 2.5f32);
    assert_eq!(cur.get_f64().unwrap(), 3.5f64);
}

#[test]
fn wrong_major_type_is_invalid_type() {
    let bytes: &[u8] = &[0x61, 0x61]; // tstr "a", not a uint
    let mut cur = Cursor::new(bytes);
    assert!(matches!(cur.get_u8(), Err(CBORError::InvalidType)));
}

#[test]
fn truncated_argument_is_end_of_input() {
    let bytes: &[u8] = &[0x19, 0x01]; // two-byte uint header missing its second byte
    let mut cur = Cursor::new(bytes);
    assert!(matches!(cur.get_u16(), Err(CBORError::EndOfInput)));
}

#[test]
fn value_too_wide_for_target_is_overflow() {
    let bytes: &[u8] = &[0x19, 0x01, 0x00]; // 256, does not fit in a u8
    let mut cur = Cursor::new(bytes);
    assert!(matches!(cur.get_u8(), Err(CBORError::Overflow)));
}

#[test]
fn negative_integer_round_trips() {
    let bytes: &[u8] = &[0x21]; // -2
    let mut cur = Cursor::new(bytes);
    assert_eq!(cur.get_i8().unwrap(), -2);
}

#[test]
fn byte_string_is_borrowed_without_copying() {
    let bytes: &[u8] = &[0x44, 0xde, 0xad, 0xbe, 0xef];
    let mut cur = Cursor::new(bytes);
    assert_eq!(cur.get_bstr().unwrap(), &[0xde, 0xad, 0xbe, 0xef]);
}
