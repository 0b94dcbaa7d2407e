use packed_cbor::{CBORError, Cursor, Encoder};

#[test]
fn encodes_integers_with_the_shortest_width() {
    let mut buf = [0u8; 16];
    let mut enc = Encoder::new(&mut buf);
    enc.put_u64(5).unwrap();
    enc.put_u64(500).unwrap();
    enc.put_i64(-2).unwrap();
    assert_eq!(enc.encoded().unwrap(), &[0x05, 0x19, 0x01, 0xf4, 0x21]);
}

#[test]
fn encodes_strings() {
    let mut buf = [0u8; 16];
    let mut enc = Encoder::new(&mut buf);
    enc.put_tstr("hi").unwrap();
    enc.put_bstr(&[0xde, 0xad]).unwrap();
    assert_eq!(
        enc.encoded().unwrap(),
        &[0x62, b'h', b'i', 0x42, 0xde, 0xad]
    );
}

#[test]
fn encodes_a_definite_length_array() {
    let mut buf = [0u8; 16];
    let mut enc = Encoder::new(&mut buf);
    enc.array_start(Some(3)).unwrap();
    enc.put_u8(1).unwrap();
    enc.put_u8(2).unwrap();
    enc.put_u8(3).unwrap();
    enc.array_end(Some(3)).unwrap();
    assert_eq!(enc.encoded().unwrap(), &[0x83, 0x01, 0x02, 0x03]);
}

#[test]
fn encodes_an_indefinite_length_map() {
    let mut buf = [0u8; 16];
    let mut enc = Encoder::new(&mut buf);
    enc.map_start(None).unwrap();
    enc.put_u8(1).unwrap();
    enc.put_tstr("a").unwrap();
    enc.map_end(None).unwrap();
    assert_eq!(
        enc.encoded().unwrap(),
        &[0xbf, 0x01, 0x61, b'a', 0xff]
    );
}

#[test]
fn encoded_output_round_trips_through_the_decoder() {
    let mut buf = [0u8; 32];
    let mut enc = Encoder::new(&mut buf);
    enc.array_start(Some(2)).unwrap();
    enc.put_decimal_fraction(-2, 27315).unwrap();
    enc.put_bool(true).unwrap();
    enc.array_end(Some(2)).unwrap();

    let encoded = enc.encoded().unwrap().to_vec();
    let mut cur = Cursor::new(&encoded);
    let mut arr = cur.enter_array().unwrap();
    assert_eq!(arr.get_decimal_fraction().unwrap(), (-2, 27315));
    assert_eq!(arr.get_bool().unwrap(), true);
    assert!(arr.at_end());
}

#[test]
fn overflowing_the_buffer_fails_but_keeps_accounting() {
    let mut buf = [0u8; 2];
    let mut enc = Encoder::new(&mut buf);
    assert!(enc.put_tstr("hello").is_err());
    assert_eq!(enc.needed(), 6);
    assert!(matches!(enc.encoded(), Err(CBORError::EndOfInput)));
}

#[cfg(feature = "float")]
#[test]
fn encodes_floats_at_requested_precision() {
    let mut buf = [0u8; 16];
    let mut enc = Encoder::new(&mut buf);
    enc.put_f16(1.5).unwrap();
    enc.put_f32(2.5).unwrap();
    enc.put_f64(3.5).unwrap();
    assert_eq!(
        enc.encoded().unwrap(),
        &[
            0xf9, 0x3e, 0x00, 0xfa, 0x40, 0x20, 0x00, 0x00, 0xfb, 0x40, 0x0c, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00,
        ]
    );
}
