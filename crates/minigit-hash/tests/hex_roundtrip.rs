use minigit_hash::hex::{hex_decode, hex_to_string, is_hex_digits};
use minigit_hash::ObjectId;
use proptest::prelude::*;

proptest! {
    #[test]
    fn hex_encode_decode_roundtrip(bytes in proptest::collection::vec(any::<u8>(), 1..64)) {
        let hex = hex_to_string(&bytes);
        let mut decoded = vec![0u8; bytes.len()];
        hex_decode(&hex, &mut decoded).unwrap();
        prop_assert_eq!(&decoded, &bytes);
    }

    #[test]
    fn hex_is_always_lowercase(bytes in proptest::collection::vec(any::<u8>(), 1..64)) {
        let hex = hex_to_string(&bytes);
        prop_assert!(hex.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }

    #[test]
    fn hex_length_is_double(bytes in proptest::collection::vec(any::<u8>(), 1..64)) {
        let hex = hex_to_string(&bytes);
        prop_assert_eq!(hex.len(), bytes.len() * 2);
    }

    #[test]
    fn encoded_hex_is_hex_digits(bytes in proptest::collection::vec(any::<u8>(), 1..64)) {
        prop_assert!(is_hex_digits(&hex_to_string(&bytes)));
    }

    #[test]
    fn oid_hex_roundtrip(bytes in proptest::collection::vec(any::<u8>(), 20..=20)) {
        let oid = ObjectId::from_bytes(&bytes).unwrap();
        let parsed: ObjectId = oid.to_hex().parse().unwrap();
        prop_assert_eq!(oid, parsed);
    }
}
