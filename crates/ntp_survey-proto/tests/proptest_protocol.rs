// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

use ntp_survey_proto::protocol::{Packet, ReferenceId, Stratum};
use ntp_survey_proto::refid;
use proptest::prelude::*;

proptest! {
    #[test]
    fn decode_header_never_panics(buf in proptest::collection::vec(any::<u8>(), 0..96)) {
        let _ = Packet::from_wire(&buf);
    }

    #[test]
    fn decoded_header_reencodes_identically(buf in proptest::collection::vec(any::<u8>(), 48..64)) {
        if let Ok(packet) = Packet::from_wire(&buf) {
            let wire = packet.to_wire().unwrap();
            prop_assert_eq!(&wire[..], &buf[..48]);
        }
    }

    #[test]
    fn secondary_refid_always_has_four_octets(octets in any::<[u8; 4]>(), stratum in 2u8..=254) {
        let text = refid::decode(ReferenceId(octets), Stratum(stratum)).unwrap();
        prop_assert_eq!(text.split('.').count(), 4);
    }

    #[test]
    fn primary_refid_is_label_or_error(octets in any::<[u8; 4]>(), stratum in 0u8..=1) {
        match refid::decode(ReferenceId(octets), Stratum(stratum)) {
            Ok(label) => prop_assert!(label.len() <= 4 && label.is_ascii()),
            Err(refid::RefIdError::NonPrintable { octets: raw }) => prop_assert_eq!(raw, octets),
            Err(other) => prop_assert!(false, "unexpected error {other}"),
        }
    }
}
