//! Signer-bitmap encoding (spec §4.4): bit `i` is little-endian within
//! its byte — byte `i/8`, bit `i%8`.

/// Encodes the sorted-or-unsorted set of roster indices `idx` (each
/// `< n`) into a bitmap exactly `ceil(n/8)` bytes long.
pub fn encode_sealers_bitmap(idx: &[u32], n: usize) -> Vec<u8> {
    let mut bytes = vec![0u8; n.div_ceil(8)];
    for &i in idx {
        let i = i as usize;
        assert!(i < n, "signer index {i} out of range for roster of size {n}");
        bytes[i / 8] |= 1 << (i % 8);
    }
    bytes
}

/// Decodes a bitmap into the ascending-sorted set of roster indices
/// `< n` whose bit is set. Bytes beyond `ceil(n/8)` are ignored; a
/// shorter-than-expected bitmap is treated as zero-padded.
pub fn decode_sealers_bitmap(bytes: &[u8], n: usize) -> Vec<u32> {
    let mut out = Vec::new();
    for i in 0..n {
        let byte = bytes.get(i / 8).copied().unwrap_or(0);
        if byte & (1 << (i % 8)) != 0 {
            out.push(i as u32);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_for_arbitrary_subsets() {
        let n = 37;
        for idx in [
            vec![],
            vec![0],
            vec![36],
            vec![0, 1, 2, 7, 8, 15, 16, 36],
            (0..n as u32).collect::<Vec<_>>(),
        ] {
            let bitmap = encode_sealers_bitmap(&idx, n);
            let mut expected = idx.clone();
            expected.sort_unstable();
            expected.dedup();
            assert_eq!(decode_sealers_bitmap(&bitmap, n), expected);
        }
    }

    #[test]
    fn bitmap_length_is_exactly_ceil_n_over_8() {
        assert_eq!(encode_sealers_bitmap(&[], 1).len(), 1);
        assert_eq!(encode_sealers_bitmap(&[], 8).len(), 1);
        assert_eq!(encode_sealers_bitmap(&[], 9).len(), 2);
        assert_eq!(encode_sealers_bitmap(&[], 0).len(), 0);
    }

    #[test]
    fn bit_position_is_little_endian_within_byte() {
        let bitmap = encode_sealers_bitmap(&[0], 8);
        assert_eq!(bitmap, vec![0b0000_0001]);
        let bitmap = encode_sealers_bitmap(&[7], 8);
        assert_eq!(bitmap, vec![0b1000_0000]);
    }

    proptest::proptest! {
        #[test]
        fn round_trips_for_any_subset_of_any_roster_size(
            n in 1usize..200,
            raw_idx in proptest::collection::vec(0u32..200, 0..50),
        ) {
            let idx: Vec<u32> = raw_idx.into_iter().filter(|&i| (i as usize) < n).collect();
            let bitmap = encode_sealers_bitmap(&idx, n);
            let mut expected = idx.clone();
            expected.sort_unstable();
            expected.dedup();
            proptest::prop_assert_eq!(decode_sealers_bitmap(&bitmap, n), expected);
        }
    }
}
