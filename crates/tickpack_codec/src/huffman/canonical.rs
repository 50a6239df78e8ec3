//! # Canonical Codes
//!
//! Assigns canonical Huffman codes from code lengths and stores them
//! bit-reversed, since the streams shift bits in least-significant first.

/// Reverses the low `length` bits of `code`.
#[inline]
#[must_use]
pub const fn reverse_bits(code: u16, length: u8) -> u16 {
    if length == 0 {
        return 0;
    }
    code.reverse_bits() >> (16 - length as u32)
}

/// Returns the bit-reversed canonical code of every symbol.
///
/// Symbols are numbered by (length, symbol): shorter codes first and, within
/// one length, in symbol order. Symbols with length 0 get code 0 and are
/// never emitted.
///
/// # Panics
///
/// Panics if a length exceeds 15 bits.
#[must_use]
pub fn canonical_codes(lengths: &[u8]) -> Vec<u16> {
    let max_length = lengths.iter().copied().max().unwrap_or(0);
    assert!(max_length <= 15, "code length {max_length}");

    let mut length_count = [0u16; 16];
    for &len in lengths.iter().filter(|&&len| len > 0) {
        length_count[len as usize] += 1;
    }

    let mut next_code = [0u16; 16];
    let mut code = 0u16;
    for len in 1..=max_length as usize {
        code = (code + length_count[len - 1]) << 1;
        next_code[len] = code;
    }
    // length_count[0] is always 0 for the loop above
    debug_assert!(next_code[1] == 0);

    lengths
        .iter()
        .map(|&len| {
            if len == 0 {
                return 0;
            }
            let assigned = next_code[len as usize];
            next_code[len as usize] += 1;
            reverse_bits(assigned, len)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reverse_bits() {
        assert_eq!(reverse_bits(0b101, 3), 0b101);
        assert_eq!(reverse_bits(0b1100, 4), 0b0011);
        assert_eq!(reverse_bits(0b1000_0000, 8), 0b0000_0001);
        assert_eq!(reverse_bits(0, 0), 0);
    }

    #[test]
    fn test_rfc1951_example() {
        // RFC 1951 section 3.2.2: lengths (3,3,3,3,3,2,4,4) give
        // F=00 A=010 B=011 C=100 D=101 E=110 G=1110 H=1111
        let lengths = [3, 3, 3, 3, 3, 2, 4, 4];
        let expected = [0b010, 0b011, 0b100, 0b101, 0b110, 0b00, 0b1110, 0b1111];
        let codes = canonical_codes(&lengths);
        for (sym, (&code, &len)) in codes.iter().zip(&lengths).enumerate() {
            assert_eq!(code, reverse_bits(expected[sym], len), "symbol {sym}");
        }
    }

    #[test]
    fn test_unused_symbols() {
        let codes = canonical_codes(&[0, 1, 0, 1]);
        assert_eq!(codes, vec![0, 0, 0, 1]);
    }

    #[test]
    fn test_codes_are_prefix_free() {
        let lengths = [2, 3, 3, 3, 4, 4, 4, 5, 5, 5, 6, 6, 6, 6, 6, 6];
        let codes = canonical_codes(&lengths);
        for a in 0..lengths.len() {
            for b in 0..lengths.len() {
                if a == b || lengths[a] > lengths[b] {
                    continue;
                }
                // Reversed codes: prefix becomes a match on the low bits
                let mask = (1u16 << lengths[a]) - 1;
                assert_ne!(codes[b] & mask, codes[a], "{a} is a prefix of {b}");
            }
        }
    }
}
