//! # Decode Table
//!
//! Flat lookup from the next `max_length` stream bits to `(symbol, length)`.
//! Entries are packed as `(symbol << 8) | length`; a zero entry marks bit
//! patterns no code produces.

/// Packs a decode entry.
#[inline]
#[must_use]
pub const fn pack_entry(symbol: u8, length: u8) -> u16 {
    ((symbol as u16) << 8) | length as u16
}

/// Splits a packed entry (encode or decode) into its high and low bytes.
#[inline]
#[must_use]
pub const fn unpack_entry(entry: u16) -> (u8, u8) {
    ((entry >> 8) as u8, entry as u8)
}

/// Fills `table` (`2^max_length` slots) from bit-reversed codes.
///
/// A code `C` of length `L` owns every slot whose low `L` bits equal `C`:
/// `C, C + 2^L, C + 2*2^L, ...`.
///
/// # Panics
///
/// Panics if `table` is not exactly `2^max_length` long or a code is longer
/// than `max_length`.
pub fn build_decode_table(lengths: &[u8], codes: &[u16], max_length: u8, table: &mut [u16]) {
    let size = 1usize << max_length;
    assert_eq!(table.len(), size, "decode table size");
    table.fill(0);

    for (symbol, (&length, &code)) in lengths.iter().zip(codes).enumerate() {
        if length == 0 {
            continue;
        }
        assert!(length <= max_length, "symbol {symbol} has length {length}");
        let entry = pack_entry(symbol as u8, length);
        let step = 1usize << length;
        let mut index = code as usize;
        while index < size {
            table[index] = entry;
            index += step;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::huffman::canonical::canonical_codes;

    #[test]
    fn test_every_slot_resolves() {
        let lengths = [2, 3, 3, 3, 4, 4, 4, 5, 5, 5, 6, 6, 6, 6, 6, 6];
        let codes = canonical_codes(&lengths);
        let mut table = vec![0u16; 64];
        build_decode_table(&lengths, &codes, 6, &mut table);

        // Complete code: no empty slot
        assert!(table.iter().all(|&e| e != 0));

        for (symbol, (&len, &code)) in lengths.iter().zip(&codes).enumerate() {
            let (sym, got_len) = unpack_entry(table[code as usize]);
            assert_eq!(sym as usize, symbol);
            assert_eq!(got_len, len);
            // Junk in the unused high bits must not change the answer
            let junk = code as usize | ((0b10_1010 << len) & 63);
            assert_eq!(unpack_entry(table[junk]), (symbol as u8, len));
        }
    }

    #[test]
    fn test_incomplete_code_leaves_gaps() {
        let lengths = [1];
        let codes = canonical_codes(&lengths);
        let mut table = vec![0xFFFFu16; 4];
        build_decode_table(&lengths, &codes, 2, &mut table);
        assert_eq!(table, vec![pack_entry(0, 1), 0, pack_entry(0, 1), 0]);
    }
}
