//! Cryptographic number handling.


pub mod elliptic;


use num_bigint::BigUint;


/// Returns the number of bytes needed to hold the given value, which is at least 1.
///
/// For a group order this is the length of a scalar; for a field prime it is the length of a single
/// coordinate.
pub fn orderlen(value: &BigUint) -> usize {
    let bytes = value.bits().div_ceil(8);
    usize::try_from(bytes)
        .unwrap_or(usize::MAX)
        .max(1)
}


/// Serializes an unsigned integer in big-endian byte order, left-padded with zeroes to the given
/// length.
///
/// Values that do not fit are returned in their shortest encoding.
pub fn number_to_be_bytes(number: &BigUint, length: usize) -> Vec<u8> {
    let bytes = number.to_bytes_be();
    if bytes.len() >= length {
        return bytes;
    }
    let mut ret = vec![0u8; length - bytes.len()];
    ret.extend(&bytes);
    ret
}


pub fn biguint_from_be_slice(slice: &[u8]) -> BigUint {
    BigUint::from_bytes_be(slice)
}


#[cfg(test)]
mod tests {
    use super::{number_to_be_bytes, orderlen};
    use num_bigint::BigUint;

    #[test]
    fn orderlen_rounds_up() {
        assert_eq!(orderlen(&BigUint::from(0u8)), 1);
        assert_eq!(orderlen(&BigUint::from(0xFFu8)), 1);
        assert_eq!(orderlen(&BigUint::from(0x100u16)), 2);
        // P-521 needs 66 bytes
        let p521 = (BigUint::from(1u8) << 521u32) - BigUint::from(1u8);
        assert_eq!(orderlen(&p521), 66);
    }

    #[test]
    fn padding() {
        assert_eq!(number_to_be_bytes(&BigUint::from(0x0102u16), 4), vec![0x00, 0x00, 0x01, 0x02]);
        assert_eq!(number_to_be_bytes(&BigUint::from(0u8), 2), vec![0x00, 0x00]);
        assert_eq!(number_to_be_bytes(&BigUint::from(0x010203u32), 2), vec![0x01, 0x02, 0x03]);
    }
}
