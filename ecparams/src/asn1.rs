//! ASN.1 structures of explicitly specified `ECParameters` and helpers around rasn's types.
//!
//! Specified in SEC 1 Appendix C.2 and RFC 3279 Section 2.3.5.


use num_bigint::{BigInt, BigUint};
use rasn::{AsnType, Decode, Decoder, Encode};
use rasn::types::{Any, BitString, Integer, ObjectIdentifier, OctetString, Oid};


const TAG_SEQUENCE: u8 = 0x30;


/// The explicit form of `ECParameters`.
///
/// Decoding walks the structure element by element (see [`decode_element`]) so that data following
/// the cofactor or the seed is tolerated; this type is used to encode it and to inspect it in full.
#[derive(AsnType, Clone, Debug, Decode, Encode, Eq, PartialEq)]
pub struct SpecifiedEcDomain {
    pub version: Integer,
    pub field_id: FieldId,
    pub curve: CurveCoefficients,
    pub base: OctetString,
    pub order: Integer,
    pub cofactor: Option<Integer>,
}


/// The field over which the curve is defined.
///
/// For prime fields, `parameters` is the prime as an INTEGER.
#[derive(AsnType, Clone, Debug, Decode, Encode, Eq, PartialEq)]
pub struct FieldId {
    pub field_type: ObjectIdentifier,
    pub parameters: Any,
}


/// The `Curve` element: the coefficients of the Weierstrass equation.
#[derive(AsnType, Clone, Debug, Decode, Encode, Eq, PartialEq)]
pub struct CurveCoefficients {
    pub a: OctetString,
    pub b: OctetString,
    pub seed: Option<BitString>,
}


/// Returns whether the data starts with a SEQUENCE tag.
pub fn is_sequence(data: &[u8]) -> bool {
    data.first() == Some(&TAG_SEQUENCE)
}


/// Decodes the element at the given index of a SEQUENCE that was decoded as `Vec<Any>`.
///
/// A missing element is decoded from empty input, so it fails the same way a truncated one does.
pub fn decode_element<T: Decode>(elements: &[Any], index: usize) -> Result<T, rasn::error::DecodeError> {
    let bytes = elements.get(index)
        .map(|element| element.as_bytes())
        .unwrap_or_default();
    rasn::der::decode(bytes)
}


pub fn integer_from_biguint(value: &BigUint) -> Integer {
    Integer::from(BigInt::from(value.clone()))
}

/// Converts an INTEGER to an unsigned number, or `None` if it is negative.
pub fn biguint_from_integer(value: Integer) -> Option<BigUint> {
    BigInt::from(value).to_biguint()
}


/// Formats an object identifier in dotted decimal notation.
pub fn format_oid(oid: &Oid) -> String {
    let arcs: &[u32] = oid;
    arcs.iter()
        .map(|arc| arc.to_string())
        .collect::<Vec<_>>()
        .join(".")
}

/// Copies a borrowed object identifier into an owned one.
///
/// Returns `None` if the arcs violate the rules for the first two arcs.
pub fn to_owned_oid(oid: &Oid) -> Option<ObjectIdentifier> {
    let arcs: &[u32] = oid;
    ObjectIdentifier::new(arcs.to_vec())
}

/// Compares two object identifiers arc by arc.
pub fn same_oid(left: &Oid, right: &Oid) -> bool {
    let left: &[u32] = left;
    let right: &[u32] = right;
    left == right
}


#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    /// prime256v1 with a seed in the curve SEQUENCE, as written by OpenSSL.
    const PRIME256V1_EXPLICIT: [u8; 250] = hex!("
        3081f7020101302c06072a8648ce3d0101022100ffffffff000000010000000000000000000000
        00ffffffffffffffffffffffff305b0420ffffffff00000001000000000000000000000000ffff
        fffffffffffffffffffc04205ac635d8aa3a93e7b3ebbd55769886bc651d06b0cc53b0f63bce3c
        3e27d2604b031500c49d360886e704936a6678e1139d26b7819f7e900441046b17d1f2e12c4247
        f8bce6e563a440f277037d812deb33a0f4a13945d898c2964fe342e2fe1a7f9b8ee7eb4a7c0f9e
        162bce33576b315ececbb6406837bf51f5022100ffffffff00000000ffffffffffffffffbce6fa
        ada7179e84f3b9cac2fc632551020101
    ");

    #[test]
    fn sequence_detection() {
        assert!(is_sequence(&hex!("3003 020101")));
        assert!(!is_sequence(&hex!("06082A8648CE3D030107")));
        assert!(!is_sequence(&[]));
    }

    #[test]
    fn integer_conversions() {
        let prime = BigUint::from_bytes_be(&hex!("E95E4A5F737059DC60DFC7AD95B3D8139515620F"));
        let integer = integer_from_biguint(&prime);
        // positive values with the top bit set gain a zero byte
        assert_eq!(
            rasn::der::encode(&integer).unwrap(),
            hex!("021500E95E4A5F737059DC60DFC7AD95B3D8139515620F"),
        );
        assert_eq!(biguint_from_integer(integer), Some(prime));

        let negative: Integer = rasn::der::decode(&hex!("0201FF")).unwrap();
        assert_eq!(biguint_from_integer(negative), None);
    }

    #[test]
    fn elements_by_index() {
        let elements: Vec<Any> = rasn::der::decode(&hex!("3007 0402DEAD 020105")).unwrap();
        let octets: OctetString = decode_element(&elements, 0).unwrap();
        assert_eq!(&octets[..], hex!("DEAD"));
        let five: Integer = decode_element(&elements, 1).unwrap();
        assert_eq!(biguint_from_integer(five), Some(BigUint::from(5u8)));

        assert!(decode_element::<Integer>(&elements, 0).is_err());
        assert!(decode_element::<Integer>(&elements, 2).is_err());
    }

    #[test]
    fn specified_domain_structure() {
        let domain: SpecifiedEcDomain = rasn::der::decode(&PRIME256V1_EXPLICIT).unwrap();
        assert_eq!(biguint_from_integer(domain.version.clone()), Some(BigUint::from(1u8)));
        assert!(same_oid(&domain.field_id.field_type, crate::oids::PRIME_FIELD));
        let prime: Integer = rasn::der::decode(domain.field_id.parameters.as_bytes()).unwrap();
        assert_eq!(
            biguint_from_integer(prime),
            Some(BigUint::from_bytes_be(&hex!("FFFFFFFF00000001000000000000000000000000FFFFFFFFFFFFFFFFFFFFFFFF"))),
        );
        assert_eq!(domain.curve.a.len(), 32);
        assert_eq!(domain.curve.seed.as_ref().map(|seed| seed.len()), Some(160));
        assert_eq!(domain.base.len(), 65);
        assert_eq!(domain.cofactor.clone().and_then(biguint_from_integer), Some(BigUint::from(1u8)));

        assert_eq!(rasn::der::encode(&domain).unwrap(), PRIME256V1_EXPLICIT);
    }

    #[test]
    fn object_identifiers() {
        let prime256v1 = Oid::const_new(&[1, 2, 840, 10045, 3, 1, 7]);
        let owned = to_owned_oid(prime256v1).unwrap();
        assert_eq!(rasn::der::encode(&owned).unwrap(), hex!("06082A8648CE3D030107"));
        assert!(same_oid(&owned, prime256v1));
        assert!(!same_oid(&owned, Oid::const_new(&[1, 2, 840, 10045, 3, 1, 1])));
        assert_eq!(format_oid(&owned), "1.2.840.10045.3.1.7");
    }
}
