//! Elliptic-curve domain parameters and their `ECParameters` encoding.
//!
//! The structure is defined in RFC 3279 Section 2.3.5 and SEC 1 Appendix C.2:
//!
//! ```plain
//! ECParameters ::= CHOICE {
//!     namedCurve OBJECT IDENTIFIER,
//!     specifiedCurve SpecifiedECDomain,
//!     -- implicitCurve NULL is not supported
//! }
//!
//! SpecifiedECDomain ::= SEQUENCE {
//!     version INTEGER { ecpVer1(1) },
//!     fieldID FieldID {{FieldTypes}},
//!     curve Curve,
//!     base ECPoint,
//!     order INTEGER,
//!     cofactor INTEGER OPTIONAL,
//! }
//!
//! FieldID ::= SEQUENCE { fieldType OBJECT IDENTIFIER, parameters ANY DEFINED BY fieldType }
//! Curve ::= SEQUENCE { a FieldElement, b FieldElement, seed BIT STRING OPTIONAL }
//! ```


use std::fmt;
use std::sync::Arc;

use num_bigint::{BigInt, BigUint};
use num_traits::Zero;
use rasn::types::{Any, Integer, ObjectIdentifier, OctetString, Oid};

use crate::asn1::{
    biguint_from_integer, decode_element, format_oid, integer_from_biguint, same_oid, to_owned_oid,
    CurveCoefficients, FieldId, SpecifiedEcDomain,
};
use crate::crypt::{biguint_from_be_slice, number_to_be_bytes, orderlen};
use crate::crypt::elliptic::{CurveError, Generator, PointEncoding, PointError, PrimeWeierstrassCurve};
use crate::oids;
use crate::pem::{self, PemError};
use crate::registry::{curves, CurveRegistry};


/// The PEM label for `ECParameters`.
pub const PEM_LABEL: &str = "EC PARAMETERS";

/// The name given to curves that do not match any registered curve.
pub const UNKNOWN_NAME: &str = "unknown";

/// The point encodings accepted for the base point of explicitly specified curves.
const BASE_POINT_ENCODINGS: [PointEncoding; 3] = [
    PointEncoding::Uncompressed, PointEncoding::Compressed, PointEncoding::Hybrid,
];


/// The two forms of `ECParameters` that are supported.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum ParameterEncoding {
    /// Only the object identifier of the curve.
    NamedCurve,

    /// The full set of curve parameters.
    Explicit,
}
impl ParameterEncoding {
    pub const ALL: [ParameterEncoding; 2] = [ParameterEncoding::NamedCurve, ParameterEncoding::Explicit];

    pub const fn name(&self) -> &'static str {
        match self {
            Self::NamedCurve => "named_curve",
            Self::Explicit => "explicit",
        }
    }
}
impl fmt::Display for ParameterEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}


/// A structure after which no further data may follow.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Element {
    ObjectIdentifier,
    EcParameters,
    FieldPrime,
}
impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ObjectIdentifier => write!(f, "OID"),
            Self::EcParameters => write!(f, "ECParameters structure"),
            Self::FieldPrime => write!(f, "ECParameters fieldID.Prime-p element"),
        }
    }
}


/// The parameters are well-formed but describe a curve that cannot be handled.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum UnknownCurve {
    /// The named-curve form was requested for a curve without an object identifier.
    NoOid,
    CharacteristicTwoField,
    UnknownFieldType { oid: ObjectIdentifier },
    UnknownOid { oid: ObjectIdentifier, known: Vec<String> },
    UnknownName { name: String, known: Vec<String> },
}
impl fmt::Display for UnknownCurve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoOid
                => write!(f, "curve has no OID and cannot be encoded in named_curve form"),
            Self::CharacteristicTwoField
                => write!(f, "characteristic 2 curves are not supported"),
            Self::UnknownFieldType { oid }
                => write!(f, "unknown field type: {}", format_oid(oid)),
            Self::UnknownOid { oid, known }
                => write!(f, "I don't know about the curve with oid {}. I only know about these: {}", format_oid(oid), known.join(", ")),
            Self::UnknownName { name, known }
                => write!(f, "I don't know about the curve named {:?}. I only know about these: {}", name, known.join(", ")),
        }
    }
}
impl std::error::Error for UnknownCurve {
}


/// The encoding is structurally invalid.
#[derive(Debug)]
pub enum MalformedEncoding {
    Der(rasn::error::DecodeError),
    DerEncoding(rasn::error::EncodeError),
    TrailingData { after: Element },
    UnsupportedVersion { version: BigInt },
    NegativeInteger,
    InvalidCurve(CurveError),
    InvalidPoint(PointError),
    InvalidOid { arcs: Vec<u32> },
    DisallowedEncoding { encoding: ParameterEncoding },
    Pem(PemError),
}
impl fmt::Display for MalformedEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Der(e)
                => write!(f, "DER decoding failed: {}", e),
            Self::DerEncoding(e)
                => write!(f, "DER encoding failed: {}", e),
            Self::TrailingData { after }
                => write!(f, "unexpected data after {}", after),
            Self::UnsupportedVersion { version }
                => write!(f, "unknown parameter encoding format version {}", version),
            Self::NegativeInteger
                => write!(f, "negative INTEGER in curve parameters"),
            Self::InvalidCurve(e)
                => write!(f, "invalid curve parameters: {}", e),
            Self::InvalidPoint(e)
                => write!(f, "invalid base point: {}", e),
            Self::InvalidOid { arcs }
                => write!(f, "invalid curve OID {:?}", arcs),
            Self::DisallowedEncoding { encoding }
                => write!(f, "{} curve parameters not allowed", encoding),
            Self::Pem(e)
                => write!(f, "PEM decoding failed: {}", e),
        }
    }
}
impl std::error::Error for MalformedEncoding {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Der(e) => Some(e),
            Self::DerEncoding(e) => Some(e),
            Self::TrailingData { .. } => None,
            Self::UnsupportedVersion { .. } => None,
            Self::NegativeInteger => None,
            Self::InvalidCurve(e) => Some(e),
            Self::InvalidPoint(e) => Some(e),
            Self::InvalidOid { .. } => None,
            Self::DisallowedEncoding { .. } => None,
            Self::Pem(e) => Some(e),
        }
    }
}
impl From<rasn::error::DecodeError> for MalformedEncoding {
    fn from(value: rasn::error::DecodeError) -> Self { Self::Der(value) }
}
impl From<rasn::error::EncodeError> for MalformedEncoding {
    fn from(value: rasn::error::EncodeError) -> Self { Self::DerEncoding(value) }
}
impl From<CurveError> for MalformedEncoding {
    fn from(value: CurveError) -> Self { Self::InvalidCurve(value) }
}
impl From<PointError> for MalformedEncoding {
    fn from(value: PointError) -> Self { Self::InvalidPoint(value) }
}
impl From<PemError> for MalformedEncoding {
    fn from(value: PemError) -> Self { Self::Pem(value) }
}


#[derive(Debug)]
pub enum Error {
    UnknownCurve(UnknownCurve),
    MalformedEncoding(MalformedEncoding),
}
impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownCurve(e) => write!(f, "unknown curve: {}", e),
            Self::MalformedEncoding(e) => write!(f, "malformed encoding: {}", e),
        }
    }
}
impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::UnknownCurve(e) => Some(e),
            Self::MalformedEncoding(e) => Some(e),
        }
    }
}
impl From<UnknownCurve> for Error {
    fn from(value: UnknownCurve) -> Self { Self::UnknownCurve(value) }
}
impl From<MalformedEncoding> for Error {
    fn from(value: MalformedEncoding) -> Self { Self::MalformedEncoding(value) }
}
impl From<rasn::error::DecodeError> for Error {
    fn from(value: rasn::error::DecodeError) -> Self { Self::MalformedEncoding(value.into()) }
}
impl From<rasn::error::EncodeError> for Error {
    fn from(value: rasn::error::EncodeError) -> Self { Self::MalformedEncoding(value.into()) }
}
impl From<CurveError> for Error {
    fn from(value: CurveError) -> Self { Self::MalformedEncoding(value.into()) }
}
impl From<PointError> for Error {
    fn from(value: PointError) -> Self { Self::MalformedEncoding(value.into()) }
}
impl From<PemError> for Error {
    fn from(value: PemError) -> Self { Self::MalformedEncoding(value.into()) }
}


fn unsigned(value: Integer) -> Result<BigUint, MalformedEncoding> {
    biguint_from_integer(value)
        .ok_or(MalformedEncoding::NegativeInteger)
}

pub(crate) fn invalid_oid(oid: &Oid) -> MalformedEncoding {
    let arcs: &[u32] = oid;
    MalformedEncoding::InvalidOid { arcs: arcs.to_vec() }
}


/// An elliptic curve together with its generator and identifying metadata.
///
/// Two curves are equal if their curve parameters and generator points are equal; name, OpenSSL
/// name and OID do not take part in the comparison.
#[derive(Clone, Debug)]
pub struct Curve {
    name: String,
    openssl_name: Option<String>,
    curve: PrimeWeierstrassCurve,
    generator: Generator,
    baselen: usize,
    verifying_key_length: usize,
    signature_length: usize,
    oid: Option<ObjectIdentifier>,
    encoded_oid: Option<Vec<u8>>,
}
impl Curve {
    pub fn new(
        name: impl Into<String>,
        curve: PrimeWeierstrassCurve,
        generator: Generator,
        oid: Option<ObjectIdentifier>,
        openssl_name: Option<&str>,
    ) -> Result<Self, Error> {
        let encoded_oid = match &oid {
            Some(o) => Some(rasn::der::encode(o)?),
            None => None,
        };
        let baselen = orderlen(generator.order());
        let verifying_key_length = 2 * curve.field_len_bytes();
        Ok(Self {
            name: name.into(),
            openssl_name: openssl_name.map(|n| n.to_owned()),
            curve,
            generator,
            baselen,
            verifying_key_length,
            signature_length: 2 * baselen,
            oid,
            encoded_oid,
        })
    }

    pub fn name(&self) -> &str { &self.name }
    pub fn openssl_name(&self) -> Option<&str> { self.openssl_name.as_deref() }
    pub fn curve(&self) -> &PrimeWeierstrassCurve { &self.curve }
    pub fn generator(&self) -> &Generator { &self.generator }
    pub fn order(&self) -> &BigUint { self.generator.order() }
    pub fn baselen(&self) -> usize { self.baselen }
    pub fn verifying_key_length(&self) -> usize { self.verifying_key_length }
    pub fn signature_length(&self) -> usize { self.signature_length }
    pub fn oid(&self) -> Option<&Oid> { self.oid.as_deref() }

    /// The object identifier with DER tag and length, if the curve has one.
    pub fn encoded_oid(&self) -> Option<&[u8]> { self.encoded_oid.as_deref() }

    pub fn has_oid(&self, oid: &Oid) -> bool {
        self.oid()
            .map(|own| same_oid(own, oid))
            .unwrap_or(false)
    }

    /// Serializes the curve as `ECParameters`.
    ///
    /// If no encoding is given, the named-curve form is used for curves with an OID and the explicit
    /// form otherwise. The point encoding only applies to the base point in the explicit form.
    pub fn to_der(&self, encoding: Option<ParameterEncoding>, point_encoding: PointEncoding) -> Result<Vec<u8>, Error> {
        let encoding = encoding.unwrap_or(if self.encoded_oid.is_some() {
            ParameterEncoding::NamedCurve
        } else {
            ParameterEncoding::Explicit
        });

        match encoding {
            ParameterEncoding::NamedCurve => {
                let encoded_oid = self.encoded_oid.as_ref()
                    .ok_or(UnknownCurve::NoOid)?;
                Ok(encoded_oid.clone())
            },
            ParameterEncoding::Explicit => self.to_explicit_der(point_encoding),
        }
    }

    /// Serializes the curve in the preferred form with an uncompressed base point.
    pub fn to_der_default(&self) -> Result<Vec<u8>, Error> {
        self.to_der(None, PointEncoding::Uncompressed)
    }

    fn to_explicit_der(&self, point_encoding: PointEncoding) -> Result<Vec<u8>, Error> {
        let field_length = self.curve.field_len_bytes();

        let field_type = to_owned_oid(oids::PRIME_FIELD)
            .ok_or_else(|| invalid_oid(oids::PRIME_FIELD))?;
        let prime = rasn::der::encode(&integer_from_biguint(self.curve.prime()))?;
        let domain = SpecifiedEcDomain {
            version: Integer::from(1),
            field_id: FieldId {
                field_type,
                parameters: Any::new(prime),
            },
            curve: CurveCoefficients {
                a: OctetString::from(number_to_be_bytes(self.curve.coefficient_a(), field_length)),
                b: OctetString::from(number_to_be_bytes(self.curve.coefficient_b(), field_length)),
                seed: None,
            },
            base: OctetString::from(self.generator.to_bytes(&self.curve, point_encoding)),
            order: integer_from_biguint(self.generator.order()),
            cofactor: self.curve.cofactor()
                .filter(|c| !c.is_zero())
                .map(integer_from_biguint),
        };
        Ok(rasn::der::encode(&domain)?)
    }

    /// Wraps the DER serialization into `-----BEGIN EC PARAMETERS-----` armour.
    pub fn to_pem(&self, encoding: Option<ParameterEncoding>, point_encoding: PointEncoding) -> Result<String, Error> {
        let der = self.to_der(encoding, point_encoding)?;
        Ok(pem::encode(PEM_LABEL, &der)?)
    }

    /// Decodes `ECParameters` in either form, resolving them against the global registry.
    pub fn from_der(data: &[u8]) -> Result<Arc<Curve>, Error> {
        curves().decode(data, &[])
    }

    /// Decodes `ECParameters`, accepting only the given forms.
    ///
    /// An empty slice accepts both forms.
    pub fn from_der_with(data: &[u8], valid_encodings: &[ParameterEncoding]) -> Result<Arc<Curve>, Error> {
        curves().decode(data, valid_encodings)
    }

    /// Decodes `ECParameters`, resolving them against the given registry.
    pub fn from_der_in(registry: &CurveRegistry, data: &[u8]) -> Result<Arc<Curve>, Error> {
        registry.decode(data, &[])
    }

    /// Decodes PEM-armoured `ECParameters`, accepting only the given forms.
    pub fn from_pem(pem: &str, valid_encodings: &[ParameterEncoding]) -> Result<Arc<Curve>, Error> {
        let der = pem::decode(PEM_LABEL, pem)?;
        Self::from_der_with(&der, valid_encodings)
    }

    /// Decodes the explicit form into a curve that is not yet matched against any registry.
    pub(crate) fn decode_explicit(data: &[u8]) -> Result<Curve, Error> {
        let (elements, rest): (Vec<Any>, _) = rasn::der::decode_with_remainder(data)?;
        if !rest.is_empty() {
            return Err(MalformedEncoding::TrailingData { after: Element::EcParameters }.into());
        }

        let version: Integer = decode_element(&elements, 0)?;
        if version != Integer::from(1) {
            return Err(MalformedEncoding::UnsupportedVersion { version: BigInt::from(version) }.into());
        }
        let field_id: Vec<Any> = decode_element(&elements, 1)?;
        let curve: Vec<Any> = decode_element(&elements, 2)?;
        let base: OctetString = decode_element(&elements, 3)?;
        let order: Integer = decode_element(&elements, 4)?;
        // anything after the cofactor is tolerated
        let cofactor: Option<Integer> = if elements.len() > 5 {
            Some(decode_element(&elements, 5)?)
        } else {
            None
        };

        let field_type: ObjectIdentifier = decode_element(&field_id, 0)?;
        if same_oid(&field_type, oids::CHARACTERISTIC_TWO_FIELD) {
            return Err(UnknownCurve::CharacteristicTwoField.into());
        }
        if !same_oid(&field_type, oids::PRIME_FIELD) {
            return Err(UnknownCurve::UnknownFieldType { oid: field_type }.into());
        }
        // the parameters are everything after the field type
        let parameters: Vec<u8> = field_id.iter()
            .skip(1)
            .flat_map(|element| element.as_bytes().iter().copied())
            .collect();
        let (prime, rest): (Integer, _) = rasn::der::decode_with_remainder(&parameters)?;
        if !rest.is_empty() {
            return Err(MalformedEncoding::TrailingData { after: Element::FieldPrime }.into());
        }

        // the seed and anything after it are ignored
        let coefficient_a: OctetString = decode_element(&curve, 0)?;
        let coefficient_b: OctetString = decode_element(&curve, 1)?;

        let curve = PrimeWeierstrassCurve::new(
            unsigned(prime)?,
            biguint_from_be_slice(&coefficient_a),
            biguint_from_be_slice(&coefficient_b),
            cofactor.map(unsigned).transpose()?,
        )?;
        let generator = Generator::from_bytes(&curve, &base, &BASE_POINT_ENCODINGS, unsigned(order)?)?;
        Curve::new(UNKNOWN_NAME, curve, generator, None, None)
    }
}
impl PartialEq for Curve {
    fn eq(&self, other: &Self) -> bool {
        self.curve == other.curve
            && self.generator == other.generator
    }
}
impl Eq for Curve {}
impl fmt::Display for Curve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}


#[cfg(test)]
mod tests {
    use super::{Curve, Element, Error, MalformedEncoding, ParameterEncoding, UnknownCurve};
    use crate::crypt::elliptic::{AffinePoint, Generator, PointEncoding, PrimeWeierstrassCurve};
    use crate::crypt::elliptic::curves;
    use crate::asn1::to_owned_oid;
    use crate::oids;
    use hex_literal::hex;
    use num_bigint::{BigInt, BigUint};

    fn brainpool_p160r1() -> Curve {
        let params = curves::get_brainpool_p160r1();
        Curve::new(
            "BRAINPOOLP160r1",
            params.curve,
            params.generator,
            Some(to_owned_oid(oids::BRAINPOOL_P160R1).unwrap()),
            Some("brainpoolP160r1"),
        ).unwrap()
    }

    fn tiny_curve(cofactor: Option<BigUint>) -> Curve {
        let curve = PrimeWeierstrassCurve::new(
            BigUint::from(23u8),
            BigUint::from(1u8),
            BigUint::from(1u8),
            cofactor,
        ).unwrap();
        let point = AffinePoint::new(BigUint::from(3u8), BigUint::from(10u8));
        let generator = Generator::new(&curve, point, BigUint::from(28u8)).unwrap();
        Curve::new("tiny", curve, generator, None, None).unwrap()
    }

    #[test]
    fn test_derived_lengths() {
        let curve = brainpool_p160r1();
        assert_eq!(curve.baselen(), 20);
        assert_eq!(curve.verifying_key_length(), 40);
        assert_eq!(curve.signature_length(), 40);
        assert_eq!(curve.encoded_oid(), Some(&hex!("06092B2403030208010101")[..]));
        assert_eq!(curve.to_string(), "BRAINPOOLP160r1");
    }

    #[test]
    fn test_explicit_matches_openssl() {
        let curve = brainpool_p160r1();
        let der = curve.to_der(Some(ParameterEncoding::Explicit), PointEncoding::Uncompressed).unwrap();
        assert_eq!(der, hex!("
            308198020101302006072a8648ce3d0101021500e95e4a5f737059dc60dfc7ad95b3d8139515620f302c0414340e
            7be2a280eb74e2be61bada745d97e8f7c30004141e589a8595423412134faa2dbdec95c8d8675e58042904bed5af
            16ea3f6a4f62938c4631eb5af7bdbcdbc31667cb477a1a8ec338f94741669c976316da6321021500e95e4a5f7370
            59dc60df5991d45029409e60fc09020101
        "));
    }

    #[test]
    fn test_default_encoding() {
        let named = brainpool_p160r1();
        assert_eq!(named.to_der_default().unwrap(), hex!("06092B2403030208010101"));

        let tiny = tiny_curve(Some(BigUint::from(1u8)));
        assert_eq!(
            tiny.to_der_default().unwrap(),
            tiny.to_der(Some(ParameterEncoding::Explicit), PointEncoding::Uncompressed).unwrap(),
        );
        assert!(matches!(
            tiny.to_der(Some(ParameterEncoding::NamedCurve), PointEncoding::Uncompressed),
            Err(Error::UnknownCurve(UnknownCurve::NoOid)),
        ));
    }

    #[test]
    fn test_cofactor_omission() {
        // SEQUENCE { 1, { prime-field, 23 }, { 01, 01 }, 04 03 0A, 28 }
        let without = hex!("3021 020101 300C06072A8648CE3D0101020117 3006040101040101 040304030A 02011C");
        assert_eq!(tiny_curve(None).to_der_default().unwrap(), without);
        assert_eq!(tiny_curve(Some(BigUint::from(0u8))).to_der_default().unwrap(), without);

        let with = tiny_curve(Some(BigUint::from(1u8))).to_der_default().unwrap();
        assert_eq!(with[1], 0x24);
        assert_eq!(&with[with.len()-3..], hex!("020101"));
    }

    #[test]
    fn test_decode_explicit_rejections() {
        assert!(matches!(
            Curve::decode_explicit(&hex!("3003 020102")),
            Err(Error::MalformedEncoding(MalformedEncoding::UnsupportedVersion { version })) if version == BigInt::from(2),
        ));
        assert!(matches!(
            Curve::decode_explicit(&hex!("3003 020101 00")),
            Err(Error::MalformedEncoding(MalformedEncoding::TrailingData { after: Element::EcParameters })),
        ));
        // the remaining elements are missing
        assert!(matches!(
            Curve::decode_explicit(&hex!("3003 020101")),
            Err(Error::MalformedEncoding(MalformedEncoding::Der(_))),
        ));
    }

    #[test]
    fn test_negative_integers() {
        // SEQUENCE { 1, { prime-field, -23 }, { 01, 01 }, 04 03 0A, 28 }
        let negative_prime = hex!("3021 020101 300C06072A8648CE3D01010201E9 3006040101040101 040304030A 02011C");
        assert!(matches!(
            Curve::decode_explicit(&negative_prime),
            Err(Error::MalformedEncoding(MalformedEncoding::NegativeInteger)),
        ));

        // the same curve with an order of -28
        let negative_order = hex!("3021 020101 300C06072A8648CE3D0101020117 3006040101040101 040304030A 0201E4");
        assert!(matches!(
            Curve::decode_explicit(&negative_order),
            Err(Error::MalformedEncoding(MalformedEncoding::NegativeInteger)),
        ));
        let positive_order = hex!("3021 020101 300C06072A8648CE3D0101020117 3006040101040101 040304030A 02011C");
        assert_eq!(Curve::decode_explicit(&positive_order).unwrap(), tiny_curve(None));
    }

    #[test]
    fn test_equality_ignores_metadata() {
        let named = brainpool_p160r1();
        let params = curves::get_brainpool_p160r1();
        let anonymous = Curve::new("anonymous", params.curve, params.generator, None, None).unwrap();
        assert_eq!(named, anonymous);
        assert_ne!(named, tiny_curve(None));
        assert_eq!(tiny_curve(None), tiny_curve(Some(BigUint::from(4u8))));
    }
}
