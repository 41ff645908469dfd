//! Decoding of `ECParameters` as produced by `openssl ecparam -param_enc explicit`.


use std::sync::Arc;

use ecparams::{Curve, NamedCurve, ParameterEncoding, PointEncoding};
use hex_literal::hex;


const PRIME256V1_NAMED: [u8; 10] = hex!("06082a8648ce3d030107");

/// Includes the optional seed in the curve SEQUENCE.
const PRIME256V1_EXPLICIT: [u8; 250] = hex!("
    3081f7020101302c06072a8648ce3d0101022100ffffffff000000010000000000000000000000
    00ffffffffffffffffffffffff305b0420ffffffff00000001000000000000000000000000ffff
    fffffffffffffffffffc04205ac635d8aa3a93e7b3ebbd55769886bc651d06b0cc53b0f63bce3c
    3e27d2604b031500c49d360886e704936a6678e1139d26b7819f7e900441046b17d1f2e12c4247
    f8bce6e563a440f277037d812deb33a0f4a13945d898c2964fe342e2fe1a7f9b8ee7eb4a7c0f9e
    162bce33576b315ececbb6406837bf51f5022100ffffffff00000000ffffffffffffffffbce6fa
    ada7179e84f3b9cac2fc632551020101
");

const BRAINPOOLP160R1_EXPLICIT: [u8; 155] = hex!("
    308198020101302006072a8648ce3d0101021500e95e4a5f737059dc60dfc7ad95b3d813951562
    0f302c0414340e7be2a280eb74e2be61bada745d97e8f7c30004141e589a8595423412134faa2d
    bdec95c8d8675e58042904bed5af16ea3f6a4f62938c4631eb5af7bdbcdbc31667cb477a1a8ec3
    38f94741669c976316da6321021500e95e4a5f737059dc60df5991d45029409e60fc09020101
");

/// Compressed base point on a curve with p ≡ 1 (mod 4).
const SECP224R1_COMPRESSED: [u8; 198] = hex!("
    3081c3020101302806072a8648ce3d0101021d00ffffffffffffffffffffffffffffffff000000
    0000000000000000013053041cfffffffffffffffffffffffffffffffeffffffffffffffffffff
    fffe041cb4050a850c04b3abf54132565044b0b7d7bfd8ba270b39432355ffb4031500bd713447
    99d5c7fcdc45b59fa3b9ab8f6a948bc5041d02b70e0cbd6bb4bf7f321390b94a03c1d356c21122
    343280d6115c1d21021d00ffffffffffffffffffffffffffff16a2e0b8f03e13dd29455c5c2a3d
    020101
");

const SECP256K1_HYBRID: [u8; 227] = hex!("
    3081e0020101302c06072a8648ce3d0101022100ffffffffffffffffffffffffffffffffffffff
    fffffffffffffffffefffffc2f3044042000000000000000000000000000000000000000000000
    0000000000000000000004200000000000000000000000000000000000000000000000000000000
    00000000704410679be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f8179
    8483ada7726a3c4655da4fbfc0e1108a8fd17b448a68554199c47d08ffb10d4b8022100ffffffff
    fffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364141020101
");

const PRIME256V1_PEM: &str = "\
-----BEGIN EC PARAMETERS-----
BggqhkjOPQMBBw==
-----END EC PARAMETERS-----
";

const BRAINPOOLP160R1_PEM: &str = "\
-----BEGIN EC PARAMETERS-----
MIGYAgEBMCAGByqGSM49AQECFQDpXkpfc3BZ3GDfx62Vs9gTlRViDzAsBBQ0Dnvi
ooDrdOK+YbradF2X6PfDAAQUHliahZVCNBITT6otveyVyNhnXlgEKQS+1a8W6j9q
T2KTjEYx61r3vbzbwxZny0d6Go7DOPlHQWacl2MW2mMhAhUA6V5KX3NwWdxg31mR
1FApQJ5g/AkCAQE=
-----END EC PARAMETERS-----
";


#[test]
fn test_named() {
    let curve = Curve::from_der(&PRIME256V1_NAMED).unwrap();
    assert!(Arc::ptr_eq(&curve, &NamedCurve::Nist256p.curve()));
    assert_eq!(curve.to_der_default().unwrap(), PRIME256V1_NAMED);
}

#[test]
fn test_explicit_with_seed() {
    let curve = Curve::from_der(&PRIME256V1_EXPLICIT).unwrap();
    assert!(Arc::ptr_eq(&curve, &NamedCurve::Nist256p.curve()));
    assert_eq!(curve.name(), "NIST256p");
    assert_eq!(curve.openssl_name(), Some("prime256v1"));
}

#[test]
fn test_explicit_identical_output() {
    let curve = Curve::from_der(&BRAINPOOLP160R1_EXPLICIT).unwrap();
    assert!(Arc::ptr_eq(&curve, &NamedCurve::BrainpoolP160r1.curve()));

    let encoded = curve.to_der(Some(ParameterEncoding::Explicit), PointEncoding::Uncompressed).unwrap();
    assert_eq!(encoded, BRAINPOOLP160R1_EXPLICIT);
}

#[test]
fn test_compressed_base_point() {
    let curve = Curve::from_der(&SECP224R1_COMPRESSED).unwrap();
    assert!(Arc::ptr_eq(&curve, &NamedCurve::Nist224p.curve()));
}

#[test]
fn test_hybrid_base_point() {
    let curve = Curve::from_der(&SECP256K1_HYBRID).unwrap();
    assert!(Arc::ptr_eq(&curve, &NamedCurve::Secp256k1.curve()));
}

#[test]
fn test_pem() {
    let named = Curve::from_pem(PRIME256V1_PEM, &[]).unwrap();
    assert!(Arc::ptr_eq(&named, &NamedCurve::Nist256p.curve()));
    assert_eq!(named.to_pem(None, PointEncoding::Uncompressed).unwrap(), PRIME256V1_PEM);

    let explicit = Curve::from_pem(BRAINPOOLP160R1_PEM, &[ParameterEncoding::Explicit]).unwrap();
    assert!(Arc::ptr_eq(&explicit, &NamedCurve::BrainpoolP160r1.curve()));
    assert_eq!(
        explicit.to_pem(Some(ParameterEncoding::Explicit), PointEncoding::Uncompressed).unwrap(),
        BRAINPOOLP160R1_PEM,
    );
}
