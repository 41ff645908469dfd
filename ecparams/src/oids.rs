//! Object identifiers of field types and named curves.


use rasn::types::Oid;


macro_rules! x962_oids {
    ($($name:ident => $($num:literal),+ $(,)?);+ $(;)?) => {
        $(
            pub const $name: &'static Oid = Oid::const_new(&[1, 2, 840, 10045, $($num),+]);
        )+
    };
}

macro_rules! certicom_oids {
    ($($name:ident => $num:literal);+ $(;)?) => {
        $(
            pub const $name: &'static Oid = Oid::const_new(&[1, 3, 132, 0, $num]);
        )+
    };
}

macro_rules! brainpool_oids {
    ($($name:ident => $num:literal);+ $(;)?) => {
        $(
            pub const $name: &'static Oid = Oid::const_new(&[1, 3, 36, 3, 3, 2, 8, 1, 1, $num]);
        )+
    };
}


// field types (ANSI X9.62 fieldType)
x962_oids! {
    PRIME_FIELD => 1, 1;
    CHARACTERISTIC_TWO_FIELD => 1, 2;
}

x962_oids! {
    PRIME192V1 => 3, 1, 1;
    PRIME256V1 => 3, 1, 7;
}

certicom_oids! {
    SECP112R1 => 6;
    SECP112R2 => 7;
    SECP160R1 => 8;
    SECP256K1 => 10;
    SECP128R1 => 28;
    SECP224R1 => 33;
    SECP384R1 => 34;
    SECP521R1 => 35;
}

brainpool_oids! {
    BRAINPOOL_P160R1 => 1;
    BRAINPOOL_P192R1 => 3;
    BRAINPOOL_P224R1 => 5;
    BRAINPOOL_P256R1 => 7;
    BRAINPOOL_P320R1 => 9;
    BRAINPOOL_P384R1 => 11;
    BRAINPOOL_P512R1 => 13;
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::asn1::{format_oid, to_owned_oid};
    use hex_literal::hex;
    use rasn::types::Oid;

    fn encode(oid: &Oid) -> Vec<u8> {
        rasn::der::encode(&to_owned_oid(oid).unwrap()).unwrap()
    }

    #[test]
    fn test_encodings() {
        assert_eq!(encode(PRIME256V1), hex!("06082A8648CE3D030107"));
        assert_eq!(encode(SECP256K1), hex!("06052B8104000A"));
        assert_eq!(encode(BRAINPOOL_P256R1), hex!("06092B2403030208010107"));
        assert_eq!(encode(PRIME_FIELD), hex!("06072A8648CE3D0101"));
    }

    #[test]
    fn test_dotted() {
        assert_eq!(format_oid(CHARACTERISTIC_TWO_FIELD), "1.2.840.10045.1.2");
        assert_eq!(format_oid(SECP521R1), "1.3.132.0.35");
        assert_eq!(format_oid(BRAINPOOL_P512R1), "1.3.36.3.3.2.8.1.1.13");
    }
}
