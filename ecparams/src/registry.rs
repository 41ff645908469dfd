//! The registry of well-known curves and resolution of decoded parameters against it.


use std::sync::{Arc, LazyLock};

use rasn::types::{ObjectIdentifier, Oid};
use tracing::{debug, instrument, trace};

use crate::asn1::{format_oid, is_sequence, to_owned_oid};
use crate::crypt::elliptic::curves::{self as standard, DomainParameters};
use crate::oids;
use crate::params::{invalid_oid, Curve, Element, Error, MalformedEncoding, ParameterEncoding, UnknownCurve};


static CURVES: LazyLock<CurveRegistry> = LazyLock::new(CurveRegistry::standard);


/// The curves known by default, in registry order.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum NamedCurve {
    Nist192p,
    Nist224p,
    Nist256p,
    Nist384p,
    Nist521p,
    Secp256k1,
    BrainpoolP160r1,
    BrainpoolP192r1,
    BrainpoolP224r1,
    BrainpoolP256r1,
    BrainpoolP320r1,
    BrainpoolP384r1,
    BrainpoolP512r1,
    Secp112r1,
    Secp112r2,
    Secp128r1,
    Secp160r1,
}
impl NamedCurve {
    pub const ALL: [NamedCurve; 17] = [
        Self::Nist192p, Self::Nist224p, Self::Nist256p, Self::Nist384p, Self::Nist521p,
        Self::Secp256k1,
        Self::BrainpoolP160r1, Self::BrainpoolP192r1, Self::BrainpoolP224r1, Self::BrainpoolP256r1,
        Self::BrainpoolP320r1, Self::BrainpoolP384r1, Self::BrainpoolP512r1,
        Self::Secp112r1, Self::Secp112r2, Self::Secp128r1, Self::Secp160r1,
    ];

    pub const fn name(&self) -> &'static str {
        match self {
            Self::Nist192p => "NIST192p",
            Self::Nist224p => "NIST224p",
            Self::Nist256p => "NIST256p",
            Self::Nist384p => "NIST384p",
            Self::Nist521p => "NIST521p",
            Self::Secp256k1 => "SECP256k1",
            Self::BrainpoolP160r1 => "BRAINPOOLP160r1",
            Self::BrainpoolP192r1 => "BRAINPOOLP192r1",
            Self::BrainpoolP224r1 => "BRAINPOOLP224r1",
            Self::BrainpoolP256r1 => "BRAINPOOLP256r1",
            Self::BrainpoolP320r1 => "BRAINPOOLP320r1",
            Self::BrainpoolP384r1 => "BRAINPOOLP384r1",
            Self::BrainpoolP512r1 => "BRAINPOOLP512r1",
            Self::Secp112r1 => "SECP112r1",
            Self::Secp112r2 => "SECP112r2",
            Self::Secp128r1 => "SECP128r1",
            Self::Secp160r1 => "SECP160r1",
        }
    }

    /// The name OpenSSL uses for this curve.
    pub const fn openssl_name(&self) -> &'static str {
        match self {
            Self::Nist192p => "prime192v1",
            Self::Nist224p => "secp224r1",
            Self::Nist256p => "prime256v1",
            Self::Nist384p => "secp384r1",
            Self::Nist521p => "secp521r1",
            Self::Secp256k1 => "secp256k1",
            Self::BrainpoolP160r1 => "brainpoolP160r1",
            Self::BrainpoolP192r1 => "brainpoolP192r1",
            Self::BrainpoolP224r1 => "brainpoolP224r1",
            Self::BrainpoolP256r1 => "brainpoolP256r1",
            Self::BrainpoolP320r1 => "brainpoolP320r1",
            Self::BrainpoolP384r1 => "brainpoolP384r1",
            Self::BrainpoolP512r1 => "brainpoolP512r1",
            Self::Secp112r1 => "secp112r1",
            Self::Secp112r2 => "secp112r2",
            Self::Secp128r1 => "secp128r1",
            Self::Secp160r1 => "secp160r1",
        }
    }

    pub const fn oid(&self) -> &'static Oid {
        match self {
            Self::Nist192p => oids::PRIME192V1,
            Self::Nist224p => oids::SECP224R1,
            Self::Nist256p => oids::PRIME256V1,
            Self::Nist384p => oids::SECP384R1,
            Self::Nist521p => oids::SECP521R1,
            Self::Secp256k1 => oids::SECP256K1,
            Self::BrainpoolP160r1 => oids::BRAINPOOL_P160R1,
            Self::BrainpoolP192r1 => oids::BRAINPOOL_P192R1,
            Self::BrainpoolP224r1 => oids::BRAINPOOL_P224R1,
            Self::BrainpoolP256r1 => oids::BRAINPOOL_P256R1,
            Self::BrainpoolP320r1 => oids::BRAINPOOL_P320R1,
            Self::BrainpoolP384r1 => oids::BRAINPOOL_P384R1,
            Self::BrainpoolP512r1 => oids::BRAINPOOL_P512R1,
            Self::Secp112r1 => oids::SECP112R1,
            Self::Secp112r2 => oids::SECP112R2,
            Self::Secp128r1 => oids::SECP128R1,
            Self::Secp160r1 => oids::SECP160R1,
        }
    }

    pub fn domain_parameters(&self) -> DomainParameters {
        match self {
            Self::Nist192p => standard::get_nist_p192(),
            Self::Nist224p => standard::get_nist_p224(),
            Self::Nist256p => standard::get_nist_p256(),
            Self::Nist384p => standard::get_nist_p384(),
            Self::Nist521p => standard::get_nist_p521(),
            Self::Secp256k1 => standard::get_secp256k1(),
            Self::BrainpoolP160r1 => standard::get_brainpool_p160r1(),
            Self::BrainpoolP192r1 => standard::get_brainpool_p192r1(),
            Self::BrainpoolP224r1 => standard::get_brainpool_p224r1(),
            Self::BrainpoolP256r1 => standard::get_brainpool_p256r1(),
            Self::BrainpoolP320r1 => standard::get_brainpool_p320r1(),
            Self::BrainpoolP384r1 => standard::get_brainpool_p384r1(),
            Self::BrainpoolP512r1 => standard::get_brainpool_p512r1(),
            Self::Secp112r1 => standard::get_secp112r1(),
            Self::Secp112r2 => standard::get_secp112r2(),
            Self::Secp128r1 => standard::get_secp128r1(),
            Self::Secp160r1 => standard::get_secp160r1(),
        }
    }

    /// Builds a fresh descriptor for this curve, independent of any registry.
    pub fn to_curve(&self) -> Result<Curve, Error> {
        let DomainParameters { curve, generator } = self.domain_parameters();
        let oid = to_owned_oid(self.oid())
            .ok_or_else(|| invalid_oid(self.oid()))?;
        Curve::new(self.name(), curve, generator, Some(oid), Some(self.openssl_name()))
    }

    /// Returns the shared descriptor of this curve from the global registry.
    pub fn curve(&self) -> Arc<Curve> {
        // the global registry holds every named curve in declaration order
        Arc::clone(&curves().curves[*self as usize])
    }
}


/// An immutable, ordered collection of curves that decoded parameters are resolved against.
#[derive(Clone, Debug)]
pub struct CurveRegistry {
    curves: Vec<Arc<Curve>>,
}
impl CurveRegistry {
    pub fn new(curves: Vec<Arc<Curve>>) -> Self {
        Self { curves }
    }

    /// Builds a registry containing every [`NamedCurve`] in declaration order.
    pub fn try_standard() -> Result<Self, Error> {
        let curves = NamedCurve::ALL.iter()
            .map(|named| named.to_curve().map(Arc::new))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { curves })
    }

    /// Builds a registry containing every [`NamedCurve`] in declaration order.
    ///
    /// # Panics
    ///
    /// Panics if one of the built-in parameter sets is invalid.
    pub fn standard() -> Self {
        Self::try_standard()
            .expect("built-in curve parameters are invalid")
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Curve>> {
        self.curves.iter()
    }

    pub fn len(&self) -> usize { self.curves.len() }
    pub fn is_empty(&self) -> bool { self.curves.is_empty() }

    pub fn names(&self) -> Vec<String> {
        self.curves.iter()
            .map(|c| c.name().to_owned())
            .collect()
    }

    /// Returns the first curve with the given object identifier.
    pub fn find_curve(&self, oid: &Oid) -> Result<Arc<Curve>, Error> {
        match self.curves.iter().find(|c| c.has_oid(oid)) {
            Some(curve) => Ok(Arc::clone(curve)),
            None => {
                debug!(oid = %format_oid(oid), "no registered curve has this OID");
                let oid = to_owned_oid(oid)
                    .ok_or_else(|| invalid_oid(oid))?;
                Err(UnknownCurve::UnknownOid { oid, known: self.names() }.into())
            },
        }
    }

    /// Returns the first curve whose name or OpenSSL name equals the given string.
    pub fn curve_by_name(&self, name: &str) -> Result<Arc<Curve>, Error> {
        self.curves.iter()
            .find(|c| c.name() == name || c.openssl_name() == Some(name))
            .map(Arc::clone)
            .ok_or_else(|| UnknownCurve::UnknownName { name: name.to_owned(), known: self.names() }.into())
    }

    /// Replaces a curve with the mathematically equal registered curve, if there is one.
    pub fn canonicalize(&self, curve: Curve) -> Arc<Curve> {
        match self.curves.iter().find(|registered| ***registered == curve) {
            Some(registered) => {
                debug!(name = registered.name(), "explicit parameters match a registered curve");
                Arc::clone(registered)
            },
            None => {
                debug!("explicit parameters match no registered curve");
                Arc::new(curve)
            },
        }
    }

    /// Decodes `ECParameters` in the given forms and resolves them against this registry.
    ///
    /// An empty slice of valid encodings accepts both forms.
    #[instrument(skip_all)]
    pub fn decode(&self, data: &[u8], valid_encodings: &[ParameterEncoding]) -> Result<Arc<Curve>, Error> {
        let allowed = |encoding| valid_encodings.is_empty() || valid_encodings.contains(&encoding);

        if !is_sequence(data) {
            trace!("decoding named curve parameters");
            if !allowed(ParameterEncoding::NamedCurve) {
                return Err(MalformedEncoding::DisallowedEncoding { encoding: ParameterEncoding::NamedCurve }.into());
            }
            let (oid, rest): (ObjectIdentifier, _) = rasn::der::decode_with_remainder(data)?;
            if !rest.is_empty() {
                return Err(MalformedEncoding::TrailingData { after: Element::ObjectIdentifier }.into());
            }
            return self.find_curve(&oid);
        }

        trace!("decoding explicit curve parameters");
        if !allowed(ParameterEncoding::Explicit) {
            return Err(MalformedEncoding::DisallowedEncoding { encoding: ParameterEncoding::Explicit }.into());
        }
        let curve = Curve::decode_explicit(data)?;
        Ok(self.canonicalize(curve))
    }
}
impl<'a> IntoIterator for &'a CurveRegistry {
    type Item = &'a Arc<Curve>;
    type IntoIter = std::slice::Iter<'a, Arc<Curve>>;

    fn into_iter(self) -> Self::IntoIter {
        self.curves.iter()
    }
}


/// The global registry of well-known curves.
pub fn curves() -> &'static CurveRegistry {
    &CURVES
}

/// Looks up a well-known curve by its object identifier.
pub fn find_curve(oid: &Oid) -> Result<Arc<Curve>, Error> {
    curves().find_curve(oid)
}

/// Looks up a well-known curve by its name or OpenSSL name.
pub fn curve_by_name(name: &str) -> Result<Arc<Curve>, Error> {
    curves().curve_by_name(name)
}
