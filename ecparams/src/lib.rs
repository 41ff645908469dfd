//! Elliptic-curve domain parameters for ECDSA.
//!
//! Provides a [`Curve`] descriptor, its `ECParameters` DER and PEM encodings in named and explicit
//! form, and a registry of well-known curves against which decoded parameters are canonicalized.


pub mod asn1;
pub mod crypt;
pub mod oids;
pub mod params;
pub mod pem;
pub mod registry;


pub use crate::crypt::orderlen;
pub use crate::crypt::elliptic::PointEncoding;
pub use crate::params::{Curve, Error, MalformedEncoding, ParameterEncoding, UnknownCurve};
pub use crate::registry::{curve_by_name, curves, find_curve, CurveRegistry, NamedCurve};
