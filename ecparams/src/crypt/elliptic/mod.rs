//! Elliptic-curve arithmetic over prime fields.


pub mod curves;


use std::fmt;

use num_bigint::BigUint;
use num_traits::{One, Zero};

use crate::crypt::{biguint_from_be_slice, number_to_be_bytes, orderlen};


/// The ways in which a point can be serialized to bytes.
///
/// All coordinates are serialized in big-endian byte order, left-padded to the byte length of the
/// curve's prime.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum PointEncoding {
    /// `x || y` without a prefix byte.
    Raw,

    /// `0x04 || x || y`
    #[default]
    Uncompressed,

    /// `0x02 || x` if `y` is even, `0x03 || x` if `y` is odd.
    Compressed,

    /// `0x06 || x || y` if `y` is even, `0x07 || x || y` if `y` is odd.
    Hybrid,
}
impl PointEncoding {
    pub const ALL: [PointEncoding; 4] = [
        PointEncoding::Raw, PointEncoding::Uncompressed,
        PointEncoding::Compressed, PointEncoding::Hybrid,
    ];

    pub const fn name(&self) -> &'static str {
        match self {
            Self::Raw => "raw",
            Self::Uncompressed => "uncompressed",
            Self::Compressed => "compressed",
            Self::Hybrid => "hybrid",
        }
    }
}
impl fmt::Display for PointEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}


/// The curve parameters do not describe a usable prime field.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum CurveError {
    /// The modulus is even or smaller than 3.
    InvalidPrime { prime: BigUint },
}
impl fmt::Display for CurveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPrime { prime }
                => write!(f, "field modulus 0x{:X} is not an odd prime", prime),
        }
    }
}
impl std::error::Error for CurveError {
}


/// A byte string does not describe a point on the curve.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum PointError {
    /// The length matches none of the enabled encodings.
    Length { length: usize, valid_encodings: Vec<PointEncoding> },
    /// The prefix byte is not valid for any of the enabled encodings.
    Prefix { prefix: u8 },
    /// A coordinate is not smaller than the field prime.
    CoordinateOutOfRange,
    /// The coordinates do not satisfy the curve equation.
    NotOnCurve,
    /// The parity of `y` contradicts the hybrid prefix byte.
    InconsistentHybrid,
}
impl fmt::Display for PointError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Length { length, valid_encodings } => {
                write!(f, "length {} does not match any of the enabled encodings (", length)?;
                for (i, encoding) in valid_encodings.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", encoding)?;
                }
                write!(f, ")")
            },
            Self::Prefix { prefix }
                => write!(f, "invalid X9.62 point encoding prefix 0x{:02X}", prefix),
            Self::CoordinateOutOfRange
                => write!(f, "point coordinate is not reduced modulo the field prime"),
            Self::NotOnCurve
                => write!(f, "point does not lie on the curve"),
            Self::InconsistentHybrid
                => write!(f, "inconsistent hybrid point encoding"),
        }
    }
}
impl std::error::Error for PointError {
}


/// Modular arithmetic in the prime field of a curve.
///
/// All operands are expected to be reduced already.
#[derive(Clone, Copy, Debug)]
struct Field<'a> {
    prime: &'a BigUint,
}
impl<'a> Field<'a> {
    fn add(&self, lhs: &BigUint, rhs: &BigUint) -> BigUint {
        (lhs + rhs) % self.prime
    }

    fn sub(&self, lhs: &BigUint, rhs: &BigUint) -> BigUint {
        ((lhs + self.prime) - rhs) % self.prime
    }

    fn mul(&self, lhs: &BigUint, rhs: &BigUint) -> BigUint {
        (lhs * rhs) % self.prime
    }

    fn square(&self, value: &BigUint) -> BigUint {
        self.mul(value, value)
    }

    fn pow(&self, base: &BigUint, exponent: &BigUint) -> BigUint {
        base.modpow(exponent, self.prime)
    }

    /// Inverts via Fermat's little theorem; zero has no inverse.
    fn invert(&self, value: &BigUint) -> Option<BigUint> {
        if value.is_zero() {
            return None;
        }
        let exponent = self.prime - BigUint::from(2u8);
        Some(self.pow(value, &exponent))
    }

    fn is_square(&self, value: &BigUint) -> bool {
        if value.is_zero() {
            return true;
        }
        let exponent = (self.prime - BigUint::one()) >> 1u32;
        self.pow(value, &exponent).is_one()
    }

    /// Computes a square root, or `None` if the value is a non-residue.
    fn sqrt(&self, value: &BigUint) -> Option<BigUint> {
        if value.is_zero() {
            return Some(BigUint::zero());
        }
        if !self.is_square(value) {
            return None;
        }

        let root = if self.prime.bit(1) {
            // p ≡ 3 (mod 4)
            let exponent = (self.prime + BigUint::one()) >> 2u32;
            self.pow(value, &exponent)
        } else {
            self.tonelli_shanks(value)?
        };

        // composite moduli from untrusted input can fool the residue test
        if self.square(&root) == *value { Some(root) } else { None }
    }

    fn tonelli_shanks(&self, value: &BigUint) -> Option<BigUint> {
        const MAX_NON_RESIDUE_CANDIDATE: u32 = 1024;

        // p - 1 = q * 2^s with q odd
        let prime_minus_one = self.prime - BigUint::one();
        let s = prime_minus_one.trailing_zeros()?;
        let q = &prime_minus_one >> s;

        let non_residue = (2..MAX_NON_RESIDUE_CANDIDATE)
            .map(BigUint::from)
            .find(|z| !self.is_square(z))?;

        let mut m = s;
        let mut c = self.pow(&non_residue, &q);
        let mut t = self.pow(value, &q);
        let mut r = self.pow(value, &((&q + BigUint::one()) >> 1u32));
        while !t.is_one() {
            // smallest i with t^(2^i) == 1
            let mut i = 0;
            let mut t_power = t.clone();
            while !t_power.is_one() {
                i += 1;
                if i == m {
                    return None;
                }
                t_power = self.square(&t_power);
            }

            let mut b = c;
            for _ in 0..(m - i - 1) {
                b = self.square(&b);
            }
            m = i;
            c = self.square(&b);
            t = self.mul(&t, &c);
            r = self.mul(&r, &b);
        }
        Some(r)
    }
}


/// A point in projective coordinates; `z == 0` is the point at infinity.
#[derive(Clone, Debug, Eq, PartialEq)]
struct ProjectivePoint {
    x: BigUint,
    y: BigUint,
    z: BigUint,
}
impl ProjectivePoint {
    fn identity() -> Self {
        Self { x: BigUint::zero(), y: BigUint::one(), z: BigUint::zero() }
    }

    fn from_affine(point: &AffinePoint) -> Self {
        Self { x: point.x.clone(), y: point.y.clone(), z: BigUint::one() }
    }
}


/// A point in affine coordinates.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct AffinePoint {
    x: BigUint,
    y: BigUint,
}
impl AffinePoint {
    pub const fn new(x: BigUint, y: BigUint) -> Self {
        Self { x, y }
    }

    pub fn x(&self) -> &BigUint { &self.x }
    pub fn y(&self) -> &BigUint { &self.y }

    /// Serializes the point using the given encoding.
    ///
    /// Each coordinate takes as many bytes as the curve's prime.
    pub fn to_bytes(&self, curve: &PrimeWeierstrassCurve, encoding: PointEncoding) -> Vec<u8> {
        let coordinate_length = curve.field_len_bytes();
        let y_is_odd = self.y.bit(0);

        let mut ret = Vec::with_capacity(1 + 2*coordinate_length);
        match encoding {
            PointEncoding::Raw => {},
            PointEncoding::Uncompressed => ret.push(0x04),
            PointEncoding::Compressed => ret.push(if y_is_odd { 0x03 } else { 0x02 }),
            PointEncoding::Hybrid => ret.push(if y_is_odd { 0x07 } else { 0x06 }),
        }
        ret.extend(number_to_be_bytes(&self.x, coordinate_length));
        if encoding != PointEncoding::Compressed {
            ret.extend(number_to_be_bytes(&self.y, coordinate_length));
        }
        ret
    }

    /// Decodes a point from bytes, accepting only the given encodings.
    ///
    /// The point must lie on the curve.
    pub fn from_bytes(
        curve: &PrimeWeierstrassCurve,
        bytes: &[u8],
        valid_encodings: &[PointEncoding],
    ) -> Result<Self, PointError> {
        let coordinate_length = curve.field_len_bytes();
        let enabled = |encoding| valid_encodings.contains(&encoding);

        let length = bytes.len();
        let point = if length == 2*coordinate_length && enabled(PointEncoding::Raw) {
            Self::from_coordinate_bytes(curve, bytes)?
        } else if length == 1 + 2*coordinate_length
                && (enabled(PointEncoding::Uncompressed) || enabled(PointEncoding::Hybrid)) {
            let prefix = bytes[0];
            match prefix {
                0x04 if enabled(PointEncoding::Uncompressed)
                    => Self::from_coordinate_bytes(curve, &bytes[1..])?,
                0x06|0x07 if enabled(PointEncoding::Hybrid) => {
                    let point = Self::from_coordinate_bytes(curve, &bytes[1..])?;
                    if point.y.bit(0) != (prefix == 0x07) {
                        return Err(PointError::InconsistentHybrid);
                    }
                    point
                },
                _ => return Err(PointError::Prefix { prefix }),
            }
        } else if length == 1 + coordinate_length && enabled(PointEncoding::Compressed) {
            Self::from_compressed(curve, bytes)?
        } else {
            return Err(PointError::Length {
                length,
                valid_encodings: valid_encodings.to_vec(),
            });
        };

        if !curve.contains_point(&point) {
            return Err(PointError::NotOnCurve);
        }
        Ok(point)
    }

    fn from_coordinate_bytes(curve: &PrimeWeierstrassCurve, bytes: &[u8]) -> Result<Self, PointError> {
        // it must be possible to split the value in the middle
        debug_assert_eq!(bytes.len() % 2, 0);
        let (x_bytes, y_bytes) = bytes.split_at(bytes.len() / 2);
        let x = biguint_from_be_slice(x_bytes);
        let y = biguint_from_be_slice(y_bytes);
        if x >= curve.prime || y >= curve.prime {
            return Err(PointError::CoordinateOutOfRange);
        }
        Ok(Self { x, y })
    }

    fn from_compressed(curve: &PrimeWeierstrassCurve, bytes: &[u8]) -> Result<Self, PointError> {
        let prefix = bytes[0];
        if prefix != 0x02 && prefix != 0x03 {
            return Err(PointError::Prefix { prefix });
        }
        let x = biguint_from_be_slice(&bytes[1..]);
        if x >= curve.prime {
            return Err(PointError::CoordinateOutOfRange);
        }

        let field = curve.field();
        let rhs = curve.equation_rhs(&x);
        let beta = field.sqrt(&rhs)
            .ok_or(PointError::NotOnCurve)?;
        let want_odd = prefix == 0x03;
        if beta.is_zero() && want_odd {
            // y = 0 has no odd representative
            return Err(PointError::Prefix { prefix });
        }
        let y = if beta.bit(0) == want_odd {
            beta
        } else {
            field.sub(&BigUint::zero(), &beta)
        };
        Ok(Self { x, y })
    }
}


/// An elliptic curve of the form `y**2 ≡ x**3 + ax + b` modulo a prime number.
///
/// Two curves are equal if their primes and reduced coefficients match; the cofactor is not
/// considered.
#[derive(Clone, Debug)]
pub struct PrimeWeierstrassCurve {
    /// The prime (modulus) of the curve.
    prime: BigUint,

    /// Coefficient `a` in the curve's formula, reduced modulo the prime.
    coefficient_a: BigUint,

    /// Coefficient `b` in the curve's formula, reduced modulo the prime.
    coefficient_b: BigUint,

    /// The cofactor of the curve, if known.
    ///
    /// A cofactor n means that only each nth point on the curve is part of the group generated by
    /// the base point.
    cofactor: Option<BigUint>,
}
impl PrimeWeierstrassCurve {
    pub fn new(
        prime: BigUint,
        coefficient_a: BigUint,
        coefficient_b: BigUint,
        cofactor: Option<BigUint>,
    ) -> Result<Self, CurveError> {
        if prime < BigUint::from(3u8) || !prime.bit(0) {
            return Err(CurveError::InvalidPrime { prime });
        }
        let coefficient_a = coefficient_a % &prime;
        let coefficient_b = coefficient_b % &prime;
        Ok(Self {
            prime,
            coefficient_a,
            coefficient_b,
            cofactor,
        })
    }

    pub fn prime(&self) -> &BigUint { &self.prime }
    pub fn coefficient_a(&self) -> &BigUint { &self.coefficient_a }
    pub fn coefficient_b(&self) -> &BigUint { &self.coefficient_b }
    pub fn cofactor(&self) -> Option<&BigUint> { self.cofactor.as_ref() }

    /// The number of bytes in a single serialized coordinate.
    pub fn field_len_bytes(&self) -> usize {
        orderlen(&self.prime)
    }

    fn field(&self) -> Field<'_> {
        Field { prime: &self.prime }
    }

    /// `x**3 + ax + b`
    fn equation_rhs(&self, x: &BigUint) -> BigUint {
        let field = self.field();
        let x_cubed = field.mul(&field.square(x), x);
        let ax = field.mul(&self.coefficient_a, x);
        field.add(&field.add(&x_cubed, &ax), &self.coefficient_b)
    }

    pub fn contains_point(&self, point: &AffinePoint) -> bool {
        if point.x >= self.prime || point.y >= self.prime {
            return false;
        }
        self.field().square(&point.y) == self.equation_rhs(&point.x)
    }

    fn to_affine(&self, point: &ProjectivePoint) -> Option<AffinePoint> {
        let field = self.field();
        let z_inverse = field.invert(&point.z)?;
        Some(AffinePoint {
            x: field.mul(&point.x, &z_inverse),
            y: field.mul(&point.y, &z_inverse),
        })
    }

    fn double_point(&self, point: &ProjectivePoint) -> ProjectivePoint {
        // Renes/Costello/Batina 2015 (https://eprint.iacr.org/2015/1060), Algorithm 3
        let f = self.field();
        let a = &self.coefficient_a;
        let b3 = f.add(&f.add(&self.coefficient_b, &self.coefficient_b), &self.coefficient_b);

        let mut t0 = f.mul(&point.x, &point.x);
        let t1 = f.mul(&point.y, &point.y);
        let mut t2 = f.mul(&point.z, &point.z);
        let mut t3 = f.mul(&point.x, &point.y);
        t3 = f.add(&t3, &t3);
        let mut z3 = f.mul(&point.x, &point.z);
        z3 = f.add(&z3, &z3);
        let mut x3 = f.mul(a, &z3);
        let mut y3 = f.mul(&b3, &t2);
        y3 = f.add(&x3, &y3);
        x3 = f.sub(&t1, &y3);
        y3 = f.add(&t1, &y3);
        y3 = f.mul(&x3, &y3);
        x3 = f.mul(&t3, &x3);
        z3 = f.mul(&b3, &z3);
        t2 = f.mul(a, &t2);
        t3 = f.sub(&t0, &t2);
        t3 = f.mul(a, &t3);
        t3 = f.add(&t3, &z3);
        z3 = f.add(&t0, &t0);
        t0 = f.add(&z3, &t0);
        t0 = f.add(&t0, &t2);
        t0 = f.mul(&t0, &t3);
        y3 = f.add(&y3, &t0);
        t2 = f.mul(&point.y, &point.z);
        t2 = f.add(&t2, &t2);
        t0 = f.mul(&t2, &t3);
        x3 = f.sub(&x3, &t0);
        z3 = f.mul(&t2, &t1);
        z3 = f.add(&z3, &z3);
        z3 = f.add(&z3, &z3);
        ProjectivePoint { x: x3, y: y3, z: z3 }
    }

    fn add_points(&self, lhs: &ProjectivePoint, rhs: &ProjectivePoint) -> ProjectivePoint {
        // Renes/Costello/Batina 2015 (https://eprint.iacr.org/2015/1060), Algorithm 1
        let f = self.field();
        let a = &self.coefficient_a;
        let b3 = f.add(&f.add(&self.coefficient_b, &self.coefficient_b), &self.coefficient_b);

        let mut t0 = f.mul(&lhs.x, &rhs.x);
        let mut t1 = f.mul(&lhs.y, &rhs.y);
        let mut t2 = f.mul(&lhs.z, &rhs.z);
        let mut t3 = f.add(&lhs.x, &lhs.y);
        let mut t4 = f.add(&rhs.x, &rhs.y);
        t3 = f.mul(&t3, &t4);
        t4 = f.add(&t0, &t1);
        t3 = f.sub(&t3, &t4);
        t4 = f.add(&lhs.x, &lhs.z);
        let mut t5 = f.add(&rhs.x, &rhs.z);
        t4 = f.mul(&t4, &t5);
        t5 = f.add(&t0, &t2);
        t4 = f.sub(&t4, &t5);
        t5 = f.add(&lhs.y, &lhs.z);
        let mut x3 = f.add(&rhs.y, &rhs.z);
        t5 = f.mul(&t5, &x3);
        x3 = f.add(&t1, &t2);
        t5 = f.sub(&t5, &x3);
        let mut z3 = f.mul(a, &t4);
        x3 = f.mul(&b3, &t2);
        z3 = f.add(&x3, &z3);
        x3 = f.sub(&t1, &z3);
        z3 = f.add(&t1, &z3);
        let mut y3 = f.mul(&x3, &z3);
        t1 = f.add(&t0, &t0);
        t1 = f.add(&t1, &t0);
        t2 = f.mul(a, &t2);
        t4 = f.mul(&b3, &t4);
        t1 = f.add(&t1, &t2);
        t2 = f.sub(&t0, &t2);
        t2 = f.mul(a, &t2);
        t4 = f.add(&t4, &t2);
        t0 = f.mul(&t1, &t4);
        y3 = f.add(&y3, &t0);
        t0 = f.mul(&t5, &t4);
        x3 = f.mul(&t3, &x3);
        x3 = f.sub(&x3, &t0);
        t0 = f.mul(&t3, &t1);
        z3 = f.mul(&t5, &z3);
        z3 = f.add(&z3, &t0);
        ProjectivePoint { x: x3, y: y3, z: z3 }
    }

    /// Multiplies a point by a scalar; `None` is the point at infinity.
    ///
    /// Curve parameters are public, so this makes no attempt at running in constant time.
    pub fn multiply(&self, scalar: &BigUint, point: &AffinePoint) -> Option<AffinePoint> {
        let mut result = ProjectivePoint::identity();
        let mut double_me = ProjectivePoint::from_affine(point);
        for i in 0..scalar.bits() {
            if scalar.bit(i) {
                result = self.add_points(&result, &double_me);
            }
            double_me = self.double_point(&double_me);
        }
        self.to_affine(&result)
    }

    /// Adds two points; `None` is the point at infinity.
    pub fn add(&self, lhs: &AffinePoint, rhs: &AffinePoint) -> Option<AffinePoint> {
        let sum = self.add_points(&ProjectivePoint::from_affine(lhs), &ProjectivePoint::from_affine(rhs));
        self.to_affine(&sum)
    }
}
impl PartialEq for PrimeWeierstrassCurve {
    fn eq(&self, other: &Self) -> bool {
        self.prime == other.prime
            && self.coefficient_a == other.coefficient_a
            && self.coefficient_b == other.coefficient_b
    }
}
impl Eq for PrimeWeierstrassCurve {}


/// The base point of a curve together with its declared order.
///
/// Generators compare equal if their coordinates match; the declared order is not considered.
#[derive(Clone, Debug)]
pub struct Generator {
    point: AffinePoint,
    order: BigUint,
}
impl Generator {
    /// Creates a generator from a point that must lie on the curve.
    pub fn new(curve: &PrimeWeierstrassCurve, point: AffinePoint, order: BigUint) -> Result<Self, PointError> {
        if !curve.contains_point(&point) {
            return Err(PointError::NotOnCurve);
        }
        Ok(Self { point, order })
    }

    /// Decodes a generator from bytes, accepting only the given encodings.
    pub fn from_bytes(
        curve: &PrimeWeierstrassCurve,
        bytes: &[u8],
        valid_encodings: &[PointEncoding],
        order: BigUint,
    ) -> Result<Self, PointError> {
        let point = AffinePoint::from_bytes(curve, bytes, valid_encodings)?;
        Ok(Self { point, order })
    }

    pub fn point(&self) -> &AffinePoint { &self.point }
    pub fn order(&self) -> &BigUint { &self.order }

    pub fn to_bytes(&self, curve: &PrimeWeierstrassCurve, encoding: PointEncoding) -> Vec<u8> {
        self.point.to_bytes(curve, encoding)
    }

    /// Checks that multiplying the generator by its declared order yields the point at infinity.
    pub fn has_order(&self, curve: &PrimeWeierstrassCurve) -> bool {
        !self.order.is_zero() && curve.multiply(&self.order, &self.point).is_none()
    }
}
impl PartialEq for Generator {
    fn eq(&self, other: &Self) -> bool {
        self.point == other.point
    }
}
impl Eq for Generator {}
