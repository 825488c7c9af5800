use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::Zero;

use crate::arith::{mod_inverse, mod_sub, to_fixed_bytes};
use crate::ec::curve::CurveParams;
use crate::error::{Error, Result};

/// Affine coordinates: (x, y) with y^2 = x^3 + ax + b (mod p).
///
/// There is no encoding of the point at infinity; operations that would
/// reach it fail with [`Error::PointAtInfinity`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Point {
    x: BigUint,
    y: BigUint,
}

impl Point {
    pub fn new(x: BigUint, y: BigUint) -> Self {
        Point { x, y }
    }

    pub fn x(&self) -> &BigUint {
        &self.x
    }

    pub fn y(&self) -> &BigUint {
        &self.y
    }

    pub fn is_odd_y(&self) -> bool {
        self.y.is_odd()
    }

    /// (x, y) => (x, p - y)
    pub fn negate(&self, p: &BigUint) -> Point {
        Point::new(self.x.clone(), mod_sub(&BigUint::zero(), &self.y, p))
    }

    /// x || y, 32 bytes each.
    pub fn to_bytes(&self) -> Result<[u8; 64]> {
        let mut out = [0u8; 64];
        out[..32].copy_from_slice(&to_fixed_bytes::<32>(&self.x)?);
        out[32..].copy_from_slice(&to_fixed_bytes::<32>(&self.y)?);
        Ok(out)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != 64 {
            return Err(Error::InvalidLength { expected: 64, actual: bytes.len() });
        }
        Ok(Point::new(
            BigUint::from_bytes_be(&bytes[..32]),
            BigUint::from_bytes_be(&bytes[32..]),
        ))
    }
}

impl CurveParams {
    /// P1 + P2 for two points with distinct x-coordinates.
    ///
    /// λ = (y1 - y2) / (x1 - x2)
    /// x3 = λ^2 - x1 - x2
    /// y3 = λ(x1 - x3) - y1
    pub fn add_points(&self, p1: &Point, p2: &Point) -> Result<Point> {
        let p = self.p();
        if p1.x == p2.x {
            // either P + P or P + (-P)
            return Err(Error::PointAtInfinity);
        }
        let inv = mod_inverse(&mod_sub(&p1.x, &p2.x, p), p)?;
        let lambda = mod_sub(&p1.y, &p2.y, p) * inv % p;
        self.chord(&lambda, p1, &p2.x)
    }

    /// 2P with λ = (3x^2 + a) / 2y
    pub fn double_point(&self, point: &Point) -> Result<Point> {
        let p = self.p();
        if point.y.is_zero() {
            return Err(Error::PointAtInfinity);
        }
        let inv = mod_inverse(&((&point.y << 1u32) % p), p)?;
        let lambda = ((&point.x * &point.x * 3u32 + self.a()) % p) * inv % p;
        self.chord(&lambda, point, &point.x)
    }

    fn chord(&self, lambda: &BigUint, p1: &Point, x2: &BigUint) -> Result<Point> {
        let p = self.p();
        let x3 = mod_sub(&mod_sub(&(lambda * lambda % p), &p1.x, p), x2, p);
        let y3 = mod_sub(&(lambda * mod_sub(&p1.x, &x3, p) % p), &p1.y, p);
        Ok(Point::new(x3, y3))
    }

    /// d * G for an arbitrary point G.
    ///
    /// Double-and-add from the second most significant bit of `d` down to bit 0;
    /// every addition adds the original `base`, never the accumulator.
    pub fn scalar_multiply(&self, base: &Point, scalar: &BigUint) -> Result<Point> {
        if scalar.is_zero() {
            return Err(Error::ZeroScalar);
        }
        let mut acc = base.clone();
        for i in (0..scalar.bits() - 1).rev() {
            acc = self.double_point(&acc)?;
            if scalar.bit(i) {
                acc = self.add_points(&acc, base)?;
            }
        }
        Ok(acc)
    }

    /// d * G for the curve's own base point.
    pub fn scalar_base_multiply(&self, scalar: &BigUint) -> Result<Point> {
        self.scalar_multiply(self.base(), scalar)
    }

    /// k mod n if k > n else k
    pub fn scalar_reduce(&self, scalar: BigUint) -> BigUint {
        if &scalar > self.n() {
            scalar.mod_floor(self.n())
        } else {
            scalar
        }
    }
}
