//! ECDSA-style signatures over secp256k1 with public key recovery.
//!
//! The message is used as-is as a big-endian integer; callers hash it first
//! (usually with Keccak-256 or SHA-256). The signature's `r` is the x-coordinate
//! of the nonce point taken mod p and is not re-reduced mod n.

use log::debug;
use num_bigint::BigUint;
use num_traits::{One, Zero};

use crate::arith::mod_inverse;
use crate::ec::curve::{secp256k1, CurveParams};
use crate::ec::key::{KeyGenerator, KeyPair, PrivateKey, PublicKey, RecoveryId, Signature};
use crate::ec::point::Point;
use crate::ec::random::random_scalar;
use crate::error::{Error, Result};

/// Upper bound on nonce draws per signature.
const MAX_SIGN_ATTEMPTS: usize = 64;

pub fn generate_key() -> Result<KeyPair> {
    KeyGenerator::new(secp256k1()).gen_key_pair()
}

pub fn derive_public_key(private_key: &PrivateKey) -> Result<PublicKey> {
    KeyGenerator::new(secp256k1()).gen_public_key(private_key)
}

/// s = (d * r + m) * k^-1 mod n, r = (k * G).x
///
/// `s` is normalized to the lower half of [1, n-1]; the recovery id is the
/// parity of R.y, flipped along with `s`.
pub fn sign(private_key: &PrivateKey, msg: &[u8]) -> Result<(Signature, RecoveryId)> {
    if msg.is_empty() {
        return Err(Error::EmptyInput);
    }
    let curve = secp256k1();
    let n = curve.n();
    let d = private_key.scalar();
    let m = BigUint::from_bytes_be(msg);

    for _ in 0..MAX_SIGN_ATTEMPTS {
        let k = random_scalar(n);
        let point = curve.scalar_base_multiply(&k)?;
        let r = point.x().clone();
        if (&r % n).is_zero() {
            continue;
        }
        let mut v = RecoveryId::from_parity(point.is_odd_y());

        let mut s = (d * &r + &m) * mod_inverse(&k, n)? % n;
        if s.is_zero() {
            continue;
        }
        if &s * 2u32 > *n {
            s = n - s;
            v = v.flip();
        }
        return Ok((Signature::new(r, s), v));
    }
    Err(Error::RetryLimitExceeded(MAX_SIGN_ATTEMPTS))
}

/// w = s^-1, u1 = m * w, u2 = r * w (mod n); accepts iff (u1 * G + u2 * P).x == r.
pub fn verify(public_key: &PublicKey, msg: &[u8], signature: &Signature) -> bool {
    match try_verify(secp256k1(), public_key, msg, signature) {
        Ok(valid) => valid,
        Err(err) => {
            debug!("secp256k1 verification rejected: {}", err);
            false
        }
    }
}

fn try_verify(
    curve: &CurveParams,
    public_key: &PublicKey,
    msg: &[u8],
    signature: &Signature,
) -> Result<bool> {
    if msg.is_empty() {
        return Err(Error::EmptyInput);
    }
    let n = curve.n();
    let (r, s) = (signature.r(), signature.s());
    if r.is_zero() || r >= curve.p() || s.is_zero() || s >= n {
        return Err(Error::ValueOutOfRange);
    }
    let m = BigUint::from_bytes_be(msg);

    let w = mod_inverse(s, n)?;
    let u1 = m * &w % n;
    let u2 = r * &w % n;
    // m = 0 mod n leaves u1 = 0, and r = n leaves u2 = 0
    let point = match (u1.is_zero(), u2.is_zero()) {
        (true, true) => return Ok(false),
        (true, false) => curve.scalar_multiply(public_key.point(), &u2)?,
        (false, true) => curve.scalar_base_multiply(&u1)?,
        (false, false) => {
            let b0 = curve.scalar_base_multiply(&u1)?;
            let b1 = curve.scalar_multiply(public_key.point(), &u2)?;
            curve.add_points(&b0, &b1)?
        }
    };
    Ok(point.x() % curve.p() == *r)
}

/// Q = r^-1 * (s * R - m * G), with R = (r, y) and the parity of y picked by `id`.
pub fn recover_public_key(signature: &Signature, msg: &[u8], id: RecoveryId) -> Result<PublicKey> {
    if msg.is_empty() {
        return Err(Error::EmptyInput);
    }
    let curve = secp256k1();
    let (p, n) = (curve.p(), curve.n());
    let (r, s) = (signature.r(), signature.s());
    if r.is_zero() || r >= p || s.is_zero() || s >= n {
        return Err(Error::ValueOutOfRange);
    }

    let nonce_point = lift_x(curve, r, id.is_y_odd())?;
    let m = BigUint::from_bytes_be(msg) % n;

    let sr = curve.scalar_multiply(&nonce_point, s)?;
    let sum = if m.is_zero() {
        sr
    } else {
        let mg = curve.scalar_base_multiply(&m)?;
        curve.add_points(&sr, &mg.negate(p))?
    };
    let q = curve.scalar_multiply(&sum, &mod_inverse(r, n)?)?;
    Ok(PublicKey::new(q))
}

/// y = (x^3 + b)^((p+1)/4) mod p, valid because p ≡ 3 (mod 4).
fn lift_x(curve: &CurveParams, x: &BigUint, odd: bool) -> Result<Point> {
    let p = curve.p();
    let y2 = (x * x % p * x + curve.b()) % p;
    let exp = (p + BigUint::one()) >> 2u32;
    let y = y2.modpow(&exp, p);
    if &y * &y % p != y2 {
        return Err(Error::NoSquareRoot);
    }
    let point = Point::new(x.clone(), y);
    if point.is_odd_y() == odd {
        Ok(point)
    } else {
        Ok(point.negate(p))
    }
}
