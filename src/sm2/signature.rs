//! SM2 digital signature (GB/T 32918.2).

use log::debug;
use num_bigint::BigUint;
use num_traits::Zero;

use crate::arith::{mod_inverse, mod_sub, to_fixed_bytes};
use crate::ec::curve::CurveParams;
use crate::ec::key::{PrivateKey, PublicKey, Signature};
use crate::ec::random::random_scalar;
use crate::error::{Error, Result};
use crate::sm3::Sm3;

/// The default distinguishing identifier of the signer.
pub const DEFAULT_USER_ID: &[u8] = b"1234567812345678";

/// Za = SM3(ENTL || ID || a || b || gx || gy || x || y), ENTL being the bit
/// length of ID as 16-bit big-endian.
pub fn za(curve: &CurveParams, user_id: &[u8], public_key: &PublicKey) -> Result<[u8; 32]> {
    let entl = user_id
        .len()
        .checked_mul(8)
        .and_then(|bits| u16::try_from(bits).ok())
        .ok_or(Error::UserIdTooLong(user_id.len()))?;

    let mut hasher = Sm3::new();
    hasher
        .update(&entl.to_be_bytes())
        .update(user_id)
        .update(&to_fixed_bytes::<32>(curve.a())?)
        .update(&to_fixed_bytes::<32>(curve.b())?)
        .update(&to_fixed_bytes::<32>(curve.gx())?)
        .update(&to_fixed_bytes::<32>(curve.gy())?)
        .update(&public_key.to_bytes()?);
    Ok(hasher.finalize())
}

/// e = SM3(Za || M)
pub(crate) fn message_digest(
    curve: &CurveParams,
    user_id: &[u8],
    public_key: &PublicKey,
    msg: &[u8],
) -> Result<BigUint> {
    let mut hasher = Sm3::new();
    hasher.update(&za(curve, user_id, public_key)?).update(msg);
    Ok(BigUint::from_bytes_be(&hasher.finalize()))
}

/// r = (e + x1) mod n, s = (1 + d)^-1 * (k - r * d) mod n
pub(crate) fn sign(
    curve: &CurveParams,
    private_key: &PrivateKey,
    msg: &[u8],
    user_id: &[u8],
    max_retries: usize,
) -> Result<Signature> {
    let n = curve.n();
    let d = private_key.scalar();
    let public_key = PublicKey::new(curve.scalar_base_multiply(d)?);
    let e = message_digest(curve, user_id, &public_key, msg)?;
    // d = n - 1 has no (1 + d)^-1
    let inv = mod_inverse(&(d + BigUint::from(1u8)), n).map_err(|_| Error::InvalidPrivateKey)?;

    for attempt in 0..max_retries {
        let k = random_scalar(n);
        let point = curve.scalar_base_multiply(&k)?;
        let r = (&e + point.x()) % n;
        if r.is_zero() || &r + &k == *n {
            debug!("sm2 nonce rejected on attempt {}", attempt + 1);
            continue;
        }
        let s = mod_sub(&k, &(&r * d), n) * &inv % n;
        if s.is_zero() {
            debug!("sm2 nonce rejected on attempt {}", attempt + 1);
            continue;
        }
        return Ok(Signature::new(r, s));
    }
    Err(Error::RetryLimitExceeded(max_retries))
}

/// t = (r + s) mod n, (x1, y1) = sG + tP; accepts iff (e + x1) mod n == r.
pub(crate) fn verify(
    curve: &CurveParams,
    public_key: &PublicKey,
    msg: &[u8],
    signature: &Signature,
    user_id: &[u8],
) -> Result<bool> {
    let n = curve.n();
    let (r, s) = (signature.r(), signature.s());
    if r.is_zero() || r >= n || s.is_zero() || s >= n {
        return Err(Error::ValueOutOfRange);
    }
    let e = message_digest(curve, user_id, public_key, msg)?;
    let t = (r + s) % n;
    if t.is_zero() {
        return Ok(false);
    }
    let b0 = curve.scalar_base_multiply(s)?;
    let b1 = curve.scalar_multiply(public_key.point(), &t)?;
    let point = curve.add_points(&b0, &b1)?;
    Ok((e + point.x()) % n == *r)
}
