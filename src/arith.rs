//! Modular arithmetic and fixed-width codecs shared by the curve engine and Paillier.

use num_bigint::{BigUint, ToBigInt};
use num_integer::Integer;
use num_traits::{One, Zero};

use crate::error::{Error, Result};

/// Decodes hex text that must hold exactly `expected` bytes.
pub(crate) fn hex_decode(data: &str, expected: usize) -> Result<Vec<u8>> {
    if data.len() != expected * 2 {
        return Err(Error::InvalidLength { expected: expected * 2, actual: data.len() });
    }
    hex::decode(data).map_err(|_| Error::InvalidHex)
}

/// (a - b) mod m, for any a and b.
pub(crate) fn mod_sub(a: &BigUint, b: &BigUint, m: &BigUint) -> BigUint {
    let (a, b) = (a % m, b % m);
    if a >= b {
        a - b
    } else {
        m - (b - a)
    }
}

/// a^-1 mod m via the extended euclidean algorithm.
pub(crate) fn mod_inverse(a: &BigUint, m: &BigUint) -> Result<BigUint> {
    let a = a % m;
    if a.is_zero() {
        return Err(Error::NotInvertible);
    }
    let (a, m) = (
        a.to_bigint().ok_or(Error::NotInvertible)?,
        m.to_bigint().ok_or(Error::NotInvertible)?,
    );
    let gcd = a.extended_gcd(&m);
    if !gcd.gcd.is_one() {
        return Err(Error::NotInvertible);
    }
    gcd.x.mod_floor(&m).to_biguint().ok_or(Error::NotInvertible)
}

/// Left-zero-padded big-endian export into exactly `N` bytes.
pub(crate) fn to_fixed_bytes<const N: usize>(value: &BigUint) -> Result<[u8; N]> {
    let bytes = value.to_bytes_be();
    if bytes.len() > N {
        return Err(Error::ValueOutOfRange);
    }
    let mut out = [0u8; N];
    out[N - bytes.len()..].copy_from_slice(&bytes);
    Ok(out)
}
