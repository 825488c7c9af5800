use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::{One, Zero};

use crate::arith::{hex_decode, mod_inverse, to_fixed_bytes};
use crate::error::{Error, Result};
use crate::HexKey;

/// Width of n and l in the fixed encodings.
pub const MODULUS_SIZE: usize = 128;

/// pk = n, with g = n + 1 implied.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PaillierPublicKey {
    n: BigUint,
    nn: BigUint,
}

impl PaillierPublicKey {
    /// n must be odd and greater than 1.
    pub fn new(n: BigUint) -> Result<Self> {
        if n <= BigUint::one() || n.is_even() {
            return Err(Error::InvalidPublicKey);
        }
        let nn = &n * &n;
        Ok(PaillierPublicKey { n, nn })
    }

    pub fn n(&self) -> &BigUint {
        &self.n
    }

    pub fn n_squared(&self) -> &BigUint {
        &self.nn
    }

    pub fn to_bytes(&self) -> Result<[u8; MODULUS_SIZE]> {
        to_fixed_bytes::<MODULUS_SIZE>(&self.n)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != MODULUS_SIZE {
            return Err(Error::InvalidLength { expected: MODULUS_SIZE, actual: bytes.len() });
        }
        PaillierPublicKey::new(BigUint::from_bytes_be(bytes))
    }
}

impl HexKey for PaillierPublicKey {
    fn encode(&self) -> Result<String> {
        Ok(hex::encode(self.to_bytes()?))
    }

    fn decode(key: &str) -> Result<Self> {
        PaillierPublicKey::from_bytes(&hex_decode(key, MODULUS_SIZE)?)
    }
}

/// sk = (n, l), l = lcm(p - 1, q - 1). Encoded as n || l.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PaillierPrivateKey {
    public_key: PaillierPublicKey,
    l: BigUint,
    // l^-1 mod n
    mu: BigUint,
}

impl PaillierPrivateKey {
    pub fn new(n: BigUint, l: BigUint) -> Result<Self> {
        let public_key = PaillierPublicKey::new(n).map_err(|_| Error::InvalidPrivateKey)?;
        if l.is_zero() {
            return Err(Error::InvalidPrivateKey);
        }
        let mu = mod_inverse(&l, public_key.n()).map_err(|_| Error::InvalidPrivateKey)?;
        Ok(PaillierPrivateKey { public_key, l, mu })
    }

    pub(crate) fn from_primes(p: &BigUint, q: &BigUint) -> Result<Self> {
        let one = BigUint::one();
        let l = (p - &one).lcm(&(q - &one));
        PaillierPrivateKey::new(p * q, l)
    }

    pub fn public_key(&self) -> &PaillierPublicKey {
        &self.public_key
    }

    pub fn n(&self) -> &BigUint {
        self.public_key.n()
    }

    pub fn l(&self) -> &BigUint {
        &self.l
    }

    pub(crate) fn mu(&self) -> &BigUint {
        &self.mu
    }

    pub fn to_bytes(&self) -> Result<[u8; MODULUS_SIZE * 2]> {
        let mut out = [0u8; MODULUS_SIZE * 2];
        out[..MODULUS_SIZE].copy_from_slice(&self.public_key.to_bytes()?);
        out[MODULUS_SIZE..].copy_from_slice(&to_fixed_bytes::<MODULUS_SIZE>(&self.l)?);
        Ok(out)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != MODULUS_SIZE * 2 {
            return Err(Error::InvalidLength { expected: MODULUS_SIZE * 2, actual: bytes.len() });
        }
        let (n, l) = bytes.split_at(MODULUS_SIZE);
        PaillierPrivateKey::new(BigUint::from_bytes_be(n), BigUint::from_bytes_be(l))
    }
}

impl HexKey for PaillierPrivateKey {
    fn encode(&self) -> Result<String> {
        Ok(hex::encode(self.to_bytes()?))
    }

    fn decode(key: &str) -> Result<Self> {
        PaillierPrivateKey::from_bytes(&hex_decode(key, MODULUS_SIZE * 2)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toy_key() -> PaillierPrivateKey {
        PaillierPrivateKey::from_primes(&BigUint::from(61u32), &BigUint::from(53u32)).unwrap()
    }

    #[test]
    fn toy_parameters() {
        let sk = toy_key();
        assert_eq!(sk.n(), &BigUint::from(3233u32));
        assert_eq!(sk.public_key().n_squared(), &BigUint::from(3233u32 * 3233));
        assert_eq!(sk.l(), &BigUint::from(780u32));
        assert_eq!((sk.l() * sk.mu()) % sk.n(), BigUint::one());
    }

    #[test]
    fn fixed_width_codec() {
        let sk = toy_key();
        let bytes = sk.to_bytes().unwrap();
        assert_eq!(&bytes[MODULUS_SIZE - 2..MODULUS_SIZE], &[0x0c, 0xa1]);
        assert_eq!(&bytes[MODULUS_SIZE * 2 - 2..], &[0x03, 0x0c]);
        assert_eq!(PaillierPrivateKey::from_bytes(&bytes).unwrap(), sk);

        let pk = PaillierPublicKey::decode(&sk.public_key().encode().unwrap()).unwrap();
        assert_eq!(&pk, sk.public_key());
    }

    #[test]
    fn malformed_keys() {
        assert_eq!(
            PaillierPublicKey::from_bytes(&[1u8; 64]),
            Err(Error::InvalidLength { expected: 128, actual: 64 })
        );
        assert_eq!(PaillierPublicKey::from_bytes(&[0u8; 128]), Err(Error::InvalidPublicKey));
        assert_eq!(PaillierPublicKey::new(BigUint::from(3232u32)), Err(Error::InvalidPublicKey));
        assert_eq!(PaillierPrivateKey::decode("zz"), Err(Error::InvalidLength { expected: 512, actual: 2 }));
        // gcd(l, n) != 1
        assert_eq!(
            PaillierPrivateKey::new(BigUint::from(3233u32), BigUint::from(61u32)),
            Err(Error::InvalidPrivateKey)
        );
        assert_eq!(
            PaillierPrivateKey::new(BigUint::from(3233u32), BigUint::zero()),
            Err(Error::InvalidPrivateKey)
        );
    }

    #[test]
    fn wide_modulus_does_not_fit() {
        let n = (BigUint::one() << 1024u32) + BigUint::one();
        let pk = PaillierPublicKey::new(n).unwrap();
        assert_eq!(pk.to_bytes(), Err(Error::ValueOutOfRange));
    }
}
