//! Paillier's additively homomorphic cryptosystem with g = n + 1.
//!
//! Plaintexts and ciphertexts travel as big-endian byte strings of any width;
//! leading zeros carry no meaning.

use log::debug;
use num_bigint::{BigUint, RandBigInt};
use num_integer::Integer;
use num_traits::{One, Zero};
use rand::rngs::OsRng;

use crate::error::{Error, Result};

pub use self::key::{PaillierPrivateKey, PaillierPublicKey, MODULUS_SIZE};

mod key;
mod prime;

/// Draws of (p, q) before giving up on a key pair.
const MAX_KEY_ATTEMPTS: usize = 16;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PaillierConfig {
    /// Bit length of each of p and q.
    pub prime_bits: u64,
    /// Miller-Rabin rounds per candidate.
    pub rounds: usize,
}

impl Default for PaillierConfig {
    fn default() -> Self {
        PaillierConfig { prime_bits: 512, rounds: 25 }
    }
}

pub fn key_gen() -> Result<(PaillierPrivateKey, PaillierPublicKey)> {
    key_gen_with(&PaillierConfig::default())
}

/// n = p * q, l = lcm(p - 1, q - 1) for independent primes p != q.
pub fn key_gen_with(config: &PaillierConfig) -> Result<(PaillierPrivateKey, PaillierPublicKey)> {
    if config.prime_bits < 16 || config.rounds == 0 {
        return Err(Error::ValueOutOfRange);
    }
    for attempt in 0..MAX_KEY_ATTEMPTS {
        let p = prime::random_prime(config.prime_bits, config.rounds);
        let q = prime::random_prime(config.prime_bits, config.rounds);
        if p == q {
            continue;
        }
        match PaillierPrivateKey::from_primes(&p, &q) {
            Ok(sk) => {
                debug!("generated paillier key pair with a {} bit modulus", sk.n().bits());
                let pk = sk.public_key().clone();
                return Ok((sk, pk));
            }
            Err(err) => debug!("paillier key attempt {} rejected: {}", attempt + 1, err),
        }
    }
    Err(Error::RetryLimitExceeded(MAX_KEY_ATTEMPTS))
}

fn import(bytes: &[u8]) -> Result<BigUint> {
    if bytes.is_empty() {
        return Err(Error::EmptyInput);
    }
    Ok(BigUint::from_bytes_be(bytes))
}

fn import_cipher(pk: &PaillierPublicKey, bytes: &[u8]) -> Result<BigUint> {
    let c = import(bytes)?;
    if &c >= pk.n_squared() {
        return Err(Error::ValueOutOfRange);
    }
    Ok(c)
}

/// r uniform in [1, n) and coprime to n.
fn random_nonce(n: &BigUint) -> BigUint {
    let one = BigUint::one();
    loop {
        let r = OsRng.gen_biguint_range(&one, n);
        if r.gcd(n).is_one() {
            return r;
        }
    }
}

/// c = (1 + m * n) * r^n mod n^2
pub fn encrypt(pk: &PaillierPublicKey, msg: &[u8]) -> Result<Vec<u8>> {
    let m = import(msg)?;
    let (n, nn) = (pk.n(), pk.n_squared());
    if &m >= n {
        return Err(Error::ValueOutOfRange);
    }
    let r = random_nonce(n);
    let gm = (BigUint::one() + &m * n) % nn;
    let c = gm * r.modpow(n, nn) % nn;
    Ok(c.to_bytes_be())
}

/// m = L(c^l mod n^2) * l^-1 mod n, L(u) = (u - 1) / n
pub fn decrypt_to_biguint(sk: &PaillierPrivateKey, cipher: &[u8]) -> Result<BigUint> {
    let pk = sk.public_key();
    let c = import_cipher(pk, cipher)?;
    let (n, nn) = (pk.n(), pk.n_squared());

    let u = c.modpow(sk.l(), nn);
    if u.is_zero() {
        // c is a multiple of n
        return Err(Error::ValueOutOfRange);
    }
    let lu = (u - BigUint::one()) / n;
    Ok(lu * sk.mu() % n)
}

/// Minimal big-endian plaintext; zero decrypts to a single 0 byte.
pub fn decrypt(sk: &PaillierPrivateKey, cipher: &[u8]) -> Result<Vec<u8>> {
    Ok(decrypt_to_biguint(sk, cipher)?.to_bytes_be())
}

/// E(a) * E(b) mod n^2 = E(a + b mod n)
pub fn add(pk: &PaillierPublicKey, cipher0: &[u8], cipher1: &[u8]) -> Result<Vec<u8>> {
    let c0 = import_cipher(pk, cipher0)?;
    let c1 = import_cipher(pk, cipher1)?;
    Ok((c0 * c1 % pk.n_squared()).to_bytes_be())
}

/// E(a)^k mod n^2 = E(a * k mod n)
pub fn mul(pk: &PaillierPublicKey, cipher: &[u8], msg: &[u8]) -> Result<Vec<u8>> {
    let c = import_cipher(pk, cipher)?;
    let k = import(msg)?;
    Ok(c.modpow(&k, pk.n_squared()).to_bytes_be())
}
