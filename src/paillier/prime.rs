use num_bigint::{BigUint, RandBigInt};
use num_integer::Integer;
use num_traits::{One, Zero};
use rand::rngs::OsRng;

const SMALL_PRIMES: [u32; 15] = [3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53];

/// Miller-Rabin with `rounds` random witnesses, after trial division by small primes.
pub(crate) fn is_probable_prime(n: &BigUint, rounds: usize) -> bool {
    let two = BigUint::from(2u8);
    if n < &two {
        return false;
    }
    if n.is_even() {
        return n == &two;
    }
    for p in SMALL_PRIMES {
        let p = BigUint::from(p);
        if n == &p {
            return true;
        }
        if (n % &p).is_zero() {
            return false;
        }
    }

    // n - 1 = d * 2^r
    let n_minus_1 = n - BigUint::one();
    let r = n_minus_1.trailing_zeros().unwrap_or(0);
    let d = &n_minus_1 >> r;

    for _ in 0..rounds {
        let a = OsRng.gen_biguint_range(&two, &n_minus_1);
        if !witness(n, &n_minus_1, &a, &d, r) {
            return false;
        }
    }
    true
}

/// true when `a` does not prove n composite
fn witness(n: &BigUint, n_minus_1: &BigUint, a: &BigUint, d: &BigUint, r: u64) -> bool {
    let mut x = a.modpow(d, n);
    if x.is_one() || &x == n_minus_1 {
        return true;
    }
    for _ in 1..r {
        x = &x * &x % n;
        if &x == n_minus_1 {
            return true;
        }
        if x.is_one() {
            return false;
        }
    }
    false
}

/// A random probable prime of exactly `bits` bits.
pub(crate) fn random_prime(bits: u64, rounds: usize) -> BigUint {
    loop {
        let mut candidate = OsRng.gen_biguint(bits);
        // top bit keeps the width, low bit keeps it odd
        candidate |= (BigUint::one() << (bits - 1)) | BigUint::one();
        if is_probable_prime(&candidate, rounds) {
            return candidate;
        }
    }
}
