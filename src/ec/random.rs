use num_bigint::BigUint;
use num_traits::Zero;
use rand::rngs::OsRng;
use rand::RngCore;

/// Draws 32 random bytes from the operating system's CSPRNG.
///
/// The seed only tells successive draws apart at the call site; it contributes
/// no entropy and never makes the output predictable.
pub fn random_k(_seed: u16) -> [u8; 32] {
    let mut k = [0u8; 32];
    OsRng.fill_bytes(&mut k);
    k
}

/// A uniformly random scalar in [1, n - 1], by rejection sampling over [`random_k`].
pub fn random_scalar(n: &BigUint) -> BigUint {
    let mut seed: u16 = 0;
    loop {
        let k = BigUint::from_bytes_be(&random_k(seed));
        if !k.is_zero() && &k < n {
            return k;
        }
        seed = seed.wrapping_add(1);
    }
}
