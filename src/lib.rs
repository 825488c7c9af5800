//! secp256k1 signatures with public key recovery, SM2 signing and encryption,
//! and the Paillier homomorphic cryptosystem.

mod arith;

pub mod ec;
pub mod error;
pub mod paillier;
pub mod secp256k1;
pub mod sm2;
pub mod sm3;

pub use error::{Error, Result};

/// Hex text form of keys and signatures.
pub trait HexKey: Sized {
    fn encode(&self) -> Result<String>;
    fn decode(key: &str) -> Result<Self>;
}
