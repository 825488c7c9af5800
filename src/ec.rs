//! Affine point arithmetic over the two supported short weierstrass curves,
//! plus the key and signature value types shared by both schemes.

pub mod curve;
pub mod key;
pub mod point;
pub mod random;

pub use curve::{secp256k1, sm2p256v1, CurveParams};
pub use key::{KeyGenerator, KeyPair, PrivateKey, PublicKey, RecoveryId, Signature};
pub use point::Point;
pub use crate::HexKey;
