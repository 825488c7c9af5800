use log::debug;
use num_bigint::BigUint;
use num_traits::Zero;

use crate::arith::{hex_decode, to_fixed_bytes};
use crate::ec::curve::CurveParams;
use crate::ec::point::Point;
use crate::ec::random::random_scalar;
use crate::error::{Error, Result};
use crate::HexKey;

/// 私钥 32 bytes
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PrivateKey(BigUint);

impl PrivateKey {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != 32 {
            return Err(Error::InvalidLength { expected: 32, actual: bytes.len() });
        }
        let d = BigUint::from_bytes_be(bytes);
        if d.is_zero() {
            return Err(Error::InvalidPrivateKey);
        }
        Ok(PrivateKey(d))
    }

    pub fn to_bytes(&self) -> Result<[u8; 32]> {
        to_fixed_bytes::<32>(&self.0)
    }

    pub fn scalar(&self) -> &BigUint {
        &self.0
    }
}

impl HexKey for PrivateKey {
    fn encode(&self) -> Result<String> {
        Ok(hex::encode(self.to_bytes()?))
    }

    fn decode(key: &str) -> Result<Self> {
        PrivateKey::from_bytes(&hex_decode(key, 32)?)
    }
}

/// 公钥
///
/// Fixed form is x || y, 32 bytes each. The uncompressed form prefixes 0x04.
/// Decoding never checks that the point lies on a curve; see [`PublicKey::validate`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PublicKey(Point);

impl PublicKey {
    pub fn new(point: Point) -> Self {
        PublicKey(point)
    }

    pub fn point(&self) -> &Point {
        &self.0
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(PublicKey(Point::from_bytes(bytes)?))
    }

    pub fn to_bytes(&self) -> Result<[u8; 64]> {
        self.0.to_bytes()
    }

    /// 0x04 || x || y
    pub fn to_uncompressed(&self) -> Result<[u8; 65]> {
        let mut key = [0u8; 65];
        key[0] = 0x04;
        key[1..].copy_from_slice(&self.to_bytes()?);
        Ok(key)
    }

    pub fn from_uncompressed(bytes: &[u8]) -> Result<Self> {
        match bytes.first() {
            None => Err(Error::EmptyInput),
            Some(0x04) => PublicKey::from_bytes(&bytes[1..]),
            Some(tag) => Err(Error::InvalidPointTag(*tag)),
        }
    }

    pub fn validate(&self, curve: &CurveParams) -> Result<()> {
        if curve.contains(&self.0) {
            Ok(())
        } else {
            Err(Error::NotOnCurve)
        }
    }
}

impl HexKey for PublicKey {
    fn encode(&self) -> Result<String> {
        Ok(hex::encode(self.to_uncompressed()?))
    }

    fn decode(key: &str) -> Result<Self> {
        PublicKey::from_uncompressed(&hex_decode(key, 65)?)
    }
}

/// Signature (r, s), 32 bytes each.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Signature {
    r: BigUint,
    s: BigUint,
}

impl Signature {
    pub fn new(r: BigUint, s: BigUint) -> Self {
        Signature { r, s }
    }

    pub fn r(&self) -> &BigUint {
        &self.r
    }

    pub fn s(&self) -> &BigUint {
        &self.s
    }

    pub fn to_bytes(&self) -> Result<[u8; 64]> {
        let mut out = [0u8; 64];
        out[..32].copy_from_slice(&to_fixed_bytes::<32>(&self.r)?);
        out[32..].copy_from_slice(&to_fixed_bytes::<32>(&self.s)?);
        Ok(out)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != 64 {
            return Err(Error::InvalidLength { expected: 64, actual: bytes.len() });
        }
        Ok(Signature::new(
            BigUint::from_bytes_be(&bytes[..32]),
            BigUint::from_bytes_be(&bytes[32..]),
        ))
    }
}

impl HexKey for Signature {
    fn encode(&self) -> Result<String> {
        Ok(hex::encode(self.to_bytes()?))
    }

    fn decode(key: &str) -> Result<Self> {
        Signature::from_bytes(&hex_decode(key, 64)?)
    }
}

/// Parity of R.y for the nonce point R used in a signature.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RecoveryId(u8);

impl RecoveryId {
    pub fn new(id: u8) -> Result<Self> {
        match id {
            0 | 1 => Ok(RecoveryId(id)),
            _ => Err(Error::InvalidRecoveryId(id)),
        }
    }

    pub(crate) fn from_parity(odd: bool) -> Self {
        RecoveryId(odd as u8)
    }

    pub fn is_y_odd(&self) -> bool {
        self.0 == 1
    }

    pub fn to_u8(&self) -> u8 {
        self.0
    }

    pub(crate) fn flip(self) -> Self {
        RecoveryId(self.0 ^ 1)
    }
}

/// 秘钥对（d, P）d:私钥 P:公钥
#[derive(Clone, Debug)]
pub struct KeyPair(PrivateKey, PublicKey);

impl KeyPair {
    pub fn private_key(&self) -> &PrivateKey {
        &self.0
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.1
    }
}

/// 秘钥生成器
pub struct KeyGenerator {
    curve: &'static CurveParams,
}

impl KeyGenerator {
    pub fn new(curve: &'static CurveParams) -> Self {
        KeyGenerator { curve }
    }

    pub fn gen_key_pair(&self) -> Result<KeyPair> {
        let private_key = self.gen_private_key();
        let public_key = self.gen_public_key(&private_key)?;
        debug!("generated {} key pair", self.curve.name());
        Ok(KeyPair(private_key, public_key))
    }

    /// d ∈ [1, n-1]
    pub fn gen_private_key(&self) -> PrivateKey {
        PrivateKey(random_scalar(self.curve.n()))
    }

    /// P = (x,y) = dG, G为基点，d为私钥
    pub fn gen_public_key(&self, private_key: &PrivateKey) -> Result<PublicKey> {
        let point = self.curve.scalar_base_multiply(&private_key.0)?;
        Ok(PublicKey(point))
    }
}
