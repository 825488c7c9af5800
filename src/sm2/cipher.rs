//! SM2 public key encryption (GB/T 32918.4).

use log::warn;

use crate::ec::curve::{sm2p256v1, CurveParams};
use crate::ec::key::{PrivateKey, PublicKey};
use crate::ec::point::Point;
use crate::ec::random::random_scalar;
use crate::error::{Error, Result};
use crate::sm2::kdf::apply_keystream;
use crate::sm3::Sm3;

const C1_SIZE: usize = 65;
const C3_SIZE: usize = 32;

/// Ordering of the C2 (masked message) and C3 (digest) sections after C1.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    C1C2C3,
    C1C3C2,
}

/// C1 = kG, C2 = M ⊕ KDF(x2 || y2), C3 = SM3(x2 || M || y2)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cipher {
    c1: Point,
    c3: [u8; C3_SIZE],
    c2: Vec<u8>,
}

impl Cipher {
    /// Splits `0x04 || C1.x || C1.y` followed by C2/C3 in `mode` order.
    /// C2 must hold at least one byte.
    pub fn from_slice(cipher: &[u8], mode: Mode) -> Result<Self> {
        if cipher.len() <= C1_SIZE + C3_SIZE {
            return Err(Error::CipherTooShort(cipher.len()));
        }
        if cipher[0] != 0x04 {
            return Err(Error::InvalidPointTag(cipher[0]));
        }
        let (c1, rest) = cipher.split_at(C1_SIZE);
        let c1 = Point::from_bytes(&c1[1..])?;

        let (c2, c3) = match mode {
            Mode::C1C2C3 => {
                let (c2, c3) = rest.split_at(rest.len() - C3_SIZE);
                (c2, c3)
            }
            Mode::C1C3C2 => {
                let (c3, c2) = rest.split_at(C3_SIZE);
                (c2, c3)
            }
        };
        let mut digest = [0u8; C3_SIZE];
        digest.copy_from_slice(c3);

        Ok(Cipher { c1, c3: digest, c2: c2.to_vec() })
    }

    pub fn to_vec(&self, mode: Mode) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(C1_SIZE + C3_SIZE + self.c2.len());
        out.push(0x04);
        out.extend_from_slice(&self.c1.to_bytes()?);
        match mode {
            Mode::C1C2C3 => {
                out.extend_from_slice(&self.c2);
                out.extend_from_slice(&self.c3);
            }
            Mode::C1C3C2 => {
                out.extend_from_slice(&self.c3);
                out.extend_from_slice(&self.c2);
            }
        }
        Ok(out)
    }

    pub fn c1(&self) -> &Point {
        &self.c1
    }

    pub fn c2(&self) -> &[u8] {
        &self.c2
    }

    pub fn c3(&self) -> &[u8; C3_SIZE] {
        &self.c3
    }
}

/// C3 = SM3(x2 || M || y2)
fn checksum(shared: &[u8; 64], plain: &[u8]) -> [u8; C3_SIZE] {
    let mut hasher = Sm3::new();
    hasher.update(&shared[..32]).update(plain).update(&shared[32..]);
    hasher.finalize()
}

pub trait Encryption {
    fn execute(&self, plain: &[u8]) -> Result<Vec<u8>>;
}

pub trait Decryption {
    fn execute(&self, cipher: &[u8]) -> Result<Vec<u8>>;
}

pub struct CryptoFactory {
    mode: Mode,
    max_retries: usize,
    curve: &'static CurveParams,
}

impl CryptoFactory {
    pub fn init() -> Self {
        CryptoFactory { mode: Mode::C1C3C2, max_retries: 64, curve: sm2p256v1() }
    }

    pub fn mode(&mut self, mode: Mode) -> &mut Self {
        self.mode = mode;
        self
    }

    pub fn max_retries(&mut self, max_retries: usize) -> &mut Self {
        self.max_retries = max_retries;
        self
    }

    pub fn encryptor(&self, key: PublicKey) -> Box<dyn Encryption> {
        Box::new(Encryptor { key, mode: self.mode, max_retries: self.max_retries, curve: self.curve })
    }

    pub fn decryptor(&self, key: PrivateKey) -> Box<dyn Decryption> {
        Box::new(Decryptor { key, mode: self.mode, curve: self.curve })
    }
}

struct Encryptor {
    key: PublicKey,
    mode: Mode,
    max_retries: usize,
    curve: &'static CurveParams,
}

impl Encryption for Encryptor {
    fn execute(&self, plain: &[u8]) -> Result<Vec<u8>> {
        if plain.is_empty() {
            return Err(Error::EmptyInput);
        }
        let curve = self.curve;
        self.key.validate(curve)?;

        for _ in 0..self.max_retries {
            let k = random_scalar(curve.n());
            let c1 = curve.scalar_base_multiply(&k)?;
            let shared = curve.scalar_multiply(self.key.point(), &k)?.to_bytes()?;

            let mut c2 = plain.to_vec();
            apply_keystream(&shared, &mut c2);
            // an all-zero keystream leaves the message unmasked
            if c2 == plain {
                continue;
            }

            let cipher = Cipher { c1, c3: checksum(&shared, plain), c2 };
            return cipher.to_vec(self.mode);
        }
        Err(Error::RetryLimitExceeded(self.max_retries))
    }
}

struct Decryptor {
    key: PrivateKey,
    mode: Mode,
    curve: &'static CurveParams,
}

impl Decryption for Decryptor {
    fn execute(&self, cipher: &[u8]) -> Result<Vec<u8>> {
        let curve = self.curve;
        let cipher = Cipher::from_slice(cipher, self.mode)?;
        if !curve.contains(cipher.c1()) {
            return Err(Error::NotOnCurve);
        }

        // d * C1 = d * k * G = k * P
        let shared = curve.scalar_multiply(cipher.c1(), self.key.scalar())?.to_bytes()?;
        let mut plain = cipher.c2;
        apply_keystream(&shared, &mut plain);

        if checksum(&shared, &plain) != cipher.c3 {
            warn!("sm2 cipher failed its integrity check");
            return Err(Error::IntegrityCheckFailed);
        }
        Ok(plain)
    }
}

#[cfg(test)]
mod tests {
    use hex_literal::hex;

    use super::*;
    use crate::ec::key::KeyGenerator;
    use crate::HexKey;

    const PRK: &str = "6aea1ccf610488aaa7fddba3dd6d76d3bdfd50f957d847be3d453defb695f28e";

    // "encryption standard" under k = 59276e27d506861a16680f3ad9c02dccef3cc1fa3cdbe4ce6d54b80deac1bc21
    const C1C3C2: [u8; 116] = hex!(
        "0404ebfc718e8d1798620432268e77feb6415e2ede0e073c0f4f640ecd2e149a"
        "73e858f9d81e5430a57b36daab8f950a3c64e6ee6a63094d99283aff767e124d"
        "f08309429d3910714aeabcc7f97c8c3683bfe194574b3792c9d70139cfcb055d"
        "73625cf2043bbdf2ff70f4b455c878c252c3e29e"
    );
    const C1C2C3: [u8; 116] = hex!(
        "0404ebfc718e8d1798620432268e77feb6415e2ede0e073c0f4f640ecd2e149a"
        "73e858f9d81e5430a57b36daab8f950a3c64e6ee6a63094d99283aff767e124d"
        "f0625cf2043bbdf2ff70f4b455c878c252c3e29e8309429d3910714aeabcc7f9"
        "7c8c3683bfe194574b3792c9d70139cfcb055d73"
    );

    fn factory(mode: Mode) -> CryptoFactory {
        let mut factory = CryptoFactory::init();
        factory.mode(mode);
        factory
    }

    #[test]
    fn decrypts_fixed_vectors() {
        let prk = PrivateKey::decode(PRK).unwrap();
        let plain = factory(Mode::C1C3C2).decryptor(prk.clone()).execute(&C1C3C2).unwrap();
        assert_eq!(plain, b"encryption standard");
        let plain = factory(Mode::C1C2C3).decryptor(prk.clone()).execute(&C1C2C3).unwrap();
        assert_eq!(plain, b"encryption standard");

        // the wrong layout fails the checksum
        assert_eq!(
            factory(Mode::C1C2C3).decryptor(prk).execute(&C1C3C2),
            Err(Error::IntegrityCheckFailed)
        );
    }

    #[test]
    fn layouts() {
        let a = Cipher::from_slice(&C1C3C2, Mode::C1C3C2).unwrap();
        let b = Cipher::from_slice(&C1C2C3, Mode::C1C2C3).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.c2().len(), 19);
        assert_eq!(a.to_vec(Mode::C1C2C3).unwrap(), C1C2C3.to_vec());
        assert_eq!(b.to_vec(Mode::C1C3C2).unwrap(), C1C3C2.to_vec());
    }

    #[test]
    fn round_trip_lengths() {
        let pair = KeyGenerator::new(sm2p256v1()).gen_key_pair().unwrap();
        for mode in [Mode::C1C2C3, Mode::C1C3C2] {
            let factory = factory(mode);
            for len in [1usize, 31, 32, 33, 1000] {
                let plain: Vec<u8> = (0..len).map(|i| (i * 7) as u8).collect();
                let cipher = factory.encryptor(pair.public_key().clone()).execute(&plain).unwrap();
                assert_eq!(cipher.len(), 97 + len);
                assert_eq!(cipher[0], 0x04);
                let text = factory.decryptor(pair.private_key().clone()).execute(&cipher).unwrap();
                assert_eq!(text, plain);
            }
        }
    }

    #[test]
    fn tampering_detected() {
        let pair = KeyGenerator::new(sm2p256v1()).gen_key_pair().unwrap();
        let factory = factory(Mode::C1C2C3);
        let cipher = factory.encryptor(pair.public_key().clone()).execute(b"attack at dawn").unwrap();
        let decryptor = factory.decryptor(pair.private_key().clone());

        // every byte of C2 and C3
        for i in 65..cipher.len() {
            let mut forged = cipher.clone();
            forged[i] ^= 0x01;
            assert_eq!(decryptor.execute(&forged), Err(Error::IntegrityCheckFailed), "byte {}", i);
        }
    }

    #[test]
    fn malformed() {
        let prk = PrivateKey::decode(PRK).unwrap();
        let decryptor = factory(Mode::C1C3C2).decryptor(prk);
        assert_eq!(decryptor.execute(&C1C3C2[..97]), Err(Error::CipherTooShort(97)));
        assert_eq!(decryptor.execute(&[]), Err(Error::CipherTooShort(0)));

        let mut tagged = C1C3C2;
        tagged[0] = 0x02;
        assert_eq!(decryptor.execute(&tagged), Err(Error::InvalidPointTag(0x02)));

        let mut off_curve = C1C3C2;
        off_curve[64] ^= 0x01;
        assert_eq!(decryptor.execute(&off_curve), Err(Error::NotOnCurve));
    }

    #[test]
    fn rejects_empty_message() {
        let pair = KeyGenerator::new(sm2p256v1()).gen_key_pair().unwrap();
        let encryptor = factory(Mode::C1C3C2).encryptor(pair.public_key().clone());
        assert_eq!(encryptor.execute(b""), Err(Error::EmptyInput));
    }

    #[test]
    fn rejects_public_key_off_curve() {
        let key = PublicKey::from_bytes(&[0x11u8; 64]).unwrap();
        assert_eq!(factory(Mode::C1C3C2).encryptor(key).execute(b"m"), Err(Error::NotOnCurve));
    }
}
