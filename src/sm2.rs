//! SM2 (GB/T 32918) signatures and public key encryption over sm2p256v1.

use log::debug;

use crate::ec::curve::sm2p256v1;
use crate::ec::key::{KeyGenerator, KeyPair, PrivateKey, PublicKey, Signature};
use crate::error::{Error, Result};
use crate::HexKey;

pub use self::cipher::{Cipher, CryptoFactory, Decryption, Encryption, Mode};
pub use self::signature::{za, DEFAULT_USER_ID};

mod cipher;
mod kdf;
mod signature;

/// Options for the `*_with` entry points.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sm2Options {
    pub mode: Mode,
    pub user_id: Vec<u8>,
    /// Nonce draws allowed per signature or encryption.
    pub max_retries: usize,
}

impl Default for Sm2Options {
    fn default() -> Self {
        Sm2Options {
            mode: Mode::C1C3C2,
            user_id: DEFAULT_USER_ID.to_vec(),
            max_retries: 64,
        }
    }
}

impl Sm2Options {
    fn factory(&self) -> CryptoFactory {
        let mut factory = CryptoFactory::init();
        factory.mode(self.mode).max_retries(self.max_retries);
        factory
    }
}

pub fn generate_key() -> Result<KeyPair> {
    KeyGenerator::new(sm2p256v1()).gen_key_pair()
}

pub fn derive_public_key(private_key: &PrivateKey) -> Result<PublicKey> {
    KeyGenerator::new(sm2p256v1()).gen_public_key(private_key)
}

/// Signs `msg` under the default distinguishing identifier.
pub fn sign(private_key: &PrivateKey, msg: &[u8]) -> Result<Signature> {
    sign_with(private_key, msg, &Sm2Options::default())
}

pub fn sign_with(private_key: &PrivateKey, msg: &[u8], options: &Sm2Options) -> Result<Signature> {
    if msg.is_empty() {
        return Err(Error::EmptyInput);
    }
    signature::sign(sm2p256v1(), private_key, msg, &options.user_id, options.max_retries)
}

pub fn verify(public_key: &PublicKey, msg: &[u8], signature: &Signature) -> bool {
    verify_with(public_key, msg, signature, &Sm2Options::default())
}

pub fn verify_with(public_key: &PublicKey, msg: &[u8], signature: &Signature, options: &Sm2Options) -> bool {
    if msg.is_empty() {
        debug!("sm2 verification rejected: {}", Error::EmptyInput);
        return false;
    }
    match signature::verify(sm2p256v1(), public_key, msg, signature, &options.user_id) {
        Ok(valid) => valid,
        Err(err) => {
            debug!("sm2 verification rejected: {}", err);
            false
        }
    }
}

pub fn encrypt(public_key: &PublicKey, msg: &[u8], mode: Mode) -> Result<Vec<u8>> {
    encrypt_with(public_key, msg, &Sm2Options { mode, ..Sm2Options::default() })
}

pub fn encrypt_with(public_key: &PublicKey, msg: &[u8], options: &Sm2Options) -> Result<Vec<u8>> {
    options.factory().encryptor(public_key.clone()).execute(msg)
}

/// Fails with [`Error::IntegrityCheckFailed`] and no plaintext when C3 does not match.
pub fn decrypt(private_key: &PrivateKey, cipher: &[u8], mode: Mode) -> Result<Vec<u8>> {
    decrypt_with(private_key, cipher, &Sm2Options { mode, ..Sm2Options::default() })
}

pub fn decrypt_with(private_key: &PrivateKey, cipher: &[u8], options: &Sm2Options) -> Result<Vec<u8>> {
    options.factory().decryptor(private_key.clone()).execute(cipher)
}

/// 加密: hex public key (`04 || x || y`) in, hex C1C3C2 cipher out.
pub fn encrypt_hex(key: &str, plain: &str) -> Result<String> {
    let puk = PublicKey::decode(key)?;
    Ok(hex::encode(encrypt(&puk, plain.as_bytes(), Mode::C1C3C2)?))
}

/// 解密: inverse of [`encrypt_hex`].
pub fn decrypt_hex(key: &str, cipher: &str) -> Result<String> {
    let prk = PrivateKey::decode(key)?;
    let cipher = hex::decode(cipher).map_err(|_| Error::InvalidHex)?;
    let plain = decrypt(&prk, &cipher, Mode::C1C3C2)?;
    String::from_utf8(plain).map_err(|_| Error::InvalidUtf8)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PRK: &str = "6aea1ccf610488aaa7fddba3dd6d76d3bdfd50f957d847be3d453defb695f28e";
    const PUK: &str = "04a8af64e38eea41c254df769b5b41fbaa2d77b226b301a2636d463c52b46c777230ad1714e686dd641b9e04596530b38f6a64215b0ed3b081f8641724c5443a6e";

    #[test]
    fn derive_matches_known_pair() {
        let prk = PrivateKey::decode(PRK).unwrap();
        assert_eq!(derive_public_key(&prk).unwrap().encode().unwrap(), PUK);
    }

    #[test]
    fn sign_verify_with_custom_id() {
        let pair = generate_key().unwrap();
        let options = Sm2Options { user_id: b"ALICE123@YAHOO.COM".to_vec(), ..Sm2Options::default() };
        let signature = sign_with(pair.private_key(), b"message digest", &options).unwrap();

        assert!(verify_with(pair.public_key(), b"message digest", &signature, &options));
        assert!(!verify(pair.public_key(), b"message digest", &signature));
    }

    #[test]
    fn verify_rejects_malformed() {
        let pair = generate_key().unwrap();
        let signature = sign(pair.private_key(), b"m").unwrap();
        assert!(!verify(pair.public_key(), b"", &signature));

        let zero_r = Signature::new(0u8.into(), signature.s().clone());
        assert!(!verify(pair.public_key(), b"m", &zero_r));
        let wide_s = Signature::new(signature.r().clone(), sm2p256v1().n().clone());
        assert!(!verify(pair.public_key(), b"m", &wide_s));
    }

    #[test]
    fn tampered_s() {
        let pair = generate_key().unwrap();
        let signature = sign(pair.private_key(), b"m").unwrap();
        let bytes = signature.to_bytes().unwrap();
        for index in [32usize, 47, 63] {
            let mut forged = bytes;
            forged[index] ^= 0x10;
            assert!(!verify(pair.public_key(), b"m", &Signature::from_bytes(&forged).unwrap()));
        }
    }

    #[test]
    fn empty_inputs() {
        let pair = generate_key().unwrap();
        assert_eq!(sign(pair.private_key(), b""), Err(Error::EmptyInput));
        assert_eq!(encrypt(pair.public_key(), b"", Mode::C1C2C3), Err(Error::EmptyInput));
        assert_eq!(decrypt(pair.private_key(), b"", Mode::C1C2C3), Err(Error::CipherTooShort(0)));
    }

    #[test]
    fn hex_round_trip() {
        let text = "圣光会抛弃你的，英雄，就像抛弃我那样。——巫妖王";
        let cipher = encrypt_hex(PUK, text).unwrap();
        assert_eq!(cipher.len(), (97 + text.len()) * 2);
        assert_eq!(decrypt_hex(PRK, &cipher).unwrap(), text);

        assert_eq!(encrypt_hex("04zz", text), Err(Error::InvalidLength { expected: 130, actual: 4 }));
        assert_eq!(decrypt_hex(PRK, "not hex"), Err(Error::InvalidHex));

        let puk = PublicKey::decode(PUK).unwrap();
        let binary = hex::encode(encrypt(&puk, &[0xff, 0xfe], Mode::C1C3C2).unwrap());
        assert_eq!(decrypt_hex(PRK, &binary), Err(Error::InvalidUtf8));
    }

    #[test]
    fn options_mode_is_honored() {
        let pair = generate_key().unwrap();
        let options = Sm2Options { mode: Mode::C1C2C3, ..Sm2Options::default() };
        let cipher = encrypt_with(pair.public_key(), b"payload", &options).unwrap();
        assert_eq!(decrypt(pair.private_key(), &cipher, Mode::C1C2C3).unwrap(), b"payload");
        assert_eq!(
            decrypt(pair.private_key(), &cipher, Mode::C1C3C2),
            Err(Error::IntegrityCheckFailed)
        );
    }
}
