mod core;

pub use self::core::Sm3;

/// 计算摘要信息
pub fn digest(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sm3::new();
    hasher.update(data);
    hasher.finalize()
}

/// Hex text of the SM3 digest of `data`.
pub fn hex_digest(data: &[u8]) -> String {
    hex::encode(digest(data))
}
