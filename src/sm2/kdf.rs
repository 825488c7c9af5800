use crate::sm3::Sm3;

const DIGEST_SIZE: usize = 32;

/// XORs the KDF(z, data.len()) keystream into `data`.
///
/// Block i is SM3(z || ct) with a 32-bit big-endian counter ct starting at 1;
/// the last block is truncated to whatever remains.
pub(crate) fn apply_keystream(z: &[u8], data: &mut [u8]) {
    let mut ct: u32 = 1;
    for chunk in data.chunks_mut(DIGEST_SIZE) {
        let mut hasher = Sm3::new();
        hasher.update(z).update(&ct.to_be_bytes());
        let block = hasher.finalize();
        for (byte, key) in chunk.iter_mut().zip(block.iter()) {
            *byte ^= key;
        }
        ct = ct.wrapping_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sm3;

    #[test]
    fn blocks_follow_counter() {
        let z = [0xabu8; 64];
        let mut stream = vec![0u8; 70];
        apply_keystream(&z, &mut stream);

        let block = |ct: u32| {
            let mut input = z.to_vec();
            input.extend_from_slice(&ct.to_be_bytes());
            sm3::digest(&input)
        };
        assert_eq!(stream[..32], block(1));
        assert_eq!(stream[32..64], block(2));
        assert_eq!(stream[64..], block(3)[..6]);
    }

    #[test]
    fn involution() {
        let z = b"shared secret";
        let plain = b"the quick brown fox jumps over the lazy dog".to_vec();
        let mut data = plain.clone();
        apply_keystream(z, &mut data);
        assert_ne!(data, plain);
        apply_keystream(z, &mut data);
        assert_eq!(data, plain);

        let mut empty: [u8; 0] = [];
        apply_keystream(z, &mut empty);
    }
}
