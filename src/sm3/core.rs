// 初始值，用于确定压缩函数寄存器的初态
const IV: [u32; 8] = [0x7380_166f, 0x4914_b2b9, 0x1724_42d7, 0xda8a_0600, 0xa96f_30bc, 0x1631_38aa, 0xe38d_ee4d, 0xb0fb_0e4e];

const T0: u32 = 0x79cc_4519;
const T1: u32 = 0x7a87_9d8a;

const BLOCK_SIZE: usize = 64;

fn ff0(x: u32, y: u32, z: u32) -> u32 {
    x ^ y ^ z
}

fn ff1(x: u32, y: u32, z: u32) -> u32 {
    (x & y) | (x & z) | (y & z)
}

fn gg0(x: u32, y: u32, z: u32) -> u32 {
    x ^ y ^ z
}

fn gg1(x: u32, y: u32, z: u32) -> u32 {
    (x & y) | (!x & z)
}

/// 压缩函数中的置换函数
fn p0(x: u32) -> u32 {
    x ^ x.rotate_left(9) ^ x.rotate_left(17)
}

/// 消息扩展中的置换函数
fn p1(x: u32) -> u32 {
    x ^ x.rotate_left(15) ^ x.rotate_left(23)
}

/// Streaming SM3 (GB/T 32905) hasher.
#[derive(Clone, Debug)]
pub struct Sm3 {
    registers: [u32; 8],
    buffer: [u8; BLOCK_SIZE],
    buffered: usize,
    // total message length in bytes
    length: u64,
}

impl Default for Sm3 {
    fn default() -> Self {
        Sm3::new()
    }
}

impl Sm3 {
    pub fn new() -> Self {
        Sm3 {
            registers: IV,
            buffer: [0; BLOCK_SIZE],
            buffered: 0,
            length: 0,
        }
    }

    pub fn update(&mut self, data: &[u8]) -> &mut Self {
        self.length = self.length.wrapping_add(data.len() as u64);
        let mut data = data;

        if self.buffered > 0 {
            let take = (BLOCK_SIZE - self.buffered).min(data.len());
            self.buffer[self.buffered..self.buffered + take].copy_from_slice(&data[..take]);
            self.buffered += take;
            data = &data[take..];
            if self.buffered < BLOCK_SIZE {
                return self;
            }
            let block = self.buffer;
            self.compress(&block);
            self.buffered = 0;
        }

        let mut chunks = data.chunks_exact(BLOCK_SIZE);
        for block in &mut chunks {
            let mut b = [0u8; BLOCK_SIZE];
            b.copy_from_slice(block);
            self.compress(&b);
        }
        let rest = chunks.remainder();
        self.buffer[..rest.len()].copy_from_slice(rest);
        self.buffered = rest.len();
        self
    }

    /// 填充: 将比特“1”添加到消息的末尾，再添加k个“0”，l + 1 + k ≡ 448 mod 512，
    /// 然后再添加一个64位比特串，该比特串是长度l的二进制表示。
    pub fn finalize(mut self) -> [u8; 32] {
        let bits = self.length.wrapping_shl(3);

        let mut tail = [0u8; BLOCK_SIZE * 2];
        let pending = self.buffered;
        tail[..pending].copy_from_slice(&self.buffer[..pending]);
        tail[pending] = 0x80;
        let total = if pending < 56 { BLOCK_SIZE } else { BLOCK_SIZE * 2 };
        tail[total - 8..total].copy_from_slice(&bits.to_be_bytes());

        for block in tail[..total].chunks_exact(BLOCK_SIZE) {
            let mut b = [0u8; BLOCK_SIZE];
            b.copy_from_slice(block);
            self.compress(&b);
        }
        self.output()
    }

    /// 迭代压缩
    /// 1. 扩展: 将消息分组B(i)扩展生成132个字W0, W1, · · · , W67, W0′, W1′, · · · , W63′
    /// 2. 压缩: V(i+1) ← CF(V(i), B(i))
    fn compress(&mut self, block: &[u8; BLOCK_SIZE]) {
        let mut w1: [u32; 68] = [0; 68];
        let mut w2: [u32; 64] = [0; 64];
        for i in 0..16 {
            w1[i] = u32::from_be_bytes([block[i * 4], block[i * 4 + 1], block[i * 4 + 2], block[i * 4 + 3]]);
        }
        // Wj ← P1(Wj−16 ⊕ Wj−9 ⊕ (Wj−3 ≪ 15)) ⊕ (Wj−13 ≪ 7) ⊕ Wj−6
        for i in 16..68 {
            w1[i] = p1(w1[i - 16] ^ w1[i - 9] ^ w1[i - 3].rotate_left(15))
                ^ w1[i - 13].rotate_left(7)
                ^ w1[i - 6];
        }
        // Wj′ = Wj ⊕ Wj+4
        for i in 0..64 {
            w2[i] = w1[i] ^ w1[i + 4];
        }

        // ABCDEFGH ← V (i)
        let [mut ra, mut rb, mut rc, mut rd, mut re, mut rf, mut rg, mut rh] = self.registers;
        for i in 0..64 {
            let (t, ff, gg): (u32, fn(u32, u32, u32) -> u32, fn(u32, u32, u32) -> u32) =
                if i < 16 { (T0, ff0, gg0) } else { (T1, ff1, gg1) };

            let ss1 = ra.rotate_left(12)
                .wrapping_add(re)
                .wrapping_add(t.rotate_left(i as u32))
                .rotate_left(7);
            let ss2 = ss1 ^ ra.rotate_left(12);
            let tt1 = ff(ra, rb, rc)
                .wrapping_add(rd)
                .wrapping_add(ss2)
                .wrapping_add(w2[i]);
            let tt2 = gg(re, rf, rg)
                .wrapping_add(rh)
                .wrapping_add(ss1)
                .wrapping_add(w1[i]);
            rd = rc;
            rc = rb.rotate_left(9);
            rb = ra;
            ra = tt1;
            rh = rg;
            rg = rf.rotate_left(19);
            rf = re;
            re = p0(tt2);
        }

        // V(i+1) ← ABCDEFGH ⊕ V(i)
        for (register, value) in self.registers.iter_mut().zip([ra, rb, rc, rd, re, rf, rg, rh]) {
            *register ^= value;
        }
    }

    /// 输出256比特的哈希值
    fn output(&self) -> [u8; 32] {
        let mut hash: [u8; 32] = [0; 32];
        for (chunk, e) in hash.chunks_exact_mut(4).zip(self.registers.iter()) {
            chunk.copy_from_slice(&e.to_be_bytes());
        }
        hash
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn abc() {
        let mut hasher = Sm3::new();
        hasher.update(b"abc");
        assert_eq!(
            hex::encode(hasher.finalize()),
            "66c7f0f462eeedd9d1f2d46bdc10e4e24167c4875cf2f7a2297da02b8f4ba8e0"
        );
    }

    #[test]
    fn two_blocks() {
        let mut hasher = Sm3::new();
        hasher.update(&b"abcd".repeat(16));
        assert_eq!(
            hex::encode(hasher.finalize()),
            "debe9ff92275b8a138604889c18e5a4d6fdb70e5387e5765293dcba39c0c5732"
        );
    }

    #[test]
    fn split_updates_match_single_update() {
        let data: Vec<u8> = (0..200u8).collect();
        let mut whole = Sm3::new();
        whole.update(&data);
        let expected = whole.finalize();

        for split in [0usize, 1, 55, 56, 63, 64, 65, 128, 199] {
            let mut hasher = Sm3::new();
            hasher.update(&data[..split]).update(&data[split..]);
            assert_eq!(hasher.finalize(), expected, "split at {}", split);
        }
    }
}
