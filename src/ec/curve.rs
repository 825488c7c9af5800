use std::sync::OnceLock;

use hex_literal::hex;
use log::trace;
use num_bigint::BigUint;

use crate::ec::point::Point;

const SECP256K1_P: [u8; 32] = hex!("fffffffffffffffffffffffffffffffffffffffffffffffffffffffefffffc2f");
const SECP256K1_A: [u8; 32] = [0u8; 32];
const SECP256K1_B: [u8; 32] = hex!("0000000000000000000000000000000000000000000000000000000000000007");
const SECP256K1_GX: [u8; 32] = hex!("79be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798");
const SECP256K1_GY: [u8; 32] = hex!("483ada7726a3c4655da4fbfc0e1108a8fd17b448a68554199c47d08ffb10d4b8");
const SECP256K1_N: [u8; 32] = hex!("fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364141");

const SM2_P: [u8; 32] = hex!("fffffffeffffffffffffffffffffffffffffffff00000000ffffffffffffffff");
const SM2_A: [u8; 32] = hex!("fffffffeffffffffffffffffffffffffffffffff00000000fffffffffffffffc");
const SM2_B: [u8; 32] = hex!("28e9fa9e9d9f5e344d5a9e4bcf6509a7f39789f515ab8f92ddbcbd414d940e93");
const SM2_GX: [u8; 32] = hex!("32c4ae2c1f1981195f9904466a39c9948fe30bbff2660be1715a4589334c74c7");
const SM2_GY: [u8; 32] = hex!("bc3736a2f4f6779c59bdcee36b692153d0a9877cc62a474002df32e52139f0a0");
const SM2_N: [u8; 32] = hex!("fffffffeffffffffffffffffffffffff7203df6b21c6052b53bbf40939d54123");

/// Short weierstrass curve parameters: y^2 = x^3 + ax + b over F(p),
/// base point g of order n.
#[derive(Debug)]
pub struct CurveParams {
    name: &'static str,
    p: BigUint,
    a: BigUint,
    b: BigUint,
    g: Point,
    n: BigUint,
}

impl CurveParams {
    fn from_bytes(
        name: &'static str,
        p: &[u8; 32],
        a: &[u8; 32],
        b: &[u8; 32],
        gx: &[u8; 32],
        gy: &[u8; 32],
        n: &[u8; 32],
    ) -> Self {
        trace!("constructing {} curve parameters", name);
        CurveParams {
            name,
            p: BigUint::from_bytes_be(p),
            a: BigUint::from_bytes_be(a),
            b: BigUint::from_bytes_be(b),
            g: Point::new(BigUint::from_bytes_be(gx), BigUint::from_bytes_be(gy)),
            n: BigUint::from_bytes_be(n),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// the order of the finite field
    pub fn p(&self) -> &BigUint {
        &self.p
    }

    pub fn a(&self) -> &BigUint {
        &self.a
    }

    pub fn b(&self) -> &BigUint {
        &self.b
    }

    /// the base point
    pub fn base(&self) -> &Point {
        &self.g
    }

    pub fn gx(&self) -> &BigUint {
        self.g.x()
    }

    pub fn gy(&self) -> &BigUint {
        self.g.y()
    }

    /// the order of the cyclic subgroup generated by the base point
    pub fn n(&self) -> &BigUint {
        &self.n
    }

    /// Checks y^2 = x^3 + ax + b (mod p) with both coordinates in [0, p).
    pub fn contains(&self, point: &Point) -> bool {
        let (x, y, p) = (point.x(), point.y(), &self.p);
        if x >= p || y >= p {
            return false;
        }
        let lhs = y * y % p;
        let rhs = (x * x % p * x + &self.a * x + &self.b) % p;
        lhs == rhs
    }
}

/// The secp256k1 parameters, built on first use and shared for the rest of the process.
pub fn secp256k1() -> &'static CurveParams {
    static CURVE: OnceLock<CurveParams> = OnceLock::new();
    CURVE.get_or_init(|| {
        CurveParams::from_bytes(
            "secp256k1",
            &SECP256K1_P,
            &SECP256K1_A,
            &SECP256K1_B,
            &SECP256K1_GX,
            &SECP256K1_GY,
            &SECP256K1_N,
        )
    })
}

/// The SM2 recommended curve parameters (GB/T 32918.5).
pub fn sm2p256v1() -> &'static CurveParams {
    static CURVE: OnceLock<CurveParams> = OnceLock::new();
    CURVE.get_or_init(|| {
        CurveParams::from_bytes("sm2p256v1", &SM2_P, &SM2_A, &SM2_B, &SM2_GX, &SM2_GY, &SM2_N)
    })
}
