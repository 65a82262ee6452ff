use hkdf::Hkdf;
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::band::MAX_DOMAIN_BITS;

type HmacSha256 = Hmac<Sha256>;

/// Derives the permutation key for `namespace` from the master secret.
pub fn derive_key(secret: &[u8], namespace: &str) -> [u8; 32] {
    let hkdf = Hkdf::<Sha256>::new(None, secret);
    let mut key = [0u8; 32];
    hkdf.expand(format!("{}/feistel", namespace).as_bytes(), &mut key)
        .expect("Length 32 should be valid");
    key
}

/// Number of Feistel rounds for a domain of `bits` bits.  Small domains can
/// be enumerated, so they get more rounds per evaluation.
pub fn rounds_for(bits: u32) -> u32 {
    match bits {
        0..=10 => 12,
        11..=16 => 10,
        17..=24 => 8,
        _ => 6,
    }
}

/// Keyed balanced Feistel network, a bijection on `[0, 2^bits)` for even `bits`.
///
/// Each round computes `f = HMAC-SHA256(key, round || right)` truncated to
/// `bits / 2` bits and maps `(left, right)` to `(right, left ^ f)`.
///
/// Odd widths are accepted but only the low `2 * (bits / 2)` bits take part,
/// so the map is no longer a bijection on the full range.
pub struct Permutation {
    hmac: HmacSha256,
    bits: u32,
    half_bits: u32,
    mask: u64,
    rounds: u32,
}

impl Permutation {
    /// Creates a permutation over `bits` bits keyed with `key`.
    ///
    /// # Examples
    ///
    /// ```
    /// use pubid::Permutation;
    ///
    /// let perm = Permutation::new(b"your-secure-key", 16);
    /// let y = perm.permute(1234);
    /// assert!(y < 1 << 16);
    /// assert_eq!(y, perm.permute(1234));
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if `bits` is outside `2..=62`.
    pub fn new(key: &[u8], bits: u32) -> Permutation {
        assert!(
            (2..=MAX_DOMAIN_BITS).contains(&bits),
            "domain width {} is outside 2..={}",
            bits,
            MAX_DOMAIN_BITS
        );
        let half_bits = bits / 2;
        Permutation {
            hmac: HmacSha256::new_from_slice(key).expect("HMAC accepts keys of any length"),
            bits,
            half_bits,
            mask: (1u64 << half_bits) - 1,
            rounds: rounds_for(bits),
        }
    }

    pub fn bits(&self) -> u32 {
        self.bits
    }

    pub fn rounds(&self) -> u32 {
        self.rounds
    }

    /// Number of inputs the map permutes: `2^bits` for even widths,
    /// `2^(bits - 1)` for odd ones.
    pub fn domain_size(&self) -> u64 {
        1 << (2 * self.half_bits)
    }

    /// Maps `x` to its image.
    ///
    /// # Panics
    ///
    /// Panics if `x` is not below `2^bits`.
    pub fn permute(&self, x: u64) -> u64 {
        assert!(x >> self.bits == 0, "{} is outside the {} bit domain", x, self.bits);
        let mut left = (x >> self.half_bits) & self.mask;
        let mut right = x & self.mask;
        for round in 0..self.rounds {
            let f = self.round_function(round, right);
            (left, right) = (right, (left ^ f) & self.mask);
        }
        (left << self.half_bits) | right
    }

    fn round_function(&self, round: u32, half: u64) -> u64 {
        let mut hmac = self.hmac.clone();
        hmac.update(&round.to_be_bytes());
        hmac.update(&half.to_be_bytes());
        let tag = hmac.finalize().into_bytes();
        let mut word = [0u8; 8];
        word.copy_from_slice(&tag[..8]);
        u64::from_be_bytes(word) & self.mask
    }
}
