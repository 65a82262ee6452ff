use crate::Error;

pub const MIN_LENGTH: u32 = 1;
pub const MAX_LENGTH: u32 = 12;

/// Domains narrower than this can be scanned exhaustively.
pub const DEFAULT_DOMAIN_FLOOR: u32 = 16;

/// Upper bound on the domain width, so that the Feistel halves and the band
/// arithmetic stay within 64 bits.
pub const MAX_DOMAIN_BITS: u32 = 62;

/// The integers that encode to exactly `length` digits in a given base:
/// `[min_idx, min_idx + capacity)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Band {
    pub min_idx: u128,
    pub capacity: u128,
}

/// Computes the band reserved for `length` digit strings over a `base`
/// character alphabet.
///
/// Bands of different lengths are disjoint, so changing the length never
/// collides with previously issued IDs.
pub fn size_band(length: u32, base: usize) -> Result<Band, Error> {
    if !(MIN_LENGTH..=MAX_LENGTH).contains(&length) {
        return Err(Error::InvalidLength { length });
    }
    if base < 2 {
        return Err(Error::InvalidAlphabet(format!("base {} is below 2", base)));
    }
    let base = base as u128;
    let (min_idx, upper) = match (base.checked_pow(length - 1), base.checked_pow(length)) {
        (Some(min_idx), Some(upper)) => (min_idx, upper),
        _ => return Err(Error::DomainTooLarge { bits: 128 }),
    };
    Ok(Band {
        min_idx,
        capacity: upper - min_idx,
    })
}

/// Returns the width in bits of the smallest even power-of-two domain, at
/// least `floor` bits wide, that holds `capacity` values.
pub fn size_domain(capacity: u128, floor: u32) -> Result<u32, Error> {
    let mut bits = 1;
    while bits < 127 && (1u128 << bits) < capacity {
        bits += 1;
    }
    bits = bits.max(floor);
    if bits % 2 == 1 {
        bits += 1;
    }
    if bits > MAX_DOMAIN_BITS {
        return Err(Error::DomainTooLarge { bits });
    }
    Ok(bits)
}
