use tracing::trace;

use crate::{Error, Permutation};

/// Restricts a [`Permutation`] on `[0, 2^bits)` to a bijection on `[0, capacity)`
/// by cycle walking: the permutation is re-applied to its own output until the
/// result falls below `capacity`.
///
/// Expect about `2^bits / capacity` permutation evaluations per sample.
pub struct CycleWalker {
    perm: Permutation,
    capacity: u64,
}

impl CycleWalker {
    /// Creates a walker over `[0, capacity)`.
    ///
    /// Fails with `CapacityExceedsDomain` if `capacity` is larger than the set
    /// on which `perm` is a bijection.
    pub fn new(perm: Permutation, capacity: u64) -> Result<CycleWalker, Error> {
        if capacity > perm.domain_size() {
            return Err(Error::CapacityExceedsDomain {
                capacity,
                bits: perm.bits(),
            });
        }
        Ok(CycleWalker { perm, capacity })
    }

    pub fn capacity(&self) -> u64 {
        self.capacity
    }

    /// Maps `x` in `[0, capacity)` to its image in `[0, capacity)`.
    ///
    /// An `x` outside the range, including every `x` when the capacity is zero,
    /// fails with `BandExhausted`.
    pub fn sample(&self, x: u64) -> Result<u64, Error> {
        if x >= self.capacity {
            return Err(Error::BandExhausted {
                offset: x,
                capacity: self.capacity,
            });
        }
        let mut y = self.perm.permute(x);
        let mut steps = 1u64;
        while y >= self.capacity {
            y = self.perm.permute(y);
            steps += 1;
        }
        trace!(x, y, steps, bits = self.perm.bits(), "cycle walk finished");
        Ok(y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    fn assert_band_bijection(walker: &CycleWalker) {
        let capacity = walker.capacity() as usize;
        let mut seen = vec![false; capacity];
        for x in 0..capacity as u64 {
            let y = walker.sample(x).unwrap() as usize;
            assert!(y < capacity);
            assert!(!seen[y], "{} hit twice", y);
            seen[y] = true;
        }
    }

    #[test]
    fn test_band_bijection() {
        // Length 3 and length 1 over the lowercase alphabet.
        for capacity in [23548, 28] {
            assert_band_bijection(
                &CycleWalker::new(Permutation::new(b"Test key here", 16), capacity).unwrap(),
            );
        }
    }

    #[test]
    fn test_random_capacities() {
        let mut rng = rand::thread_rng();
        for _ in 0..5 {
            let capacity = rng.gen_range(1..1u64 << 16);
            assert_band_bijection(
                &CycleWalker::new(Permutation::new(b"Test key here", 16), capacity).unwrap(),
            );
        }
    }

    #[test]
    fn test_full_domain_is_plain_permutation() {
        let walker = CycleWalker::new(Permutation::new(b"Test key here", 16), 1 << 16).unwrap();
        let perm = Permutation::new(b"Test key here", 16);
        for x in 0..1_000 {
            assert_eq!(walker.sample(x).unwrap(), perm.permute(x));
        }
    }

    #[test]
    fn test_single_value() {
        let walker = CycleWalker::new(Permutation::new(b"Test key here", 16), 1).unwrap();
        assert_eq!(walker.sample(0), Ok(0));
    }

    #[test]
    fn test_out_of_range() {
        let walker = CycleWalker::new(Permutation::new(b"Test key here", 16), 0).unwrap();
        assert_eq!(
            walker.sample(0),
            Err(Error::BandExhausted {
                offset: 0,
                capacity: 0
            })
        );

        let walker = CycleWalker::new(Permutation::new(b"Test key here", 16), 28).unwrap();
        assert_eq!(
            walker.sample(28),
            Err(Error::BandExhausted {
                offset: 28,
                capacity: 28
            })
        );
    }

    #[test]
    fn test_capacity_larger_than_domain() {
        assert_eq!(
            CycleWalker::new(Permutation::new(b"Test key here", 16), (1 << 16) + 1).err(),
            Some(Error::CapacityExceedsDomain {
                capacity: (1 << 16) + 1,
                bits: 16
            })
        );
        assert_eq!(
            CycleWalker::new(Permutation::new(b"Test key here", 16), 1 << 17).err(),
            Some(Error::CapacityExceedsDomain {
                capacity: 1 << 17,
                bits: 16
            })
        );
        // Odd widths only permute the low 14 of 15 bits.
        assert!(CycleWalker::new(Permutation::new(b"Test key here", 15), 1 << 15).is_err());
        assert!(CycleWalker::new(Permutation::new(b"Test key here", 15), 1 << 14).is_ok());
    }
}
