//! `pubid` turns an internal, monotonically increasing counter into short, fixed-length public
//! identifiers that reveal neither the order in which they were issued nor how many exist.
//!
//! Sequential database keys are convenient, but exposing them tells everyone how many orders
//! you have taken this week and lets them guess their neighbours' IDs.  `pubid` keeps the
//! counter as the source of uniqueness and scrambles its values with a keyed permutation, so
//! the IDs stay collision-free without any lookup table.
//!
//! The pipeline for an ID of `L` characters over an alphabet of `B` characters:
//!
//! 1. The band of integers that render to exactly `L` digits is `[B^(L-1), B^L)`.  Bands of
//!    different lengths never overlap, so the length can change without migrating old IDs.
//! 2. The band is covered by the smallest even-width power-of-two domain, at least 16 bits wide.
//! 3. A balanced Feistel network with an HMAC-SHA256 round function permutes that domain.  The
//!    permutation key is derived with HKDF from a per-namespace secret.
//! 4. Cycle walking restricts the permutation to the band size.
//! 5. The result is written out in base `B` over the alphabet.
//!
//! The built-in alphabets leave out vowels, `0` and `1`, so IDs cannot spell words and are
//! easy to read aloud.
//!
//! This is not encryption: no decoding of an ID back to its counter value is offered.  Leaking
//! the secret lets anyone compute the sequence of IDs, and changing it changes all IDs issued
//! afterwards.
//!
//! # Usage
//!
//! ```
//! use pubid::{AlphabetType, AtomicCounter, Config, Generator, MemorySecretProvider};
//!
//! let generator = Generator::new(
//!     Config::new("orders"),
//!     MemorySecretProvider::new(),
//!     AtomicCounter::new(),
//! );
//! let id = generator.generate(6, AlphabetType::Lower).unwrap();
//! assert_eq!(id.len(), 6);
//! ```
//!
//! The secret provider and the counter are traits, [`SecretProvider`] and [`Counter`].  The
//! in-memory implementations are suitable for tests; with the `postgres` feature, `pg`
//! provides Diesel-backed ones that persist the secret and use a database sequence.
//!
//! ## Low level API
//!
//! The pipeline stages are public as well.
//!
//! ```
//! use pubid::{band, AlphabetType, CycleWalker, Permutation};
//!
//! let lower = AlphabetType::Lower.alphabet();
//! let range = band::size_band(3, lower.base()).unwrap();
//! let bits = band::size_domain(range.capacity, band::DEFAULT_DOMAIN_FLOOR).unwrap();
//! assert_eq!((range.min_idx, range.capacity, bits), (841, 23548, 16));
//!
//! let perm = Permutation::new(b"your-secure-key", bits);
//! let walker = CycleWalker::new(perm, range.capacity as u64).unwrap();
//! let index = walker.sample(0).unwrap();
//! let id = lower.encode(range.min_idx as u64 + index, 3).unwrap();
//! assert_eq!(id.len(), 3);
//! ```

mod alphabet;
pub mod band;
mod config;
mod error;
mod feistel;
mod generator;
#[cfg(feature = "postgres")]
pub mod pg;
mod store;
mod walk;

pub use alphabet::{Alphabet, AlphabetType};
pub use config::Config;
pub use error::{ConfigError, Error};
pub use feistel::{derive_key, rounds_for, Permutation};
pub use generator::Generator;
pub use store::{AtomicCounter, Counter, MemorySecretProvider, SecretProvider, SECRET_LENGTH};
pub use walk::CycleWalker;
