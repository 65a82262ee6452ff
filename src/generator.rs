use once_cell::sync::OnceCell;
use tracing::{debug, warn};

use crate::band::{size_band, size_domain, MAX_LENGTH, MIN_LENGTH};
use crate::feistel::derive_key;
use crate::{
    Alphabet, AlphabetType, Config, ConfigError, Counter, CycleWalker, Error, Permutation,
    SecretProvider,
};

/// Turns counter values into fixed-length public IDs.
///
/// Each call takes the next value from the counter, permutes it within the
/// band of integers that encode to exactly the requested length, and renders
/// the result over the chosen alphabet.  Distinct counter values give distinct
/// IDs for as long as the band has room.
///
/// # Examples
///
/// ```
/// use pubid::{AlphabetType, AtomicCounter, Config, Generator, MemorySecretProvider};
///
/// let generator = Generator::new(
///     Config::new("example"),
///     MemorySecretProvider::with_secret("example", b"your-secure-key"),
///     AtomicCounter::new(),
/// );
/// let first = generator.generate(6, AlphabetType::Lower).unwrap();
/// let second = generator.generate(6, AlphabetType::Lower).unwrap();
/// assert_eq!(first.len(), 6);
/// assert_ne!(first, second);
/// ```
pub struct Generator<S, C> {
    config: Config,
    secrets: S,
    counter: C,
    key: OnceCell<[u8; 32]>,
}

impl<S: SecretProvider, C: Counter> Generator<S, C> {
    pub fn new(config: Config, secrets: S, counter: C) -> Self {
        Generator {
            config,
            secrets,
            counter,
            key: OnceCell::new(),
        }
    }

    /// Creates a generator from the configuration set with `Config::set_global`.
    pub fn from_global(secrets: S, counter: C) -> Result<Self, ConfigError> {
        let config = Config::global().ok_or(ConfigError::GlobalUnset)?;
        Ok(Self::new(config, secrets, counter))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Generates an ID with the configured default length and alphabet.
    pub fn generate_public_id(&self) -> Result<String, Error> {
        self.generate(self.config.default_length, self.config.default_alphabet)
    }

    /// Generates an ID of `length` characters over a built-in alphabet.
    pub fn generate(&self, length: u32, alphabet: AlphabetType) -> Result<String, Error> {
        self.generate_with(length, alphabet.alphabet())
    }

    /// Generates an ID of `length` characters over any alphabet.
    ///
    /// The counter is only advanced once the length, the secret, and the
    /// domain size have been checked.
    pub fn generate_with(&self, length: u32, alphabet: &Alphabet) -> Result<String, Error> {
        if !(MIN_LENGTH..=MAX_LENGTH).contains(&length) {
            return Err(Error::InvalidLength { length });
        }
        self.key()?;
        let band = size_band(length, alphabet.base())?;
        size_domain(band.capacity, self.config.domain_floor)?;

        let value = self.counter.next()?;
        self.id_for(value, length, alphabet)
    }

    /// Computes the ID for a given counter value without touching the counter.
    ///
    /// This is a pure function of the secret, the value, the length and the
    /// alphabet.
    pub fn id_for(&self, value: u64, length: u32, alphabet: &Alphabet) -> Result<String, Error> {
        let key = self.key()?;
        let band = size_band(length, alphabet.base())?;
        let bits = size_domain(band.capacity, self.config.domain_floor)?;

        // A domain of at most 62 bits bounds both values well below 2^63.
        let min_idx = band.min_idx as u64;
        let capacity = band.capacity as u64;

        let offset = value
            .checked_sub(1)
            .ok_or_else(|| Error::CounterUnavailable("counter values start at 1".to_string()))?;
        if offset >= capacity {
            warn!(
                namespace = %self.config.namespace,
                length,
                base = alphabet.base(),
                capacity,
                "band exhausted"
            );
            return Err(Error::BandExhausted { offset, capacity });
        }

        let walker = CycleWalker::new(Permutation::new(key, bits), capacity)?;
        let index = walker.sample(offset)?;
        debug!(
            namespace = %self.config.namespace,
            length,
            base = alphabet.base(),
            bits,
            value,
            "generated public id"
        );
        alphabet.encode(min_idx + index, length)
    }

    fn key(&self) -> Result<&[u8; 32], Error> {
        self.key.get_or_try_init(|| {
            let secret = self.secrets.get_or_create_secret(&self.config.namespace)?;
            Ok(derive_key(&secret, &self.config.namespace))
        })
    }
}
