//! The two collaborators a [`Generator`](crate::Generator) depends on: a
//! secret provider and a monotonic counter, with in-memory implementations.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use rand::RngCore;

use crate::Error;

/// Length of secrets created by the providers in this crate.
pub const SECRET_LENGTH: usize = 32;

/// Supplies the master secret for a namespace.
///
/// Implementations must be idempotent and race-safe: concurrent first calls
/// for a namespace converge on one stored secret.
pub trait SecretProvider: Send + Sync {
    fn get_or_create_secret(&self, namespace: &str) -> Result<Vec<u8>, Error>;
}

/// A strictly increasing counter starting at 1.  No value may be issued twice.
pub trait Counter: Send + Sync {
    fn next(&self) -> Result<u64, Error>;
}

impl<T: SecretProvider + ?Sized> SecretProvider for std::sync::Arc<T> {
    fn get_or_create_secret(&self, namespace: &str) -> Result<Vec<u8>, Error> {
        (**self).get_or_create_secret(namespace)
    }
}

impl<T: Counter + ?Sized> Counter for std::sync::Arc<T> {
    fn next(&self) -> Result<u64, Error> {
        (**self).next()
    }
}

/// Keeps secrets in process memory.  New secrets come from the thread RNG.
#[derive(Debug, Default)]
pub struct MemorySecretProvider {
    secrets: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemorySecretProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a provider that already holds `secret` for `namespace`.
    pub fn with_secret(namespace: &str, secret: &[u8]) -> Self {
        let provider = Self::default();
        provider
            .secrets
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(namespace.to_string(), secret.to_vec());
        provider
    }
}

impl SecretProvider for MemorySecretProvider {
    fn get_or_create_secret(&self, namespace: &str) -> Result<Vec<u8>, Error> {
        let mut secrets = self
            .secrets
            .lock()
            .map_err(|e| Error::SecretUnavailable(e.to_string()))?;
        let secret = secrets.entry(namespace.to_string()).or_insert_with(|| {
            let mut secret = vec![0u8; SECRET_LENGTH];
            rand::thread_rng().fill_bytes(&mut secret);
            secret
        });
        Ok(secret.clone())
    }
}

/// An in-process counter with atomic fetch-and-increment.
#[derive(Debug)]
pub struct AtomicCounter {
    next: AtomicU64,
}

impl AtomicCounter {
    /// A counter whose first value is 1.
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    /// A counter whose first value is `first`, for resuming a persisted count.
    pub fn starting_at(first: u64) -> Self {
        AtomicCounter {
            next: AtomicU64::new(first),
        }
    }
}

impl Default for AtomicCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl Counter for AtomicCounter {
    fn next(&self) -> Result<u64, Error> {
        self.next
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |value| value.checked_add(1))
            .map_err(|_| Error::CounterUnavailable("counter exhausted".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_secret_is_stable() {
        let provider = MemorySecretProvider::new();
        let first = provider.get_or_create_secret("users").unwrap();
        assert_eq!(first.len(), SECRET_LENGTH);
        assert_eq!(provider.get_or_create_secret("users").unwrap(), first);
        assert_ne!(provider.get_or_create_secret("orders").unwrap(), first);
    }

    #[test]
    fn test_fixed_secret() {
        let provider = MemorySecretProvider::with_secret("users", b"Test key here");
        assert_eq!(
            provider.get_or_create_secret("users").unwrap(),
            b"Test key here".to_vec()
        );
    }

    #[test]
    fn test_concurrent_secret_creation_converges() {
        let provider = Arc::new(MemorySecretProvider::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let provider = provider.clone();
                thread::spawn(move || provider.get_or_create_secret("users").unwrap())
            })
            .collect();
        let secrets: HashSet<Vec<u8>> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(secrets.len(), 1);
    }

    #[test]
    fn test_counter() {
        let counter = AtomicCounter::new();
        assert_eq!(counter.next(), Ok(1));
        assert_eq!(counter.next(), Ok(2));

        let counter = AtomicCounter::starting_at(100);
        assert_eq!(counter.next(), Ok(100));
    }

    #[test]
    fn test_counter_exhaustion() {
        let counter = AtomicCounter::starting_at(u64::MAX);
        assert!(matches!(counter.next(), Err(Error::CounterUnavailable(_))));
    }

    #[test]
    fn test_concurrent_counter_never_repeats() {
        let counter = Arc::new(AtomicCounter::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let counter = counter.clone();
                thread::spawn(move || (0..1_000).map(|_| counter.next().unwrap()).collect::<Vec<_>>())
            })
            .collect();
        let values: HashSet<u64> = handles.into_iter().flat_map(|h| h.join().unwrap()).collect();
        assert_eq!(values.len(), 8_000);
        assert_eq!(values.iter().max(), Some(&8_000));
    }
}
