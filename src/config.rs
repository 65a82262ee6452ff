use once_cell::sync::Lazy;
use serde::Deserialize;
use std::sync::Mutex;

use crate::band::{DEFAULT_DOMAIN_FLOOR, MAX_DOMAIN_BITS, MAX_LENGTH, MIN_LENGTH};
use crate::{AlphabetType, ConfigError};

static GLOBAL_CONFIG: Lazy<Mutex<Option<Config>>> = Lazy::new(|| Mutex::new(None));

/// Configuring the ID generator.
///
/// Can also be read with serde from any self-describing format; omitted
/// fields take their defaults and values are validated the same way as with
/// the builder methods.
///
/// ```
/// use pubid::{AlphabetType, Config};
///
/// let config: Config = serde_json::from_str(r#"{"namespace": "orders", "default_length": 8}"#).unwrap();
/// assert_eq!(config.get_default_length(), 8);
/// assert_eq!(config.get_default_alphabet(), AlphabetType::Lower);
/// ```
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(try_from = "ConfigFile")]
pub struct Config {
    pub(crate) namespace: String,
    pub(crate) domain_floor: u32,
    pub(crate) default_length: u32,
    pub(crate) default_alphabet: AlphabetType,
}

impl Config {
    /// Creates a new configuration for IDs in `namespace`, other settings in
    /// default values.
    /// - `domain_floor` defaults to 16 bits.  Narrower permutation domains
    ///   could be enumerated by brute force.
    /// - `default_length` defaults to 6.
    /// - `default_alphabet` defaults to `AlphabetType::Lower`.
    ///
    /// The namespace selects the secret and is mixed into key derivation, so
    /// two namespaces sharing one secret still permute differently.
    pub fn new(namespace: &str) -> Self {
        Config {
            namespace: namespace.to_string(),
            domain_floor: DEFAULT_DOMAIN_FLOOR,
            default_length: 6,
            default_alphabet: AlphabetType::Lower,
        }
    }

    /// Sets the minimum width of the permutation domain in bits.
    /// The value must be between 16 and 62.  An odd floor is rounded up
    /// during domain sizing.
    ///
    /// Changing the floor changes every ID issued afterwards.
    pub fn domain_floor(mut self, bits: u32) -> Result<Self, ConfigError> {
        if !(DEFAULT_DOMAIN_FLOOR..=MAX_DOMAIN_BITS).contains(&bits) {
            Err(ConfigError::InvalidDomainFloor)
        } else {
            self.domain_floor = bits;
            Ok(self)
        }
    }

    /// Sets the length used by `Generator::generate_public_id`.
    /// The value must be between 1 and 12.
    pub fn default_length(mut self, length: u32) -> Result<Self, ConfigError> {
        if !(MIN_LENGTH..=MAX_LENGTH).contains(&length) {
            Err(ConfigError::InvalidDefaultLength)
        } else {
            self.default_length = length;
            Ok(self)
        }
    }

    /// Sets the alphabet used by `Generator::generate_public_id`.
    pub fn default_alphabet(mut self, alphabet: AlphabetType) -> Self {
        self.default_alphabet = alphabet;
        self
    }

    pub fn get_namespace(&self) -> &str {
        &self.namespace
    }

    pub fn get_domain_floor(&self) -> u32 {
        self.domain_floor
    }

    pub fn get_default_length(&self) -> u32 {
        self.default_length
    }

    pub fn get_default_alphabet(&self) -> AlphabetType {
        self.default_alphabet
    }

    /// Sets the global configuration, used by `Generator::from_global`.
    pub fn set_global(config: Config) {
        let mut global_config = GLOBAL_CONFIG.lock().unwrap_or_else(|e| e.into_inner());
        *global_config = Some(config);
    }

    /// Accesses the global configuration, if set.
    pub fn global() -> Option<Config> {
        GLOBAL_CONFIG
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    namespace: String,
    #[serde(default)]
    domain_floor: Option<u32>,
    #[serde(default)]
    default_length: Option<u32>,
    #[serde(default)]
    default_alphabet: Option<AlphabetType>,
}

impl TryFrom<ConfigFile> for Config {
    type Error = ConfigError;

    fn try_from(file: ConfigFile) -> Result<Self, Self::Error> {
        let mut config = Config::new(&file.namespace);
        if let Some(bits) = file.domain_floor {
            config = config.domain_floor(bits)?;
        }
        if let Some(length) = file.default_length {
            config = config.default_length(length)?;
        }
        if let Some(alphabet) = file.default_alphabet {
            config = config.default_alphabet(alphabet);
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::new("users");
        assert_eq!(config.get_namespace(), "users");
        assert_eq!(config.get_domain_floor(), 16);
        assert_eq!(config.get_default_length(), 6);
        assert_eq!(config.get_default_alphabet(), AlphabetType::Lower);
    }

    #[test]
    fn test_builder() {
        let config = Config::new("users")
            .domain_floor(20)
            .unwrap()
            .default_length(8)
            .unwrap()
            .default_alphabet(AlphabetType::Both);
        assert_eq!(config.get_domain_floor(), 20);
        assert_eq!(config.get_default_length(), 8);
        assert_eq!(config.get_default_alphabet(), AlphabetType::Both);
    }

    #[test]
    fn test_builder_errors() {
        assert_eq!(
            Config::new("users").domain_floor(14),
            Err(ConfigError::InvalidDomainFloor)
        );
        assert_eq!(
            Config::new("users").domain_floor(64),
            Err(ConfigError::InvalidDomainFloor)
        );
        assert_eq!(
            Config::new("users").default_length(0),
            Err(ConfigError::InvalidDefaultLength)
        );
        assert_eq!(
            Config::new("users").default_length(13),
            Err(ConfigError::InvalidDefaultLength)
        );
    }

    #[test]
    fn test_deserialize() {
        let config: Config = serde_json::from_str(
            r#"{"namespace": "users", "domain_floor": 18, "default_alphabet": "upper"}"#,
        )
        .unwrap();
        assert_eq!(
            config,
            Config::new("users")
                .domain_floor(18)
                .unwrap()
                .default_alphabet(AlphabetType::Upper)
        );

        assert!(serde_json::from_str::<Config>(r#"{"namespace": "users", "default_length": 20}"#).is_err());
        assert!(serde_json::from_str::<Config>(r#"{"namespace": "users", "length": 6}"#).is_err());
        assert!(serde_json::from_str::<Config>(r#"{"domain_floor": 16}"#).is_err());
    }
}
