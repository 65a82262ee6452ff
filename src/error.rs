use std::fmt;

/// Error returned when a public ID cannot be generated.
#[derive(Debug, PartialEq)]
pub enum Error {
    InvalidLength { length: u32 },
    InvalidAlphabet(String),
    DomainTooLarge { bits: u32 },
    BandExhausted { offset: u64, capacity: u64 },
    CapacityExceedsDomain { capacity: u64, bits: u32 },
    EncodingOverflow { value: u64, length: u32, base: usize },
    SecretUnavailable(String),
    CounterUnavailable(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::InvalidLength { length } => {
                write!(f, "Length {} is outside 1..=12", length)
            }
            Error::InvalidAlphabet(reason) => {
                write!(f, "Invalid alphabet: {}", reason)
            }
            Error::DomainTooLarge { bits } => {
                write!(f, "Domain of {} bits exceeds the 62 bit limit", bits)
            }
            Error::BandExhausted { offset, capacity } => {
                write!(f, "Offset {} does not fit in band of capacity {}", offset, capacity)
            }
            Error::CapacityExceedsDomain { capacity, bits } => {
                write!(f, "Capacity {} does not fit in a {} bit domain", capacity, bits)
            }
            Error::EncodingOverflow { value, length, base } => {
                write!(
                    f,
                    "Value {} does not fit in {} digits of base {}",
                    value, length, base
                )
            }
            Error::SecretUnavailable(reason) => {
                write!(f, "Secret unavailable: {}", reason)
            }
            Error::CounterUnavailable(reason) => {
                write!(f, "Counter unavailable: {}", reason)
            }
        }
    }
}

impl std::error::Error for Error {}

#[derive(Debug, PartialEq)]
pub enum ConfigError {
    InvalidDomainFloor,
    InvalidDefaultLength,
    GlobalUnset,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConfigError::InvalidDomainFloor => write!(f, "Domain floor must be in 16..=62"),
            ConfigError::InvalidDefaultLength => write!(f, "Default length must be in 1..=12"),
            ConfigError::GlobalUnset => write!(f, "Global configuration has not been set"),
        }
    }
}

impl std::error::Error for ConfigError {}
