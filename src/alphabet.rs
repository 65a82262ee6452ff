use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::band::{MAX_LENGTH, MIN_LENGTH};
use crate::Error;

// Digits without 0 and 1, consonants only. No vowels means no spelled words.
const LOWER_CHARS: &str = "23456789bcdfghjklmnpqrstvwxyz";
const UPPER_CHARS: &str = "23456789BCDFGHJKLMNPQRSTVWXYZ";
const BOTH_CHARS: &str = "23456789bcdfghjklmnpqrstvwxyzBCDFGHJKLMNPQRSTVWXYZ";

static LOWER: Lazy<Alphabet> = Lazy::new(|| Alphabet::from_trusted(LOWER_CHARS));
static UPPER: Lazy<Alphabet> = Lazy::new(|| Alphabet::from_trusted(UPPER_CHARS));
static BOTH: Lazy<Alphabet> = Lazy::new(|| Alphabet::from_trusted(BOTH_CHARS));

/// Selects one of the built-in alphabets.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlphabetType {
    /// 29 characters, lowercase.
    #[default]
    Lower,
    /// 29 characters, uppercase.
    Upper,
    /// 50 characters, mixed case.
    Both,
}

impl AlphabetType {
    /// Returns the alphabet this selector stands for.
    pub fn alphabet(self) -> &'static Alphabet {
        match self {
            AlphabetType::Lower => &*LOWER,
            AlphabetType::Upper => &*UPPER,
            AlphabetType::Both => &*BOTH,
        }
    }
}

impl fmt::Display for AlphabetType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            AlphabetType::Lower => "lower",
            AlphabetType::Upper => "upper",
            AlphabetType::Both => "both",
        };
        f.write_str(name)
    }
}

impl FromStr for AlphabetType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lower" => Ok(AlphabetType::Lower),
            "upper" => Ok(AlphabetType::Upper),
            "both" => Ok(AlphabetType::Both),
            other => Err(Error::InvalidAlphabet(format!(
                "unknown alphabet type {:?}",
                other
            ))),
        }
    }
}

/// An ordered set of distinct characters. Its size is the numeric base.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet {
    chars: Vec<char>,
}

impl Alphabet {
    /// Creates a custom alphabet.  It needs at least two characters and
    /// no character may repeat.
    ///
    /// # Examples
    ///
    /// ```
    /// use pubid::Alphabet;
    ///
    /// let hex = Alphabet::new("0123456789abcdef").unwrap();
    /// assert_eq!(hex.encode(255, 4).unwrap(), "00ff");
    /// assert!(Alphabet::new("aa").is_err());
    /// ```
    pub fn new(chars: &str) -> Result<Alphabet, Error> {
        let chars: Vec<char> = chars.chars().collect();
        if chars.len() < 2 {
            return Err(Error::InvalidAlphabet(
                "needs at least two characters".to_string(),
            ));
        }
        let mut seen = HashSet::with_capacity(chars.len());
        for &c in &chars {
            if !seen.insert(c) {
                return Err(Error::InvalidAlphabet(format!("character {:?} repeats", c)));
            }
        }
        Ok(Alphabet { chars })
    }

    fn from_trusted(chars: &str) -> Alphabet {
        Alphabet {
            chars: chars.chars().collect(),
        }
    }

    /// The numeric base.
    pub fn base(&self) -> usize {
        self.chars.len()
    }

    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    /// Renders `num` as exactly `length` digits, most significant first.
    ///
    /// Fails with `EncodingOverflow` if `num` needs more than `length` digits.
    pub fn encode(&self, num: u64, length: u32) -> Result<String, Error> {
        if !(MIN_LENGTH..=MAX_LENGTH).contains(&length) {
            return Err(Error::InvalidLength { length });
        }
        let base = self.chars.len() as u64;
        let mut digits = Vec::with_capacity(length as usize);
        let mut rest = num;
        for _ in 0..length {
            digits.push(self.chars[(rest % base) as usize]);
            rest /= base;
        }
        if rest != 0 {
            return Err(Error::EncodingOverflow {
                value: num,
                length,
                base: self.base(),
            });
        }
        Ok(digits.iter().rev().collect())
    }

    /// Reads a digit string of 1 to 12 characters back into its integer value.
    ///
    /// Strings whose value exceeds `u64::MAX` fail with `EncodingOverflow`,
    /// reporting the value as saturated at `u64::MAX`.
    pub fn decode(&self, encoded: &str) -> Result<u64, Error> {
        let length = encoded.chars().count() as u32;
        if !(MIN_LENGTH..=MAX_LENGTH).contains(&length) {
            return Err(Error::InvalidLength { length });
        }
        let base = self.chars.len() as u64;
        encoded.chars().try_fold(0u64, |acc, c| {
            let digit = self
                .chars
                .iter()
                .position(|&d| d == c)
                .ok_or_else(|| Error::InvalidAlphabet(format!("character {:?} not in alphabet", c)))?;
            acc.checked_mul(base)
                .and_then(|v| v.checked_add(digit as u64))
                .ok_or(Error::EncodingOverflow {
                    value: u64::MAX,
                    length,
                    base: self.base(),
                })
        })
    }
}
