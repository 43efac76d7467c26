//! Strength codes and the alphabet segments they select.

use std::fmt;
use std::str::FromStr;

use crate::errors::{SecretaryError, Result};

pub const DIGITS: &str = "0123456789";
pub const LOWERCASE: &str = "abcdefghijklmnopqrstuvwxyz";
pub const UPPERCASE: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
/// Printable ASCII symbols plus the space character.
pub const SYMBOLS_33: &str = "!\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~ ";
/// Printable ASCII symbols, no space.
pub const SYMBOLS_32: &str = "!\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~";
/// Symbols without space, double/single quotes and backslash.
pub const SYMBOLS_29: &str = "!#$%&()*+,-./:;<=>?@[]^_`{|}~";

/// Character classes a generated password is drawn from.
///
/// The discriminant is the size of the resulting alphabet, which is
/// also the code users pass on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Strength {
    /// Digits only.
    Numeric = 10,
    /// Digits and lowercase letters.
    LowerAlphanumeric = 36,
    /// Digits, lowercase and uppercase letters.
    Alphanumeric = 62,
    /// ASCII 33..=126 without `"`, `'` and `\`.
    #[default]
    Symbols29 = 91,
    /// ASCII 33..=126.
    Symbols32 = 94,
    /// ASCII 32..=126, space included.
    Symbols33 = 95,
}

impl Strength {
    /// All supported strengths, in ascending code order.
    pub const ALL: [Strength; 6] = [
        Strength::Numeric,
        Strength::LowerAlphanumeric,
        Strength::Alphanumeric,
        Strength::Symbols29,
        Strength::Symbols32,
        Strength::Symbols33,
    ];

    /// The numeric code of this strength.
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Ordered alphabet segments; every segment is a required class.
    pub fn segments(self) -> &'static [&'static str] {
        match self {
            Strength::Numeric => &[DIGITS],
            Strength::LowerAlphanumeric => &[DIGITS, LOWERCASE],
            Strength::Alphanumeric => &[DIGITS, LOWERCASE, UPPERCASE],
            Strength::Symbols29 => &[DIGITS, LOWERCASE, UPPERCASE, SYMBOLS_29],
            Strength::Symbols32 => &[DIGITS, LOWERCASE, UPPERCASE, SYMBOLS_32],
            Strength::Symbols33 => &[DIGITS, LOWERCASE, UPPERCASE, SYMBOLS_33],
        }
    }

    /// The concatenated alphabet for this strength.
    pub fn alphabet(self) -> String {
        self.segments().concat()
    }
}

impl TryFrom<u8> for Strength {
    type Error = SecretaryError;

    fn try_from(code: u8) -> Result<Self> {
        Strength::ALL
            .into_iter()
            .find(|s| s.code() == code)
            .ok_or_else(|| {
                SecretaryError::InvalidParameter(format!(
                    "unsupported strength {code} — expected one of 10, 36, 62, 91, 94, 95"
                ))
            })
    }
}

impl FromStr for Strength {
    type Err = SecretaryError;

    fn from_str(s: &str) -> Result<Self> {
        let code: u8 = s.trim().parse().map_err(|_| {
            SecretaryError::InvalidParameter(format!("strength '{s}' is not a number"))
        })?;
        Strength::try_from(code)
    }
}

impl fmt::Display for Strength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
