//! Postal code (CEP) sanitization and validation.

use std::fmt;
use thiserror::Error;

/// Length of a Brazilian postal code once formatting is stripped
pub const CEP_LENGTH: usize = 8;

const ZERO_CEP: &str = "00000000";

/// Rejection reasons for a raw postal code
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid zipcode")]
    InvalidIdentifier,
}

/// A postal code known to be exactly eight ASCII digits and not all zeros
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Cep(String);

impl Cep {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Cep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Cep {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Remove every character that is not an ASCII digit
pub fn sanitize(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Sanitize `raw` and accept it only as an eight digit, non-zero postal code
pub fn validate(raw: &str) -> Result<Cep, ValidationError> {
    let digits = sanitize(raw);

    if digits.len() != CEP_LENGTH || digits == ZERO_CEP {
        return Err(ValidationError::InvalidIdentifier);
    }

    Ok(Cep(digits))
}
