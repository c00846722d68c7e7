use std::fmt;

use crate::error::ValidationError;

/// GitHub personal access token.
///
/// The core never checks validity; GitHub rejects a bad token with 401.
#[derive(Clone, PartialEq, Eq)]
pub struct Token(String);

impl Token {
    /// Builds a token, rejecting empty or whitespace-only values.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(ValidationError::EmptyToken);
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Token(***)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_blank_token() {
        assert_eq!(Token::new("  "), Err(ValidationError::EmptyToken));
    }

    #[test]
    fn debug_output_hides_secret() {
        let token = Token::new("ghp_secret").unwrap();
        assert_eq!(format!("{token:?}"), "Token(***)");
        assert_eq!(token.as_str(), "ghp_secret");
    }
}
