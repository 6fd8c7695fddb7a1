use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

/// Maximum number of digits in a TOTP code.
pub const TOTP_CODE_LEN: usize = 6;

static TOTP_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{6}$").expect("invalid TOTP regex"));

/// Strip every non-digit character from raw input and cap the result at six
/// characters. Pure and idempotent: `normalize(normalize(x)) == normalize(x)`.
///
/// This is the single entry point for turning keystrokes or pasted text
/// (which may contain whitespace, dashes, or stray characters) into the
/// canonical code representation the rest of the flow operates on.
pub fn normalize(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_digit())
        .take(TOTP_CODE_LEN)
        .collect()
}

#[derive(Debug, Error)]
pub enum TotpCodeError {
    #[error("Code must be exactly 6 digits")]
    InvalidFormat,
}

/// A validated six-digit TOTP code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TotpCode(String);

impl TotpCode {
    /// Normalize raw input and validate it as a complete six-digit code.
    pub fn parse(raw: &str) -> Result<Self, TotpCodeError> {
        let normalized = normalize(raw);
        if TOTP_REGEX.is_match(&normalized) {
            Ok(Self(normalized))
        } else {
            Err(TotpCodeError::InvalidFormat)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for TotpCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
