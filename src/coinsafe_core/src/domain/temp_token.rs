use secrecy::{ExposeSecret, Secret};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TempTokenError {
    #[error("Temporary token is empty")]
    Empty,
}

/// Opaque short-lived token issued by the backend after the password step.
/// Every verification request must carry it; the client never inspects it.
#[derive(Debug, Clone)]
pub struct TempToken(Secret<String>);

impl TempToken {
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl TryFrom<Secret<String>> for TempToken {
    type Error = TempTokenError;

    fn try_from(value: Secret<String>) -> Result<Self, Self::Error> {
        if value.expose_secret().is_empty() {
            Err(TempTokenError::Empty)
        } else {
            Ok(Self(value))
        }
    }
}

impl TryFrom<&str> for TempToken {
    type Error = TempTokenError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::try_from(Secret::from(value.to_owned()))
    }
}
