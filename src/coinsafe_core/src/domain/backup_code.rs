use thiserror::Error;

#[derive(Debug, Error)]
pub enum BackupCodeError {
    #[error("Backup code is required")]
    Empty,
}

/// A single-use backup code. Unlike [`TotpCode`](super::totp_code::TotpCode)
/// there is no digit or length constraint; the only local requirement is that
/// the trimmed value is non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupCode(String);

impl BackupCode {
    pub fn parse(raw: &str) -> Result<Self, BackupCodeError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            Err(BackupCodeError::Empty)
        } else {
            Ok(Self(trimmed.to_owned()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
