use super::backup_code::BackupCode;
use super::device_fingerprint::DeviceFingerprint;
use super::issued_session::UserIdentity;
use super::temp_token::TempToken;
use super::totp_code::TotpCode;

/// Which kind of code the user is entering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyMode {
    Totp,
    Backup,
}

/// The credential carried by one verification attempt.
#[derive(Debug, Clone)]
pub enum VerificationCredential {
    Totp(TotpCode),
    Backup(BackupCode),
}

impl VerificationCredential {
    pub fn mode(&self) -> VerifyMode {
        match self {
            Self::Totp(_) => VerifyMode::Totp,
            Self::Backup(_) => VerifyMode::Backup,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Totp(code) => code.as_str(),
            Self::Backup(code) => code.as_str(),
        }
    }
}

/// One fully-assembled verification request, ready for the gateway.
#[derive(Debug, Clone)]
pub struct VerificationRequest {
    pub credential: VerificationCredential,
    pub temp_token: TempToken,
    pub remember_me: bool,
    pub device_fingerprint: Option<DeviceFingerprint>,
}

/// Backend success payload. `access_token` is mandatory for the attempt to
/// count as a success; the controller treats its absence as a malformed
/// response even when the transport-level status was 2xx.
#[derive(Debug, Clone, Default)]
pub struct VerificationReply {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub user: Option<UserIdentity>,
}
