pub mod domain;
pub mod ports;

// Re-export commonly used types for convenience
pub use domain::{
    backup_code::{BackupCode, BackupCodeError},
    device_fingerprint::DeviceFingerprint,
    email::{Email, EmailError},
    issued_session::{IssuedSession, UserIdentity},
    temp_token::{TempToken, TempTokenError},
    totp_code::{TotpCode, TotpCodeError, normalize},
    verification::{VerificationCredential, VerificationReply, VerificationRequest, VerifyMode},
};

pub use ports::{
    gateway::{GatewayError, VerificationGateway},
    services::{
        FingerprintError, FingerprintProvider, IdentityDecoder, SessionEstablisher,
        VerificationObserver,
    },
};
