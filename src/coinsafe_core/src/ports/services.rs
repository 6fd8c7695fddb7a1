use async_trait::async_trait;
use thiserror::Error;

use crate::domain::device_fingerprint::DeviceFingerprint;
use crate::domain::email::Email;
use crate::domain::issued_session::{IssuedSession, UserIdentity};

#[derive(Debug, Error)]
pub enum FingerprintError {
    #[error("Fingerprint unavailable: {0}")]
    Unavailable(String),
}

/// Port trait for the device fingerprint provider. Failure is non-fatal:
/// the caller logs it and proceeds without a fingerprint.
#[async_trait]
pub trait FingerprintProvider: Send + Sync {
    async fn fingerprint(&self) -> Result<DeviceFingerprint, FingerprintError>;
}

/// Port trait for the process-wide token storage. Establishing a session is
/// a local write and assumed infallible.
pub trait SessionEstablisher: Send + Sync {
    fn establish(&self, session: &IssuedSession);
}

/// Port trait for decoding a display identity out of an access token. Pure;
/// any decode failure falls back to an identity carrying only the email.
pub trait IdentityDecoder: Send + Sync {
    fn decode_user(&self, access_token: &str, fallback_email: &Email) -> UserIdentity;
}

/// Callbacks exposed to the embedding UI. `verification_succeeded` fires at
/// most once per session regardless of how many triggers raced to completion.
pub trait VerificationObserver: Send + Sync {
    fn verification_succeeded(&self, session: &IssuedSession);
    fn verification_cancelled(&self);
}
