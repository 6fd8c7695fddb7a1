use coinsafe_core::{DeviceFingerprint, FingerprintError, FingerprintProvider};

/// Fingerprint provider wrapping an identifier computed once at startup
/// (e.g. a hashed machine id supplied by the embedding application).
#[derive(Debug, Clone)]
pub struct StaticFingerprintProvider {
    fingerprint: DeviceFingerprint,
}

impl StaticFingerprintProvider {
    pub fn new(fingerprint: impl Into<String>) -> Self {
        Self {
            fingerprint: DeviceFingerprint::new(fingerprint),
        }
    }
}

#[async_trait::async_trait]
impl FingerprintProvider for StaticFingerprintProvider {
    async fn fingerprint(&self) -> Result<DeviceFingerprint, FingerprintError> {
        Ok(self.fingerprint.clone())
    }
}
