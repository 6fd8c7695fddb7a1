use coinsafe_core::{DeviceFingerprint, FingerprintError, FingerprintProvider};

/// Test double. `failing()` simulates a device where no stable identifier can
/// be derived, which the controller must treat as non-fatal.
#[derive(Debug, Clone, Default)]
pub struct MockFingerprintProvider {
    fail: bool,
}

impl MockFingerprintProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self { fail: true }
    }
}

#[async_trait::async_trait]
impl FingerprintProvider for MockFingerprintProvider {
    async fn fingerprint(&self) -> Result<DeviceFingerprint, FingerprintError> {
        if self.fail {
            Err(FingerprintError::Unavailable(
                "fingerprinting disabled".to_owned(),
            ))
        } else {
            Ok(DeviceFingerprint::new("mock-device"))
        }
    }
}
