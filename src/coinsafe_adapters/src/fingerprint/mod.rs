pub mod mock_fingerprint_provider;
pub mod static_fingerprint_provider;

pub use mock_fingerprint_provider::MockFingerprintProvider;
pub use static_fingerprint_provider::StaticFingerprintProvider;
