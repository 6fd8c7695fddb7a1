pub mod auth;
pub mod config;
pub mod fingerprint;
pub mod http;
pub mod persistence;
pub mod telemetry;

pub use auth::JwtIdentityDecoder;
pub use config::{ApiSettings, Settings, SettingsError, VerificationSettings};
pub use fingerprint::{MockFingerprintProvider, StaticFingerprintProvider};
pub use http::ApiVerificationGateway;
pub use persistence::ArcSwapSessionStore;
