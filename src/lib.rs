//! # Coinsafe - 2FA Verification Engine
//!
//! This is a facade crate that re-exports the public APIs of the two-factor
//! verification components. Use this crate to drive the whole login 2FA step
//! from one place.
//!
//! ## Usage
//!
//! Add to your `Cargo.toml`:
//! ```toml
//! [dependencies]
//! coinsafe = { path = "../coinsafe" }
//! ```
//!
//! ## Structure
//!
//! - **Core domain types**: `Email`, `TotpCode`, `BackupCode`, `TempToken`, etc.
//! - **Port traits**: `VerificationGateway`, `FingerprintProvider`,
//!   `SessionEstablisher`, `IdentityDecoder`, `VerificationObserver`
//! - **State machine**: `VerificationSession` and the `AutoVerifyTrigger`
//! - **Adapters**: `ApiVerificationGateway`, `JwtIdentityDecoder`,
//!   `ArcSwapSessionStore`, fingerprint providers, settings, telemetry

// ============================================================================
// Core Domain Types
// ============================================================================

/// Core domain types and value objects
pub mod core {
    pub use coinsafe_core::*;
}

// Re-export most commonly used core types at the root level
pub use coinsafe_core::{
    BackupCode, DeviceFingerprint, Email, IssuedSession, TempToken, TotpCode, UserIdentity,
    VerificationCredential, VerificationReply, VerificationRequest, VerifyMode, normalize,
};

// ============================================================================
// Port Traits
// ============================================================================

/// Port trait definitions
pub mod ports {
    pub use coinsafe_core::{
        FingerprintError, FingerprintProvider, GatewayError, IdentityDecoder, SessionEstablisher,
        VerificationGateway, VerificationObserver,
    };
}

// Re-export port traits at root level
pub use coinsafe_core::{
    FingerprintError, FingerprintProvider, GatewayError, IdentityDecoder, SessionEstablisher,
    VerificationGateway, VerificationObserver,
};

// ============================================================================
// State Machine (Application Layer)
// ============================================================================

/// The verification state machine
pub mod application {
    pub use coinsafe_application::*;
}

// Re-export the controller at root level
pub use coinsafe_application::{
    AutoVerifyTrigger, InputSource, SessionConfig, SessionParams, VerificationSession,
    VerificationStatus, VerifyError, VerifyOutcome,
};

// ============================================================================
// Adapters (Infrastructure)
// ============================================================================

/// Infrastructure adapters
pub mod adapters {
    /// HTTP gateway implementation
    pub mod http {
        pub use coinsafe_adapters::http::*;
    }

    /// Token storage implementations
    pub mod persistence {
        pub use coinsafe_adapters::persistence::*;
    }

    /// Device fingerprint providers
    pub mod fingerprint {
        pub use coinsafe_adapters::fingerprint::*;
    }

    /// JWT identity decoding
    pub mod auth {
        pub use coinsafe_adapters::auth::*;
    }

    /// Configuration
    pub mod config {
        pub use coinsafe_adapters::config::*;
    }

    /// Tracing and error-report setup
    pub mod telemetry {
        pub use coinsafe_adapters::telemetry::*;
    }
}

// Re-export commonly used adapters at root level
pub use coinsafe_adapters::{
    ApiVerificationGateway, ArcSwapSessionStore, JwtIdentityDecoder, MockFingerprintProvider,
    Settings, StaticFingerprintProvider,
};

// ============================================================================
// Re-export common external dependencies
// ============================================================================

/// Re-export async-trait for implementing port traits
pub use async_trait::async_trait;

/// Re-export secrecy for working with secrets
pub use secrecy::{ExposeSecret, Secret};
