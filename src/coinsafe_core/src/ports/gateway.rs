use async_trait::async_trait;
use thiserror::Error;

use crate::domain::verification::{VerificationReply, VerificationRequest};

// VerificationGateway port trait and errors
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The backend answered with a non-success status. The message is the
    /// backend-supplied reason (or a generic default) and is shown verbatim.
    #[error("Verification rejected: {message}")]
    Rejected { message: String },
    /// Transport failure before any backend answer was received.
    #[error("Network error: {0}")]
    Network(String),
}

#[cfg(debug_assertions)]
impl PartialEq for GatewayError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Rejected { message: a }, Self::Rejected { message: b }) => a == b,
            (Self::Network(a), Self::Network(b)) => a == b,
            _ => false,
        }
    }
}

/// Port trait for the backend verification endpoint. One implementation per
/// transport; the controller never sees HTTP details.
#[async_trait]
pub trait VerificationGateway: Send + Sync {
    async fn verify(
        &self,
        request: &VerificationRequest,
    ) -> Result<VerificationReply, GatewayError>;
}
