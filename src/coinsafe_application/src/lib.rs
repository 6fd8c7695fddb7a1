pub mod auto_verify;
pub mod session;

pub use auto_verify::{AutoVerifyTrigger, InputSource, TriggerContext, TriggerDecision};
pub use session::{
    SessionConfig, SessionParams, VerificationSession, VerificationStatus, VerifyError,
    VerifyOutcome,
};
