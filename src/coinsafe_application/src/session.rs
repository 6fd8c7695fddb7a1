use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use secrecy::Secret;
use thiserror::Error;
use tokio::sync::Mutex;
use tokio::time::error::Elapsed;
use uuid::Uuid;

use coinsafe_core::{
    BackupCode, DeviceFingerprint, Email, FingerprintProvider, GatewayError, IdentityDecoder,
    IssuedSession, SessionEstablisher, TempToken, TotpCode, VerificationCredential,
    VerificationGateway, VerificationObserver, VerificationReply, VerificationRequest, VerifyMode,
    normalize,
};

use crate::auto_verify::{
    AutoVerifyTrigger, InputSource, TriggerContext, TriggerDecision,
};

/// Error taxonomy for one verification attempt. Every variant is terminal for
/// the current attempt only; none of them corrupts the success latch.
#[derive(Debug, Error)]
pub enum VerifyError {
    #[error("Enter the 6-digit code from your authenticator app")]
    InvalidCode,
    #[error("Backup code is required")]
    BackupCodeRequired,
    #[error("Could not connect to the server. Check your connection and try again")]
    Network(String),
    #[error("{0}")]
    Rejected(String),
    #[error("The server response was missing session tokens. Please try again")]
    MalformedResponse,
    #[error("Verification timed out. Please try again")]
    Timeout,
}

/// Result of a verify call that did not error.
#[derive(Debug)]
pub enum VerifyOutcome {
    /// The backend accepted the code; session material was handed off.
    Established(IssuedSession),
    /// The call was dropped without side effects: the session has already
    /// succeeded, was cancelled, or another request is in flight.
    Skipped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationStatus {
    Idle,
    Pending,
    Succeeded,
    Failed,
}

/// Timing knobs, overridable for tests and configuration.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Safety timeout for one verification request.
    pub request_timeout: Duration,
    /// Budget for the fingerprint provider before proceeding without one.
    pub fingerprint_timeout: Duration,
    /// Settle delay after the final keystroke.
    pub typed_settle: Duration,
    /// Settle delay after a paste.
    pub paste_settle: Duration,
    /// How long an inline error stays visible.
    pub error_display: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
            fingerprint_timeout: Duration::from_secs(3),
            typed_settle: crate::auto_verify::TYPED_SETTLE,
            paste_settle: crate::auto_verify::PASTE_SETTLE,
            error_display: Duration::from_secs(5),
        }
    }
}

/// Everything the login step hands over when it receives a 2FA challenge.
#[derive(Debug, Clone)]
pub struct SessionParams {
    pub email: Email,
    pub temp_token: TempToken,
    pub remember_me: bool,
    /// Pre-computed fingerprint, if the embedding app already has one.
    pub device_fingerprint: Option<DeviceFingerprint>,
}

struct SessionState {
    raw_input: String,
    normalized_code: String,
    mode: VerifyMode,
    status: VerificationStatus,
    is_verifying: bool,
    has_succeeded: bool,
    cancelled: bool,
    device_fingerprint: Option<DeviceFingerprint>,
    trigger: AutoVerifyTrigger,
    /// Bumped by `reset` and `cancel`; a completion whose captured epoch no
    /// longer matches is discarded without touching any flag.
    epoch: u64,
    error: Option<String>,
    error_seq: u64,
}

/// Headless controller for one 2FA verification cycle.
///
/// One instance per login attempt, created when the password step hands off a
/// temporary token and discarded once verification succeeds or the user
/// cancels. All mutable flags live behind a single mutex that is never held
/// across a suspension point; mutual exclusion between overlapping verify
/// calls is enforced by the `is_verifying` flag, not the lock.
pub struct VerificationSession<G, F, S, D, O>
where
    G: VerificationGateway,
    F: FingerprintProvider,
    S: SessionEstablisher,
    D: IdentityDecoder,
    O: VerificationObserver,
{
    session_id: Uuid,
    email: Email,
    temp_token: TempToken,
    remember_me: bool,
    config: SessionConfig,
    gateway: G,
    fingerprints: F,
    establisher: S,
    decoder: D,
    observer: O,
    state: Mutex<SessionState>,
}

impl<G, F, S, D, O> VerificationSession<G, F, S, D, O>
where
    G: VerificationGateway + 'static,
    F: FingerprintProvider + 'static,
    S: SessionEstablisher + 'static,
    D: IdentityDecoder + 'static,
    O: VerificationObserver + 'static,
{
    pub fn new(
        params: SessionParams,
        gateway: G,
        fingerprints: F,
        establisher: S,
        decoder: D,
        observer: O,
    ) -> Arc<Self> {
        Self::with_config(params, SessionConfig::default(), gateway, fingerprints, establisher, decoder, observer)
    }

    pub fn with_config(
        params: SessionParams,
        config: SessionConfig,
        gateway: G,
        fingerprints: F,
        establisher: S,
        decoder: D,
        observer: O,
    ) -> Arc<Self> {
        Arc::new(Self {
            session_id: Uuid::new_v4(),
            email: params.email,
            temp_token: params.temp_token,
            remember_me: params.remember_me,
            gateway,
            fingerprints,
            establisher,
            decoder,
            observer,
            state: Mutex::new(SessionState {
                raw_input: String::new(),
                normalized_code: String::new(),
                mode: VerifyMode::Totp,
                status: VerificationStatus::Idle,
                is_verifying: false,
                has_succeeded: false,
                cancelled: false,
                device_fingerprint: params.device_fingerprint,
                trigger: AutoVerifyTrigger::new(config.typed_settle, config.paste_settle),
                epoch: 0,
                error: None,
                error_seq: 0,
            }),
            config,
        })
    }

    /// Feed a code-field change into the session. Normalizes the input,
    /// evaluates the auto-verify trigger, and schedules the debounced
    /// dispatch when the trigger arms.
    #[tracing::instrument(
        name = "VerificationSession::handle_input",
        skip_all,
        fields(session_id = %self.session_id, source = ?source)
    )]
    pub async fn handle_input(self: &Arc<Self>, raw: &str, source: InputSource) {
        let (decision, code) = {
            let mut st = self.state.lock().await;
            st.raw_input = raw.to_owned();
            st.normalized_code = normalize(raw);
            if st.status == VerificationStatus::Failed {
                st.status = VerificationStatus::Idle;
            }
            let ctx = TriggerContext {
                is_verifying: st.is_verifying,
                backup_mode: st.mode == VerifyMode::Backup,
                has_succeeded: st.has_succeeded,
                source,
            };
            let code = st.normalized_code.clone();
            (st.trigger.evaluate(&code, ctx), code)
        };

        if let TriggerDecision::Arm { delay, seq } = decision {
            tracing::debug!(delay_ms = delay.as_millis() as u64, "auto-verify armed");
            let session = Arc::clone(self);
            tokio::spawn(async move {
                tokio::time::sleep(delay).await;
                session.fire_armed(seq, &code).await;
            });
        }
    }

    /// Debounce expiry: re-validate every guard before dispatching, since
    /// state may have changed during the wait. `armed_code` is the value the
    /// trigger armed for; a six-digit replacement typed or pasted during the
    /// settle delay never drops below six characters, so the input must be
    /// compared against it explicitly.
    async fn fire_armed(self: &Arc<Self>, seq: u64, armed_code: &str) {
        {
            let st = self.state.lock().await;
            if !st.trigger.is_armed(seq)
                || st.normalized_code != armed_code
                || st.is_verifying
                || st.has_succeeded
                || st.cancelled
                || st.mode == VerifyMode::Backup
                || st.trigger.has_error_occurred()
            {
                tracing::debug!("armed dispatch no longer valid, dropping");
                return;
            }
        }
        // Errors are surfaced through session state; nothing to do here.
        let _ = self.verify_code(None).await;
    }

    /// Verify the six-digit TOTP code. With `None` the current normalized
    /// input is used. Idempotent after success; dropped silently while a
    /// request is in flight.
    #[tracing::instrument(
        name = "VerificationSession::verify_code",
        skip_all,
        fields(session_id = %self.session_id)
    )]
    pub async fn verify_code(
        self: &Arc<Self>,
        code: Option<&str>,
    ) -> Result<VerifyOutcome, VerifyError> {
        let raw = {
            let st = self.state.lock().await;
            if st.has_succeeded || st.cancelled {
                return Ok(VerifyOutcome::Skipped);
            }
            match code {
                Some(c) => c.to_owned(),
                None => st.normalized_code.clone(),
            }
        };

        let totp = match TotpCode::parse(&raw) {
            Ok(code) => code,
            Err(_) => {
                // Local validation failure: no network call, `is_verifying`
                // untouched.
                let error = VerifyError::InvalidCode;
                self.surface_error(error.to_string()).await;
                return Err(error);
            }
        };

        self.dispatch(VerificationCredential::Totp(totp)).await
    }

    /// Verify a backup code. Same dispatch and idempotent-success contract as
    /// [`verify_code`](Self::verify_code), but the only local validation is
    /// non-empty-after-trim. Never participates in auto-verify.
    #[tracing::instrument(
        name = "VerificationSession::verify_backup_code",
        skip_all,
        fields(session_id = %self.session_id)
    )]
    pub async fn verify_backup_code(
        self: &Arc<Self>,
        code: &str,
    ) -> Result<VerifyOutcome, VerifyError> {
        {
            let st = self.state.lock().await;
            if st.has_succeeded || st.cancelled {
                return Ok(VerifyOutcome::Skipped);
            }
        }

        let backup = match BackupCode::parse(code) {
            Ok(code) => code,
            Err(_) => {
                let error = VerifyError::BackupCodeRequired;
                self.surface_error(error.to_string()).await;
                return Err(error);
            }
        };

        self.dispatch(VerificationCredential::Backup(backup)).await
    }

    /// Clear every transient flag and switch input mode. Bumps the epoch so
    /// a response to an attempt still in flight is ignored when it lands.
    #[tracing::instrument(
        name = "VerificationSession::reset",
        skip_all,
        fields(session_id = %self.session_id, to_backup_mode = to_backup_mode)
    )]
    pub async fn reset(&self, to_backup_mode: bool) {
        let mut st = self.state.lock().await;
        st.epoch += 1;
        st.raw_input.clear();
        st.normalized_code.clear();
        st.mode = if to_backup_mode {
            VerifyMode::Backup
        } else {
            VerifyMode::Totp
        };
        st.status = VerificationStatus::Idle;
        st.is_verifying = false;
        st.has_succeeded = false;
        st.error = None;
        st.error_seq += 1;
        st.trigger.clear();
    }

    /// Abandon verification. Terminal: every later verify call is a no-op and
    /// a late response to an in-flight attempt is discarded.
    #[tracing::instrument(
        name = "VerificationSession::cancel",
        skip_all,
        fields(session_id = %self.session_id)
    )]
    pub async fn cancel(&self) {
        {
            let mut st = self.state.lock().await;
            if st.cancelled {
                return;
            }
            st.cancelled = true;
            st.epoch += 1;
            st.is_verifying = false;
            st.status = VerificationStatus::Idle;
            st.error = None;
            st.error_seq += 1;
            st.trigger.clear();
        }
        self.observer.verification_cancelled();
    }

    pub async fn status(&self) -> VerificationStatus {
        self.state.lock().await.status
    }

    pub async fn error_message(&self) -> Option<String> {
        self.state.lock().await.error.clone()
    }

    pub async fn normalized_code(&self) -> String {
        self.state.lock().await.normalized_code.clone()
    }

    pub async fn is_verifying(&self) -> bool {
        self.state.lock().await.is_verifying
    }

    pub async fn mode(&self) -> VerifyMode {
        self.state.lock().await.mode
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn remember_me(&self) -> bool {
        self.remember_me
    }

    async fn dispatch(
        self: &Arc<Self>,
        credential: VerificationCredential,
    ) -> Result<VerifyOutcome, VerifyError> {
        let (epoch, cached_fingerprint) = {
            let mut st = self.state.lock().await;
            if st.has_succeeded || st.cancelled {
                return Ok(VerifyOutcome::Skipped);
            }
            if st.is_verifying {
                tracing::debug!("verification already in flight, dropping trigger");
                return Ok(VerifyOutcome::Skipped);
            }
            st.is_verifying = true;
            st.status = VerificationStatus::Pending;
            st.error = None;
            st.error_seq += 1;
            (st.epoch, st.device_fingerprint.clone())
        };

        let device_fingerprint = self.resolve_fingerprint(cached_fingerprint).await;

        let request = VerificationRequest {
            credential: credential.clone(),
            temp_token: self.temp_token.clone(),
            remember_me: self.remember_me,
            device_fingerprint,
        };

        let outcome =
            tokio::time::timeout(self.config.request_timeout, self.gateway.verify(&request)).await;

        self.complete(epoch, credential, outcome).await
    }

    /// Use the session-held fingerprint when present, otherwise ask the
    /// provider with a short budget. Failure is non-fatal.
    async fn resolve_fingerprint(
        &self,
        cached: Option<DeviceFingerprint>,
    ) -> Option<DeviceFingerprint> {
        if cached.is_some() {
            return cached;
        }
        match tokio::time::timeout(self.config.fingerprint_timeout, self.fingerprints.fingerprint())
            .await
        {
            Ok(Ok(fingerprint)) => {
                self.state.lock().await.device_fingerprint = Some(fingerprint.clone());
                Some(fingerprint)
            }
            Ok(Err(error)) => {
                tracing::warn!(%error, "device fingerprint unavailable, continuing without");
                None
            }
            Err(_) => {
                tracing::warn!("device fingerprint lookup timed out, continuing without");
                None
            }
        }
    }

    async fn complete(
        self: &Arc<Self>,
        epoch: u64,
        credential: VerificationCredential,
        outcome: Result<Result<VerificationReply, GatewayError>, Elapsed>,
    ) -> Result<VerifyOutcome, VerifyError> {
        let mut st = self.state.lock().await;
        if st.epoch != epoch {
            // The session was reset or cancelled while the request was in
            // flight; whatever came back belongs to an abandoned attempt.
            tracing::debug!("discarding response for abandoned attempt");
            return Ok(VerifyOutcome::Skipped);
        }
        st.is_verifying = false;

        let reply = match outcome {
            Err(_elapsed) => {
                tracing::warn!("verification request timed out");
                st.trigger.disarm();
                st.status = VerificationStatus::Failed;
                let error = VerifyError::Timeout;
                self.surface_error_locked(&mut st, error.to_string());
                return Err(error);
            }
            Ok(Err(GatewayError::Network(detail))) => {
                tracing::warn!(%detail, "verification request failed to reach the server");
                st.trigger.record_failure(None);
                st.status = VerificationStatus::Failed;
                let error = VerifyError::Network(detail);
                self.surface_error_locked(&mut st, error.to_string());
                return Err(error);
            }
            Ok(Err(GatewayError::Rejected { message })) => {
                st.trigger.record_failure(Some(credential.as_str()));
                st.status = VerificationStatus::Failed;
                let error = VerifyError::Rejected(message);
                self.surface_error_locked(&mut st, error.to_string());
                return Err(error);
            }
            Ok(Ok(reply)) => reply,
        };

        let Some(access_token) = reply.access_token else {
            // 2xx without a token counts as a rejection for retry purposes.
            tracing::error!("verification response was missing the access token");
            st.trigger.record_failure(Some(credential.as_str()));
            st.status = VerificationStatus::Failed;
            let error = VerifyError::MalformedResponse;
            self.surface_error_locked(&mut st, error.to_string());
            return Err(error);
        };

        // Latch re-check: a racing trigger may have completed while this
        // request was in flight.
        if st.has_succeeded {
            return Ok(VerifyOutcome::Skipped);
        }
        st.has_succeeded = true;
        st.status = VerificationStatus::Succeeded;
        st.error = None;
        st.error_seq += 1;
        st.trigger.clear();
        drop(st);

        let user = match reply.user {
            Some(user) => user,
            None => self.decoder.decode_user(&access_token, &self.email),
        };
        let session = IssuedSession {
            access_token: Secret::from(access_token),
            refresh_token: reply.refresh_token.map(Secret::from),
            user,
            remember_me: self.remember_me,
            established_at: Utc::now(),
        };

        self.establisher.establish(&session);
        self.observer.verification_succeeded(&session);

        Ok(VerifyOutcome::Established(session))
    }

    async fn surface_error(self: &Arc<Self>, message: String) {
        let mut st = self.state.lock().await;
        self.surface_error_locked(&mut st, message);
    }

    /// Show an inline error and schedule its auto-clear. The sequence number
    /// keeps an older clear task from clobbering a newer error.
    fn surface_error_locked(self: &Arc<Self>, st: &mut SessionState, message: String) {
        st.error = Some(message);
        st.error_seq += 1;
        let seq = st.error_seq;
        let linger = self.config.error_display;
        let session = Arc::clone(self);
        tokio::spawn(async move {
            tokio::time::sleep(linger).await;
            let mut st = session.state.lock().await;
            if st.error_seq == seq {
                st.error = None;
            }
        });
    }
}
